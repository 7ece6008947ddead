//! Placeholder substitution for embedded text resources.

use std::marker::PhantomData;

/// Values substituted into a [`Template`].
pub trait TemplateVars {
    /// `(placeholder, value)` pairs; every occurrence is replaced.
    fn values(&self) -> Vec<(&'static str, String)>;
}

/// Embedded text whose placeholders are filled from `V`.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _vars: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _vars: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.values()
            .into_iter()
            .fold(self.content.to_string(), |text, (placeholder, value)| {
                text.replace(placeholder, &value)
            })
    }
}
