//! Live reload script injection for served HTML.

/// Inject the hotreload script if content is HTML
pub fn maybe_inject_hotreload(body: Vec<u8>, content_type: &str) -> Vec<u8> {
    if crate::utils::mime::is_html(content_type) {
        inject_hotreload_script(&body)
    } else {
        body
    }
}

/// Inject hotreload script before `</body>` tag
fn inject_hotreload_script(content: &[u8]) -> Vec<u8> {
    let script = crate::embed::serve::hotreload_tag();
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    match content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        Some(pos) => {
            result.extend_from_slice(&content[..pos]);
            result.extend_from_slice(script_bytes);
            result.extend_from_slice(&content[pos..]);
        }
        // No </body> found, append to end (browsers handle this gracefully)
        None => {
            result.extend_from_slice(content);
            result.extend_from_slice(script_bytes);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mime::types::{CSS, HTML};

    const TAG: &str = r#"<script src="/__assetflow/hotreload.js"></script>"#;

    #[test]
    fn test_inject_before_last_body_close() {
        let body = b"<html><body><p>a</p></BODY></html>".to_vec();
        let out = String::from_utf8(maybe_inject_hotreload(body, HTML)).unwrap();
        assert_eq!(out, format!("<html><body><p>a</p>{TAG}</BODY></html>"));
    }

    #[test]
    fn test_append_without_body() {
        let out = maybe_inject_hotreload(b"<p>a</p>".to_vec(), HTML);
        assert_eq!(String::from_utf8(out).unwrap(), format!("<p>a</p>{TAG}"));
    }

    #[test]
    fn test_non_html_untouched() {
        let body = b".a{color:red}</body>".to_vec();
        assert_eq!(maybe_inject_hotreload(body.clone(), CSS), body);
    }
}
