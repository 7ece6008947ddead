use std::path::Path;

use notify::EventKind;
use notify::event::ModifyKind;
use rustc_hash::FxHashSet;

use super::binding::WatchSet;
use crate::actor::messages::TaskMsg;
use crate::utils::path::to_slash;

/// Convert one notify event into reaction messages.
///
/// Each binding fires at most once per event, even when the event
/// carries several matching paths.
pub(super) fn events_to_messages(event: &notify::Event, set: &WatchSet) -> Vec<TaskMsg> {
    if !is_relevant(&event.kind) {
        return Vec::new();
    }

    let mut fired = FxHashSet::default();
    let mut messages = Vec::new();

    for path in &event.paths {
        let Some(relative) = relative_source(path, set) else {
            continue;
        };
        crate::debug!("watch"; "{:?}: {}", event.kind, to_slash(relative));

        for binding in &set.bindings {
            if !binding.matches(relative) || !fired.insert(binding.reaction.as_str()) {
                continue;
            }
            messages.push(TaskMsg::React {
                reaction: binding.reaction.clone(),
                notify: binding.notify,
                path: relative.to_path_buf(),
            });
        }
    }

    messages
}

fn is_relevant(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => true,
        _ => false,
    }
}

/// Root-relative form of a changed source file, or `None` for paths the
/// watcher ignores.
fn relative_source<'a>(path: &'a Path, set: &WatchSet) -> Option<&'a Path> {
    if is_temp_file(path) || path.starts_with(&set.output_dir) {
        return None;
    }
    path.strip_prefix(&set.root).ok()
}

/// Check if path is a temp/backup file (editor artifacts).
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
