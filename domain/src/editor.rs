//! Editor host entities
//!
//! Snapshot types handed across the scripting boundary. The live editor
//! state belongs to the host; scripts and other callers observe it through
//! `EditorAccessorPort` (application layer), which returns these values.

use serde::Serialize;

/// Identifier of a content view within the editor host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ViewId(pub u64);

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// A single content view: one open buffer presented in a tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub id: ViewId,
    /// Backing file path, if the buffer is file-backed.
    pub path: Option<String>,
    pub line_count: usize,
}

/// A tab groups one or more views; exactly one of them is focused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub index: usize,
    pub label: String,
    pub views: Vec<View>,
    /// Index into `views` of the focused view.
    pub focused: usize,
}

impl Tab {
    /// The focused view of this tab, if the tab has any views.
    pub fn focused_view(&self) -> Option<&View> {
        self.views.get(self.focused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_view(id: u64) -> View {
        View {
            id: ViewId(id),
            path: None,
            line_count: 1,
        }
    }

    #[test]
    fn test_view_id_display() {
        assert_eq!(ViewId(7).to_string(), "view#7");
    }

    #[test]
    fn test_focused_view() {
        let tab = Tab {
            index: 0,
            label: "untitled".to_string(),
            views: vec![scratch_view(1), scratch_view(2)],
            focused: 1,
        };
        assert_eq!(tab.focused_view().map(|v| v.id), Some(ViewId(2)));
    }

    #[test]
    fn test_focused_view_out_of_range_is_none() {
        let tab = Tab {
            index: 0,
            label: "untitled".to_string(),
            views: Vec::new(),
            focused: 0,
        };
        assert!(tab.focused_view().is_none());
    }
}
