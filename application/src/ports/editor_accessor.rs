//! Editor state access port.
//!
//! A snapshot-based, read-only interface for observing the host's tabs
//! and views without depending on presentation-layer types. The `tabs`,
//! `curTab` and `CurView` host bindings are backed by this port.
//!
//! [`EditorState`] is the in-memory implementation used by the host
//! harness and by tests.

use vellum_domain::{Tab, View, ViewId};

/// Port for observing editor host state.
pub trait EditorAccessorPort: Send + Sync {
    /// Snapshot of all tabs, in display order.
    fn tabs(&self) -> Vec<Tab>;

    /// Snapshot of the active tab, if any tab is open.
    fn active_tab(&self) -> Option<Tab>;

    /// Snapshot of the focused view of the active tab.
    fn active_view(&self) -> Option<View>;
}

/// In-memory editor state.
///
/// Owns the live tab collection; mutations happen on the host side, reads
/// come from anywhere through the port (snapshots, no references out).
#[derive(Debug, Default)]
pub struct EditorState {
    tabs: Vec<Tab>,
    active: usize,
    next_view_id: u64,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: 0,
            next_view_id: 1,
        }
    }

    /// One unnamed tab holding a single empty scratch view.
    pub fn with_scratch() -> Self {
        let mut state = Self::new();
        state.open_tab("untitled", vec![(None, 1)]);
        state
    }

    /// Open a new tab with the given views (`(path, line_count)` pairs).
    /// Returns the new tab's index and makes it active.
    pub fn open_tab(&mut self, label: impl Into<String>, views: Vec<(Option<String>, usize)>) -> usize {
        let index = self.tabs.len();
        let views = views
            .into_iter()
            .map(|(path, line_count)| {
                let id = ViewId(self.next_view_id);
                self.next_view_id += 1;
                View {
                    id,
                    path,
                    line_count,
                }
            })
            .collect();
        self.tabs.push(Tab {
            index,
            label: label.into(),
            views,
            focused: 0,
        });
        self.active = index;
        index
    }

    /// Switch the active tab. Returns false if the index is out of range.
    pub fn set_active_tab(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = index;
            true
        } else {
            false
        }
    }
}

impl EditorAccessorPort for EditorState {
    fn tabs(&self) -> Vec<Tab> {
        self.tabs.clone()
    }

    fn active_tab(&self) -> Option<Tab> {
        self.tabs.get(self.active).cloned()
    }

    fn active_view(&self) -> Option<View> {
        self.tabs
            .get(self.active)
            .and_then(|tab| tab.focused_view())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_has_no_active_tab() {
        let state = EditorState::new();
        assert!(state.tabs().is_empty());
        assert!(state.active_tab().is_none());
        assert!(state.active_view().is_none());
    }

    #[test]
    fn test_scratch_state() {
        let state = EditorState::with_scratch();
        assert_eq!(state.tabs().len(), 1);
        let view = state.active_view().unwrap();
        assert_eq!(view.id, ViewId(1));
        assert!(view.path.is_none());
    }

    #[test]
    fn test_open_tab_becomes_active() {
        let mut state = EditorState::with_scratch();
        let index = state.open_tab("notes", vec![(Some("notes.md".to_string()), 42)]);
        assert_eq!(index, 1);
        assert_eq!(state.active_tab().unwrap().label, "notes");
        let view = state.active_view().unwrap();
        assert_eq!(view.path.as_deref(), Some("notes.md"));
        assert_eq!(view.line_count, 42);
    }

    #[test]
    fn test_view_ids_are_unique_across_tabs() {
        let mut state = EditorState::with_scratch();
        state.open_tab("a", vec![(None, 1), (None, 1)]);
        let ids: Vec<u64> = state
            .tabs()
            .iter()
            .flat_map(|t| t.views.iter().map(|v| v.id.0))
            .collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn test_set_active_tab_bounds() {
        let mut state = EditorState::with_scratch();
        state.open_tab("second", vec![(None, 1)]);
        assert!(state.set_active_tab(0));
        assert_eq!(state.active_tab().unwrap().index, 0);
        assert!(!state.set_active_tab(9));
        assert_eq!(state.active_tab().unwrap().index, 0);
    }
}
