// ── Navigation adapter ──
//
// The controller reflects modal state into two query parameters
// (`action`, `id`) so create/edit dialogs are deep-linkable and survive
// a reload. The browsing context is abstracted behind `Navigator` so
// the controller can be driven by an in-memory history stack in tests
// and by the TUI's deep-link state in production.

use std::sync::Mutex;

use crate::model::RecordId;

/// The `action` query parameter. Wire values are Spanish, matching the
/// admin UI's deep links (`?action=crear`, `?action=editar&id=7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAction {
    Create,
    Edit,
}

impl QueryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "crear",
            Self::Edit => "editar",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "crear" => Some(Self::Create),
            "editar" => Some(Self::Edit),
            _ => None,
        }
    }
}

/// The lossy projection of modal state into query parameters.
///
/// `id` is the string form of a [`RecordId`] and only meaningful
/// together with [`QueryAction::Edit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub action: Option<QueryAction>,
    pub id: Option<String>,
}

impl QueryState {
    /// The reflection of an open create modal: `action=crear`.
    pub fn create() -> Self {
        Self {
            action: Some(QueryAction::Create),
            id: None,
        }
    }

    /// The reflection of an open edit modal: `action=editar&id=<id>`.
    pub fn edit(id: &RecordId) -> Self {
        Self {
            action: Some(QueryAction::Edit),
            id: Some(id.to_string()),
        }
    }

    /// No CRUD parameters present.
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.id.is_none()
    }

    /// Parse from a raw query string (`action=editar&id=7`). Unknown
    /// keys and unknown action values are ignored.
    pub fn parse(query: &str) -> Self {
        let mut state = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "action" => state.action = QueryAction::parse(value),
                "id" => state.id = Some(value.to_owned()),
                _ => {}
            }
        }
        state
    }

    /// Encode back to a query string. Empty state encodes to `""`.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(action) = self.action {
            parts.push(format!("action={}", action.as_str()));
        }
        if let Some(ref id) = self.id {
            parts.push(format!("id={id}"));
        }
        parts.join("&")
    }
}

/// Injected navigation capability: read the current query, push a new
/// history entry, or replace the current one without adding an entry.
pub trait Navigator: Send + Sync {
    fn read_query(&self) -> QueryState;
    fn push_query(&self, query: QueryState);
    fn replace_query(&self, query: QueryState);
}

// ── In-memory implementation ────────────────────────────────────────

struct History {
    entries: Vec<QueryState>,
    index: usize,
    pushes: usize,
}

/// History-stack navigator for tests and for the TUI (which has no
/// browser URL bar but keeps the same deep-link semantics).
pub struct MemoryNavigator {
    inner: Mutex<History>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::with_initial(QueryState::default())
    }

    /// Start with a pre-populated query, e.g. a deep link.
    pub fn with_initial(query: QueryState) -> Self {
        Self {
            inner: Mutex::new(History {
                entries: vec![query],
                index: 0,
                pushes: 0,
            }),
        }
    }

    /// Navigate back one entry, like a browser back button. Returns the
    /// now-current query, or `None` when already at the oldest entry.
    pub fn back(&self) -> Option<QueryState> {
        let mut inner = self.inner.lock().expect("history lock poisoned");
        if inner.index == 0 {
            return None;
        }
        inner.index -= 1;
        Some(inner.entries[inner.index].clone())
    }

    /// Total number of pushes performed (for push/pop symmetry checks).
    pub fn push_count(&self) -> usize {
        self.inner.lock().expect("history lock poisoned").pushes
    }

    /// Depth of the history stack.
    pub fn history_len(&self) -> usize {
        self.inner
            .lock()
            .expect("history lock poisoned")
            .entries
            .len()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for MemoryNavigator {
    fn read_query(&self) -> QueryState {
        let inner = self.inner.lock().expect("history lock poisoned");
        inner.entries[inner.index].clone()
    }

    fn push_query(&self, query: QueryState) {
        let mut inner = self.inner.lock().expect("history lock poisoned");
        let index = inner.index;
        // Pushing discards any forward entries, like a browser.
        inner.entries.truncate(index + 1);
        inner.entries.push(query);
        inner.index += 1;
        inner.pushes += 1;
    }

    fn replace_query(&self, query: QueryState) {
        let mut inner = self.inner.lock().expect("history lock poisoned");
        let index = inner.index;
        inner.entries[index] = query;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_encode_round_trip() {
        let state = QueryState::parse("action=editar&id=7");
        assert_eq!(state.action, Some(QueryAction::Edit));
        assert_eq!(state.id.as_deref(), Some("7"));
        assert_eq!(state.to_query_string(), "action=editar&id=7");
    }

    #[test]
    fn parse_ignores_unknown_keys_and_actions() {
        let state = QueryState::parse("action=borrar&page=2");
        assert!(state.action.is_none());
        assert!(state.id.is_none());
    }

    #[test]
    fn push_adds_history_entry_and_back_returns_to_it() {
        let nav = MemoryNavigator::new();
        nav.push_query(QueryState::create());
        assert_eq!(nav.read_query(), QueryState::create());
        assert_eq!(nav.push_count(), 1);

        let popped = nav.back().expect("history entry to pop");
        assert!(popped.is_empty());
        assert!(nav.read_query().is_empty());
    }

    #[test]
    fn replace_does_not_grow_history() {
        let nav = MemoryNavigator::new();
        nav.push_query(QueryState::create());
        nav.replace_query(QueryState::default());
        assert_eq!(nav.history_len(), 2);
        assert!(nav.read_query().is_empty());
    }

    #[test]
    fn push_truncates_forward_entries() {
        let nav = MemoryNavigator::new();
        nav.push_query(QueryState::create());
        nav.back();
        nav.push_query(QueryState::edit(&RecordId::from(3)));
        assert_eq!(nav.history_len(), 2);
        assert_eq!(nav.read_query().id.as_deref(), Some("3"));
    }
}
