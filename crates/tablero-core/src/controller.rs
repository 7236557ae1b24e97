// ── CRUD controller ──
//
// The state machine behind every resource screen: owns the loaded
// collection, modal visibility, submission flags, and the query-param
// reflection of modal state. Consumers observe it through a `watch`
// channel and drive it with user intents (open/close/submit/delete).
//
// Every mutation triggers a full re-fetch of the collection rather
// than a local patch — the backend stays authoritative at the cost of
// one extra round trip per mutation.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Record, RecordId};
use crate::navigation::{Navigator, QueryAction, QueryState};
use crate::notify::Notifier;
use crate::service::RecordStore;

/// The controller-owned snapshot consumed by renderers.
///
/// Invariants: `is_edit_open` implies `editing_item.is_some()`; the two
/// modals are mutually exclusive (opening one force-closes the other).
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub is_create_open: bool,
    pub is_edit_open: bool,
    pub editing_item: Option<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: true,
            is_submitting: false,
            is_create_open: false,
            is_edit_open: false,
            editing_item: None,
        }
    }
}

/// Which controller operation an error came from, as passed to the
/// error hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    Fetch,
    Create,
    Update,
    Delete,
}

impl ErrorAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Callback invoked on every failed operation, after notifications.
pub type ErrorHook = Box<dyn Fn(&CoreError, ErrorAction) + Send + Sync>;

/// Generic list/create/edit/delete lifecycle for one resource.
///
/// Construction wires the seams: a [`RecordStore`] for the backend, a
/// [`Navigator`] for the query-param reflection, and a [`Notifier`]
/// for toasts. State is published through a `watch` channel; call
/// [`subscribe`](Self::subscribe) to observe every transition.
pub struct CrudController<T, P, S>
where
    T: Record,
    S: RecordStore<T, P>,
{
    service: S,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    error_hook: Option<ErrorHook>,
    state: watch::Sender<ViewState<T>>,
    /// Deep-link restoration runs at most once per controller lifetime.
    query_processed: bool,
    _payload: PhantomData<fn() -> P>,
}

impl<T, P, S> CrudController<T, P, S>
where
    T: Record,
    S: RecordStore<T, P>,
{
    pub fn new(service: S, navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            service,
            navigator,
            notifier,
            error_hook: None,
            state,
            query_processed: false,
            _payload: PhantomData,
        }
    }

    /// Install a hook invoked with every failed operation.
    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.error_hook = Some(hook);
        self
    }

    /// Subscribe to view-state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    /// A clone of the current view state.
    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    // ── Fetching ─────────────────────────────────────────────────

    /// Fetch the collection. On the first success, restores modal
    /// state from the query parameters (once per controller lifetime).
    ///
    /// A fetch failure is swallowed into a degraded empty view: loading
    /// stops, existing items are kept, and the error hook fires with
    /// [`ErrorAction::Fetch`].
    pub async fn load(&mut self) {
        self.update(|s| s.is_loading = true);

        match self.service.list_all().await {
            Ok(items) => {
                debug!(count = items.len(), "records fetched");
                self.update(|s| {
                    s.items = items;
                    s.is_loading = false;
                });
                self.restore_from_query();
            }
            Err(e) => {
                warn!(error = %e, "record fetch failed");
                self.update(|s| s.is_loading = false);
                self.report(&e, ErrorAction::Fetch);
            }
        }
    }

    /// Re-fetch on demand (same semantics as [`load`](Self::load)).
    pub async fn refresh(&mut self) {
        self.load().await;
    }

    /// Open a modal if the query parameters ask for one. Runs at most
    /// once; later refreshes within the same mount never re-trigger it.
    fn restore_from_query(&mut self) {
        if self.query_processed {
            return;
        }
        self.query_processed = true;

        let query = self.navigator.read_query();
        match query.action {
            Some(QueryAction::Create) => {
                debug!("restoring create modal from query");
                self.update(|s| {
                    s.is_edit_open = false;
                    s.editing_item = None;
                    s.is_create_open = true;
                });
            }
            Some(QueryAction::Edit) => {
                let Some(id) = query.id else { return };
                let item = self
                    .state
                    .borrow()
                    .items
                    .iter()
                    .find(|item| item.id().matches_str(&id))
                    .cloned();
                if let Some(item) = item {
                    debug!(%id, "restoring edit modal from query");
                    self.update(|s| {
                        s.is_create_open = false;
                        s.editing_item = Some(item);
                        s.is_edit_open = true;
                    });
                }
            }
            None => {}
        }
    }

    // ── Modal lifecycle ──────────────────────────────────────────

    /// Open the create modal and push `action=crear` (new history entry,
    /// so back-navigation closes it).
    pub fn open_create(&mut self) {
        self.update(|s| {
            s.is_edit_open = false;
            s.editing_item = None;
            s.is_create_open = true;
        });
        self.navigator.push_query(QueryState::create());
    }

    /// Close the create modal and clear the query parameters (replace,
    /// no dead history entry).
    pub fn close_create(&mut self) {
        self.update(|s| s.is_create_open = false);
        self.navigator.replace_query(QueryState::default());
    }

    /// Open the edit modal for `item` and push `action=editar&id=<id>`.
    pub fn open_edit(&mut self, item: T) {
        let id = item.id();
        self.update(|s| {
            s.is_create_open = false;
            s.editing_item = Some(item);
            s.is_edit_open = true;
        });
        self.navigator.push_query(QueryState::edit(&id));
    }

    /// Close the edit modal and clear the query parameters.
    pub fn close_edit(&mut self) {
        self.update(|s| {
            s.is_edit_open = false;
            s.editing_item = None;
        });
        self.navigator.replace_query(QueryState::default());
    }

    /// Reconcile modal state after an external history change (back
    /// navigation): a modal whose parameters are gone is closed.
    /// Never re-opens a modal.
    pub fn handle_navigation_change(&mut self) {
        let query = self.navigator.read_query();
        if query.action.is_none() {
            self.update(|s| {
                s.is_create_open = false;
                s.is_edit_open = false;
                s.editing_item = None;
            });
        }
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Submit the create form. On success: re-fetch, close the modal,
    /// clear the query, success toast. On failure: error toast, hook,
    /// and the error is returned so the form keeps the user's input.
    pub async fn submit_create(&mut self, payload: P) -> Result<(), CoreError> {
        self.update(|s| s.is_submitting = true);

        let result = self.service.create(&payload).await;
        self.update(|s| s.is_submitting = false);

        match result {
            Ok(_) => {
                self.load().await;
                self.update(|s| s.is_create_open = false);
                self.navigator.replace_query(QueryState::default());
                self.notifier.success("Registro creado exitosamente");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "create failed");
                self.notifier.error("Error al crear el registro");
                self.report(&e, ErrorAction::Create);
                Err(e)
            }
        }
    }

    /// Submit the edit form for the item currently being edited.
    /// A submit with no editing item is a no-op.
    pub async fn submit_edit(&mut self, payload: P) -> Result<(), CoreError> {
        let Some(id) = self.state.borrow().editing_item.as_ref().map(Record::id) else {
            return Ok(());
        };

        self.update(|s| s.is_submitting = true);

        let result = self.service.update(&id, &payload).await;
        self.update(|s| s.is_submitting = false);

        match result {
            Ok(_) => {
                self.load().await;
                self.update(|s| {
                    s.is_edit_open = false;
                    s.editing_item = None;
                });
                self.navigator.replace_query(QueryState::default());
                self.notifier.success("Registro actualizado exitosamente");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, %id, "update failed");
                self.notifier.error("Error al actualizar el registro");
                self.report(&e, ErrorAction::Update);
                Err(e)
            }
        }
    }

    /// Delete a record (the confirmation dialog lives in the renderer).
    /// On success: re-fetch and success toast. On failure: error toast
    /// carrying the server message, hook, and the error is returned.
    pub async fn delete(&mut self, id: RecordId) -> Result<(), CoreError> {
        match self.service.delete(&id).await {
            Ok(()) => {
                self.load().await;
                self.notifier.success("Registro eliminado exitosamente");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, %id, "delete failed");
                self.notifier.error(&e.message());
                self.report(&e, ErrorAction::Delete);
                Err(e)
            }
        }
    }

    // ── Private helpers ──────────────────────────────────────────

    fn update(&self, f: impl FnOnce(&mut ViewState<T>)) {
        // `send_modify` notifies subscribers even when none exist yet.
        self.state.send_modify(f);
    }

    fn report(&self, error: &CoreError, action: ErrorAction) {
        if let Some(ref hook) = self.error_hook {
            hook(error, action);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::navigation::MemoryNavigator;
    use crate::notify::{Notification, NotificationLevel};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        title: String,
    }

    impl Record for Item {
        fn id(&self) -> RecordId {
            RecordId::Int(self.id)
        }
    }

    #[derive(Debug, Clone)]
    struct Payload {
        title: String,
    }

    /// In-memory store with per-operation failure injection.
    #[derive(Default)]
    struct MockStore {
        items: Mutex<Vec<Item>>,
        next_id: AtomicUsize,
        list_calls: AtomicUsize,
        fail_list: Mutex<Option<String>>,
        fail_create: Mutex<Option<String>>,
        fail_update: Mutex<Option<String>>,
        fail_delete: Mutex<Option<String>>,
    }

    impl MockStore {
        fn with_items(items: Vec<Item>) -> Arc<Self> {
            let max_id = items.iter().map(|i| i.id).max().unwrap_or(0);
            let store = Self::default();
            *store.items.lock().unwrap() = items;
            #[allow(clippy::cast_sign_loss, clippy::as_conversions)]
            store.next_id.store(max_id as usize + 1, Ordering::SeqCst);
            Arc::new(store)
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn take_failure(slot: &Mutex<Option<String>>) -> Option<CoreError> {
            slot.lock().unwrap().clone().map(|message| CoreError::Api {
                message,
                status: Some(500),
            })
        }
    }

    impl RecordStore<Item, Payload> for Arc<MockStore> {
        async fn list_all(&self) -> Result<Vec<Item>, CoreError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = MockStore::take_failure(&self.fail_list) {
                return Err(e);
            }
            Ok(self.items.lock().unwrap().clone())
        }

        async fn get_by_id(&self, id: &RecordId) -> Result<Item, CoreError> {
            self.items
                .lock()
                .unwrap()
                .iter()
                .find(|i| i.id() == *id)
                .cloned()
                .ok_or_else(|| CoreError::NotFound {
                    message: format!("no item {id}"),
                })
        }

        async fn create(&self, payload: &Payload) -> Result<Item, CoreError> {
            if let Some(e) = MockStore::take_failure(&self.fail_create) {
                return Err(e);
            }
            #[allow(clippy::cast_possible_wrap, clippy::as_conversions)]
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
            let item = Item {
                id,
                title: payload.title.clone(),
            };
            self.items.lock().unwrap().push(item.clone());
            Ok(item)
        }

        async fn update(&self, id: &RecordId, payload: &Payload) -> Result<Item, CoreError> {
            if let Some(e) = MockStore::take_failure(&self.fail_update) {
                return Err(e);
            }
            let mut items = self.items.lock().unwrap();
            let item = items
                .iter_mut()
                .find(|i| i.id() == *id)
                .ok_or_else(|| CoreError::NotFound {
                    message: format!("no item {id}"),
                })?;
            item.title = payload.title.clone();
            Ok(item.clone())
        }

        async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
            if let Some(e) = MockStore::take_failure(&self.fail_delete) {
                return Err(e);
            }
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|i| i.id() != *id);
            if items.len() == before {
                return Err(CoreError::NotFound {
                    message: format!("no item {id}"),
                });
            }
            Ok(())
        }
    }

    /// Records every toast for assertions.
    #[derive(Default)]
    struct RecordingNotifier {
        toasts: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn messages(&self, level: NotificationLevel) -> Vec<String> {
            self.toasts
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.level == level)
                .map(|n| n.message.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.toasts.lock().unwrap().push(notification);
        }
    }

    struct Harness {
        store: Arc<MockStore>,
        nav: Arc<MemoryNavigator>,
        toasts: Arc<RecordingNotifier>,
        errors: Arc<Mutex<Vec<(String, ErrorAction)>>>,
        controller: CrudController<Item, Payload, Arc<MockStore>>,
    }

    fn harness_with(initial_query: QueryState, items: Vec<Item>) -> Harness {
        let store = MockStore::with_items(items);
        let nav = Arc::new(MemoryNavigator::with_initial(initial_query));
        let toasts = Arc::new(RecordingNotifier::default());
        let errors: Arc<Mutex<Vec<(String, ErrorAction)>>> = Arc::default();

        let hook_errors = Arc::clone(&errors);
        let controller = CrudController::new(
            Arc::clone(&store),
            Arc::clone(&nav) as Arc<dyn Navigator>,
            Arc::clone(&toasts) as Arc<dyn Notifier>,
        )
        .with_error_hook(Box::new(move |e, action| {
            hook_errors.lock().unwrap().push((e.message(), action));
        }));

        Harness {
            store,
            nav,
            toasts,
            errors,
            controller,
        }
    }

    fn harness(items: Vec<Item>) -> Harness {
        harness_with(QueryState::default(), items)
    }

    fn two_items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                title: "A".into(),
            },
            Item {
                id: 2,
                title: "B".into(),
            },
        ]
    }

    // ── Fetch ────────────────────────────────────────────────────

    #[tokio::test]
    async fn load_populates_items_and_stops_loading() {
        let mut h = harness(two_items());
        assert!(h.controller.state().is_loading);

        h.controller.load().await;

        let state = h.controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_empty() {
        let h = harness(Vec::new());
        *h.store.fail_list.lock().unwrap() = Some("backend caído".into());
        let mut controller = h.controller;

        controller.load().await;

        let state = controller.state();
        assert!(!state.is_loading);
        assert!(state.items.is_empty());
        let errors = h.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].1, ErrorAction::Fetch);
        assert_eq!(errors[0].1.as_str(), "fetch");
    }

    // ── Create ───────────────────────────────────────────────────

    #[tokio::test]
    async fn create_success_refetches_and_clears_query() {
        let mut h = harness(two_items());
        h.controller.load().await;
        h.controller.open_create();
        assert_eq!(h.nav.read_query(), QueryState::create());

        h.controller
            .submit_create(Payload { title: "C".into() })
            .await
            .unwrap();

        let state = h.controller.state();
        assert!(!state.is_create_open);
        assert!(!state.is_submitting);
        assert_eq!(state.items.len(), 3);
        // Initial load + post-create re-fetch.
        assert_eq!(h.store.list_calls(), 2);
        assert!(h.nav.read_query().is_empty());
        assert_eq!(
            h.toasts.messages(NotificationLevel::Success),
            vec!["Registro creado exitosamente"]
        );
    }

    #[tokio::test]
    async fn create_failure_keeps_modal_open() {
        let mut h = harness(two_items());
        h.controller.load().await;
        h.controller.open_create();
        *h.store.fail_create.lock().unwrap() = Some("db down".into());

        let err = h
            .controller
            .submit_create(Payload { title: "C".into() })
            .await
            .unwrap_err();

        assert_eq!(err.message(), "db down");
        let state = h.controller.state();
        assert!(state.is_create_open);
        assert!(!state.is_submitting);
        assert_eq!(
            h.toasts.messages(NotificationLevel::Error),
            vec!["Error al crear el registro"]
        );
        assert_eq!(h.errors.lock().unwrap()[0].1, ErrorAction::Create);
    }

    // ── Edit ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn open_edit_tracks_clicked_item() {
        let mut h = harness(two_items());
        h.controller.load().await;

        let clicked = h.controller.state().items[1].clone();
        h.controller.open_edit(clicked.clone());

        let state = h.controller.state();
        assert!(state.is_edit_open);
        assert_eq!(state.editing_item.as_ref().unwrap().id(), clicked.id());
        assert_eq!(
            h.nav.read_query(),
            QueryState::edit(&clicked.id()),
        );
    }

    #[tokio::test]
    async fn submit_edit_updates_and_closes() {
        let mut h = harness(two_items());
        h.controller.load().await;
        let item = h.controller.state().items[0].clone();
        h.controller.open_edit(item);

        h.controller
            .submit_edit(Payload {
                title: "A2".into(),
            })
            .await
            .unwrap();

        let state = h.controller.state();
        assert!(!state.is_edit_open);
        assert!(state.editing_item.is_none());
        assert_eq!(state.items[0].title, "A2");
        assert!(h.nav.read_query().is_empty());
        assert_eq!(
            h.toasts.messages(NotificationLevel::Success),
            vec!["Registro actualizado exitosamente"]
        );
    }

    #[tokio::test]
    async fn submit_edit_without_editing_item_is_noop() {
        let mut h = harness(two_items());
        h.controller.load().await;

        h.controller
            .submit_edit(Payload { title: "X".into() })
            .await
            .unwrap();

        assert_eq!(h.store.list_calls(), 1);
        assert!(h.toasts.toasts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn modals_are_mutually_exclusive() {
        let mut h = harness(two_items());
        h.controller.load().await;

        let item = h.controller.state().items[0].clone();
        h.controller.open_edit(item);
        h.controller.open_create();

        let state = h.controller.state();
        assert!(state.is_create_open);
        assert!(!state.is_edit_open);
        assert!(state.editing_item.is_none());
    }

    // ── Delete ───────────────────────────────────────────────────

    #[tokio::test]
    async fn delete_refetches_and_notifies() {
        let mut h = harness(two_items());
        h.controller.load().await;

        h.controller.delete(RecordId::Int(2)).await.unwrap();

        let state = h.controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.items, vec![Item {
            id: 1,
            title: "A".into()
        }]);
        // Exactly one extra fetch for the delete.
        assert_eq!(h.store.list_calls(), 2);
        assert_eq!(
            h.toasts.messages(NotificationLevel::Success),
            vec!["Registro eliminado exitosamente"]
        );
    }

    #[tokio::test]
    async fn delete_failure_surfaces_server_message() {
        let mut h = harness(two_items());
        h.controller.load().await;
        *h.store.fail_delete.lock().unwrap() = Some("registro protegido".into());

        let err = h.controller.delete(RecordId::Int(1)).await.unwrap_err();

        assert_eq!(err.message(), "registro protegido");
        assert_eq!(
            h.toasts.messages(NotificationLevel::Error),
            vec!["registro protegido"]
        );
        assert_eq!(h.errors.lock().unwrap()[0].1, ErrorAction::Delete);
        // No re-fetch on failure.
        assert_eq!(h.store.list_calls(), 1);
    }

    // ── History / query reflection ───────────────────────────────

    #[tokio::test]
    async fn history_pop_closes_create_modal() {
        let mut h = harness(two_items());
        h.controller.load().await;

        h.controller.open_create();
        assert_eq!(h.nav.push_count(), 1);

        h.nav.back().unwrap();
        h.controller.handle_navigation_change();

        let state = h.controller.state();
        assert!(!state.is_create_open);
        // Exactly one push per open — back fully undoes it.
        assert_eq!(h.nav.push_count(), 1);
        assert!(h.nav.read_query().is_empty());
    }

    #[tokio::test]
    async fn close_replaces_instead_of_pushing() {
        let mut h = harness(two_items());
        h.controller.load().await;

        h.controller.open_create();
        h.controller.close_create();

        assert!(h.nav.read_query().is_empty());
        assert_eq!(h.nav.push_count(), 1);
        // Replace leaves no dead entry to navigate back through.
        assert_eq!(h.nav.history_len(), 2);
    }

    #[tokio::test]
    async fn query_restoration_opens_create() {
        let mut h = harness_with(QueryState::create(), two_items());
        h.controller.load().await;

        assert!(h.controller.state().is_create_open);
        // Restoration reads, never writes.
        assert_eq!(h.nav.push_count(), 0);
    }

    #[tokio::test]
    async fn query_restoration_runs_once_per_mount() {
        let mut h = harness_with(QueryState::parse("action=editar&id=2"), two_items());
        h.controller.load().await;

        let state = h.controller.state();
        assert!(state.is_edit_open);
        assert_eq!(state.editing_item.as_ref().unwrap().id, 2);

        // Close, then refresh — the modal must not re-open.
        h.controller.close_edit();
        h.controller.refresh().await;

        let state = h.controller.state();
        assert!(!state.is_edit_open);
        assert!(state.editing_item.is_none());
    }

    #[tokio::test]
    async fn query_restoration_ignores_unknown_id() {
        let mut h = harness_with(QueryState::parse("action=editar&id=99"), two_items());
        h.controller.load().await;

        let state = h.controller.state();
        assert!(!state.is_edit_open);
        assert!(state.editing_item.is_none());
    }

    #[tokio::test]
    async fn restoration_skipped_after_fetch_failure() {
        let h = harness_with(QueryState::create(), two_items());
        *h.store.fail_list.lock().unwrap() = Some("x".into());
        let mut controller = h.controller;

        controller.load().await;

        assert!(!controller.state().is_create_open);
    }

    #[tokio::test]
    async fn subscribers_see_loading_pulse() {
        let mut h = harness(two_items());
        let mut rx = h.controller.subscribe();
        let mut pulses = Vec::new();

        h.controller.load().await;

        while rx.has_changed().unwrap() {
            pulses.push(rx.borrow_and_update().is_loading);
        }
        // watch coalesces intermediate states; the final state is settled.
        assert!(!h.controller.state().is_loading);
        assert!(!pulses.is_empty());
    }
}
