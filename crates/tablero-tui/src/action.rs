//! All possible UI actions. Actions are the sole mechanism for state mutation.

use tablero_core::{Activity, ActivityPayload, Notification, RecordId, ViewState};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data (from the controller bridge) ─────────────────────────
    StateChanged(ViewState<Activity>),

    // ── Record intents (forwarded to the controller) ──────────────
    Refresh,
    OpenCreate,
    OpenEdit(Activity),
    CloseModal,
    SubmitCreate(ActivityPayload),
    SubmitEdit(ActivityPayload),

    // ── Delete confirmation ───────────────────────────────────────
    RequestDelete { id: RecordId, title: String },
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,
}
