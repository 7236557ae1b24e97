//! CRUD orchestration layer between `tablero-api` and UI consumers
//! (CLI / TUI).
//!
//! This crate owns the view-state machinery behind every resource
//! screen:
//!
//! - **[`CrudController`]** — The list/create/edit/delete state machine.
//!   Owns the fetched collection, modal visibility, and submission
//!   flags; publishes every transition through a `tokio::sync::watch`
//!   channel and reflects open modals into query parameters
//!   (`action=crear`, `action=editar&id=…`) via an injected
//!   [`Navigator`].
//!
//! - **[`RecordStore`]** — The backend seam. Production binds it to
//!   `tablero_api::RecordService`; tests drive the controller with an
//!   in-memory store.
//!
//! - **[`TableModel`]** — Declarative column descriptors plus transient
//!   sort/filter/visibility/pagination state, projecting any
//!   `T: Serialize` into display rows.
//!
//! - **[`ResourceBinding`]** — Per-resource composition: endpoint,
//!   display strings, column list. [`binding::activities_binding`] is
//!   the shipped resource.

pub mod binding;
pub mod controller;
pub mod error;
pub mod model;
pub mod navigation;
pub mod notify;
pub mod service;
pub mod table;

// ── Primary re-exports ──────────────────────────────────────────────
pub use binding::{ResourceBinding, activities_binding};
pub use controller::{CrudController, ErrorAction, ErrorHook, ViewState};
pub use error::CoreError;
pub use navigation::{MemoryNavigator, Navigator, QueryAction, QueryState};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, NullNotifier};
pub use service::RecordStore;
pub use table::{CellRender, ColumnDescriptor, SortDirection, TableModel, TableRow, actions_column};

// Re-export model types at the crate root for ergonomics.
pub use model::{Activity, ActivityPayload, ActivityType, Record, RecordId};
