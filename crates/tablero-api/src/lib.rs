//! Async REST client for the tablero admin backend.
//!
//! Three surfaces, all sharing one [`ApiClient`]:
//!
//! - **[`ApiClient`]** — transport: URL construction, JSON bodies,
//!   bearer-token injection, and extraction of the backend's `message`
//!   field from error responses.
//! - **[`RecordService`]** — generic typed CRUD over a named resource
//!   (`GET/POST/PUT/DELETE {base}/api/{endpoint}[/{id}]`).
//! - **[`AuthApi`]** — login / me / logout; a successful login stores
//!   the bearer token on the shared client.
//!
//! `tablero-core` builds the CRUD controller on top of this crate and
//! never sees raw HTTP details.

pub mod auth;
pub mod client;
pub mod error;
pub mod records;

pub use auth::{AuthApi, UserProfile};
pub use client::ApiClient;
pub use error::Error;
pub use records::RecordService;
