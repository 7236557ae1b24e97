//! Domain model: record identity plus the shipped resource types.

pub mod activity;
pub mod record;

pub use activity::{Activity, ActivityPayload, ActivityType};
pub use record::{Record, RecordId};
