//! The `activities` resource — the shipped concrete binding.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::record::{Record, RecordId};

/// Whether an activity happens on a screen or in the physical world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
    Default,
)]
pub enum ActivityType {
    #[default]
    #[serde(rename = "DIGITAL")]
    #[strum(serialize = "Digital")]
    Digital,
    #[serde(rename = "NON_DIGITAL")]
    #[strum(serialize = "No Digital")]
    NonDigital,
}

impl ActivityType {
    /// The backend's representation, as it appears in JSON payloads.
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Digital => "DIGITAL",
            Self::NonDigital => "NON_DIGITAL",
        }
    }
}

/// An activity as persisted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
}

impl Record for Activity {
    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }
}

/// Create/update payload for an activity: its attributes minus the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
}

impl From<&Activity> for ActivityPayload {
    fn from(a: &Activity) -> Self {
        Self {
            title: a.title.clone(),
            description: a.description.clone(),
            activity_type: a.activity_type,
            image_url: a.image_url.clone(),
            resource_url: a.resource_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_camel_case_and_screaming_type() {
        let activity = Activity {
            id: 1,
            title: "Taller".into(),
            description: "d".into(),
            activity_type: ActivityType::NonDigital,
            image_url: Some("https://example.test/a.png".into()),
            resource_url: None,
        };
        let value = serde_json::to_value(&activity).expect("serialize");
        assert_eq!(value["type"], "NON_DIGITAL");
        assert_eq!(value["imageUrl"], "https://example.test/a.png");
        assert!(value.get("resourceUrl").is_none());
    }

    #[test]
    fn type_labels_are_human_readable() {
        assert_eq!(ActivityType::Digital.to_string(), "Digital");
        assert_eq!(ActivityType::NonDigital.to_string(), "No Digital");
    }
}
