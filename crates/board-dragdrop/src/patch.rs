//! Record patches emitted by reorder resolution.

use serde::{Deserialize, Serialize};

/// A partial update to one record, keyed by id.
///
/// Deals get `new_group_key`, stages get `new_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_group_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_order: Option<i32>,
}

impl Patch {
    pub fn group(id: impl Into<String>, group_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            new_group_key: Some(group_key.into()),
            new_order: None,
        }
    }

    pub fn order(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            new_group_key: None,
            new_order: Some(order),
        }
    }
}
