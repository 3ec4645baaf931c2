//! Deal Entity
//!
//! A deal sits in exactly one stage. It has no order field of its own;
//! within a column deals show in creation order.

use serde::{Deserialize, Serialize};
use board_dragdrop::Grouped;
use super::entity::Entity;

/// Prefix of repository-generated deal ids
pub const DEAL_ID_PREFIX: &str = "deal-";

/// A sales opportunity on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// `deal-<n>` when generated by the repository
    pub id: String,
    pub title: String,
    /// Deal value in minor currency units
    pub value_cents: i64,
    /// Contact person or company
    pub contact: Option<String>,
    /// Key of the stage this deal belongs to
    pub stage: String,
    pub notes: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Deal {
    /// Create a deal with an empty id; the repository assigns one
    pub fn new(title: String, stage: String) -> Self {
        Self {
            id: String::new(),
            title,
            value_cents: 0,
            contact: None,
            stage,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_value(title: String, stage: String, value_cents: i64) -> Self {
        Self {
            value_cents,
            ..Self::new(title, stage)
        }
    }

    /// Id the repository hands out for sequence number `n`
    pub fn generated_id(n: i64) -> String {
        format!("{}{}", DEAL_ID_PREFIX, n)
    }

    /// Whether `id` has the `deal-<digits>` shape of a generated id
    pub fn is_generated_id(id: &str) -> bool {
        id.strip_prefix(DEAL_ID_PREFIX)
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }
}

impl Entity for Deal {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

impl Grouped for Deal {
    fn item_id(&self) -> &str {
        &self.id
    }

    fn group_key(&self) -> &str {
        &self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        assert_eq!(Deal::generated_id(7), "deal-7");
        assert!(Deal::is_generated_id("deal-7"));
        assert!(!Deal::is_generated_id("deal-"));
        assert!(!Deal::is_generated_id("deal-desk"));
        assert!(!Deal::is_generated_id("lead"));
    }

    #[test]
    fn test_deal_creation() {
        let deal = Deal::with_value("Acme renewal".to_string(), "lead".to_string(), 120_000);
        assert!(deal.id.is_empty());
        assert_eq!(deal.group_key(), "lead");
        assert_eq!(deal.value_cents, 120_000);
    }

    #[test]
    fn test_deal_serialization() {
        let mut deal = Deal::new("Globex".to_string(), "won".to_string());
        deal.id = "deal-3".to_string();
        let json = serde_json::to_value(&deal).unwrap();
        assert_eq!(json["id"], "deal-3");
        assert_eq!(json["stage"], "won");
    }
}
