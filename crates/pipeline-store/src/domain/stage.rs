//! Stage Entity
//!
//! Pipeline stages are the columns of the board. Their order is persisted
//! as a dense 1..N `display_order`.

use serde::{Deserialize, Serialize};
use board_dragdrop::Keyed;
use super::deal::Deal;
use super::entity::{Entity, DomainError, DomainResult};

/// Stages seeded on first use: (key, label, color)
pub const DEFAULT_STAGES: [(&str, &str, &str); 6] = [
    ("lead", "Lead", "#94A3B8"),
    ("contact", "Contacted", "#60A5FA"),
    ("proposal", "Proposal", "#A78BFA"),
    ("negotiation", "Negotiation", "#FBBF24"),
    ("won", "Won", "#34D399"),
    ("lost", "Lost", "#F87171"),
];

/// A pipeline stage (board column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Stable key, referenced by deals
    pub key: String,
    pub label: String,
    /// Color (hex, e.g., "#FF5733")
    pub color: Option<String>,
    /// Position on the board, 1-based
    pub display_order: i32,
    pub is_active: bool,
    /// System stages can be deactivated or recolored but never deleted
    pub is_system: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Stage {
    /// A user-created stage; the repository assigns its order
    pub fn new(key: String, label: String) -> Self {
        Self {
            key,
            label,
            color: None,
            display_order: 0,
            is_active: true,
            is_system: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_color(key: String, label: String, color: String) -> Self {
        Self {
            color: Some(color),
            ..Self::new(key, label)
        }
    }

    /// The default system stages, numbered 1..N
    pub fn defaults() -> Vec<Stage> {
        DEFAULT_STAGES
            .iter()
            .enumerate()
            .map(|(i, (key, label, color))| Stage {
                display_order: i as i32 + 1,
                is_system: true,
                ..Stage::with_color(key.to_string(), label.to_string(), color.to_string())
            })
            .collect()
    }

    /// Keys are lowercase slugs: letters, digits, `-` and `_`.
    ///
    /// Stage keys and deal ids share one drop-target namespace, so a key
    /// shaped like a generated deal id is refused.
    pub fn validate_key(key: &str) -> DomainResult<()> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::InvalidInput(format!("Invalid stage key '{}'", key)));
        }
        if Deal::is_generated_id(key) {
            return Err(DomainError::InvalidInput(format!(
                "Stage key '{}' is reserved for deal ids",
                key
            )));
        }
        Ok(())
    }
}

impl Entity for Stage {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.key.clone()
    }
}

impl Keyed for Stage {
    fn key(&self) -> &str {
        &self.key
    }
}
