//! Board Models
//!
//! Entities come from the store crate; this adds the shapes the board
//! renders and the results of handling a drop.

use serde::Serialize;

pub use board_dragdrop::{DropEvent, Patch};
pub use pipeline_store::domain::{Deal, Stage};

/// One board column: a stage and the deals currently in it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub stage: Stage,
    pub deals: Vec<Deal>,
    pub deal_count: usize,
    pub total_value_cents: i64,
}

/// What a handled drop did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "patches", rename_all = "camelCase")]
pub enum DropOutcome {
    /// Nothing to persist (same column, unknown ids, released outside)
    NoChange,
    /// Patches written and folded into the confirmed state
    Persisted(Vec<Patch>),
}
