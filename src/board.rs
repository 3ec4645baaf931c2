//! Board Utilities
//!
//! Helper functions for column rendering.

use std::collections::HashMap;

use crate::models::{Column, Deal, Stage};

/// Group deals into columns for the active stages, in display order.
///
/// Deals keep their list order inside a column. Deals whose stage is
/// inactive or unknown are left off the board.
pub fn build_columns(stages: &[Stage], deals: &[Deal]) -> Vec<Column> {
    // Build stage -> deals map
    let mut by_stage: HashMap<&str, Vec<&Deal>> = HashMap::new();
    for deal in deals {
        by_stage.entry(deal.stage.as_str()).or_default().push(deal);
    }

    let mut active: Vec<&Stage> = stages.iter().filter(|s| s.is_active).collect();
    active.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.key.cmp(&b.key)));

    active
        .into_iter()
        .map(|stage| {
            let deals: Vec<Deal> = by_stage
                .get(stage.key.as_str())
                .map(|ds| ds.iter().map(|d| (*d).clone()).collect())
                .unwrap_or_default();
            Column {
                stage: stage.clone(),
                deal_count: deals.len(),
                total_value_cents: deals.iter().map(|d| d.value_cents).sum(),
                deals,
            }
        })
        .collect()
}

/// Deal count and value across the whole board
pub fn pipeline_totals(columns: &[Column]) -> (usize, i64) {
    columns
        .iter()
        .fold((0, 0), |(count, value), c| (count + c.deal_count, value + c.total_value_cents))
}
