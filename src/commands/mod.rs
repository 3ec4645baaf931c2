//! Drop Handlers
//!
//! Turn finished drags into persisted changes, organized by what was dragged.
//!
//! Each drop runs in two halves so the optimistic change is visible while
//! the write is in flight:
//! - `begin_*`: resolve patches and show them right away
//! - `settle`: fold them in on success, throw them away on failure

mod deal;
mod stage;

use pipeline_store::domain::DomainError;

use crate::models::{DropOutcome, Patch};
use crate::store::{BoardStore, Ticket};

pub use deal::*;
pub use stage::*;

/// A drop that is shown but not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDrop {
    pub ticket: Ticket,
    pub patches: Vec<Patch>,
}

impl PendingDrop {
    fn start(store: &mut BoardStore, patches: Vec<Patch>) -> Option<Self> {
        let ticket = store.apply_optimistic(patches.clone())?;
        Some(Self { ticket, patches })
    }
}

/// Finish a drop with the storage result. Errors come back as notification text.
pub fn settle(
    store: &mut BoardStore,
    pending: PendingDrop,
    result: Result<(), DomainError>,
) -> Result<DropOutcome, String> {
    match result {
        Ok(()) => {
            store.confirm(pending.ticket);
            Ok(DropOutcome::Persisted(pending.patches))
        }
        Err(e) => {
            store.rollback(pending.ticket);
            log::warn!("drop rolled back: {}", e);
            Err(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests;
