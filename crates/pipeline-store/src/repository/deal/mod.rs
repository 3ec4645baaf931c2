//! Deal Repository Module
//!
//! This module provides deal repository functionality split into specialized sub-modules:
//! - deal_repo: Core CRUD operations
//! - deal_moves: Stage membership (listing by stage, moves, group patches)

mod deal_repo;
mod deal_moves;

pub use deal_repo::DealRepository;

// Re-export operation traits so they can be used by importing DealRepository
pub use deal_moves::DealMoveOperations;
