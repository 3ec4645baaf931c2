//! Stage Repository Module
//!
//! This module provides stage repository functionality split into specialized sub-modules:
//! - stage_repo: Core CRUD operations, default seeding, active toggling
//! - stage_positioning: Display order management and order patches

mod stage_repo;
mod stage_positioning;

pub use stage_repo::StageRepository;

// Re-export operation traits so they can be used by importing StageRepository
pub use stage_positioning::StagePositioningOperations;
