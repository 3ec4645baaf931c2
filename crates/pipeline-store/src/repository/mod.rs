//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
pub mod stage;
pub mod deal;


pub use traits::{Repository, PatchSink};
pub use db::{init_db, DbState, SharedConnection};
pub use stage::{StageRepository, StagePositioningOperations};
pub use deal::{DealRepository, DealMoveOperations};
