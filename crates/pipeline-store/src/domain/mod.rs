//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde for serialization
//! and the drag-drop traits the board needs to read ids and group keys).

mod entity;
mod stage;
mod deal;

pub use entity::{Entity, DomainError, DomainResult};
pub use stage::{Stage, DEFAULT_STAGES};
pub use deal::{Deal, DEAL_ID_PREFIX};
