//! Pipeline Board
//!
//! Client side of the sales pipeline board:
//! - models: entities plus column and drop-outcome shapes
//! - board: stage columns with per-column totals
//! - store: confirmed state with optimistic writes on top
//! - commands: drop handlers that resolve, show, persist and settle
//! - context: store and gesture for one board view

pub mod models;
pub mod board;
pub mod store;
pub mod commands;
pub mod context;

pub use context::BoardContext;
pub use store::BoardStore;
