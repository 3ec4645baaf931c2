//! Commands Layer
//!
//! Command handlers over `AppState`. Errors are flattened to strings so a
//! caller can show them as a notification.

mod stage_cmd;
mod deal_cmd;

pub use stage_cmd::*;
pub use deal_cmd::*;
