//! Pointer Gesture Tracking
//!
//! Uses movement threshold to distinguish click from drag. Feed it pointer
//! events from whatever windowing layer is in use; `release` hands back the
//! finished `DropEvent`.

use serde::{Deserialize, Serialize};

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// A completed drag, ready for reorder resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub dragged_id: String,
    /// `None` when released outside every drop target
    pub destination_id: Option<String>,
}

/// State of the one gesture that can be active at a time
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    /// Pressed but not yet moved far enough
    pending_id: Option<String>,
    dragging_id: Option<String>,
    drop_target: Option<String>,
    start_x: i32,
    start_y: i32,
    just_ended: bool,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary-button press on a draggable element
    pub fn press(&mut self, id: impl Into<String>, x: i32, y: i32) {
        if self.dragging_id.is_some() {
            return;
        }
        self.pending_id = Some(id.into());
        self.start_x = x;
        self.start_y = y;
    }

    /// Starts the drag once the pointer has moved past the threshold.
    /// Returns true while a drag is in progress.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        if self.dragging_id.is_none() {
            if let Some(pending) = &self.pending_id {
                let dx = (x - self.start_x).abs();
                let dy = (y - self.start_y).abs();
                if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                    log::debug!("drag started for {}", pending);
                    self.dragging_id = Some(pending.clone());
                }
            }
        }
        self.dragging_id.is_some()
    }

    /// Pointer entered a column or card
    pub fn enter(&mut self, target_id: impl Into<String>) {
        let target_id = target_id.into();
        match &self.dragging_id {
            // Don't allow dropping on self
            Some(dragging) if *dragging != target_id => self.drop_target = Some(target_id),
            _ => {}
        }
    }

    /// Pointer left the current target
    pub fn leave(&mut self) {
        if self.dragging_id.is_some() {
            self.drop_target = None;
        }
    }

    /// End the gesture. Only an actual drag produces an event; a click does not.
    pub fn release(&mut self) -> Option<DropEvent> {
        self.pending_id = None;
        let dragged = self.dragging_id.take();
        let target = self.drop_target.take();
        self.just_ended = dragged.is_some();

        dragged.map(|dragged_id| DropEvent {
            dragged_id,
            destination_id: target,
        })
    }

    /// Whether a drag just finished, so the trailing click can be ignored
    pub fn just_ended(&self) -> bool {
        self.just_ended
    }

    pub fn clear_just_ended(&mut self) {
        self.just_ended = false;
    }

    pub fn dragging_id(&self) -> Option<&str> {
        self.dragging_id.as_deref()
    }

    pub fn drop_target(&self) -> Option<&str> {
        self.drop_target.as_deref()
    }
}
