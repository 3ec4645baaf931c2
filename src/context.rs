//! Board Context
//!
//! Everything one board view needs in one place: the optimistic store and
//! the drag gesture in progress.

use board_dragdrop::DragGesture;
use pipeline_store::repository::PatchSink;
use pipeline_store::{commands as store_commands, AppState};

use crate::board::build_columns;
use crate::commands::{handle_deal_drop, handle_stage_drop};
use crate::models::{Column, DropOutcome};
use crate::store::BoardStore;

#[derive(Debug, Default)]
pub struct BoardContext {
    pub store: BoardStore,
    pub gesture: DragGesture,
    /// Bumped on every reload from storage
    reload_count: u32,
}

impl BoardContext {
    pub fn new(store: BoardStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Load stages and deals from storage
    pub async fn load(state: &AppState) -> Result<Self, String> {
        let mut ctx = Self::default();
        ctx.reload(state).await?;
        Ok(ctx)
    }

    /// Refresh the confirmed state from storage
    pub async fn reload(&mut self, state: &AppState) -> Result<(), String> {
        let stages = store_commands::list_stages(state).await?;
        let deals = store_commands::list_deals(state).await?;
        self.store.replace_confirmed(stages, deals);
        self.reload_count += 1;
        Ok(())
    }

    pub fn reload_count(&self) -> u32 {
        self.reload_count
    }

    /// Columns to render, including any write still in flight
    pub fn columns(&self) -> Vec<Column> {
        build_columns(&self.store.view_stages(), &self.store.view_deals())
    }

    /// Pointer released over the board while dragging a card
    pub async fn release_card<S: PatchSink + ?Sized>(&mut self, sink: &S) -> Result<DropOutcome, String> {
        match self.gesture.release() {
            Some(event) => handle_deal_drop(&mut self.store, sink, &event).await,
            // Plain click
            None => Ok(DropOutcome::NoChange),
        }
    }

    /// A column header was dropped at a new index on the settings list
    pub async fn drop_stage<S: PatchSink + ?Sized>(
        &mut self,
        sink: &S,
        source_index: usize,
        destination_index: usize,
    ) -> Result<DropOutcome, String> {
        handle_stage_drop(&mut self.store, sink, source_index, destination_index).await
    }
}
