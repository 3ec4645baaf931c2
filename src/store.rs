//! Board State Store
//!
//! Confirmed state as last read from storage, plus the writes that have been
//! shown to the user but not yet acknowledged. Views are the confirmed state
//! with pending patches replayed on top, so an optimistic change can be
//! confirmed or thrown away without touching anything else.
//!
//! Writes may be acknowledged in any order. Confirmed state only absorbs
//! them in ticket order, the same order the view replays them in.

use crate::models::{Deal, Patch, Stage};

/// Handle for one optimistic write
pub type Ticket = u64;

#[derive(Debug, Clone)]
struct PendingWrite {
    ticket: Ticket,
    patches: Vec<Patch>,
    /// Storage accepted it; waiting on an earlier ticket before folding
    acknowledged: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    stages: Vec<Stage>,
    deals: Vec<Deal>,
    pending: Vec<PendingWrite>,
    next_ticket: Ticket,
}

impl BoardStore {
    pub fn new(stages: Vec<Stage>, deals: Vec<Deal>) -> Self {
        let mut store = Self::default();
        store.replace_confirmed(stages, deals);
        store
    }

    /// Full reload from storage. Pending writes stay queued on top.
    pub fn replace_confirmed(&mut self, stages: Vec<Stage>, deals: Vec<Deal>) {
        self.stages = stages;
        sort_stages(&mut self.stages);
        self.deals = deals;
    }

    pub fn confirmed_stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn confirmed_deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Stages as the user should see them, in display order
    pub fn view_stages(&self) -> Vec<Stage> {
        let mut stages = self.stages.clone();
        for write in &self.pending {
            apply_to_stages(&mut stages, &write.patches);
        }
        stages
    }

    /// Deals as the user should see them
    pub fn view_deals(&self) -> Vec<Deal> {
        let mut deals = self.deals.clone();
        for write in &self.pending {
            apply_to_deals(&mut deals, &write.patches);
        }
        deals
    }

    /// Show patches immediately. `None` when there is nothing to write.
    pub fn apply_optimistic(&mut self, patches: Vec<Patch>) -> Option<Ticket> {
        if patches.is_empty() {
            return None;
        }
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending.push(PendingWrite {
            ticket,
            patches,
            acknowledged: false,
        });
        Some(ticket)
    }

    /// The write landed. It is folded into the confirmed state once every
    /// earlier ticket has settled.
    pub fn confirm(&mut self, ticket: Ticket) -> bool {
        let Some(write) = self.pending.iter_mut().find(|w| w.ticket == ticket && !w.acknowledged) else {
            return false;
        };
        write.acknowledged = true;
        self.fold_acknowledged();
        true
    }

    /// The write failed: drop it so the view falls back
    pub fn rollback(&mut self, ticket: Ticket) -> bool {
        let Some(index) = self.pending.iter().position(|w| w.ticket == ticket && !w.acknowledged) else {
            return false;
        };
        self.pending.remove(index);
        self.fold_acknowledged();
        true
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn fold_acknowledged(&mut self) {
        while self.pending.first().is_some_and(|w| w.acknowledged) {
            let write = self.pending.remove(0);
            apply_to_stages(&mut self.stages, &write.patches);
            apply_to_deals(&mut self.deals, &write.patches);
        }
    }
}

fn sort_stages(stages: &mut [Stage]) {
    stages.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.key.cmp(&b.key)));
}

fn apply_to_stages(stages: &mut [Stage], patches: &[Patch]) {
    let mut touched = false;
    for patch in patches {
        let Some(order) = patch.new_order else { continue };
        if let Some(stage) = stages.iter_mut().find(|s| s.key == patch.id) {
            stage.display_order = order;
            touched = true;
        }
    }
    if touched {
        sort_stages(stages);
    }
}

fn apply_to_deals(deals: &mut [Deal], patches: &[Patch]) {
    for patch in patches {
        let Some(stage) = &patch.new_group_key else { continue };
        if let Some(deal) = deals.iter_mut().find(|d| d.id == patch.id) {
            deal.stage = stage.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(key: &str, order: i32) -> Stage {
        Stage {
            display_order: order,
            ..Stage::new(key.to_string(), key.to_string())
        }
    }

    fn deal(id: &str, stage: &str) -> Deal {
        Deal {
            id: id.to_string(),
            ..Deal::new(id.to_string(), stage.to_string())
        }
    }

    fn sample() -> BoardStore {
        BoardStore::new(
            vec![stage("proposal", 3), stage("lead", 1), stage("contact", 2)],
            vec![deal("deal-1", "lead"), deal("deal-2", "won")],
        )
    }

    fn keys(stages: &[Stage]) -> Vec<&str> {
        stages.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn test_confirmed_stages_sorted() {
        let store = sample();
        assert_eq!(keys(store.confirmed_stages()), vec!["lead", "contact", "proposal"]);
    }

    #[test]
    fn test_empty_patches_get_no_ticket() {
        let mut store = sample();
        assert_eq!(store.apply_optimistic(Vec::new()), None);
        assert!(!store.has_pending());
    }

    #[test]
    fn test_pending_move_shows_before_confirm() {
        let mut store = sample();
        let ticket = store.apply_optimistic(vec![Patch::group("deal-1", "won")]).unwrap();

        assert_eq!(store.view_deals()[0].stage, "won");
        assert_eq!(store.confirmed_deals()[0].stage, "lead");

        assert!(store.confirm(ticket));
        assert!(!store.has_pending());
        assert_eq!(store.confirmed_deals()[0].stage, "won");
        assert!(!store.confirm(ticket));
    }

    #[test]
    fn test_out_of_order_confirms_match_the_view() {
        let mut store = sample();
        let first = store.apply_optimistic(vec![Patch::group("deal-1", "won")]).unwrap();
        let second = store.apply_optimistic(vec![Patch::group("deal-1", "proposal")]).unwrap();
        assert_eq!(store.view_deals()[0].stage, "proposal");

        // Later ticket lands first: held until the earlier one settles
        assert!(store.confirm(second));
        assert_eq!(store.confirmed_deals()[0].stage, "lead");
        assert_eq!(store.view_deals()[0].stage, "proposal");
        assert!(!store.rollback(second));

        assert!(store.confirm(first));
        assert!(!store.has_pending());
        assert_eq!(store.confirmed_deals()[0].stage, "proposal");
        assert_eq!(store.view_deals(), store.confirmed_deals().to_vec());
    }

    #[test]
    fn test_rollback_releases_later_confirms() {
        let mut store = sample();
        let first = store.apply_optimistic(vec![Patch::group("deal-1", "won")]).unwrap();
        let second = store.apply_optimistic(vec![Patch::group("deal-2", "lead")]).unwrap();

        store.confirm(second);
        assert_eq!(store.confirmed_deals()[1].stage, "won");
        store.rollback(first);

        assert!(!store.has_pending());
        assert_eq!(store.confirmed_deals()[0].stage, "lead");
        assert_eq!(store.confirmed_deals()[1].stage, "lead");
    }

    #[test]
    fn test_rollback_restores_view() {
        let mut store = sample();
        let ticket = store
            .apply_optimistic(vec![
                Patch::order("contact", 1),
                Patch::order("lead", 2),
                Patch::order("proposal", 3),
            ])
            .unwrap();
        assert_eq!(keys(&store.view_stages()), vec!["contact", "lead", "proposal"]);

        assert!(store.rollback(ticket));
        assert_eq!(keys(&store.view_stages()), vec!["lead", "contact", "proposal"]);
        assert_eq!(keys(store.confirmed_stages()), vec!["lead", "contact", "proposal"]);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut store = sample();
        store.apply_optimistic(vec![Patch::group("deal-404", "won"), Patch::order("ghost", 1)]);
        assert_eq!(store.view_deals(), store.confirmed_deals().to_vec());
        assert_eq!(store.view_stages(), store.confirmed_stages().to_vec());
    }

    #[test]
    fn test_reload_keeps_pending_on_top() {
        let mut store = sample();
        store.apply_optimistic(vec![Patch::group("deal-1", "proposal")]);
        store.replace_confirmed(vec![stage("lead", 1)], vec![deal("deal-1", "lead"), deal("deal-3", "lead")]);

        let deals = store.view_deals();
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].stage, "proposal");
        assert!(store.has_pending());
    }
}
