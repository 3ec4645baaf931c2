//! Board DragDrop Utilities
//!
//! Drag-and-drop for pipeline boards, split in two halves:
//! - gesture: turns raw pointer input into a single `DropEvent`
//! - reorder: resolves a drop into the record patches that need persisting
//!
//! Nothing in here performs I/O. Callers persist the returned patches.

use std::collections::HashSet;

mod gesture;
mod patch;
mod reorder;

pub use gesture::{DragGesture, DropEvent, DRAG_THRESHOLD_PX};
pub use patch::Patch;
pub use reorder::{renumber, reorder_patches, resolve_cross_group_move, resolve_linear_reorder};

/// Something that sits in exactly one group (a deal in a stage)
pub trait Grouped {
    fn item_id(&self) -> &str;
    fn group_key(&self) -> &str;
}

/// A group that items can be dropped onto (a stage column)
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Drop target types
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped on a column header or empty column body
    Group(String),
    /// Dropped on another card
    Item(String),
}

impl DropTarget {
    /// Classify a raw destination id against the known group keys.
    ///
    /// Group keys win: an id that names a group is always a `Group` target.
    pub fn classify<G: Keyed>(destination_id: &str, groups: &[G]) -> Self {
        let keys: HashSet<&str> = groups.iter().map(|g| g.key()).collect();
        if keys.contains(destination_id) {
            DropTarget::Group(destination_id.to_string())
        } else {
            DropTarget::Item(destination_id.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Grouped, Keyed};

    #[derive(Debug, Clone)]
    pub struct Card {
        pub id: String,
        pub group: String,
    }

    impl Grouped for Card {
        fn item_id(&self) -> &str {
            &self.id
        }

        fn group_key(&self) -> &str {
            &self.group
        }
    }

    #[derive(Debug, Clone)]
    pub struct Column(pub String);

    impl Keyed for Column {
        fn key(&self) -> &str {
            &self.0
        }
    }

    pub fn card(id: &str, group: &str) -> Card {
        Card {
            id: id.to_string(),
            group: group.to_string(),
        }
    }

    pub fn columns(keys: &[&str]) -> Vec<Column> {
        keys.iter().map(|k| Column(k.to_string())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::columns;
    use super::*;

    #[test]
    fn test_classify_group_key() {
        let groups = columns(&["lead", "won"]);
        assert_eq!(DropTarget::classify("won", &groups), DropTarget::Group("won".to_string()));
    }

    #[test]
    fn test_classify_item_id() {
        let groups = columns(&["lead", "won"]);
        assert_eq!(DropTarget::classify("deal-7", &groups), DropTarget::Item("deal-7".to_string()));
    }
}
