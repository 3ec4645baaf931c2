//! Reorder Resolution
//!
//! Pure functions that turn a finished drop into record patches:
//! - cross-group moves reassign a dragged item to another group
//! - linear reorders move one element and renumber the whole list 1..N

use crate::{DropTarget, Grouped, Keyed, Patch};

/// Resolve a drop of `dragged_id` onto `destination_id`.
///
/// Dropping on a group key moves the item into that group. Dropping on
/// another item joins that item's group; the position inside the group is
/// not persisted. Returns at most one patch, and none when the group would
/// not change or an id cannot be found.
pub fn resolve_cross_group_move<I: Grouped, G: Keyed>(
    dragged_id: &str,
    destination_id: Option<&str>,
    items: &[I],
    groups: &[G],
) -> Vec<Patch> {
    // Released outside any drop target
    let Some(destination_id) = destination_id else {
        return Vec::new();
    };

    let Some(dragged) = items.iter().find(|i| i.item_id() == dragged_id) else {
        log::debug!("drop ignored: dragged item {} not found", dragged_id);
        return Vec::new();
    };

    let new_group = match DropTarget::classify(destination_id, groups) {
        DropTarget::Group(key) => key,
        DropTarget::Item(target_id) => {
            match items.iter().find(|i| i.item_id() == target_id) {
                Some(target) => target.group_key().to_string(),
                None => {
                    log::debug!("drop ignored: target {} is neither a group nor an item", target_id);
                    return Vec::new();
                }
            }
        }
    };

    if new_group == dragged.group_key() {
        return Vec::new();
    }

    vec![Patch::group(dragged_id, new_group)]
}

/// Move the element at `source_index` to `destination_index`.
///
/// Elements between the two indices shift by one. The input slice is left
/// untouched. An out-of-range source returns the list as-is; a destination
/// past the end lands on the last slot.
pub fn resolve_linear_reorder<T: Clone>(
    ordered_ids: &[T],
    source_index: usize,
    destination_index: usize,
) -> Vec<T> {
    let mut reordered = ordered_ids.to_vec();
    if source_index == destination_index || source_index >= reordered.len() {
        return reordered;
    }

    let destination_index = destination_index.min(reordered.len() - 1);
    let moved = reordered.remove(source_index);
    reordered.insert(destination_index, moved);
    reordered
}

/// Dense order patches (`index + 1`) for every id, changed or not.
pub fn renumber<S: AsRef<str>>(ordered_ids: &[S]) -> Vec<Patch> {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(index, id)| Patch::order(id.as_ref(), index as i32 + 1))
        .collect()
}

/// Linear reorder followed by renumbering.
///
/// Empty when the move leaves the order as it was, so the caller has
/// nothing to persist.
pub fn reorder_patches<S: AsRef<str> + Clone>(
    ordered_ids: &[S],
    source_index: usize,
    destination_index: usize,
) -> Vec<Patch> {
    let reordered = resolve_linear_reorder(ordered_ids, source_index, destination_index);
    let unchanged = reordered
        .iter()
        .zip(ordered_ids)
        .all(|(after, before)| after.as_ref() == before.as_ref());
    if unchanged {
        return Vec::new();
    }
    renumber(&reordered)
}
