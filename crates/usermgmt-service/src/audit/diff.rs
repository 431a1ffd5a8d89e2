//! Symmetric difference of two state snapshots.

use std::collections::BTreeMap;

/// Remove from both maps every key present in both with equal values.
///
/// Afterwards a key remains only where it was added, removed, or altered.
/// Two empty maps mean nothing changed.
pub fn remove_common_items(before: &mut BTreeMap<String, String>, after: &mut BTreeMap<String, String>) {
    before.retain(|key, value| {
        if after.get(key) == Some(value) {
            after.remove(key);
            false
        } else {
            true
        }
    });
}
