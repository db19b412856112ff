// Set difference of two fingerprint snapshots

use std::collections::HashMap;

use super::Change;
use crate::fingerprint::Fingerprint;

/// Pair up both snapshots by path, one [`Change`] per path in either side
///
/// Duplicate paths within one side resolve last-write-wins. Output order is
/// unspecified. Linear in the two input sizes.
pub fn diff<L, R>(left: L, right: R) -> Vec<Change>
where
    L: IntoIterator<Item = Fingerprint>,
    R: IntoIterator<Item = Fingerprint>,
{
    let left = index_by_path(left);
    let mut right = index_by_path(right);

    let mut changes = Vec::with_capacity(left.len().max(right.len()));

    for (path, left_fp) in left {
        let right_fp = right.remove(&path);
        changes.push(paired(Some(left_fp), right_fp));
    }

    for (_, right_fp) in right {
        changes.push(paired(None, Some(right_fp)));
    }

    changes
}

fn index_by_path<I>(fingerprints: I) -> HashMap<String, Fingerprint>
where
    I: IntoIterator<Item = Fingerprint>,
{
    let mut by_path = HashMap::new();
    for fingerprint in fingerprints {
        by_path.insert(fingerprint.path.clone(), fingerprint);
    }
    by_path
}

fn paired(left: Option<Fingerprint>, right: Option<Fingerprint>) -> Change {
    // Both sides came out of the same path key, so construction cannot fail
    Change::new(left, right).unwrap_or_else(|e| unreachable!("diff built an invalid change: {e}"))
}
