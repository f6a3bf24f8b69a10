//! Version comparison between two extracted path sets.

use crate::common::PathSet;

/// Paths present in `new` but not in `old`.
///
/// Paths are compared by exact string value, whichever catalog they came from.
pub fn diff(new: &PathSet, old: &PathSet) -> PathSet {
    new.iter().filter(|p| !old.contains(p)).cloned().collect()
}
