//! Deduplicated parser warnings.
//!
//! Recoveries that a caller may want to know about (iteration caps being hit,
//! markup the tree builder had to drop) are reported here once per unique
//! message. Output goes through [`log::warn!`] so the embedding application
//! decides where it ends up.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recovery, once per unique `(component, message)` pair.
///
/// Returns `true` if this call actually emitted the warning.
///
/// # Example
/// ```
/// use marrow_common::warning::warn_once;
///
/// assert!(warn_once("doc-example", "adoption agency hit its outer loop cap"));
/// assert!(!warn_once("doc-example", "adoption agency hit its outer loop cap"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        log::warn!(target: "marrow", "[{component}] {message}");
    }
    should_print
}

/// Forget every recorded warning (call between independent documents).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_components_are_tracked_separately() {
        assert!(warn_once("unit-a", "same message"));
        assert!(warn_once("unit-b", "same message"));
        assert!(!warn_once("unit-a", "same message"));
    }
}
