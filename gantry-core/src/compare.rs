//! Scalar and collection comparison helpers
//!
//! Nil-safe equality for optional values plus the three list strategies
//! used by the equality engine: positional, sorted-copy, and keyed multiset.

use std::collections::HashMap;
use std::hash::Hash;

use crate::dto::IntOrString;

/// Both absent is equal, one absent is not, otherwise compare the values.
pub fn optional_eq<T, F>(a: Option<&T>, b: Option<&T>, eq: F) -> bool
where
    T: ?Sized,
    F: FnOnce(&T, &T) -> bool,
{
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => eq(a, b),
        _ => false,
    }
}

/// Position-by-position comparison. Lengths must match.
pub fn ordered_eq<T, F>(a: &[T], b: &[T], mut eq: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(x, y))
}

/// Order-insensitive comparison of two lists of plain values.
pub fn sorted_eq<T: Ord + Clone>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

/// Multiset comparison keyed by identity.
///
/// Elements of `a` are bucketed by key. Each element of `b` must consume a
/// distinct, not yet matched element of `a` with the same key that is also
/// equivalent under `eq`. A duplicate key with no remaining partner is a
/// mismatch, so element counts matter while order does not.
pub fn unordered_eq<T, K, KF, EF>(a: &[T], b: &[T], key: KF, mut eq: EF) -> bool
where
    K: Eq + Hash,
    KF: Fn(&T) -> K,
    EF: FnMut(&T, &T) -> bool,
{
    if a.len() != b.len() {
        return false;
    }

    let mut buckets: HashMap<K, Vec<Option<&T>>> = HashMap::with_capacity(a.len());
    for item in a {
        buckets.entry(key(item)).or_default().push(Some(item));
    }

    for item in b {
        let Some(bucket) = buckets.get_mut(&key(item)) else {
            return false;
        };
        let matched = bucket
            .iter_mut()
            .find(|slot| slot.is_some_and(|candidate| eq(candidate, item)));
        match matched {
            Some(slot) => *slot = None,
            None => return false,
        }
    }

    true
}

/// Collapse server-assigned defaults (`0` or `""`) to absent.
pub fn normalize_int_or_string(value: Option<&IntOrString>) -> Option<IntOrString> {
    match value {
        Some(IntOrString::Int(0)) => None,
        Some(IntOrString::Str(s)) if s.is_empty() => None,
        other => other.cloned(),
    }
}

/// Empty strings become absent.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
