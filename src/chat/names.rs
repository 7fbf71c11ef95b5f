//! Unique participant name allocation.

/// Name given to participants that connect without one.
pub const ANONYMOUS_NAME: &str = "anon";

/// Normalize a requested name into an allocation base.
///
/// Surrounding whitespace is trimmed; an empty result becomes [`ANONYMOUS_NAME`].
pub fn normalize_base(requested: &str) -> &str {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        ANONYMOUS_NAME
    } else {
        trimmed
    }
}

/// Pick a name derived from `requested` that `is_taken` does not reject.
///
/// Returns the normalized base when it is free, otherwise the first free
/// `base-1`, `base-2`, ... in increasing order. Allocation never fails and does
/// not reserve anything: the caller must insert the name while still holding
/// whatever lock `is_taken` reads from.
///
/// # Example
/// ```
/// use trashgang::chat::allocate;
/// let taken = ["bob", "bob-1"];
/// assert_eq!(allocate("bob", |n| taken.contains(&n)), "bob-2");
/// ```
pub fn allocate<F>(requested: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = normalize_base(requested);
    if !is_taken(base) {
        return base.to_string();
    }

    (1u64..)
        .map(|suffix| format!("{}-{}", base, suffix))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| format!("{}-{}", base, u64::MAX))
}
