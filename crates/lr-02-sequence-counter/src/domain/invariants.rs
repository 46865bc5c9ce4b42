//! # Domain Invariants

/// Each allocation is exactly one more than the previous value.
pub fn invariant_next_follows(previous: u64, next: u64) -> bool {
    previous.checked_add(1) == Some(next)
}

/// Allocated values never exceed the ceiling.
pub fn invariant_within_ceiling(next: u64, ceiling: u64) -> bool {
    next >= 1 && next <= ceiling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_follows() {
        assert!(invariant_next_follows(0, 1));
        assert!(!invariant_next_follows(1, 3));
        assert!(!invariant_next_follows(u64::MAX, 0));
    }

    #[test]
    fn test_within_ceiling() {
        assert!(invariant_within_ceiling(1, 999_999));
        assert!(invariant_within_ceiling(999_999, 999_999));
        assert!(!invariant_within_ceiling(1_000_000, 999_999));
        assert!(!invariant_within_ceiling(0, 10));
    }
}
