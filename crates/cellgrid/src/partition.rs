use std::ops::Range;

/// Split `[0, total)` into contiguous near-equal ranges, one per worker.
///
/// Produces exactly `min(workers, total)` ranges; sizes differ by at most
/// one, with earlier ranges absorbing the remainder. The same inputs
/// always produce the same partition.
pub fn split_ranges(total: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "worker count must be positive");

    let parts = workers.min(total);
    if parts == 0 {
        return Vec::new();
    }

    let base = total / parts;
    let extra = total % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for p in 0..parts {
        let len = base + usize::from(p < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_coverage(total: usize, workers: usize) {
        let ranges = split_ranges(total, workers);
        assert_eq!(ranges.len(), workers.min(total));

        // Contiguous and covering [0, total) exactly once.
        let mut cursor = 0;
        for r in &ranges {
            assert_eq!(r.start, cursor);
            assert!(r.end > r.start, "no empty ranges");
            cursor = r.end;
        }
        assert_eq!(cursor, total);

        // Sizes differ by at most one.
        if let (Some(min), Some(max)) = (
            ranges.iter().map(|r| r.len()).min(),
            ranges.iter().map(|r| r.len()).max(),
        ) {
            assert!(max - min <= 1, "sizes {min} and {max} differ by more than 1");
        }
    }

    #[test]
    fn covers_exactly_for_many_shapes() {
        for total in [0, 1, 2, 3, 7, 8, 100, 101, 1023] {
            for workers in [1, 2, 3, 4, 7, 16, 2000] {
                check_coverage(total, workers);
            }
        }
    }

    #[test]
    fn remainder_goes_to_earlier_ranges() {
        let ranges = split_ranges(10, 4);
        assert_eq!(ranges, vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn more_workers_than_items_emits_one_range_per_item() {
        let ranges = split_ranges(3, 8);
        assert_eq!(ranges, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        assert_eq!(split_ranges(12345, 7), split_ranges(12345, 7));
    }

    #[test]
    #[should_panic(expected = "worker count must be positive")]
    fn zero_workers_is_a_precondition_violation() {
        split_ranges(10, 0);
    }
}
