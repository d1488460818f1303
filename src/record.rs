use std::{fmt::Display, ops::RangeInclusive};

use rayon::prelude::*;
use tracing::debug;

use crate::{
    rule::{self, StepRule},
    Error,
};

/// A start number whose sequence is longer than that of every smaller start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub number: u64,
    pub steps: u64,
}

impl Record {
    pub fn new(number: u64, steps: u64) -> Self {
        Self { number, steps }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Number: {}, steps: {}", self.number, self.steps)
    }
}

/// Lazy scan over a range of start numbers, yielding each new record.
///
/// Exhausted once the range is, or right after an error is yielded.
#[derive(Debug)]
pub struct RecordHolders<R> {
    starts: RangeInclusive<u64>,
    max_steps: Option<u64>,
    rule: R,
    failed: bool,
}

impl<R: StepRule> RecordHolders<R> {
    fn new(starts: RangeInclusive<u64>, rule: R) -> Self {
        Self {
            starts,
            max_steps: None,
            rule,
            failed: false,
        }
    }
}

impl<R: StepRule> Iterator for RecordHolders<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        for start in self.starts.by_ref() {
            match rule::sequence_length(start, &self.rule) {
                Ok(steps) => {
                    if self.max_steps.map_or(true, |max| steps > max) {
                        self.max_steps = Some(steps);
                        return Some(Ok(Record::new(start, steps)));
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }

        None
    }
}

/// Scan `1..=bound` in order for record holders under `rule`.
pub fn find_record_holders<R: StepRule>(bound: u64, rule: R) -> RecordHolders<R> {
    RecordHolders::new(1..=bound, rule)
}

/// Same records as [`find_record_holders`], with the range split into chunks of
/// `chunk_size` numbers scanned on the rayon thread pool.
pub fn par_find_record_holders<R>(
    bound: u64,
    rule: R,
    chunk_size: u64,
) -> Result<Vec<Record>, Error>
where
    R: StepRule + Clone + Send + Sync,
{
    if chunk_size == 0 {
        return Err(Error::ZeroChunkSize);
    }

    let chunk_n = bound.div_ceil(chunk_size);
    let chunk_records = (0..chunk_n)
        .into_par_iter()
        .map(|chunk_ind| {
            let first = chunk_ind * chunk_size + 1;
            let last = first.saturating_add(chunk_size - 1).min(bound);
            let records = RecordHolders::new(first..=last, rule.clone())
                .collect::<Result<Vec<_>, _>>()?;
            debug!(
                first,
                last,
                local_records = records.len(),
                "Scanned chunk"
            );
            Ok::<_, Error>(records)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    // A global record beats everything before it, so it is also a record of its own chunk.
    let mut max_steps = None;
    let mut records = Vec::new();
    for record in chunk_records.into_iter().flatten() {
        if max_steps.map_or(true, |max| record.steps > max) {
            max_steps = Some(record.steps);
            records.push(record);
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Naive, Optimized};

    fn records<R: StepRule>(bound: u64, rule: R) -> Vec<(u64, u64)> {
        find_record_holders(bound, rule)
            .map(|r| r.map(|r| (r.number, r.steps)))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_records_up_to_10() {
        let target = vec![(1, 0), (2, 1), (3, 7), (6, 8), (7, 16), (9, 19)];
        assert_eq!(records(10, Naive), target);
        assert_eq!(records(10, Optimized), target);
    }

    #[test]
    fn test_records_up_to_1000() {
        let target = vec![
            (1, 0),
            (2, 1),
            (3, 7),
            (6, 8),
            (7, 16),
            (9, 19),
            (18, 20),
            (25, 23),
            (27, 111),
            (54, 112),
            (73, 115),
            (97, 118),
            (129, 121),
            (171, 124),
            (231, 127),
            (313, 130),
            (327, 143),
            (649, 144),
            (703, 170),
            (871, 178),
        ];
        assert_eq!(records(1000, Optimized), target);
    }

    #[test]
    fn test_empty_range() {
        assert!(find_record_holders(0, Naive).next().is_none());
        assert_eq!(par_find_record_holders(0, Naive, 7).unwrap(), Vec::new());
    }

    #[test]
    fn test_first_record() {
        for bound in [1, 2, 5, 100] {
            let first = find_record_holders(bound, Optimized).next();
            assert_eq!(first.unwrap().unwrap(), Record::new(1, 0));
        }
    }

    #[test]
    fn test_records_strictly_increase() {
        let records = records(100_000, Optimized);
        for pair in records.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{:?}", pair);
            assert!(pair[0].1 < pair[1].1, "{:?}", pair);
        }
    }

    #[test]
    fn test_not_restartable() {
        let mut holders = find_record_holders(3, Naive);
        assert_eq!(holders.by_ref().count(), 3);
        assert!(holders.next().is_none());
        assert_eq!(find_record_holders(3, Naive).count(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for (bound, chunk_size) in [
            (1, 1),
            (10, 3),
            (1000, 1),
            (1000, 64),
            (50_000, 999),
            (50_000, 100_000),
        ] {
            let sequential = find_record_holders(bound, Optimized)
                .collect::<Result<Vec<_>, _>>()
                .unwrap();
            let parallel = par_find_record_holders(bound, Optimized, chunk_size).unwrap();
            assert_eq!(parallel, sequential, "bound {}, chunk size {}", bound, chunk_size);
        }
    }

    #[test]
    fn test_zero_chunk_size() {
        assert!(matches!(
            par_find_record_holders(10, Naive, 0),
            Err(Error::ZeroChunkSize)
        ));
    }

    #[test]
    fn test_error_stops_scan() {
        // Tripling the first start overflows.
        let mut holders = RecordHolders::new((u64::MAX - 2)..=u64::MAX, Naive);
        assert!(matches!(
            holders.next(),
            Some(Err(Error::Overflow { start, .. })) if start == u64::MAX - 2
        ));
        assert!(holders.next().is_none());
    }

    #[test]
    fn test_record_display() {
        assert_eq!(Record::new(27, 111).to_string(), "Number: 27, steps: 111");
    }
}
