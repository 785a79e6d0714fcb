use std::ops::Range;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::GridError;

/// How a grid distributes its rebuild work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threading {
    /// All work runs inline on the calling thread.
    Sequential,
    /// Work is spread across a fixed pool of this many worker threads.
    Multithreaded(usize),
}

/// Runs one unit of work per index range, either inline or on a
/// fixed-size thread pool, and joins everything before returning.
pub struct Executor {
    pool: Option<ThreadPool>,
    workers: usize,
}

impl Executor {
    /// Build an executor for the given threading mode.
    ///
    /// A worker count of zero is a programming error. Pool construction
    /// itself can fail (OS thread limits) and is recoverable.
    pub fn new(threading: Threading) -> Result<Self, GridError> {
        match threading {
            Threading::Sequential => Ok(Self {
                pool: None,
                workers: 1,
            }),
            Threading::Multithreaded(n) => {
                assert!(n > 0, "worker count must be positive");
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
                Ok(Self {
                    pool: Some(pool),
                    workers: n,
                })
            }
        }
    }

    /// Number of workers this executor was configured with.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `f` once per range and collect its outputs in range order.
    ///
    /// Ranges may run on any worker in any order; indices inside one range
    /// are handed to `f` as a single ascending unit. Every range runs to
    /// completion even when another has already failed; afterwards the
    /// first error in range order is returned, so the surfaced failure is
    /// deterministic for deterministic inputs.
    pub fn map_ranges<T, E, F>(&self, ranges: &[Range<usize>], f: F) -> Result<Vec<T>, E>
    where
        T: Send,
        E: Send,
        F: Fn(Range<usize>) -> Result<T, E> + Sync,
    {
        let results: Vec<Result<T, E>> = match &self.pool {
            Some(pool) => pool.install(|| ranges.par_iter().map(|r| f(r.clone())).collect()),
            None => ranges.iter().map(|r| f(r.clone())).collect(),
        };

        let mut outputs = Vec::with_capacity(results.len());
        for result in results {
            outputs.push(result?);
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::split_ranges;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn sequential_and_parallel_agree() {
        let ranges = split_ranges(1000, 4);

        let sums = |executor: &Executor| -> Vec<usize> {
            executor
                .map_ranges::<usize, (), _>(&ranges, |r| Ok(r.sum()))
                .unwrap()
        };

        let sequential = Executor::new(Threading::Sequential).unwrap();
        let parallel = Executor::new(Threading::Multithreaded(4)).unwrap();
        assert_eq!(sums(&sequential), sums(&parallel));
        assert_eq!(sums(&sequential).iter().sum::<usize>(), 999 * 1000 / 2);
    }

    #[test]
    fn all_ranges_run_even_when_one_fails() {
        let executor = Executor::new(Threading::Multithreaded(4)).unwrap();
        let ranges = split_ranges(100, 4);
        let visited = AtomicUsize::new(0);

        let result = executor.map_ranges::<(), usize, _>(&ranges, |r| {
            visited.fetch_add(r.len(), Ordering::SeqCst);
            if r.contains(&60) {
                Err(r.start)
            } else {
                Ok(())
            }
        });

        assert_eq!(visited.load(Ordering::SeqCst), 100);
        assert_eq!(result.unwrap_err(), 50);
    }

    #[test]
    fn first_error_in_range_order_wins() {
        let executor = Executor::new(Threading::Multithreaded(4)).unwrap();
        let ranges = split_ranges(40, 4);

        // Every range fails; the reported error must always be range 0's.
        for _ in 0..10 {
            let result = executor.map_ranges::<(), usize, _>(&ranges, |r| Err(r.start));
            assert_eq!(result.unwrap_err(), 0);
        }
    }

    #[test]
    fn empty_range_set_is_a_no_op() {
        let executor = Executor::new(Threading::Sequential).unwrap();
        let outputs = executor
            .map_ranges::<usize, (), _>(&[], |_| unreachable!("no ranges to run"))
            .unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    #[should_panic(expected = "worker count must be positive")]
    fn zero_workers_is_a_precondition_violation() {
        let _ = Executor::new(Threading::Multithreaded(0));
    }
}
