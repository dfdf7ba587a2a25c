use std::fmt;
use std::ops::Range;
use std::time::Instant;
use parking_lot::RwLock;
use tracing::{debug, info};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::parallel::merge::{merge_adjacent, merge_sort};

/// Wall-clock time one worker spent sorting its chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTiming {
    pub worker_id: usize,
    pub start: usize,
    pub end: usize,             // Exclusive
    pub elapsed_micros: u64,    // 0 only for empty chunks, otherwise at least 1
}

impl ChunkTiming {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for ChunkTiming {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Thread {} took ", self.worker_id)?;
        let micros = self.elapsed_micros;
        if micros == 0 {
            write!(f, "0 microseconds (Empty Chunk)")
        } else if micros < 1_000 {
            write!(f, "{} microseconds", micros)
        } else if micros < 1_000_000 {
            write!(f, "{}.{:03} ms", micros / 1_000, micros % 1_000)
        } else {
            write!(f, "{}.{:03} s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
        }
    }
}

/// Outcome of one [`ParallelSorter::sort`] call.
#[derive(Debug, Clone, Default)]
pub struct SortReport {
    pub timings: Vec<ChunkTiming>,
    pub merges: usize,                 // Merge steps with two non-empty sides
    pub merge_elapsed_micros: u64,
}

impl SortReport {
    pub fn empty_chunks(&self) -> usize {
        self.timings.iter().filter(|t| t.is_empty()).count()
    }
}

/// Chunked merge sort over a fixed number of worker threads.
///
/// Each call splits the slice into `workers` contiguous chunks (`len / workers`
/// elements each, the last chunk taking the remainder), sorts every chunk on its
/// own scoped thread, joins them all, then folds chunk `i` into the sorted
/// prefix one chunk at a time on the calling thread. Workers only touch their
/// own chunk, so the result does not depend on scheduling.
pub struct ParallelSorter {
    workers: usize,
    last_report: RwLock<SortReport>,
}

impl ParallelSorter {
    pub fn new(workers: usize) -> Self {
        ParallelSorter {
            workers: workers.max(1),
            last_report: RwLock::new(SortReport::default()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sort_workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Sorts `view` with `less`, a strict "a precedes b" relation.
    pub fn sort<T, F>(&self, view: &mut [T], less: F) -> Result<SortReport>
    where
        T: Copy + Send,
        F: Fn(&T, &T) -> bool + Sync,
    {
        let len = view.len();
        let bounds = chunk_bounds(len, self.workers);

        // Split into disjoint mutable chunks, one per worker
        let mut chunks = Vec::with_capacity(bounds.len());
        let mut rest: &mut [T] = &mut *view;
        for range in &bounds {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            chunks.push(head);
            rest = tail;
        }

        let less = &less;
        let joined = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .zip(bounds.iter().cloned())
                .enumerate()
                .map(|(worker_id, (chunk, range))| {
                    scope.spawn(move |_| sort_chunk(worker_id, range, chunk, less))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<std::thread::Result<Vec<ChunkTiming>>>()
        });

        let timings = match joined {
            Ok(Ok(timings)) => timings,
            _ => return Err(Error::new(ErrorKind::Internal, "sort worker panicked")),
        };

        let merge_started = Instant::now();
        let mut merges = 0;
        for range in bounds.iter().skip(1) {
            if range.start == 0 || range.is_empty() {
                continue;
            }
            merge_adjacent(&mut view[..range.end], range.start, less);
            merges += 1;
            debug!(prefix = range.start, chunk = range.len(), "merged chunk into prefix");
        }
        let merge_elapsed_micros = merge_started.elapsed().as_micros() as u64;

        let report = SortReport { timings, merges, merge_elapsed_micros };
        info!(
            len,
            workers = self.workers,
            merges,
            empty_chunks = report.empty_chunks(),
            merge_micros = merge_elapsed_micros,
            "parallel sort finished"
        );
        *self.last_report.write() = report.clone();
        Ok(report)
    }

    /// Per-worker timings from the most recent sort; empty before the first one.
    pub fn thread_times(&self) -> Vec<ChunkTiming> {
        self.last_report.read().timings.clone()
    }

    pub fn last_report(&self) -> SortReport {
        self.last_report.read().clone()
    }
}

/// Contiguous chunk ranges covering `0..len`: `len / workers` each, last takes the rest.
pub fn chunk_bounds(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = len / workers;
    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i == workers - 1 { len } else { (i + 1) * chunk };
            start..end
        })
        .collect()
}

fn sort_chunk<T, F>(worker_id: usize, range: Range<usize>, chunk: &mut [T], less: &F) -> ChunkTiming
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    let elapsed_micros = if chunk.is_empty() {
        0
    } else {
        let started = Instant::now();
        merge_sort(chunk, less);
        (started.elapsed().as_micros() as u64).max(1)
    };
    debug!(worker_id, start = range.start, end = range.end, elapsed_micros, "chunk sorted");

    ChunkTiming {
        worker_id,
        start: range.start,
        end: range.end,
        elapsed_micros,
    }
}
