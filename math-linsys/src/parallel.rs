//! Ordered fan-out/fan-in of independent tasks
//!
//! Runs `f(0) .. f(count - 1)` either on the calling thread or through rayon,
//! and always returns the results in index order. Tasks only receive their
//! index; anything they read must be shared immutably by the closure, so no
//! task can observe another task's output.
//!
//! Without the `rayon` feature, [`ExecutionMode::Parallel`] falls back to
//! sequential execution.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How the substitution tasks of a solve are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One task after the other on the caller's thread
    #[default]
    Sequential,
    /// Tasks fanned out over a rayon thread pool
    Parallel,
}

/// Check if parallel processing is available
#[cfg(feature = "rayon")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "rayon"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Evaluate `count` indexed tasks and join them in index order.
///
/// `threads == 0` uses rayon's global pool; any other value runs the tasks in
/// a dedicated pool of that many workers. The first error aborts the run and
/// is returned; partial results are discarded.
pub fn run_indexed<U, F>(count: usize, mode: ExecutionMode, threads: usize, f: F) -> Result<Vec<U>>
where
    U: Send,
    F: Fn(usize) -> Result<U> + Sync + Send,
{
    match mode {
        ExecutionMode::Sequential => (0..count).map(f).collect(),
        ExecutionMode::Parallel => parallel_map_indexed(count, threads, f),
    }
}

#[cfg(feature = "rayon")]
fn parallel_map_indexed<U, F>(count: usize, threads: usize, f: F) -> Result<Vec<U>>
where
    U: Send,
    F: Fn(usize) -> Result<U> + Sync + Send,
{
    use rayon::prelude::*;

    let run = || (0..count).into_par_iter().map(&f).collect::<Result<Vec<U>>>();
    if threads == 0 {
        return run();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            log::warn!("could not build a {threads}-thread pool ({e}), using the global pool");
            run()
        }
    }
}

#[cfg(not(feature = "rayon"))]
fn parallel_map_indexed<U, F>(count: usize, _threads: usize, f: F) -> Result<Vec<U>>
where
    F: Fn(usize) -> Result<U>,
{
    (0..count).map(f).collect()
}
