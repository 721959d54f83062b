//! Error types for the benchmark driver.

use thiserror::Error;

/// Errors that can occur when starting a benchmark run.
#[derive(Error, Debug)]
pub enum BenchError {
    /// At least one worker is needed to trace rays.
    #[error("benchmark needs at least one worker")]
    NoWorkers,

    /// rays × triangles × workers does not fit the test counter.
    #[error("workload of {rays} rays, {triangles} triangles and {workers} workers overflows the test count")]
    WorkloadTooLarge {
        rays: usize,
        triangles: usize,
        workers: usize,
    },

    /// The rayon pool for the workers could not be built.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for benchmark runs.
pub type Result<T> = std::result::Result<T, BenchError>;
