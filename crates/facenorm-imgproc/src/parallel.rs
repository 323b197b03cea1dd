use rayon::prelude::*;

/// Controls how row based operations are executed.
///
/// Every output pixel is computed independently, so both strategies produce
/// bit-identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,
}

/// Apply `f(row_index, row)` to every row of a row-major buffer.
///
/// PRECONDITION: `cols > 0` and `dst.len()` is a multiple of `cols`.
pub fn for_each_row<T: Send>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    cols: usize,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) {
    match strategy {
        ExecutionStrategy::Serial => dst
            .chunks_exact_mut(cols)
            .enumerate()
            .for_each(|(y, row)| f(y, row)),
        ExecutionStrategy::ParallelRows => dst
            .par_chunks_exact_mut(cols)
            .enumerate()
            .for_each(|(y, row)| f(y, row)),
    }
}

/// Apply `f(row_index, row_a, row_b)` to the matching rows of two buffers.
///
/// PRECONDITION: `cols > 0` and both buffers hold the same number of rows.
pub fn for_each_row_pair<T: Send, U: Send>(
    strategy: ExecutionStrategy,
    dst_a: &mut [T],
    dst_b: &mut [U],
    cols: usize,
    f: impl Fn(usize, &mut [T], &mut [U]) + Send + Sync,
) {
    match strategy {
        ExecutionStrategy::Serial => dst_a
            .chunks_exact_mut(cols)
            .zip(dst_b.chunks_exact_mut(cols))
            .enumerate()
            .for_each(|(y, (a, b))| f(y, a, b)),
        ExecutionStrategy::ParallelRows => dst_a
            .par_chunks_exact_mut(cols)
            .zip(dst_b.par_chunks_exact_mut(cols))
            .enumerate()
            .for_each(|(y, (a, b))| f(y, a, b)),
    }
}
