use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use ndarray::{ArrayViewMut, Axis, Dimension};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;

use crate::error::{MacrostackError, Result};

use super::WorkBand;

/// Run one band-parallel phase over `output`.
///
/// `output` is carved along its first axis into one disjoint mutable view
/// per band, so each task is the only writer of its rows. The call returns
/// only after every band task has finished. If any task fails or panics the
/// whole phase fails with the error of the lowest failing band.
pub fn run_bands<A, D, F>(
    pool: &ThreadPool,
    output: ArrayViewMut<'_, A, D>,
    bands: &[WorkBand],
    task: F,
) -> Result<()>
where
    A: Send,
    D: Dimension,
    F: Fn(WorkBand, ArrayViewMut<'_, A, D>) -> Result<()> + Send + Sync,
{
    debug_assert_eq!(
        bands.last().map_or(0, |b| b.end),
        output.len_of(Axis(0)),
        "bands must cover the output rows"
    );

    let mut slots = Vec::with_capacity(bands.len());
    let mut rest = output;
    for &band in bands {
        let (head, tail) = rest.split_at(Axis(0), band.len());
        slots.push((band, head));
        rest = tail;
    }

    let outcomes: Vec<Result<()>> = pool.install(|| {
        slots
            .into_par_iter()
            .map(|(band, view)| guarded(band, || task(band, view)))
            .collect()
    });

    // Every band of the phase has completed at this point.
    debug!(bands = outcomes.len(), "Band phase joined");
    outcomes.into_iter().collect()
}

fn guarded<F>(band: WorkBand, f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e @ MacrostackError::WorkerFailure { .. })) => Err(e),
        Ok(Err(e)) => Err(MacrostackError::WorkerFailure {
            band,
            cause: e.to_string(),
        }),
        Err(payload) => Err(MacrostackError::WorkerFailure {
            band,
            cause: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
