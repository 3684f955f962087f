use sysinfo::System;
use tracing::{debug, info};

use crate::consts::WORKING_BYTES_PER_PIXEL;
use crate::error::{RegistrationError, Result};
use crate::frame::FrameSize;

use super::config::ResourceConfig;

/// How much of the host the batch may occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryBudget {
    /// Working bytes for one frame on the canvas.
    pub per_frame: u64,
    /// Bytes the batch may use.
    pub budget: u64,
    /// Frames that may be in flight at once.
    pub max_parallel_frames: usize,
}

/// Memory currently available to new allocations, `None` when the platform
/// does not report it.
pub fn available_memory() -> Option<u64> {
    let mut sys = System::new();
    sys.refresh_memory();
    match sys.available_memory() {
        0 => None,
        bytes => Some(bytes),
    }
}

/// Size the batch against `available` bytes.
///
/// The anchor and one moving frame must fit together inside
/// `fraction * available`; otherwise the batch is refused. Parallelism is
/// capped to the frames the budget can hold, between 1 and `threads`.
pub fn plan_memory(
    canvas: FrameSize,
    available: u64,
    fraction: f64,
    threads: usize,
) -> Result<MemoryBudget> {
    let pixels = (canvas.height as u64).saturating_mul(canvas.width as u64);
    let per_frame = pixels.saturating_mul(WORKING_BYTES_PER_PIXEL);
    let budget = (available as f64 * fraction.clamp(0.0, 1.0)) as u64;

    let required = per_frame.saturating_mul(2);
    if required > budget {
        return Err(RegistrationError::InsufficientMemory {
            required,
            available,
        });
    }

    let fits = (budget / per_frame.max(1)).saturating_sub(1);
    let max_parallel_frames = usize::try_from(fits)
        .unwrap_or(usize::MAX)
        .clamp(1, threads.max(1));

    Ok(MemoryBudget {
        per_frame,
        budget,
        max_parallel_frames,
    })
}

/// Frame parallelism for this batch: the memory cap when checking is on and
/// the platform reports memory, all rayon threads otherwise.
pub(crate) fn frame_parallelism(canvas: FrameSize, config: &ResourceConfig) -> Result<usize> {
    let threads = rayon::current_num_threads();
    if !config.check_memory {
        return Ok(threads);
    }
    let Some(available) = available_memory() else {
        debug!("Available memory unknown, skipping preflight");
        return Ok(threads);
    };

    let plan = plan_memory(canvas, available, config.memory_fraction, threads)?;
    info!(
        per_frame_mib = plan.per_frame >> 20,
        budget_mib = plan.budget >> 20,
        parallel = plan.max_parallel_frames,
        "Memory preflight"
    );
    Ok(plan.max_parallel_frames)
}
