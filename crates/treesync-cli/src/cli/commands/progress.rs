//! Per-phase progress lines on stderr.

use std::sync::Mutex;
use treesync_core::stager::FetchPhase;

/// Prints a line per phase whenever its progress crosses the next 10% step.
#[derive(Default)]
pub(super) struct ProgressPrinter {
    /// Last printed step (0..=10) for sprites and assets.
    last: Mutex<[Option<u8>; 2]>,
}

impl ProgressPrinter {
    pub(super) fn report(&self, phase: FetchPhase, fraction: f64) {
        let step = (fraction.clamp(0.0, 1.0) * 10.0).floor() as u8;
        let slot = match phase {
            FetchPhase::Sprites => 0,
            FetchPhase::Assets => 1,
        };
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if last[slot].map_or(true, |prev| step > prev) {
            last[slot] = Some(step);
            eprintln!("{:>8}: {:>3}%", phase.to_string(), u32::from(step) * 10);
        }
    }
}
