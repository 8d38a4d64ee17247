// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

use std::time::{Duration, Instant};

/// Sub-microsecond busy-wait used by the clocked pull latch.
///
/// The latch settle window is far shorter than a scheduler tick, so the
/// production implementation spins; tests substitute a recording fake and
/// assert ordering instead of waiting.
pub trait Delay {
    fn busy_sleep(&self, nanos: u64);
}

/// A true spin against a monotonic deadline.
#[derive(Debug, Default)]
pub struct SpinDelay;

impl Delay for SpinDelay {
    fn busy_sleep(&self, nanos: u64) {
        let deadline = Instant::now() + Duration::from_nanos(nanos);
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}
