// SPDX-License-Identifier: MIT

//! Millisecond time base.
//!
//! The acquisition loop schedules against a monotonic millisecond counter.
//! On hardware the counter is a [`TickClock`] static incremented from the
//! board's 1 ms tick interrupt; tests substitute a manually advanced clock
//! through the [`Clock`] trait.

use core::cell::Cell;

use critical_section::Mutex;

/// Monotonic millisecond time source.
///
/// Wraps at 2³² ms (~49.7 days); callers compare timestamps with
/// `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Interrupt-incremented millisecond counter.
///
/// ```rust
/// use rovertel::hw::TickClock;
///
/// static CLOCK: TickClock = TickClock::new();
///
/// // in the 1 ms tick handler:
/// CLOCK.tick();
/// ```
pub struct TickClock {
    millis: Mutex<Cell<u32>>,
}

impl TickClock {
    pub const fn new() -> Self {
        Self {
            millis: Mutex::new(Cell::new(0)),
        }
    }

    /// Advance the counter by one millisecond. Interrupt-context safe.
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let cell = self.millis.borrow(cs);
            cell.set(cell.get().wrapping_add(1));
        });
    }

    pub fn now_ms(&self) -> u32 {
        critical_section::with(|cs| self.millis.borrow(cs).get())
    }
}

impl Clock for TickClock {
    #[inline]
    fn now_ms(&self) -> u32 {
        TickClock::now_ms(self)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_accumulate() {
        let clock = TickClock::new();
        assert_eq!(clock.now_ms(), 0);
        for _ in 0..25 {
            clock.tick();
        }
        assert_eq!(clock.now_ms(), 25);
    }

    #[test]
    fn elapsed_survives_wraparound() {
        // Scheduling math is done with wrapping_sub, so an interval that
        // straddles the 2^32 boundary still measures correctly.
        let before = u32::MAX - 3;
        let after = 6u32;
        assert_eq!(after.wrapping_sub(before), 10);
    }
}
