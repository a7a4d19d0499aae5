//! The delay and sound timers, and the clock that paces them.

use std::time::Duration;

/// Rate at which the delay and sound timers count down.
pub const TIMER_HZ: u32 = 60;

/// The two 8-bit countdown timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
    buzzer: bool,
}

impl Timers {

    /// Count both timers one step towards zero.
    /// Latches the buzzer when the sound timer passes through 1.
    pub fn decrement(&mut self) {
        if self.delay > 0 {
            self.delay -= 1;
        }

        if self.sound > 0 {
            if self.sound == 1 {
                self.buzzer = true;
            }
            self.sound -= 1;
        }
    }

    /// Whether the buzzer fired since the last call. Clears the latch.
    pub fn take_buzzer(&mut self) -> bool {
        std::mem::replace(&mut self.buzzer, false)
    }
}

/// Turns elapsed wall-clock time into a number of whole ticks at a fixed rate.
/// Time that does not make up a full tick is carried over to the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    period: Duration,
    leftover: Duration,
}

impl Clock {

    /// A clock ticking `hz` times per second. A rate of zero is treated as one.
    pub fn from_hz(hz: u32) -> Clock {
        Clock {
            period: Duration::from_nanos((1_000_000_000 / u64::from(hz.max(1))).max(1)),
            leftover: Duration::from_secs(0),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time accumulated towards the next tick.
    pub fn leftover(&self) -> Duration {
        self.leftover
    }

    /// Add `elapsed` and return the number of complete ticks it produced.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.leftover += elapsed;
        let ticks = (self.leftover.as_nanos() / self.period.as_nanos()).min(u128::from(u32::MAX)) as u32;
        self.leftover -= self.period * ticks;
        ticks
    }

    /// Forget any partial tick.
    pub fn reset(&mut self) {
        self.leftover = Duration::from_secs(0);
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn timers_stop_at_zero() {
        let mut timers = Timers { delay: 1, sound: 0, buzzer: false };
        timers.decrement();
        timers.decrement();
        assert_eq!(timers.delay, 0);
        assert_eq!(timers.sound, 0);
        assert!(!timers.take_buzzer());
    }

    #[test]
    fn buzzer_fires_once_when_sound_runs_out() {
        let mut timers = Timers { delay: 0, sound: 2, buzzer: false };
        timers.decrement();
        assert!(!timers.take_buzzer());
        timers.decrement();
        assert!(timers.take_buzzer());
        assert!(!timers.take_buzzer());
        timers.decrement();
        assert!(!timers.take_buzzer());
    }

    #[test]
    fn sixty_hz_ticks_once_per_frame() {
        let mut clock = Clock::from_hz(TIMER_HZ);
        assert_eq!(clock.advance(Duration::from_millis(10)), 0);
        assert_eq!(clock.advance(Duration::from_millis(10)), 1);
        assert_eq!(clock.advance(Duration::from_secs(1)), 60);
    }

    #[test]
    fn reset_drops_partial_tick() {
        let mut clock = Clock::from_hz(10);
        clock.advance(Duration::from_millis(90));
        clock.reset();
        assert_eq!(clock.advance(Duration::from_millis(90)), 0);
    }

    #[test]
    fn zero_hz_does_not_divide_by_zero() {
        let mut clock = Clock::from_hz(0);
        assert_eq!(clock.advance(Duration::from_secs(2)), 2);
    }

    proptest! {
        #[test]
        fn no_time_is_lost(hz in 1u32..2000, steps in prop::collection::vec(0u64..50_000_000, 1..50)) {
            let mut clock = Clock::from_hz(hz);
            let mut ticks = 0u128;
            let mut total = 0u128;
            for nanos in steps {
                ticks += u128::from(clock.advance(Duration::from_nanos(nanos)));
                total += u128::from(nanos);
            }
            prop_assert!(clock.leftover() < clock.period());
            prop_assert_eq!(ticks * clock.period().as_nanos() + clock.leftover().as_nanos(), total);
        }
    }
}
