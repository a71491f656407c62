use std::time::{Duration, Instant};

use crate::config::settings::tick_period;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds to advance the simulation by.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Time source driving the main loop.
///
/// `tick` is called once per loop iteration, before input is polled.
pub trait Clock {
    /// Advances the clock.
    ///
    /// With `update_rate > 0` the call may block until one tick period has
    /// elapsed since the previous tick and reports the fixed step
    /// `1 / update_rate`. With `update_rate == 0` it reports measured time.
    fn tick(&mut self, update_rate: f32) -> FrameTime;

    /// Resets the baseline so the next tick measures from "now".
    fn reset(&mut self);
}

/// Wall-clock implementation of [`Clock`].
///
/// Measured delta time is clamped to avoid pathological values when the
/// application is paused by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents simulation explosions after long stalls
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    fn measured(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;
        dt.as_secs_f32()
    }

    fn paced(&mut self, period: Duration) -> f32 {
        let deadline = self.last + period;
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.last = Instant::now();
        period.as_secs_f32()
    }
}

impl Clock for FrameClock {
    fn tick(&mut self, update_rate: f32) -> FrameTime {
        let dt = match tick_period(update_rate) {
            Some(period) => self.paced(period),
            None => self.measured(),
        };

        let ft = FrameTime {
            dt,
            now: self.last,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    fn reset(&mut self) {
        self.last = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_dt_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(2));
        let ft = clock.tick(0.0);
        assert!(ft.dt >= 0.001 && ft.dt <= 0.002);

        std::thread::sleep(Duration::from_millis(10));
        let ft = clock.tick(0.0);
        assert!((ft.dt - 0.002).abs() < 1e-6);
    }

    #[test]
    fn capped_rate_reports_fixed_step_and_paces() {
        let mut clock = FrameClock::new();
        clock.reset();
        let start = Instant::now();

        let a = clock.tick(100.0);
        let b = clock.tick(100.0);

        assert!((a.dt - 0.01).abs() < 1e-6);
        assert!((b.dt - 0.01).abs() < 1e-6);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn tiny_rate_falls_back_to_measured() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(2));
        let ft = clock.tick(1e-30);
        assert!(ft.dt >= 0.001 && ft.dt <= 0.002);
    }

    #[test]
    fn frame_index_increments() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(0.0).frame_index, 0);
        assert_eq!(clock.tick(0.0).frame_index, 1);
    }
}
