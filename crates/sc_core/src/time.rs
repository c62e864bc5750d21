use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;
const SLOW_FRAME_SECS: f64 = 0.25;

/// Wall-clock frame timing. `dt` is the variable delta between two
/// consecutive `tick` calls; it is never clamped.
pub struct FrameClock {
    pub dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    last_instant: Option<Instant>,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: None,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Advance the clock to `now` and return the elapsed seconds since the
    /// previous tick. The first tick returns `0.0`.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        self.dt = match self.last_instant {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f64(),
            None => 0.0,
        };
        self.last_instant = Some(now);
        self.total_time += self.dt;
        self.frame_count += 1;

        if self.dt > SLOW_FRAME_SECS {
            log::warn!("Frame took {:.1}ms", self.dt * 1000.0);
        }

        if self.frame_count > 1 {
            self.fps_samples[self.fps_sample_index] = self.dt;
            self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
            let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
            self.smoothed_frame_time_ms = avg_dt * 1000.0;
            self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        }

        self.dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional frame-rate cap. Disabled unless constructed with a non-zero fps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameLimiter {
    interval: Option<Duration>,
}

impl FrameLimiter {
    pub fn new(fps: Option<u32>) -> Self {
        let interval = fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_nanos(1_000_000_000 / u64::from(fps)));
        Self { interval }
    }

    pub fn disabled() -> Self {
        Self { interval: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    pub fn frame_interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Earliest instant the next frame may start, given when this one started.
    pub fn next_deadline(&self, frame_start: Instant) -> Option<Instant> {
        self.interval.map(|interval| frame_start + interval)
    }
}
