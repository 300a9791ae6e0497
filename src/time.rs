//! Fixed-timestep game clock using an accumulator pattern.
//!
//! The host calls back at ~60fps with variable delta. GameTime converts
//! this into a whole number of fixed ticks, so engine time moves in
//! deterministic steps regardless of frame jitter.

pub struct GameTime {
    /// Milliseconds per tick (e.g. 50ms = 20 ticks/sec)
    ms_per_tick: f64,
    /// Longest gap between two frames that still counts in full
    max_frame_delta_ms: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// `ticks_per_sec`: how many engine ticks per real-time second (e.g. 20).
    pub fn new(ticks_per_sec: u32, max_frame_delta_ms: f64) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            max_frame_delta_ms: max_frame_delta_ms.max(0.0),
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    pub fn ms_per_tick(&self) -> f64 {
        self.ms_per_tick
    }

    /// Feed wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the number of discrete ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if tab was backgrounded
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_frame_delta_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Forget the last timestamp, e.g. after the host was suspended.
    pub fn resync(&mut self) {
        self.last_timestamp = None;
        self.accumulator = 0.0;
    }
}
