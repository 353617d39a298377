/// Turns host frame timestamps into elapsed seconds for `World::step`.
///
/// A frame never reports more time than the world can consume in one call
/// (`fixed_time_step * max_sub_steps`), so a stalled tab does not try to
/// simulate the whole stall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationClock {
    max_delta_secs: f32,
    last_sample_ms: Option<f64>,
}

impl SimulationClock {
    pub fn new(fixed_time_step: f32, max_sub_steps: u32) -> Self {
        Self {
            max_delta_secs: fixed_time_step * max_sub_steps.max(1) as f32,
            last_sample_ms: None,
        }
    }

    /// Longest interval a single sample may return (seconds).
    pub fn max_delta_secs(&self) -> f32 {
        self.max_delta_secs
    }

    pub fn last_sample_ms(&self) -> Option<f64> {
        self.last_sample_ms
    }

    /// Record a frame timestamp and return the seconds elapsed since the previous one.
    ///
    /// The first sample has nothing to measure against and yields 0. Deltas are
    /// clamped to `[0, max_delta_secs]`. A NaN timestamp yields 0 and is not
    /// recorded.
    pub fn sample(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            log::warn!("ignored non-finite frame timestamp");
            return 0.0;
        }
        let Some(last) = self.last_sample_ms.replace(now_ms) else {
            return 0.0;
        };
        let elapsed = ((now_ms - last) / 1000.0) as f32;
        if elapsed <= 0.0 {
            return 0.0;
        }
        elapsed.min(self.max_delta_secs)
    }
}
