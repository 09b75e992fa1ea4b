// Turns raw player ticks into throttled percentage updates, so playback
// doesn't hammer the controller on every timeupdate.

/// Default emission step in percentage points.
pub const DEFAULT_STEP_PCT: u8 = 5;

#[derive(Debug)]
pub struct WatchSampler {
    step: u8,
    last_emitted: Option<u8>,
}

impl Default for WatchSampler {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_PCT)
    }
}

impl WatchSampler {
    pub fn new(step: u8) -> Self {
        WatchSampler {
            step: step.max(1),
            last_emitted: None,
        }
    }

    /// Convert a position/duration tick into a percentage. Returns `Some`
    /// only when the caller should persist: the first sample, every full
    /// step gained since the last emission, and the terminal 100.
    pub fn sample(&mut self, position_secs: f64, duration_secs: f64) -> Option<u8> {
        if !(duration_secs > 0.0) || !position_secs.is_finite() {
            return None;
        }
        let pct = ((position_secs / duration_secs) * 100.0)
            .floor()
            .clamp(0.0, 100.0) as u8;

        let emit = match self.last_emitted {
            None => true,
            Some(last) => pct >= last.saturating_add(self.step) || (pct == 100 && last < 100),
        };
        if emit {
            self.last_emitted = Some(pct);
            Some(pct)
        } else {
            None
        }
    }
}
