/// Detects the end of a track from polled position and duration.
///
/// Fires at most once per loaded track; call [`CompletionWatch::reset`]
/// whenever a new track starts.
#[derive(Debug, Default)]
pub struct CompletionWatch {
    fired: bool,
}

impl CompletionWatch {
    pub fn reset(&mut self) {
        self.fired = false;
    }

    /// Feed one poll. Returns `true` the first time `position` reaches a
    /// known (non-zero) `duration`.
    pub fn observe(&mut self, position: f64, duration: f64) -> bool {
        if self.fired || !(duration > 0.0) || position < duration {
            return false;
        }
        self.fired = true;
        true
    }
}
