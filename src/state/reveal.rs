/// Fade and slide-in state for a tile
///
/// Tiles start transparent and shifted down, then ease into place once
/// they are revealed.

use std::time::{Duration, Instant};

/// Length of the reveal transition
pub const REVEAL_DURATION: Duration = Duration::from_millis(600);

/// Starting vertical offset of an unrevealed tile, in logical pixels
pub const REVEAL_OFFSET: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Reveal {
    #[default]
    Hidden,
    Animating { started: Instant },
    Shown,
}

impl Reveal {
    /// Start the transition; already revealed tiles are left alone
    pub fn start(&mut self, now: Instant) {
        if *self == Reveal::Hidden {
            *self = Reveal::Animating { started: now };
        }
    }

    /// Advance the transition, returns true while still animating
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Reveal::Animating { started } = *self {
            if now.saturating_duration_since(started) >= REVEAL_DURATION {
                *self = Reveal::Shown;
                return false;
            }
            return true;
        }
        false
    }

    /// Eased progress in [0, 1]
    pub fn progress(&self, now: Instant) -> f32 {
        match *self {
            Reveal::Hidden => 0.0,
            Reveal::Shown => 1.0,
            Reveal::Animating { started } => {
                let t = now.saturating_duration_since(started).as_secs_f32()
                    / REVEAL_DURATION.as_secs_f32();
                ease_out(t.clamp(0.0, 1.0))
            }
        }
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        self.progress(now)
    }

    /// Remaining downward shift
    pub fn offset(&self, now: Instant) -> f32 {
        REVEAL_OFFSET * (1.0 - self.progress(now))
    }

    #[cfg(test)]
    pub fn has_started(&self) -> bool {
        *self != Reveal::Hidden
    }
}

/// Cubic ease-out
fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
