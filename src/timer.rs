/// Result of advancing a [`Countdown`] by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running { remaining: u32 },
    /// Reported exactly once, on the tick that reaches zero.
    Expired,
    /// The countdown already expired on an earlier tick.
    Idle,
}

/// One-second countdown for timed levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            duration: seconds,
            remaining: seconds,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Fraction of time left, for progress bars.
    pub fn fraction_left(&self) -> f64 {
        if self.duration == 0 {
            0.0
        } else {
            f64::from(self.remaining) / f64::from(self.duration)
        }
    }

    pub fn tick(&mut self) -> Tick {
        match self.remaining {
            0 => Tick::Idle,
            1 => {
                self.remaining = 0;
                Tick::Expired
            }
            _ => {
                self.remaining -= 1;
                Tick::Running {
                    remaining: self.remaining,
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }
}
