// Animation clock: rotation angles as a pure function of a timestamp.
//
// t = (timestamp mod period) / period
// spin = t * 2*PI            one full turn per period
// tilt = sin(t * PI) * PI    0 -> PI -> 0 over the same period
//
// No accumulated state, so replaying a timestamp reproduces the frame.

use std::f64::consts::PI;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Angles {
    pub spin: f64,
    pub tilt: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnimationClock {
    period_ms: f64,
}

impl AnimationClock {
    /// `period_ms` must be positive; `SphereConfig::validate` checks this.
    pub fn new(period_ms: f64) -> Self {
        Self { period_ms }
    }

    /// Normalized phase in [0, 1).
    pub fn phase(&self, timestamp_ms: f64) -> f64 {
        timestamp_ms.rem_euclid(self.period_ms) / self.period_ms
    }

    pub fn tick(&self, timestamp_ms: f64) -> Angles {
        let t = self.phase(timestamp_ms);
        Angles {
            spin: t * 2.0 * PI,
            tilt: (t * PI).sin() * PI,
        }
    }
}
