//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: f64, max: f64) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_unit(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing: every damage roll returns `roll`, every unit
/// draw returns `unit`.
#[cfg(test)]
pub struct FixedRandom {
    pub roll: f64,
    pub unit: f64,
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: f64, max: f64) -> f64 {
        self.roll.clamp(min, max)
    }

    fn gen_unit(&self) -> f64 {
        self.unit
    }
}
