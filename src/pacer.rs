use std::{thread, time::Duration};

use rand::Rng;

/// Injectable delay provider. The driver never sleeps directly, so tests can
/// substitute [`NoDelay`] and exercise the convergence logic without real
/// time passing.
pub trait Pacer {
    /// Block for a duration drawn uniformly from `min_secs..=max_secs`.
    fn pause(&self, min_secs: f64, max_secs: f64);
}

/// Jittered blocking sleep used for politeness between scrolls.
pub struct RandomPacer;

impl Pacer for RandomPacer {
    fn pause(&self, min_secs: f64, max_secs: f64) {
        let secs = if max_secs > min_secs {
            rand::rng().random_range(min_secs..=max_secs)
        } else {
            min_secs
        };
        if secs > 0.0 {
            thread::sleep(Duration::from_secs_f64(secs));
        }
    }
}

/// Zero-delay pacer for tests.
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&self, _min_secs: f64, _max_secs: f64) {}
}
