pub mod expiry_sweep;

pub use expiry_sweep::{ExpirySweep, SweepStats, REMINDER_THRESHOLDS};
