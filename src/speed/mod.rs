pub mod controller;
pub mod state;

pub use controller::{StopwatchController, TrialSnapshot};
pub use state::{compute_speed, ReadingTrial, SpeedTier, TrialResult, TrialStatus};
