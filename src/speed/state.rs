use serde::{Deserialize, Serialize};

pub const TICK_MILLIS: u64 = 100;
pub const TICKS_PER_MINUTE: u64 = 600;

const TOP_TIER_ABOVE: u32 = 250;
const MID_TIER_ABOVE: u32 = 180;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TrialStatus {
    #[default]
    Setup,
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpeedTier {
    SpeedDemon,
    Bookworm,
    CasualReader,
}

impl SpeedTier {
    /// `> 250` top, `181..=250` mid, anything else base.
    pub fn classify(words_per_minute: u32) -> Self {
        if words_per_minute > TOP_TIER_ABOVE {
            SpeedTier::SpeedDemon
        } else if words_per_minute > MID_TIER_ABOVE {
            SpeedTier::Bookworm
        } else {
            SpeedTier::CasualReader
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedTier::SpeedDemon => "Speed Demon",
            SpeedTier::Bookworm => "Bookworm",
            SpeedTier::CasualReader => "Casual Reader",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SpeedTier::SpeedDemon => "#e74c3c",
            SpeedTier::Bookworm => "#2ecc71",
            SpeedTier::CasualReader => "#3498db",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrialResult {
    pub words_per_minute: u32,
    pub tier: SpeedTier,
    pub elapsed_secs: f64,
}

/// Words per minute for `word_count` words read over `ticks` tenths of a
/// second. Fewer than one tick counts as one.
pub fn compute_speed(word_count: usize, ticks: u64) -> u32 {
    let ticks = ticks.max(1);
    let scaled = word_count as u64 * TICKS_PER_MINUTE;
    // round half up
    let wpm = (scaled * 2 + ticks) / (ticks * 2);
    u32::try_from(wpm).unwrap_or(u32::MAX)
}

pub fn count_words(passage: &str) -> usize {
    passage.split_whitespace().count()
}

pub fn ticks_to_secs(ticks: u64) -> f64 {
    ticks as f64 / 10.0
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReadingTrial {
    pub status: TrialStatus,
    /// Identifies the running trial so a stale ticker cannot touch a newer one.
    pub trial_id: Option<String>,
    pub passage: &'static str,
    /// Fixed when the trial begins.
    pub word_count: usize,
    pub elapsed_ticks: u64,
    pub result: Option<TrialResult>,
}

impl ReadingTrial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, trial_id: String, passage: &'static str) {
        *self = Self {
            status: TrialStatus::Active,
            trial_id: Some(trial_id),
            passage,
            word_count: count_words(passage),
            elapsed_ticks: 0,
            result: None,
        };
    }

    pub fn tick(&mut self) {
        if self.status == TrialStatus::Active {
            self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        ticks_to_secs(self.elapsed_ticks)
    }

    pub fn finish(&mut self) -> Option<TrialResult> {
        if self.status != TrialStatus::Active {
            return None;
        }

        let words_per_minute = compute_speed(self.word_count, self.elapsed_ticks);
        let result = TrialResult {
            words_per_minute,
            tier: SpeedTier::classify(words_per_minute),
            elapsed_secs: self.elapsed_secs(),
        };
        self.status = TrialStatus::Finished;
        self.trial_id = None;
        self.result = Some(result);
        Some(result)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(SpeedTier::classify(180), SpeedTier::CasualReader);
        assert_eq!(SpeedTier::classify(181), SpeedTier::Bookworm);
        assert_eq!(SpeedTier::classify(250), SpeedTier::Bookworm);
        assert_eq!(SpeedTier::classify(251), SpeedTier::SpeedDemon);
        assert_eq!(SpeedTier::classify(0), SpeedTier::CasualReader);
    }

    #[test]
    fn hundred_words_in_thirty_seconds_is_a_bookworm() {
        let wpm = compute_speed(100, 300);
        assert_eq!(wpm, 200);
        assert_eq!(SpeedTier::classify(wpm).label(), "Bookworm");
    }

    #[test]
    fn speed_rounds_to_nearest() {
        // 10 words / 0.7 s = 857.14
        assert_eq!(compute_speed(10, 7), 857);
        // 1 word / 0.4 s = 150
        assert_eq!(compute_speed(1, 4), 150);
        // 1 word / 0.8 s = 75
        assert_eq!(compute_speed(1, 8), 75);
        // 1 word / 1.6 s = 37.5
        assert_eq!(compute_speed(1, 16), 38);
    }

    #[test]
    fn zero_ticks_use_the_floor() {
        assert_eq!(compute_speed(50, 0), compute_speed(50, 1));
        assert_eq!(compute_speed(50, 0), 30_000);
    }

    #[test]
    fn word_count_splits_on_whitespace_runs() {
        assert_eq!(count_words("  one\ttwo \n\n three  "), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn finish_only_from_active() {
        let mut trial = ReadingTrial::new();
        assert!(trial.finish().is_none());

        trial.begin("t1".into(), "a b c");
        for _ in 0..5 {
            trial.tick();
        }
        let result = trial.finish().unwrap();
        assert_eq!(result.words_per_minute, 360);
        assert_eq!(trial.status, TrialStatus::Finished);

        trial.tick();
        assert_eq!(trial.elapsed_ticks, 5);
        assert!(trial.finish().is_none());
    }
}
