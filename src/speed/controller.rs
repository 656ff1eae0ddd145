use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time::{self, Instant},
};
use uuid::Uuid;

use crate::games::content::READING_PASSAGES;

use super::state::{ReadingTrial, TrialResult, TrialStatus, TICK_MILLIS};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrialSnapshot {
    pub status: TrialStatus,
    pub passage: &'static str,
    pub word_count: usize,
    pub elapsed_ticks: u64,
    pub elapsed_secs: f64,
    pub result: Option<TrialResult>,
}

impl From<&ReadingTrial> for TrialSnapshot {
    fn from(trial: &ReadingTrial) -> Self {
        Self {
            status: trial.status,
            passage: trial.passage,
            word_count: trial.word_count,
            elapsed_ticks: trial.elapsed_ticks,
            elapsed_secs: trial.elapsed_secs(),
            result: trial.result,
        }
    }
}

/// Drives one speed-reading trial at a time.
///
/// Ticks are published on a watch channel; displays subscribe instead of
/// polling. At most one ticker exists: starting again supersedes it, and
/// finishing, teardown or drop cancel it.
pub struct StopwatchController {
    trial: Arc<Mutex<ReadingTrial>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    updates: Arc<watch::Sender<TrialSnapshot>>,
    rng: Mutex<StdRng>,
    passages: &'static [&'static str],
    tick_interval: Duration,
}

impl StopwatchController {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), &READING_PASSAGES)
    }

    pub fn with_rng(rng: StdRng, passages: &'static [&'static str]) -> Self {
        let trial = ReadingTrial::new();
        let (updates, _) = watch::channel(TrialSnapshot::from(&trial));

        Self {
            trial: Arc::new(Mutex::new(trial)),
            ticker: Mutex::new(None),
            updates: Arc::new(updates),
            rng: Mutex::new(rng),
            passages,
            tick_interval: Duration::from_millis(TICK_MILLIS),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TrialSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> TrialSnapshot {
        TrialSnapshot::from(&*self.trial.lock().await)
    }

    /// Draws a passage and starts ticking. Also used for replay; an active
    /// trial is discarded.
    pub async fn start(&self) -> Result<TrialSnapshot> {
        if self.passages.is_empty() {
            return Err(anyhow!("no reading passages available"));
        }

        let passage = {
            let mut rng = self.rng.lock().await;
            self.passages[rng.gen_range(0..self.passages.len())]
        };
        let trial_id = Uuid::new_v4().to_string();

        self.cancel_ticker().await;

        let snapshot = {
            let mut trial = self.trial.lock().await;
            if trial.status == TrialStatus::Active {
                log_debug!("superseding trial {:?}", trial.trial_id);
            }
            trial.begin(trial_id.clone(), passage);
            TrialSnapshot::from(&*trial)
        };

        self.spawn_ticker(trial_id.clone()).await;
        self.updates.send_replace(snapshot.clone());

        log_info!("reading trial {trial_id} started ({} words)", snapshot.word_count);
        Ok(snapshot)
    }

    pub async fn finish(&self) -> Result<TrialResult> {
        self.cancel_ticker().await;

        let (result, snapshot) = {
            let mut trial = self.trial.lock().await;
            let result = trial.finish().ok_or_else(|| anyhow!("no active reading trial"))?;
            (result, TrialSnapshot::from(&*trial))
        };
        self.updates.send_replace(snapshot);

        log_info!(
            "reading trial finished: {} wpm over {:.1}s ({})",
            result.words_per_minute,
            result.elapsed_secs,
            result.tier.label()
        );
        Ok(result)
    }

    /// Leaving the speed game: stop ticking and go back to setup.
    pub async fn teardown(&self) {
        self.cancel_ticker().await;

        let snapshot = {
            let mut trial = self.trial.lock().await;
            trial.reset();
            TrialSnapshot::from(&*trial)
        };
        self.updates.send_replace(snapshot);
        log_debug!("stopwatch torn down");
    }

    async fn spawn_ticker(&self, trial_id: String) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let trial = self.trial.clone();
        let updates = self.updates.clone();
        let period = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;

                let snapshot = {
                    let mut guard = trial.lock().await;
                    if guard.status != TrialStatus::Active
                        || guard.trial_id.as_deref() != Some(trial_id.as_str())
                    {
                        break;
                    }
                    guard.tick();
                    TrialSnapshot::from(&*guard)
                };

                updates.send_replace(snapshot);
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}

impl Default for StopwatchController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StopwatchController {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speed::state::{count_words, SpeedTier};

    static ONE_PASSAGE: [&str; 1] = ["one two three four five six seven eight nine ten"];

    fn controller() -> StopwatchController {
        StopwatchController::with_rng(StdRng::seed_from_u64(3), &ONE_PASSAGE)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_add_a_tenth_of_a_second_each() {
        let stopwatch = controller();
        let started = stopwatch.start().await.unwrap();
        assert_eq!(started.status, TrialStatus::Active);
        assert_eq!(started.word_count, 10);

        time::sleep(Duration::from_millis(1050)).await;

        let snapshot = stopwatch.snapshot().await;
        assert_eq!(snapshot.elapsed_ticks, 10);
        assert!((snapshot.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_keeps_a_single_ticker() {
        let stopwatch = controller();
        stopwatch.start().await.unwrap();
        time::sleep(Duration::from_millis(550)).await;
        assert_eq!(stopwatch.snapshot().await.elapsed_ticks, 5);

        stopwatch.start().await.unwrap();
        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(stopwatch.snapshot().await.elapsed_ticks, 3);

        time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(stopwatch.snapshot().await.elapsed_ticks, 13);
    }

    #[tokio::test(start_paused = true)]
    async fn finish_stops_ticking_and_classifies() {
        let stopwatch = controller();
        stopwatch.start().await.unwrap();
        time::sleep(Duration::from_millis(3050)).await;

        let result = stopwatch.finish().await.unwrap();
        // 10 words in 3.0 s
        assert_eq!(result.words_per_minute, 200);
        assert_eq!(result.tier, SpeedTier::Bookworm);

        time::sleep(Duration::from_millis(1000)).await;
        let snapshot = stopwatch.snapshot().await;
        assert_eq!(snapshot.status, TrialStatus::Finished);
        assert_eq!(snapshot.elapsed_ticks, 30);
        assert_eq!(snapshot.result, Some(result));

        assert!(stopwatch.finish().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_immediately_is_finite() {
        let stopwatch = controller();
        stopwatch.start().await.unwrap();
        let result = stopwatch.finish().await.unwrap();

        assert_eq!(result.words_per_minute, 6000);
        assert_eq!(result.tier, SpeedTier::SpeedDemon);
        assert_eq!(result.elapsed_secs, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_after_finish_starts_fresh() {
        let stopwatch = controller();
        stopwatch.start().await.unwrap();
        time::sleep(Duration::from_millis(250)).await;
        stopwatch.finish().await.unwrap();

        let replay = stopwatch.start().await.unwrap();
        assert_eq!(replay.status, TrialStatus::Active);
        assert_eq!(replay.elapsed_ticks, 0);
        assert!(replay.result.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_returns_to_setup_and_stops_ticks() {
        let stopwatch = controller();
        let mut updates = stopwatch.subscribe();
        stopwatch.start().await.unwrap();
        time::sleep(Duration::from_millis(150)).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().elapsed_ticks, 1);

        stopwatch.teardown().await;
        time::sleep(Duration::from_millis(500)).await;

        let snapshot = stopwatch.snapshot().await;
        assert_eq!(snapshot.status, TrialStatus::Setup);
        assert_eq!(snapshot.elapsed_ticks, 0);
        assert_eq!(updates.borrow_and_update().status, TrialStatus::Setup);
    }

    #[tokio::test]
    async fn default_pool_passages_have_words() {
        let stopwatch = StopwatchController::new();
        let started = stopwatch.start().await.unwrap();
        assert_eq!(started.word_count, count_words(started.passage));
        assert!(started.word_count > 0);
        stopwatch.teardown().await;
    }
}
