use std::sync::Arc;

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::auth::IdentityProvider;
use crate::games::{EmojiGame, FlagChoice, FlagFeedback, FlagGame};
use crate::games::content::READING_PASSAGES;
use crate::models::{Session, ShelfEntry};
use crate::session::{Navigator, Route, SessionGuard};
use crate::shelf::ShelfStore;
use crate::speed::{StopwatchController, TrialResult, TrialSnapshot};

use super::ScreenContext;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GameView {
    Menu,
    Flag,
    Emoji,
    Speed,
}

/// Arcade screen: a menu plus three games, and the shelf pop-up.
///
/// Opening a game gives it a fresh puzzle; leaving the speed game tears its
/// stopwatch down.
pub struct GamesScreen {
    guard: SessionGuard,
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    shelf: ShelfStore,
    view: GameView,
    rng: StdRng,
    flag: FlagGame,
    emoji: EmojiGame,
    stopwatch: StopwatchController,
}

impl GamesScreen {
    pub fn mount(ctx: &ScreenContext) -> Self {
        Self::mount_with_rng(ctx, StdRng::from_entropy())
    }

    pub fn mount_with_rng(ctx: &ScreenContext, mut rng: StdRng) -> Self {
        let flag = FlagGame::new(&mut rng);
        let emoji = EmojiGame::new(&mut rng);
        let stopwatch = StopwatchController::with_rng(
            StdRng::seed_from_u64(rng.gen()),
            &READING_PASSAGES,
        );

        Self {
            guard: SessionGuard::mount(ctx.identity.as_ref(), ctx.navigator.clone()),
            identity: ctx.identity.clone(),
            navigator: ctx.navigator.clone(),
            shelf: ctx.shelf(),
            view: GameView::Menu,
            rng,
            flag,
            emoji,
            stopwatch,
        }
    }

    pub async fn ready(&mut self) -> Option<Session> {
        self.guard.ready().await
    }

    pub fn session(&self) -> Option<Session> {
        self.guard.session()
    }

    pub fn greeting_name(&self) -> Option<String> {
        self.session().map(|session| session.display_name())
    }

    pub fn view(&self) -> GameView {
        self.view
    }

    pub async fn show(&mut self, view: GameView) {
        if self.view == GameView::Speed && view != GameView::Speed {
            self.stopwatch.teardown().await;
        }

        match view {
            GameView::Flag => self.flag.next(&mut self.rng),
            GameView::Emoji => self.emoji.next(&mut self.rng),
            GameView::Speed => self.stopwatch.teardown().await,
            GameView::Menu => {}
        }
        self.view = view;
    }

    pub fn flag(&self) -> &FlagGame {
        &self.flag
    }

    pub fn answer_flag(&mut self, choice: FlagChoice) -> Option<FlagFeedback> {
        self.flag.answer(choice)
    }

    pub fn next_flag(&mut self) {
        self.flag.next(&mut self.rng);
    }

    pub fn emoji(&self) -> &EmojiGame {
        &self.emoji
    }

    pub fn answer_emoji(&mut self, index: usize) -> Option<bool> {
        self.emoji.answer(index)
    }

    pub fn next_emoji(&mut self) {
        self.emoji.next(&mut self.rng);
    }

    pub fn stopwatch(&self) -> &StopwatchController {
        &self.stopwatch
    }

    /// Starts (or replays) a speed-reading trial.
    pub async fn start_speed(&self) -> Result<TrialSnapshot> {
        self.stopwatch.start().await
    }

    pub async fn finish_speed(&self) -> Result<TrialResult> {
        self.stopwatch.finish().await
    }

    pub async fn shelf(&mut self) -> &[ShelfEntry] {
        match self.session() {
            Some(session) => self.shelf.list(&session).await,
            None => self.shelf.entries(),
        }
    }

    pub async fn remove_from_shelf(&mut self, entry_id: &str) -> bool {
        match self.session() {
            Some(session) => self.shelf.remove(&session, entry_id).await,
            None => false,
        }
    }

    pub fn go_to_explore(&self) {
        self.navigator.navigate(Route::Explore);
    }

    /// The session guard performs the redirect once the provider reports the
    /// sign-out.
    pub async fn sign_out(&self) {
        if let Err(err) = self.identity.sign_out().await {
            log_warn!("sign-out failed: {err}");
        }
    }

    pub async fn teardown(self) {
        self.stopwatch.teardown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthState;
    use crate::models::BookRecord;
    use crate::notify::ToastKind;
    use crate::screens::test_support::harness;
    use crate::shelf::store::{REMOVED_MESSAGE, REMOVE_FAILED_MESSAGE};
    use crate::shelf::DocumentStore;
    use crate::speed::TrialStatus;
    use crate::testing::{session_for, FakeTransport};
    use std::time::Duration;

    fn screen(state: AuthState) -> (crate::screens::test_support::Harness, GamesScreen) {
        let h = harness(state, FakeTransport::default());
        let screen = GamesScreen::mount_with_rng(&h.context, StdRng::seed_from_u64(99));
        (h, screen)
    }

    #[tokio::test]
    async fn starts_on_the_menu_and_switches_games() {
        let (_h, mut games) = screen(AuthState::SignedIn(session_for("uid-1")));
        games.ready().await.unwrap();
        assert_eq!(games.view(), GameView::Menu);

        games.show(GameView::Flag).await;
        let answer = games.flag().scenario().flag;
        assert!(games.answer_flag(answer).unwrap().correct);
        assert!(games.flag().is_locked());
        games.next_flag();
        assert!(!games.flag().is_locked());

        games.show(GameView::Emoji).await;
        let correct = games.emoji().correct_index();
        assert_eq!(games.answer_emoji(correct), Some(true));
        games.show(GameView::Emoji).await;
        assert!(!games.emoji().is_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_the_speed_game_stops_the_stopwatch() {
        let (_h, mut games) = screen(AuthState::SignedIn(session_for("uid-1")));
        games.ready().await.unwrap();

        games.show(GameView::Speed).await;
        assert_eq!(games.stopwatch().snapshot().await.status, TrialStatus::Setup);
        games.start_speed().await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;

        games.show(GameView::Menu).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        let snapshot = games.stopwatch().snapshot().await;
        assert_eq!(snapshot.status, TrialStatus::Setup);
        assert_eq!(snapshot.elapsed_ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_trial_produces_a_tier() {
        let (_h, mut games) = screen(AuthState::SignedIn(session_for("uid-1")));
        games.ready().await.unwrap();
        games.show(GameView::Speed).await;

        let started = games.start_speed().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20_050)).await;
        let result = games.finish_speed().await.unwrap();

        let expected = crate::speed::compute_speed(started.word_count, 200);
        assert_eq!(result.words_per_minute, expected);
        assert_eq!(result.tier, crate::speed::SpeedTier::classify(expected));
    }

    #[tokio::test]
    async fn shelf_removal_reports_outcome() {
        let (h, mut games) = screen(AuthState::SignedIn(session_for("uid-1")));
        games.ready().await.unwrap();
        let mut toasts = h.context.notifier.subscribe();

        let kept = h.documents.append("uid-1", &BookRecord::new("Kept")).await.unwrap();
        let gone = h.documents.append("uid-1", &BookRecord::new("Gone")).await.unwrap();
        assert_eq!(games.shelf().await.len(), 2);

        assert!(games.remove_from_shelf(&gone.id).await);
        assert_eq!(toasts.recv().await.unwrap().message, REMOVED_MESSAGE);

        h.documents.fail_writes(true);
        assert!(!games.remove_from_shelf(&kept.id).await);
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, REMOVE_FAILED_MESSAGE);
        assert_eq!(games.shelf().await.len(), 1);
    }

    #[tokio::test]
    async fn sign_out_is_followed_by_a_guard_redirect() {
        let (mut h, mut games) = screen(AuthState::SignedIn(session_for("uid-1")));
        games.ready().await.unwrap();

        games.sign_out().await;
        assert_eq!(h.routes.recv().await, Some(Route::Entry));
        assert!(games.session().is_none());
    }
}
