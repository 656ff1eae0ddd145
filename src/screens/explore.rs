use std::sync::Arc;

use serde::Serialize;

use crate::auth::IdentityProvider;
use crate::catalog::{cover_url, CatalogAdapter, CoverSize, Genre};
use crate::models::{BookRecord, Session, ShelfEntry};
use crate::notify::Notifier;
use crate::session::{Navigator, Route, SessionGuard};
use crate::shelf::store::ADD_FAILED_MESSAGE;
use crate::shelf::ShelfStore;
use crate::summary::SummaryService;

use super::ScreenContext;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Book opened from a result list or genre row.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    pub book: BookRecord,
    /// `None` hides the image.
    pub cover_url: Option<String>,
    pub summary: Option<String>,
}

/// Discovery screen: search, genre rows, book detail and the shelf.
///
/// Everything except sign-out is inert until the session guard opens.
pub struct ExploreScreen {
    guard: SessionGuard,
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    catalog: CatalogAdapter,
    summaries: SummaryService,
    shelf: ShelfStore,
    notifier: Notifier,
    covers_base_url: String,
    results: Vec<BookRecord>,
    featured: Vec<(Genre, Vec<BookRecord>)>,
    detail: Option<BookDetail>,
}

impl ExploreScreen {
    pub fn mount(ctx: &ScreenContext) -> Self {
        Self {
            guard: SessionGuard::mount(ctx.identity.as_ref(), ctx.navigator.clone()),
            identity: ctx.identity.clone(),
            navigator: ctx.navigator.clone(),
            catalog: ctx.catalog.clone(),
            summaries: ctx.summaries.clone(),
            shelf: ctx.shelf(),
            notifier: ctx.notifier.clone(),
            covers_base_url: ctx.covers_base_url.clone(),
            results: Vec::new(),
            featured: Vec::new(),
            detail: None,
        }
    }

    /// Waits for the first session event; `None` means the visitor was sent away.
    pub async fn ready(&mut self) -> Option<Session> {
        self.guard.ready().await
    }

    pub fn session(&self) -> Option<Session> {
        self.guard.session()
    }

    pub fn greeting_name(&self) -> Option<String> {
        self.session().map(|session| session.display_name())
    }

    pub fn results(&self) -> &[BookRecord] {
        &self.results
    }

    pub fn featured(&self) -> &[(Genre, Vec<BookRecord>)] {
        &self.featured
    }

    pub fn detail(&self) -> Option<&BookDetail> {
        self.detail.as_ref()
    }

    /// A non-blank query wins over the genre. With neither, the results are
    /// cleared without a request.
    pub async fn search(&mut self, query: &str, genre: Option<Genre>) -> &[BookRecord] {
        if self.session().is_none() {
            return &self.results;
        }

        self.results = if !query.trim().is_empty() {
            self.catalog.search_by_text(query).await
        } else if let Some(genre) = genre {
            self.catalog.browse_by_genre(genre).await
        } else {
            Vec::new()
        };
        &self.results
    }

    /// Fills one row per genre; genres with nothing presentable are left out.
    pub async fn load_featured(&mut self) -> &[(Genre, Vec<BookRecord>)] {
        if self.session().is_none() {
            return &self.featured;
        }

        let mut rows = Vec::with_capacity(Genre::ALL.len());
        for genre in Genre::ALL {
            let books = self.catalog.featured_by_genre(genre).await;
            if !books.is_empty() {
                rows.push((genre, books));
            }
        }
        self.featured = rows;
        &self.featured
    }

    pub fn open_book(&mut self, book: BookRecord) -> &BookDetail {
        let cover_url = cover_url(&self.covers_base_url, book.cover_id, CoverSize::Medium);
        self.detail.insert(BookDetail {
            book,
            cover_url,
            summary: None,
        })
    }

    pub fn close_book(&mut self) {
        self.detail = None;
    }

    pub async fn generate_summary(&mut self) -> Option<&str> {
        let detail = self.detail.as_mut()?;
        let summary = self.summaries.summarize(&detail.book).await;
        detail.summary = Some(summary);
        detail.summary.as_deref()
    }

    pub async fn add_to_shelf(&mut self, book: &BookRecord) -> Option<ShelfEntry> {
        let Some(session) = self.session() else {
            log_warn!("add to shelf without a session");
            self.notifier.error(ADD_FAILED_MESSAGE);
            return None;
        };
        self.shelf.add(&session, book).await
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

    pub fn go_to_games(&self) {
        self.navigator.navigate(Route::Games);
    }

    /// The session guard performs the redirect once the provider reports the
    /// sign-out.
    pub async fn sign_out(&mut self) {
        if let Err(err) = self.identity.sign_out().await {
            log_warn!("sign-out failed: {err}");
        }
    }
}
