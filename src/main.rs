//! `bookverse` command line: accounts, catalog lookups, the shelf and the
//! reading games, backed by the local store in the data directory.

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast;

use bookverse_lib::{
    auth::{message_for, AuthFlow, IdentityProvider},
    catalog::{cover_url, CoverSize, Genre},
    default_data_dir,
    games::FlagChoice,
    models::{BookRecord, Session},
    notify::{Toast, ToastKind},
    screens::{GameView, GamesScreen, LoginScreen, ScreenContext, ScreenMessage, SignupScreen},
    session::ChannelNavigator,
    shelf::ShelfStore,
    utils::logging::init_logging,
    AppContext,
};

/// BookVerse - discover books, keep a shelf, play reading games
#[derive(Parser)]
#[command(name = "bookverse")]
#[command(version)]
#[command(about = "Discover books, keep a shelf and play reading games", long_about = None)]
struct Cli {
    /// Data directory (defaults to $BOOKVERSE_DATA_DIR or ~/.bookverse)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign in; the session is kept until logout
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Request a password reset
    ResetPassword {
        #[arg(short, long)]
        email: String,
    },

    /// Free-text catalog search
    Search { query: String },

    /// Browse a genre (e.g. fantasy, science_fiction)
    Browse { genre: Genre },

    /// Featured books of a genre
    Featured { genre: Genre },

    /// Manage your shelf
    Shelf {
        #[command(subcommand)]
        action: ShelfAction,
    },

    /// Summarize the first search hit for a query
    Summary { query: String },

    /// Play a reading game
    Play {
        #[arg(value_enum)]
        game: GameKind,
    },
}

#[derive(Subcommand)]
enum ShelfAction {
    /// List saved books
    List,
    /// Save a search hit
    Add {
        query: String,
        /// Which search hit to save (1-based)
        #[arg(long, default_value = "1")]
        pick: usize,
    },
    /// Remove an entry by id
    Remove { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum GameKind {
    Flag,
    Emoji,
    Speed,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let app = AppContext::bootstrap(&data_dir).await?;
    let (navigator, _routes) = ChannelNavigator::new();
    let screens = app.screens(Arc::new(navigator));

    match cli.command {
        Commands::Signup { email, password } => {
            let mut screen = SignupScreen::mount(&screens);
            screen.email = email;
            screen.password = password;
            screen.submit().await;
            print_message(screen.message());
        }
        Commands::Login { email, password } => {
            let mut screen = LoginScreen::mount(&screens);
            screen.email = email;
            screen.password = password;
            screen.submit().await;
            print_message(screen.message());
        }
        Commands::Logout => match app.identity.sign_out().await {
            Ok(()) => println!("Signed out."),
            Err(err) => println!("{}", message_for(AuthFlow::SignIn, &err)),
        },
        Commands::ResetPassword { email } => {
            let mut screen = LoginScreen::mount(&screens);
            screen.email = email;
            screen.forgot_password().await;
            print_message(screen.message());
        }
        Commands::Search { query } => {
            print_books(&screens, &app.catalog.search_by_text(&query).await);
        }
        Commands::Browse { genre } => {
            print_books(&screens, &app.catalog.browse_by_genre(genre).await);
        }
        Commands::Featured { genre } => {
            println!("{}", genre.label());
            print_books(&screens, &app.catalog.featured_by_genre(genre).await);
        }
        Commands::Shelf { action } => shelf(&app, &screens, action).await?,
        Commands::Summary { query } => {
            let hits = app.catalog.search_by_text(&query).await;
            let book = hits
                .first()
                .ok_or_else(|| anyhow!("no books found for {query:?}"))?;
            println!("{}\n", book.title);
            println!("{}", app.summaries.summarize(book).await);
        }
        Commands::Play { game } => play(&screens, game).await?,
    }

    Ok(())
}

fn print_message(message: Option<&ScreenMessage>) {
    match message {
        Some(ScreenMessage::Success(text)) => println!("{text}"),
        Some(ScreenMessage::Error(text)) => eprintln!("{text}"),
        None => {}
    }
}

fn print_books(screens: &ScreenContext, books: &[BookRecord]) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }
    for (index, book) in books.iter().enumerate() {
        let year = book
            .first_publish_year
            .map(|year| format!(" ({year})"))
            .unwrap_or_default();
        println!(
            "{:>2}. {}{} - {}",
            index + 1,
            book.title,
            year,
            book.authors_line().unwrap_or_else(|| "Unknown Author".into())
        );
        if let Some(url) = cover_url(&screens.covers_base_url, book.cover_id, CoverSize::Small) {
            println!("    {url}");
        }
    }
}

fn drain_toasts(toasts: &mut broadcast::Receiver<Toast>) {
    while let Ok(toast) = toasts.try_recv() {
        match toast.kind {
            ToastKind::Success => println!("{}", toast.message),
            ToastKind::Error => eprintln!("{}", toast.message),
        }
    }
}

fn signed_in(app: &AppContext) -> Result<Session> {
    app.identity
        .current()
        .session()
        .cloned()
        .ok_or_else(|| anyhow!("not signed in; run `bookverse login` first"))
}

async fn shelf(app: &AppContext, screens: &ScreenContext, action: ShelfAction) -> Result<()> {
    let session = signed_in(app)?;
    let mut toasts = app.notifier.subscribe();
    let mut store: ShelfStore = screens.shelf();

    match action {
        ShelfAction::List => {
            let entries = store.list(&session).await;
            if entries.is_empty() {
                println!("Your shelf is empty.");
            }
            for entry in entries {
                println!(
                    "{}  {} - {}",
                    entry.id,
                    entry.book.title,
                    entry.book.authors_line().unwrap_or_else(|| "Unknown Author".into())
                );
            }
        }
        ShelfAction::Add { query, pick } => {
            let hits = app.catalog.search_by_text(&query).await;
            let book = pick
                .checked_sub(1)
                .and_then(|index| hits.get(index))
                .ok_or_else(|| anyhow!("no search hit #{pick} for {query:?}"))?;
            store.add(&session, book).await;
        }
        ShelfAction::Remove { id } => {
            store.remove(&session, &id).await;
        }
    }

    drain_toasts(&mut toasts);
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

async fn play(screens: &ScreenContext, game: GameKind) -> Result<()> {
    let mut games = GamesScreen::mount(screens);
    if games.ready().await.is_none() {
        return Err(anyhow!("not signed in; run `bookverse login` first"));
    }
    if let Some(name) = games.greeting_name() {
        println!("Welcome, {name}!\n");
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    match game {
        GameKind::Flag => play_flag(&mut games, &mut lines).await?,
        GameKind::Emoji => play_emoji(&mut games, &mut lines).await?,
        GameKind::Speed => play_speed(&mut games, &mut lines).await?,
    }

    games.teardown().await;
    Ok(())
}

async fn play_flag(games: &mut GamesScreen, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
    games.show(GameView::Flag).await;
    loop {
        let scenario = games.flag().scenario();
        println!("\"{}\"\n  - {}, {}", scenario.quote, scenario.character, scenario.book);

        let Some(input) = prompt(lines, "red or green? (q to quit) ").await? else {
            return Ok(());
        };
        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let choice: FlagChoice = match input.parse() {
            Ok(choice) => choice,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if let Some(feedback) = games.answer_flag(choice) {
            let verdict = if feedback.correct { "Correct!" } else { "Not quite." };
            println!("{verdict} {}\n", feedback.explanation);
        }
        games.next_flag();
    }
}

async fn play_emoji(games: &mut GamesScreen, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
    games.show(GameView::Emoji).await;
    loop {
        println!("{}", games.emoji().puzzle().emojis);
        for (index, option) in games.emoji().options().iter().enumerate() {
            println!("  {}. {option}", index + 1);
        }

        let Some(input) = prompt(lines, "your answer? (q to quit) ").await? else {
            return Ok(());
        };
        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let Some(index) = input.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            println!("pick a number from the list");
            continue;
        };

        match games.answer_emoji(index) {
            Some(true) => println!("Correct!\n"),
            Some(false) => println!(
                "Not quite, it was {}.\n",
                games.emoji().puzzle().answer
            ),
            None => {
                println!("pick a number from the list");
                continue;
            }
        }
        games.next_emoji();
    }
}

async fn play_speed(games: &mut GamesScreen, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
    games.show(GameView::Speed).await;
    loop {
        let Some(input) = prompt(lines, "press Enter to start reading (q to quit) ").await? else {
            return Ok(());
        };
        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let trial = games.start_speed().await?;
        println!("\n{}\n", trial.passage);
        if prompt(lines, "press Enter when done ").await?.is_none() {
            return Ok(());
        }

        let result = games.finish_speed().await?;
        println!(
            "{} words in {:.1}s: {} WPM - {}\n",
            trial.word_count,
            result.elapsed_secs,
            result.words_per_minute,
            result.tier.label()
        );
    }
}
