//! GameBar kiosk
//!
//! Full-screen terminal carousel of one day's MLB games.

use clap::Parser;
use crossterm::event;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::error::Error;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gamebar::config::LoggingConfig;
use gamebar::tui::{handle_event, process_state, render, restore_terminal, setup_terminal, AppState};
use gamebar::{
    parse_games, CacheSession, Carousel, Config, GameRecord, ImageCut, ImagePipeline,
    ImageTextureLoader, ScheduleParams, StatsClient, TextureLoader,
};

#[derive(Debug, Parser)]
#[command(name = "gamebar", version, about = "Kiosk carousel of MLB game summaries")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "gamebar.toml")]
    config: PathBuf,
    /// Schedule date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    /// Session cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Games shown at once
    #[arg(long)]
    page_size: Option<usize>,
    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(date) = self.date {
            config.api.date = date;
        }
        if let Some(dir) = self.cache_dir {
            config.cache.dir = dir;
        }
        if let Some(page_size) = self.page_size {
            config.display.page_size = page_size;
        }
        if let Some(file) = self.log_file {
            config.logging.file = file;
        }
    }
}

/// Log to a file: the terminal belongs to the kiosk.
fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let file = File::create(&config.file)?;
    let filter = EnvFilter::try_from_env("GAMEBAR_LOG")
        .or_else(|_| EnvFilter::try_new(&config.filter))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .init();
    Ok(())
}

/// Fetch the day's games.  Failure leaves the carousel empty rather than
/// stopping the kiosk.
fn load_games(client: &StatsClient, config: &Config) -> (Vec<GameRecord>, Option<String>) {
    let params = ScheduleParams {
        date: config.api.date.clone(),
        sport_id: config.api.sport_id,
        ..Default::default()
    };
    let cut = ImageCut {
        width: config.api.image_width,
        height: config.api.image_height,
    };
    let games = client.schedule(&params).and_then(|schedule| {
        let records = schedule.games()?;
        Ok(parse_games(records, cut))
    });
    match games {
        Ok(games) => (games, None),
        Err(e) => {
            tracing::error!(error = %e, "could not load the schedule");
            (Vec::new(), Some(format!("Failed to load games: {e}")))
        }
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut AppState,
    frame_delay: Duration,
) -> Result<(), Box<dyn Error>> {
    loop {
        state.carousel.begin_cycle();
        while event::poll(Duration::ZERO)? {
            handle_event(event::read()?, state);
        }
        if state.should_quit {
            return Ok(());
        }

        process_state(state);
        terminal.draw(|f| render(f, state))?;

        thread::sleep(frame_delay);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;
    init_logging(&config.logging)?;
    tracing::info!(date = %config.api.date, "starting");

    let session = CacheSession::open(&config.cache.dir)?;
    let client = StatsClient::new(&config.api.schedule_url)?;
    let loader = ImageTextureLoader::new(1920, 1080);

    // Without a backdrop there is no kiosk.
    let background = client
        .download(&config.api.background_url, &session.background_path())
        .and_then(|()| loader.load(&session.background_path()));
    let background = match background {
        Ok(texture) => texture,
        Err(e) => {
            tracing::error!(error = %e, "could not load the background");
            let _ = session.close();
            return Err(e.into());
        }
    };

    let (games, load_error) = load_games(&client, &config);
    let pipeline = ImagePipeline::new(
        Box::new(client),
        Box::new(ImageTextureLoader::new(
            config.api.image_width,
            config.api.image_height,
        )),
        config.api.default_image_url.clone(),
    );
    let carousel = Carousel::new(
        games,
        session.dir(),
        config.display.page_size,
        config.cache.window_policy(),
        pipeline,
    );
    let mut state = AppState::new(carousel, Some(background), config.api.date.clone());
    if let Some(message) = load_error {
        state.set_error(message);
    }

    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            tracing::error!(error = %e, "could not set up the terminal");
            state.shutdown();
            let _ = session.close();
            return Err(e.into());
        }
    };
    let result = run_loop(
        &mut terminal,
        &mut state,
        Duration::from_millis(config.display.frame_delay_ms),
    );
    let restored = restore_terminal(&mut terminal);
    finish(restored, &mut state, session)?;
    result
}

/// Release the games and the cache directory whether or not the terminal
/// came back cleanly.
fn finish(
    restored: io::Result<()>,
    state: &mut AppState,
    session: CacheSession,
) -> Result<(), Box<dyn Error>> {
    if let Err(e) = &restored {
        tracing::error!(error = %e, "could not restore the terminal");
    }
    state.shutdown();
    if let Err(e) = session.close() {
        tracing::warn!(error = %e, "cache directory not fully removed");
    }
    tracing::info!("stopped");
    restored.map_err(Into::into)
}
