mod app;
mod cli;
mod commands;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod ui;

use app::{App, Screen};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::PlantApiClient;
use db::Database;
use error::Result;
use logic::{CameraCapture, RecognitionService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{DetailScreen, EncyclopediaScreen, IdentifyScreen, TodayScreen};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let tui_mode = cli.command.is_none();
    init_logging(cli.verbose, tui_mode, cli.data_dir.as_ref());

    let config = match cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive()?;
            return Ok(());
        }
        _ => Config::load_or_default(cli.config.clone())?,
    };

    let db_path = config.db_path(cli.db.as_ref(), cli.data_dir.as_ref())?;
    let db = Database::open(&db_path)?;

    match cli.command {
        Some(Commands::Init) => Ok(()),
        Some(Commands::Check) => commands::check(&config, &db).await,
        Some(Commands::Today { season }) => commands::today(&db, season.as_deref()),
        Some(Commands::Search { query, category }) => {
            commands::search(&db, &query, category.as_deref())
        }
        Some(Commands::Show { id }) => commands::show(&db, id),
        Some(Commands::Categories) => commands::categories(&db),
        Some(Commands::Identify { image, camera }) => {
            commands::identify(&config, image, camera).await
        }
        Some(Commands::Import { file, replace }) => commands::import(&db, &file, replace),
        None => run_tui(config, db).await,
    }
}

fn init_logging(verbose: u8, tui_mode: bool, data_dir: Option<&PathBuf>) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logging to stderr would scribble over the alternate screen.
    if tui_mode {
        let file = Config::log_path(data_dir)
            .ok()
            .and_then(|p| std::fs::OpenOptions::new().create(true).append(true).open(p).ok());
        match file {
            Some(file) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init(),
            None => tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .init(),
        }
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

struct Services {
    recognition: Option<RecognitionService>,
    camera: CameraCapture,
}

impl Services {
    fn new(config: &Config) -> Self {
        let recognition = if config.recognition.is_configured() {
            match PlantApiClient::new(config.recognition.clone()) {
                Ok(client) => Some(RecognitionService::new(client)),
                Err(e) => {
                    tracing::warn!("Failed to create recognition client: {}", e);
                    None
                }
            }
        } else {
            tracing::info!("Recognition API not configured - identification disabled");
            None
        };

        Self {
            recognition,
            camera: CameraCapture::new(config.camera.clone()),
        }
    }
}

async fn run_tui(config: Config, db: Database) -> Result<()> {
    let services = Services::new(&config);
    let mut app = App::new(db)?;
    app.load_today_plant()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &services).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    services: &Services,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app, services))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers);
                }
            }
        }

        if app.needs_capture {
            app.needs_capture = false;
            // The frame above already shows the "Starting camera" status.
            match services.camera.capture().await {
                Ok(Some(path)) => {
                    app.identify_state.path_buffer = path.display().to_string();
                    app.needs_recognition = true;
                    app.set_status("Photo captured, recognizing...");
                }
                Ok(None) => {
                    app.identify_state.processing = false;
                    app.set_status("Capture cancelled or no photo found");
                }
                Err(e) => {
                    app.identify_state.processing = false;
                    app.set_status(&format!("Capture failed: {}", e));
                }
            }
            terminal.draw(|f| draw(f, app, services))?;
        }

        if app.needs_recognition {
            app.needs_recognition = false;
            recognize(app, services).await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn recognize(app: &mut App, services: &Services) {
    let Some(ref recognition) = services.recognition else {
        app.identify_state.processing = false;
        app.set_status("Recognition API not configured - run `dailyplant init`");
        return;
    };

    let path = app.identify_state.path_buffer.trim().to_string();
    let outcome = recognition.recognize_file(Path::new(&path)).await;
    app.identify_state.processing = false;

    match outcome {
        Ok(result) => {
            let message = match result.best_match() {
                Some(best) => format!("Looks like {}", best.name),
                None => "Recognition failed - no matching plant found".to_string(),
            };
            app.identify_state.set_result(result);
            app.set_status(&message);
        }
        Err(e) => app.set_status(&format!("Recognition failed: {}", e)),
    }
}

fn draw(f: &mut ratatui::Frame, app: &App, services: &Services) {
    let area = f.area();

    match app.screen {
        Screen::Today => {
            let screen = TodayScreen::new(
                app.today_plant.as_ref(),
                app.season,
                chrono::Local::now().date_naive(),
            )
            .with_status(app.status_message.as_deref());
            f.render_widget(screen, area);
        }
        Screen::Encyclopedia => {
            let plants = app.filtered_plants();
            let state = &app.encyclopedia_state;
            let screen = EncyclopediaScreen::new(&plants, &app.categories, app.season)
                .with_selection(state.selected_index)
                .with_category(state.category_index)
                .with_search(&state.search, state.searching);
            f.render_widget(screen, area);
        }
        Screen::Detail => {
            if let Some(ref plant) = app.detail_plant {
                f.render_widget(DetailScreen::new(plant, app.season), area);
            }
        }
        Screen::Identify => {
            let state = &app.identify_state;
            let screen = IdentifyScreen::new(&state.path_buffer, state.result.as_ref())
                .editing(state.editing)
                .with_selection(state.selected_index)
                .processing(state.processing)
                .camera_available(services.camera.is_configured())
                .with_status(app.status_message.as_deref());
            f.render_widget(screen, area);
        }
    }
}

fn is_text_entry(app: &App) -> bool {
    match app.screen {
        Screen::Encyclopedia => app.encyclopedia_state.searching,
        Screen::Identify => app.identify_state.editing,
        _ => false,
    }
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if is_text_entry(app) {
        handle_screen_input(app, code);
        return;
    }

    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc if app.screen == Screen::Detail => app.close_detail(),
        KeyCode::Esc => app.switch_screen(Screen::Today),
        KeyCode::Char(c) => match Screen::from_key(c) {
            Some(screen) => {
                app.clear_status();
                app.switch_screen(screen);
            }
            None => handle_screen_input(app, code),
        },
        _ => handle_screen_input(app, code),
    }
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Today => handle_today_input(app, code),
        Screen::Encyclopedia => handle_encyclopedia_input(app, code),
        Screen::Detail => {}
        Screen::Identify => handle_identify_input(app, code),
    }
}

fn handle_today_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('r') => {
            if let Err(e) = app.load_today_plant() {
                app.set_status(&format!("Loading plant failed: {}", e));
            }
        }
        KeyCode::Enter => {
            if let Some(plant) = app.today_plant.clone() {
                app.show_detail(plant);
            }
        }
        _ => {}
    }
}

fn handle_encyclopedia_input(app: &mut App, code: KeyCode) {
    let category_count = app.categories.len();
    let state = &mut app.encyclopedia_state;

    if state.searching {
        match code {
            KeyCode::Enter => state.searching = false,
            KeyCode::Esc => {
                state.search.clear();
                state.searching = false;
                state.selected_index = 0;
            }
            KeyCode::Backspace => {
                state.search.pop();
                state.selected_index = 0;
            }
            KeyCode::Char(c) => {
                state.search.push(c);
                state.selected_index = 0;
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('/') => state.searching = true,
        KeyCode::Up => state.prev(),
        KeyCode::Down => {
            let count = app.filtered_plants().len();
            app.encyclopedia_state.next(count);
        }
        KeyCode::Left => state.prev_category(category_count),
        KeyCode::Right => state.next_category(category_count),
        KeyCode::Enter => app.open_selected_plant(),
        KeyCode::Char('r') => {
            if let Err(e) = app.reload_plants() {
                app.set_status(&format!("Reload failed: {}", e));
            }
        }
        _ => {}
    }
}

fn handle_identify_input(app: &mut App, code: KeyCode) {
    let state = &mut app.identify_state;

    if state.editing {
        match code {
            KeyCode::Enter => {
                state.editing = false;
                app.request_recognition();
            }
            KeyCode::Esc => state.editing = false,
            KeyCode::Backspace => {
                state.path_buffer.pop();
            }
            KeyCode::Char(c) => state.path_buffer.push(c),
            _ => {}
        }
        return;
    }

    if state.processing {
        return;
    }

    match code {
        KeyCode::Char('e') => state.editing = true,
        KeyCode::Enter => app.request_recognition(),
        KeyCode::Char('c') => app.request_capture(),
        KeyCode::Up => state.prev(),
        KeyCode::Down => state.next(),
        KeyCode::Char('d') => app.open_selected_candidate(),
        _ => {}
    }
}
