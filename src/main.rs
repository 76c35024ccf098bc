//! doctree: a terminal viewer for extracted PDF outlines.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, ValueEnum};
use doctree::client::{Extractor, HttpExtractor};
use doctree::error::ExtractionError;
use doctree::{app_state, config, logging, tree_view, ui};
use ratatui::crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

type Outcome = Result<Value, ExtractionError>;

#[derive(Parser)]
#[command(name = "doctree")]
#[command(about = "Browse the outline of a PDF extracted by a remote service", long_about = None)]
struct Args {
    /// PDF to select on startup
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Base URL of the extraction service
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Extract without the TUI and print the result
    #[arg(long, value_enum)]
    print: Option<PrintFormat>,

    /// Check that the extraction service is up and exit
    #[arg(long)]
    health: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PrintFormat {
    /// Indented outline of section titles
    Tree,
    /// Pretty-printed hierarchy as returned by the service
    Json,
}

fn main() -> io::Result<ExitCode> {
    let args = Args::parse();
    let loaded = config::Config::read(Path::new(config::CONFIG_FILE));
    let mut cfg = match loaded {
        Ok(ref found) => found.clone().unwrap_or_default(),
        Err(_) => config::Config::default(),
    };

    // Override config with command line args
    if let Some(endpoint) = args.endpoint {
        cfg.endpoint = endpoint;
    }

    let _guard = logging::init(Path::new(&cfg.log_dir));
    if let Err(e) = loaded {
        tracing::warn!(error = %e, "ignoring invalid config");
    }

    let runtime = Runtime::new()?;
    let extractor = HttpExtractor::new(&cfg.endpoint).map_err(io::Error::other)?;
    tracing::info!(endpoint = %extractor.endpoint(), "starting doctree");

    if args.health {
        return match runtime.block_on(extractor.health()) {
            Ok(health) => {
                println!("{} ({})", health.status, health.version);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let mut state = app_state::AppState::new(cfg.dark_mode, PathBuf::from(&cfg.export_path));
    if let Some(ref path) = args.path {
        // In the TUI a rejected file is shown in the error bar instead.
        if let Err(e) = state.select_path(path) {
            if args.print.is_some() {
                eprintln!("Error: {e}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    if let Some(format) = args.print {
        return Ok(run_headless(&runtime, &extractor, &mut state, format));
    }

    run_tui(&runtime, Arc::new(extractor), state)?;
    Ok(ExitCode::SUCCESS)
}

fn run_headless(
    runtime: &Runtime,
    extractor: &HttpExtractor,
    state: &mut app_state::AppState,
    format: PrintFormat,
) -> ExitCode {
    if let Err(e) = runtime.block_on(state.process(extractor)) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match format {
        PrintFormat::Tree => {
            if let Some(ref root) = state.hierarchy {
                print!("{}", tree_view::outline_text(root));
            }
        }
        PrintFormat::Json => {
            if let Some(ref json) = state.json_output {
                println!("{json}");
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_tui(
    runtime: &Runtime,
    extractor: Arc<dyn Extractor>,
    mut app: app_state::AppState,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, runtime, &extractor, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Hands the selected file to the runtime if no extraction is in flight.
fn start_extraction(
    app: &mut app_state::AppState,
    runtime: &Runtime,
    extractor: &Arc<dyn Extractor>,
    tx: &mpsc::UnboundedSender<Outcome>,
) {
    let Some(file) = app.request_extraction() else {
        return;
    };
    let extractor = Arc::clone(extractor);
    let tx = tx.clone();
    runtime.spawn(async move {
        let outcome = extractor.extract(&file).await;
        let _ = tx.send(outcome);
    });
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    runtime: &Runtime,
    extractor: &Arc<dyn Extractor>,
    app: &mut app_state::AppState,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

    loop {
        while let Ok(outcome) = rx.try_recv() {
            let _ = app.finish_extraction(outcome);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll so a finished extraction is picked up without waiting for a keystroke.
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            match app.current_view {
                app_state::View::Browse => {
                    app.message = None;
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Tab => app.switch_tab(),
                        KeyCode::Char('d') => app.toggle_dark_mode(),
                        KeyCode::Char('p') => start_extraction(app, runtime, extractor, &tx),
                        KeyCode::Char(':') => {
                            app.current_view = app_state::View::Command;
                            app.command_buffer.clear();
                        }
                        code => match app.active_tab {
                            app_state::Tab::Tree => match code {
                                KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
                                KeyCode::Down | KeyCode::Char('j') => app.select_next(),
                                KeyCode::Left | KeyCode::Char('h') => app.collapse_selected(),
                                KeyCode::Right | KeyCode::Char('l') => app.expand_selected(),
                                KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
                                KeyCode::Home => app.select_first(),
                                KeyCode::End => app.select_last(),
                                _ => {}
                            },
                            app_state::Tab::Json => match code {
                                KeyCode::Up | KeyCode::Char('k') => app.scroll_json(-1),
                                KeyCode::Down | KeyCode::Char('j') => app.scroll_json(1),
                                KeyCode::PageUp => app.scroll_json(-20),
                                KeyCode::PageDown => app.scroll_json(20),
                                KeyCode::Home => app.scroll_json(i32::MIN),
                                KeyCode::End => app.scroll_json(i32::MAX),
                                _ => {}
                            },
                        },
                    }
                }
                app_state::View::Command => match key.code {
                    KeyCode::Char(c) => {
                        app.command_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.command_buffer.pop();
                    }
                    KeyCode::Enter => {
                        let cmd = std::mem::take(&mut app.command_buffer);
                        app.current_view = app_state::View::Browse;
                        match app.run_command(&cmd) {
                            app_state::Action::Quit => return Ok(()),
                            app_state::Action::Process => {
                                start_extraction(app, runtime, extractor, &tx);
                            }
                            app_state::Action::None => {}
                        }
                    }
                    KeyCode::Esc => {
                        app.current_view = app_state::View::Browse;
                        app.command_buffer.clear();
                    }
                    _ => {}
                },
            }
        }
    }
}
