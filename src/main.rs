//! Comatrix - A terminal viewer for contingency matrices.

use anyhow::{Context, Result};
use clap::Parser;
use comatrix::app::{App, ViewOptions};
use comatrix::data::MatrixInput;
use comatrix::matrix::MatrixMode;
use comatrix::navigation::NavKey;
use comatrix::render::PIXEL_COLUMNS;
use comatrix::summary::matrix_summary;
use comatrix::ui;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "comatrix")]
#[command(about = "A terminal viewer for contingency matrices", long_about = None)]
struct Args {
    /// Path to the JSON matrix document
    file: PathBuf,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Initial statistic, e.g. MUTUAL_INFO or hellinger
    #[arg(long)]
    mode: Option<MatrixMode>,

    /// Initial contrast, 0 to 100
    #[arg(long)]
    contrast: Option<f64>,

    /// Initial zoom factor, 1 to 15
    #[arg(long)]
    zoom: Option<f64>,

    /// Start with swapped axes
    #[arg(long)]
    inverted: bool,

    /// Start with frequency-weighted axes
    #[arg(long)]
    frequency_layout: bool,

    /// Print per-mode statistics and exit
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Comatrix");
    }

    if !args.file.exists() {
        eprintln!("Error: Path not found: {}", args.file.display());
        std::process::exit(1);
    }

    let input = MatrixInput::read_file(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    if args.summary {
        print!("{}", matrix_summary(&input));
        return Ok(());
    }

    let options = ViewOptions {
        mode: args.mode,
        contrast: args.contrast,
        zoom: args.zoom,
        inverted: args.inverted,
        frequency_layout: args.frequency_layout,
    };
    let app = App::new(input, options);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("Comatrix exited");
    }

    Ok(())
}

/// Pointer state between mouse events.
#[derive(Debug, Default)]
struct MouseState {
    press: Option<(u16, u16)>,
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut mouse_state = MouseState::default();
    let frame_timeout = app.config.view.frame_timeout;
    let contrast_step = app.config.view.contrast_step;

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        for matrix_event in app.drain_events() {
            tracing::debug!("Matrix event: {:?}", matrix_event);
        }

        if !event::poll(frame_timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(nav) = NavKey::from_key_code(key.code) {
                    app.navigate(nav);
                    continue;
                }
                match (key.modifiers, key.code) {
                    // Quit
                    (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        return Ok(())
                    },

                    // View
                    (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => {
                        app.adjust_contrast(contrast_step);
                    },
                    (_, KeyCode::Char('-')) | (_, KeyCode::Char('_')) => {
                        app.adjust_contrast(-contrast_step);
                    },
                    (_, KeyCode::Char('i')) => app.toggle_inverted(),
                    (_, KeyCode::Char('z')) => app.toggle_zero_exceptions(),
                    (_, KeyCode::Char('m')) => app.next_mode(),
                    (_, KeyCode::Char('M')) => app.prev_mode(),
                    (_, KeyCode::Char('f')) => app.toggle_layout(),
                    (_, KeyCode::Char('T')) => app.cycle_theme(),

                    // Slicing
                    (_, KeyCode::Char('t')) => app.cycle_target(),
                    (_, KeyCode::Char('c')) => app.cycle_context(),
                    (_, KeyCode::Char('x')) => app.toggle_filter(),
                    (_, KeyCode::Char('y')) => app.toggle_row_filter(),

                    // Escape - back to the whole matrix
                    (_, KeyCode::Esc) => app.clear_selection(),

                    _ => {},
                }
            },
            Event::Mouse(mouse) => handle_mouse(&mut app, &mut mouse_state, mouse),
            Event::Resize(..) => app.request_draw(),
            _ => {},
        }
    }
}

/// Pointer position in viewport pixels.
fn viewport_point(app: &App, column: u16, row: u16) -> (f64, f64) {
    let area = app.matrix_area;
    (
        f64::from(column.saturating_sub(area.x) / PIXEL_COLUMNS),
        f64::from(row.saturating_sub(area.y)),
    )
}

fn handle_mouse(app: &mut App, state: &mut MouseState, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    let ctrl = mouse.modifiers.contains(KeyModifiers::CONTROL);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if ctrl {
                let (x, y) = viewport_point(app, column, row);
                app.viewport.start_drag(x, y);
            } else {
                state.press = Some((column, row));
                app.begin_rect(column, row);
            }
        },
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.viewport.is_dragging() {
                let (x, y) = viewport_point(app, column, row);
                app.viewport.drag_to(x, y);
            }
        },
        MouseEventKind::Up(MouseButton::Left) => {
            if app.viewport.is_dragging() {
                app.viewport.end_drag();
            } else if state.press.take() == Some((column, row)) {
                app.pick(column, row);
            } else {
                app.finish_rect(column, row);
            }
        },
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let delta = if mouse.kind == MouseEventKind::ScrollUp {
                -1.0
            } else {
                1.0
            };
            let pointer = viewport_point(app, column, row);
            if app.viewport.wheel(delta, ctrl, pointer) {
                app.status = format!("Zoom: {:.1}x", app.viewport.zoom());
                app.request_draw();
            }
        },
        _ => {},
    }
}
