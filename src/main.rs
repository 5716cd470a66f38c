mod app;
mod ui;

use app::{App, Focus};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use maze_carver::config::AppConfig;
use maze_carver::maze::Maze;
use maze_carver::render::{PngRenderer, Renderer, SvgRenderer, TextRenderer};
use maze_carver::request::{parse_dims, MazeRequest};
use maze_carver::settings::Palette;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Block characters on the console
    Text,
    Svg,
    Png,
    /// Interactive terminal viewer
    Tui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Colour when writing to a terminal
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "maze-carver")]
#[command(about = "Random-walk maze generator with text, SVG, PNG and terminal output")]
struct Args {
    /// Maze size as WxH, e.g. 20x25
    dims: Option<String>,

    /// Maze width in cells (3-256)
    #[arg(short = 'x', long)]
    width: Option<i32>,

    /// Maze height in cells (3-256)
    #[arg(short = 'y', long)]
    height: Option<i32>,

    /// Random seed; 0 picks one at random
    #[arg(long)]
    seed: Option<u64>,

    /// Canonical maze path, /WxH/seed?s=scale
    #[arg(long)]
    path: Option<String>,

    /// Pixels per cell for SVG and PNG output
    #[arg(short = 's', long)]
    scale: Option<u32>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// ANSI colour for text output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Colour palette (classic, mono, neon)
    #[arg(long)]
    palette: Option<String>,

    /// Draw tagged cells like plain passages
    #[arg(long = "hide-tags")]
    hide_tags: bool,

    /// Forward walk budget, in iterations per cell (1-64)
    #[arg(long = "forward-budget")]
    forward_budget: Option<usize>,

    /// Reverse walk hard stop, in iterations per cell (1-64)
    #[arg(long = "reverse-budget")]
    reverse_budget: Option<usize>,

    /// Exact forward iteration budget, overriding --forward-budget
    #[arg(long = "max-passes")]
    max_passes: Option<usize>,

    /// Config file to load (default: <config dir>/maze-carver/config.json if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the config file
    #[arg(long = "save-config")]
    save_config: bool,
}

impl Args {
    /// Layer CLI flags over the loaded config
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(f) = self.forward_budget {
            config.carve.forward_factor = f.clamp(1, 64);
        }
        if let Some(f) = self.reverse_budget {
            config.carve.reverse_factor = f.clamp(1, 64);
        }
        if self.max_passes.is_some() {
            config.carve.max_passes = self.max_passes;
        }
        if let Some(scale) = self.scale {
            config.render.scale = scale;
        }
        if let Some(p) = self.palette.as_deref().and_then(Palette::parse) {
            config.render.palette = p;
        }
        if self.hide_tags {
            config.render.show_tags = false;
        }
    }

    /// Path, then positional WxH, then individual flags; later ones win
    fn request(&self, config: &AppConfig) -> Result<MazeRequest, Box<dyn std::error::Error>> {
        let mut req = match &self.path {
            Some(path) => MazeRequest::from_path(path)?,
            None => MazeRequest {
                scale: config.render.scale,
                ..Default::default()
            },
        };
        if let Some(dims) = &self.dims {
            (req.width, req.height) = parse_dims(dims)?;
        }
        if let Some(w) = self.width {
            req.width = w;
        }
        if let Some(h) = self.height {
            req.height = h;
        }
        if let Some(seed) = self.seed {
            req.seed = seed;
        }
        if let Some(scale) = self.scale {
            req.scale = scale;
        }
        req.validate()?;
        Ok(req)
    }

    fn use_color(&self, config: &AppConfig) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => config.render.color && self.output.is_none() && io::stdout().is_terminal(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The viewer owns the screen, so only warnings and worse get through there
    let default_level = if args.format == Format::Tui { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    args.apply_to(&mut config);
    let mut request = args.request(&config)?;

    if args.save_config {
        let path = args
            .config
            .clone()
            .or_else(AppConfig::default_path)
            .ok_or("no config directory on this platform")?;
        config.save_to_file(&path)?;
        info!("Saved config to {}", path.display());
    }

    if args.format == Format::Tui {
        return run_viewer(request, &config);
    }

    if request.ensure_seed(&mut StdRng::from_entropy()) {
        info!("Using random seed {}", request.seed);
    }
    info!("Generating {}", request.path());

    let (maze, outcome) = Maze::generate(request.width, request.height, request.seed, config.carve);
    let stats = match outcome {
        Ok(stats) => stats,
        Err(e) => {
            error!("Maze {} is not usable: {}", request.path(), e);
            return Err(e.into());
        }
    };
    info!(
        "{} maze after {} forward and {} reverse iterations ({} teleports, {} backtracks, {} open cells)",
        stats.phase.name(),
        stats.forward_iterations,
        stats.reverse_iterations,
        stats.teleports,
        stats.backtracks,
        stats.passable
    );

    let render = config.render;
    let renderer: Box<dyn Renderer> = match args.format {
        Format::Svg => Box::new(SvgRenderer {
            scale: request.scale,
            show_tags: render.show_tags,
            palette: render.palette,
        }),
        Format::Png => Box::new(PngRenderer {
            scale: request.scale,
            show_tags: render.show_tags,
            palette: render.palette,
        }),
        _ => Box::new(TextRenderer {
            color: args.use_color(&config),
            show_tags: render.show_tags,
            palette: render.palette,
        }),
    };

    let grid = maze.read();
    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            renderer.draw(&grid, &mut out)?;
            out.flush()?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            renderer.draw(&grid, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn run_viewer(request: MazeRequest, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(request, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    // Nothing animates, so redraw only on input
    const POLL_INTERVAL: Duration = Duration::from_millis(250);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
            KeyCode::Char('r') | KeyCode::Char('R') => app.random_seed(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                app.next_seed();
                app.focus = Focus::Seed;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                app.prev_seed();
                app.focus = Focus::Seed;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                app.resize_maze(1);
                app.focus = Focus::Size;
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                app.resize_maze(-1);
                app.focus = Focus::Size;
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                app.toggle_tags();
                app.focus = Focus::Tags;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                app.cycle_palette();
                app.focus = Focus::Palette;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if let Err(e) = app.export_svg(std::path::Path::new(".")) {
                    app.message = Some(format!("Save failed: {e}"));
                }
            }
            KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),

            // Navigation
            KeyCode::Tab => app.next_focus(),
            KeyCode::BackTab => app.prev_focus(),
            KeyCode::Up => {
                if !app.show_help {
                    if app.focus.is_param() {
                        app.adjust_focused_up();
                    } else {
                        app.scroll_controls_up();
                    }
                }
            }
            KeyCode::Down => {
                if !app.show_help {
                    if app.focus.is_param() {
                        app.adjust_focused_down();
                    } else {
                        let term_size = terminal.size().unwrap_or_default();
                        let visible = ui::get_controls_visible_lines(term_size.height);
                        app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                    }
                }
            }
            KeyCode::Esc => {
                if app.show_help {
                    app.toggle_help();
                } else if app.focus.is_param() {
                    app.focus = Focus::Controls;
                }
            }
            KeyCode::Char('j') | KeyCode::Char('J') => {
                if app.show_help {
                    app.scroll_help_down(ui::HELP_CONTENT_LINES);
                }
            }
            KeyCode::Char('k') | KeyCode::Char('K') => {
                if app.show_help {
                    app.scroll_help_up();
                }
            }
            _ => {}
        }
    }
}
