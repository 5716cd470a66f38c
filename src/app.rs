use maze_carver::carver::{CarveError, FillStats};
use maze_carver::config::AppConfig;
use maze_carver::maze::Maze;
use maze_carver::render::{Renderer, SvgRenderer};
use maze_carver::request::{MazeRequest, MAX_DIM, MIN_DIM};
use maze_carver::settings::{CarveSettings, RenderSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Budget,
    Palette,
    Reverse,
    Scale,
    Seed,
    Size,
    Tags,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Budget,
            Focus::Budget => Focus::Palette,
            Focus::Palette => Focus::Reverse,
            Focus::Reverse => Focus::Scale,
            Focus::Scale => Focus::Seed,
            Focus::Seed => Focus::Size,
            Focus::Size => Focus::Tags,
            Focus::Tags => Focus::Budget,
        }
    }

    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Tags,
            Focus::Budget => Focus::Tags,
            Focus::Palette => Focus::Budget,
            Focus::Reverse => Focus::Palette,
            Focus::Scale => Focus::Reverse,
            Focus::Seed => Focus::Scale,
            Focus::Size => Focus::Seed,
            Focus::Tags => Focus::Size,
        }
    }

    /// Line index in the parameters box
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::Budget => 0,
            Focus::Palette => 1,
            Focus::Reverse => 2,
            Focus::Scale => 3,
            Focus::Seed => 4,
            Focus::Size => 5,
            Focus::Tags => 6,
        }
    }

    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub request: MazeRequest,
    pub carve: CarveSettings,
    pub render: RenderSettings,
    pub maze: Maze,
    pub outcome: Result<FillStats, CarveError>,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// One-line feedback shown under the status box
    pub message: Option<String>,
    rng: StdRng,
}

impl App {
    pub fn new(mut request: MazeRequest, config: &AppConfig) -> Self {
        let mut rng = StdRng::from_entropy();
        request.ensure_seed(&mut rng);
        let (maze, outcome) = Maze::generate(request.width, request.height, request.seed, config.carve);
        Self {
            request,
            carve: config.carve,
            render: config.render,
            maze,
            outcome,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            message: None,
            rng,
        }
    }

    /// Carve the maze again from the current request and settings
    pub fn regenerate(&mut self) {
        let (maze, outcome) = Maze::generate(self.request.width, self.request.height, self.request.seed, self.carve);
        self.maze = maze;
        self.outcome = outcome;
        self.message = None;
    }

    /// Fresh random seed
    pub fn random_seed(&mut self) {
        self.request.seed = 0;
        self.request.ensure_seed(&mut self.rng);
        self.regenerate();
    }

    pub fn next_seed(&mut self) {
        self.request.seed = match self.request.seed.wrapping_add(1) {
            0 => 1,
            s => s,
        };
        self.regenerate();
    }

    pub fn prev_seed(&mut self) {
        self.request.seed = match self.request.seed.wrapping_sub(1) {
            0 => u64::MAX,
            s => s,
        };
        self.regenerate();
    }

    /// Grow or shrink both dimensions, keeping them within request bounds
    pub fn resize_maze(&mut self, delta: i32) {
        let width = (self.request.width + delta).clamp(MIN_DIM, MAX_DIM);
        let height = (self.request.height + delta).clamp(MIN_DIM, MAX_DIM);
        if (width, height) != (self.request.width, self.request.height) {
            self.request.width = width;
            self.request.height = height;
            self.regenerate();
        }
    }

    pub fn toggle_tags(&mut self) {
        self.render.toggle_tags();
    }

    pub fn cycle_palette(&mut self) {
        self.render.palette = self.render.palette.next();
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Budget => {
                self.carve.adjust_forward_factor(1);
                self.regenerate();
            }
            Focus::Palette => self.cycle_palette(),
            Focus::Reverse => {
                self.carve.adjust_reverse_factor(1);
                self.regenerate();
            }
            Focus::Scale => self.adjust_scale(1),
            Focus::Seed => self.next_seed(),
            Focus::Size => self.resize_maze(1),
            Focus::Tags => self.toggle_tags(),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Budget => {
                self.carve.adjust_forward_factor(-1);
                self.regenerate();
            }
            Focus::Palette => self.render.palette = self.render.palette.prev(),
            Focus::Reverse => {
                self.carve.adjust_reverse_factor(-1);
                self.regenerate();
            }
            Focus::Scale => self.adjust_scale(-1),
            Focus::Seed => self.prev_seed(),
            Focus::Size => self.resize_maze(-1),
            Focus::Tags => self.toggle_tags(),
        }
    }

    fn adjust_scale(&mut self, delta: i32) {
        self.render.adjust_scale(delta);
        self.request.scale = self.render.scale;
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// File name an export of the current maze is written to
    pub fn export_name(&self) -> String {
        format!("maze-{}x{}-{}.svg", self.request.width, self.request.height, self.request.seed)
    }

    /// Write the current maze as SVG into `dir`
    pub fn export_svg(&mut self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(self.export_name());
        let renderer = SvgRenderer {
            scale: self.render.scale,
            show_tags: self.render.show_tags,
            palette: self.render.palette,
        };
        let mut out = BufWriter::new(File::create(&path)?);
        renderer.draw(&self.maze.read(), &mut out)?;
        out.flush()?;
        self.message = Some(format!("Saved {}", path.display()));
        Ok(path)
    }
}
