use crate::grid::{Loc, Special};
use serde::{Deserialize, Serialize};

/// Default forward budget, in iterations per grid cell
pub const DEFAULT_BUDGET_FACTOR: usize = 12;

/// Iteration budgets for a single fill call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveSettings {
    /// Forward budget = forward_factor * cell count
    pub forward_factor: usize,
    /// Reverse hard stop = reverse_factor * cell count
    pub reverse_factor: usize,
    /// Explicit forward budget; overrides `forward_factor`
    pub max_passes: Option<usize>,
    /// Explicit reverse budget; overrides `reverse_factor`
    pub max_reverse_passes: Option<usize>,
}

impl Default for CarveSettings {
    fn default() -> Self {
        Self {
            forward_factor: DEFAULT_BUDGET_FACTOR,
            reverse_factor: DEFAULT_BUDGET_FACTOR,
            max_passes: None,
            max_reverse_passes: None,
        }
    }
}

impl CarveSettings {
    pub fn forward_budget(&self, cells: usize) -> usize {
        self.max_passes.unwrap_or(self.forward_factor * cells)
    }

    /// At least one reverse iteration is always allowed
    pub fn reverse_budget(&self, cells: usize) -> usize {
        self.max_reverse_passes
            .unwrap_or(self.reverse_factor * cells)
            .max(1)
    }

    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Adjust forward factor within bounds
    pub fn adjust_forward_factor(&mut self, delta: i32) {
        self.forward_factor = (self.forward_factor as i32 + delta).clamp(1, 64) as usize;
    }

    /// Adjust reverse factor within bounds
    pub fn adjust_reverse_factor(&mut self, delta: i32) {
        self.reverse_factor = (self.reverse_factor as i32 + delta).clamp(1, 64) as usize;
    }
}

/// RGB triple
pub type Rgb = (u8, u8, u8);

/// Colour palette shared by every renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Palette {
    /// Brown walls, coloured tags
    #[default]
    Classic,
    /// Black and white only
    Mono,
    /// Dark walls with neon tags
    Neon,
}

impl Palette {
    pub fn name(&self) -> &str {
        match self {
            Palette::Classic => "Classic",
            Palette::Mono => "Mono",
            Palette::Neon => "Neon",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Palette::Classic => Palette::Mono,
            Palette::Mono => Palette::Neon,
            Palette::Neon => Palette::Classic,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Palette::Classic => Palette::Neon,
            Palette::Mono => Palette::Classic,
            Palette::Neon => Palette::Mono,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Palette::Classic),
            "mono" | "bw" => Some(Palette::Mono),
            "neon" => Some(Palette::Neon),
            _ => None,
        }
    }

    pub fn wall(&self) -> Rgb {
        match self {
            Palette::Classic => (135, 95, 0),
            Palette::Mono => (0, 0, 0),
            Palette::Neon => (20, 20, 40),
        }
    }

    pub fn open(&self) -> Rgb {
        match self {
            Palette::Classic | Palette::Mono => (255, 255, 255),
            Palette::Neon => (60, 60, 90),
        }
    }

    /// Colour of the glyph drawn for `tag`
    pub fn tag(&self, tag: Special) -> Rgb {
        if *self == Palette::Mono {
            return (0, 0, 0);
        }
        let neon = *self == Palette::Neon;
        if tag.contains(Special::START) || tag.contains(Special::FINISH) {
            if neon { (57, 255, 20) } else { (0, 160, 0) }
        } else if tag.contains(Special::MAX_PASSES) {
            if neon { (255, 0, 255) } else { (255, 175, 255) }
        } else if tag.contains(Special::REVERSE) {
            if neon { (255, 20, 147) } else { (255, 135, 215) }
        } else if tag.contains(Special::CREATE_END) {
            if neon { (0, 255, 255) } else { (255, 192, 203) }
        } else {
            self.open()
        }
    }

    /// Fill colour of a whole cell for raster output
    pub fn cell(&self, loc: &Loc, show_tags: bool) -> Rgb {
        if !loc.passable {
            self.wall()
        } else if show_tags && !loc.special.is_empty() {
            self.tag(loc.special)
        } else {
            self.open()
        }
    }
}

/// Output options shared by the renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Pixels per cell for SVG and PNG output
    pub scale: u32,
    /// Emit ANSI colour in text output
    pub color: bool,
    /// Mark tagged cells (dead ends, reverse path, ...)
    pub show_tags: bool,
    pub palette: Palette,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 25,
            color: true,
            show_tags: true,
            palette: Palette::default(),
        }
    }
}

impl RenderSettings {
    /// Adjust scale within bounds
    pub fn adjust_scale(&mut self, delta: i32) {
        self.scale = (self.scale as i32 + delta).clamp(2, 200) as u32;
    }

    pub fn toggle_tags(&mut self) {
        self.show_tags = !self.show_tags;
    }
}
