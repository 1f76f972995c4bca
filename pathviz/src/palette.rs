//! Display colors for grid cells.
//!
//! Colors are derived from what the renderer last saw for a cell (a wall
//! flag or an event tag). The search grid never stores them.

use pathviz_core::style::Color;
use pathviz_search::ColorTag;

// -- Defaults --

pub const GREEN: Color = Color::from_rgb(0, 255, 0);
pub const RED: Color = Color::from_rgb(255, 0, 0);
pub const BLUE: Color = Color::from_rgb(0, 0, 255);
pub const YELLOW: Color = Color::from_rgb(255, 255, 0);
/// Painted walls.
pub const LIGHT_GREY: Color = Color::from_rgb(200, 200, 200);
pub const WHITE: Color = Color::from_rgb(255, 255, 255);

/// Status and header text.
pub const FG_TEXT: Color = Color::DEFAULT;
pub const FG_EMPH: Color = Color::from_rgb(248, 248, 242);
pub const BG_BAR: Color = Color::from_rgb(40, 42, 54);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub frontier: Color,
    pub visited: Color,
    pub path: Color,
    pub endpoint: Color,
    pub wall: Color,
    pub empty: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            frontier: GREEN,
            visited: RED,
            path: BLUE,
            endpoint: YELLOW,
            wall: LIGHT_GREY,
            empty: WHITE,
        }
    }
}

impl Palette {
    pub fn tag(&self, tag: ColorTag) -> Color {
        match tag {
            ColorTag::Frontier => self.frontier,
            ColorTag::Visited => self.visited,
            ColorTag::Path => self.path,
            ColorTag::Endpoint => self.endpoint,
        }
    }
}
