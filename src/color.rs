use std::str::FromStr;

use eframe::egui::Color32;
use palette::Srgb;

use crate::layout::CellKind;

// ---------------------------------------------------------------------------
// Dashboard colour scheme
// ---------------------------------------------------------------------------

pub const HIGHLIGHT_HEX: &str = "#FF0000";
pub const UNCORRELATED_HEX: &str = "#E6E5E3";
pub const CORRELATED_HEX: &str = "#FFA500";
pub const ABNORMAL_LINE_HEX: &str = "#FFA500";
pub const NORMAL_LINE_HEX: &str = "#757575";
pub const GRID_BACKGROUND_HEX: &str = "#EBF2FF";

/// Parse a `#RRGGBB` / `#RGB` string, falling back to grey on bad input.
pub fn hex_color(hex: &str) -> Color32 {
    Srgb::<u8>::from_str(hex)
        .map(|rgb| Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
        .unwrap_or_else(|_| {
            log::warn!("Invalid colour literal {hex:?}");
            Color32::GRAY
        })
}

// ---------------------------------------------------------------------------
// Colour mapping: grid cell kind → Color32
// ---------------------------------------------------------------------------

/// Colours for the correlation grid cells.
#[derive(Debug, Clone)]
pub struct CellPalette {
    pub selected: Color32,
    pub uncorrelated: Color32,
    pub correlated: Color32,
    pub background: Color32,
}

impl Default for CellPalette {
    fn default() -> Self {
        CellPalette {
            selected: hex_color(HIGHLIGHT_HEX),
            uncorrelated: hex_color(UNCORRELATED_HEX),
            correlated: hex_color(CORRELATED_HEX),
            background: hex_color(GRID_BACKGROUND_HEX),
        }
    }
}

impl CellPalette {
    pub fn color_for(&self, kind: CellKind) -> Color32 {
        match kind {
            CellKind::Selected => self.selected,
            CellKind::Uncorrelated => self.uncorrelated,
            CellKind::Correlated => self.correlated,
        }
    }
}

/// Line colours for the class-mean chart as `(normal, abnormal)`.
pub fn class_line_colors() -> (Color32, Color32) {
    (hex_color(NORMAL_LINE_HEX), hex_color(ABNORMAL_LINE_HEX))
}
