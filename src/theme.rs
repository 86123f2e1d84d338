use serde::{Deserialize, Serialize};

use crate::color::{GradientStop, Rgb};

/// Colors and fonts shared by every section document.
///
/// The gradient drives the per-state cell fills: state ranks are spread over
/// [0, 1] and sampled through `crate::color::interpolate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub background: Rgb,
    pub text_color: Rgb,
    pub font_family: String,
    pub title_font_size: f32,
    pub body_font_size: f32,
    pub gradient: Vec<GradientStop>,
}

impl Theme {
    /// GitHub dark-mode contribution-graph palette.
    pub fn github_dark() -> Self {
        Self {
            background: Rgb::new(0x0D, 0x11, 0x16),
            text_color: Rgb::new(0xFF, 0xFF, 0xFF),
            font_family: "sans-serif".to_string(),
            title_font_size: 20.0,
            body_font_size: 16.0,
            gradient: vec![
                GradientStop::new(0.00, Rgb::new(0x16, 0x1C, 0x23)),
                GradientStop::new(0.25, Rgb::new(0x0E, 0x45, 0x27)),
                GradientStop::new(0.50, Rgb::new(0x00, 0x6E, 0x34)),
                GradientStop::new(0.75, Rgb::new(0x28, 0xA5, 0x41)),
                GradientStop::new(1.00, Rgb::new(0x39, 0xD2, 0x55)),
            ],
        }
    }

    /// GitHub light-mode contribution-graph palette.
    pub fn github_light() -> Self {
        Self {
            background: Rgb::new(0xFF, 0xFF, 0xFF),
            text_color: Rgb::new(0x24, 0x29, 0x2F),
            font_family: "sans-serif".to_string(),
            title_font_size: 20.0,
            body_font_size: 16.0,
            gradient: vec![
                GradientStop::new(0.00, Rgb::new(0xEB, 0xED, 0xF0)),
                GradientStop::new(0.25, Rgb::new(0x9B, 0xE9, 0xA8)),
                GradientStop::new(0.50, Rgb::new(0x40, 0xC4, 0x63)),
                GradientStop::new(0.75, Rgb::new(0x30, 0xA1, 0x4E)),
                GradientStop::new(1.00, Rgb::new(0x21, 0x6E, 0x39)),
            ],
        }
    }
}
