use crate::color::GradientStop;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Requested column count; clamped to the unit count per grid.
    pub cols: usize,
    pub cell_size: f32,
    pub gap: f32,
    pub rx: f32,
    pub ry: f32,
    /// Label every cell with its unit id (debugging).
    pub show_unit_ids: bool,
    /// Vertical offset of the unit-id label below its cell.
    pub label_offset: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 12,
            cell_size: 24.0,
            gap: 8.0,
            rx: 2.0,
            ry: 2.0,
            show_unit_ids: false,
            label_offset: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendConfig {
    pub square_size: f32,
    /// Vertical distance between legend rows.
    pub spacing: f32,
    pub pre_spacing: f32,
    pub padding_bottom: f32,
    /// Offset of the swatch above the row's text baseline.
    pub square_baseline_offset: f32,
    /// Horizontal gap between swatch and text.
    pub text_offset: f32,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            square_size: 16.0,
            spacing: 20.0,
            pre_spacing: 16.0,
            padding_bottom: 16.0,
            square_baseline_offset: 14.0,
            text_offset: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub margin: f32,
    pub show_title: bool,
    pub title_gap: f32,
    /// Spacing under a group's path header.
    pub path_gap: f32,
    pub text_baseline_offset: f32,
    pub grid_post_spacing: f32,
    pub uncatalogued_spacing: f32,
    /// Average glyph widths for the crude text-extent estimate used to
    /// track the rightmost pixel a section needs.
    pub title_char_width: f32,
    pub body_char_width: f32,
    pub grid: GridConfig,
    pub legend: LegendConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 24.0,
            show_title: false,
            title_gap: 32.0,
            path_gap: 24.0,
            text_baseline_offset: 14.0,
            grid_post_spacing: 16.0,
            uncatalogued_spacing: 30.0,
            title_char_width: 11.0,
            body_char_width: 9.0,
            grid: GridConfig::default(),
            legend: LegendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Starting canvas width; a section reporting a larger minimum width is
    /// re-laid-out at that width.
    pub width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { width: 500.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::github_dark(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    background: Option<crate::color::Rgb>,
    text_color: Option<crate::color::Rgb>,
    font_family: Option<String>,
    title_font_size: Option<f32>,
    body_font_size: Option<f32>,
    gradient: Option<Vec<GradientStop>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GridConfigFile {
    cols: Option<usize>,
    cell_size: Option<f32>,
    gap: Option<f32>,
    rx: Option<f32>,
    ry: Option<f32>,
    show_unit_ids: Option<bool>,
    label_offset: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LegendConfigFile {
    square_size: Option<f32>,
    spacing: Option<f32>,
    pre_spacing: Option<f32>,
    padding_bottom: Option<f32>,
    square_baseline_offset: Option<f32>,
    text_offset: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    margin: Option<f32>,
    show_title: Option<bool>,
    title_gap: Option<f32>,
    path_gap: Option<f32>,
    text_baseline_offset: Option<f32>,
    grid_post_spacing: Option<f32>,
    uncatalogued_spacing: Option<f32>,
    title_char_width: Option<f32>,
    body_char_width: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    grid: Option<GridConfigFile>,
    legend: Option<LegendConfigFile>,
    width: Option<f32>,
}

/// Loads defaults, then merges an optional JSON config file over them.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "githubLight" | "light" => config.theme = Theme::github_light(),
            "githubDark" | "dark" | "default" => config.theme = Theme::github_dark(),
            other => anyhow::bail!("unknown theme '{other}'"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.title_font_size {
            config.theme.title_font_size = v;
        }
        if let Some(v) = vars.body_font_size {
            config.theme.body_font_size = v;
        }
        if let Some(v) = vars.gradient {
            if v.is_empty() {
                anyhow::bail!("themeVariables.gradient must have at least one stop");
            }
            config.theme.gradient = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.margin {
            config.layout.margin = v;
        }
        if let Some(v) = layout.show_title {
            config.layout.show_title = v;
        }
        if let Some(v) = layout.title_gap {
            config.layout.title_gap = v;
        }
        if let Some(v) = layout.path_gap {
            config.layout.path_gap = v;
        }
        if let Some(v) = layout.text_baseline_offset {
            config.layout.text_baseline_offset = v;
        }
        if let Some(v) = layout.grid_post_spacing {
            config.layout.grid_post_spacing = v;
        }
        if let Some(v) = layout.uncatalogued_spacing {
            config.layout.uncatalogued_spacing = v;
        }
        if let Some(v) = layout.title_char_width {
            config.layout.title_char_width = v;
        }
        if let Some(v) = layout.body_char_width {
            config.layout.body_char_width = v;
        }
    }

    if let Some(grid) = parsed.grid {
        if let Some(v) = grid.cols {
            config.layout.grid.cols = v;
        }
        if let Some(v) = grid.cell_size {
            config.layout.grid.cell_size = v;
        }
        if let Some(v) = grid.gap {
            config.layout.grid.gap = v;
        }
        if let Some(v) = grid.rx {
            config.layout.grid.rx = v;
        }
        if let Some(v) = grid.ry {
            config.layout.grid.ry = v;
        }
        if let Some(v) = grid.show_unit_ids {
            config.layout.grid.show_unit_ids = v;
        }
        if let Some(v) = grid.label_offset {
            config.layout.grid.label_offset = v;
        }
    }

    if let Some(legend) = parsed.legend {
        if let Some(v) = legend.square_size {
            config.layout.legend.square_size = v;
        }
        if let Some(v) = legend.spacing {
            config.layout.legend.spacing = v;
        }
        if let Some(v) = legend.pre_spacing {
            config.layout.legend.pre_spacing = v;
        }
        if let Some(v) = legend.padding_bottom {
            config.layout.legend.padding_bottom = v;
        }
        if let Some(v) = legend.square_baseline_offset {
            config.layout.legend.square_baseline_offset = v;
        }
        if let Some(v) = legend.text_offset {
            config.layout.legend.text_offset = v;
        }
    }

    if let Some(width) = parsed.width {
        config.render.width = width;
    }

    Ok(config)
}
