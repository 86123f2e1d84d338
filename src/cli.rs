use crate::config::load_config;
use crate::diagnostics::Diagnostics;
use crate::layout::layout_section;
use crate::normalize::normalize;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

static UNSAFE_STEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

#[derive(Parser, Debug)]
#[command(name = "pgrid", version, about = "Progress grid renderer (unit-state trees to SVG)")]
pub struct Args {
    /// Input progress file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output directory; one document per section lands here
    #[arg(short = 'o', long = "outputDir", default_value = "progress")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme variables and layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width; a section needing more room is laid out wider
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Render each section's title line
    #[arg(long = "title")]
    pub title: bool,

    /// Label every cell with its unit id (debugging)
    #[arg(long = "unitIds")]
    pub unit_ids: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if args.title {
        config.layout.show_title = true;
    }
    if args.unit_ids {
        config.layout.grid.show_unit_ids = true;
    }

    let (input, lenient) = read_input(args.input.as_deref())?;
    let raw = parse_progress(&input, lenient)?;

    let mut diag = Diagnostics::new();
    if let Some(sections) = normalize(&raw, &mut diag) {
        for section in &sections {
            // First pass sizes the canvas, second pass emits at that width;
            // only the probe's background rectangle would differ, so its
            // diagnostics are thrown away.
            let mut probe = Diagnostics::new();
            let sized =
                layout_section(section, config.render.width, &config.theme, &config.layout, &mut probe)?;
            let width = config.render.width.max(sized.min_width.ceil());
            let layout =
                layout_section(section, width, &config.theme, &config.layout, &mut diag)?;
            let svg = render_svg(&layout.commands, width, layout.height);

            let stem = sanitize_file_stem(&section.id);
            match args.output_format {
                OutputFormat::Svg => {
                    let path = args.output_dir.join(format!("{stem}.svg"));
                    write_output_svg(&svg, Some(&path))?;
                    println!(
                        "Wrote {} (width {}, height {})",
                        path.display(),
                        width,
                        layout.height
                    );
                }
                OutputFormat::Png => {
                    let path = args.output_dir.join(format!("{stem}.png"));
                    write_png(&svg, &path, width, layout.height)?;
                    println!(
                        "Wrote {} (width {}, height {})",
                        path.display(),
                        width,
                        layout.height
                    );
                }
            }
        }
    }

    let mut stderr = io::stderr();
    diag.write_report(&mut stderr)?;
    if diag.has_errors() {
        anyhow::bail!("run finished with {} error(s)", diag.errors().len());
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, path: &Path, width: f32, height: f32) -> Result<()> {
    crate::render::write_output_png(svg, path, width, height)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _path: &Path, _width: f32, _height: f32) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature; rebuild with --features png"
    ))
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, true));
        }
        let content = std::fs::read_to_string(path)?;
        let lenient = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json5"))
            .unwrap_or(false);
        return Ok((content, lenient));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, true))
}

/// Strict JSON for .json files; JSON5 (comments, trailing commas) for .json5
/// files and stdin.
fn parse_progress(input: &str, lenient: bool) -> Result<serde_json::Value> {
    if lenient {
        Ok(json5::from_str(input)?)
    } else {
        Ok(serde_json::from_str(input)?)
    }
}

/// Section ids become file names; anything outside a conservative character
/// set is collapsed to an underscore.
fn sanitize_file_stem(id: &str) -> String {
    let stem = UNSAFE_STEM_RE.replace_all(id, "_");
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "section".to_string()
    } else {
        stem.to_string()
    }
}
