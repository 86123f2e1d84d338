use std::collections::BTreeMap;

use crate::color::{ColorError, interpolate};
use crate::command::SvgCommand;
use crate::config::LayoutConfig;
use crate::counters::{StateTally, state_counters};
use crate::diagnostics::Diagnostics;
use crate::model::{Group, Section};
use crate::theme::Theme;

use super::grid::grid_commands;

pub const UNCATALOGUED_MESSAGE: &str =
    "Units have not yet been catalogued for tracking progress.";

#[derive(Debug)]
pub struct SectionLayout {
    pub commands: Vec<SvgCommand>,
    pub height: f32,
    /// Rightmost pixel extent any element needed, right margin included.
    /// Not applied automatically; callers may re-run the layout wider.
    pub min_width: f32,
}

/// Running layout state: a vertical cursor plus the widest extent seen.
struct Cursor<'a> {
    cfg: &'a LayoutConfig,
    commands: Vec<SvgCommand>,
    x: f32,
    y: f32,
    max_x: f32,
}

impl Cursor<'_> {
    fn text(&mut self, x: f32, content: &str, class: &str) {
        self.commands.push(SvgCommand::Text {
            x,
            y: self.y + self.cfg.text_baseline_offset,
            class: class.to_string(),
            content: content.to_string(),
        });
        self.note_text(x, content, class);
    }

    fn note_text(&mut self, x: f32, content: &str, class: &str) {
        let width = self.estimate_text_width(content, class);
        self.max_x = self.max_x.max(x + width + self.cfg.margin);
    }

    fn note_rect(&mut self, x: f32, width: f32) {
        self.max_x = self.max_x.max(x + width + self.cfg.margin);
    }

    // Crude estimate: glyph count times an average per-class width. Close
    // enough to keep long headers from running off the right edge.
    fn estimate_text_width(&self, content: &str, class: &str) -> f32 {
        let char_width = if class == "title" {
            self.cfg.title_char_width
        } else {
            self.cfg.body_char_width
        };
        content.chars().count() as f32 * char_width
    }
}

/// Builds the full command list for one section.
///
/// The canvas width is taken as given; `min_width` in the result reports the
/// width the section actually needed so the caller can lay out again with a
/// wider canvas (the second pass only changes the background rectangle).
pub fn layout_section(
    section: &Section,
    canvas_width: f32,
    theme: &Theme,
    cfg: &LayoutConfig,
    diag: &mut Diagnostics,
) -> Result<SectionLayout, ColorError> {
    let state_keys: Vec<u32> = section.states.keys().copied().collect();

    let mut css = vec![
        format!(".bg {{ fill: {}; rx: 10px; ry: 10px; }}", theme.background),
        format!(
            ".title {{ font: bold {}px {}; fill: {}; }}",
            theme.title_font_size, theme.font_family, theme.text_color
        ),
        format!(
            ".path {{ font: {}px {}; fill: {}; }}",
            theme.body_font_size, theme.font_family, theme.text_color
        ),
        format!(
            ".legend {{ font: {}px {}; fill: {}; }}",
            theme.body_font_size, theme.font_family, theme.text_color
        ),
        format!(
            ".body {{ font: {}px {}; fill: {}; }}",
            theme.body_font_size, theme.font_family, theme.text_color
        ),
        format!(".square {{ rx: {}px; fill: none; }}", cfg.grid.rx),
    ];
    for (rank, state) in state_keys.iter().enumerate() {
        let position = if state_keys.len() > 1 {
            rank as f32 / (state_keys.len() - 1) as f32
        } else {
            0.5
        };
        let fill = interpolate(&theme.gradient, position)?;
        css.push(format!(".square.state-{state} {{ fill: {fill}; }}"));
    }

    let mut cur = Cursor {
        cfg,
        commands: vec![SvgCommand::Style(css.join("\n"))],
        x: cfg.margin,
        y: cfg.margin,
        max_x: cfg.margin,
    };

    if cfg.show_title {
        let x = cur.x;
        cur.text(x, &section.title, "title");
        cur.y += cfg.title_gap;
    }

    if section.groups.is_empty() {
        match &section.units {
            Some(units) if !units.is_empty() => {
                // One synthetic grid, no path header.
                place_grid(&mut cur, "all", units, units.len() as u32);
            }
            _ => {
                diag.warning(format!(
                    "section '{}' has no units; considered uncatalogued",
                    section.id
                ));
                let x = cur.x;
                cur.text(x, UNCATALOGUED_MESSAGE, "body");
                cur.y += cfg.uncatalogued_spacing;
            }
        }
    } else {
        for group in &section.groups {
            place_group(&mut cur, group, &[], diag);
        }
    }

    let (counters, total_units) = state_counters(section);
    cur.y += cfg.legend.pre_spacing;
    for state in &state_keys {
        let swatch_y = cur.y;
        cur.commands.push(SvgCommand::Rect {
            x: cur.x,
            y: swatch_y - cfg.legend.square_baseline_offset,
            width: cfg.legend.square_size,
            height: cfg.legend.square_size,
            rx: 2.0,
            ry: 2.0,
            class: format!("square state-{state}"),
        });
        let x = cur.x;
        cur.note_rect(x, cfg.legend.square_size);

        let label = section.states.get(state).cloned().unwrap_or_default();
        let entry = if *state == 0 {
            // Baseline rows carry no counter.
            label
        } else {
            let tally = counters.get(state).copied().unwrap_or(StateTally {
                completed: 0,
                total: total_units,
            });
            let pct = if tally.total > 0 {
                tally.completed as f64 / tally.total as f64 * 100.0
            } else {
                0.0
            };
            format!(
                "{} ({}/{} {}, {:.1}%)",
                label, tally.completed, tally.total, section.unit.plural, pct
            )
        };
        let text_x = x + cfg.legend.square_size + cfg.legend.text_offset;
        cur.commands.push(SvgCommand::Text {
            x: text_x,
            y: swatch_y,
            class: "legend".to_string(),
            content: entry.clone(),
        });
        cur.note_text(text_x, &entry, "legend");
        cur.y += cfg.legend.spacing;
    }

    let height = cur.y + cfg.legend.padding_bottom;
    let min_width = cur.max_x;
    let mut commands = cur.commands;
    commands.insert(
        0,
        SvgCommand::Rect {
            x: 0.0,
            y: 0.0,
            width: canvas_width,
            height,
            rx: 0.0,
            ry: 0.0,
            class: "bg".to_string(),
        },
    );

    Ok(SectionLayout {
        commands,
        height,
        min_width,
    })
}

fn place_group(cur: &mut Cursor<'_>, group: &Group, path: &[String], diag: &mut Diagnostics) {
    let segment = if group.label().is_empty() {
        group.id()
    } else {
        group.label()
    };
    let mut current_path = path.to_vec();
    current_path.push(segment.to_string());

    match group {
        Group::Container { subgroups, .. } => {
            // Containers draw nothing themselves; their labels surface in
            // the leaf headers below.
            for sub in subgroups {
                place_group(cur, sub, &current_path, diag);
            }
        }
        Group::Leaf {
            id, total, units, ..
        } => {
            let header = current_path.join("/");
            let x = cur.x;
            cur.text(x, &header, "path");
            cur.y += cur.cfg.path_gap;
            if *total == 0 {
                // Zero declared capacity means "not yet tracked", which is
                // different from zero completed work.
                diag.warning(format!(
                    "group '{header}' has total=0; considered uncatalogued"
                ));
                cur.text(x, UNCATALOGUED_MESSAGE, "body");
                cur.y += cur.cfg.uncatalogued_spacing;
            } else {
                place_grid(cur, id, units, *total);
            }
        }
    }
}

fn place_grid(cur: &mut Cursor<'_>, group_id: &str, units: &BTreeMap<String, u32>, total: u32) {
    let grid = grid_commands(group_id, units, total, cur.x, cur.y, &cur.cfg.grid);
    let x = cur.x;
    cur.note_rect(x, grid.width);
    cur.commands.extend(grid.commands);
    cur.y += grid.height + cur.cfg.grid_post_spacing;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitName;

    fn flat_section() -> Section {
        let mut units = BTreeMap::new();
        units.insert("a".to_string(), 0);
        units.insert("b".to_string(), 1);
        units.insert("c".to_string(), 1);
        Section {
            id: "p1".to_string(),
            title: "Part 1".to_string(),
            unit: UnitName {
                name: "page".to_string(),
                plural: "pages".to_string(),
            },
            states: [(0, "todo".to_string()), (1, "done".to_string())]
                .into_iter()
                .collect(),
            final_state: Some(1),
            groups: Vec::new(),
            units: Some(units),
        }
    }

    fn layout(section: &Section, diag: &mut Diagnostics) -> SectionLayout {
        layout_section(
            section,
            500.0,
            &Theme::github_dark(),
            &LayoutConfig::default(),
            diag,
        )
        .unwrap()
    }

    fn texts(layout: &SectionLayout) -> Vec<String> {
        layout
            .commands
            .iter()
            .filter_map(|c| match c {
                SvgCommand::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn legend_reports_completion_for_flat_section() {
        let mut diag = Diagnostics::new();
        let layout = layout(&flat_section(), &mut diag);
        assert!(diag.is_empty());
        assert!(
            texts(&layout)
                .iter()
                .any(|t| t == "done (2/3 pages, 66.7%)"),
            "legend entry missing: {:?}",
            texts(&layout)
        );
    }

    #[test]
    fn stylesheet_samples_gradient_endpoints() {
        let mut diag = Diagnostics::new();
        let layout = layout(&flat_section(), &mut diag);
        let Some(SvgCommand::Style(css)) = layout
            .commands
            .iter()
            .find(|c| matches!(c, SvgCommand::Style(_)))
        else {
            panic!("no style command");
        };
        assert!(css.contains(".square.state-0 { fill: #161C23; }"));
        assert!(css.contains(".square.state-1 { fill: #39D255; }"));
    }

    #[test]
    fn single_state_uses_gradient_midpoint() {
        let mut section = flat_section();
        section.states = [(0, "only".to_string())].into_iter().collect();
        let mut diag = Diagnostics::new();
        let layout = layout(&section, &mut diag);
        let Some(SvgCommand::Style(css)) = layout.commands.iter().find(|c| matches!(c, SvgCommand::Style(_)))
        else {
            panic!("no style command");
        };
        assert!(css.contains(".square.state-0 { fill: #006E34; }"));
    }

    #[test]
    fn background_rect_comes_first_with_final_height() {
        let mut diag = Diagnostics::new();
        let layout = layout(&flat_section(), &mut diag);
        match layout.commands.first() {
            Some(SvgCommand::Rect {
                x,
                y,
                width,
                height,
                class,
                ..
            }) => {
                assert_eq!((*x, *y), (0.0, 0.0));
                assert_eq!(*width, 500.0);
                assert_eq!(*height, layout.height);
                assert_eq!(class, "bg");
            }
            other => panic!("expected background rect, got {other:?}"),
        }
    }

    #[test]
    fn zero_capacity_leaf_renders_uncatalogued_placeholder() {
        let mut section = flat_section();
        section.units = None;
        section.groups = vec![Group::Leaf {
            id: "g".to_string(),
            label: "Scrolls".to_string(),
            total: 0,
            units: BTreeMap::new(),
        }];
        let mut diag = Diagnostics::new();
        let layout = layout(&section, &mut diag);

        assert_eq!(diag.warnings().len(), 1);
        assert!(diag.warnings()[0].contains("total=0"));
        assert!(texts(&layout).iter().any(|t| t == UNCATALOGUED_MESSAGE));
        // No grid was opened; the only rects are the background and legend
        // swatches.
        assert!(
            !layout
                .commands
                .iter()
                .any(|c| matches!(c, SvgCommand::GroupOpen { .. }))
        );
    }

    #[test]
    fn empty_flat_section_renders_uncatalogued_placeholder() {
        let mut section = flat_section();
        section.units = Some(BTreeMap::new());
        let mut diag = Diagnostics::new();
        let layout = layout(&section, &mut diag);
        assert_eq!(diag.warnings().len(), 1);
        assert!(texts(&layout).iter().any(|t| t == UNCATALOGUED_MESSAGE));
    }

    #[test]
    fn leaf_headers_join_ancestor_labels() {
        let mut section = flat_section();
        section.units = None;
        section.groups = vec![Group::Container {
            id: "book".to_string(),
            label: "Book".to_string(),
            subgroups: vec![Group::Leaf {
                id: "ch1".to_string(),
                label: "Chapter 1".to_string(),
                total: 1,
                units: [("ch1-001".to_string(), 1)].into_iter().collect(),
            }],
        }];
        let mut diag = Diagnostics::new();
        let layout = layout(&section, &mut diag);
        assert!(texts(&layout).iter().any(|t| t == "Book/Chapter 1"));
    }

    #[test]
    fn min_width_tracks_long_headers() {
        let mut section = flat_section();
        section.units = None;
        let long_label = "An unreasonably long chapter label that needs room".to_string();
        section.groups = vec![Group::Leaf {
            id: "g".to_string(),
            label: long_label.clone(),
            total: 1,
            units: [("u1".to_string(), 0)].into_iter().collect(),
        }];
        let mut diag = Diagnostics::new();
        let cfg = LayoutConfig::default();
        let layout = layout_section(&section, 500.0, &Theme::github_dark(), &cfg, &mut diag).unwrap();
        let expected = cfg.margin
            + long_label.chars().count() as f32 * cfg.body_char_width
            + cfg.margin;
        assert!(layout.min_width >= expected);
    }

    #[test]
    fn title_is_opt_in() {
        let mut diag = Diagnostics::new();
        let without = layout(&flat_section(), &mut diag);
        assert!(!texts(&without).iter().any(|t| t == "Part 1"));

        let mut cfg = LayoutConfig::default();
        cfg.show_title = true;
        let with = layout_section(
            &flat_section(),
            500.0,
            &Theme::github_dark(),
            &cfg,
            &mut diag,
        )
        .unwrap();
        assert!(texts(&with).iter().any(|t| t == "Part 1"));
    }
}
