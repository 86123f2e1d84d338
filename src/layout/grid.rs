use std::collections::BTreeMap;

use crate::command::SvgCommand;
use crate::config::GridConfig;

#[derive(Debug)]
pub struct GridLayout {
    pub commands: Vec<SvgCommand>,
    /// Vertical space consumed, gaps included; the caller adds its own
    /// spacing below the grid.
    pub height: f32,
    pub width: f32,
}

impl GridLayout {
    fn empty() -> Self {
        Self {
            commands: Vec::new(),
            height: 0.0,
            width: 0.0,
        }
    }
}

/// Lays out one leaf group as a row-major grid of rounded cells.
///
/// Cells follow the sorted unit ids; when no units are listed, `total`
/// placeholder cells are drawn instead (`<group-id>-NNN`, all baseline
/// state). Each cell's class carries its state (`square state-<N>`) so the
/// stylesheet resolves the fill. The requested column count clamps to
/// `[1, unit_count]`; zero units produce no commands at all.
pub fn grid_commands(
    group_id: &str,
    units: &BTreeMap<String, u32>,
    total: u32,
    origin_x: f32,
    origin_y: f32,
    cfg: &GridConfig,
) -> GridLayout {
    let unit_ids: Vec<String> = if units.is_empty() {
        (1..=total as usize)
            .map(|index| format!("{group_id}-{index:03}"))
            .collect()
    } else {
        units.keys().cloned().collect()
    };
    let cell_count = unit_ids.len();
    if cell_count == 0 {
        return GridLayout::empty();
    }

    let cols = cfg.cols.clamp(1, cell_count);
    let rows = cell_count.div_ceil(cols);

    let mut commands = Vec::with_capacity(cell_count + 2);
    commands.push(SvgCommand::GroupOpen {
        id: format!("grid-{group_id}"),
        transform: None,
    });
    for (index, unit_id) in unit_ids.iter().enumerate() {
        let state = units.get(unit_id).copied().unwrap_or(0);
        let col = index % cols;
        let row = index / cols;
        let x = origin_x + col as f32 * (cfg.cell_size + cfg.gap);
        let y = origin_y + row as f32 * (cfg.cell_size + cfg.gap);
        commands.push(SvgCommand::Rect {
            x,
            y,
            width: cfg.cell_size,
            height: cfg.cell_size,
            rx: cfg.rx,
            ry: cfg.ry,
            class: format!("square state-{state}"),
        });
        if cfg.show_unit_ids {
            commands.push(SvgCommand::Text {
                x: x + cfg.cell_size / 2.0,
                y: y + cfg.cell_size + cfg.label_offset,
                class: "body".to_string(),
                content: unit_id.clone(),
            });
        }
    }
    commands.push(SvgCommand::GroupClose);

    GridLayout {
        commands,
        height: rows as f32 * cfg.cell_size + (rows - 1) as f32 * cfg.gap,
        width: cols as f32 * cfg.cell_size + (cols - 1) as f32 * cfg.gap,
    }
}
