mod grid;
mod section;

pub use grid::{GridLayout, grid_commands};
pub use section::{SectionLayout, UNCATALOGUED_MESSAGE, layout_section};
