#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod command;
pub mod config;
pub mod counters;
pub mod diagnostics;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod render;
pub mod theme;

pub use command::SvgCommand;
pub use config::{Config, GridConfig, LayoutConfig, LegendConfig, RenderConfig};
pub use counters::{StateTally, state_counters};
pub use diagnostics::Diagnostics;
pub use layout::{SectionLayout, layout_section};
pub use model::{Group, Section, UnitName};
pub use normalize::normalize;
pub use render::render_svg;
pub use theme::Theme;

#[cfg(feature = "cli")]
pub use cli::run;
