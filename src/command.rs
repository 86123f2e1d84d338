/// One abstract drawing instruction.
///
/// The layout stage emits an ordered list of these and the serializer turns
/// them into SVG, which keeps geometry decisions out of the output format.
/// `Raw` passes a fragment through untouched so callers can inject markup
/// the closed set does not cover.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgCommand {
    /// CSS appended verbatim to the document's embedded stylesheet.
    Style(String),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
        ry: f32,
        class: String,
    },
    Text {
        x: f32,
        y: f32,
        class: String,
        content: String,
    },
    GroupOpen {
        id: String,
        transform: Option<String>,
    },
    GroupClose,
    Raw(String),
}
