use crate::command::SvgCommand;
use anyhow::Result;
use std::path::Path;

/// Serializes an ordered command list into an SVG document.
///
/// Style payloads are gathered, wherever they appear, into a single embedded
/// `<style>` block ahead of the body; everything else is emitted in command
/// order. Text content and group attributes are escaped so arbitrary unit
/// ids and labels cannot corrupt the markup.
pub fn render_svg(commands: &[SvgCommand], width: f32, height: f32) -> String {
    let mut styles: Vec<&str> = Vec::new();
    let mut body = String::new();

    for command in commands {
        match command {
            SvgCommand::Style(css) => styles.push(css),
            SvgCommand::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
                class,
            } => {
                body.push_str(&format!(
                    "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" rx=\"{rx}\" ry=\"{ry}\" class=\"{class}\" />\n",
                ));
            }
            SvgCommand::Text {
                x,
                y,
                class,
                content,
            } => {
                body.push_str(&format!(
                    "<text x=\"{x}\" y=\"{y}\" class=\"{class}\">{}</text>\n",
                    escape_xml(content)
                ));
            }
            SvgCommand::GroupOpen { id, transform } => {
                let transform_attr = match transform {
                    Some(transform) => format!(" transform=\"{}\"", escape_xml(transform)),
                    None => String::new(),
                };
                body.push_str(&format!("<g id=\"{}\"{}>\n", escape_xml(id), transform_attr));
            }
            SvgCommand::GroupClose => body.push_str("</g>\n"),
            SvgCommand::Raw(fragment) => {
                body.push_str(fragment);
                body.push('\n');
            }
        }
    }

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n",
    ));
    if !styles.is_empty() {
        svg.push_str("<style>\n");
        for css in styles {
            svg.push_str(css);
            svg.push('\n');
        }
        svg.push_str("</style>\n");
    }
    svg.push_str(&body);
    svg.push_str("</svg>");
    svg
}

/// Writes the document, creating parent directories as needed. `None` prints
/// to stdout.
pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, width: f32, height: f32) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size =
        usvg::Size::from_wh(width, height).unwrap_or(usvg::Size::from_wh(500.0, 300.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_declares_dimensions_and_namespace() {
        let svg = render_svg(&[], 500.0, 120.0);
        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"500\" height=\"120\" viewBox=\"0 0 500 120\">"
        ));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn styles_merge_into_one_block_in_order() {
        let commands = vec![
            SvgCommand::Rect {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
                rx: 0.0,
                ry: 0.0,
                class: "bg".to_string(),
            },
            SvgCommand::Style(".a { fill: red; }".to_string()),
            SvgCommand::Style(".b { fill: blue; }".to_string()),
        ];
        let svg = render_svg(&commands, 100.0, 100.0);
        let style_start = svg.find("<style>").unwrap();
        let style_end = svg.find("</style>").unwrap();
        let block = &svg[style_start..style_end];
        assert!(block.contains(".a { fill: red; }\n.b { fill: blue; }"));
        // Body elements follow the stylesheet even when emitted first.
        assert!(svg.find("<rect").unwrap() > style_end);
    }

    #[test]
    fn text_content_is_escaped() {
        let commands = vec![SvgCommand::Text {
            x: 1.0,
            y: 2.0,
            class: "body".to_string(),
            content: "<b> & \"quotes\"".to_string(),
        }];
        let svg = render_svg(&commands, 100.0, 100.0);
        assert!(svg.contains("&lt;b&gt; &amp; &quot;quotes&quot;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn groups_open_and_close() {
        let commands = vec![
            SvgCommand::GroupOpen {
                id: "grid-g".to_string(),
                transform: Some("translate(4, 8)".to_string()),
            },
            SvgCommand::GroupClose,
        ];
        let svg = render_svg(&commands, 100.0, 100.0);
        assert!(svg.contains("<g id=\"grid-g\" transform=\"translate(4, 8)\">"));
        assert!(svg.contains("</g>"));
    }

    #[test]
    fn raw_fragments_pass_through_verbatim() {
        let commands = vec![SvgCommand::Raw("<circle cx=\"5\" cy=\"5\" r=\"3\" />".to_string())];
        let svg = render_svg(&commands, 100.0, 100.0);
        assert!(svg.contains("<circle cx=\"5\" cy=\"5\" r=\"3\" />"));
    }
}
