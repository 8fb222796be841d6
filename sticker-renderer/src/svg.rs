//! SVG markup helpers shared by the glyph rasterizer and the exporter.

use std::fmt::Write;

use sticker_core::Shadow;

/// Canvas `shadowBlur` is twice the Gaussian standard deviation.
pub(crate) fn blur_to_std_deviation(blur: f32) -> f32 {
    (blur / 2.0).max(0.0)
}

/// Append a `<filter>` definition producing the given drop shadow.
pub(crate) fn write_shadow_filter(svg: &mut String, id: &str, shadow: &Shadow) {
    let std_dev = blur_to_std_deviation(shadow.blur);
    let color = &shadow.color;
    let _ = write!(
        svg,
        "<filter id=\"{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\
         <feDropShadow dx=\"{}\" dy=\"{}\" stdDeviation=\"{std_dev}\" \
         flood-color=\"rgb({},{},{})\" flood-opacity=\"{}\"/></filter>",
        shadow.offset_x, shadow.offset_y, color.r, color.g, color.b, color.a,
    );
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
