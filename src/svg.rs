//! SVG previews attached to color and component tool responses.
//!
//! Previews are small self-contained documents with fixed geometry so the
//! same input always yields the same bytes.

use crate::models::{ColorToken, ContrastResult};

pub const SVG_MIME: &str = "image/svg+xml";

const SWATCH: u32 = 64;
const GAP: u32 = 8;
const LABEL_HEIGHT: u32 = 36;
const MAX_SWATCHES: usize = 12;

/// Escape text for use in SVG content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn document(width: u32, height: u32, body: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\" font-family=\"ui-sans-serif, system-ui, sans-serif\">{body}</svg>",
        w = width,
        h = height,
        body = body
    )
}

/// A row of labelled swatches, at most twelve.
pub fn color_swatches(tokens: &[ColorToken]) -> String {
    let shown = &tokens[..tokens.len().min(MAX_SWATCHES)];
    let count = shown.len().max(1) as u32;
    let width = count * SWATCH + (count + 1) * GAP;
    let height = SWATCH + LABEL_HEIGHT + 2 * GAP;

    let mut body = String::new();
    for (i, token) in shown.iter().enumerate() {
        let x = GAP + i as u32 * (SWATCH + GAP);
        body.push_str(&format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{s}\" height=\"{s}\" rx=\"6\" fill=\"{fill}\" \
             stroke=\"#e5e7eb\"/>\
             <text x=\"{cx}\" y=\"{ty1}\" font-size=\"10\" text-anchor=\"middle\" fill=\"#111827\">{name}</text>\
             <text x=\"{cx}\" y=\"{ty2}\" font-size=\"9\" text-anchor=\"middle\" fill=\"#6b7280\">{hex}</text>",
            x = x,
            y = GAP,
            s = SWATCH,
            fill = escape(&token.hex),
            cx = x + SWATCH / 2,
            ty1 = GAP + SWATCH + 14,
            ty2 = GAP + SWATCH + 28,
            name = escape(&token.name),
            hex = escape(&token.hex),
        ));
    }
    document(width, height, &body)
}

/// One swatch with a caption, used for conversions.
pub fn color_swatch(fill: &str, caption: &str) -> String {
    let width = 200;
    let height = SWATCH + LABEL_HEIGHT;
    let body = format!(
        "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{s}\" rx=\"6\" fill=\"{fill}\"/>\
         <text x=\"{cx}\" y=\"{ty}\" font-size=\"12\" text-anchor=\"middle\" fill=\"#111827\">{caption}</text>",
        w = width,
        s = SWATCH,
        fill = escape(fill),
        cx = width / 2,
        ty = SWATCH + 22,
        caption = escape(caption),
    );
    document(width, height, &body)
}

/// Sample text in the foreground color over the background, with verdicts.
pub fn contrast_sample(result: &ContrastResult) -> String {
    let verdict = |passes: bool| if passes { "pass" } else { "fail" };
    let body = format!(
        "<rect x=\"0\" y=\"0\" width=\"320\" height=\"120\" rx=\"8\" fill=\"{bg}\" stroke=\"#e5e7eb\"/>\
         <text x=\"24\" y=\"58\" font-size=\"32\" font-weight=\"600\" fill=\"{fg}\">Aa</text>\
         <text x=\"96\" y=\"52\" font-size=\"16\" fill=\"{fg}\">The quick brown fox</text>\
         <text x=\"24\" y=\"98\" font-size=\"13\" fill=\"{fg}\">{ratio:.2}:1  AA {aa}  AAA {aaa}</text>",
        bg = escape(&result.background),
        fg = escape(&result.foreground),
        ratio = result.ratio,
        aa = verdict(result.wcag_aa.passes),
        aaa = verdict(result.wcag_aaa.passes),
    );
    document(320, 120, &body)
}

/// A rough sketch of a component variant: a filled box with its label.
pub fn component_sketch(component: &str, variant: &str, fill: &str, text: &str) -> String {
    let label = format!("{} · {}", component, variant);
    let body = format!(
        "<rect x=\"0\" y=\"0\" width=\"240\" height=\"80\" rx=\"8\" fill=\"#f9fafb\" stroke=\"#e5e7eb\"/>\
         <rect x=\"40\" y=\"20\" width=\"160\" height=\"40\" rx=\"6\" fill=\"{fill}\"/>\
         <text x=\"120\" y=\"45\" font-size=\"13\" text-anchor=\"middle\" fill=\"{text}\">{label}</text>",
        fill = escape(fill),
        text = escape(text),
        label = escape(&label),
    );
    document(240, 80, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TextSize, WcagVerdict};

    fn token(name: &str, hex: &str) -> ColorToken {
        ColorToken {
            name: name.to_string(),
            palette: "blue".to_string(),
            shade: 500,
            hex: hex.to_string(),
            rgb: String::new(),
            hsl: String::new(),
            rgba: String::new(),
            css_var: String::new(),
            tailwind_class: String::new(),
            usage: String::new(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn test_swatches_are_capped() {
        let tokens: Vec<ColorToken> = (0..20).map(|i| token(&format!("t{}", i), "#3b82f6")).collect();
        let svg = color_swatches(&tokens);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), MAX_SWATCHES);
        assert!(svg.contains("width=\"872\""));
    }

    #[test]
    fn test_contrast_sample_shows_verdicts() {
        let result = ContrastResult {
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            ratio: 21.0,
            wcag_aa: WcagVerdict {
                required: 4.5,
                passes: true,
            },
            wcag_aaa: WcagVerdict {
                required: 7.0,
                passes: true,
            },
            text_size: TextSize::Normal,
            recommendation: String::new(),
        };
        let svg = contrast_sample(&result);
        assert!(svg.contains("21.00:1  AA pass  AAA pass"));
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_sketch_escapes_labels() {
        let svg = component_sketch("card<x>", "default", "#ffffff", "#111827");
        assert!(svg.contains("card&lt;x&gt; · default"));
    }
}
