//! Color parsing, conversion, and WCAG contrast evaluation.
//!
//! [`Color`] is a plain sRGB value with alpha; it never changes once built,
//! and conversions produce new strings or values. [`ColorEngine`] adds the
//! token corpus on top: it resolves token names (`blue-500`, `bg-blue-500`,
//! `var(--color-blue-500)`) and semantic roles (`primary`, `danger`) and maps
//! arbitrary colors back onto the nearest palette token.
//!
//! # Contrast
//!
//! Relative luminance follows WCAG 2.x:
//!
//! ```text
//! c  = channel / 255
//! c' = c ≤ 0.03928 ? c / 12.92 : ((c + 0.055) / 1.055)^2.4
//! L  = 0.2126 R' + 0.7152 G' + 0.0722 B'
//! ratio = (L_lighter + 0.05) / (L_darker + 0.05)      ∈ [1, 21]
//! ```
//!
//! | Level | Normal text | Large text |
//! |-------|-------------|------------|
//! | AA    | 4.5         | 3.0        |
//! | AAA   | 7.0         | 4.5        |

use std::str::FromStr;
use std::sync::Arc;

use crate::corpus::DesignTokens;
use crate::error::{DesignError, Result};
use crate::models::{ColorToken, ContrastResult, TextSize, WcagVerdict};

/// An sRGB color with straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a literal color: hex, `rgb()/rgba()`, `hsl()/hsla()`, or one of
    /// `white`, `black`, `transparent`. Token names are handled by
    /// [`ColorEngine::parse`].
    pub fn parse_literal(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        match s.as_str() {
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            "transparent" => return Some(Self { a: 0.0, ..Self::BLACK }),
            _ => {}
        }
        if s.contains('(') {
            return parse_functional(&s);
        }
        Self::from_hex(&s)
    }

    /// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`; the `#` is optional for the long forms.
    pub fn from_hex(input: &str) -> Option<Self> {
        let s = input.trim();
        let (digits, had_hash) = match s.strip_prefix('#') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match digits.len() {
            3 | 4 if had_hash => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return None,
        };
        let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        let a = if expanded.len() == 8 {
            f64::from(byte(6)?) / 255.0
        } else {
            1.0
        };
        Some(Self {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a,
        })
    }

    /// Build from HSL with `h` in degrees and `s`, `l` in `[0, 1]`.
    pub fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let h = h.rem_euclid(360.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_byte(r1),
            g: to_byte(g1),
            b: to_byte(b1),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// `(h°, s, l)` with `s` and `l` in `[0, 1]`.
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;
        if d == 0.0 {
            return (0.0, 0.0, l);
        }
        let s = d / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / d + 2.0)
        } else {
            60.0 * ((r - g) / d + 4.0)
        };
        (h, s, l)
    }

    /// Lowercase hex; eight digits only when the color is translucent.
    pub fn to_hex(&self) -> String {
        if self.a < 1.0 {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r,
                self.g,
                self.b,
                (self.a * 255.0).round() as u8
            )
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }

    pub fn to_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn to_rgba_string(&self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_alpha(alpha)
        )
    }

    pub fn to_hsl_string(&self) -> String {
        let (h, s, l) = self.to_hsl();
        format!(
            "hsl({}, {}%, {}%)",
            h.round() as i64 % 360,
            (s * 100.0).round(),
            (l * 100.0).round()
        )
    }

    pub fn to_hsla_string(&self, alpha: f64) -> String {
        let (h, s, l) = self.to_hsl();
        format!(
            "hsla({}, {}%, {}%, {})",
            h.round() as i64 % 360,
            (s * 100.0).round(),
            (l * 100.0).round(),
            format_alpha(alpha)
        )
    }

    /// WCAG relative luminance in `[0, 1]`. Alpha is ignored.
    pub fn relative_luminance(&self) -> f64 {
        fn linearize(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    fn distance_sq(&self, other: &Color) -> i32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        dr * dr + dg * dg + db * db
    }

    fn same_rgb(&self, other: &Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

/// Contrast ratio between two colors; symmetric and in `[1, 21]`.
pub fn contrast_ratio(a: &Color, b: &Color) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WcagLevel {
    AA,
    AAA,
}

impl WcagLevel {
    /// Minimum ratio for this level and text size.
    pub fn threshold(self, size: TextSize) -> f64 {
        match (self, size) {
            (WcagLevel::AA, TextSize::Normal) => 4.5,
            (WcagLevel::AA, TextSize::Large) => 3.0,
            (WcagLevel::AAA, TextSize::Normal) => 7.0,
            (WcagLevel::AAA, TextSize::Large) => 4.5,
        }
    }
}

impl FromStr for WcagLevel {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AA" => Ok(Self::AA),
            "AAA" => Ok(Self::AAA),
            _ => Err(DesignError::invalid_choice(
                format!("unknown WCAG level: '{}'", s),
                &["AA", "AAA"],
            )),
        }
    }
}

/// Output notation for [`ColorEngine::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    CssVar,
    Tailwind,
}

impl ColorFormat {
    pub const NAMES: &'static [&'static str] =
        &["hex", "rgb", "rgba", "hsl", "hsla", "css-var", "tailwind"];

    /// Every spelling [`FromStr`] accepts: the names followed by their aliases.
    pub const ACCEPTED: &'static [&'static str] = &[
        "hex", "rgb", "rgba", "hsl", "hsla", "css-var", "tailwind", "cssvar", "css", "var", "tw",
    ];
}

impl FromStr for ColorFormat {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "rgb" => Ok(Self::Rgb),
            "rgba" => Ok(Self::Rgba),
            "hsl" => Ok(Self::Hsl),
            "hsla" => Ok(Self::Hsla),
            "css-var" | "cssvar" | "css" | "var" => Ok(Self::CssVar),
            "tailwind" | "tw" => Ok(Self::Tailwind),
            _ => Err(DesignError::invalid_choice(
                format!("unsupported color format: '{}'", s),
                Self::NAMES,
            )),
        }
    }
}

/// Token-aware color operations.
#[derive(Clone)]
pub struct ColorEngine {
    tokens: Arc<DesignTokens>,
}

impl ColorEngine {
    pub fn new(tokens: Arc<DesignTokens>) -> Self {
        Self { tokens }
    }

    /// Parse any supported notation, token names and semantic roles included.
    pub fn parse(&self, input: &str) -> Result<Color> {
        if let Some((palette, shade)) = self.resolve_token(input) {
            if let Some(color) = self
                .tokens
                .hex(&palette, shade)
                .and_then(Color::from_hex)
            {
                return Ok(color);
            }
        }
        Color::parse_literal(input).ok_or_else(|| DesignError::invalid_color(input))
    }

    /// Resolve a token reference to `(palette, shade)`.
    ///
    /// Accepts `blue-500`, `blue.500`, `blue/500`, `blue 500`, utility forms
    /// (`bg-blue-500`, `text-blue-500`), CSS variables
    /// (`var(--color-blue-500)`), semantic roles (`primary`) and bare palette
    /// names, which mean shade 500.
    pub fn resolve_token(&self, input: &str) -> Option<(String, u16)> {
        let mut s = input.trim().to_ascii_lowercase();
        if let Some(inner) = s.strip_prefix("var(").and_then(|r| r.strip_suffix(')')) {
            s = inner.trim().to_string();
        }
        if let Some(rest) = s.strip_prefix("--color-") {
            s = rest.to_string();
        }

        if let Some(target) = self.tokens.semantic.get(&s) {
            return self.resolve_token(target);
        }

        for prefix in ["bg-", "text-", "border-", "ring-", "fill-", "stroke-"] {
            if let Some(rest) = s.strip_prefix(prefix) {
                if self.split_token(rest).is_some() {
                    s = rest.to_string();
                    break;
                }
            }
        }
        self.split_token(&s)
    }

    fn split_token(&self, s: &str) -> Option<(String, u16)> {
        if self.tokens.colors.contains_key(s) {
            return Some((s.to_string(), 500));
        }
        let (palette, shade) = s.rsplit_once(['-', '.', '/', ' '])?;
        let shade: u16 = shade.trim().parse().ok()?;
        let palette = palette.trim();
        self.tokens.hex(palette, shade)?;
        Some((palette.to_string(), shade))
    }

    /// Full token description, or `None` when the palette/shade does not exist.
    pub fn token(&self, palette: &str, shade: u16) -> Option<ColorToken> {
        let hex = self.tokens.hex(palette, shade)?;
        let color = Color::from_hex(hex)?;
        Some(ColorToken {
            name: format!("{}-{}", palette, shade),
            palette: palette.to_string(),
            shade,
            hex: color.to_hex(),
            rgb: color.to_rgb_string(),
            hsl: color.to_hsl_string(),
            rgba: color.to_rgba_string(1.0),
            css_var: format!("var(--color-{}-{})", palette, shade),
            tailwind_class: format!("bg-{}-{}", palette, shade),
            usage: shade_usage(shade).to_string(),
        })
    }

    /// Palette token closest to `color` by RGB distance (first wins on ties).
    pub fn nearest_token(&self, color: &Color) -> Option<ColorToken> {
        let mut best: Option<(i32, &str, u16)> = None;
        for (palette, shade, hex) in self.tokens.iter_colors() {
            let Some(candidate) = Color::from_hex(hex) else {
                continue;
            };
            let d = candidate.distance_sq(color);
            if best.map_or(true, |(bd, _, _)| d < bd) {
                best = Some((d, palette, shade));
            }
        }
        best.and_then(|(_, palette, shade)| self.token(palette, shade))
    }

    /// Look up tokens by name, role, palette fragment, or literal color.
    ///
    /// Returns an empty list when nothing matches. With `wcag_level`, only
    /// tokens that reach that level for normal text on white or on black are
    /// kept.
    pub fn find_color(&self, query: &str, wcag_level: Option<&str>) -> Result<Vec<ColorToken>> {
        let q = query.trim().to_ascii_lowercase();
        if q.is_empty() {
            return Err(DesignError::invalid("query must not be empty"));
        }
        let level = wcag_level.map(WcagLevel::from_str).transpose()?;

        let mut matches: Vec<ColorToken> = Vec::new();
        if let Some((palette, shade)) = self.resolve_token(&q).filter(|_| !self.is_bare_palette(&q))
        {
            matches.extend(self.token(&palette, shade));
        } else if let Some(color) = Color::parse_literal(&q) {
            for (palette, shade, hex) in self.tokens.iter_colors() {
                if Color::from_hex(hex).is_some_and(|c| c.same_rgb(&color)) {
                    matches.extend(self.token(palette, shade));
                }
            }
        } else {
            for (palette, shade, _) in self.tokens.iter_colors() {
                let name = format!("{}-{}", palette, shade);
                if palette.contains(q.as_str()) || name.contains(q.as_str()) {
                    matches.extend(self.token(palette, shade));
                }
            }
        }

        if let Some(level) = level {
            let required = level.threshold(TextSize::Normal);
            matches.retain(|t| {
                Color::from_hex(&t.hex).is_some_and(|c| {
                    contrast_ratio(&c, &Color::WHITE) >= required
                        || contrast_ratio(&c, &Color::BLACK) >= required
                })
            });
        }
        Ok(matches)
    }

    fn is_bare_palette(&self, q: &str) -> bool {
        self.tokens.colors.contains_key(q)
    }

    /// Convert any supported notation into `to_format`.
    ///
    /// `opacity` must lie in `[0, 1]`; it replaces the alpha channel for
    /// `rgba` and `hsla` and is ignored by the other formats. `css-var` and
    /// `tailwind` map to the exact or nearest palette token.
    ///
    /// Output is normalized rather than echoed: hex is lowercase with six
    /// digits (eight when alpha is below 1), so `#3B82F6` becomes `#3b82f6`
    /// and `#fff` becomes `#ffffff`.
    pub fn convert(&self, input: &str, to_format: &str, opacity: Option<f64>) -> Result<String> {
        let format = ColorFormat::from_str(to_format)?;
        if let Some(o) = opacity {
            if !(0.0..=1.0).contains(&o) {
                return Err(DesignError::invalid(format!(
                    "opacity must be between 0 and 1, got {}",
                    o
                )));
            }
        }
        let color = self.parse(input)?;
        let alpha = opacity.unwrap_or(color.a);

        let out = match format {
            ColorFormat::Hex => color.to_hex(),
            ColorFormat::Rgb => color.to_rgb_string(),
            ColorFormat::Rgba => color.to_rgba_string(alpha),
            ColorFormat::Hsl => color.to_hsl_string(),
            ColorFormat::Hsla => color.to_hsla_string(alpha),
            ColorFormat::CssVar | ColorFormat::Tailwind => {
                let token = self
                    .nearest_token(&color)
                    .ok_or_else(|| DesignError::not_found("design://tokens/colors"))?;
                if format == ColorFormat::CssVar {
                    token.css_var
                } else {
                    token.name
                }
            }
        };
        Ok(out)
    }

    pub fn contrast_ratio(&self, foreground: &str, background: &str) -> Result<f64> {
        Ok(contrast_ratio(
            &self.parse(foreground)?,
            &self.parse(background)?,
        ))
    }

    pub fn is_wcag_aa(&self, foreground: &str, background: &str, size: TextSize) -> Result<bool> {
        Ok(self.contrast_ratio(foreground, background)? >= WcagLevel::AA.threshold(size))
    }

    pub fn is_wcag_aaa(&self, foreground: &str, background: &str, size: TextSize) -> Result<bool> {
        Ok(self.contrast_ratio(foreground, background)? >= WcagLevel::AAA.threshold(size))
    }

    /// Full contrast report with a recommendation.
    pub fn validate_contrast(
        &self,
        foreground: &str,
        background: &str,
        size: TextSize,
    ) -> Result<ContrastResult> {
        let fg = self.parse(foreground)?;
        let bg = self.parse(background)?;
        let ratio = contrast_ratio(&fg, &bg);

        let aa_required = WcagLevel::AA.threshold(size);
        let aaa_required = WcagLevel::AAA.threshold(size);
        let passes_aa = ratio >= aa_required;
        let passes_aaa = ratio >= aaa_required;
        let size_label = match size {
            TextSize::Normal => "normal",
            TextSize::Large => "large",
        };

        let recommendation = if passes_aaa {
            format!(
                "Excellent contrast ({:.2}:1). Passes WCAG AAA for {} text.",
                ratio, size_label
            )
        } else if passes_aa {
            format!(
                "Passes WCAG AA for {} text. Increase contrast to {}:1 to reach AAA.",
                size_label, aaa_required
            )
        } else {
            let mut text = format!(
                "Fails WCAG AA for {} text (needs {}:1, got {:.2}:1).",
                size_label, aa_required, ratio
            );
            if let Some((token, suggested)) = self.suggest_foreground(&fg, &bg, aa_required) {
                text.push_str(&format!(
                    " Try {} ({}) as the foreground, which reaches {:.2}:1.",
                    token.name, token.hex, suggested
                ));
            }
            text
        };

        Ok(ContrastResult {
            foreground: fg.to_hex(),
            background: bg.to_hex(),
            ratio: round2(ratio),
            wcag_aa: WcagVerdict {
                required: aa_required,
                passes: passes_aa,
            },
            wcag_aaa: WcagVerdict {
                required: aaa_required,
                passes: passes_aaa,
            },
            text_size: size,
            recommendation,
        })
    }

    /// Shade of the foreground's palette that meets `required` against `bg`
    /// with the smallest change in luminance.
    fn suggest_foreground(
        &self,
        fg: &Color,
        bg: &Color,
        required: f64,
    ) -> Option<(ColorToken, f64)> {
        let palette = self.nearest_token(fg)?.palette;
        let shades = self.tokens.colors.get(&palette)?;
        let fg_lum = fg.relative_luminance();

        shades
            .iter()
            .filter_map(|(shade, hex)| {
                let c = Color::from_hex(hex)?;
                let ratio = contrast_ratio(&c, bg);
                (ratio >= required).then(|| (*shade, ratio, (c.relative_luminance() - fg_lum).abs()))
            })
            .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .and_then(|(shade, ratio, _)| Some((self.token(&palette, shade)?, ratio)))
    }
}

fn shade_usage(shade: u16) -> &'static str {
    match shade {
        0..=100 => "Backgrounds and subtle fills",
        101..=300 => "Borders, dividers and disabled surfaces",
        301..=500 => "Icons, accents and large text",
        501..=700 => "Primary actions and body text on light backgrounds",
        _ => "Headings and high-emphasis text",
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn format_alpha(alpha: f64) -> String {
    let rounded = round2(alpha.clamp(0.0, 1.0));
    let mut s = format!("{:.2}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

fn parse_functional(s: &str) -> Option<Color> {
    let (name, rest) = s.split_once('(')?;
    let inner = rest.trim().strip_suffix(')')?;
    let (main, slash_alpha) = match inner.split_once('/') {
        Some((m, a)) => (m, Some(a.trim())),
        None => (inner, None),
    };
    let parts: Vec<&str> = main
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let alpha_text = match (parts.len(), slash_alpha) {
        (3, a) => a,
        (4, None) => Some(parts[3]),
        _ => return None,
    };
    let alpha = match alpha_text {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };

    match name.trim() {
        "rgb" | "rgba" => Some(Color {
            r: parse_channel(parts[0])?,
            g: parse_channel(parts[1])?,
            b: parse_channel(parts[2])?,
            a: alpha,
        }),
        "hsl" | "hsla" => {
            let h: f64 = parts[0].trim_end_matches("deg").parse().ok()?;
            let s = parse_unit_percent(parts[1])?;
            let l = parse_unit_percent(parts[2])?;
            Some(Color::from_hsl(h, s, l, alpha))
        }
        _ => None,
    }
}

fn parse_channel(s: &str) -> Option<u8> {
    let value = if let Some(pct) = s.strip_suffix('%') {
        let p: f64 = pct.parse().ok()?;
        if !(0.0..=100.0).contains(&p) {
            return None;
        }
        p * 2.55
    } else {
        let v: f64 = s.parse().ok()?;
        if !(0.0..=255.0).contains(&v) {
            return None;
        }
        v
    };
    Some(value.round() as u8)
}

fn parse_alpha(s: &str) -> Option<f64> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0,
        None => s.parse::<f64>().ok()?,
    };
    (0.0..=1.0).contains(&value).then_some(value)
}

fn parse_unit_percent(s: &str) -> Option<f64> {
    let p: f64 = s.trim_end_matches('%').parse().ok()?;
    (0.0..=100.0).contains(&p).then_some(p / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;

    fn engine() -> ColorEngine {
        ColorEngine::new(Arc::new(Corpus::embedded().unwrap().tokens))
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("000000"), Some(Color::BLACK));
        let c = Color::from_hex("#3B82F680").unwrap();
        assert_eq!((c.r, c.g, c.b), (59, 130, 246));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(Color::from_hex("fff"), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
    }

    #[test]
    fn test_functional_forms() {
        assert_eq!(
            Color::parse_literal("rgb(59, 130, 246)"),
            Some(Color::rgb(59, 130, 246))
        );
        assert_eq!(
            Color::parse_literal("rgb(59 130 246)"),
            Some(Color::rgb(59, 130, 246))
        );
        let c = Color::parse_literal("rgba(0, 0, 0, 0.5)").unwrap();
        assert!((c.a - 0.5).abs() < 1e-9);
        let c = Color::parse_literal("rgb(0 0 0 / 25%)").unwrap();
        assert!((c.a - 0.25).abs() < 1e-9);
        assert_eq!(
            Color::parse_literal("hsl(0, 100%, 50%)"),
            Some(Color::rgb(255, 0, 0))
        );
        assert_eq!(Color::parse_literal("rgb(300, 0, 0)"), None);
        assert_eq!(Color::parse_literal("rgb(1, 2)"), None);
        assert_eq!(Color::parse_literal("cmyk(1, 2, 3, 4)"), None);
    }

    #[test]
    fn test_hsl_round_trip_is_close() {
        let c = Color::rgb(59, 130, 246);
        let (h, s, l) = c.to_hsl();
        let back = Color::from_hsl(h, s, l, 1.0);
        assert!(back.distance_sq(&c) <= 3);
        assert_eq!(c.to_hsl_string(), "hsl(217, 91%, 60%)");
    }

    #[test]
    fn test_rgb_hex_round_trip() {
        let e = engine();
        for hex in ["#3b82f6", "#000000", "#ffffff", "#0d9488", "#fbbf24"] {
            let rgb = e.convert(hex, "rgb", None).unwrap();
            assert_eq!(e.convert(&rgb, "hex", None).unwrap(), hex);
        }
    }

    #[test]
    fn test_contrast_extremes_and_symmetry() {
        let ratio = contrast_ratio(&Color::BLACK, &Color::WHITE);
        assert!((ratio - 21.0).abs() < 1e-9);
        assert_eq!(ratio, contrast_ratio(&Color::WHITE, &Color::BLACK));
        let blue = Color::rgb(59, 130, 246);
        assert_eq!(contrast_ratio(&blue, &blue), 1.0);
    }

    #[test]
    fn test_wcag_thresholds() {
        let e = engine();
        assert!(e.is_wcag_aa("#000000", "#FFFFFF", TextSize::Normal).unwrap());
        assert!(e.is_wcag_aaa("#000000", "#FFFFFF", TextSize::Normal).unwrap());
        // #767676 on white is the classic 4.54:1 boundary case
        assert!(e.is_wcag_aa("#767676", "#ffffff", TextSize::Normal).unwrap());
        assert!(!e.is_wcag_aaa("#767676", "#ffffff", TextSize::Normal).unwrap());
        assert!(e.is_wcag_aaa("#767676", "#ffffff", TextSize::Large).unwrap());
        assert!(!e.is_wcag_aa("#999999", "#ffffff", TextSize::Normal).unwrap());
        assert!(e.is_wcag_aa("#949494", "#ffffff", TextSize::Large).unwrap());
    }

    #[test]
    fn test_token_resolution() {
        let e = engine();
        for name in [
            "blue-500",
            "blue.500",
            "bg-blue-500",
            "text-blue-500",
            "var(--color-blue-500)",
            "BLUE-500",
            "blue",
        ] {
            assert_eq!(
                e.parse(name).unwrap(),
                Color::rgb(59, 130, 246),
                "failed for {}",
                name
            );
        }
        assert_eq!(e.parse("primary").unwrap().to_hex(), "#2563eb");
        assert!(e.parse("blue-550").is_err());
    }

    #[test]
    fn test_malformed_input_fails_fast() {
        let e = engine();
        let err = e.convert("not-a-color", "hex", None).unwrap_err();
        assert_eq!(err.code(), "invalid_color");
        let err = e.contrast_ratio("#12", "#fff").unwrap_err();
        assert_eq!(err.code(), "invalid_color");
    }

    #[test]
    fn test_convert_formats() {
        let e = engine();
        assert_eq!(
            e.convert("#3b82f6", "rgba", Some(0.5)).unwrap(),
            "rgba(59, 130, 246, 0.5)"
        );
        assert_eq!(
            e.convert("#3b82f6", "rgba", None).unwrap(),
            "rgba(59, 130, 246, 1)"
        );
        assert_eq!(
            e.convert("#3b82f6", "hsla", Some(0.25)).unwrap(),
            "hsla(217, 91%, 60%, 0.25)"
        );
        assert_eq!(
            e.convert("#3b82f6", "css-var", None).unwrap(),
            "var(--color-blue-500)"
        );
        assert_eq!(e.convert("#3a81f5", "tailwind", None).unwrap(), "blue-500");
        assert_eq!(e.convert("rgb(255, 255, 255)", "HEX", None).unwrap(), "#ffffff");
    }

    #[test]
    fn test_convert_hex_is_normalized() {
        let e = engine();
        assert_eq!(e.convert("#3B82F6", "hex", None).unwrap(), "#3b82f6");
        assert_eq!(e.convert("#fff", "hex", None).unwrap(), "#ffffff");
        assert_eq!(e.convert("#FFF", "HEX", None).unwrap(), "#ffffff");
    }

    #[test]
    fn test_convert_rejects_bad_opacity_and_format() {
        let e = engine();
        let err = e.convert("#3b82f6", "rgba", Some(1.5)).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        let err = e.convert("#3b82f6", "hex", Some(-0.1)).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        // In-range opacity is ignored by formats without alpha
        assert_eq!(e.convert("#3b82f6", "hex", Some(0.3)).unwrap(), "#3b82f6");
        let err = e.convert("#3b82f6", "cmyk", None).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[test]
    fn test_find_color_queries() {
        let e = engine();
        let blues = e.find_color("blue", None).unwrap();
        assert_eq!(blues.len(), 10);
        assert!(blues.iter().all(|t| t.palette == "blue"));

        let exact = e.find_color("blue-600", None).unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].hex, "#2563eb");
        assert_eq!(exact[0].css_var, "var(--color-blue-600)");
        assert_eq!(exact[0].tailwind_class, "bg-blue-600");

        let literal = e.find_color("#16a34a", None).unwrap();
        assert_eq!(literal[0].name, "green-600");

        let role = e.find_color("danger", None).unwrap();
        assert_eq!(role[0].name, "red-600");

        assert!(e.find_color("chartreuse", None).unwrap().is_empty());
        assert!(e.find_color("#123456", None).unwrap().is_empty());
    }

    #[test]
    fn test_find_color_wcag_filter() {
        let e = engine();
        let all = e.find_color("gray", None).unwrap();
        let aaa = e.find_color("gray", Some("AAA")).unwrap();
        assert!(aaa.len() < all.len());
        for token in &aaa {
            let c = Color::from_hex(&token.hex).unwrap();
            assert!(
                contrast_ratio(&c, &Color::WHITE) >= 7.0
                    || contrast_ratio(&c, &Color::BLACK) >= 7.0
            );
        }
        assert!(e.find_color("gray", Some("A")).is_err());
    }

    #[test]
    fn test_validate_contrast_recommendations() {
        let e = engine();
        let best = e.validate_contrast("#000", "#fff", TextSize::Normal).unwrap();
        assert_eq!(best.ratio, 21.0);
        assert!(best.wcag_aaa.passes);
        assert!(best.recommendation.contains("AAA"));

        let weak = e
            .validate_contrast("amber-400", "white", TextSize::Normal)
            .unwrap();
        assert!(!weak.wcag_aa.passes);
        assert!(weak.recommendation.contains("Try amber-"));
        assert_eq!(weak.foreground, "#fbbf24");
    }

    #[test]
    fn test_format_alpha() {
        assert_eq!(format_alpha(1.0), "1");
        assert_eq!(format_alpha(0.5), "0.5");
        assert_eq!(format_alpha(0.333), "0.33");
        assert_eq!(format_alpha(0.0), "0");
    }
}
