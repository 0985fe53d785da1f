//! Core data models used throughout Design Harness.
//!
//! These types represent the corpus sections, color values, and search
//! results that flow between the catalog, the engines, and the tool router.
//! Everything serializes with camelCase keys, matching the tool protocol.

use serde::{Deserialize, Serialize};

/// Number of addressable corpus sections. Sections are numbered `1..=SECTION_COUNT`.
pub const SECTION_COUNT: u8 = 35;

/// A numbered unit of the design-system corpus.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub number: u8,
    pub title: String,
    /// Prose only: headings and paragraphs, without code fences or table rows.
    pub content: String,
    pub code_blocks: Vec<CodeBlock>,
    pub tables: Vec<Table>,
    pub metadata: SectionMetadata,
}

impl Section {
    /// Rough in-memory footprint, used for cache diagnostics.
    pub fn size_estimate(&self) -> usize {
        let code: usize = self.code_blocks.iter().map(|c| c.code.len()).sum();
        let tables: usize = self
            .tables
            .iter()
            .map(|t| {
                t.headers.iter().map(String::len).sum::<usize>()
                    + t.rows.iter().flatten().map(String::len).sum::<usize>()
            })
            .sum();
        self.title.len() + self.content.len() + code + tables
    }

    /// Canonical URI for this section.
    pub fn uri(&self) -> String {
        format!("design://sections/{}", self.number)
    }
}

/// Derived facts about a section's source.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionMetadata {
    /// File (or embedded document) the section was read from.
    pub file: String,
    pub word_count: usize,
    /// Sub-headings in document order.
    pub headings: Vec<String>,
    /// SHA-256 of the raw section markdown.
    pub content_hash: String,
}

/// A fenced code block, owned by its section.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub id: String,
    pub language: String,
    pub code: String,
    /// 1-based line of the opening fence within the section.
    pub line_number: usize,
}

/// A markdown table, owned by its section.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    /// Nearest heading above the table, if any.
    pub caption: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Title-only index entry; produced without loading section bodies.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionEntry {
    pub section: u8,
    pub title: String,
    pub file: String,
}

/// Listing entry for the resource protocol.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// A palette color expressed in every notation the engine supports.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    pub name: String,
    pub palette: String,
    pub shade: u16,
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub rgba: String,
    pub css_var: String,
    pub tailwind_class: String,
    pub usage: String,
}

/// Text size category for WCAG thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Normal,
    Large,
}

impl TextSize {
    /// Every spelling [`TextSize::parse`] accepts.
    pub const ACCEPTED: &'static [&'static str] =
        &["normal", "large", "small", "body", "big", "heading"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "small" | "body" => Some(Self::Normal),
            "large" | "big" | "heading" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Pass/fail verdict for one WCAG level.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct WcagVerdict {
    pub required: f64,
    pub passes: bool,
}

/// Outcome of a contrast check between two colors.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContrastResult {
    pub foreground: String,
    pub background: String,
    /// Rounded to two decimals; always in `[1, 21]`.
    pub ratio: f64,
    #[serde(rename = "wcagAA")]
    pub wcag_aa: WcagVerdict,
    #[serde(rename = "wcagAAA")]
    pub wcag_aaa: WcagVerdict,
    pub text_size: TextSize,
    pub recommendation: String,
}

/// A ranked search hit. Recomputed per query, never cached.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub uri: String,
    /// Relevance in `[0.0, 1.0]`; 1.0 is an exact title match.
    pub relevance_score: f64,
}

/// One observed tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub timestamp_ms: i64,
    pub duration_ms: f64,
}
