//! The static design-system corpus.
//!
//! The corpus has two halves:
//!
//! - **Structured data**: design tokens, component specs, UX patterns and
//!   guides, embedded as JSON and parsed once into a [`Corpus`].
//! - **Sections**: 35 numbered markdown sections, served by a
//!   [`SectionSource`] and parsed on demand into [`Section`]s by
//!   [`parse_section`].
//!
//! Two section sources ship with the crate: [`EmbeddedSource`] (the
//! `corpus/design-system.md` document compiled into the binary, one
//! `## N. Title` heading per section) and [`DirectorySource`] (a directory of
//! `NN-slug.md` files, selected with `[corpus].dir`).
//!
//! # Section markdown
//!
//! ```text
//! ## 11. Buttons            ← title (number prefix stripped)
//! Prose …                   ← content
//! ### Variants              ← sub-heading, also a table caption
//! | Variant | Classes |     ← table: header row
//! |---|---|                 ←        separator row
//! | primary | bg-blue-600 | ←        data rows
//! ```tsx                    ← code block (language "tsx")
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::models::{CodeBlock, Section, SectionEntry, SectionMetadata, Table, SECTION_COUNT};

const EMBEDDED_DOCUMENT: &str = include_str!("../corpus/design-system.md");
const EMBEDDED_NAME: &str = "design-system.md";
const TOKENS_JSON: &str = include_str!("../corpus/tokens.json");
const COMPONENTS_JSON: &str = include_str!("../corpus/components.json");
const PATTERNS_JSON: &str = include_str!("../corpus/patterns.json");
const GUIDES_JSON: &str = include_str!("../corpus/guides.json");

// ═══════════════════════════════════════════════════════════════════════
// Structured data
// ═══════════════════════════════════════════════════════════════════════

/// The token set: palettes, semantic roles, and scale values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    pub version: String,
    /// palette → shade → lowercase `#rrggbb`.
    pub colors: BTreeMap<String, BTreeMap<u16, String>>,
    /// role (`primary`, `danger`, …) → token name (`blue-600`).
    pub semantic: BTreeMap<String, String>,
    pub spacing: BTreeMap<String, String>,
    pub typography: BTreeMap<String, BTreeMap<String, String>>,
    pub radius: BTreeMap<String, String>,
    pub shadows: BTreeMap<String, String>,
}

/// Token groups addressable as `design://tokens/{group}`.
pub const TOKEN_GROUPS: &[&str] = &[
    "colors",
    "semantic",
    "spacing",
    "typography",
    "radius",
    "shadows",
];

impl DesignTokens {
    /// JSON for one token group, or `None` for an unknown group.
    pub fn group(&self, name: &str) -> Option<serde_json::Value> {
        let value = match name {
            "colors" => serde_json::to_value(&self.colors),
            "semantic" => serde_json::to_value(&self.semantic),
            "spacing" => serde_json::to_value(&self.spacing),
            "typography" => serde_json::to_value(&self.typography),
            "radius" => serde_json::to_value(&self.radius),
            "shadows" => serde_json::to_value(&self.shadows),
            _ => return None,
        };
        value.ok()
    }

    /// Hex value of a `palette-shade` token.
    pub fn hex(&self, palette: &str, shade: u16) -> Option<&str> {
        self.colors
            .get(palette)
            .and_then(|shades| shades.get(&shade))
            .map(String::as_str)
    }

    /// Every `(palette, shade, hex)` triple in palette, then shade order.
    pub fn iter_colors(&self) -> impl Iterator<Item = (&str, u16, &str)> {
        self.colors.iter().flat_map(|(palette, shades)| {
            shades
                .iter()
                .map(move |(shade, hex)| (palette.as_str(), *shade, hex.as_str()))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ts_type: String,
    #[serde(default)]
    pub default: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub section: u8,
    pub description: String,
    pub variants: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub props: Vec<PropSpec>,
    #[serde(default)]
    pub accessibility: Vec<String>,
}

impl ComponentSpec {
    /// Case-insensitive match against the canonical name and aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternSpec {
    pub name: String,
    pub title: String,
    pub section: u8,
    pub description: String,
    #[serde(default)]
    pub guidelines: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    Implementation,
    Formatting,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuideSpec {
    pub name: String,
    pub title: String,
    pub kind: GuideKind,
    pub section: u8,
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// All structured corpus data.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub tokens: DesignTokens,
    pub components: Vec<ComponentSpec>,
    pub patterns: Vec<PatternSpec>,
    pub guides: Vec<GuideSpec>,
}

impl Corpus {
    /// Parse the JSON files compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let corpus = Self {
            tokens: serde_json::from_str(TOKENS_JSON).context("Failed to parse tokens.json")?,
            components: serde_json::from_str(COMPONENTS_JSON)
                .context("Failed to parse components.json")?,
            patterns: serde_json::from_str(PATTERNS_JSON)
                .context("Failed to parse patterns.json")?,
            guides: serde_json::from_str(GUIDES_JSON).context("Failed to parse guides.json")?,
        };
        corpus.check_section_refs()?;
        Ok(corpus)
    }

    fn check_section_refs(&self) -> Result<()> {
        let refs = self
            .components
            .iter()
            .map(|c| (&c.name, c.section))
            .chain(self.patterns.iter().map(|p| (&p.name, p.section)))
            .chain(self.guides.iter().map(|g| (&g.name, g.section)));
        for (name, section) in refs {
            if section == 0 || section > SECTION_COUNT {
                anyhow::bail!("'{}' references section {} outside the corpus", name, section);
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Section sources
// ═══════════════════════════════════════════════════════════════════════

/// Where raw section markdown comes from.
///
/// `index` must be cheap: it is used for listings and title search and must
/// not parse section bodies. `read` is called by the catalog on a cache miss.
pub trait SectionSource: Send + Sync {
    /// Human-readable source description for logs.
    fn describe(&self) -> String;

    /// Title index of every section the source can serve, ordered by number.
    fn index(&self) -> &[SectionEntry];

    /// Raw markdown of one section.
    fn read(&self, number: u8) -> Result<String>;
}

/// Sections split out of a single markdown document.
pub struct EmbeddedSource {
    entries: Vec<SectionEntry>,
    bodies: BTreeMap<u8, String>,
}

impl EmbeddedSource {
    /// The document compiled into the binary.
    pub fn bundled() -> Self {
        Self::from_document(EMBEDDED_NAME, EMBEDDED_DOCUMENT)
    }

    /// Split `document` on `## N. Title` headings (outside code fences).
    pub fn from_document(file: &str, document: &str) -> Self {
        let mut entries = Vec::new();
        let mut bodies = BTreeMap::new();
        let mut current: Option<(u8, String, Vec<&str>)> = None;
        let mut in_fence = false;

        for line in document.lines() {
            if is_fence(line) {
                in_fence = !in_fence;
            }
            let heading = if in_fence {
                None
            } else {
                line.strip_prefix("## ").and_then(split_numbered_title)
            };

            match heading {
                Some((number, title)) => {
                    if let Some((n, t, lines)) = current.take() {
                        push_section(&mut entries, &mut bodies, file, n, t, &lines);
                    }
                    current = Some((number, title, vec![line]));
                }
                None => {
                    if let Some((_, _, lines)) = current.as_mut() {
                        lines.push(line);
                    }
                }
            }
        }
        if let Some((n, t, lines)) = current.take() {
            push_section(&mut entries, &mut bodies, file, n, t, &lines);
        }

        entries.sort_by_key(|e| e.section);
        Self { entries, bodies }
    }
}

fn push_section(
    entries: &mut Vec<SectionEntry>,
    bodies: &mut BTreeMap<u8, String>,
    file: &str,
    number: u8,
    title: String,
    lines: &[&str],
) {
    if bodies.contains_key(&number) {
        tracing::warn!(section = number, "duplicate section heading ignored");
        return;
    }
    entries.push(SectionEntry {
        section: number,
        title,
        file: file.to_string(),
    });
    bodies.insert(number, lines.join("\n"));
}

impl SectionSource for EmbeddedSource {
    fn describe(&self) -> String {
        format!("embedded ({} sections)", self.entries.len())
    }

    fn index(&self) -> &[SectionEntry] {
        &self.entries
    }

    fn read(&self, number: u8) -> Result<String> {
        self.bodies
            .get(&number)
            .cloned()
            .with_context(|| format!("section {} is not in the embedded corpus", number))
    }
}

/// One `NN-slug.md` file per section.
///
/// Files are discovered once at construction; titles are taken from the first
/// heading of each file (falling back to the slug) without reading the rest.
pub struct DirectorySource {
    root: PathBuf,
    entries: Vec<SectionEntry>,
    paths: BTreeMap<u8, PathBuf>,
}

impl DirectorySource {
    pub fn open(root: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        let mut paths = BTreeMap::new();

        for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to scan corpus directory: {}", root.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("md")
            {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some((number, slug)) = split_file_stem(stem) else {
                tracing::debug!(file = %path.display(), "skipping file without NN- prefix");
                continue;
            };
            if number == 0 || number > SECTION_COUNT || paths.contains_key(&number) {
                tracing::warn!(file = %path.display(), "skipping out-of-range or duplicate section file");
                continue;
            }

            let title = peek_title(path)?.unwrap_or_else(|| title_from_slug(slug));
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push(SectionEntry {
                section: number,
                title,
                file,
            });
            paths.insert(number, path.to_path_buf());
        }

        entries.sort_by_key(|e| e.section);
        Ok(Self {
            root: root.to_path_buf(),
            entries,
            paths,
        })
    }
}

impl SectionSource for DirectorySource {
    fn describe(&self) -> String {
        format!("{} ({} sections)", self.root.display(), self.entries.len())
    }

    fn index(&self) -> &[SectionEntry] {
        &self.entries
    }

    fn read(&self, number: u8) -> Result<String> {
        let path = self
            .paths
            .get(&number)
            .with_context(|| format!("no file for section {} in {}", number, self.root.display()))?;
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read section file: {}", path.display()))
    }
}

/// `"07-color-system"` → `(7, "color-system")`.
fn split_file_stem(stem: &str) -> Option<(u8, &str)> {
    let (digits, slug) = stem.split_once('-')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((digits.parse().ok()?, slug))
}

fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read lines until the first markdown heading.
fn peek_title(path: &Path) -> Result<Option<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open section file: {}", path.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Some(text) = heading_text(&line) {
            return Ok(Some(strip_number_prefix(text).to_string()));
        }
    }
    Ok(None)
}

// ═══════════════════════════════════════════════════════════════════════
// Markdown parsing
// ═══════════════════════════════════════════════════════════════════════

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Text of an ATX heading line, without the leading hashes.
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(' ') {
        return None;
    }
    Some(rest.trim())
}

/// `"11. Buttons"` → `(11, "Buttons")`.
fn split_numbered_title(text: &str) -> Option<(u8, String)> {
    let (digits, title) = text.trim().split_once(". ")?;
    let number: u8 = digits.parse().ok()?;
    Some((number, title.trim().to_string()))
}

fn strip_number_prefix(text: &str) -> &str {
    match text.split_once(". ") {
        Some((digits, rest)) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            rest.trim()
        }
        _ => text,
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_start_matches('|')
        .trim_end_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|c| {
            !c.is_empty() && c.contains('-') && c.chars().all(|ch| matches!(ch, '-' | ':'))
        })
}

/// Turn buffered pipe lines into a [`Table`], or back into prose when the
/// second row is not a separator.
fn flush_table<'a>(
    number: u8,
    lines: &mut Vec<&'a str>,
    content: &mut Vec<&'a str>,
    tables: &mut Vec<Table>,
    caption: &Option<String>,
) {
    if lines.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = lines.iter().map(|l| split_row(l)).collect();
    if rows.len() >= 2 && is_separator_row(&rows[1]) {
        tables.push(Table {
            id: format!("s{}-table-{}", number, tables.len() + 1),
            caption: caption.clone(),
            headers: rows[0].clone(),
            rows: rows[2..].to_vec(),
        });
    } else {
        content.extend(lines.iter().copied());
    }
    lines.clear();
}

/// Parse raw section markdown into a [`Section`].
///
/// The section title comes from the index entry so listings and loaded
/// sections always agree; the first heading in `raw` is treated as the title
/// line and excluded from `metadata.headings`.
pub fn parse_section(entry: &SectionEntry, raw: &str) -> Section {
    let number = entry.section;
    let mut content_lines: Vec<&str> = Vec::new();
    let mut headings: Vec<String> = Vec::new();
    let mut code_blocks: Vec<CodeBlock> = Vec::new();
    let mut tables: Vec<Table> = Vec::new();

    let mut fence: Option<(String, usize, Vec<&str>)> = None;
    let mut table_lines: Vec<&str> = Vec::new();
    let mut last_heading: Option<String> = None;
    let mut seen_title = false;

    for (idx, line) in raw.lines().enumerate() {
        let line_number = idx + 1;

        if let Some((language, start, mut code)) = fence.take() {
            if is_fence(line) {
                code_blocks.push(CodeBlock {
                    id: format!("s{}-code-{}", number, code_blocks.len() + 1),
                    language,
                    code: code.join("\n"),
                    line_number: start,
                });
            } else {
                code.push(line);
                fence = Some((language, start, code));
            }
            continue;
        }

        if line.trim_start().starts_with('|') {
            table_lines.push(line);
            continue;
        }
        flush_table(number, &mut table_lines, &mut content_lines, &mut tables, &last_heading);

        if is_fence(line) {
            let language = line.trim_start().trim_start_matches('`').trim();
            let language = if language.is_empty() {
                "text".to_string()
            } else {
                language.to_ascii_lowercase()
            };
            fence = Some((language, line_number, Vec::new()));
            continue;
        }

        if let Some(text) = heading_text(line) {
            if !seen_title {
                seen_title = true;
                continue;
            }
            headings.push(text.to_string());
            last_heading = Some(text.to_string());
        }
        content_lines.push(line);
    }
    flush_table(number, &mut table_lines, &mut content_lines, &mut tables, &last_heading);

    // Unterminated fence: keep what we have
    if let Some((language, start, code)) = fence {
        code_blocks.push(CodeBlock {
            id: format!("s{}-code-{}", number, code_blocks.len() + 1),
            language,
            code: code.join("\n"),
            line_number: start,
        });
    }

    let content = collapse_blank_lines(&content_lines);
    let word_count = content.split_whitespace().count();

    Section {
        number,
        title: entry.title.clone(),
        content,
        code_blocks,
        tables,
        metadata: SectionMetadata {
            file: entry.file.clone(),
            word_count,
            headings,
            content_hash: content_hash(raw),
        },
    }
}

fn collapse_blank_lines(lines: &[&str]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && out.last().map_or(true, |l: &&str| l.trim().is_empty()) {
            continue;
        }
        out.push(line.trim_end());
    }
    while out.last().is_some_and(|l| l.trim().is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// SHA-256 hex digest of raw section text.
pub fn content_hash(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
