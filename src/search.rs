//! Ranked search over the catalog.
//!
//! Two entry points share one scoring function:
//!
//! - [`SearchIndex::search`] ranks catalog metadata: color tokens and token
//!   groups, component specs, patterns, guides and code templates. These
//!   documents are built once when the index is created.
//! - [`SearchIndex::search_enhanced`] ranks full section content: prose,
//!   individual code blocks and tables, loaded through the catalog's section
//!   cache.
//!
//! # Scoring
//!
//! 1. Split the query into lowercase terms.
//! 2. For each field (title, description, content, code) compute the fraction
//!    of terms it contains.
//! 3. `score = Σ weight_f × fraction_f / Σ weight_f`, so scores lie in `[0, 1]`.
//! 4. An exact case-insensitive title match scores `1.0`.
//! 5. Drop zero scores; stable sort by score descending, so ties keep
//!    catalog order; truncate to the limit.

use std::str::FromStr;
use std::sync::Arc;

use crate::catalog::ResourceCatalog;
use crate::color::ColorEngine;
use crate::config::SearchConfig;
use crate::corpus::{GuideKind, TOKEN_GROUPS};
use crate::error::{DesignError, Result};
use crate::models::{SearchResult, SECTION_COUNT};

/// Metadata category filter for [`SearchIndex::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    All,
    Tokens,
    Components,
    Patterns,
    Formatting,
    Templates,
}

impl Category {
    pub const NAMES: &'static [&'static str] = &[
        "all",
        "tokens",
        "components",
        "patterns",
        "formatting",
        "templates",
    ];

    /// `None` for an unknown category, which matches nothing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Some(Self::All),
            "tokens" => Some(Self::Tokens),
            "components" => Some(Self::Components),
            "patterns" => Some(Self::Patterns),
            "formatting" => Some(Self::Formatting),
            "templates" => Some(Self::Templates),
            _ => None,
        }
    }

    fn admits(&self, doc: DocCategory) -> bool {
        match self {
            Self::All => true,
            Self::Tokens => doc == DocCategory::Tokens,
            Self::Components => doc == DocCategory::Components,
            Self::Patterns => doc == DocCategory::Patterns,
            Self::Formatting => doc == DocCategory::Formatting,
            Self::Templates => doc == DocCategory::Templates,
        }
    }
}

/// Which parts of a section [`SearchIndex::search_enhanced`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Content,
    Code,
    Tables,
}

impl Scope {
    pub const NAMES: &'static [&'static str] = &["all", "content", "code", "tables"];
}

impl FromStr for Scope {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "content" => Ok(Self::Content),
            "code" => Ok(Self::Code),
            "tables" => Ok(Self::Tables),
            _ => Err(DesignError::invalid_choice(
                format!("unknown search scope: '{}'", s),
                Self::NAMES,
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocCategory {
    Tokens,
    Components,
    Patterns,
    Guides,
    Formatting,
    Templates,
}

/// One searchable unit. Fields are stored lowercase.
#[derive(Debug, Clone)]
struct Document {
    kind: &'static str,
    category: DocCategory,
    name: String,
    description: String,
    uri: String,
    title: String,
    description_lc: String,
    content: String,
    code: String,
}

impl Document {
    fn new(
        kind: &'static str,
        category: DocCategory,
        name: impl Into<String>,
        title: &str,
        description: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            kind,
            category,
            name: name.into(),
            description_lc: description.to_lowercase(),
            description,
            uri: uri.into(),
            title: title.to_lowercase(),
            content: String::new(),
            code: String::new(),
        }
    }

    fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_lowercase();
        self
    }

    fn with_code(mut self, code: &str) -> Self {
        self.code = code.to_lowercase();
        self
    }

    fn to_result(&self, score: f64) -> SearchResult {
        SearchResult {
            kind: self.kind.to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            uri: self.uri.clone(),
            relevance_score: score,
        }
    }
}

/// Relative field weights, normalized at scoring time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWeights {
    pub title: f64,
    pub description: f64,
    pub content: f64,
    pub code: f64,
}

impl SearchWeights {
    fn total(&self) -> f64 {
        self.title + self.description + self.content + self.code
    }
}

impl From<&SearchConfig> for SearchWeights {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            title: cfg.title_weight,
            description: cfg.description_weight,
            content: cfg.content_weight,
            code: cfg.code_weight,
        }
    }
}

/// Lowercase query terms with surrounding punctuation stripped.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| c.is_ascii_punctuation() && c != '#')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn term_fraction(terms: &[String], field: &str) -> f64 {
    if field.is_empty() || terms.is_empty() {
        return 0.0;
    }
    let found = terms.iter().filter(|t| field.contains(t.as_str())).count();
    found as f64 / terms.len() as f64
}

fn score(doc: &Document, query_lc: &str, terms: &[String], weights: &SearchWeights) -> f64 {
    if !doc.title.is_empty() && (doc.title == query_lc || doc.name.eq_ignore_ascii_case(query_lc))
    {
        return 1.0;
    }
    let total = weights.total();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted = weights.title * term_fraction(terms, &doc.title)
        + weights.description * term_fraction(terms, &doc.description_lc)
        + weights.content * term_fraction(terms, &doc.content)
        + weights.code * term_fraction(terms, &doc.code);
    (weighted / total).clamp(0.0, 1.0)
}

fn rank<'a>(
    docs: impl Iterator<Item = &'a Document>,
    query: &str,
    weights: &SearchWeights,
    limit: usize,
) -> Vec<SearchResult> {
    let query_lc = query.trim().to_lowercase();
    let terms = query_terms(&query_lc);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = docs
        .filter_map(|doc| {
            let s = score(doc, &query_lc, &terms, weights);
            (s > 0.0).then(|| doc.to_result(s))
        })
        .collect();

    // sort_by is stable: equal scores keep document order
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    results
}

/// Search over catalog metadata and section content.
pub struct SearchIndex {
    catalog: Arc<ResourceCatalog>,
    weights: SearchWeights,
    default_limit: usize,
    documents: Vec<Document>,
}

impl SearchIndex {
    pub fn new(catalog: Arc<ResourceCatalog>, config: &SearchConfig) -> Self {
        let documents = metadata_documents(&catalog);
        tracing::debug!(documents = documents.len(), "search index built");
        Self {
            catalog,
            weights: SearchWeights::from(config),
            default_limit: config.default_limit.max(1),
            documents,
        }
    }

    pub fn weights(&self) -> SearchWeights {
        self.weights
    }

    fn effective_limit(&self, limit: usize) -> usize {
        if limit == 0 {
            self.default_limit
        } else {
            limit
        }
    }

    /// Rank catalog metadata. Unknown categories and empty queries match nothing.
    pub fn search(&self, query: &str, category: &str, limit: usize) -> Vec<SearchResult> {
        let Some(category) = Category::parse(category) else {
            return Vec::new();
        };
        rank(
            self.documents
                .iter()
                .filter(|d| category.admits(d.category)),
            query,
            &self.weights,
            self.effective_limit(limit),
        )
    }

    /// Rank full section content, optionally within one section.
    pub fn search_enhanced(
        &self,
        query: &str,
        section: Option<i64>,
        scope: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let scope = Scope::from_str(scope)?;
        let numbers: Vec<i64> = match section {
            Some(n) => vec![n],
            None => (1..=i64::from(SECTION_COUNT)).collect(),
        };

        let mut docs = Vec::new();
        for n in numbers {
            let s = match self.catalog.load_section(n) {
                Ok(s) => s,
                // Directory corpora may omit sections; only an explicit filter must exist
                Err(DesignError::NotFound { .. }) if section.is_none() => continue,
                Err(e) => return Err(e),
            };
            let uri = s.uri();

            if matches!(scope, Scope::All | Scope::Content) {
                docs.push(
                    Document::new(
                        "section",
                        DocCategory::Guides,
                        format!("{}. {}", s.number, s.title),
                        &s.title,
                        excerpt(&s.content, 160),
                        &uri,
                    )
                    .with_content(&s.content),
                );
            }
            if matches!(scope, Scope::All | Scope::Code) {
                for block in &s.code_blocks {
                    docs.push(
                        Document::new(
                            "code",
                            DocCategory::Guides,
                            &block.id,
                            "",
                            format!("{} example from {}", block.language, s.title),
                            &uri,
                        )
                        .with_code(&block.code),
                    );
                }
            }
            if matches!(scope, Scope::All | Scope::Tables) {
                for table in &s.tables {
                    let caption = table.caption.clone().unwrap_or_else(|| s.title.clone());
                    let cells: Vec<&str> = table
                        .headers
                        .iter()
                        .chain(table.rows.iter().flatten())
                        .map(String::as_str)
                        .collect();
                    docs.push(
                        Document::new(
                            "table",
                            DocCategory::Guides,
                            &table.id,
                            &caption,
                            format!("{} table from {}", caption, s.title),
                            &uri,
                        )
                        .with_content(&cells.join(" ")),
                    );
                }
            }
        }

        Ok(rank(
            docs.iter(),
            query,
            &self.weights,
            self.effective_limit(limit),
        ))
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(i) => format!("{}…", &cut[..i]),
        None => format!("{}…", cut),
    }
}

fn metadata_documents(catalog: &ResourceCatalog) -> Vec<Document> {
    let tokens = catalog.tokens();
    let colors = ColorEngine::new(Arc::clone(&tokens));
    let mut docs = Vec::new();

    for (palette, shade, _) in tokens.iter_colors() {
        if let Some(t) = colors.token(palette, shade) {
            docs.push(
                Document::new(
                    "token",
                    DocCategory::Tokens,
                    &t.name,
                    &t.name,
                    format!("{} ({})", t.hex, t.usage),
                    "design://tokens/colors",
                )
                .with_content(&format!("{} {} {} {}", t.palette, t.hex, t.css_var, t.tailwind_class)),
            );
        }
    }
    for (role, target) in &tokens.semantic {
        docs.push(Document::new(
            "token",
            DocCategory::Tokens,
            role,
            role,
            format!("Semantic color: {}", target),
            "design://tokens/semantic",
        ));
    }
    for group in TOKEN_GROUPS.iter().filter(|g| !matches!(**g, "colors" | "semantic")) {
        let keys = tokens
            .group(group)
            .and_then(|v| v.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()))
            .unwrap_or_default();
        docs.push(
            Document::new(
                "token",
                DocCategory::Tokens,
                *group,
                group,
                format!("{} tokens", group),
                format!("design://tokens/{}", group),
            )
            .with_content(&keys.join(" ")),
        );
    }

    for c in &catalog.corpus().components {
        let props: Vec<&str> = c.props.iter().map(|p| p.name.as_str()).collect();
        let content = format!(
            "{} {} {} {}",
            c.aliases.join(" "),
            c.variants.join(" "),
            props.join(" "),
            c.accessibility.join(" ")
        );
        docs.push(
            Document::new(
                "component",
                DocCategory::Components,
                &c.name,
                &c.name,
                &c.description,
                format!("design://components/{}", c.name),
            )
            .with_content(&content),
        );
    }

    for p in catalog.patterns() {
        docs.push(
            Document::new(
                "pattern",
                DocCategory::Patterns,
                &p.name,
                &format!("{} {}", p.name, p.title),
                &p.description,
                format!("design://patterns/{}", p.name),
            )
            .with_content(&format!("{} {}", p.guidelines.join(" "), p.components.join(" "))),
        );
    }

    for (kind, category, scheme) in [
        (GuideKind::Implementation, DocCategory::Guides, "guides"),
        (GuideKind::Formatting, DocCategory::Formatting, "formatting"),
    ] {
        for g in catalog.guides(kind) {
            docs.push(
                Document::new(
                    if kind == GuideKind::Formatting { "formatting" } else { "guide" },
                    category,
                    &g.name,
                    &format!("{} {}", g.name, g.title),
                    &g.description,
                    format!("design://{}/{}", scheme, g.name),
                )
                .with_content(&g.steps.join(" ")),
            );
        }
    }

    for t in catalog.generator().templates() {
        docs.push(
            Document::new(
                "template",
                DocCategory::Templates,
                &t.component,
                &t.component,
                &t.description,
                &t.uri,
            )
            .with_content(&format!("{} {}", t.variants.join(" "), t.frameworks.join(" "))),
        );
    }

    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SearchIndex {
        let catalog = Arc::new(ResourceCatalog::embedded().unwrap());
        SearchIndex::new(catalog, &SearchConfig::default())
    }

    fn doc(title: &str, description: &str, content: &str, code: &str) -> Document {
        Document::new("t", DocCategory::Guides, title, title, description, "u")
            .with_content(content)
            .with_code(code)
    }

    #[test]
    fn test_query_terms() {
        assert_eq!(query_terms("  Primary, BUTTON! "), ["primary", "button"]);
        assert_eq!(query_terms("#3b82f6"), ["#3b82f6"]);
        assert!(query_terms("  ").is_empty());
    }

    #[test]
    fn test_field_weights_order_matches() {
        let w = SearchWeights::from(&SearchConfig::default());
        let terms = query_terms("focus");
        let in_title = score(&doc("focus ring", "", "", ""), "focus", &terms, &w);
        let in_desc = score(&doc("x", "focus", "", ""), "focus", &terms, &w);
        let in_content = score(&doc("x", "", "focus", ""), "focus", &terms, &w);
        let in_code = score(&doc("x", "", "", "focus"), "focus", &terms, &w);
        assert!(in_title > in_desc);
        assert!(in_desc > in_content);
        assert!(in_content > in_code);
        assert!(in_code > 0.0);
    }

    #[test]
    fn test_exact_title_scores_one() {
        let w = SearchWeights::from(&SearchConfig::default());
        let terms = query_terms("Buttons");
        assert_eq!(score(&doc("buttons", "", "", ""), "buttons", &terms, &w), 1.0);
    }

    #[test]
    fn test_scores_in_unit_interval_and_sorted() {
        let idx = index();
        for q in ["blue", "button primary", "form validation", "a"] {
            let results = idx.search(q, "all", 50);
            for r in &results {
                assert!(r.relevance_score > 0.0 && r.relevance_score <= 1.0);
            }
            for pair in results.windows(2) {
                assert!(pair[0].relevance_score >= pair[1].relevance_score);
            }
        }
    }

    #[test]
    fn test_exact_component_match_ranks_first() {
        let results = index().search("button", "all", 5);
        assert_eq!(results[0].kind, "component");
        assert_eq!(results[0].name, "button");
        assert_eq!(results[0].relevance_score, 1.0);
    }

    #[test]
    fn test_category_filter() {
        let idx = index();
        let tokens = idx.search("blue", "tokens", 100);
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|r| r.kind == "token"));
        let templates = idx.search("react", "templates", 100);
        assert_eq!(templates.len(), 6);
        assert!(idx.search("blue", "colours", 10).is_empty());
        assert!(idx.search("", "all", 10).is_empty());
    }

    #[test]
    fn test_limit_defaults_when_zero() {
        let idx = index();
        assert_eq!(idx.search("blue", "tokens", 0).len(), 10);
        assert_eq!(idx.search("blue", "tokens", 3).len(), 3);
    }

    #[test]
    fn test_enhanced_section_filter() {
        let idx = index();
        let results = idx
            .search_enhanced("button", Some(11), "all", 50)
            .unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.uri == "design://sections/11"));
    }

    #[test]
    fn test_enhanced_scopes() {
        let idx = index();
        let code = idx.search_enhanced("classname", None, "code", 50).unwrap();
        assert!(!code.is_empty());
        assert!(code.iter().all(|r| r.kind == "code"));
        let tables = idx.search_enhanced("breakpoints", None, "tables", 50).unwrap();
        assert!(tables.iter().all(|r| r.kind == "table"));
        assert!(!tables.is_empty());

        let err = idx.search_enhanced("x", None, "images", 5).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        let err = idx.search_enhanced("x", Some(40), "all", 5).unwrap_err();
        assert_eq!(err.code(), "range_error");
    }

    #[test]
    fn test_excerpt_cuts_on_word_boundary() {
        let text = "alpha beta gamma delta";
        assert_eq!(excerpt(text, 100), text);
        assert_eq!(excerpt(text, 12), "alpha beta…");
    }
}
