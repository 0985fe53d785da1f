//! The resource catalog: addressable corpus content and the section cache.
//!
//! Everything the service can return is reachable through a `design://` URI
//! (see [`ResourceUri`]). Structured data (tokens, component specs, patterns,
//! guides) lives in memory from startup; section bodies are parsed on first
//! access and cached for the life of the process.
//!
//! The cache is a read-through map of `Arc<Section>` guarded by a
//! `parking_lot::RwLock`. Each key is written at most once: when two loads of
//! the same section race, the first insert wins and both callers get that
//! value.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::codegen::CodeGenerator;
use crate::config::Config;
use crate::corpus::{
    parse_section, ComponentSpec, Corpus, DesignTokens, DirectorySource, EmbeddedSource,
    GuideKind, GuideSpec, PatternSpec, SectionSource, TOKEN_GROUPS,
};
use crate::error::{DesignError, Result};
use crate::models::{CodeBlock, ResourceInfo, Section, SectionEntry, SECTION_COUNT};

const JSON_MIME: &str = "application/json";
const QUICK_REFERENCE_SECTION: u8 = SECTION_COUNT;

/// A parsed `design://` address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Tokens(Option<String>),
    Component(String),
    Pattern(String),
    Guide(String),
    Formatting(String),
    Template(String),
    Section(i64),
    QuickReference,
}

impl ResourceUri {
    /// Parse a URI; anything outside the scheme is `NotFound`.
    pub fn parse(uri: &str) -> Result<Self> {
        let not_found = || DesignError::not_found(uri);
        let path = uri
            .trim()
            .strip_prefix("design://")
            .ok_or_else(not_found)?
            .trim_end_matches('/');

        let (kind, name) = match path.split_once('/') {
            Some((kind, name)) if !name.is_empty() && !name.contains('/') => (kind, Some(name)),
            Some(_) => return Err(not_found()),
            None => (path, None),
        };

        let parsed = match (kind, name) {
            ("tokens", group) => Self::Tokens(group.map(str::to_string)),
            ("quick-reference", None) => Self::QuickReference,
            ("components", Some(n)) => Self::Component(n.to_string()),
            ("patterns", Some(n)) => Self::Pattern(n.to_string()),
            ("guides", Some(n)) => Self::Guide(n.to_string()),
            ("formatting", Some(n)) => Self::Formatting(n.to_string()),
            ("templates", Some(n)) => Self::Template(n.to_string()),
            ("sections", Some(n)) => Self::Section(n.parse().map_err(|_| not_found())?),
            _ => return Err(not_found()),
        };
        Ok(parsed)
    }
}

/// Read-only cache counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub size_estimate_bytes: usize,
    /// `hits / (hits + misses)`, `0.0` before the first lookup.
    pub hit_rate: f64,
    pub hits: u64,
    pub misses: u64,
}

/// One titled table from the quick-reference section.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickReferenceCard {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub struct ResourceCatalog {
    corpus: Corpus,
    tokens: Arc<DesignTokens>,
    generator: CodeGenerator,
    source: Box<dyn SectionSource>,
    cache: RwLock<HashMap<u8, Arc<Section>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResourceCatalog {
    pub fn new(corpus: Corpus, source: Box<dyn SectionSource>) -> Self {
        let tokens = Arc::new(corpus.tokens.clone());
        let generator = CodeGenerator::new(&corpus.components);
        Self {
            corpus,
            tokens,
            generator,
            source,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Catalog over the corpus compiled into the binary.
    pub fn embedded() -> anyhow::Result<Self> {
        Ok(Self::new(
            Corpus::embedded()?,
            Box::new(EmbeddedSource::bundled()),
        ))
    }

    /// Catalog honoring `[corpus].dir`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let corpus = Corpus::embedded()?;
        let source: Box<dyn SectionSource> = match &config.corpus.dir {
            Some(dir) => Box::new(DirectorySource::open(Path::new(dir))?),
            None => Box::new(EmbeddedSource::bundled()),
        };
        tracing::info!(source = %source.describe(), "corpus loaded");
        Ok(Self::new(corpus, source))
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn tokens(&self) -> Arc<DesignTokens> {
        Arc::clone(&self.tokens)
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    /// Title index from the section source. Never loads bodies.
    pub fn section_index(&self) -> &[SectionEntry] {
        self.source.index()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Listing and reading
    // ═══════════════════════════════════════════════════════════════════

    /// Every addressable resource, without loading section bodies.
    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        let info = |uri: String, name: String, description: String| ResourceInfo {
            uri,
            name,
            description,
            mime_type: JSON_MIME.to_string(),
        };
        let mut out = vec![info(
            "design://tokens".to_string(),
            "Design tokens".to_string(),
            format!("Complete token set, version {}", self.tokens.version),
        )];
        for group in TOKEN_GROUPS {
            out.push(info(
                format!("design://tokens/{}", group),
                format!("Tokens: {}", group),
                format!("The {} token group", group),
            ));
        }
        for c in &self.corpus.components {
            out.push(info(
                format!("design://components/{}", c.name),
                format!("Component: {}", c.name),
                c.description.clone(),
            ));
        }
        for p in &self.corpus.patterns {
            out.push(info(
                format!("design://patterns/{}", p.name),
                format!("Pattern: {}", p.title),
                p.description.clone(),
            ));
        }
        for g in &self.corpus.guides {
            let kind = match g.kind {
                GuideKind::Implementation => "guides",
                GuideKind::Formatting => "formatting",
            };
            out.push(info(
                format!("design://{}/{}", kind, g.name),
                format!("Guide: {}", g.title),
                g.description.clone(),
            ));
        }
        for t in self.generator.templates() {
            out.push(info(t.uri, format!("Template: {}", t.component), t.description));
        }
        for entry in self.section_index() {
            out.push(info(
                format!("design://sections/{}", entry.section),
                format!("Section {}: {}", entry.section, entry.title),
                format!("Design system guide section {}", entry.section),
            ));
        }
        out.push(info(
            "design://quick-reference".to_string(),
            "Quick reference".to_string(),
            "Cheat-sheet tables for colors, spacing, typography, contrast and breakpoints"
                .to_string(),
        ));
        out
    }

    /// Pretty JSON body of the resource at `uri`.
    pub fn get_resource(&self, uri: &str) -> Result<String> {
        let not_found = || DesignError::not_found(uri);
        let value = match ResourceUri::parse(uri)? {
            ResourceUri::Tokens(None) => json!(*self.tokens),
            ResourceUri::Tokens(Some(group)) => self.tokens.group(&group).ok_or_else(not_found)?,
            ResourceUri::Component(name) => {
                let spec = self.find_component(&name).ok_or_else(not_found)?;
                let section = self.load_section(i64::from(spec.section))?;
                json!({
                    "spec": spec,
                    "section": section_ref(&section),
                    "codeExamples": section.code_blocks,
                    "template": self.generator.template_info(&spec.name),
                })
            }
            ResourceUri::Pattern(name) => {
                let pattern = self.find_pattern(&name).ok_or_else(not_found)?;
                let section = self.load_section(i64::from(pattern.section))?;
                json!({ "pattern": pattern, "section": section_ref(&section) })
            }
            ResourceUri::Guide(name) => {
                json!(self.find_guide(&name, GuideKind::Implementation).ok_or_else(not_found)?)
            }
            ResourceUri::Formatting(name) => {
                json!(self.find_guide(&name, GuideKind::Formatting).ok_or_else(not_found)?)
            }
            ResourceUri::Template(name) => {
                json!(self.generator.template_info(&name).ok_or_else(not_found)?)
            }
            ResourceUri::Section(n) => {
                let section = self.load_section(n).map_err(|e| match e {
                    DesignError::SectionOutOfRange { .. } => not_found(),
                    other => other,
                })?;
                json!(*section)
            }
            ResourceUri::QuickReference => json!(self.quick_reference()?),
        };
        serde_json::to_string_pretty(&value).map_err(|_| not_found())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Sections
    // ═══════════════════════════════════════════════════════════════════

    /// Load one section through the cache.
    ///
    /// The first call for a number reads and parses the source; later calls
    /// return the same `Arc`. A failed read is retried once before it
    /// surfaces as `NotFound`.
    pub fn load_section(&self, number: i64) -> Result<Arc<Section>> {
        let n = u8::try_from(number)
            .ok()
            .filter(|n| (1..=SECTION_COUNT).contains(n))
            .ok_or(DesignError::SectionOutOfRange {
                number,
                max: SECTION_COUNT,
            })?;
        let uri = format!("design://sections/{}", n);

        if let Some(section) = self.cache.read().get(&n) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(section = n, "section cache hit");
            return Ok(Arc::clone(section));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let entry = self
            .section_index()
            .iter()
            .find(|e| e.section == n)
            .ok_or_else(|| DesignError::not_found(&uri))?;

        let raw = match self.source.read(n) {
            Ok(raw) => raw,
            Err(first) => {
                tracing::warn!(section = n, error = %first, "section read failed, retrying");
                self.source.read(n).map_err(|e| {
                    tracing::warn!(section = n, error = %e, "section read failed twice");
                    DesignError::not_found(&uri)
                })?
            }
        };

        let parsed = Arc::new(parse_section(entry, &raw));
        tracing::debug!(section = n, bytes = parsed.size_estimate(), "section loaded");

        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(n).or_insert(parsed)))
    }

    /// Case-insensitive title search over the index; an empty query returns all.
    pub fn search_sections(&self, query: &str) -> Vec<SectionEntry> {
        let q = query.trim().to_lowercase();
        self.section_index()
            .iter()
            .filter(|e| q.is_empty() || e.title.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    /// Code blocks of a section, optionally filtered by language.
    pub fn code_examples(&self, number: i64, language: Option<&str>) -> Result<Vec<CodeBlock>> {
        let section = self.load_section(number)?;
        let language = language.map(str::trim).filter(|l| !l.is_empty());
        Ok(section
            .code_blocks
            .iter()
            .filter(|b| language.map_or(true, |l| b.language.eq_ignore_ascii_case(l)))
            .cloned()
            .collect())
    }

    /// Tables of the quick-reference section, titled by their captions.
    pub fn quick_reference(&self) -> Result<Vec<QuickReferenceCard>> {
        let section = self.load_section(i64::from(QUICK_REFERENCE_SECTION))?;
        Ok(section
            .tables
            .iter()
            .map(|t| QuickReferenceCard {
                title: t.caption.clone().unwrap_or_else(|| section.title.clone()),
                headers: t.headers.clone(),
                rows: t.rows.clone(),
            })
            .collect())
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.read();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            entries: cache.len(),
            size_estimate_bytes: cache.values().map(|s| s.size_estimate()).sum(),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
            hits,
            misses,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Components, patterns, guides
    // ═══════════════════════════════════════════════════════════════════

    fn find_component(&self, name: &str) -> Option<&ComponentSpec> {
        self.corpus.components.iter().find(|c| c.answers_to(name))
    }

    /// Canonical component names, in corpus order.
    pub fn component_names(&self) -> Vec<String> {
        self.corpus.components.iter().map(|c| c.name.clone()).collect()
    }

    /// Every accepted component name: canonical names followed by their aliases.
    pub fn component_aliases(&self) -> Vec<String> {
        self.corpus
            .components
            .iter()
            .flat_map(|c| std::iter::once(&c.name).chain(c.aliases.iter()))
            .cloned()
            .collect()
    }

    /// Resolve a component name or alias to its spec.
    pub fn resolve_component(&self, name: &str) -> Result<&ComponentSpec> {
        self.find_component(name)
            .ok_or_else(|| DesignError::UnknownComponent {
                name: name.to_string(),
                valid: self.component_names(),
            })
    }

    /// A component spec together with its documentation section.
    pub fn get_component(&self, name: &str) -> Result<(ComponentSpec, Arc<Section>)> {
        let spec = self.resolve_component(name)?;
        let section = self.load_section(i64::from(spec.section))?;
        Ok((spec.clone(), section))
    }

    fn find_pattern(&self, name: &str) -> Option<&PatternSpec> {
        let name = name.trim();
        self.corpus
            .patterns
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn patterns(&self) -> &[PatternSpec] {
        &self.corpus.patterns
    }

    pub fn get_pattern(&self, name: &str) -> Result<&PatternSpec> {
        self.find_pattern(name).ok_or_else(|| {
            let names: Vec<&str> = self.corpus.patterns.iter().map(|p| p.name.as_str()).collect();
            DesignError::invalid_choice(format!("unknown pattern: '{}'", name.trim()), &names)
        })
    }

    fn find_guide(&self, name: &str, kind: GuideKind) -> Option<&GuideSpec> {
        let name = name.trim();
        self.corpus
            .guides
            .iter()
            .find(|g| g.kind == kind && g.name.eq_ignore_ascii_case(name))
    }

    pub fn guides(&self, kind: GuideKind) -> Vec<&GuideSpec> {
        self.corpus.guides.iter().filter(|g| g.kind == kind).collect()
    }

    /// Look up a guide of either kind; implementation guides win on name clashes.
    pub fn get_guide(&self, name: &str) -> Result<&GuideSpec> {
        self.find_guide(name, GuideKind::Implementation)
            .or_else(|| self.find_guide(name, GuideKind::Formatting))
            .ok_or_else(|| {
                let names: Vec<&str> = self.corpus.guides.iter().map(|g| g.name.as_str()).collect();
                DesignError::invalid_choice(format!("unknown guide: '{}'", name.trim()), &names)
            })
    }
}

fn section_ref(section: &Section) -> serde_json::Value {
    json!({
        "number": section.number,
        "title": section.title,
        "uri": section.uri(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Wraps the bundled source, counting reads and failing the first `fail` of them.
    struct CountingSource {
        inner: EmbeddedSource,
        reads: Arc<AtomicUsize>,
        fail: usize,
    }

    impl SectionSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn index(&self) -> &[SectionEntry] {
            self.inner.index()
        }

        fn read(&self, number: u8) -> anyhow::Result<String> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            if n < self.fail {
                anyhow::bail!("simulated read failure");
            }
            self.inner.read(number)
        }
    }

    fn counting_catalog(fail: usize) -> (ResourceCatalog, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            inner: EmbeddedSource::bundled(),
            reads: Arc::clone(&reads),
            fail,
        };
        let catalog = ResourceCatalog::new(Corpus::embedded().unwrap(), Box::new(source));
        (catalog, reads)
    }

    #[test]
    fn test_uri_parsing() {
        assert_eq!(
            ResourceUri::parse("design://tokens").unwrap(),
            ResourceUri::Tokens(None)
        );
        assert_eq!(
            ResourceUri::parse("design://tokens/colors").unwrap(),
            ResourceUri::Tokens(Some("colors".to_string()))
        );
        assert_eq!(
            ResourceUri::parse("design://sections/7").unwrap(),
            ResourceUri::Section(7)
        );
        assert_eq!(
            ResourceUri::parse("design://quick-reference").unwrap(),
            ResourceUri::QuickReference
        );
        for bad in [
            "http://tokens",
            "design://nope/x",
            "design://components",
            "design://sections/abc",
            "design://components/a/b",
            "",
        ] {
            let err = ResourceUri::parse(bad).unwrap_err();
            assert_eq!(err.code(), "not_found", "for {:?}", bad);
        }
    }

    #[test]
    fn test_every_listed_resource_resolves() {
        let (catalog, _) = counting_catalog(0);
        let listed = catalog.list_resources();
        assert!(listed.len() > 60);
        for r in &listed {
            let body = catalog.get_resource(&r.uri).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert!(!parsed.is_null(), "empty body for {}", r.uri);
        }
    }

    #[test]
    fn test_listing_does_not_load_sections() {
        let (catalog, reads) = counting_catalog(0);
        let listed = catalog.list_resources();
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert!(listed
            .iter()
            .any(|r| r.uri == "design://sections/11" && r.name == "Section 11: Buttons"));
    }

    #[test]
    fn test_load_section_is_read_once() {
        let (catalog, reads) = counting_catalog(0);
        let first = catalog.load_section(11).unwrap();
        let second = catalog.load_section(11).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 1);

        let stats = catalog.cache_stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < 1e-9);
        assert!(stats.size_estimate_bytes > 0);
    }

    #[test]
    fn test_concurrent_first_loads_share_one_section() {
        const THREADS: usize = 8;
        let (catalog, reads) = counting_catalog(0);
        let barrier = std::sync::Barrier::new(THREADS);

        let loaded: Vec<Arc<Section>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        catalog.load_section(14).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(loaded.iter().all(|s| Arc::ptr_eq(s, &loaded[0])));
        assert!(Arc::ptr_eq(&loaded[0], &catalog.load_section(14).unwrap()));
        assert!(reads.load(Ordering::SeqCst) >= 1);
        let stats = catalog.cache_stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits + stats.misses, THREADS as u64 + 1);
    }

    #[test]
    fn test_load_section_range() {
        let (catalog, reads) = counting_catalog(0);
        for n in [0, 36, -1, 300] {
            let err = catalog.load_section(n).unwrap_err();
            assert_eq!(err.code(), "range_error");
        }
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert!(catalog.load_section(1).is_ok());
        assert!(catalog.load_section(35).is_ok());
    }

    #[test]
    fn test_failed_read_is_retried_once() {
        let (catalog, reads) = counting_catalog(1);
        assert!(catalog.load_section(3).is_ok());
        assert_eq!(reads.load(Ordering::SeqCst), 2);

        let (catalog, reads) = counting_catalog(2);
        let err = catalog.load_section(3).unwrap_err();
        assert_eq!(err, DesignError::not_found("design://sections/3"));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(catalog.cache_stats().entries, 0);
    }

    #[test]
    fn test_out_of_range_section_uri_is_not_found() {
        let (catalog, _) = counting_catalog(0);
        let err = catalog.get_resource("design://sections/99").unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_search_sections_by_title() {
        let (catalog, reads) = counting_catalog(0);
        let hits = catalog.search_sections("BUTTON");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].section, 11);
        assert_eq!(catalog.search_sections("").len(), 35);
        assert!(catalog.search_sections("zzz").is_empty());
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_component_aliases_resolve() {
        let (catalog, _) = counting_catalog(0);
        let (spec, section) = catalog.get_component("Btn").unwrap();
        assert_eq!(spec.name, "button");
        assert_eq!(section.number, 11);
        assert_eq!(catalog.resolve_component("dialog").unwrap().name, "modal");
        assert!(catalog.component_aliases().contains(&"cta".to_string()));

        let err = catalog.get_component("widget").unwrap_err();
        assert_eq!(err.code(), "unknown_component");
        assert_eq!(err.to_json()["supportedComponents"][0], "button");
    }

    #[test]
    fn test_patterns_and_guides() {
        let (catalog, _) = counting_catalog(0);
        assert_eq!(catalog.get_pattern("Forms").unwrap().section, 25);
        assert_eq!(catalog.get_pattern("nope").unwrap_err().code(), "invalid_argument");
        assert_eq!(catalog.get_guide("theming").unwrap().kind, GuideKind::Implementation);
        assert_eq!(
            catalog.get_guide("class-ordering").unwrap().kind,
            GuideKind::Formatting
        );
        assert!(catalog
            .get_resource("design://guides/class-ordering")
            .is_err());
        assert!(catalog
            .get_resource("design://formatting/class-ordering")
            .is_ok());
    }

    #[test]
    fn test_quick_reference_cards() {
        let (catalog, _) = counting_catalog(0);
        let cards = catalog.quick_reference().unwrap();
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Colors", "Spacing", "Typography", "Contrast", "Breakpoints"]
        );
        assert_eq!(cards[0].headers, ["Role", "Token", "Hex"]);
    }

    #[test]
    fn test_code_examples_filter_by_language() {
        let (catalog, _) = counting_catalog(0);
        let all = catalog.code_examples(11, None).unwrap();
        assert!(!all.is_empty());
        let tsx = catalog.code_examples(11, Some("TSX")).unwrap();
        assert!(tsx.iter().all(|b| b.language == "tsx"));
        assert!(catalog.code_examples(11, Some("cobol")).unwrap().is_empty());
    }
}
