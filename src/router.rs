//! The tool router: one entry point for every tool call and resource read.
//!
//! ```text
//! name + JSON args
//!   → ToolName::from_str          (unknown → unknown_tool, lists all tools)
//!   → ToolRequest::parse          (schema validation, typed arguments)
//!   → dispatch                    (catalog / color / search / codegen)
//!   → analytics                   (duration recorded, view_analytics excluded)
//!   → ToolResponse                ({result, preview?} or {error, message, hint, …})
//! ```
//!
//! The router owns no mutable state of its own; the catalog's section cache
//! and the analytics recorder are injected and shared through `Arc`.

use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use crate::analytics::AnalyticsRecorder;
use crate::catalog::ResourceCatalog;
use crate::color::ColorEngine;
use crate::config::Config;
use crate::corpus::GuideKind;
use crate::error::{DesignError, Result};
use crate::models::{ResourceInfo, TextSize};
use crate::search::SearchIndex;
use crate::svg;
use crate::tools::{ToolInfo, ToolName, ToolRequest};

/// SVG attached to a successful result.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub mime_type: String,
    pub svg: String,
}

impl Preview {
    fn svg(svg: String) -> Self {
        Self {
            mime_type: svg::SVG_MIME.to_string(),
            svg,
        }
    }
}

/// Outcome of a tool call. Errors are values, never panics.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    Success {
        result: Value,
        preview: Option<Preview>,
    },
    Failure(DesignError),
}

impl ToolResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolResponse::Failure(_))
    }

    pub fn error(&self) -> Option<&DesignError> {
        match self {
            ToolResponse::Failure(e) => Some(e),
            ToolResponse::Success { .. } => None,
        }
    }

    /// Wire form: `{"result": …, "preview"?: …}` or the structured error.
    pub fn to_json(&self) -> Value {
        match self {
            ToolResponse::Success { result, preview } => {
                let mut body = json!({ "result": result });
                if let Some(p) = preview {
                    body["preview"] = json!(p);
                }
                body
            }
            ToolResponse::Failure(e) => e.to_json(),
        }
    }
}

type Outcome = (Value, Option<Preview>);

pub struct ToolRouter {
    catalog: Arc<ResourceCatalog>,
    analytics: Arc<AnalyticsRecorder>,
    search: SearchIndex,
    colors: ColorEngine,
}

impl ToolRouter {
    pub fn new(
        catalog: Arc<ResourceCatalog>,
        analytics: Arc<AnalyticsRecorder>,
        config: &Config,
    ) -> Self {
        let search = SearchIndex::new(Arc::clone(&catalog), &config.search);
        let colors = ColorEngine::new(catalog.tokens());
        Self {
            catalog,
            analytics,
            search,
            colors,
        }
    }

    /// Build the catalog and recorder from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let catalog = Arc::new(ResourceCatalog::from_config(config)?);
        let analytics = Arc::new(AnalyticsRecorder::new(&config.analytics));
        Ok(Self::new(catalog, analytics, config))
    }

    pub fn catalog(&self) -> &Arc<ResourceCatalog> {
        &self.catalog
    }

    pub fn analytics(&self) -> &Arc<AnalyticsRecorder> {
        &self.analytics
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        ToolName::ALL.iter().copied().map(ToolInfo::from).collect()
    }

    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        self.catalog.list_resources()
    }

    /// Read a resource body; successful reads are counted.
    pub fn read_resource(&self, uri: &str) -> Result<String> {
        let started = Instant::now();
        let body = self.catalog.get_resource(uri)?;
        self.analytics.track_resource_access(uri);
        self.analytics.track_performance(elapsed_ms(started));
        Ok(body)
    }

    /// Run one tool call.
    pub fn handle_tool_call(&self, name: &str, args: &Value) -> ToolResponse {
        let started = Instant::now();
        let tool = match ToolName::from_str(name) {
            Ok(tool) => tool,
            Err(e) => {
                tracing::debug!(tool = name, "unknown tool");
                return ToolResponse::Failure(e);
            }
        };

        let outcome = ToolRequest::parse(tool, args).and_then(|req| self.dispatch(req));

        let duration_ms = elapsed_ms(started);
        if tool != ToolName::ViewAnalytics {
            self.analytics.track_tool_call(tool.as_str(), duration_ms);
            self.analytics.track_performance(duration_ms);
        }

        match outcome {
            Ok((result, preview)) => {
                tracing::debug!(tool = %tool, duration_ms, "tool call ok");
                ToolResponse::Success { result, preview }
            }
            Err(e) => {
                tracing::debug!(tool = %tool, code = e.code(), error = %e, "tool call failed");
                ToolResponse::Failure(e)
            }
        }
    }

    fn dispatch(&self, request: ToolRequest) -> Result<Outcome> {
        match request {
            ToolRequest::SearchDesignSystem(args) => {
                let category = args.category.unwrap_or_else(|| "all".to_string());
                let results = self.search.search(
                    &args.query,
                    &category,
                    args.limit.unwrap_or(0) as usize,
                );
                Ok((
                    json!({
                        "query": args.query,
                        "category": category,
                        "total": results.len(),
                        "results": results,
                    }),
                    None,
                ))
            }

            ToolRequest::FindColor(args) => {
                let tokens = self
                    .colors
                    .find_color(&args.query, args.wcag_level.as_deref())?;
                let preview = (!tokens.is_empty()).then(|| Preview::svg(svg::color_swatches(&tokens)));
                Ok((
                    json!({
                        "query": args.query,
                        "wcagLevel": args.wcag_level,
                        "count": tokens.len(),
                        "colors": tokens,
                    }),
                    preview,
                ))
            }

            ToolRequest::ConvertColor(args) => {
                let converted = self
                    .colors
                    .convert(&args.color, &args.to_format, args.opacity)?;
                let swatch = self.colors.parse(&args.color)?.to_hex();
                Ok((
                    json!({
                        "input": args.color,
                        "format": args.to_format.to_ascii_lowercase(),
                        "result": converted,
                    }),
                    Some(Preview::svg(svg::color_swatch(&swatch, &converted))),
                ))
            }

            ToolRequest::ValidateContrast(args) => {
                let size = args
                    .text_size
                    .as_deref()
                    .map(|s| {
                        TextSize::parse(s).ok_or_else(|| {
                            DesignError::invalid_choice(
                                format!("unknown text size: '{}'", s),
                                TextSize::ACCEPTED,
                            )
                        })
                    })
                    .transpose()?
                    .unwrap_or_default();
                let result = self
                    .colors
                    .validate_contrast(&args.foreground, &args.background, size)?;
                let preview = Preview::svg(svg::contrast_sample(&result));
                Ok((json!(result), Some(preview)))
            }

            ToolRequest::GenerateComponent(args) => {
                let generator = self.catalog.generator();
                let code = generator.generate_component(
                    &args.component,
                    args.variant.as_deref(),
                    &args.framework,
                    args.include_imports,
                )?;
                let info = generator.template_info(&args.component).ok_or_else(|| {
                    DesignError::not_found(format!("design://templates/{}", args.component))
                })?;
                let variant = match &args.variant {
                    Some(v) => info
                        .variants
                        .iter()
                        .find(|known| known.eq_ignore_ascii_case(v.trim()))
                        .cloned()
                        .unwrap_or_else(|| info.default_variant.clone()),
                    None => info.default_variant.clone(),
                };
                let (fill, text) = self.variant_colors(&variant);
                let preview = svg::component_sketch(&info.component, &variant, &fill, text);
                Ok((
                    json!({
                        "component": info.component,
                        "variant": variant,
                        "framework": args.framework.to_ascii_lowercase(),
                        "includeImports": args.include_imports,
                        "code": code,
                    }),
                    Some(Preview::svg(preview)),
                ))
            }

            ToolRequest::ViewAnalytics(args) => {
                let summary = if args.reset {
                    self.analytics.summary_and_reset()
                } else {
                    self.analytics.summary()
                };
                Ok((json!({ "analytics": summary, "reset": args.reset }), None))
            }

            ToolRequest::QuerySection(args) => match (args.section, args.search) {
                (Some(n), _) => {
                    let section = self.catalog.load_section(n)?;
                    Ok((json!(*section), None))
                }
                (None, Some(query)) => {
                    let sections = self.catalog.search_sections(&query);
                    Ok((
                        json!({ "query": query, "count": sections.len(), "sections": sections }),
                        None,
                    ))
                }
                (None, None) => Err(DesignError::invalid(
                    "query_section needs either 'section' or 'search'",
                )),
            },

            ToolRequest::QueryComponentSpecs(args) => {
                let (spec, section) = self.catalog.get_component(&args.component)?;
                let template = self.catalog.generator().template_info(&spec.name);
                Ok((
                    json!({
                        "spec": spec,
                        "section": {
                            "number": section.number,
                            "title": section.title,
                            "uri": section.uri(),
                        },
                        "documentation": section.content,
                        "codeExamples": section.code_blocks,
                        "template": template,
                    }),
                    None,
                ))
            }

            ToolRequest::QueryDesignTokens(args) => {
                let tokens = self.catalog.tokens();
                let group = args
                    .group
                    .map(|g| g.trim().to_ascii_lowercase())
                    .unwrap_or_else(|| "all".to_string());
                let value = if group == "all" {
                    json!(*tokens)
                } else {
                    tokens.group(&group).ok_or_else(|| {
                        DesignError::invalid_choice(
                            format!("unknown token group: '{}'", group),
                            crate::corpus::TOKEN_GROUPS,
                        )
                    })?
                };
                Ok((
                    json!({ "type": group, "version": tokens.version, "tokens": value }),
                    None,
                ))
            }

            ToolRequest::QueryPatterns(args) => match args.pattern {
                Some(name) => {
                    let pattern = self.catalog.get_pattern(&name)?;
                    Ok((
                        json!({
                            "pattern": pattern,
                            "uri": format!("design://sections/{}", pattern.section),
                        }),
                        None,
                    ))
                }
                None => Ok((json!({ "patterns": self.catalog.patterns() }), None)),
            },

            ToolRequest::QueryImplementationGuide(args) => match args.guide {
                Some(name) => Ok((json!({ "guide": self.catalog.get_guide(&name)? }), None)),
                None => Ok((
                    json!({
                        "implementation": self.catalog.guides(GuideKind::Implementation),
                        "formatting": self.catalog.guides(GuideKind::Formatting),
                    }),
                    None,
                )),
            },

            ToolRequest::GetQuickReference => {
                let cards = self.catalog.quick_reference()?;
                Ok((json!({ "cards": cards }), None))
            }

            ToolRequest::ExtractCodeExamples(args) => {
                let examples = self
                    .catalog
                    .code_examples(args.section, args.language.as_deref())?;
                Ok((
                    json!({
                        "section": args.section,
                        "language": args.language,
                        "count": examples.len(),
                        "examples": examples,
                    }),
                    None,
                ))
            }

            ToolRequest::SearchDesignSystemEnhanced(args) => {
                let scope = args.scope.unwrap_or_else(|| "all".to_string());
                let results = self.search.search_enhanced(
                    &args.query,
                    args.section,
                    &scope,
                    args.limit.unwrap_or(0) as usize,
                )?;
                Ok((
                    json!({
                        "query": args.query,
                        "section": args.section,
                        "type": scope,
                        "total": results.len(),
                        "results": results,
                    }),
                    None,
                ))
            }

            ToolRequest::GetCacheStats => Ok((json!(self.catalog.cache_stats()), None)),
        }
    }

    /// Sketch colors for a variant, taken from the semantic roles.
    fn variant_colors(&self, variant: &str) -> (String, &'static str) {
        let role = match variant {
            "primary" | "secondary" | "success" | "warning" | "danger" | "info" => variant,
            "error" => "danger",
            _ => return ("#f3f4f6".to_string(), "#111827"),
        };
        match self.colors.parse(role) {
            Ok(c) if role == "warning" => (c.to_hex(), "#111827"),
            Ok(c) => (c.to_hex(), "#ffffff"),
            Err(_) => ("#f3f4f6".to_string(), "#111827"),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> ToolRouter {
        let config = Config::minimal();
        let catalog = Arc::new(ResourceCatalog::embedded().unwrap());
        let analytics = Arc::new(AnalyticsRecorder::new(&config.analytics));
        ToolRouter::new(catalog, analytics, &config)
    }

    #[test]
    fn test_unknown_tool_lists_valid_names() {
        let r = router();
        let resp = r.handle_tool_call("make_coffee", &json!({}));
        let body = resp.to_json();
        assert_eq!(body["error"], "unknown_tool");
        assert_eq!(body["validTools"].as_array().unwrap().len(), 15);
        assert_eq!(r.analytics().summary().total_calls, 0);
    }

    #[test]
    fn test_success_shape_with_preview() {
        let resp = router().handle_tool_call(
            "validate_contrast",
            &json!({ "foreground": "#000000", "background": "#ffffff" }),
        );
        let body = resp.to_json();
        assert_eq!(body["result"]["ratio"], 21.0);
        assert_eq!(body["result"]["wcagAA"]["passes"], true);
        assert_eq!(body["preview"]["mimeType"], "image/svg+xml");
        assert!(body["preview"]["svg"].as_str().unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_failed_calls_are_counted() {
        let r = router();
        let resp = r.handle_tool_call("convert_color", &json!({ "color": "#fff" }));
        assert!(resp.is_error());
        assert_eq!(r.analytics().summary().by_tool["convert_color"], 1);
    }

    #[test]
    fn test_view_analytics_reset() {
        let r = router();
        r.handle_tool_call("get_cache_stats", &json!({}));
        r.handle_tool_call("find_color", &json!({ "query": "blue" }));

        let before = r.handle_tool_call("view_analytics", &json!({ "reset": true })).to_json();
        assert_eq!(before["result"]["analytics"]["totalCalls"], 2);

        let after = r.handle_tool_call("view_analytics", &json!({})).to_json();
        assert_eq!(after["result"]["analytics"]["totalCalls"], 0);
    }

    #[test]
    fn test_read_resource_is_tracked() {
        let r = router();
        r.read_resource("design://tokens/colors").unwrap();
        r.read_resource("design://tokens/colors").unwrap();
        assert!(r.read_resource("design://nowhere").is_err());
        let top = r.analytics().summary().top_resources;
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_generate_component_reports_resolved_variant() {
        let body = router()
            .handle_tool_call(
                "generate_component",
                &json!({ "component": "dialog", "framework": "Vue" }),
            )
            .to_json();
        assert_eq!(body["result"]["component"], "modal");
        assert_eq!(body["result"]["variant"], "default");
        assert_eq!(body["result"]["framework"], "vue");
        assert!(body["result"]["code"].as_str().unwrap().contains("<template>"));
    }

    #[test]
    fn test_aliases_reach_the_engines() {
        let r = router();
        let tw = r
            .handle_tool_call("convert_color", &json!({ "color": "#2563eb", "toFormat": "tw" }))
            .to_json();
        assert_eq!(tw["result"]["result"], "blue-600");

        let heading = r
            .handle_tool_call(
                "validate_contrast",
                &json!({ "foreground": "#767676", "background": "#ffffff", "textSize": "heading" }),
            )
            .to_json();
        assert_eq!(heading["result"]["textSize"], "large");
        assert_eq!(heading["result"]["wcagAA"]["required"], 3.0);
    }

    #[test]
    fn test_query_tools() {
        let r = router();
        let section = r
            .handle_tool_call("query_section", &json!({ "section": 3 }))
            .to_json();
        assert_eq!(section["result"]["title"], "Color System");

        let tokens = r
            .handle_tool_call("query_design_tokens", &json!({ "type": "spacing" }))
            .to_json();
        assert_eq!(tokens["result"]["type"], "spacing");
        assert!(tokens["result"]["tokens"].is_object());

        let guides = r
            .handle_tool_call("query_implementation_guide", &json!({}))
            .to_json();
        assert_eq!(guides["result"]["formatting"].as_array().unwrap().len(), 3);

        let cards = r.handle_tool_call("get_quick_reference", &json!({})).to_json();
        assert_eq!(cards["result"]["cards"].as_array().unwrap().len(), 5);
    }
}
