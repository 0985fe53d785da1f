//! Tool catalog: names, descriptions, parameter schemas, typed requests.
//!
//! [`ToolName`] is the closed set of callable tools. Each tool publishes a
//! JSON Schema for its parameters; incoming arguments are checked against
//! that schema by [`validate_params`] (required fields, primitive types,
//! enums) and then deserialized into the tool's typed argument struct,
//! producing a [`ToolRequest`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::color::ColorFormat;
use crate::error::{DesignError, Result};
use crate::models::TextSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    SearchDesignSystem,
    FindColor,
    ConvertColor,
    ValidateContrast,
    GenerateComponent,
    ViewAnalytics,
    QuerySection,
    QueryComponentSpecs,
    QueryDesignTokens,
    QueryPatterns,
    QueryImplementationGuide,
    GetQuickReference,
    ExtractCodeExamples,
    SearchDesignSystemEnhanced,
    GetCacheStats,
}

impl ToolName {
    pub const ALL: &'static [ToolName] = &[
        ToolName::SearchDesignSystem,
        ToolName::FindColor,
        ToolName::ConvertColor,
        ToolName::ValidateContrast,
        ToolName::GenerateComponent,
        ToolName::ViewAnalytics,
        ToolName::QuerySection,
        ToolName::QueryComponentSpecs,
        ToolName::QueryDesignTokens,
        ToolName::QueryPatterns,
        ToolName::QueryImplementationGuide,
        ToolName::GetQuickReference,
        ToolName::ExtractCodeExamples,
        ToolName::SearchDesignSystemEnhanced,
        ToolName::GetCacheStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::SearchDesignSystem => "search_design_system",
            ToolName::FindColor => "find_color",
            ToolName::ConvertColor => "convert_color",
            ToolName::ValidateContrast => "validate_contrast",
            ToolName::GenerateComponent => "generate_component",
            ToolName::ViewAnalytics => "view_analytics",
            ToolName::QuerySection => "query_section",
            ToolName::QueryComponentSpecs => "query_component_specs",
            ToolName::QueryDesignTokens => "query_design_tokens",
            ToolName::QueryPatterns => "query_patterns",
            ToolName::QueryImplementationGuide => "query_implementation_guide",
            ToolName::GetQuickReference => "get_quick_reference",
            ToolName::ExtractCodeExamples => "extract_code_examples",
            ToolName::SearchDesignSystemEnhanced => "search_design_system_enhanced",
            ToolName::GetCacheStats => "get_cache_stats",
        }
    }

    pub fn all_names() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }

    /// One-line description for agent discovery.
    pub fn description(&self) -> &'static str {
        match self {
            ToolName::SearchDesignSystem => {
                "Search tokens, components, patterns, formatting guides and templates by keyword"
            }
            ToolName::FindColor => {
                "Find color tokens by name, semantic role, palette or literal value, optionally \
                 filtered by WCAG level"
            }
            ToolName::ConvertColor => {
                "Convert a color between hex, rgb, rgba, hsl, hsla, CSS variable and Tailwind \
                 notations"
            }
            ToolName::ValidateContrast => {
                "Compute the WCAG contrast ratio of two colors with AA/AAA verdicts and a \
                 recommendation"
            }
            ToolName::GenerateComponent => {
                "Generate component code for React, Vue, Angular or plain HTML"
            }
            ToolName::ViewAnalytics => "Show tool usage analytics, optionally resetting them",
            ToolName::QuerySection => {
                "Read a design system section by number, or list sections matching a title search"
            }
            ToolName::QueryComponentSpecs => {
                "Get a component's variants, sizes, props, accessibility notes and documentation"
            }
            ToolName::QueryDesignTokens => {
                "Get design tokens: all groups or one of colors, semantic, spacing, typography, \
                 radius, shadows"
            }
            ToolName::QueryPatterns => "Get one UX pattern, or list all patterns",
            ToolName::QueryImplementationGuide => {
                "Get one implementation or formatting guide, or list all guides"
            }
            ToolName::GetQuickReference => {
                "Cheat-sheet tables for colors, spacing, typography, contrast and breakpoints"
            }
            ToolName::ExtractCodeExamples => {
                "Extract the code examples of a section, optionally filtered by language"
            }
            ToolName::SearchDesignSystemEnhanced => {
                "Full-text search over section prose, code examples and tables"
            }
            ToolName::GetCacheStats => "Section cache statistics",
        }
    }

    /// JSON Schema for the tool's parameters.
    pub fn parameters_schema(&self) -> Value {
        let (properties, required): (Value, Vec<&str>) = match self {
            ToolName::SearchDesignSystem => (
                json!({
                    "query": { "type": "string", "description": "Keywords" },
                    "category": {
                        "type": "string",
                        "description": "all, tokens, components, patterns, formatting or templates",
                        "default": "all"
                    },
                    "limit": { "type": "integer", "minimum": 1, "description": "Maximum results" }
                }),
                vec!["query"],
            ),
            ToolName::FindColor => (
                json!({
                    "query": {
                        "type": "string",
                        "description": "Token name (blue-500), role (primary), palette or color value"
                    },
                    "wcagLevel": {
                        "type": "string",
                        "enum": ["AA", "AAA"],
                        "description": "Keep tokens meeting this level against white or black"
                    }
                }),
                vec!["query"],
            ),
            ToolName::ConvertColor => (
                json!({
                    "color": { "type": "string", "description": "Any supported color notation" },
                    "toFormat": {
                        "type": "string",
                        "enum": ColorFormat::ACCEPTED
                    },
                    "opacity": {
                        "type": "number",
                        "minimum": 0,
                        "maximum": 1,
                        "description": "Alpha for rgba/hsla output"
                    }
                }),
                vec!["color", "toFormat"],
            ),
            ToolName::ValidateContrast => (
                json!({
                    "foreground": { "type": "string" },
                    "background": { "type": "string" },
                    "textSize": { "type": "string", "enum": TextSize::ACCEPTED, "default": "normal" }
                }),
                vec!["foreground", "background"],
            ),
            ToolName::GenerateComponent => (
                json!({
                    "component": {
                        "type": "string",
                        "description": "button, input, card, modal, badge or alert"
                    },
                    "framework": {
                        "type": "string",
                        "description": "react, vue, angular or html"
                    },
                    "variant": { "type": "string", "description": "Defaults to the first variant" },
                    "includeImports": { "type": "boolean", "default": true }
                }),
                vec!["component", "framework"],
            ),
            ToolName::ViewAnalytics => (
                json!({
                    "reset": { "type": "boolean", "default": false }
                }),
                vec![],
            ),
            ToolName::QuerySection => (
                json!({
                    "section": { "type": "integer", "minimum": 1, "maximum": 35 },
                    "search": { "type": "string", "description": "Title substring" }
                }),
                vec![],
            ),
            ToolName::QueryComponentSpecs => (
                json!({
                    "component": { "type": "string", "description": "Name or alias" }
                }),
                vec!["component"],
            ),
            ToolName::QueryDesignTokens => (
                json!({
                    "type": {
                        "type": "string",
                        "enum": ["all", "colors", "semantic", "spacing", "typography", "radius", "shadows"],
                        "default": "all"
                    }
                }),
                vec![],
            ),
            ToolName::QueryPatterns => (
                json!({
                    "pattern": { "type": "string" }
                }),
                vec![],
            ),
            ToolName::QueryImplementationGuide => (
                json!({
                    "guide": { "type": "string" }
                }),
                vec![],
            ),
            ToolName::GetQuickReference | ToolName::GetCacheStats => (json!({}), vec![]),
            ToolName::ExtractCodeExamples => (
                json!({
                    "section": { "type": "integer", "minimum": 1, "maximum": 35 },
                    "language": { "type": "string" }
                }),
                vec!["section"],
            ),
            ToolName::SearchDesignSystemEnhanced => (
                json!({
                    "query": { "type": "string" },
                    "section": { "type": "integer", "minimum": 1, "maximum": 35 },
                    "type": {
                        "type": "string",
                        "enum": ["all", "content", "code", "tables"],
                        "default": "all"
                    },
                    "limit": { "type": "integer", "minimum": 1 }
                }),
                vec!["query"],
            ),
        };
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DesignError::UnknownTool {
                name: s.to_string(),
                valid: ToolName::all_names(),
            })
    }
}

/// Tool descriptor returned by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<ToolName> for ToolInfo {
    fn from(tool: ToolName) -> Self {
        Self {
            name: tool.as_str().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parameter validation
// ═══════════════════════════════════════════════════════════════════════

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check `params` against a tool schema and return the cleaned object.
///
/// `null` values count as absent. Properties the schema does not declare
/// are passed through untouched.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Map<String, Value>> {
    let mut params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            return Err(DesignError::invalid(format!(
                "arguments must be an object, got {}",
                json_type_name(other)
            )))
        }
    };
    params_obj.retain(|_, v| !v.is_null());

    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default();

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    for field in &required {
        if !params_obj.contains_key(*field) {
            return Err(DesignError::invalid(format!(
                "missing required parameter: {}",
                field
            )));
        }
    }

    for (name, prop_schema) in &properties {
        let Some(value) = params_obj.get(name) else {
            continue;
        };

        if let Some(expected) = prop_schema.get("type").and_then(|t| t.as_str()) {
            let type_ok = match expected {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !type_ok {
                return Err(DesignError::invalid(format!(
                    "parameter '{}' must be of type '{}', got {}",
                    name,
                    expected,
                    json_type_name(value)
                )));
            }
        }

        if let Some(allowed) = prop_schema.get("enum").and_then(|e| e.as_array()) {
            let matches = allowed.iter().any(|a| match (a.as_str(), value.as_str()) {
                (Some(a), Some(v)) => a.eq_ignore_ascii_case(v),
                _ => a == value,
            });
            if !matches {
                let valid: Vec<String> = allowed
                    .iter()
                    .map(|a| a.as_str().map(str::to_string).unwrap_or_else(|| a.to_string()))
                    .collect();
                return Err(DesignError::invalid_choice(
                    format!("invalid value for '{}': {}", name, value),
                    &valid,
                ));
            }
        }

        if let Some(n) = value.as_f64() {
            let min = prop_schema.get("minimum").and_then(|m| m.as_f64());
            let max = prop_schema.get("maximum").and_then(|m| m.as_f64());
            let out_of_range = min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m);
            if out_of_range {
                return Err(match (name.as_str(), prop_schema.get("type").and_then(|t| t.as_str())) {
                    ("section", Some("integer")) => DesignError::SectionOutOfRange {
                        number: value.as_i64().unwrap_or(i64::MAX),
                        max: crate::models::SECTION_COUNT,
                    },
                    _ => DesignError::invalid(format!(
                        "parameter '{}' is out of range: {}",
                        name, value
                    )),
                });
            }
        }
    }

    Ok(params_obj)
}

// ═══════════════════════════════════════════════════════════════════════
// Typed requests
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FindColorArgs {
    pub query: String,
    #[serde(default)]
    pub wcag_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConvertColorArgs {
    pub color: String,
    pub to_format: String,
    #[serde(default)]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateContrastArgs {
    pub foreground: String,
    pub background: String,
    #[serde(default)]
    pub text_size: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateComponentArgs {
    pub component: String,
    pub framework: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default = "default_true")]
    pub include_imports: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct ViewAnalyticsArgs {
    #[serde(default)]
    pub reset: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QuerySectionArgs {
    #[serde(default)]
    pub section: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryComponentArgs {
    pub component: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct QueryTokensArgs {
    #[serde(default, rename = "type")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct QueryPatternsArgs {
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct QueryGuideArgs {
    #[serde(default)]
    pub guide: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExtractCodeArgs {
    pub section: i64,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EnhancedSearchArgs {
    pub query: String,
    #[serde(default)]
    pub section: Option<i64>,
    #[serde(default, rename = "type")]
    pub scope: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    SearchDesignSystem(SearchArgs),
    FindColor(FindColorArgs),
    ConvertColor(ConvertColorArgs),
    ValidateContrast(ValidateContrastArgs),
    GenerateComponent(GenerateComponentArgs),
    ViewAnalytics(ViewAnalyticsArgs),
    QuerySection(QuerySectionArgs),
    QueryComponentSpecs(QueryComponentArgs),
    QueryDesignTokens(QueryTokensArgs),
    QueryPatterns(QueryPatternsArgs),
    QueryImplementationGuide(QueryGuideArgs),
    GetQuickReference,
    ExtractCodeExamples(ExtractCodeArgs),
    SearchDesignSystemEnhanced(EnhancedSearchArgs),
    GetCacheStats,
}

fn typed<T: DeserializeOwned>(tool: ToolName, params: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(params))
        .map_err(|e| DesignError::invalid(format!("invalid arguments for {}: {}", tool, e)))
}

impl ToolRequest {
    /// Validate `args` against the tool's schema and build the typed request.
    pub fn parse(tool: ToolName, args: &Value) -> Result<Self> {
        let params = validate_params(&tool.parameters_schema(), args)?;
        let request = match tool {
            ToolName::SearchDesignSystem => Self::SearchDesignSystem(typed(tool, params)?),
            ToolName::FindColor => Self::FindColor(typed(tool, params)?),
            ToolName::ConvertColor => Self::ConvertColor(typed(tool, params)?),
            ToolName::ValidateContrast => Self::ValidateContrast(typed(tool, params)?),
            ToolName::GenerateComponent => Self::GenerateComponent(typed(tool, params)?),
            ToolName::ViewAnalytics => Self::ViewAnalytics(typed(tool, params)?),
            ToolName::QuerySection => {
                let args: QuerySectionArgs = typed(tool, params)?;
                if args.section.is_none() && args.search.is_none() {
                    return Err(DesignError::invalid(
                        "query_section needs either 'section' or 'search'",
                    ));
                }
                Self::QuerySection(args)
            }
            ToolName::QueryComponentSpecs => Self::QueryComponentSpecs(typed(tool, params)?),
            ToolName::QueryDesignTokens => Self::QueryDesignTokens(typed(tool, params)?),
            ToolName::QueryPatterns => Self::QueryPatterns(typed(tool, params)?),
            ToolName::QueryImplementationGuide => {
                Self::QueryImplementationGuide(typed(tool, params)?)
            }
            ToolName::GetQuickReference => Self::GetQuickReference,
            ToolName::ExtractCodeExamples => Self::ExtractCodeExamples(typed(tool, params)?),
            ToolName::SearchDesignSystemEnhanced => {
                Self::SearchDesignSystemEnhanced(typed(tool, params)?)
            }
            ToolName::GetCacheStats => Self::GetCacheStats,
        };
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        assert_eq!(ToolName::ALL.len(), 15);
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>().unwrap(), *tool);
        }
        let err = "nope".parse::<ToolName>().unwrap_err();
        assert_eq!(err.code(), "unknown_tool");
        assert_eq!(err.to_json()["validTools"].as_array().unwrap().len(), 15);
    }

    #[test]
    fn test_every_schema_is_an_object_schema() {
        for tool in ToolName::ALL {
            let schema = tool.parameters_schema();
            assert_eq!(schema["type"], "object");
            assert!(schema["properties"].is_object());
            for req in schema["required"].as_array().unwrap() {
                assert!(schema["properties"].get(req.as_str().unwrap()).is_some());
            }
        }
    }

    #[test]
    fn test_missing_required_field() {
        let err = ToolRequest::parse(ToolName::ConvertColor, &json!({ "color": "#fff" }))
            .unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        assert!(err.to_string().contains("toFormat"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = ToolRequest::parse(
            ToolName::SearchDesignSystem,
            &json!({ "query": "x", "limit": "ten" }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("must be of type 'integer'"));
    }

    #[test]
    fn test_enum_is_case_insensitive() {
        let req = ToolRequest::parse(
            ToolName::FindColor,
            &json!({ "query": "blue", "wcagLevel": "aa" }),
        )
        .unwrap();
        assert!(matches!(req, ToolRequest::FindColor(_)));
        let err = ToolRequest::parse(
            ToolName::FindColor,
            &json!({ "query": "blue", "wcagLevel": "A" }),
        )
        .unwrap_err();
        assert_eq!(err.to_json()["validValues"], json!(["AA", "AAA"]));
    }

    #[test]
    fn test_format_and_size_aliases_pass_validation() {
        for format in ColorFormat::ACCEPTED {
            assert!(format.parse::<ColorFormat>().is_ok(), "{}", format);
            let req = ToolRequest::parse(
                ToolName::ConvertColor,
                &json!({ "color": "#fff", "toFormat": format }),
            );
            assert!(req.is_ok(), "toFormat {}", format);
        }
        for size in TextSize::ACCEPTED {
            assert!(TextSize::parse(size).is_some(), "{}", size);
            let req = ToolRequest::parse(
                ToolName::ValidateContrast,
                &json!({ "foreground": "#000", "background": "#fff", "textSize": size }),
            );
            assert!(req.is_ok(), "textSize {}", size);
        }
        let err = ToolRequest::parse(
            ToolName::ConvertColor,
            &json!({ "color": "#fff", "toFormat": "cmyk" }),
        )
        .unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[test]
    fn test_opacity_range_checked() {
        let err = ToolRequest::parse(
            ToolName::ConvertColor,
            &json!({ "color": "#fff", "toFormat": "rgba", "opacity": 2 }),
        )
        .unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[test]
    fn test_section_range_is_range_error() {
        let err = ToolRequest::parse(ToolName::ExtractCodeExamples, &json!({ "section": 0 }))
            .unwrap_err();
        assert_eq!(err.code(), "range_error");
    }

    #[test]
    fn test_defaults_and_nulls() {
        let req = ToolRequest::parse(
            ToolName::GenerateComponent,
            &json!({ "component": "button", "framework": "react", "variant": null }),
        )
        .unwrap();
        let ToolRequest::GenerateComponent(args) = req else {
            panic!("wrong variant");
        };
        assert!(args.include_imports);
        assert!(args.variant.is_none());

        let req = ToolRequest::parse(ToolName::GetCacheStats, &Value::Null).unwrap();
        assert_eq!(req, ToolRequest::GetCacheStats);
    }

    #[test]
    fn test_query_section_needs_a_selector() {
        assert!(ToolRequest::parse(ToolName::QuerySection, &json!({})).is_err());
        assert!(ToolRequest::parse(ToolName::QuerySection, &json!({ "search": "color" })).is_ok());
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let err = ToolRequest::parse(ToolName::GetQuickReference, &json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }
}
