//! Error taxonomy for the design-system service.
//!
//! Every engine returns [`Result<T>`]. Errors never cross the tool boundary as
//! raw values: the router turns them into structured JSON via
//! [`DesignError::to_json`], which carries a stable machine-readable code, the
//! human-readable message, a remediation hint, and tool-specific details such
//! as the list of valid names.
//!
//! | Variant | Code | HTTP |
//! |---------|------|------|
//! | [`InvalidArgument`](DesignError::InvalidArgument) | `invalid_argument` | 400 |
//! | [`NotFound`](DesignError::NotFound) | `not_found` | 404 |
//! | [`UnknownComponent`](DesignError::UnknownComponent) | `unknown_component` | 404 |
//! | [`UnknownTool`](DesignError::UnknownTool) | `unknown_tool` | 404 |
//! | [`InvalidColor`](DesignError::InvalidColor) | `invalid_color` | 400 |
//! | [`UnsupportedTarget`](DesignError::UnsupportedTarget) | `unsupported_target` | 400 |
//! | [`SectionOutOfRange`](DesignError::SectionOutOfRange) | `range_error` | 400 |

use serde_json::{json, Map, Value};
use thiserror::Error;

/// Result type alias using [`DesignError`].
pub type Result<T> = std::result::Result<T, DesignError>;

/// Errors produced by the catalog and the engines.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DesignError {
    /// A required argument is missing or a value is out of range.
    #[error("{message}")]
    InvalidArgument {
        message: String,
        /// Accepted values, when the argument is an enumeration.
        valid: Vec<String>,
    },

    /// No resource is addressable under this URI.
    #[error("resource not found: {uri}")]
    NotFound { uri: String },

    /// The component name is not in the alias table.
    #[error("unknown component: '{name}'")]
    UnknownComponent { name: String, valid: Vec<String> },

    /// The tool name is not registered.
    #[error("unknown tool: '{name}'")]
    UnknownTool { name: String, valid: Vec<String> },

    /// The input could not be parsed as a color.
    #[error("invalid color: '{input}'")]
    InvalidColor { input: String },

    /// The component/framework pair has no template.
    #[error("cannot generate '{component}' for framework '{framework}'")]
    UnsupportedTarget {
        component: String,
        framework: String,
        components: Vec<String>,
        frameworks: Vec<String>,
    },

    /// Section numbers are 1-based and bounded.
    #[error("section {number} is out of range (1..={max})")]
    SectionOutOfRange { number: i64, max: u8 },
}

impl DesignError {
    /// Shorthand for an [`InvalidArgument`](DesignError::InvalidArgument) without a value list.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            valid: Vec::new(),
        }
    }

    /// Shorthand for an [`InvalidArgument`](DesignError::InvalidArgument) naming the accepted values.
    pub fn invalid_choice<S: AsRef<str>>(message: impl Into<String>, valid: &[S]) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            valid: valid.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound { uri: uri.into() }
    }

    pub fn invalid_color(input: impl Into<String>) -> Self {
        Self::InvalidColor {
            input: input.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::NotFound { .. } => "not_found",
            Self::UnknownComponent { .. } => "unknown_component",
            Self::UnknownTool { .. } => "unknown_tool",
            Self::InvalidColor { .. } => "invalid_color",
            Self::UnsupportedTarget { .. } => "unsupported_target",
            Self::SectionOutOfRange { .. } => "range_error",
        }
    }

    /// Remediation text shown next to the message.
    pub fn hint(&self) -> String {
        match self {
            Self::InvalidArgument { valid, .. } if !valid.is_empty() => {
                format!("Use one of: {}", valid.join(", "))
            }
            Self::InvalidArgument { .. } => {
                "Check the tool's parameter schema via tools/list".to_string()
            }
            Self::NotFound { .. } => {
                "List available resources with list_resources".to_string()
            }
            Self::UnknownComponent { valid, .. } => {
                format!("Known components: {}", valid.join(", "))
            }
            Self::UnknownTool { valid, .. } => format!("Valid tools: {}", valid.join(", ")),
            Self::InvalidColor { .. } => "Supported notations: #rrggbb, #rgb, rgb(r, g, b), \
                 rgba(r, g, b, a), hsl(h, s%, l%), or a token name such as blue-500"
                .to_string(),
            Self::UnsupportedTarget {
                components,
                frameworks,
                ..
            } => format!(
                "Supported components: {}. Supported frameworks: {}",
                components.join(", "),
                frameworks.join(", ")
            ),
            Self::SectionOutOfRange { max, .. } => {
                format!("Sections are numbered 1 to {}", max)
            }
        }
    }

    /// Tool-specific fields merged into the error body, e.g. `validTools`.
    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        match self {
            Self::InvalidArgument { valid, .. } if !valid.is_empty() => {
                details.insert("validValues".into(), json!(valid));
            }
            Self::UnknownComponent { valid, .. } => {
                details.insert("supportedComponents".into(), json!(valid));
            }
            Self::UnknownTool { valid, .. } => {
                details.insert("validTools".into(), json!(valid));
            }
            Self::UnsupportedTarget {
                components,
                frameworks,
                ..
            } => {
                details.insert("supportedComponents".into(), json!(components));
                details.insert("supportedFrameworks".into(), json!(frameworks));
            }
            _ => {}
        }
        details
    }

    /// Structured error object returned across the tool boundary.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("error".into(), json!(self.code()));
        body.insert("message".into(), json!(self.to_string()));
        body.insert("hint".into(), json!(self.hint()));
        body.extend(self.details());
        Value::Object(body)
    }

    /// Whether the error was caused by the caller rather than a missing target.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::NotFound { .. } | Self::UnknownComponent { .. } | Self::UnknownTool { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(DesignError::invalid("x").code(), "invalid_argument");
        assert_eq!(DesignError::not_found("design://x").code(), "not_found");
        assert_eq!(DesignError::invalid_color("nope").code(), "invalid_color");
        let range = DesignError::SectionOutOfRange { number: 0, max: 35 };
        assert_eq!(range.code(), "range_error");
        assert_eq!(range.to_string(), "section 0 is out of range (1..=35)");
    }

    #[test]
    fn test_unknown_tool_json_lists_tools() {
        let err = DesignError::UnknownTool {
            name: "nope".to_string(),
            valid: vec!["a".to_string(), "b".to_string()],
        };
        let body = err.to_json();
        assert_eq!(body["error"], "unknown_tool");
        assert_eq!(body["validTools"], json!(["a", "b"]));
        assert!(body["hint"].as_str().unwrap().contains("a, b"));
    }

    #[test]
    fn test_unsupported_target_names_both_sets() {
        let err = DesignError::UnsupportedTarget {
            component: "button".to_string(),
            framework: "svelte".to_string(),
            components: vec!["button".to_string()],
            frameworks: vec!["react".to_string(), "vue".to_string()],
        };
        let body = err.to_json();
        assert_eq!(body["supportedComponents"], json!(["button"]));
        assert_eq!(body["supportedFrameworks"], json!(["react", "vue"]));
    }

    #[test]
    fn test_client_error_split() {
        assert!(DesignError::invalid("bad").is_client_error());
        assert!(!DesignError::not_found("x").is_client_error());
    }
}
