//! # Design Harness CLI (`dsx`)
//!
//! Serves the design-system tools over MCP or HTTP, and calls them directly
//! from the shell.
//!
//! ## Usage
//!
//! ```bash
//! dsx [--config ./dsx.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dsx serve mcp` | MCP server over stdio |
//! | `dsx serve http` | JSON HTTP API on `[server].bind` |
//! | `dsx call <tool>` | Call any tool with `--param k=v` / `--json` |
//! | `dsx resources` | List `design://` resources |
//! | `dsx read <uri>` | Print a resource body |
//! | `dsx search "<query>"` | Search tokens, components and patterns |
//! | `dsx sections` | List guide sections |
//! | `dsx contrast <fg> <bg>` | WCAG contrast check |
//! | `dsx convert <color> <format>` | Convert between color notations |
//! | `dsx generate <component>` | Generate component code |
//!
//! ## Examples
//!
//! ```bash
//! dsx contrast "#ffffff" blue-600
//! dsx convert primary tailwind
//! dsx generate modal --framework vue --variant small
//! dsx call find_color --param query=red --param wcagLevel=AA
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

use design_harness::config::{self, Config};
use design_harness::router::{ToolResponse, ToolRouter};
use design_harness::{mcp, server};

/// Design Harness CLI: design-system knowledge for AI tools.
#[derive(Parser)]
#[command(
    name = "dsx",
    about = "Design Harness - design tokens, components and patterns for AI tools",
    version,
    long_about = "Design Harness answers questions about a design system: tokens, component \
    specs, patterns and implementation guides. It converts and checks colors, generates \
    component code, and serves all of it over MCP (stdio) or a JSON HTTP API."
)]
struct Cli {
    /// Path to a configuration file (TOML).
    ///
    /// Optional. Without it the embedded corpus and default settings are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },

    /// Call a tool by name.
    ///
    /// Arguments come from `--json` (an object) and then `--param` pairs,
    /// which override keys of the same name.
    Call {
        /// Tool name (see `dsx call --help` or `GET /tools/list`).
        tool: String,
        /// Tool parameters as `key=value` pairs. Values are parsed as JSON
        /// when possible, otherwise taken as strings.
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Tool parameters as a JSON object.
        #[arg(long)]
        json: Option<String>,
    },

    /// List every addressable resource.
    Resources,

    /// Print a resource body.
    Read {
        /// Resource URI, e.g. `design://sections/11`.
        uri: String,
    },

    /// Search tokens, components and patterns.
    Search {
        query: String,
        /// `all`, `tokens`, `components`, `patterns`, `formatting` or `templates`.
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long)]
        limit: Option<u64>,
    },

    /// List guide sections, optionally filtered by a search term.
    Sections {
        #[arg(long)]
        search: Option<String>,
    },

    /// Check the WCAG contrast of a color pair.
    Contrast {
        foreground: String,
        background: String,
        /// Evaluate for large text.
        #[arg(long)]
        large: bool,
    },

    /// Convert a color or token to another notation.
    Convert {
        color: String,
        /// `hex`, `rgb`, `rgba`, `hsl`, `hsla`, `css-var` or `tailwind`.
        format: String,
        /// Alpha for `rgba` / `hsla`, between 0 and 1.
        #[arg(long)]
        opacity: Option<f64>,
    },

    /// Generate component code.
    Generate {
        component: String,
        /// `react`, `vue`, `angular` or `html`.
        #[arg(long, default_value = "react")]
        framework: String,
        #[arg(long)]
        variant: Option<String>,
        /// Omit import statements.
        #[arg(long)]
        no_imports: bool,
    },
}

#[derive(Subcommand)]
enum ServeService {
    /// MCP over stdin/stdout.
    Mcp,
    /// JSON HTTP API on `[server].bind`.
    Http,
}

/// Parse a `key=value` pair for `--param` arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Interpret a `--param` value: JSON literals stay typed, anything else is a string.
fn param_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn build_args(json_arg: Option<&str>, params: &[(String, String)]) -> anyhow::Result<Value> {
    let mut args = match json_arg {
        Some(text) => match serde_json::from_str::<Value>(text).context("--json is not valid JSON")? {
            Value::Object(map) => map,
            _ => anyhow::bail!("--json must be a JSON object"),
        },
        None => Map::new(),
    };
    for (key, value) in params {
        args.insert(key.clone(), param_value(value));
    }
    Ok(Value::Object(args))
}

fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(p) => config::load_config(p),
        None => Ok(Config::minimal()),
    }
}

/// Print a tool response; failures go to stderr and become a non-zero exit.
fn emit(response: ToolResponse) -> anyhow::Result<()> {
    match response {
        ToolResponse::Failure(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.to_json())?);
            anyhow::bail!("{}", e)
        }
        ToolResponse::Success { result, .. } => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = load(cli.config.as_ref())?;

    if let Commands::Serve { service } = &cli.command {
        return match service {
            ServeService::Mcp => mcp::run_stdio(&cfg).await,
            ServeService::Http => server::run_server(&cfg).await,
        };
    }

    let router = ToolRouter::from_config(&cfg)?;

    match cli.command {
        Commands::Serve { .. } => Ok(()),
        Commands::Call { tool, params, json } => {
            let args = build_args(json.as_deref(), &params)?;
            emit(router.handle_tool_call(&tool, &args))
        }
        Commands::Resources => {
            for r in router.list_resources() {
                println!("{:<36} {}", r.uri, r.name);
            }
            Ok(())
        }
        Commands::Read { uri } => {
            let body = router.read_resource(&uri)?;
            println!("{}", body);
            Ok(())
        }
        Commands::Search {
            query,
            category,
            limit,
        } => {
            let mut args = json!({ "query": query, "category": category });
            if let Some(limit) = limit {
                args["limit"] = json!(limit);
            }
            emit(router.handle_tool_call("search_design_system", &args))
        }
        Commands::Sections { search } => {
            let args = json!({ "search": search.unwrap_or_default() });
            emit(router.handle_tool_call("query_section", &args))
        }
        Commands::Contrast {
            foreground,
            background,
            large,
        } => {
            let args = json!({
                "foreground": foreground,
                "background": background,
                "textSize": if large { "large" } else { "normal" },
            });
            emit(router.handle_tool_call("validate_contrast", &args))
        }
        Commands::Convert {
            color,
            format,
            opacity,
        } => {
            let mut args = json!({ "color": color, "toFormat": format });
            if let Some(opacity) = opacity {
                args["opacity"] = json!(opacity);
            }
            emit(router.handle_tool_call("convert_color", &args))
        }
        Commands::Generate {
            component,
            framework,
            variant,
            no_imports,
        } => {
            let mut args = json!({
                "component": component,
                "framework": framework,
                "includeImports": !no_imports,
            });
            if let Some(variant) = variant {
                args["variant"] = json!(variant);
            }
            emit(router.handle_tool_call("generate_component", &args))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("query=red").unwrap(),
            ("query".to_string(), "red".to_string())
        );
        assert_eq!(
            parse_key_val("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn test_param_values_keep_json_types() {
        assert_eq!(param_value("5"), json!(5));
        assert_eq!(param_value("true"), json!(true));
        assert_eq!(param_value("red"), json!("red"));
        assert_eq!(param_value("\"5\""), json!("5"));
    }

    #[test]
    fn test_search_help_lists_every_category() {
        use clap::CommandFactory;
        let cli = Cli::command();
        let search = cli.find_subcommand("search").unwrap();
        let category = search
            .get_arguments()
            .find(|a| a.get_id() == "category")
            .unwrap();
        let help = category.get_help().unwrap().to_string();
        for name in design_harness::search::Category::NAMES {
            assert!(help.contains(name), "missing {} in '{}'", name, help);
        }
    }

    #[test]
    fn test_params_override_json() {
        let args = build_args(
            Some(r#"{"query": "blue", "limit": 3}"#),
            &[("query".to_string(), "red".to_string())],
        )
        .unwrap();
        assert_eq!(args, json!({ "query": "red", "limit": 3 }));
        assert!(build_args(Some("[1]"), &[]).is_err());
    }
}
