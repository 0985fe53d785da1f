//! # Design Harness
//!
//! A design-system knowledge service for AI tools.
//!
//! Design Harness answers questions about a design system (tokens, component
//! specifications, patterns, implementation guides and a long-form guide
//! split into numbered sections), converts and checks colors, generates
//! component code for several frameworks, and records usage analytics. Every
//! capability is a named tool behind one [`router::ToolRouter`], exposed over
//! MCP (stdio) and a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────┐   ┌──────────────┐
//! │  Corpus  │──▶│ ResourceCatalog  │──▶│ SearchIndex  │
//! │ JSON+MD  │   │ sections (cache) │   │ ColorEngine  │
//! └──────────┘   └────────┬─────────┘   │ CodeGenerator│
//!                         │             └──────┬───────┘
//!                         ▼                    ▼
//!                   ┌───────────────────────────────┐
//!                   │ ToolRouter (+ Analytics)      │
//!                   └───────┬──────────────┬────────┘
//!                           ▼              ▼
//!                     ┌──────────┐   ┌──────────┐
//!                     │ MCP stdio│   │   HTTP   │
//!                     └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! dsx serve mcp                      # MCP over stdio
//! dsx serve http                     # JSON API on 127.0.0.1:7341
//! dsx contrast "#ffffff" blue-600
//! dsx generate button --framework vue
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Error taxonomy with stable codes |
//! | [`models`] | Core data types |
//! | [`corpus`] | Bundled data and section sources |
//! | [`catalog`] | Resource URIs, section cache, components and guides |
//! | [`color`] | Color parsing, conversion and WCAG contrast |
//! | [`search`] | Weighted keyword search |
//! | [`codegen`] | Component templates and framework rendering |
//! | [`svg`] | SVG previews |
//! | [`analytics`] | Usage counters |
//! | [`tools`] | Tool names, schemas and argument validation |
//! | [`router`] | Tool dispatch |
//! | [`server`] | JSON HTTP adapter |
//! | [`mcp`] | MCP stdio bridge |

pub mod analytics;
pub mod catalog;
pub mod codegen;
pub mod color;
pub mod config;
pub mod corpus;
pub mod error;
pub mod mcp;
pub mod models;
pub mod router;
pub mod search;
pub mod server;
pub mod svg;
pub mod tools;
