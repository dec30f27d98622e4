#![forbid(unsafe_code)]

//! # Twig
//!
//! A small class-based language used to exercise the thicket engine end to
//! end: a pest grammar, an arena-backed AST implementing
//! [`thicket_ast::Node`] and a metric catalog with its provider.
//!
//! ```
//! use thicket_metrics::LanguageMetricsProvider;
//! use thicket_twig::{parse, TwigMetrics};
//! use thicket_ast::Node;
//!
//! let root = parse("class C { method m(a) { if (a) return 1; return 0; } }").unwrap();
//! let method = root.child(0).child(0);
//! assert_eq!(TwigMetrics::new().metric_by_name(&method, "CYCLO"), Ok(2.0));
//! ```

pub mod ast_builder;
pub mod metrics;
pub mod nodes;
pub mod parser;
pub mod provider;

pub use metrics::{COUNT_IMPORTS, IGNORE_BOOLEAN_PATHS};
pub use nodes::{TwigKind, TwigNode, TwigNodeExt, TwigPayload};
pub use parser::{parse, TwigParseError};
pub use provider::{find_operations, TwigMetrics};
