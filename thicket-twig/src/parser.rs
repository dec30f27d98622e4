//! Twig parsing.
//!
//! Source text is parsed by the pest grammar in `twig.pest`, then
//! [`crate::ast_builder::AstBuilder`] turns the parse tree into a
//! [`NodeProto`] which is laid out into an arena.

use std::fmt;

use pest::error::LineColLocation;
use thicket_ast::NodeProto;
use tracing::{debug, instrument};

use crate::ast_builder::AstBuilder;
use crate::nodes::{TwigNode, TwigPayload};

#[derive(pest_derive::Parser)]
#[grammar = "twig.pest"]
pub struct TwigPestParser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwigParseError {
    /// The source does not match the grammar.
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    /// The parse tree did not have the expected shape.
    Malformed(String),
}

impl fmt::Display for TwigParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwigParseError::Syntax {
                line,
                column,
                message,
            } => write!(f, "syntax error at {}:{}: {}", line, column, message),
            TwigParseError::Malformed(msg) => write!(f, "malformed parse tree: {}", msg),
        }
    }
}

impl std::error::Error for TwigParseError {}

impl From<pest::error::Error<Rule>> for TwigParseError {
    fn from(error: pest::error::Error<Rule>) -> Self {
        let (line, column) = match error.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        TwigParseError::Syntax {
            line,
            column,
            message: error.variant.message().into_owned(),
        }
    }
}

/// Parses a twig file into a tree and returns its `CompilationUnit` root.
#[instrument(skip(source), fields(len = source.len()))]
pub fn parse(source: &str) -> Result<TwigNode, TwigParseError> {
    let root = parse_proto(source)?.build();
    debug!("parsed twig file");
    Ok(root)
}

/// Parses a twig file without laying it out.
pub fn parse_proto(source: &str) -> Result<NodeProto<TwigPayload>, TwigParseError> {
    use pest::Parser;

    let mut pairs = TwigPestParser::parse(Rule::file, source)?;
    let file = pairs
        .next()
        .ok_or_else(|| TwigParseError::Malformed("no file rule".to_string()))?;
    AstBuilder::build_file(file)
}
