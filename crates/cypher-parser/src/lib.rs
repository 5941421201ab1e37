//! A parser for the Cypher graph query language.
//!
//! `cypher-parser` turns Cypher text into a fully typed, positionally
//! annotated AST. It is written for tools that need structure but don't
//! execute queries (shells, linters, formatters, IDE tooling and query
//! pre-processors), so it is built to keep going: every syntax error is
//! recorded with an exact position, a message and an excerpt of the
//! offending line, and parsing resumes at the next synchronization point.
//!
//! ## Parsing
//!
//! ```rust
//! use cypher_parser::{Category, NodeKind, Parser};
//!
//! let result = Parser::new("MATCH (n:Person) RETURN n.name, n.age;").parse();
//! assert_eq!(result.errors().count(), 0);
//!
//! let statement = result.directives().next().unwrap();
//! let query = statement.body().unwrap();
//! let clauses: Vec<_> = query.clauses().collect();
//! assert_eq!(clauses[0].kind(), NodeKind::Match);
//! assert!(clauses[0].instance_of(Category::QueryClause));
//! assert_eq!(clauses[1].projections().count(), 2);
//! ```
//!
//! Input is split into *segments*: one statement (terminated by `;`) or
//! one client command (`:help`, terminated by a newline) plus surrounding
//! comments. Segments can also be consumed one at a time:
//!
//! ```rust
//! use cypher_parser::Parser;
//! use std::ops::ControlFlow;
//!
//! let mut names = Vec::new();
//! Parser::new(":play movies\nRETURN 1;").parse_each(|segment| {
//!     if let Some(directive) = segment.directive() {
//!         names.push(directive.kind().name());
//!     }
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(names, ["command", "statement"]);
//! ```
//!
//! Interactive shells that only need to know where directives begin and
//! end can use [`Parser::quick_parse_each`], which finds byte-identical
//! segment boundaries without building any AST.
//!
//! ## Errors
//!
//! A parse always produces a result; callers inspect
//! [`ParseResult::errors`]. Each [`ParseError`] carries the position, a
//! message, a bounded excerpt of the line it occurred on, and the offset
//! of the offending byte within that excerpt, ready for caret
//! diagnostics.

pub mod ast;
mod error;
mod lexer;
mod limit;
mod parser;
mod render;
mod segment;
#[cfg(test)]
mod tests;

pub use crate::ast::{Category, Children, Direction, Node, NodeKind, Operator};
pub use crate::error::{Error, ParseError};
pub use crate::lexer::{InputPosition, InputRange, Keyword, Lexer, Token, TokenKind};
pub use crate::limit::LimitTracker;
pub use crate::parser::Parser;
pub use crate::render::Colorization;
pub use crate::segment::{parse_reader, ParseResult, QuickSegment, Segment};
