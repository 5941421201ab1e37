//! Human-readable AST tables and error diagnostics.
//!
//! The table lists every node of a segment in preorder, one row per node,
//! with its ordinal, input range, `>`-indented type name and a short
//! description referencing child ordinals:
//!
//! ```text
//! @0   0..9  statement           body=@1
//! @1   0..8  > query             clauses=[@2]
//! @2   0..8  > > RETURN          projections=[@3]
//! @3   7..8  > > > projection    expression=@4
//! @4   7..8  > > > > integer     1
//! ```
//!
//! The layout is for people, not programs; only the test corpus pins it.

use crate::ast::{Node, NodeKind, Operator};
use crate::error::ParseError;
use crate::segment::Segment;
use std::fmt::{self, Write};

/// A colorization scheme: a before/after pair of byte strings for each
/// rendered token class.
#[derive(Debug)]
pub struct Colorization {
    pub normal: [&'static str; 2],
    pub error: [&'static str; 2],
    pub error_token: [&'static str; 2],
    pub error_message: [&'static str; 2],
    pub ast_ordinal: [&'static str; 2],
    pub ast_range: [&'static str; 2],
    pub ast_indent: [&'static str; 2],
    pub ast_type: [&'static str; 2],
    pub ast_desc: [&'static str; 2],
}

static NO_COLORIZATION: Colorization = Colorization {
    normal: ["", ""],
    error: ["", ""],
    error_token: ["", ""],
    error_message: ["", ""],
    ast_ordinal: ["", ""],
    ast_range: ["", ""],
    ast_indent: ["", ""],
    ast_type: ["", ""],
    ast_desc: ["", ""],
};

static ANSI_COLORIZATION: Colorization = Colorization {
    normal: ["\x1b[0m", "\x1b[0m"],
    error: ["\x1b[31m", "\x1b[0m"],
    error_token: ["\x1b[1;31m", "\x1b[0m"],
    error_message: ["\x1b[1m", "\x1b[0m"],
    ast_ordinal: ["\x1b[90m", "\x1b[0m"],
    ast_range: ["\x1b[90m", "\x1b[0m"],
    ast_indent: ["\x1b[34m", "\x1b[0m"],
    ast_type: ["\x1b[36m", "\x1b[0m"],
    ast_desc: ["\x1b[32m", "\x1b[0m"],
};

impl Colorization {
    /// Rules for uncolorized output.
    pub fn none() -> &'static Colorization {
        &NO_COLORIZATION
    }

    /// Rules for ANSI terminal output.
    pub fn ansi() -> &'static Colorization {
        &ANSI_COLORIZATION
    }
}

struct Row {
    ordinal: u32,
    range: String,
    depth: usize,
    type_name: &'static str,
    desc: String,
}

fn collect_rows(node: Node<'_>, depth: usize, rows: &mut Vec<Row>) {
    rows.push(Row {
        ordinal: node.ordinal(),
        range: format!("{}..{}", node.range().start.offset, node.range().end.offset),
        depth,
        type_name: node.kind().name(),
        desc: description(node),
    });
    for child in node.children() {
        collect_rows(child, depth + 1, rows);
    }
}

pub(crate) fn render_segment(
    segment: &Segment,
    w: &mut impl Write,
    width: usize,
    colors: &Colorization,
) -> fmt::Result {
    let mut rows = Vec::new();
    for root in segment.roots() {
        collect_rows(root, 0, &mut rows);
    }

    let ordinal_width = rows
        .iter()
        .map(|row| format!("@{}", row.ordinal).len())
        .max()
        .unwrap_or(2);
    let range_width = rows.iter().map(|row| row.range.len()).max().unwrap_or(4);
    let name_width = rows
        .iter()
        .map(|row| row.depth * 2 + row.type_name.len())
        .max()
        .unwrap_or(0);

    for row in rows {
        let ordinal = format!("@{}", row.ordinal);
        write!(
            w,
            "{}{ordinal:<ordinal_width$}{} {}{:>range_width$}{}  ",
            colors.ast_ordinal[0], colors.ast_ordinal[1], colors.ast_range[0], row.range,
            colors.ast_range[1],
        )?;
        write!(w, "{}", colors.ast_indent[0])?;
        for _ in 0..row.depth {
            w.write_str("> ")?;
        }
        write!(w, "{}", colors.ast_indent[1])?;
        let mut desc = row.desc;
        if width > 0 {
            let reserved = ordinal_width + range_width + name_width + 5;
            let max_desc = width.saturating_sub(reserved).max(20);
            if desc.chars().count() > max_desc {
                desc = desc.chars().take(max_desc.saturating_sub(1)).collect();
                desc.push('…');
            }
        }
        let pad = name_width - row.depth * 2;
        writeln!(
            w,
            "{}{:<pad$}{}  {}{}{}",
            colors.ast_type[0], row.type_name, colors.ast_type[1], colors.ast_desc[0], desc,
            colors.ast_desc[1],
        )?;
    }
    Ok(())
}

/// Render one error as a message line, the offending context and a caret.
pub(crate) fn render_error(
    error: &ParseError,
    w: &mut impl Write,
    colors: &Colorization,
) -> fmt::Result {
    writeln!(
        w,
        "{}{}{} ({})",
        colors.error_message[0],
        error.message(),
        colors.error_message[1],
        error.position()
    )?;
    writeln!(
        w,
        "{}{}{}",
        colors.error[0],
        error.context(),
        colors.error[1]
    )?;
    for _ in 0..error.context_offset() {
        w.write_char(' ')?;
    }
    writeln!(w, "{}^{}", colors.error_token[0], colors.error_token[1])
}

fn ord(node: Node<'_>) -> String {
    format!("@{}", node.ordinal())
}

fn ord_opt(node: Option<Node<'_>>) -> String {
    node.map(ord).unwrap_or_default()
}

fn ord_list<'a>(nodes: impl Iterator<Item = Node<'a>>) -> String {
    let mut out = String::from("[");
    for (i, node) in nodes.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&ord(node));
    }
    out.push(']');
    out
}

fn push_part(parts: &mut Vec<String>, label: &str, value: String) {
    if !value.is_empty() && value != "[]" {
        if label.is_empty() {
            parts.push(value);
        } else {
            parts.push(format!("{label}={value}"));
        }
    }
}

/// The per-node description column.
fn description(node: Node<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();
    match node.kind() {
        NodeKind::Statement => {
            push_part(&mut parts, "options", ord_list(node.options()));
            push_part(&mut parts, "body", ord_opt(node.body()));
        }
        NodeKind::CypherOption => {
            push_part(&mut parts, "version", ord_opt(node.version()));
            push_part(&mut parts, "params", ord_list(node.option_params()));
        }
        NodeKind::CypherOptionParam => {
            push_part(&mut parts, "name", ord_opt(node.child(0)));
            push_part(&mut parts, "value", ord_opt(node.child(1)));
        }
        NodeKind::CreateNodePropIndex | NodeKind::DropNodePropIndex => {
            push_part(&mut parts, "ON", ord_opt(node.label()));
            push_part(&mut parts, "prop", ord_opt(node.prop_name()));
        }
        NodeKind::CreateNodePropConstraint
        | NodeKind::DropNodePropConstraint
        | NodeKind::CreateRelPropConstraint
        | NodeKind::DropRelPropConstraint => {
            push_part(&mut parts, "identifier", ord_opt(node.identifier()));
            push_part(
                &mut parts,
                "label",
                ord_opt(node.label().or_else(|| node.reltype())),
            );
            push_part(&mut parts, "expression", ord_opt(node.expression()));
            if node.is_unique() {
                parts.push("IS UNIQUE".to_string());
            }
        }
        NodeKind::Query => {
            push_part(&mut parts, "options", ord_list(node.options()));
            push_part(&mut parts, "clauses", ord_list(node.clauses()));
        }
        NodeKind::UsingPeriodicCommit => {
            push_part(&mut parts, "limit", ord_opt(node.batch_size()));
        }
        NodeKind::LoadCsv => {
            if node.has_headers() {
                parts.push("WITH HEADERS".to_string());
            }
            push_part(&mut parts, "url", ord_opt(node.expression()));
            push_part(&mut parts, "AS", ord_opt(node.child(1)));
            push_part(&mut parts, "FIELDTERMINATOR", ord_opt(node.field_terminator()));
        }
        NodeKind::Start => {
            push_part(&mut parts, "points", ord_list(node.points()));
            push_part(&mut parts, "WHERE", ord_opt(node.predicate()));
        }
        NodeKind::NodeIndexLookup
        | NodeKind::RelIndexLookup
        | NodeKind::NodeIndexQuery
        | NodeKind::RelIndexQuery => {
            push_part(&mut parts, "identifier", ord_opt(node.identifier()));
            push_part(&mut parts, "index", ord_opt(node.index_name()));
            push_part(&mut parts, "lookup", ord_opt(node.lookup()));
        }
        NodeKind::NodeIdLookup | NodeKind::RelIdLookup => {
            push_part(&mut parts, "identifier", ord_opt(node.identifier()));
            push_part(&mut parts, "ids", ord_list(node.lookup_ids()));
        }
        NodeKind::AllNodesScan | NodeKind::AllRelsScan => {
            push_part(&mut parts, "identifier", ord_opt(node.identifier()));
        }
        NodeKind::Match => {
            if node.is_optional() {
                parts.push("OPTIONAL".to_string());
            }
            push_part(&mut parts, "pattern", ord_opt(node.pattern()));
            push_part(&mut parts, "hints", ord_list(node.hints()));
            push_part(&mut parts, "WHERE", ord_opt(node.predicate()));
        }
        NodeKind::UsingIndex => {
            push_part(&mut parts, "identifier", ord_opt(node.identifier()));
            push_part(&mut parts, "label", ord_opt(node.label()));
            push_part(&mut parts, "prop", ord_opt(node.prop_name()));
        }
        NodeKind::UsingJoin => {
            push_part(&mut parts, "ON", ord_list(node.identifiers()));
        }
        NodeKind::UsingScan => {
            push_part(&mut parts, "identifier", ord_opt(node.identifier()));
            push_part(&mut parts, "label", ord_opt(node.label()));
        }
        NodeKind::Merge => {
            push_part(&mut parts, "path", ord_opt(node.path()));
            push_part(&mut parts, "actions", ord_list(node.actions()));
        }
        NodeKind::OnMatch | NodeKind::OnCreate | NodeKind::Set | NodeKind::Remove
        | NodeKind::OrderBy => {
            push_part(&mut parts, "items", ord_list(node.items()));
        }
        NodeKind::Create => {
            if node.is_unique() {
                parts.push("UNIQUE".to_string());
            }
            push_part(&mut parts, "pattern", ord_opt(node.pattern()));
        }
        NodeKind::SetProperty => {
            parts.push(format!(
                "{}={}",
                ord_opt(node.property()),
                ord_opt(node.expression())
            ));
        }
        NodeKind::SetAllProperties => {
            parts.push(format!(
                "{}={}",
                ord_opt(node.identifier()),
                ord_opt(node.expression())
            ));
        }
        NodeKind::MergeProperties => {
            parts.push(format!(
                "{}+={}",
                ord_opt(node.identifier()),
                ord_opt(node.expression())
            ));
        }
        NodeKind::SetLabels | NodeKind::RemoveLabels => {
            let mut out = ord_opt(node.identifier());
            for label in node.labels() {
                out.push(':');
                out.push_str(&ord(label));
            }
            parts.push(out);
        }
        NodeKind::Delete => {
            if node.is_detach() {
                parts.push("DETACH".to_string());
            }
            push_part(&mut parts, "expressions", ord_list(node.arguments()));
        }
        NodeKind::RemoveProperty => {
            push_part(&mut parts, "prop", ord_opt(node.property()));
        }
        NodeKind::Foreach => {
            parts.push(format!(
                "[{} IN {} | {}]",
                ord_opt(node.identifier()),
                ord_opt(node.child(1)),
                ord_list(node.clauses())
            ));
        }
        NodeKind::With | NodeKind::Return => {
            if node.is_distinct() {
                parts.push("DISTINCT".to_string());
            }
            if node.includes_existing() {
                parts.push("*".to_string());
            }
            push_part(&mut parts, "projections", ord_list(node.projections()));
            push_part(&mut parts, "ORDER BY", ord_opt(node.order_by()));
            push_part(&mut parts, "SKIP", ord_opt(node.skip()));
            push_part(&mut parts, "LIMIT", ord_opt(node.limit()));
            push_part(&mut parts, "WHERE", ord_opt(node.predicate()));
        }
        NodeKind::Unwind => {
            push_part(&mut parts, "expression", ord_opt(node.expression()));
            push_part(&mut parts, "AS", ord_opt(node.alias()));
        }
        NodeKind::Call => {
            push_part(&mut parts, "name", ord_opt(node.proc_name()));
            push_part(&mut parts, "args", ord_list(node.arguments()));
            push_part(&mut parts, "YIELD", ord_list(node.projections()));
        }
        NodeKind::Projection => {
            push_part(&mut parts, "expression", ord_opt(node.expression()));
            push_part(&mut parts, "AS", ord_opt(node.alias()));
        }
        NodeKind::SortItem => {
            push_part(&mut parts, "expression", ord_opt(node.expression()));
            parts.push(if node.is_ascending() {
                "ASCENDING".to_string()
            } else {
                "DESCENDING".to_string()
            });
        }
        NodeKind::Union => {
            if node.is_all() {
                parts.push("ALL".to_string());
            }
        }
        NodeKind::UnaryOperator => {
            let symbol = node.operator().map(Operator::as_str).unwrap_or("?");
            parts.push(format!("{symbol} {}", ord_opt(node.argument())));
        }
        NodeKind::BinaryOperator => {
            let symbol = node.operator().map(Operator::as_str).unwrap_or("?");
            parts.push(format!(
                "{} {symbol} {}",
                ord_opt(node.left()),
                ord_opt(node.right())
            ));
        }
        NodeKind::Comparison => {
            let mut out = String::new();
            let ops = node.operators().unwrap_or(&[]);
            for (i, arg) in node.arguments().enumerate() {
                if i > 0 {
                    let symbol = ops.get(i - 1).map(|op| op.as_str()).unwrap_or("?");
                    out.push_str(&format!(" {symbol} "));
                }
                out.push_str(&ord(arg));
            }
            parts.push(out);
        }
        NodeKind::ApplyOperator => {
            let mut out = ord_opt(node.function_name());
            out.push('(');
            if node.is_distinct() {
                out.push_str("DISTINCT ");
            }
            for (i, arg) in node.arguments().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&ord(arg));
            }
            out.push(')');
            parts.push(out);
        }
        NodeKind::ApplyAllOperator => {
            parts.push(format!("{}(*)", ord_opt(node.function_name())));
        }
        NodeKind::PropertyOperator => {
            parts.push(format!(
                "{}.{}",
                ord_opt(node.expression()),
                ord_opt(node.prop_name())
            ));
        }
        NodeKind::SubscriptOperator => {
            parts.push(format!(
                "{}[{}]",
                ord_opt(node.expression()),
                ord_opt(node.subscript())
            ));
        }
        NodeKind::SliceOperator => {
            parts.push(format!(
                "{}[{}..{}]",
                ord_opt(node.expression()),
                ord_opt(node.start_bound()),
                ord_opt(node.end_bound())
            ));
        }
        NodeKind::LabelsOperator => {
            let mut out = ord_opt(node.expression());
            for label in node.labels() {
                out.push(':');
                out.push_str(&ord(label));
            }
            parts.push(out);
        }
        NodeKind::ListComprehension
        | NodeKind::Filter
        | NodeKind::Extract
        | NodeKind::All
        | NodeKind::Any
        | NodeKind::Single
        | NodeKind::None => {
            let mut out = format!(
                "[{} IN {}",
                ord_opt(node.identifier()),
                ord_opt(node.expression())
            );
            if let Some(predicate) = node.predicate() {
                out.push_str(&format!(" WHERE {}", ord(predicate)));
            }
            if let Some(eval) = node.eval() {
                out.push_str(&format!(" | {}", ord(eval)));
            }
            out.push(']');
            parts.push(out);
        }
        NodeKind::Reduce => {
            parts.push(format!(
                "[{}={}, {} IN {} | {}]",
                ord_opt(node.accumulator()),
                ord_opt(node.init()),
                ord_opt(node.identifier()),
                ord_opt(node.expression()),
                ord_opt(node.eval())
            ));
        }
        NodeKind::Case => {
            push_part(&mut parts, "expression", ord_opt(node.expression()));
            let mut alternatives = String::from("[");
            for (i, (predicate, value)) in node.case_alternatives().iter().enumerate() {
                if i > 0 {
                    alternatives.push_str(", ");
                }
                alternatives.push_str(&format!("({}, {})", ord(*predicate), ord(*value)));
            }
            alternatives.push(']');
            push_part(&mut parts, "alternatives", alternatives);
            push_part(&mut parts, "default", ord_opt(node.case_default()));
        }
        NodeKind::Collection => {
            push_part(&mut parts, "", ord_list(node.children()));
        }
        NodeKind::Map => {
            let mut out = String::from("{");
            for (i, (key, value)) in node.map_entries().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&format!("{}:{}", ord(*key), ord(*value)));
            }
            out.push('}');
            parts.push(out);
        }
        NodeKind::Identifier => parts.push(format!("`{}`", node.name().unwrap_or(""))),
        NodeKind::Parameter => parts.push(format!("${}", node.name().unwrap_or(""))),
        NodeKind::String => parts.push(format!("\"{}\"", node.value_text().unwrap_or(""))),
        NodeKind::Integer | NodeKind::Float => {
            parts.push(node.value_text().unwrap_or("").to_string())
        }
        NodeKind::True | NodeKind::False | NodeKind::Null | NodeKind::Error => {}
        NodeKind::Label | NodeKind::RelType => {
            parts.push(format!(":{}", node.name().unwrap_or("")))
        }
        NodeKind::PropName => parts.push(node.name().unwrap_or("").to_string()),
        NodeKind::FunctionName | NodeKind::IndexName | NodeKind::ProcName => {
            parts.push(format!("`{}`", node.name().unwrap_or("")))
        }
        NodeKind::Pattern => {
            push_part(&mut parts, "paths", ord_list(node.paths()));
        }
        NodeKind::NamedPath => {
            parts.push(format!(
                "{}={}",
                ord_opt(node.identifier()),
                ord_opt(node.path())
            ));
        }
        NodeKind::ShortestPath => {
            parts.push(format!("single={}", node.is_single()));
            push_part(&mut parts, "path", ord_opt(node.path()));
        }
        NodeKind::PatternPath => {
            let mut out = String::new();
            for (i, element) in node.elements().enumerate() {
                if i % 2 == 0 {
                    out.push_str(&format!("({})", ord(element)));
                } else {
                    out.push_str(&format!("-[{}]-", ord(element)));
                }
            }
            parts.push(out);
        }
        NodeKind::NodePattern => {
            let mut out = String::from("(");
            out.push_str(&ord_opt(node.identifier()));
            for label in node.labels() {
                out.push(':');
                out.push_str(&ord(label));
            }
            if let Some(properties) = node.properties() {
                out.push_str(&format!(" {{{}}}", ord(properties)));
            }
            out.push(')');
            parts.push(out);
        }
        NodeKind::RelPattern => {
            use crate::ast::Direction;
            let direction = node.direction().unwrap_or(Direction::Bidirectional);
            let mut out = String::new();
            out.push_str(if direction == Direction::Inbound { "<-[" } else { "-[" });
            out.push_str(&ord_opt(node.identifier()));
            for reltype in node.reltypes() {
                out.push(':');
                out.push_str(&ord(reltype));
            }
            if let Some(varlength) = node.varlength() {
                out.push('*');
                out.push_str(&ord(varlength));
            }
            if let Some(properties) = node.properties() {
                out.push_str(&format!(" {{{}}}", ord(properties)));
            }
            out.push_str(if direction == Direction::Outbound { "]->" } else { "]-" });
            parts.push(out);
        }
        NodeKind::Range => {
            parts.push(format!(
                "{}..{}",
                ord_opt(node.start_bound()),
                ord_opt(node.end_bound())
            ));
        }
        NodeKind::Command => {
            push_part(&mut parts, "name", ord_opt(node.child(0)));
            push_part(&mut parts, "args", ord_list(node.command_args()));
        }
        NodeKind::LineComment | NodeKind::BlockComment => {
            parts.push(node.value_text().unwrap_or("").trim().to_string());
        }
        NodeKind::ExplainOption | NodeKind::ProfileOption => {}
    }
    parts.retain(|part| !part.is_empty());
    parts.join(", ")
}

#[cfg(test)]
mod test {
    use crate::{Colorization, Parser};
    use expect_test::expect;

    #[test]
    fn renders_a_node_table() {
        let result = Parser::new("RETURN 1;").parse();
        let mut out = String::new();
        result.render_ast(&mut out, 0).unwrap();
        let expected = expect![[r#"
            @0 0..8  statement         body=@1
            @1 0..8  > query           clauses=[@2]
            @2 0..8  > > RETURN        projections=[@3]
            @3 7..8  > > > projection  expression=@4
            @4 7..8  > > > > integer   1
        "#]];
        expected.assert_eq(&out);
    }

    #[test]
    fn debug_formats_use_the_table() {
        let result = Parser::new("RETURN 1;").parse();
        let debugged = format!("{result:?}");
        assert!(debugged.contains("statement"));
        assert!(debugged.contains("integer"));
    }

    #[test]
    fn renders_errors_with_a_caret() {
        let result = Parser::new("MATCH (n").parse();
        let mut out = String::new();
        result.render_errors(&mut out).unwrap();
        let expected = expect![[r#"
            expected ')', found end of input (line 1, column 9 (offset 8))
            MATCH (n
                    ^
        "#]];
        expected.assert_eq(&out);
    }

    #[test]
    fn ansi_colorization_wraps_classes() {
        let result = Parser::new("MATCH (n").colorization(Colorization::ansi()).parse();
        let mut out = String::new();
        result.render_errors(&mut out).unwrap();
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains("\x1b[31m"));
    }
}
