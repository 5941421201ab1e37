//! Statements: options (`CYPHER`, `EXPLAIN`, `PROFILE`), queries and
//! schema commands.
//!
//! ```txt
//! Statement
//!     StatementOption* (SchemaCommand | Query)
//! StatementOption
//!     CYPHER Version? (name = value)*
//!     EXPLAIN
//!     PROFILE
//! SchemaCommand
//!     (CREATE | DROP) INDEX ON :Label ( PropName )
//!     (CREATE | DROP) CONSTRAINT ON ( Identifier :Label )
//!         ASSERT PropertyExpression IS UNIQUE
//!     (CREATE | DROP) CONSTRAINT ON ( Identifier :Label )
//!         ASSERT Expression
//!     (CREATE | DROP) CONSTRAINT ON ()-[ Identifier :RelType ]-()
//!         ASSERT Expression
//! ```

use crate::ast::{NodeId, NodeKind};
use crate::lexer::{Keyword, TokenKind, T};
use crate::parser::grammar::{expression, identifier, query, symbolic_name, unescape_string};
use crate::parser::Parser;

/// Parse one statement. Always yields a root: a `Statement` node, or a
/// bare `Error` node when no statement could be begun at all.
pub(crate) fn statement(p: &mut Parser) -> NodeId {
    let start = p.start();

    let mut options = Vec::new();
    loop {
        let option_start = p.start();
        if p.eat_kw(Keyword::Explain) {
            options.push(p.arena.explain_option(p.span(option_start)));
        } else if p.eat_kw(Keyword::Profile) {
            options.push(p.arena.profile_option(p.span(option_start)));
        } else if p.at_kw(Keyword::Cypher) {
            options.push(cypher_option(p));
        } else {
            break;
        }
    }

    let body_start = p.start();
    let body = if at_schema_command(p) {
        schema_command(p)
    } else {
        query::query(p)
    };

    match body {
        Some(body) => p.arena.statement(options, body, p.span(start)),
        None if options.is_empty() => {
            p.err_expected("a statement");
            p.recover(start, None)
        }
        None => {
            let body = p.err_recover("a query or schema command", body_start, None);
            p.arena.statement(options, body, p.span(start))
        }
    }
}

/// `CYPHER 2.3 planner=cost runtime=interpreted …`
fn cypher_option(p: &mut Parser) -> NodeId {
    let start = p.start();
    p.pop(); // CYPHER

    let version = if matches!(p.peek(), TokenKind::Int | TokenKind::Float) {
        let token = p.pop();
        Some(p.arena.string(token.data().to_string(), token.range()))
    } else {
        None
    };

    let mut params = Vec::new();
    while matches!(p.peek(), TokenKind::Name) && p.peek_n(2) == T![=] {
        let param_start = p.start();
        let name_token = p.pop();
        let name = p
            .arena
            .string(name_token.data().to_string(), name_token.range());
        p.pop(); // =
        let value = option_value(p);
        let Some(value) = value else { break };
        params.push(p.arena.cypher_option_param(name, value, p.span(param_start)));
    }

    p.arena.cypher_option(version, params, p.span(start))
}

/// Option values are stored as strings whatever their spelling.
fn option_value(p: &mut Parser) -> Option<NodeId> {
    match p.peek() {
        TokenKind::Name | TokenKind::Int | TokenKind::Float | TokenKind::Keyword(_) => {
            let token = p.pop();
            Some(p.arena.string(token.data().to_string(), token.range()))
        }
        TokenKind::StringValue => {
            let token = p.pop();
            let value = unescape_string(token.data());
            Some(p.arena.string(value, token.range()))
        }
        _ => {
            p.err_expected("an option value");
            None
        }
    }
}

fn at_schema_command(p: &mut Parser) -> bool {
    if p.at_kw(Keyword::Drop) {
        return true;
    }
    p.at_kw(Keyword::Create)
        && matches!(
            p.peek_n(2),
            TokenKind::Keyword(Keyword::Index | Keyword::Constraint)
        )
}

fn schema_command(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let create = p.eat_kw(Keyword::Create);
    if !create {
        p.expect_kw(Keyword::Drop, "CREATE or DROP");
    }

    if p.eat_kw(Keyword::Index) {
        p.expect_kw(Keyword::On, "ON");
        p.expect(T![:], "':'");
        let label = symbolic_name(p, NodeKind::Label, "a label name")?;
        p.expect(T!['('], "'('");
        let prop = symbolic_name(p, NodeKind::PropName, "a property name")?;
        p.expect(T![')'], "')'");
        let kind = if create {
            NodeKind::CreateNodePropIndex
        } else {
            NodeKind::DropNodePropIndex
        };
        return Some(p.arena.prop_index(kind, label, prop, p.span(start)));
    }

    if p.eat_kw(Keyword::Constraint) {
        p.expect_kw(Keyword::On, "ON");
        // `( )` opens the relationship form, `( ident :Label )` the node
        // form.
        if p.at(T!['(']) && p.peek_n(2) == T![')'] {
            return rel_constraint(p, create, start);
        }
        return node_constraint(p, create, start);
    }

    p.err_expected("INDEX or CONSTRAINT");
    None
}

fn node_constraint(
    p: &mut Parser,
    create: bool,
    start: crate::lexer::InputPosition,
) -> Option<NodeId> {
    p.expect(T!['('], "'('");
    let target = identifier(p)?;
    p.expect(T![:], "':'");
    let label = symbolic_name(p, NodeKind::Label, "a label name")?;
    p.expect(T![')'], "')'");
    p.expect_kw(Keyword::Assert, "ASSERT");
    let asserted = expression::postfix_expression(p)?;
    let unique = if p.at_kws(Keyword::Is, Keyword::Unique) {
        p.pop();
        p.pop();
        true
    } else {
        false
    };
    let kind = if create {
        NodeKind::CreateNodePropConstraint
    } else {
        NodeKind::DropNodePropConstraint
    };
    Some(
        p.arena
            .node_prop_constraint(kind, target, label, asserted, unique, p.span(start)),
    )
}

fn rel_constraint(
    p: &mut Parser,
    create: bool,
    start: crate::lexer::InputPosition,
) -> Option<NodeId> {
    p.expect(T!['('], "'('");
    p.expect(T![')'], "')'");
    p.eat(T![<]);
    p.expect(T![-], "'-'");
    p.expect(T!['['], "'['");
    let target = identifier(p)?;
    p.expect(T![:], "':'");
    let reltype = symbolic_name(p, NodeKind::RelType, "a relationship type")?;
    p.expect(T![']'], "']'");
    p.expect(T![-], "'-'");
    p.eat(T![>]);
    p.expect(T!['('], "'('");
    p.expect(T![')'], "')'");
    p.expect_kw(Keyword::Assert, "ASSERT");
    let asserted = expression::postfix_expression(p)?;
    let unique = if p.at_kws(Keyword::Is, Keyword::Unique) {
        p.pop();
        p.pop();
        true
    } else {
        false
    };
    let kind = if create {
        NodeKind::CreateRelPropConstraint
    } else {
        NodeKind::DropRelPropConstraint
    };
    Some(
        p.arena
            .rel_prop_constraint(kind, target, reltype, asserted, unique, p.span(start)),
    )
}

#[cfg(test)]
mod test {
    use crate::ast::{Category, NodeKind};
    use crate::Parser;

    #[test]
    fn statement_options() {
        let result = Parser::new("EXPLAIN PROFILE RETURN 1;").parse();
        assert_eq!(result.errors().count(), 0);
        let statement = result.directives().next().unwrap();
        let options: Vec<_> = statement.options().collect();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].kind(), NodeKind::ExplainOption);
        assert!(options[0].instance_of(Category::StatementOption));
        assert_eq!(options[1].kind(), NodeKind::ProfileOption);
        assert_eq!(statement.body().unwrap().kind(), NodeKind::Query);
    }

    #[test]
    fn cypher_option_with_version_and_params() {
        let result = Parser::new("CYPHER 2.3 planner=cost RETURN 1;").parse();
        assert_eq!(
            result.errors().count(),
            0,
            "{:?}",
            result.errors().collect::<Vec<_>>()
        );
        let statement = result.directives().next().unwrap();
        let option = statement.options().next().unwrap();
        assert_eq!(option.kind(), NodeKind::CypherOption);
        assert_eq!(option.version().unwrap().value_text(), Some("2.3"));
        let params: Vec<_> = option.option_params().collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].kind(), NodeKind::CypherOptionParam);
        assert_eq!(params[0].child(0).unwrap().value_text(), Some("planner"));
        assert_eq!(params[0].child(1).unwrap().value_text(), Some("cost"));
    }

    #[test]
    fn create_and_drop_index() {
        let result = Parser::new("CREATE INDEX ON :Person(name);").parse();
        assert_eq!(result.errors().count(), 0);
        let body = result.directives().next().unwrap().body().unwrap();
        assert_eq!(body.kind(), NodeKind::CreateNodePropIndex);
        assert!(body.instance_of(Category::SchemaCommand));
        assert_eq!(body.label().unwrap().name(), Some("Person"));
        assert_eq!(body.prop_name().unwrap().name(), Some("name"));

        let result = Parser::new("DROP INDEX ON :Person(name);").parse();
        assert_eq!(result.errors().count(), 0);
        let body = result.directives().next().unwrap().body().unwrap();
        assert_eq!(body.kind(), NodeKind::DropNodePropIndex);
    }

    #[test]
    fn unique_node_constraint() {
        let result =
            Parser::new("CREATE CONSTRAINT ON (n:Person) ASSERT n.email IS UNIQUE;").parse();
        assert_eq!(
            result.errors().count(),
            0,
            "{:?}",
            result.errors().collect::<Vec<_>>()
        );
        let body = result.directives().next().unwrap().body().unwrap();
        assert_eq!(body.kind(), NodeKind::CreateNodePropConstraint);
        assert!(body.is_unique());
        assert_eq!(body.identifier().unwrap().name(), Some("n"));
        assert_eq!(body.label().unwrap().name(), Some("Person"));
        assert_eq!(body.expression().unwrap().kind(), NodeKind::PropertyOperator);
    }

    #[test]
    fn exists_rel_constraint() {
        let result = Parser::new(
            "CREATE CONSTRAINT ON ()-[r:KNOWS]-() ASSERT exists(r.since);",
        )
        .parse();
        assert_eq!(
            result.errors().count(),
            0,
            "{:?}",
            result.errors().collect::<Vec<_>>()
        );
        let body = result.directives().next().unwrap().body().unwrap();
        assert_eq!(body.kind(), NodeKind::CreateRelPropConstraint);
        assert!(!body.is_unique());
        assert_eq!(body.reltype().unwrap().name(), Some("KNOWS"));
        assert_eq!(body.expression().unwrap().kind(), NodeKind::ApplyOperator);
    }

    #[test]
    fn garbage_input_yields_an_error_root() {
        let result = Parser::new("%%%;RETURN 1;").parse();
        assert!(result.errors().count() >= 1);
        let segments: Vec<_> = result.segments().to_vec();
        assert_eq!(segments.len(), 2);
        assert!(segments[0].directive().is_none());
        assert!(segments[1].directive().is_some());
    }
}
