//! `MATCH` clauses and their hints.
//!
//! ```txt
//! Match
//!     (OPTIONAL)? MATCH Pattern MatchHint* (WHERE Expression)?
//! MatchHint
//!     USING INDEX identifier :Label ( prop )
//!     USING JOIN ON identifier (, identifier)*
//!     USING SCAN identifier :Label
//! ```

use crate::ast::{NodeId, NodeKind};
use crate::lexer::{Keyword, T};
use crate::parser::grammar::{expression, identifier, label, pattern, symbolic_name};
use crate::parser::Parser;

pub(crate) fn match_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let optional = p.eat_kw(Keyword::Optional);
    p.expect_kw(Keyword::Match, "MATCH");

    let pattern_start = p.start();
    let pattern = pattern::pattern(p).unwrap_or_else(|| p.recover(pattern_start, None));

    let mut hints = Vec::new();
    while p.at_kw(Keyword::Using) {
        let hint_start = p.start();
        match hint(p) {
            Some(hint) => hints.push(hint),
            None => hints.push(p.recover(hint_start, None)),
        }
    }

    let predicate = if p.eat_kw(Keyword::Where) {
        let predicate_start = p.start();
        Some(
            expression::expression(p)
                .unwrap_or_else(|| p.recover(predicate_start, None)),
        )
    } else {
        None
    };

    Some(
        p.arena
            .match_clause(optional, pattern, hints, predicate, p.span(start)),
    )
}

fn hint(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // USING
    if p.eat_kw(Keyword::Index) {
        let target = identifier(p)?;
        let hint_label = label(p)?;
        p.expect(T!['('], "'('");
        let prop = symbolic_name(p, NodeKind::PropName, "a property name")?;
        p.expect(T![')'], "')'");
        return Some(p.arena.using_index(target, hint_label, prop, p.span(start)));
    }
    if p.eat_kw(Keyword::Join) {
        p.expect_kw(Keyword::On, "ON");
        let mut identifiers = vec![identifier(p)?];
        while p.eat(T![,]) {
            identifiers.push(identifier(p)?);
        }
        return Some(p.arena.using_join(identifiers, p.span(start)));
    }
    if p.eat_kw(Keyword::Scan) {
        let target = identifier(p)?;
        let hint_label = label(p)?;
        return Some(p.arena.using_scan(target, hint_label, p.span(start)));
    }
    p.err_expected("INDEX, JOIN or SCAN");
    None
}

#[cfg(test)]
mod test {
    use crate::ast::{Category, NodeKind};
    use crate::Parser;

    fn single_match(input: &str) -> crate::ParseResult {
        Parser::new(input).parse()
    }

    #[test]
    fn match_with_where() {
        let result = single_match("MATCH (n) WHERE n.age > 21 RETURN n;");
        assert_eq!(result.errors().count(), 0);
        let clause = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        assert_eq!(clause.kind(), NodeKind::Match);
        assert!(clause.instance_of(Category::QueryClause));
        assert!(!clause.is_optional());
        assert!(clause.predicate().is_some());
        assert_eq!(clause.predicate().unwrap().kind(), NodeKind::Comparison);
    }

    #[test]
    fn optional_match() {
        let result = single_match("OPTIONAL MATCH (n)-->(m) RETURN m;");
        assert_eq!(result.errors().count(), 0);
        let clause = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        assert!(clause.is_optional());
    }

    #[test]
    fn hints() {
        let result = single_match(
            "MATCH (n:Person) USING INDEX n:Person(name) USING SCAN n:Person \
             WHERE n.name = 'x' RETURN n;",
        );
        assert_eq!(result.errors().count(), 0);
        let clause = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        let hints: Vec<_> = clause.hints().collect();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].kind(), NodeKind::UsingIndex);
        assert!(hints[0].instance_of(Category::MatchHint));
        assert_eq!(hints[0].prop_name().unwrap().name(), Some("name"));
        assert_eq!(hints[1].kind(), NodeKind::UsingScan);
        assert_eq!(hints[1].label().unwrap().name(), Some("Person"));
    }

    #[test]
    fn join_hint() {
        let result = single_match("MATCH (a)-->(b) USING JOIN ON a, b RETURN a;");
        assert_eq!(result.errors().count(), 0);
        let clause = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        let hint = clause.hints().next().unwrap();
        assert_eq!(hint.kind(), NodeKind::UsingJoin);
        assert_eq!(hint.identifiers().count(), 2);
    }

    #[test]
    fn truncated_pattern_leaves_an_error_node() {
        let result = Parser::new("MATCH (n").parse();
        assert_eq!(result.errors().count(), 1);
        let error = result.errors().next().unwrap();
        assert!(error.message().contains("')'"));
        assert_eq!(error.position().offset, 8);
        assert_eq!(error.context(), "MATCH (n");
        assert_eq!(error.context_offset(), 8);

        let clause = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        let pattern = clause.pattern().unwrap();
        assert_eq!(pattern.kind(), NodeKind::Error);
        assert_eq!(pattern.range().start.offset, 6);
        assert_eq!(pattern.range().end.offset, 8);
    }
}
