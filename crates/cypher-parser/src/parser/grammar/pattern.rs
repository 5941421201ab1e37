//! Pattern parsing: `(a:Label {props})-[r:TYPE*1..2]->(b)` and friends.
//!
//! A pattern is a comma-separated list of parts; a part is optionally
//! named (`p = …`) or a shortest-path function; a path is a non-empty
//! alternation of node and relationship patterns that starts and ends
//! with a node pattern. A `-` opens a relationship whose direction is
//! given by the surrounding `<`/`>` arrowheads.

use crate::ast::{Direction, NodeId, NodeKind};
use crate::lexer::{Keyword, TokenKind, T};
use crate::parser::grammar::{expression, identifier, is_name, opt_identifier, symbolic_name};
use crate::parser::Parser;

/// A full pattern: one or more parts separated by commas.
pub(crate) fn pattern(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut paths = vec![pattern_part(p)?];
    while p.eat(T![,]) {
        let part_start = p.start();
        match pattern_part(p) {
            Some(path) => paths.push(path),
            None => paths.push(p.recover(part_start, None)),
        }
    }
    Some(p.arena.pattern(paths, p.span(start)))
}

/// A pattern part: `ident = path`, a shortest-path function, or a bare
/// path.
pub(crate) fn pattern_part(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    if at_shortest_path(p) {
        return shortest_path(p);
    }
    if is_name(p.peek()) && p.peek_n(2) == T![=] {
        let name = identifier(p)?;
        p.pop(); // =
        let path = if at_shortest_path(p) {
            shortest_path(p)?
        } else {
            pattern_path(p)?
        };
        return Some(p.arena.named_path(name, path, p.span(start)));
    }
    pattern_path(p)
}

fn at_shortest_path(p: &mut Parser) -> bool {
    matches!(
        p.peek(),
        TokenKind::Keyword(Keyword::ShortestPath | Keyword::AllShortestPaths)
    ) && p.peek_n(2) == T!['(']
}

fn shortest_path(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let single = p.at_kw(Keyword::ShortestPath);
    p.pop();
    p.expect(T!['('], "'('");
    let path = pattern_path(p)?;
    p.expect(T![')'], "')'");
    Some(p.arena.shortest_path(single, path, p.span(start)))
}

/// `(n)`, `(n)-[r]->(m)`, `(a)<--(b)--(c)`, …
pub(crate) fn pattern_path(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut elements = vec![node_pattern(p)?];
    while matches!(p.peek(), T![<] | T![-]) {
        elements.push(rel_pattern(p)?);
        elements.push(node_pattern(p)?);
    }
    Some(p.arena.pattern_path(elements, p.span(start)))
}

/// `( identifier? label* properties? )`
fn node_pattern(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    if !p.expect(T!['('], "'('") {
        return None;
    }
    let identifier = opt_identifier(p);
    let mut labels = Vec::new();
    while p.at(T![:]) {
        p.pop();
        labels.push(symbolic_name(p, NodeKind::Label, "a label name")?);
    }
    let properties = properties(p)?;
    if !p.expect(T![')'], "')'") {
        return None;
    }
    Some(
        p.arena
            .node_pattern(identifier, labels, properties, p.span(start)),
    )
}

/// `-[r:TYPE|OTHER*1..2 {props}]->` and all the shorter spellings down to
/// a bare `--`.
fn rel_pattern(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let left_arrow = p.eat(T![<]);
    if !p.expect(T![-], "'-'") {
        return None;
    }

    let mut identifier = None;
    let mut reltypes = Vec::new();
    let mut varlength = None;
    let mut props = None;
    if p.eat(T!['[']) {
        identifier = opt_identifier(p);
        if p.eat(T![:]) {
            reltypes.push(symbolic_name(p, NodeKind::RelType, "a relationship type")?);
            while p.eat(T![|]) {
                p.eat(T![:]);
                reltypes.push(symbolic_name(p, NodeKind::RelType, "a relationship type")?);
            }
        }
        if p.at(T![*]) {
            varlength = Some(varlength_range(p)?);
        }
        props = properties(p)?;
        if !p.expect(T![']'], "']'") {
            return None;
        }
    }

    if !p.expect(T![-], "'-'") {
        return None;
    }
    let right_arrow = p.eat(T![>]);

    let direction = match (left_arrow, right_arrow) {
        (true, false) => Direction::Inbound,
        (false, true) => Direction::Outbound,
        _ => Direction::Bidirectional,
    };
    Some(p.arena.rel_pattern(
        direction,
        identifier,
        reltypes,
        varlength,
        props,
        p.span(start),
    ))
}

/// `*`, `*2`, `*..5`, `*2..`, `*2..5`: both bounds optional; a single
/// bound without `..` fixes the length exactly.
fn varlength_range(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // *
    let from = if p.at(TokenKind::Int) {
        let token = p.pop();
        Some(p.arena.integer(token.data(), token.range()))
    } else {
        None
    };
    let (from, to) = if p.eat(T![..]) {
        let to = if p.at(TokenKind::Int) {
            let token = p.pop();
            Some(p.arena.integer(token.data(), token.range()))
        } else {
            None
        };
        (from, to)
    } else {
        (from, from)
    };
    Some(p.arena.range_node(from, to, p.span(start)))
}

/// Node/relationship properties: a map literal or a parameter.
fn properties(p: &mut Parser) -> Option<Option<NodeId>> {
    match p.peek() {
        TokenKind::Parameter => {
            let token = p.pop();
            Some(Some(p.arena.parameter(&token.data()[1..], token.range())))
        }
        T!['{'] => Some(Some(expression::curly(p)?)),
        _ => Some(None),
    }
}

#[cfg(test)]
mod test {
    use crate::ast::{Direction, NodeKind};
    use crate::Parser;

    fn match_pattern_path<R>(input: &str, check: impl FnOnce(crate::Node<'_>) -> R) -> R {
        let result = Parser::new(input).parse();
        assert_eq!(
            result.errors().count(),
            0,
            "unexpected errors: {:?}",
            result.errors().collect::<Vec<_>>()
        );
        let statement = result.directives().next().unwrap();
        let clause = statement.body().unwrap().clauses().next().unwrap();
        let pattern = clause.pattern().unwrap();
        let path = pattern.paths().next().unwrap();
        check(path)
    }

    #[test]
    fn single_node_pattern() {
        match_pattern_path("MATCH (n:Person {name: 'Alice'}) RETURN n;", |path| {
            assert_eq!(path.kind(), NodeKind::PatternPath);
            assert_eq!(path.elements().count(), 1);
            let node = path.elements().next().unwrap();
            assert_eq!(node.kind(), NodeKind::NodePattern);
            assert_eq!(node.identifier().unwrap().name(), Some("n"));
            let labels: Vec<_> = node.labels().map(|l| l.name().unwrap().to_string()).collect();
            assert_eq!(labels, ["Person"]);
            let props = node.properties().unwrap();
            assert_eq!(props.kind(), NodeKind::Map);
            let entries = props.map_entries();
            assert_eq!(entries[0].0.name(), Some("name"));
            assert_eq!(entries[0].1.value_text(), Some("Alice"));
        });
    }

    #[test]
    fn directions() {
        match_pattern_path("MATCH (a)-[r]->(b) RETURN r;", |path| {
            let rel = path.child(1).unwrap();
            assert_eq!(rel.kind(), NodeKind::RelPattern);
            assert_eq!(rel.direction(), Some(Direction::Outbound));
            assert_eq!(rel.identifier().unwrap().name(), Some("r"));
        });
        match_pattern_path("MATCH (a)<-[r]-(b) RETURN r;", |path| {
            assert_eq!(path.child(1).unwrap().direction(), Some(Direction::Inbound));
        });
        match_pattern_path("MATCH (a)--(b) RETURN a;", |path| {
            assert_eq!(
                path.child(1).unwrap().direction(),
                Some(Direction::Bidirectional)
            );
        });
        match_pattern_path("MATCH (a)<-->(b) RETURN a;", |path| {
            assert_eq!(
                path.child(1).unwrap().direction(),
                Some(Direction::Bidirectional)
            );
        });
    }

    #[test]
    fn reltypes_and_varlength() {
        match_pattern_path("MATCH (a)-[r:KNOWS|:LIKES*1..3]->(b) RETURN r;", |path| {
            let rel = path.child(1).unwrap();
            let types: Vec<_> = rel
                .reltypes()
                .map(|t| t.name().unwrap().to_string())
                .collect();
            assert_eq!(types, ["KNOWS", "LIKES"]);
            let range = rel.varlength().unwrap();
            assert_eq!(range.kind(), NodeKind::Range);
            assert_eq!(range.start_bound().unwrap().value_text(), Some("1"));
            assert_eq!(range.end_bound().unwrap().value_text(), Some("3"));
        });
    }

    #[test]
    fn bare_and_exact_varlength() {
        match_pattern_path("MATCH (a)-[*]->(b) RETURN a;", |path| {
            let range = path.child(1).unwrap().varlength().unwrap();
            assert!(range.start_bound().is_none());
            assert!(range.end_bound().is_none());
        });
        match_pattern_path("MATCH (a)-[*2]->(b) RETURN a;", |path| {
            let range = path.child(1).unwrap().varlength().unwrap();
            // An exact length stores one bound; both slots point at it.
            assert_eq!(range.n_children(), 1);
            assert_eq!(range.start_bound(), range.end_bound());
            assert_eq!(range.start_bound().unwrap().value_text(), Some("2"));
        });
        match_pattern_path("MATCH (a)-[*..5]->(b) RETURN a;", |path| {
            let range = path.child(1).unwrap().varlength().unwrap();
            assert!(range.start_bound().is_none());
            assert_eq!(range.end_bound().unwrap().value_text(), Some("5"));
        });
    }

    #[test]
    fn named_and_shortest_paths() {
        let result = Parser::new("MATCH p = shortestPath((a)-[*]->(b)) RETURN p;").parse();
        assert_eq!(result.errors().count(), 0);
        let statement = result.directives().next().unwrap();
        let clause = statement.body().unwrap().clauses().next().unwrap();
        let named = clause.pattern().unwrap().paths().next().unwrap();
        assert_eq!(named.kind(), NodeKind::NamedPath);
        assert_eq!(named.identifier().unwrap().name(), Some("p"));
        let shortest = named.path().unwrap();
        assert_eq!(shortest.kind(), NodeKind::ShortestPath);
        assert!(shortest.is_single());
        assert_eq!(shortest.path().unwrap().elements().count(), 3);
    }

    #[test]
    fn parameter_properties() {
        match_pattern_path("MATCH (n $props) RETURN n;", |path| {
            let node = path.elements().next().unwrap();
            let props = node.properties().unwrap();
            assert_eq!(props.kind(), NodeKind::Parameter);
            assert_eq!(props.name(), Some("props"));
        });
    }

    #[test]
    fn multiple_paths_in_a_pattern() {
        let result = Parser::new("MATCH (a), (b)-->(c) RETURN a;").parse();
        assert_eq!(result.errors().count(), 0);
        let statement = result.directives().next().unwrap();
        let clause = statement.body().unwrap().clauses().next().unwrap();
        assert_eq!(clause.pattern().unwrap().paths().count(), 2);
    }
}
