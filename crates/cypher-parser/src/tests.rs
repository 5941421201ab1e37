//! Crate-wide invariants, checked over a corpus of inputs: range
//! containment, preorder ordinals, segment tiling, quick/full boundary
//! equivalence and expression round-trips.

use crate::{Category, Node, NodeKind, Parser};
use pretty_assertions::assert_eq;
use unindent::unindent;

const CORPUS: &[&str] = &[
    "RETURN 1;",
    "RETURN 1",
    "MATCH (n:Person {name:'Alice'}) RETURN n.age",
    "MATCH (a)-[r:KNOWS*1..3]->(b) WHERE a.age < b.age <= 100 RETURN r;",
    "OPTIONAL MATCH (n) USING INDEX n:Person(name) WHERE n:Person RETURN n ORDER BY n.name DESC SKIP 1 LIMIT 2;",
    "MERGE (n:Counter) ON CREATE SET n.count = 0 ON MATCH SET n.count = n.count + 1;",
    "CREATE UNIQUE (a)-[:LIKES]->(b) RETURN a;",
    "MATCH (n) DETACH DELETE n;",
    "MATCH (n) REMOVE n.age, n:Admin SET n += {x: 1};",
    "UNWIND [1, 2.5, 'three', true, null] AS v RETURN v;",
    "WITH *, 1 AS one WHERE one > 0 RETURN *;",
    "CALL db.labels() YIELD label RETURN count(DISTINCT label);",
    "USING PERIODIC COMMIT 100 LOAD CSV WITH HEADERS FROM 'file:///x.csv' AS row CREATE (:Row {v: row.v});",
    "START n = node(*), m = node:people(name = 'x') WHERE n.age > 1 RETURN n;",
    "FOREACH (x IN [1, 2] | SET x.seen = true);",
    "RETURN CASE x WHEN 1 THEN 'one' ELSE 'other' END;",
    "RETURN [y IN list WHERE y > 1 | y * 2], filter(y IN list WHERE y), extract(y IN list | y.a);",
    "RETURN reduce(acc = 0, y IN list | acc + y), all(y IN list WHERE y), none(y IN list WHERE y);",
    "RETURN shortestPath((a)-[*]->(b)), {m: {legacy}}, $p;",
    "CREATE INDEX ON :Person(name);",
    "DROP CONSTRAINT ON (n:Person) ASSERT n.email IS UNIQUE;",
    "CREATE CONSTRAINT ON ()-[r:KNOWS]-() ASSERT exists(r.since);",
    "EXPLAIN PROFILE CYPHER 2.3 planner=cost RETURN 1;",
    "RETURN 1; // comment\n/* block */ RETURN 2;",
    ":help foo \"bar baz\"",
    ":play\nRETURN 1;",
    "MATCH (n",
    "RETURN ;",
    "%%% garbage ;RETURN 1;",
    "RETURN 'unterminated",
    "",
    "   /* nested /* comments */ */  ",
];

fn check_ranges(node: Node<'_>) {
    for child in node.children() {
        assert!(
            node.range().contains(&child.range()),
            "{child:?} escapes its parent {node:?}"
        );
        check_ranges(child);
    }
}

#[test]
fn child_ranges_are_contained() {
    for input in CORPUS {
        let result = Parser::new(input).parse();
        for root in result.roots() {
            check_ranges(root);
        }
    }
}

fn collect_preorder(node: Node<'_>, ordinals: &mut Vec<u32>) {
    ordinals.push(node.ordinal());
    for child in node.children() {
        collect_preorder(child, ordinals);
    }
}

#[test]
fn ordinals_are_strictly_increasing_in_preorder() {
    for input in CORPUS {
        let result = Parser::new(input).parse();
        let mut ordinals = Vec::new();
        for root in result.roots() {
            collect_preorder(root, &mut ordinals);
        }
        for pair in ordinals.windows(2) {
            assert!(pair[0] < pair[1], "ordinals not preorder in {input:?}");
        }
        assert_eq!(ordinals.len(), result.nnodes());
    }
}

#[test]
fn segments_tile_the_consumed_input() {
    for input in CORPUS {
        let result = Parser::new(input).parse();
        let segments = result.segments();
        if segments.is_empty() {
            continue;
        }
        assert_eq!(segments[0].range().start.offset, 0, "gap before first segment");
        for pair in segments.windows(2) {
            assert_eq!(
                pair[0].range().end,
                pair[1].range().start,
                "segment gap in {input:?}"
            );
        }
        assert_eq!(
            segments.last().unwrap().range().end,
            result.last(),
            "last segment does not reach the final position in {input:?}"
        );
    }
}

#[test]
fn quick_parse_boundaries_match_the_full_parser() {
    for input in CORPUS {
        for only_statements in [false, true] {
            let full = Parser::new(input).only_statements(only_statements).parse();
            let quick = Parser::new(input)
                .only_statements(only_statements)
                .quick_parse();
            let full_boundaries: Vec<_> = full
                .segments()
                .iter()
                .map(|segment| (segment.range(), segment.eof()))
                .collect();
            let quick_boundaries: Vec<_> = quick
                .iter()
                .map(|segment| (segment.range(), segment.eof()))
                .collect();
            assert_eq!(
                full_boundaries, quick_boundaries,
                "quick/full mismatch for {input:?} (only_statements={only_statements})"
            );
        }
    }
}

#[test]
fn category_memberships_hold_everywhere() {
    fn check(node: Node<'_>) {
        match node.kind() {
            NodeKind::Match => assert!(node.instance_of(Category::QueryClause)),
            NodeKind::ShortestPath => {
                assert!(node.instance_of(Category::PatternPath));
                assert!(node.instance_of(Category::Expression));
            }
            NodeKind::Filter => {
                assert!(node.instance_of(Category::ListComprehension));
                assert!(node.instance_of(Category::Expression));
            }
            _ => {}
        }
        for child in node.children() {
            check(child);
        }
    }
    for input in CORPUS {
        let result = Parser::new(input).parse();
        for root in result.roots() {
            check(root);
        }
    }
}

/// The structural shape of a subtree: type tags and child shapes,
/// ignoring ranges and ordinals.
#[derive(Debug, PartialEq)]
struct Shape {
    kind: NodeKind,
    children: Vec<Shape>,
}

fn shape(node: Node<'_>) -> Shape {
    Shape {
        kind: node.kind(),
        children: node.children().map(shape).collect(),
    }
}

fn collect_expressions<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    if node.instance_of(Category::Expression) && node.kind() != NodeKind::Error {
        out.push(node);
    }
    for child in node.children() {
        collect_expressions(child, out);
    }
}

#[test]
fn reparsing_an_expression_substring_is_isomorphic() {
    let inputs = [
        "RETURN 1 + 2 * 3, a.b[0], (x + y) % 2;",
        "MATCH (n) WHERE n.age < lim <= 100 AND NOT n.hidden RETURN n;",
        "RETURN CASE x WHEN 1 THEN 'one' ELSE 'other' END, [y IN l WHERE y | y], count(DISTINCT z);",
    ];
    for input in inputs {
        let result = Parser::new(input).parse();
        assert_eq!(result.errors().count(), 0, "corpus input must be clean");
        let mut expressions = Vec::new();
        for root in result.roots() {
            collect_expressions(root, &mut expressions);
        }
        assert!(!expressions.is_empty());
        for expression in expressions {
            let range = expression.range();
            let substring = &input[range.start.offset..range.end.offset];
            let reparsed = Parser::new(substring).parse_expression();
            assert_eq!(
                reparsed.errors().count(),
                0,
                "reparse of {substring:?} produced errors"
            );
            let root = reparsed
                .roots()
                .find(|root| root.instance_of(Category::Expression))
                .expect("reparse yields an expression root");
            assert_eq!(
                shape(root),
                shape(expression),
                "shape mismatch reparsing {substring:?}"
            );
        }
    }
}

#[test]
fn back_to_back_returns_are_one_statement() {
    let result = Parser::new("RETURN 1\nRETURN 2;").parse();
    assert_eq!(result.errors().count(), 0);
    let directives: Vec<_> = result.directives().collect();
    assert_eq!(directives.len(), 1);
    let clauses: Vec<_> = directives[0].body().unwrap().clauses().collect();
    assert_eq!(clauses.len(), 2);
    assert!(clauses.iter().all(|clause| clause.kind() == NodeKind::Return));
}

#[test]
fn recursion_limit_reports_a_resource_error() {
    let mut input = String::from("RETURN ");
    input.push_str(&"(".repeat(200));
    input.push('1');
    input.push_str(&")".repeat(200));
    input.push(';');

    let result = Parser::new(&input).recursion_limit(50).parse();
    let messages: Vec<_> = result.errors().map(|e| e.message().to_string()).collect();
    assert!(
        messages.iter().any(|m| m.contains("recursion limit")),
        "expected a recursion limit error, got {messages:?}"
    );

    let result = Parser::new(&input).recursion_limit(4000).parse();
    assert_eq!(result.errors().count(), 0);
}

#[test]
fn errors_come_in_source_order() {
    let input = unindent(
        "
        RETURN %;
        MATCH (n;
        RETURN 'abc;
        ",
    );
    let result = Parser::new(&input).parse();
    let positions: Vec<_> = result.errors().map(|e| e.position().offset).collect();
    assert!(positions.len() >= 2);
    for pair in positions.windows(2) {
        assert!(pair[0] <= pair[1], "errors out of order: {positions:?}");
    }
}

#[test]
fn multiline_positions_are_tracked() {
    let input = unindent(
        "
        MATCH (n)
        RETURN n.name,
               n.age;
        ",
    );
    let result = Parser::new(&input).parse();
    assert_eq!(result.errors().count(), 0);
    let statement = result.directives().next().unwrap();
    assert_eq!(statement.range().start.line, 1);
    assert_eq!(statement.range().end.line, 3);
    let ret = statement.body().unwrap().clauses().nth(1).unwrap();
    let second = ret.projections().nth(1).unwrap();
    assert_eq!(second.range().start.line, 3);
    assert_eq!(second.range().start.column, 8);
}

#[test]
fn unterminated_string_is_an_error_but_still_a_string() {
    let result = Parser::new("RETURN 'abc").parse();
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message().contains("unterminated string"));
    let value = result
        .directives()
        .next()
        .unwrap()
        .body()
        .unwrap()
        .clauses()
        .next()
        .unwrap()
        .projections()
        .next()
        .unwrap()
        .expression()
        .unwrap();
    assert_eq!(value.kind(), NodeKind::String);
    assert_eq!(value.value_text(), Some("abc"));
}
