//! Queries: the clause sequence and the clauses not covered by
//! `match_`/`merge`.
//!
//! ```txt
//! Query
//!     QueryOption* Clause+
//! QueryOption
//!     USING PERIODIC COMMIT Integer?
//! ```

use crate::ast::{NodeId, NodeKind, ProjectionBody};
use crate::lexer::{Keyword, TokenKind, T};
use crate::parser::grammar::{
    expression, identifier, is_symbolic_name, match_, merge, name_text, string_literal,
    symbolic_name,
};
use crate::parser::Parser;

pub(crate) fn query(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();

    let mut options = Vec::new();
    while p.at_kws(Keyword::Using, Keyword::Periodic) {
        let option_start = p.start();
        p.pop(); // USING
        p.pop(); // PERIODIC
        p.expect_kw(Keyword::Commit, "COMMIT");
        let limit = if p.at(TokenKind::Int) {
            let token = p.pop();
            Some(p.arena.integer(token.data(), token.range()))
        } else {
            None
        };
        options.push(p.arena.using_periodic_commit(limit, p.span(option_start)));
    }

    let mut clauses = Vec::new();
    while !p.limit_reached() {
        match clause(p) {
            Some(clause) => clauses.push(clause),
            None => break,
        }
    }

    if options.is_empty() && clauses.is_empty() {
        return None;
    }
    Some(p.arena.query(options, clauses, p.span(start)))
}

/// Parse one clause, or return `None` (silently) when the next token does
/// not begin one.
pub(crate) fn clause(p: &mut Parser) -> Option<NodeId> {
    match p.peek() {
        TokenKind::Keyword(Keyword::Optional | Keyword::Match) => match_::match_clause(p),
        TokenKind::Keyword(Keyword::Merge) => merge::merge_clause(p),
        TokenKind::Keyword(Keyword::Create) => merge::create_clause(p),
        TokenKind::Keyword(Keyword::Set) => merge::set_clause(p),
        TokenKind::Keyword(Keyword::Delete | Keyword::Detach) => merge::delete_clause(p),
        TokenKind::Keyword(Keyword::Remove) => merge::remove_clause(p),
        TokenKind::Keyword(Keyword::Foreach) => merge::foreach_clause(p),
        TokenKind::Keyword(Keyword::Load) => load_csv(p),
        TokenKind::Keyword(Keyword::Start) => start_clause(p),
        TokenKind::Keyword(Keyword::With) => projection_clause(p, NodeKind::With),
        TokenKind::Keyword(Keyword::Return) => projection_clause(p, NodeKind::Return),
        TokenKind::Keyword(Keyword::Unwind) => unwind_clause(p),
        TokenKind::Keyword(Keyword::Call) => call_clause(p),
        TokenKind::Keyword(Keyword::Union) => union_clause(p),
        _ => None,
    }
}

/// Shared body of `RETURN` and `WITH`.
///
/// ```txt
/// RETURN DISTINCT? (* | Projection (, Projection)*)
///        (ORDER BY SortItem (, SortItem)*)? (SKIP Expression)?
///        (LIMIT Expression)?
/// WITH …same…, then (WHERE Expression)?
/// ```
fn projection_clause(p: &mut Parser, kind: NodeKind) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // RETURN or WITH
    let mut body = ProjectionBody {
        distinct: p.eat_kw(Keyword::Distinct),
        ..ProjectionBody::default()
    };

    if p.eat(T![*]) {
        body.include_existing = true;
    }
    if !body.include_existing || p.eat(T![,]) {
        loop {
            let projection_start = p.start();
            match projection(p) {
                Some(item) => body.projections.push(item),
                None => body.projections.push(p.recover(projection_start, None)),
            }
            if !p.eat(T![,]) {
                break;
            }
        }
    }

    if p.at_kws(Keyword::Order, Keyword::By) {
        body.order_by = Some(order_by(p));
    }
    if p.eat_kw(Keyword::Skip) {
        body.skip = expression_or_recover(p);
    }
    if p.eat_kw(Keyword::Limit) {
        body.limit = expression_or_recover(p);
    }
    if kind == NodeKind::With && p.eat_kw(Keyword::Where) {
        body.predicate = expression_or_recover(p);
    }

    Some(p.arena.projection_clause(kind, body, p.span(start)))
}

fn expression_or_recover(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    Some(expression::expression(p).unwrap_or_else(|| p.recover(start, None)))
}

/// `Expression (AS Identifier)?`
fn projection(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let value = expression::expression(p)?;
    let alias = if p.eat_kw(Keyword::As) {
        Some(identifier(p)?)
    } else {
        None
    };
    Some(p.arena.projection(value, alias, p.span(start)))
}

fn order_by(p: &mut Parser) -> NodeId {
    let start = p.start();
    p.pop(); // ORDER
    p.pop(); // BY
    let mut items = Vec::new();
    loop {
        let item_start = p.start();
        match sort_item(p) {
            Some(item) => items.push(item),
            None => items.push(p.recover(item_start, None)),
        }
        if !p.eat(T![,]) {
            break;
        }
    }
    p.arena.order_by(items, p.span(start))
}

fn sort_item(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let value = expression::expression(p)?;
    let ascending = if p.eat_kw(Keyword::Desc) || p.eat_kw(Keyword::Descending) {
        false
    } else {
        p.eat_kw(Keyword::Asc);
        p.eat_kw(Keyword::Ascending);
        true
    };
    Some(p.arena.sort_item(value, ascending, p.span(start)))
}

/// `UNWIND Expression AS Identifier`
fn unwind_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // UNWIND
    let list = expression::expression(p)?;
    p.expect_kw(Keyword::As, "AS");
    let alias = identifier(p)?;
    Some(p.arena.unwind(list, alias, p.span(start)))
}

/// `CALL proc.name(args…) (YIELD Projection (, Projection)*)?`
fn call_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // CALL

    let name_start = p.start();
    let mut name = String::new();
    if !is_symbolic_name(p.peek()) {
        p.err_expected("a procedure name");
        return None;
    }
    let token = p.pop();
    name.push_str(&name_text(&token));
    while p.eat(T![.]) {
        name.push('.');
        if !is_symbolic_name(p.peek()) {
            p.err_expected("a procedure name");
            return None;
        }
        let token = p.pop();
        name.push_str(&name_text(&token));
    }
    let proc_name = p
        .arena
        .name_node(NodeKind::ProcName, &name, p.span(name_start));

    let mut args = Vec::new();
    if p.eat(T!['(']) {
        if !p.at(T![')']) {
            loop {
                let arg_start = p.start();
                match expression::expression(p) {
                    Some(arg) => args.push(arg),
                    None => args.push(p.recover(arg_start, Some(T![')']))),
                }
                if !p.eat(T![,]) {
                    break;
                }
            }
        }
        p.expect(T![')'], "')'");
    }

    let mut projections = Vec::new();
    if p.eat_kw(Keyword::Yield) {
        loop {
            let projection_start = p.start();
            match projection(p) {
                Some(item) => projections.push(item),
                None => projections.push(p.recover(projection_start, None)),
            }
            if !p.eat(T![,]) {
                break;
            }
        }
    }

    Some(p.arena.call(proc_name, args, projections, p.span(start)))
}

/// `UNION ALL?`, a clause that joins the queries on either side.
fn union_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // UNION
    let all = p.eat_kw(Keyword::All);
    Some(p.arena.union(all, p.span(start)))
}

/// ```txt
/// LoadCsv
///     LOAD CSV (WITH HEADERS)? FROM Expression AS Identifier
///     (FIELDTERMINATOR String)?
/// ```
fn load_csv(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // LOAD
    p.expect_kw(Keyword::Csv, "CSV");
    let with_headers = if p.at_kws(Keyword::With, Keyword::Headers) {
        p.pop();
        p.pop();
        true
    } else {
        false
    };
    p.expect_kw(Keyword::From, "FROM");
    let url = expression::expression(p)?;
    p.expect_kw(Keyword::As, "AS");
    let alias = identifier(p)?;
    let field_terminator = if p.eat_kw(Keyword::FieldTerminator) {
        Some(string_literal(p)?)
    } else {
        None
    };
    Some(
        p.arena
            .load_csv(with_headers, url, alias, field_terminator, p.span(start)),
    )
}

/// ```txt
/// Start
///     START StartPoint (, StartPoint)* (WHERE Expression)?
/// StartPoint
///     Identifier = node ( * )
///     Identifier = node ( Integer (, Integer)* )
///     Identifier = node :IndexName ( PropName = Lookup )
///     Identifier = node :IndexName ( Query )
///     …and the rel/relationship equivalents
/// ```
fn start_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // START
    let mut points = Vec::new();
    loop {
        let point_start = p.start();
        match start_point(p) {
            Some(point) => points.push(point),
            None => points.push(p.recover(point_start, None)),
        }
        if !p.eat(T![,]) {
            break;
        }
    }
    let predicate = if p.eat_kw(Keyword::Where) {
        expression_or_recover(p)
    } else {
        None
    };
    Some(p.arena.start(points, predicate, p.span(start)))
}

fn start_point(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let target = identifier(p)?;
    p.expect(T![=], "'='");

    let node = if p.eat_kw(Keyword::Node) {
        true
    } else if p.eat_kw(Keyword::Rel) || p.eat_kw(Keyword::Relationship) {
        false
    } else {
        p.err_expected("'node', 'rel' or 'relationship'");
        return None;
    };

    if p.eat(T![:]) {
        let index_name = symbolic_name(p, NodeKind::IndexName, "an index name")?;
        p.expect(T!['('], "'('");
        // `(prop = value)` is a lookup; `(value)` queries the index.
        if is_symbolic_name(p.peek()) && p.peek_n(2) == T![=] {
            let prop = symbolic_name(p, NodeKind::PropName, "a property name")?;
            p.pop(); // =
            let lookup = lookup_value(p)?;
            p.expect(T![')'], "')'");
            let kind = if node {
                NodeKind::NodeIndexLookup
            } else {
                NodeKind::RelIndexLookup
            };
            return Some(
                p.arena
                    .index_lookup(kind, target, index_name, prop, lookup, p.span(start)),
            );
        }
        let query = lookup_value(p)?;
        p.expect(T![')'], "')'");
        let kind = if node {
            NodeKind::NodeIndexQuery
        } else {
            NodeKind::RelIndexQuery
        };
        return Some(
            p.arena
                .index_query(kind, target, index_name, query, p.span(start)),
        );
    }

    p.expect(T!['('], "'('");
    if p.eat(T![*]) {
        p.expect(T![')'], "')'");
        let kind = if node {
            NodeKind::AllNodesScan
        } else {
            NodeKind::AllRelsScan
        };
        return Some(p.arena.all_scan(kind, target, p.span(start)));
    }
    let mut ids = Vec::new();
    if !p.at(T![')']) {
        loop {
            if !p.at(TokenKind::Int) {
                p.err_expected("a node id");
                return None;
            }
            let token = p.pop();
            ids.push(p.arena.integer(token.data(), token.range()));
            if !p.eat(T![,]) {
                break;
            }
        }
    }
    p.expect(T![')'], "')'");
    let kind = if node {
        NodeKind::NodeIdLookup
    } else {
        NodeKind::RelIdLookup
    };
    Some(p.arena.id_lookup(kind, target, ids, p.span(start)))
}

/// A string or a parameter.
fn lookup_value(p: &mut Parser) -> Option<NodeId> {
    match p.peek() {
        TokenKind::StringValue => string_literal(p),
        TokenKind::Parameter => {
            let token = p.pop();
            Some(p.arena.parameter(&token.data()[1..], token.range()))
        }
        _ => {
            p.err_expected("a string or parameter");
            None
        }
    }
}

#[cfg(test)]
mod test {
    use crate::ast::{Category, NodeKind};
    use crate::Parser;

    fn body_clauses(input: &str) -> crate::ParseResult {
        let result = Parser::new(input).parse();
        assert_eq!(
            result.errors().count(),
            0,
            "unexpected errors: {:?}",
            result.errors().collect::<Vec<_>>()
        );
        result
    }

    #[test]
    fn return_with_everything() {
        let result = body_clauses(
            "MATCH (n) RETURN DISTINCT n.name AS name, n.age ORDER BY n.age DESC, n.name SKIP 5 LIMIT 10;",
        );
        let statement = result.directives().next().unwrap();
        let ret = statement.body().unwrap().clauses().nth(1).unwrap();
        assert_eq!(ret.kind(), NodeKind::Return);
        assert!(ret.is_distinct());
        assert!(!ret.includes_existing());
        let projections: Vec<_> = ret.projections().collect();
        assert_eq!(projections.len(), 2);
        assert_eq!(projections[0].alias().unwrap().name(), Some("name"));
        assert!(projections[1].alias().is_none());
        let order_by = ret.order_by().unwrap();
        let items: Vec<_> = order_by.items().collect();
        assert_eq!(items.len(), 2);
        assert!(!items[0].is_ascending());
        assert!(items[1].is_ascending());
        assert_eq!(ret.skip().unwrap().value_text(), Some("5"));
        assert_eq!(ret.limit().unwrap().value_text(), Some("10"));
    }

    #[test]
    fn return_star() {
        let result = body_clauses("MATCH (n) RETURN *;");
        let ret = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .nth(1)
            .unwrap();
        assert!(ret.includes_existing());
        assert_eq!(ret.projections().count(), 0);

        let result = body_clauses("MATCH (n) RETURN *, n.age;");
        let ret = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .nth(1)
            .unwrap();
        assert!(ret.includes_existing());
        assert_eq!(ret.projections().count(), 1);
    }

    #[test]
    fn with_takes_a_predicate() {
        let result = body_clauses("MATCH (n) WITH n.age AS age WHERE age > 21 RETURN age;");
        let with = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .nth(1)
            .unwrap();
        assert_eq!(with.kind(), NodeKind::With);
        assert!(with.predicate().is_some());
    }

    #[test]
    fn unwind() {
        let result = body_clauses("UNWIND [1, 2, 3] AS x RETURN x;");
        let unwind = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        assert_eq!(unwind.kind(), NodeKind::Unwind);
        assert_eq!(unwind.expression().unwrap().kind(), NodeKind::Collection);
        assert_eq!(unwind.alias().unwrap().name(), Some("x"));
    }

    #[test]
    fn call_with_yield() {
        let result = body_clauses("CALL db.labels() YIELD label RETURN label;");
        let call = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        assert_eq!(call.kind(), NodeKind::Call);
        assert_eq!(call.proc_name().unwrap().name(), Some("db.labels"));
        assert_eq!(call.arguments().count(), 0);
        assert_eq!(call.projections().count(), 1);
    }

    #[test]
    fn call_with_args() {
        let result = body_clauses("CALL apoc.do.it(1, 'x');");
        let call = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        assert_eq!(call.proc_name().unwrap().name(), Some("apoc.do.it"));
        assert_eq!(call.arguments().count(), 2);
        assert_eq!(call.projections().count(), 0);
    }

    #[test]
    fn union_and_union_all() {
        let result = body_clauses("RETURN 1 UNION ALL RETURN 2 UNION RETURN 3;");
        let clauses: Vec<_> = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .collect();
        assert_eq!(clauses.len(), 5);
        assert_eq!(clauses[1].kind(), NodeKind::Union);
        assert!(clauses[1].is_all());
        assert_eq!(clauses[3].kind(), NodeKind::Union);
        assert!(!clauses[3].is_all());
    }

    #[test]
    fn load_csv() {
        let result = body_clauses(
            "USING PERIODIC COMMIT 500 LOAD CSV WITH HEADERS FROM 'file:///people.csv' AS row FIELDTERMINATOR ';' CREATE (:Person {name: row.name});",
        );
        let query = result.directives().next().unwrap().body().unwrap();
        let options: Vec<_> = query.options().collect();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].kind(), NodeKind::UsingPeriodicCommit);
        assert!(options[0].instance_of(Category::QueryOption));
        assert_eq!(options[0].batch_size().unwrap().value_text(), Some("500"));

        let load = query.clauses().next().unwrap();
        assert_eq!(load.kind(), NodeKind::LoadCsv);
        assert!(load.has_headers());
        assert_eq!(
            load.expression().unwrap().value_text(),
            Some("file:///people.csv")
        );
        assert_eq!(load.field_terminator().unwrap().value_text(), Some(";"));
    }

    #[test]
    fn start_points() {
        let result = body_clauses(
            "START n = node(*), m = node(1, 2), o = node:people(name = 'x'), r = rel:idx('q*') WHERE n.age > 1 RETURN n;",
        );
        let start = result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .next()
            .unwrap();
        assert_eq!(start.kind(), NodeKind::Start);
        assert!(start.predicate().is_some());
        let points: Vec<_> = start.points().collect();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].kind(), NodeKind::AllNodesScan);
        assert!(points[0].instance_of(Category::StartPoint));
        assert_eq!(points[1].kind(), NodeKind::NodeIdLookup);
        assert_eq!(points[1].lookup_ids().count(), 2);
        assert_eq!(points[2].kind(), NodeKind::NodeIndexLookup);
        assert_eq!(points[2].index_name().unwrap().name(), Some("people"));
        assert_eq!(points[2].lookup().unwrap().value_text(), Some("x"));
        assert_eq!(points[3].kind(), NodeKind::RelIndexQuery);
        assert_eq!(points[3].lookup().unwrap().value_text(), Some("q*"));
    }
}
