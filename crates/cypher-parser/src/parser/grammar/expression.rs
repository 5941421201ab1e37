//! Expression parsing: precedence climbing with comparison-chain folding.
//!
//! Precedence, loosest to tightest:
//!
//! ```txt
//! OR < XOR < AND < NOT < = <> < comparison chain (< > <= >=)
//!    < + - < * / % < ^ < unary + -
//!    < STARTS WITH / ENDS WITH / CONTAINS / =~ / IN / IS [NOT] NULL
//!    < postfix (.prop, [subscript], [from..to], :Label)
//! ```
//!
//! `=`/`<>` build left-associative binary nodes; `<` `>` `<=` `>=` fold
//! into a single n-ary comparison node (`a < b <= c` keeps chain
//! semantics rather than nesting).

use crate::ast::{NodeId, NodeKind, Operator};
use crate::lexer::{InputPosition, Keyword, TokenKind, T};
use crate::parser::grammar::{
    identifier, is_name, is_symbolic_name, pattern, symbolic_name, unescape_string,
};
use crate::parser::Parser;

pub(crate) fn expression(p: &mut Parser) -> Option<NodeId> {
    if !p.enter() {
        return None;
    }
    let result = or_expression(p);
    p.leave();
    result
}

fn or_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = xor_expression(p)?;
    while p.eat_kw(Keyword::Or) {
        let rhs = xor_expression(p)?;
        lhs = p.arena.binary_operator(Operator::Or, lhs, rhs, p.span(start));
    }
    Some(lhs)
}

fn xor_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = and_expression(p)?;
    while p.eat_kw(Keyword::Xor) {
        let rhs = and_expression(p)?;
        lhs = p.arena.binary_operator(Operator::Xor, lhs, rhs, p.span(start));
    }
    Some(lhs)
}

fn and_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = not_expression(p)?;
    while p.eat_kw(Keyword::And) {
        let rhs = not_expression(p)?;
        lhs = p.arena.binary_operator(Operator::And, lhs, rhs, p.span(start));
    }
    Some(lhs)
}

fn not_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    if p.eat_kw(Keyword::Not) {
        let argument = not_expression(p)?;
        return Some(p.arena.unary_operator(Operator::Not, argument, p.span(start)));
    }
    equality_expression(p)
}

fn equality_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = comparison_expression(p)?;
    loop {
        let op = match p.peek() {
            T![=] => Operator::Equal,
            T![<>] => Operator::NotEqual,
            _ => break,
        };
        p.pop();
        let rhs = comparison_expression(p)?;
        lhs = p.arena.binary_operator(op, lhs, rhs, p.span(start));
    }
    Some(lhs)
}

/// `a < b <= c` folds into one comparison node with operators
/// `[Lt, Lte]` and arguments `[a, b, c]`.
fn comparison_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let first = add_expression(p)?;
    let mut ops = Vec::new();
    let mut args = vec![first];
    loop {
        let op = match p.peek() {
            T![<] => Operator::Lt,
            T![>] => Operator::Gt,
            T![<=] => Operator::Lte,
            T![>=] => Operator::Gte,
            _ => break,
        };
        p.pop();
        args.push(add_expression(p)?);
        ops.push(op);
    }
    if ops.is_empty() {
        Some(first)
    } else {
        Some(p.arena.comparison(ops, args, p.span(start)))
    }
}

fn add_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = mult_expression(p)?;
    loop {
        let op = match p.peek() {
            T![+] => Operator::Plus,
            T![-] => Operator::Minus,
            _ => break,
        };
        p.pop();
        let rhs = mult_expression(p)?;
        lhs = p.arena.binary_operator(op, lhs, rhs, p.span(start));
    }
    Some(lhs)
}

fn mult_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = pow_expression(p)?;
    loop {
        let op = match p.peek() {
            T![*] => Operator::Mult,
            T![/] => Operator::Div,
            T![%] => Operator::Mod,
            _ => break,
        };
        p.pop();
        let rhs = pow_expression(p)?;
        lhs = p.arena.binary_operator(op, lhs, rhs, p.span(start));
    }
    Some(lhs)
}

fn pow_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = unary_expression(p)?;
    while p.eat(T![^]) {
        let rhs = unary_expression(p)?;
        lhs = p.arena.binary_operator(Operator::Pow, lhs, rhs, p.span(start));
    }
    Some(lhs)
}

fn unary_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let op = match p.peek() {
        T![+] => Operator::UnaryPlus,
        T![-] => Operator::UnaryMinus,
        _ => return predicate_expression(p),
    };
    p.pop();
    let argument = unary_expression(p)?;
    Some(p.arena.unary_operator(op, argument, p.span(start)))
}

/// String and null predicates: `STARTS WITH`, `ENDS WITH`, `CONTAINS`,
/// `=~`, `IN`, and the postfix `IS NULL` / `IS NOT NULL`.
fn predicate_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = postfix_expression(p)?;
    loop {
        if p.at_kws(Keyword::Starts, Keyword::With) {
            p.pop();
            p.pop();
            let rhs = postfix_expression(p)?;
            lhs = p
                .arena
                .binary_operator(Operator::StartsWith, lhs, rhs, p.span(start));
        } else if p.at_kws(Keyword::Ends, Keyword::With) {
            p.pop();
            p.pop();
            let rhs = postfix_expression(p)?;
            lhs = p
                .arena
                .binary_operator(Operator::EndsWith, lhs, rhs, p.span(start));
        } else if p.at_kw(Keyword::Contains) {
            p.pop();
            let rhs = postfix_expression(p)?;
            lhs = p
                .arena
                .binary_operator(Operator::Contains, lhs, rhs, p.span(start));
        } else if p.at(T![=~]) {
            p.pop();
            let rhs = postfix_expression(p)?;
            lhs = p
                .arena
                .binary_operator(Operator::Regex, lhs, rhs, p.span(start));
        } else if p.at_kw(Keyword::In) {
            p.pop();
            let rhs = postfix_expression(p)?;
            lhs = p.arena.binary_operator(Operator::In, lhs, rhs, p.span(start));
        } else if p.at_kws(Keyword::Is, Keyword::Null) {
            p.pop();
            p.pop();
            lhs = p.arena.unary_operator(Operator::IsNull, lhs, p.span(start));
        } else if p.at_kw(Keyword::Is)
            && p.peek_n(2) == TokenKind::Keyword(Keyword::Not)
            && p.peek_n(3) == TokenKind::Keyword(Keyword::Null)
        {
            p.pop();
            p.pop();
            p.pop();
            lhs = p
                .arena
                .unary_operator(Operator::IsNotNull, lhs, p.span(start));
        } else {
            break;
        }
    }
    Some(lhs)
}

/// Postfix operators: property access, subscripts, slices and label
/// checks.
pub(crate) fn postfix_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let mut lhs = atom(p)?;
    loop {
        match p.peek() {
            T![.] => {
                p.pop();
                let prop_name = symbolic_name(p, NodeKind::PropName, "a property name")?;
                lhs = p.arena.property_operator(lhs, prop_name, p.span(start));
            }
            T!['['] => {
                p.pop();
                lhs = subscript_or_slice(p, lhs, start)?;
            }
            T![:] if is_symbolic_name(p.peek_n(2)) => {
                let mut labels = Vec::new();
                while p.at(T![:]) && is_symbolic_name(p.peek_n(2)) {
                    p.pop();
                    labels.push(symbolic_name(p, NodeKind::Label, "a label name")?);
                }
                lhs = p.arena.labels_operator(lhs, labels, p.span(start));
            }
            _ => break,
        }
    }
    Some(lhs)
}

/// The opening `[` has been consumed.
fn subscript_or_slice(p: &mut Parser, lhs: NodeId, start: InputPosition) -> Option<NodeId> {
    if p.eat(T![..]) {
        // [..to]
        let end = if p.at(T![']']) { None } else { Some(expression(p)?) };
        p.expect(T![']'], "']'");
        return Some(p.arena.slice_operator(lhs, None, end, p.span(start)));
    }
    let first = expression(p)?;
    if p.eat(T![..]) {
        let end = if p.at(T![']']) { None } else { Some(expression(p)?) };
        p.expect(T![']'], "']'");
        return Some(p.arena.slice_operator(lhs, Some(first), end, p.span(start)));
    }
    p.expect(T![']'], "']'");
    Some(p.arena.subscript_operator(lhs, first, p.span(start)))
}

fn atom(p: &mut Parser) -> Option<NodeId> {
    match p.peek() {
        TokenKind::Int => {
            let token = p.pop();
            Some(p.arena.integer(token.data(), token.range()))
        }
        TokenKind::Float => {
            let token = p.pop();
            Some(p.arena.float(token.data(), token.range()))
        }
        TokenKind::StringValue => {
            let token = p.pop();
            let value = unescape_string(token.data());
            Some(p.arena.string(value, token.range()))
        }
        TokenKind::Parameter => {
            let token = p.pop();
            Some(p.arena.parameter(&token.data()[1..], token.range()))
        }
        TokenKind::Keyword(Keyword::True) => {
            let token = p.pop();
            Some(p.arena.boolean(true, token.range()))
        }
        TokenKind::Keyword(Keyword::False) => {
            let token = p.pop();
            Some(p.arena.boolean(false, token.range()))
        }
        TokenKind::Keyword(Keyword::Null) => {
            let token = p.pop();
            Some(p.arena.null(token.range()))
        }
        TokenKind::Keyword(Keyword::Case) => case_expression(p),
        TokenKind::Keyword(Keyword::Filter) if p.peek_n(2) == T!['('] => {
            filter_expression(p)
        }
        TokenKind::Keyword(Keyword::Extract) if p.peek_n(2) == T!['('] => {
            extract_expression(p)
        }
        TokenKind::Keyword(Keyword::Reduce) if p.peek_n(2) == T!['('] => reduce_expression(p),
        TokenKind::Keyword(
            Keyword::All | Keyword::Any | Keyword::Single | Keyword::None,
        ) if p.peek_n(2) == T!['('] => quantifier_expression(p),
        TokenKind::Keyword(Keyword::ShortestPath | Keyword::AllShortestPaths)
            if p.peek_n(2) == T!['('] =>
        {
            shortest_path_expression(p)
        }
        T!['('] => {
            p.pop();
            let inner = expression(p)?;
            p.expect(T![')'], "')'");
            Some(inner)
        }
        T!['{'] => curly(p),
        T!['['] => bracket(p),
        kind if is_name(kind) => {
            if p.peek_n(2) == T!['('] {
                apply_expression(p)
            } else {
                let token = p.pop();
                let text = super::name_text(&token);
                Some(p.arena.identifier(&text, token.range()))
            }
        }
        _ => {
            p.err_expected("an expression");
            None
        }
    }
}

/// Function application: `f(args…)`, `f(*)`, `f(DISTINCT args…)`.
fn apply_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let function_name = symbolic_name(p, NodeKind::FunctionName, "a function name")?;
    p.expect(T!['('], "'('");
    let distinct = p.eat_kw(Keyword::Distinct);
    if p.eat(T![*]) {
        p.expect(T![')'], "')'");
        return Some(p.arena.apply_all(function_name, distinct, p.span(start)));
    }
    let mut args = Vec::new();
    if !p.at(T![')']) {
        loop {
            args.push(expression(p)?);
            if !p.eat(T![,]) {
                break;
            }
        }
    }
    p.expect(T![')'], "')'");
    Some(p.arena.apply(function_name, distinct, args, p.span(start)))
}

/// ```txt
/// CASE expr (WHEN value THEN result)+ (ELSE default)? END
/// CASE (WHEN predicate THEN result)+ (ELSE default)? END
/// ```
fn case_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // CASE
    let subject = if p.at_kw(Keyword::When) {
        None
    } else {
        Some(expression(p)?)
    };
    let mut alternatives = Vec::new();
    while p.eat_kw(Keyword::When) {
        let predicate = expression(p)?;
        p.expect_kw(Keyword::Then, "THEN");
        let value = expression(p)?;
        alternatives.push((predicate, value));
    }
    if alternatives.is_empty() {
        p.err_expected("WHEN");
    }
    let default = if p.eat_kw(Keyword::Else) {
        Some(expression(p)?)
    } else {
        None
    };
    p.expect_kw(Keyword::End, "END");
    Some(p.arena.case(subject, alternatives, default, p.span(start)))
}

/// `filter(x IN list WHERE predicate)`, a deprecated alias of a list
/// comprehension, kept as its own kind to parse legacy input.
fn filter_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // filter
    p.expect(T!['('], "'('");
    let (identifier, list) = comprehension_head(p)?;
    let predicate = if p.expect_kw(Keyword::Where, "WHERE") {
        Some(expression(p)?)
    } else {
        None
    };
    p.expect(T![')'], "')'");
    Some(p.arena.comprehension(
        NodeKind::Filter,
        identifier,
        list,
        predicate,
        None,
        p.span(start),
    ))
}

/// `extract(x IN list | expression)`, a deprecated alias; same treatment
/// as `filter`.
fn extract_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // extract
    p.expect(T!['('], "'('");
    let (identifier, list) = comprehension_head(p)?;
    let eval = if p.eat(T![|]) {
        Some(expression(p)?)
    } else {
        None
    };
    p.expect(T![')'], "')'");
    Some(p.arena.comprehension(
        NodeKind::Extract,
        identifier,
        list,
        None,
        eval,
        p.span(start),
    ))
}

/// `reduce(acc = init, x IN list | expression)`
fn reduce_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // reduce
    p.expect(T!['('], "'('");
    let accumulator = identifier(p)?;
    p.expect(T![=], "'='");
    let init = expression(p)?;
    p.expect(T![,], "','");
    let (element, list) = comprehension_head(p)?;
    p.expect(T![|], "'|'");
    let eval = expression(p)?;
    p.expect(T![')'], "')'");
    Some(
        p.arena
            .reduce(accumulator, init, element, list, eval, p.span(start)),
    )
}

/// `all(x IN list WHERE predicate)` and the `any`/`single`/`none`
/// quantifiers.
fn quantifier_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let kind = match p.peek() {
        TokenKind::Keyword(Keyword::All) => NodeKind::All,
        TokenKind::Keyword(Keyword::Any) => NodeKind::Any,
        TokenKind::Keyword(Keyword::Single) => NodeKind::Single,
        _ => NodeKind::None,
    };
    p.pop();
    p.expect(T!['('], "'('");
    let (identifier, list) = comprehension_head(p)?;
    let predicate = if p.expect_kw(Keyword::Where, "WHERE") {
        Some(expression(p)?)
    } else {
        None
    };
    p.expect(T![')'], "')'");
    Some(p.arena.comprehension(kind, identifier, list, predicate, None, p.span(start)))
}

/// `shortestPath((a)-[..]->(b))` in expression position.
fn shortest_path_expression(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let single = p.at_kw(Keyword::ShortestPath);
    p.pop();
    p.expect(T!['('], "'('");
    let path = pattern::pattern_path(p)?;
    p.expect(T![')'], "')'");
    Some(p.arena.shortest_path(single, path, p.span(start)))
}

/// `x IN list`, the head shared by comprehensions and quantifiers.
fn comprehension_head(p: &mut Parser) -> Option<(NodeId, NodeId)> {
    let element = identifier(p)?;
    p.expect_kw(Keyword::In, "IN");
    let list = expression(p)?;
    Some((element, list))
}

/// A `{`-led atom: either a legacy `{name}` parameter or a map literal.
pub(crate) fn curly(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let second = p.peek_n(2);
    if (is_symbolic_name(second) || second == TokenKind::Int) && p.peek_n(3) == T!['}'] {
        p.pop(); // {
        let token = p.pop();
        let name = super::name_text(&token);
        p.expect(T!['}'], "'}'");
        return Some(p.arena.parameter(&name, p.span(start)));
    }
    map_literal(p)
}

/// `{key: value, …}`
fn map_literal(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.expect(T!['{'], "'{'");
    let mut entries = Vec::new();
    if !p.at(T!['}']) {
        loop {
            let key = symbolic_name(p, NodeKind::PropName, "a property name")?;
            p.expect(T![:], "':'");
            let value = expression(p)?;
            entries.push((key, value));
            if !p.eat(T![,]) {
                break;
            }
        }
    }
    p.expect(T!['}'], "'}'");
    Some(p.arena.map(entries, p.span(start)))
}

/// A `[`-led atom: a list comprehension when it opens with `x IN`, else a
/// collection literal.
fn bracket(p: &mut Parser) -> Option<NodeId> {
    if is_name(p.peek_n(2)) && p.peek_n(3) == TokenKind::Keyword(Keyword::In) {
        return list_comprehension(p);
    }
    let start = p.start();
    p.pop(); // [
    let mut elements = Vec::new();
    if !p.at(T![']']) {
        loop {
            elements.push(expression(p)?);
            if !p.eat(T![,]) {
                break;
            }
        }
    }
    p.expect(T![']'], "']'");
    Some(p.arena.collection(elements, p.span(start)))
}

/// `[x IN list WHERE predicate | expression]`
fn list_comprehension(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // [
    let (identifier, list) = comprehension_head(p)?;
    let predicate = if p.eat_kw(Keyword::Where) {
        Some(expression(p)?)
    } else {
        None
    };
    let eval = if p.eat(T![|]) {
        Some(expression(p)?)
    } else {
        None
    };
    p.expect(T![']'], "']'");
    Some(p.arena.comprehension(
        NodeKind::ListComprehension,
        identifier,
        list,
        predicate,
        eval,
        p.span(start),
    ))
}

#[cfg(test)]
mod test {
    use crate::ast::{Category, NodeKind, Operator};
    use crate::Parser;

    fn with_expression<R>(input: &str, check: impl FnOnce(crate::Node<'_>) -> R) -> R {
        let result = Parser::new(&format!("RETURN {input};")).parse();
        assert_eq!(
            result.errors().count(),
            0,
            "unexpected errors in {input:?}: {:?}",
            result.errors().collect::<Vec<_>>()
        );
        let statement = result.directives().next().expect("one directive");
        let query = statement.body().expect("statement body");
        let clause = query.clauses().next().expect("one clause");
        let projection = clause.projections().next().expect("one projection");
        check(projection.expression().expect("projection expression"))
    }

    #[test]
    fn precedence_or_binds_loosest() {
        with_expression("a OR b AND c", |node| {
            assert_eq!(node.kind(), NodeKind::BinaryOperator);
            assert_eq!(node.operator(), Some(Operator::Or));
            let rhs = node.right().unwrap();
            assert_eq!(rhs.operator(), Some(Operator::And));
        });
    }

    #[test]
    fn arithmetic_precedence() {
        with_expression("1 + 2 * 3", |node| {
            assert_eq!(node.operator(), Some(Operator::Plus));
            assert_eq!(node.right().unwrap().operator(), Some(Operator::Mult));
        });
        with_expression("1 * 2 + 3", |node| {
            assert_eq!(node.operator(), Some(Operator::Plus));
            assert_eq!(node.left().unwrap().operator(), Some(Operator::Mult));
        });
    }

    #[test]
    fn comparison_chain_folds_into_one_node() {
        with_expression("a < b <= c", |node| {
            assert_eq!(node.kind(), NodeKind::Comparison);
            assert_eq!(node.comparison_length(), Some(2));
            assert_eq!(node.operators(), Some(&[Operator::Lt, Operator::Lte][..]));
            let args: Vec<_> = node
                .arguments()
                .map(|arg| arg.name().unwrap().to_string())
                .collect();
            assert_eq!(args, ["a", "b", "c"]);
        });
    }

    #[test]
    fn equality_is_binary_and_looser_than_chains() {
        with_expression("a = b < c", |node| {
            assert_eq!(node.kind(), NodeKind::BinaryOperator);
            assert_eq!(node.operator(), Some(Operator::Equal));
            assert_eq!(node.right().unwrap().kind(), NodeKind::Comparison);
        });
    }

    #[test]
    fn unary_minus() {
        with_expression("-1", |node| {
            assert_eq!(node.kind(), NodeKind::UnaryOperator);
            assert_eq!(node.operator(), Some(Operator::UnaryMinus));
            assert_eq!(node.argument().unwrap().value_text(), Some("1"));
        });
    }

    #[test]
    fn string_predicates() {
        with_expression("a STARTS WITH 'x'", |node| {
            assert_eq!(node.operator(), Some(Operator::StartsWith));
        });
        with_expression("a ENDS WITH 'x'", |node| {
            assert_eq!(node.operator(), Some(Operator::EndsWith));
        });
        with_expression("a IS NOT NULL", |node| {
            assert_eq!(node.kind(), NodeKind::UnaryOperator);
            assert_eq!(node.operator(), Some(Operator::IsNotNull));
        });
        with_expression("a =~ '.*'", |node| {
            assert_eq!(node.operator(), Some(Operator::Regex));
        });
    }

    #[test]
    fn postfix_property_and_subscript() {
        with_expression("a.b[0]", |node| {
            assert_eq!(node.kind(), NodeKind::SubscriptOperator);
            let base = node.expression().unwrap();
            assert_eq!(base.kind(), NodeKind::PropertyOperator);
            assert_eq!(base.prop_name().unwrap().name(), Some("b"));
        });
        with_expression("a[1..2]", |node| {
            assert_eq!(node.kind(), NodeKind::SliceOperator);
            assert_eq!(node.start_bound().unwrap().value_text(), Some("1"));
            assert_eq!(node.end_bound().unwrap().value_text(), Some("2"));
        });
        with_expression("a[..2]", |node| {
            assert_eq!(node.kind(), NodeKind::SliceOperator);
            assert!(node.start_bound().is_none());
        });
    }

    #[test]
    fn label_test_expression() {
        with_expression("n:Person:Admin", |node| {
            assert_eq!(node.kind(), NodeKind::LabelsOperator);
            let labels: Vec<_> = node.labels().map(|l| l.name().unwrap().to_string()).collect();
            assert_eq!(labels, ["Person", "Admin"]);
        });
    }

    #[test]
    fn function_application() {
        with_expression("length(p) + count(*)", |node| {
            let apply = node.left().unwrap();
            assert_eq!(apply.kind(), NodeKind::ApplyOperator);
            assert_eq!(apply.function_name().unwrap().name(), Some("length"));
            assert_eq!(apply.arguments().count(), 1);
            let apply_all = node.right().unwrap();
            assert_eq!(apply_all.kind(), NodeKind::ApplyAllOperator);
            assert!(!apply_all.is_distinct());
        });
        with_expression("count(DISTINCT n)", |node| {
            assert_eq!(node.kind(), NodeKind::ApplyOperator);
            assert!(node.is_distinct());
        });
    }

    #[test]
    fn case_forms() {
        with_expression("CASE x WHEN 1 THEN 'a' ELSE 'b' END", |node| {
            assert_eq!(node.kind(), NodeKind::Case);
            assert!(node.expression().is_some());
            assert_eq!(node.case_alternatives().len(), 1);
            assert!(node.case_default().is_some());
        });
        with_expression("CASE WHEN a THEN 1 WHEN b THEN 2 END", |node| {
            assert_eq!(node.kind(), NodeKind::Case);
            assert!(node.expression().is_none());
            assert_eq!(node.case_alternatives().len(), 2);
            assert!(node.case_default().is_none());
        });
    }

    #[test]
    fn comprehension_kinds_share_the_category() {
        with_expression("[x IN list WHERE x > 1 | x * 2]", |node| {
            assert_eq!(node.kind(), NodeKind::ListComprehension);
            assert!(node.instance_of(Category::ListComprehension));
            assert!(node.predicate().is_some());
            assert!(node.eval().is_some());
        });
        with_expression("filter(x IN list WHERE x)", |node| {
            assert_eq!(node.kind(), NodeKind::Filter);
            assert!(node.instance_of(Category::ListComprehension));
            assert!(node.instance_of(Category::Expression));
        });
        with_expression("extract(x IN list | x.name)", |node| {
            assert_eq!(node.kind(), NodeKind::Extract);
            assert!(node.eval().is_some());
        });
        with_expression("all(x IN list WHERE x)", |node| {
            assert_eq!(node.kind(), NodeKind::All);
        });
        with_expression("none(x IN list WHERE x)", |node| {
            assert_eq!(node.kind(), NodeKind::None);
        });
    }

    #[test]
    fn reduce_expression() {
        with_expression("reduce(acc = 0, x IN list | acc + x)", |node| {
            assert_eq!(node.kind(), NodeKind::Reduce);
            assert_eq!(node.accumulator().unwrap().name(), Some("acc"));
            assert_eq!(node.init().unwrap().value_text(), Some("0"));
            assert_eq!(node.identifier().unwrap().name(), Some("x"));
            assert!(node.eval().is_some());
        });
    }

    #[test]
    fn literals() {
        with_expression("{a: 1, b: 'two'}", |node| {
            assert_eq!(node.kind(), NodeKind::Map);
            let entries = node.map_entries();
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].0.name(), Some("a"));
            assert_eq!(entries[1].1.value_text(), Some("two"));
        });
        with_expression("[1, 2.5, true, null]", |node| {
            assert_eq!(node.kind(), NodeKind::Collection);
            let kinds: Vec<_> = node.children().map(|c| c.kind()).collect();
            assert_eq!(
                kinds,
                [
                    NodeKind::Integer,
                    NodeKind::Float,
                    NodeKind::True,
                    NodeKind::Null
                ]
            );
        });
        with_expression("3.25", |node| {
            assert_eq!(node.float_value(), Some(3.25));
            assert_eq!(node.value_text(), Some("3.25"));
        });
    }

    #[test]
    fn parameters() {
        with_expression("$param", |node| {
            assert_eq!(node.kind(), NodeKind::Parameter);
            assert_eq!(node.name(), Some("param"));
        });
        with_expression("{legacy}", |node| {
            assert_eq!(node.kind(), NodeKind::Parameter);
            assert_eq!(node.name(), Some("legacy"));
        });
    }

    #[test]
    fn parenthesized_expression_keeps_inner_node() {
        with_expression("(1 + 2) * 3", |node| {
            assert_eq!(node.operator(), Some(Operator::Mult));
            assert_eq!(node.left().unwrap().operator(), Some(Operator::Plus));
        });
    }

    #[test]
    fn shortest_path_is_an_expression() {
        with_expression("shortestPath((a)-[*]->(b))", |node| {
            assert_eq!(node.kind(), NodeKind::ShortestPath);
            assert!(node.is_single());
            assert!(node.instance_of(Category::Expression));
            assert!(node.instance_of(Category::PatternPath));
        });
    }
}
