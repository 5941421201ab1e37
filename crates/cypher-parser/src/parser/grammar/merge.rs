//! Updating clauses: `MERGE`, `CREATE`, `SET`, `DELETE`, `REMOVE`,
//! `FOREACH`.
//!
//! ```txt
//! Merge
//!     MERGE PatternPart MergeAction*
//! MergeAction
//!     ON MATCH SET SetItem (, SetItem)*
//!     ON CREATE SET SetItem (, SetItem)*
//! SetItem
//!     PropertyExpression = Expression
//!     Identifier = Expression
//!     Identifier += Expression
//!     Identifier :Label (:Label)*
//! ```

use crate::ast::{NodeId, NodeKind};
use crate::lexer::{Keyword, T};
use crate::parser::grammar::{expression, identifier, query};
use crate::parser::Parser;

pub(crate) fn merge_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // MERGE
    let path_start = p.start();
    let path = super::pattern::pattern_part(p).unwrap_or_else(|| p.recover(path_start, None));

    let mut actions = Vec::new();
    while p.at_kw(Keyword::On) {
        let action_start = p.start();
        p.pop(); // ON
        let kind = if p.eat_kw(Keyword::Match) {
            NodeKind::OnMatch
        } else if p.eat_kw(Keyword::Create) {
            NodeKind::OnCreate
        } else {
            p.err_expected("MATCH or CREATE");
            actions.push(p.recover(action_start, None));
            continue;
        };
        p.expect_kw(Keyword::Set, "SET");
        let items = set_items(p);
        actions.push(p.arena.merge_action(kind, items, p.span(action_start)));
    }

    Some(p.arena.merge(path, actions, p.span(start)))
}

pub(crate) fn create_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // CREATE
    let unique = p.eat_kw(Keyword::Unique);
    let pattern_start = p.start();
    let pattern =
        super::pattern::pattern(p).unwrap_or_else(|| p.recover(pattern_start, None));
    Some(p.arena.create_clause(unique, pattern, p.span(start)))
}

pub(crate) fn set_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // SET
    let items = set_items(p);
    Some(p.arena.set_clause(items, p.span(start)))
}

fn set_items(p: &mut Parser) -> Vec<NodeId> {
    let mut items = Vec::new();
    loop {
        let item_start = p.start();
        match set_item(p) {
            Some(item) => items.push(item),
            None => items.push(p.recover(item_start, None)),
        }
        if !p.eat(T![,]) {
            break;
        }
    }
    items
}

/// One token of lookahead after the target settles which item this is:
/// a property path followed by `=` sets one property, an identifier
/// followed by `=` replaces all properties, `+=` merges them, and a bare
/// identifier followed by labels sets labels.
fn set_item(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let target = expression::postfix_expression(p)?;
    match (p.arena.kind(target), p.peek()) {
        (NodeKind::PropertyOperator, T![=]) => {
            p.pop();
            let value = expression::expression(p)?;
            Some(p.arena.set_property(target, value, p.span(start)))
        }
        (NodeKind::Identifier, T![=]) => {
            p.pop();
            let value = expression::expression(p)?;
            Some(p.arena.set_all_properties(target, value, p.span(start)))
        }
        (NodeKind::Identifier, T![+=]) => {
            p.pop();
            let value = expression::expression(p)?;
            Some(p.arena.merge_properties(target, value, p.span(start)))
        }
        (NodeKind::LabelsOperator, _) => {
            // `n:Label` parses as a labels operator; recast it as the
            // set-labels item it means here.
            let identifier = target_identifier(p, target)?;
            let labels: Vec<NodeId> = labels_of(p, target);
            Some(p.arena.set_labels(identifier, labels, p.span(start)))
        }
        _ => {
            p.err_expected("a SET item");
            None
        }
    }
}

fn target_identifier(p: &mut Parser, labels_op: NodeId) -> Option<NodeId> {
    let node = p.arena.node(labels_op);
    let base = *node.children.first()?;
    if p.arena.kind(base) == NodeKind::Identifier {
        Some(base)
    } else {
        p.err_expected("an identifier");
        None
    }
}

fn labels_of(p: &mut Parser, labels_op: NodeId) -> Vec<NodeId> {
    p.arena.node(labels_op).children[1..].to_vec()
}

pub(crate) fn delete_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let detach = p.eat_kw(Keyword::Detach);
    p.expect_kw(Keyword::Delete, "DELETE");
    let mut expressions = Vec::new();
    loop {
        let expression_start = p.start();
        match expression::expression(p) {
            Some(expression) => expressions.push(expression),
            None => expressions.push(p.recover(expression_start, None)),
        }
        if !p.eat(T![,]) {
            break;
        }
    }
    Some(p.arena.delete(detach, expressions, p.span(start)))
}

pub(crate) fn remove_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // REMOVE
    let mut items = Vec::new();
    loop {
        let item_start = p.start();
        match remove_item(p) {
            Some(item) => items.push(item),
            None => items.push(p.recover(item_start, None)),
        }
        if !p.eat(T![,]) {
            break;
        }
    }
    Some(p.arena.remove(items, p.span(start)))
}

/// `REMOVE n.prop` drops a property, `REMOVE n:Label` drops labels.
fn remove_item(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    let target = expression::postfix_expression(p)?;
    match p.arena.kind(target) {
        NodeKind::PropertyOperator => Some(p.arena.remove_property(target, p.span(start))),
        NodeKind::LabelsOperator => {
            let identifier = target_identifier(p, target)?;
            let labels = labels_of(p, target);
            Some(p.arena.remove_labels(identifier, labels, p.span(start)))
        }
        _ => {
            p.err_expected("a REMOVE item");
            None
        }
    }
}

/// ```txt
/// Foreach
///     FOREACH ( Identifier IN Expression | Clause+ )
/// ```
pub(crate) fn foreach_clause(p: &mut Parser) -> Option<NodeId> {
    let start = p.start();
    p.pop(); // FOREACH
    p.expect(T!['('], "'('");
    let element = identifier(p)?;
    p.expect_kw(Keyword::In, "IN");
    let list = expression::expression(p)?;
    p.expect(T![|], "'|'");
    let mut clauses = Vec::new();
    while let Some(clause) = query::clause(p) {
        clauses.push(clause);
    }
    if clauses.is_empty() {
        p.err_expected("a clause");
    }
    p.expect(T![')'], "')'");
    Some(p.arena.foreach(element, list, clauses, p.span(start)))
}

#[cfg(test)]
mod test {
    use crate::ast::{Category, NodeKind};
    use crate::Parser;

    fn clauses_of(result: &crate::ParseResult) -> Vec<crate::Node<'_>> {
        result
            .directives()
            .next()
            .unwrap()
            .body()
            .unwrap()
            .clauses()
            .collect()
    }

    #[test]
    fn merge_with_actions() {
        let result = Parser::new(
            "MERGE (n:Person {name: 'x'}) ON CREATE SET n.created = 1 ON MATCH SET n.seen = 2;",
        )
        .parse();
        assert_eq!(result.errors().count(), 0);
        let merge = clauses_of(&result)[0];
        assert_eq!(merge.kind(), NodeKind::Merge);
        assert!(merge.path().is_some());
        let actions: Vec<_> = merge.actions().collect();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind(), NodeKind::OnCreate);
        assert!(actions[0].instance_of(Category::MergeAction));
        assert_eq!(actions[1].kind(), NodeKind::OnMatch);
        let item = actions[0].items().next().unwrap();
        assert_eq!(item.kind(), NodeKind::SetProperty);
        assert!(item.instance_of(Category::SetItem));
    }

    #[test]
    fn set_item_disambiguation() {
        let result = Parser::new(
            "MATCH (n) SET n.age = 1, n = {a: 1}, n += $props, n:Admin:User RETURN n;",
        )
        .parse();
        assert_eq!(
            result.errors().count(),
            0,
            "{:?}",
            result.errors().collect::<Vec<_>>()
        );
        let set = clauses_of(&result)[1];
        assert_eq!(set.kind(), NodeKind::Set);
        let kinds: Vec<_> = set.items().map(|item| item.kind()).collect();
        assert_eq!(
            kinds,
            [
                NodeKind::SetProperty,
                NodeKind::SetAllProperties,
                NodeKind::MergeProperties,
                NodeKind::SetLabels,
            ]
        );
        let set_labels = set.items().nth(3).unwrap();
        assert_eq!(set_labels.identifier().unwrap().name(), Some("n"));
        assert_eq!(set_labels.labels().count(), 2);
    }

    #[test]
    fn delete_and_detach_delete() {
        let result = Parser::new("MATCH (n) DETACH DELETE n, n.x;").parse();
        assert_eq!(result.errors().count(), 0);
        let delete = clauses_of(&result)[1];
        assert_eq!(delete.kind(), NodeKind::Delete);
        assert!(delete.is_detach());
        assert_eq!(delete.arguments().count(), 2);

        let result = Parser::new("MATCH (n) DELETE n;").parse();
        assert!(!clauses_of(&result)[1].is_detach());
    }

    #[test]
    fn remove_items() {
        let result = Parser::new("MATCH (n) REMOVE n.age, n:Admin;").parse();
        assert_eq!(result.errors().count(), 0);
        let remove = clauses_of(&result)[1];
        let kinds: Vec<_> = remove.items().map(|item| item.kind()).collect();
        assert_eq!(kinds, [NodeKind::RemoveProperty, NodeKind::RemoveLabels]);
        let prop = remove.items().next().unwrap();
        assert!(prop.instance_of(Category::RemoveItem));
        assert_eq!(
            prop.property().unwrap().prop_name().unwrap().name(),
            Some("age")
        );
    }

    #[test]
    fn create_unique() {
        let result = Parser::new("CREATE UNIQUE (a)-[:KNOWS]->(b);").parse();
        assert_eq!(result.errors().count(), 0);
        let create = clauses_of(&result)[0];
        assert_eq!(create.kind(), NodeKind::Create);
        assert!(create.is_unique());
    }

    #[test]
    fn foreach_body_clauses() {
        let result =
            Parser::new("MATCH (n) FOREACH (x IN n.friends | SET x.known = true);").parse();
        assert_eq!(
            result.errors().count(),
            0,
            "{:?}",
            result.errors().collect::<Vec<_>>()
        );
        let foreach = clauses_of(&result)[1];
        assert_eq!(foreach.kind(), NodeKind::Foreach);
        assert_eq!(foreach.identifier().unwrap().name(), Some("x"));
        let body: Vec<_> = foreach.clauses().collect();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].kind(), NodeKind::Set);
    }
}
