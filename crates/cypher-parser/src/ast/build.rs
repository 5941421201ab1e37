//! Node construction. Every node of a parse is produced here, never
//! assembled by hand in the grammar, so the structural invariants (children
//! in source order, role slots as indices, category-checked roles) are
//! enforced in one place.
//!
//! Each constructor documents its child layout. Role checks are
//! `debug_assert!`s: the builder is crate-private, so a malformed role is a
//! parser bug, not a runtime condition. An `Error` node satisfies every
//! role, which is what lets recovery leave a well-formed tree behind.

use crate::ast::{Arena, Category, Direction, NodeData, NodeId, NodeKind, Operator, Slot};
use crate::lexer::InputRange;

/// The shared body of a `RETURN` or `WITH` clause.
#[derive(Debug, Default)]
pub(crate) struct ProjectionBody {
    pub(crate) distinct: bool,
    /// True when the projection list starts with `*`.
    pub(crate) include_existing: bool,
    pub(crate) projections: Vec<NodeId>,
    pub(crate) order_by: Option<NodeId>,
    pub(crate) skip: Option<NodeId>,
    pub(crate) limit: Option<NodeId>,
    pub(crate) predicate: Option<NodeId>,
}

impl Arena {
    #[track_caller]
    fn require(&self, id: NodeId, category: Category) {
        debug_assert!(
            self.kind(id).instance_of(category),
            "expected a {category:?} node, got {:?}",
            self.kind(id)
        );
    }

    #[track_caller]
    fn require_kind(&self, id: NodeId, kind: NodeKind) {
        debug_assert!(
            self.kind(id) == kind || self.kind(id) == NodeKind::Error,
            "expected a {kind:?} node, got {:?}",
            self.kind(id)
        );
    }
}

/// Statements, options and schema commands.
impl Arena {
    /// Children: `[options.., body]`.
    pub(crate) fn statement(
        &mut self,
        options: Vec<NodeId>,
        body: NodeId,
        range: InputRange,
    ) -> NodeId {
        for &option in &options {
            self.require(option, Category::StatementOption);
        }
        let mut children = options;
        children.push(body);
        self.push(NodeKind::Statement, range, children, NodeData::Empty)
    }

    /// Children: `[version?, params..]`.
    pub(crate) fn cypher_option(
        &mut self,
        version: Option<NodeId>,
        params: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        if let Some(version) = version {
            self.require_kind(version, NodeKind::String);
        }
        for &param in &params {
            self.require_kind(param, NodeKind::CypherOptionParam);
        }
        let has_version = version.is_some();
        let mut children: Vec<NodeId> = version.into_iter().collect();
        children.extend(params);
        self.push(
            NodeKind::CypherOption,
            range,
            children,
            NodeData::CypherOption { has_version },
        )
    }

    /// Children: `[name, value]`.
    pub(crate) fn cypher_option_param(
        &mut self,
        name: NodeId,
        value: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(name, NodeKind::String);
        self.require_kind(value, NodeKind::String);
        self.push(
            NodeKind::CypherOptionParam,
            range,
            vec![name, value],
            NodeData::Empty,
        )
    }

    pub(crate) fn explain_option(&mut self, range: InputRange) -> NodeId {
        self.push(NodeKind::ExplainOption, range, Vec::new(), NodeData::Empty)
    }

    pub(crate) fn profile_option(&mut self, range: InputRange) -> NodeId {
        self.push(NodeKind::ProfileOption, range, Vec::new(), NodeData::Empty)
    }

    /// Children: `[label, prop_name]`. `kind` is one of the two index
    /// command kinds.
    pub(crate) fn prop_index(
        &mut self,
        kind: NodeKind,
        label: NodeId,
        prop_name: NodeId,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(
            kind,
            NodeKind::CreateNodePropIndex | NodeKind::DropNodePropIndex
        ));
        self.require_kind(label, NodeKind::Label);
        self.require_kind(prop_name, NodeKind::PropName);
        self.push(kind, range, vec![label, prop_name], NodeData::Empty)
    }

    /// Children: `[identifier, label, expression]`.
    pub(crate) fn node_prop_constraint(
        &mut self,
        kind: NodeKind,
        identifier: NodeId,
        label: NodeId,
        expression: NodeId,
        unique: bool,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(
            kind,
            NodeKind::CreateNodePropConstraint | NodeKind::DropNodePropConstraint
        ));
        self.require_kind(identifier, NodeKind::Identifier);
        self.require_kind(label, NodeKind::Label);
        self.require(expression, Category::Expression);
        self.push(
            kind,
            range,
            vec![identifier, label, expression],
            NodeData::Flag(unique),
        )
    }

    /// Children: `[identifier, reltype, expression]`.
    pub(crate) fn rel_prop_constraint(
        &mut self,
        kind: NodeKind,
        identifier: NodeId,
        reltype: NodeId,
        expression: NodeId,
        unique: bool,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(
            kind,
            NodeKind::CreateRelPropConstraint | NodeKind::DropRelPropConstraint
        ));
        self.require_kind(identifier, NodeKind::Identifier);
        self.require_kind(reltype, NodeKind::RelType);
        self.require(expression, Category::Expression);
        self.push(
            kind,
            range,
            vec![identifier, reltype, expression],
            NodeData::Flag(unique),
        )
    }
}

/// Queries and clauses.
impl Arena {
    /// Children: `[options.., clauses..]`.
    pub(crate) fn query(
        &mut self,
        options: Vec<NodeId>,
        clauses: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        for &option in &options {
            self.require(option, Category::QueryOption);
        }
        for &clause in &clauses {
            self.require(clause, Category::QueryClause);
        }
        let noptions = options.len() as Slot;
        let mut children = options;
        children.extend(clauses);
        self.push(NodeKind::Query, range, children, NodeData::Query { noptions })
    }

    /// Children: `[limit?]`.
    pub(crate) fn using_periodic_commit(
        &mut self,
        limit: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        if let Some(limit) = limit {
            self.require_kind(limit, NodeKind::Integer);
        }
        self.push(
            NodeKind::UsingPeriodicCommit,
            range,
            limit.into_iter().collect(),
            NodeData::Empty,
        )
    }

    /// Children: `[url, identifier, field_terminator?]`.
    pub(crate) fn load_csv(
        &mut self,
        with_headers: bool,
        url: NodeId,
        identifier: NodeId,
        field_terminator: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require(url, Category::Expression);
        self.require_kind(identifier, NodeKind::Identifier);
        if let Some(terminator) = field_terminator {
            self.require_kind(terminator, NodeKind::String);
        }
        let mut children = vec![url, identifier];
        let field_terminator = field_terminator.map(|terminator| {
            children.push(terminator);
            (children.len() - 1) as Slot
        });
        self.push(
            NodeKind::LoadCsv,
            range,
            children,
            NodeData::LoadCsv {
                with_headers,
                field_terminator,
            },
        )
    }

    /// Children: `[points.., predicate?]`.
    pub(crate) fn start(
        &mut self,
        points: Vec<NodeId>,
        predicate: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        for &point in &points {
            self.require(point, Category::StartPoint);
        }
        if let Some(predicate) = predicate {
            self.require(predicate, Category::Expression);
        }
        let mut children = points;
        let predicate = predicate.map(|predicate| {
            children.push(predicate);
            (children.len() - 1) as Slot
        });
        self.push(NodeKind::Start, range, children, NodeData::Start { predicate })
    }

    /// Children: `[identifier, index_name, prop_name, lookup]`. `kind` is
    /// `NodeIndexLookup` or `RelIndexLookup`.
    pub(crate) fn index_lookup(
        &mut self,
        kind: NodeKind,
        identifier: NodeId,
        index_name: NodeId,
        prop_name: NodeId,
        lookup: NodeId,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(
            kind,
            NodeKind::NodeIndexLookup | NodeKind::RelIndexLookup
        ));
        self.require_kind(identifier, NodeKind::Identifier);
        self.require_kind(index_name, NodeKind::IndexName);
        self.require_kind(prop_name, NodeKind::PropName);
        debug_assert!(matches!(
            self.kind(lookup),
            NodeKind::String | NodeKind::Parameter | NodeKind::Error
        ));
        self.push(
            kind,
            range,
            vec![identifier, index_name, prop_name, lookup],
            NodeData::Empty,
        )
    }

    /// Children: `[identifier, index_name, query]`. `kind` is
    /// `NodeIndexQuery` or `RelIndexQuery`.
    pub(crate) fn index_query(
        &mut self,
        kind: NodeKind,
        identifier: NodeId,
        index_name: NodeId,
        query: NodeId,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(
            kind,
            NodeKind::NodeIndexQuery | NodeKind::RelIndexQuery
        ));
        self.require_kind(identifier, NodeKind::Identifier);
        self.require_kind(index_name, NodeKind::IndexName);
        debug_assert!(matches!(
            self.kind(query),
            NodeKind::String | NodeKind::Parameter | NodeKind::Error
        ));
        self.push(
            kind,
            range,
            vec![identifier, index_name, query],
            NodeData::Empty,
        )
    }

    /// Children: `[identifier, ids..]`. `kind` is `NodeIdLookup` or
    /// `RelIdLookup`.
    pub(crate) fn id_lookup(
        &mut self,
        kind: NodeKind,
        identifier: NodeId,
        ids: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(kind, NodeKind::NodeIdLookup | NodeKind::RelIdLookup));
        self.require_kind(identifier, NodeKind::Identifier);
        for &id in &ids {
            self.require_kind(id, NodeKind::Integer);
        }
        let mut children = vec![identifier];
        children.extend(ids);
        self.push(kind, range, children, NodeData::Empty)
    }

    /// Children: `[identifier]`. `kind` is `AllNodesScan` or `AllRelsScan`.
    pub(crate) fn all_scan(
        &mut self,
        kind: NodeKind,
        identifier: NodeId,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(kind, NodeKind::AllNodesScan | NodeKind::AllRelsScan));
        self.require_kind(identifier, NodeKind::Identifier);
        self.push(kind, range, vec![identifier], NodeData::Empty)
    }

    /// Children: `[pattern, hints.., predicate?]`.
    pub(crate) fn match_clause(
        &mut self,
        optional: bool,
        pattern: NodeId,
        hints: Vec<NodeId>,
        predicate: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(pattern, NodeKind::Pattern);
        for &hint in &hints {
            self.require(hint, Category::MatchHint);
        }
        if let Some(predicate) = predicate {
            self.require(predicate, Category::Expression);
        }
        let mut children = vec![pattern];
        children.extend(hints);
        let predicate = predicate.map(|predicate| {
            children.push(predicate);
            (children.len() - 1) as Slot
        });
        self.push(
            NodeKind::Match,
            range,
            children,
            NodeData::Match { optional, predicate },
        )
    }

    /// Children: `[identifier, label, prop_name]`.
    pub(crate) fn using_index(
        &mut self,
        identifier: NodeId,
        label: NodeId,
        prop_name: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        self.require_kind(label, NodeKind::Label);
        self.require_kind(prop_name, NodeKind::PropName);
        self.push(
            NodeKind::UsingIndex,
            range,
            vec![identifier, label, prop_name],
            NodeData::Empty,
        )
    }

    /// Children: `[identifiers..]`.
    pub(crate) fn using_join(&mut self, identifiers: Vec<NodeId>, range: InputRange) -> NodeId {
        for &identifier in &identifiers {
            self.require_kind(identifier, NodeKind::Identifier);
        }
        self.push(NodeKind::UsingJoin, range, identifiers, NodeData::Empty)
    }

    /// Children: `[identifier, label]`.
    pub(crate) fn using_scan(
        &mut self,
        identifier: NodeId,
        label: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        self.require_kind(label, NodeKind::Label);
        self.push(
            NodeKind::UsingScan,
            range,
            vec![identifier, label],
            NodeData::Empty,
        )
    }

    /// Children: `[path, actions..]`.
    pub(crate) fn merge(
        &mut self,
        path: NodeId,
        actions: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require(path, Category::PatternPath);
        for &action in &actions {
            self.require(action, Category::MergeAction);
        }
        let mut children = vec![path];
        children.extend(actions);
        self.push(NodeKind::Merge, range, children, NodeData::Empty)
    }

    /// Children: `[items..]`. `kind` is `OnMatch` or `OnCreate`.
    pub(crate) fn merge_action(
        &mut self,
        kind: NodeKind,
        items: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(kind, NodeKind::OnMatch | NodeKind::OnCreate));
        for &item in &items {
            self.require(item, Category::SetItem);
        }
        self.push(kind, range, items, NodeData::Empty)
    }

    /// Children: `[pattern]`.
    pub(crate) fn create_clause(
        &mut self,
        unique: bool,
        pattern: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(pattern, NodeKind::Pattern);
        self.push(NodeKind::Create, range, vec![pattern], NodeData::Flag(unique))
    }

    /// Children: `[items..]`.
    pub(crate) fn set_clause(&mut self, items: Vec<NodeId>, range: InputRange) -> NodeId {
        for &item in &items {
            self.require(item, Category::SetItem);
        }
        self.push(NodeKind::Set, range, items, NodeData::Empty)
    }

    /// Children: `[property, expression]`.
    pub(crate) fn set_property(
        &mut self,
        property: NodeId,
        expression: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(property, NodeKind::PropertyOperator);
        self.require(expression, Category::Expression);
        self.push(
            NodeKind::SetProperty,
            range,
            vec![property, expression],
            NodeData::Empty,
        )
    }

    /// Children: `[identifier, expression]`.
    pub(crate) fn set_all_properties(
        &mut self,
        identifier: NodeId,
        expression: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        self.require(expression, Category::Expression);
        self.push(
            NodeKind::SetAllProperties,
            range,
            vec![identifier, expression],
            NodeData::Empty,
        )
    }

    /// Children: `[identifier, expression]`.
    pub(crate) fn merge_properties(
        &mut self,
        identifier: NodeId,
        expression: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        self.require(expression, Category::Expression);
        self.push(
            NodeKind::MergeProperties,
            range,
            vec![identifier, expression],
            NodeData::Empty,
        )
    }

    /// Children: `[identifier, labels..]`.
    pub(crate) fn set_labels(
        &mut self,
        identifier: NodeId,
        labels: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        for &label in &labels {
            self.require_kind(label, NodeKind::Label);
        }
        let mut children = vec![identifier];
        children.extend(labels);
        self.push(NodeKind::SetLabels, range, children, NodeData::Empty)
    }

    /// Children: `[expressions..]`.
    pub(crate) fn delete(
        &mut self,
        detach: bool,
        expressions: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        for &expression in &expressions {
            self.require(expression, Category::Expression);
        }
        self.push(NodeKind::Delete, range, expressions, NodeData::Flag(detach))
    }

    /// Children: `[items..]`.
    pub(crate) fn remove(&mut self, items: Vec<NodeId>, range: InputRange) -> NodeId {
        for &item in &items {
            self.require(item, Category::RemoveItem);
        }
        self.push(NodeKind::Remove, range, items, NodeData::Empty)
    }

    /// Children: `[identifier, labels..]`.
    pub(crate) fn remove_labels(
        &mut self,
        identifier: NodeId,
        labels: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        for &label in &labels {
            self.require_kind(label, NodeKind::Label);
        }
        let mut children = vec![identifier];
        children.extend(labels);
        self.push(NodeKind::RemoveLabels, range, children, NodeData::Empty)
    }

    /// Children: `[property]`.
    pub(crate) fn remove_property(&mut self, property: NodeId, range: InputRange) -> NodeId {
        self.require_kind(property, NodeKind::PropertyOperator);
        self.push(
            NodeKind::RemoveProperty,
            range,
            vec![property],
            NodeData::Empty,
        )
    }

    /// Children: `[identifier, expression, clauses..]`.
    pub(crate) fn foreach(
        &mut self,
        identifier: NodeId,
        expression: NodeId,
        clauses: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        self.require(expression, Category::Expression);
        for &clause in &clauses {
            self.require(clause, Category::QueryClause);
        }
        let mut children = vec![identifier, expression];
        children.extend(clauses);
        self.push(NodeKind::Foreach, range, children, NodeData::Empty)
    }

    /// Children: `[projections.., order_by?, skip?, limit?, predicate?]`.
    /// `kind` is `Return` or `With`; only `With` takes a predicate.
    pub(crate) fn projection_clause(
        &mut self,
        kind: NodeKind,
        body: ProjectionBody,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(matches!(kind, NodeKind::Return | NodeKind::With));
        debug_assert!(kind == NodeKind::With || body.predicate.is_none());
        for &projection in &body.projections {
            self.require_kind(projection, NodeKind::Projection);
        }
        if let Some(order_by) = body.order_by {
            self.require_kind(order_by, NodeKind::OrderBy);
        }
        for expression in [body.skip, body.limit, body.predicate].into_iter().flatten() {
            self.require(expression, Category::Expression);
        }

        let nprojections = body.projections.len() as Slot;
        let mut children = body.projections;
        let slot_for = |children: &mut Vec<NodeId>, id: Option<NodeId>| {
            id.map(|id| {
                children.push(id);
                (children.len() - 1) as Slot
            })
        };
        let order_by = slot_for(&mut children, body.order_by);
        let skip = slot_for(&mut children, body.skip);
        let limit = slot_for(&mut children, body.limit);
        let predicate = slot_for(&mut children, body.predicate);
        self.push(
            kind,
            range,
            children,
            NodeData::Projections {
                nprojections,
                distinct: body.distinct,
                include_existing: body.include_existing,
                order_by,
                skip,
                limit,
                predicate,
            },
        )
    }

    /// Children: `[expression, alias]`.
    pub(crate) fn unwind(
        &mut self,
        expression: NodeId,
        alias: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require(expression, Category::Expression);
        self.require_kind(alias, NodeKind::Identifier);
        self.push(
            NodeKind::Unwind,
            range,
            vec![expression, alias],
            NodeData::Empty,
        )
    }

    /// Children: `[proc_name, args.., projections..]`.
    pub(crate) fn call(
        &mut self,
        proc_name: NodeId,
        args: Vec<NodeId>,
        projections: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(proc_name, NodeKind::ProcName);
        for &arg in &args {
            self.require(arg, Category::Expression);
        }
        for &projection in &projections {
            self.require_kind(projection, NodeKind::Projection);
        }
        let nargs = args.len() as Slot;
        let mut children = vec![proc_name];
        children.extend(args);
        children.extend(projections);
        self.push(NodeKind::Call, range, children, NodeData::Call { nargs })
    }

    /// Children: `[expression, alias?]`.
    pub(crate) fn projection(
        &mut self,
        expression: NodeId,
        alias: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require(expression, Category::Expression);
        if let Some(alias) = alias {
            self.require_kind(alias, NodeKind::Identifier);
        }
        let mut children = vec![expression];
        children.extend(alias);
        self.push(NodeKind::Projection, range, children, NodeData::Empty)
    }

    /// Children: `[items..]`.
    pub(crate) fn order_by(&mut self, items: Vec<NodeId>, range: InputRange) -> NodeId {
        for &item in &items {
            self.require_kind(item, NodeKind::SortItem);
        }
        self.push(NodeKind::OrderBy, range, items, NodeData::Empty)
    }

    /// Children: `[expression]`.
    pub(crate) fn sort_item(
        &mut self,
        expression: NodeId,
        ascending: bool,
        range: InputRange,
    ) -> NodeId {
        self.require(expression, Category::Expression);
        self.push(
            NodeKind::SortItem,
            range,
            vec![expression],
            NodeData::Flag(ascending),
        )
    }

    pub(crate) fn union(&mut self, all: bool, range: InputRange) -> NodeId {
        self.push(NodeKind::Union, range, Vec::new(), NodeData::Flag(all))
    }
}

/// Expressions.
impl Arena {
    /// Children: `[argument]`.
    pub(crate) fn unary_operator(
        &mut self,
        op: Operator,
        argument: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require(argument, Category::Expression);
        self.push(
            NodeKind::UnaryOperator,
            range,
            vec![argument],
            NodeData::Op(op),
        )
    }

    /// Children: `[left, right]`.
    pub(crate) fn binary_operator(
        &mut self,
        op: Operator,
        left: NodeId,
        right: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require(left, Category::Expression);
        self.require(right, Category::Expression);
        self.push(
            NodeKind::BinaryOperator,
            range,
            vec![left, right],
            NodeData::Op(op),
        )
    }

    /// Children: `[arguments..]`, one more than there are operators.
    pub(crate) fn comparison(
        &mut self,
        ops: Vec<Operator>,
        args: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        debug_assert_eq!(ops.len() + 1, args.len());
        for &arg in &args {
            self.require(arg, Category::Expression);
        }
        self.push(
            NodeKind::Comparison,
            range,
            args,
            NodeData::Ops(ops.into_boxed_slice()),
        )
    }

    /// Children: `[function_name, args..]`.
    pub(crate) fn apply(
        &mut self,
        function_name: NodeId,
        distinct: bool,
        args: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(function_name, NodeKind::FunctionName);
        for &arg in &args {
            self.require(arg, Category::Expression);
        }
        let mut children = vec![function_name];
        children.extend(args);
        self.push(
            NodeKind::ApplyOperator,
            range,
            children,
            NodeData::Flag(distinct),
        )
    }

    /// Children: `[function_name]`; the `f(*)` form.
    pub(crate) fn apply_all(
        &mut self,
        function_name: NodeId,
        distinct: bool,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(function_name, NodeKind::FunctionName);
        self.push(
            NodeKind::ApplyAllOperator,
            range,
            vec![function_name],
            NodeData::Flag(distinct),
        )
    }

    /// Children: `[expression, prop_name]`.
    pub(crate) fn property_operator(
        &mut self,
        expression: NodeId,
        prop_name: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require(expression, Category::Expression);
        self.require_kind(prop_name, NodeKind::PropName);
        self.push(
            NodeKind::PropertyOperator,
            range,
            vec![expression, prop_name],
            NodeData::Empty,
        )
    }

    /// Children: `[expression, subscript]`.
    pub(crate) fn subscript_operator(
        &mut self,
        expression: NodeId,
        subscript: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require(expression, Category::Expression);
        self.require(subscript, Category::Expression);
        self.push(
            NodeKind::SubscriptOperator,
            range,
            vec![expression, subscript],
            NodeData::Empty,
        )
    }

    /// Children: `[expression, start?, end?]`.
    pub(crate) fn slice_operator(
        &mut self,
        expression: NodeId,
        start: Option<NodeId>,
        end: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require(expression, Category::Expression);
        for bound in [start, end].into_iter().flatten() {
            self.require(bound, Category::Expression);
        }
        let mut children = vec![expression];
        let start = start.map(|start| {
            children.push(start);
            (children.len() - 1) as Slot
        });
        let end = end.map(|end| {
            children.push(end);
            (children.len() - 1) as Slot
        });
        self.push(
            NodeKind::SliceOperator,
            range,
            children,
            NodeData::Slice { start, end },
        )
    }

    /// Children: `[expression, labels..]`.
    pub(crate) fn labels_operator(
        &mut self,
        expression: NodeId,
        labels: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require(expression, Category::Expression);
        for &label in &labels {
            self.require_kind(label, NodeKind::Label);
        }
        let mut children = vec![expression];
        children.extend(labels);
        self.push(NodeKind::LabelsOperator, range, children, NodeData::Empty)
    }

    /// Children: `[identifier, expression, predicate?, eval?]`. `kind` is
    /// `ListComprehension`, `Filter`, `Extract` or one of the quantifiers.
    pub(crate) fn comprehension(
        &mut self,
        kind: NodeKind,
        identifier: NodeId,
        expression: NodeId,
        predicate: Option<NodeId>,
        eval: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        debug_assert!(kind.instance_of(Category::ListComprehension));
        self.require_kind(identifier, NodeKind::Identifier);
        self.require(expression, Category::Expression);
        for part in [predicate, eval].into_iter().flatten() {
            self.require(part, Category::Expression);
        }
        let mut children = vec![identifier, expression];
        let predicate = predicate.map(|predicate| {
            children.push(predicate);
            (children.len() - 1) as Slot
        });
        let eval = eval.map(|eval| {
            children.push(eval);
            (children.len() - 1) as Slot
        });
        self.push(kind, range, children, NodeData::Comprehension { predicate, eval })
    }

    /// Children: `[accumulator, init, identifier, expression, eval]`.
    pub(crate) fn reduce(
        &mut self,
        accumulator: NodeId,
        init: NodeId,
        identifier: NodeId,
        expression: NodeId,
        eval: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(accumulator, NodeKind::Identifier);
        self.require(init, Category::Expression);
        self.require_kind(identifier, NodeKind::Identifier);
        self.require(expression, Category::Expression);
        self.require(eval, Category::Expression);
        self.push(
            NodeKind::Reduce,
            range,
            vec![accumulator, init, identifier, expression, eval],
            NodeData::Empty,
        )
    }

    /// Children: `[expression?, (predicate, value).., default?]`. Each
    /// alternative contributes its predicate and value in order.
    pub(crate) fn case(
        &mut self,
        expression: Option<NodeId>,
        alternatives: Vec<(NodeId, NodeId)>,
        default: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        for part in expression.iter().chain(default.iter()) {
            self.require(*part, Category::Expression);
        }
        for &(predicate, value) in &alternatives {
            self.require(predicate, Category::Expression);
            self.require(value, Category::Expression);
        }
        let mut children = Vec::with_capacity(
            alternatives.len() * 2 + usize::from(expression.is_some()) + usize::from(default.is_some()),
        );
        let expression = expression.map(|expression| {
            children.push(expression);
            (children.len() - 1) as Slot
        });
        for (predicate, value) in alternatives {
            children.push(predicate);
            children.push(value);
        }
        let default = default.map(|default| {
            children.push(default);
            (children.len() - 1) as Slot
        });
        self.push(
            NodeKind::Case,
            range,
            children,
            NodeData::Case { expression, default },
        )
    }

    /// Children: `[elements..]`.
    pub(crate) fn collection(&mut self, elements: Vec<NodeId>, range: InputRange) -> NodeId {
        for &element in &elements {
            self.require(element, Category::Expression);
        }
        self.push(NodeKind::Collection, range, elements, NodeData::Empty)
    }

    /// Children: `[(prop_name, value)..]`, flattened in order.
    pub(crate) fn map(&mut self, entries: Vec<(NodeId, NodeId)>, range: InputRange) -> NodeId {
        let mut children = Vec::with_capacity(entries.len() * 2);
        for (prop_name, value) in entries {
            self.require_kind(prop_name, NodeKind::PropName);
            self.require(value, Category::Expression);
            children.push(prop_name);
            children.push(value);
        }
        self.push(NodeKind::Map, range, children, NodeData::Empty)
    }

    pub(crate) fn identifier(&mut self, name: &str, range: InputRange) -> NodeId {
        self.push(
            NodeKind::Identifier,
            range,
            Vec::new(),
            NodeData::Text(name.into()),
        )
    }

    pub(crate) fn parameter(&mut self, name: &str, range: InputRange) -> NodeId {
        self.push(
            NodeKind::Parameter,
            range,
            Vec::new(),
            NodeData::Text(name.into()),
        )
    }

    pub(crate) fn string(&mut self, value: String, range: InputRange) -> NodeId {
        self.push(
            NodeKind::String,
            range,
            Vec::new(),
            NodeData::Text(value.into_boxed_str()),
        )
    }

    pub(crate) fn integer(&mut self, text: &str, range: InputRange) -> NodeId {
        self.push(
            NodeKind::Integer,
            range,
            Vec::new(),
            NodeData::Text(text.into()),
        )
    }

    pub(crate) fn float(&mut self, text: &str, range: InputRange) -> NodeId {
        let value = text.parse::<f64>().unwrap_or_default();
        self.push(
            NodeKind::Float,
            range,
            Vec::new(),
            NodeData::Float {
                text: text.into(),
                value: value.into(),
            },
        )
    }

    pub(crate) fn boolean(&mut self, value: bool, range: InputRange) -> NodeId {
        let kind = if value { NodeKind::True } else { NodeKind::False };
        self.push(kind, range, Vec::new(), NodeData::Empty)
    }

    pub(crate) fn null(&mut self, range: InputRange) -> NodeId {
        self.push(NodeKind::Null, range, Vec::new(), NodeData::Empty)
    }

    /// A name-ish leaf: `Label`, `RelType`, `PropName`, `FunctionName`,
    /// `IndexName` or `ProcName`.
    pub(crate) fn name_node(&mut self, kind: NodeKind, name: &str, range: InputRange) -> NodeId {
        debug_assert!(matches!(
            kind,
            NodeKind::Label
                | NodeKind::RelType
                | NodeKind::PropName
                | NodeKind::FunctionName
                | NodeKind::IndexName
                | NodeKind::ProcName
        ));
        self.push(kind, range, Vec::new(), NodeData::Text(name.into()))
    }
}

/// Patterns.
impl Arena {
    /// Children: `[paths..]`.
    pub(crate) fn pattern(&mut self, paths: Vec<NodeId>, range: InputRange) -> NodeId {
        for &path in &paths {
            self.require(path, Category::PatternPath);
        }
        self.push(NodeKind::Pattern, range, paths, NodeData::Empty)
    }

    /// Children: `[identifier, path]`.
    pub(crate) fn named_path(
        &mut self,
        identifier: NodeId,
        path: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(identifier, NodeKind::Identifier);
        self.require(path, Category::PatternPath);
        self.push(
            NodeKind::NamedPath,
            range,
            vec![identifier, path],
            NodeData::Empty,
        )
    }

    /// Children: `[path]`. `single` is true for `shortestPath`, false for
    /// `allShortestPaths`.
    pub(crate) fn shortest_path(
        &mut self,
        single: bool,
        path: NodeId,
        range: InputRange,
    ) -> NodeId {
        self.require(path, Category::PatternPath);
        self.push(
            NodeKind::ShortestPath,
            range,
            vec![path],
            NodeData::Flag(single),
        )
    }

    /// Children: `[elements..]`, alternating node and relationship
    /// patterns, starting and ending with node patterns.
    pub(crate) fn pattern_path(&mut self, elements: Vec<NodeId>, range: InputRange) -> NodeId {
        debug_assert!(elements.len() % 2 == 1, "a pattern path has 2n+1 elements");
        for (i, &element) in elements.iter().enumerate() {
            let expected = if i % 2 == 0 {
                NodeKind::NodePattern
            } else {
                NodeKind::RelPattern
            };
            self.require_kind(element, expected);
        }
        self.push(NodeKind::PatternPath, range, elements, NodeData::Empty)
    }

    /// Children: `[identifier?, labels.., properties?]`.
    pub(crate) fn node_pattern(
        &mut self,
        identifier: Option<NodeId>,
        labels: Vec<NodeId>,
        properties: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        if let Some(identifier) = identifier {
            self.require_kind(identifier, NodeKind::Identifier);
        }
        for &label in &labels {
            self.require_kind(label, NodeKind::Label);
        }
        if let Some(properties) = properties {
            debug_assert!(matches!(
                self.kind(properties),
                NodeKind::Map | NodeKind::Parameter | NodeKind::Error
            ));
        }
        let mut children = Vec::new();
        let identifier = identifier.map(|identifier| {
            children.push(identifier);
            (children.len() - 1) as Slot
        });
        children.extend(labels);
        let properties = properties.map(|properties| {
            children.push(properties);
            (children.len() - 1) as Slot
        });
        self.push(
            NodeKind::NodePattern,
            range,
            children,
            NodeData::NodePattern {
                identifier,
                properties,
            },
        )
    }

    /// Children: `[identifier?, reltypes.., varlength?, properties?]`.
    pub(crate) fn rel_pattern(
        &mut self,
        direction: Direction,
        identifier: Option<NodeId>,
        reltypes: Vec<NodeId>,
        varlength: Option<NodeId>,
        properties: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        if let Some(identifier) = identifier {
            self.require_kind(identifier, NodeKind::Identifier);
        }
        for &reltype in &reltypes {
            self.require_kind(reltype, NodeKind::RelType);
        }
        if let Some(varlength) = varlength {
            self.require_kind(varlength, NodeKind::Range);
        }
        if let Some(properties) = properties {
            debug_assert!(matches!(
                self.kind(properties),
                NodeKind::Map | NodeKind::Parameter | NodeKind::Error
            ));
        }
        let mut children = Vec::new();
        let identifier = identifier.map(|identifier| {
            children.push(identifier);
            (children.len() - 1) as Slot
        });
        children.extend(reltypes);
        let varlength = varlength.map(|varlength| {
            children.push(varlength);
            (children.len() - 1) as Slot
        });
        let properties = properties.map(|properties| {
            children.push(properties);
            (children.len() - 1) as Slot
        });
        self.push(
            NodeKind::RelPattern,
            range,
            children,
            NodeData::RelPattern {
                direction,
                identifier,
                varlength,
                properties,
            },
        )
    }

    /// Children: `[start?, end?]`. A fixed-length range (`*2`) passes the
    /// same node for both bounds; it is stored once and both slots point
    /// at it.
    pub(crate) fn range_node(
        &mut self,
        start: Option<NodeId>,
        end: Option<NodeId>,
        range: InputRange,
    ) -> NodeId {
        for bound in [start, end].into_iter().flatten() {
            self.require_kind(bound, NodeKind::Integer);
        }
        let mut children = Vec::new();
        let start_slot = start.map(|start| {
            children.push(start);
            (children.len() - 1) as Slot
        });
        let end_slot = match (start, end) {
            (Some(start), Some(end)) if start == end => start_slot,
            (_, Some(end)) => {
                children.push(end);
                Some((children.len() - 1) as Slot)
            }
            (_, None) => None,
        };
        self.push(
            NodeKind::Range,
            range,
            children,
            NodeData::Slice {
                start: start_slot,
                end: end_slot,
            },
        )
    }
}

/// Commands, comments, errors.
impl Arena {
    /// Children: `[name, args..]`, all `String` nodes.
    pub(crate) fn command(
        &mut self,
        name: NodeId,
        args: Vec<NodeId>,
        range: InputRange,
    ) -> NodeId {
        self.require_kind(name, NodeKind::String);
        for &arg in &args {
            self.require_kind(arg, NodeKind::String);
        }
        let mut children = vec![name];
        children.extend(args);
        self.push(NodeKind::Command, range, children, NodeData::Empty)
    }

    /// `kind` is `LineComment` or `BlockComment`; `text` is the comment
    /// body without its markers.
    pub(crate) fn comment(&mut self, kind: NodeKind, text: &str, range: InputRange) -> NodeId {
        debug_assert!(matches!(
            kind,
            NodeKind::LineComment | NodeKind::BlockComment
        ));
        self.push(kind, range, Vec::new(), NodeData::Text(text.into()))
    }

    /// A placeholder for input the grammar could not make sense of; spans
    /// the skipped range and satisfies any role.
    pub(crate) fn error(&mut self, range: InputRange) -> NodeId {
        self.push(NodeKind::Error, range, Vec::new(), NodeData::Empty)
    }
}
