//! Typed payload accessors for [`Node`].
//!
//! Every accessor is kind-checked and returns `None` (or an empty
//! iterator) when asked of a node that does not carry the requested role,
//! so callers can probe without matching on [`NodeKind`] first.

use crate::ast::{Children, Direction, Node, NodeData, NodeId, NodeKind, Operator};

impl<'a> Node<'a> {
    fn child_ids(&self) -> &'a [NodeId] {
        &self.record().children
    }

    fn children_in(&self, from: usize, to: usize) -> Children<'a> {
        let ids = self.child_ids();
        let to = to.min(ids.len());
        let from = from.min(to);
        Children {
            arena: self.arena,
            ids: ids[from..to].iter(),
        }
    }

    /// The smallest optional-slot index, used as the end of leading child
    /// lists (projections, hints, start points).
    fn first_slot(&self, slots: &[Option<u32>]) -> usize {
        slots
            .iter()
            .flatten()
            .copied()
            .min()
            .map(|slot| slot as usize)
            .unwrap_or_else(|| self.n_children())
    }
}

/// Leaf payloads.
impl<'a> Node<'a> {
    /// The name of an identifier, parameter, label, relationship type,
    /// property name, function name, index name or procedure name.
    pub fn name(&self) -> Option<&'a str> {
        match (self.kind(), self.data()) {
            (
                NodeKind::Identifier
                | NodeKind::Parameter
                | NodeKind::Label
                | NodeKind::RelType
                | NodeKind::PropName
                | NodeKind::FunctionName
                | NodeKind::IndexName
                | NodeKind::ProcName,
                NodeData::Text(text),
            ) => Some(text),
            _ => None,
        }
    }

    /// The value text of a literal or comment: the unescaped contents of a
    /// string, the raw text of an integer or float literal, or the body of
    /// a comment without its markers.
    pub fn value_text(&self) -> Option<&'a str> {
        match (self.kind(), self.data()) {
            (
                NodeKind::String | NodeKind::Integer | NodeKind::LineComment
                | NodeKind::BlockComment,
                NodeData::Text(text),
            ) => Some(text),
            (NodeKind::Float, NodeData::Float { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// The numeric value of a float literal.
    pub fn float_value(&self) -> Option<f64> {
        match self.data() {
            NodeData::Float { value, .. } => Some(value.into_inner()),
            _ => None,
        }
    }

    /// The operator of a unary or binary operator node.
    pub fn operator(&self) -> Option<Operator> {
        match self.data() {
            NodeData::Op(op) => Some(*op),
            _ => None,
        }
    }

    /// The operator chain of a comparison node.
    pub fn operators(&self) -> Option<&'a [Operator]> {
        match self.data() {
            NodeData::Ops(ops) => Some(ops),
            _ => None,
        }
    }

    /// The number of operators in a comparison chain.
    pub fn comparison_length(&self) -> Option<usize> {
        self.operators().map(<[Operator]>::len)
    }

    /// The direction of a relationship pattern.
    pub fn direction(&self) -> Option<Direction> {
        match self.data() {
            NodeData::RelPattern { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}

/// Boolean attributes. Each returns `false` for kinds it does not apply to.
impl Node<'_> {
    /// True for `OPTIONAL MATCH`.
    pub fn is_optional(&self) -> bool {
        matches!(self.data(), NodeData::Match { optional: true, .. })
    }

    /// True for `CREATE UNIQUE` and uniqueness constraints.
    pub fn is_unique(&self) -> bool {
        matches!(
            (self.kind(), self.data()),
            (
                NodeKind::Create
                    | NodeKind::CreateNodePropConstraint
                    | NodeKind::DropNodePropConstraint
                    | NodeKind::CreateRelPropConstraint
                    | NodeKind::DropRelPropConstraint,
                NodeData::Flag(true)
            )
        )
    }

    /// True for `DETACH DELETE`.
    pub fn is_detach(&self) -> bool {
        matches!((self.kind(), self.data()), (NodeKind::Delete, NodeData::Flag(true)))
    }

    /// True for `DISTINCT` projections and function applications.
    pub fn is_distinct(&self) -> bool {
        match (self.kind(), self.data()) {
            (
                NodeKind::ApplyOperator | NodeKind::ApplyAllOperator,
                NodeData::Flag(distinct),
            ) => *distinct,
            (_, NodeData::Projections { distinct, .. }) => *distinct,
            _ => false,
        }
    }

    /// True for `shortestPath`, false for `allShortestPaths`.
    pub fn is_single(&self) -> bool {
        matches!(
            (self.kind(), self.data()),
            (NodeKind::ShortestPath, NodeData::Flag(true))
        )
    }

    /// True for `UNION ALL`.
    pub fn is_all(&self) -> bool {
        matches!((self.kind(), self.data()), (NodeKind::Union, NodeData::Flag(true)))
    }

    /// Sort direction of a sort item; defaults to ascending.
    pub fn is_ascending(&self) -> bool {
        !matches!(
            (self.kind(), self.data()),
            (NodeKind::SortItem, NodeData::Flag(false))
        )
    }

    /// True for `LOAD CSV WITH HEADERS`.
    pub fn has_headers(&self) -> bool {
        matches!(
            self.data(),
            NodeData::LoadCsv {
                with_headers: true,
                ..
            }
        )
    }

    /// True when a `RETURN`/`WITH` projection list starts with `*`.
    pub fn includes_existing(&self) -> bool {
        matches!(
            self.data(),
            NodeData::Projections {
                include_existing: true,
                ..
            }
        )
    }
}

/// Structural roles.
impl<'a> Node<'a> {
    /// The body of a statement: its query or schema command.
    pub fn body(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::Statement => self.child(self.n_children().checked_sub(1)?),
            _ => None,
        }
    }

    /// Statement options, or query options.
    pub fn options(&self) -> Children<'a> {
        match (self.kind(), self.data()) {
            (NodeKind::Statement, _) => {
                self.children_in(0, self.n_children().saturating_sub(1))
            }
            (NodeKind::Query, NodeData::Query { noptions }) => {
                self.children_in(0, *noptions as usize)
            }
            _ => self.children_in(0, 0),
        }
    }

    /// The clauses of a query, or of a `FOREACH` body.
    pub fn clauses(&self) -> Children<'a> {
        match (self.kind(), self.data()) {
            (NodeKind::Query, NodeData::Query { noptions }) => {
                self.children_in(*noptions as usize, self.n_children())
            }
            (NodeKind::Foreach, _) => self.children_in(2, self.n_children()),
            _ => self.children_in(0, 0),
        }
    }

    /// The version string of a `CYPHER` option.
    pub fn version(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::CypherOption { has_version: true } => self.child(0),
            _ => None,
        }
    }

    /// The parameters of a `CYPHER` option.
    pub fn option_params(&self) -> Children<'a> {
        match self.data() {
            NodeData::CypherOption { has_version } => {
                self.children_in(usize::from(*has_version), self.n_children())
            }
            _ => self.children_in(0, 0),
        }
    }

    /// The pattern of a `MATCH` or `CREATE` clause.
    pub fn pattern(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::Match | NodeKind::Create => self.child(0),
            _ => None,
        }
    }

    /// The `WHERE` predicate of a clause, or the predicate of a list
    /// comprehension or quantifier.
    pub fn predicate(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::Match { predicate, .. }
            | NodeData::Start { predicate }
            | NodeData::Projections { predicate, .. }
            | NodeData::Comprehension { predicate, .. } => self.slot(*predicate),
            _ => None,
        }
    }

    /// The hints of a `MATCH` clause.
    pub fn hints(&self) -> Children<'a> {
        match self.data() {
            NodeData::Match { predicate, .. } => {
                self.children_in(1, self.first_slot(&[*predicate]))
            }
            _ => self.children_in(0, 0),
        }
    }

    /// The start points of a `START` clause.
    pub fn points(&self) -> Children<'a> {
        match self.data() {
            NodeData::Start { predicate } => self.children_in(0, self.first_slot(&[*predicate])),
            _ => self.children_in(0, 0),
        }
    }

    /// Projections of a `RETURN`/`WITH` clause or the `YIELD` items of a
    /// `CALL` clause.
    pub fn projections(&self) -> Children<'a> {
        match self.data() {
            NodeData::Projections { nprojections, .. } => {
                self.children_in(0, *nprojections as usize)
            }
            NodeData::Call { nargs } => {
                self.children_in(1 + *nargs as usize, self.n_children())
            }
            _ => self.children_in(0, 0),
        }
    }

    pub fn order_by(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::Projections { order_by, .. } => self.slot(*order_by),
            _ => None,
        }
    }

    pub fn skip(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::Projections { skip, .. } => self.slot(*skip),
            _ => None,
        }
    }

    pub fn limit(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::Projections { limit, .. } => self.slot(*limit),
            _ => None,
        }
    }

    /// The alias of a projection or an `UNWIND` clause.
    pub fn alias(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::Projection => self.child(1),
            NodeKind::Unwind => self.child(1),
            _ => None,
        }
    }

    /// The principal expression of a node, where it has one: a
    /// projection's or sort item's expression, an `UNWIND` list, a `CASE`
    /// subject, a postfix operator's base, a comprehension's list, the
    /// asserted expression of a constraint, or a `LOAD CSV` URL.
    pub fn expression(&self) -> Option<Node<'a>> {
        match (self.kind(), self.data()) {
            (NodeKind::Projection | NodeKind::SortItem | NodeKind::Unwind, _) => self.child(0),
            (
                NodeKind::PropertyOperator
                | NodeKind::SubscriptOperator
                | NodeKind::SliceOperator
                | NodeKind::LabelsOperator
                | NodeKind::LoadCsv,
                _,
            ) => self.child(0),
            (NodeKind::Case, NodeData::Case { expression, .. }) => self.slot(*expression),
            (
                NodeKind::ListComprehension
                | NodeKind::Filter
                | NodeKind::Extract
                | NodeKind::All
                | NodeKind::Any
                | NodeKind::Single
                | NodeKind::None,
                _,
            ) => self.child(1),
            (NodeKind::Reduce, _) => self.child(3),
            (
                NodeKind::CreateNodePropConstraint
                | NodeKind::DropNodePropConstraint
                | NodeKind::CreateRelPropConstraint
                | NodeKind::DropRelPropConstraint,
                _,
            ) => self.child(2),
            (NodeKind::SetProperty | NodeKind::SetAllProperties | NodeKind::MergeProperties, _) => {
                self.child(1)
            }
            _ => None,
        }
    }

    /// The single argument of a unary operator.
    pub fn argument(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::UnaryOperator => self.child(0),
            _ => None,
        }
    }

    /// The arguments of a comparison chain or function application, or of
    /// a `CALL` or `DELETE` clause.
    pub fn arguments(&self) -> Children<'a> {
        match (self.kind(), self.data()) {
            (NodeKind::Comparison | NodeKind::Delete, _) => {
                self.children_in(0, self.n_children())
            }
            (NodeKind::ApplyOperator, _) => self.children_in(1, self.n_children()),
            (NodeKind::Call, NodeData::Call { nargs }) => {
                self.children_in(1, 1 + *nargs as usize)
            }
            _ => self.children_in(0, 0),
        }
    }

    /// Left operand of a binary operator.
    pub fn left(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::BinaryOperator => self.child(0),
            _ => None,
        }
    }

    /// Right operand of a binary operator.
    pub fn right(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::BinaryOperator => self.child(1),
            _ => None,
        }
    }

    /// The property name of a property operator, index hint or lookup.
    pub fn prop_name(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::PropertyOperator => self.child(1),
            NodeKind::UsingIndex => self.child(2),
            NodeKind::NodeIndexLookup | NodeKind::RelIndexLookup => self.child(2),
            NodeKind::CreateNodePropIndex | NodeKind::DropNodePropIndex => self.child(1),
            _ => None,
        }
    }

    /// The function name of an application.
    pub fn function_name(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::ApplyOperator | NodeKind::ApplyAllOperator => self.child(0),
            _ => None,
        }
    }

    /// The procedure name of a `CALL` clause.
    pub fn proc_name(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::Call => self.child(0),
            _ => None,
        }
    }

    /// The label of an index command, scan hint or index hint.
    pub fn label(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::CreateNodePropIndex | NodeKind::DropNodePropIndex => self.child(0),
            NodeKind::CreateNodePropConstraint | NodeKind::DropNodePropConstraint => self.child(1),
            NodeKind::UsingIndex | NodeKind::UsingScan => self.child(1),
            _ => None,
        }
    }

    /// The relationship type of a relationship constraint.
    pub fn reltype(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::CreateRelPropConstraint | NodeKind::DropRelPropConstraint => self.child(1),
            _ => None,
        }
    }

    /// The labels of a label-bearing construct.
    pub fn labels(&self) -> Children<'a> {
        match (self.kind(), self.data()) {
            (NodeKind::SetLabels | NodeKind::RemoveLabels | NodeKind::LabelsOperator, _) => {
                self.children_in(1, self.n_children())
            }
            (
                NodeKind::NodePattern,
                NodeData::NodePattern {
                    identifier,
                    properties,
                },
            ) => {
                let from = identifier.map_or(0, |slot| slot as usize + 1);
                let to = properties.map_or(self.n_children(), |slot| slot as usize);
                self.children_in(from, to)
            }
            _ => self.children_in(0, 0),
        }
    }

    /// The relationship types of a relationship pattern.
    pub fn reltypes(&self) -> Children<'a> {
        match self.data() {
            NodeData::RelPattern {
                identifier,
                varlength,
                properties,
                ..
            } => {
                let from = identifier.map_or(0, |slot| slot as usize + 1);
                let to = self.first_slot(&[*varlength, *properties]);
                self.children_in(from, to)
            }
            _ => self.children_in(0, 0),
        }
    }

    /// The identifier bound by a construct, where it has one.
    pub fn identifier(&self) -> Option<Node<'a>> {
        match (self.kind(), self.data()) {
            (_, NodeData::NodePattern { identifier, .. }) => self.slot(*identifier),
            (_, NodeData::RelPattern { identifier, .. }) => self.slot(*identifier),
            (
                NodeKind::SetAllProperties
                | NodeKind::MergeProperties
                | NodeKind::SetLabels
                | NodeKind::RemoveLabels
                | NodeKind::NamedPath
                | NodeKind::Foreach
                | NodeKind::NodeIndexLookup
                | NodeKind::NodeIndexQuery
                | NodeKind::NodeIdLookup
                | NodeKind::AllNodesScan
                | NodeKind::RelIndexLookup
                | NodeKind::RelIndexQuery
                | NodeKind::RelIdLookup
                | NodeKind::AllRelsScan
                | NodeKind::UsingIndex
                | NodeKind::UsingScan
                | NodeKind::CreateNodePropConstraint
                | NodeKind::DropNodePropConstraint
                | NodeKind::CreateRelPropConstraint
                | NodeKind::DropRelPropConstraint
                | NodeKind::ListComprehension
                | NodeKind::Filter
                | NodeKind::Extract
                | NodeKind::All
                | NodeKind::Any
                | NodeKind::Single
                | NodeKind::None,
                _,
            ) => self.child(0),
            (NodeKind::Reduce, _) => self.child(2),
            _ => None,
        }
    }

    /// The identifiers of a `USING JOIN` hint.
    pub fn identifiers(&self) -> Children<'a> {
        match self.kind() {
            NodeKind::UsingJoin => self.children_in(0, self.n_children()),
            _ => self.children_in(0, 0),
        }
    }

    /// The properties of a node or relationship pattern (a map or a
    /// parameter).
    pub fn properties(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::NodePattern { properties, .. }
            | NodeData::RelPattern { properties, .. } => self.slot(*properties),
            _ => None,
        }
    }

    /// The var-length range of a relationship pattern.
    pub fn varlength(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::RelPattern { varlength, .. } => self.slot(*varlength),
            _ => None,
        }
    }

    /// The path of a named path, shortest path or `MERGE` clause.
    pub fn path(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::NamedPath => self.child(1),
            NodeKind::ShortestPath | NodeKind::Merge => self.child(0),
            _ => None,
        }
    }

    /// The paths of a pattern.
    pub fn paths(&self) -> Children<'a> {
        match self.kind() {
            NodeKind::Pattern => self.children_in(0, self.n_children()),
            _ => self.children_in(0, 0),
        }
    }

    /// The alternating node/relationship elements of a pattern path.
    pub fn elements(&self) -> Children<'a> {
        match self.kind() {
            NodeKind::PatternPath => self.children_in(0, self.n_children()),
            _ => self.children_in(0, 0),
        }
    }

    /// Lower bound of a slice or var-length range.
    pub fn start_bound(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::Slice { start, .. } => self.slot(*start),
            _ => None,
        }
    }

    /// Upper bound of a slice or var-length range.
    pub fn end_bound(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::Slice { end, .. } => self.slot(*end),
            _ => None,
        }
    }

    /// The subscript expression of a subscript operator.
    pub fn subscript(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::SubscriptOperator => self.child(1),
            _ => None,
        }
    }

    /// The evaluation expression of a comprehension (`| expr`) or of
    /// `reduce`.
    pub fn eval(&self) -> Option<Node<'a>> {
        match (self.kind(), self.data()) {
            (NodeKind::Reduce, _) => self.child(4),
            (_, NodeData::Comprehension { eval, .. }) => self.slot(*eval),
            _ => None,
        }
    }

    /// The accumulator identifier of `reduce`.
    pub fn accumulator(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::Reduce => self.child(0),
            _ => None,
        }
    }

    /// The accumulator's initial value in `reduce`.
    pub fn init(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::Reduce => self.child(1),
            _ => None,
        }
    }

    /// The `(predicate, value)` alternatives of a `CASE`.
    pub fn case_alternatives(&self) -> Vec<(Node<'a>, Node<'a>)> {
        match self.data() {
            NodeData::Case { expression, default } => {
                let from = expression.map_or(0, |slot| slot as usize + 1);
                let to = default.map_or(self.n_children(), |slot| slot as usize);
                let ids = &self.child_ids()[from..to];
                ids.chunks_exact(2)
                    .map(|pair| {
                        (
                            Node::new(self.arena, pair[0]),
                            Node::new(self.arena, pair[1]),
                        )
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// The `ELSE` value of a `CASE`.
    pub fn case_default(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::Case { default, .. } => self.slot(*default),
            _ => None,
        }
    }

    /// The `(prop_name, value)` entries of a map literal.
    pub fn map_entries(&self) -> Vec<(Node<'a>, Node<'a>)> {
        match self.kind() {
            NodeKind::Map => self
                .child_ids()
                .chunks_exact(2)
                .map(|pair| {
                    (
                        Node::new(self.arena, pair[0]),
                        Node::new(self.arena, pair[1]),
                    )
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The items of a `SET`/`REMOVE` clause, merge action or `ORDER BY`.
    pub fn items(&self) -> Children<'a> {
        match self.kind() {
            NodeKind::Set
            | NodeKind::Remove
            | NodeKind::OnMatch
            | NodeKind::OnCreate
            | NodeKind::OrderBy => self.children_in(0, self.n_children()),
            _ => self.children_in(0, 0),
        }
    }

    /// The merge actions of a `MERGE` clause.
    pub fn actions(&self) -> Children<'a> {
        match self.kind() {
            NodeKind::Merge => self.children_in(1, self.n_children()),
            _ => self.children_in(0, 0),
        }
    }

    /// The `SET` target of a `set property`/`remove property` item.
    pub fn property(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::SetProperty | NodeKind::RemoveProperty => self.child(0),
            _ => None,
        }
    }

    /// The periodic commit batch size, if given.
    pub fn batch_size(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::UsingPeriodicCommit => self.child(0),
            _ => None,
        }
    }

    /// The field terminator of a `LOAD CSV` clause.
    pub fn field_terminator(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::LoadCsv {
                field_terminator, ..
            } => self.slot(*field_terminator),
            _ => None,
        }
    }

    /// The index name of a `START` lookup.
    pub fn index_name(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::NodeIndexLookup
            | NodeKind::NodeIndexQuery
            | NodeKind::RelIndexLookup
            | NodeKind::RelIndexQuery => self.child(1),
            _ => None,
        }
    }

    /// The lookup value or query of a `START` index point.
    pub fn lookup(&self) -> Option<Node<'a>> {
        match self.kind() {
            NodeKind::NodeIndexLookup | NodeKind::RelIndexLookup => self.child(3),
            NodeKind::NodeIndexQuery | NodeKind::RelIndexQuery => self.child(2),
            _ => None,
        }
    }

    /// The literal ids of an id lookup.
    pub fn lookup_ids(&self) -> Children<'a> {
        match self.kind() {
            NodeKind::NodeIdLookup | NodeKind::RelIdLookup => {
                self.children_in(1, self.n_children())
            }
            _ => self.children_in(0, 0),
        }
    }

    /// The name of a client command.
    pub fn command_name(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Command => self.child(0)?.value_text(),
            _ => None,
        }
    }

    /// The arguments of a client command.
    pub fn command_args(&self) -> Children<'a> {
        match self.kind() {
            NodeKind::Command => self.children_in(1, self.n_children()),
            _ => self.children_in(0, 0),
        }
    }
}
