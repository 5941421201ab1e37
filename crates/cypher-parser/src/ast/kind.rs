/// The primary type tag of an AST node.
///
/// Every node has exactly one kind; kinds additionally belong to zero or
/// more abstract [`Category`]s (a `Merge` node is a query clause, a
/// `ShortestPath` is both a pattern path and an expression). Category
/// membership is a constant bitmask test, see [`NodeKind::instance_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Statement,
    CypherOption,
    CypherOptionParam,
    ExplainOption,
    ProfileOption,
    CreateNodePropIndex,
    DropNodePropIndex,
    CreateNodePropConstraint,
    DropNodePropConstraint,
    CreateRelPropConstraint,
    DropRelPropConstraint,
    Query,
    UsingPeriodicCommit,
    LoadCsv,
    Start,
    NodeIndexLookup,
    NodeIndexQuery,
    NodeIdLookup,
    AllNodesScan,
    RelIndexLookup,
    RelIndexQuery,
    RelIdLookup,
    AllRelsScan,
    Match,
    UsingIndex,
    UsingJoin,
    UsingScan,
    Merge,
    OnMatch,
    OnCreate,
    Create,
    Set,
    SetProperty,
    SetAllProperties,
    MergeProperties,
    SetLabels,
    Delete,
    Remove,
    RemoveLabels,
    RemoveProperty,
    Foreach,
    With,
    Unwind,
    Call,
    Return,
    Projection,
    OrderBy,
    SortItem,
    Union,
    UnaryOperator,
    BinaryOperator,
    Comparison,
    ApplyOperator,
    ApplyAllOperator,
    PropertyOperator,
    SubscriptOperator,
    SliceOperator,
    LabelsOperator,
    ListComprehension,
    Case,
    Filter,
    Extract,
    Reduce,
    All,
    Any,
    Single,
    None,
    Collection,
    Map,
    Identifier,
    Parameter,
    String,
    Integer,
    Float,
    True,
    False,
    Null,
    Label,
    RelType,
    PropName,
    FunctionName,
    IndexName,
    ProcName,
    Pattern,
    NamedPath,
    ShortestPath,
    PatternPath,
    NodePattern,
    RelPattern,
    Range,
    Command,
    LineComment,
    BlockComment,
    Error,
}

/// An abstract role an AST node may fulfill. One node may be in many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    StatementOption,
    SchemaCommand,
    QueryOption,
    QueryClause,
    StartPoint,
    MatchHint,
    MergeAction,
    SetItem,
    RemoveItem,
    Expression,
    ListComprehension,
    PatternPath,
    Comment,
    Boolean,
}

impl Category {
    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

const STATEMENT_OPTION: u32 = Category::StatementOption.bit();
const SCHEMA_COMMAND: u32 = Category::SchemaCommand.bit();
const QUERY_OPTION: u32 = Category::QueryOption.bit();
const QUERY_CLAUSE: u32 = Category::QueryClause.bit();
const START_POINT: u32 = Category::StartPoint.bit();
const MATCH_HINT: u32 = Category::MatchHint.bit();
const MERGE_ACTION: u32 = Category::MergeAction.bit();
const SET_ITEM: u32 = Category::SetItem.bit();
const REMOVE_ITEM: u32 = Category::RemoveItem.bit();
const EXPRESSION: u32 = Category::Expression.bit();
const LIST_COMPREHENSION: u32 = Category::ListComprehension.bit();
const PATTERN_PATH: u32 = Category::PatternPath.bit();
const COMMENT: u32 = Category::Comment.bit();
const BOOLEAN: u32 = Category::Boolean.bit();

impl NodeKind {
    /// The category mask declared for this kind.
    pub(crate) const fn categories(self) -> u32 {
        match self {
            NodeKind::CypherOption | NodeKind::ExplainOption | NodeKind::ProfileOption => {
                STATEMENT_OPTION
            }
            NodeKind::CreateNodePropIndex
            | NodeKind::DropNodePropIndex
            | NodeKind::CreateNodePropConstraint
            | NodeKind::DropNodePropConstraint
            | NodeKind::CreateRelPropConstraint
            | NodeKind::DropRelPropConstraint => SCHEMA_COMMAND,
            NodeKind::UsingPeriodicCommit => QUERY_OPTION,
            NodeKind::LoadCsv
            | NodeKind::Start
            | NodeKind::Match
            | NodeKind::Merge
            | NodeKind::Create
            | NodeKind::Set
            | NodeKind::Delete
            | NodeKind::Remove
            | NodeKind::Foreach
            | NodeKind::With
            | NodeKind::Unwind
            | NodeKind::Call
            | NodeKind::Return
            | NodeKind::Union => QUERY_CLAUSE,
            NodeKind::NodeIndexLookup
            | NodeKind::NodeIndexQuery
            | NodeKind::NodeIdLookup
            | NodeKind::AllNodesScan
            | NodeKind::RelIndexLookup
            | NodeKind::RelIndexQuery
            | NodeKind::RelIdLookup
            | NodeKind::AllRelsScan => START_POINT,
            NodeKind::UsingIndex | NodeKind::UsingJoin | NodeKind::UsingScan => MATCH_HINT,
            NodeKind::OnMatch | NodeKind::OnCreate => MERGE_ACTION,
            NodeKind::SetProperty
            | NodeKind::SetAllProperties
            | NodeKind::MergeProperties
            | NodeKind::SetLabels => SET_ITEM,
            NodeKind::RemoveLabels | NodeKind::RemoveProperty => REMOVE_ITEM,
            NodeKind::UnaryOperator
            | NodeKind::BinaryOperator
            | NodeKind::Comparison
            | NodeKind::ApplyOperator
            | NodeKind::ApplyAllOperator
            | NodeKind::PropertyOperator
            | NodeKind::SubscriptOperator
            | NodeKind::SliceOperator
            | NodeKind::LabelsOperator
            | NodeKind::Case
            | NodeKind::Reduce
            | NodeKind::Collection
            | NodeKind::Map
            | NodeKind::Identifier
            | NodeKind::Parameter
            | NodeKind::String
            | NodeKind::Integer
            | NodeKind::Float
            | NodeKind::Null => EXPRESSION,
            NodeKind::True | NodeKind::False => EXPRESSION | BOOLEAN,
            NodeKind::ListComprehension
            | NodeKind::Filter
            | NodeKind::Extract
            | NodeKind::All
            | NodeKind::Any
            | NodeKind::Single
            | NodeKind::None => EXPRESSION | LIST_COMPREHENSION,
            NodeKind::NamedPath | NodeKind::PatternPath => PATTERN_PATH,
            NodeKind::ShortestPath => PATTERN_PATH | EXPRESSION,
            NodeKind::LineComment | NodeKind::BlockComment => COMMENT,
            // An error node stands in for whatever the grammar failed to
            // produce, so it satisfies every role.
            NodeKind::Error => u32::MAX,
            NodeKind::Statement
            | NodeKind::CypherOptionParam
            | NodeKind::Query
            | NodeKind::Projection
            | NodeKind::OrderBy
            | NodeKind::SortItem
            | NodeKind::Label
            | NodeKind::RelType
            | NodeKind::PropName
            | NodeKind::FunctionName
            | NodeKind::IndexName
            | NodeKind::ProcName
            | NodeKind::Pattern
            | NodeKind::NodePattern
            | NodeKind::RelPattern
            | NodeKind::Range
            | NodeKind::Command => 0,
        }
    }

    /// Constant-time category membership test.
    pub fn instance_of(self, category: Category) -> bool {
        self.categories() & category.bit() != 0
    }

    /// The display name used in AST tables.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Statement => "statement",
            NodeKind::CypherOption => "CYPHER",
            NodeKind::CypherOptionParam => "cypher parameter",
            NodeKind::ExplainOption => "EXPLAIN",
            NodeKind::ProfileOption => "PROFILE",
            NodeKind::CreateNodePropIndex => "CREATE INDEX",
            NodeKind::DropNodePropIndex => "DROP INDEX",
            NodeKind::CreateNodePropConstraint => "CREATE CONSTRAINT",
            NodeKind::DropNodePropConstraint => "DROP CONSTRAINT",
            NodeKind::CreateRelPropConstraint => "CREATE CONSTRAINT",
            NodeKind::DropRelPropConstraint => "DROP CONSTRAINT",
            NodeKind::Query => "query",
            NodeKind::UsingPeriodicCommit => "USING PERIODIC COMMIT",
            NodeKind::LoadCsv => "LOAD CSV",
            NodeKind::Start => "START",
            NodeKind::NodeIndexLookup => "node index lookup",
            NodeKind::NodeIndexQuery => "node index query",
            NodeKind::NodeIdLookup => "node id lookup",
            NodeKind::AllNodesScan => "all nodes scan",
            NodeKind::RelIndexLookup => "rel index lookup",
            NodeKind::RelIndexQuery => "rel index query",
            NodeKind::RelIdLookup => "rel id lookup",
            NodeKind::AllRelsScan => "all rels scan",
            NodeKind::Match => "MATCH",
            NodeKind::UsingIndex => "USING INDEX",
            NodeKind::UsingJoin => "USING JOIN",
            NodeKind::UsingScan => "USING SCAN",
            NodeKind::Merge => "MERGE",
            NodeKind::OnMatch => "ON MATCH",
            NodeKind::OnCreate => "ON CREATE",
            NodeKind::Create => "CREATE",
            NodeKind::Set => "SET",
            NodeKind::SetProperty => "set property",
            NodeKind::SetAllProperties => "set all properties",
            NodeKind::MergeProperties => "merge properties",
            NodeKind::SetLabels => "set labels",
            NodeKind::Delete => "DELETE",
            NodeKind::Remove => "REMOVE",
            NodeKind::RemoveLabels => "remove labels",
            NodeKind::RemoveProperty => "remove property",
            NodeKind::Foreach => "FOREACH",
            NodeKind::With => "WITH",
            NodeKind::Unwind => "UNWIND",
            NodeKind::Call => "CALL",
            NodeKind::Return => "RETURN",
            NodeKind::Projection => "projection",
            NodeKind::OrderBy => "ORDER BY",
            NodeKind::SortItem => "sort item",
            NodeKind::Union => "UNION",
            NodeKind::UnaryOperator => "unary operator",
            NodeKind::BinaryOperator => "binary operator",
            NodeKind::Comparison => "comparison",
            NodeKind::ApplyOperator => "apply",
            NodeKind::ApplyAllOperator => "apply all",
            NodeKind::PropertyOperator => "property",
            NodeKind::SubscriptOperator => "subscript",
            NodeKind::SliceOperator => "slice",
            NodeKind::LabelsOperator => "has labels",
            NodeKind::ListComprehension => "list comprehension",
            NodeKind::Case => "case",
            NodeKind::Filter => "filter",
            NodeKind::Extract => "extract",
            NodeKind::Reduce => "reduce",
            NodeKind::All => "all",
            NodeKind::Any => "any",
            NodeKind::Single => "single",
            NodeKind::None => "none",
            NodeKind::Collection => "collection",
            NodeKind::Map => "map",
            NodeKind::Identifier => "identifier",
            NodeKind::Parameter => "parameter",
            NodeKind::String => "string",
            NodeKind::Integer => "integer",
            NodeKind::Float => "float",
            NodeKind::True => "TRUE",
            NodeKind::False => "FALSE",
            NodeKind::Null => "NULL",
            NodeKind::Label => "label",
            NodeKind::RelType => "rel type",
            NodeKind::PropName => "prop name",
            NodeKind::FunctionName => "function name",
            NodeKind::IndexName => "index name",
            NodeKind::ProcName => "proc name",
            NodeKind::Pattern => "pattern",
            NodeKind::NamedPath => "named path",
            NodeKind::ShortestPath => "shortest path",
            NodeKind::PatternPath => "pattern path",
            NodeKind::NodePattern => "node pattern",
            NodeKind::RelPattern => "rel pattern",
            NodeKind::Range => "range",
            NodeKind::Command => "command",
            NodeKind::LineComment => "line comment",
            NodeKind::BlockComment => "block comment",
            NodeKind::Error => "error",
        }
    }
}

/// The closed operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Or,
    Xor,
    And,
    Not,
    Equal,
    NotEqual,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Pow,
    UnaryPlus,
    UnaryMinus,
    Subscript,
    Regex,
    In,
    StartsWith,
    EndsWith,
    Contains,
    IsNull,
    IsNotNull,
    Property,
    Label,
}

impl Operator {
    /// The operator's surface syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::And => "AND",
            Operator::Not => "NOT",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Mult => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "^",
            Operator::UnaryPlus => "+",
            Operator::UnaryMinus => "-",
            Operator::Subscript => "[]",
            Operator::Regex => "=~",
            Operator::In => "IN",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
            Operator::Contains => "CONTAINS",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Property => ".",
            Operator::Label => ":",
        }
    }
}

/// The direction of a relationship pattern, determined by its arrowheads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `<-[..]-`
    Inbound,
    /// `-[..]->`
    Outbound,
    /// `-[..]-` or `<-[..]->`
    Bidirectional,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clause_membership() {
        assert!(NodeKind::Match.instance_of(Category::QueryClause));
        assert!(NodeKind::Merge.instance_of(Category::QueryClause));
        assert!(!NodeKind::Match.instance_of(Category::Expression));
        assert!(!NodeKind::Statement.instance_of(Category::QueryClause));
    }

    #[test]
    fn multi_category_kinds() {
        assert!(NodeKind::ShortestPath.instance_of(Category::PatternPath));
        assert!(NodeKind::ShortestPath.instance_of(Category::Expression));
        assert!(NodeKind::Filter.instance_of(Category::ListComprehension));
        assert!(NodeKind::Filter.instance_of(Category::Expression));
        assert!(NodeKind::True.instance_of(Category::Boolean));
        assert!(NodeKind::True.instance_of(Category::Expression));
        assert!(!NodeKind::Null.instance_of(Category::Boolean));
    }

    #[test]
    fn error_satisfies_any_role() {
        assert!(NodeKind::Error.instance_of(Category::Expression));
        assert!(NodeKind::Error.instance_of(Category::QueryClause));
    }
}
