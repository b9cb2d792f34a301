use crate::types::{ObjectId, PropertyDefId};

///
/// Filter AST
///
/// Closed representation of a view's persisted filter tree. Payloads are
/// decoded into this union once at the boundary (`filter::decode`) and the
/// rest of the engine matches on it exhaustively. The tree is never mutated:
/// compilation is a pure walk.
///

///
/// GroupOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupOp {
    And,
    Or,
}

impl GroupOp {
    /// Parse a payload operator tag; unknown tags default to AND.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if tag.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl CompareOp {
    /// Parse a payload operator tag; callers default to EQ on `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "EQ" => Some(Self::Eq),
            "NEQ" => Some(Self::Neq),
            "GT" => Some(Self::Gt),
            "GTE" => Some(Self::Gte),
            "LT" => Some(Self::Lt),
            "LTE" => Some(Self::Lte),
            "LIKE" => Some(Self::Like),
            _ => None,
        }
    }

    #[must_use]
    pub const fn sql_symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
        }
    }
}

///
/// FilterValue
///
/// Scalar carried by a property leaf, mirroring the JSON scalar shapes a
/// persisted payload can hold.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl FilterValue {
    /// Render the scalar as free-text query input, if it carries any text.
    #[must_use]
    pub fn to_query_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => None,
        }
    }

    /// Interpret the scalar as a database integer id, if it is one.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            Self::Text(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

///
/// FilterNode
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterNode {
    /// AND/OR over an ordered sequence of children.
    Group {
        op: GroupOp,
        children: Vec<FilterNode>,
    },

    /// Typed comparison against one EAV property.
    Property {
        property: PropertyDefId,
        op: CompareOp,
        value: FilterValue,
        declared_kind: Option<String>,
    },

    /// "This object links out via `role` to `target`."
    Link { role: String, target: ObjectId },

    /// "This object is linked to by `source` via `role`."
    ReverseLink { role: String, source: ObjectId },

    /// Free-text term resolved through the full-text collaborator, not SQL.
    FullText { query: String },
}

impl FilterNode {
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::Group {
            op: GroupOp::And,
            children,
        }
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Group {
            op: GroupOp::Or,
            children,
        }
    }

    #[must_use]
    pub fn property(property: PropertyDefId, op: CompareOp, value: FilterValue) -> Self {
        Self::Property {
            property,
            op,
            value,
            declared_kind: None,
        }
    }
}
