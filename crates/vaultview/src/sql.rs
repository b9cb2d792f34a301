use crate::types::PropertyDefId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

///
/// Parameterized SQL building blocks
///
/// Every statement the engine hands to the database port is SQL text plus a
/// map of named bound parameters. User-controlled values are never formatted
/// into the SQL text itself; they always travel as parameters.
///

///
/// Param
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Param {
    Text(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDateTime),
    Bool(bool),

    /// Binds SQL NULL. A comparison against NULL is vacuously false, which is
    /// how unparseable leaf values are excluded without raising.
    Null,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Date(ts) => write!(f, "{ts}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
        }
    }
}

///
/// Statement
///
/// One executable query: SQL text plus its named parameters. `Display`
/// renders a compact single-line summary for debug logs.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: BTreeMap<String, Param>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>, params: BTreeMap<String, Param>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)?;
        if self.params.is_empty() {
            return Ok(());
        }

        write!(f, " [")?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "]")
    }
}

///
/// ParamAllocator
///
/// Hands out globally unique parameter names within one statement scope.
/// Different statement builders use different prefixes so fragments produced
/// by independent allocators can be merged without collisions.
///

#[derive(Debug)]
pub struct ParamAllocator {
    prefix: &'static str,
    next: u32,
    params: BTreeMap<String, Param>,
}

impl Default for ParamAllocator {
    fn default() -> Self {
        Self::with_prefix("p")
    }
}

impl ParamAllocator {
    #[must_use]
    pub const fn with_prefix(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: 0,
            params: BTreeMap::new(),
        }
    }

    /// Bind a value under a fresh name and return that name.
    pub fn bind(&mut self, value: Param) -> String {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        self.params.insert(name.clone(), value);

        name
    }

    #[must_use]
    pub fn into_params(self) -> BTreeMap<String, Param> {
        self.params
    }
}

///
/// PropertyJoins
///
/// Allocates the property-value join alias for each distinct property
/// definition id. The alias is derived from the id, so repeated leaves on the
/// same property share one join — AND-combinations over the same property
/// never double the join cardinality.
///

#[derive(Debug, Default)]
pub struct PropertyJoins {
    ids: BTreeSet<PropertyDefId>,
}

impl PropertyJoins {
    /// Record that `property` needs a join and return its alias.
    pub fn alias(&mut self, property: PropertyDefId) -> String {
        self.ids.insert(property);

        Self::alias_for(property)
    }

    /// The canonical join alias for a property definition id.
    #[must_use]
    pub fn alias_for(property: PropertyDefId) -> String {
        format!("pv{property}")
    }

    #[must_use]
    pub fn into_ids(self) -> BTreeSet<PropertyDefId> {
        self.ids
    }
}
