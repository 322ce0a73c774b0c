//! Query builder for list operations
//!
//! Queries travel as repeated `queries[]` parameters, each carrying a JSON
//! object of the form `{"method": ..., "attribute": ..., "values": [...]}`.

use serde_json::{json, Value};

/// A single list-query clause
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal { attribute: String, value: Value },
    GreaterThanEqual { attribute: String, value: Value },
    LessThan { attribute: String, value: Value },
    OrderAsc { attribute: String },
    OrderDesc { attribute: String },
    Limit(u64),
    Offset(u64),
}

impl Query {
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
        Query::Equal {
            attribute: attribute.to_string(),
            value: value.into(),
        }
    }

    pub fn greater_than_equal(attribute: &str, value: impl Into<Value>) -> Self {
        Query::GreaterThanEqual {
            attribute: attribute.to_string(),
            value: value.into(),
        }
    }

    pub fn less_than(attribute: &str, value: impl Into<Value>) -> Self {
        Query::LessThan {
            attribute: attribute.to_string(),
            value: value.into(),
        }
    }

    pub fn order_asc(attribute: &str) -> Self {
        Query::OrderAsc {
            attribute: attribute.to_string(),
        }
    }

    pub fn order_desc(attribute: &str) -> Self {
        Query::OrderDesc {
            attribute: attribute.to_string(),
        }
    }

    pub fn limit(limit: u64) -> Self {
        Query::Limit(limit)
    }

    pub fn offset(offset: u64) -> Self {
        Query::Offset(offset)
    }

    fn method(&self) -> &'static str {
        match self {
            Query::Equal { .. } => "equal",
            Query::GreaterThanEqual { .. } => "greaterThanEqual",
            Query::LessThan { .. } => "lessThan",
            Query::OrderAsc { .. } => "orderAsc",
            Query::OrderDesc { .. } => "orderDesc",
            Query::Limit(_) => "limit",
            Query::Offset(_) => "offset",
        }
    }

    /// Serialize the clause to its wire form
    pub fn to_json(&self) -> String {
        let body = match self {
            Query::Equal { attribute, value }
            | Query::GreaterThanEqual { attribute, value }
            | Query::LessThan { attribute, value } => json!({
                "method": self.method(),
                "attribute": attribute,
                "values": [value],
            }),
            Query::OrderAsc { attribute } | Query::OrderDesc { attribute } => json!({
                "method": self.method(),
                "attribute": attribute,
            }),
            Query::Limit(n) | Query::Offset(n) => json!({
                "method": self.method(),
                "values": [n],
            }),
        };
        body.to_string()
    }
}
