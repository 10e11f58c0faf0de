//! # Query String Builder
//!
//! Formats query parameter pairs into the example strings attached to query
//! parameters. Scalars and arrays use non-exploded form style, objects use the
//! deep-object style.

use crate::error::{AppResult, DoctestError};
use crate::params::style::{deep_object_parameter_string, form_parameter_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One query key and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPair {
    /// Query parameter name.
    pub key: String,
    /// Query parameter value. `null` is treated as an empty value.
    #[serde(default)]
    pub value: Value,
}

impl QueryPair {
    /// Creates a pair from anything convertible to a JSON value.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Either a single query pair or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryStringConfig {
    /// A list of pairs, rendered in order.
    Many(Vec<QueryPair>),
    /// A single pair.
    Single(QueryPair),
}

impl QueryStringConfig {
    /// The pairs in declaration order.
    pub fn pairs(&self) -> &[QueryPair] {
        match self {
            Self::Many(pairs) => pairs,
            Self::Single(pair) => std::slice::from_ref(pair),
        }
    }
}

impl From<QueryPair> for QueryStringConfig {
    fn from(pair: QueryPair) -> Self {
        Self::Single(pair)
    }
}

impl From<Vec<QueryPair>> for QueryStringConfig {
    fn from(pairs: Vec<QueryPair>) -> Self {
        Self::Many(pairs)
    }
}

/// Builds a query string such as `?limit=10&tags=a,b&filter[name]=x`.
pub fn build_query_string(config: &QueryStringConfig) -> AppResult<String> {
    if let QueryStringConfig::Many(pairs) = config {
        if pairs.is_empty() {
            return Err(DoctestError::ParameterEncoding(
                "A query string config cannot be an empty array.".into(),
            ));
        }
    }

    let parts = config
        .pairs()
        .iter()
        .map(parse_query_value_pair)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(format!("?{}", parts.join("&")))
}

fn parse_query_value_pair(pair: &QueryPair) -> AppResult<String> {
    match &pair.value {
        Value::String(_) | Value::Number(_) | Value::Null | Value::Array(_) => {
            form_parameter_string(&pair.key, &pair.value, false)
        }
        Value::Object(_) => deep_object_parameter_string(&pair.key, &pair.value),
        Value::Bool(_) => Err(DoctestError::ParameterEncoding(
            "Failed to parse a query value pair. The pair is in an invalid type.".into(),
        )),
    }
}
