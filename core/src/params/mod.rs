//! # Parameter Encoding
//!
//! - **style**: RFC6570 parameter-string encoders.
//! - **query**: Query string builder used for query parameter examples.

pub mod query;
pub mod style;

pub use query::{build_query_string, QueryPair, QueryStringConfig};
pub use style::{
    deep_object_parameter_string, form_parameter_string, label_parameter_string,
    matrix_parameter_string, pipe_delimited_parameter_string, simple_parameter_string,
    space_delimited_parameter_string,
};
