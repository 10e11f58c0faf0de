//! # AIL Models
//!
//! The intermediate documentation format: a constrained subset of OpenAPI 3.0
//! in which each path item maps a verb to a list of candidate operations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Description used when the author supplied none.
pub const NO_DESCRIPTION_PROVIDED: &str = "No description provided";

/// Media type every captured payload is documented under.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Lowercased verb to candidate operations, in encounter order.
pub type AilPathItem = IndexMap<String, Vec<AilOperation>>;

/// Path string to path item.
pub type AilPaths = IndexMap<String, AilPathItem>;

/// Media type to media type object.
pub type AilContent = IndexMap<String, AilMediaType>;

/// One controller's AIL document, as persisted in `<controller>.ail.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AilDocument {
    /// AIL schema version.
    pub ail_version: String,
    /// Creation time in Unix epoch milliseconds.
    pub date_created: i64,
    /// OpenAPI document-format version.
    pub open_api_version: String,
    /// Controller name.
    pub controller: String,
    /// Path items keyed by path.
    pub paths: AilPaths,
}

/// One captured exchange's contribution to a verb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AilOperation {
    /// Responses keyed by status code.
    pub responses: IndexMap<String, AilResponse>,
    /// Controller tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Request body, for verbs that allow one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<AilRequestBody>,
    /// Header, path and query parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<AilParameter>>,
}

/// OpenAPI Response Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AilResponse {
    /// Response description.
    pub description: String,
    /// Documented response headers.
    #[serde(default)]
    pub headers: IndexMap<String, AilHeader>,
    /// Example body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<AilContent>,
}

/// OpenAPI Header Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AilHeader {
    /// Header schema.
    pub schema: AilSchema,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Author description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the header is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Whether the header is deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// OpenAPI Request Body Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AilRequestBody {
    /// Example body, keyed by media type.
    pub content: AilContent,
    /// Author description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always true for captured bodies.
    pub required: bool,
}

/// OpenAPI Media Type Object carrying a literal example.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AilMediaType {
    /// The captured payload.
    pub example: Value,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Request header.
    Header,
    /// Templated path segment.
    Path,
    /// Query string.
    Query,
}

/// OpenAPI Parameter Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AilParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Parameter schema.
    pub schema: AilSchema,
    /// Whether the parameter is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Author description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// Minimal Schema Object; every captured value is documented as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AilSchema {
    /// JSON Schema type name.
    #[serde(rename = "type")]
    pub schema_type: String,
}

impl AilSchema {
    /// `{ "type": "string" }`.
    pub fn string() -> Self {
        Self {
            schema_type: "string".to_string(),
        }
    }
}

impl Default for AilSchema {
    fn default() -> Self {
        Self::string()
    }
}

/// One controller's entry in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AilCollectionItem {
    /// When the controller's document was created.
    pub date_created: i64,
    /// The controller's path items.
    pub paths: AilPaths,
}

/// All controllers' AIL documents merged together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AilCollection {
    /// AIL schema version shared by every item.
    pub ail_version: String,
    /// OpenAPI version shared by every item.
    pub open_api_version: String,
    /// When the collection was built.
    pub date_created: i64,
    /// Items keyed by controller, sorted by name.
    pub items: IndexMap<String, AilCollectionItem>,
}
