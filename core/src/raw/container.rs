//! # Raw Documentation Container
//!
//! Accumulates one controller's captured exchanges until the test suite tears
//! down, then hands them over exactly once.

use crate::error::{AppResult, DoctestError};
use crate::raw::model::RawDocData;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Raw records grouped by path, in first-insertion order of the paths.
pub type ContainerPaths = Vec<(String, Vec<RawDocData>)>;

/// Describes the controller a container collects for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerInfo {
    /// Controller name, used as the AIL document key.
    pub controller: String,
    /// Optional controller description.
    pub description: Option<String>,
    /// Tags applied to every operation of the controller.
    pub tags: Option<Vec<String>>,
}

impl ContainerInfo {
    /// Info with only a controller name.
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            ..Self::default()
        }
    }
}

/// Values that influence AIL output beyond the raw records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerOptions {
    /// Controller description.
    pub description: String,
    /// Tags applied to every generated operation.
    pub tags: Option<Vec<String>>,
}

/// Everything a container held, released by [`RawDocContainer::consume`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerContents {
    /// Controller name.
    pub controller: String,
    /// Controller description, empty when none was given.
    pub description: String,
    /// Deduplicated records per path.
    pub paths: ContainerPaths,
    /// Controller tags.
    pub tags: Option<Vec<String>>,
}

impl ContainerContents {
    /// The options the factory needs alongside the paths.
    pub fn options(&self) -> ContainerOptions {
        ContainerOptions {
            description: self.description.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Holds a controller's raw API documentation data.
#[derive(Debug)]
pub struct RawDocContainer {
    info: ContainerInfo,
    // path -> (canonical record key -> record)
    data: IndexMap<String, IndexMap<String, RawDocData>>,
    consumed: bool,
}

impl RawDocContainer {
    /// Creates an empty container for a controller.
    pub fn new(info: ContainerInfo) -> Self {
        Self {
            info,
            data: IndexMap::new(),
            consumed: false,
        }
    }

    /// The controller this container collects for.
    pub fn controller(&self) -> &str {
        &self.info.controller
    }

    /// Whether [`consume`](Self::consume) has already been called.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Number of distinct records held across all paths.
    pub fn len(&self) -> usize {
        self.data.values().map(IndexMap::len).sum()
    }

    /// True when nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores one operation's raw documentation data.
    ///
    /// Saving a record equal to one already stored for the same path is a no-op.
    pub fn save(&mut self, record: RawDocData) -> AppResult<()> {
        if self.consumed {
            return Err(DoctestError::ConsumedContainer);
        }

        let key = canonical_key(&record)?;
        self.data
            .entry(record.path.clone())
            .or_default()
            .entry(key)
            .or_insert(record);
        Ok(())
    }

    /// Releases all of the controller's data.
    ///
    /// The container rejects every further call afterwards.
    pub fn consume(&mut self) -> AppResult<ContainerContents> {
        if self.consumed {
            return Err(DoctestError::AlreadyConsumed);
        }
        self.consumed = true;

        let paths = std::mem::take(&mut self.data)
            .into_iter()
            .map(|(path, records)| (path, records.into_values().collect()))
            .collect();

        Ok(ContainerContents {
            controller: self.info.controller.clone(),
            description: self.info.description.clone().unwrap_or_default(),
            paths,
            tags: self.info.tags.clone(),
        })
    }
}

/// Serializes a record with object keys sorted, so equal values share a key
/// regardless of map insertion order.
fn canonical_key(record: &RawDocData) -> AppResult<String> {
    let value = serde_json::to_value(record)?;
    Ok(sort_keys(value).to_string())
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::raw::model::{RawRequest, RawResponse};
    use serde_json::json;

    fn record(path: &str, method: &str) -> RawDocData {
        RawDocData::captured(path, RawRequest::new(method, path), RawResponse::new(200))
    }

    #[test]
    fn test_identical_records_are_deduplicated() {
        let mut container = RawDocContainer::new(ContainerInfo::new("users"));
        container.save(record("/users", "GET")).unwrap();
        container.save(record("/users", "GET")).unwrap();
        container.save(record("/users", "POST")).unwrap();
        assert_eq!(container.len(), 2);

        let contents = container.consume().unwrap();
        assert_eq!(contents.paths.len(), 1);
        assert_eq!(contents.paths[0].1.len(), 2);
    }

    #[test]
    fn test_header_order_does_not_defeat_dedup() {
        let mut a = record("/x", "GET");
        let mut b = record("/x", "GET");
        let req_a = a.results.as_mut().unwrap().req.as_mut().unwrap();
        req_a.headers = serde_json::from_value(json!({ "a": "1", "b": "2" })).unwrap();
        let req_b = b.results.as_mut().unwrap().req.as_mut().unwrap();
        req_b.headers = serde_json::from_value(json!({ "b": "2", "a": "1" })).unwrap();

        let mut container = RawDocContainer::new(ContainerInfo::new("x"));
        container.save(a).unwrap();
        container.save(b).unwrap();
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_paths_keep_first_insertion_order() {
        let mut container = RawDocContainer::new(ContainerInfo::new("c"));
        container.save(record("/z", "GET")).unwrap();
        container.save(record("/a", "GET")).unwrap();
        container.save(record("/z", "PUT")).unwrap();

        let contents = container.consume().unwrap();
        let order: Vec<&str> = contents.paths.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["/z", "/a"]);
    }

    #[test]
    fn test_lifecycle_is_one_shot() {
        let mut container = RawDocContainer::new(ContainerInfo {
            controller: "c".into(),
            description: Some("desc".into()),
            tags: Some(vec!["t".into()]),
        });
        container.save(record("/a", "GET")).unwrap();

        let contents = container.consume().unwrap();
        assert_eq!(contents.description, "desc");
        assert_eq!(contents.options().tags, Some(vec!["t".to_string()]));
        assert!(container.is_consumed());

        let save_err = container.save(record("/a", "GET")).unwrap_err();
        assert!(matches!(save_err, DoctestError::ConsumedContainer));
        assert_eq!(save_err.kind(), ErrorKind::LifecycleViolation);

        let consume_err = container.consume().unwrap_err();
        assert!(matches!(consume_err, DoctestError::AlreadyConsumed));
    }

    #[test]
    fn test_missing_description_becomes_empty() {
        let mut container = RawDocContainer::new(ContainerInfo::new("c"));
        assert!(container.is_empty());
        let contents = container.consume().unwrap();
        assert_eq!(contents.description, "");
        assert!(contents.paths.is_empty());
    }
}
