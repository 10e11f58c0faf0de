//! # AIL Factory
//!
//! Pure conversion of a controller's raw records into an [`AilDocument`].
//!
//! 1. **Validation**: every record must carry the request/response fields the
//!    conversion relies on.
//! 2. **Conversion**: records are grouped by lowercased method; each record
//!    becomes one candidate operation. Candidates are never merged here.
//! 3. **Ordering**: paths are sorted so output is deterministic.

use crate::ail::model::{
    AilContent, AilDocument, AilHeader, AilMediaType, AilOperation, AilParameter, AilPathItem,
    AilRequestBody, AilResponse, AilSchema, ParameterLocation, JSON_MEDIA_TYPE,
    NO_DESCRIPTION_PROVIDED,
};
use crate::config::{DEFAULT_AIL_VERSION, DEFAULT_OPEN_API_VERSION};
use crate::error::{missing_required_field, AppResult, DoctestError};
use crate::http::method_permits_request_body;
use crate::params::style::is_empty_value;
use crate::params::{build_query_string, simple_parameter_string, QueryStringConfig};
use crate::raw::{ContainerOptions, RawDocData, RawHeader, RawHeaders};
use indexmap::IndexMap;
use serde_json::Value;

/// Headers never documented, whatever their case.
pub const FILTERED_HEADERS: [&str; 4] = ["x-powered-by", "etag", "connection", "user-agent"];

/// Converts a controller's raw path data into an AIL document.
///
/// Fails on the first record that does not pass [`validate_raw_data`]; nothing
/// is produced for the controller in that case.
pub fn create(
    controller: &str,
    raw_paths: &[(String, Vec<RawDocData>)],
    options: &ContainerOptions,
) -> AppResult<AilDocument> {
    let mut paths = raw_paths
        .iter()
        .map(|(path, records)| {
            validate_raw_data(path, records)?;
            raw_path_to_ail(path, records, options)
        })
        .collect::<AppResult<Vec<_>>>()?;

    paths.sort_by(|(a, _), (b, _)| a.cmp(b));

    tracing::debug!(controller, paths = paths.len(), "Created AIL document");

    Ok(AilDocument {
        ail_version: DEFAULT_AIL_VERSION.to_string(),
        date_created: chrono::Utc::now().timestamp_millis(),
        open_api_version: DEFAULT_OPEN_API_VERSION.to_string(),
        controller: controller.to_string(),
        paths: paths.into_iter().collect(),
    })
}

/// Ensures every record of a path has the fields conversion relies on.
///
/// Empty strings and a zero status count as missing.
pub fn validate_raw_data(path: &str, records: &[RawDocData]) -> AppResult<()> {
    if records.is_empty() {
        return Err(DoctestError::AilFactory(format!(
            "The API path: {path} contains no raw data"
        )));
    }

    let missing = |field: &str, subject: &str| {
        DoctestError::AilFactory(missing_required_field(
            field,
            Some(&format!("The API path: {path}{subject}")),
        ))
    };

    for record in records {
        let results = record.results.as_ref().ok_or_else(|| missing("results", ""))?;

        let req = results
            .req
            .as_ref()
            .ok_or_else(|| missing("req", " result object"))?;
        if req.method.as_deref().map_or(true, str::is_empty) {
            return Err(missing("method", " result req object"));
        }
        if req.url.as_deref().map_or(true, str::is_empty) {
            return Err(missing("url", " result req object"));
        }
        if req.headers.is_none() {
            return Err(missing("headers", " result req object"));
        }

        let res = results
            .res
            .as_ref()
            .ok_or_else(|| missing("res", " result object"))?;
        if res.headers.is_none() {
            return Err(missing("headers", " result res object"));
        }
        if res.status.map_or(true, |status| status == 0) {
            return Err(missing("status", " result res object"));
        }
    }

    Ok(())
}

/// Converts one path's records into a path item. Records must be validated.
pub fn raw_path_to_ail(
    path: &str,
    records: &[RawDocData],
    options: &ContainerOptions,
) -> AppResult<(String, AilPathItem)> {
    let mut item = AilPathItem::new();

    for record in records {
        let (req, res) = exchange(path, record)?;
        let verb = req.method.as_deref().unwrap_or_default().to_lowercase();
        let status = res.status.unwrap_or_default();

        let mut responses = IndexMap::new();
        responses.insert(status.to_string(), response_from_raw_data(record)?);

        let operation = AilOperation {
            responses,
            tags: options.tags.clone(),
            request_body: method_permits_request_body(&verb)
                .then(|| request_body_from_raw_data(record)),
            parameters: record
                .parameters
                .as_ref()
                .map(|_| parameters_from_raw_data(record))
                .transpose()?,
        };

        item.entry(verb).or_default().push(operation);
    }

    Ok((path.to_string(), item))
}

/// Builds header, path and query parameters, in that order.
pub fn parameters_from_raw_data(record: &RawDocData) -> AppResult<Vec<AilParameter>> {
    let empty = RawHeaders::new();
    let captured = record
        .results
        .as_ref()
        .and_then(|r| r.req.as_ref())
        .and_then(|req| req.headers.as_ref())
        .unwrap_or(&empty);

    let mut parameters = parse_raw_headers(captured, record.request_headers.as_ref())?;

    let Some(descriptor) = record.parameters.as_ref() else {
        return Ok(parameters);
    };

    for name in descriptor.path_parameters.iter().flatten() {
        parameters.push(AilParameter {
            name: name.clone(),
            location: ParameterLocation::Path,
            schema: AilSchema::string(),
            required: Some(true),
            example: None,
            description: None,
            deprecated: None,
        });
    }

    if let Some(query) = descriptor.query_parameters.as_ref() {
        for pair in query.pairs() {
            let example = build_query_string(&QueryStringConfig::Single(pair.clone()))?;
            parameters.push(AilParameter {
                name: pair.key.clone(),
                location: ParameterLocation::Query,
                schema: AilSchema::string(),
                required: None,
                example: Some(Value::String(example)),
                description: None,
                deprecated: None,
            });
        }
    }

    Ok(parameters)
}

/// Builds the request body. Captured bodies are always documented as required.
pub fn request_body_from_raw_data(record: &RawDocData) -> AilRequestBody {
    let data = record
        .results
        .as_ref()
        .and_then(|r| r.req.as_ref())
        .and_then(|req| req.data.as_ref());

    AilRequestBody {
        content: json_content(data),
        description: record
            .request_body
            .as_ref()
            .and_then(|body| body.description.clone()),
        required: true,
    }
}

/// Builds the response object for the captured status.
pub fn response_from_raw_data(record: &RawDocData) -> AppResult<AilResponse> {
    let description = record
        .response_body
        .as_ref()
        .and_then(|body| body.description.clone())
        .unwrap_or_else(|| NO_DESCRIPTION_PROVIDED.to_string());

    let res = record.results.as_ref().and_then(|r| r.res.as_ref());
    let empty = RawHeaders::new();
    let captured = res.and_then(|res| res.headers.as_ref()).unwrap_or(&empty);

    let headers = parse_raw_headers(captured, record.response_headers.as_ref())?
        .into_iter()
        .map(|param| {
            (
                param.name,
                AilHeader {
                    schema: param.schema,
                    example: param.example,
                    description: param.description,
                    required: param.required,
                    deprecated: param.deprecated,
                },
            )
        })
        .collect();

    let body = res
        .and_then(|res| res.body.as_ref())
        .filter(|b| !is_empty_value(b));

    Ok(AilResponse {
        description,
        headers,
        content: body.map(|b| json_content(Some(b))),
    })
}

/// Converts captured headers into header parameters, dropping [`FILTERED_HEADERS`]
/// and merging any author overlay.
pub fn parse_raw_headers(
    headers: &RawHeaders,
    details: Option<&IndexMap<String, RawHeader>>,
) -> AppResult<Vec<AilParameter>> {
    headers
        .iter()
        .filter(|(name, _)| !is_filtered_header(name))
        .map(|(name, value)| {
            let example = simple_parameter_string(value, false)?;
            let overlay = details.and_then(|d| d.get(name));
            Ok(AilParameter {
                name: name.clone(),
                location: ParameterLocation::Header,
                schema: AilSchema::string(),
                required: overlay.and_then(|o| o.required),
                example: Some(Value::String(example)),
                description: overlay.and_then(|o| o.description.clone()),
                deprecated: overlay.and_then(|o| o.deprecated),
            })
        })
        .collect()
}

/// True for headers on the deny-list, compared case-insensitively.
pub fn is_filtered_header(name: &str) -> bool {
    FILTERED_HEADERS
        .iter()
        .any(|filtered| filtered.eq_ignore_ascii_case(name))
}

/// `{"application/json": {"example": <data>}}`, or no entries without data.
fn json_content(example: Option<&Value>) -> AilContent {
    let mut content = AilContent::new();
    if let Some(example) = example {
        content.insert(
            JSON_MEDIA_TYPE.to_string(),
            AilMediaType {
                example: example.clone(),
            },
        );
    }
    content
}

fn exchange<'a>(
    path: &str,
    record: &'a RawDocData,
) -> AppResult<(&'a crate::raw::RawRequest, &'a crate::raw::RawResponse)> {
    let results = record.results.as_ref();
    match (
        results.and_then(|r| r.req.as_ref()),
        results.and_then(|r| r.res.as_ref()),
    ) {
        (Some(req), Some(res)) => Ok((req, res)),
        _ => Err(DoctestError::AilFactory(missing_required_field(
            "results",
            Some(&format!("The API path: {path}")),
        ))),
    }
}
