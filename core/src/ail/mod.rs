//! # AIL
//!
//! - **model**: The intermediate documentation format.
//! - **factory**: Conversion of raw records into AIL documents.

pub mod factory;
pub mod model;

pub use model::{
    AilCollection, AilCollectionItem, AilContent, AilDocument, AilHeader, AilMediaType,
    AilOperation, AilParameter, AilPathItem, AilPaths, AilRequestBody, AilResponse, AilSchema,
    ParameterLocation, JSON_MEDIA_TYPE, NO_DESCRIPTION_PROVIDED,
};
