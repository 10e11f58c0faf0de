//! # Raw Capture Data
//!
//! - **model**: The captured exchange record.
//! - **container**: Per-controller accumulation with one-shot release.

pub mod container;
pub mod model;

pub use container::{
    ContainerContents, ContainerInfo, ContainerOptions, ContainerPaths, RawDocContainer,
};
pub use model::{
    RawBody, RawDocData, RawHeader, RawHeaders, RawParameters, RawRequest, RawResponse,
    RawResults, RawStatus,
};
