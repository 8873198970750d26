//! Build-link normalization and tree asset staging.
//!
//! [`url_model::UrlNormalizer`] turns pasted build links into canonical ones;
//! [`stager::AssetStager`] downloads the tree document and its images into a
//! data directory and swaps them in through `Temp/` and `Backup/`.

pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod stager;
pub mod storage;
pub mod update;
pub mod url_model;

pub use error::{Error, Result};
