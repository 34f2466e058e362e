//! Shared utilities for the buildrelay pipeline
//!
//! This crate provides common functionality used across the pipeline:
//! - AWS client settings and SDK config construction
//! - Error types and handling
//! - Strict percent-decoding for paths and object keys
//! - The invocation response envelope shared by all Lambda entry points

pub mod config;
pub mod encoding;
pub mod error;
pub mod response;
pub mod time;

pub use config::{load_sdk_config, AwsSettings};
pub use encoding::{decode_object_key, percent_decode, DecodeError};
pub use error::{Error, Result};
pub use response::InvocationResponse;
pub use time::iso_timestamp;
