//! JSON interop with the tutorial renderer.
//!
//! Classified commits are embedded as attribute values on markup nodes
//! consumed by the front-end, so the serialized shape (the `kind` tags and
//! camelCase field names) is part of the public contract.

use crate::diff::RichCommit;
use crate::error::{InternalError, Result};
use crate::program::EventDescriptor;

/// Render a commit as a JSON value.
pub fn commit_to_json(commit: &RichCommit) -> Result<serde_json::Value> {
    serde_json::to_value(commit).map_err(|err| InternalError::from(err).into())
}

/// Render a commit as the compact JSON string embedded as a markup
/// attribute value.
pub fn commit_to_attribute_value(commit: &RichCommit) -> Result<String> {
    serde_json::to_string(commit).map_err(|err| InternalError::from(err).into())
}

/// Render an event descriptor as a JSON value.
pub fn event_to_json(event: &EventDescriptor) -> Result<serde_json::Value> {
    serde_json::to_value(event).map_err(|err| InternalError::from(err).into())
}
