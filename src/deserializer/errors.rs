//! # Validation Errors
//!
//! A validation failure is a tree mirroring the schema's nesting shape:
//! leaf fields map to message lists, nested fields map to sub-trees.
//! Errors are fully accumulated before being surfaced, so a client sees
//! every field-level problem in one response.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Key for errors that do not belong to any declared field,
/// e.g. a payload that is not an object.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// One entry of an [`ErrorTree`]: leaf messages or a nested sub-tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorNode {
    /// Messages for a leaf field
    Messages(Vec<String>),
    /// Sub-tree for a nested field, never flattened into the parent
    Nested(ErrorTree),
}

impl ErrorNode {
    /// Render as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            ErrorNode::Messages(messages) => {
                Value::Array(messages.iter().cloned().map(Value::String).collect())
            }
            ErrorNode::Nested(tree) => tree.to_value(),
        }
    }
}

/// Ordered mapping from field name to [`ErrorNode`].
///
/// Entry order follows schema definition order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorTree {
    entries: Vec<(String, ErrorNode)>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with recorded errors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Record a node under a field name
    pub fn insert(&mut self, field: impl Into<String>, node: ErrorNode) {
        self.entries.push((field.into(), node));
    }

    /// Append a message to a field's leaf entry, creating it if needed
    pub fn push_message(&mut self, field: &str, message: impl Into<String>) {
        if let Some((_, ErrorNode::Messages(messages))) =
            self.entries.iter_mut().find(|(name, _)| name == field)
        {
            messages.push(message.into());
            return;
        }
        self.entries
            .push((field.to_string(), ErrorNode::Messages(vec![message.into()])));
    }

    /// Look up a field's entry
    pub fn get(&self, field: &str) -> Option<&ErrorNode> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, node)| node)
    }

    /// Look up a leaf field's messages
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        match self.get(field) {
            Some(ErrorNode::Messages(messages)) => Some(messages),
            _ => None,
        }
    }

    /// Iterate over entries in recording order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Render as a JSON object ready for a client error response
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, node) in &self.entries {
            map.insert(name.clone(), node.to_value());
        }
        Value::Object(map)
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Fail-slow validation failure carrying the complete error tree.
#[derive(Debug, Clone, Error)]
#[error("validation failed: {errors}")]
pub struct ValidationError {
    /// Accumulated field errors
    pub errors: ErrorTree,
}
