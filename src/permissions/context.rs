//! Access context evaluated by permission predicates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Operation identity targeted by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Read-only access to the target
    #[default]
    Read,
    /// Mutating access to the target
    Write,
}

impl Operation {
    /// Returns true for read-only operations
    pub fn is_read(&self) -> bool {
        matches!(self, Operation::Read)
    }
}

/// Context carried with each request, bundling the requester identity
/// and the target operation. Built by the host per request; predicates
/// never mutate it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessContext {
    /// The authenticated requester's ID (None if anonymous)
    pub user_id: Option<Uuid>,

    /// Whether the request is authenticated
    pub is_authenticated: bool,

    /// Whether the requester has staff privileges
    pub is_staff: bool,

    /// Whether the requester has admin privileges
    pub is_admin: bool,

    /// Operation targeted by the request
    pub operation: Operation,

    /// Custom claims for advanced predicates
    #[serde(default)]
    pub claims: HashMap<String, Value>,
}

impl AccessContext {
    /// Create context for anonymous access
    pub fn anonymous(operation: Operation) -> Self {
        Self {
            operation,
            ..Self::default()
        }
    }

    /// Create context for an authenticated requester
    pub fn authenticated(user_id: Uuid, operation: Operation) -> Self {
        Self {
            user_id: Some(user_id),
            is_authenticated: true,
            operation,
            ..Self::default()
        }
    }

    /// Create context for a staff requester
    pub fn staff(user_id: Uuid, operation: Operation) -> Self {
        Self {
            is_staff: true,
            ..Self::authenticated(user_id, operation)
        }
    }

    /// Create context for an admin requester
    pub fn admin(user_id: Uuid, operation: Operation) -> Self {
        Self {
            is_admin: true,
            ..Self::authenticated(user_id, operation)
        }
    }

    /// Attach a custom claim
    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }
}
