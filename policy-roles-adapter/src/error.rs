//! Error types for the policy/role adapter.

use thiserror::Error;

use crate::types::{PolicyKey, PolicyValue};

/// Errors that can occur while translating between policies and roles.
///
/// An unknown policy key cannot occur: [`PolicyKey`] is a closed enum and
/// the mapping table defines an entry for every variant. An undetermined
/// inference is not an error either; it is the `Ok(None)` result of
/// [`crate::policy_from_roles`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The settings are missing a value for a policy key the mapping
    /// table defines.
    #[error("no value configured for policy '{0}'")]
    MissingPolicySetting(PolicyKey),

    /// The settings supply a value that is not legal for that policy key.
    #[error("value '{value}' is not defined for policy '{key}'")]
    UnknownPolicyValue { key: PolicyKey, value: PolicyValue },

    /// The role snapshot lacks a role referenced by an applicable rule.
    #[error("role '{0}' is missing from the snapshot")]
    MissingRole(String),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
