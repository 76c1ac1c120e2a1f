//! Inference: derive a policy value from the current role snapshot.

use log::{debug, warn};

use crate::error::{AdapterError, AdapterResult};
use crate::mapping::MAPPING;
use crate::types::{PolicyKey, PolicyValue, RoleSnapshot};

/// Infer the current value of `key` from a role snapshot.
///
/// Walks the key's value entries in table declaration order and returns
/// the first value whose every rule holds for every role it constrains.
/// Declaration order is the tie-break when a snapshot satisfies more than
/// one value's predicate, which happens when permission sets are a
/// superset of what a single value requires.
///
/// `Ok(None)` means no value's rules are fully satisfied (undetermined);
/// this is a valid result, not an error.
///
/// # Errors
///
/// [`AdapterError::MissingRole`] if the snapshot lacks a role referenced
/// by the key's mapping entries.
pub fn policy_from_roles(
    key: PolicyKey,
    roles: &RoleSnapshot,
) -> AdapterResult<Option<PolicyValue>> {
    let entry = MAPPING.key_entry(key);

    for value_entry in &entry.values {
        let mut satisfied = true;

        for rules in &value_entry.roles {
            let role = roles
                .get(rules.role.as_str())
                .ok_or_else(|| AdapterError::MissingRole(rules.role.as_str().to_string()))?;

            let holds = rules
                .assignments
                .iter()
                .all(|a| role.has_permission(a.permission) == a.should_have);

            if !holds {
                satisfied = false;
                break;
            }
        }

        if satisfied {
            debug!("{}: inferred value '{}'", key, value_entry.value);
            return Ok(Some(value_entry.value));
        }
    }

    warn!("{}: no mapping entry matches the current role snapshot", key);
    Ok(None)
}
