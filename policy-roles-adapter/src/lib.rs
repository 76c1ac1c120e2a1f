//! This crate provides the policy-to-role permission adapter for the
//! admin console:
//! - Materialization: translate administrative policy settings into
//!   permission grants and revocations on named roles
//!   ([`roles_from_policies`]).
//! - Inference: derive which policy value a role snapshot currently
//!   corresponds to ([`policy_from_roles`]).
//!
//! Both directions are driven by a single static mapping table. The
//! adapter consumes a snapshot of roles and produces an updated snapshot;
//! fetching and persisting roles and settings belongs to the callers.

mod error;
mod infer;
mod mapping;
mod materialize;
mod types;

// Re-exports for a small, focused public API
pub use error::{AdapterError, AdapterResult};
pub use infer::policy_from_roles;
pub use mapping::legal_values;
pub use materialize::roles_from_policies;
pub use types::{
    permissions, PolicyKey, PolicySettings, PolicyValue, Role, RoleName, RoleSnapshot,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_then_infer_smoke() {
        let roles: RoleSnapshot = ["channel_user", "channel_admin", "team_user", "team_admin", "system_admin"]
            .into_iter()
            .map(|name| (name.to_string(), Role::new(name)))
            .collect();

        let settings: PolicySettings = PolicyKey::ALL
            .into_iter()
            .map(|key| {
                let value = if key == PolicyKey::AllowEditPost {
                    PolicyValue::Never
                } else {
                    PolicyValue::TeamAdmin
                };
                (key, value)
            })
            .collect();

        let updated = roles_from_policies(&settings, &roles).expect("should materialize");
        let inferred =
            policy_from_roles(PolicyKey::RestrictPublicChannelDeletion, &updated)
                .expect("should infer");
        assert_eq!(inferred, Some(PolicyValue::TeamAdmin));
    }
}
