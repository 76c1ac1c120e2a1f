//! Materialization: translate policy settings into permission grants.

use log::debug;

use crate::error::{AdapterError, AdapterResult};
use crate::mapping::MAPPING;
use crate::types::{PolicySettings, RoleSnapshot};

/// Return a copy of `roles` with permissions added and removed so that
/// every policy in `settings` is realized.
///
/// The input snapshot is never mutated; the copy is structural (each
/// role's permission set is cloned). Roles are never added or removed,
/// and roles the mapping table does not reference pass through untouched.
///
/// # Errors
///
/// - [`AdapterError::MissingPolicySetting`] if `settings` lacks a value
///   for a key the mapping table defines.
/// - [`AdapterError::UnknownPolicyValue`] if a configured value is not
///   legal for its key.
/// - [`AdapterError::MissingRole`] if the snapshot lacks a role an
///   applicable rule references.
pub fn roles_from_policies(
    settings: &PolicySettings,
    roles: &RoleSnapshot,
) -> AdapterResult<RoleSnapshot> {
    let mut updated = roles.clone();

    for entry in MAPPING.entries() {
        let value = settings
            .get(entry.key)
            .ok_or(AdapterError::MissingPolicySetting(entry.key))?;
        let value_entry = entry
            .value_entry(value)
            .ok_or(AdapterError::UnknownPolicyValue {
                key: entry.key,
                value,
            })?;

        debug!(
            "{}={}: applying rules to {} role(s)",
            entry.key,
            value,
            value_entry.roles.len()
        );

        for rules in &value_entry.roles {
            let role = updated
                .get_mut(rules.role.as_str())
                .ok_or_else(|| AdapterError::MissingRole(rules.role.as_str().to_string()))?;

            for assignment in &rules.assignments {
                if assignment.should_have {
                    role.permissions.insert(assignment.permission.to_string());
                } else {
                    role.permissions.remove(assignment.permission);
                }
            }
        }
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{permissions, PolicyKey, PolicyValue, Role};

    fn base_snapshot() -> RoleSnapshot {
        [
            Role::with_permissions(
                "channel_user",
                [permissions::EDIT_POST, permissions::DELETE_POST],
            ),
            Role::with_permissions(
                "team_user",
                [permissions::DELETE_PUBLIC_CHANNEL, permissions::INVITE_USER],
            ),
            Role::with_permissions("channel_admin", ["manage_channel_roles"]),
            Role::with_permissions(
                "team_admin",
                [permissions::DELETE_POST, permissions::DELETE_OTHERS_POSTS],
            ),
            Role::with_permissions(
                "system_admin",
                [
                    permissions::DELETE_PUBLIC_CHANNEL,
                    permissions::INVITE_USER,
                    permissions::DELETE_POST,
                    permissions::DELETE_OTHERS_POSTS,
                    permissions::EDIT_POST,
                ],
            ),
        ]
        .into_iter()
        .map(|role| (role.name.clone(), role))
        .collect()
    }

    fn base_settings() -> PolicySettings {
        let mut settings = PolicySettings::new();
        for key in PolicyKey::ALL {
            settings.set(
                key,
                if key == PolicyKey::AllowEditPost {
                    PolicyValue::Always
                } else {
                    PolicyValue::All
                },
            );
        }
        settings
    }

    #[test]
    fn test_input_snapshot_is_untouched() {
        let roles = base_snapshot();
        let before = roles.clone();
        let _updated = roles_from_policies(&base_settings(), &roles).unwrap();
        assert_eq!(roles, before);
    }

    #[test]
    fn test_no_roles_added_or_removed() {
        let roles = base_snapshot();
        let updated = roles_from_policies(&base_settings(), &roles).unwrap();
        let names: Vec<&String> = updated.keys().collect();
        assert_eq!(names, roles.keys().collect::<Vec<_>>());
    }

    #[test]
    fn test_unreferenced_roles_pass_through() {
        let mut roles = base_snapshot();
        let guest = Role::with_permissions("guest", ["create_emojis"]);
        roles.insert(guest.name.clone(), guest.clone());

        let updated = roles_from_policies(&base_settings(), &roles).unwrap();
        assert_eq!(updated.get("guest"), Some(&guest));
    }

    #[test]
    fn test_grant_is_idempotent_on_already_present_permission() {
        let roles = base_snapshot();
        // team_user already holds invite_user; restrictTeamInvite=all re-grants it.
        let updated = roles_from_policies(&base_settings(), &roles).unwrap();
        let team_user = &updated["team_user"];
        assert!(team_user.has_permission(permissions::INVITE_USER));
        assert_eq!(
            team_user
                .permissions
                .iter()
                .filter(|p| p.as_str() == permissions::INVITE_USER)
                .count(),
            1
        );
    }

    #[test]
    fn test_revoke_is_noop_on_already_absent_permission() {
        let mut settings = base_settings();
        settings.set(PolicyKey::RestrictTeamInvite, PolicyValue::SystemAdmin);

        let mut roles = base_snapshot();
        roles
            .get_mut("team_user")
            .unwrap()
            .permissions
            .remove(permissions::INVITE_USER);

        let updated = roles_from_policies(&settings, &roles).unwrap();
        assert!(!updated["team_user"].has_permission(permissions::INVITE_USER));
        assert!(!updated["team_admin"].has_permission(permissions::INVITE_USER));
    }

    #[test]
    fn test_missing_policy_setting_is_an_error() {
        let mut settings = base_settings();
        let roles = base_snapshot();
        settings = settings
            .iter()
            .filter(|(key, _)| *key != PolicyKey::RestrictPostDelete)
            .collect();

        let err = roles_from_policies(&settings, &roles).unwrap_err();
        assert_eq!(
            err,
            AdapterError::MissingPolicySetting(PolicyKey::RestrictPostDelete)
        );
    }

    #[test]
    fn test_illegal_value_for_key_is_an_error() {
        let mut settings = base_settings();
        // channel_admin is not a legal value for a team-scoped key.
        settings.set(PolicyKey::RestrictTeamInvite, PolicyValue::ChannelAdmin);

        let err = roles_from_policies(&settings, &base_snapshot()).unwrap_err();
        assert_eq!(
            err,
            AdapterError::UnknownPolicyValue {
                key: PolicyKey::RestrictTeamInvite,
                value: PolicyValue::ChannelAdmin,
            }
        );
    }

    #[test]
    fn test_missing_role_is_an_error() {
        let mut roles = base_snapshot();
        roles.remove("channel_admin");

        let err = roles_from_policies(&base_settings(), &roles).unwrap_err();
        assert_eq!(err, AdapterError::MissingRole("channel_admin".to_string()));
    }
}
