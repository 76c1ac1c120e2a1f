//! Core data types: policy keys and values, roles, snapshots, settings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission identifiers, matching the server's permission names.
pub mod permissions {
    pub const INVITE_USER: &str = "invite_user";
    pub const CREATE_PUBLIC_CHANNEL: &str = "create_public_channel";
    pub const CREATE_PRIVATE_CHANNEL: &str = "create_private_channel";
    pub const MANAGE_PUBLIC_CHANNEL_PROPERTIES: &str = "manage_public_channel_properties";
    pub const DELETE_PUBLIC_CHANNEL: &str = "delete_public_channel";
    pub const MANAGE_PRIVATE_CHANNEL_PROPERTIES: &str = "manage_private_channel_properties";
    pub const MANAGE_PRIVATE_CHANNEL_MEMBERS: &str = "manage_private_channel_members";
    pub const DELETE_PRIVATE_CHANNEL: &str = "delete_private_channel";
    pub const EDIT_POST: &str = "edit_post";
    pub const DELETE_POST: &str = "delete_post";
    pub const DELETE_OTHERS_POSTS: &str = "delete_others_posts";
}

/// An administrative setting exposed in the system console.
///
/// Serialized names match the admin settings store keys
/// (e.g. `restrictTeamInvite`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyKey {
    RestrictTeamInvite,
    RestrictPublicChannelCreation,
    RestrictPrivateChannelCreation,
    RestrictPublicChannelManagement,
    RestrictPublicChannelDeletion,
    RestrictPrivateChannelManagement,
    RestrictPrivateChannelManageMembers,
    RestrictPrivateChannelDeletion,
    AllowEditPost,
    RestrictPostDelete,
}

impl PolicyKey {
    /// All known policy keys, in mapping-table declaration order.
    pub const ALL: [PolicyKey; 10] = [
        PolicyKey::RestrictTeamInvite,
        PolicyKey::RestrictPublicChannelCreation,
        PolicyKey::RestrictPrivateChannelCreation,
        PolicyKey::RestrictPublicChannelManagement,
        PolicyKey::RestrictPublicChannelDeletion,
        PolicyKey::RestrictPrivateChannelManagement,
        PolicyKey::RestrictPrivateChannelManageMembers,
        PolicyKey::RestrictPrivateChannelDeletion,
        PolicyKey::AllowEditPost,
        PolicyKey::RestrictPostDelete,
    ];

    /// The settings-store key for this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKey::RestrictTeamInvite => "restrictTeamInvite",
            PolicyKey::RestrictPublicChannelCreation => "restrictPublicChannelCreation",
            PolicyKey::RestrictPrivateChannelCreation => "restrictPrivateChannelCreation",
            PolicyKey::RestrictPublicChannelManagement => "restrictPublicChannelManagement",
            PolicyKey::RestrictPublicChannelDeletion => "restrictPublicChannelDeletion",
            PolicyKey::RestrictPrivateChannelManagement => "restrictPrivateChannelManagement",
            PolicyKey::RestrictPrivateChannelManageMembers => "restrictPrivateChannelManageMembers",
            PolicyKey::RestrictPrivateChannelDeletion => "restrictPrivateChannelDeletion",
            PolicyKey::AllowEditPost => "allowEditPost",
            PolicyKey::RestrictPostDelete => "restrictPostDelete",
        }
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value an administrative setting can take.
///
/// Which values are legal depends on the policy key; legality is enforced
/// by the mapping table at lookup time, not by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyValue {
    All,
    ChannelAdmin,
    TeamAdmin,
    SystemAdmin,
    Always,
    TimeLimit,
    Never,
}

impl PolicyValue {
    /// The settings-store value for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyValue::All => "all",
            PolicyValue::ChannelAdmin => "channel_admin",
            PolicyValue::TeamAdmin => "team_admin",
            PolicyValue::SystemAdmin => "system_admin",
            PolicyValue::Always => "always",
            PolicyValue::TimeLimit => "time_limit",
            PolicyValue::Never => "never",
        }
    }
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles referenced by the mapping table.
///
/// Snapshots may carry additional roles; the adapter leaves those untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleName {
    ChannelUser,
    ChannelAdmin,
    TeamUser,
    TeamAdmin,
    SystemAdmin,
}

impl RoleName {
    /// The snapshot key for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::ChannelUser => "channel_user",
            RoleName::ChannelAdmin => "channel_admin",
            RoleName::TeamUser => "team_user",
            RoleName::TeamAdmin => "team_admin",
            RoleName::SystemAdmin => "system_admin",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier, unique within a snapshot.
    pub name: String,
    /// Permissions attached to the role. Set semantics: no duplicates,
    /// order irrelevant.
    pub permissions: BTreeSet<String>,
}

impl Role {
    /// Create a role with no permissions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: BTreeSet::new(),
        }
    }

    /// Create a role holding the given permissions.
    pub fn with_permissions<I, S>(name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this role holds the given permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// A point-in-time view of the role store, keyed by role name.
pub type RoleSnapshot = BTreeMap<String, Role>;

/// Current values of the administrative settings, one entry per known key.
///
/// Serializes to the settings store's flat object shape,
/// e.g. `{"restrictTeamInvite": "all", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicySettings(BTreeMap<PolicyKey, PolicyValue>);

impl PolicySettings {
    /// Empty settings. Materialization requires every known key to be set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a policy key, replacing any previous value.
    pub fn set(&mut self, key: PolicyKey, value: PolicyValue) -> &mut Self {
        self.0.insert(key, value);
        self
    }

    /// The configured value for a policy key, if present.
    pub fn get(&self, key: PolicyKey) -> Option<PolicyValue> {
        self.0.get(&key).copied()
    }

    /// Iterate over the configured (key, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PolicyKey, PolicyValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(PolicyKey, PolicyValue)> for PolicySettings {
    fn from_iter<T: IntoIterator<Item = (PolicyKey, PolicyValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_key_serde_names_match_settings_store() {
        let json = serde_json::to_string(&PolicyKey::RestrictTeamInvite).unwrap();
        assert_eq!(json, "\"restrictTeamInvite\"");

        let key: PolicyKey = serde_json::from_str("\"restrictPrivateChannelManageMembers\"").unwrap();
        assert_eq!(key, PolicyKey::RestrictPrivateChannelManageMembers);
    }

    #[test]
    fn test_policy_value_serde_names_match_settings_store() {
        assert_eq!(
            serde_json::to_string(&PolicyValue::TimeLimit).unwrap(),
            "\"time_limit\""
        );
        let value: PolicyValue = serde_json::from_str("\"team_admin\"").unwrap();
        assert_eq!(value, PolicyValue::TeamAdmin);
    }

    #[test]
    fn test_policy_settings_round_trips_flat_object_shape() {
        let settings: PolicySettings = serde_json::from_str(
            r#"{"restrictTeamInvite": "all", "allowEditPost": "always"}"#,
        )
        .unwrap();
        assert_eq!(
            settings.get(PolicyKey::RestrictTeamInvite),
            Some(PolicyValue::All)
        );
        assert_eq!(
            settings.get(PolicyKey::AllowEditPost),
            Some(PolicyValue::Always)
        );
        assert_eq!(settings.get(PolicyKey::RestrictPostDelete), None);

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["restrictTeamInvite"], "all");
    }

    #[test]
    fn test_role_deserializes_from_store_shape() {
        let role: Role = serde_json::from_str(
            r#"{"name": "channel_user", "permissions": ["edit_post", "delete_post"]}"#,
        )
        .unwrap();
        assert_eq!(role.name, "channel_user");
        assert!(role.has_permission(permissions::EDIT_POST));
        assert!(!role.has_permission(permissions::DELETE_OTHERS_POSTS));
    }

    #[test]
    fn test_role_permissions_deduplicate() {
        let role = Role::with_permissions("team_user", ["invite_user", "invite_user"]);
        assert_eq!(role.permissions.len(), 1);
    }

    #[test]
    fn test_policy_key_display_matches_as_str() {
        for key in PolicyKey::ALL {
            assert_eq!(key.to_string(), key.as_str());
        }
    }
}
