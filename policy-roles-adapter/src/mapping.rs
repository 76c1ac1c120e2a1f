//! The policy mapping table: the single source of truth for both
//! directions of translation.
//!
//! For every policy key and every legal value, the table lists which roles
//! must (or must not) hold which permissions. The table is built once at
//! first use and never mutated. Declaration order of the value entries is
//! load-bearing: inference returns the first value whose rules all hold,
//! so values are declared from most to least permissive per key.

use std::sync::LazyLock;

use crate::types::{permissions, PolicyKey, PolicyValue, RoleName};

/// A single rule: the role must (`should_have` = true) or must not
/// (`should_have` = false) hold the permission.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PermissionAssignment {
    pub(crate) permission: &'static str,
    pub(crate) should_have: bool,
}

/// The rules applying to one role under one policy value.
#[derive(Debug)]
pub(crate) struct RoleRules {
    pub(crate) role: RoleName,
    pub(crate) assignments: Vec<PermissionAssignment>,
}

/// The per-role rules realizing one policy value.
#[derive(Debug)]
pub(crate) struct ValueEntry {
    pub(crate) value: PolicyValue,
    pub(crate) roles: Vec<RoleRules>,
}

/// The legal values of one policy key, in priority order.
#[derive(Debug)]
pub(crate) struct KeyEntry {
    pub(crate) key: PolicyKey,
    pub(crate) values: Vec<ValueEntry>,
}

impl KeyEntry {
    /// The value entry for a configured value, if that value is legal
    /// for this key.
    pub(crate) fn value_entry(&self, value: PolicyValue) -> Option<&ValueEntry> {
        self.values.iter().find(|entry| entry.value == value)
    }
}

/// The complete mapping table, one entry per [`PolicyKey`] variant.
#[derive(Debug)]
pub(crate) struct MappingTable {
    entries: Vec<KeyEntry>,
}

impl MappingTable {
    pub(crate) fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    /// Lookup is total: the table defines an entry for every key variant.
    pub(crate) fn key_entry(&self, key: PolicyKey) -> &KeyEntry {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .unwrap_or_else(|| unreachable!("mapping table covers every PolicyKey variant"))
    }

    fn build() -> Self {
        let entries = vec![
            KeyEntry {
                key: PolicyKey::RestrictTeamInvite,
                values: team_scoped(permissions::INVITE_USER),
            },
            KeyEntry {
                key: PolicyKey::RestrictPublicChannelCreation,
                values: team_scoped(permissions::CREATE_PUBLIC_CHANNEL),
            },
            KeyEntry {
                key: PolicyKey::RestrictPrivateChannelCreation,
                values: team_scoped(permissions::CREATE_PRIVATE_CHANNEL),
            },
            KeyEntry {
                key: PolicyKey::RestrictPublicChannelManagement,
                values: channel_scoped(permissions::MANAGE_PUBLIC_CHANNEL_PROPERTIES),
            },
            KeyEntry {
                key: PolicyKey::RestrictPublicChannelDeletion,
                values: channel_scoped(permissions::DELETE_PUBLIC_CHANNEL),
            },
            KeyEntry {
                key: PolicyKey::RestrictPrivateChannelManagement,
                values: channel_scoped(permissions::MANAGE_PRIVATE_CHANNEL_PROPERTIES),
            },
            KeyEntry {
                key: PolicyKey::RestrictPrivateChannelManageMembers,
                values: channel_scoped(permissions::MANAGE_PRIVATE_CHANNEL_MEMBERS),
            },
            KeyEntry {
                key: PolicyKey::RestrictPrivateChannelDeletion,
                values: channel_scoped(permissions::DELETE_PRIVATE_CHANNEL),
            },
            KeyEntry {
                key: PolicyKey::AllowEditPost,
                values: edit_post_values(),
            },
            KeyEntry {
                key: PolicyKey::RestrictPostDelete,
                values: post_delete_values(),
            },
        ];

        Self { entries }
    }
}

/// Process-wide mapping table, built on first access.
pub(crate) static MAPPING: LazyLock<MappingTable> = LazyLock::new(MappingTable::build);

/// The legal values for a policy key, in the table's priority order.
///
/// Useful for admin surfaces enumerating the choices a key supports.
pub fn legal_values(key: PolicyKey) -> Vec<PolicyValue> {
    MAPPING
        .key_entry(key)
        .values
        .iter()
        .map(|entry| entry.value)
        .collect()
}

fn rule(permission: &'static str, should_have: bool) -> PermissionAssignment {
    PermissionAssignment {
        permission,
        should_have,
    }
}

/// Shape for team-scoped restrictions.
///
/// The system_admin role is never constrained here: the server treats it
/// as always holding the permission, so inference for these keys is
/// insensitive to it.
fn team_scoped(permission: &'static str) -> Vec<ValueEntry> {
    vec![
        ValueEntry {
            value: PolicyValue::All,
            roles: vec![RoleRules {
                role: RoleName::TeamUser,
                assignments: vec![rule(permission, true)],
            }],
        },
        ValueEntry {
            value: PolicyValue::TeamAdmin,
            roles: vec![
                RoleRules {
                    role: RoleName::TeamUser,
                    assignments: vec![rule(permission, false)],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![rule(permission, true)],
                },
            ],
        },
        ValueEntry {
            value: PolicyValue::SystemAdmin,
            roles: vec![
                RoleRules {
                    role: RoleName::TeamUser,
                    assignments: vec![rule(permission, false)],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![rule(permission, false)],
                },
            ],
        },
    ]
}

/// Shape for channel-scoped restrictions.
fn channel_scoped(permission: &'static str) -> Vec<ValueEntry> {
    vec![
        ValueEntry {
            value: PolicyValue::All,
            roles: vec![RoleRules {
                role: RoleName::ChannelUser,
                assignments: vec![rule(permission, true)],
            }],
        },
        ValueEntry {
            value: PolicyValue::ChannelAdmin,
            roles: vec![
                RoleRules {
                    role: RoleName::ChannelUser,
                    assignments: vec![rule(permission, false)],
                },
                RoleRules {
                    role: RoleName::ChannelAdmin,
                    assignments: vec![rule(permission, true)],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![rule(permission, true)],
                },
            ],
        },
        ValueEntry {
            value: PolicyValue::TeamAdmin,
            roles: vec![
                RoleRules {
                    role: RoleName::ChannelUser,
                    assignments: vec![rule(permission, false)],
                },
                RoleRules {
                    role: RoleName::ChannelAdmin,
                    assignments: vec![rule(permission, false)],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![rule(permission, true)],
                },
            ],
        },
        ValueEntry {
            value: PolicyValue::SystemAdmin,
            roles: vec![
                RoleRules {
                    role: RoleName::ChannelUser,
                    assignments: vec![rule(permission, false)],
                },
                RoleRules {
                    role: RoleName::ChannelAdmin,
                    assignments: vec![rule(permission, false)],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![rule(permission, false)],
                },
            ],
        },
    ]
}

/// allowEditPost: `always` and `time_limit` carry identical assignments
/// (the limit itself lives in a separate numeric setting), so inference
/// resolves both to `always`.
fn edit_post_values() -> Vec<ValueEntry> {
    let granted = |should_have| {
        vec![
            RoleRules {
                role: RoleName::ChannelUser,
                assignments: vec![rule(permissions::EDIT_POST, should_have)],
            },
            RoleRules {
                role: RoleName::SystemAdmin,
                assignments: vec![rule(permissions::EDIT_POST, should_have)],
            },
        ]
    };

    vec![
        ValueEntry {
            value: PolicyValue::Always,
            roles: granted(true),
        },
        ValueEntry {
            value: PolicyValue::TimeLimit,
            roles: granted(true),
        },
        ValueEntry {
            value: PolicyValue::Never,
            roles: granted(false),
        },
    ]
}

/// restrictPostDelete: DELETE_POST and DELETE_OTHERS_POSTS move together
/// for the admin-level roles; channel_user only ever holds DELETE_POST.
fn post_delete_values() -> Vec<ValueEntry> {
    vec![
        ValueEntry {
            value: PolicyValue::All,
            roles: vec![
                RoleRules {
                    role: RoleName::ChannelUser,
                    assignments: vec![rule(permissions::DELETE_POST, true)],
                },
                RoleRules {
                    role: RoleName::ChannelAdmin,
                    assignments: vec![
                        rule(permissions::DELETE_POST, true),
                        rule(permissions::DELETE_OTHERS_POSTS, true),
                    ],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![
                        rule(permissions::DELETE_POST, true),
                        rule(permissions::DELETE_OTHERS_POSTS, true),
                    ],
                },
            ],
        },
        ValueEntry {
            value: PolicyValue::TeamAdmin,
            roles: vec![
                RoleRules {
                    role: RoleName::ChannelUser,
                    assignments: vec![rule(permissions::DELETE_POST, false)],
                },
                RoleRules {
                    role: RoleName::ChannelAdmin,
                    assignments: vec![
                        rule(permissions::DELETE_POST, false),
                        rule(permissions::DELETE_OTHERS_POSTS, false),
                    ],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![
                        rule(permissions::DELETE_POST, true),
                        rule(permissions::DELETE_OTHERS_POSTS, true),
                    ],
                },
            ],
        },
        ValueEntry {
            value: PolicyValue::SystemAdmin,
            roles: vec![
                RoleRules {
                    role: RoleName::ChannelUser,
                    assignments: vec![rule(permissions::DELETE_POST, false)],
                },
                RoleRules {
                    role: RoleName::ChannelAdmin,
                    assignments: vec![
                        rule(permissions::DELETE_POST, false),
                        rule(permissions::DELETE_OTHERS_POSTS, false),
                    ],
                },
                RoleRules {
                    role: RoleName::TeamAdmin,
                    assignments: vec![
                        rule(permissions::DELETE_POST, false),
                        rule(permissions::DELETE_OTHERS_POSTS, false),
                    ],
                },
            ],
        },
    ]
}
