//! I define rust models for concepts and entities involved in
//! authorization over resources in solid storages.
//!

use std::{collections::HashSet, fmt::Display};

use anujna_space::resource::uri::SolidResourceUri;
use indexmap::IndexMap;
use serde::Serialize;
use typed_record::TypedRecordKey;

use self::credentials::CredentialGroup;

pub mod authorizer;
pub mod credentials;
pub mod modes;
pub mod operation;
pub mod reader;

/// An access mode over a resource.
///
/// `Control` is the acl specific mode, that governs access over
/// acl resources of a subject resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Mode of reading a resource's representation.
    Read,

    /// Mode of appending to a resource's state.
    Append,

    /// Mode of overwriting a resource's state.
    Write,

    /// Mode of creating a resource.
    Create,

    /// Mode of deleting a resource.
    Delete,

    /// Mode of controlling policies over a resource.
    Control,
}

impl AccessMode {
    /// Modes that apply to regular resource operations.
    pub const OPERATIONAL: [Self; 5] = [
        Self::Read,
        Self::Append,
        Self::Write,
        Self::Create,
        Self::Delete,
    ];

    /// All known access modes.
    pub const ALL: [Self; 6] = [
        Self::Read,
        Self::Append,
        Self::Write,
        Self::Create,
        Self::Delete,
        Self::Control,
    ];

    /// Get the label of the access mode.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Append => "append",
            Self::Write => "write",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Control => "control",
        }
    }
}

impl Display for AccessMode {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Type of sets of access modes.
pub type AccessModeSet = HashSet<AccessMode>;

/// A tri valued verdict over access in a single mode.
///
/// Verdicts form a lattice with `Deny` absorbing over `Allow`,
/// and `Allow` over `Unstated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No policy statement applies.
    #[default]
    Unstated,

    /// Access is granted by at least one policy source.
    Allow,

    /// Access is explicitly denied.
    Deny,
}

impl Verdict {
    /// Resolve the union of this verdict with the other.
    ///
    /// A single `Deny` among sources denies access. Otherwise
    /// any `Allow` grants it.
    pub fn union(self, other: Self) -> Self {
        match (self, other) {
            (Self::Deny, _) | (_, Self::Deny) => Self::Deny,
            (Self::Allow, _) | (_, Self::Allow) => Self::Allow,
            _ => Self::Unstated,
        }
    }

    /// Resolve the conjunction of this verdict with the other,
    /// with `Deny` dominant over `Unstated`.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Deny, _) | (_, Self::Deny) => Self::Deny,
            (Self::Unstated, _) | (_, Self::Unstated) => Self::Unstated,
            _ => Self::Allow,
        }
    }

    /// Check if the verdict grants access.
    #[inline]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Check if the verdict explicitly denies access.
    #[inline]
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

impl From<bool> for Verdict {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

/// A struct to represent tri state permission over all known
/// access modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Permission {
    /// Verdict over `read` mode.
    pub read: Verdict,

    /// Verdict over `append` mode.
    pub append: Verdict,

    /// Verdict over `write` mode.
    pub write: Verdict,

    /// Verdict over `create` mode.
    pub create: Verdict,

    /// Verdict over `delete` mode.
    pub delete: Verdict,

    /// Verdict over `control` mode.
    pub control: Verdict,
}

impl Permission {
    /// Get a new permission with all given modes resolved to
    /// given verdict.
    pub fn with_all(modes: impl IntoIterator<Item = AccessMode>, verdict: Verdict) -> Self {
        let mut permission = Self::default();
        for mode in modes {
            permission.set(mode, verdict);
        }
        permission
    }

    /// Get the verdict over given mode.
    pub fn get(&self, mode: AccessMode) -> Verdict {
        match mode {
            AccessMode::Read => self.read,
            AccessMode::Append => self.append,
            AccessMode::Write => self.write,
            AccessMode::Create => self.create,
            AccessMode::Delete => self.delete,
            AccessMode::Control => self.control,
        }
    }

    /// Set the verdict over given mode.
    pub fn set(&mut self, mode: AccessMode, verdict: Verdict) {
        match mode {
            AccessMode::Read => self.read = verdict,
            AccessMode::Append => self.append = verdict,
            AccessMode::Write => self.write = verdict,
            AccessMode::Create => self.create = verdict,
            AccessMode::Delete => self.delete = verdict,
            AccessMode::Control => self.control = verdict,
        }
    }

    /// Resolve the per mode union of this permission with the
    /// other.
    pub fn union(self, other: Self) -> Self {
        let mut merged = Self::default();
        for mode in AccessMode::ALL {
            merged.set(mode, self.get(mode).union(other.get(mode)));
        }
        merged
    }

    /// Check if no verdict is stated in any mode.
    pub fn is_unstated(&self) -> bool {
        AccessMode::ALL
            .into_iter()
            .all(|mode| self.get(mode) == Verdict::Unstated)
    }
}

/// A struct to represent permissions resolved per credential
/// group.
///
/// A group maps to [`None`] when no policy source made any
/// statement about it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PermissionSet {
    /// Permission resolved for the public group.
    pub public: Option<Permission>,

    /// Permission resolved for the authenticated agent group.
    pub agent: Option<Permission>,
}

impl PermissionSet {
    /// Get the permission resolved for given credential group.
    pub fn get(&self, group: CredentialGroup) -> Option<Permission> {
        match group {
            CredentialGroup::Public => self.public,
            CredentialGroup::Agent => self.agent,
        }
    }

    /// Get the permission resolved for given credential group,
    /// or the unstated permission if the group is absent.
    #[inline]
    pub fn get_or_unstated(&self, group: CredentialGroup) -> Permission {
        self.get(group).unwrap_or_default()
    }

    /// Set the permission for given credential group.
    pub fn set(&mut self, group: CredentialGroup, permission: Permission) {
        match group {
            CredentialGroup::Public => self.public = Some(permission),
            CredentialGroup::Agent => self.agent = Some(permission),
        }
    }

    /// Get an iterator over (group, permission) entries of
    /// groups present in this set.
    pub fn iter(&self) -> impl Iterator<Item = (CredentialGroup, Permission)> + '_ {
        CredentialGroup::ALL
            .into_iter()
            .filter_map(|group| self.get(group).map(|permission| (group, permission)))
    }

    /// Resolve the per group, per mode union of this set with
    /// the other.
    ///
    /// A group present in either operand is present in the
    /// union.
    pub fn union(self, other: Self) -> Self {
        let mut merged = Self::default();
        for group in CredentialGroup::ALL {
            match (self.get(group), other.get(group)) {
                (Some(a), Some(b)) => merged.set(group, a.union(b)),
                (Some(a), None) => merged.set(group, a),
                (None, Some(b)) => merged.set(group, b),
                (None, None) => {}
            }
        }
        merged
    }

    /// Check if no group is present in this set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.public.is_none() && self.agent.is_none()
    }
}

/// A map keyed by resource uris, with insertion ordered
/// iteration.
pub type IdentifierMap<V> = IndexMap<SolidResourceUri, V>;

/// A map from target resource uris to required access modes
/// over them.
pub type AccessMap = IdentifierMap<AccessModeSet>;

/// A map from target resource uris to permissions resolved over
/// them.
pub type PermissionMap = IdentifierMap<PermissionSet>;

/// A typed record key for the permission map resolved for an
/// operation.
#[derive(Debug, Clone)]
pub struct KResolvedPermissionMap;

impl TypedRecordKey for KResolvedPermissionMap {
    type Value = PermissionMap;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Verdict::Unstated, Verdict::Unstated, Verdict::Unstated)]
    #[case(Verdict::Unstated, Verdict::Allow, Verdict::Allow)]
    #[case(Verdict::Allow, Verdict::Unstated, Verdict::Allow)]
    #[case(Verdict::Allow, Verdict::Deny, Verdict::Deny)]
    #[case(Verdict::Deny, Verdict::Allow, Verdict::Deny)]
    #[case(Verdict::Deny, Verdict::Unstated, Verdict::Deny)]
    fn verdict_union_works_correctly(
        #[case] a: Verdict,
        #[case] b: Verdict,
        #[case] expected: Verdict,
    ) {
        assert_eq!(a.union(b), expected);
        // Union must be commutative.
        assert_eq!(b.union(a), expected);
    }

    #[rstest]
    #[case(Verdict::Allow, Verdict::Allow, Verdict::Allow)]
    #[case(Verdict::Allow, Verdict::Unstated, Verdict::Unstated)]
    #[case(Verdict::Unstated, Verdict::Deny, Verdict::Deny)]
    #[case(Verdict::Allow, Verdict::Deny, Verdict::Deny)]
    fn verdict_conjunction_works_correctly(
        #[case] a: Verdict,
        #[case] b: Verdict,
        #[case] expected: Verdict,
    ) {
        assert_eq!(a.and(b), expected);
        assert_eq!(b.and(a), expected);
    }

    #[test]
    fn verdict_union_is_associative() {
        let verdicts = [Verdict::Unstated, Verdict::Allow, Verdict::Deny];
        for a in verdicts {
            for b in verdicts {
                for c in verdicts {
                    assert_eq!(a.union(b).union(c), a.union(b.union(c)));
                }
            }
        }
    }

    #[test]
    fn permission_set_union_preserves_group_presence() {
        let mut a = PermissionSet::default();
        a.set(
            CredentialGroup::Public,
            Permission::with_all([AccessMode::Read], Verdict::Allow),
        );

        let merged = a.union(PermissionSet::default());
        assert_eq!(
            merged.get(CredentialGroup::Public),
            Some(Permission::with_all([AccessMode::Read], Verdict::Allow))
        );
        assert_eq!(merged.get(CredentialGroup::Agent), None);
    }
}
