//! I define types to represent request resolved credentials,
//! grouped by their source of trust.
//!

use serde::Serialize;
use webid::WebId;

/// Coarse trust bucket a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialGroup {
    /// Group of unauthenticated requests.
    Public,

    /// Group of authenticated agents.
    Agent,
}

impl CredentialGroup {
    /// All known credential groups.
    pub const ALL: [Self; 2] = [Self::Public, Self::Agent];

    /// Get the label of the credential group.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Agent => "agent",
        }
    }
}

/// A struct to represent identity data resolved for one
/// credential group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credential {
    /// WebId of the agent, if authenticated.
    pub web_id: Option<WebId>,

    /// Id of the client the agent is using, if known.
    pub client_id: Option<String>,
}

/// A struct to represent credentials resolved from a request,
/// per credential group.
///
/// A group maps to [`None`] when the request carries no
/// credential of that group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CredentialSet {
    /// Credential of the public group.
    pub public: Option<Credential>,

    /// Credential of the authenticated agent group.
    pub agent: Option<Credential>,
}

impl CredentialSet {
    /// Get credentials of an unauthenticated request.
    pub fn public_only() -> Self {
        Self {
            public: Some(Credential::default()),
            agent: None,
        }
    }

    /// Get credentials of a request authenticated with given
    /// agent credential. Such requests carry the public
    /// credential too.
    pub fn authenticated(agent: Credential) -> Self {
        Self {
            public: Some(Credential::default()),
            agent: Some(agent),
        }
    }

    /// Get the credential of given group.
    pub fn get(&self, group: CredentialGroup) -> Option<&Credential> {
        match group {
            CredentialGroup::Public => self.public.as_ref(),
            CredentialGroup::Agent => self.agent.as_ref(),
        }
    }

    /// Get an iterator over groups with a present credential.
    pub fn groups(&self) -> impl Iterator<Item = CredentialGroup> + '_ {
        CredentialGroup::ALL
            .into_iter()
            .filter(|group| self.get(*group).is_some())
    }
}
