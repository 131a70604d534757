//! Translation input snapshot

use fedpolicy_core::{Attribute, GroupPath, Identity, ImportStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only snapshot of an entity and its request context
///
/// Built once by the embedding system before a translation and never
/// modified by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslationInput {
    /// Protocol name (e.g., "saml", "oidc")
    pub protocol: String,

    /// Protocol sub-type (e.g., binding or flow)
    pub protocol_subtype: String,

    /// Identifier of the relying party
    pub requester: String,

    /// Attributes of the relying party itself
    pub requester_attributes: Vec<Attribute>,

    /// Identities of the entity
    pub identities: Vec<Identity>,

    /// Attributes of the entity
    pub attributes: Vec<Attribute>,

    /// Groups the entity belongs to
    pub groups: Vec<GroupPath>,

    /// Group selected for this request
    pub chosen_group: GroupPath,

    /// Import status per identity
    pub import_status: BTreeMap<String, ImportStatus>,

    /// Authentication session, absent outside an authenticated flow
    pub authentication: Option<AuthenticationContext>,
}

impl TranslationInput {
    /// Create an input for a protocol and requester
    pub fn new(protocol: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            requester: requester.into(),
            ..Default::default()
        }
    }

    pub fn with_protocol_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.protocol_subtype = subtype.into();
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_requester_attribute(mut self, attribute: Attribute) -> Self {
        self.requester_attributes.push(attribute);
        self
    }

    /// Add a group membership
    pub fn with_group(mut self, group: GroupPath) -> Self {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
        self
    }

    pub fn with_chosen_group(mut self, group: GroupPath) -> Self {
        self.chosen_group = group;
        self
    }

    pub fn with_import_status(mut self, identity: impl Into<String>, status: ImportStatus) -> Self {
        self.import_status.insert(identity.into(), status);
        self
    }

    pub fn with_authentication(mut self, authentication: AuthenticationContext) -> Self {
        self.authentication = Some(authentication);
        self
    }
}

/// Authentication session details visible to expressions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthenticationContext {
    /// Identity values used to authenticate
    pub authenticated_with: Vec<String>,

    /// Remote identity provider, if the session was established remotely
    pub remote_idp: Option<String>,

    /// Authenticators used, first factor first
    pub authenticators: Vec<String>,

    /// Authentication context class references from the upstream IdP
    #[serde(rename = "upstreamACRs")]
    pub upstream_acrs: Vec<String>,

    /// Protocol used with the upstream IdP
    pub upstream_protocol: Option<String>,

    /// Upstream IdP identifier
    #[serde(rename = "upstreamIdP")]
    pub upstream_idp: Option<String>,
}

impl AuthenticationContext {
    /// Session authenticated locally with the given identities
    pub fn local<I, S>(authenticated_with: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authenticated_with: authenticated_with.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_remote_idp(mut self, idp: impl Into<String>) -> Self {
        self.remote_idp = Some(idp.into());
        self
    }

    pub fn with_authenticator(mut self, authenticator: impl Into<String>) -> Self {
        self.authenticators.push(authenticator.into());
        self
    }

    /// Whether more than one authenticator took part
    pub fn is_multi_factor(&self) -> bool {
        self.authenticators.len() > 1
    }
}
