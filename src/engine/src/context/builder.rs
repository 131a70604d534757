//! Context builder

use fedpolicy_core::Attribute;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use super::converter::{AttributeValueConverter, SyntaxValueConverter};
use super::input::TranslationInput;
use crate::cel::EvalContext;
use crate::error::Result;

/// `idp` value when the session was not established through a remote IdP
pub const LOCAL_IDP: &str = "_LOCAL";

/// `upstreamProtocol` value when there is no upstream authentication
pub const DEFAULT_UPSTREAM_PROTOCOL: &str = "local";

/// Names of the variables available to expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Protocol,
    ProtocolSubtype,
    Requester,
    Attr,
    Attrs,
    AttrObj,
    RequesterAttr,
    RequesterAttrs,
    RequesterAttrObj,
    IdsByType,
    ImportStatus,
    Groups,
    UsedGroup,
    SubGroups,
    AuthenticatedWith,
    Idp,
    Authentications,
    Mfa,
    TwoStepAuthn,
    UpstreamAcrs,
    UpstreamProtocol,
    UpstreamIdp,
}

impl ContextKey {
    /// Every key, in the order they are documented
    pub const ALL: [ContextKey; 22] = [
        ContextKey::Protocol,
        ContextKey::ProtocolSubtype,
        ContextKey::Requester,
        ContextKey::Attr,
        ContextKey::Attrs,
        ContextKey::AttrObj,
        ContextKey::RequesterAttr,
        ContextKey::RequesterAttrs,
        ContextKey::RequesterAttrObj,
        ContextKey::IdsByType,
        ContextKey::ImportStatus,
        ContextKey::Groups,
        ContextKey::UsedGroup,
        ContextKey::SubGroups,
        ContextKey::AuthenticatedWith,
        ContextKey::Idp,
        ContextKey::Authentications,
        ContextKey::Mfa,
        ContextKey::TwoStepAuthn,
        ContextKey::UpstreamAcrs,
        ContextKey::UpstreamProtocol,
        ContextKey::UpstreamIdp,
    ];

    /// Variable name as seen by expressions
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::Protocol => "protocol",
            ContextKey::ProtocolSubtype => "protocolSubtype",
            ContextKey::Requester => "requester",
            ContextKey::Attr => "attr",
            ContextKey::Attrs => "attrs",
            ContextKey::AttrObj => "attrObj",
            ContextKey::RequesterAttr => "requesterAttr",
            ContextKey::RequesterAttrs => "requesterAttrs",
            ContextKey::RequesterAttrObj => "requesterAttrObj",
            ContextKey::IdsByType => "idsByType",
            ContextKey::ImportStatus => "importStatus",
            ContextKey::Groups => "groups",
            ContextKey::UsedGroup => "usedGroup",
            ContextKey::SubGroups => "subGroups",
            ContextKey::AuthenticatedWith => "authenticatedWith",
            ContextKey::Idp => "idp",
            ContextKey::Authentications => "authentications",
            ContextKey::Mfa => "mfa",
            ContextKey::TwoStepAuthn => "twoStepAuthn",
            ContextKey::UpstreamAcrs => "upstreamACRs",
            ContextKey::UpstreamProtocol => "upstreamProtocol",
            ContextKey::UpstreamIdp => "upstreamIdP",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds evaluation contexts from translation inputs
#[derive(Clone)]
pub struct ContextBuilder {
    converter: Arc<dyn AttributeValueConverter>,
}

impl ContextBuilder {
    /// Create a builder using the given value converter
    pub fn new(converter: Arc<dyn AttributeValueConverter>) -> Self {
        Self { converter }
    }

    /// Build the evaluation context for an input
    ///
    /// Fails only when an attribute value cannot be converted.
    pub fn build(&self, input: &TranslationInput) -> Result<EvalContext> {
        let mut ctx = EvalContext::new();

        ctx.insert(ContextKey::Protocol.as_str(), input.protocol.as_str());
        ctx.insert(ContextKey::ProtocolSubtype.as_str(), input.protocol_subtype.as_str());
        ctx.insert(ContextKey::Requester.as_str(), input.requester.as_str());

        self.insert_attributes(
            &mut ctx,
            [ContextKey::Attr, ContextKey::Attrs, ContextKey::AttrObj],
            &input.attributes,
        )?;
        self.insert_attributes(
            &mut ctx,
            [
                ContextKey::RequesterAttr,
                ContextKey::RequesterAttrs,
                ContextKey::RequesterAttrObj,
            ],
            &input.requester_attributes,
        )?;

        let mut ids_by_type: BTreeMap<&str, Vec<Value>> = BTreeMap::new();
        for identity in &input.identities {
            ids_by_type
                .entry(identity.type_id.as_str())
                .or_default()
                .push(Value::String(identity.value.clone()));
        }
        let ids_by_type: Map<String, Value> = ids_by_type
            .into_iter()
            .map(|(type_id, values)| (type_id.to_string(), Value::Array(values)))
            .collect();
        ctx.insert(ContextKey::IdsByType.as_str(), ids_by_type);

        let import_status: Map<String, Value> = input
            .import_status
            .iter()
            .map(|(identity, status)| (identity.clone(), Value::String(status.to_string())))
            .collect();
        ctx.insert(ContextKey::ImportStatus.as_str(), import_status);

        let groups: Vec<Value> = input
            .groups
            .iter()
            .map(|g| Value::String(g.to_string()))
            .collect();
        ctx.insert(ContextKey::Groups.as_str(), groups);
        ctx.insert(ContextKey::UsedGroup.as_str(), input.chosen_group.as_str());

        let sub_groups: Vec<Value> = input
            .groups
            .iter()
            .filter(|g| *g == &input.chosen_group || g.is_child_of(&input.chosen_group))
            .map(|g| Value::String(g.to_string()))
            .collect();
        ctx.insert(ContextKey::SubGroups.as_str(), sub_groups);

        insert_authentication(&mut ctx, input);

        trace!(variables = ctx.len(), context = ?ctx, "Built evaluation context");
        Ok(ctx)
    }

    fn insert_attributes(
        &self,
        ctx: &mut EvalContext,
        [first_key, all_key, obj_key]: [ContextKey; 3],
        attributes: &[Attribute],
    ) -> Result<()> {
        let mut first = Map::new();
        let mut all = Map::new();
        let mut objects = Map::new();

        for attribute in attributes {
            let values = self.converter.to_external(attribute)?;

            let obj = if values.is_empty() {
                Value::String(String::new())
            } else {
                Value::Array(self.converter.to_objects(attribute)?)
            };

            first.insert(
                attribute.name.clone(),
                Value::String(values.first().cloned().unwrap_or_default()),
            );
            all.insert(
                attribute.name.clone(),
                Value::Array(values.into_iter().map(Value::String).collect()),
            );
            objects.insert(attribute.name.clone(), obj);
        }

        ctx.insert(first_key.as_str(), first);
        ctx.insert(all_key.as_str(), all);
        ctx.insert(obj_key.as_str(), objects);
        Ok(())
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SyntaxValueConverter))
    }
}

fn insert_authentication(ctx: &mut EvalContext, input: &TranslationInput) {
    let Some(authn) = &input.authentication else {
        ctx.insert(ContextKey::AuthenticatedWith.as_str(), Vec::<Value>::new());
        ctx.insert(ContextKey::Idp.as_str(), LOCAL_IDP);
        ctx.insert(ContextKey::Authentications.as_str(), Vec::<Value>::new());
        ctx.insert(ContextKey::Mfa.as_str(), false);
        ctx.insert(ContextKey::TwoStepAuthn.as_str(), false);
        ctx.insert(ContextKey::UpstreamAcrs.as_str(), Vec::<Value>::new());
        ctx.insert(ContextKey::UpstreamProtocol.as_str(), DEFAULT_UPSTREAM_PROTOCOL);
        ctx.insert(ContextKey::UpstreamIdp.as_str(), Value::Null);
        return;
    };

    ctx.insert(ContextKey::AuthenticatedWith.as_str(), strings(&authn.authenticated_with));
    ctx.insert(
        ContextKey::Idp.as_str(),
        authn.remote_idp.as_deref().unwrap_or(LOCAL_IDP),
    );
    ctx.insert(ContextKey::Authentications.as_str(), strings(&authn.authenticators));
    ctx.insert(ContextKey::Mfa.as_str(), authn.is_multi_factor());
    ctx.insert(ContextKey::TwoStepAuthn.as_str(), authn.is_multi_factor());
    ctx.insert(ContextKey::UpstreamAcrs.as_str(), strings(&authn.upstream_acrs));
    ctx.insert(
        ContextKey::UpstreamProtocol.as_str(),
        authn
            .upstream_protocol
            .as_deref()
            .unwrap_or(DEFAULT_UPSTREAM_PROTOCOL),
    );
    ctx.insert(
        ContextKey::UpstreamIdp.as_str(),
        authn.upstream_idp.clone().map_or(Value::Null, Value::String),
    );
}

fn strings(values: &[String]) -> Vec<Value> {
    values.iter().cloned().map(Value::String).collect()
}
