//! Translation result accumulator

use fedpolicy_core::{Attribute, Identity};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

use crate::context::TranslationInput;

/// Attribute exposed to a relying party, with presentation hints
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicAttribute {
    pub attribute: Attribute,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DynamicAttribute {
    pub fn new(attribute: Attribute) -> Self {
        Self {
            attribute,
            display_name: None,
            description: None,
        }
    }

    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn name(&self) -> &str {
        &self.attribute.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<T> {
    item: T,
    persist: bool,
}

/// Attributes and identities produced by one translation
///
/// Persistence is a mark on an exposed entry, so everything returned by
/// [`attributes_to_persist`](Self::attributes_to_persist) and
/// [`identities_to_persist`](Self::identities_to_persist) is always also
/// exposed. Removing an entry removes its mark with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationResult {
    attributes: Vec<Entry<DynamicAttribute>>,
    identities: Vec<Entry<Identity>>,
}

impl TranslationResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result exposing everything the entity already holds
    ///
    /// Nothing is marked for persistence. Attributes with the same name held
    /// in different groups are all exposed.
    pub fn seeded(input: &TranslationInput) -> Self {
        let mut result = Self::new();
        result.attributes = input
            .attributes
            .iter()
            .map(|attribute| Entry {
                item: DynamicAttribute::new(attribute.clone()),
                persist: false,
            })
            .collect();
        for identity in &input.identities {
            result.add_identity(identity.clone(), false);
        }
        result
    }

    /// Exposed attribute by name
    pub fn attribute(&self, name: &str) -> Option<&DynamicAttribute> {
        self.attributes
            .iter()
            .map(|e| &e.item)
            .find(|a| a.name() == name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &DynamicAttribute> {
        self.attributes.iter().map(|e| &e.item)
    }

    pub fn attributes_to_persist(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes
            .iter()
            .filter(|e| e.persist)
            .map(|e| &e.item.attribute)
    }

    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter().map(|e| &e.item)
    }

    pub fn identities_to_persist(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter().filter(|e| e.persist).map(|e| &e.item)
    }

    /// Whether an identity is exposed
    pub fn has_identity(&self, identity: &Identity) -> bool {
        self.identities.iter().any(|e| &e.item == identity)
    }

    /// Whether nothing is exposed
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.identities.is_empty()
    }

    /// Expose an attribute, replacing any exposed attribute with the same name
    pub fn put_attribute(&mut self, attribute: DynamicAttribute, persist: bool) {
        self.attributes.retain(|e| e.item.name() != attribute.name());
        self.attributes.push(Entry {
            item: attribute,
            persist,
        });
    }

    /// Remove every attribute whose name satisfies the predicate
    ///
    /// Returns the number of attributes removed.
    pub fn remove_attributes(&mut self, mut matches: impl FnMut(&str) -> bool) -> usize {
        let before = self.attributes.len();
        self.attributes.retain(|e| !matches(e.item.name()));
        before - self.attributes.len()
    }

    /// Keep only the values of the named attribute accepted by the predicate
    ///
    /// The predicate receives the position and the internal encoding of each
    /// value. Returns the number of values removed.
    pub fn retain_attribute_values(
        &mut self,
        name: &str,
        mut keep: impl FnMut(usize, &str) -> bool,
    ) -> usize {
        let Some(entry) = self.attributes.iter_mut().find(|e| e.item.name() == name) else {
            return 0;
        };

        let values = &mut entry.item.attribute.values;
        let before = values.len();
        let mut index = 0;
        values.retain(|v| {
            let kept = keep(index, v.as_str());
            index += 1;
            kept
        });
        before - values.len()
    }

    /// Expose an identity
    ///
    /// An identity that is already exposed keeps its place; asking to persist
    /// it marks it for persistence.
    pub fn add_identity(&mut self, identity: Identity, persist: bool) {
        match self.identities.iter_mut().find(|e| e.item == identity) {
            Some(existing) => existing.persist |= persist,
            None => self.identities.push(Entry {
                item: identity,
                persist,
            }),
        }
    }

    /// Remove every identity satisfying the predicate
    ///
    /// Returns the number of identities removed.
    pub fn remove_identities(&mut self, mut matches: impl FnMut(&Identity) -> bool) -> usize {
        let before = self.identities.len();
        self.identities.retain(|e| !matches(&e.item));
        before - self.identities.len()
    }
}

impl Serialize for TranslationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TranslationResult", 4)?;
        state.serialize_field("attributes", &self.attributes().collect::<Vec<_>>())?;
        state.serialize_field(
            "attributesToPersist",
            &self.attributes_to_persist().collect::<Vec<_>>(),
        )?;
        state.serialize_field("identities", &self.identities().collect::<Vec<_>>())?;
        state.serialize_field(
            "identitiesToPersist",
            &self.identities_to_persist().collect::<Vec<_>>(),
        )?;
        state.end()
    }
}
