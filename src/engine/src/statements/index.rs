//! Per-group attribute index

use fedpolicy_core::{Attribute, GroupPath};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::types::Direction;

/// Attribute in effect for an entity in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveAttribute {
    pub attribute: Attribute,

    /// Held by the entity itself rather than produced by a statement
    pub direct: bool,
}

impl EffectiveAttribute {
    pub fn direct(attribute: Attribute) -> Self {
        Self {
            attribute,
            direct: true,
        }
    }

    pub fn derived(attribute: Attribute) -> Self {
        Self {
            attribute,
            direct: false,
        }
    }
}

/// Attributes by name, keyed by group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAttributeMap {
    groups: HashMap<GroupPath, BTreeMap<String, EffectiveAttribute>>,
}

impl GroupAttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group: &GroupPath, name: &str) -> Option<&EffectiveAttribute> {
        self.groups.get(group)?.get(name)
    }

    /// All attributes in a group
    pub fn group(&self, group: &GroupPath) -> Option<&BTreeMap<String, EffectiveAttribute>> {
        self.groups.get(group)
    }

    pub fn contains_group(&self, group: &GroupPath) -> bool {
        self.groups.contains_key(group)
    }

    /// Add an attribute under its own group, replacing one with the same name
    pub fn insert(&mut self, attribute: EffectiveAttribute) {
        self.groups
            .entry(attribute.attribute.group_path.clone())
            .or_default()
            .insert(attribute.attribute.name.clone(), attribute);
    }

    /// Replace the attributes of a group
    pub fn set_group(&mut self, group: GroupPath, attributes: BTreeMap<String, EffectiveAttribute>) {
        self.groups.insert(group, attributes);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Entity attributes partitioned by group and by direction
///
/// `direct` holds what the entity itself has. `upwards` and `downwards` hold
/// the attributes in effect in neighbouring groups, as seen by statements of
/// the matching direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeIndex {
    direct: GroupAttributeMap,
    upwards: GroupAttributeMap,
    downwards: GroupAttributeMap,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of directly held attributes, each under its own group
    pub fn from_direct(attributes: impl IntoIterator<Item = Attribute>) -> Self {
        let mut index = Self::new();
        for attribute in attributes {
            index.direct.insert(EffectiveAttribute::direct(attribute));
        }
        index
    }

    pub fn direct(&self) -> &GroupAttributeMap {
        &self.direct
    }

    pub fn upwards(&self) -> &GroupAttributeMap {
        &self.upwards
    }

    pub fn downwards(&self) -> &GroupAttributeMap {
        &self.downwards
    }

    /// Neighbour view for statements of a direction
    pub fn view(&self, direction: Direction) -> Option<&GroupAttributeMap> {
        match direction {
            Direction::Upwards => Some(&self.upwards),
            Direction::Downwards => Some(&self.downwards),
            Direction::Undirected => None,
        }
    }

    /// Mutable neighbour view for a direction
    pub fn view_mut(&mut self, direction: Direction) -> Option<&mut GroupAttributeMap> {
        match direction {
            Direction::Upwards => Some(&mut self.upwards),
            Direction::Downwards => Some(&mut self.downwards),
            Direction::Undirected => None,
        }
    }

    /// Make attributes visible to statements of a direction
    pub fn with_neighbour(mut self, direction: Direction, attribute: EffectiveAttribute) -> Self {
        if let Some(view) = self.view_mut(direction) {
            view.insert(attribute);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_direct() {
        let a = GroupPath::new("/A").unwrap();
        let index = AttributeIndex::from_direct([
            Attribute::string("role", a.clone(), ["admin"]),
            Attribute::string("role", GroupPath::root(), ["user"]),
        ]);

        let held = index.direct().get(&a, "role").unwrap();
        assert!(held.direct);
        assert_eq!(held.attribute.values, vec!["admin"]);
        assert_eq!(index.direct().len(), 2);
        assert!(index.upwards().is_empty());
    }

    #[test]
    fn test_views_are_separate() {
        let a = GroupPath::new("/A").unwrap();
        let index = AttributeIndex::new().with_neighbour(
            Direction::Upwards,
            EffectiveAttribute::derived(Attribute::string("x", a.clone(), ["1"])),
        );

        assert!(index.view(Direction::Upwards).unwrap().get(&a, "x").is_some());
        assert!(index.view(Direction::Downwards).unwrap().get(&a, "x").is_none());
        assert!(index.view(Direction::Undirected).is_none());
        assert!(index.direct().get(&a, "x").is_none());
    }
}
