//! Attribute statement definitions

use fedpolicy_core::{Attribute, GroupPath};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::index::GroupAttributeMap;
use crate::error::{EngineError, Result};

/// How a statement's result is combined with an attribute already collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictResolution {
    /// Keep the existing attribute
    #[default]
    Skip,
    /// Replace the existing attribute unless the entity holds it directly
    Overwrite,
    /// Append the values not already present
    Merge,
}

/// Where, relative to the statement's group, the condition attribute is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// In the parent group
    Upwards,
    /// In an immediate child group
    Downwards,
    /// Not in a neighbouring group
    Undirected,
}

/// The six statement shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StatementKind {
    /// Assigns to every member of the group
    #[serde(rename_all = "camelCase")]
    Everybody { assigned: Attribute },

    /// Assigns to members of another group
    #[serde(rename_all = "camelCase")]
    MemberOf {
        condition_group: GroupPath,
        assigned: Attribute,
    },

    /// Assigns when the entity holds an attribute in the parent group
    #[serde(rename_all = "camelCase")]
    HasParentAttribute {
        condition: Attribute,
        assigned: Attribute,
    },

    /// Assigns when the entity holds an attribute in an immediate child group
    #[serde(rename_all = "camelCase")]
    HasSubgroupAttribute {
        condition: Attribute,
        assigned: Attribute,
    },

    /// Copies an attribute held in the parent group
    #[serde(rename_all = "camelCase")]
    CopyParentAttribute { condition: Attribute },

    /// Copies an attribute held in an immediate child group
    #[serde(rename_all = "camelCase")]
    CopySubgroupAttribute { condition: Attribute },
}

/// Declarative rule granting or copying an attribute based on group position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeStatement {
    #[serde(flatten)]
    pub kind: StatementKind,

    #[serde(default)]
    pub conflict_resolution: ConflictResolution,
}

impl AttributeStatement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            conflict_resolution: ConflictResolution::default(),
        }
    }

    pub fn everybody(assigned: Attribute) -> Self {
        Self::new(StatementKind::Everybody { assigned })
    }

    pub fn member_of(condition_group: GroupPath, assigned: Attribute) -> Self {
        Self::new(StatementKind::MemberOf {
            condition_group,
            assigned,
        })
    }

    pub fn has_parent_attribute(condition: Attribute, assigned: Attribute) -> Self {
        Self::new(StatementKind::HasParentAttribute { condition, assigned })
    }

    pub fn has_subgroup_attribute(condition: Attribute, assigned: Attribute) -> Self {
        Self::new(StatementKind::HasSubgroupAttribute { condition, assigned })
    }

    pub fn copy_parent_attribute(condition: Attribute) -> Self {
        Self::new(StatementKind::CopyParentAttribute { condition })
    }

    pub fn copy_subgroup_attribute(condition: Attribute) -> Self {
        Self::new(StatementKind::CopySubgroupAttribute { condition })
    }

    pub fn with_conflict_resolution(mut self, resolution: ConflictResolution) -> Self {
        self.conflict_resolution = resolution;
        self
    }

    pub fn direction(&self) -> Direction {
        match self.kind {
            StatementKind::Everybody { .. } | StatementKind::MemberOf { .. } => Direction::Undirected,
            StatementKind::HasParentAttribute { .. } | StatementKind::CopyParentAttribute { .. } => {
                Direction::Upwards
            }
            StatementKind::HasSubgroupAttribute { .. }
            | StatementKind::CopySubgroupAttribute { .. } => Direction::Downwards,
        }
    }

    /// Attribute granted by the statement, `None` for copy statements
    pub fn assigned_attribute(&self) -> Option<&Attribute> {
        match &self.kind {
            StatementKind::Everybody { assigned }
            | StatementKind::MemberOf { assigned, .. }
            | StatementKind::HasParentAttribute { assigned, .. }
            | StatementKind::HasSubgroupAttribute { assigned, .. } => Some(assigned),
            StatementKind::CopyParentAttribute { .. } | StatementKind::CopySubgroupAttribute { .. } => {
                None
            }
        }
    }

    /// Attribute that must be held in the neighbouring group
    pub fn condition_attribute(&self) -> Option<&Attribute> {
        match &self.kind {
            StatementKind::HasParentAttribute { condition, .. }
            | StatementKind::HasSubgroupAttribute { condition, .. }
            | StatementKind::CopyParentAttribute { condition }
            | StatementKind::CopySubgroupAttribute { condition } => Some(condition),
            StatementKind::Everybody { .. } | StatementKind::MemberOf { .. } => None,
        }
    }

    /// Whether the statement can produce the queried attribute
    ///
    /// Copy statements can produce any attribute.
    pub fn concerns(&self, queried: Option<&str>) -> bool {
        match (queried, self.assigned_attribute()) {
            (Some(name), Some(assigned)) => assigned.name == name,
            _ => true,
        }
    }

    /// Check the statement for placement in `group`
    pub fn validate(&self, group: &GroupPath) -> Result<()> {
        if let Some(assigned) = self.assigned_attribute() {
            assigned
                .validate()
                .map_err(|e| invalid(format!("assigned attribute: {}", e)))?;
            if &assigned.group_path != group {
                return Err(invalid(format!(
                    "assigned attribute {} must be in the statement's group {}",
                    assigned.name, group
                )));
            }
        }

        if let Some(condition) = self.condition_attribute() {
            condition
                .validate()
                .map_err(|e| invalid(format!("condition attribute: {}", e)))?;
        }

        match &self.kind {
            StatementKind::HasParentAttribute { condition, .. }
            | StatementKind::CopyParentAttribute { condition } => {
                let Some(parent) = group.parent() else {
                    return Err(invalid(format!(
                        "statement conditioned on a parent group attribute cannot be defined in the root group {}",
                        group
                    )));
                };
                if condition.group_path != parent {
                    return Err(invalid(format!(
                        "condition attribute {} must be in the parent group {}, not {}",
                        condition.name, parent, condition.group_path
                    )));
                }
            }
            StatementKind::HasSubgroupAttribute { condition, .. }
            | StatementKind::CopySubgroupAttribute { condition } => {
                if !condition.group_path.is_immediate_child_of(group) {
                    return Err(invalid(format!(
                        "condition attribute {} must be in an immediate subgroup of {}, not {}",
                        condition.name, group, condition.group_path
                    )));
                }
            }
            StatementKind::Everybody { .. } | StatementKind::MemberOf { .. } => {}
        }

        Ok(())
    }

    /// Attribute produced when the condition holds
    ///
    /// `directed` is the neighbour view matching the statement's direction;
    /// directed statements produce nothing without it.
    pub fn evaluate_condition(
        &self,
        directed: Option<&GroupAttributeMap>,
        all_groups: &HashSet<GroupPath>,
    ) -> Option<Attribute> {
        match &self.kind {
            StatementKind::Everybody { assigned } => {
                all_groups.contains(&assigned.group_path).then(|| assigned.clone())
            }
            StatementKind::MemberOf {
                condition_group,
                assigned,
            } => all_groups.contains(condition_group).then(|| assigned.clone()),
            StatementKind::HasParentAttribute { condition, assigned }
            | StatementKind::HasSubgroupAttribute { condition, assigned } => {
                held_with_values(directed?, condition).map(|_| assigned.clone())
            }
            StatementKind::CopyParentAttribute { condition }
            | StatementKind::CopySubgroupAttribute { condition } => {
                held_with_values(directed?, condition).cloned()
            }
        }
    }
}

impl fmt::Display for AttributeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            StatementKind::Everybody { .. } => "everybody",
            StatementKind::MemberOf { .. } => "memberOf",
            StatementKind::HasParentAttribute { .. } => "hasParentAttribute",
            StatementKind::HasSubgroupAttribute { .. } => "hasSubgroupAttribute",
            StatementKind::CopyParentAttribute { .. } => "copyParentAttribute",
            StatementKind::CopySubgroupAttribute { .. } => "copySubgroupAttribute",
        };
        match (self.assigned_attribute(), self.condition_attribute()) {
            (Some(assigned), _) => write!(f, "{} -> {}", name, assigned.name),
            (None, Some(condition)) => write!(f, "{} <- {}", name, condition.name),
            (None, None) => f.write_str(name),
        }
    }
}

/// The attribute held in the condition's group, if it has every required value
fn held_with_values<'a>(view: &'a GroupAttributeMap, condition: &Attribute) -> Option<&'a Attribute> {
    let held = view.get(&condition.group_path, &condition.name)?;
    held.attribute
        .contains_all_values(&condition.values)
        .then_some(&held.attribute)
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidStatement(message)
}

/// Statements attached to one group, validated for that group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGroupStatements")]
pub struct GroupStatements {
    group: GroupPath,
    statements: Vec<AttributeStatement>,
}

impl GroupStatements {
    /// Validate and attach statements to a group
    pub fn new(group: GroupPath, statements: Vec<AttributeStatement>) -> Result<Self> {
        for statement in &statements {
            statement.validate(&group)?;
        }
        Ok(Self { group, statements })
    }

    /// A group without statements
    pub fn empty(group: GroupPath) -> Self {
        Self {
            group,
            statements: Vec::new(),
        }
    }

    pub fn group(&self) -> &GroupPath {
        &self.group
    }

    pub fn statements(&self) -> &[AttributeStatement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Deserialize)]
struct RawGroupStatements {
    group: GroupPath,
    #[serde(default)]
    statements: Vec<AttributeStatement>,
}

impl TryFrom<RawGroupStatements> for GroupStatements {
    type Error = EngineError;

    fn try_from(raw: RawGroupStatements) -> Result<Self> {
        Self::new(raw.group, raw.statements)
    }
}
