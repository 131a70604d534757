//! Attribute statements
//!
//! Statements attached to a group grant attributes to the group's members
//! based on their position in the group tree. There are six shapes:
//!
//! | Statement | Direction | Condition |
//! |---|---|---|
//! | `everybody` | undirected | the assigned attribute's group is one of the entity's groups |
//! | `memberOf` | undirected | the entity is a member of the condition group |
//! | `hasParentAttribute` | upwards | the attribute is held in the parent group |
//! | `hasSubgroupAttribute` | downwards | the attribute is held in an immediate subgroup |
//! | `copyParentAttribute` | upwards | as above, the held attribute is copied |
//! | `copySubgroupAttribute` | downwards | as above, the held attribute is copied |
//!
//! # Example
//!
//! ```rust
//! use fedpolicy_engine::statements::{AttributeIndex, AttributeStatement, Direction, GroupStatements, StatementProcessor};
//! use fedpolicy_core::{Attribute, GroupPath};
//! use std::collections::HashSet;
//!
//! let staff = GroupPath::new("/staff").unwrap();
//! let statements = GroupStatements::new(staff.clone(), vec![
//!     AttributeStatement::everybody(Attribute::string("employee", staff.clone(), ["yes"])),
//! ]).unwrap();
//!
//! let groups: HashSet<_> = [GroupPath::root(), staff].into_iter().collect();
//! let result = StatementProcessor::new().process(
//!     Direction::Undirected, &statements, &AttributeIndex::new(), &groups, None,
//! );
//! assert_eq!(result["employee"].attribute.values, vec!["yes"]);
//! ```

pub mod index;
pub mod processor;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod tests;

pub use index::{AttributeIndex, EffectiveAttribute, GroupAttributeMap};
pub use processor::{EffectiveAttributes, StatementProcessor};
pub use resolver::{EffectiveAttributesResolver, InMemoryStatementsRepository, StatementsRepository};
pub use types::{AttributeStatement, ConflictResolution, Direction, GroupStatements, StatementKind};
