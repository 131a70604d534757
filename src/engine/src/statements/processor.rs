//! Statement evaluation for one group

use fedpolicy_core::GroupPath;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

use super::index::{AttributeIndex, EffectiveAttribute};
use super::types::{AttributeStatement, ConflictResolution, Direction, GroupStatements};

/// Effective attributes of a group, by name
pub type EffectiveAttributes = BTreeMap<String, EffectiveAttribute>;

/// Evaluates the statements of a single group
///
/// Stateless; the recursive walk over neighbouring groups is done by
/// [`EffectiveAttributesResolver`](super::EffectiveAttributesResolver) or by
/// the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementProcessor;

impl StatementProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Collect the attributes in effect in the statements' group
    ///
    /// Starts from the entity's direct attributes in the group, then applies
    /// each statement in order. In a directed pass (`Upwards` or `Downwards`)
    /// statements of the opposite direction are skipped. When `queried` is
    /// set only that attribute is collected.
    pub fn process(
        &self,
        direction: Direction,
        statements: &GroupStatements,
        index: &AttributeIndex,
        all_groups: &HashSet<GroupPath>,
        queried: Option<&str>,
    ) -> EffectiveAttributes {
        let group = statements.group();
        let mut collected = EffectiveAttributes::new();

        if let Some(held) = index.direct().group(group) {
            collected.extend(
                held.iter()
                    .filter(|(name, _)| queried.map_or(true, |q| q == name.as_str()))
                    .map(|(name, attribute)| (name.clone(), attribute.clone())),
            );
        }

        for statement in statements.statements() {
            self.apply(direction, statement, group, index, all_groups, queried, &mut collected);
        }

        trace!(group = %group, collected = collected.len(), "Processed attribute statements");
        collected
    }

    #[allow(clippy::too_many_arguments)]
    fn apply(
        &self,
        direction: Direction,
        statement: &AttributeStatement,
        group: &GroupPath,
        index: &AttributeIndex,
        all_groups: &HashSet<GroupPath>,
        queried: Option<&str>,
        collected: &mut EffectiveAttributes,
    ) {
        let statement_direction = statement.direction();
        if direction != Direction::Undirected
            && statement_direction != Direction::Undirected
            && direction != statement_direction
        {
            return;
        }

        if !statement.concerns(queried) {
            return;
        }

        let Some(mut produced) = statement.evaluate_condition(index.view(statement_direction), all_groups)
        else {
            return;
        };

        // Copies take the place of the statement's group
        produced.group_path = group.clone();

        if queried.is_some_and(|q| q != produced.name) {
            return;
        }

        let Some(existing) = collected.get_mut(&produced.name) else {
            debug!("Statement {} in {} assigns {}", statement, group, produced);
            collected.insert(produced.name.clone(), EffectiveAttribute::derived(produced));
            return;
        };

        match statement.conflict_resolution {
            ConflictResolution::Skip => {
                debug!("Statement {} skipped, {} already present", statement, produced.name);
            }
            ConflictResolution::Overwrite => {
                if existing.direct {
                    debug!("Statement {} cannot overwrite direct {}", statement, produced.name);
                } else {
                    debug!("Statement {} overwrites {}", statement, produced.name);
                    *existing = EffectiveAttribute::derived(produced);
                }
            }
            ConflictResolution::Merge => {
                let added = existing.attribute.merge_values(&produced.values);
                debug!("Statement {} merged {} values into {}", statement, added, produced.name);
            }
        }
    }
}
