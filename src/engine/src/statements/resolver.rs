//! Effective attribute resolution across the group tree

use fedpolicy_core::GroupPath;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::index::AttributeIndex;
use super::processor::{EffectiveAttributes, StatementProcessor};
use super::types::{Direction, GroupStatements};
use crate::error::Result;

/// Source of the statements attached to each group
pub trait StatementsRepository: Send + Sync {
    /// Statements of a group, `None` when it has none
    fn statements(&self, group: &GroupPath) -> Option<Arc<GroupStatements>>;
}

/// In-memory statements snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatementsRepository {
    groups: HashMap<GroupPath, Arc<GroupStatements>>,
}

impl InMemoryStatementsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(groups: impl IntoIterator<Item = GroupStatements>) -> Self {
        let groups = groups
            .into_iter()
            .map(|g| (g.group().clone(), Arc::new(g)))
            .collect();
        Self { groups }
    }

    /// Load a JSON array of `{ "group": ..., "statements": [...] }` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: Vec<GroupStatements> = serde_json::from_str(json)?;
        Ok(Self::with_groups(groups))
    }
}

impl StatementsRepository for InMemoryStatementsRepository {
    fn statements(&self, group: &GroupPath) -> Option<Arc<GroupStatements>> {
        self.groups.get(group).cloned()
    }
}

/// Resolves the attributes in effect for an entity in a group
///
/// Neighbour views are built recursively before the target group is
/// processed: first downwards through every subgroup a downward statement
/// looks at, then upwards through the parent. Groups the entity is not a
/// member of are never visited. Directed statements only look one level up
/// or down, so the recursion always terminates.
pub struct EffectiveAttributesResolver {
    repository: Arc<dyn StatementsRepository>,
    processor: StatementProcessor,
}

impl EffectiveAttributesResolver {
    pub fn new(repository: Arc<dyn StatementsRepository>) -> Self {
        Self {
            repository,
            processor: StatementProcessor::new(),
        }
    }

    /// Attributes in effect in `group`
    ///
    /// `index` supplies the entity's direct attributes; its neighbour views
    /// are filled in here. `all_groups` are the groups the entity belongs to.
    pub fn resolve(
        &self,
        group: &GroupPath,
        queried: Option<&str>,
        all_groups: &HashSet<GroupPath>,
        mut index: AttributeIndex,
    ) -> EffectiveAttributes {
        self.collect(Direction::Downwards, group, queried, all_groups, &mut index);
        self.collect(Direction::Upwards, group, queried, all_groups, &mut index);

        let statements = self.statements_of(group);
        self.processor
            .process(Direction::Undirected, &statements, &index, all_groups, queried)
    }

    fn collect(
        &self,
        direction: Direction,
        group: &GroupPath,
        queried: Option<&str>,
        all_groups: &HashSet<GroupPath>,
        index: &mut AttributeIndex,
    ) {
        let statements = self.statements_of(group);

        let neighbours: BTreeSet<GroupPath> = statements
            .statements()
            .iter()
            .filter(|s| s.direction() == direction && s.concerns(queried))
            .filter_map(|s| s.condition_attribute())
            .map(|condition| condition.group_path.clone())
            .collect();

        for neighbour in &neighbours {
            if !all_groups.contains(neighbour) {
                debug!("Skipping {}, the entity is not a member", neighbour);
                continue;
            }
            debug!("Collecting {:?} attributes of {} for {}", direction, neighbour, group);
            self.collect(direction, neighbour, queried, all_groups, index);
        }

        let collected = self
            .processor
            .process(direction, &statements, index, all_groups, None);
        if let Some(view) = index.view_mut(direction) {
            view.set_group(group.clone(), collected);
        }
    }

    fn statements_of(&self, group: &GroupPath) -> Arc<GroupStatements> {
        self.repository
            .statements(group)
            .unwrap_or_else(|| Arc::new(GroupStatements::empty(group.clone())))
    }
}
