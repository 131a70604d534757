//! Tests for attribute statements

use super::*;
use crate::error::EngineError;
use fedpolicy_core::{Attribute, GroupPath, ValueSyntax};
use std::collections::HashSet;
use std::sync::Arc;

fn group(path: &str) -> GroupPath {
    GroupPath::new(path).unwrap()
}

fn groups(paths: &[&str]) -> HashSet<GroupPath> {
    paths.iter().map(|p| group(p)).collect()
}

fn attr(name: &str, path: &str, values: &[&str]) -> Attribute {
    Attribute::string(name, group(path), values.iter().copied())
}

fn process(statements: &GroupStatements, index: &AttributeIndex, all: &[&str]) -> EffectiveAttributes {
    StatementProcessor::new().process(Direction::Undirected, statements, index, &groups(all), None)
}

// Validation

#[test]
fn test_upward_statements_rejected_on_root() {
    let root = GroupPath::root();
    for statement in [
        AttributeStatement::has_parent_attribute(attr("c", "/", &[]), attr("a", "/", &["1"])),
        AttributeStatement::copy_parent_attribute(attr("c", "/", &[])),
    ] {
        let err = statement.validate(&root).unwrap_err();
        assert!(matches!(err, EngineError::InvalidStatement(_)));
    }
}

#[test]
fn test_upward_condition_must_be_in_parent() {
    let ab = group("/A/B");
    assert!(AttributeStatement::copy_parent_attribute(attr("c", "/A", &[]))
        .validate(&ab)
        .is_ok());
    assert!(AttributeStatement::copy_parent_attribute(attr("c", "/", &[]))
        .validate(&ab)
        .is_err());
    assert!(AttributeStatement::has_parent_attribute(attr("c", "/A/B", &[]), attr("a", "/A/B", &["1"]))
        .validate(&ab)
        .is_err());
}

#[test]
fn test_downward_condition_must_be_immediate_child() {
    let a = group("/A");

    let child = AttributeStatement::has_subgroup_attribute(attr("c", "/A/B", &[]), attr("a", "/A", &["1"]));
    assert!(child.validate(&a).is_ok());
    let child = AttributeStatement::copy_subgroup_attribute(attr("c", "/A/B", &[]));
    assert!(child.validate(&a).is_ok());

    let grandchild =
        AttributeStatement::has_subgroup_attribute(attr("c", "/A/B/C", &[]), attr("a", "/A", &["1"]));
    assert!(grandchild.validate(&a).is_err());
    let grandchild = AttributeStatement::copy_subgroup_attribute(attr("c", "/A/B/C", &[]));
    assert!(grandchild.validate(&a).is_err());

    let sibling = AttributeStatement::copy_subgroup_attribute(attr("c", "/AB", &[]));
    assert!(sibling.validate(&a).is_err());
}

#[test]
fn test_malformed_attributes_are_invalid_statements() {
    let a = group("/A");

    let unnamed = AttributeStatement::everybody(attr("", "/A", &["1"]));
    assert!(matches!(unnamed.validate(&a), Err(EngineError::InvalidStatement(_))));

    let bad_number = AttributeStatement::everybody(Attribute::new(
        "age",
        a.clone(),
        ValueSyntax::Integer,
        vec!["old".into()],
    ));
    let err = bad_number.validate(&a).unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatement(_)));
    assert!(err.to_string().contains("assigned attribute"));

    let bad_condition = AttributeStatement::copy_subgroup_attribute(attr("", "/A/B", &[]));
    let err = bad_condition.validate(&a).unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatement(_)));
    assert!(err.to_string().contains("condition attribute"));
}

#[test]
fn test_assigned_attribute_must_be_in_statement_group() {
    let a = group("/A");
    assert!(AttributeStatement::everybody(attr("x", "/A", &["1"])).validate(&a).is_ok());
    assert!(AttributeStatement::everybody(attr("x", "/", &["1"])).validate(&a).is_err());
    assert!(AttributeStatement::member_of(group("/Z"), attr("x", "/B", &["1"]))
        .validate(&a)
        .is_err());
}

#[test]
fn test_group_statements_validate_on_construction() {
    let err = GroupStatements::new(
        GroupPath::root(),
        vec![AttributeStatement::copy_parent_attribute(attr("c", "/", &[]))],
    )
    .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_group_statements_deserialize_validates() {
    let ok = r#"{
        "group": "/A",
        "statements": [
            {"type": "copyParentAttribute", "condition": {"name": "role", "groupPath": "/"}, "conflictResolution": "merge"},
            {"type": "memberOf", "conditionGroup": "/Z", "assigned": {"name": "z", "groupPath": "/A", "values": ["1"]}}
        ]
    }"#;
    let statements: GroupStatements = serde_json::from_str(ok).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements.statements()[0].conflict_resolution, ConflictResolution::Merge);
    assert_eq!(statements.statements()[1].conflict_resolution, ConflictResolution::Skip);

    let bad = r#"{
        "group": "/",
        "statements": [{"type": "copyParentAttribute", "condition": {"name": "role", "groupPath": "/"}}]
    }"#;
    assert!(serde_json::from_str::<GroupStatements>(bad).is_err());
}

// Evaluation of single statements

#[test]
fn test_everybody_requires_membership_of_own_group() {
    let statement = AttributeStatement::everybody(attr("x", "/A", &["1"]));
    assert!(statement.evaluate_condition(None, &groups(&["/", "/A"])).is_some());
    assert!(statement.evaluate_condition(None, &groups(&["/"])).is_none());
}

#[test]
fn test_member_of() {
    let statement = AttributeStatement::member_of(group("/Z"), attr("x", "/A", &["1"]));
    assert!(statement.evaluate_condition(None, &groups(&["/", "/A", "/Z"])).is_some());
    assert!(statement.evaluate_condition(None, &groups(&["/", "/A"])).is_none());
}

#[test]
fn test_condition_values_must_all_be_held() {
    let view = AttributeIndex::new()
        .with_neighbour(Direction::Upwards, EffectiveAttribute::direct(attr("role", "/", &["admin", "user"])));
    let view = view.upwards();
    let all = groups(&["/", "/A"]);

    let any = AttributeStatement::has_parent_attribute(attr("role", "/", &[]), attr("x", "/A", &["1"]));
    assert!(any.evaluate_condition(Some(view), &all).is_some());

    let subset = AttributeStatement::has_parent_attribute(attr("role", "/", &["admin"]), attr("x", "/A", &["1"]));
    assert!(subset.evaluate_condition(Some(view), &all).is_some());

    let missing =
        AttributeStatement::has_parent_attribute(attr("role", "/", &["admin", "guest"]), attr("x", "/A", &["1"]));
    assert!(missing.evaluate_condition(Some(view), &all).is_none());

    let other_name = AttributeStatement::has_parent_attribute(attr("mail", "/", &[]), attr("x", "/A", &["1"]));
    assert!(other_name.evaluate_condition(Some(view), &all).is_none());

    assert!(any.evaluate_condition(None, &all).is_none());
}

#[test]
fn test_copy_parent_copies_all_held_values() {
    let a = group("/A");
    let index = AttributeIndex::new()
        .with_neighbour(Direction::Upwards, EffectiveAttribute::direct(attr("role", "/", &["admin", "user"])));
    let statements = GroupStatements::new(
        a.clone(),
        vec![AttributeStatement::copy_parent_attribute(attr("role", "/", &["admin"]))],
    )
    .unwrap();

    let result = process(&statements, &index, &["/", "/A"]);
    let role = &result["role"];
    assert_eq!(role.attribute.values, vec!["admin", "user"]);
    assert_eq!(role.attribute.group_path, a);
    assert!(!role.direct);
}

#[test]
fn test_copy_subgroup() {
    let index = AttributeIndex::new()
        .with_neighbour(Direction::Downwards, EffectiveAttribute::direct(attr("dept", "/A/B", &["R&D"])));
    let statements = GroupStatements::new(
        group("/A"),
        vec![AttributeStatement::copy_subgroup_attribute(attr("dept", "/A/B", &[]))],
    )
    .unwrap();

    let result = process(&statements, &index, &["/", "/A", "/A/B"]);
    assert_eq!(result["dept"].attribute.values, vec!["R&D"]);
}

// Conflict resolution

#[test]
fn test_skip_keeps_first_result() {
    let statements = GroupStatements::new(
        group("/A"),
        vec![
            AttributeStatement::everybody(attr("x", "/A", &["va1"])),
            AttributeStatement::everybody(attr("x", "/A", &["updated"])),
        ],
    )
    .unwrap();

    let result = process(&statements, &AttributeIndex::new(), &["/", "/A"]);
    assert_eq!(result["x"].attribute.values, vec!["va1"]);
}

#[test]
fn test_overwrite_replaces_derived_only() {
    let statements = GroupStatements::new(
        group("/A"),
        vec![
            AttributeStatement::everybody(attr("x", "/A", &["va1"])),
            AttributeStatement::everybody(attr("x", "/A", &["updated2"]))
                .with_conflict_resolution(ConflictResolution::Overwrite),
            AttributeStatement::everybody(attr("d", "/A", &["updated3"]))
                .with_conflict_resolution(ConflictResolution::Overwrite),
        ],
    )
    .unwrap();
    let index = AttributeIndex::from_direct([attr("d", "/A", &["own"])]);

    let result = process(&statements, &index, &["/", "/A"]);
    assert_eq!(result["x"].attribute.values, vec!["updated2"]);
    assert_eq!(result["d"].attribute.values, vec!["own"]);
    assert!(result["d"].direct);
}

#[test]
fn test_merge_appends_new_values() {
    let statements = GroupStatements::new(
        group("/A"),
        vec![
            AttributeStatement::everybody(attr("x", "/A", &["merge1"])),
            AttributeStatement::everybody(attr("x", "/A", &["merge1", "merge2"]))
                .with_conflict_resolution(ConflictResolution::Merge),
        ],
    )
    .unwrap();

    let result = process(&statements, &AttributeIndex::new(), &["/", "/A"]);
    assert_eq!(result["x"].attribute.values, vec!["merge1", "merge2"]);
}

// Recursive resolution

fn repository(groups: Vec<GroupStatements>) -> Arc<dyn StatementsRepository> {
    Arc::new(InMemoryStatementsRepository::with_groups(groups))
}

#[test]
fn test_resolver_copies_from_parent() {
    let repo = repository(vec![GroupStatements::new(
        group("/A"),
        vec![AttributeStatement::copy_parent_attribute(attr("role", "/", &[]))],
    )
    .unwrap()]);
    let resolver = EffectiveAttributesResolver::new(repo);
    let index = AttributeIndex::from_direct([attr("role", "/", &["admin"])]);

    let result = resolver.resolve(&group("/A"), None, &groups(&["/", "/A"]), index);
    assert_eq!(result["role"].attribute.values, vec!["admin"]);
}

#[test]
fn test_resolver_propagates_derived_attributes_down_the_chain() {
    let repo = repository(vec![
        GroupStatements::new(
            group("/A"),
            vec![AttributeStatement::everybody(attr("level", "/A", &["a"]))],
        )
        .unwrap(),
        GroupStatements::new(
            group("/A/B"),
            vec![AttributeStatement::copy_parent_attribute(attr("level", "/A", &[]))],
        )
        .unwrap(),
        GroupStatements::new(
            group("/A/B/C"),
            vec![AttributeStatement::copy_parent_attribute(attr("level", "/A/B", &[]))],
        )
        .unwrap(),
    ]);
    let resolver = EffectiveAttributesResolver::new(repo);
    let all = groups(&["/", "/A", "/A/B", "/A/B/C"]);

    let result = resolver.resolve(&group("/A/B/C"), None, &all, AttributeIndex::new());
    assert_eq!(result["level"].attribute.values, vec!["a"]);
    assert_eq!(result["level"].attribute.group_path, group("/A/B/C"));
}

#[test]
fn test_resolver_collects_from_subgroups() {
    let repo = repository(vec![GroupStatements::new(
        group("/A"),
        vec![AttributeStatement::has_subgroup_attribute(
            attr("member", "/A/B", &["yes"]),
            attr("hasMembers", "/A", &["true"]),
        )],
    )
    .unwrap()]);
    let resolver = EffectiveAttributesResolver::new(repo);
    let all = groups(&["/", "/A", "/A/B"]);

    let index = AttributeIndex::from_direct([attr("member", "/A/B", &["yes"])]);
    let result = resolver.resolve(&group("/A"), None, &all, index);
    assert_eq!(result["hasMembers"].attribute.values, vec!["true"]);

    let index = AttributeIndex::from_direct([attr("member", "/A/B", &["no"])]);
    let result = resolver.resolve(&group("/A"), None, &all, index);
    assert!(!result.contains_key("hasMembers"));
}

#[test]
fn test_resolver_queried_attribute() {
    let repo = repository(vec![GroupStatements::new(
        group("/A"),
        vec![
            AttributeStatement::everybody(attr("x", "/A", &["1"])),
            AttributeStatement::copy_parent_attribute(attr("role", "/", &[])),
        ],
    )
    .unwrap()]);
    let resolver = EffectiveAttributesResolver::new(repo);
    let index = AttributeIndex::from_direct([attr("role", "/", &["admin"]), attr("own", "/A", &["1"])]);

    let result = resolver.resolve(&group("/A"), Some("role"), &groups(&["/", "/A"]), index);
    assert_eq!(result.len(), 1);
    assert!(result.contains_key("role"));
}

#[test]
fn test_resolver_ignores_groups_the_entity_is_not_in() {
    let repo = repository(vec![
        GroupStatements::new(
            group("/A"),
            vec![AttributeStatement::has_subgroup_attribute(
                attr("x", "/A/B", &[]),
                attr("y", "/A", &["1"]),
            )],
        )
        .unwrap(),
        GroupStatements::new(
            group("/A/B"),
            vec![AttributeStatement::member_of(group("/C"), attr("x", "/A/B", &["1"]))],
        )
        .unwrap(),
    ]);
    let resolver = EffectiveAttributesResolver::new(repo);

    let outside = groups(&["/", "/A", "/C"]);
    let result = resolver.resolve(&group("/A"), None, &outside, AttributeIndex::new());
    assert!(!result.contains_key("y"));

    let inside = groups(&["/", "/A", "/A/B", "/C"]);
    let result = resolver.resolve(&group("/A"), None, &inside, AttributeIndex::new());
    assert_eq!(result["y"].attribute.values, vec!["1"]);
}
