use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::consolidate::ConsolidatedItem;
use crate::domain::{Group, WheelStructure};
use crate::error::{Irregularity, ParseError};

pub const FALLBACK_GROUP_COLOR: &str = "#94A3B8";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GroupBy {
    #[default]
    Rings,
    Labels,
    ActivityGroups,
}

impl GroupBy {
    fn groups(self, structure: &WheelStructure) -> &[Group] {
        match self {
            GroupBy::Rings => &structure.rings,
            GroupBy::Labels => &structure.labels,
            GroupBy::ActivityGroups => &structure.activity_groups,
        }
    }
}

impl Display for GroupBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupBy::Rings => write!(f, "rings"),
            GroupBy::Labels => write!(f, "labels"),
            GroupBy::ActivityGroups => write!(f, "activity-groups"),
        }
    }
}

impl FromStr for GroupBy {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "rings" | "ring" => Ok(GroupBy::Rings),
            "labels" | "label" => Ok(GroupBy::Labels),
            "activity-groups" | "activitygroups" | "activity_groups" | "activities" => {
                Ok(GroupBy::ActivityGroups)
            }
            _ => Err(ParseError::GroupBy(input.to_string())),
        }
    }
}

/// Row key of the grouped view. `Unlabeled` is its own variant so no real
/// label id can collide with the fallback bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Group(String),
    Unlabeled,
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Group(id) => write!(f, "{id}"),
            GroupKey::Unlabeled => write!(f, "unlabeled"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub type GroupedItems = IndexMap<GroupKey, Vec<ConsolidatedItem>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub grouped: GroupedItems,
    pub irregularities: Vec<Irregularity>,
}

/// Display name and color of a row header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupInfo {
    pub name: String,
    pub color: String,
}

/// Buckets items into rows of the chosen dimension, sorted by start date.
///
/// Every visible group gets a bucket even when empty; grouping by label adds a
/// trailing `Unlabeled` bucket. Items whose label is unknown fall back to
/// `Unlabeled`. Items whose ring or activity group is unknown are left out of
/// the grouped view. Items of hidden groups are left out in every dimension.
pub fn group_items(items: &[ConsolidatedItem], structure: &WheelStructure, group_by: GroupBy) -> Grouping {
    let mut grouping = Grouping::default();

    for group in group_by.groups(structure).iter().filter(|group| group.visible) {
        grouping
            .grouped
            .insert(GroupKey::Group(group.id.clone()), Vec::new());
    }
    if group_by == GroupBy::Labels {
        grouping.grouped.insert(GroupKey::Unlabeled, Vec::new());
    }

    for item in items {
        let Some(key) = resolve_key(item, structure, group_by, &mut grouping.irregularities) else {
            continue;
        };
        if let Some(bucket) = grouping.grouped.get_mut(&key) {
            bucket.push(item.clone());
        }
    }

    for bucket in grouping.grouped.values_mut() {
        bucket.sort_by_key(|item| item.start_date());
    }

    grouping
}

fn resolve_key(
    item: &ConsolidatedItem,
    structure: &WheelStructure,
    group_by: GroupBy,
    irregularities: &mut Vec<Irregularity>,
) -> Option<GroupKey> {
    match group_by {
        GroupBy::Labels => {
            let Some(label_id) = item.item.label_id.as_deref() else {
                return Some(GroupKey::Unlabeled);
            };
            if structure.label(label_id).is_some() {
                return Some(GroupKey::Group(label_id.to_string()));
            }
            tracing::debug!(item = item.id(), label = label_id, "unknown label, using unlabeled bucket");
            irregularities.push(Irregularity::UnresolvedLabelReference {
                item_id: item.id().to_string(),
                label_id: label_id.to_string(),
            });
            Some(GroupKey::Unlabeled)
        }
        GroupBy::Rings | GroupBy::ActivityGroups => {
            let group_id = if group_by == GroupBy::Rings {
                &item.item.ring_id
            } else {
                &item.item.activity_id
            };
            let known = group_by.groups(structure).iter().any(|group| &group.id == group_id);
            if !known {
                tracing::debug!(item = item.id(), group = %group_id, "unknown {group_by} reference, item left out");
                irregularities.push(Irregularity::UnresolvedGroupReference {
                    item_id: item.id().to_string(),
                    group_id: group_id.clone(),
                });
                return None;
            }
            Some(GroupKey::Group(group_id.clone()))
        }
    }
}

/// Header name and color for a row, with the fallbacks used for unknown keys.
pub fn group_info(key: &GroupKey, structure: &WheelStructure, group_by: GroupBy) -> GroupInfo {
    let group = match key {
        GroupKey::Group(id) => group_by.groups(structure).iter().find(|group| &group.id == id),
        GroupKey::Unlabeled => None,
    };

    match group {
        Some(group) => GroupInfo {
            name: group.name.clone(),
            color: group
                .color
                .clone()
                .unwrap_or_else(|| FALLBACK_GROUP_COLOR.to_string()),
        },
        None => GroupInfo {
            name: if group_by == GroupBy::Labels {
                "Unlabeled".to_string()
            } else {
                "Unknown".to_string()
            },
            color: FALLBACK_GROUP_COLOR.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use crate::consolidate::ConsolidatedItem;
    use crate::domain::fixtures::{date, item, structure};
    use crate::error::Irregularity;

    use super::{GroupBy, GroupKey, group_info, group_items};

    fn key(id: &str) -> GroupKey {
        GroupKey::Group(id.to_string())
    }

    #[test]
    fn unlabeled_items_land_in_the_fallback_bucket() {
        let items = vec![ConsolidatedItem::standalone(item("a", date(2025, 1, 1), date(2025, 1, 2)))];
        let grouping = group_items(&items, &structure(), GroupBy::Labels);

        assert_eq!(grouping.grouped.len(), 2);
        assert_eq!(grouping.grouped.get_index(1).map(|(key, _)| key), Some(&GroupKey::Unlabeled));
        assert_eq!(grouping.grouped[&GroupKey::Unlabeled].len(), 1);
        assert!(grouping.grouped[&key("label-a")].is_empty());
        assert!(grouping.irregularities.is_empty());
    }

    #[test]
    fn unknown_label_falls_back_and_is_reported() {
        let mut tagged = item("a", date(2025, 1, 1), date(2025, 1, 2));
        tagged.label_id = Some("gone".to_string());
        let grouping = group_items(&[ConsolidatedItem::standalone(tagged)], &structure(), GroupBy::Labels);

        assert_eq!(grouping.grouped[&GroupKey::Unlabeled].len(), 1);
        assert!(matches!(
            grouping.irregularities.as_slice(),
            [Irregularity::UnresolvedLabelReference { .. }]
        ));
    }

    #[test]
    fn unknown_ring_is_left_out_of_every_bucket() {
        let mut stray = item("stray", date(2025, 1, 1), date(2025, 1, 2));
        stray.ring_id = "missing".to_string();
        let items = vec![
            ConsolidatedItem::standalone(stray),
            ConsolidatedItem::standalone(item("ok", date(2025, 2, 1), date(2025, 2, 2))),
        ];

        let grouping = group_items(&items, &structure(), GroupBy::Rings);
        let placed = grouping
            .grouped
            .values()
            .flatten()
            .map(|item| item.id())
            .collect::<Vec<_>>();
        assert_eq!(placed, vec!["ok"]);
        assert!(grouping.grouped.contains_key(&key("ring-b")));
        assert!(!grouping.grouped.contains_key(&GroupKey::Unlabeled));
        assert_eq!(
            grouping.irregularities,
            vec![Irregularity::UnresolvedGroupReference {
                item_id: "stray".to_string(),
                group_id: "missing".to_string(),
            }]
        );
    }

    #[test]
    fn hidden_groups_get_no_bucket() {
        let mut registry = structure();
        registry.activity_groups[1].visible = false;
        let mut event = item("e", date(2025, 1, 1), date(2025, 1, 2));
        event.activity_id = "act-b".to_string();

        let grouping = group_items(&[ConsolidatedItem::standalone(event)], &registry, GroupBy::ActivityGroups);
        assert_eq!(grouping.grouped.len(), 1);
        assert!(grouping.grouped[&key("act-a")].is_empty());
        assert!(grouping.irregularities.is_empty());
    }

    #[test]
    fn buckets_are_sorted_by_start_date() {
        let items = vec![
            ConsolidatedItem::standalone(item("late", date(2025, 9, 1), date(2025, 9, 2))),
            ConsolidatedItem::standalone(item("early", date(2025, 2, 1), date(2025, 2, 2))),
        ];
        let grouping = group_items(&items, &structure(), GroupBy::Rings);
        let ids = grouping.grouped[&key("ring-a")]
            .iter()
            .map(|item| item.id())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn group_info_uses_fallback_names() {
        let registry = structure();
        assert_eq!(group_info(&key("ring-b"), &registry, GroupBy::Rings).name, "Sales");
        assert_eq!(group_info(&GroupKey::Unlabeled, &registry, GroupBy::Labels).name, "Unlabeled");
        assert_eq!(group_info(&key("nope"), &registry, GroupBy::Rings).name, "Unknown");
    }

    #[test]
    fn parses_grouping_names() {
        assert_eq!("activity-groups".parse::<GroupBy>().expect("parse"), GroupBy::ActivityGroups);
        assert_eq!("Labels".parse::<GroupBy>().expect("parse"), GroupBy::Labels);
        assert!("colors".parse::<GroupBy>().is_err());
    }

    proptest! {
        #[test]
        fn every_resolvable_item_lands_in_exactly_one_bucket(
            refs in prop::collection::vec((0usize..3, 0usize..3, 0usize..3), 0..20),
            dimension in prop_oneof![Just(GroupBy::Rings), Just(GroupBy::Labels), Just(GroupBy::ActivityGroups)],
        ) {
            let rings = ["ring-a", "ring-b", "ring-x"];
            let activities = ["act-a", "act-b", "act-x"];
            let labels = [Some("label-a"), None, Some("label-x")];

            let items = refs
                .iter()
                .enumerate()
                .map(|(index, (ring, activity, label))| {
                    let mut raw = item(&format!("i{index}"), date(2025, 1, 1), date(2025, 1, 2));
                    raw.ring_id = rings[*ring].to_string();
                    raw.activity_id = activities[*activity].to_string();
                    raw.label_id = labels[*label].map(str::to_string);
                    ConsolidatedItem::standalone(raw)
                })
                .collect::<Vec<_>>();

            let grouping = group_items(&items, &structure(), dimension);
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for placed in grouping.grouped.values().flatten() {
                *seen.entry(placed.id()).or_default() += 1;
            }

            for (index, (ring, activity, _)) in refs.iter().enumerate() {
                let id = format!("i{index}");
                let expected = match dimension {
                    GroupBy::Rings => usize::from(*ring != 2),
                    GroupBy::ActivityGroups => usize::from(*activity != 2),
                    GroupBy::Labels => 1,
                };
                prop_assert_eq!(seen.get(id.as_str()).copied().unwrap_or(0), expected);
            }
        }
    }
}
