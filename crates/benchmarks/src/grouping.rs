// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Grouping of results by instance taxonomy.
//!
//! Items are keyed by the decomposition of their instance name, sorted so
//! that members of a group are adjacent, split into groups on adjacency and
//! finally ordered by size inside every group. All sorts are stable, so
//! ties keep their input order.

use perfsheet_core::instance::OrderPart;
use perfsheet_core::{InstanceKey, InstanceTaxonomy};
use std::cmp::Ordering;

/// An item together with its decomposed instance key.
#[derive(Debug, Clone, PartialEq)]
pub struct Member<T> {
    /// Decomposed instance key, including size.
    pub key: InstanceKey,
    /// The grouped item.
    pub item: T,
}

/// Items sharing every taxonomy field except size.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    /// Shared key; `size` is always absent.
    pub key: InstanceKey,
    /// Members, ascending by size once ordered.
    pub members: Vec<Member<T>>,
}

impl<T> Group<T> {
    /// Items in member order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.members.iter().map(|m| &m.item)
    }
}

type SortKey = (
    Vec<OrderPart>,
    (Option<String>, Option<String>, Option<String>, Option<String>),
);

/// Groups and orders items with a provider taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct GroupingEngine<'a> {
    taxonomy: &'a dyn InstanceTaxonomy,
}

impl<'a> GroupingEngine<'a> {
    /// Engine using `taxonomy` for decomposition and group order.
    pub fn new(taxonomy: &'a dyn InstanceTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Partition `items` into ordered groups.
    ///
    /// `name` returns the instance identifier of an item. Groups come out in
    /// cross-group order and each group is ordered by size.
    pub fn group<T, F>(&self, items: impl IntoIterator<Item = T>, name: F) -> Vec<Group<T>>
    where
        F: Fn(&T) -> &str,
    {
        let mut keyed: Vec<(SortKey, Member<T>)> = items
            .into_iter()
            .map(|item| {
                let key = self.taxonomy.decompose(name(&item));
                (self.sort_key(&key), Member { key, item })
            })
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let mut groups: Vec<Group<T>> = Vec::new();
        for (_, member) in keyed {
            match groups.last_mut() {
                Some(group) if group.key.same_group(&member.key) => group.members.push(member),
                _ => groups.push(Group {
                    key: InstanceKey {
                        size: None,
                        ..member.key.clone()
                    },
                    members: vec![member],
                }),
            }
        }

        for group in &mut groups {
            order_within_group(group);
        }
        self.cross_group_order(&mut groups);
        groups
    }

    /// Order groups by the taxonomy's provider-specific key.
    pub fn cross_group_order<T>(&self, groups: &mut [Group<T>]) {
        groups.sort_by(|a, b| {
            self.taxonomy
                .order_key(&a.key)
                .cmp(&self.taxonomy.order_key(&b.key))
        });
    }

    fn sort_key(&self, key: &InstanceKey) -> SortKey {
        (
            self.taxonomy.order_key(key),
            (
                key.family.clone(),
                key.version.clone(),
                key.sub_family.clone(),
                key.feature.clone(),
            ),
        )
    }
}

/// Sort members ascending by size; absent sizes go last.
pub fn order_within_group<T>(group: &mut Group<T>) {
    group
        .members
        .sort_by(|a, b| compare_size(a.key.size, b.key.size));
}

fn compare_size(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsheet_core::instance::{AwsTaxonomy, AzureTaxonomy, GcpTaxonomy, LocalTaxonomy};

    fn names<'a>(groups: &'a [Group<&'a str>]) -> Vec<Vec<&'a str>> {
        groups
            .iter()
            .map(|g| g.items().copied().collect())
            .collect()
    }

    #[test]
    fn test_gcp_groups_sorted_by_size() {
        let taxonomy = GcpTaxonomy;
        let engine = GroupingEngine::new(&taxonomy);
        let groups = engine.group(
            vec![
                "n2-standard-32",
                "c3-standard-8",
                "n2-standard-8",
                "n2-standard-16",
            ],
            |s| *s,
        );
        assert_eq!(
            names(&groups),
            vec![
                vec!["c3-standard-8"],
                vec!["n2-standard-8", "n2-standard-16", "n2-standard-32"],
            ]
        );
        assert_eq!(groups[1].key.family.as_deref(), Some("n2-standard"));
        assert_eq!(groups[1].key.size, None);
    }

    #[test]
    fn test_members_share_group_fields() {
        let taxonomy = AzureTaxonomy;
        let engine = GroupingEngine::new(&taxonomy);
        let groups = engine.group(
            vec!["D4s", "E8", "D4s", "D16s", "D4", "bogus_name"],
            |s| *s,
        );
        for group in &groups {
            for member in &group.members {
                assert!(member.key.same_group(&group.key));
            }
        }
        assert_eq!(
            names(&groups),
            vec![
                vec!["D4s", "D4s"],
                vec!["D4"],
                vec!["D16s"],
                vec!["E8"],
                vec!["bogus_name"],
            ]
        );
    }

    #[test]
    fn test_absent_size_sorts_last() {
        let taxonomy = AwsTaxonomy;
        let engine = GroupingEngine::new(&taxonomy);
        let groups = engine.group(
            vec!["m5.xlarge", "m5.4xlarge", "m5.large", "m5.2xlarge"],
            |s| *s,
        );
        assert_eq!(
            names(&groups),
            vec![vec!["m5.2xlarge", "m5.4xlarge", "m5.xlarge", "m5.large"]]
        );
    }

    #[test]
    fn test_ungroupable_sorts_last() {
        let taxonomy = GcpTaxonomy;
        let engine = GroupingEngine::new(&taxonomy);
        let groups = engine.group(vec!["odd", "a2-highgpu-1", "e2-micro"], |s| *s);
        assert_eq!(
            names(&groups),
            vec![vec!["a2-highgpu-1"], vec!["odd", "e2-micro"]]
        );
        assert!(groups[1].key.is_ungroupable());
    }

    #[test]
    fn test_grouping_is_input_order_independent() {
        let taxonomy = LocalTaxonomy;
        let engine = GroupingEngine::new(&taxonomy);
        let forward = engine.group(vec!["b", "a", "c"], |s| *s);
        let backward = engine.group(vec!["c", "a", "b"], |s| *s);
        assert_eq!(names(&forward), names(&backward));
        assert_eq!(names(&forward), vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    fn member(size: Option<u32>, item: i32) -> Member<i32> {
        let key = InstanceKey {
            size,
            ..InstanceKey::family("x")
        };
        Member { key, item }
    }

    #[test]
    fn test_order_within_group_is_stable() {
        let mut group = Group {
            key: InstanceKey::family("x"),
            members: vec![
                member(None, 1),
                member(Some(2), 2),
                member(None, 3),
                member(Some(1), 4),
            ],
        };
        order_within_group(&mut group);
        assert_eq!(group.items().copied().collect::<Vec<_>>(), vec![4, 2, 1, 3]);
    }
}
