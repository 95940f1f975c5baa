//! Shared grouping of a snapshot into (assignee, day) buckets.
//!
//! Every analysis reads the snapshot through this index so that all of them
//! agree on which items share a calendar lane and in which order they run.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::debug;

use crate::models::item::{AssigneeKey, ScheduledItem, TimeInterval};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub assignee: AssigneeKey,
    pub day: NaiveDate,
}

/// An item paired with its resolved interval.
#[derive(Debug, Clone, Copy)]
pub struct TimedItem<'a> {
    pub item: &'a ScheduledItem,
    pub interval: TimeInterval,
}

impl<'a> TimedItem<'a> {
    pub fn id(&self) -> &'a str {
        &self.item.id
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.interval.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.interval.end
    }

    pub fn duration_minutes(&self) -> i64 {
        self.interval.duration_minutes()
    }

    pub fn day(&self) -> NaiveDate {
        self.interval.day()
    }
}

pub struct IntervalIndex<'a> {
    groups: BTreeMap<GroupKey, Vec<TimedItem<'a>>>,
    unscheduled: Vec<&'a ScheduledItem>,
}

impl<'a> IntervalIndex<'a> {
    /// Groups active items by assignee and start day, each group sorted by
    /// `(start, end, id)`. Cancelled items are skipped; items without a
    /// parsable start are kept aside in [`IntervalIndex::unscheduled`].
    pub fn build(items: &'a [ScheduledItem]) -> Self {
        let mut groups: BTreeMap<GroupKey, Vec<TimedItem<'a>>> = BTreeMap::new();
        let mut unscheduled = Vec::new();

        for item in items.iter().filter(|item| item.is_active()) {
            match item.interval() {
                Some(interval) => {
                    let key = GroupKey {
                        assignee: item.assignee_key(),
                        day: interval.day(),
                    };
                    groups.entry(key).or_default().push(TimedItem { item, interval });
                }
                None => unscheduled.push(item),
            }
        }

        for group in groups.values_mut() {
            group.sort_by(|a, b| {
                a.start()
                    .cmp(&b.start())
                    .then_with(|| a.end().cmp(&b.end()))
                    .then_with(|| a.id().cmp(b.id()))
            });
        }
        unscheduled.sort_by(|a, b| a.id.cmp(&b.id));

        debug!(
            target: "app::index",
            groups = groups.len(),
            unscheduled = unscheduled.len(),
            "interval index built"
        );

        Self {
            groups,
            unscheduled,
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, &[TimedItem<'a>])> {
        self.groups
            .iter()
            .map(|(key, items)| (key, items.as_slice()))
    }

    pub fn group(&self, key: &GroupKey) -> &[TimedItem<'a>] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Every scheduled item, ordered by group key then start.
    pub fn timed_items(&self) -> impl Iterator<Item = &TimedItem<'a>> {
        self.groups.values().flatten()
    }

    /// Active items that have no usable start timestamp.
    pub fn unscheduled(&self) -> &[&'a ScheduledItem] {
        &self.unscheduled
    }

    /// Scheduled items bucketed by day only, preserving group order inside
    /// each day.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Vec<&TimedItem<'a>>> {
        let mut days: BTreeMap<NaiveDate, Vec<&TimedItem<'a>>> = BTreeMap::new();
        for (key, items) in &self.groups {
            days.entry(key.day).or_default().extend(items.iter());
        }
        days
    }

    pub fn day_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.groups.keys().map(|key| key.day).min()?;
        let last = self.groups.keys().map(|key| key.day).max()?;
        Some((first, last))
    }
}
