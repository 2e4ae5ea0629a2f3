use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::grouping::{GroupKey, GroupedItems};
use crate::time_scale::TimeScale;

/// Narrowest bar drawn for very short items.
pub const MIN_BAR_WIDTH: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub header_height: f64,
    pub row_height: f64,
    /// Floor for the canvas height so an empty chart still has a frame.
    pub min_height: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            header_height: 36.0,
            row_height: 40.0,
            min_height: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    pub item_id: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: GroupKey,
    pub y: f64,
    pub expanded: bool,
    pub item_count: usize,
    /// Empty when the group is collapsed.
    pub rows: Vec<ItemRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GanttLayout {
    pub groups: Vec<GroupRow>,
    pub total_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPlacement {
    pub item_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

pub fn compute_layout(
    grouped: &GroupedItems,
    expanded: &HashSet<GroupKey>,
    metrics: &LayoutMetrics,
) -> GanttLayout {
    let mut y = 0.0;
    let mut groups = Vec::with_capacity(grouped.len());

    for (key, items) in grouped {
        let group_y = y;
        y += metrics.header_height;

        let is_expanded = expanded.contains(key);
        let mut rows = Vec::new();
        if is_expanded {
            for item in items {
                rows.push(ItemRow {
                    item_id: item.id().to_string(),
                    y,
                });
                y += metrics.row_height;
            }
        }

        groups.push(GroupRow {
            key: key.clone(),
            y: group_y,
            expanded: is_expanded,
            item_count: items.len(),
            rows,
        });
    }

    GanttLayout {
        groups,
        total_height: y.max(metrics.min_height),
    }
}

/// Horizontal extent of every visible row. End dates count as whole days.
pub fn place_bars(layout: &GanttLayout, grouped: &GroupedItems, scale: &TimeScale) -> Vec<BarPlacement> {
    let mut bars = Vec::new();

    for group in layout.groups.iter().filter(|group| group.expanded) {
        let Some(items) = grouped.get(&group.key) else {
            continue;
        };
        for (row, item) in group.rows.iter().zip(items) {
            let start_x = scale.day_to_x(item.start_date());
            let end_x = match item.end_date().succ_opt() {
                Some(next) => scale.day_to_x(next),
                None => scale.date_to_x(NaiveDateTime::MAX),
            };
            bars.push(BarPlacement {
                item_id: row.item_id.clone(),
                x: start_x,
                y: row.y,
                width: (end_x - start_x).max(MIN_BAR_WIDTH),
            });
        }
    }

    bars
}
