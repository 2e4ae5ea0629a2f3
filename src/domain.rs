use chrono::{Datelike, NaiveDate, NaiveTime};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use serde::{Deserialize, Serialize};

const ID_LEN: usize = 12;

/// Ring, label, or activity group. All three dimensions share the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub ring_id: String,
    pub activity_id: String,
    #[serde(default)]
    pub label_id: Option<String>,
    #[serde(default)]
    pub cross_year_group_id: Option<String>,
    #[serde(default, with = "clock")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub description: Option<String>,
    /// Year of the page the item was read from. Filled in by the aggregator.
    #[serde(default)]
    pub page_year: i32,
}

impl CalendarItem {
    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn end_year(&self) -> i32 {
        self.end_date.year()
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    pub year: i32,
    #[serde(default)]
    pub items: Vec<CalendarItem>,
}

/// Group definitions for the three grouping dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelStructure {
    #[serde(default)]
    pub rings: Vec<Group>,
    #[serde(default, alias = "activities")]
    pub activity_groups: Vec<Group>,
    #[serde(default)]
    pub labels: Vec<Group>,
}

impl WheelStructure {
    pub fn ring(&self, id: &str) -> Option<&Group> {
        self.rings.iter().find(|ring| ring.id == id)
    }

    pub fn activity_group(&self, id: &str) -> Option<&Group> {
        self.activity_groups.iter().find(|group| group.id == id)
    }

    pub fn label(&self, id: &str) -> Option<&Group> {
        self.labels.iter().find(|label| label.id == id)
    }
}

/// A wheel document as stored on disk: group registry plus year pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wheel {
    #[serde(flatten)]
    pub structure: WheelStructure,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Wheel {
    pub fn item(&self, id: &str) -> Option<&CalendarItem> {
        self.pages
            .iter()
            .flat_map(|page| page.items.iter())
            .find(|item| item.id == id)
    }
}

pub fn generate_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// Serde glue for optional `HH:MM` / `HH:MM:SS` clock strings.
mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Ok(None);
        };
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Datelike, NaiveDate};

    use super::{CalendarItem, Group, Page, WheelStructure};

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("fixture date should be valid")
    }

    pub fn item(id: &str, start: NaiveDate, end: NaiveDate) -> CalendarItem {
        CalendarItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            start_date: start,
            end_date: end,
            ring_id: "ring-a".to_string(),
            activity_id: "act-a".to_string(),
            label_id: None,
            cross_year_group_id: None,
            time: None,
            description: None,
            page_year: start.year(),
        }
    }

    pub fn linked(id: &str, start: NaiveDate, end: NaiveDate, group: &str) -> CalendarItem {
        let mut item = item(id, start, end);
        item.cross_year_group_id = Some(group.to_string());
        item
    }

    pub fn group(id: &str, name: &str) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            color: Some("#94A3B8".to_string()),
            visible: true,
        }
    }

    pub fn structure() -> WheelStructure {
        WheelStructure {
            rings: vec![group("ring-a", "Marketing"), group("ring-b", "Sales")],
            activity_groups: vec![group("act-a", "Campaigns"), group("act-b", "Events")],
            labels: vec![group("label-a", "Important")],
        }
    }

    pub fn page(year: i32, items: Vec<CalendarItem>) -> Page {
        Page { year, items }
    }
}

#[cfg(test)]
mod tests {
    use super::{Wheel, generate_id};

    #[test]
    fn parses_wheel_document_with_legacy_activity_key() {
        let raw = r##"{
            "rings": [{ "id": "r1", "name": "Ring", "color": "#112233" }],
            "activities": [{ "id": "a1", "name": "Campaign", "color": "#445566", "visible": false }],
            "labels": [],
            "pages": [{
                "year": 2025,
                "items": [{
                    "id": "i1",
                    "name": "Launch",
                    "startDate": "2025-03-01",
                    "endDate": "2025-03-10",
                    "ringId": "r1",
                    "activityId": "a1",
                    "labelId": null,
                    "time": "09:30"
                }]
            }]
        }"##;

        let wheel: Wheel = serde_json::from_str(raw).expect("wheel should parse");
        assert!(wheel.structure.rings[0].visible);
        assert_eq!(wheel.structure.activity_groups.len(), 1);
        assert!(!wheel.structure.activity_groups[0].visible);

        let item = wheel.item("i1").expect("item should exist");
        assert_eq!(item.label_id, None);
        assert_eq!(item.cross_year_group_id, None);
        assert_eq!(item.time.map(|time| time.format("%H:%M").to_string()), Some("09:30".to_string()));
    }

    #[test]
    fn generated_ids_are_alphanumeric() {
        let id = generate_id();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }
}
