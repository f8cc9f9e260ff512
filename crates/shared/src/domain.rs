use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Card priority. Values other than the three known ones are carried through
/// untouched so a save never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub fn label(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        match value {
            Priority::High => "high".to_string(),
            Priority::Medium => "medium".to_string(),
            Priority::Low => "low".to_string(),
            Priority::Other(raw) => raw,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}' (expected high, medium or low)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<NaiveDate>,
    /// Fields this crate does not model; stored and returned as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: CardId::generate(),
            text: text.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BoardList {
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            cards: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Cleared date inputs post `""`; treat it the same as `null`.
fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Starter board used when seeding an empty database.
pub fn sample_lists() -> Vec<BoardList> {
    fn card(
        id: &str,
        text: &str,
        description: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Card {
        Card {
            id: CardId::from(id),
            text: text.to_string(),
            description: description.to_string(),
            priority,
            due_date,
            extra: Map::new(),
        }
    }

    vec![
        BoardList {
            id: ListId(1),
            title: "To Do".to_string(),
            extra: Map::new(),
            cards: vec![
                card(
                    "1-1",
                    "Strategic Planning",
                    "Review Q4 goals",
                    Priority::High,
                    NaiveDate::from_ymd_opt(2024, 12, 31),
                ),
                card(
                    "1-2",
                    "Budget Review",
                    "Analyze Q1 spending",
                    Priority::Medium,
                    None,
                ),
            ],
        },
        BoardList {
            id: ListId(2),
            title: "In Progress".to_string(),
            extra: Map::new(),
            cards: vec![card(
                "2-1",
                "Team Updates",
                "Collect department reports",
                Priority::High,
                NaiveDate::from_ymd_opt(2024, 12, 25),
            )],
        },
        BoardList {
            id: ListId(3),
            title: "Done".to_string(),
            extra: Map::new(),
            cards: vec![card(
                "3-1",
                "Meeting Prep",
                "Prepare agenda items",
                Priority::Low,
                None,
            )],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_uses_camel_case_due_date() {
        let card = Card {
            id: CardId::from("1-1"),
            text: "Ship".into(),
            description: String::new(),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            extra: Map::new(),
        };
        let value = serde_json::to_value(&card).expect("json");
        assert_eq!(value["dueDate"], "2024-12-31");
        assert_eq!(value["priority"], "high");
    }

    #[test]
    fn empty_due_date_string_means_no_due_date() {
        let card: Card = serde_json::from_value(serde_json::json!({
            "id": "2-5",
            "text": "Call vendor",
            "description": "",
            "priority": "low",
            "dueDate": ""
        }))
        .expect("card");
        assert_eq!(card.due_date, None);
        assert_eq!(card.priority, Priority::Low);
    }

    #[test]
    fn missing_optional_card_fields_use_defaults() {
        let card: Card =
            serde_json::from_value(serde_json::json!({ "id": "x", "text": "Bare" })).expect("card");
        assert_eq!(card.description, "");
        assert_eq!(card.priority, Priority::Medium);
        assert!(card.due_date.is_none());
    }

    #[test]
    fn rejects_malformed_due_date() {
        serde_json::from_value::<Card>(serde_json::json!({
            "id": "x",
            "text": "Bad",
            "dueDate": "31/12/2024"
        }))
        .expect_err("should fail");
    }

    #[test]
    fn list_ids_are_json_numbers() {
        let list = BoardList::new(ListId(1700000000000), "Backlog");
        let value = serde_json::to_value(&list).expect("json");
        assert_eq!(value["id"], 1700000000000_i64);
        assert_eq!(value["cards"], serde_json::json!([]));
    }

    #[test]
    fn unknown_fields_and_priorities_survive_a_round_trip() {
        let raw = serde_json::json!({
            "id": 1,
            "title": "A",
            "color": "blue",
            "cards": [{
                "id": "c",
                "text": "t",
                "priority": "urgent",
                "labels": ["x"]
            }]
        });
        let list: BoardList = serde_json::from_value(raw).expect("list");
        assert_eq!(list.extra["color"], "blue");
        assert_eq!(list.cards[0].priority, Priority::Other("urgent".into()));
        assert_eq!(list.cards[0].priority.label(), "urgent");

        let value = serde_json::to_value(&list).expect("json");
        assert_eq!(value["color"], "blue");
        assert_eq!(value["cards"][0]["labels"], serde_json::json!(["x"]));
        assert_eq!(value["cards"][0]["priority"], "urgent");
    }

    #[test]
    fn parses_priority_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn sample_board_has_unique_ids() {
        let lists = sample_lists();
        let mut list_ids: Vec<_> = lists.iter().map(|l| l.id).collect();
        list_ids.dedup();
        assert_eq!(list_ids.len(), 3);
        for list in &lists {
            let mut ids: Vec<_> = list.cards.iter().map(|c| c.id.0.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), list.cards.len());
        }
    }
}
