use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Megabox,
    Lotte,
}

impl Chain {
    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Megabox => "Megabox",
            Chain::Lotte => "Lotte Cinema",
        }
    }
}

/// How the user named a theater or movie on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Display name, resolved through the CSV lookup tables.
    Name(String),
    /// Chain-internal code, sent as-is.
    Code(String),
}

impl Selector {
    pub fn as_str(&self) -> &str {
        match self {
            Selector::Name(value) | Selector::Code(value) => value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleQuery {
    pub theater: Selector,
    pub movie: Selector,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub theater_code: String,
    pub movie_code: String,
    pub theater_label: String,
    pub movie_label: String,
    pub date: NaiveDate,
}

/// One screening, normalized across chains. The upstream APIs drop fields
/// freely, so everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    pub movie_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub screen_name: Option<String>,
    pub remaining_seats: Option<u32>,
    pub total_seats: Option<u32>,
}

/// Seat counts arrive as numbers from one chain and sometimes as strings from
/// the other; anything unparseable becomes `None`.
pub fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Same leniency for text fields: numbers are stringified, null stays `None`.
pub fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_count")]
        seats: Option<u32>,
        #[serde(default, deserialize_with = "lenient_text")]
        label: Option<String>,
    }

    #[test]
    fn test_lenient_count_accepts_numbers_and_strings() {
        let row: Row = serde_json::from_str(r#"{"seats": 120}"#).unwrap();
        assert_eq!(row.seats, Some(120));

        let row: Row = serde_json::from_str(r#"{"seats": " 87 "}"#).unwrap();
        assert_eq!(row.seats, Some(87));

        let row: Row = serde_json::from_str(r#"{"seats": "n/a"}"#).unwrap();
        assert_eq!(row.seats, None);

        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.seats, None);
    }

    #[test]
    fn test_lenient_text_stringifies_numbers() {
        let row: Row = serde_json::from_str(r#"{"label": 7}"#).unwrap();
        assert_eq!(row.label.as_deref(), Some("7"));

        let row: Row = serde_json::from_str(r#"{"label": null}"#).unwrap();
        assert_eq!(row.label, None);
    }
}
