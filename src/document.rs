use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

pub const EXPECTED_SHAPE: &str = "expected a JSON object with a top-level `weeks` mapping";

/// A full timetable document. Weeks keep their document order so that keys
/// with equal (or absent) embedded numbers sort stably.
#[derive(Debug, Clone, Default)]
pub struct Document {
    weeks: Vec<(String, Week)>,
}

#[derive(Debug, Clone, Default)]
pub struct Week {
    pub label: Option<String>,
    pub range: Option<String>,
    pub days: HashMap<String, Day>,
}

#[derive(Debug, Clone, Default)]
pub struct Day {
    pub date: Option<String>,
    slots: HashMap<String, SlotValue>,
}

/// One day/slot cell value, resolved once at decode time. Anything that is
/// neither a string, an object nor an array decodes to `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Empty,
    Text(String),
    One(Event),
    Many(Vec<Event>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub title: Option<String>,
    pub meta: Option<String>,
    pub tag: Option<String>,
    pub color: Option<String>,
    pub duration: Option<f64>,
}

/// Parse raw JSON text into a document, applying the shape check. Used
/// identically for every source: network, disk, embedded and uploads.
pub fn parse_document(raw: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(raw).context("document is not valid JSON")?;
    Document::from_value(value)
}

impl Document {
    pub fn from_value(value: Value) -> Result<Document> {
        let Some(weeks) = value.get("weeks").and_then(Value::as_object) else {
            bail!("invalid timetable document: {EXPECTED_SHAPE}");
        };

        let weeks = weeks
            .iter()
            .map(|(key, value)| (key.clone(), Week::from_value(value)))
            .collect();

        Ok(Document { weeks })
    }

    pub fn week(&self, key: &str) -> Option<&Week> {
        self.weeks
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, week)| week)
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Week keys ordered by the first decimal integer embedded in each key.
    /// Keys without digits order as 0; ties keep document order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.weeks.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort_by_key(|key| embedded_number(key));
        keys
    }

    /// The auto-selected week: lowest-numbered key, if any.
    pub fn first_key(&self) -> Option<&str> {
        self.sorted_keys().first().copied()
    }
}

fn embedded_number(key: &str) -> u64 {
    let digits: String = key
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    digits.parse().unwrap_or(0)
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

impl Week {
    fn from_value(value: &Value) -> Week {
        let Some(object) = value.as_object() else {
            return Week::default();
        };

        let days = object
            .get("days")
            .and_then(Value::as_object)
            .map(|days| {
                days.iter()
                    .map(|(key, value)| (key.clone(), Day::from_value(value)))
                    .collect()
            })
            .unwrap_or_default();

        Week {
            label: string_field(object, "label"),
            range: string_field(object, "range"),
            days,
        }
    }

    pub fn day(&self, key: &str) -> Option<&Day> {
        self.days.get(key)
    }
}

impl Day {
    fn from_value(value: &Value) -> Day {
        let Some(object) = value.as_object() else {
            return Day::default();
        };

        let slots = object
            .iter()
            .filter(|(key, _)| key.as_str() != "date")
            .map(|(key, value)| (key.clone(), SlotValue::from_value(value)))
            .collect();

        Day {
            date: string_field(object, "date"),
            slots,
        }
    }

    pub fn slot(&self, key: &str) -> &SlotValue {
        self.slots.get(key).unwrap_or(&SlotValue::Empty)
    }
}

impl SlotValue {
    fn from_value(value: &Value) -> SlotValue {
        match value {
            Value::String(text) => SlotValue::Text(text.clone()),
            Value::Array(items) => {
                SlotValue::Many(items.iter().map(Event::from_value).collect())
            }
            Value::Object(object) => SlotValue::One(Event::from_object(object)),
            _ => SlotValue::Empty,
        }
    }
}

impl Event {
    fn from_value(value: &Value) -> Event {
        match value.as_object() {
            Some(object) => Event::from_object(object),
            None => Event::default(),
        }
    }

    fn from_object(object: &Map<String, Value>) -> Event {
        Event {
            title: string_field(object, "title"),
            meta: string_field(object, "meta"),
            tag: string_field(object, "tag"),
            color: string_field(object, "color"),
            duration: object.get("duration").and_then(Value::as_f64),
        }
    }

    /// Number of consecutive slot rows this event spans. Missing,
    /// non-positive and fractional durations clamp to an integer >= 1.
    pub fn rows(&self) -> usize {
        let rows = self.duration.unwrap_or(0.0) as i64;
        if rows < 1 {
            1
        } else {
            rows as usize
        }
    }
}
