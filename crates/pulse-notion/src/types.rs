//! Notion property shapes and response types.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Page properties keyed by column name.
pub type Properties = Map<String, Value>;

const RICH_TEXT_LIMIT: usize = 1900;
const TITLE_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightType {
    WeeklyPulse,
    PredictiveTest,
}

impl InsightType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InsightType::WeeklyPulse => "Weekly Pulse",
            InsightType::PredictiveTest => "Predictive Test",
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
        }
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[must_use]
pub fn rich_text(text: &str) -> Value {
    json!({
        "rich_text": [{ "type": "text", "text": { "content": truncate_chars(text, RICH_TEXT_LIMIT) } }]
    })
}

#[must_use]
pub fn title(text: &str) -> Value {
    json!({
        "title": [{ "type": "text", "text": { "content": truncate_chars(text, TITLE_LIMIT) } }]
    })
}

#[must_use]
pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

#[must_use]
pub fn date(day: NaiveDate) -> Value {
    json!({ "date": { "start": day.format("%Y-%m-%d").to_string() } })
}

/// A database page as returned by query, create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Display fields pulled out of a published insight page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightSummary {
    pub id: String,
    pub date: Option<String>,
    pub insight_type: Option<String>,
    pub title: String,
    pub metric: Option<String>,
}

impl Page {
    /// Flattens the page into display fields. Missing properties are tolerated.
    #[must_use]
    pub fn summary(&self) -> InsightSummary {
        let props = &self.properties;
        let first_text = |name: &str, kind: &str| -> Option<String> {
            props
                .get(name)?
                .get(kind)?
                .get(0)
                .and_then(|t| {
                    t.get("plain_text")
                        .or_else(|| t.get("text").and_then(|inner| inner.get("content")))
                })
                .and_then(Value::as_str)
                .map(ToString::to_string)
        };

        let title = first_text("Title", "title")
            .or_else(|| first_text("Headline", "rich_text"))
            .unwrap_or_else(|| "Untitled".to_string());
        let metric = first_text("Metric", "rich_text").or_else(|| {
            props
                .get("Metric")
                .and_then(|m| m.get("number"))
                .and_then(Value::as_f64)
                .map(|n| n.to_string())
        });
        let insight_type = props
            .get("Insight Type")
            .and_then(|s| s.get("select"))
            .and_then(|s| s.get("name"))
            .and_then(Value::as_str)
            .map(ToString::to_string);
        let date = props
            .get("Date")
            .and_then(|d| d.get("date"))
            .and_then(|d| d.get("start"))
            .and_then(Value::as_str)
            .map(ToString::to_string);

        InsightSummary {
            id: self.id.clone(),
            date,
            insight_type,
            title,
            metric,
        }
    }
}
