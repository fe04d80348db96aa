use chrono::{DateTime, Utc};
use csv::StringRecord;

use crate::columns::{ColumnMap, Field};
use crate::normalize::{parse_date, parse_number};

/// One post after normalisation. Every record carries a valid date; rows
/// without one never become a `PostRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    /// Zero-based position among the data rows of the source file.
    pub index: usize,
    pub date: DateTime<Utc>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
    /// `None` when the export has no views column or the cell is unparseable.
    pub views: Option<f64>,
    pub followers: Option<f64>,
    /// Engagement rate in percent.
    pub er: Option<f64>,
    /// Interaction/view rate in percent.
    pub ivr: Option<f64>,
    pub url: Option<String>,
    pub territory: Option<String>,
}

impl PostRecord {
    /// Builds a record from one CSV row, or `None` when the date cell does
    /// not parse.
    ///
    /// Missing likes/comments columns count as zero; a missing followers
    /// column falls back to `fallback_followers`. ER and IVR columns, when
    /// present, are taken verbatim and never re-derived.
    #[must_use]
    pub fn from_row(
        index: usize,
        row: &StringRecord,
        columns: &ColumnMap,
        fallback_followers: f64,
    ) -> Option<Self> {
        let cell = |field: Field| columns.index(field).map(|i| row.get(i).unwrap_or(""));
        let number = |field: Field| cell(field).and_then(parse_number);
        let text = |field: Field| {
            cell(field)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        let date = cell(Field::Date).and_then(parse_date)?;

        let count_or_zero = |field: Field| {
            if columns.has(field) {
                number(field)
            } else {
                Some(0.0)
            }
        };
        let likes = count_or_zero(Field::Likes);
        let comments = count_or_zero(Field::Comments);
        let views = number(Field::Views);
        let followers = if columns.has(Field::Followers) {
            number(Field::Followers)
        } else {
            Some(fallback_followers)
        };

        let er = if columns.has(Field::Er) {
            number(Field::Er)
        } else {
            rate(likes, comments, followers)
        };
        let ivr = if columns.has(Field::Ivr) {
            number(Field::Ivr)
        } else {
            rate(likes, comments, views)
        };

        Some(Self {
            index,
            date,
            likes,
            comments,
            views,
            followers,
            er,
            ivr,
            url: text(Field::Url),
            territory: text(Field::Territory),
        })
    }
}

/// `(likes + comments) / denominator * 100`, undefined when any input is
/// undefined or the denominator is zero.
#[must_use]
pub fn rate(likes: Option<f64>, comments: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator.filter(|d| *d != 0.0)?;
    let value = (likes? + comments?) / denominator * 100.0;
    value.is_finite().then_some(value)
}
