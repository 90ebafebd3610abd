//! Output formats for advanced search results.
//!
//! JSON items use the camelCase wire names clients already consume. CSV is a
//! fixed five-column export meant for spreadsheets.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use hub_core::{AuthorSummary, ContentRecord, ContentType, Error, Result, SearchResultSet, Visibility};

/// CSV header line. Column order is fixed.
pub const CSV_HEADER: &str = "Title,Description,ContentType,PublishDate,URL";

/// Content-Type of CSV responses.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Content-Disposition of CSV responses.
pub const CSV_CONTENT_DISPOSITION: &str = "attachment; filename=\"search_results.csv\"";

/// Requested response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse the `format` request parameter.
    ///
    /// Absent or empty means JSON. Values are matched exactly.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("") | Some("json") => Ok(OutputFormat::Json),
            Some("csv") => Ok(OutputFormat::Csv),
            Some(_) => Err(Error::invalid_field("format", "Must be one of: json, csv")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Author of a result, as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorItem {
    pub username: String,
    pub email: Option<String>,
    pub is_aws_employee: bool,
}

impl From<&AuthorSummary> for AuthorItem {
    fn from(author: &AuthorSummary) -> Self {
        Self {
            username: author.username.clone(),
            email: author.email.clone(),
            is_aws_employee: author.is_aws_employee,
        }
    }
}

/// One search result in the JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub visibility: Visibility,
    pub publish_date: Option<DateTime<Utc>>,
    pub capture_date: DateTime<Utc>,
    pub metrics: BTreeMap<String, f64>,
    pub tags: Vec<String>,
    pub is_claimed: bool,
    pub original_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorItem>,
}

impl From<&ContentRecord> for SearchResultItem {
    fn from(record: &ContentRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title.clone(),
            description: record.description.clone(),
            content_type: record.content_type,
            visibility: record.visibility,
            publish_date: record.publish_date,
            capture_date: record.capture_date,
            metrics: record.metrics.clone(),
            tags: record.tags.clone(),
            is_claimed: record.is_claimed,
            original_author: record.original_author.clone(),
            url: record.url.clone(),
            relevance_score: record.rank,
            author: record.author.as_ref().map(AuthorItem::from),
        }
    }
}

/// The `data` member of a JSON search response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResults {
    pub results: Vec<SearchResultItem>,
    /// Number of returned rows, not the total number of matches.
    pub count: usize,
    /// The query as submitted.
    pub query: String,
}

impl SearchResults {
    pub fn new(query: impl Into<String>, set: &SearchResultSet) -> Self {
        let results: Vec<SearchResultItem> = set.results.iter().map(SearchResultItem::from).collect();
        Self {
            count: results.len(),
            results,
            query: query.into(),
        }
    }
}

/// Render results as CSV. Zero rows yields the header only.
///
/// Rows are separated by `\n` with no trailing terminator.
pub fn to_csv(records: &[ContentRecord]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER.split(','))
        .map_err(csv_error)?;
    for record in records {
        let publish_date = record
            .publish_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        wtr.write_record([
            record.title.as_str(),
            record.description.as_deref().unwrap_or(""),
            record.content_type.as_str(),
            publish_date.as_str(),
            record.url.as_deref().unwrap_or(""),
        ])
        .map_err(csv_error)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::Serialization(format!("CSV flush failed: {}", e)))?;
    let mut out =
        String::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

fn csv_error(e: csv::Error) -> Error {
    Error::Serialization(format!("CSV write failed: {}", e))
}
