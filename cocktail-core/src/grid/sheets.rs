//! Google Sheets (v4 REST API) backend.
//!
//! Authentication is not handled here: the caller supplies an OAuth bearer
//! token, e.g. one minted from a service account with
//! `gcloud auth print-access-token`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Grid, GridError, Workbook};
use crate::error::ConfigError;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Sheets backend configuration.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// OAuth bearer token with the spreadsheets scope.
    pub token: String,
    pub spreadsheet_id: Option<String>,
    pub base_url: String,
}

impl SheetsConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GOOGLE_SHEETS_TOKEN`: OAuth bearer token
    ///
    /// Optional:
    /// - `COCKTAIL_SPREADSHEET_ID`: target spreadsheet
    /// - `COCKTAIL_SHEETS_BASE_URL`: API base (default: the public v4 endpoint)
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("GOOGLE_SHEETS_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("GOOGLE_SHEETS_TOKEN".to_string()))?;

        let spreadsheet_id = std::env::var("COCKTAIL_SPREADSHEET_ID")
            .ok()
            .filter(|id| !id.is_empty());

        let base_url = std::env::var("COCKTAIL_SHEETS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_SHEETS_BASE_URL.to_string());

        Ok(Self {
            token,
            spreadsheet_id,
            base_url,
        })
    }
}

/// Spreadsheet column name for a 1-based column index (1 -> A, 27 -> AA).
pub fn column_letter(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn a1_range(title: &str, row: u32, col: u32) -> String {
    format!("{}!{}{}", quote_title(title), column_letter(col), row)
}

fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn classify(status: u16, body: &str, row: u32, col: u32) -> GridError {
    match status {
        429 => GridError::RateLimited,
        400 if body.contains("exceeds grid limits") => GridError::OutOfBounds { row, col },
        _ => GridError::Backend(format!("HTTP {}: {}", status, body)),
    }
}

struct SheetsApi {
    http: reqwest::Client,
    token: String,
    spreadsheet_url: String,
}

impl SheetsApi {
    fn values_url(&self, range: &str) -> Result<url::Url, GridError> {
        let mut url = url::Url::parse(&self.spreadsheet_url)
            .map_err(|e| GridError::Backend(format!("Invalid spreadsheet URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GridError::Backend("Spreadsheet URL cannot be a base".to_string()))?
            .push("values")
            .push(range);
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        row: u32,
        col: u32,
    ) -> Result<reqwest::Response, GridError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GridError::Backend(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, row, col, "sheets: request failed");
        Err(classify(status.as_u16(), &body, row, col))
    }

    async fn batch_update(&self, requests: Value) -> Result<BatchUpdateResponse, GridError> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url);
        let response = self
            .send(
                self.http.post(url).json(&json!({ "requests": requests })),
                0,
                0,
            )
            .await?;
        response
            .json()
            .await
            .map_err(|e| GridError::Backend(format!("Invalid batchUpdate response: {}", e)))
    }

    async fn put_values(
        &self,
        range: &str,
        values: Vec<Vec<&str>>,
        row: u32,
        col: u32,
    ) -> Result<(), GridError> {
        let url = self.values_url(range)?;
        let body = json!({ "range": range, "majorDimension": "ROWS", "values": values });
        self.send(
            self.http
                .put(url)
                .query(&[("valueInputOption", "RAW")])
                .json(&body),
            row,
            col,
        )
        .await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// A spreadsheet reached through the Sheets API.
pub struct SheetsWorkbook {
    api: Arc<SheetsApi>,
}

impl SheetsWorkbook {
    pub fn new(config: &SheetsConfig, spreadsheet_id: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            api: Arc::new(SheetsApi {
                http,
                token: config.token.clone(),
                spreadsheet_url: format!(
                    "{}/{}",
                    config.base_url.trim_end_matches('/'),
                    spreadsheet_id
                ),
            }),
        })
    }
}

#[async_trait]
impl Workbook for SheetsWorkbook {
    type Sheet = SheetsGrid;

    async fn add_sheet(&self, title: &str, rows: u32, cols: u32) -> Result<SheetsGrid, GridError> {
        let response = self
            .api
            .batch_update(json!([{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]))
            .await?;

        let sheet_id = response
            .replies
            .first()
            .and_then(|reply| reply.pointer("/addSheet/properties/sheetId"))
            .and_then(Value::as_i64)
            .ok_or_else(|| GridError::Backend("addSheet reply has no sheetId".to_string()))?;

        tracing::info!(title, sheet_id, rows, cols, "sheets: created sheet");
        Ok(SheetsGrid {
            api: Arc::clone(&self.api),
            title: title.to_string(),
            sheet_id,
            rows: AtomicU32::new(rows),
            cols,
        })
    }
}

/// One sheet of a [`SheetsWorkbook`].
pub struct SheetsGrid {
    api: Arc<SheetsApi>,
    title: String,
    sheet_id: i64,
    rows: AtomicU32,
    cols: u32,
}

impl SheetsGrid {
    pub fn title(&self) -> &str {
        &self.title
    }

    fn check_bounds(&self, row: u32, col: u32) -> Result<(), GridError> {
        if row == 0 || col == 0 || row > self.rows.load(Ordering::Relaxed) || col > self.cols {
            return Err(GridError::OutOfBounds { row, col });
        }
        Ok(())
    }
}

#[async_trait]
impl Grid for SheetsGrid {
    async fn get_cell(&self, row: u32, col: u32) -> Result<Option<String>, GridError> {
        self.check_bounds(row, col)?;
        let url = self.api.values_url(&a1_range(&self.title, row, col))?;
        let response = self.api.send(self.api.http.get(url), row, col).await?;
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| GridError::Backend(format!("Invalid values response: {}", e)))?;

        Ok(range
            .values
            .into_iter()
            .next()
            .and_then(|cells| cells.into_iter().next())
            .map(|cell| match cell {
                Value::String(s) => s,
                other => other.to_string(),
            }))
    }

    async fn set_cell(&self, row: u32, col: u32, value: &str) -> Result<(), GridError> {
        self.check_bounds(row, col)?;
        self.api
            .put_values(&a1_range(&self.title, row, col), vec![vec![value]], row, col)
            .await
    }

    async fn insert_header_row(&self, values: &[&str]) -> Result<(), GridError> {
        if values.len() > self.cols as usize {
            return Err(GridError::OutOfBounds {
                row: 1,
                col: values.len() as u32,
            });
        }

        self.api
            .batch_update(json!([{
                "insertDimension": {
                    "range": {
                        "sheetId": self.sheet_id,
                        "dimension": "ROWS",
                        "startIndex": 0,
                        "endIndex": 1
                    },
                    "inheritFromBefore": false
                }
            }]))
            .await?;
        let rows = self.rows.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(title = self.title(), rows, "sheets: inserted header row");

        if values.is_empty() {
            return Ok(());
        }
        let range = format!(
            "{}!A1:{}1",
            quote_title(&self.title),
            column_letter(values.len() as u32)
        );
        self.api.put_values(&range, vec![values.to_vec()], 1, 1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(3), "C");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn ranges_quote_sheet_titles() {
        assert_eq!(a1_range("Ingredient to Drink", 7, 2), "'Ingredient to Drink'!B7");
        assert_eq!(a1_range("Bob's", 1, 1), "'Bob''s'!A1");
    }

    #[test]
    fn status_classification() {
        assert_eq!(classify(429, "", 3, 1), GridError::RateLimited);
        assert!(classify(429, "", 3, 1).is_transient());
        assert_eq!(
            classify(400, "Range ('X'!A101) exceeds grid limits. Max rows: 100", 101, 1),
            GridError::OutOfBounds { row: 101, col: 1 }
        );
        assert!(matches!(classify(403, "forbidden", 1, 1), GridError::Backend(_)));
    }

    #[test]
    fn values_url_escapes_range() {
        let api = SheetsApi {
            http: reqwest::Client::new(),
            token: "t".to_string(),
            spreadsheet_url: "https://sheets.example/v4/spreadsheets/abc".to_string(),
        };
        let url = api.values_url("'Ingredients'!C9").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example/v4/spreadsheets/abc/values/'Ingredients'!C9"
        );
    }
}
