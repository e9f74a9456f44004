use super::MetricsClient;
use crate::config::Settings;
use crate::core::data::{CategoryTotal, DailyMetrics, ProjectTotal};
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const DAILY_SUMMARY_QUERY: &str = r#"
query GetDailyMetrics($start: ISO8601Date!, $end: ISO8601Date!) {
  summaries(startDate: $start, endDate: $end, bucketSize: "day") {
    workHours
    focusTime
    breakTime
    meetingTime
    trackedTime
    categories {
      category {
        name
      }
      timeSpent
    }
  }
}
"#;

const PROJECT_ENTRIES_QUERY: &str = r#"
query GetProjectEntries($start: ISO8601DateTime!, $end: ISO8601DateTime!) {
  projectTimeEntries(startTime: $start, endTime: $end) {
    duration
    project {
      name
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Serialize)]
struct RangeVariables {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<serde_json::Value>,
}

impl GraphQlError {
    fn is_auth_failure(&self) -> bool {
        let code = self
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(|code| code.as_str())
            .unwrap_or_default();
        if matches!(code, "UNAUTHENTICATED" | "UNAUTHORIZED") {
            return true;
        }
        let message = self.message.to_lowercase();
        message.contains("unauthorized") || message.contains("not authenticated")
    }
}

#[derive(Debug, Deserialize)]
struct SummariesData {
    summaries: Option<SummaryPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryPayload {
    Many(Vec<Summary>),
    One(Summary),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    work_hours: Option<f64>,
    focus_time: Option<f64>,
    break_time: Option<f64>,
    meeting_time: Option<f64>,
    categories: Option<Vec<CategoryEntry>>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(rename = "type", alias = "category")]
    kind: Option<NamedRef>,
    #[serde(rename = "trackedTime", alias = "timeSpent")]
    tracked_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectEntriesData {
    #[serde(default)]
    project_time_entries: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectEntry {
    #[serde(default)]
    duration: Option<f64>,
    project: Option<NamedRef>,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: Option<String>,
}

/// GraphQL client for the Rize API.
pub struct RizeClient {
    client: Client,
    api_url: String,
    api_key: SecretString,
}

impl RizeClient {
    pub fn new(settings: &Settings) -> AppResult<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("rize-sync/", env!("CARGO_PKG_VERSION")))
                .timeout(settings.request_timeout)
                .build()
                .map_err(|e| AppError::Remote(format!("Failed to create HTTP client: {}", e)))?,
            api_url: settings.api_url.clone(),
            api_key: SecretString::from(settings.api_key.expose_secret().to_string()),
        })
    }

    async fn post<V: Serialize + Send + Sync>(&self, query: &str, variables: V) -> AppResult<String> {
        debug!(url = %self.api_url, "sending GraphQL request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Remote(format!("Request to Rize API timed out: {}", e))
                } else {
                    AppError::Remote(format!("Failed to reach Rize API: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to read Rize API response: {}", e)))?;

        debug!(%status, bytes = body.len(), "received GraphQL response");
        check_status(status, &body)?;
        Ok(body)
    }
}

#[async_trait]
impl MetricsClient for RizeClient {
    async fn fetch_metrics(&self, date: NaiveDate) -> AppResult<DailyMetrics> {
        let day = date.format("%Y-%m-%d").to_string();
        let variables = RangeVariables {
            start: day.clone(),
            end: day,
        };
        let body = self.post(DAILY_SUMMARY_QUERY, variables).await?;
        parse_summary_response(date, &body)
    }

    async fn fetch_categories(&self, date: NaiveDate) -> AppResult<Vec<CategoryTotal>> {
        let day = date.format("%Y-%m-%d").to_string();
        let variables = RangeVariables {
            start: day.clone(),
            end: day,
        };
        let body = self.post(DAILY_SUMMARY_QUERY, variables).await?;
        parse_category_response(date, &body)
    }

    async fn fetch_projects(&self, date: NaiveDate) -> AppResult<Vec<ProjectTotal>> {
        let day = date.format("%Y-%m-%d");
        let variables = RangeVariables {
            start: format!("{}T00:00:00Z", day),
            end: format!("{}T23:59:59Z", day),
        };
        let body = self.post(PROJECT_ENTRIES_QUERY, variables).await?;
        parse_project_response(&body)
    }
}

fn check_status(status: StatusCode, body: &str) -> AppResult<()> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AppError::Auth(format!(
            "Rize API rejected the API key ({})",
            status
        )));
    }
    if !status.is_success() {
        return Err(AppError::Remote(format!(
            "Rize API returned {} - {}",
            status,
            body.trim()
        )));
    }
    Ok(())
}

/// Decode the `data` member of a GraphQL response, classifying `errors`.
fn graphql_data<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Schema(format!("Response is not valid GraphQL JSON: {}", e)))?;

    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        let joined = messages.join("; ");
        return if response.errors.iter().any(GraphQlError::is_auth_failure) {
            Err(AppError::Auth(joined))
        } else {
            Err(AppError::Remote(format!("GraphQL errors: {}", joined)))
        };
    }

    let data = response
        .data
        .filter(|data| !data.is_null())
        .ok_or_else(|| AppError::Schema("Response has no data".to_string()))?;

    serde_json::from_value(data)
        .map_err(|e| AppError::Schema(format!("Unexpected response shape: {}", e)))
}

/// The day bucket of a summaries response; a list yields its first bucket.
fn first_summary(date: NaiveDate, body: &str) -> AppResult<Summary> {
    let data: SummariesData = graphql_data(body)?;

    match data.summaries {
        Some(SummaryPayload::One(summary)) => Ok(summary),
        Some(SummaryPayload::Many(list)) => list
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Schema(format!("No summary returned for {}", date))),
        None => Err(AppError::Schema(format!("No summary returned for {}", date))),
    }
}

fn parse_summary_response(date: NaiveDate, body: &str) -> AppResult<DailyMetrics> {
    let summary = first_summary(date, body)?;

    Ok(DailyMetrics::from_seconds(
        date,
        require_seconds("workHours", summary.work_hours)?,
        require_seconds("focusTime", summary.focus_time)?,
        require_seconds("breakTime", summary.break_time)?,
        require_seconds("meetingTime", summary.meeting_time)?,
    ))
}

fn require_seconds(field: &str, value: Option<f64>) -> AppResult<f64> {
    match value {
        // Adding zero turns -0.0 into 0.0
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds + 0.0),
        Some(seconds) => Err(AppError::Schema(format!(
            "Field {} has invalid duration {}",
            field, seconds
        ))),
        None => Err(AppError::Schema(format!("Summary is missing field {}", field))),
    }
}

fn parse_category_response(date: NaiveDate, body: &str) -> AppResult<Vec<CategoryTotal>> {
    let summary = first_summary(date, body)?;

    let mut totals: HashMap<String, u64> = HashMap::new();
    for entry in summary.categories.unwrap_or_default() {
        let name = entry.kind.and_then(|kind| kind.name);
        add_seconds(&mut totals, name, entry.tracked_time);
    }

    Ok(ranked(totals)
        .into_iter()
        .map(|(name, seconds)| CategoryTotal { name, seconds })
        .collect())
}

fn parse_project_response(body: &str) -> AppResult<Vec<ProjectTotal>> {
    let data: ProjectEntriesData = graphql_data(body)?;

    let mut totals: HashMap<String, u64> = HashMap::new();
    for entry in data.project_time_entries {
        let Some(project) = entry.project else {
            continue;
        };
        add_seconds(&mut totals, project.name, entry.duration);
    }

    Ok(ranked(totals)
        .into_iter()
        .map(|(name, seconds)| ProjectTotal { name, seconds })
        .collect())
}

fn add_seconds(totals: &mut HashMap<String, u64>, name: Option<String>, seconds: Option<f64>) {
    let name = name.unwrap_or_else(|| "Unknown".to_string());
    let seconds = seconds.unwrap_or(0.0).max(0.0).round() as u64;
    *totals.entry(name).or_insert(0) += seconds;
}

/// Largest total first, ties by name.
fn ranked(totals: HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_summary_object_converted_to_hours() {
        let body = r#"{
            "data": {
                "summaries": {
                    "workHours": 18000,
                    "focusTime": 3600,
                    "breakTime": 600,
                    "meetingTime": 0,
                    "trackedTime": 18000
                }
            }
        }"#;
        let metrics = parse_summary_response(day(), body).unwrap();
        assert_eq!(metrics.date, day());
        assert_eq!(metrics.work_hours, 5.0);
        assert_eq!(metrics.focus_time, 1.0);
        assert_eq!(metrics.break_time, 0.17);
        assert_eq!(metrics.meeting_time, 0.0);
    }

    #[test]
    fn test_summary_list_uses_first_bucket() {
        let body = r#"{"data": {"summaries": [
            {"workHours": 15300, "focusTime": 9000, "breakTime": 1800, "meetingTime": 3600},
            {"workHours": 1, "focusTime": 1, "breakTime": 1, "meetingTime": 1}
        ]}}"#;
        let metrics = parse_summary_response(day(), body).unwrap();
        assert_eq!(metrics.work_hours, 4.25);
        assert_eq!(metrics.focus_time, 2.5);
        assert_eq!(metrics.break_time, 0.5);
        assert_eq!(metrics.meeting_time, 1.0);
    }

    #[test]
    fn test_empty_summary_list_is_schema_error() {
        let body = r#"{"data": {"summaries": []}}"#;
        let err = parse_summary_response(day(), body).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let body = r#"{"data": {"summaries": {"workHours": 10, "focusTime": 1, "breakTime": 1}}}"#;
        let err = parse_summary_response(day(), body).unwrap_err();
        assert_eq!(
            err,
            AppError::Schema("Summary is missing field meetingTime".to_string())
        );
    }

    #[test]
    fn test_negative_duration_is_schema_error() {
        let body = r#"{"data": {"summaries": {"workHours": -5, "focusTime": 1, "breakTime": 1, "meetingTime": 1}}}"#;
        assert!(matches!(
            parse_summary_response(day(), body),
            Err(AppError::Schema(_))
        ));
    }

    #[test]
    fn test_non_json_is_schema_error() {
        let err = parse_summary_response(day(), "<html>oops</html>").unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn test_graphql_error_is_remote_error() {
        let body = r#"{"errors": [{"message": "Field 'summaries' doesn't accept argument 'bucketSize'"}]}"#;
        let err = parse_summary_response(day(), body).unwrap_err();
        assert!(matches!(err, AppError::Remote(_)));
    }

    #[test]
    fn test_graphql_auth_error_is_auth_error() {
        let body = r#"{"errors": [{"message": "Denied", "extensions": {"code": "UNAUTHENTICATED"}}]}"#;
        assert!(matches!(
            parse_summary_response(day(), body),
            Err(AppError::Auth(_))
        ));

        let body = r#"{"data": null, "errors": [{"message": "Unauthorized access"}]}"#;
        assert!(matches!(
            parse_summary_response(day(), body),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK, "").is_ok());
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED, ""),
            Err(AppError::Auth(_))
        ));
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN, ""),
            Err(AppError::Auth(_))
        ));
        let err = check_status(StatusCode::INTERNAL_SERVER_ERROR, "boom\n").unwrap_err();
        assert_eq!(
            err,
            AppError::Remote("Rize API returned 500 Internal Server Error - boom".to_string())
        );
    }

    #[test]
    fn test_negative_zero_normalized() {
        let body = r#"{"data": {"summaries": {"workHours": -0.0, "focusTime": 0, "breakTime": 0, "meetingTime": 0}}}"#;
        let metrics = parse_summary_response(day(), body).unwrap();
        assert!(metrics.work_hours.is_sign_positive());
        assert_eq!(crate::core::frontmatter::format_hours(metrics.work_hours), "0.0");
    }

    #[test]
    fn test_categories_sorted_by_time() {
        let body = r#"{
            "data": {
                "summaries": {
                    "workHours": 18000,
                    "focusTime": 3600,
                    "breakTime": 600,
                    "meetingTime": 0,
                    "trackedTime": 18000,
                    "categories": [
                        {"type": {"name": "Meeting"}, "timeSpent": 3600},
                        {"type": {"name": "Coding"}, "timeSpent": 7200}
                    ]
                }
            }
        }"#;
        let categories = parse_category_response(day(), body).unwrap();
        assert_eq!(
            categories,
            vec![
                CategoryTotal { name: "Coding".to_string(), seconds: 7200 },
                CategoryTotal { name: "Meeting".to_string(), seconds: 3600 },
            ]
        );

        let metrics = parse_summary_response(day(), body).unwrap();
        assert_eq!(metrics.work_hours, 5.0);
    }

    #[test]
    fn test_categories_aliased_fields_and_missing_list() {
        let body = r#"{"data": {"summaries": [{
            "workHours": 1, "focusTime": 1, "breakTime": 1, "meetingTime": 1,
            "categories": [
                {"type": {"name": "Design"}, "trackedTime": 1200},
                {"category": {"name": "Design"}, "trackedTime": 600},
                {"type": null, "trackedTime": 60}
            ]
        }]}}"#;
        let categories = parse_category_response(day(), body).unwrap();
        assert_eq!(
            categories,
            vec![
                CategoryTotal { name: "Design".to_string(), seconds: 1800 },
                CategoryTotal { name: "Unknown".to_string(), seconds: 60 },
            ]
        );

        let body = r#"{"data": {"summaries": {"workHours": 1, "focusTime": 1, "breakTime": 1, "meetingTime": 1}}}"#;
        assert!(parse_category_response(day(), body).unwrap().is_empty());
    }

    #[test]
    fn test_project_entries_aggregated() {
        let body = r#"{"data": {"projectTimeEntries": [
            {"duration": 3600, "project": {"name": "Project A"}},
            {"duration": 1800, "project": {"name": "Project B"}},
            {"duration": 2400, "project": {"name": "Project B"}},
            {"duration": 999, "project": null}
        ]}}"#;
        let projects = parse_project_response(body).unwrap();
        assert_eq!(
            projects,
            vec![
                ProjectTotal { name: "Project B".to_string(), seconds: 4200 },
                ProjectTotal { name: "Project A".to_string(), seconds: 3600 },
            ]
        );
    }

    #[test]
    fn test_project_entries_empty() {
        let body = r#"{"data": {"projectTimeEntries": []}}"#;
        assert!(parse_project_response(body).unwrap().is_empty());
    }
}
