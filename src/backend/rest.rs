//! PostgREST-style HTTP client for the trip tables and RPC.
//!
//! Reads are column-projected selects with embedded aggregate resources
//! (`activities(count)`, `expenses(amount)`); the projection and filter
//! strings live in pure builder functions so the request shapes are
//! testable without a server. Every request carries the publishable API
//! key plus, when signed in, the session's bearer token — row visibility
//! is the backend's concern.

use async_trait::async_trait;
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::auth::AuthGateway;
use crate::backend::{NewTrip, Trip, TripApi, TripDay, TripSummary};
use crate::config::BackendConfig;
use crate::error::ApiError;

// =============================================================================
// QUERY BUILDERS
// =============================================================================

fn trips_query() -> String {
    "select=id,title,start_date,end_date,updated_at,owner_id,activities(count)&order=updated_at.desc".to_owned()
}

fn trip_detail_query(trip_id: Uuid) -> String {
    format!("select=id,title,start_date,end_date,currency_code,updated_at,owner_id&id=eq.{trip_id}&limit=1")
}

fn trip_days_query(trip_id: Uuid, limit: Option<u32>) -> String {
    let mut query = format!(
        "select=id,title,trip_id,day_index,date,activities(count),expenses(amount)&trip_id=eq.{trip_id}&order=day_index.asc"
    );
    if let Some(limit) = limit {
        query.push_str(&format!("&limit={limit}"));
    }
    query
}

// =============================================================================
// WIRE ROWS
// =============================================================================

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

/// Embedded aggregate arrays come back as `[{"count": n}]`.
fn embedded_count(rows: &[CountRow]) -> i64 {
    rows.first().map_or(0, |row| row.count)
}

#[derive(Debug, Deserialize)]
struct ExpenseRow {
    /// Numeric columns may arrive as JSON numbers or strings depending on
    /// the backend's decimal handling; absent amounts count as zero.
    #[serde(default)]
    amount: serde_json::Value,
}

fn amount_as_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn expense_total(rows: &[ExpenseRow]) -> f64 {
    rows.iter().map(|row| amount_as_f64(&row.amount)).sum()
}

#[derive(Debug, Deserialize)]
struct TripSummaryRow {
    id: Uuid,
    title: String,
    start_date: Date,
    end_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
    owner_id: Uuid,
    #[serde(default)]
    activities: Vec<CountRow>,
}

impl From<TripSummaryRow> for TripSummary {
    fn from(row: TripSummaryRow) -> Self {
        let activity_count = embedded_count(&row.activities);
        Self {
            id: row.id,
            title: row.title,
            start_date: row.start_date,
            end_date: row.end_date,
            updated_at: row.updated_at,
            owner_id: row.owner_id,
            activity_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TripDayRow {
    id: Uuid,
    title: String,
    trip_id: Uuid,
    day_index: i32,
    date: Date,
    #[serde(default)]
    activities: Vec<CountRow>,
    #[serde(default)]
    expenses: Vec<ExpenseRow>,
}

impl From<TripDayRow> for TripDay {
    fn from(row: TripDayRow) -> Self {
        let activity_count = embedded_count(&row.activities);
        let expense_total = expense_total(&row.expenses);
        Self {
            id: row.id,
            trip_id: row.trip_id,
            day_index: row.day_index,
            date: row.date,
            title: row.title,
            activity_count,
            expense_total,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// reqwest-backed [`TripApi`] against the backend's `/rest/v1` surface.
#[derive(Clone)]
pub struct RestTripApi {
    config: BackendConfig,
    gateway: AuthGateway,
    client: reqwest::Client,
}

impl RestTripApi {
    #[must_use]
    pub fn new(config: BackendConfig, gateway: AuthGateway) -> Self {
        Self { config, gateway, client: reqwest::Client::new() }
    }

    fn bearer_token(&self) -> String {
        self.gateway
            .current_session()
            .map_or_else(|| self.config.api_key.clone(), |session| session.access_token)
    }

    async fn select<T: for<'de> Deserialize<'de>>(&self, table: &str, query: &str) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/rest/v1/{table}?{query}", self.config.base_url);
        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = map_status(resp)?;
        resp.json::<Vec<T>>()
            .await
            .map_err(|e| ApiError::Network(format!("unexpected response shape: {e}")))
    }
}

fn map_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status.as_u16() {
        401 | 403 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        _ => Err(ApiError::Network(format!("backend returned {status}"))),
    }
}

#[async_trait]
impl TripApi for RestTripApi {
    async fn list_trips(&self) -> Result<Vec<TripSummary>, ApiError> {
        let rows: Vec<TripSummaryRow> = self.select("trips", &trips_query()).await?;
        Ok(rows.into_iter().map(TripSummary::from).collect())
    }

    async fn trip_detail(&self, trip_id: Uuid) -> Result<Trip, ApiError> {
        let mut rows: Vec<Trip> = self.select("trips", &trip_detail_query(trip_id)).await?;
        match rows.pop() {
            Some(trip) => Ok(trip),
            None => Err(ApiError::NotFound),
        }
    }

    async fn trip_days(&self, trip_id: Uuid, limit: Option<u32>) -> Result<Vec<TripDay>, ApiError> {
        let rows: Vec<TripDayRow> = self.select("trip_days", &trip_days_query(trip_id, limit)).await?;
        Ok(rows.into_iter().map(TripDay::from).collect())
    }

    async fn create_trip_with_days(&self, new_trip: &NewTrip) -> Result<Uuid, ApiError> {
        let url = format!("{}/rest/v1/rpc/create_trip_with_days", self.config.base_url);
        let body = serde_json::json!({
            "p_title": new_trip.title,
            "p_start_date": new_trip.start_date,
            "p_end_date": new_trip.end_date,
            "p_currency_code": new_trip.currency_code(),
        });
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = map_status(resp)?;
        resp.json::<Uuid>()
            .await
            .map_err(|e| ApiError::Network(format!("unexpected rpc response: {e}")))
    }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
