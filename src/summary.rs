use anyhow::Result;
use axum::{Json, extract::State, http::StatusCode};
use libsql::{Value, params::Params};

use crate::database::Db;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiQuery;
use crate::middleware::AuthUser;
use crate::models::{Summary, SummaryFilter, SummaryQuery};

const SUMMARY_SELECT: &str = "SELECT \
    TOTAL(CASE WHEN type = 'income' THEN amount ELSE 0 END), \
    TOTAL(CASE WHEN type = 'expense' THEN amount ELSE 0 END) \
    FROM transactions WHERE user_id = ?";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Blank parameters are dropped; a category that is present must be an integer.
pub fn parse_summary_query(query: SummaryQuery) -> ApiResult<SummaryFilter> {
    let category = match non_blank(query.category) {
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            ApiError::validation(format!("category must be an integer, got '{}'", raw))
        })?),
        None => None,
    };

    Ok(SummaryFilter {
        category,
        start_date: non_blank(query.start_date),
        end_date: non_blank(query.end_date),
    })
}

/// Builds the aggregation statement. Every supplied filter narrows the result;
/// date bounds are inclusive and compared as strings.
pub fn build_summary_query(user_id: &str, filter: &SummaryFilter) -> (String, Vec<Value>) {
    let mut sql = SUMMARY_SELECT.to_string();
    let mut params = vec![Value::Text(user_id.to_string())];

    if let Some(category) = filter.category {
        sql.push_str(" AND category = ?");
        params.push(Value::Integer(category));
    }
    if let Some(start) = &filter.start_date {
        sql.push_str(" AND date >= ?");
        params.push(Value::Text(start.clone()));
    }
    if let Some(end) = &filter.end_date {
        sql.push_str(" AND date <= ?");
        params.push(Value::Text(end.clone()));
    }

    (sql, params)
}

pub async fn compute_summary(db: &Db, user_id: &str, filter: &SummaryFilter) -> Result<Summary> {
    let (sql, params) = build_summary_query(user_id, filter);
    let conn = db.read().await;
    let mut rows = conn.query(&sql, Params::Positional(params)).await?;

    // TOTAL() always yields exactly one row, 0.0 when nothing matched.
    match rows.next().await? {
        Some(row) => Ok(Summary::new(row.get(0)?, row.get(1)?)),
        None => Ok(Summary::new(0.0, 0.0)),
    }
}

pub async fn summary(
    State(db): State<Db>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> ApiResult<Json<Summary>> {
    let filter = parse_summary_query(query)?;

    let summary = compute_summary(&db, &user.id, &filter)
        .await
        .map_err(|e| ApiError::storage(StatusCode::BAD_REQUEST, "getting summary", e))?;

    Ok(Json(summary))
}
