use anyhow::{Result, anyhow};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use libsql::{Value, params::Params};
use uuid::Uuid;

use crate::constants::*;
use crate::database::Db;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::AuthUser;
use crate::models::{MessageResponse, NewTransaction, Transaction, TransactionKind, TransactionPayload};
use crate::utils::validate_transaction;

const TRANSACTION_COLUMNS: &str = "id, user_id, type, category, amount, date, description";

pub fn extract_transaction_from_row(row: libsql::Row) -> Result<Transaction> {
    let kind = row
        .get::<String>(2)?
        .parse::<TransactionKind>()
        .map_err(|e| anyhow!("invalid stored transaction type: {}", e))?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind,
        category: row.get(3)?,
        amount: row.get(4)?,
        date: row.get::<Option<String>>(5)?.unwrap_or_default(),
        description: row.get::<Option<String>>(6)?.unwrap_or_default(),
    })
}

fn category_value(category: Option<i64>) -> Value {
    category.map_or(Value::Null, Value::Integer)
}

pub async fn insert_transaction(
    db: &Db,
    user_id: &str,
    command: &NewTransaction,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let conn = db.write().await;

    conn.execute(
        "INSERT INTO transactions (id, user_id, type, category, amount, date, description) VALUES (?, ?, ?, ?, ?, ?, ?)",
        Params::Positional(vec![
            Value::Text(id.clone()),
            Value::Text(user_id.to_string()),
            Value::Text(command.kind.as_str().to_string()),
            category_value(command.category),
            Value::Real(command.amount),
            Value::Text(command.date.clone()),
            Value::Text(command.description.clone()),
        ]),
    )
    .await?;

    Ok(id)
}

pub async fn list_transactions(db: &Db, user_id: &str) -> Result<Vec<Transaction>> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ?"),
            [user_id],
        )
        .await?;

    let mut transactions = Vec::new();
    while let Some(row) = rows.next().await? {
        transactions.push(extract_transaction_from_row(row)?);
    }
    Ok(transactions)
}

/// Returns `None` both when the id is unknown and when it belongs to someone else.
pub async fn find_transaction(
    db: &Db,
    user_id: &str,
    id: &str,
) -> Result<Option<Transaction>> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ? AND user_id = ?"),
            [id, user_id],
        )
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(extract_transaction_from_row(row)?)),
        None => Ok(None),
    }
}

/// Replaces every mutable field; returns the number of rows touched (0 or 1).
pub async fn replace_transaction(
    db: &Db,
    user_id: &str,
    id: &str,
    command: &NewTransaction,
) -> Result<u64> {
    let conn = db.write().await;
    let affected = conn.execute(
        "UPDATE transactions SET type = ?, category = ?, amount = ?, date = ?, description = ? WHERE id = ? AND user_id = ?",
        Params::Positional(vec![
            Value::Text(command.kind.as_str().to_string()),
            category_value(command.category),
            Value::Real(command.amount),
            Value::Text(command.date.clone()),
            Value::Text(command.description.clone()),
            Value::Text(id.to_string()),
            Value::Text(user_id.to_string()),
        ]),
    )
    .await?;
    Ok(affected)
}

pub async fn remove_transaction(db: &Db, user_id: &str, id: &str) -> Result<u64> {
    let conn = db.write().await;
    let affected = conn
        .execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            [id, user_id],
        )
        .await?;
    Ok(affected)
}

pub async fn add_transaction(
    State(db): State<Db>,
    user: AuthUser,
    ApiJson(payload): ApiJson<TransactionPayload>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let command = validate_transaction(payload)?;

    let id = insert_transaction(&db, &user.id, &command)
        .await
        .map_err(|e| ApiError::storage(StatusCode::BAD_REQUEST, "adding transaction", e))?;
    tracing::debug!(user_id = %user.id, transaction_id = %id, "transaction added");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id(MSG_TRANSACTION_ADDED, id)),
    ))
}

pub async fn all_transactions(
    State(db): State<Db>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = list_transactions(&db, &user.id)
        .await
        .map_err(|e| ApiError::storage(StatusCode::UNAUTHORIZED, "getting transactions", e))?;

    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Transaction>>> {
    let transaction = find_transaction(&db, &user.id, &id)
        .await
        .map_err(|e| ApiError::storage(StatusCode::BAD_REQUEST, "getting transaction", e))?;

    Ok(Json(transaction))
}

pub async fn update_transaction(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TransactionPayload>,
) -> ApiResult<Json<MessageResponse>> {
    let command = validate_transaction(payload)?;

    let affected = replace_transaction(&db, &user.id, &id, &command)
        .await
        .map_err(|e| ApiError::storage(StatusCode::BAD_REQUEST, "updating transaction", e))?;
    if affected == 0 {
        return Err(ApiError::NotFound("transaction"));
    }

    Ok(Json(MessageResponse::new(MSG_TRANSACTION_UPDATED)))
}

pub async fn delete_transaction(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let affected = remove_transaction(&db, &user.id, &id)
        .await
        .map_err(|e| ApiError::storage(StatusCode::BAD_REQUEST, "deleting transaction", e))?;
    if affected == 0 {
        return Err(ApiError::NotFound("transaction"));
    }

    Ok(Json(MessageResponse::new(MSG_TRANSACTION_DELETED)))
}
