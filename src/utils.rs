use crate::constants::*;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewTransaction, TransactionKind, TransactionPayload};

pub fn validate_string_length(value: &str, field_name: &str, max_length: usize) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!(
            "{} cannot be empty",
            field_name
        )));
    }
    if value.len() > max_length {
        return Err(ApiError::validation(format!(
            "{} must be less than {} characters",
            field_name, max_length
        )));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> ApiResult<()> {
    if username.trim().is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }
    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(ApiError::validation(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::validation(
            "Username can only contain alphanumeric characters, underscores, and hyphens",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> ApiResult<()> {
    if !amount.is_finite() {
        return Err(ApiError::validation("Amount must be a finite number"));
    }
    if amount < 0.0 {
        return Err(ApiError::validation("Amount cannot be negative"));
    }
    if amount > MAX_AMOUNT {
        return Err(ApiError::validation(format!(
            "Amount cannot exceed {}",
            MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Turns a raw request body into a typed command, or explains what is wrong with it.
pub fn validate_transaction(payload: TransactionPayload) -> ApiResult<NewTransaction> {
    let kind = payload
        .kind
        .as_deref()
        .ok_or_else(|| ApiError::validation("type is required"))?
        .parse::<TransactionKind>()
        .map_err(ApiError::Validation)?;

    let amount = payload
        .amount
        .ok_or_else(|| ApiError::validation("amount is required"))?;
    validate_amount(amount)?;

    let date = payload
        .date
        .ok_or_else(|| ApiError::validation("date is required"))?;
    validate_string_length(&date, "date", MAX_DATE_LENGTH)?;

    let description = payload.description.unwrap_or_default();
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ApiError::validation(format!(
            "description must be less than {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }

    Ok(NewTransaction {
        kind,
        category: payload.category,
        amount,
        date: date.trim().to_string(),
        description,
    })
}
