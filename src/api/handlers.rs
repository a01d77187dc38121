use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    config::Environment,
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        DeletedSpending, DivideQuery, MatrixShape, NameInput, NewSpending, Recommendation,
        Transaction, User,
    },
    services::{matrix, recommendations, spendings},
};

use super::AppState;

// Response types

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub app: String,
    pub version: String,
    pub environment: Environment,
    pub debug: bool,
    pub database: String,
}

#[derive(Debug, Serialize)]
pub struct NameCheckResponse {
    pub name: Option<String>,
    pub result: bool,
}

// Handlers

/// Liveness probe
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// Application environment information
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let config = &state.config;
    Json(InfoResponse {
        app: config.app_name.clone(),
        version: config.app_version.clone(),
        environment: config.environment,
        debug: config.debug_mode,
        database: config.database_url.clone(),
    })
}

/// Record a spending
pub async fn create_spending(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(spending): Json<NewSpending>,
) -> AppResult<Json<Transaction>> {
    let transaction = spendings::record_spending(state.store.as_ref(), spending).await?;

    tracing::info!(
        request_id = %request_id,
        transaction_id = transaction.transaction_id,
        user_id = transaction.user_id,
        "Spending recorded"
    );

    Ok(Json(transaction))
}

/// Get all spendings for a user
pub async fn get_spendings(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Transaction>>> {
    let rows = spendings::list_spendings(state.store.as_ref(), user_id).await?;
    Ok(Json(rows))
}

/// Delete all spendings for a user
pub async fn delete_spendings(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<DeletedSpending>>> {
    let deleted = spendings::delete_spendings(state.store.as_ref(), user_id).await?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        deleted = deleted.len(),
        "Spendings deleted"
    );

    Ok(Json(deleted))
}

/// Shape of the user × merchant matrix
pub async fn matrix_properties(State(state): State<AppState>) -> AppResult<Json<MatrixShape>> {
    let shape = matrix::matrix_shape(state.store.as_ref()).await?;
    Ok(Json(shape))
}

/// Most frequently visited merchant for a user
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Recommendation>> {
    let recommended_merchant_id =
        recommendations::recommend(state.store.as_ref(), user_id).await?;

    Ok(Json(Recommendation {
        user_id,
        recommended_merchant_id,
    }))
}

/// Echo a user payload
pub async fn create_user(Json(user): Json<User>) -> Json<Value> {
    Json(json!({ "received_user": user }))
}

/// Check whether a name matches "ediz", case-insensitively
///
/// A name in the JSON body takes precedence over the `name` query parameter.
/// The body is optional, but one that is sent must be valid.
pub async fn check_name(
    Query(query): Query<NameInput>,
    body: Result<Json<NameInput>, JsonRejection>,
) -> AppResult<Json<NameCheckResponse>> {
    let body_name = match body {
        Ok(Json(input)) => input.name,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(AppError::InvalidInput(rejection.body_text())),
    };

    let name = body_name
        .or(query.name)
        .filter(|name| !name.is_empty());

    let result = name
        .as_deref()
        .is_some_and(|name| name.trim().to_lowercase() == "ediz");

    Ok(Json(NameCheckResponse { name, result }))
}

/// Divide two integers
pub async fn divide(Query(query): Query<DivideQuery>) -> AppResult<Json<Value>> {
    if query.b == 0 {
        return Err(AppError::InvalidInput("Cannot divide by zero".to_string()));
    }

    Ok(Json(json!({ "result": query.a as f64 / query.b as f64 })))
}
