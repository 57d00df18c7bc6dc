use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use evenly::config::CONFIG;
use evenly::error::EvenlyError;
use evenly::models::{
    AppLog, CoinsHistoryEntry, ExpenseRecord, GiveTakeKind, Group, SettlementTransaction, User,
};
use evenly::service::{EvenlyService, GiveTakeSummary, GroupBalancesResponse};
use evenly::{InMemoryLogging, InMemoryStorage};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

type Service = Arc<EvenlyService<InMemoryLogging, InMemoryStorage>>;

// Request structs for JSON payloads
#[derive(Deserialize)]
struct CreateUserRequest {
    id: String,
    name: String,
    username: Option<String>,
    email: String,
}

#[derive(Deserialize)]
struct CreateGroupRequest {
    name: String,
    created_by_id: String,
}

#[derive(Deserialize)]
struct JoinGroupRequest {
    join_code: String,
    user_id: String,
}

#[derive(Deserialize)]
struct AddMemberRequest {
    user_id: String,
    added_by_id: String,
}

#[derive(Deserialize)]
struct RemoveMemberRequest {
    user_id: String,
    removed_by_id: String,
}

#[derive(Deserialize)]
struct AddExpenseRequest {
    group_id: String,
    description: String,
    amount: f64,
    paid_by_id: String,
    payment_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct DeleteExpenseRequest {
    requested_by_id: String,
}

#[derive(Deserialize)]
struct GiveOrTakeRequest {
    user_id: String,
    name: String,
    amount: f64,
    #[serde(rename = "type")]
    kind: GiveTakeKind,
    date: Option<DateTime<Utc>>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct AdjustAmountRequest {
    amount: f64,
}

#[derive(Deserialize)]
struct SetLimitRequest {
    limit: f64,
}

#[derive(Deserialize)]
struct AddCoinsRequest {
    coins: f64,
}

#[derive(Serialize)]
struct GiveOrTakeResponse {
    record: evenly::models::GiveTakeRecord,
    remaining_coins: f64,
}

#[derive(Serialize)]
struct RemainingCoinsResponse {
    remaining_coins: Option<f64>,
}

// Error response struct
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// Newtype wrapper for EvenlyError to implement IntoResponse
struct ApiError(EvenlyError);

impl From<EvenlyError> for ApiError {
    fn from(err: EvenlyError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            EvenlyError::UserNotFound(_)
            | EvenlyError::GroupNotFound(_)
            | EvenlyError::ExpenseNotFound(_)
            | EvenlyError::RecordNotFound(_)
            | EvenlyError::InvalidJoinCode => StatusCode::NOT_FOUND,
            EvenlyError::AlreadyGroupMember(_) => StatusCode::CONFLICT,
            EvenlyError::NotGroupMember(_)
            | EvenlyError::NotGroupOwner(_)
            | EvenlyError::OwnerCannotRemoveSelf => StatusCode::FORBIDDEN,
            EvenlyError::InvalidAmount { .. } | EvenlyError::InsufficientCoins { .. } => {
                StatusCode::BAD_REQUEST
            }
            EvenlyError::StorageError(_) | EvenlyError::LoggingError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

async fn create_user(
    State(service): State<Service>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = service
        .add_user(User {
            id: req.id,
            name: req.name,
            username: req.username,
            email: req.email,
            monthly_limit_coins: 0.0,
            remaining_coins: 0.0,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(service): State<Service>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = service
        .get_user(&user_id)
        .await?
        .ok_or(EvenlyError::UserNotFound(user_id))?;
    Ok(Json(user))
}

async fn my_groups(
    State(service): State<Service>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(service.my_groups(&user_id).await?))
}

async fn create_group(
    State(service): State<Service>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.create_group(req.name, &req.created_by_id).await?;
    Ok(Json(group))
}

async fn get_group(
    State(service): State<Service>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .get_group(&group_id)
        .await?
        .ok_or(EvenlyError::GroupNotFound(group_id))?;
    Ok(Json(group))
}

async fn join_group(
    State(service): State<Service>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .join_group_by_code(&req.join_code, &req.user_id)
        .await?;
    Ok(Json(group))
}

async fn add_member(
    State(service): State<Service>,
    Path(group_id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> Result<StatusCode, ApiError> {
    service
        .add_member(&group_id, &req.user_id, &req.added_by_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn remove_member(
    State(service): State<Service>,
    Path(group_id): Path<String>,
    Json(req): Json<RemoveMemberRequest>,
) -> Result<StatusCode, ApiError> {
    service
        .remove_member(&group_id, &req.user_id, &req.removed_by_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn add_expense(
    State(service): State<Service>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<Json<ExpenseRecord>, ApiError> {
    let expense = service
        .add_expense(
            &req.group_id,
            req.description,
            req.amount,
            &req.paid_by_id,
            req.payment_date,
        )
        .await?;
    Ok(Json(expense))
}

async fn delete_expense(
    State(service): State<Service>,
    Path(expense_id): Path<String>,
    Json(req): Json<DeleteExpenseRequest>,
) -> Result<Json<RemainingCoinsResponse>, ApiError> {
    let remaining_coins = service
        .delete_expense(&expense_id, &req.requested_by_id)
        .await?;
    Ok(Json(RemainingCoinsResponse { remaining_coins }))
}

async fn group_expenses(
    State(service): State<Service>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<ExpenseRecord>>, ApiError> {
    Ok(Json(service.group_expenses(&group_id).await?))
}

async fn group_balances(
    State(service): State<Service>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupBalancesResponse>, ApiError> {
    Ok(Json(service.member_balances(&group_id).await?))
}

async fn monthly_balances(
    State(service): State<Service>,
    Path((group_id, year, month)): Path<(String, i32, u32)>,
) -> Result<Json<Vec<evenly::models::MemberBalance>>, ApiError> {
    Ok(Json(
        service
            .monthly_member_balances(&group_id, year, month)
            .await?,
    ))
}

async fn settle_up(
    State(service): State<Service>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<SettlementTransaction>>, ApiError> {
    Ok(Json(service.settlement_suggestions(&group_id).await?))
}

async fn give_or_take(
    State(service): State<Service>,
    Json(req): Json<GiveOrTakeRequest>,
) -> Result<Json<GiveOrTakeResponse>, ApiError> {
    let (record, remaining_coins) = service
        .record_give_or_take(
            &req.user_id,
            req.name,
            req.amount,
            req.kind,
            req.date,
            req.description,
        )
        .await?;
    Ok(Json(GiveOrTakeResponse {
        record,
        remaining_coins,
    }))
}

async fn give_take_records(
    State(service): State<Service>,
    Path(user_id): Path<String>,
) -> Result<Json<GiveTakeSummary>, ApiError> {
    Ok(Json(service.give_take_records(&user_id).await?))
}

async fn increase_give_or_take(
    State(service): State<Service>,
    Path(record_id): Path<String>,
    Json(req): Json<AdjustAmountRequest>,
) -> Result<Json<GiveOrTakeResponse>, ApiError> {
    let (record, remaining_coins) = service
        .increase_give_or_take(&record_id, req.amount)
        .await?;
    Ok(Json(GiveOrTakeResponse {
        record,
        remaining_coins,
    }))
}

async fn decrease_give_or_take(
    State(service): State<Service>,
    Path(record_id): Path<String>,
    Json(req): Json<AdjustAmountRequest>,
) -> Result<Json<GiveOrTakeResponse>, ApiError> {
    let (record, remaining_coins) = service
        .decrease_give_or_take(&record_id, req.amount)
        .await?;
    Ok(Json(GiveOrTakeResponse {
        record,
        remaining_coins,
    }))
}

async fn settle_give_or_take(
    State(service): State<Service>,
    Path(record_id): Path<String>,
) -> Result<Json<RemainingCoinsResponse>, ApiError> {
    let remaining = service.settle_give_or_take(&record_id).await?;
    Ok(Json(RemainingCoinsResponse {
        remaining_coins: Some(remaining),
    }))
}

async fn set_monthly_limit(
    State(service): State<Service>,
    Path(user_id): Path<String>,
    Json(req): Json<SetLimitRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(service.set_monthly_limit(&user_id, req.limit).await?))
}

async fn add_coins(
    State(service): State<Service>,
    Path(user_id): Path<String>,
    Json(req): Json<AddCoinsRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(service.add_coins(&user_id, req.coins).await?))
}

async fn coins_history(
    State(service): State<Service>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CoinsHistoryEntry>>, ApiError> {
    Ok(Json(service.coins_history(&user_id).await?))
}

async fn get_app_logs(State(service): State<Service>) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_filter.as_str())
        .init();

    // Initialize storage and logging
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let service = Arc::new(EvenlyService::new(storage, logging));

    // Define API routes
    let app = Router::new()
        // add / route with a simple health check
        .route("/", get(|| async { "OK" }))
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/groups", get(my_groups))
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/join", post(join_group))
        .route("/groups/{group_id}/members", post(add_member))
        .route("/groups/{group_id}/members/remove", post(remove_member))
        .route("/expenses", post(add_expense))
        .route("/expenses/{expense_id}", delete(delete_expense))
        .route("/groups/{group_id}/expenses", get(group_expenses))
        .route("/groups/{group_id}/balances", get(group_balances))
        .route(
            "/groups/{group_id}/balances/{year}/{month}",
            get(monthly_balances),
        )
        .route("/groups/{group_id}/settle-up", get(settle_up))
        .route("/give-or-take", post(give_or_take))
        .route("/users/{user_id}/give-or-take", get(give_take_records))
        .route(
            "/give-or-take/{record_id}/increase",
            post(increase_give_or_take),
        )
        .route(
            "/give-or-take/{record_id}/decrease",
            post(decrease_give_or_take),
        )
        .route("/give-or-take/{record_id}", delete(settle_give_or_take))
        .route("/users/{user_id}/coins/limit", post(set_monthly_limit))
        .route("/users/{user_id}/coins/add", post(add_coins))
        .route("/users/{user_id}/coins/history", get(coins_history))
        .route("/logs", get(get_app_logs))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30))) // 30-second timeout
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http()) // Request tracing
        .with_state(service);

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
