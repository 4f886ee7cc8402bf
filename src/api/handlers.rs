//! HTTP request handlers.

use axum::{extract::State, http::StatusCode, Json};

use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::types::*;
use crate::auth::Caller;
use crate::domain::{Account, AccountUpdate, Device, DeviceInput, NewAccount};
use crate::error::{AppError, AppResult};
use crate::AppState;

fn page_bounds(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
}

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service status and database connectivity", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match state.store.ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            ("degraded", "disconnected")
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ==================== Authentication Endpoints ====================

/// Log in with an account number and password to obtain a JWT token.
///
/// POST /v1/auth/login
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let invalid = || {
        tracing::warn!(number = request.number, "Failed login attempt");
        AppError::Unauthorized("Invalid account number or password".to_string())
    };

    let credentials = match state.store.get_account_credentials(request.number).await {
        Ok(credentials) => credentials,
        Err(AppError::NotFound(_)) => return Err(invalid()),
        Err(e) => return Err(e),
    };

    let hash = credentials.password_hash.as_deref().ok_or_else(invalid)?;
    if !state.password_hasher.verify(&request.password, hash).await? {
        return Err(invalid());
    }

    let account = credentials.account;
    let token = state.jwt_manager.generate_token(account.id, account.number)?;

    tracing::info!(
        account_id = account.id,
        number = account.number,
        "Account logged in"
    );

    Ok(Json(LoginResponse {
        token,
        account,
        expires_in: state.jwt_manager.token_duration_hours() * 3600,
    }))
}

// ==================== Account Endpoints ====================

/// Open a new account.
///
/// POST /v1/accounts
#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid request")
    ),
    tag = "accounts"
)]
pub async fn create_account(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<Account>)> {
    let mut new_account = NewAccount::new(
        &request.first_name,
        &request.last_name,
        request.balance,
        None,
    )?;
    if let Some(password) = request.password.as_deref() {
        new_account.password_hash = Some(state.password_hasher.hash(password).await?);
    }
    let account = state.store.create_account(&new_account).await?;

    tracing::info!(
        account_id = account.id,
        number = account.number,
        "Account created"
    );

    Ok((StatusCode::CREATED, Json(account)))
}

/// List accounts.
///
/// GET /v1/accounts
#[utoipa::path(
    get,
    path = "/v1/accounts",
    params(PageQuery),
    responses(
        (status = 200, description = "List of accounts", body = ListAccountsResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<ListAccountsResponse>> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let accounts = state.store.list_accounts(limit, offset).await?;

    Ok(Json(ListAccountsResponse {
        accounts,
        limit,
        offset,
    }))
}

/// Get an account by ID.
///
/// GET /v1/accounts/{id}
#[utoipa::path(
    get,
    path = "/v1/accounts/{id}",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = Account),
        (status = 403, description = "Token belongs to another account"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Account>> {
    caller.ensure_account(id)?;
    tracing::debug!(account_id = id, "Fetching account");

    Ok(Json(state.store.get_account(id).await?))
}

/// Replace an account's name and balance.
///
/// PUT /v1/accounts/{id}
#[utoipa::path(
    put,
    path = "/v1/accounts/{id}",
    params(("id" = i32, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Token belongs to another account"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn update_account(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<UpdateAccountRequest>,
) -> AppResult<Json<Account>> {
    caller.ensure_account(id)?;

    let update = AccountUpdate::new(&request.first_name, &request.last_name, request.balance)?;
    let account = state.store.update_account(id, &update).await?;

    tracing::info!(account_id = id, "Account updated");

    Ok(Json(account))
}

/// Delete an account and its devices.
///
/// DELETE /v1/accounts/{id}
#[utoipa::path(
    delete,
    path = "/v1/accounts/{id}",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Token belongs to another account"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    caller.ensure_account(id)?;
    state.store.delete_account(id).await?;

    tracing::info!(account_id = id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ==================== Device Endpoints ====================

/// Register a device.
///
/// POST /v1/devices
#[utoipa::path(
    post,
    path = "/v1/devices",
    request_body = DeviceRequest,
    responses(
        (status = 201, description = "Device created", body = Device),
        (status = 400, description = "Invalid request or unknown owner")
    ),
    security(("bearer_auth" = [])),
    tag = "devices"
)]
pub async fn create_device(
    State(state): State<AppState>,
    AppJson(request): AppJson<DeviceRequest>,
) -> AppResult<(StatusCode, Json<Device>)> {
    let input = DeviceInput::new(&request.name, &request.status, request.user_id)?;
    let device = state.store.create_device(&input).await?;

    tracing::info!(
        device_id = device.device_id,
        user_id = ?device.user_id,
        "Device created"
    );

    Ok((StatusCode::CREATED, Json(device)))
}

/// List devices, optionally filtered by owning account.
///
/// GET /v1/devices
#[utoipa::path(
    get,
    path = "/v1/devices",
    params(ListDevicesQuery),
    responses(
        (status = 200, description = "List of devices", body = ListDevicesResponse),
        (status = 400, description = "Invalid user ID")
    ),
    security(("bearer_auth" = [])),
    tag = "devices"
)]
pub async fn list_devices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListDevicesQuery>,
) -> AppResult<Json<ListDevicesResponse>> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let devices = state
        .store
        .list_devices(query.user_id, limit, offset)
        .await?;

    Ok(Json(ListDevicesResponse {
        devices,
        limit,
        offset,
    }))
}

/// Get a device by ID.
///
/// GET /v1/devices/{id}
#[utoipa::path(
    get,
    path = "/v1/devices/{id}",
    params(("id" = i32, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device details", body = Device),
        (status = 404, description = "Device not found")
    ),
    security(("bearer_auth" = [])),
    tag = "devices"
)]
pub async fn get_device(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Device>> {
    Ok(Json(state.store.get_device(id).await?))
}

/// Replace a device's fields.
///
/// PUT /v1/devices/{id}
#[utoipa::path(
    put,
    path = "/v1/devices/{id}",
    params(("id" = i32, Path, description = "Device ID")),
    request_body = DeviceRequest,
    responses(
        (status = 200, description = "Device updated", body = Device),
        (status = 400, description = "Invalid request or unknown owner"),
        (status = 404, description = "Device not found")
    ),
    security(("bearer_auth" = [])),
    tag = "devices"
)]
pub async fn update_device(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<DeviceRequest>,
) -> AppResult<Json<Device>> {
    let input = DeviceInput::new(&request.name, &request.status, request.user_id)?;
    let device = state.store.update_device(id, &input).await?;

    tracing::info!(device_id = id, status = %device.status, "Device updated");

    Ok(Json(device))
}

/// Delete a device.
///
/// DELETE /v1/devices/{id}
#[utoipa::path(
    delete,
    path = "/v1/devices/{id}",
    params(("id" = i32, Path, description = "Device ID")),
    responses(
        (status = 204, description = "Device deleted"),
        (status = 404, description = "Device not found")
    ),
    security(("bearer_auth" = [])),
    tag = "devices"
)]
pub async fn delete_device(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.store.delete_device(id).await?;

    tracing::info!(device_id = id, "Device deleted");

    Ok(StatusCode::NO_CONTENT)
}
