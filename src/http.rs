// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! REST API for the ledger.
//!
//! ## Endpoints
//!
//! - `GET /api/balance?account_id=ID` - Current balance of an account
//! - `POST /api/event` - Apply a deposit, withdraw or transfer
//! - `POST /api/reset` - Remove every account
//!
//! ## Example Usage
//!
//! ```bash
//! # Deposit
//! curl -X POST http://localhost:8080/api/event \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "deposit", "destination": "12345", "amount": 500}'
//!
//! # Transfer
//! curl -X POST http://localhost:8080/api/event \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "transfer", "origin": "12345", "destination": "67890", "amount": 300}'
//!
//! # Balance
//! curl "http://localhost:8080/api/balance?account_id=12345"
//! ```

use crate::operation::{EventRequest, Outcome};
use crate::{AccountId, Ledger, LedgerError};
use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

// === Request/Response DTOs ===

/// Query string for balance lookups.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub account_id: AccountId,
}

/// Response body for balance lookups.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
}

/// Response body for errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the ledger.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

// === Error Handling ===

/// Failures surfaced to HTTP clients.
#[derive(Debug)]
pub enum AppError {
    Ledger(LedgerError),
    /// Body or query string could not be decoded.
    Malformed(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::Ledger(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Ledger(err) => {
                let status = match err {
                    LedgerError::AccountNotFound(_) => StatusCode::NOT_FOUND,
                    LedgerError::InsufficientFunds
                    | LedgerError::InvalidOperation(_)
                    | LedgerError::MissingField(_)
                    | LedgerError::InvalidAmount => StatusCode::BAD_REQUEST,
                    LedgerError::BalanceOverflow => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!(error = %err, "request failed");
                    "an unexpected error occurred".to_string()
                } else {
                    warn!(error = %err, "request rejected");
                    err.to_string()
                };
                (status, err.code(), message)
            }
            AppError::Malformed(detail) => {
                warn!(%detail, "malformed request");
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", detail.clone())
            }
        };

        (
            status,
            Json(ErrorResponse {
                status: status.as_u16(),
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// GET /api/balance - Balance of one account.
async fn get_balance(
    State(state): State<AppState>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<BalanceResponse>, AppError> {
    let Query(query) = query?;
    let balance = state.ledger.balance_of(&query.account_id)?;
    Ok(Json(BalanceResponse { balance }))
}

/// POST /api/event - Apply an event.
async fn handle_event(
    State(state): State<AppState>,
    request: Result<Json<EventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Outcome>), AppError> {
    let Json(request) = request?;
    let outcome = state.ledger.apply_event(request)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/reset - Clear the ledger.
async fn reset(State(state): State<AppState>) -> StatusCode {
    state.ledger.reset_all();
    StatusCode::OK
}

// === Router ===

/// Builds the API router around a shared ledger.
pub fn router(ledger: Arc<Ledger>) -> Router {
    Router::new()
        .route("/api/balance", get(get_balance))
        .route("/api/event", post(handle_event))
        .route("/api/reset", post(reset))
        .with_state(AppState { ledger })
}
