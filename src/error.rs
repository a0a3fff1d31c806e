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

//! Error types for ledger operations.

use crate::base::AccountId;
use thiserror::Error;

/// Ledger operation errors.
///
/// A failed operation never leaves a partial update behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No account exists for the requested ID
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// Debit would exceed the current balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Event type is not one of deposit, withdraw or transfer
    #[error("invalid event type: {0}")]
    InvalidOperation(String),

    /// A field required by the event type is absent
    #[error("missing {0} for event")]
    MissingField(&'static str),

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Balance arithmetic left the representable decimal range
    #[error("balance overflow")]
    BalanceOverflow,
}

impl LedgerError {
    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            LedgerError::InvalidOperation(_) => "INVALID_OPERATION",
            LedgerError::MissingField(_) => "INVALID_ARGUMENT",
            LedgerError::InvalidAmount => "INVALID_AMOUNT",
            LedgerError::BalanceOverflow => "INTERNAL_ERROR",
        }
    }
}
