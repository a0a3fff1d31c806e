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

//! # Core Banking
//!
//! This library provides an in-memory ledger that tracks per-account balances
//! and applies deposits, withdrawals and transfers, plus balance queries and a
//! full reset.
//!
//! ## Core Components
//!
//! - [`Ledger`]: Applies operations and answers balance queries
//! - [`AccountStore`]: Concurrent map from [`AccountId`] to [`Account`]
//! - [`Operation`]: Decoded deposit, withdraw or transfer
//! - [`LedgerError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use core_banking_rs::{AccountId, Ledger, Operation};
//! use rust_decimal_macros::dec;
//!
//! let ledger = Ledger::new();
//!
//! // Deposit creates the account
//! let deposit = Operation::Deposit {
//!     destination: AccountId::from("12345"),
//!     amount: dec!(500),
//! };
//! ledger.apply(deposit).unwrap();
//!
//! // Check account balance
//! let balance = ledger.balance_of(&AccountId::from("12345")).unwrap();
//! assert_eq!(balance, dec!(500));
//! ```
//!
//! ## Thread Safety
//!
//! The ledger is `Sync`: share it behind an `Arc` and call it from any number
//! of threads. Updates to one account are linearizable; updates to different
//! accounts run in parallel.

pub mod account;
mod base;
mod engine;
pub mod error;
pub mod http;
pub mod operation;
mod query;
pub mod replay;
pub mod store;

pub use account::Account;
pub use base::AccountId;
pub use engine::Ledger;
pub use error::LedgerError;
pub use operation::{EventRequest, Operation, OperationKind, Outcome};
pub use store::AccountStore;
