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

//! Account values.
//!
//! An [`Account`] is a plain snapshot: the store owns the live copy and hands
//! out clones, so nothing outside the store can hold on to mutable state.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use core_banking_rs::{Account, AccountId};
//!
//! let mut account = Account::new(AccountId::from("12345"));
//! account.credit(dec!(500)).unwrap();
//! account.debit(dec!(200)).unwrap();
//! assert_eq!(account.balance, dec!(300));
//! ```

use crate::LedgerError;
use crate::base::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Decimal,
}

impl Account {
    /// Creates an account with a zero balance.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            balance: Decimal::ZERO,
        }
    }

    pub fn with_balance(id: AccountId, balance: Decimal) -> Self {
        Self { id, balance }
    }

    /// Increases the balance.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        Ok(())
    }

    /// Decreases the balance, refusing to go below zero.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        debug_assert!(
            self.balance >= Decimal::ZERO || amount < Decimal::ZERO,
            "Invariant violated: debit took balance negative: {}",
            self.balance
        );
        Ok(())
    }
}
