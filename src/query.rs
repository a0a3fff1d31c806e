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

//! Balance queries and reset.

use crate::account::Account;
use crate::engine::Ledger;
use crate::{AccountId, LedgerError};
use rust_decimal::Decimal;
use tracing::info;

impl Ledger {
    /// Returns the current balance of an account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the account does not exist.
    pub fn balance_of(&self, id: &AccountId) -> Result<Decimal, LedgerError> {
        self.store
            .get(id)
            .map(|account| account.balance)
            .ok_or_else(|| LedgerError::AccountNotFound(id.clone()))
    }

    /// Retrieves a snapshot of an account.
    ///
    /// Returns `None` if no account exists for the given ID.
    pub fn get_account(&self, id: &AccountId) -> Option<Account> {
        self.store.get(id)
    }

    /// Returns every account, sorted by ID.
    pub fn accounts(&self) -> Vec<Account> {
        self.store.snapshot()
    }

    /// Removes every account. Resetting an empty ledger is a no-op.
    pub fn reset_all(&self) {
        self.store.clear();
        info!("ledger reset");
    }
}
