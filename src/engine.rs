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

//! Ledger engine.
//!
//! The [`Ledger`] applies operations against its [`AccountStore`]:
//!
//! - **Deposits**: Credit the destination, creating it on first use.
//! - **Withdrawals**: Debit an existing origin (fails if insufficient funds).
//! - **Transfers**: Debit the origin, then credit the destination, creating
//!   the destination if needed.
//!
//! # Thread Safety
//!
//! Each single-account read-modify-write runs under that account's entry lock,
//! so concurrent deposits to one account never lose updates. Operations on
//! different accounts run in parallel.

use crate::operation::{EventRequest, Operation, Outcome};
use crate::store::AccountStore;
use crate::{AccountId, LedgerError};
use rust_decimal::Decimal;
use tracing::{debug, error};

/// Ledger engine owning an account store.
///
/// # Invariants
///
/// - Withdrawals and transfers never take an origin below zero.
/// - Only deposits and transfer destinations create accounts.
/// - A failed operation leaves every account as it was.
#[derive(Debug, Default)]
pub struct Ledger {
    pub(crate) store: AccountStore,
}

impl Ledger {
    /// Creates a ledger with an empty store.
    pub fn new() -> Self {
        Self::with_store(AccountStore::new())
    }

    /// Creates a ledger on top of an existing store.
    pub fn with_store(store: AccountStore) -> Self {
        Ledger { store }
    }

    /// Applies an operation and returns the accounts it changed.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] - Amount is zero or negative.
    /// - [`LedgerError::AccountNotFound`] - Withdrawal or transfer origin does not exist.
    /// - [`LedgerError::InsufficientFunds`] - Debit exceeds the origin balance.
    /// - [`LedgerError::BalanceOverflow`] - Credit exceeds the decimal range.
    pub fn apply(&self, operation: Operation) -> Result<Outcome, LedgerError> {
        if operation.amount() <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }

        let kind = operation.kind();
        let amount = operation.amount();
        let outcome = match operation {
            Operation::Deposit {
                destination,
                amount,
            } => self.deposit(&destination, amount)?,
            Operation::Withdraw { origin, amount } => self.withdraw(&origin, amount)?,
            Operation::Transfer {
                origin,
                destination,
                amount,
            } => self.transfer(&origin, &destination, amount)?,
        };

        debug!(%kind, %amount, "operation applied");
        Ok(outcome)
    }

    /// Decodes a raw event and applies it.
    ///
    /// # Errors
    ///
    /// Decoding fails with [`LedgerError::InvalidOperation`] or
    /// [`LedgerError::MissingField`]; see [`Ledger::apply`] for the rest.
    pub fn apply_event(&self, request: EventRequest) -> Result<Outcome, LedgerError> {
        let operation = Operation::try_from(request)?;
        self.apply(operation)
    }

    fn deposit(&self, destination: &AccountId, amount: Decimal) -> Result<Outcome, LedgerError> {
        let account = self
            .store
            .upsert(destination, |account| account.credit(amount))?;

        Ok(Outcome {
            origin: None,
            destination: Some(account),
        })
    }

    fn withdraw(&self, origin: &AccountId, amount: Decimal) -> Result<Outcome, LedgerError> {
        let account = self.store.update(origin, |account| account.debit(amount))?;

        Ok(Outcome {
            origin: Some(account),
            destination: None,
        })
    }

    /// Moves `amount` from `origin` to `destination`.
    ///
    /// Every failure is checked against pinned snapshots before the origin
    /// is debited. The credit can still overflow if a concurrent deposit
    /// grows the destination between that check and the credit; the origin
    /// is then refunded, and for that short window readers see it debited.
    fn transfer(
        &self,
        origin: &AccountId,
        destination: &AccountId,
        amount: Decimal,
    ) -> Result<Outcome, LedgerError> {
        // Debit and credit land on the same side of any concurrent reset.
        let pin = self.store.pin();

        if origin == destination {
            // Sequential debit-then-credit on one account nets to zero but
            // still requires the funds to be there.
            let account = self.store.update_pinned(&pin, origin, |account| {
                account.debit(amount)?;
                account.credit(amount)
            })?;
            return Ok(Outcome {
                origin: Some(account.clone()),
                destination: Some(account),
            });
        }

        let source = self
            .store
            .get_pinned(&pin, origin)
            .ok_or_else(|| LedgerError::AccountNotFound(origin.clone()))?;
        if source.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        if let Some(target) = self.store.get_pinned(&pin, destination) {
            target
                .balance
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?;
        }

        let debited = self
            .store
            .update_pinned(&pin, origin, |account| account.debit(amount))?;

        match self
            .store
            .upsert_pinned(&pin, destination, |account| account.credit(amount))
        {
            Ok(credited) => Ok(Outcome {
                origin: Some(debited),
                destination: Some(credited),
            }),
            Err(err) => {
                if let Err(refund_err) = self
                    .store
                    .update_pinned(&pin, origin, |account| account.credit(amount))
                {
                    error!(%origin, %amount, error = %refund_err, "failed to refund transfer origin");
                }
                Err(err)
            }
        }
    }
}
