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

//! Thread-safe in-memory account store.
//!
//! Accounts live in a [`DashMap`], so read-modify-write cycles on one
//! account are serialized by the entry lock while different accounts
//! proceed in parallel. A [`RwLock`] gate sits in front of the map:
//! every operation takes it shared, [`AccountStore::clear`] takes it
//! exclusively, so nobody ever observes a half-cleared map.
//!
//! The gate is fair: once `clear` is waiting, new shared acquisitions
//! queue behind it. A thread must therefore never take the gate twice;
//! multi-step callers [`pin`](AccountStore::pin) once and use the
//! `*_pinned` variants.
//!
//! Lock order is always gate first, then at most one map entry.

use crate::LedgerError;
use crate::account::Account;
use crate::base::AccountId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{RwLock, RwLockReadGuard};

/// In-memory mapping from account ID to account.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<AccountId, Account>,
    gate: RwLock<()>,
}

impl AccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            gate: RwLock::new(()),
        }
    }

    /// Returns a snapshot of the account, if present.
    pub fn get(&self, id: &AccountId) -> Option<Account> {
        let pin = self.pin();
        self.get_pinned(&pin, id)
    }

    /// [`AccountStore::get`] under a pin the caller already holds.
    pub fn get_pinned(&self, _pin: &RwLockReadGuard<'_, ()>, id: &AccountId) -> Option<Account> {
        self.accounts.get(id).map(|entry| entry.value().clone())
    }

    /// Inserts or overwrites the account keyed by its ID.
    pub fn put(&self, account: Account) -> Account {
        let _gate = self.gate.read();
        self.accounts.insert(account.id.clone(), account.clone());
        account
    }

    /// Removes every account.
    pub fn clear(&self) {
        let _gate = self.gate.write();
        self.accounts.clear();
    }

    /// Applies `f` to an existing account under its entry lock.
    ///
    /// `f` works on a copy; the copy replaces the stored account only when
    /// `f` succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if no account exists for `id`,
    /// or whatever `f` returns.
    pub fn update<F>(&self, id: &AccountId, f: F) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<(), LedgerError>,
    {
        let pin = self.pin();
        self.update_pinned(&pin, id, f)
    }

    /// [`AccountStore::update`] under a pin the caller already holds.
    pub fn update_pinned<F>(
        &self,
        _pin: &RwLockReadGuard<'_, ()>,
        id: &AccountId,
        f: F,
    ) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<(), LedgerError>,
    {
        let mut slot = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.clone()))?;

        let mut next = slot.value().clone();
        f(&mut next)?;
        *slot = next.clone();
        Ok(next)
    }

    /// Like [`AccountStore::update`], but starts from a zero-balance account
    /// when `id` is absent. A failing `f` never leaves a new account behind.
    pub fn upsert<F>(&self, id: &AccountId, f: F) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<(), LedgerError>,
    {
        let pin = self.pin();
        self.upsert_pinned(&pin, id, f)
    }

    /// [`AccountStore::upsert`] under a pin the caller already holds.
    pub fn upsert_pinned<F>(
        &self,
        _pin: &RwLockReadGuard<'_, ()>,
        id: &AccountId,
        f: F,
    ) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<(), LedgerError>,
    {
        match self.accounts.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let mut next = entry.get().clone();
                f(&mut next)?;
                entry.insert(next.clone());
                Ok(next)
            }
            Entry::Vacant(entry) => {
                let mut next = Account::new(id.clone());
                f(&mut next)?;
                entry.insert(next.clone());
                Ok(next)
            }
        }
    }

    /// Holds off [`AccountStore::clear`] until the guard is dropped.
    ///
    /// Multi-step operations pin the store so they land entirely before or
    /// entirely after a reset. While holding a pin, call only the
    /// `*_pinned` methods: a second acquisition blocks behind a waiting
    /// `clear`, which in turn waits for this pin.
    pub fn pin(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read()
    }

    pub fn len(&self) -> usize {
        let _gate = self.gate.read();
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every account, sorted by ID.
    pub fn snapshot(&self) -> Vec<Account> {
        let _gate = self.gate.read();
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }
}
