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

//! Account store public API integration tests.

use core_banking_rs::{Account, AccountId, AccountStore, LedgerError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

fn id(s: &str) -> AccountId {
    AccountId::from(s)
}

// === Basic Store Tests ===

#[test]
fn stored_account_id_matches_key() {
    let store = AccountStore::new();
    store.put(Account::with_balance(id("12345"), dec!(1)));

    let account = store.get(&id("12345")).unwrap();
    assert_eq!(account.id, id("12345"));
}

#[test]
fn get_returns_snapshot_not_live_value() {
    let store = AccountStore::new();
    store.put(Account::with_balance(id("1"), dec!(10)));

    let mut snapshot = store.get(&id("1")).unwrap();
    snapshot.balance = dec!(999);

    assert_eq!(store.get(&id("1")).unwrap().balance, dec!(10));
}

#[test]
fn update_commits_on_success() {
    let store = AccountStore::new();
    store.put(Account::with_balance(id("1"), dec!(10)));

    let account = store
        .update(&id("1"), |account| account.debit(dec!(4)))
        .unwrap();

    assert_eq!(account.balance, dec!(6));
    assert_eq!(store.get(&id("1")).unwrap().balance, dec!(6));
}

#[test]
fn update_on_missing_account_never_creates_it() {
    let store = AccountStore::new();

    let result = store.update(&id("ghost"), |account| account.credit(dec!(4)));

    assert_eq!(result, Err(LedgerError::AccountNotFound(id("ghost"))));
    assert!(store.get(&id("ghost")).is_none());
}

#[test]
fn small_decimal_precision() {
    let store = AccountStore::new();
    store
        .upsert(&id("1"), |account| account.credit(dec!(0.0001)))
        .unwrap();
    store
        .upsert(&id("1"), |account| account.credit(dec!(0.0002)))
        .unwrap();

    assert_eq!(store.get(&id("1")).unwrap().balance, dec!(0.0003));
}

#[test]
fn large_amounts() {
    let store = AccountStore::new();
    store
        .upsert(&id("1"), |account| account.credit(dec!(999999999999.9999)))
        .unwrap();

    assert_eq!(store.get(&id("1")).unwrap().balance, dec!(999999999999.9999));
}

// === Multi-threading Tests ===

#[test]
fn concurrent_upserts_are_atomic() {
    let store = Arc::new(AccountStore::new());
    let mut handles = vec![];

    for _ in 0..100 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            store
                .upsert(&id("1"), |account| account.credit(dec!(1.00)))
                .unwrap();
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&id("1")).unwrap().balance, dec!(100.00));
}

#[test]
fn concurrent_mixed_operations_maintain_invariants() {
    let store = Arc::new(AccountStore::new());
    store.put(Account::with_balance(id("1"), dec!(1000.00)));

    let mut handles = vec![];

    // 50 credits of 10.00
    for _ in 0..50 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            store
                .update(&id("1"), |account| account.credit(dec!(10.00)))
                .unwrap();
        }));
    }

    // 50 debits of 10.00
    for _ in 0..50 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            store
                .update(&id("1"), |account| account.debit(dec!(10.00)))
                .unwrap();
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Net effect: 1000 + 500 - 500 = 1000
    assert_eq!(store.get(&id("1")).unwrap().balance, dec!(1000.00));
}

// === Race Condition Tests ===

#[test]
fn no_double_spend_race_condition() {
    // Concurrent debits must not spend the same funds twice
    for _ in 0..10 {
        let store = Arc::new(AccountStore::new());
        store.put(Account::with_balance(id("1"), dec!(100.00)));

        let successful = Arc::new(AtomicU32::new(0));
        let mut handles = vec![];

        // Try 10 concurrent debits of 100 each
        for _ in 0..10 {
            let store = Arc::clone(&store);
            let successful = Arc::clone(&successful);
            handles.push(thread::spawn(move || {
                if store
                    .update(&id("1"), |account| account.debit(dec!(100.00)))
                    .is_ok()
                {
                    successful.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // Only ONE debit should succeed
        let count = successful.load(Ordering::SeqCst);
        assert_eq!(count, 1, "Expected exactly 1 successful debit, got {}", count);
        assert_eq!(store.get(&id("1")).unwrap().balance, Decimal::ZERO);
    }
}

#[test]
fn balance_never_goes_negative() {
    for _ in 0..10 {
        let store = Arc::new(AccountStore::new());
        store.put(Account::with_balance(id("1"), dec!(50.00)));

        let mut handles = vec![];

        // Many concurrent debits trying to overdraw
        for _ in 0..20 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let _ = store.update(&id("1"), |account| account.debit(dec!(10.00)));
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            store.get(&id("1")).unwrap().balance,
            Decimal::ZERO,
            "Exactly five debits should have drained the account"
        );
    }
}
