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

//! Ledger operations.
//!
//! Events arrive as loosely-typed [`EventRequest`]s and are decoded exactly
//! once into an [`Operation`]. Unknown event types and missing fields are
//! rejected during decoding, before the ledger is consulted.

use crate::LedgerError;
use crate::account::Account;
use crate::base::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw event as received from a client.
///
/// `amount` may be a JSON number or a string; either way it is read from
/// its decimal text, never through a float.
///
/// ```json
/// {"type": "transfer", "origin": "12345", "destination": "67890", "amount": 300}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<AccountId>,
    #[serde(
        default,
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
}

/// Recognized operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl FromStr for OperationKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            "transfer" => Ok(Self::Transfer),
            other => Err(LedgerError::InvalidOperation(other.to_string())),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

/// A decoded ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Deposit {
        destination: AccountId,
        amount: Decimal,
    },
    Withdraw {
        origin: AccountId,
        amount: Decimal,
    },
    Transfer {
        origin: AccountId,
        destination: AccountId,
        amount: Decimal,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Deposit { .. } => OperationKind::Deposit,
            Self::Withdraw { .. } => OperationKind::Withdraw,
            Self::Transfer { .. } => OperationKind::Transfer,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount, .. } => *amount,
            Self::Withdraw { amount, .. } => *amount,
            Self::Transfer { amount, .. } => *amount,
        }
    }
}

impl TryFrom<EventRequest> for Operation {
    type Error = LedgerError;

    fn try_from(request: EventRequest) -> Result<Self, Self::Error> {
        let kind: OperationKind = request.kind.parse()?;
        let amount = request.amount.ok_or(LedgerError::MissingField("amount"))?;

        match kind {
            OperationKind::Deposit => Ok(Self::Deposit {
                destination: request
                    .destination
                    .ok_or(LedgerError::MissingField("destination"))?,
                amount,
            }),
            OperationKind::Withdraw => Ok(Self::Withdraw {
                origin: request.origin.ok_or(LedgerError::MissingField("origin"))?,
                amount,
            }),
            OperationKind::Transfer => Ok(Self::Transfer {
                origin: request.origin.ok_or(LedgerError::MissingField("origin"))?,
                destination: request
                    .destination
                    .ok_or(LedgerError::MissingField("destination"))?,
                amount,
            }),
        }
    }
}

/// Accounts changed by an operation.
///
/// Deposits fill `destination`, withdrawals fill `origin`, transfers fill both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Account>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn event(kind: &str, origin: Option<&str>, destination: Option<&str>) -> EventRequest {
        EventRequest {
            kind: kind.to_string(),
            origin: origin.map(AccountId::from),
            destination: destination.map(AccountId::from),
            amount: Some(dec!(10)),
        }
    }

    #[test]
    fn decodes_each_kind() {
        let deposit = Operation::try_from(event("deposit", None, Some("1"))).unwrap();
        assert_eq!(
            deposit,
            Operation::Deposit {
                destination: AccountId::from("1"),
                amount: dec!(10)
            }
        );

        let withdraw = Operation::try_from(event("withdraw", Some("1"), None)).unwrap();
        assert_eq!(withdraw.kind(), OperationKind::Withdraw);

        let transfer = Operation::try_from(event("transfer", Some("1"), Some("2"))).unwrap();
        assert_eq!(transfer.kind(), OperationKind::Transfer);
        assert_eq!(transfer.amount(), dec!(10));
    }

    #[test]
    fn unknown_type_is_invalid_operation() {
        let result = Operation::try_from(event("bogus", Some("1"), Some("2")));
        assert_eq!(
            result,
            Err(LedgerError::InvalidOperation("bogus".to_string()))
        );
    }

    #[test]
    fn type_is_case_sensitive() {
        let result = Operation::try_from(event("Deposit", None, Some("1")));
        assert!(matches!(result, Err(LedgerError::InvalidOperation(_))));
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut no_amount = event("deposit", None, Some("1"));
        no_amount.amount = None;
        assert_eq!(
            Operation::try_from(no_amount),
            Err(LedgerError::MissingField("amount"))
        );

        assert_eq!(
            Operation::try_from(event("deposit", Some("1"), None)),
            Err(LedgerError::MissingField("destination"))
        );
        assert_eq!(
            Operation::try_from(event("withdraw", None, Some("1"))),
            Err(LedgerError::MissingField("origin"))
        );
        assert_eq!(
            Operation::try_from(event("transfer", Some("1"), None)),
            Err(LedgerError::MissingField("destination"))
        );
    }

    #[test]
    fn kind_display_round_trips_through_from_str() {
        for kind in [
            OperationKind::Deposit,
            OperationKind::Withdraw,
            OperationKind::Transfer,
        ] {
            assert_eq!(kind.to_string().parse::<OperationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn event_request_accepts_numeric_and_string_amounts() {
        let numeric: EventRequest =
            serde_json::from_str(r#"{"type": "deposit", "destination": "100", "amount": 10}"#)
                .unwrap();
        assert_eq!(numeric.amount, Some(dec!(10)));
        assert_eq!(numeric.origin, None);

        let string: EventRequest =
            serde_json::from_str(r#"{"type": "deposit", "destination": "100", "amount": "10.50"}"#)
                .unwrap();
        assert_eq!(string.amount, Some(dec!(10.50)));
    }

    #[test]
    fn event_request_amounts_are_exact() {
        let decode = |amount: &str| -> EventRequest {
            serde_json::from_str(&format!(
                r#"{{"type": "deposit", "destination": "1", "amount": {}}}"#,
                amount
            ))
            .unwrap()
        };

        assert_eq!(
            decode("0.12345678901234567891").amount,
            Some(dec!(0.12345678901234567891))
        );
        assert_eq!(
            decode("12345678901234567890123").amount,
            Some(dec!(12345678901234567890123))
        );
        assert_eq!(
            decode(r#""0.12345678901234567891""#).amount,
            Some(dec!(0.12345678901234567891))
        );
    }

    #[test]
    fn event_request_null_or_absent_amount_is_none() {
        let absent: EventRequest =
            serde_json::from_str(r#"{"type": "deposit", "destination": "1"}"#).unwrap();
        assert_eq!(absent.amount, None);

        let null: EventRequest =
            serde_json::from_str(r#"{"type": "deposit", "destination": "1", "amount": null}"#)
                .unwrap();
        assert_eq!(null.amount, None);
    }

    #[test]
    fn outcome_skips_absent_sides() {
        let outcome = Outcome {
            origin: None,
            destination: Some(Account::with_balance(AccountId::from("100"), dec!(10))),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("origin").is_none());
        assert_eq!(json["destination"]["id"], "100");
        assert_eq!(json["destination"]["balance"], "10");
    }
}
