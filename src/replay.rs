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

//! Batch replay of CSV event files.

use crate::operation::EventRequest;
use crate::{AccountId, Ledger};
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::{Read, Write};
use tracing::warn;

/// Raw CSV record matching the input format.
///
/// Fields: `type, origin, destination, amount`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    kind: String,
    origin: Option<String>,
    destination: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
}

impl From<CsvRecord> for EventRequest {
    fn from(record: CsvRecord) -> Self {
        let non_empty = |field: Option<String>| field.filter(|s| !s.is_empty()).map(AccountId);
        EventRequest {
            kind: record.kind,
            origin: non_empty(record.origin),
            destination: non_empty(record.destination),
            amount: record.amount,
        }
    }
}

/// Applies every event in a CSV stream to `ledger`.
///
/// Malformed rows and rejected events are logged and skipped. Returns the
/// number of events applied.
///
/// # CSV Format
///
/// ```csv
/// type,origin,destination,amount
/// deposit,,12345,500
/// withdraw,12345,,200
/// transfer,12345,67890,300
/// ```
///
/// # Errors
///
/// Returns a CSV error only if the header itself cannot be read.
pub fn replay_events<R: Read>(ledger: &Ledger, reader: R) -> Result<usize, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);
    rdr.headers()?;

    let mut applied = 0;
    for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping malformed row");
                continue;
            }
        };

        match ledger.apply_event(record.into()) {
            Ok(_) => applied += 1,
            Err(e) => warn!(row = line + 1, error = %e, "skipping rejected event"),
        }
    }

    Ok(applied)
}

/// Writes `id,balance` rows for every account, sorted by ID.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_balances<W: Write>(ledger: &Ledger, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for account in ledger.accounts() {
        wtr.serialize(&account)?;
    }

    wtr.flush()?;
    Ok(())
}
