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

use clap::{Parser, Subcommand};
use core_banking_rs::Ledger;
use core_banking_rs::http::router;
use core_banking_rs::replay::{replay_events, write_balances};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Core Banking - In-memory ledger service
///
/// Serves the ledger over HTTP, or replays an event CSV and prints balances.
#[derive(Parser, Debug)]
#[command(name = "core-banking")]
#[command(about = "An in-memory ledger for deposits, withdrawals and transfers", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "LEDGER_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "LEDGER_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Apply events from a CSV file and write final balances to stdout
    ///
    /// Expected format: type,origin,destination,amount
    /// Example: core-banking replay events.csv > balances.csv
    Replay {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let result = match args.command {
        Command::Serve { host, port } => serve(&host, port).await,
        Command::Replay { input } => replay(&input),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

async fn serve(host: &str, port: u16) -> Result<(), String> {
    let ledger = Arc::new(Ledger::new());
    let app = router(ledger);

    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| format!("Error binding {}:{}: {}", host, port, e))?;
    info!("Ledger API server running on http://{}:{}", host, port);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

fn replay(input: &Path) -> Result<(), String> {
    let file = File::open(input)
        .map_err(|e| format!("Error opening file '{}': {}", input.display(), e))?;

    let ledger = Ledger::new();
    let applied = replay_events(&ledger, BufReader::new(file))
        .map_err(|e| format!("Error processing events: {}", e))?;
    info!(applied, "replay finished");

    write_balances(&ledger, std::io::stdout()).map_err(|e| format!("Error writing output: {}", e))
}
