//! Command-line front end for the VietQR payload codec
//!
//! Usage:
//!   vietqr encode --account PHAMDUYTRUNG --bin 970418 --note "CHUYEN TIEN" --amount 50000
//!   vietqr decode "000201010212..."
//!   vietqr session show
//!
//! Fields left out of `encode` are taken from the saved session
//! (`~/.vietqr/session.json`, or `$VIETQR_STORAGE_DIR`). Set `RUST_LOG=debug`
//! for diagnostics.

use std::process;

use clap::{Parser, Subcommand};
use log::debug;

use vietqr::session::SessionStore;
use vietqr::{decode_with, DecodeOptions, ParseMode};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a payload string
    Encode {
        /// Account number or alias
        #[arg(short, long)]
        account: Option<String>,

        /// 6-digit bank BIN
        #[arg(short, long)]
        bin: Option<String>,

        /// Transfer purpose
        #[arg(short, long)]
        note: Option<String>,

        /// Amount in VND, empty for a static code
        #[arg(short = 'm', long)]
        amount: Option<String>,

        /// Save the submitted fields for the next run
        #[arg(short, long)]
        remember: bool,
    },

    /// Print the fields of a scanned payload as JSON
    Decode {
        /// Payload text recovered from the QR code
        payload: String,

        /// Drop trailing characters instead of failing
        #[arg(long)]
        lenient: bool,

        /// Skip CRC verification
        #[arg(long)]
        no_verify: bool,
    },

    /// Inspect or clear saved form values
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Print the saved values
    Show,
    /// Forget the saved values
    Reset,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let args = Args::parse();
    if let Err(message) = run(args.command) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Encode {
            account,
            bin,
            note,
            amount,
            remember,
        } => {
            let mut store = SessionStore::new(None);
            store.load();

            let mut request = store.get_state().to_request();
            if let Some(account) = account {
                request.account_id = account;
            }
            if let Some(bin) = bin {
                request.bank_bin = bin;
            }
            if let Some(note) = note {
                request.note = note;
            }
            if let Some(amount) = amount {
                request.amount = Some(amount);
            }
            debug!("Encoding {:?}", request);

            let payload = request.encode().map_err(|e| e.to_string())?;
            println!("{}", payload);

            if remember {
                store.remember(&request).map_err(|e| e.to_string())?;
            }
            Ok(())
        }
        Command::Decode {
            payload,
            lenient,
            no_verify,
        } => {
            let options = DecodeOptions {
                mode: if lenient {
                    ParseMode::Lenient
                } else {
                    ParseMode::Strict
                },
                verify_checksum: !no_verify,
            };
            // Scanners often hand back a trailing newline
            let decoded = decode_with(payload.trim(), &options).map_err(|e| e.to_string())?;
            let json = serde_json::to_string_pretty(&decoded).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(())
        }
        Command::Session { action } => {
            let mut store = SessionStore::new(None);
            match action {
                SessionAction::Show => {
                    store.load();
                    let json =
                        serde_json::to_string_pretty(store.get_state()).map_err(|e| e.to_string())?;
                    println!("{}", json);
                }
                SessionAction::Reset => {
                    store.reset().map_err(|e| e.to_string())?;
                    println!("Session reset: {}", store.state_file().display());
                }
            }
            Ok(())
        }
    }
}
