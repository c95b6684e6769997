// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! ping - Send ICMP echo requests

mod config;
mod driver;

use anyhow::Result;
use clap::Parser;
use config::PingConfig;
use driver::DriverError;
use log::LevelFilter;
use netlib::{RawTransport, ReplyPolicy};
use std::io;
use std::process::exit;

/// Ping utility
#[derive(Parser, Debug)]
#[command(name = "ping")]
#[command(author = "The Rustux Authors")]
#[command(about = "Send five ICMP ECHO_REQUEST packets to a network host", long_about = None)]
struct Args {
    /// Host name or IPv4 address to ping
    host: Option<String>,

    /// Only count Echo Replies whose identifier and sequence match the request
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = PingConfig {
        reply_policy: if args.strict {
            ReplyPolicy::MatchEcho
        } else {
            ReplyPolicy::AcceptAny
        },
        ..PingConfig::default()
    };

    let mut transport = RawTransport::new(config.reply_policy);
    let stdout = io::stdout();

    match driver::run(args.host.as_deref(), &config, &mut transport, &mut stdout.lock()) {
        Ok(()) => Ok(()),
        Err(DriverError::Transport(e)) => {
            eprintln!("ping: {}", e);
            if e.is_permission_denied() {
                eprintln!("Note: ICMP sockets require CAP_NET_RAW capability or root privileges");
            }
            exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp_millis().init();
}
