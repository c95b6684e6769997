// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Resolve a target and run the probe sequence

use crate::config::PingConfig;
use log::{debug, warn};
use netlib::{elapsed_ms, EchoRequest, ProbeResult, Transport, TransportError};
use std::io::{self, Write};
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::thread;
use thiserror::Error;

pub const USAGE: &str = "Please input a valid domain or ip";
pub const TIMEOUT_NOTICE: &str = "Request time out or ICMP is not allowed.";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("empty host")]
    Empty,

    #[error("hostname lookup failed: {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("no IPv4 address for {0}")]
    NoIpv4(String),
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

pub fn resolve(host: &str) -> Result<Ipv4Addr, ResolveError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ResolveError::Empty);
    }

    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Ok(addr);
    }

    let addrs = (host, 0u16).to_socket_addrs().map_err(|source| ResolveError::Lookup {
        host: host.to_string(),
        source,
    })?;

    for addr in addrs {
        if let SocketAddr::V4(v4) = addr {
            return Ok(*v4.ip());
        }
    }

    Err(ResolveError::NoIpv4(host.to_string()))
}

pub fn format_reply(bytes: usize, destination: Ipv4Addr, sequence: u16, ms: f64) -> String {
    format!("{} bytes from {}: seq={} time={:.2}ms", bytes, destination, sequence, ms)
}

/// Resolves `host` once and sends `config.count` probes to it, one at a
/// time. A missing or unresolvable host prints the usage line and sends
/// nothing. A transport error ends the run immediately.
pub fn run<T, W>(
    host: Option<&str>,
    config: &PingConfig,
    transport: &mut T,
    out: &mut W,
) -> Result<(), DriverError>
where
    T: Transport,
    W: Write,
{
    let destination = match host.map(resolve) {
        Some(Ok(addr)) => addr,
        Some(Err(e)) => {
            warn!("{}", e);
            writeln!(out, "{}", USAGE)?;
            return Ok(());
        }
        None => {
            writeln!(out, "{}", USAGE)?;
            return Ok(());
        }
    };

    writeln!(out, "Target IP: {}", destination)?;

    for sequence in 0..config.count {
        let request = EchoRequest::new(config.identifier, sequence);
        debug!("probe seq={} to {}", sequence, destination);

        match transport.probe(&request, destination, config.timeout)? {
            ProbeResult::Reply { bytes, elapsed } => {
                let line = format_reply(bytes, destination, sequence, elapsed_ms(elapsed));
                writeln!(out, "{}", line)?;
            }
            ProbeResult::Timeout => writeln!(out, "{}", TIMEOUT_NOTICE)?,
        }
        out.flush()?;

        if sequence + 1 < config.count {
            thread::sleep(config.interval);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays canned outcomes and records every request it is handed.
    #[derive(Default)]
    struct Scripted {
        outcomes: VecDeque<Result<ProbeResult, TransportError>>,
        sent: Vec<(EchoRequest, Ipv4Addr, Duration)>,
    }

    impl Scripted {
        fn replying() -> Self {
            let mut scripted = Self::default();
            for _ in 0..5 {
                scripted.outcomes.push_back(Ok(ProbeResult::Reply {
                    bytes: 8,
                    elapsed: Duration::from_nanos(12_345_678),
                }));
            }
            scripted
        }
    }

    impl Transport for Scripted {
        fn probe(
            &mut self,
            request: &EchoRequest,
            destination: Ipv4Addr,
            timeout: Duration,
        ) -> Result<ProbeResult, TransportError> {
            self.sent.push((*request, destination, timeout));
            self.outcomes.pop_front().unwrap_or(Ok(ProbeResult::Timeout))
        }
    }

    fn fast_config() -> PingConfig {
        PingConfig {
            interval: Duration::ZERO,
            timeout: Duration::from_millis(50),
            ..PingConfig::default()
        }
    }

    fn run_to_string(
        host: Option<&str>,
        transport: &mut Scripted,
    ) -> (Result<(), DriverError>, String) {
        let mut out = Vec::new();
        let result = run(host, &fast_config(), transport, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn sequence_numbers_run_zero_to_four() {
        let mut transport = Scripted::replying();
        let (result, _) = run_to_string(Some("127.0.0.1"), &mut transport);
        result.unwrap();

        let seqs: Vec<u16> = transport.sent.iter().map(|(r, _, _)| r.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
        assert!(transport.sent.iter().all(|(r, _, _)| r.identifier == 0));
        assert!(transport
            .sent
            .iter()
            .all(|(_, _, t)| *t == Duration::from_millis(50)));
    }

    #[test]
    fn prints_target_and_reply_lines() {
        let mut transport = Scripted::replying();
        let (result, output) = run_to_string(Some("127.0.0.1"), &mut transport);
        result.unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Target IP: 127.0.0.1");
        assert_eq!(lines[1], "8 bytes from 127.0.0.1: seq=0 time=12.35ms");
        assert_eq!(lines[5], "8 bytes from 127.0.0.1: seq=4 time=12.35ms");
    }

    #[test]
    fn timeouts_do_not_stop_the_run() {
        let mut transport = Scripted::default();
        transport.outcomes.push_back(Ok(ProbeResult::Timeout));
        transport.outcomes.push_back(Ok(ProbeResult::Reply {
            bytes: 8,
            elapsed: Duration::from_millis(1),
        }));

        let (result, output) = run_to_string(Some("10.0.0.1"), &mut transport);
        result.unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(transport.sent.len(), 5);
        assert_eq!(lines[1], TIMEOUT_NOTICE);
        assert_eq!(lines[2], "8 bytes from 10.0.0.1: seq=1 time=1.00ms");
        assert_eq!(lines[3], TIMEOUT_NOTICE);
    }

    #[test]
    fn transport_error_aborts_remaining_probes() {
        let mut transport = Scripted::default();
        transport.outcomes.push_back(Ok(ProbeResult::Timeout));
        transport
            .outcomes
            .push_back(Err(TransportError::PermissionDenied(Errno::EPERM)));

        let (result, output) = run_to_string(Some("127.0.0.1"), &mut transport);

        match result {
            Err(DriverError::Transport(e)) => assert!(e.is_permission_denied()),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(transport.sent.len(), 2);
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn missing_host_prints_usage_without_probing() {
        let mut transport = Scripted::replying();
        let (result, output) = run_to_string(None, &mut transport);
        result.unwrap();

        assert_eq!(output, format!("{}\n", USAGE));
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn unresolvable_host_prints_usage_without_probing() {
        for host in ["", "   ", "no such host.invalid"] {
            let mut transport = Scripted::replying();
            let (result, output) = run_to_string(Some(host), &mut transport);
            result.unwrap();

            assert_eq!(output, format!("{}\n", USAGE));
            assert!(transport.sent.is_empty());
        }
    }

    #[test]
    fn resolves_literal_addresses_without_lookup() {
        assert_eq!(resolve("192.0.2.7").unwrap(), Ipv4Addr::new(192, 0, 2, 7));
        assert_eq!(resolve(" 127.0.0.1 ").unwrap(), Ipv4Addr::LOCALHOST);
        assert!(matches!(resolve(""), Err(ResolveError::Empty)));
    }

    #[test]
    fn reply_line_format() {
        assert_eq!(
            format_reply(8, Ipv4Addr::new(1, 2, 3, 4), 3, 0.5),
            "8 bytes from 1.2.3.4: seq=3 time=0.50ms"
        );
    }
}
