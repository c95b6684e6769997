// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Single-shot ICMP echo probe

use crate::error::TransportError;
use crate::icmp::{strip_ipv4_header, EchoRequest, IcmpHeader};
use crate::raw::IcmpSocket;
use log::debug;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

/// Room for an IPv4 header with options, the ICMP header and a payload.
pub const RECV_BUF_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeResult {
    /// `bytes` counts the ICMP message, without the IPv4 header.
    Reply { bytes: usize, elapsed: Duration },
    Timeout,
}

/// Which received datagrams count as the reply to a probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyPolicy {
    /// The first datagram read within the deadline, whatever it contains.
    #[default]
    AcceptAny,
    /// Only an Echo Reply carrying the request's identifier and sequence.
    MatchEcho,
}

pub trait Transport {
    /// Sends `request` to `destination` and waits at most `timeout` for a
    /// reply.
    fn probe(
        &mut self,
        request: &EchoRequest,
        destination: Ipv4Addr,
        timeout: Duration,
    ) -> Result<ProbeResult, TransportError>;
}

/// Opens a fresh raw ICMP socket for every probe.
#[derive(Debug, Clone, Default)]
pub struct RawTransport {
    policy: ReplyPolicy,
}

impl RawTransport {
    pub fn new(policy: ReplyPolicy) -> Self {
        Self { policy }
    }
}

impl Transport for RawTransport {
    fn probe(
        &mut self,
        request: &EchoRequest,
        destination: Ipv4Addr,
        timeout: Duration,
    ) -> Result<ProbeResult, TransportError> {
        let packet = request.to_bytes();

        let socket = IcmpSocket::open()?;
        socket.connect(destination)?;
        socket.set_timeout(timeout)?;

        let start = Instant::now();
        socket.send(&packet)?;

        await_reply(&socket, request, start, timeout, self.policy)
    }
}

/// Reads until a datagram acceptable under `policy` arrives or `timeout`,
/// counted from `start`, elapses. Any read error is a timeout.
fn await_reply(
    socket: &IcmpSocket,
    request: &EchoRequest,
    start: Instant,
    timeout: Duration,
    policy: ReplyPolicy,
) -> Result<ProbeResult, TransportError> {
    let deadline = start + timeout;
    let mut recv_buf = [0u8; RECV_BUF_LEN];

    loop {
        let len = match socket.recv(&mut recv_buf) {
            Ok(len) => len,
            Err(errno) => {
                debug!("seq={} recv: {}", request.sequence, errno);
                return Ok(ProbeResult::Timeout);
            }
        };
        let elapsed = start.elapsed();

        let icmp = strip_ipv4_header(&recv_buf[..len]);
        if policy == ReplyPolicy::AcceptAny || is_match(icmp, request) {
            return Ok(ProbeResult::Reply {
                bytes: icmp.len(),
                elapsed,
            });
        }

        debug!("seq={} skipping unrelated datagram ({} bytes)", request.sequence, len);
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(ProbeResult::Timeout);
        }
        socket.set_timeout(remaining)?;
    }
}

fn is_match(icmp: &[u8], request: &EchoRequest) -> bool {
    IcmpHeader::parse(icmp).map_or(false, |header| header.is_echo_reply_to(request))
}

/// Round-trip time in fractional milliseconds.
pub fn elapsed_ms(elapsed: Duration) -> f64 {
    elapsed.as_nanos() as f64 / 1e6
}
