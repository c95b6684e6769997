// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Transport errors

use nix::errno::Errno;
use thiserror::Error;

/// Unrecoverable failure of the probe transport.
///
/// A read deadline elapsing is not an error; it is reported as
/// [`ProbeResult::Timeout`](crate::ProbeResult::Timeout).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("raw ICMP socket not permitted (requires CAP_NET_RAW or root privileges)")]
    PermissionDenied(#[source] Errno),

    #[error("failed to create raw ICMP socket: {0}")]
    Socket(Errno),

    #[error("failed to set read timeout: {0}")]
    SetTimeout(Errno),

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: std::net::Ipv4Addr,
        #[source]
        source: Errno,
    },

    #[error("send: {0}")]
    Send(Errno),

    #[error("short write: sent {sent} of {len} bytes")]
    ShortWrite { sent: usize, len: usize },
}

impl TransportError {
    pub(crate) fn from_socket_errno(errno: Errno) -> Self {
        match errno {
            Errno::EPERM | Errno::EACCES => Self::PermissionDenied(errno),
            other => Self::Socket(other),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
