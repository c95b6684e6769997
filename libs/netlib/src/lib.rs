// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! netlib - Networking Library for Rustica
//!
//! Provides the Internet checksum, ICMP echo packets, raw ICMP sockets and
//! a single-shot echo probe built on them.

pub mod checksum;
pub mod error;
pub mod icmp;
pub mod probe;
pub mod raw;

pub use checksum::checksum;
pub use error::TransportError;
pub use icmp::{EchoRequest, IcmpHeader, ICMP_ECHO_REPLY, ICMP_ECHO_REQUEST, ICMP_HEADER_LEN};
pub use probe::{elapsed_ms, ProbeResult, RawTransport, ReplyPolicy, Transport};
pub use raw::{IcmpSocket, RawSocket};
