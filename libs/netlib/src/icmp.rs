// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! ICMP echo packet implementation

use crate::checksum::checksum;

pub const ICMP_ECHO_REQUEST: u8 = 8;
pub const ICMP_ECHO_REPLY: u8 = 0;
pub const ICMP_HEADER_LEN: usize = 8;

const IPV4_MIN_HEADER_LEN: usize = 20;

/// An ICMP Echo Request with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoRequest {
    pub identifier: u16,
    pub sequence: u16,
}

impl EchoRequest {
    pub fn new(identifier: u16, sequence: u16) -> Self {
        Self { identifier, sequence }
    }

    /// Wire layout with the checksum field zeroed.
    pub fn unsigned_bytes(&self) -> [u8; ICMP_HEADER_LEN] {
        let mut buf = [0u8; ICMP_HEADER_LEN];
        buf[0] = ICMP_ECHO_REQUEST;
        buf[1] = 0;
        buf[4..6].copy_from_slice(&self.identifier.to_be_bytes());
        buf[6..8].copy_from_slice(&self.sequence.to_be_bytes());
        buf
    }

    /// Finalized packet, ready to transmit.
    pub fn to_bytes(&self) -> [u8; ICMP_HEADER_LEN] {
        let mut buf = self.unsigned_bytes();
        let cksum = checksum(&buf);
        buf[2..4].copy_from_slice(&cksum.to_be_bytes());
        buf
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpHeader {
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub icmp_cksum: u16,
    pub icmp_id: u16,
    pub icmp_seq: u16,
}

impl IcmpHeader {
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < ICMP_HEADER_LEN {
            return None;
        }

        Some(Self {
            icmp_type: data[0],
            icmp_code: data[1],
            icmp_cksum: u16::from_be_bytes([data[2], data[3]]),
            icmp_id: u16::from_be_bytes([data[4], data[5]]),
            icmp_seq: u16::from_be_bytes([data[6], data[7]]),
        })
    }

    pub fn is_echo_reply_to(&self, request: &EchoRequest) -> bool {
        self.icmp_type == ICMP_ECHO_REPLY
            && self.icmp_code == 0
            && self.icmp_id == request.identifier
            && self.icmp_seq == request.sequence
    }
}

/// Returns the ICMP message carried by a datagram read from a raw IPv4
/// socket. Input that does not start with a plausible IPv4 header is
/// returned unchanged.
pub fn strip_ipv4_header(datagram: &[u8]) -> &[u8] {
    if datagram.len() < IPV4_MIN_HEADER_LEN || datagram[0] >> 4 != 4 {
        return datagram;
    }

    let ihl = (datagram[0] & 0x0F) as usize * 4;
    if ihl < IPV4_MIN_HEADER_LEN || ihl > datagram.len() {
        return datagram;
    }

    &datagram[ihl..]
}
