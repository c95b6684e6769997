// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Raw socket implementation

use crate::error::TransportError;
use log::debug;
use nix::errno::Errno;
use std::mem::size_of;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Exclusively owned raw IPv4 socket. Closed on drop.
pub struct RawSocket {
    fd: libc::c_int,
}

impl RawSocket {
    pub fn new(protocol: libc::c_int) -> Result<Self, TransportError> {
        let fd = unsafe {
            libc::socket(
                libc::AF_INET,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                protocol,
            )
        };

        let fd = Errno::result(fd).map_err(TransportError::from_socket_errno)?;
        debug!("opened raw socket fd={} protocol={}", fd, protocol);

        Ok(Self { fd })
    }

    /// Fixes the peer address. Only datagrams from `dest` are delivered
    /// afterwards.
    pub fn connect(&self, dest: Ipv4Addr) -> Result<(), TransportError> {
        let mut sockaddr: libc::sockaddr_in = unsafe { std::mem::zeroed() };
        sockaddr.sin_family = libc::AF_INET as libc::sa_family_t;
        sockaddr.sin_port = 0;
        sockaddr.sin_addr = libc::in_addr {
            s_addr: u32::from_ne_bytes(dest.octets()),
        };

        let res = unsafe {
            libc::connect(
                self.fd,
                &sockaddr as *const _ as *const libc::sockaddr,
                size_of::<libc::sockaddr_in>() as libc::socklen_t,
            )
        };

        Errno::result(res)
            .map(drop)
            .map_err(|source| TransportError::Connect { addr: dest, source })
    }

    pub fn send(&self, buf: &[u8]) -> Result<usize, TransportError> {
        let sent = unsafe {
            libc::send(
                self.fd,
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
                0,
            )
        };

        let sent = Errno::result(sent).map_err(TransportError::Send)? as usize;
        if sent != buf.len() {
            return Err(TransportError::ShortWrite { sent, len: buf.len() });
        }

        Ok(sent)
    }

    /// Blocks until a datagram arrives or the read timeout elapses.
    pub fn recv(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        let len = unsafe {
            libc::recv(
                self.fd,
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
            )
        };

        Errno::result(len).map(|len| len as usize)
    }

    pub fn set_timeout(&self, duration: Duration) -> Result<(), TransportError> {
        // SO_RCVTIMEO of zero blocks forever.
        let duration = duration.max(Duration::from_micros(1));
        let timeout = libc::timeval {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_usec: duration.subsec_micros() as libc::suseconds_t,
        };

        let res = unsafe {
            libc::setsockopt(
                self.fd,
                libc::SOL_SOCKET,
                libc::SO_RCVTIMEO,
                &timeout as *const _ as *const libc::c_void,
                size_of::<libc::timeval>() as libc::socklen_t,
            )
        };

        Errno::result(res).map(drop).map_err(TransportError::SetTimeout)
    }
}

impl Drop for RawSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
        debug!("closed raw socket fd={}", self.fd);
    }
}

/// Raw socket scoped to ICMP.
pub struct IcmpSocket {
    raw: RawSocket,
}

impl IcmpSocket {
    pub fn open() -> Result<Self, TransportError> {
        Ok(Self {
            raw: RawSocket::new(libc::IPPROTO_ICMP)?,
        })
    }

    pub fn connect(&self, dest: Ipv4Addr) -> Result<(), TransportError> {
        self.raw.connect(dest)
    }

    pub fn send(&self, buf: &[u8]) -> Result<usize, TransportError> {
        self.raw.send(buf)
    }

    pub fn recv(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        self.raw.recv(buf)
    }

    pub fn set_timeout(&self, duration: Duration) -> Result<(), TransportError> {
        self.raw.set_timeout(duration)
    }
}
