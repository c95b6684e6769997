// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Internet checksum

/// Computes the 16-bit one's-complement checksum of `data`.
///
/// Words are read big-endian. An odd trailing byte is added as-is, not
/// shifted into the high half. The 32-bit accumulator wraps, and the carry
/// is folded back exactly once, so a sum whose fold itself overflows keeps
/// that residual carry.
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut words = data.chunks_exact(2);

    for word in &mut words {
        sum = sum.wrapping_add(u16::from_be_bytes([word[0], word[1]]) as u32);
    }

    if let Some(&byte) = words.remainder().first() {
        sum = sum.wrapping_add(byte as u32);
    }

    sum = sum.wrapping_add(sum >> 16);
    !sum as u16
}
