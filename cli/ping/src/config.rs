// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Run configuration

use netlib::ReplyPolicy;
use std::time::Duration;

pub const DEFAULT_COUNT: u16 = 5;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);
pub const DEFAULT_IDENTIFIER: u16 = 0;

#[derive(Debug, Clone)]
pub struct PingConfig {
    /// Probes per run; sequence numbers run from 0 to `count - 1`.
    pub count: u16,
    /// Pause between consecutive probes. Not applied after the last one.
    pub interval: Duration,
    /// Read deadline for each probe.
    pub timeout: Duration,
    pub identifier: u16,
    pub reply_policy: ReplyPolicy,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            identifier: DEFAULT_IDENTIFIER,
            reply_policy: ReplyPolicy::AcceptAny,
        }
    }
}
