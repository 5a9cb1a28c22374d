//! Reconnection backoff.

use std::time::Duration;

pub const DEFAULT_BASE_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Linear backoff: the n-th reconnect waits `base_timeout * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_timeout: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_timeout: DEFAULT_BASE_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Attempt counter for one connection driver
#[derive(Debug, Clone)]
pub struct ReconnectState {
    policy: ReconnectPolicy,
    attempts: u32,
}

impl ReconnectState {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    /// Count one more attempt and return how long to wait before it, or
    /// `None` once the policy is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.policy.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.policy.base_timeout * self.attempts)
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_is_linear() {
        // テスト項目: デフォルト設定では 1, 2, 3, 4, 5 秒の待機の後に停止する
        // given (前提条件):
        let mut state = ReconnectState::new(ReconnectPolicy::default());

        // when (操作):
        let delays: Vec<Duration> = std::iter::from_fn(|| state.next_delay()).collect();

        // then (期待する結果):
        assert_eq!(
            delays,
            (1..=5).map(Duration::from_secs).collect::<Vec<_>>()
        );
        assert!(state.is_exhausted());
        assert_eq!(state.next_delay(), None);
    }

    #[test]
    fn test_reset_restarts_schedule() {
        // テスト項目: reset 後は再び基本待機時間から始まる
        // given (前提条件):
        let mut state = ReconnectState::new(ReconnectPolicy {
            base_timeout: Duration::from_millis(250),
            max_attempts: 3,
        });
        state.next_delay();
        state.next_delay();

        // when (操作):
        state.reset();

        // then (期待する結果):
        assert_eq!(state.attempts(), 0);
        assert_eq!(state.next_delay(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_zero_max_attempts_never_retries() {
        // テスト項目: 最大試行回数 0 の場合は再接続しない
        // given (前提条件):
        let mut state = ReconnectState::new(ReconnectPolicy {
            base_timeout: Duration::from_secs(1),
            max_attempts: 0,
        });

        // when (操作) / then (期待する結果):
        assert_eq!(state.next_delay(), None);
    }
}
