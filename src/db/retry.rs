//! 연결 재시도 정책
//!
//! MongoDB, PostgreSQL, ORM 연결 헬퍼가 공유하는 고정 횟수 재시도 루프입니다.
//! 전체 루프는 하나의 마감 시각 안에서 실행되며, 각 시도는
//! [`RetryPolicy::attempt_timeout`]으로 따로 제한됩니다.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::{info, warn};
use tokio::time::Instant;

use super::DbError;

/// 한 번의 시도에 주어지는 최소 시간
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(100);

/// 재시도 정책
///
/// ## 기본값
///
/// - `max_retries`: 3
/// - `timeout`: 30초 (모든 시도를 합친 시간)
/// - `retry_delay`: 5초
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최대 연결 시도 횟수
    pub max_retries: u32,
    /// 전체 연결 시도 제한 시간
    pub timeout: Duration,
    /// 실패 후 다음 시도까지 대기 시간
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, timeout: Duration) -> Self {
        Self {
            max_retries,
            timeout,
            ..Self::default()
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// 한 번의 연결 시도에 허용되는 시간
    ///
    /// 전체 제한 시간에서 재시도 대기 시간을 뺀 뒤 시도 횟수로 나눕니다.
    /// 드라이버별 연결/서버 선택 타임아웃에도 이 값을 사용합니다.
    pub fn attempt_timeout(&self) -> Duration {
        let retries = self.max_retries.max(1);
        let delays = self.retry_delay.saturating_mul(retries - 1);
        let budget = self.timeout.saturating_sub(delays);

        (budget / retries).max(MIN_ATTEMPT_TIMEOUT)
    }
}

/// 재시도 정책에 따라 연결 함수를 반복 호출합니다.
///
/// # Arguments
///
/// * `target` - 로그/에러 메시지에 사용할 대상 이름 (예: "MongoDB")
/// * `dsn` - 연결 문자열. 비어 있으면 시도하지 않고 실패
/// * `policy` - 재시도 정책
/// * `connect` - 시도 번호(1부터)를 받아 연결을 수행하는 함수
///
/// # Errors
///
/// * `DbError::MissingDsn` - DSN이 비어 있음
/// * `DbError::InvalidPolicy` - `max_retries`가 0
/// * `DbError::Timeout` - 제한 시간 초과
/// * `DbError::RetriesExhausted` - 모든 시도 실패
///
/// # Examples
///
/// ```rust,ignore
/// let client = retry_connect("MongoDB", dsn, &policy, |_| async move {
///     Client::with_uri_str(dsn).await
/// }).await?;
/// ```
pub async fn retry_connect<T, E, F, Fut>(
    target: &str,
    dsn: &str,
    policy: &RetryPolicy,
    mut connect: F,
) -> Result<T, DbError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    if dsn.trim().is_empty() {
        return Err(DbError::MissingDsn(target.to_string()));
    }
    if policy.max_retries == 0 {
        return Err(DbError::InvalidPolicy("max_retries must be at least 1".to_string()));
    }

    let deadline = Instant::now() + policy.timeout;
    let attempt_timeout = policy.attempt_timeout();
    let timed_out = || DbError::Timeout {
        target: target.to_string(),
        timeout: policy.timeout,
    };
    let mut last_error = String::new();

    for attempt in 1..=policy.max_retries {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(timed_out());
        }

        let limit = attempt_timeout.min(remaining);
        match tokio::time::timeout(limit, connect(attempt)).await {
            Ok(Ok(connection)) => {
                info!("✅ {} 연결 성공 (시도 {}/{})", target, attempt, policy.max_retries);
                return Ok(connection);
            }
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = format!("attempt timed out after {:?}", limit),
        }
        warn!("⚠️ {} 연결 시도 {} 실패: {}", target, attempt, last_error);

        if attempt < policy.max_retries {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }
            info!("{:?} 후 재시도합니다", policy.retry_delay);
            tokio::time::sleep(policy.retry_delay.min(remaining)).await;
        }
    }

    Err(DbError::RetriesExhausted {
        target: target.to_string(),
        attempts: policy.max_retries,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_secs(5)).with_retry_delay(Duration::from_millis(1))
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_attempt_timeout_splits_budget() {
        let policy = RetryPolicy::new(3, Duration::from_secs(32)).with_retry_delay(Duration::from_secs(1));
        assert_eq!(policy.attempt_timeout(), Duration::from_secs(10));

        let tight = RetryPolicy::new(5, Duration::from_millis(20)).with_retry_delay(Duration::from_secs(1));
        assert_eq!(tight.attempt_timeout(), MIN_ATTEMPT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_hanging_attempts_are_each_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(600)).with_retry_delay(Duration::from_millis(1));

        let result: Result<(), DbError> = retry_connect("hang", "dsn://x", &policy, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<(), String>(())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(DbError::RetriesExhausted { attempts, last_error, .. }) => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("timed out"));
            }
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);

        let result = retry_connect("test", "dsn://x", &fast_policy(3), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err("not yet")
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted_keeps_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), DbError> = retry_connect("test", "dsn://x", &fast_policy(2), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("refused #{}", attempt)) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match result {
            Err(DbError::RetriesExhausted { target, attempts, last_error }) => {
                assert_eq!(target, "test");
                assert_eq!(attempts, 2);
                assert_eq!(last_error, "refused #2");
            }
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_dsn_is_rejected_without_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<(), DbError> = retry_connect("MongoDB", "  ", &fast_policy(3), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), String>(()) }
        })
        .await;

        assert!(matches!(result, Err(DbError::MissingDsn(ref t)) if t == "MongoDB"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_retries_is_invalid() {
        let result: Result<(), DbError> =
            retry_connect("test", "dsn://x", &fast_policy(0), |_| async { Ok::<(), String>(()) }).await;

        assert!(matches!(result, Err(DbError::InvalidPolicy(_))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let policy = RetryPolicy::new(5, Duration::from_millis(20)).with_retry_delay(Duration::from_millis(1));

        let result: Result<(), DbError> = retry_connect("slow", "dsn://x", &policy, |_| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), String>(())
        })
        .await;

        assert!(matches!(result, Err(DbError::Timeout { .. })));
    }
}
