//! Environment variable utilities
//!
//! Used by `PoolConfig::from_env` and the driver binaries.
//!
//! ```ignore
//! use rtpool_core::env::env_get;
//!
//! let workers: usize = env_get("RTP_NUM_WORKERS", 4);
//! let width: u32 = env_get("RTP_WIDTH", 600);
//! ```

use std::str::FromStr;

/// Parse `key` as `T`, or fall back to `default` when unset or unparsable
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T`; `None` when unset or unparsable
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Raw string value of `key`, or `default`
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_falls_back() {
        let val: usize = env_get("__RTP_TEST_UNSET_7731__", 42);
        assert_eq!(val, 42);

        let val: Option<u32> = env_get_opt("__RTP_TEST_UNSET_7731__");
        assert!(val.is_none());

        assert_eq!(env_get_str("__RTP_TEST_UNSET_7731__", "hello"), "hello");
    }

    #[test]
    fn test_set_and_invalid() {
        std::env::set_var("__RTP_TEST_NUM__", " 123 ");
        let val: usize = env_get("__RTP_TEST_NUM__", 0);
        assert_eq!(val, 123);

        std::env::set_var("__RTP_TEST_NUM__", "not_a_number");
        let val: usize = env_get("__RTP_TEST_NUM__", 99);
        assert_eq!(val, 99);

        std::env::remove_var("__RTP_TEST_NUM__");
    }
}
