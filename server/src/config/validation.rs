//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_REDIS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rediss?://[^\s]+$").expect("static regex"));
static RE_HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/]+(/[^\s]*)?$").expect("static regex"));
static RE_STREAMER_LOGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,25}$").expect("static regex"));

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "PORT" => {
            let v: u32 = value.parse().map_err(|_| "must be an integer")?;
            if !(1..=65535).contains(&v) {
                return Err("must be between 1 and 65535".into());
            }
        }
        "CACHE_BACKEND" => {
            if value != "redis" && value != "memory" {
                return Err("must be 'redis' or 'memory'".into());
            }
        }
        "REDIS_URL" => {
            if !RE_REDIS_URL.is_match(value) {
                return Err("must start with redis:// or rediss://".into());
            }
        }
        "HELIX_BASE_URL" | "OAUTH_TOKEN_URL" => {
            if !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        "TOKEN_EXPIRES_TIME" => validate_int_range(value, 60, 60 * 24 * 3600)?,
        "STREAMER_DATA_EXPIRES_TIME" => validate_int_range(value, 1, 24 * 3600)?,
        "REQUEST_TIMEOUT_SECS" => validate_int_range(value, 1, 60)?,
        "DEFAULT_STREAMERS" => {
            for name in split_list(value) {
                if !RE_STREAMER_LOGIN.is_match(name) {
                    return Err(format!("invalid streamer login: {name}"));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn validate_int_range(value: &str, min: u64, max: u64) -> Result<(), String> {
    let v: u64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
