use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env::{self, VarError};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

static LOAD_ENV: OnceLock<()> = OnceLock::new();

/// Loads environment variables from dotenv files, at most once per process.
///
/// Files are read in this order, and none of them overrides a variable that
/// is already set:
/// 1. `.env`
/// 2. `.env.dev` in debug builds, `.env.prod` in release builds
/// 3. `.env.local`
pub fn load_dotenv() {
    LOAD_ENV.get_or_init(|| {
        dotenv().ok();

        let env_file = if cfg!(debug_assertions) { ".env.dev" } else { ".env.prod" };
        for file in [env_file, ".env.local"] {
            if Path::new(file).exists() {
                dotenvy::from_filename(file).ok();
            }
        }
    });
}

/// Reads `key` verbatim. `Ok(None)` only when the variable is unset;
/// a value that is not valid UTF-8 is an error rather than a fallback.
pub fn read_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{} env var is not valid UTF-8", key)),
    }
}

/// Reads `key` and parses it into `T`, falling back to `default` when unset.
/// The raw value is parsed as-is, without trimming.
pub fn get_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match read_env(key)? {
        Some(val) => val
            .parse()
            .map_err(|e| anyhow!("Failed to parse {} env var: {}", key, e)),
        None => Ok(default),
    }
}

/// Reads a comma separated list from `key`. Blank items are skipped.
pub fn get_vec_from_env_or<T>(key: &str, default: Vec<T>) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    match read_env(key)? {
        Some(val) => parse_list(&val).with_context(|| format!("Failed to parse {} env var", key)),
        None => Ok(default),
    }
}

/// Reads a byte size from `key`, accepting `K`, `M` and `G` suffixes.
pub fn get_size_from_env_or(key: &str, default: u64) -> Result<u64> {
    match read_env(key)? {
        Some(val) => parse_size(val.trim())
            .ok_or_else(|| anyhow!("Failed to parse {} env var as a size", key)),
        None => Ok(default),
    }
}

/// Reads a flag from `key`. See [`parse_bool`] for the accepted spellings.
pub fn get_bool_from_env_or(key: &str, default: bool) -> Result<bool> {
    match read_env(key)? {
        Some(val) => {
            parse_bool(&val).ok_or_else(|| anyhow!("Failed to parse {} env var as `bool`", key))
        }
        None => Ok(default),
    }
}

pub fn parse_list<T>(value: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(Into::into))
        .collect()
}

/// `true`, `1`, `yes`, `on` and `false`, `0`, `no`, `off`, case-insensitive.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Converts a size string such as `64K` or `10m` into bytes.
/// Returns `None` for empty input, unknown suffixes and overflow.
pub fn parse_size(size_str: &str) -> Option<u64> {
    let size_str = size_str.to_lowercase();

    let (num_part, multiplier) = match size_str.chars().last()? {
        'k' => (&size_str[..size_str.len() - 1], 1024u64),
        'm' => (&size_str[..size_str.len() - 1], 1024u64 * 1024),
        'g' => (&size_str[..size_str.len() - 1], 1024u64 * 1024 * 1024),
        _ => (size_str.as_str(), 1),
    };

    num_part.parse::<u64>().ok()?.checked_mul(multiplier)
}
