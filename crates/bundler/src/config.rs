use crate::error::{BundlerError, Result};
use crate::ignore::DEFAULT_IGNORE_FILE;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "context.md";
pub const DEFAULT_MAX_PART_SIZE: u64 = 100 * 1024 * 1024;

pub const ENV_OUTPUT: &str = "LCB_OUTPUT";
pub const ENV_MAX_PART_SIZE: &str = "LCB_MAX_PART_SIZE";
pub const ENV_IGNORE_FILE: &str = "LCB_IGNORE_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Output path; split runs derive `<stem>_partN<.ext>` from it.
    pub output: PathBuf,

    /// Upper bound for the estimated size of one part, in bytes.
    pub max_part_size: u64,

    /// Ignore source looked up in every root.
    pub ignore_file_name: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_part_size: DEFAULT_MAX_PART_SIZE,
            ignore_file_name: DEFAULT_IGNORE_FILE.to_string(),
        }
    }
}

impl BundleConfig {
    /// Defaults overridden by `LCB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(output) = value(ENV_OUTPUT) {
            config.output = PathBuf::from(output);
        }
        if let Some(raw) = value(ENV_MAX_PART_SIZE) {
            config.max_part_size = parse_size(&raw)?;
        }
        if let Some(name) = value(ENV_IGNORE_FILE) {
            config.ignore_file_name = name;
        }
        Ok(config)
    }
}

/// Parse a byte size such as `1048576`, `512KiB`, `100 MiB` or `2gb`.
///
/// `K`/`KB`/`M`/`MB`/`G`/`GB` are powers of 1000, the `*iB` forms powers of
/// 1024. Units are case-insensitive; zero is rejected.
pub fn parse_size(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let invalid = || BundlerError::InvalidSize(raw.to_string());

    let value: u64 = digits.parse().map_err(|_| invalid())?;
    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1_000,
        "kib" => 1 << 10,
        "m" | "mb" => 1_000_000,
        "mib" => 1 << 20,
        "g" | "gb" => 1_000_000_000,
        "gib" => 1 << 30,
        _ => return Err(invalid()),
    };

    match value.checked_mul(multiplier) {
        Some(0) | None => Err(invalid()),
        Some(bytes) => Ok(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn parse_size_accepts_bytes_and_units() {
        assert_eq!(parse_size("1048576").unwrap(), 1_048_576);
        assert_eq!(parse_size(" 100MiB ").unwrap(), DEFAULT_MAX_PART_SIZE);
        assert_eq!(parse_size("100 mib").unwrap(), DEFAULT_MAX_PART_SIZE);
        assert_eq!(parse_size("512KiB").unwrap(), 512 * 1024);
        assert_eq!(parse_size("2gb").unwrap(), 2_000_000_000);
        assert_eq!(parse_size("3K").unwrap(), 3_000);
        assert_eq!(parse_size("7b").unwrap(), 7);
    }

    #[test]
    fn parse_size_rejects_garbage_zero_and_overflow() {
        for raw in ["", "MiB", "-1", "1.5MiB", "10 parsecs", "0", "0KiB"] {
            assert!(
                matches!(parse_size(raw), Err(BundlerError::InvalidSize(_))),
                "{raw:?} should be rejected"
            );
        }
        assert!(parse_size("18446744073709551615GiB").is_err());
    }

    #[test]
    fn env_overrides_defaults_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_OUTPUT, "out/bundle.md"),
            (ENV_MAX_PART_SIZE, "1MiB"),
            (ENV_IGNORE_FILE, "   "),
        ]);
        let config =
            BundleConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.output, PathBuf::from("out/bundle.md"));
        assert_eq!(config.max_part_size, 1 << 20);
        assert_eq!(config.ignore_file_name, DEFAULT_IGNORE_FILE);
    }

    #[test]
    fn invalid_env_size_is_a_configuration_error() {
        let err = BundleConfig::from_lookup(|key| {
            (key == ENV_MAX_PART_SIZE).then(|| "lots".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, BundlerError::InvalidSize(_)));
    }

    #[test]
    fn defaults_without_env() {
        let config = BundleConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, BundleConfig::default());
    }
}
