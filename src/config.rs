use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PLACEHOLDER_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_COMPACT_BREAKPOINT_PX: f64 = 768.0;

/// Delays of the two reply phases, both measured from the submission instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplyTiming {
    pub placeholder_delay: Duration,
    pub reply_delay: Duration,
}

impl Default for ReplyTiming {
    fn default() -> Self {
        Self {
            placeholder_delay: DEFAULT_PLACEHOLDER_DELAY,
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }
}

/// What happens to an outstanding reply when the user submits again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplyPolicy {
    /// Every reply runs to completion independently.
    #[default]
    Overlapping,
    /// A new submission cancels the reply still in flight.
    SingleFlight,
}

impl FromStr for ReplyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlapping" => Ok(ReplyPolicy::Overlapping),
            "single-flight" | "single_flight" | "singleflight" => Ok(ReplyPolicy::SingleFlight),
            other => Err(format!("unknown reply policy '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShellConfig {
    pub timing: ReplyTiming,
    pub policy: ReplyPolicy,
    pub compact_breakpoint_px: f64,
    pub storage_dir: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            timing: ReplyTiming::default(),
            policy: ReplyPolicy::default(),
            compact_breakpoint_px: DEFAULT_COMPACT_BREAKPOINT_PX,
            storage_dir: None,
        }
    }
}

impl ShellConfig {
    /// Reads `CHATSHELL_*` variables, keeping defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let placeholder_ms = parse_var(&lookup, "CHATSHELL_PLACEHOLDER_DELAY_MS");
        let reply_ms = parse_var(&lookup, "CHATSHELL_REPLY_DELAY_MS");

        Self {
            timing: ReplyTiming {
                placeholder_delay: placeholder_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.timing.placeholder_delay),
                reply_delay: reply_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.timing.reply_delay),
            },
            policy: parse_var(&lookup, "CHATSHELL_REPLY_POLICY").unwrap_or(defaults.policy),
            compact_breakpoint_px: parse_var(&lookup, "CHATSHELL_COMPACT_BREAKPOINT_PX")
                .unwrap_or(defaults.compact_breakpoint_px),
            storage_dir: lookup("CHATSHELL_STORAGE_DIR")
                .map(|dir| dir.trim().to_string())
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, value = %raw, error = %err, "ignoring invalid config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ShellConfig::from_lookup(|_| None);
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.timing.placeholder_delay, Duration::from_millis(500));
        assert_eq!(config.timing.reply_delay, Duration::from_millis(2000));
        assert_eq!(config.compact_breakpoint_px, 768.0);
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = ShellConfig::from_lookup(lookup_from(&[
            ("CHATSHELL_PLACEHOLDER_DELAY_MS", "250"),
            ("CHATSHELL_REPLY_DELAY_MS", "soon"),
            ("CHATSHELL_REPLY_POLICY", "single-flight"),
            ("CHATSHELL_STORAGE_DIR", "  "),
        ]));
        assert_eq!(config.timing.placeholder_delay, Duration::from_millis(250));
        assert_eq!(config.timing.reply_delay, DEFAULT_REPLY_DELAY);
        assert_eq!(config.policy, ReplyPolicy::SingleFlight);
        assert_eq!(config.storage_dir, None);
    }
}
