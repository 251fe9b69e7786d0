use std::{path::PathBuf, time::Duration};

/// how the dashboard is run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// the sampling window, which is also the refresh period.
    pub interval: Duration,
    /// where the proc filesystem is mounted.
    pub proc_path: PathBuf,
    /// the key that ends the session.
    pub quit_key: u8,
    /// how many character cells each core's meter takes up.
    pub core_width: u16,
}

// === impl Config ===

impl Config {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_PROC_PATH: &str = "/proc";
    pub const DEFAULT_QUIT_KEY: u8 = b'q';
    pub const DEFAULT_CORE_WIDTH: u16 = 4;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            proc_path: PathBuf::from(Self::DEFAULT_PROC_PATH),
            quit_key: Self::DEFAULT_QUIT_KEY,
            core_width: Self::DEFAULT_CORE_WIDTH,
        }
    }
}

/// parses a refresh interval, in (possibly fractional) seconds.
pub fn parse_interval(s: &str) -> Result<Duration, String> {
    let secs = s
        .parse::<f64>()
        .map_err(|e| format!("`{s}` is not a number of seconds: {e}"))?;

    Duration::try_from_secs_f64(secs).map_err(|e| format!("`{s}` is not a valid interval: {e}"))
}

/// parses a quit key, which must be a single ascii character.
pub fn parse_quit_key(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [key] if key.is_ascii() => Ok(*key),
        _ => Err(format!("`{s}` is not a single ascii character")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let Config {
            interval,
            proc_path,
            quit_key,
            core_width,
        } = Config::default();

        assert_eq!(interval, Duration::from_secs(1));
        assert_eq!(proc_path, PathBuf::from("/proc"));
        assert_eq!(quit_key, b'q');
        assert_eq!(core_width, 4);
    }

    #[test]
    fn intervals() {
        assert_eq!(parse_interval("1"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_interval("0.25"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_interval("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn bad_intervals() {
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("-1").is_err());
        assert!(parse_interval("inf").is_err());
        assert!(parse_interval("NaN").is_err());
    }

    #[test]
    fn quit_keys() {
        assert_eq!(parse_quit_key("x"), Ok(b'x'));
        assert!(parse_quit_key("").is_err());
        assert!(parse_quit_key("xy").is_err());
        assert!(parse_quit_key("é").is_err());
    }
}
