//! the `/proc/meminfo` memory table.
//!
//! the parser is strict: the first sixteen lines must carry exactly the keys in [`KEYS`], in
//! that order. only seven of them are kept.

use {
    crate::source::StatsSource,
    std::{
        io::{self, BufRead, BufReader},
        num::ParseIntError,
        path::PathBuf,
    },
};

/// the keys of the leading lines of `/proc/meminfo`, in the order the kernel prints them.
pub const KEYS: [&str; 16] = [
    "MemTotal",
    "MemFree",
    "MemAvailable",
    "Buffers",
    "Cached",
    "SwapCached",
    "Active",
    "Inactive",
    "Active(anon)",
    "Inactive(anon)",
    "Active(file)",
    "Inactive(file)",
    "Unevictable",
    "Mlocked",
    "SwapTotal",
    "SwapFree",
];

/// a memory snapshot. all values are in kibibytes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
    pub available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum MemInfoParseError {
    #[error("expected `{expected}` on line {line}, found {found:?}")]
    UnexpectedKey {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("missing `{expected}` (table ends after {line} lines)")]
    Missing { line: usize, expected: &'static str },
    #[error("invalid value for `{key}`: {source}")]
    Value {
        key: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("expected `<value> kB` for `{key}`, found {found:?}")]
    Format { key: &'static str, found: String },
    #[error("`MemTotal` is zero")]
    ZeroTotal,
}

#[derive(Debug, thiserror::Error)]
pub enum MemInfoReadError {
    #[error("could not read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unexpected format in `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: MemInfoParseError,
    },
}

// === impl MemInfo ===

impl MemInfo {
    /// reads and parses a memory snapshot from the given source.
    pub fn read(source: &impl StatsSource) -> Result<Self, MemInfoReadError> {
        let path = source.path();
        let reader = source.open().map_err(|source| MemInfoReadError::Io {
            path: path.clone(),
            source,
        })?;

        let mut lines = Vec::with_capacity(KEYS.len());
        for line in BufReader::new(reader).lines().take(KEYS.len()) {
            let line = line.map_err(|source| MemInfoReadError::Io {
                path: path.clone(),
                source,
            })?;
            lines.push(line);
        }

        Self::parse(lines.iter().map(String::as_str))
            .map_err(|source| MemInfoReadError::Parse { path, source })
    }

    /// parses the leading lines of a memory table.
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, MemInfoParseError> {
        let mut lines = lines.into_iter();
        let mut values = [0; KEYS.len()];

        for (line, (&key, value)) in KEYS.iter().zip(values.iter_mut()).enumerate() {
            let text = lines.next().ok_or(MemInfoParseError::Missing {
                line,
                expected: key,
            })?;
            *value = Self::parse_line(line, key, text)?;
        }

        let [
            total,
            free,
            available,
            buffers,
            cached,
            _swap_cached,
            _active,
            _inactive,
            _active_anon,
            _inactive_anon,
            _active_file,
            _inactive_file,
            _unevictable,
            _mlocked,
            swap_total,
            swap_free,
        ] = values;

        if total == 0 {
            return Err(MemInfoParseError::ZeroTotal);
        }

        Ok(Self {
            total,
            free,
            available,
            buffers,
            cached,
            swap_total,
            swap_free,
        })
    }

    /// parses one `<Key>:<spaces><integer> kB` line.
    fn parse_line(line: usize, key: &'static str, text: &str) -> Result<u64, MemInfoParseError> {
        let unexpected_key = || MemInfoParseError::UnexpectedKey {
            line,
            expected: key,
            found: text.to_owned(),
        };
        let format = || MemInfoParseError::Format {
            key,
            found: text.to_owned(),
        };

        let rest = text
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(unexpected_key)?;

        // at least one space separates the key from its value.
        if !rest.starts_with(' ') {
            return Err(format());
        }

        match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [value, "kB"] => value
                .parse()
                .map_err(|source| MemInfoParseError::Value { key, source }),
            _ => Err(format()),
        }
    }

    /// memory in use, i.e. memory that is not available for new allocations.
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }

    /// the fraction of memory in use, in `[0, 1]`.
    pub fn usage(&self) -> f64 {
        self.used() as f64 / self.total as f64
    }
}
