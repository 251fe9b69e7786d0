use {
    crate::source::StatsSource,
    std::{
        io::{self, BufRead, BufReader},
        num::ParseIntError,
        path::PathBuf,
        str::FromStr,
    },
};

pub use self::{
    cpu_time::{CpuTime, FIELDS, Measurement},
    user_hz::UserHz,
};

mod cpu_time;
mod user_hz;


/// the cpus' statistics at a moment in time.
///
/// holds exactly one aggregate row and one row per logical cpu that was asked for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pub system: CpuTime,
    pub cpus: Vec<(CpuId, CpuTime)>,
}

/// a cpu line in the `/proc/stat` kernel statistics table.
///
/// see `proc_stat(5)` for more information.
#[derive(Debug, Eq, PartialEq)]
pub enum Entry {
    /// the amount of time that the system ("cpu" line) spent in various states.
    AllCpu { time: CpuTime },
    /// the amount of time that a specific cpu ("cpuN" line) spent in various states.
    Cpu { id: CpuId, time: CpuTime },
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct CpuId(pub(crate) u32);

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum EntryParseError {
    #[error("empty line")]
    Empty,
    #[error("unrecognized entry kind: {kind}")]
    UnrecognizedEntry { kind: String },
    #[error("invalid cpu id: {0}")]
    CpuIdParse(#[source] ParseIntError),
    #[error("invalid time value: {0}")]
    UserHzParse(#[source] ParseIntError),
    #[error("expected at least {} time values, found {found}", FIELDS)]
    CpuTime { found: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum StatReadError {
    #[error("could not read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unexpected format in row {row}: {source}")]
    Entry {
        row: usize,
        #[source]
        source: EntryParseError,
    },
    #[error("row {row} should be the aggregate `cpu` line")]
    ExpectedAggregate { row: usize },
    #[error("row {row} should be a per-cpu `cpuN` line")]
    ExpectedCpu { row: usize },
    #[error("expected {expected} cpu rows, found {found}")]
    MissingRows { expected: usize, found: usize },
    #[error("cpu row {row} changed between readings")]
    CpusChanged { row: usize },
}

// === impl Snapshot ===

impl Snapshot {
    /// uses the given source to parse the aggregate row and `nproc` per-cpu rows.
    ///
    /// any lines after those rows are left unread.
    pub fn read(stats: &impl StatsSource, nproc: usize) -> Result<Snapshot, StatReadError> {
        let io = |source| StatReadError::Io {
            path: stats.path(),
            source,
        };
        let expected = nproc + 1;

        let reader = stats.open().map_err(io)?;
        let mut system = None;
        let mut cpus = Vec::with_capacity(nproc);

        for (row, line) in BufReader::new(reader).lines().take(expected).enumerate() {
            let line = line.map_err(io)?;
            let entry = line
                .parse::<Entry>()
                .map_err(|source| StatReadError::Entry { row, source })?;

            match (row, entry) {
                (0, Entry::AllCpu { time }) => system = Some(time),
                (0, Entry::Cpu { .. }) => return Err(StatReadError::ExpectedAggregate { row }),
                (_, Entry::Cpu { id, time }) => cpus.push((id, time)),
                (_, Entry::AllCpu { .. }) => return Err(StatReadError::ExpectedCpu { row }),
            }
        }

        let found = system.iter().count() + cpus.len();
        match system {
            Some(system) if found == expected => Ok(Snapshot { system, cpus }),
            _ => Err(StatReadError::MissingRows { expected, found }),
        }
    }
}

// === impl Entry ===

impl FromStr for Entry {
    type Err = EntryParseError;
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let mut tokens = entry.split_whitespace();
        let kind = tokens.next().ok_or(EntryParseError::Empty)?;
        let id = Self::parse_cpu_id(kind)?;

        let time = tokens
            .take(FIELDS)
            .map(str::parse::<UserHz>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(EntryParseError::UserHzParse)
            .and_then(CpuTime::try_from)?;

        Ok(if let Some(id) = id {
            Self::Cpu { id, time }
        } else {
            Self::AllCpu { time }
        })
    }
}

impl Entry {
    fn parse_cpu_id(token: &str) -> Result<Option<CpuId>, EntryParseError> {
        use EntryParseError::{CpuIdParse, UnrecognizedEntry};

        // strip the token of its "cpu" prefix.
        let suffix = token.strip_prefix("cpu").ok_or_else(|| UnrecognizedEntry {
            kind: token.to_owned(),
        })?;

        // if there is no suffix, this is the aggregate line.
        if suffix.is_empty() {
            return Ok(None);
        }

        suffix
            .parse::<u32>()
            .map(CpuId)
            .map(Some)
            .map_err(CpuIdParse)
    }
}

// === impl CpuId ===

impl CpuId {
    pub fn as_u32(&self) -> u32 {
        let Self(id) = self;
        *id
    }
}
