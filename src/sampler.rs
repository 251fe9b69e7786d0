use {
    crate::{
        meminfo::{MemInfo, MemInfoReadError},
        source::{Clock, ProcFile, StatsSource, SystemClock},
        stat::{CpuId, Measurement, Snapshot, StatReadError},
    },
    std::{path::Path, time::Duration},
    tracing::trace,
};

/// samples kernel statistics.
pub struct Sampler<C = SystemClock, S = ProcFile, M = ProcFile> {
    /// the number of logical cpus to read rows for.
    nproc: usize,
    /// the clock used to wait out the sampling window.
    clock: C,
    /// the cpu time table.
    stat: S,
    /// the memory table.
    meminfo: M,
}

/// a recording of the system's cpu load over one sampling window.
#[derive(Clone, Debug)]
pub struct Recording {
    /// how the system cpus spent their time, in aggregate.
    pub system: Measurement,
    /// how each cpu spent its time.
    pub cpus: Vec<(CpuId, Measurement)>,
}

/// === impl Sampler ===

impl Sampler {
    /// creates a new [`Sampler`] reading from the proc filesystem mounted at `proc_path`.
    pub fn new(proc_path: impl AsRef<Path>, nproc: usize) -> Self {
        let proc_path = proc_path.as_ref();
        Self::with_sources(
            nproc,
            SystemClock,
            ProcFile::stat(proc_path),
            ProcFile::meminfo(proc_path),
        )
    }
}

impl<C, S, M> Sampler<C, S, M>
where
    C: Clock,
    S: StatsSource,
    M: StatsSource,
{
    pub fn with_sources(nproc: usize, clock: C, stat: S, meminfo: M) -> Self {
        Self {
            nproc,
            clock,
            stat,
            meminfo,
        }
    }

    pub fn nproc(&self) -> usize {
        self.nproc
    }

    /// reads the aggregate cpu row, and one row per logical cpu.
    pub fn probe(&self) -> Result<Snapshot, StatReadError> {
        let Self { nproc, stat, .. } = self;
        Snapshot::read(stat, *nproc)
    }

    /// probes the cpu times, waits for `interval`, and probes them again.
    ///
    /// NB: this blocks for the whole `interval`.
    pub fn sample_cpu(&self, interval: Duration) -> Result<Recording, StatReadError> {
        let before = self.probe()?;
        self.clock.sleep(interval);
        let after = self.probe()?;

        let recording = Recording::new(before, after)?;
        trace!(system = recording.system.ratio(), "sampled cpu times");

        Ok(recording)
    }

    /// reads a memory snapshot.
    pub fn read_memory(&self) -> Result<MemInfo, MemInfoReadError> {
        MemInfo::read(&self.meminfo)
    }

    #[cfg(test)]
    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }
}

// === impl Recording ===

impl Recording {
    fn new(
        Snapshot {
            system: system_a,
            cpus: cpus_a,
        }: Snapshot,
        Snapshot {
            system: system_b,
            cpus: cpus_b,
        }: Snapshot,
    ) -> Result<Recording, StatReadError> {
        assert_eq!(cpus_a.len(), cpus_b.len());

        let system = Measurement::new(system_a, system_b);

        // zip together the two sets of cpu times.
        let cpus = cpus_a
            .into_iter()
            .zip(cpus_b)
            .enumerate()
            .map(|(i, ((id_a, times_a), (id_b, times_b)))| {
                if id_a != id_b {
                    return Err(StatReadError::CpusChanged { row: i + 1 });
                }
                Ok((id_a, Measurement::new(times_a, times_b)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { system, cpus })
    }

    /// the busy ratio of the whole system.
    pub fn system_ratio(&self) -> f64 {
        self.system.ratio()
    }

    /// the busy ratio of each cpu, in the order they were read.
    pub fn cpu_ratios(&self) -> impl Iterator<Item = f64> + '_ {
        self.cpus.iter().map(|(_, m)| m.ratio())
    }
}
