use super::*;

/// the number of leading fields of a cpu line that are read.
pub const FIELDS: usize = 7;

/// the amount of time a cpu (or all of them) spent in various states since boot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    user: UserHz,
    /// time spent in user mode with low priority (nice).
    nice: UserHz,
    /// time spent in system mode.
    system: UserHz,
    /// time spent in the idle task.
    ///
    /// this value should be USER_HZ times the second entry in the /proc/uptime pseudo-file.
    idle: UserHz,
    /// time waiting for i/o to complete.
    ///
    /// this value is not reliable, for the following reasons:
    ///   *  the cpu will not wait for i/o to complete; iowait is the time that a task is waiting
    ///      for i/o to complete. when a cpu goes into idle state for outstanding task i/o,
    ///      another task will be scheduled on this cpu.
    ///   *  on a multi-core cpu, the task waiting for i/o to complete is not running on any cpu,
    ///      so the iowait of each cpu is difficult to calculate.
    ///   *  the value in this field may decrease in certain conditions.
    iowait: UserHz,
    /// time servicing interrupts.
    irq: UserHz,
    /// time servicing softirqs.
    softirq: UserHz,
}

/// a measurement of the difference between two [`CpuTime`]s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Measurement {
    user: UserHz,
    nice: UserHz,
    system: UserHz,
    idle: UserHz,
    iowait: UserHz,
    irq: UserHz,
    softirq: UserHz,
}

// == impl Measurement ===

impl Measurement {
    /// compares an earlier reading `a` with a later reading `b`.
    pub fn new(a: CpuTime, b: CpuTime) -> Self {
        let a: [_; FIELDS] = a.into();
        let b: [_; FIELDS] = b.into();

        let [user, nice, system, idle, iowait, irq, softirq] =
            std::array::from_fn(|i| b[i] - a[i]);

        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }
    }

    /// returns the fraction of this window that the cpu spent busy, in `[0, 1]`.
    ///
    /// NB: iowait counts as busy time. only the idle task is idle.
    ///
    /// a window in which no counter moved at all reports `0.0`.
    pub fn ratio(&self) -> f64 {
        let idle = self.idle;
        let total = self.total();

        if total == UserHz::ZERO {
            return 0.0;
        }

        let ratio = 1.0 - (idle / total);
        assert!((0.0..=1.0).contains(&ratio), "ratio {ratio} out of range");

        ratio
    }

    pub fn idle(&self) -> UserHz {
        self.idle
    }

    pub fn total(&self) -> UserHz {
        let Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        } = *self;

        user + nice + system + idle + iowait + irq + softirq
    }
}

// === impl CpuTime ===

impl TryFrom<Vec<UserHz>> for CpuTime {
    type Error = EntryParseError;
    fn try_from(times: Vec<UserHz>) -> Result<Self, Self::Error> {
        let found = times.len();
        times
            .get(..FIELDS)
            .and_then(|leading| <[UserHz; FIELDS]>::try_from(leading).ok())
            .map(Self::from)
            .ok_or(EntryParseError::CpuTime { found })
    }
}

impl From<[UserHz; FIELDS]> for CpuTime {
    fn from([user, nice, system, idle, iowait, irq, softirq]: [UserHz; FIELDS]) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }
    }
}

impl From<CpuTime> for [UserHz; FIELDS] {
    fn from(
        CpuTime {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }: CpuTime,
    ) -> Self {
        [user, nice, system, idle, iowait, irq, softirq]
    }
}
