use std::{
    cell::RefCell,
    collections::VecDeque,
    fs::File,
    io::{self, BufReader, Cursor, Read},
    path::{Path, PathBuf},
    time::Duration,
};

pub use self::{clock::*, stats::*};

mod clock {
    use super::*;

    /// waits out the sampling window.
    pub trait Clock {
        fn sleep(&self, duration: Duration);
    }

    #[derive(Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn sleep(&self, duration: Duration) {
            std::thread::sleep(duration)
        }
    }

    /// a mock clock, which records how long it was asked to sleep.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockClock {
        slept: RefCell<Vec<Duration>>,
    }

    impl Clock for MockClock {
        fn sleep(&self, duration: Duration) {
            let MockClock { slept } = self;
            slept.borrow_mut().push(duration);
        }
    }

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockClock {
        pub fn slept(&self) -> Vec<Duration> {
            self.slept.borrow().clone()
        }
    }
}

/// abstracts over providers of statistics.
mod stats {
    use super::*;

    /// a source of kernel statistics.
    pub trait StatsSource {
        /// returns a reader.
        fn open(&self) -> io::Result<impl Read>;

        /// where the statistics come from, for error reports.
        fn path(&self) -> PathBuf;
    }

    /// stats backed by a pseudo-file under a proc root, e.g. `/proc/stat`.
    #[derive(Clone, Debug)]
    pub struct ProcFile {
        path: PathBuf,
    }

    /// a mock stat source.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockFile {
        stats: RefCell<VecDeque<String>>,
    }

    // === impl ProcFile ===

    impl StatsSource for ProcFile {
        fn open(&self) -> io::Result<impl Read> {
            File::open(&self.path).map(BufReader::new)
        }

        fn path(&self) -> PathBuf {
            self.path.clone()
        }
    }

    impl ProcFile {
        const STAT: &str = "stat";
        const MEMINFO: &str = "meminfo";

        /// the cpu time table, `<root>/stat`.
        pub fn stat(root: impl AsRef<Path>) -> Self {
            Self {
                path: root.as_ref().join(Self::STAT),
            }
        }

        /// the memory table, `<root>/meminfo`.
        pub fn meminfo(root: impl AsRef<Path>) -> Self {
            Self {
                path: root.as_ref().join(Self::MEMINFO),
            }
        }
    }

    // === impl MockFile ===

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockFile {
        /// returns a source that yields each of the given contents once, in order.
        pub fn new<I>(contents: I) -> Self
        where
            I: IntoIterator,
            I::Item: Into<String>,
        {
            let stats = contents.into_iter().map(Into::into).collect();
            Self {
                stats: RefCell::new(stats),
            }
        }
    }

    impl StatsSource for MockFile {
        fn open(&self) -> io::Result<impl Read> {
            let Self { stats } = self;

            stats
                .borrow_mut()
                .pop_front()
                .map(Cursor::new)
                .map(Ok)
                .expect("mock stats should not be empty")
        }

        fn path(&self) -> PathBuf {
            PathBuf::from("mock")
        }
    }
}
