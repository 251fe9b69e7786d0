//! raw terminal sessions.
//!
//! a [`Session`] switches standard input out of canonical mode, so that keystrokes can be
//! polled for without blocking, and hides the cursor. dropping the session puts the terminal
//! back the way it was found, whether the program is quitting, failing, or unwinding from a
//! panic.

use {
    crossterm::{cursor, execute, queue, style::Print},
    std::{
        io::{self, Write},
        mem::MaybeUninit,
        os::fd::RawFd,
    },
    tracing::{debug, warn},
};

/// an active raw terminal session.
pub struct Session {
    fd: RawFd,
    /// the attributes to put back when the session ends.
    original: libc::termios,
}

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("could not get terminal attributes: {0}")]
    Get(#[source] io::Error),
    #[error("could not set terminal attributes: {0}")]
    Set(#[source] io::Error),
    #[error("raw terminal attributes did not take effect")]
    NotApplied,
    #[error("original terminal attributes were not restored")]
    NotRestored,
    #[error("could not write to the terminal: {0}")]
    Io(#[source] io::Error),
}

// === impl Session ===

impl Session {
    /// enters a raw session on standard input.
    ///
    /// the cursor is hidden, and its position is saved; see [`Session::home`].
    pub fn enter() -> Result<Self, TerminalError> {
        let fd = libc::STDIN_FILENO;

        let original = get_attributes(fd).map_err(TerminalError::Get)?;
        let raw = raw_attributes(&original);
        set_attributes(fd, &raw).map_err(TerminalError::Set)?;

        // from here on, dropping the session restores the original attributes.
        let session = Self { fd, original };

        let applied = get_attributes(fd).map_err(TerminalError::Get)?;
        if !same_attributes(&applied, &raw) {
            return Err(TerminalError::NotApplied);
        }

        let mut stdout = io::stdout();
        Self::anchor(&mut stdout)
            .and_then(|()| stdout.flush())
            .map_err(TerminalError::Io)?;
        debug!("entered raw terminal session");

        Ok(session)
    }

    /// the number of rows a frame draws below the anchor row.
    const ROWS_BELOW: u16 = 2;

    /// hides the cursor, and saves the position frames are drawn at.
    ///
    /// the rows below the anchor are reserved first. cursor movement stops at the bottom
    /// margin, so this scrolls the screen once now rather than letting frames overlap.
    fn anchor(writer: &mut impl Write) -> io::Result<()> {
        queue!(
            writer,
            cursor::Hide,
            Print("\n".repeat(usize::from(Self::ROWS_BELOW))),
            cursor::MoveUp(Self::ROWS_BELOW),
            cursor::SavePosition,
        )
    }

    /// moves the cursor back to where it was when the session was entered.
    pub fn home(writer: &mut impl Write) -> io::Result<()> {
        queue!(writer, cursor::RestorePosition)
    }

    fn restore(&self) -> Result<(), TerminalError> {
        let Self { fd, original } = self;

        set_attributes(*fd, original).map_err(TerminalError::Set)?;
        let restored = get_attributes(*fd).map_err(TerminalError::Get)?;
        if !same_attributes(&restored, original) {
            return Err(TerminalError::NotRestored);
        }

        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // the process is on its way out; a failure here can only be reported.
        if let Err(error) = self.restore() {
            warn!(%error, "could not restore terminal");
        }
        if let Err(error) = execute!(io::stdout(), cursor::Show, Print('\n')) {
            warn!(%error, "could not show cursor");
        }
        debug!("left raw terminal session");
    }
}

/// returns `original`, with canonical input and echo turned off, and reads set to return
/// immediately with whatever is available.
fn raw_attributes(original: &libc::termios) -> libc::termios {
    let mut raw = *original;

    raw.c_lflag &= !(libc::ICANON | libc::ECHO);
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = 0;

    raw
}

fn same_attributes(a: &libc::termios, b: &libc::termios) -> bool {
    a.c_iflag == b.c_iflag
        && a.c_oflag == b.c_oflag
        && a.c_cflag == b.c_cflag
        && a.c_lflag == b.c_lflag
        && a.c_cc == b.c_cc
}

fn get_attributes(fd: RawFd) -> io::Result<libc::termios> {
    let mut attributes = MaybeUninit::<libc::termios>::uninit();

    // SAFETY: `tcgetattr` fully initializes `attributes` when it succeeds.
    match unsafe { libc::tcgetattr(fd, attributes.as_mut_ptr()) } {
        0 => Ok(unsafe { attributes.assume_init() }),
        _ => Err(io::Error::last_os_error()),
    }
}

fn set_attributes(fd: RawFd, attributes: &libc::termios) -> io::Result<()> {
    // SAFETY: `attributes` is a valid, initialized `termios`.
    match unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, attributes) } {
        0 => Ok(()),
        _ => Err(io::Error::last_os_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cooked() -> libc::termios {
        // SAFETY: `termios` is plain old data; all zeroes is a valid value.
        let mut attributes: libc::termios = unsafe { std::mem::zeroed() };
        attributes.c_lflag = libc::ICANON | libc::ECHO | libc::ISIG;
        attributes.c_cc[libc::VMIN] = 1;
        attributes.c_cc[libc::VTIME] = 5;
        attributes
    }

    #[test]
    fn anchor_reserves_rows_before_saving_position() {
        let mut output = Vec::new();
        Session::anchor(&mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(output, "\x1b[?25l\n\n\x1b[2A\x1b7");
    }

    #[test]
    fn raw_disables_canonical_input_and_echo() {
        let raw = raw_attributes(&cooked());
        assert_eq!(raw.c_lflag & libc::ICANON, 0);
        assert_eq!(raw.c_lflag & libc::ECHO, 0);
    }

    /// ctrl-c still delivers a signal.
    #[test]
    fn raw_keeps_signals() {
        let raw = raw_attributes(&cooked());
        assert_ne!(raw.c_lflag & libc::ISIG, 0);
    }

    #[test]
    fn raw_reads_do_not_wait() {
        let raw = raw_attributes(&cooked());
        assert_eq!(raw.c_cc[libc::VMIN], 0);
        assert_eq!(raw.c_cc[libc::VTIME], 0);
    }

    #[test]
    fn comparison() {
        let original = cooked();
        assert!(same_attributes(&original, &original));
        assert!(!same_attributes(&original, &raw_attributes(&original)));
    }

    #[test]
    fn not_a_tty() {
        // a pipe is never a terminal.
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        let err = get_attributes(fds[0]).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOTTY));

        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }
}
