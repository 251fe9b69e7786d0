use std::io::{self, ErrorKind, Read};

/// drains every byte that is currently available from `input`, and reports whether `key`
/// was among them.
///
/// `input` is expected to be non-blocking: a read of zero bytes, or one that would block,
/// means nothing more is pending.
pub fn drain_for_key(input: &mut impl Read, key: u8) -> io::Result<bool> {
    let mut buf = [0; 64];
    let mut seen = false;

    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(seen),
            Ok(n) => seen |= buf[..n].contains(&key),
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(seen),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::io::Cursor};

    /// yields one error, then nothing.
    struct Failing(Option<io::Error>);

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            self.0.take().map(Err).unwrap_or(Ok(0))
        }
    }

    #[test]
    fn nothing_pending() {
        assert!(!drain_for_key(&mut io::empty(), b'q').unwrap());
    }

    #[test]
    fn key_anywhere() {
        let mut input = Cursor::new(b"abcqdef".to_vec());
        assert!(drain_for_key(&mut input, b'q').unwrap());
        // everything was drained.
        assert_eq!(input.position(), 7);
    }

    #[test]
    fn key_past_first_read() {
        let mut bytes = vec![b'x'; 200];
        bytes.push(b'q');
        assert!(drain_for_key(&mut Cursor::new(bytes), b'q').unwrap());
    }

    #[test]
    fn other_keys() {
        let mut input = Cursor::new(b"hello".to_vec());
        assert!(!drain_for_key(&mut input, b'q').unwrap());
    }

    #[test]
    fn would_block_is_empty() {
        let mut input = Failing(Some(ErrorKind::WouldBlock.into()));
        assert!(!drain_for_key(&mut input, b'q').unwrap());
    }

    #[test]
    fn interrupted_is_retried() {
        let mut input = Failing(Some(ErrorKind::Interrupted.into()));
        assert!(!drain_for_key(&mut input, b'q').unwrap());
    }

    #[test]
    fn other_errors_are_fatal() {
        let mut input = Failing(Some(ErrorKind::BrokenPipe.into()));
        let err = drain_for_key(&mut input, b'q').unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }
}
