use super::*;
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn window(source: &str, size: usize) -> SourceWindow<&[u8]> {
    SourceWindow::open(source.as_bytes(), NonZeroUsize::new(size).unwrap()).unwrap()
}

/// Capture from the current byte up to (not including) the first `stop`.
fn capture_until(window: &mut SourceWindow<&[u8]>, stop: u8) -> String {
    window.start_capture();
    while !window.is_eof() && !window.is(stop) {
        window.read().unwrap();
    }
    window.end_capture().unwrap().into_owned()
}

// === Reading ===

#[test]
fn primes_first_byte_on_open() {
    let w = window("abc", 10);
    assert_eq!(w.current(), Some(b'a'));
    assert!(!w.is_eof());
}

#[test]
fn empty_input_is_eof_immediately() {
    let w = window("", 10);
    assert!(w.is_eof());
    assert_eq!(w.current(), None);
    assert_eq!(w.location(), Location::START);
}

#[test]
fn reads_across_refills() {
    let mut w = window("abcdefg", 2);
    let mut seen = Vec::new();
    while let Some(b) = w.current() {
        seen.push(b);
        w.read().unwrap();
    }
    assert_eq!(seen, b"abcdefg");
}

#[test]
fn read_at_eof_is_a_no_op() {
    let mut w = window("a", 10);
    w.read().unwrap();
    assert!(w.is_eof());
    let before = w.location();
    w.read().unwrap();
    w.read().unwrap();
    assert!(w.is_eof());
    assert_eq!(w.location(), before);
}

#[test]
fn for_str_sizes_window_from_length() {
    let w = SourceWindow::for_str("abc").unwrap();
    assert_eq!(w.buffer_size(), crate::MIN_BUFFER_SIZE);
}

// === Capture ===

#[test]
fn capture_within_single_window_borrows() {
    let mut w = window("hello$world", 64);
    w.start_capture();
    while !w.is(b'$') {
        w.read().unwrap();
    }
    let captured = w.end_capture().unwrap();
    assert!(matches!(captured, Cow::Borrowed("hello")));
}

#[test]
fn capture_straddling_refill_spills_into_overflow() {
    let mut w = window("hello world$rest", 4);
    w.start_capture();
    while !w.is(b'$') {
        w.read().unwrap();
    }
    let captured = w.end_capture().unwrap();
    assert!(matches!(captured, Cow::Owned(_)));
    assert_eq!(captured, "hello world");
}

#[test]
fn overflow_is_cleared_between_captures() {
    let mut w = window("abcdefgh,ij", 3);
    assert_eq!(capture_until(&mut w, b','), "abcdefgh");
    w.read().unwrap();
    assert_eq!(capture_until(&mut w, b','), "ij");
}

#[test]
fn capture_to_end_of_input() {
    let mut w = window("tail text", 4);
    assert_eq!(capture_until(&mut w, b'$'), "tail text");
    assert!(w.is_eof());
}

#[test]
fn capture_started_at_eof_is_empty() {
    let mut w = window("", 10);
    assert_eq!(capture_until(&mut w, b'$'), "");
}

#[test]
fn empty_capture_at_stop_byte() {
    let mut w = window("$x", 10);
    assert_eq!(capture_until(&mut w, b'$'), "");
    assert_eq!(w.current(), Some(b'$'));
}

#[test]
fn end_capture_without_start_is_empty() {
    let mut w = window("abc", 10);
    assert_eq!(w.end_capture().unwrap(), "");
}

#[test]
fn multibyte_text_split_across_windows() {
    let source = "h\u{e9}llo \u{1F600}!$";
    for size in 1..=12 {
        let mut w = window(source, size);
        assert_eq!(
            capture_until(&mut w, b'$'),
            "h\u{e9}llo \u{1F600}!",
            "window size {size}"
        );
    }
}

#[test]
fn invalid_utf8_is_reported_with_offset() {
    let bytes: &[u8] = b"ab\xFFcd$";
    let mut w = SourceWindow::open(bytes, NonZeroUsize::new(16).unwrap()).unwrap();
    w.start_capture();
    while !w.is(b'$') {
        w.read().unwrap();
    }
    let err = w.end_capture().unwrap_err();
    assert!(matches!(err, SourceError::InvalidUtf8 { offset: 2 }));
}

#[test]
fn invalid_utf8_in_overflow_reports_absolute_offset() {
    let bytes: &[u8] = b"xyzab\xFFcd$";
    let mut w = SourceWindow::open(bytes, NonZeroUsize::new(2).unwrap()).unwrap();
    w.read().unwrap();
    w.read().unwrap();
    w.start_capture();
    while !w.is(b'$') {
        w.read().unwrap();
    }
    let err = w.end_capture().unwrap_err();
    assert_eq!(err.offset(), 5);
}

// === Location ===

#[test]
fn location_tracks_lines_and_columns() {
    let mut w = window("ab\ncd", 2);
    assert_eq!(
        w.location(),
        Location {
            offset: 0,
            line: 1,
            column: 1
        }
    );
    w.read().unwrap(); // b
    w.read().unwrap(); // \n
    assert_eq!(
        w.location(),
        Location {
            offset: 2,
            line: 1,
            column: 3
        }
    );
    w.read().unwrap(); // c
    assert_eq!(
        w.location(),
        Location {
            offset: 3,
            line: 2,
            column: 1
        }
    );
    w.read().unwrap(); // d
    w.read().unwrap(); // eof
    assert_eq!(
        w.location(),
        Location {
            offset: 5,
            line: 2,
            column: 3
        }
    );
}

#[test]
fn location_at_eof_points_past_input() {
    let mut w = window("${1:", 3);
    while !w.is_eof() {
        w.read().unwrap();
    }
    assert_eq!(w.location().offset, 4);
}

// === Reader behaviour ===

/// Reader that yields `Interrupted` before every successful read.
struct Flaky<R> {
    inner: R,
    interrupt_next: bool,
}

impl<R: Read> Read for Flaky<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.interrupt_next = true;
        self.inner.read(buf)
    }
}

#[test]
fn interrupted_reads_are_retried() {
    let reader = Flaky {
        inner: Cursor::new(b"abc".to_vec()),
        interrupt_next: true,
    };
    let mut w = SourceWindow::open(reader, NonZeroUsize::new(1).unwrap()).unwrap();
    let mut seen = Vec::new();
    while let Some(b) = w.current() {
        seen.push(b);
        w.read().unwrap();
    }
    assert_eq!(seen, b"abc");
}

/// Reader that fails after yielding its prefix.
struct Broken {
    prefix: Cursor<Vec<u8>>,
}

impl Read for Broken {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.prefix.read(buf)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        }
        Ok(n)
    }
}

#[test]
fn reader_errors_propagate_with_offset() {
    let reader = Broken {
        prefix: Cursor::new(b"abcd".to_vec()),
    };
    let mut w = SourceWindow::open(reader, NonZeroUsize::new(4).unwrap()).unwrap();
    for _ in 0..3 {
        w.read().unwrap();
    }
    let err = w.read().unwrap_err();
    match err {
        SourceError::Io { offset, source } => {
            assert_eq!(offset, 4);
            assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
        }
        SourceError::InvalidUtf8 { .. } => panic!("expected an I/O error"),
    }
}
