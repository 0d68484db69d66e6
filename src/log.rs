//! Capturing the tracing output of this crate in memory so that it can be inspected in-process
use crate::GapBuffer;
use std::{
    io::{self, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing_subscriber::fmt::MakeWriter;

/// A central log writer that appends everything written to it into a [GapBuffer].
///
/// Cloning a LogBuffer gives a second handle to the same underlying log.
///
/// ```
/// use gapbuf::{GapBuffer, LogBuffer};
/// use tracing::subscriber::with_default;
///
/// let logs = LogBuffer::default();
/// let subscriber = tracing_subscriber::fmt()
///     .with_ansi(false)
///     .with_max_level(tracing::Level::DEBUG)
///     .with_writer(logs.clone())
///     .finish();
///
/// with_default(subscriber, || {
///     let mut gb = GapBuffer::with_capacity(1).unwrap();
///     gb.insert_str("hello").unwrap();
/// });
///
/// assert!(logs.content().contains("growing gap buffer"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<GapBuffer>>,
}

impl LogBuffer {
    // Writers only ever append so a panic while holding the lock can't leave the buffer
    // itself in an invalid state.
    fn lock(&self) -> MutexGuard<'_, GapBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the full content of the log
    pub fn content(&self) -> String {
        self.lock().to_string()
    }

    /// Number of bytes currently held in the log
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether or not anything has been logged since creation or the last call to
    /// [clear](LogBuffer::clear).
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clear the contents of the current log
    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// A handle implementing [Write] that can be used by tracing for writing our logs
#[derive(Debug)]
pub struct LogWriter<'a>(MutexGuard<'a, GapBuffer>);

impl Write for LogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // The subscriber that is asking us to write may be the one that would receive a growth
        // event and that would need this lock to record it.
        let end = self.0.len();
        self.0.set_cursor(end);
        self.0
            .insert_text_unlogged(buf)
            .map_err(io::Error::other)?;

        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, subscriber::with_default, Level};

    fn capture<F: FnOnce()>(level: Level, f: F) -> LogBuffer {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .compact()
            .with_ansi(false)
            .with_target(false)
            .with_max_level(level)
            .with_writer(logs.clone())
            .finish();

        with_default(subscriber, f);

        logs
    }

    #[test]
    fn reading_log_content_works() {
        let logs = LogBuffer::default();
        _ = logs.make_writer().write(b"hello, world!\n").unwrap();

        let content = logs.content();
        assert_eq!(content, "hello, world!\n");

        _ = logs.make_writer().write(b"a second line\n").unwrap();

        let content = logs.content();
        assert_eq!(content, "hello, world!\na second line\n");
        assert_eq!(logs.len(), content.len());
    }

    #[test]
    fn clearing_works() {
        let logs = LogBuffer::default();
        _ = logs.make_writer().write(b"hello, world!\n").unwrap();

        let content = logs.content();
        assert_eq!(content, "hello, world!\n");

        logs.clear();

        assert!(logs.is_empty());
        assert!(logs.content().is_empty());
    }

    #[test]
    fn clones_share_the_same_log() {
        let logs = LogBuffer::default();
        let other = logs.clone();
        _ = other.make_writer().write(b"shared").unwrap();

        assert_eq!(logs.content(), "shared");
    }

    #[test]
    fn tracing_events_are_captured() {
        let logs = capture(Level::DEBUG, || debug!("first event"));

        assert!(logs.content().contains("first event"), "{}", logs.content());
    }

    #[test]
    fn growth_is_logged_at_debug() {
        let logs = capture(Level::DEBUG, || {
            let mut gb = GapBuffer::with_capacity(2).unwrap();
            gb.insert_str("abc").unwrap();
        });

        let content = logs.content();
        assert!(content.contains("growing gap buffer"), "{content}");
        assert!(content.contains("from=3"), "{content}");
        assert!(content.contains("to=5"), "{content}");
    }

    #[test]
    fn clamped_requests_are_logged_at_trace() {
        let logs = capture(Level::TRACE, || {
            let mut gb = GapBuffer::try_from("abc").unwrap();
            gb.move_cursor_right(10);
            gb.delete_before_cursor(10);
        });

        let content = logs.content();
        assert!(content.contains("op=\"move_cursor_right\""), "{content}");
        assert!(content.contains("op=\"delete_before_cursor\""), "{content}");
        assert!(content.contains("clamping out of range request"), "{content}");
    }

    #[test]
    fn clamped_requests_are_not_logged_at_debug() {
        let logs = capture(Level::DEBUG, || {
            let mut gb = GapBuffer::try_from("abc").unwrap();
            gb.move_cursor_left(10);
        });

        assert!(logs.is_empty(), "{}", logs.content());
    }
}
