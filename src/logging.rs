//! RT-safe logging.
//!
//! The sample tick runs in esp_timer's high-priority task and must never
//! call a blocking log backend. Messages from that context go into a
//! lock-free ring of fixed-size entries; the Beacon Loop drains the ring
//! into the `log` facade between cycles, where blocking is fine.
//!
//! Single producer (the tick context), single consumer (the loop). The ring
//! drops on overflow and counts the drops rather than ever stalling the
//! producer.

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum formatted message length; longer messages are truncated.
pub const MAX_MSG_LEN: usize = 96;

/// Default ring capacity in entries. Must be a power of 2.
pub const LOG_RING_SIZE: usize = 64;

/// Log level, mapped onto the `log` facade levels on drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn to_log(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// One formatted log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds since boot.
    pub timestamp_us: i64,
    pub level: LogLevel,
    len: u8,
    msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text. Always valid UTF-8 as long as the producer formatted
    /// with `format_args!`; replacement characters otherwise.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

/// Lock-free SPSC log ring.
pub struct LogRing<const N: usize = LOG_RING_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: single producer (tick context) and single consumer (Beacon Loop),
// coordinated through the write/read indices.
unsafe impl<const N: usize> Sync for LogRing<N> {}
unsafe impl<const N: usize> Send for LogRing<N> {}

impl<const N: usize> LogRing<N> {
    const MASK: usize = N - 1;

    /// Create an empty ring. Fails to compile if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "log ring size must be a power of 2");
        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a pre-formatted message. Never blocks; drops if the ring is full.
    ///
    /// Returns `false` on drop.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, args: fmt::Arguments<'_>) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: single producer; the slot at `write` is not visible to
        // the consumer until the Release store below.
        unsafe {
            let entry = &mut (*self.entries.get())[(write as usize) & Self::MASK];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = write_fmt(&mut entry.msg, args) as u8;
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pop the next entry, if any. Consumer side only.
    #[inline]
    pub fn pop(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: single consumer; entry was published by the Release store
        // of write_idx.
        let entry = unsafe { (*self.entries.get())[(read as usize) & Self::MASK] };
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Messages dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Drain every pending entry into the `log` facade.
    ///
    /// Called from the Beacon Loop, where blocking backends are acceptable.
    pub fn drain_to_log(&self) {
        while let Some(entry) = self.pop() {
            log::log!(
                entry.level.to_log(),
                "[{:>10}us] {}",
                entry.timestamp_us,
                entry.message()
            );
        }
    }
}

impl<const N: usize> Default for LogRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format into a fixed buffer, truncating. Returns bytes written.
fn write_fmt(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    struct Cursor<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl fmt::Write for Cursor<'_> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let bytes = s.as_bytes();
            let n = bytes.len().min(self.buf.len() - self.pos);
            self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
            self.pos += n;
            Ok(())
        }
    }

    let mut cursor = Cursor { buf, pos: 0 };
    let _ = fmt::write(&mut cursor, args);
    cursor.pos
}

/// RT-safe log macro for the tick context. Never blocks.
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $ring.push($timestamp, $level, format_args!($($arg)*))
    };
}

/// RT-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $ring, $timestamp, $($arg)*)
    };
}

/// RT-safe warning log.
#[macro_export]
macro_rules! rt_warn {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $ring, $timestamp, $($arg)*)
    };
}

/// RT-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $ring, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop() {
        let ring = LogRing::<16>::new();

        assert!(ring.push(1_000, LogLevel::Info, format_args!("armed pulse {}", 7)));
        assert_eq!(ring.pending(), 1);

        let entry = ring.pop().unwrap();
        assert_eq!(entry.timestamp_us, 1_000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), "armed pulse 7");
        assert_eq!(ring.pending(), 0);
    }

    #[test]
    fn test_full_ring_drops() {
        let ring = LogRing::<4>::new();

        for i in 0..4 {
            assert!(ring.push(i, LogLevel::Info, format_args!("{}", i)));
        }
        assert!(!ring.push(4, LogLevel::Info, format_args!("4")));
        assert_eq!(ring.dropped(), 1);

        // Draining one frees a slot
        ring.pop();
        assert!(ring.push(5, LogLevel::Info, format_args!("5")));
    }

    #[test]
    fn test_truncation() {
        let ring = LogRing::<4>::new();
        let long = "x".repeat(MAX_MSG_LEN * 2);
        ring.push(0, LogLevel::Warn, format_args!("{}", long));

        let entry = ring.pop().unwrap();
        assert_eq!(entry.message().len(), MAX_MSG_LEN);
    }

    #[test]
    fn test_macros() {
        let ring = LogRing::<16>::new();
        rt_info!(ring, 10, "info {}", 1);
        rt_warn!(ring, 20, "warn {}", 2);
        rt_error!(ring, 30, "error {}", 3);

        assert_eq!(ring.pop().unwrap().level, LogLevel::Info);
        assert_eq!(ring.pop().unwrap().level, LogLevel::Warn);
        assert_eq!(ring.pop().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
    }
}
