use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct CspStats {
    request_count: AtomicUsize,
    header_count: AtomicUsize,
    suppressed_header_count: AtomicUsize,
    hash_count: AtomicUsize,
    nonce_generation_count: AtomicUsize,
    violation_count: AtomicUsize,
    start_time: Instant,
}

impl Default for CspStats {
    fn default() -> Self {
        Self {
            request_count: Default::default(),
            header_count: Default::default(),
            suppressed_header_count: Default::default(),
            hash_count: Default::default(),
            nonce_generation_count: Default::default(),
            violation_count: Default::default(),
            start_time: Instant::now(),
        }
    }
}

impl CspStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn header_count(&self) -> usize {
        self.header_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed_header_count(&self) -> usize {
        self.suppressed_header_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hash_count(&self) -> usize {
        self.hash_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn nonce_generation_count(&self) -> usize {
        self.nonce_generation_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn violation_count(&self) -> usize {
        self.violation_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    #[inline]
    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_header_count(&self) {
        self.header_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_suppressed_header_count(&self) {
        self.suppressed_header_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_hash_count(&self) {
        self.hash_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_nonce_generation_count(&self) {
        self.nonce_generation_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_violation_count(&self) {
        self.violation_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.header_count.store(0, Ordering::Relaxed);
        self.suppressed_header_count.store(0, Ordering::Relaxed);
        self.hash_count.store(0, Ordering::Relaxed);
        self.nonce_generation_count.store(0, Ordering::Relaxed);
        self.violation_count.store(0, Ordering::Relaxed);
    }
}

impl fmt::Display for CspStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requests: {}, headers: {}, suppressed: {}, hashes: {}, nonces: {}, violations: {}, uptime: {}s",
            self.request_count(),
            self.header_count(),
            self.suppressed_header_count(),
            self.hash_count(),
            self.nonce_generation_count(),
            self.violation_count(),
            self.uptime_secs()
        )
    }
}
