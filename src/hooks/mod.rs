//! Hook contract for instrumentation layers.
//!
//! Whatever decides which calls to time only needs two calls:
//! `Probe::enter` when a call starts and `Probe::exit` when it returns.
//! Both are infallible and allocation-free on the common path.

use crate::aggregator::StatsAggregator;
use std::sync::Arc;
use std::time::Instant;

/// Opaque start marker returned by `Probe::enter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(Instant);

impl Token {
    /// Start marker for the current instant
    pub fn now() -> Self {
        Token(Instant::now())
    }

    /// Nanoseconds since this token was taken, saturating at `u64::MAX`
    pub fn elapsed_nanos(&self) -> u64 {
        u64::try_from(self.0.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Entry/exit hooks bound to one aggregator
///
/// Cheap to clone; every clone feeds the same aggregator.
#[derive(Debug, Clone)]
pub struct Probe {
    aggregator: Arc<StatsAggregator>,
}

impl Probe {
    pub fn new(aggregator: Arc<StatsAggregator>) -> Self {
        Self { aggregator }
    }

    /// Call boundary entry
    #[inline]
    pub fn enter(&self) -> Token {
        Token::now()
    }

    /// Call boundary exit, forwards the elapsed time to the aggregator
    #[inline]
    pub fn exit(&self, identifier: &str, token: Token) {
        self.aggregator.record(identifier, token.elapsed_nanos());
    }

    /// Start a guard that records on drop
    ///
    /// The guard also records when dropped during unwinding, so calls that
    /// panic are still counted.
    pub fn span<'a>(&'a self, identifier: &'a str) -> Span<'a> {
        Span {
            probe: self,
            identifier,
            token: self.enter(),
        }
    }

    /// Time a closure under `identifier`
    pub fn time<T>(&self, identifier: &str, f: impl FnOnce() -> T) -> T {
        let _span = self.span(identifier);
        f()
    }

    pub fn aggregator(&self) -> &Arc<StatsAggregator> {
        &self.aggregator
    }
}

/// RAII guard created by `Probe::span`
#[must_use = "the span records when dropped"]
#[derive(Debug)]
pub struct Span<'a> {
    probe: &'a Probe,
    identifier: &'a str,
    token: Token,
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        self.probe.exit(self.identifier, self.token);
    }
}
