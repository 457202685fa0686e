//! Per-lane request tracking for taggable async commits.
//!
//! Both fetch pipelines (list and detail) are instances of the same small
//! machine: a request enters `Pending` tagged with its originating key, and
//! its completion is applied only if that key is still the pending one.
//! Superseded requests are left to run; their completions settle as
//! `Discarded` with no observable effect. This replaces ambient "still
//! mounted" lifecycle checks with an explicit, testable rule that treats
//! teardown and supersession identically.

/// Current occupancy of a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LaneState<K> {
    /// No fetch outstanding.
    Idle,
    /// A fetch is in flight, tagged with its originating key.
    Pending(K),
}

/// Verdict for a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The response's key is still current: apply it.
    Committed,
    /// The key was superseded or the lane cancelled: drop the response.
    Discarded,
}

/// One fetch/commit pipeline, parameterized by tag type.
///
/// The list lane uses a monotonically increasing epoch (`Lane<u64>`); the
/// detail lane uses the article id itself (`Lane<String>`), since ids are
/// already unique tokens.
#[derive(Debug)]
pub struct Lane<K> {
    state: LaneState<K>,
}

impl<K: PartialEq> Lane<K> {
    pub fn new() -> Self {
        Self {
            state: LaneState::Idle,
        }
    }

    /// Start tracking a new request. Any previously pending request is
    /// abandoned in place; its completion will settle as `Discarded`.
    pub fn begin(&mut self, key: K) {
        self.state = LaneState::Pending(key);
    }

    /// Settle a completed request against the lane's current key.
    ///
    /// Only a match empties the lane; a stale completion must not knock
    /// out a newer pending request.
    pub fn settle(&mut self, key: &K) -> Settled {
        match &self.state {
            LaneState::Pending(current) if current == key => {
                self.state = LaneState::Idle;
                Settled::Committed
            }
            _ => Settled::Discarded,
        }
    }

    /// Forget the pending request, if any. Its completion will settle as
    /// `Discarded`.
    pub fn cancel(&mut self) {
        self.state = LaneState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LaneState::Pending(_))
    }
}

impl<K: PartialEq> Default for Lane<K> {
    fn default() -> Self {
        Self::new()
    }
}
