//! Submission bookkeeping: which request is current, and what the media
//! element is doing about it.

/// How long a submission may stay in flight before it is aborted and
/// reported as a transport failure.
pub const REQUEST_TIMEOUT_MS: i32 = 30_000;

/// Token identifying one submission attempt. A new submission invalidates
/// every older token, so a slow response can never clobber a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// What the media element is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaPhase {
    /// Nothing in flight; nothing new displayed.
    #[default]
    Idle,
    /// A submission is in flight and the spinner is visible.
    Loading,
    /// The latest submission's artifact is on screen.
    Displayed,
}

/// The media element's state machine plus the generation counter that
/// serializes overlapping submissions.
///
/// `Idle -> Loading -> Displayed` on success, `Idle -> Loading -> Idle` on
/// failure. Completions carry the generation they belong to; a completion
/// for a superseded generation is reported as stale and changes nothing.
#[derive(Debug, Default)]
pub struct MediaSession {
    current: u64,
    phase: MediaPhase,
}

impl MediaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MediaPhase {
        self.phase
    }

    /// Starts a new submission, superseding any in flight.
    pub fn begin(&mut self) -> Generation {
        self.current += 1;
        self.phase = MediaPhase::Loading;
        Generation(self.current)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }

    /// Marks `generation` as successfully displayed. Returns `false` (and
    /// leaves the phase alone) when the generation has been superseded.
    pub fn succeed(&mut self, generation: Generation) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.phase = MediaPhase::Displayed;
        true
    }

    /// Marks `generation` as failed, returning to `Idle`. Stale failures
    /// are ignored the same way stale successes are.
    pub fn fail(&mut self, generation: Generation) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.phase = MediaPhase::Idle;
        true
    }
}

/// Appends a uniqueness token to `url` so repeated identical requests
/// always reload the latest artifact instead of a cached one.
pub fn cache_bust(url: &str, token: u64) -> String {
    if url.contains('?') {
        format!("{url}&t={token}")
    } else {
        format!("{url}?t={token}")
    }
}
