use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Ticket of an update, issued before the data is fetched.
///
/// Tickets come from one counter shared by every target, so a ticket taken
/// for a list can be compared with one taken for a single entry of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sequence(u64);

impl Sequence {
    pub fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Watermark {
    applied: u64,
    /// Tickets at or below this were issued before the target was forgotten.
    floor: u64,
}

impl Watermark {
    fn admits(&self, sequence: Sequence) -> bool {
        sequence.0 > self.applied.max(self.floor)
    }
}

#[derive(Debug, Default)]
struct State {
    issued: u64,
    targets: HashMap<String, Watermark>,
}

/// Orders concurrent updates per render target.
///
/// A caller takes a [`Sequence`] with [`issue`](Self::issue) before starting a
/// fetch and later asks [`accept`](Self::accept) whether its result may be
/// rendered. A result is accepted only if no later-issued update for the same
/// target has been applied already, so a slow response never overwrites a
/// newer one.
#[derive(Debug, Default)]
pub struct UpdateSequencer {
    state: Mutex<State>,
}

impl UpdateSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Sequence {
        let mut state = self.lock();
        state.issued += 1;
        Sequence(state.issued)
    }

    /// Marks `sequence` as applied if it is newer than anything applied before.
    pub fn accept(&self, target: &str, sequence: Sequence) -> bool {
        let mut state = self.lock();
        let watermark = state.targets.entry(target.to_string()).or_default();
        if !watermark.admits(sequence) {
            return false;
        }
        watermark.applied = sequence.0;
        true
    }

    pub fn last_applied(&self, target: &str) -> Option<Sequence> {
        self.lock()
            .targets
            .get(target)
            .filter(|w| w.applied > 0)
            .map(|w| Sequence(w.applied))
    }

    /// Clears what was applied to `target` and turns every ticket issued so far
    /// stale for it.
    pub fn forget(&self, target: &str) {
        let mut state = self.lock();
        let floor = state.issued;
        state.targets.insert(target.to_string(), Watermark { applied: 0, floor });
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
