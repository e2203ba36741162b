//! The concurrent poll/vote state manager.
//!
//! A [`PollRegistry`] owns three pieces of per-poll state: the poll
//! definition, a tally of votes per option label, and the set of users who
//! have already voted. All three are guarded by one `Mutex` so that every
//! operation is linearizable with respect to every other - create and
//! delete appear atomic to concurrent voters, and a results read never
//! observes a half-applied vote.
//!
//! # Why one lock instead of per-poll locks?
//!
//! Create and delete touch all three maps together, and id assignment reads
//! the counter while inserting the poll. A single exclusion region keeps
//! those compound transitions trivially atomic. Operations are short and
//! CPU-bound, never call back into caller code, and never take a second
//! lock, so there is no deadlock opportunity and little to gain from finer
//! granularity at this scale.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::poll::Poll;

/// Failure modes of the mutating registry operations.
///
/// Both are recoverable caller-side conditions; the registry has no fatal
/// errors. The `Display` text matches the messages the demo driver prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The targeted poll id is not in the registry.
    PollNotFound,
    /// The user already voted on this poll; the tally was left untouched.
    AlreadyVoted,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::PollNotFound => write!(f, "Poll not found."),
            RegistryError::AlreadyVoted => write!(f, "User has already voted."),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Everything the lock guards, kept in one struct so a single `lock()`
/// covers the whole compound transition.
struct RegistryState {
    /// Poll definitions keyed by poll id.
    polls: HashMap<String, Poll>,
    /// Per-poll vote counts keyed by option label. `BTreeMap` so results
    /// enumerate in ascending lexicographic label order regardless of the
    /// order options were declared.
    tallies: HashMap<String, BTreeMap<String, u64>>,
    /// Per-poll set of user ids that have voted. Insert-only for the
    /// lifetime of the poll; deleting the poll is the only way out.
    ledgers: HashMap<String, HashSet<String>>,
    /// Monotonic id source. Never decremented, so ids are not reused after
    /// a delete even though they still render as sequential decimals.
    next_poll_id: u64,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            polls: HashMap::new(),
            tallies: HashMap::new(),
            ledgers: HashMap::new(),
            next_poll_id: 1,
        }
    }
}

/// Thread-safe registry of polls, tallies, and vote ledgers.
///
/// Share it as `Arc<PollRegistry>`; all operations take `&self` and callers
/// only ever receive owned copies, never references into the guarded state.
pub struct PollRegistry {
    state: Mutex<RegistryState>,
}

impl Default for PollRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PollRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::new()),
        }
    }

    /// Registers a new poll and returns its assigned id.
    ///
    /// The poll, its tally (one zero entry per distinct declared option),
    /// and its empty vote ledger are created together. No validation is
    /// performed: an empty question, an empty option list, and duplicate
    /// labels are all accepted as given.
    pub fn create_poll(&self, question: impl Into<String>, options: Vec<String>) -> String {
        let mut state = self.state.lock().unwrap();

        let poll_id = state.next_poll_id.to_string();
        state.next_poll_id += 1;

        let mut tally = BTreeMap::new();
        for option in &options {
            tally.insert(option.clone(), 0);
        }

        let poll = Poll::new(poll_id.clone(), question.into(), options);
        state.tallies.insert(poll_id.clone(), tally);
        state.ledgers.insert(poll_id.clone(), HashSet::new());
        state.polls.insert(poll_id.clone(), poll);

        info!(poll_id = %poll_id, "poll created");
        poll_id
    }

    /// Replaces a poll's question and options wholesale.
    ///
    /// The tally and ledger are deliberately left alone: counts for options
    /// no longer declared remain, and newly declared options get no tally
    /// entry until a vote creates one. Results are keyed by the option
    /// labels actually voted on or declared at creation, independent of the
    /// poll's current option list.
    pub fn update_poll(
        &self,
        poll_id: &str,
        question: impl Into<String>,
        options: Vec<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();

        let poll = state
            .polls
            .get_mut(poll_id)
            .ok_or(RegistryError::PollNotFound)?;
        poll.question = question.into();
        poll.options = options;

        info!(poll_id = %poll_id, "poll updated");
        Ok(())
    }

    /// Removes a poll together with its tally and vote ledger.
    ///
    /// This is the only operation that unwinds all three structures, and
    /// the only way a user's has-voted mark ever goes away.
    pub fn delete_poll(&self, poll_id: &str) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();

        if state.polls.remove(poll_id).is_none() {
            return Err(RegistryError::PollNotFound);
        }
        state.tallies.remove(poll_id);
        state.ledgers.remove(poll_id);

        info!(poll_id = %poll_id, "poll deleted");
        Ok(())
    }

    /// Casts a vote for `option` on behalf of `user_id`.
    ///
    /// Each user gets exactly one vote per poll, enforced by the ledger.
    /// The option string is not checked against the poll's declared list:
    /// any label is tallied, with a missing entry created at 1. That is
    /// also how options added by a later update acquire a count.
    pub fn vote_in_poll(
        &self,
        poll_id: &str,
        user_id: &str,
        option: &str,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();

        if !state.polls.contains_key(poll_id) {
            return Err(RegistryError::PollNotFound);
        }

        let ledger = state.ledgers.entry(poll_id.to_string()).or_default();
        if ledger.contains(user_id) {
            debug!(poll_id = %poll_id, user_id = %user_id, "duplicate vote rejected");
            return Err(RegistryError::AlreadyVoted);
        }
        ledger.insert(user_id.to_string());

        let tally = state.tallies.entry(poll_id.to_string()).or_default();
        *tally.entry(option.to_string()).or_insert(0) += 1;

        debug!(poll_id = %poll_id, user_id = %user_id, option = %option, "vote cast");
        Ok(())
    }

    /// Returns a copy of a poll's tally, keyed by option label in ascending
    /// lexicographic order.
    ///
    /// An empty map is returned when no such poll exists. That result is
    /// ambiguous with a live poll that declared zero options; callers that
    /// need the distinction should use [`PollRegistry::get_poll`].
    pub fn view_poll_results(&self, poll_id: &str) -> BTreeMap<String, u64> {
        let state = self.state.lock().unwrap();
        state.tallies.get(poll_id).cloned().unwrap_or_default()
    }

    /// Returns a copy of the poll definition, or `None` if absent.
    pub fn get_poll(&self, poll_id: &str) -> Option<Poll> {
        let state = self.state.lock().unwrap();
        state.polls.get(poll_id).cloned()
    }

    /// Returns a snapshot of every live poll in ascending id order.
    ///
    /// Clones the definitions so no lock is held while the caller iterates.
    pub fn list_polls(&self) -> Vec<Poll> {
        let state = self.state.lock().unwrap();
        let mut polls: Vec<Poll> = state.polls.values().cloned().collect();
        // Ids are decimal strings minted by the counter, so numeric order
        // is the natural listing order.
        polls.sort_by_key(|poll| poll.id.parse::<u64>().unwrap_or(u64::MAX));
        polls
    }

    /// Number of live polls.
    pub fn poll_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.polls.len()
    }
}
