//! Outcome
//!
//! The result signal accumulated on an edge across every run that passed through it.
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Coarse outcome state of an edge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutcomeState {
    /// No run through the edge has been marked yet.
    Unknown,
    /// At least one run through the edge was interesting.
    MayWin,
    /// Every marked run through the edge was uninteresting.
    MayLose,
}

/// Running win/run counters for an edge.
///
/// Conflicting marks never overwrite each other: an edge is `MayWin` as soon as
/// any run through it won, which makes repeated equal marks leave both the state
/// and the win ratio unchanged.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    /// Number of runs marked on the edge.
    pub runs: u64,
    /// Number of those runs that were interesting.
    pub wins: u64,
}

impl Outcome {
    pub fn new() -> Self {
        Outcome { runs: 0, wins: 0 }
    }

    /// Record one run's result.
    pub fn mark(&mut self, win: bool) {
        self.runs = self.runs.saturating_add(1);
        if win {
            self.wins = self.wins.saturating_add(1);
        }
    }

    /// Combine the counters of the same edge recorded in another tree.
    pub fn merge(&mut self, other: &Outcome) {
        self.runs = self.runs.saturating_add(other.runs);
        self.wins = self.wins.saturating_add(other.wins);
    }

    pub fn state(&self) -> OutcomeState {
        if self.runs == 0 {
            OutcomeState::Unknown
        } else if self.wins > 0 {
            OutcomeState::MayWin
        } else {
            OutcomeState::MayLose
        }
    }

    pub fn may_win(&self) -> bool {
        self.state() == OutcomeState::MayWin
    }

    pub fn is_unknown(&self) -> bool {
        self.runs == 0
    }

    /// Fraction of marked runs that won, `0.0` when nothing was marked.
    pub fn win_ratio(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.wins as f64 / self.runs as f64
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} ({}/{})", self.state(), self.wins, self.runs)
    }
}
