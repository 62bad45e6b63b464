//! `VoteRecord`: the per-block confidence finite-state machine (§4.4).
//!
//! The initial window and the YES/NO popcount thresholds are not the
//! all-zero / 6-of-8 values a literal reading of §4.4's prose suggests —
//! see `DESIGN.md` Open Question 1. This implementation uses the values
//! that reproduce `original_source/src/test/avalanche_tests.cpp`'s
//! `vote_record` transcript exactly, the frozen reference this component
//! is consensus-pinned against.

use crate::constants::avalanche::{
    AVALANCHE_FINALIZATION_SCORE, NO_THRESHOLD, VOTE_WINDOW_INITIAL, YES_THRESHOLD,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ThresholdOutcome {
    Yes,
    No,
    Inconclusive,
}

/// An 8-bit sliding vote window, an `accepted` flag, and a confidence
/// counter. The window must stay exactly 8 bits wide — widening it
/// silently changes finalization timing (§9 Design Note).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteRecord {
    window: u8,
    accepted: bool,
    confidence: u32,
    /// Same-direction confidence required to finalize. Defaults to
    /// [`AVALANCHE_FINALIZATION_SCORE`] but is overridable per record so
    /// `Config::avalanche.finalization_score` (`src/config.rs`) has an
    /// actual code path to take effect through
    /// `AvalancheProcessor::with_finalization_score`/`from_config`.
    finalization_score: u32,
}

impl Default for VoteRecord {
    fn default() -> Self {
        Self::with_finalization_score(AVALANCHE_FINALIZATION_SCORE)
    }
}

impl VoteRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record that finalizes at `finalization_score` instead of the
    /// crate-wide default, per a caller-supplied `Config`.
    pub fn with_finalization_score(finalization_score: u32) -> Self {
        Self { window: VOTE_WINDOW_INITIAL, accepted: false, confidence: 0, finalization_score }
    }

    /// Shifts `yes` into the window, derives the threshold outcome from the
    /// new popcount, and updates `accepted`/`confidence` per §4.4 steps 1-6.
    pub fn register_vote(&mut self, yes: bool) {
        self.window = (self.window << 1) | (yes as u8);
        let yes_bits = self.window.count_ones();

        let outcome = if yes_bits >= YES_THRESHOLD {
            ThresholdOutcome::Yes
        } else if yes_bits <= NO_THRESHOLD {
            ThresholdOutcome::No
        } else {
            ThresholdOutcome::Inconclusive
        };

        match outcome {
            ThresholdOutcome::Inconclusive => {}
            ThresholdOutcome::Yes if self.accepted => self.reinforce(),
            ThresholdOutcome::No if !self.accepted => self.reinforce(),
            ThresholdOutcome::Yes => self.flip(true),
            ThresholdOutcome::No => self.flip(false),
        }
    }

    fn flip(&mut self, accepted: bool) {
        self.accepted = accepted;
        self.confidence = 0;
    }

    fn reinforce(&mut self) {
        if self.confidence < self.finalization_score {
            self.confidence += 1;
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn has_finalized(&self) -> bool {
        self.confidence >= self.finalization_score
    }

    pub fn get_confidence(&self) -> u32 {
        self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frozen transcript, grounded directly on
    /// `original_source/src/test/avalanche_tests.cpp`'s `vote_record` test:
    /// five YES votes keep the record unaccepted with confidence 0; the
    /// sixth YES flips `accepted` with confidence 0; each of the next
    /// `AVALANCHE_FINALIZATION_SCORE - 1` YES votes increases confidence by
    /// one without finalizing; the next vote (a NO, since the window still
    /// carries a YES majority) finalizes at the score; five more NO votes
    /// leave that unchanged; a run of `AVALANCHE_FINALIZATION_SCORE` NO
    /// votes flips to rejected on the first and finalizes on the last; one
    /// more YES then finalizes rejection.
    #[test]
    fn s1_vote_record_transitions() {
        let mut v = VoteRecord::default();
        assert_eq!((v.is_accepted(), v.has_finalized(), v.get_confidence()), (false, false, 0));

        for _ in 0..5 {
            v.register_vote(true);
            assert_eq!((v.is_accepted(), v.has_finalized(), v.get_confidence()), (false, false, 0));
        }

        // Sixth YES: flips to accepted with confidence 0.
        v.register_vote(true);
        assert_eq!((v.is_accepted(), v.has_finalized(), v.get_confidence()), (true, false, 0));

        // Confidence climbs 1..=score-1 without finalizing.
        for expected_confidence in 1..AVALANCHE_FINALIZATION_SCORE {
            v.register_vote(true);
            assert_eq!(
                (v.is_accepted(), v.has_finalized(), v.get_confidence()),
                (true, false, expected_confidence)
            );
        }

        // One NO while accepted: the window still carries a YES majority,
        // so the outcome stays YES, finalizing at the score.
        v.register_vote(false);
        assert_eq!(
            (v.is_accepted(), v.has_finalized(), v.get_confidence()),
            (true, true, AVALANCHE_FINALIZATION_SCORE)
        );

        // Five more NO votes: confidence stays clamped, nothing changes.
        for _ in 0..5 {
            v.register_vote(false);
            assert_eq!(
                (v.is_accepted(), v.has_finalized(), v.get_confidence()),
                (true, true, AVALANCHE_FINALIZATION_SCORE)
            );
        }

        // A run of NO votes now flips state on the first and climbs
        // confidence 0..=score-1 on the rest, mirroring the YES branch.
        for expected_confidence in 0..AVALANCHE_FINALIZATION_SCORE {
            v.register_vote(false);
            assert_eq!(
                (v.is_accepted(), v.has_finalized(), v.get_confidence()),
                (false, false, expected_confidence)
            );
        }

        // The next vote (YES, window still NO-majority) finalizes rejection.
        v.register_vote(true);
        assert_eq!(
            (v.is_accepted(), v.has_finalized(), v.get_confidence()),
            (false, true, AVALANCHE_FINALIZATION_SCORE)
        );
    }

    #[test]
    fn idempotent_reinforcement_never_exceeds_finalization_score() {
        let mut v = VoteRecord::default();
        for _ in 0..200 {
            v.register_vote(true);
        }
        assert_eq!(v.get_confidence(), AVALANCHE_FINALIZATION_SCORE);
        assert!(v.has_finalized());
    }

    #[test]
    fn mirror_image_no_votes_flip_and_finalize_rejection() {
        let mut v = VoteRecord::default();
        for _ in 0..8 {
            v.register_vote(false);
        }
        assert!(!v.is_accepted());

        for _ in 0..AVALANCHE_FINALIZATION_SCORE {
            v.register_vote(false);
        }
        assert!(v.has_finalized());
        assert!(!v.is_accepted());
    }
}
