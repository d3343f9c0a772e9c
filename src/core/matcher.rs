use crate::core::scoring::score;
use crate::models::{Dancer, MatchResult, ScoredMatch};

/// Display limits for ranked match lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    pub partners: usize,
    pub teachers: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            partners: 6,
            teachers: 4,
        }
    }
}

/// Ranked partner and teacher lists for one viewer
#[derive(Debug)]
pub struct MatchLists {
    pub partners: Vec<ScoredMatch>,
    pub teachers: Vec<ScoredMatch>,
    pub total_candidates: usize,
}

/// Ranking layer on top of the scoring engine
///
/// # Pipeline
/// 1. Drop the viewer from the candidate set
/// 2. Split into peers (non-teachers) and teachers open to Pro-Am
/// 3. Score each candidate against the viewer
/// 4. Keep positive scores, sort descending, truncate to the display limit
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    limits: MatchLimits,
}

impl Matcher {
    pub fn new(limits: MatchLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> MatchLimits {
        self.limits
    }

    /// Score a single (viewer, candidate) pair
    pub fn score_pair(&self, viewer: &Dancer, candidate: &Dancer) -> MatchResult {
        score(viewer, candidate)
    }

    /// Build both ranked lists for `viewer` from a candidate pool
    pub fn rank(&self, viewer: &Dancer, candidates: Vec<Dancer>) -> MatchLists {
        let total_candidates = candidates.len();

        let (teachers, partners): (Vec<Dancer>, Vec<Dancer>) = candidates
            .into_iter()
            .filter(|candidate| candidate.id != viewer.id)
            .filter(|candidate| !candidate.is_teacher || candidate.open_to_pro_am)
            .partition(|candidate| candidate.is_teacher);

        MatchLists {
            partners: rank_list(viewer, partners, self.limits.partners),
            teachers: rank_list(viewer, teachers, self.limits.teachers),
            total_candidates,
        }
    }
}

/// Score, keep positive results, sort by score (stable, descending) and truncate
pub fn rank_list(viewer: &Dancer, candidates: Vec<Dancer>, limit: usize) -> Vec<ScoredMatch> {
    let mut ranked: Vec<ScoredMatch> = candidates
        .into_iter()
        .filter_map(|dancer| {
            let result = score(viewer, &dancer);
            (result.score > 0).then(|| ScoredMatch {
                dancer,
                score: result.score,
                reasons: result.reasons,
                mode: result.mode,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}
