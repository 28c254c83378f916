//! Potential scoring for keyword candidates.
//!
//! Pure functions, no I/O: independently testable without network access.
//! Scores from the generation service are never trusted; every candidate
//! is rescored locally from its volume, difficulty, and competition.

use crate::types::keyword::{Competition, Relevance};

/// Map (volume, difficulty, competition) to a 0-100 potential score.
///
/// Volume contributes up to 40 points (saturating at 4000 monthly
/// searches), inverted difficulty up to 30, competition the remaining 30.
pub fn score_keyword(search_volume: u32, difficulty: u8, competition: Competition) -> u8 {
    let volume_score = (search_volume as f64 / 100.0).min(40.0);
    let difficulty_score = (100.0 - difficulty.min(100) as f64) * 0.3;
    let competition_score = match competition {
        Competition::Low => 30.0,
        Competition::Medium => 20.0,
        Competition::High => 10.0,
    };

    (volume_score + difficulty_score + competition_score).round() as u8
}

/// Derive the relevance band from a potential score.
pub fn relevance_for(score: u8) -> Relevance {
    if score > 70 {
        Relevance::Excellent
    } else if score > 50 {
        Relevance::Good
    } else {
        Relevance::Moderate
    }
}
