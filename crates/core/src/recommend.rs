//! Recommendation scoring.
//!
//! A user's preference profile is rebuilt on every request from their
//! highly rated history (stars >= 4) and scored against every catalog item
//! they have not rated yet. Three additive rules, each contributing a
//! human-readable reason:
//!
//! - genre in the favorite set: +2
//! - media type equals the most frequent favorite type (case-insensitive): +1
//! - age restriction present on both sides and candidate <= preferred max: +1
//!
//! Candidates with score 0 are never recommended.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::limits::{RECOMMENDATION_DEFAULT_LIMIT, RECOMMENDATION_MAX_LIMIT};
use crate::models::MediaItem;

/// Derived preference summary. Recomputed per request, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ScoringProfile {
    /// Distinct genres among the user's stars >= 4 ratings, lowercased.
    favorite_genres: HashSet<String>,
    /// Most frequent media type among those ratings. Ties are broken by the
    /// iteration order of the count map, i.e. arbitrarily.
    favorite_media_type: Option<String>,
    /// Highest age restriction observed among those ratings.
    preferred_max_age_restriction: Option<i32>,
}

impl ScoringProfile {
    /// Build a profile from the media items the user rated with stars >= 4.
    /// The caller is responsible for pre-filtering by star count.
    pub fn from_highly_rated(history: &[MediaItem]) -> Self {
        let mut favorite_genres = HashSet::new();
        let mut type_counts: HashMap<String, usize> = HashMap::new();
        let mut preferred_max_age_restriction = None;

        for item in history {
            if let Some(genre) = item.genre.as_deref() {
                if !genre.trim().is_empty() {
                    favorite_genres.insert(genre.to_lowercase());
                }
            }
            if let Some(media_type) = item.media_type.as_deref() {
                if !media_type.trim().is_empty() {
                    *type_counts.entry(media_type.to_lowercase()).or_default() += 1;
                }
            }
            if let Some(age) = item.age_restriction {
                preferred_max_age_restriction = Some(match preferred_max_age_restriction {
                    Some(max) if max >= age => max,
                    _ => age,
                });
            }
        }

        let favorite_media_type = type_counts
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(media_type, _)| media_type);

        Self {
            favorite_genres,
            favorite_media_type,
            preferred_max_age_restriction,
        }
    }

    #[cfg(test)]
    fn with_parts(
        genres: &[&str],
        media_type: Option<&str>,
        max_age: Option<i32>,
    ) -> Self {
        Self {
            favorite_genres: genres.iter().map(|g| g.to_lowercase()).collect(),
            favorite_media_type: media_type.map(|t| t.to_lowercase()),
            preferred_max_age_restriction: max_age,
        }
    }

    /// Score one candidate. Returns the score and the matched-rule reasons in
    /// rule order: genre, media type, age restriction.
    pub fn score(&self, candidate: &MediaItem) -> (i32, Vec<String>) {
        let mut score = 0;
        let mut reasons = Vec::new();

        if let Some(genre) = candidate.genre.as_deref() {
            if !genre.trim().is_empty() && self.favorite_genres.contains(&genre.to_lowercase()) {
                score += 2;
                reasons.push("Genre matches your highly rated media (+2)".to_string());
            }
        }

        if let (Some(media_type), Some(favorite)) = (
            candidate.media_type.as_deref(),
            self.favorite_media_type.as_deref(),
        ) {
            if !media_type.trim().is_empty() && media_type.eq_ignore_ascii_case(favorite) {
                score += 1;
                reasons.push("MediaType matches your most frequent favorite (+1)".to_string());
            }
        }

        if let (Some(age), Some(max)) =
            (candidate.age_restriction, self.preferred_max_age_restriction)
        {
            if age <= max {
                score += 1;
                reasons.push("AgeRestriction fits your previous favorites (+1)".to_string());
            }
        }

        (score, reasons)
    }
}

/// A scored, not-yet-rated catalog item. Discarded after the response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub media: MediaItem,
    pub score: i32,
    pub reason: String,
}

/// Clamp a requested limit to [1, 50]; missing or non-positive means 10.
pub fn clamp_limit(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n > 0 => (n as usize).min(RECOMMENDATION_MAX_LIMIT),
        _ => RECOMMENDATION_DEFAULT_LIMIT,
    }
}

/// Score, filter, rank, and truncate the candidate set.
///
/// Ranking: score descending, then release year descending (missing year
/// sorts as -1, i.e. last), then id descending as the final deterministic
/// tie-break.
pub fn recommend(
    profile: &ScoringProfile,
    candidates: Vec<MediaItem>,
    limit: Option<i64>,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter_map(|media| {
            let (score, reasons) = profile.score(&media);
            if score > 0 {
                Some(ScoredCandidate {
                    media,
                    score,
                    reason: reasons.join("; "),
                })
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| {
                let ay = a.media.release_year.unwrap_or(-1);
                let by = b.media.release_year.unwrap_or(-1);
                by.cmp(&ay)
            })
            .then_with(|| b.media.id.cmp(&a.media.id))
    });

    scored.truncate(clamp_limit(limit));
    scored
}
