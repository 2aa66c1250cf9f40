//! Similarity scorer
//!
//! Four independent features, each in [0, 1], combined with fixed weights by
//! [`FeatureScores::composite`]. Features with no data on one side score a neutral
//! 0.5 instead of penalizing the pair, except names, which score 0.

use crate::profile::{tokenize, PersonProfile};
use lineage_domain::dates;
use lineage_domain::FeatureScores;
use std::collections::BTreeSet;

const NEUTRAL: f64 = 0.5;

/// Score every feature for a pair of persons
pub fn score(a: &PersonProfile, b: &PersonProfile) -> FeatureScores {
    FeatureScores {
        name: name_score(a, b),
        dates: date_score(a, b),
        places: place_score(a, b),
        relationships: relationship_score(a, b),
    }
}

/// Best token-set Jaccard similarity over all name pairs
pub fn name_score(a: &PersonProfile, b: &PersonProfile) -> f64 {
    let mut best: f64 = 0.0;
    for left in &a.names {
        let left = tokenize(left);
        for right in &b.names {
            let right = tokenize(right);
            if !left.is_empty() && !right.is_empty() {
                best = best.max(jaccard(&left, &right));
            }
        }
    }
    best
}

/// Mean agreement over same-kind date pairs
///
/// Equal dates score 1.0 and differing dates 0.5.
pub fn date_score(a: &PersonProfile, b: &PersonProfile) -> f64 {
    let mut total = 0.0;
    let mut compared = 0usize;

    for (left, right) in [(&a.births, &b.births), (&a.deaths, &b.deaths)] {
        for x in left {
            for y in right {
                total += if dates::same_day(x, y) { 1.0 } else { 0.5 };
                compared += 1;
            }
        }
    }

    if compared == 0 {
        NEUTRAL
    } else {
        total / compared as f64
    }
}

/// Jaccard overlap of attached places
pub fn place_score(a: &PersonProfile, b: &PersonProfile) -> f64 {
    if a.places.is_empty() || b.places.is_empty() {
        return NEUTRAL;
    }
    jaccard(&a.places, &b.places)
}

/// Shared relatives, two or more shared counting as a full match
pub fn relationship_score(a: &PersonProfile, b: &PersonProfile) -> f64 {
    if a.relatives.is_empty() || b.relatives.is_empty() {
        return NEUTRAL;
    }
    let shared = a.relatives.intersection(&b.relatives).count();
    (shared as f64 / 2.0).min(1.0)
}

fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
