//! Heuristic name similarity for linking and merging projects.
//!
//! [`similarity`] scores two names in `[0, 1]` with three tiers, first match
//! wins: case-folded equality (1.0), containment (shorter/longer length ratio),
//! and a long common prefix (prefix/longer length ratio). Lengths are counted in
//! characters so CJK names score the same as ASCII ones.

use serde::Serialize;

/// Default score a candidate must reach to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Anything that can be matched by name. `id` identifies members of a group.
pub trait Candidate {
    type Id: Clone;

    fn id(&self) -> Self::Id;
    fn name(&self) -> &str;
}

impl Candidate for String {
    type Id = String;

    fn id(&self) -> String {
        self.clone()
    }

    fn name(&self) -> &str {
        self
    }
}

impl Candidate for &str {
    type Id = String;

    fn id(&self) -> String {
        (*self).to_string()
    }

    fn name(&self) -> &str {
        self
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Score how alike two names are.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = fold(a);
    let b = fold(b);

    if a == b {
        return 1.0;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (shorter, longer) = if a_len <= b_len {
        (a_len, b_len)
    } else {
        (b_len, a_len)
    };

    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        return shorter as f64 / longer as f64;
    }

    let prefix = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count();
    if prefix as f64 > shorter as f64 / 2.0 {
        return prefix as f64 / longer as f64;
    }

    0.0
}

/// A candidate that cleared the threshold, with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a, T> {
    pub candidate: &'a T,
    pub score: f64,
}

/// The highest-scoring candidate at or above `threshold`. Ties keep the earlier one.
pub fn best_match<'a, T: Candidate>(
    name: &str,
    candidates: &'a [T],
    threshold: f64,
) -> Option<Match<'a, T>> {
    let mut best: Option<Match<'a, T>> = None;

    for candidate in candidates {
        let score = similarity(name, candidate.name());
        if score < threshold {
            continue;
        }
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Match { candidate, score });
        }
    }

    best
}

/// A set of near-duplicate candidates with a suggested merge target.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityGroup<T, I> {
    /// Member with the shortest name (first such member on ties).
    pub recommended_target: T,
    /// Members ordered by name length, shortest first.
    pub members: Vec<T>,
    pub member_ids: Vec<I>,
}

/// Greedily group candidates whose names score at or above `threshold`.
///
/// Candidates are visited in order; each unclaimed candidate claims every later
/// unclaimed candidate that scores high enough against it. Groups are disjoint
/// and only groups with two or more members are returned.
pub fn find_groups<T: Candidate + Clone>(
    candidates: &[T],
    threshold: f64,
) -> Vec<SimilarityGroup<T, T::Id>> {
    let mut claimed = vec![false; candidates.len()];
    let mut groups = Vec::new();

    for (i, anchor) in candidates.iter().enumerate() {
        if claimed[i] {
            continue;
        }

        let mut members = vec![i];
        for (j, other) in candidates.iter().enumerate().skip(i + 1) {
            if claimed[j] {
                continue;
            }
            if similarity(anchor.name(), other.name()) >= threshold {
                claimed[j] = true;
                members.push(j);
            }
        }

        if members.len() < 2 {
            continue;
        }
        claimed[i] = true;

        members.sort_by_key(|&idx| candidates[idx].name().chars().count());
        let members: Vec<T> = members.into_iter().map(|idx| candidates[idx].clone()).collect();
        let member_ids = members.iter().map(|m| m.id()).collect();

        groups.push(SimilarityGroup {
            recommended_target: members[0].clone(),
            members,
            member_ids,
        });
    }

    tracing::debug!(
        candidates = candidates.len(),
        groups = groups.len(),
        threshold,
        "similarity grouping complete"
    );
    groups
}
