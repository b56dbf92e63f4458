use crate::core::candidate::{Candidate, NO_RESULTS_ID, NO_RESULTS_LABEL, is_sentinel_id};

/// Char offsets `[start, end)` of the highlighted part of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One row of a filter result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion<C> {
    Match { candidate: C, span: Option<MatchSpan> },
    /// Placeholder shown when a non-blank query matched nothing. Never selectable.
    NoResults,
}

impl<C: Candidate> Suggestion<C> {
    pub fn plain(candidate: C) -> Self {
        Self::Match {
            candidate,
            span: None,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Match { candidate, .. } => candidate.id(),
            Self::NoResults => NO_RESULTS_ID,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Match { candidate, .. } => candidate.name(),
            Self::NoResults => NO_RESULTS_LABEL,
        }
    }

    pub fn span(&self) -> Option<MatchSpan> {
        match self {
            Self::Match { span, .. } => *span,
            Self::NoResults => None,
        }
    }

    /// The underlying record, unless this row is the sentinel.
    pub fn candidate(&self) -> Option<&C> {
        match self {
            Self::Match { candidate, .. } if !self.is_sentinel() => Some(candidate),
            _ => None,
        }
    }

    /// A record that happens to carry the reserved id counts as the sentinel too.
    pub fn is_sentinel(&self) -> bool {
        is_sentinel_id(self.id())
    }
}

pub type FilterResult<C> = Vec<Suggestion<C>>;

/// Narrows `candidates` to names containing `query`, ignoring case.
///
/// An empty query keeps every candidate without highlights. A query that is
/// not blank and matches nothing yields the single [`Suggestion::NoResults`]
/// row. Input order is preserved.
pub fn filter<C: Candidate>(candidates: &[C], query: &str) -> FilterResult<C> {
    if query.is_empty() {
        return candidates.iter().cloned().map(Suggestion::plain).collect();
    }

    let matches = candidates
        .iter()
        .filter_map(|candidate| {
            find_match(candidate.name(), query).map(|span| Suggestion::Match {
                candidate: candidate.clone(),
                span: Some(span),
            })
        })
        .collect::<Vec<_>>();

    if matches.is_empty() && !query.trim().is_empty() {
        return vec![Suggestion::NoResults];
    }
    matches
}

/// First case-insensitive occurrence of `query` in `name`, in chars.
pub fn find_match(name: &str, query: &str) -> Option<MatchSpan> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return None;
    }
    let hay: Vec<char> = name.chars().collect();
    if needle.len() > hay.len() {
        return None;
    }

    (0..=hay.len() - needle.len())
        .find(|&start| {
            hay[start..start + needle.len()]
                .iter()
                .zip(needle.iter())
                .all(|(left, right)| chars_eq_ignore_case(*left, *right))
        })
        .map(|start| MatchSpan {
            start,
            end: start + needle.len(),
        })
}

fn chars_eq_ignore_case(left: char, right: char) -> bool {
    left == right || left.to_lowercase().eq(right.to_lowercase())
}
