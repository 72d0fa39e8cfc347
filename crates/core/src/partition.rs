//! Pure partitioning of interviews into *available* and *taken*.
//!
//! The async side (fetching, feedback lookups) lives in the services crate;
//! everything here is synchronous and works on already-fetched data:
//!
//! 1. [`Normalized`] turns raw store records into validated interviews.
//! 2. [`Classification`] splits owned interviews by feedback existence.
//! 3. [`Partition::merge`] combines the classification with the pool.

use std::collections::HashSet;

use crate::model::{Interview, InterviewError, InterviewId, InterviewRecord};

//
// ─── NORMALIZATION ─────────────────────────────────────────────────────────────
//

/// Outcome of validating one store record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Valid(Interview),
    Dropped { reason: InterviewError },
}

impl Normalized {
    #[must_use]
    pub fn from_record(record: InterviewRecord) -> Self {
        match record.validate() {
            Ok(interview) => Self::Valid(interview),
            Err(reason) => Self::Dropped { reason },
        }
    }
}

/// Validated interviews from one store call, in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    pub valid: Vec<Interview>,
    pub dropped: usize,
}

impl NormalizedBatch {
    #[must_use]
    pub fn from_records(records: Vec<InterviewRecord>) -> Self {
        let mut batch = Self {
            valid: Vec::with_capacity(records.len()),
            dropped: 0,
        };
        for record in records {
            match Normalized::from_record(record) {
                Normalized::Valid(interview) => batch.valid.push(interview),
                Normalized::Dropped { .. } => batch.dropped += 1,
            }
        }
        batch
    }
}

//
// ─── CLASSIFICATION ────────────────────────────────────────────────────────────
//

/// Owned interviews split by whether the user already has feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub taken: Vec<Interview>,
    pub available: Vec<Interview>,
}

impl Classification {
    /// Split `(interview, has_feedback)` pairs, keeping input order on both sides.
    #[must_use]
    pub fn from_checks(checks: impl IntoIterator<Item = (Interview, bool)>) -> Self {
        let mut out = Self::default();
        for (interview, has_feedback) in checks {
            if has_feedback {
                out.taken.push(interview);
            } else {
                out.available.push(interview);
            }
        }
        out
    }
}

/// Keep the first occurrence of each interview id, preserving order.
#[must_use]
pub fn dedupe_by_id(interviews: impl IntoIterator<Item = Interview>) -> Vec<Interview> {
    let mut seen = HashSet::new();
    dedupe_with(&mut seen, interviews)
}

fn dedupe_with(
    seen: &mut HashSet<InterviewId>,
    interviews: impl IntoIterator<Item = Interview>,
) -> Vec<Interview> {
    interviews
        .into_iter()
        .filter(|interview| seen.insert(interview.id().clone()))
        .collect()
}

//
// ─── PARTITION ─────────────────────────────────────────────────────────────────
//

/// Disjoint *available* and *taken* listings for one user.
///
/// Counts are always the listing lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    available: Vec<Interview>,
    taken: Vec<Interview>,
}

impl Partition {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `available = dedupe(owned_available ++ pool)`, `taken = dedupe(owned_taken)`.
    ///
    /// Pool entries already listed as taken are skipped.
    #[must_use]
    pub fn merge(classification: Classification, pool: Vec<Interview>) -> Self {
        let mut seen = HashSet::new();
        let taken = dedupe_with(&mut seen, classification.taken);
        let available = dedupe_with(
            &mut seen,
            classification.available.into_iter().chain(pool),
        );
        Self { available, taken }
    }

    #[must_use]
    pub fn available(&self) -> &[Interview] {
        &self.available
    }

    #[must_use]
    pub fn taken(&self) -> &[Interview] {
        &self.taken
    }

    #[must_use]
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    #[must_use]
    pub fn taken_count(&self) -> usize {
        self.taken.len()
    }
}
