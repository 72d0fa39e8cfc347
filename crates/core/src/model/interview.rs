use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{InterviewId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InterviewError {
    #[error("interview record has no id")]
    MissingId,
}

//
// ─── INTERVIEW TYPE ────────────────────────────────────────────────────────────
//

/// Kind of mock interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewType {
    Technical,
    Behavioral,
    Mixed,
}

impl InterviewType {
    /// Parse a free-form label as stored by the interview generator.
    ///
    /// Matching is case-insensitive. Any label mentioning "mix" is `Mixed`;
    /// unknown labels fall back to `Technical`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        if lower.contains("mix") {
            Self::Mixed
        } else if lower.starts_with("behavio") {
            Self::Behavioral
        } else {
            Self::Technical
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for InterviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── RAW RECORD ────────────────────────────────────────────────────────────────
//

/// Interview snapshot as handed back by a store, before validation.
///
/// Stores may carry legacy rows without an id; those never become an
/// [`Interview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewRecord {
    pub id: Option<String>,
    pub owner_id: UserId,
    pub role: String,
    pub interview_type: String,
    pub techstack: Vec<String>,
    pub company: Option<String>,
    pub finalized: bool,
    pub created_at: DateTime<Utc>,
}

impl InterviewRecord {
    #[must_use]
    pub fn from_interview(interview: &Interview) -> Self {
        Self {
            id: Some(interview.id().as_str().to_owned()),
            owner_id: interview.owner_id().clone(),
            role: interview.role().to_owned(),
            interview_type: interview.interview_type().label().to_owned(),
            techstack: interview.techstack().to_vec(),
            company: interview.company().map(str::to_owned),
            finalized: interview.is_finalized(),
            created_at: interview.created_at(),
        }
    }

    /// Convert the record into a validated `Interview`.
    ///
    /// # Errors
    ///
    /// Returns `InterviewError::MissingId` if the id is absent or blank.
    pub fn validate(self) -> Result<Interview, InterviewError> {
        let id = self
            .id
            .and_then(|raw| InterviewId::new(raw).ok())
            .ok_or(InterviewError::MissingId)?;

        let mut interview = Interview::new(
            id,
            self.owner_id,
            self.role,
            InterviewType::from_label(&self.interview_type),
            self.techstack,
            self.created_at,
        )
        .with_finalized(self.finalized);
        if let Some(company) = self.company {
            interview = interview.with_company(company);
        }
        Ok(interview)
    }
}

//
// ─── INTERVIEW ─────────────────────────────────────────────────────────────────
//

/// A mock interview with a resolved identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interview {
    id: InterviewId,
    owner_id: UserId,
    role: String,
    interview_type: InterviewType,
    techstack: Vec<String>,
    company: Option<String>,
    finalized: bool,
    created_at: DateTime<Utc>,
}

impl Interview {
    /// Techstack entries are trimmed; empty entries are dropped, order is kept.
    #[must_use]
    pub fn new(
        id: InterviewId,
        owner_id: UserId,
        role: impl Into<String>,
        interview_type: InterviewType,
        techstack: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let techstack = techstack
            .into_iter()
            .map(|tech| tech.trim().to_owned())
            .filter(|tech| !tech.is_empty())
            .collect();
        Self {
            id,
            owner_id,
            role: role.into().trim().to_owned(),
            interview_type,
            techstack,
            company: None,
            finalized: false,
            created_at,
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        let company = company.into();
        let company = company.trim();
        self.company = (!company.is_empty()).then(|| company.to_owned());
        self
    }

    #[must_use]
    pub fn with_finalized(mut self, finalized: bool) -> Self {
        self.finalized = finalized;
        self
    }

    #[must_use]
    pub fn id(&self) -> &InterviewId {
        &self.id
    }

    #[must_use]
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn interview_type(&self) -> InterviewType {
        self.interview_type
    }

    #[must_use]
    pub fn techstack(&self) -> &[String] {
        &self.techstack
    }

    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
