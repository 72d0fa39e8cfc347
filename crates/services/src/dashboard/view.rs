use chrono::{DateTime, Utc};

use prep_core::Partition;
use prep_core::model::{Interview, InterviewId, InterviewType, User};

/// Presentation-agnostic card for one interview.
///
/// No pre-formatted strings: the renderer decides how to show dates and
/// techstack badges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewCardItem {
    pub interview_id: InterviewId,
    pub role: String,
    pub interview_type: InterviewType,
    pub techstack: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub company: Option<String>,
}

impl InterviewCardItem {
    #[must_use]
    pub fn from_interview(interview: &Interview) -> Self {
        Self {
            interview_id: interview.id().clone(),
            role: interview.role().to_owned(),
            interview_type: interview.interview_type(),
            techstack: interview.techstack().to_vec(),
            created_at: interview.created_at(),
            company: interview.company().map(str::to_owned),
        }
    }
}

/// Dashboard for a signed-in user.
///
/// Counts and listings come from the same [`Partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    user: User,
    partition: Partition,
}

impl DashboardView {
    #[must_use]
    pub fn new(user: User, partition: Partition) -> Self {
        Self { user, partition }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    #[must_use]
    pub fn available_count(&self) -> usize {
        self.partition.available_count()
    }

    #[must_use]
    pub fn taken_count(&self) -> usize {
        self.partition.taken_count()
    }

    #[must_use]
    pub fn available_items(&self) -> Vec<InterviewCardItem> {
        self.partition
            .available()
            .iter()
            .map(InterviewCardItem::from_interview)
            .collect()
    }

    #[must_use]
    pub fn taken_items(&self) -> Vec<InterviewCardItem> {
        self.partition
            .taken()
            .iter()
            .map(InterviewCardItem::from_interview)
            .collect()
    }

    /// Nothing to take yet: the renderer should offer to create an interview.
    #[must_use]
    pub fn needs_first_interview(&self) -> bool {
        self.available_count() == 0
    }

    #[must_use]
    pub fn has_taken(&self) -> bool {
        self.taken_count() > 0
    }
}

/// What the home page shows for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    /// Nobody is signed in; the renderer shows the sign-in prompt.
    SignedOut,
    Ready(DashboardView),
}

impl Dashboard {
    #[must_use]
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            Dashboard::SignedOut => None,
            Dashboard::Ready(view) => Some(view),
        }
    }

    #[must_use]
    pub fn available(&self) -> &[Interview] {
        match self {
            Dashboard::SignedOut => &[],
            Dashboard::Ready(view) => view.partition().available(),
        }
    }

    #[must_use]
    pub fn taken(&self) -> &[Interview] {
        match self {
            Dashboard::SignedOut => &[],
            Dashboard::Ready(view) => view.partition().taken(),
        }
    }

    #[must_use]
    pub fn available_count(&self) -> usize {
        self.view().map_or(0, DashboardView::available_count)
    }

    #[must_use]
    pub fn taken_count(&self) -> usize {
        self.view().map_or(0, DashboardView::taken_count)
    }
}
