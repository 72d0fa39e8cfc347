use thiserror::Error;

use crate::model::{FeedbackError, IdError, InterviewError, UserError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Interview(#[from] InterviewError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}
