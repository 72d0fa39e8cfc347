mod feedback;
mod ids;
mod interview;
mod user;

pub use ids::{IdError, InterviewId, UserId};

pub use feedback::{FeedbackError, FeedbackRecord};
pub use interview::{Interview, InterviewError, InterviewRecord, InterviewType};
pub use user::{User, UserError};
