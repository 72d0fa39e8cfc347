#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod dashboard;
pub mod error;

pub use app_services::AppServices;
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardService, DashboardView, InterviewCardItem};
pub use error::{AppServicesError, DashboardError};
