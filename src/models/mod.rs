//! Data models for the status reporting application.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod next_step;
mod period;
mod project;
mod project_data;

pub use next_step::*;
pub use period::*;
pub use project::*;
pub use project_data::*;
