//! Examcode Server
//!
//! HTTP front of the exam resolution pipeline: accepts a patient's free text,
//! classifies it into an imaging modality and returns the matching exam code
//! from the centre's catalog.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use cli::Cli;
pub use config::{ConfigError, ServerConfig};
pub use routes::{create_router, AppError, ExamResponse};
pub use state::AppState;
