pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod workflow;

pub use client::{HttpTransport, Transport, TryOnClient, process_images, process_images_with};
pub use config::TryOnConfig;
pub use error::AppError;
pub use workflow::{Orchestrator, WorkflowPhase};
