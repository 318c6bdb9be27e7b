pub mod generation_service;
pub mod profile_service;

pub use generation_service::{GenerationOutcome, GenerationRequest, GenerationService};
pub use profile_service::ProfileService;
