//! Model transport: the [`Provider`] seam, its request types and the Gemini
//! implementation.

pub mod gemini;
pub mod http_client;
pub mod scrub;
pub mod traits;
pub mod types;

pub use gemini::GeminiProvider;
pub use http_client::build_provider_client;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{GenerateFuture, Provider};
pub use types::{GenerationRequest, ResponseFormat};
