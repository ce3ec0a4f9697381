pub mod schema;

pub use schema::{Config, HistoryConfig, ProviderConfig, RemediationConfig, SuggestionConfig};
