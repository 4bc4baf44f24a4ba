pub mod http_client;
pub mod openai;
mod openai_types;
pub mod scrub;
pub mod sse;
pub mod streaming;
pub mod traits;

pub use http_client::{build_identified_client, build_provider_client_with_timeout};
pub use openai::OpenAiProvider;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use streaming::{
    ProviderChatRequest, ProviderResponse, ProviderStream, StopReason, StreamCollector,
    StreamEvent, resp_to_events,
};
pub use traits::Provider;
