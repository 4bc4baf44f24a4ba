pub mod completion;
pub mod intent;
pub mod message;
pub mod orchestrator;

pub use completion::{CompletionGateway, TurnDeadline, TurnEvent};
pub use intent::{DelegatedClassifier, IntentClassifier, ModelClassifier, QueryIntent};
pub use message::{ChatMessage, Role};
pub use orchestrator::{ChatOrchestrator, PreparedTurn, TurnStream};
