pub mod chat;
pub mod lookups;
pub mod providers;
pub mod retrieval;
