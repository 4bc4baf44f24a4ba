pub mod dispatch;
pub mod services;

pub use dispatch::dispatch;
pub use services::Services;
