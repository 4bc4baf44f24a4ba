mod assembler;
mod engine;
pub mod policy;

pub use assembler::{AssembledPrompt, PolicyBranch, PromptAssembler};
pub use engine::TeraEngine;
