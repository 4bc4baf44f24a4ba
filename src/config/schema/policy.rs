use serde::{Deserialize, Serialize};

/// How the intent of a chat query is decided before prompt assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClassifierMode {
    /// The generator applies the policy branches itself in the answering call.
    #[default]
    Delegated,
    /// A short classification call to the generator precedes assembly.
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PolicyConfig {
    #[serde(default)]
    pub classifier: ClassifierMode,
}
