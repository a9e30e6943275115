use thiserror::Error;

pub type Result<T> = std::result::Result<T, SlotError>;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("invalid slot name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid regex for slot '{name}': {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error("parameters `use_all` and `use_any` are mutually exclusive")]
    ExclusiveModes,

    #[error("given subset does not intersect with registered slots: {0}")]
    EmptyIntersection(String),

    #[error("slot storage has not been registered")]
    StorageMissing,
}
