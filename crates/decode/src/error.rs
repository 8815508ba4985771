use ownir_core::ParseNameError;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("a program must be an array of instructions, found {found}")]
    NotAProgram { found: &'static str },

    #[error("entry {index}: an instruction must be an array, found {found}")]
    NotAnInstruction { index: usize, found: &'static str },

    #[error("entry {index}: expected a destination and a tag")]
    MissingTag { index: usize },

    #[error("entry {index}: unknown tag `{tag}`")]
    UnknownTag { index: usize, tag: String },

    #[error("entry {index}: `{tag}` takes {expected} field(s) after its tag, found {found}")]
    FieldCount { index: usize, tag: String, expected: usize, found: usize },

    #[error("entry {index}: field {field} of `{tag}` must be {expected}")]
    FieldType { index: usize, tag: String, field: usize, expected: &'static str },

    #[error("entry {index}: `{tag}` requires a destination register")]
    MissingDestination { index: usize, tag: String },

    #[error("entry {index}: `{tag}` does not take a destination register")]
    UnexpectedDestination { index: usize, tag: String },

    #[error("entry {index}: {source}")]
    Name {
        index: usize,
        #[source]
        source: ParseNameError,
    },
}
