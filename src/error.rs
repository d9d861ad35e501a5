use thiserror::Error;

/// Per-article parse failures. None of these abort a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("segmentation failed: {0}")]
    Segmentation(String),

    #[error("unclassifiable section: {0}")]
    Classification(String),

    #[error("property `{0}` has no signature code block")]
    MissingSignature(String),

    #[error("property `{0}` has more than one signature code block")]
    DuplicateSignature(String),

    #[error("method `{0}` has no signature code block")]
    MissingSignatureCodeBlock(String),

    #[error("cannot parse signature: {0:?}")]
    SignatureParse(String),

    #[error("assertion failed: {0}")]
    Assertion(&'static str),
}

pub type Result<T> = std::result::Result<T, ParseError>;
