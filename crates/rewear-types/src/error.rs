/// Failure decoding a persisted marked-decimal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Malformed(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(raw) => write!(f, "unparseable integer value: {raw:?}"),
        }
    }
}

impl std::error::Error for CodecError {}
