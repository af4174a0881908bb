use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid UTF-8 input at byte {offset}")]
    InvalidUtf8 { offset: u64 },
    #[error("Cannot build a Huffman tree from an empty frequency table")]
    EmptyAlphabet,
    #[error("Codebook header ended before the sentinel")]
    MissingSentinel,
    #[error("Malformed codebook header at byte {offset}: {reason}")]
    MalformedHeader { offset: u64, reason: String },
    #[error("Codebook header assigns code {code} more than once")]
    DuplicateCode { code: String },
    #[error("Corrupt body unit {value:#04x} at byte {offset}")]
    CorruptBody { offset: u64, value: u8 },
    #[error("Body ended with unmatched bits: {bits}")]
    UnresolvedBits { bits: String },
    #[error("Symbol {0:?} has no code in the code table")]
    UnknownSymbol(char),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HuffError>;
