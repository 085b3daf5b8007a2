use thiserror::Error;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// Source or destination could not be opened, read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed stream is truncated or structurally invalid.
    #[error("corrupt archive: {0}")]
    CorruptArchive(&'static str),

    /// The length header is 32 bits wide.
    #[error("input is {0} bytes, larger than the 4 GiB archive limit")]
    InputTooLarge(u64),

    /// The input differed between the counting pass and the encoding pass.
    #[error("input changed between compression passes")]
    InputChanged,
}

impl HuffmanError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, HuffmanError::CorruptArchive(_))
    }
}
