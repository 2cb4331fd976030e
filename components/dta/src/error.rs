use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl DtaError {
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        DtaError::Syntax {
            line,
            message: message.into(),
        }
    }
}
