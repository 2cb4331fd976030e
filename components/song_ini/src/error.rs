use lofty::LoftyError;
use song_primitives::FieldError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("failed to read descriptor {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("descriptor is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("line {line}: expected `[section]` or `key = value`, found `{content}`")]
    MalformedLine { line: usize, content: String },

    #[error("line {line}: duplicate key `{key}` in section `{section}`")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },
}

impl DescriptorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DescriptorError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to read audio properties of {path}")]
    Lofty {
        path: PathBuf,
        #[source]
        source: LoftyError,
    },
}

impl ProbeError {
    pub fn lofty(path: impl Into<PathBuf>, source: LoftyError) -> Self {
        ProbeError::Lofty {
            path: path.into(),
            source,
        }
    }
}

/// Why a `song.ini` could not be fully applied to a record
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("field error: {0}")]
    Field(#[from] FieldError),

    #[error("audio probe error: {0}")]
    Probe(#[from] ProbeError),
}
