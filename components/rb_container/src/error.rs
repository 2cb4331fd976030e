use dta::DtaError;
use milo_texture::TextureError;
use song_primitives::FieldError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode songs.dta: {0}")]
    Dta(#[from] DtaError),

    #[error("song entry `{entry}` has no song path")]
    MissingSongPath { entry: String },

    #[error("song path `{path}` is not of the form songs/<group>/<name>")]
    InvalidSongPath { path: String },

    #[error("failed to convert texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: TextureError,
    },

    #[error("song entry `{entry}`: {source}")]
    Field {
        entry: String,
        #[source]
        source: FieldError,
    },

    #[error("failed to create album art file: {0}")]
    ArtFile(#[source] std::io::Error),
}

impl ContainerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContainerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn texture(path: impl Into<PathBuf>, source: TextureError) -> Self {
        ContainerError::Texture {
            path: path.into(),
            source,
        }
    }
}
