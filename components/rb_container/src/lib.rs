//! Song metadata from console song containers: a `songs.dta` data array plus
//! one album-art texture per song, re-encoded to PNG.

mod entry;
mod error;
mod resolver;

pub use entry::{apply_entry_fields, rank_to_tier};
pub use error::ContainerError;
pub use resolver::{generated_asset_path, parse_songs_dta, ContainerResolver, ALBUM_ART_FILE, SONGS_DTA};
