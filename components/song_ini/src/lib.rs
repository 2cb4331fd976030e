//! `song.ini` package support: descriptor parsing, metadata resolution and
//! the audio-probing fallback for packages without an explicit length.

pub mod descriptor;
mod duration;
mod error;
mod resolver;

pub use descriptor::{parse, Descriptor, ParseOptions, Section};
pub use duration::{load_song_length_from_audio, DurationProbe, LoftyProbe, AUDIO_FILE};
pub use error::{DescriptorError, ProbeError, ResolveError};
pub use resolver::{complete_song_info, Resolution, SongIniResolver, DESCRIPTOR_FILE};
