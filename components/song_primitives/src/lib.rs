pub mod fields;
mod part;
mod song;
mod source;

pub use fields::{FieldError, FieldSource};
pub use part::{Part, PartDifficulties, INFERRED, NOT_CHARTED};
pub use song::{DrumType, SongInfo};
pub use source::{apply_source_fallback, apply_source_icon, CUSTOM_SOURCE};
