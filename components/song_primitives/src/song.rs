use crate::part::PartDifficulties;
use crate::source::CUSTOM_SOURCE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Drum layout a chart is written for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrumType {
    FourLane,
    FiveLane,
    #[default]
    Unknown,
}

/// Canonical metadata of one song package
///
/// Both the `song.ini` resolver and the container resolver fill this record.
/// The caller owns it; resolvers mutate it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    /// Package directory the metadata was read from
    pub folder: PathBuf,

    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub loading_phrase: Option<String>,
    pub charter: Option<String>,

    /// Package source / series icon; read through [`SongInfo::source`]
    pub source: Option<String>,

    /// Song length in seconds
    pub song_length: Option<f64>,

    /// Audio delay in seconds
    pub delay: f64,

    /// Note distance (ticks) under which notes become hammer-ons/pull-offs
    pub hopo_frequency: Option<i64>,

    pub drum_type: DrumType,
    pub part_difficulties: PartDifficulties,

    /// Re-encoded album art, container packages only
    pub album_art: Option<PathBuf>,

    /// Set once resolution has been attempted
    #[serde(skip)]
    pub fetched: bool,
}

impl SongInfo {
    /// Empty record with every known part seeded as not charted
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self::with_difficulties(folder, PartDifficulties::seeded())
    }

    pub fn with_difficulties(folder: impl Into<PathBuf>, difficulties: PartDifficulties) -> Self {
        Self {
            folder: folder.into(),
            name: None,
            artist: None,
            album: None,
            genre: None,
            year: None,
            loading_phrase: None,
            charter: None,
            source: None,
            song_length: None,
            delay: 0.0,
            hopo_frequency: None,
            drum_type: DrumType::Unknown,
            part_difficulties: difficulties,
            album_art: None,
            fetched: false,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Package source, `"custom"` when nothing was recorded
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(CUSTOM_SOURCE)
    }

    /// Display name for logs and listings
    pub fn display_name(&self) -> String {
        match (&self.artist, &self.name) {
            (Some(artist), Some(name)) => format!("{} - {}", artist, name),
            (None, Some(name)) => name.clone(),
            (Some(artist), None) => artist.clone(),
            (None, None) => self
                .folder
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("Unknown")
                .to_string(),
        }
    }

    pub fn format_length(&self) -> String {
        match self.song_length {
            Some(seconds) => {
                let total_seconds = seconds.max(0.0) as u64;
                format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
            }
            None => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{Part, NOT_CHARTED};

    #[test]
    fn new_record_has_defaults() {
        let song = SongInfo::new("/songs/foo");
        assert!(!song.fetched);
        assert_eq!(song.name, None);
        assert_eq!(song.delay, 0.0);
        assert_eq!(song.drum_type, DrumType::Unknown);
        assert_eq!(song.part_difficulties.get(Part::Vocals), Some(NOT_CHARTED));
    }

    #[test]
    fn source_reads_as_custom_when_unset() {
        let mut song = SongInfo::new("/songs/foo");
        assert_eq!(song.source(), "custom");

        song.source = Some("gh2".to_string());
        assert_eq!(song.source(), "gh2");
    }

    #[test]
    fn display_name_falls_back_to_folder() {
        let mut song = SongInfo::new("/songs/Some Folder");
        assert_eq!(song.display_name(), "Some Folder");

        song.name = Some("Title".to_string());
        song.artist = Some("Band".to_string());
        assert_eq!(song.display_name(), "Band - Title");
    }

    #[test]
    fn formats_length_as_minutes_and_seconds() {
        let mut song = SongInfo::new("/songs/foo");
        assert_eq!(song.format_length(), "Unknown");

        song.song_length = Some(150.75);
        assert_eq!(song.format_length(), "2:30");
    }

    #[test]
    fn serializes_drum_type_in_screaming_case() {
        let json = serde_json::to_string(&DrumType::FourLane).unwrap();
        assert_eq!(json, "\"FOUR_LANE\"");
    }
}
