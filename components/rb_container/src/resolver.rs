use crate::entry::apply_entry_fields;
use crate::error::ContainerError;
use dta::DataArray;
use milo_texture::{read_bitmap, write_bitmap, HmxBitmap, SystemInfo};
use song_primitives::{FieldSource, PartDifficulties, SongInfo};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

pub const SONGS_DTA: &str = "songs.dta";

/// Album art texture inside a song's generated asset directory
pub const ALBUM_ART_FILE: &str = "_keep.png_xbox";

/// Generated asset directory of a song path: `songs/<group>/<name>` becomes
/// `songs/<group>/gen/<name>`
pub fn generated_asset_path(song_path: &str) -> Result<PathBuf, ContainerError> {
    let segments: Vec<&str> = song_path.split('/').collect();
    match segments.as_slice() {
        [root, group, name, ..] if !group.is_empty() && !name.is_empty() => {
            Ok(PathBuf::from(root).join(group).join("gen").join(name))
        }
        _ => Err(ContainerError::InvalidSongPath {
            path: song_path.to_string(),
        }),
    }
}

/// Read and decode `<folder>/songs.dta`
pub fn parse_songs_dta(folder: &Path) -> Result<DataArray, ContainerError> {
    let path = folder.join(SONGS_DTA);
    let file = File::open(&path).map_err(|e| ContainerError::io(&path, e))?;
    Ok(dta::from_reader(BufReader::new(file))?)
}

/// Resolves every song of a console container package
#[derive(Debug, Clone)]
pub struct ContainerResolver {
    profile: SystemInfo,
    art_dir: Option<PathBuf>,
    difficulties: PartDifficulties,
}

impl Default for ContainerResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerResolver {
    pub fn new() -> Self {
        Self {
            profile: SystemInfo::XBOX_360,
            art_dir: None,
            difficulties: PartDifficulties::seeded(),
        }
    }

    /// Texture profile used to decode album art
    pub fn with_profile(mut self, profile: SystemInfo) -> Self {
        self.profile = profile;
        self
    }

    /// Write album art PNGs into `dir` instead of the system temp directory
    pub fn with_art_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.art_dir = Some(dir.into());
        self
    }

    /// Parts each record starts out with
    pub fn with_difficulties(mut self, difficulties: PartDifficulties) -> Self {
        self.difficulties = difficulties;
        self
    }

    /// One record per song of the package, or `None` if any song fails
    pub fn resolve(&self, folder: &Path) -> Option<Vec<SongInfo>> {
        match self.try_resolve(folder) {
            Ok(songs) => Some(songs),
            Err(e) => {
                error!(folder = %folder.display(), "Failed to read song container: {}", e);
                None
            }
        }
    }

    pub fn try_resolve(&self, folder: &Path) -> Result<Vec<SongInfo>, ContainerError> {
        let root = parse_songs_dta(folder)?;
        let mut songs = Vec::new();

        for entry in root.arrays() {
            match self.resolve_entry(folder, entry) {
                Ok(song) => songs.push(song),
                Err(e) => {
                    remove_album_art(&songs);
                    return Err(e);
                }
            }
        }

        Ok(songs)
    }

    fn resolve_entry(&self, folder: &Path, entry: &DataArray) -> Result<SongInfo, ContainerError> {
        let entry_name = entry.name().unwrap_or_default().to_string();
        let song_path = entry
            .try_get("song", "name")
            .ok_or_else(|| ContainerError::MissingSongPath {
                entry: entry_name.clone(),
            })?;
        debug!(entry = %entry_name, song_path = %song_path, "Resolving container entry");

        let texture_path = folder
            .join(generated_asset_path(&song_path)?)
            .join(ALBUM_ART_FILE);
        let bitmap = read_bitmap(&texture_path).map_err(|e| ContainerError::texture(&texture_path, e))?;

        let mut song = SongInfo::with_difficulties(folder, self.difficulties.clone());
        apply_entry_fields(&mut song, entry).map_err(|source| ContainerError::Field {
            entry: entry_name,
            source,
        })?;

        song.album_art = Some(self.write_album_art(&bitmap, &texture_path)?);
        song.fetched = true;
        Ok(song)
    }

    fn write_album_art(&self, bitmap: &HmxBitmap, texture_path: &Path) -> Result<PathBuf, ContainerError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("album-art-").suffix(".png");
        let file = match &self.art_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(ContainerError::ArtFile)?;

        let path = file
            .into_temp_path()
            .keep()
            .map_err(|e| ContainerError::ArtFile(e.error))?;

        if let Err(e) = write_bitmap(bitmap, &self.profile, &path) {
            let _ = fs::remove_file(&path);
            return Err(ContainerError::texture(texture_path, e));
        }
        Ok(path)
    }
}

fn remove_album_art(songs: &[SongInfo]) {
    for path in songs.iter().filter_map(|song| song.album_art.as_ref()) {
        if let Err(e) = fs::remove_file(path) {
            debug!(path = %path.display(), "Could not remove album art: {}", e);
        }
    }
}
