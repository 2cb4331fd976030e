use crate::descriptor::{parse, ParseOptions};
use crate::duration::{load_song_length_from_audio, DurationProbe, LoftyProbe};
use crate::error::ResolveError;
use song_primitives::fields::{self, FieldSource};
use song_primitives::{apply_source_fallback, apply_source_icon, DrumType, SongInfo};
use std::path::Path;

/// Descriptor file of a loose song package
pub const DESCRIPTOR_FILE: &str = "song.ini";

/// Accepted metadata section names, tried in order
const SECTION_NAMES: [&str; 2] = ["song", "Song"];

/// HOPO threshold implied by `eighthnote_hopo`
const EIGHTH_NOTE_HOPO_FREQUENCY: i64 = 240;

/// Outcome of resolving one record against its `song.ini`
#[derive(Debug)]
pub enum Resolution {
    /// The record was resolved before; nothing was read
    AlreadyFetched,
    /// The package has no descriptor, defaults apply
    NoDescriptor,
    /// The descriptor has no `song` section
    MissingSection,
    Completed,
    /// Resolution stopped part way; the record keeps what was applied
    Failed(ResolveError),
}

impl Resolution {
    pub fn is_completed(&self) -> bool {
        matches!(self, Resolution::Completed)
    }
}

/// Completes [`SongInfo`] records from `song.ini` descriptors
#[derive(Debug, Clone)]
pub struct SongIniResolver<P = LoftyProbe> {
    probe: P,
    options: ParseOptions,
}

impl SongIniResolver<LoftyProbe> {
    pub fn new() -> Self {
        Self::with_probe(LoftyProbe)
    }
}

impl Default for SongIniResolver<LoftyProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DurationProbe> SongIniResolver<P> {
    /// Use `probe` when a descriptor carries no song length
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe,
            options: ParseOptions::SONG_INI,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Fill `song` from the `song.ini` in its folder.
    ///
    /// Runs at most once per record: the first call that finds a descriptor
    /// marks the record fetched, whether or not extraction succeeds. Errors are
    /// logged and reported through [`Resolution::Failed`], never propagated.
    pub fn resolve(&self, song: &mut SongInfo) -> Resolution {
        if song.fetched {
            return Resolution::AlreadyFetched;
        }

        let path = song.folder.join(DESCRIPTOR_FILE);
        if !path.is_file() {
            return Resolution::NoDescriptor;
        }

        song.fetched = true;
        match self.apply_descriptor(song, &path) {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::error!(
                    folder = %song.folder.display(),
                    "Failed to parse song.ini: {}",
                    e
                );
                Resolution::Failed(e)
            }
        }
    }

    fn apply_descriptor(&self, song: &mut SongInfo, path: &Path) -> Result<Resolution, ResolveError> {
        let descriptor = parse(path, &self.options)?;

        let Some(group) = SECTION_NAMES
            .into_iter()
            .find(|name| descriptor.section(name).is_some())
        else {
            tracing::error!(folder = %song.folder.display(), "No `song` section found");
            return Ok(Resolution::MissingSection);
        };

        apply_fields(song, &descriptor, group, &self.probe)?;
        Ok(Resolution::Completed)
    }
}

/// Resolve `song` with the default lofty-backed audio probe
pub fn complete_song_info(song: &mut SongInfo) -> Resolution {
    SongIniResolver::new().resolve(song)
}

fn apply_fields<S, P>(
    song: &mut SongInfo,
    source: &S,
    group: &str,
    probe: &P,
) -> Result<(), ResolveError>
where
    S: FieldSource + ?Sized,
    P: DurationProbe + ?Sized,
{
    song.name = Some(fields::required(source, group, "name")?);
    song.artist = Some(fields::required(source, group, "artist")?);

    song.album = fields::optional(source, group, "album");
    song.genre = fields::optional(source, group, "genre");
    song.year = fields::optional(source, group, "year");
    song.loading_phrase = fields::optional(source, group, "loading_phrase");

    if let Some(charter) = fields::first_of(source, group, &["charter", "frets"]) {
        song.charter = Some(charter);
    }

    apply_source_icon(&mut song.source, fields::optional(source, group, "icon"));

    match fields::millis_as_secs(source, group, "song_length")? {
        Some(seconds) => song.song_length = Some(seconds),
        None => {
            tracing::warn!(
                folder = %song.folder.display(),
                "No song length found. Loading audio file, this might take longer."
            );
            load_song_length_from_audio(song, probe)?;
        }
    }

    song.drum_type = if fields::truthy(source, group, "pro_drums") {
        DrumType::FourLane
    } else if fields::truthy(source, group, "five_lane_drums") {
        DrumType::FiveLane
    } else {
        DrumType::Unknown
    };

    song.delay = fields::millis_as_secs(source, group, "delay")?.unwrap_or(0.0);

    if let Some(frequency) = hopo_frequency(source, group)? {
        song.hopo_frequency = Some(frequency);
    }

    apply_difficulties(song, source, group)?;

    Ok(())
}

fn hopo_frequency<S: FieldSource + ?Sized>(
    source: &S,
    group: &str,
) -> Result<Option<i64>, ResolveError> {
    if let Some(frequency) = fields::int(source, group, "hopo_frequency")? {
        return Ok(Some(frequency));
    }
    if let Some(frequency) = fields::int(source, group, "hopofreq")? {
        return Ok(Some(frequency));
    }
    if fields::truthy(source, group, "eighthnote_hopo") {
        return Ok(Some(EIGHTH_NOTE_HOPO_FREQUENCY));
    }
    Ok(None)
}

/// Overwrite tracked parts from `diff_*` keys; with none found, infer from the source
fn apply_difficulties<S: FieldSource + ?Sized>(
    song: &mut SongInfo,
    source: &S,
    group: &str,
) -> Result<(), ResolveError> {
    let mut found_any = false;

    for part in song.part_difficulties.parts() {
        let key = format!("diff_{}", part.descriptor_key());
        if let Some(tier) = fields::int::<i32, S>(source, group, &key)? {
            song.part_difficulties.set(part, tier);
            found_any = true;
        }
    }

    if !found_any {
        let source_name = song.source().to_string();
        apply_source_fallback(&mut song.part_difficulties, &source_name);
    }

    Ok(())
}
