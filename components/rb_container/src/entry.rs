//! Mapping of one `songs.dta` entry onto a [`SongInfo`].

use dta::DataArray;
use song_primitives::{
    apply_source_fallback, apply_source_icon, fields, DrumType, FieldError, Part, SongInfo,
    NOT_CHARTED,
};

/// Group of the entry itself
const ENTRY: &str = "";
const SONG: &str = "song";
const RANK: &str = "rank";

/// Rank values at which each tier after the first begins
const DRUM_TIERS: [i32; 6] = [124, 151, 178, 242, 345, 448];
const GUITAR_TIERS: [i32; 6] = [139, 176, 221, 267, 333, 409];
const BASS_TIERS: [i32; 6] = [135, 181, 228, 293, 364, 436];
const VOCAL_TIERS: [i32; 6] = [132, 175, 218, 279, 353, 427];
const KEYS_TIERS: [i32; 6] = [153, 211, 269, 327, 385, 443];
const REAL_GUITAR_TIERS: [i32; 6] = [150, 205, 264, 323, 382, 442];
const REAL_BASS_TIERS: [i32; 6] = [150, 208, 267, 325, 384, 442];

/// `rank` key and tier thresholds of a part
fn rank_table(part: Part) -> (&'static str, &'static [i32; 6]) {
    match part {
        Part::Guitar => ("guitar", &GUITAR_TIERS),
        Part::Bass => ("bass", &BASS_TIERS),
        Part::Drums | Part::RealDrums => ("drum", &DRUM_TIERS),
        Part::Keys => ("keys", &KEYS_TIERS),
        Part::RealKeys => ("real_keys", &KEYS_TIERS),
        Part::Vocals | Part::HarmVocals => ("vocals", &VOCAL_TIERS),
        Part::RealGuitar => ("real_guitar", &REAL_GUITAR_TIERS),
        Part::RealBass => ("real_bass", &REAL_BASS_TIERS),
    }
}

/// Difficulty tier (0..=6) of a rank value; rank 0 means the part is absent
pub fn rank_to_tier(part: Part, rank: i32) -> i32 {
    if rank <= 0 {
        return NOT_CHARTED;
    }
    let (_, thresholds) = rank_table(part);
    thresholds.iter().take_while(|&&t| t <= rank).count() as i32
}

/// Fill `song` from a song entry of a `songs.dta` file
pub fn apply_entry_fields(song: &mut SongInfo, entry: &DataArray) -> Result<(), FieldError> {
    song.name = Some(fields::required(entry, ENTRY, "name")?);
    song.artist = Some(fields::required(entry, ENTRY, "artist")?);
    song.album = fields::optional(entry, ENTRY, "album_name");
    song.genre = fields::optional(entry, ENTRY, "genre");
    song.year = fields::optional(entry, ENTRY, "year_released");
    if let Some(charter) = fields::first_of(entry, ENTRY, &["author", "charter"]) {
        song.charter = Some(charter);
    }
    apply_source_icon(&mut song.source, fields::optional(entry, ENTRY, "game_origin"));

    let length = fields::millis_as_secs(entry, ENTRY, "song_length")?
        .ok_or_else(|| FieldError::missing("song_length"))?;
    song.song_length = Some(length);
    if let Some(threshold) = fields::int::<i64, _>(entry, SONG, "hopo_threshold")? {
        song.hopo_frequency = Some(threshold);
    }

    apply_ranks(song, entry)?;
    if song.part_difficulties.is_charted(Part::Drums) {
        song.drum_type = DrumType::FourLane;
    }
    Ok(())
}

fn apply_ranks(song: &mut SongInfo, entry: &DataArray) -> Result<(), FieldError> {
    let harmonies = fields::int::<i32, _>(entry, SONG, "vocal_parts")?.unwrap_or(1) > 1;
    let mut found = false;

    for part in song.part_difficulties.parts() {
        if part == Part::HarmVocals && !harmonies {
            continue;
        }
        let (key, _) = rank_table(part);
        if let Some(rank) = fields::int::<i32, _>(entry, RANK, key)? {
            song.part_difficulties.set(part, rank_to_tier(part, rank));
            found = true;
        }
    }

    if !found {
        let source = song.source().to_string();
        apply_source_fallback(&mut song.part_difficulties, &source);
    }
    Ok(())
}
