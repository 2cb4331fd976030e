use crate::part::{Part, PartDifficulties, INFERRED};

/// Source assigned to packages that don't name one
pub const CUSTOM_SOURCE: &str = "custom";

/// Sources whose charts only ever covered lead guitar
const GUITAR_ONLY_SOURCES: &[&str] = &["gh1"];

/// Sources whose charts covered lead guitar and bass
const GUITAR_AND_BASS_SOURCES: &[&str] = &["gh2", "gh80s", "gh3", "ghot", "gha"];

/// Apply a source icon value to the record's current source.
///
/// A present icon other than `"0"` only fills an unset source. An absent or
/// zeroed icon always resets the source to [`CUSTOM_SOURCE`].
pub fn apply_source_icon(current: &mut Option<String>, icon: Option<String>) {
    match icon {
        Some(icon) if icon != "0" => {
            current.get_or_insert(icon);
        }
        _ => *current = Some(CUSTOM_SOURCE.to_string()),
    }
}

/// Mark the parts a known game series always charted with the inferred tier.
///
/// Only meant for packages where no explicit difficulty was found.
pub fn apply_source_fallback(difficulties: &mut PartDifficulties, source: &str) {
    if GUITAR_ONLY_SOURCES.contains(&source) {
        difficulties.set(Part::Guitar, INFERRED);
    } else if GUITAR_AND_BASS_SOURCES.contains(&source) {
        difficulties.set(Part::Guitar, INFERRED);
        difficulties.set(Part::Bass, INFERRED);
    }
}
