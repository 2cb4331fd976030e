use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Difficulty tier meaning "this part is not charted"
pub const NOT_CHARTED: i32 = -1;

/// Placeholder tier inferred from the package source rather than read from data
pub const INFERRED: i32 = -2;

/// Instrument part a song can chart a difficulty for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Guitar,
    Bass,
    Drums,
    Keys,
    Vocals,
    RealGuitar,
    RealBass,
    RealDrums,
    RealKeys,
    HarmVocals,
}

impl Part {
    pub const ALL: [Part; 10] = [
        Part::Guitar,
        Part::Bass,
        Part::Drums,
        Part::Keys,
        Part::Vocals,
        Part::RealGuitar,
        Part::RealBass,
        Part::RealDrums,
        Part::RealKeys,
        Part::HarmVocals,
    ];

    /// Canonical key of the part (`guitar`, `realGuitar`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Part::Guitar => "guitar",
            Part::Bass => "bass",
            Part::Drums => "drums",
            Part::Keys => "keys",
            Part::Vocals => "vocals",
            Part::RealGuitar => "realGuitar",
            Part::RealBass => "realBass",
            Part::RealDrums => "realDrums",
            Part::RealKeys => "realKeys",
            Part::HarmVocals => "harmVocals",
        }
    }

    /// Suffix used for the part in descriptor keys (`diff_<suffix>`)
    pub fn descriptor_key(&self) -> &'static str {
        match self {
            Part::RealGuitar => "guitar_real",
            Part::RealBass => "bass_real",
            Part::RealDrums => "drums_real",
            Part::RealKeys => "keys_real",
            Part::HarmVocals => "vocals_harm",
            other => other.key(),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Difficulty tier per instrument part
///
/// A missing entry and an entry of [`NOT_CHARTED`] both mean the part is not
/// charted. Resolvers only overwrite entries that are already present, except
/// for the source-inferred fallback which forces its parts in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartDifficulties(BTreeMap<Part, i32>);

impl PartDifficulties {
    /// Empty mapping, nothing will be looked up for it
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Every known part, marked as not charted
    pub fn seeded() -> Self {
        Self(Part::ALL.into_iter().map(|part| (part, NOT_CHARTED)).collect())
    }

    pub fn get(&self, part: Part) -> Option<i32> {
        self.0.get(&part).copied()
    }

    pub fn set(&mut self, part: Part, tier: i32) {
        self.0.insert(part, tier);
    }

    pub fn contains(&self, part: Part) -> bool {
        self.0.contains_key(&part)
    }

    /// Parts currently tracked, in canonical order
    pub fn parts(&self) -> Vec<Part> {
        self.0.keys().copied().collect()
    }

    pub fn is_charted(&self, part: Part) -> bool {
        self.get(part).is_some_and(|tier| tier != NOT_CHARTED)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Part, i32)> + '_ {
        self.0.iter().map(|(part, tier)| (*part, *tier))
    }
}

impl FromIterator<(Part, i32)> for PartDifficulties {
    fn from_iter<T: IntoIterator<Item = (Part, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
