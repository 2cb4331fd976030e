use crate::error::ProbeError;
use lofty::{AudioFile, Probe};
use song_primitives::SongInfo;
use std::path::Path;
use std::time::Duration;

/// Audio track every loose song package ships with
pub const AUDIO_FILE: &str = "song.ogg";

/// Measures the playing time of an audio file
pub trait DurationProbe {
    fn probe_duration(&self, path: &Path) -> Result<Duration, ProbeError>;
}

/// Reads the duration from the container/stream properties via lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProbe;

impl DurationProbe for LoftyProbe {
    fn probe_duration(&self, path: &Path) -> Result<Duration, ProbeError> {
        let tagged_file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| ProbeError::lofty(path, e))?;

        Ok(tagged_file.properties().duration())
    }
}

/// Fill `song.song_length` by probing the package's audio track.
///
/// This can be slow; only call it when the metadata carries no length.
pub fn load_song_length_from_audio<P: DurationProbe + ?Sized>(
    song: &mut SongInfo,
    probe: &P,
) -> Result<(), ProbeError> {
    let audio_path = song.folder.join(AUDIO_FILE);
    let duration = probe.probe_duration(&audio_path)?;
    song.song_length = Some(duration.as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct RecordingProbe {
        duration: Duration,
        seen: RefCell<Vec<PathBuf>>,
    }

    impl DurationProbe for RecordingProbe {
        fn probe_duration(&self, path: &Path) -> Result<Duration, ProbeError> {
            self.seen.borrow_mut().push(path.to_path_buf());
            Ok(self.duration)
        }
    }

    #[test]
    fn probes_song_ogg_in_package_folder() {
        let probe = RecordingProbe {
            duration: Duration::from_millis(183_250),
            seen: RefCell::new(Vec::new()),
        };
        let mut song = SongInfo::new("/library/band - title");

        load_song_length_from_audio(&mut song, &probe).unwrap();

        assert_eq!(song.song_length, Some(183.25));
        assert_eq!(
            probe.seen.borrow().as_slice(),
            &[PathBuf::from("/library/band - title/song.ogg")]
        );
    }

    #[test]
    fn lofty_reports_missing_audio() {
        let dir = tempfile::tempdir().unwrap();
        let mut song = SongInfo::new(dir.path());

        let result = load_song_length_from_audio(&mut song, &LoftyProbe);

        assert_matches!(result, Err(ProbeError::Lofty { .. }));
        assert_eq!(song.song_length, None);
    }

    #[test]
    fn lofty_rejects_non_audio_data() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(AUDIO_FILE), b"definitely not vorbis").unwrap();

        let result = LoftyProbe.probe_duration(&dir.path().join(AUDIO_FILE));

        assert_matches!(result, Err(ProbeError::Lofty { .. }));
    }
}
