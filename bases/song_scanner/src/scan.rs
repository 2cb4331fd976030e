use crate::config::{Config, PackageFilter};
use rb_container::{ContainerResolver, SONGS_DTA};
use song_ini::{Resolution, SongIniResolver, DESCRIPTOR_FILE};
use song_primitives::SongInfo;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Kind of song package found in a library directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Loose folder with a `song.ini`
    Ini,
    /// Console container extracted to a folder with a `songs.dta`
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub folder: PathBuf,
    pub kind: PackageKind,
}

/// Every package under `library` the filter admits, in walk order
pub fn discover_packages(library: &Path, filter: PackageFilter) -> Vec<Package> {
    WalkDir::new(library)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let kind = match entry.file_name().to_str()? {
                DESCRIPTOR_FILE if filter.includes_ini() => PackageKind::Ini,
                SONGS_DTA if filter.includes_containers() => PackageKind::Container,
                _ => return None,
            };
            Some(Package {
                folder: entry.path().parent()?.to_path_buf(),
                kind,
            })
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub songs: Vec<SongInfo>,
    pub ini_packages: usize,
    pub container_packages: usize,
    /// Packages that produced no records, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl ScanReport {
    pub fn total_length_seconds(&self) -> f64 {
        self.songs.iter().filter_map(|song| song.song_length).sum()
    }

    pub fn with_album_art(&self) -> usize {
        self.songs.iter().filter(|song| song.album_art.is_some()).count()
    }
}

pub struct Scanner {
    ini: SongIniResolver,
    containers: ContainerResolver,
}

impl Scanner {
    pub fn new(config: &Config) -> Self {
        let mut containers = ContainerResolver::new();
        if let Some(dir) = &config.art_dir {
            containers = containers.with_art_dir(dir);
        }
        Self {
            ini: SongIniResolver::new().with_options(config.ini_options),
            containers,
        }
    }

    pub fn scan(&self, library: &Path, filter: PackageFilter) -> ScanReport {
        let mut report = ScanReport::default();

        for package in discover_packages(library, filter) {
            debug!(folder = %package.folder.display(), kind = ?package.kind, "Resolving package");
            match package.kind {
                PackageKind::Ini => {
                    report.ini_packages += 1;
                    self.scan_ini(&package.folder, &mut report);
                }
                PackageKind::Container => {
                    report.container_packages += 1;
                    match self.containers.resolve(&package.folder) {
                        Some(songs) => report.songs.extend(songs),
                        None => report
                            .failed
                            .push((package.folder, "unreadable song container".to_string())),
                    }
                }
            }
        }

        info!(
            songs = report.songs.len(),
            failed = report.failed.len(),
            "Scan of {} complete",
            library.display()
        );
        report
    }

    fn scan_ini(&self, folder: &Path, report: &mut ScanReport) {
        let mut song = SongInfo::new(folder);
        match self.ini.resolve(&mut song) {
            Resolution::Completed => report.songs.push(song),
            Resolution::Failed(e) => report.failed.push((folder.to_path_buf(), e.to_string())),
            Resolution::MissingSection => report
                .failed
                .push((folder.to_path_buf(), "no [song] section".to_string())),
            Resolution::NoDescriptor | Resolution::AlreadyFetched => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use song_ini::ParseOptions;
    use std::fs;
    use tempfile::TempDir;

    fn config(library: &Path, art: &Path) -> Config {
        Config {
            library: library.to_path_buf(),
            filter: PackageFilter::All,
            output: OutputFormat::Summary,
            art_dir: Some(art.to_path_buf()),
            ini_options: ParseOptions::SONG_INI,
        }
    }

    fn write_ini(dir: &Path, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(DESCRIPTOR_FILE), body).unwrap();
    }

    fn library() -> TempDir {
        let library = TempDir::new().unwrap();
        write_ini(
            &library.path().join("a_first"),
            "[song]\nname = First\nartist = Band\nsong_length = 61000\n",
        );
        write_ini(&library.path().join("b_broken"), "[song]\nname = No Artist\n");
        write_ini(&library.path().join("c_nosection"), "[other]\nname = x\n");

        let container = library.path().join("d_container");
        fs::create_dir_all(&container).unwrap();
        fs::write(
            container.join(SONGS_DTA),
            "(s (name \"Boxed\") (artist \"Band\") (song (name \"songs/s/s\")))",
        )
        .unwrap();
        library
    }

    #[test]
    fn discovers_both_package_kinds() {
        let library = library();
        let packages = discover_packages(library.path(), PackageFilter::All);
        let kinds: Vec<_> = packages.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PackageKind::Ini,
                PackageKind::Ini,
                PackageKind::Ini,
                PackageKind::Container
            ]
        );
        assert_eq!(packages[0].folder, library.path().join("a_first"));
    }

    #[test]
    fn filters_package_kinds() {
        let library = library();
        let ini = discover_packages(library.path(), PackageFilter::IniOnly);
        assert!(ini.iter().all(|p| p.kind == PackageKind::Ini));
        assert_eq!(ini.len(), 3);

        let containers = discover_packages(library.path(), PackageFilter::ContainersOnly);
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].kind, PackageKind::Container);
    }

    #[test]
    fn scan_collects_records_and_failures() {
        let library = library();
        let art = TempDir::new().unwrap();
        let scanner = Scanner::new(&config(library.path(), art.path()));

        let report = scanner.scan(library.path(), PackageFilter::All);

        assert_eq!(report.ini_packages, 3);
        assert_eq!(report.container_packages, 1);
        assert_eq!(report.songs.len(), 1);
        assert_eq!(report.songs[0].name.as_deref(), Some("First"));
        assert_eq!(report.total_length_seconds(), 61.0);

        let failed: Vec<_> = report.failed.iter().map(|(folder, _)| folder.clone()).collect();
        assert_eq!(
            failed,
            vec![
                library.path().join("b_broken"),
                library.path().join("c_nosection"),
                library.path().join("d_container"),
            ]
        );
    }

    #[test]
    fn strict_options_reach_the_ini_resolver() {
        let library = TempDir::new().unwrap();
        write_ini(
            &library.path().join("dup"),
            "[song]\nname = One\nname = Two\nartist = Band\nsong_length = 1000\n",
        );
        let art = TempDir::new().unwrap();

        let lenient = Scanner::new(&config(library.path(), art.path()));
        let report = lenient.scan(library.path(), PackageFilter::IniOnly);
        assert_eq!(report.songs[0].name.as_deref(), Some("Two"));

        let strict = Scanner::new(&Config {
            ini_options: ParseOptions {
                allow_duplicate_keys: false,
                ..ParseOptions::SONG_INI
            },
            ..config(library.path(), art.path())
        });
        let report = strict.scan(library.path(), PackageFilter::IniOnly);
        assert!(report.songs.is_empty());
        assert_eq!(report.failed.len(), 1);
    }
}
