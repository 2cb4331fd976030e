use clap::Parser;
use song_ini::ParseOptions;
use std::path::PathBuf;

/// Which package kinds a scan resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFilter {
    All,
    ContainersOnly,
    IniOnly,
}

impl PackageFilter {
    pub fn includes_ini(&self) -> bool {
        *self != PackageFilter::ContainersOnly
    }

    pub fn includes_containers(&self) -> bool {
        *self != PackageFilter::IniOnly
    }
}

/// How scan results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    /// One JSON object per record and line
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub library: PathBuf,
    pub filter: PackageFilter,
    pub output: OutputFormat,
    /// Where container album art is written; the system temp dir when unset
    pub art_dir: Option<PathBuf>,
    pub ini_options: ParseOptions,
}

/// Song Scanner - resolve song package metadata in a library
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Root directory of the song library
    pub library: PathBuf,

    /// Print one JSON record per line instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Directory for re-encoded album art
    #[arg(long, value_name = "DIR")]
    pub art_dir: Option<PathBuf>,

    /// Only resolve console container packages (songs.dta)
    #[arg(long, conflicts_with = "ini_only")]
    pub container_only: bool,

    /// Only resolve song.ini packages
    #[arg(long)]
    pub ini_only: bool,

    /// Reject song.ini files that repeat a key within a section
    #[arg(long)]
    pub strict_ini: bool,
}

impl Config {
    pub fn from_args(args: CliArgs) -> Self {
        let filter = if args.container_only {
            PackageFilter::ContainersOnly
        } else if args.ini_only {
            PackageFilter::IniOnly
        } else {
            PackageFilter::All
        };

        let output = if args.json {
            OutputFormat::Json
        } else {
            OutputFormat::Summary
        };

        let ini_options = ParseOptions {
            allow_duplicate_keys: !args.strict_ini,
            ..ParseOptions::SONG_INI
        };

        Self {
            library: args.library,
            filter,
            output,
            art_dir: args.art_dir,
            ini_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["song-scanner", "/library"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_scan_everything_as_summary() {
        let config = Config::from_args(args(&[]));
        assert_eq!(config.library, PathBuf::from("/library"));
        assert_eq!(config.filter, PackageFilter::All);
        assert_eq!(config.output, OutputFormat::Summary);
        assert!(config.art_dir.is_none());
        assert_eq!(config.ini_options, ParseOptions::SONG_INI);
    }

    #[test]
    fn strict_ini_rejects_duplicates() {
        let config = Config::from_args(args(&["--strict-ini"]));
        assert!(!config.ini_options.allow_duplicate_keys);
        assert_eq!(config.ini_options.comment_prefixes, ParseOptions::SONG_INI.comment_prefixes);
    }

    #[test]
    fn json_and_art_dir() {
        let config = Config::from_args(args(&["--json", "--art-dir", "/tmp/art"]));
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.art_dir, Some(PathBuf::from("/tmp/art")));
    }

    #[test]
    fn package_filters() {
        let containers = Config::from_args(args(&["--container-only"]));
        assert_eq!(containers.filter, PackageFilter::ContainersOnly);
        assert!(!containers.filter.includes_ini());
        assert!(containers.filter.includes_containers());

        let ini = Config::from_args(args(&["--ini-only"]));
        assert_eq!(ini.filter, PackageFilter::IniOnly);
        assert!(ini.filter.includes_ini());
        assert!(!ini.filter.includes_containers());
    }

    #[test]
    fn filters_conflict() {
        let result = CliArgs::try_parse_from(["song-scanner", "/library", "--container-only", "--ini-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn library_is_required() {
        assert!(CliArgs::try_parse_from(["song-scanner"]).is_err());
    }
}
