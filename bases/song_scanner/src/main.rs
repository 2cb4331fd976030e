mod config;
mod scan;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use config::{CliArgs, Config, OutputFormat};
use scan::{ScanReport, Scanner};
use song_primitives::{Part, SongInfo};

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "song_scanner=info,song_ini=info,rb_container=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(CliArgs::parse());

    if !config.library.is_dir() {
        return Err(eyre!(
            "Library path is not a directory: {}",
            config.library.display()
        ));
    }
    if let Some(dir) = &config.art_dir {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Failed to create art directory {}", dir.display()))?;
    }

    let report = Scanner::new(&config).scan(&config.library, config.filter);

    match config.output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Summary => print_summary(&report),
    }

    Ok(())
}

fn print_json(report: &ScanReport) -> Result<()> {
    for song in &report.songs {
        println!("{}", serde_json::to_string(song)?);
    }
    Ok(())
}

fn print_summary(report: &ScanReport) {
    for song in &report.songs {
        print_song(song);
    }

    println!("\n{}", "=".repeat(60));
    println!("SCAN COMPLETE");
    println!("{}", "=".repeat(60));
    println!("  song.ini packages:      {}", report.ini_packages);
    println!("  Container packages:     {}", report.container_packages);
    println!("  Songs resolved:         {}", report.songs.len());
    println!("  Songs with album art:   {}", report.with_album_art());
    println!(
        "  Total length:           {:.1} hours",
        report.total_length_seconds() / 3600.0
    );
    println!("  Failed packages:        {}", report.failed.len());

    if !report.failed.is_empty() {
        println!("\nFailed packages:");
        for (folder, reason) in &report.failed {
            println!("  {} - {}", folder.display(), reason);
        }
    }
}

fn print_song(song: &SongInfo) {
    println!("\n{}", song.display_name());
    println!("  Folder:     {}", song.folder().display());
    if let Some(album) = &song.album {
        println!("  Album:      {}", album);
    }
    if let Some(charter) = &song.charter {
        println!("  Charter:    {}", charter);
    }
    println!("  Source:     {}", song.source());
    println!("  Length:     {}", song.format_length());

    let charted: Vec<String> = Part::ALL
        .into_iter()
        .filter_map(|part| {
            let tier = song.part_difficulties.get(part)?;
            song.part_difficulties
                .is_charted(part)
                .then(|| format!("{}={}", part, tier))
        })
        .collect();
    if !charted.is_empty() {
        println!("  Parts:      {}", charted.join(" "));
    }
    if let Some(art) = &song.album_art {
        println!("  Album art:  {}", art.display());
    }
}
