//! mapcheck - load map files and report what the loader sees
//!
//! Prints a summary of every map (or JSON with `--json`) along with the
//! repairs and warnings raised while loading it. Exits non-zero when any
//! map fails to load, or when any map has warnings under `--strict`.

mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use mapdef_config::LoaderConfig;
use mapdef_maps::{LoadContext, MapLoader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use summary::MapSummary;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mapcheck", version, about = "Validate map definition files")]
struct Args {
    /// Loader configuration file (key=value)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print one JSON document per map instead of a text summary
    #[arg(long)]
    json: bool,

    /// With `--json`, dump the whole loaded map rather than a summary
    #[arg(long, requires = "json")]
    full: bool,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,

    /// Map files to load; relative paths are tried against `maps_dir` when
    /// they do not exist as given
    #[arg(required = true)]
    maps: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Load every requested map; `Ok(false)` means at least one map failed
fn run(args: &Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => LoaderConfig::load_from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => LoaderConfig::default(),
    };
    config.display();

    let strict = args.strict || config.strict;
    let context = LoadContext::from_config(&config).context("loading string table")?;
    let loader = MapLoader::new(context);

    let mut passed = true;
    for requested in &args.maps {
        let path = resolve(&config, requested);
        match loader.load_file(&path) {
            Ok(loaded) => {
                let summary = MapSummary::new(&loaded);
                if args.json && args.full {
                    println!("{}", serde_json::to_string_pretty(&loaded.map)?);
                } else if args.json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    summary.print();
                }
                if !summary.passes(strict) {
                    passed = false;
                }
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                passed = false;
            }
        }
    }

    info!(
        "Checked {} map(s): {}",
        args.maps.len(),
        if passed { "ok" } else { "failed" }
    );
    Ok(passed)
}

fn resolve(config: &LoaderConfig, requested: &Path) -> PathBuf {
    if requested.is_relative() && !requested.exists() {
        config.maps_dir.join(requested)
    } else {
        requested.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(maps: Vec<PathBuf>, strict: bool) -> Args {
        Args {
            config: None,
            json: false,
            full: false,
            strict,
            maps,
        }
    }

    #[test]
    fn test_run_reports_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.txt");
        let bad = temp_dir.path().join("bad.txt");
        std::fs::write(&good, "[header]\nwidth=1\nheight=1\n").unwrap();
        std::fs::write(&bad, "[layer]\ntype=background\nformat=hex\n").unwrap();

        assert!(run(&args(vec![good.clone()], false)).unwrap());
        assert!(!run(&args(vec![good, bad], false)).unwrap());
        assert!(!run(&args(vec![temp_dir.path().join("missing.txt")], false)).unwrap());
    }

    #[test]
    fn test_strict_rejects_warnings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("warn.txt");
        std::fs::write(&path, "[header]\nwidth=1\nheight=1\nweather=rain\n").unwrap();

        assert!(run(&args(vec![path.clone()], false)).unwrap());
        assert!(!run(&args(vec![path], true)).unwrap());
    }

    #[test]
    fn test_resolve_against_maps_dir() {
        let config = LoaderConfig {
            maps_dir: PathBuf::from("/data/maps"),
            ..Default::default()
        };
        assert_eq!(
            resolve(&config, Path::new("no_such_map.txt")),
            PathBuf::from("/data/maps/no_such_map.txt")
        );
        assert_eq!(
            resolve(&config, Path::new("/abs/map.txt")),
            PathBuf::from("/abs/map.txt")
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["mapcheck", "--json", "-c", "loader.cfg", "a.txt", "b.txt"])
            .unwrap();
        assert!(args.json);
        assert!(!args.strict);
        assert_eq!(args.config, Some(PathBuf::from("loader.cfg")));
        assert_eq!(args.maps.len(), 2);

        assert!(Args::try_parse_from(["mapcheck"]).is_err());
        assert!(Args::try_parse_from(["mapcheck", "--full", "a.txt"]).is_err());
    }
}
