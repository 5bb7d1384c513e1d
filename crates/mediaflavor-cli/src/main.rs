//! mediaflavor - identify installation-media release flavors
//!
//! ## Commands
//!
//! - `resolve`: match media files against a release's flavors
//! - `releases`: list catalogued releases and their flavors
//! - `hash`: print the SHA-256 of files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

use mediaflavor_core::{
    discover_paths, load_catalog, sha256_file, write_match_json, FlavorMatch, MatchArtifact,
    ReleaseCatalog, Resolver,
};

#[derive(Parser)]
#[command(name = "mediaflavor")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Identify which release flavor a set of installation media represents", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve media files to a catalogued flavor of one release
    Resolve {
        /// Release catalog file (YAML, or JSON by extension)
        #[arg(short, long, env = "MEDIAFLAVOR_CATALOG")]
        catalog: PathBuf,

        /// Release identifier to resolve against
        #[arg(short, long)]
        release: String,

        /// Verify checksums even when sizes are unambiguous
        #[arg(long)]
        checksum: bool,

        /// Write the match as a JSON side-file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Media files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List releases, their flavors in priority order, and expected media
    Releases {
        /// Release catalog file (YAML, or JSON by extension)
        #[arg(short, long, env = "MEDIAFLAVOR_CATALOG")]
        catalog: PathBuf,
    },

    /// Print the SHA-256 of each file
    Hash {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    mediaflavor_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Resolve {
            catalog,
            release,
            checksum,
            output,
            paths,
        } => cmd_resolve(&catalog, &release, checksum, output.as_deref(), &paths).await,
        Commands::Releases { catalog } => cmd_releases(&catalog),
        Commands::Hash { files } => cmd_hash(&files),
    }
}

fn read_catalog(path: &Path) -> Result<ReleaseCatalog> {
    load_catalog(path).with_context(|| format!("Failed to load catalog {:?}", path))
}

async fn cmd_resolve(
    catalog_path: &Path,
    release: &str,
    force_checksum: bool,
    output: Option<&Path>,
    inputs: &[PathBuf],
) -> Result<()> {
    let catalog = read_catalog(catalog_path)?;
    let paths = discover_paths(inputs).context("Failed to discover media files")?;
    info!(files = paths.len(), release = %release, "resolving");

    let resolver = Resolver::new();
    let cancel = resolver.cancel_token().clone();
    let mut worker = {
        let release = release.to_string();
        tokio::task::spawn_blocking(move || {
            resolver.resolve(&paths, &release, &catalog, force_checksum)
        })
    };

    let resolved = tokio::select! {
        joined = &mut worker => joined,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupt received, cancelling checksum computation");
            cancel.cancel();
            worker.await
        }
    };
    let flavor_match = resolved.context("Resolution worker failed")??;

    print_match(release, &flavor_match);

    if let Some(output) = output {
        let artifact = MatchArtifact::from_match(release, &flavor_match);
        write_match_json(output, &artifact)?;
        println!("Wrote {}", output.display());
    }

    Ok(())
}

fn print_match(release: &str, flavor_match: &FlavorMatch) {
    println!("Release:      {}", release);
    println!("Flavor:       {}", flavor_match.flavor.name);
    println!("Verification: {:?}", flavor_match.verification);

    if flavor_match.matched_media.is_empty() {
        println!("Media:        (none confirmed)");
        return;
    }

    println!("Media:");
    for assignment in flavor_match.assignments() {
        let role = assignment
            .expected
            .map(|e| e.name.as_str())
            .unwrap_or("(ambiguous)");
        println!(
            "  {}  ->  {}  ({} bytes)",
            assignment.candidate.path.display(),
            role,
            assignment.candidate.size
        );
    }
}

fn cmd_releases(catalog_path: &Path) -> Result<()> {
    let catalog = read_catalog(catalog_path)?;

    for (release, target) in catalog.iter() {
        println!("{}", release);
        for (priority, flavor) in target.flavors().iter().enumerate() {
            println!("  {}. {}", priority + 1, flavor.name);
            for media in &flavor.media {
                println!("       {}  {}  {}", media.name, media.size, media.checksum);
            }
        }
    }

    Ok(())
}

fn cmd_hash(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let checksum = sha256_file(file).with_context(|| format!("Failed to hash {:?}", file))?;
        println!("{}  {}", checksum, file.display());
    }
    Ok(())
}
