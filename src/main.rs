use clap::{Parser, Subcommand};
use photo_gal::{catalog, config, generate, output, process};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "photo-gal")]
#[command(about = "Static photo gallery generator that groups photos by capture month")]
#[command(long_about = "\
Static photo gallery generator that groups photos by capture month

Originals are read from images/originals. Each photo is dated from its EXIF
DateTimeOriginal (falling back to the file's modification time) and placed
in exactly one group:

  astro          \"astro\" in the filename, EXIF description, title or comment
  YYYY-MM        the capture month, when the EXIF date is present
  no-timestamp   everything else

Site layout:

  site/
  ├── config.toml                  # Optional overrides (see gen-config)
  ├── index.html                   # Generated: one card per group
  ├── all.html                     # Generated: every photo, newest first
  ├── 2024-03.html                 # Generated: one page per group
  └── images/
      ├── originals/               # Source photos (.jpg .jpeg .png .webp)
      ├── large/<group>/           # Generated, emptied on every build
      └── thumbs/<group>/          # Generated, emptied on every build

Run 'photo-gal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root (holds config.toml, images/ and the generated pages)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Diagnostic log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: catalog → derive images → write HTML
    Build,
    /// Catalog the originals without writing anything
    Scan {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            let paths = site_config.paths.resolve(&cli.root);

            println!("==> Stage 1: Cataloging {}", paths.originals.display());
            let catalog = catalog::build_catalog(&paths.originals)?;
            output::print_scan_output(&catalog);

            println!("==> Stage 2: Deriving images");
            let process_config = process::ProcessConfig::from_site_config(&site_config);
            let report = process::process(&catalog, &paths, &process_config)?;
            output::print_process_output(&report);

            println!("==> Stage 3: Generating HTML → {}", paths.root.display());
            let summary = generate::generate(&catalog, &report, &site_config.site, &paths.root)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", paths.root.display());
        }
        Command::Scan { json } => {
            let site_config = config::load_config(&cli.root)?;
            let paths = site_config.paths.resolve(&cli.root);
            let catalog = catalog::build_catalog(&paths.originals)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                output::print_scan_output(&catalog);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
