use asset_prep::imaging::RustBackend;
use asset_prep::{config, info, logging, output, pipeline, resize, scan};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

#[derive(Parser)]
#[command(name = "asset-prep")]
#[command(about = "Pre-build asset pipeline for static sites")]
#[command(long_about = "\
Pre-build asset pipeline for static sites

Run with no command before the site build. It generates responsive WebP
variants of every image under the public directory, writes a manifest of the
images, and converts the site metadata from YAML to JSON.

Project structure:

  my-site/
  ├── asset-prep.toml        # Optional config (see gen-config)
  ├── content/
  │   └── info.yml           # Site metadata (content.example/ is the fallback)
  └── public/
      ├── photo.png
      ├── sub/shot.jpg
      ├── resized/           # Generated: <profile>/<dir>/<file>.webp
      ├── images.json        # Generated: [\"/photo.png\", \"/sub/shot.jpg\"]
      └── info.json          # Generated from info.yml

Existing variants are never regenerated. Delete them to force a refresh.

Run 'asset-prep gen-config' to print a documented asset-prep.toml.")]
#[command(version)]
struct Cli {
    /// Project root containing the public and content directories
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/asset-prep.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (RUST_LOG overrides)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan → resize → images.json → info.json (default)
    Build,
    /// Scan the public directory and write images.json
    Scan,
    /// Generate missing WebP variants
    Resize,
    /// Convert info.yml to info.json
    Info,
    /// Show what a build would do without writing anything
    Check,
    /// Print a stock asset-prep.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let command = cli.command.unwrap_or(Command::Build);
    if let Command::GenConfig = command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&cli.root)?,
    };
    let layout = pipeline::Layout::new(&cli.root, &site_config);

    match command {
        Command::Build => {
            println!("==> Building assets in {}", layout.asset_root.display());
            init_thread_pool(&site_config.processing);
            let (tx, printer) = spawn_printer();
            let result = pipeline::run(&cli.root, &site_config, &RustBackend::new(), Some(tx));
            join_printer(printer)?;
            let report = result?;

            println!("Variants: {}", report.resize.stats);
            println!(
                "{}",
                output::format_written(
                    &format!("Manifest ({} images)", report.manifest.len()),
                    &report.layout.manifest_path,
                    &cli.root
                )
            );
            println!(
                "{}",
                output::format_written("Info", &report.info.output, &cli.root)
            );
            println!("==> Build complete");
        }
        Command::Scan => {
            let scanned = scan::scan(&layout.asset_root, &site_config)?;
            let manifest = scanned.manifest();
            manifest.write(&layout.manifest_path)?;
            output::print_scan_output(&manifest);
            println!(
                "{}",
                output::format_written("Manifest", &layout.manifest_path, &cli.root)
            );
        }
        Command::Resize => {
            let scanned = scan::scan(&layout.asset_root, &site_config)?;
            init_thread_pool(&site_config.processing);
            let (tx, printer) = spawn_printer();
            let result = resize::resize(
                &RustBackend::new(),
                &scanned.images,
                &layout.output_root,
                &site_config,
                Some(tx),
            );
            join_printer(printer)?;
            println!("Variants: {}", result?.stats);
        }
        Command::Info => {
            let written = info::write_info(&cli.root, &site_config.content, &layout.info_output)?;
            println!(
                "{}",
                output::format_written(
                    &format!("Info ({})", display_source(&written.source, &cli.root)),
                    &written.output,
                    &cli.root
                )
            );
        }
        Command::Check => {
            println!("==> Checking {}", layout.asset_root.display());
            let scanned = scan::scan(&layout.asset_root, &site_config)?;
            output::print_scan_output(&scanned.manifest());
            let planned = resize::plan(
                &scanned.images,
                &layout.output_root,
                &site_config.images.sizes,
            );
            output::print_plan_output(&planned, &layout.output_root);
            let content_root = info::resolve_content_root(&cli.root, &site_config.content)?;
            let info_path = content_root.join(&site_config.content.info_file);
            info::read_info(&info_path)?;
            println!("Info: {} is valid", display_source(&info_path, &cli.root));
            println!(
                "Quality: {}, workers: {}",
                site_config.images.quality,
                config::effective_threads(&site_config.processing)
            );
        }
        // printed before config loading
        Command::GenConfig => {}
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can lower it, never raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Print resize progress from a dedicated thread while workers encode.
fn spawn_printer() -> (Sender<resize::ResizeEvent>, JoinHandle<()>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_resize_event(&event) {
                println!("{}", line);
            }
        }
    });
    (tx, printer)
}

fn join_printer(printer: JoinHandle<()>) -> Result<(), Box<dyn std::error::Error>> {
    printer.join().map_err(|_| "progress printer thread panicked")?;
    Ok(())
}

fn display_source(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
