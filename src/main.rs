use clap::Parser;
use resizecbz::config::{self, Overrides, Resolution, ResizeConfig};
use resizecbz::error_log::ErrorLog;
use resizecbz::imaging::{Rotation, RustBackend};
use resizecbz::{batch, naming, output};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let hash = env!("RESIZECBZ_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup, called exactly once
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "resizecbz")]
#[command(about = "Shrink comic book archives for e-readers and tablets")]
#[command(long_about = "\
Shrink comic book archives for e-readers and tablets

Every page image (jpg, jpeg, png, gif, webp) inside a .cbz or .zip is scaled
down to fit the target screen. Wide pages can be rotated so double-page
spreads fill a portrait display. Other entries are copied unchanged.

  comic.cbz  →  resized/comic.rs.cbz

Settings are read from the first resizecbz.toml found in:
  ./  ~/.config/resizecbz/  ~/.config/  ~/  <executable directory>

Failures are appended to resizecbz.error.log in the working directory.")]
#[command(version = version_string())]
#[command(after_help = "filename can contain wildcards, such as * or ?")]
struct Cli {
    /// Target size: N for both boxes, or WxH (larger value is the portrait box)
    #[arg(short = 'w', long, value_name = "RES")]
    resolution: Option<Resolution>,

    /// Rotation for landscape pages: left, right or none
    #[arg(short, long, value_name = "ROT")]
    rotation: Option<Rotation>,

    /// Output directory (empty string puts outputs next to the inputs)
    #[arg(short, long, value_name = "DIR")]
    directory: Option<String>,

    /// Suffix inserted before the original extension
    #[arg(short, long, value_name = "EXT")]
    extension: Option<String>,

    /// Process files regardless of their extension
    #[arg(short, long = "unsafe")]
    unsafe_mode: bool,

    /// Print a stock resizecbz.toml with all options documented
    #[arg(long)]
    gen_config: bool,

    /// Archives to resize
    filename: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            resolution: self.resolution,
            rotation: self.rotation,
            output_directory: self.directory.clone(),
            resized_file_ext: self.extension.clone(),
            unsafe_mode: self.unsafe_mode,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let home = config::home_dir();
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    let loaded = config::load_config(&config::search_dirs(
        home.as_deref(),
        exe_dir.as_deref(),
    ))?;
    if loaded.source.is_none() {
        offer_sample_config(home.as_deref(), exe_dir.as_deref());
    }

    let file_config = loaded.config.with_overrides(&cli.overrides());
    output::print_config(loaded.source.as_deref(), &file_config);
    let resize_config = ResizeConfig::from_file_config(&file_config)?;

    if cli.filename.is_empty() {
        println!("\nRun resizecbz --help for more information.");
        return Ok(());
    }

    let paths: Vec<PathBuf> = naming::expand_patterns(&cli.filename)?;
    let log = ErrorLog::in_current_dir();

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = batch::run(&RustBackend::new(), &paths, &resize_config, &log, Some(&tx));
    drop(tx);
    printer.join().map_err(|_| "output thread panicked")?;

    let report = result?;
    output::print_summary(&report, log.path());
    Ok(())
}

/// Drop a documented sample next to where the user would keep a config.
/// Failing to write it only costs the hint.
fn offer_sample_config(home: Option<&Path>, exe_dir: Option<&Path>) {
    let Some(dir) = config::sample_dir(home, exe_dir) else {
        return;
    };
    match config::write_sample_config(&dir) {
        Ok((path, created)) => output::print_sample_hint(&path, created),
        Err(e) => eprintln!("Cannot write sample config in {}: {}", dir.display(), e),
    }
}
