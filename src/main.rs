use clap::{Parser, Subcommand};
use photoframe_scale::process::ProcessOptions;
use photoframe_scale::{cache, config, output, process, scan};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photoframe-scale")]
#[command(about = "Resize and caption photo folders for a digital picture frame")]
#[command(long_about = "\
Resize and caption photo folders for a digital picture frame

Every directory starting with the topic prefix is converted into a sibling
directory without it. Images are turned upright, scaled to fit the frame
and captioned with the directory name.

Working directory structure:

  photos/
  ├── config.toml          # Settings (optional)
  ├── fonts/LHANDW.TTF     # Caption font
  ├── _Berlin/             # Topic: source photos
  │   ├── IMG_0001.jpg
  │   └── IMG_0002.jpg
  ├── Berlin/              # Target: written by 'convert'
  └── archive/             # No prefix: ignored

Images whose target is newer than the source are skipped.

Run 'photoframe-scale gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Working directory holding the topic directories
    #[arg(short = 'C', long, default_value = ".", global = true)]
    work_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert all stale images (default)
    Convert {
        /// Convert every image, ignoring timestamps
        #[arg(long)]
        force: bool,
        /// Report what would be converted without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List topics and pending work without converting
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Command::Convert {
        force: false,
        dry_run: false,
    });

    match command {
        Command::Convert { force, dry_run } => {
            let settings = config::load_settings(&cli.work_dir)?;
            let options = ProcessOptions { force, dry_run };
            let result = process::process(
                &cli.work_dir,
                &settings,
                options,
                output::print_process_event,
            )?;
            if result.topics.is_empty() {
                println!("No topic directories in {}", cli.work_dir.display());
            } else {
                println!();
                println!("{}", result.stats);
            }
        }
        Command::Check => {
            let settings = config::load_settings(&cli.work_dir)?;
            println!("==> Checking {}", cli.work_dir.display());
            let topics = scan::scan(&cli.work_dir, &settings)?;
            output::print_scan_output(&topics, &cli.work_dir, |topic, image| {
                cache::check(image, &topic.target_for(image)).ok()
            });
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
