use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use facegen_panel::RenderMode;
use tracing_subscriber::EnvFilter;

mod error;
mod render;

use error::ErrorCode;

#[derive(Parser)]
#[command(name = "facegen", version, about = "Eurorack faceplate generator and build driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a panel description to a faceplate SVG
    Render {
        /// Panel description file (YAML)
        #[arg(value_name = "PANEL")]
        input: PathBuf,

        /// Path to the SVG file to output
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Which features should be included in the image
        #[arg(long, value_enum, default_value = "stencil")]
        mode: Mode,

        /// Add a cuttable outline past the panel edge
        #[arg(long)]
        outline: bool,
    },
    /// Rebuild fabrication artifacts for modules that changed
    Build {
        /// Build manifest (YAML)
        #[arg(value_name = "MANIFEST", default_value = "build.yaml")]
        manifest: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Stencil,
    Display,
    Debug,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Stencil => RenderMode::Stencil,
            Mode::Display => RenderMode::Display,
            Mode::Debug => RenderMode::Debug,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => ErrorCode::Usage as i32,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Render {
            input,
            output,
            mode,
            outline,
        } => render::run_render(input, output, mode.into(), outline),
        Command::Build { manifest } => render::run_build(manifest),
    };

    if let Err(e) = result {
        eprintln!("⛔ {e}");
        std::process::exit(e.code as i32);
    }
}
