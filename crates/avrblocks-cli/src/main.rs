//! AVR Blocks command-line front end.
//!
//! ```text
//! avrblocks generate workspace.json -o main.c
//! avrblocks check workspace.json
//! avrblocks toolbox > toolbox.json
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use avrblocks_compiler::reference::{generate_block_definitions, generate_theme, generate_toolbox};
use avrblocks_compiler::GeneratorConfig;
use avrblocks_types::CompileErrors;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration file picked up from the working directory.
const DEFAULT_CONFIG: &str = "avrblocks.toml";

#[derive(Parser)]
#[command(name = "avrblocks")]
#[command(author, version, about = "AVR Blocks code generator", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate C from a saved workspace
    Generate {
        /// Workspace JSON file, or `-` for stdin
        workspace: PathBuf,

        /// Write the C source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to ./avrblocks.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a workspace without generating code
    Check {
        /// Workspace JSON file, or `-` for stdin
        workspace: PathBuf,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the editor toolbox
    Toolbox {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the editor theme
    Theme {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the block definitions
    Blocks {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            workspace,
            output,
            config,
            json,
        } => generate(&workspace, output.as_deref(), config.as_deref(), json),
        Commands::Check { workspace, json } => check(&workspace, json),
        Commands::Toolbox { output } => write_output(output.as_deref(), &generate_toolbox()),
        Commands::Theme { output } => write_output(output.as_deref(), &generate_theme()),
        Commands::Blocks { output } => {
            write_output(output.as_deref(), &generate_block_definitions())
        }
    }
}

/// `AVRBLOCKS_LOG` wins over `RUST_LOG`; logs go to stderr.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("AVRBLOCKS_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn generate(
    workspace: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let source = read_input(workspace)?;
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let config = resolve_config(config, &cwd)?;
    let result = avrblocks_compiler::compile_to_result_with_config(&source, &config);

    if json {
        let text = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
        return write_output(output, &text);
    }

    eprint!("{}", render_diagnostics(&result.errors));
    match result.code {
        Some(code) if result.success => write_output(output, &code),
        _ => bail!(
            "generation failed with {} error(s)",
            result.errors.total_errors
        ),
    }
}

fn check(workspace: &Path, json: bool) -> Result<()> {
    let source = read_input(workspace)?;
    let errors = avrblocks_compiler::check(&source);

    if json {
        let text = serde_json::to_string_pretty(&errors).context("failed to serialize diagnostics")?;
        println!("{text}");
    } else {
        eprint!("{}", render_diagnostics(&errors));
    }
    if errors.has_errors() {
        bail!("{}: {} error(s)", workspace.display(), errors.total_errors);
    }
    if !json {
        println!("{}: ok", workspace.display());
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read workspace from stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// An explicit path must exist; the default file is optional.
fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<GeneratorConfig> {
    if let Some(path) = explicit {
        return GeneratorConfig::load(path)
            .with_context(|| format!("invalid configuration {}", path.display()));
    }
    let path = cwd.join(DEFAULT_CONFIG);
    if path.is_file() {
        tracing::debug!(path = %path.display(), "using configuration");
        return GeneratorConfig::load(&path)
            .with_context(|| format!("invalid configuration {}", path.display()));
    }
    Ok(GeneratorConfig::default())
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

fn render_diagnostics(errors: &CompileErrors) -> String {
    let mut out = String::new();
    let entries = errors
        .errors
        .iter()
        .map(|e| ("error", e))
        .chain(errors.warnings.iter().map(|w| ("warning", w)));
    for (label, diagnostic) in entries {
        out.push_str(&format!("{label}: {diagnostic}\n"));
        if let Some(suggestion) = &diagnostic.suggestion {
            out.push_str(&format!("  help: {suggestion}\n"));
        }
    }
    out
}
