//! CLI binary for keras2tfjs.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExportConfig`, renders stage banners, and prints the final report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use keras2tfjs::{
    export_with, ExportConfig, ExportError, ExportObserver, ExportStage, OutputManifest,
    TfjsCliConverter,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tfjs_auto::{InstallBackend, Resolver, SystemRunner};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI observer: stage banners + conversion spinner ─────────────────────────

/// Terminal observer: numbered stage banners, dependency and model lines,
/// a spinner while the opaque conversion call runs, and the interactive
/// pause when the models directory had to be created.
struct CliObserver {
    /// Spinner shown during the conversion stage; None outside it.
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliObserver {
    fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn finish_spinner(&self) {
        if let Some(bar) = self.spinner.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl ExportObserver for CliObserver {
    fn on_stage_start(&self, stage: ExportStage) {
        let step = match stage {
            ExportStage::Prepare => 1,
            ExportStage::Dependencies => 2,
            ExportStage::Convert => 3,
        };
        eprintln!();
        eprintln!("{} {}", cyan("◆"), bold(&format!("STEP {step}: {}…", stage.label())));

        if stage == ExportStage::Convert {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_message("Running tensorflowjs_converter…");
            bar.enable_steady_tick(Duration::from_millis(80));
            *self.spinner.lock().unwrap() = Some(bar);
        }
    }

    fn on_models_dir_created(&self, dir: &Path) {
        eprintln!("  {} Created '{}' folder", green("✓"), dir.display());
        eprintln!(
            "  {} Copy your model file into '{}/'",
            cyan("⚠"),
            dir.display()
        );
    }

    fn await_model_placement(&self, _dir: &Path) {
        eprint!("  Press Enter after copying the file… ");
        io::stderr().flush().ok();
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok();
    }

    fn on_model_found(&self, path: &Path, size_bytes: u64) {
        let mib = size_bytes as f64 / (1024.0 * 1024.0);
        eprintln!("  {} Model file found: {}", green("✓"), path.display());
        eprintln!("  {}", dim(&format!("File size: {mib:.2} MB")));
    }

    fn on_dependency_ready(&self, package: &str, version: Option<&str>, installed: bool) {
        let how = if installed { "installed" } else { "already installed" };
        match version {
            Some(v) => eprintln!("  {} {package} {how} ({v})", green("✓")),
            None => eprintln!("  {} {package} {how}", green("✓")),
        }
    }

    fn on_conversion_done(&self, _manifest: &OutputManifest) {
        self.finish_spinner();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Export with the default layout (models/model.keras → public/model_tfjs)
  keras2tfjs

  # Explicit paths
  keras2tfjs models/classifier.keras -o dist/model_tfjs

  # CI: never block on stdin, tooling provisioned out-of-band
  keras2tfjs --non-interactive --skip-deps

  # Machine-readable report
  keras2tfjs --json > report.json

ENVIRONMENT VARIABLES:
  KERAS2TFJS_PYTHON      Python interpreter for probing and pip installs (default: python3)
  KERAS2TFJS_OUTPUT      Default output directory
  KERAS2TFJS_CONVERTER   tensorflowjs_converter command or path

SETUP:
  The tensorflowjs and tensorflow packages are installed automatically on
  first run (pip, falling back to conda). If both backends fail, the exact
  manual commands are printed.

  The exported model is consumed from JavaScript with:
    npm install @tensorflow/tfjs
  and loaded from <output>/model.json.
"#;

/// Export a Keras model artifact to the TensorFlow.js layers format.
#[derive(Parser, Debug)]
#[command(
    name = "keras2tfjs",
    version,
    about = "Export Keras model artifacts to the TensorFlow.js layers format",
    long_about = "Export a serialized Keras model to the TensorFlow.js layers format.\n\
The conversion is delegated to the tensorflowjs_converter tool; this command owns the \
bootstrap around it: precondition checks, probe-and-install of the Python tooling \
(pip, then conda), and a report of the produced files.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the Keras model artifact.
    #[arg(default_value = keras2tfjs::DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Directory the converter writes into.
    #[arg(short, long, env = "KERAS2TFJS_OUTPUT", default_value = keras2tfjs::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Never pause for operator input; fail immediately when the model
    /// file is missing.
    #[arg(long, env = "KERAS2TFJS_NON_INTERACTIVE")]
    non_interactive: bool,

    /// Skip the dependency probe-and-install stage.
    #[arg(long, env = "KERAS2TFJS_SKIP_DEPS")]
    skip_deps: bool,

    /// Python interpreter for probing and pip installs.
    #[arg(long, env = "KERAS2TFJS_PYTHON", default_value = tfjs_auto::DEFAULT_PYTHON)]
    python: String,

    /// tensorflowjs_converter command or path.
    #[arg(long, env = "KERAS2TFJS_CONVERTER", default_value = tfjs_auto::CONVERTER_COMMAND)]
    converter: String,

    /// Output a structured JSON report instead of the banner summary.
    #[arg(long, env = "KERAS2TFJS_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "KERAS2TFJS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "KERAS2TFJS_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The banners carry the operator-facing story; library logs stay at
    // error level unless explicitly asked for.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let show_banners = !cli.quiet && !cli.json;
    if show_banners {
        eprintln!("{}", dim(&"═".repeat(50)));
        eprintln!("{}", bold("TENSORFLOW.JS MODEL EXPORT"));
        eprintln!("{}", dim(&"═".repeat(50)));
    }

    let config = ExportConfig::builder()
        .model_path(&cli.model)
        .output_dir(&cli.output)
        .interactive(!cli.non_interactive && !cli.json)
        .skip_dependency_check(cli.skip_deps)
        .python(cli.python.clone())
        .build();

    let resolver = Resolver::with_runner(
        cli.python.clone(),
        InstallBackend::DEFAULT_ORDER.to_vec(),
        Box::new(SystemRunner),
    );
    let converter = TfjsCliConverter::new(&cli.converter);

    let cli_observer = CliObserver::new();
    let noop = keras2tfjs::NoopObserver;
    let observer: &dyn ExportObserver = if show_banners { &cli_observer } else { &noop };

    match export_with(&config, &resolver, &converter, observer) {
        Ok(output) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).context("Failed to serialise report")?
                );
            } else if !cli.quiet {
                eprintln!();
                eprintln!("{}", dim(&"═".repeat(50)));
                eprintln!("{} {}", green("✔"), bold("EXPORT SUCCESSFUL"));
                eprintln!("{}", dim(&"═".repeat(50)));
                eprintln!();
                eprintln!("Output directory: {}/", cli.output.display());
                eprintln!("Generated files:");
                for file in &output.manifest.files {
                    eprintln!(
                        "   • {} {}",
                        file.name,
                        dim(&format!("({:.1} KB)", file.size_kib()))
                    );
                }
                eprintln!();
                eprintln!("{}", bold("NEXT STEPS:"));
                eprintln!("  1. Install the runtime: npm install @tensorflow/tfjs");
                eprintln!(
                    "  2. Load the model from: {}/model.json",
                    cli.output.display()
                );
                eprintln!(
                    "{}",
                    dim(&format!("Done in {}ms", output.stats.total_duration_ms))
                );
            }
            Ok(())
        }
        Err(err) => {
            cli_observer.finish_spinner();
            eprintln!();
            eprintln!("{} {}", red("✘"), bold("EXPORT FAILED"));
            eprintln!("{err}");
            // The collaborator's trace is part of the contract: print it in
            // full rather than losing it inside the one-line message.
            if let ExportError::Conversion(failure) = &err {
                if !failure.trace.is_empty() {
                    eprintln!();
                    eprintln!("{}", dim("── converter diagnostics ──"));
                    eprintln!("{}", failure.trace.trim_end());
                }
            }
            std::process::exit(1);
        }
    }
}
