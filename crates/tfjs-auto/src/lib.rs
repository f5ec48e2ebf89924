//! # tfjs-auto
//!
//! Probe for — and, when absent, install — the Python tooling that
//! `keras2tfjs` delegates model conversion to, so that users no longer need
//! to hand-install `tensorflowjs` and `tensorflow` before their first export.
//!
//! ## How it works
//!
//! On a call to [`Resolver::ensure`] (or [`Resolver::ensure_all`]):
//!
//! 1. Probes the capability: runs `tensorflowjs_converter --version` for the
//!    converter, or imports `tensorflow` through the configured Python
//!    interpreter for the framework.
//! 2. If the probe fails, tries the install backends in order: first
//!    `pip` (`<python> -m pip install <pkg> --user`), then
//!    `conda` (`conda install -c conda-forge <pkg> -y`).
//! 3. After a backend reports success, re-probes to confirm the capability
//!    really resolves, and captures its version string.
//!
//! When every backend fails, the returned [`DepError`] spells out the exact
//! commands an operator should run manually.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tfjs_auto::Resolver;
//!
//! let resolver = Resolver::new();
//! for resolved in resolver.ensure_all().expect("tooling unavailable") {
//!     println!("{} ready (version: {:?})", resolved.capability, resolved.version);
//! }
//! ```
//!
//! ## Environment variable overrides
//!
//! - `KERAS2TFJS_PYTHON` — Python interpreter used for probing and pip
//!   installs; defaults to `python3`.

use std::fmt;
use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info, warn};

// ── Public constants ─────────────────────────────────────────────────────────

/// Package name of the conversion library.
pub const TFJS_PACKAGE: &str = "tensorflowjs";

/// Package name of the model-framework library.
pub const FRAMEWORK_PACKAGE: &str = "tensorflow";

/// Command installed by the `tensorflowjs` package.
pub const CONVERTER_COMMAND: &str = "tensorflowjs_converter";

/// Interpreter used when `KERAS2TFJS_PYTHON` is not set.
pub const DEFAULT_PYTHON: &str = "python3";

// ── Capabilities ─────────────────────────────────────────────────────────────

/// One of the two external libraries conversion depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The `tensorflowjs` conversion library (ships `tensorflowjs_converter`).
    Converter,
    /// The `tensorflow` model-framework library (deserialises the artifact).
    Framework,
}

impl Capability {
    /// Both capabilities, in the order they are resolved.
    pub const ALL: [Capability; 2] = [Capability::Converter, Capability::Framework];

    /// The installable package name.
    pub fn package(&self) -> &'static str {
        match self {
            Capability::Converter => TFJS_PACKAGE,
            Capability::Framework => FRAMEWORK_PACKAGE,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.package())
    }
}

/// Result of a capability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The capability resolves; `version` is reported when the tool prints one.
    Available { version: Option<String> },
    /// The capability does not resolve.
    Missing { reason: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available { .. })
    }
}

/// A capability confirmed present, with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCapability {
    pub capability: Capability,
    /// Version string reported by the tool, when available.
    pub version: Option<String>,
    /// `None` when the capability was already installed.
    pub installed_via: Option<InstallBackend>,
}

// ── Install backends ─────────────────────────────────────────────────────────

/// An external package-manager backend, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallBackend {
    /// Primary: `<python> -m pip install <pkg> --user`.
    Pip,
    /// Secondary: `conda install -c conda-forge <pkg> -y`.
    Conda,
}

impl InstallBackend {
    /// Default backend order.
    pub const DEFAULT_ORDER: [InstallBackend; 2] = [InstallBackend::Pip, InstallBackend::Conda];

    /// Program and argument list for installing `package`.
    pub fn invocation(&self, python: &str, package: &str) -> (String, Vec<String>) {
        match self {
            InstallBackend::Pip => (
                python.to_string(),
                vec![
                    "-m".into(),
                    "pip".into(),
                    "install".into(),
                    package.into(),
                    "--user".into(),
                ],
            ),
            InstallBackend::Conda => (
                "conda".into(),
                vec![
                    "install".into(),
                    "-c".into(),
                    "conda-forge".into(),
                    package.into(),
                    "-y".into(),
                ],
            ),
        }
    }

    /// The command line an operator would type to run this backend by hand.
    pub fn manual_command(&self, python: &str, package: &str) -> String {
        let (program, args) = self.invocation(python, package);
        let mut line = program;
        for arg in args {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

impl fmt::Display for InstallBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallBackend::Pip => f.write_str("pip"),
            InstallBackend::Conda => f.write_str("conda"),
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by tfjs-auto operations.
#[derive(Error, Debug)]
pub enum DepError {
    /// The capability was missing and no install backend could provide it.
    ///
    /// The remediation block names both required packages: an operator
    /// fixing one by hand should install the full set in one go.
    #[error(
        "Could not provide '{package}':\n{detail}\n\
MANUAL INSTALLATION — open a new terminal and run one of:\n\
  1. {python} -m pip install tensorflowjs tensorflow --user\n\
  2. conda install -c conda-forge tensorflowjs tensorflow -y\n\
then re-run this command."
    )]
    AllBackendsFailed {
        package: String,
        python: String,
        /// One line per failed attempt, pre-rendered for display.
        detail: String,
    },
}

impl DepError {
    /// The package this error is about.
    pub fn package(&self) -> &str {
        match self {
            DepError::AllBackendsFailed { package, .. } => package,
        }
    }
}

// ── Command execution seam ───────────────────────────────────────────────────

/// Captured outcome of one external process invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands. The production implementation spawns real
/// processes; tests script outcomes instead, so probe and install paths can
/// be exercised without pip, conda, or Python on the machine.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        debug!("spawning: {} {}", program, args.join(" "));
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────────

/// Probes capabilities and acquires missing ones through the configured
/// install backends, in order, until one succeeds or all are exhausted.
pub struct Resolver {
    python: String,
    backends: Vec<InstallBackend>,
    runner: Box<dyn CommandRunner>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Resolver with the default backend order and the system process runner.
    ///
    /// Honours the `KERAS2TFJS_PYTHON` environment variable.
    pub fn new() -> Self {
        let python =
            std::env::var("KERAS2TFJS_PYTHON").unwrap_or_else(|_| DEFAULT_PYTHON.to_string());
        Self::with_runner(python, InstallBackend::DEFAULT_ORDER.to_vec(), Box::new(SystemRunner))
    }

    /// Fully explicit constructor; the injection point for tests.
    pub fn with_runner(
        python: impl Into<String>,
        backends: Vec<InstallBackend>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            python: python.into(),
            backends,
            runner,
        }
    }

    /// The Python interpreter used for probes and pip installs.
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Probe a single capability without attempting installation.
    pub fn probe(&self, capability: Capability) -> Availability {
        let (program, args): (String, Vec<String>) = match capability {
            Capability::Converter => (CONVERTER_COMMAND.into(), vec!["--version".into()]),
            Capability::Framework => (
                self.python.clone(),
                vec![
                    "-c".into(),
                    "import tensorflow as tf; print(tf.__version__)".into(),
                ],
            ),
        };

        match self.runner.run(&program, &args) {
            Ok(out) if out.success => {
                let version = first_line(&out.stdout);
                debug!("probe {}: available (version: {:?})", capability, version);
                Availability::Available { version }
            }
            Ok(out) => Availability::Missing {
                reason: first_line(&out.stderr)
                    .unwrap_or_else(|| format!("'{program}' exited with an error")),
            },
            Err(e) => Availability::Missing {
                reason: format!("failed to run '{program}': {e}"),
            },
        }
    }

    /// Ensure a capability is present, installing it on demand.
    ///
    /// Already-available capabilities return immediately. Otherwise each
    /// backend is tried once, in order; after a backend reports success the
    /// capability is re-probed to confirm. No further retries.
    pub fn ensure(&self, capability: Capability) -> Result<ResolvedCapability, DepError> {
        if let Availability::Available { version } = self.probe(capability) {
            info!("{} already installed", capability);
            return Ok(ResolvedCapability {
                capability,
                version,
                installed_via: None,
            });
        }

        info!("{} not found, attempting installation", capability);
        let mut attempts: Vec<String> = Vec::new();

        for &backend in &self.backends {
            match self.install(backend, capability) {
                Ok(()) => match self.probe(capability) {
                    Availability::Available { version } => {
                        info!("{} installed via {}", capability, backend);
                        return Ok(ResolvedCapability {
                            capability,
                            version,
                            installed_via: Some(backend),
                        });
                    }
                    Availability::Missing { reason } => {
                        warn!(
                            "{} install via {} reported success but probe still fails: {}",
                            capability, backend, reason
                        );
                        attempts.push(format!(
                            "  • {backend}: install succeeded but '{capability}' still unavailable ({reason})"
                        ));
                    }
                },
                Err(reason) => {
                    warn!("{} install via {} failed: {}", capability, backend, reason);
                    attempts.push(format!("  • {backend}: {reason}"));
                }
            }
        }

        Err(DepError::AllBackendsFailed {
            package: capability.package().to_string(),
            python: self.python.clone(),
            detail: attempts.join("\n"),
        })
    }

    /// Ensure every capability in [`Capability::ALL`], stopping at the first
    /// unrecoverable failure.
    pub fn ensure_all(&self) -> Result<Vec<ResolvedCapability>, DepError> {
        Capability::ALL
            .iter()
            .map(|&cap| self.ensure(cap))
            .collect()
    }

    /// Run one install backend for one capability's package.
    fn install(&self, backend: InstallBackend, capability: Capability) -> Result<(), String> {
        let (program, args) = backend.invocation(&self.python, capability.package());
        match self.runner.run(&program, &args) {
            Ok(out) if out.success => Ok(()),
            Ok(out) => Err(first_line(&out.stderr)
                .unwrap_or_else(|| format!("'{program}' exited with an error"))),
            Err(e) => Err(format!("failed to run '{program}': {e}")),
        }
    }
}

/// First non-empty trimmed line of a command's output, if any.
fn first_line(s: &str) -> Option<String> {
    s.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
