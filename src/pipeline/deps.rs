//! Dependency resolution stage: a thin wrapper over [`tfjs_auto::Resolver`].
//!
//! The resolver does the probing and staged installation; this stage maps
//! its results into observer events and the run report, and honours the
//! `skip_dependency_check` configuration.

use tracing::info;

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::observer::ExportObserver;
use crate::output::DependencyVersion;
use tfjs_auto::Resolver;

/// Ensure both external libraries resolve, installing them on demand.
///
/// Returns one [`DependencyVersion`] per capability, in resolution order.
/// With `skip_dependency_check` set the stage is a no-op and returns an
/// empty list.
pub fn resolve_dependencies(
    config: &ExportConfig,
    resolver: &Resolver,
    observer: &dyn ExportObserver,
) -> Result<Vec<DependencyVersion>, ExportError> {
    if config.skip_dependency_check {
        info!("dependency check skipped by configuration");
        return Ok(Vec::new());
    }

    let resolved = resolver.ensure_all()?;
    let versions = resolved
        .into_iter()
        .map(|r| {
            observer.on_dependency_ready(
                r.capability.package(),
                r.version.as_deref(),
                r.installed_via.is_some(),
            );
            DependencyVersion {
                package: r.capability.package().to_string(),
                version: r.version,
            }
        })
        .collect();
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use std::io;
    use tfjs_auto::{CommandOutput, CommandRunner, InstallBackend};

    /// Answers every invocation the same way.
    struct Uniform(CommandOutput);

    impl CommandRunner for Uniform {
        fn run(&self, _program: &str, _args: &[String]) -> io::Result<CommandOutput> {
            Ok(self.0.clone())
        }
    }

    fn config(skip: bool) -> ExportConfig {
        ExportConfig::builder()
            .interactive(false)
            .skip_dependency_check(skip)
            .build()
    }

    #[test]
    fn skip_flag_short_circuits_without_probing() {
        struct Exploding;
        impl CommandRunner for Exploding {
            fn run(&self, _p: &str, _a: &[String]) -> io::Result<CommandOutput> {
                panic!("must not probe when skipped");
            }
        }
        let resolver = Resolver::with_runner(
            "python3",
            InstallBackend::DEFAULT_ORDER.to_vec(),
            Box::new(Exploding),
        );
        let versions = resolve_dependencies(&config(true), &resolver, &NoopObserver).unwrap();
        assert!(versions.is_empty());
    }

    #[test]
    fn reports_both_packages_when_available() {
        let resolver = Resolver::with_runner(
            "python3",
            InstallBackend::DEFAULT_ORDER.to_vec(),
            Box::new(Uniform(CommandOutput {
                success: true,
                stdout: "4.17.0".into(),
                stderr: String::new(),
            })),
        );
        let versions = resolve_dependencies(&config(false), &resolver, &NoopObserver).unwrap();
        let packages: Vec<&str> = versions.iter().map(|v| v.package.as_str()).collect();
        assert_eq!(packages, vec!["tensorflowjs", "tensorflow"]);
        assert_eq!(versions[0].version.as_deref(), Some("4.17.0"));
    }

    #[test]
    fn unresolvable_dependency_maps_into_export_error() {
        let resolver = Resolver::with_runner(
            "python3",
            InstallBackend::DEFAULT_ORDER.to_vec(),
            Box::new(Uniform(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: "boom".into(),
            })),
        );
        let err = resolve_dependencies(&config(false), &resolver, &NoopObserver).unwrap_err();
        assert!(matches!(err, ExportError::Dependency(_)));
    }
}
