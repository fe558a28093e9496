//! Transformer abstraction for bytecode rewriting.
//!
//! The [`Transformer`] trait decouples the pipeline from whatever actually
//! rewrites class files. A transformer reads the artifact at `source` and
//! materializes the rewritten class at `destination`; it never touches
//! `source`. Tests use in-process transformers that never spawn processes.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::error::{EnhanceError, EnhanceResult, IoResultExt};
use crate::io::config::TransformerConfig;
use crate::io::process::run_command;

/// Rewrites one class file into a separate destination path.
pub trait Transformer {
    fn transform(&self, source: &Path, destination: &Path) -> EnhanceResult<()>;
}

/// Transformer backed by an in-process `bytes -> bytes` function.
pub struct BytesTransformer<F> {
    rewrite: F,
}

impl<F> BytesTransformer<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    pub fn new(rewrite: F) -> Self {
        Self { rewrite }
    }
}

impl<F> Transformer for BytesTransformer<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    fn transform(&self, source: &Path, destination: &Path) -> EnhanceResult<()> {
        let input = fs::read(source).io_context("read class file", source)?;
        let output = (self.rewrite)(&input)
            .map_err(|err| EnhanceError::transformation(source, format!("{err:#}")))?;
        fs::write(destination, output).io_context("write rewritten class file", destination)
    }
}

/// Copies bytes unchanged. Useful for exercising the file choreography.
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&self, source: &Path, destination: &Path) -> EnhanceResult<()> {
        fs::copy(source, destination).io_context("copy class file", destination)?;
        Ok(())
    }
}

/// Transformer that spawns an external rewrite command per artifact.
///
/// The classpath is fixed at construction and scoped to this value; it is
/// exported to the child as `CLASSPATH` and substituted for `{classpath}`.
#[derive(Debug, Clone)]
pub struct CommandTransformer {
    program: String,
    args: Vec<String>,
    classpath: Option<OsString>,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
}

impl CommandTransformer {
    /// Build from config, resolving classpath entries against `root`.
    pub fn from_config(root: &Path, cfg: &TransformerConfig) -> EnhanceResult<Self> {
        let (program, args) = cfg
            .command
            .split_first()
            .filter(|(program, _)| !program.trim().is_empty())
            .ok_or_else(|| {
                EnhanceError::configuration("transformer.command must be a non-empty array")
            })?;
        let entries: Vec<PathBuf> = cfg.classpath.iter().map(|entry| root.join(entry)).collect();
        let classpath = if entries.is_empty() {
            None
        } else {
            Some(std::env::join_paths(&entries).map_err(|err| {
                EnhanceError::configuration(format!("invalid transformer.classpath: {err}"))
            })?)
        };
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            classpath,
            timeout: cfg.timeout_secs.map(Duration::from_secs),
            output_limit_bytes: cfg.output_limit_bytes,
        })
    }

    fn command(&self, source: &Path, destination: &Path) -> Command {
        let classpath = self
            .classpath
            .as_ref()
            .map(|cp| cp.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = source.to_string_lossy();
        let destination = destination.to_string_lossy();

        let mut cmd = Command::new(&self.program);
        let mut saw_input = false;
        for arg in &self.args {
            saw_input |= arg.contains("{input}");
            cmd.arg(
                arg.replace("{input}", &source)
                    .replace("{output}", &destination)
                    .replace("{classpath}", &classpath),
            );
        }
        if !saw_input {
            cmd.arg(&*source).arg(&*destination);
        }
        if let Some(cp) = &self.classpath {
            cmd.env("CLASSPATH", cp);
        }
        cmd
    }
}

impl Transformer for CommandTransformer {
    #[instrument(skip_all, fields(program = %self.program, source = %source.display()))]
    fn transform(&self, source: &Path, destination: &Path) -> EnhanceResult<()> {
        info!("running transformer command");
        let output = run_command(
            self.command(source, destination),
            self.timeout,
            self.output_limit_bytes,
        )
        .map_err(|err| EnhanceError::transformation(source, format!("{err:#}")))?;

        if output.timed_out {
            warn!("transformer timed out");
            return Err(EnhanceError::transformation(
                source,
                format!(
                    "{} timed out after {:?}",
                    self.program,
                    self.timeout.unwrap_or_default()
                ),
            ));
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "transformer failed");
            return Err(EnhanceError::transformation(
                source,
                format!(
                    "{} exited with status {:?}: {}",
                    self.program,
                    output.status.code(),
                    output.stderr_text()
                ),
            ));
        }
        if !destination.is_file() {
            return Err(EnhanceError::transformation(
                source,
                format!("{} produced no file at {}", self.program, destination.display()),
            ));
        }

        debug!("transformer completed successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn bytes_transformer_writes_destination_and_keeps_source() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("B.class");
        let destination = temp.path().join("B.class.enhanced");
        fs::write(&source, b"abc").expect("write");

        let transformer = BytesTransformer::new(|bytes: &[u8]| Ok(bytes.to_ascii_uppercase()));
        transformer.transform(&source, &destination).expect("transform");

        assert_eq!(fs::read(&source).expect("read"), b"abc");
        assert_eq!(fs::read(&destination).expect("read"), b"ABC");
    }

    #[test]
    fn bytes_transformer_failure_is_transformation_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("B.class");
        fs::write(&source, b"junk").expect("write");

        let transformer = BytesTransformer::new(|_: &[u8]| -> Result<Vec<u8>> {
            bail!("bad magic number")
        });
        let err = transformer
            .transform(&source, &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, EnhanceError::Transformation { .. }));
        assert!(err.to_string().contains("bad magic number"));
    }

    #[test]
    fn empty_command_is_configuration_error() {
        let err = CommandTransformer::from_config(Path::new("/proj"), &TransformerConfig::default())
            .unwrap_err();
        assert!(matches!(err, EnhanceError::Configuration(_)));
    }

    #[test]
    fn command_substitutes_placeholders() {
        let cfg = TransformerConfig {
            command: vec![
                "java".to_string(),
                "-cp".to_string(),
                "{classpath}".to_string(),
                "Rewrite".to_string(),
                "{input}".to_string(),
                "{output}".to_string(),
            ],
            classpath: vec![PathBuf::from("lib/flow.jar")],
            ..TransformerConfig::default()
        };
        let transformer = CommandTransformer::from_config(Path::new("/proj"), &cfg).expect("build");
        let cmd = transformer.command(Path::new("/out/B.class"), Path::new("/out/B.class.x"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-cp",
                "/proj/lib/flow.jar",
                "Rewrite",
                "/out/B.class",
                "/out/B.class.x"
            ]
        );
    }

    #[test]
    fn command_appends_paths_without_placeholders() {
        let cfg = TransformerConfig {
            command: vec!["rewrite".to_string()],
            ..TransformerConfig::default()
        };
        let transformer = CommandTransformer::from_config(Path::new("/proj"), &cfg).expect("build");
        let cmd = transformer.command(Path::new("in.class"), Path::new("out.class"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["in.class", "out.class"]);
    }

    #[cfg(unix)]
    #[test]
    fn command_transformer_runs_external_rewrite() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("B.class");
        let destination = temp.path().join("B.class.enhanced");
        fs::write(&source, b"bytes").expect("write");

        let cfg = TransformerConfig {
            command: vec!["cp".to_string(), "{input}".to_string(), "{output}".to_string()],
            ..TransformerConfig::default()
        };
        let transformer = CommandTransformer::from_config(temp.path(), &cfg).expect("build");
        transformer.transform(&source, &destination).expect("transform");
        assert_eq!(fs::read(&destination).expect("read"), b"bytes");
    }

    #[cfg(unix)]
    #[test]
    fn command_transformer_reports_nonzero_exit() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("B.class");
        fs::write(&source, b"bytes").expect("write");

        let cfg = TransformerConfig {
            command: vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo 'malformed class' >&2; exit 4".to_string(),
                "{input}".to_string(),
            ],
            ..TransformerConfig::default()
        };
        let transformer = CommandTransformer::from_config(temp.path(), &cfg).expect("build");
        let err = transformer
            .transform(&source, &temp.path().join("out"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("exited with status Some(4)"), "{msg}");
        assert!(msg.contains("malformed class"), "{msg}");
    }
}
