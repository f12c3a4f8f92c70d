use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{GenError, Result};
use crate::spec::FormatterSettings;

/// External source formatter that rendered text is piped through
///
/// The formatter reads the source on stdin and writes the formatted source to
/// stdout. A non-zero exit status means it rejected the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    program: String,
    args: Vec<String>,
}

impl Formatter {
    pub const DEFAULT_PROGRAM: &'static str = "rustfmt";

    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `rustfmt --edition 2021`, reading stdin and writing stdout.
    pub fn rustfmt() -> Self {
        Self::new(Self::DEFAULT_PROGRAM, ["--edition", "2021"])
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Same arguments, different executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Pipe `source` through the formatter and return its stdout.
    ///
    /// Blocks until the formatter exits; there is no timeout. `destination`
    /// only labels errors.
    ///
    /// # Errors
    ///
    /// [`GenError::Format`] when the process cannot be started, exits
    /// unsuccessfully or prints something that is not UTF-8.
    pub fn format(&self, source: &str, destination: &Path) -> Result<String> {
        let fail = |message: String| GenError::Format {
            program: self.program.clone(),
            path: destination.to_path_buf(),
            message,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| fail(format!("failed to start: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| fail("stdin was not captured".to_string()))?;

        // Feed stdin from a second thread so a formatter that streams output
        // before reading all input cannot deadlock on a full pipe.
        let (output, fed) = std::thread::scope(|scope| {
            let feeder = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let output = child.wait_with_output();
            (output, feeder.join())
        });

        let output = output.map_err(|e| fail(format!("failed to wait for formatter: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(fail(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {stderr}", output.status)
            }));
        }
        match fed {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(fail(format!("failed to write source: {e}"))),
            Err(_) => return Err(fail("stdin writer panicked".to_string())),
        }

        String::from_utf8(output.stdout).map_err(|e| fail(format!("output is not UTF-8: {e}")))
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::rustfmt()
    }
}

impl From<&FormatterSettings> for Formatter {
    fn from(settings: &FormatterSettings) -> Self {
        Self::new(settings.command.clone(), settings.args.clone())
    }
}
