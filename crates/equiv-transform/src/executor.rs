//! Transformer implementations

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use crate::error::{BoxError, Error, Result};

/// Placeholder in [`CommandTransformer`] arguments replaced by the program file path
pub const PROGRAM_VAR: &str = "${PROGRAM}";

/// Applies a transform program (e.g. an XSLT stylesheet) to an input document
pub trait Transformer: Send + Sync {
    /// Run `program` over `input` and return the output text
    fn transform(&self, program: &str, input: &str) -> Result<String>;
}

/// A transformer backed by a closure.
///
/// ```
/// use equiv_transform::{FnTransformer, Transformer};
///
/// let upper = FnTransformer::new(|_program: &str, input: &str| {
///     Ok::<_, std::io::Error>(input.to_uppercase())
/// });
/// assert_eq!(upper.transform("", "<a/>").unwrap(), "<A/>");
/// ```
pub struct FnTransformer<F> {
    f: F,
}

impl<F> FnTransformer<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, E> Transformer for FnTransformer<F>
where
    F: Fn(&str, &str) -> std::result::Result<String, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn transform(&self, program: &str, input: &str) -> Result<String> {
        (self.f)(program, input)
            .map_err(|e| Error::execution_with("transform function failed", e))
    }
}

/// Runs an external program such as `xsltproc`.
///
/// The transform program is written to a temporary file whose path replaces
/// [`PROGRAM_VAR`] in the arguments. The input document is piped to stdin
/// and stdout is the result.
///
/// ```no_run
/// use equiv_transform::CommandTransformer;
///
/// let xslt = CommandTransformer::new("xsltproc")
///     .arg("${PROGRAM}")
///     .arg("-")
///     .program_extension("xsl");
/// ```
#[derive(Debug, Clone)]
pub struct CommandTransformer {
    command: String,
    args: Vec<String>,
    extension: String,
}

impl CommandTransformer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            extension: "txt".to_string(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// File extension for the temporary program file
    pub fn program_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn program_file(&self, program: &str) -> Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("equiv-program-")
            .suffix(&format!(".{}", self.extension))
            .tempfile()
            .map_err(|e| Error::execution_with("failed to create program file", e))?;
        file.write_all(program.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| Error::execution_with("failed to write program file", e))?;
        Ok(file)
    }
}

impl Transformer for CommandTransformer {
    fn transform(&self, program: &str, input: &str) -> Result<String> {
        // Kept alive until the child exits
        let program_file = self.program_file(program)?;
        let program_path = program_file.path().to_string_lossy().into_owned();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(PROGRAM_VAR, &program_path))
            .collect();

        tracing::debug!(command = %self.command, ?args, input_bytes = input.len(), "running transform");

        let mut child = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::execution_with(format!("failed to start `{}`", self.command), e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::execution("child stdin was not captured"))?;

        // Stdin is written from a second thread while stdout drains
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input.as_bytes()));
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.map_err(|e| Error::execution_with(format!("failed to wait for `{}`", self.command), e))?;
        match written {
            Ok(Ok(())) => {}
            // The program may exit without reading all of its input
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(Error::execution_with("failed to write input to transform", e)),
            Err(_) => return Err(Error::execution("input writer thread panicked")),
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();

        if !output.status.success() {
            // stderr goes into the message
            let message = if stderr.is_empty() {
                format!(
                    "`{}` exited with non-zero status (exit code: {:?})",
                    self.command,
                    output.status.code()
                )
            } else {
                format!(
                    "`{}` exited with non-zero status (exit code: {:?}): {}",
                    self.command,
                    output.status.code(),
                    stderr
                )
            };
            return Err(Error::execution(message));
        }

        if !stderr.is_empty() {
            tracing::warn!(command = %self.command, stderr, "transform succeeded with diagnostics");
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::execution_with("transform output is not valid UTF-8", e))
    }
}
