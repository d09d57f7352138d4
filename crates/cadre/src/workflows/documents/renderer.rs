use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

/// Converts an HTML document into PDF bytes.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Pipes HTML through an external converter reading stdin and writing stdout.
#[derive(Debug, Clone)]
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    /// `program - -`, the calling convention shared by weasyprint and wkhtmltopdf.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec!["-".to_string(), "-".to_string()],
        }
    }

    pub fn with_args(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl PdfRenderer for CommandPdfRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from another thread so a full stdout pipe cannot stall the write.
        let stdin = child.stdin.take();
        let input = html.as_bytes().to_vec();
        let writer = thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(&input),
            None => Ok(()),
        });

        let output = child.wait_with_output().map_err(RenderError::Io)?;
        let written = writer
            .join()
            .map_err(|_| RenderError::Io(std::io::Error::other("stdin writer panicked")))?;

        // A converter that exits early closes stdin; its exit status is the useful error.
        if !output.status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(RenderError::Io)?;
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput {
                program: self.program.clone(),
            });
        }

        debug!(program = %self.program, bytes = output.stdout.len(), "rendered pdf");
        Ok(output.stdout)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to start pdf renderer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("pdf renderer i/o failed: {0}")]
    Io(#[source] std::io::Error),
    #[error("pdf renderer `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("pdf renderer `{program}` produced no output")]
    EmptyOutput { program: String },
    #[error("pdf rendering task failed: {0}")]
    Task(String),
}
