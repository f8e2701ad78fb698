use std::fmt;

use crate::soc::isa::diagnostic::IsaDiagnostic;

/// Failures that stop a definition load. Problems confined to a single line are reported as
/// [`IsaDiagnostic`]s instead and never surface here unless the caller asks for a strict load.
#[derive(Debug)]
pub enum IsaError {
    Io(std::io::Error),
    Diagnostics { diagnostics: Vec<IsaDiagnostic> },
}

impl From<std::io::Error> for IsaError {
    fn from(err: std::io::Error) -> Self {
        IsaError::Io(err)
    }
}

impl fmt::Display for IsaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsaError::Io(err) => write!(f, "I/O error: {err}"),
            IsaError::Diagnostics { diagnostics } => {
                writeln!(f, "definition produced {} issue(s):", diagnostics.len())?;
                for diag in diagnostics {
                    writeln!(f, "  - {}", diag.format_human())?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for IsaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IsaError::Io(err) => Some(err),
            IsaError::Diagnostics { .. } => None,
        }
    }
}
