use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown mnemonic `{0}`")]
    Mnemonic(String),

    #[error("instruction {mnemonic} requires exactly {expected} operands (was given {actual})")]
    OperandCount {
        mnemonic: String,
        expected: usize,
        actual: usize,
    },

    #[error("unresolved symbol `{0}`")]
    Symbol(String),

    #[error("re-defined label `{0}`")]
    RedefinedLabel(String),
}

/// One diagnostic, bound to the 1-based source line it came from. Diagnostics
/// accumulate; none of them aborts the run.
#[derive(Debug, PartialEq, Eq)]
pub struct Diag {
    pub line: usize,
    pub error: Error,
}

impl Diag {
    pub fn new(line: usize, error: Error) -> Self {
        Self { line, error }
    }

    /// Print in cargo style with the offending source line quoted.
    pub fn print(&self, file: &str, lines: &[&str]) {
        cprintln!("<red,bold>error</>: {}", self.error);
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, self.line);
        cprintln!("      <blue>|</>");
        let content = lines.get(self.line - 1).copied().unwrap_or("");
        cprintln!(" <blue>{:>4} |</> {}", self.line, content);
        cprintln!("      <blue>|</>");
    }
}

impl std::fmt::Display for Diag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}
