use std::io::{self, Write};

/// Append-only issue collector threaded through normalization and layout.
///
/// Errors mark malformed data that was repaired with a default (or a hard
/// structural failure); warnings mark valid-but-suspicious input. Neither
/// interrupts processing; the caller reports both at end of run and decides
/// the exit status from `has_errors`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Writes the end-of-run report: warnings first, then errors, each as a
    /// numbered list under a count header.
    pub fn write_report(&self, out: &mut impl Write) -> io::Result<()> {
        if !self.warnings.is_empty() {
            writeln!(
                out,
                "\n{} warning{} occurred during execution:",
                self.warnings.len(),
                plural_suffix(self.warnings.len())
            )?;
            for (idx, message) in self.warnings.iter().enumerate() {
                writeln!(out, "{}. {}", idx + 1, message)?;
            }
        }
        if !self.errors.is_empty() {
            writeln!(
                out,
                "\n{} error{} occurred during execution:",
                self.errors.len(),
                plural_suffix(self.errors.len())
            )?;
            for (idx, message) in self.errors.iter().enumerate() {
                writeln!(out, "{}. {}", idx + 1, message)?;
            }
        }
        Ok(())
    }
}

fn plural_suffix(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_order() {
        let mut diag = Diagnostics::new();
        diag.warning("first");
        diag.error("broken");
        diag.warning("second");
        assert_eq!(diag.warnings(), ["first", "second"]);
        assert_eq!(diag.errors(), ["broken"]);
        assert!(diag.has_errors());
    }

    #[test]
    fn report_numbers_both_lists() {
        let mut diag = Diagnostics::new();
        diag.warning("watch out");
        diag.error("bad data");
        let mut buf = Vec::new();
        diag.write_report(&mut buf).unwrap();
        let report = String::from_utf8(buf).unwrap();
        assert!(report.contains("1 warning occurred"));
        assert!(report.contains("1. watch out"));
        assert!(report.contains("1 error occurred"));
        assert!(report.contains("1. bad data"));
    }

    #[test]
    fn empty_report_writes_nothing() {
        let diag = Diagnostics::new();
        let mut buf = Vec::new();
        diag.write_report(&mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
