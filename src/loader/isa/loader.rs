//! Loading pipeline that folds definition lines into an [`InstructionSet`].

use std::io::BufRead;

use bitflags::bitflags;

use crate::loader::isa::lexer::{SourceLine, SourceLines};
use crate::loader::isa::parser::{
    Directive, DirectiveError, parse_directive, parse_instruction_line, parse_operand_line,
};
use crate::soc::isa::diagnostic::{
    DiagnosticKind, DiagnosticLevel, IsaDiagnostic, SourcePosition, SourceSpan,
};
use crate::soc::isa::InstructionSet;
use crate::soc::isa::error::IsaError;

bitflags! {
    /// Loader behaviour switches. The empty set reproduces the lenient defaults.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LoadOptions: u8 {
        /// Report lines with an unknown leading keyword instead of skipping them silently.
        const WARN_UNKNOWN_DIRECTIVES = 0b001;
        /// Remove a group created by an `OPERAND` line whose literal was rejected.
        const ROLLBACK_EMPTY_GROUPS = 0b010;
        /// Fail the load if any diagnostic was produced.
        const DENY_WARNINGS = 0b100;
    }
}

/// Outcome of a best-effort load: the partial model plus everything that was skipped.
#[derive(Debug)]
pub struct LoadReport {
    pub set: InstructionSet,
    pub diagnostics: Vec<IsaDiagnostic>,
}

impl LoadReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(IsaDiagnostic::is_error)
    }

    /// Keeps the set only when no line was dropped.
    pub fn into_result(self) -> Result<InstructionSet, IsaError> {
        if self.has_errors() {
            Err(IsaError::Diagnostics {
                diagnostics: self.diagnostics,
            })
        } else {
            Ok(self.set)
        }
    }
}

pub struct IsaLoader {
    options: LoadOptions,
    source: String,
}

impl Default for IsaLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl IsaLoader {
    pub fn new() -> Self {
        Self::with_options(LoadOptions::empty())
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            source: "<memory>".to_string(),
        }
    }

    /// Label used as the location prefix of every diagnostic.
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source = name.into();
        self
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    pub fn load_str(&self, src: &str) -> Result<LoadReport, IsaError> {
        self.load_lines(src.lines())
    }

    /// Loads from any sequence of raw lines; line numbers count every item, including the
    /// blank and comment lines that are skipped.
    pub fn load_lines<I, S>(&self, lines: I) -> Result<LoadReport, IsaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = LoadSession::new(self);
        for line in SourceLines::new(lines.into_iter()) {
            session.consume(&line);
        }
        session.finish()
    }

    /// Loads from a buffered reader. Read failures abort the load; nothing else does. Bytes
    /// that are not valid UTF-8 are replaced with U+FFFD rather than rejecting the stream.
    pub fn load_reader<R: BufRead>(&self, mut reader: R) -> Result<LoadReport, IsaError> {
        let mut session = LoadSession::new(self);
        let mut buf = Vec::new();
        let mut number = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            number += 1;
            let raw = String::from_utf8_lossy(&buf);
            if let Some(line) = SourceLine::classify(number, &raw) {
                session.consume(&line);
            }
        }
        session.finish()
    }
}

/// State of one load: the set under construction and the diagnostics gathered so far.
struct LoadSession<'a> {
    loader: &'a IsaLoader,
    set: InstructionSet,
    diagnostics: Vec<IsaDiagnostic>,
}

impl<'a> LoadSession<'a> {
    fn new(loader: &'a IsaLoader) -> Self {
        Self {
            loader,
            set: InstructionSet::new(),
            diagnostics: Vec::new(),
        }
    }

    fn consume(&mut self, line: &SourceLine) {
        let options = self.loader.options;
        let result = match parse_directive(line) {
            Directive::Arch(label) => {
                if let Some(previous) = self.set.arch() {
                    log::debug!("architecture label '{previous}' replaced by '{label}'");
                }
                self.set.set_arch(label);
                Ok(())
            }
            Directive::Operand => parse_operand_line(
                line,
                &mut self.set,
                options.contains(LoadOptions::ROLLBACK_EMPTY_GROUPS),
            ),
            Directive::Instruction => parse_instruction_line(line, &mut self.set),
            Directive::Unknown(keyword) => {
                if options.contains(LoadOptions::WARN_UNKNOWN_DIRECTIVES) {
                    self.report(
                        line,
                        DiagnosticLevel::Warning,
                        DirectiveError::new(
                            DiagnosticKind::UnrecognizedDirective,
                            "directive.unknown",
                            format!("unrecognized directive '{keyword}'"),
                            0,
                        ),
                    );
                } else {
                    log::debug!(
                        "ignoring unrecognized directive '{keyword}' on line {}",
                        line.number
                    );
                }
                Ok(())
            }
        };
        if let Err(err) = result {
            self.report(line, DiagnosticLevel::Error, err);
        }
    }

    fn report(&mut self, line: &SourceLine, level: DiagnosticLevel, err: DirectiveError) {
        let span = SourceSpan::point(
            self.loader.source.clone(),
            SourcePosition::new(line.number, line.column(err.offset)),
        );
        let diagnostic = IsaDiagnostic::new(level, err.kind, err.code, err.message, Some(span));
        log::warn!("{}", log_message(line, &diagnostic));
        self.diagnostics.push(diagnostic);
    }

    fn finish(self) -> Result<LoadReport, IsaError> {
        if self.loader.options.contains(LoadOptions::DENY_WARNINGS) && !self.diagnostics.is_empty()
        {
            return Err(IsaError::Diagnostics {
                diagnostics: self.diagnostics,
            });
        }
        Ok(LoadReport {
            set: self.set,
            diagnostics: self.diagnostics,
        })
    }
}

/// Only error-level diagnostics mean the line was dropped.
fn log_message(line: &SourceLine, diagnostic: &IsaDiagnostic) -> String {
    match diagnostic.level {
        DiagnosticLevel::Error => {
            format!("skipping definition `{}`: {}", line.text, diagnostic.format_human())
        }
        DiagnosticLevel::Warning => diagnostic.format_human(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use super::*;

    #[test]
    fn unknown_directives_are_ignored_by_default() {
        let report = IsaLoader::new().load_str("FOO bar\nINS nop 0").expect("load");
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.set.len(), 1);
    }

    #[test]
    fn unknown_directives_can_be_reported() {
        let loader = IsaLoader::with_options(LoadOptions::WARN_UNKNOWN_DIRECTIVES);
        let report = loader.load_str("\nFOO bar").expect("load");
        assert_eq!(report.diagnostics.len(), 1);
        let diag = &report.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::UnrecognizedDirective);
        assert_eq!(diag.level, DiagnosticLevel::Warning);
        assert_eq!(diag.line(), Some(2));
        assert!(!report.has_errors(), "unknown directives never drop a definition");
    }

    #[test]
    fn only_dropped_lines_are_logged_as_skipped() {
        let line = SourceLine::classify(1, "FOO bar").expect("line");
        let warning = IsaDiagnostic::new(
            DiagnosticLevel::Warning,
            DiagnosticKind::UnrecognizedDirective,
            "directive.unknown",
            "unrecognized directive 'FOO'",
            None,
        );
        assert!(!log_message(&line, &warning).contains("skipping"));

        let line = SourceLine::classify(1, "INS nop").expect("line");
        let error = IsaDiagnostic::new(
            DiagnosticLevel::Error,
            DiagnosticKind::MalformedDirective,
            "instruction.token-count",
            "expected `INS <match-pattern> <bit-pattern>`, found 2 token(s)",
            None,
        );
        assert!(log_message(&line, &error).starts_with("skipping definition `INS nop`"));
    }

    #[test]
    fn diagnostics_carry_source_name_and_column() {
        let loader = IsaLoader::new().source_name("toy.isa");
        let report = loader.load_str("  OPERAND R r0 0b1").expect("load");
        let diag = &report.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::InvalidLiteral);
        let span = diag.span.as_ref().expect("span");
        assert_eq!(span.source, "toy.isa");
        assert_eq!(span.start, SourcePosition::new(1, 17));
    }

    #[test]
    fn bare_keywords_are_not_directives() {
        let report = IsaLoader::new().load_str("ARCH
OPERAND 
INS	
INS nop 0").expect("load");
        assert_eq!(report.set.arch(), None);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(report.set.len(), 1);
        assert!(report.into_result().is_ok());

        let loader = IsaLoader::with_options(LoadOptions::WARN_UNKNOWN_DIRECTIVES);
        let report = loader.load_str("ARCH").expect("load");
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UnrecognizedDirective);
        assert!(!report.has_errors());
    }

    #[test]
    fn deny_warnings_turns_diagnostics_into_error() {
        let loader = IsaLoader::with_options(LoadOptions::DENY_WARNINGS);
        let err = loader.load_str("OPERAND R r0").unwrap_err();
        match err {
            IsaError::Diagnostics { diagnostics } => assert_eq!(diagnostics.len(), 1),
            other => panic!("unexpected error {other}"),
        }
        assert!(loader.load_str("OPERAND R r0 0").is_ok());
    }

    #[test]
    fn into_result_keeps_clean_sets_only() {
        let clean = IsaLoader::new().load_str("INS nop 0").expect("load");
        assert_eq!(clean.into_result().expect("clean").len(), 1);
        let dirty = IsaLoader::new().load_str("INS nop").expect("load");
        assert!(dirty.into_result().is_err());
    }

    #[test]
    fn reader_numbers_physical_lines() {
        let src = "# header\nOPERAND R r0 00\n\nINS add@d<R> 1@x\n";
        let report = IsaLoader::new().load_reader(Cursor::new(src)).expect("load");
        assert_eq!(report.diagnostics[0].line(), Some(4));
        assert_eq!(report.set.operand_groups().len(), 1);
    }

    #[test]
    fn invalid_utf8_stays_local_to_its_line() {
        let src: &[u8] = b"# (c) 1999 \xA9\r\nOPERAND R r0 00\nINS add@d<R> 101@d\n";
        let report = IsaLoader::new().load_reader(Cursor::new(src)).expect("load");
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(report.set.len(), 1);
        assert_eq!(report.set.instructions()[0].value(), 0b10100);

        let src: &[u8] = b"OPERAND R r0 00\nOPERAND R r\xFF 01\nINS bad 1@x";
        let report = IsaLoader::new().load_reader(Cursor::new(src)).expect("load");
        assert_eq!(report.set.operand_groups()[0].len(), 2);
        assert_eq!(report.diagnostics[0].line(), Some(3));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk gone"))
        }
    }

    #[test]
    fn read_failures_abort_the_load() {
        let reader = io::BufReader::new(FailingReader);
        let err = IsaLoader::new().load_reader(reader).unwrap_err();
        assert!(matches!(err, IsaError::Io(_)));
    }
}
