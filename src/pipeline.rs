//! The three phases wired together
//!
//! A [`Frontend`] is built once from grammar text: loading and table
//! construction happen up front, so a bad grammar fails before any source is
//! scanned. Each [`Frontend::check`] then scans and parses one program.

use crate::config::AnalyzerConfig;
use crate::errors::CompileError;
use crate::grammar::{Analysis, Grammar, CMINUS_GRAMMAR};
use crate::lexer::{scan, Scan};
use crate::parser::{parse, parse_traced, SymbolTable};
use crate::snapshot::Trace;

/// Result of a successful check
#[derive(Debug, Clone)]
pub struct Outcome {
    pub scan: Scan,
    pub symbols: SymbolTable,
}

#[derive(Debug, Clone)]
pub struct Frontend {
    grammar: Grammar,
    analysis: Analysis,
}

impl Frontend {
    pub fn new(grammar_text: &str, config: &AnalyzerConfig) -> Result<Frontend, CompileError> {
        let grammar = Grammar::parse(grammar_text)?;
        let analysis = Analysis::run(&grammar, config)?;
        log::info!(
            "grammar ready: {} productions, {} table conflict(s)",
            grammar.productions().len(),
            analysis.table.conflicts().len()
        );
        Ok(Frontend { grammar, analysis })
    }

    /// Frontend for the bundled C-minus grammar.
    pub fn with_default_grammar(config: &AnalyzerConfig) -> Result<Frontend, CompileError> {
        Frontend::new(CMINUS_GRAMMAR, config)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Scan and parse `source`.
    pub fn check(&self, source: &str) -> Result<Outcome, CompileError> {
        let scan = scan(source)?;
        let mut symbols = SymbolTable::from_identifiers(&scan.identifiers);
        parse(&self.grammar, &self.analysis.table, &scan.tokens, &mut symbols)?;
        Ok(Outcome { scan, symbols })
    }

    /// Scan and parse `source`, recording the parse into `trace`. The trace
    /// keeps every step up to a failure.
    pub fn check_traced(&self, source: &str, trace: &mut Trace) -> Result<Outcome, CompileError> {
        let scan = scan(source)?;
        let mut symbols = SymbolTable::from_identifiers(&scan.identifiers);
        parse_traced(
            &self.grammar,
            &self.analysis.table,
            &scan.tokens,
            &mut symbols,
            trace,
        )?;
        Ok(Outcome { scan, symbols })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frontend_builds() {
        let frontend = Frontend::with_default_grammar(&AnalyzerConfig::default()).unwrap();
        assert!(frontend.analysis().table.conflicts().is_empty());
        let outcome = frontend.check("void main(void) { }").unwrap();
        assert_eq!(outcome.symbols.len(), 1);
    }

    #[test]
    fn test_compat_frontend_builds() {
        let frontend = Frontend::with_default_grammar(&AnalyzerConfig::compat()).unwrap();
        assert!(frontend.check("void main(void) { }").is_ok());
    }

    #[test]
    fn test_lexical_error_surfaces() {
        let frontend = Frontend::with_default_grammar(&AnalyzerConfig::default()).unwrap();
        assert!(matches!(
            frontend.check("void main(void) { x1 = 2; }"),
            Err(CompileError::Lexical(_))
        ));
    }
}
