//! Compilation driver: lex -> parse -> analyze

use crate::common::CompileResult;
use crate::frontend::ast::Program;
use crate::frontend::lexer::{Lexer, Token};
use crate::frontend::parser::Parser;
use crate::sema::{Analysis, SemanticAnalyzer};
use std::fmt::Write as _;

/// The artifacts of one compilation run
pub struct Compilation {
    pub program: Program,
    pub analysis: Analysis,
}

impl Compilation {
    pub fn error_count(&self) -> usize {
        self.analysis.error_count()
    }
}

/// Run the front end and the semantic pass over one source text
///
/// Lexing and parsing abort on the first error; semantic violations are
/// buffered in the analysis and never abort.
pub fn compile(source: &str) -> CompileResult<Compilation> {
    let program = Parser::new(source)?.parse()?;
    let analysis = SemanticAnalyzer::new(source).analyze(&program);
    Ok(Compilation { program, analysis })
}

/// Tokenize one source text in full
pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    Lexer::new(source).tokenize_all()
}

/// Render a token stream for `--dump-tokens`
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{:>5}..{:<5} {}", token.span.start, token.span.end, token.kind);
    }
    out
}
