//! Javana compiler driver
//!
//! Usage: javanac [OPTIONS] <input>

use anyhow::Context as _;
use clap::Parser as ClapParser;
use javana_compiler::common::DiagnosticReporter;
use javana_compiler::driver;
use javana_compiler::sema::xref;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "javanac")]
#[command(author = "Javana Toolchain Team")]
#[command(version)]
#[command(about = "Compiler front end and semantic analyzer for the Javana language", long_about = None)]
struct Args {
    /// Input source file (.jv)
    #[arg(required = true)]
    input: PathBuf,

    /// Dump tokens and stop
    #[arg(long)]
    dump_tokens: bool,

    /// Dump the parse tree and stop
    #[arg(long)]
    dump_ast: bool,

    /// Dump the cross-referenced symbol table after analysis
    #[arg(long)]
    dump_symbols: bool,

    /// Render diagnostics as a plain fixed-column table instead of
    /// annotated source snippets
    #[arg(long)]
    plain: bool,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(error_count) => {
            if error_count > 0 {
                eprintln!("\nThere were {} semantic errors.", error_count);
            }
            process::exit(i32::try_from(error_count.min(120)).unwrap_or(120));
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(121);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<usize> {
    let filename = args.input.display().to_string();
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("reading source file {}", filename))?;

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(filename, source.clone());

    if args.dump_tokens {
        let tokens = match driver::tokenize(&source) {
            Ok(tokens) => tokens,
            Err(e) => {
                reporter.report_error(file_id, &e);
                return Ok(1);
            }
        };
        print!("{}", driver::render_tokens(&tokens));
        return Ok(0);
    }

    let compilation = match driver::compile(&source) {
        Ok(compilation) => compilation,
        Err(e) => {
            reporter.report_error(file_id, &e);
            return Ok(1);
        }
    };

    if args.dump_ast {
        print!("{}", compilation.program.dump());
        return Ok(0);
    }

    if args.plain {
        print!("{}", compilation.analysis.errors.render_table());
    } else {
        for diagnostic in compilation.analysis.errors.diagnostics() {
            reporter.report_semantic(file_id, diagnostic);
        }
    }

    if args.dump_symbols {
        print!("{}", xref::render(&compilation.analysis));
    }

    Ok(compilation.error_count())
}
