//! Cross-reference table rendering
//!
//! Renders the finished scope tree: every entry with its kind, storage
//! slot, type and the ordered source lines that declare or reference it.
//! Record field scopes and routine scopes get their own tables.

use super::arena::Arena;
use super::scope::ScopeId;
use super::symbol::SymbolKind;
use super::types::TypeForm;
use super::Analysis;
use std::fmt::Write as _;

/// Render the cross-reference table for a completed analysis
pub fn render(analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str("\n===== CROSS-REFERENCE TABLE =====\n");

    let Some(program) = analysis.program else {
        return out;
    };
    let arena = &analysis.arena;
    let program_name = arena.name(arena.symbol(program).name);

    if let Some(scope) = analysis.program_scope() {
        render_scope(&mut out, arena, scope, &format!("PROGRAM {}", program_name));
    }
    out
}

fn render_scope(out: &mut String, arena: &Arena, scope_id: ScopeId, title: &str) {
    let _ = writeln!(out, "\n*** {} ***\n", title);
    let _ = writeln!(
        out,
        "{:<16} {:<18} {:<22} {:<5} {}",
        "Identifier", "Line numbers", "Kind", "Slot", "Type"
    );
    let _ = writeln!(
        out,
        "{:<16} {:<18} {:<22} {:<5} {}",
        "----------", "------------", "----", "----", "----"
    );

    // Nested tables come after the parent's rows, in declaration order.
    let mut nested: Vec<(ScopeId, String)> = Vec::new();

    for &symbol_id in arena.scope(scope_id).symbols() {
        let symbol = arena.symbol(symbol_id);
        let name = arena.name(symbol.name);

        let lines = symbol
            .declared_lines
            .iter()
            .map(|line| format!("{:03}", line))
            .collect::<Vec<_>>()
            .join(" ");

        let slot = symbol
            .slot
            .map_or(String::new(), |slot| slot.to_string());

        let type_text = match symbol.type_id {
            Some(type_id) => {
                let typespec = arena.typespec(type_id);
                match typespec.type_path() {
                    Some(path) if !path.is_empty() => {
                        format!("{} ({})", arena.describe_type(type_id), path)
                    }
                    _ => arena.describe_type(type_id),
                }
            }
            None => String::new(),
        };

        let _ = writeln!(
            out,
            "{:<16} {:<18} {:<22} {:<5} {}",
            name, lines, symbol.kind, slot, type_text
        );

        match symbol.kind {
            SymbolKind::Type => {
                if let Some(type_id) = symbol.type_id {
                    let typespec = arena.typespec(type_id);
                    if typespec.form == TypeForm::Record {
                        if let Some(fields) = typespec.field_scope() {
                            let path = typespec.type_path().unwrap_or(name);
                            nested.push((fields, format!("RECORD {}", path)));
                        }
                    }
                }
            }
            SymbolKind::Function => {
                if let Some(scope) = symbol.routine().and_then(|r| r.scope) {
                    nested.push((scope, format!("FUNCTION {}", name)));
                }
            }
            _ => {}
        }
    }

    for (scope, title) in nested {
        render_scope(out, arena, scope, &title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Parser;
    use crate::sema::SemanticAnalyzer;
    use pretty_assertions::assert_eq;

    /// Collapse column padding so the comparison tracks content, not widths
    fn normalize(rendered: &str) -> Vec<String> {
        rendered
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect()
    }

    #[test]
    fn test_cross_reference_table() {
        let source = "program p\n\
                      const n = 5;\n\
                      var arr = new int[n];\n\
                      record Point { x, y : int; }\n\
                      func add(a : int, b : int) -> int { return a + b; }\n\
                      main() {\n\
                      arr[0] = add(n, 1);\n\
                      }\n";

        let program = Parser::new(source).unwrap().parse().unwrap();
        let analysis = SemanticAnalyzer::new(source).analyze(&program);
        assert_eq!(analysis.error_count(), 0);

        let rendered = render(&analysis);
        assert_eq!(
            normalize(&rendered),
            vec![
                "===== CROSS-REFERENCE TABLE =====",
                "*** PROGRAM p ***",
                "Identifier Line numbers Kind Slot Type",
                "---------- ------------ ---- ---- ----",
                "n 002 003 007 constant integer",
                "arr 003 007 variable 0 array[5] of integer",
                "Point 004 type Point (P$Point)",
                "add 005 007 function",
                "*** RECORD P$Point ***",
                "Identifier Line numbers Kind Slot Type",
                "---------- ------------ ---- ---- ----",
                "x 004 record field integer",
                "y 004 record field integer",
                "*** FUNCTION add ***",
                "Identifier Line numbers Kind Slot Type",
                "---------- ------------ ---- ---- ----",
                "a 005 value parameter 0 integer",
                "b 005 value parameter 1 integer",
            ]
        );
    }

    #[test]
    fn test_empty_program_renders_program_table() {
        let source = "program q main() { }";
        let program = Parser::new(source).unwrap().parse().unwrap();
        let analysis = SemanticAnalyzer::new(source).analyze(&program);

        let rendered = render(&analysis);
        assert!(rendered.contains("*** PROGRAM q ***"));
    }
}
