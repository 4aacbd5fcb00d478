//! Parse tree definitions
//!
//! The tree is immutable once the parser returns it; the semantic analyzer
//! walks it read-only and records everything it learns in its own arena.

mod decl;
mod expr;
mod stmt;
mod types;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;

use crate::common::Span;
use std::fmt::Write as _;

/// A complete Javana program
#[derive(Debug, Clone)]
pub struct Program {
    pub name: Ident,
    pub globals: Vec<Decl>,
    pub main: Block,
    pub span: Span,
}

impl Program {
    pub fn new(name: Ident, globals: Vec<Decl>, main: Block, span: Span) -> Self {
        Self {
            name,
            globals,
            main,
            span,
        }
    }

    /// Render an indented dump of the parse tree
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "program {}", self.name.text);
        for decl in &self.globals {
            dump_decl(&mut out, decl, 1);
        }
        let _ = writeln!(out, "  main");
        dump_block(&mut out, &self.main, 2);
        out
    }
}

fn indent(out: &mut String, depth: usize) {
    out.push_str(&"  ".repeat(depth));
}

fn dump_decl(out: &mut String, decl: &Decl, depth: usize) {
    indent(out, depth);
    match &decl.kind {
        DeclKind::Constant(c) => {
            let _ = writeln!(out, "const {}", c.name.text);
            dump_expr(out, &c.init, depth + 1);
        }
        DeclKind::Variable(v) => {
            let names: Vec<_> = v.names.iter().map(|n| n.text.as_str()).collect();
            match &v.ty {
                Some(ty) => {
                    let _ = writeln!(out, "var {} : {}", names.join(", "), ty.spelling());
                }
                None => {
                    let _ = writeln!(out, "var {}", names.join(", "));
                }
            }
            if let Some(init) = &v.init {
                dump_expr(out, init, depth + 1);
            }
        }
        DeclKind::Record(r) => dump_record(out, r, depth),
        DeclKind::Function(f) => {
            let params: Vec<_> = f
                .params
                .iter()
                .map(|p| {
                    let prefix = if p.by_ref { "var " } else { "" };
                    format!("{}{} : {}", prefix, p.name.text, p.ty.spelling())
                })
                .collect();
            match &f.return_type {
                Some(ret) => {
                    let _ = writeln!(
                        out,
                        "func {}({}) -> {}",
                        f.name.text,
                        params.join(", "),
                        ret.spelling()
                    );
                }
                None => {
                    let _ = writeln!(out, "func {}({})", f.name.text, params.join(", "));
                }
            }
            dump_block(out, &f.body, depth + 1);
        }
    }
}

fn dump_record(out: &mut String, record: &RecordDecl, depth: usize) {
    let _ = writeln!(out, "record {}", record.name.text);
    for item in &record.items {
        match item {
            RecordItem::Fields(fields) => {
                indent(out, depth + 1);
                let names: Vec<_> = fields.names.iter().map(|n| n.text.as_str()).collect();
                let _ = writeln!(out, "field {} : {}", names.join(", "), fields.ty.spelling());
            }
            RecordItem::Record(nested) => {
                indent(out, depth + 1);
                dump_record(out, nested, depth + 1);
            }
        }
    }
}

fn dump_block(out: &mut String, block: &Block, depth: usize) {
    for stmt in &block.stmts {
        dump_stmt(out, stmt, depth);
    }
}

fn dump_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    match &stmt.kind {
        StmtKind::Block(block) => {
            indent(out, depth);
            out.push_str("block\n");
            dump_block(out, block, depth + 1);
        }
        StmtKind::Decl(decl) => dump_decl(out, decl, depth),
        StmtKind::Assign { target, value } => {
            indent(out, depth);
            out.push_str("assign\n");
            dump_expr(out, target, depth + 1);
            dump_expr(out, value, depth + 1);
        }
        StmtKind::Call(call) => dump_expr(out, call, depth),
        StmtKind::If {
            condition,
            then_block,
            else_branch,
        } => {
            indent(out, depth);
            out.push_str("if\n");
            dump_expr(out, condition, depth + 1);
            dump_block(out, then_block, depth + 1);
            if let Some(else_branch) = else_branch {
                indent(out, depth);
                out.push_str("else\n");
                dump_stmt(out, else_branch, depth + 1);
            }
        }
        StmtKind::While { condition, body } => {
            indent(out, depth);
            out.push_str("while\n");
            dump_expr(out, condition, depth + 1);
            dump_block(out, body, depth + 1);
        }
        StmtKind::For {
            init,
            condition,
            update,
            body,
        } => {
            indent(out, depth);
            out.push_str("for\n");
            dump_stmt(out, init, depth + 1);
            dump_expr(out, condition, depth + 1);
            dump_stmt(out, update, depth + 1);
            dump_block(out, body, depth + 1);
        }
        StmtKind::Return(value) => {
            indent(out, depth);
            out.push_str("return\n");
            if let Some(value) = value {
                dump_expr(out, value, depth + 1);
            }
        }
    }
}

fn dump_expr(out: &mut String, expr: &Expr, depth: usize) {
    indent(out, depth);
    match &expr.kind {
        ExprKind::IntLiteral(v) => {
            let _ = writeln!(out, "int {}", v);
        }
        ExprKind::RealLiteral(v) => {
            let _ = writeln!(out, "real {}", v);
        }
        ExprKind::StringLiteral(s) => {
            let _ = writeln!(out, "string {:?}", s);
        }
        ExprKind::CharLiteral(c) => {
            let _ = writeln!(out, "char {:?}", c);
        }
        ExprKind::Identifier(name) => {
            let _ = writeln!(out, "id {}", name);
        }
        ExprKind::Binary { op, left, right } => {
            let _ = writeln!(out, "binary {}", op.symbol());
            dump_expr(out, left, depth + 1);
            dump_expr(out, right, depth + 1);
        }
        ExprKind::Unary { op, operand } => {
            let symbol = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Not => "!",
            };
            let _ = writeln!(out, "unary {}", symbol);
            dump_expr(out, operand, depth + 1);
        }
        ExprKind::Call { name, args } => {
            let _ = writeln!(out, "call {}", name.text);
            for arg in args {
                dump_expr(out, arg, depth + 1);
            }
        }
        ExprKind::Index { array, index } => {
            out.push_str("index\n");
            dump_expr(out, array, depth + 1);
            dump_expr(out, index, depth + 1);
        }
        ExprKind::Field { object, field } => {
            let _ = writeln!(out, "field {}", field.text);
            dump_expr(out, object, depth + 1);
        }
        ExprKind::NewArray { element, length } => {
            let _ = writeln!(out, "new {}[]", element.spelling());
            dump_expr(out, length, depth + 1);
        }
        ExprKind::NewRecord { name, fields } => {
            let _ = writeln!(out, "new {}{{}}", name.text);
            for field in fields {
                indent(out, depth + 1);
                let _ = writeln!(out, "field {}", field.name.text);
                dump_expr(out, &field.value, depth + 2);
            }
        }
    }
}
