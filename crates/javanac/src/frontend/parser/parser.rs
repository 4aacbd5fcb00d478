//! Recursive descent parser for Javana

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for Javana
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let start_span = self.current.span;

        self.expect(TokenKind::Program)?;
        let name = self.parse_ident()?;

        let mut globals = Vec::new();
        while !self.check(&TokenKind::Main) {
            if self.at_end() {
                return Err(CompileError::parser(
                    "expected 'main' before end of input",
                    self.current.span,
                ));
            }
            globals.push(self.parse_global_def()?);
        }

        self.expect(TokenKind::Main)?;
        self.expect(TokenKind::LeftParen)?;
        self.expect(TokenKind::RightParen)?;
        let main = self.parse_block()?;

        let span = start_span.merge(main.span);
        Ok(Program::new(name, globals, main, span))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn parse_ident(&mut self) -> CompileResult<Ident> {
        let token = self.expect(TokenKind::Identifier(String::new()))?;
        match token.kind {
            TokenKind::Identifier(text) => Ok(Ident::new(text, token.span)),
            _ => unreachable!("expect() guarantees an identifier"),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_global_def(&mut self) -> CompileResult<Decl> {
        match self.current.kind {
            TokenKind::Const => self.parse_constant_def(),
            TokenKind::Var => self.parse_variable_def(),
            TokenKind::Record => {
                let start_span = self.current.span;
                let record = self.parse_record_decl()?;
                let span = start_span.merge(self.current.span);
                Ok(Decl::new(DeclKind::Record(record), span))
            }
            TokenKind::Func => self.parse_func_def(),
            _ => Err(CompileError::parser(
                format!(
                    "expected 'const', 'var', 'record' or 'func', found {}",
                    self.current.kind
                ),
                self.current.span,
            )),
        }
    }

    fn parse_constant_def(&mut self) -> CompileResult<Decl> {
        let start_span = self.current.span;
        self.expect(TokenKind::Const)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Assign)?;
        let init = self.parse_expression()?;
        let end = self.expect(TokenKind::Semicolon)?;

        let span = start_span.merge(end.span);
        Ok(Decl::new(DeclKind::Constant(ConstantDef { name, init }), span))
    }

    fn parse_variable_def(&mut self) -> CompileResult<Decl> {
        let start_span = self.current.span;
        self.expect(TokenKind::Var)?;

        let first = self.parse_ident()?;

        if self.match_token(&TokenKind::Assign)? {
            // Initialized form: var x = expr;
            let init = self.parse_expression()?;
            let end = self.expect(TokenKind::Semicolon)?;
            let span = start_span.merge(end.span);
            return Ok(Decl::new(
                DeclKind::Variable(VarDecl {
                    names: vec![first],
                    ty: None,
                    init: Some(init),
                }),
                span,
            ));
        }

        // Annotated form: var a, b : int;
        let mut names = vec![first];
        while self.match_token(&TokenKind::Comma)? {
            names.push(self.parse_ident()?);
        }
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let end = self.expect(TokenKind::Semicolon)?;

        let span = start_span.merge(end.span);
        Ok(Decl::new(
            DeclKind::Variable(VarDecl {
                names,
                ty: Some(ty),
                init: None,
            }),
            span,
        ))
    }

    fn parse_record_decl(&mut self) -> CompileResult<RecordDecl> {
        self.expect(TokenKind::Record)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LeftBrace)?;

        let mut items = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.check(&TokenKind::Record) {
                items.push(RecordItem::Record(self.parse_record_decl()?));
            } else {
                items.push(RecordItem::Fields(self.parse_field_decl()?));
            }
        }
        self.expect(TokenKind::RightBrace)?;

        Ok(RecordDecl { name, items })
    }

    fn parse_field_decl(&mut self) -> CompileResult<FieldDecl> {
        let start_span = self.current.span;

        let mut names = vec![self.parse_ident()?];
        while self.match_token(&TokenKind::Comma)? {
            names.push(self.parse_ident()?);
        }
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let end = self.expect(TokenKind::Semicolon)?;

        Ok(FieldDecl {
            names,
            ty,
            span: start_span.merge(end.span),
        })
    }

    fn parse_func_def(&mut self) -> CompileResult<Decl> {
        let start_span = self.current.span;
        self.expect(TokenKind::Func)?;
        let name = self.parse_ident()?;

        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        let return_type = if self.match_token(&TokenKind::Arrow)? {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        let span = start_span.merge(body.span);

        Ok(Decl::new(
            DeclKind::Function(FuncDecl {
                name,
                params,
                return_type,
                body,
            }),
            span,
        ))
    }

    fn parse_param(&mut self) -> CompileResult<Param> {
        let start_span = self.current.span;
        let by_ref = self.match_token(&TokenKind::Var)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let span = start_span.merge(ty.span);

        Ok(Param {
            by_ref,
            name,
            ty,
            span,
        })
    }

    fn parse_type(&mut self) -> CompileResult<TypeNode> {
        let token = self.advance()?;
        let name = match token.kind {
            TokenKind::Int => "int".to_string(),
            TokenKind::Bool => "bool".to_string(),
            TokenKind::Str => "string".to_string(),
            TokenKind::Real => "real".to_string(),
            TokenKind::Char => "char".to_string(),
            TokenKind::Identifier(text) => text,
            other => {
                return Err(CompileError::parser(
                    format!("expected a type, found {}", other),
                    token.span,
                ));
            }
        };

        let mut ty = TypeNode::new(TypeNodeKind::Named(name), token.span);
        if self.check(&TokenKind::LeftBracket) {
            self.advance()?;
            let end = self.expect(TokenKind::RightBracket)?;
            let span = token.span.merge(end.span);
            ty = TypeNode::new(TypeNodeKind::Array(Box::new(ty)), span);
        }
        Ok(ty)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> CompileResult<Block> {
        let start = self.expect(TokenKind::LeftBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.at_end() {
                return Err(CompileError::parser(
                    "expected '}' before end of input",
                    self.current.span,
                ));
            }
            stmts.push(self.parse_statement()?);
        }
        let end = self.expect(TokenKind::RightBrace)?;

        Ok(Block::new(stmts, start.span.merge(end.span)))
    }

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        match self.current.kind {
            TokenKind::LeftBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Stmt::new(StmtKind::Block(block), span))
            }
            TokenKind::Const => {
                let decl = self.parse_constant_def()?;
                let span = decl.span;
                Ok(Stmt::new(StmtKind::Decl(decl), span))
            }
            TokenKind::Var => {
                let decl = self.parse_variable_def()?;
                let span = decl.span;
                Ok(Stmt::new(StmtKind::Decl(decl), span))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => {
                let stmt = self.parse_assignment_or_call()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(stmt)
            }
        }
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParen)?;
        let then_block = self.parse_block()?;

        let mut span = start_span.merge(then_block.span);
        let else_branch = if self.match_token(&TokenKind::Else)? {
            let branch = if self.check(&TokenKind::If) {
                self.parse_if_statement()?
            } else {
                let block = self.parse_block()?;
                let block_span = block.span;
                Stmt::new(StmtKind::Block(block), block_span)
            };
            span = span.merge(branch.span);
            Some(Box::new(branch))
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_block,
                else_branch,
            },
            span,
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_block()?;

        let span = start_span.merge(body.span);
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    fn parse_for_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LeftParen)?;

        let init = if self.check(&TokenKind::Var) {
            let init_span = self.current.span;
            self.advance()?;
            let name = self.parse_ident()?;
            self.expect(TokenKind::Assign)?;
            let value = self.parse_expression()?;
            let span = init_span.merge(value.span);
            Stmt::new(
                StmtKind::Decl(Decl::new(
                    DeclKind::Variable(VarDecl {
                        names: vec![name],
                        ty: None,
                        init: Some(value),
                    }),
                    span,
                )),
                span,
            )
        } else {
            self.parse_assignment_or_call()?
        };
        self.expect(TokenKind::Semicolon)?;

        let condition = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;

        let update = self.parse_assignment_or_call()?;
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_block()?;
        let span = start_span.merge(body.span);

        Ok(Stmt::new(
            StmtKind::For {
                init: Box::new(init),
                condition,
                update: Box::new(update),
                body,
            },
            span,
        ))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Return)?;

        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let end = self.expect(TokenKind::Semicolon)?;

        Ok(Stmt::new(StmtKind::Return(value), start_span.merge(end.span)))
    }

    /// Parse a statement that starts with an expression: either a call
    /// statement or an assignment to an identifier/index/field target.
    fn parse_assignment_or_call(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        let expr = self.parse_postfix()?;

        if self.match_token(&TokenKind::Assign)? {
            let value = self.parse_expression()?;
            let span = start_span.merge(value.span);
            return Ok(Stmt::new(
                StmtKind::Assign {
                    target: expr,
                    value,
                },
                span,
            ));
        }

        match expr.kind {
            ExprKind::Call { .. } => {
                let span = expr.span;
                Ok(Stmt::new(StmtKind::Call(expr), span))
            }
            _ => Err(CompileError::parser(
                "expected '=' or a call statement",
                expr.span,
            )),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_and()?;
        while self.match_token(&TokenKind::OrOr)? {
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.match_token(&TokenKind::AndAnd)? {
            let right = self.parse_equality()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current.kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_relational()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEq => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_additive()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> CompileResult<Expr> {
        let op = match self.current.kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            let start = self.advance()?;
            let operand = self.parse_unary()?;
            let span = start.span.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&TokenKind::LeftBracket) {
                self.advance()?;
                let index = self.parse_expression()?;
                let end = self.expect(TokenKind::RightBracket)?;
                let span = expr.span.merge(end.span);
                expr = Expr::new(
                    ExprKind::Index {
                        array: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.check(&TokenKind::Dot) {
                self.advance()?;
                let field = self.parse_ident()?;
                let span = expr.span.merge(field.span);
                expr = Expr::new(
                    ExprKind::Field {
                        object: Box::new(expr),
                        field,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> CompileResult<Expr> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::IntLiteral(value) => {
                Ok(Expr::new(ExprKind::IntLiteral(value), token.span))
            }
            TokenKind::RealLiteral(value) => {
                Ok(Expr::new(ExprKind::RealLiteral(value), token.span))
            }
            TokenKind::StringLiteral(value) => {
                Ok(Expr::new(ExprKind::StringLiteral(value), token.span))
            }
            TokenKind::CharLiteral(value) => {
                Ok(Expr::new(ExprKind::CharLiteral(value), token.span))
            }
            TokenKind::Identifier(text) => {
                if self.check(&TokenKind::LeftParen) {
                    self.advance()?;
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RightParen) {
                        loop {
                            args.push(self.parse_expression()?);
                            if !self.match_token(&TokenKind::Comma)? {
                                break;
                            }
                        }
                    }
                    let end = self.expect(TokenKind::RightParen)?;
                    let span = token.span.merge(end.span);
                    Ok(Expr::new(
                        ExprKind::Call {
                            name: Ident::new(text, token.span),
                            args,
                        },
                        span,
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(text), token.span))
                }
            }
            TokenKind::New => self.parse_new_expression(token.span),
            TokenKind::LeftParen => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            other => Err(CompileError::parser(
                format!("expected an expression, found {}", other),
                token.span,
            )),
        }
    }

    fn parse_new_expression(&mut self, start_span: Span) -> CompileResult<Expr> {
        let token = self.advance()?;
        let (name, name_span) = match token.kind {
            TokenKind::Int => ("int".to_string(), token.span),
            TokenKind::Bool => ("bool".to_string(), token.span),
            TokenKind::Str => ("string".to_string(), token.span),
            TokenKind::Real => ("real".to_string(), token.span),
            TokenKind::Char => ("char".to_string(), token.span),
            TokenKind::Identifier(text) => (text, token.span),
            other => {
                return Err(CompileError::parser(
                    format!("expected a type name after 'new', found {}", other),
                    token.span,
                ));
            }
        };

        if self.check(&TokenKind::LeftBracket) {
            // new int[n]
            self.advance()?;
            let length = self.parse_expression()?;
            let end = self.expect(TokenKind::RightBracket)?;
            let span = start_span.merge(end.span);
            return Ok(Expr::new(
                ExprKind::NewArray {
                    element: TypeNode::new(TypeNodeKind::Named(name), name_span),
                    length: Box::new(length),
                },
                span,
            ));
        }

        // new Point { x = 1, y = 2 }
        self.expect(TokenKind::LeftBrace)?;
        let mut fields = Vec::new();
        if !self.check(&TokenKind::RightBrace) {
            loop {
                let field_name = self.parse_ident()?;
                self.expect(TokenKind::Assign)?;
                let value = self.parse_expression()?;
                fields.push(FieldInit {
                    name: field_name,
                    value,
                });
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RightBrace)?;
        let span = start_span.merge(end.span);

        Ok(Expr::new(
            ExprKind::NewRecord {
                name: Ident::new(name, name_span),
                fields,
            },
            span,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse().unwrap()
    }

    #[test]
    fn test_minimal_program() {
        let program = parse("program p main() { }");
        assert_eq!(program.name.text, "p");
        assert!(program.globals.is_empty());
        assert!(program.main.stmts.is_empty());
    }

    #[test]
    fn test_constant_and_variable_defs() {
        let program = parse(
            r#"
            program p
            const n = 5;
            var a, b : int;
            var s = "hi";
            main() { }
            "#,
        );

        assert_eq!(program.globals.len(), 3);
        assert!(matches!(&program.globals[0].kind, DeclKind::Constant(c) if c.name.text == "n"));
        match &program.globals[1].kind {
            DeclKind::Variable(v) => {
                assert_eq!(v.names.len(), 2);
                assert!(v.ty.is_some());
                assert!(v.init.is_none());
            }
            other => panic!("expected variable decl, got {:?}", other),
        }
        match &program.globals[2].kind {
            DeclKind::Variable(v) => {
                assert_eq!(v.names.len(), 1);
                assert!(v.ty.is_none());
                assert!(v.init.is_some());
            }
            other => panic!("expected variable decl, got {:?}", other),
        }
    }

    #[test]
    fn test_record_decl() {
        let program = parse(
            r#"
            program p
            record Point {
                x, y : int;
                record Inner { z : bool; }
            }
            main() { }
            "#,
        );

        match &program.globals[0].kind {
            DeclKind::Record(record) => {
                assert_eq!(record.name.text, "Point");
                assert_eq!(record.items.len(), 2);
                assert!(matches!(&record.items[0], RecordItem::Fields(f) if f.names.len() == 2));
                assert!(
                    matches!(&record.items[1], RecordItem::Record(r) if r.name.text == "Inner")
                );
            }
            other => panic!("expected record decl, got {:?}", other),
        }
    }

    #[test]
    fn test_func_def() {
        let program = parse(
            r#"
            program p
            func add(a : int, var out : int) -> int {
                return a;
            }
            main() { }
            "#,
        );

        match &program.globals[0].kind {
            DeclKind::Function(func) => {
                assert_eq!(func.name.text, "add");
                assert_eq!(func.params.len(), 2);
                assert!(!func.params[0].by_ref);
                assert!(func.params[1].by_ref);
                assert!(func.return_type.is_some());
                assert_eq!(func.body.stmts.len(), 1);
            }
            other => panic!("expected function decl, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let program = parse("program p main() { x = 1 + 2 * 3 == 7 && true; }");

        let StmtKind::Assign { value, .. } = &program.main.stmts[0].kind else {
            panic!("expected assignment");
        };
        // && at the top
        let ExprKind::Binary { op, left, .. } = &value.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::And);
        // == below it
        let ExprKind::Binary { op, .. } = &left.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Eq);
    }

    #[test]
    fn test_new_expressions() {
        let program = parse(
            "program p main() { var a = new int[10]; var q = new Point { x = 1 }; }",
        );

        let StmtKind::Decl(decl) = &program.main.stmts[0].kind else {
            panic!("expected declaration");
        };
        let DeclKind::Variable(var) = &decl.kind else {
            panic!("expected variable");
        };
        assert!(matches!(
            var.init.as_ref().unwrap().kind,
            ExprKind::NewArray { .. }
        ));

        let StmtKind::Decl(decl) = &program.main.stmts[1].kind else {
            panic!("expected declaration");
        };
        let DeclKind::Variable(var) = &decl.kind else {
            panic!("expected variable");
        };
        assert!(matches!(
            var.init.as_ref().unwrap().kind,
            ExprKind::NewRecord { .. }
        ));
    }

    #[test]
    fn test_postfix_chains() {
        let program = parse("program p main() { m[0].next[1] = 2; }");

        let StmtKind::Assign { target, .. } = &program.main.stmts[0].kind else {
            panic!("expected assignment");
        };
        assert!(matches!(target.kind, ExprKind::Index { .. }));
    }

    #[test]
    fn test_for_statement() {
        let program = parse(
            "program p main() { for (var i = 0; i < 10; i = i + 1) { print(i); } }",
        );
        assert!(matches!(program.main.stmts[0].kind, StmtKind::For { .. }));
    }

    #[test]
    fn test_missing_semicolon_is_error() {
        let result = Parser::new("program p main() { x = 1 }").unwrap().parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_statement_must_be_assign_or_call() {
        let result = Parser::new("program p main() { x + 1; }").unwrap().parse();
        assert!(result.is_err());
    }
}
