//! Semantic analyzer: walks the parse tree, drives the scope stack and
//! populates the symbol arena
//!
//! Every semantic violation is flagged through the buffered error sink and
//! analysis continues with the best available placeholder, so one mistake
//! does not hide the rest of the program's problems. Scope pushes and pops
//! are symmetric around every scope-introducing node on every exit path.

use crate::common::{LineIndex, Span};
use crate::frontend::ast::*;

use super::arena::Arena;
use super::checker;
use super::error::{ErrorCode, SemanticErrorHandler};
use super::predefined::Predefined;
use super::scope::ScopeStack;
use super::symbol::{ConstValue, RoutineCode, RoutineInfo, SymbolId, SymbolKind};
use super::types::{TypeForm, TypeId, TypeInfo, Typespec};
use super::Analysis;

/// Result of analyzing one expression
///
/// A compile-time value carries its type alongside; an expression whose
/// type is known but whose value is not reduces to `Type`; an unresolved
/// operand is `None`, which suppresses follow-on diagnostics for the same
/// root cause.
#[derive(Debug, Clone)]
pub enum Analyzed {
    Value { value: ConstValue, ty: TypeId },
    Type(TypeId),
    None,
}

/// Check the semantics of a Javana program and populate the symbol arena
pub struct SemanticAnalyzer<'a> {
    source: &'a str,
    lines: LineIndex,
    arena: Arena,
    stack: ScopeStack,
    predefined: Predefined,
    errors: SemanticErrorHandler,
    program_id: Option<SymbolId>,
    current_function: Option<SymbolId>,
    /// Unexecuted function bodies, indexed by `RoutineInfo::body`
    bodies: Vec<&'a FuncDecl>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut arena = Arena::new();
        let mut stack = ScopeStack::new(&mut arena);
        let predefined = Predefined::initialize(&mut arena, &mut stack);

        Self {
            source,
            lines: LineIndex::new(source),
            arena,
            stack,
            predefined,
            errors: SemanticErrorHandler::new(),
            program_id: None,
            current_function: None,
            bodies: Vec::new(),
        }
    }

    /// Walk the whole program and return the finished analysis artifact
    pub fn analyze(mut self, program: &'a Program) -> Analysis {
        self.visit_program(program);
        debug_assert_eq!(
            self.stack.current_nesting_level(),
            1,
            "scope pushes and pops must balance"
        );

        Analysis {
            arena: self.arena,
            predefined: self.predefined,
            program: self.program_id,
            errors: self.errors,
        }
    }

    // =========================================================================
    // Diagnostics and small helpers
    // =========================================================================

    fn flag(&mut self, code: ErrorCode, span: Span) {
        let line = self.lines.line_of_span(span);
        let text = self
            .source
            .get(span.start..span.end)
            .unwrap_or("")
            .trim()
            .to_string();
        self.errors.flag(code, line, text, span);
    }

    /// Record a source line that references `symbol`
    fn reference(&mut self, symbol: SymbolId, span: Span) {
        let line = self.lines.line_of_span(span);
        self.arena.symbol_mut(symbol).append_line(line);
    }

    /// Filter out the undefined placeholder type
    fn known(&self, type_id: TypeId) -> Option<TypeId> {
        (type_id != self.predefined.undefined_type).then_some(type_id)
    }

    /// Wrap a type as an expression result, degrading placeholders to
    /// `Analyzed::None`
    fn typed(&self, type_id: TypeId) -> Analyzed {
        match self.known(type_id) {
            Some(ty) => Analyzed::Type(ty),
            None => Analyzed::None,
        }
    }

    fn analyzed_type(&self, analyzed: &Analyzed) -> Option<TypeId> {
        match analyzed {
            Analyzed::Value { ty, .. } => self.known(*ty),
            Analyzed::Type(ty) => self.known(*ty),
            Analyzed::None => None,
        }
    }

    // =========================================================================
    // Program structure
    // =========================================================================

    fn visit_program(&mut self, program: &'a Program) {
        // Program header: the program symbol owns the program-level scope.
        let program_id =
            self.stack
                .enter_local(&mut self.arena, &program.name.text, SymbolKind::Program);
        self.reference(program_id, program.name.span);

        let program_scope = self.stack.push(&mut self.arena);
        self.arena.scope_mut(program_scope).set_owner(program_id);
        let mut routine = RoutineInfo::declared(None);
        routine.scope = Some(program_scope);
        routine.body_checked = true;
        self.arena.symbol_mut(program_id).routine = Some(routine);

        self.stack.set_program_id(program_id);
        self.program_id = Some(program_id);

        for decl in &program.globals {
            self.visit_decl(decl);
        }

        // Main routine body in its own scope.
        self.stack.push(&mut self.arena);
        self.visit_block(&program.main);
        self.stack.pop();

        // Routines the program never calls still get their bodies checked,
        // in declaration order.
        let pending: Vec<SymbolId> = self
            .arena
            .scope(program_scope)
            .symbols()
            .iter()
            .copied()
            .filter(|&id| {
                let symbol = self.arena.symbol(id);
                symbol.kind == SymbolKind::Function
                    && symbol.routine().is_some_and(|r| !r.body_checked)
            })
            .collect();
        for id in pending {
            self.check_function_body(id);
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn visit_decl(&mut self, decl: &'a Decl) {
        match &decl.kind {
            DeclKind::Constant(constant) => self.visit_constant_def(constant),
            DeclKind::Variable(variable) => self.visit_variable_def(variable),
            DeclKind::Record(record) => {
                self.visit_record_decl(record);
            }
            DeclKind::Function(func) => self.visit_func_decl(func),
        }
    }

    fn visit_constant_def(&mut self, constant: &'a ConstantDef) {
        if let Some(existing) = self.stack.lookup_local(&self.arena, &constant.name.text) {
            self.flag(ErrorCode::RedeclaredIdentifier, constant.name.span);
            self.reference(existing, constant.name.span);
            self.visit_expr(&constant.init);
            return;
        }

        let analyzed = self.visit_expr(&constant.init);
        let constant_id =
            self.stack
                .enter_local(&mut self.arena, &constant.name.text, SymbolKind::Constant);

        let symbol = self.arena.symbol_mut(constant_id);
        match analyzed {
            Analyzed::Value { value, ty } => {
                symbol.value = Some(value);
                symbol.type_id = Some(ty);
            }
            Analyzed::Type(ty) => symbol.type_id = Some(ty),
            Analyzed::None => symbol.type_id = Some(self.predefined.undefined_type),
        }
        self.reference(constant_id, constant.name.span);
    }

    fn visit_variable_def(&mut self, variable: &'a VarDecl) {
        // Initialized form: the type comes from the initializer and the
        // evaluated value is cached on the symbol.
        if let Some(init) = &variable.init {
            let analyzed = self.visit_expr(init);
            let name = &variable.names[0];

            if let Some(existing) = self.stack.lookup_local(&self.arena, &name.text) {
                self.flag(ErrorCode::RedeclaredIdentifier, name.span);
                self.reference(existing, name.span);
                return;
            }

            let variable_id =
                self.stack
                    .enter_local(&mut self.arena, &name.text, SymbolKind::Variable);
            let symbol = self.arena.symbol_mut(variable_id);
            match analyzed {
                Analyzed::Value { value, ty } => {
                    symbol.value = Some(value);
                    symbol.type_id = Some(ty);
                }
                Analyzed::Type(ty) => symbol.type_id = Some(ty),
                Analyzed::None => symbol.type_id = Some(self.predefined.undefined_type),
            }
            self.reference(variable_id, name.span);
            return;
        }

        // Annotated form: one type for every declared name.
        let type_id = match &variable.ty {
            Some(ty) => self.resolve_type_node(ty),
            None => self.predefined.undefined_type,
        };

        for name in &variable.names {
            if let Some(existing) = self.stack.lookup_local(&self.arena, &name.text) {
                self.flag(ErrorCode::RedeclaredIdentifier, name.span);
                self.reference(existing, name.span);
                continue;
            }
            let variable_id =
                self.stack
                    .enter_local(&mut self.arena, &name.text, SymbolKind::Variable);
            self.arena.symbol_mut(variable_id).type_id = Some(type_id);
            self.reference(variable_id, name.span);
        }
    }

    /// Elaborate a record declaration: register the type name, build the
    /// field scope owned by it, then derive the nominal type path
    fn visit_record_decl(&mut self, record: &'a RecordDecl) -> Option<TypeId> {
        if let Some(existing) = self.stack.lookup_local(&self.arena, &record.name.text) {
            self.flag(ErrorCode::RedeclaredIdentifier, record.name.span);
            self.reference(existing, record.name.span);
            return None;
        }

        let record_id =
            self.stack
                .enter_local(&mut self.arena, &record.name.text, SymbolKind::Type);
        self.reference(record_id, record.name.span);

        let field_scope = self.stack.push(&mut self.arena);
        self.arena.scope_mut(field_scope).set_owner(record_id);

        let type_id = self.arena.add_type(Typespec::record(field_scope));
        self.arena.typespec_mut(type_id).identifier = Some(record_id);
        self.arena.symbol_mut(record_id).type_id = Some(type_id);

        for item in &record.items {
            match item {
                RecordItem::Fields(group) => {
                    let field_type = self.resolve_type_node(&group.ty);
                    for name in &group.names {
                        if let Some(existing) = self.stack.lookup_local(&self.arena, &name.text) {
                            self.flag(ErrorCode::RedeclaredIdentifier, name.span);
                            self.reference(existing, name.span);
                            continue;
                        }
                        let field_id = self.stack.enter_local(
                            &mut self.arena,
                            &name.text,
                            SymbolKind::RecordField,
                        );
                        self.arena.symbol_mut(field_id).type_id = Some(field_type);
                        self.reference(field_id, name.span);
                    }
                }
                RecordItem::Record(nested) => {
                    self.visit_record_decl(nested);
                }
            }
        }

        // The nominal key follows owner back-references up to the program.
        let path = self.arena.type_path(record_id);
        if let TypeInfo::Record { type_path, .. } = &mut self.arena.typespec_mut(type_id).info {
            *type_path = path;
        }

        self.stack.pop();
        Some(type_id)
    }

    /// Elaborate a function prototype and bind the body for deferred
    /// checking
    fn visit_func_decl(&mut self, func: &'a FuncDecl) {
        let return_type = func.return_type.as_ref().map(|ty| self.resolve_type_node(ty));

        if let Some(existing) = self.stack.lookup_local(&self.arena, &func.name.text) {
            self.flag(ErrorCode::RedeclaredIdentifier, func.name.span);
            self.reference(existing, func.name.span);
            return;
        }

        let fn_id = self
            .stack
            .enter_local(&mut self.arena, &func.name.text, SymbolKind::Function);
        self.reference(fn_id, func.name.span);

        let mut routine = RoutineInfo::declared(return_type);

        // The routine's own scope holds its parameters and is re-entered
        // whenever the body is checked.
        let fn_scope = self.stack.push(&mut self.arena);
        self.arena.scope_mut(fn_scope).set_owner(fn_id);

        for param in &func.params {
            if let Some(existing) = self.stack.lookup_local(&self.arena, &param.name.text) {
                self.flag(ErrorCode::RedeclaredIdentifier, param.name.span);
                self.reference(existing, param.name.span);
                continue;
            }
            let kind = if param.by_ref {
                SymbolKind::ReferenceParameter
            } else {
                SymbolKind::ValueParameter
            };
            let param_type = self.resolve_type_node(&param.ty);
            let param_id = self
                .stack
                .enter_local(&mut self.arena, &param.name.text, kind);
            self.arena.symbol_mut(param_id).type_id = Some(param_type);
            self.reference(param_id, param.name.span);
            routine.params.push(param_id);
        }

        self.stack.pop();

        // Bind the body only after the prototype is complete, so the body
        // may call this routine or routines declared later at this level.
        routine.scope = Some(fn_scope);
        routine.body = Some(self.bodies.len());
        self.bodies.push(func);
        self.arena.symbol_mut(fn_id).routine = Some(routine);
    }

    /// Check a routine body once, against exactly the global scope, the
    /// program scope and the routine's own scope
    fn check_function_body(&mut self, fn_id: SymbolId) {
        let Some(routine) = self.arena.symbol(fn_id).routine() else {
            return;
        };
        if routine.body_checked {
            return;
        }
        let (Some(fn_scope), Some(body_index)) = (routine.scope, routine.body) else {
            return;
        };

        // Mark first: a recursive call inside the body stops here.
        if let Some(routine) = self.arena.symbol_mut(fn_id).routine_mut() {
            routine.body_checked = true;
        }

        let func = self.bodies[body_index];
        let frame = self.stack.begin_call_frame(fn_scope);
        let saved_function = self.current_function.replace(fn_id);

        self.visit_block(&func.body);

        self.current_function = saved_function;
        self.stack.end_call_frame(frame);
    }

    /// Resolve a type annotation to a type, flagging failures and falling
    /// back to the undefined placeholder
    fn resolve_type_node(&mut self, ty: &TypeNode) -> TypeId {
        let spelling = ty.spelling();
        if let Some(type_id) =
            checker::type_from_keyword(&mut self.arena, &self.predefined, &spelling)
        {
            return type_id;
        }

        match &ty.kind {
            TypeNodeKind::Named(name) => match self.stack.lookup(&self.arena, name) {
                Some(symbol_id) => {
                    self.reference(symbol_id, ty.span);
                    let symbol = self.arena.symbol(symbol_id);
                    if symbol.kind == SymbolKind::Type {
                        symbol.type_id.unwrap_or(self.predefined.undefined_type)
                    } else {
                        self.flag(ErrorCode::InvalidType, ty.span);
                        self.predefined.undefined_type
                    }
                }
                None => {
                    self.flag(ErrorCode::UndeclaredIdentifier, ty.span);
                    self.predefined.undefined_type
                }
            },
            TypeNodeKind::Array(element) => {
                let element_type = self.resolve_type_node(element);
                if self.known(element_type).is_none() {
                    return self.predefined.undefined_type;
                }
                self.arena.add_type(Typespec::array(
                    element_type,
                    self.predefined.integer_type,
                    0,
                ))
            }
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn visit_block(&mut self, block: &'a Block) {
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Block(block) => {
                self.stack.push(&mut self.arena);
                self.visit_block(block);
                self.stack.pop();
            }
            StmtKind::Decl(decl) => self.visit_decl(decl),
            StmtKind::Assign { target, value } => self.visit_assignment(stmt, target, value),
            StmtKind::Call(call) => {
                self.visit_expr(call);
            }
            StmtKind::If {
                condition,
                then_block,
                else_branch,
            } => {
                self.check_boolean(condition);
                self.stack.push(&mut self.arena);
                self.visit_block(then_block);
                self.stack.pop();
                if let Some(else_branch) = else_branch {
                    // A block arm pushes its own scope; an else-if recurses.
                    self.visit_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.check_boolean(condition);
                self.stack.push(&mut self.arena);
                self.visit_block(body);
                self.stack.pop();
            }
            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => {
                self.stack.push(&mut self.arena);

                let init_type = self.visit_for_clause(init);
                self.require_integer(init_type, init.span);

                self.check_boolean(condition);

                let update_type = self.visit_for_clause(update);
                self.require_integer(update_type, update.span);

                self.stack.push(&mut self.arena);
                self.visit_block(body);
                self.stack.pop();

                self.stack.pop();
            }
            StmtKind::Return(value) => self.visit_return(stmt, value.as_ref()),
        }
    }

    fn visit_assignment(&mut self, stmt: &'a Stmt, target: &'a Expr, value: &'a Expr) {
        let target_type = self.visit_target(target);
        let analyzed = self.visit_expr(value);
        let value_type = self.analyzed_type(&analyzed);

        if let (Some(target_type), Some(value_type)) = (target_type, value_type) {
            if !checker::assignment_compatible(
                &self.arena,
                &self.predefined,
                target_type,
                value_type,
            ) {
                self.flag(ErrorCode::IncompatibleAssignment, stmt.span);
            }
        }
    }

    /// Type an assignment target: a variable name, an array element or a
    /// record field
    fn visit_target(&mut self, target: &'a Expr) -> Option<TypeId> {
        match &target.kind {
            ExprKind::Identifier(name) => match self.stack.lookup(&self.arena, name) {
                None => {
                    self.flag(ErrorCode::UndeclaredIdentifier, target.span);
                    None
                }
                Some(symbol_id) => {
                    self.reference(symbol_id, target.span);
                    let symbol = self.arena.symbol(symbol_id);
                    match symbol.kind {
                        SymbolKind::Variable
                        | SymbolKind::ValueParameter
                        | SymbolKind::ReferenceParameter
                        | SymbolKind::RecordField => symbol.type_id.and_then(|ty| self.known(ty)),
                        _ => {
                            self.flag(ErrorCode::IncompatibleAssignment, target.span);
                            None
                        }
                    }
                }
            },
            ExprKind::Index { .. } | ExprKind::Field { .. } => {
                let analyzed = self.visit_expr(target);
                self.analyzed_type(&analyzed)
            }
            _ => {
                self.flag(ErrorCode::IncompatibleAssignment, target.span);
                None
            }
        }
    }

    fn check_boolean(&mut self, condition: &'a Expr) {
        let analyzed = self.visit_expr(condition);
        if let Some(ty) = self.analyzed_type(&analyzed) {
            if !checker::is_boolean(&self.predefined, ty) {
                self.flag(ErrorCode::TypeMustBeBoolean, condition.span);
            }
        }
    }

    fn require_integer(&mut self, type_id: Option<TypeId>, span: Span) {
        if let Some(ty) = type_id {
            if !checker::is_integer(&self.predefined, ty) {
                self.flag(ErrorCode::TypeMustBeInteger, span);
            }
        }
    }

    /// Visit a `for` initializer or update clause and report its type
    fn visit_for_clause(&mut self, stmt: &'a Stmt) -> Option<TypeId> {
        match &stmt.kind {
            StmtKind::Decl(decl) => {
                self.visit_decl(decl);
                if let DeclKind::Variable(variable) = &decl.kind {
                    let name = variable.names.first()?;
                    let symbol_id = self.stack.lookup_local(&self.arena, &name.text)?;
                    return self
                        .arena
                        .symbol(symbol_id)
                        .type_id
                        .and_then(|ty| self.known(ty));
                }
                None
            }
            StmtKind::Assign { target, value } => {
                let target_type = self.visit_target(target);
                let analyzed = self.visit_expr(value);
                let value_type = self.analyzed_type(&analyzed);
                if let (Some(target_type), Some(value_type)) = (target_type, value_type) {
                    if !checker::assignment_compatible(
                        &self.arena,
                        &self.predefined,
                        target_type,
                        value_type,
                    ) {
                        self.flag(ErrorCode::IncompatibleAssignment, stmt.span);
                    }
                }
                target_type
            }
            StmtKind::Call(call) => {
                let analyzed = self.visit_expr(call);
                self.analyzed_type(&analyzed)
            }
            _ => {
                self.visit_stmt(stmt);
                None
            }
        }
    }

    fn visit_return(&mut self, stmt: &'a Stmt, value: Option<&'a Expr>) {
        let declared = self
            .current_function
            .and_then(|fn_id| self.arena.symbol(fn_id).routine())
            .and_then(|routine| routine.return_type)
            .and_then(|ty| self.known(ty));

        match (value, declared) {
            (Some(expr), Some(return_type)) => {
                let analyzed = self.visit_expr(expr);
                if let Some(value_type) = self.analyzed_type(&analyzed) {
                    if !checker::assignment_compatible(
                        &self.arena,
                        &self.predefined,
                        return_type,
                        value_type,
                    ) {
                        self.flag(ErrorCode::InvalidReturnType, expr.span);
                    }
                }
            }
            (Some(expr), None) => {
                self.visit_expr(expr);
                self.flag(ErrorCode::InvalidReturnType, stmt.span);
            }
            (None, Some(_)) => self.flag(ErrorCode::InvalidReturnType, stmt.span),
            (None, None) => {}
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn visit_expr(&mut self, expr: &'a Expr) -> Analyzed {
        match &expr.kind {
            ExprKind::IntLiteral(value) => self.literal(ConstValue::Integer(*value)),
            ExprKind::RealLiteral(value) => self.literal(ConstValue::Real(*value)),
            ExprKind::StringLiteral(value) => self.literal(ConstValue::Str(value.clone())),
            ExprKind::CharLiteral(value) => self.literal(ConstValue::Character(*value)),
            ExprKind::Identifier(name) => self.visit_identifier(name, expr.span),
            ExprKind::Binary { op, left, right } => self.visit_binary(*op, left, right, expr.span),
            ExprKind::Unary { op, operand } => self.visit_unary(*op, operand, expr.span),
            ExprKind::Call { name, args } => self.visit_call(name, args, expr.span),
            ExprKind::Index { array, index } => self.visit_index(array, index),
            ExprKind::Field { object, field } => self.visit_field_access(object, field),
            ExprKind::NewArray { element, length } => self.visit_new_array(element, length),
            ExprKind::NewRecord { name, fields } => self.visit_new_record(name, fields),
        }
    }

    fn literal(&self, value: ConstValue) -> Analyzed {
        let ty = checker::type_of_value(&self.predefined, &value);
        Analyzed::Value { value, ty }
    }

    fn visit_identifier(&mut self, name: &str, span: Span) -> Analyzed {
        let Some(symbol_id) = self.stack.lookup(&self.arena, name) else {
            self.flag(ErrorCode::UndeclaredIdentifier, span);
            return Analyzed::None;
        };
        self.reference(symbol_id, span);

        let symbol = self.arena.symbol(symbol_id);
        match symbol.kind {
            SymbolKind::Constant | SymbolKind::EnumerationConstant => {
                match (&symbol.value, symbol.type_id) {
                    (Some(value), Some(ty)) if self.known(ty).is_some() => Analyzed::Value {
                        value: value.clone(),
                        ty,
                    },
                    (_, Some(ty)) => self.typed(ty),
                    _ => Analyzed::None,
                }
            }
            SymbolKind::Variable
            | SymbolKind::ValueParameter
            | SymbolKind::ReferenceParameter
            | SymbolKind::RecordField
            | SymbolKind::ProgramParameter => match symbol.type_id {
                Some(ty) => self.typed(ty),
                None => Analyzed::None,
            },
            // Types, routines and the program name are not values.
            SymbolKind::Type | SymbolKind::Function | SymbolKind::Program => Analyzed::None,
        }
    }

    fn visit_binary(
        &mut self,
        op: BinaryOp,
        left: &'a Expr,
        right: &'a Expr,
        span: Span,
    ) -> Analyzed {
        let left_analyzed = self.visit_expr(left);
        let right_analyzed = self.visit_expr(right);

        let (Some(left_type), Some(right_type)) = (
            self.analyzed_type(&left_analyzed),
            self.analyzed_type(&right_analyzed),
        ) else {
            return Analyzed::None;
        };

        if op == BinaryOp::Mod {
            if !checker::is_integer(&self.predefined, left_type)
                || !checker::is_integer(&self.predefined, right_type)
            {
                self.flag(ErrorCode::TypeMustBeInteger, span);
                return Analyzed::None;
            }
            return self.arithmetic_result(op, &left_analyzed, &right_analyzed, false);
        }

        if op.is_arithmetic() {
            // String concatenation rides on '+'.
            if checker::is_string(&self.predefined, left_type)
                || checker::is_string(&self.predefined, right_type)
            {
                if op == BinaryOp::Add
                    && checker::is_string(&self.predefined, left_type)
                    && checker::is_string(&self.predefined, right_type)
                {
                    return self.arithmetic_result(op, &left_analyzed, &right_analyzed, false);
                }
                self.flag(ErrorCode::TypeMustBeString, span);
                return Analyzed::None;
            }

            if !checker::is_numeric(&self.predefined, left_type)
                || !checker::is_numeric(&self.predefined, right_type)
            {
                self.flag(ErrorCode::InvalidOperator, span);
                return Analyzed::None;
            }
            let widens = checker::is_real(&self.predefined, left_type)
                || checker::is_real(&self.predefined, right_type);
            return self.arithmetic_result(op, &left_analyzed, &right_analyzed, widens);
        }

        if op.is_relational() || op.is_equality() {
            if !checker::comparison_compatible(&self.arena, &self.predefined, left_type, right_type)
            {
                self.flag(ErrorCode::IncompatibleComparison, span);
                return Analyzed::None;
            }
            return self.folded_or(op, &left_analyzed, &right_analyzed, self.predefined.boolean_type);
        }

        // Logical operators.
        if !checker::is_boolean(&self.predefined, left_type)
            || !checker::is_boolean(&self.predefined, right_type)
        {
            self.flag(ErrorCode::TypeMustBeBoolean, span);
            return Analyzed::None;
        }
        self.folded_or(op, &left_analyzed, &right_analyzed, self.predefined.boolean_type)
    }

    /// Result of a numeric or string arithmetic operation, folded when both
    /// operands are compile-time values
    fn arithmetic_result(
        &self,
        op: BinaryOp,
        left: &Analyzed,
        right: &Analyzed,
        widens: bool,
    ) -> Analyzed {
        if let Some(folded) = fold_operands(op, left, right) {
            let ty = checker::type_of_value(&self.predefined, &folded);
            return Analyzed::Value { value: folded, ty };
        }
        let ty = if widens {
            self.predefined.real_type
        } else {
            match self.analyzed_type(left) {
                Some(ty) if checker::is_string(&self.predefined, ty) => self.predefined.string_type,
                _ => self.predefined.integer_type,
            }
        };
        Analyzed::Type(ty)
    }

    /// Fold when possible, otherwise produce `result_type`
    fn folded_or(
        &self,
        op: BinaryOp,
        left: &Analyzed,
        right: &Analyzed,
        result_type: TypeId,
    ) -> Analyzed {
        if let Some(folded) = fold_operands(op, left, right) {
            let ty = checker::type_of_value(&self.predefined, &folded);
            return Analyzed::Value { value: folded, ty };
        }
        Analyzed::Type(result_type)
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: &'a Expr, span: Span) -> Analyzed {
        let analyzed = self.visit_expr(operand);
        let Some(operand_type) = self.analyzed_type(&analyzed) else {
            return Analyzed::None;
        };

        match op {
            UnaryOp::Neg => {
                if !checker::is_numeric(&self.predefined, operand_type) {
                    self.flag(ErrorCode::TypeMustBeInteger, span);
                    return Analyzed::None;
                }
                match analyzed {
                    Analyzed::Value {
                        value: ConstValue::Integer(v),
                        ..
                    } => self.literal(ConstValue::Integer(-v)),
                    Analyzed::Value {
                        value: ConstValue::Real(v),
                        ..
                    } => self.literal(ConstValue::Real(-v)),
                    _ => Analyzed::Type(operand_type),
                }
            }
            UnaryOp::Not => {
                if !checker::is_boolean(&self.predefined, operand_type) {
                    self.flag(ErrorCode::TypeMustBeBoolean, span);
                    return Analyzed::None;
                }
                match analyzed {
                    Analyzed::Value {
                        value: ConstValue::Boolean(v),
                        ..
                    } => self.literal(ConstValue::Boolean(!v)),
                    _ => Analyzed::Type(operand_type),
                }
            }
        }
    }

    fn visit_index(&mut self, array: &'a Expr, index: &'a Expr) -> Analyzed {
        let array_analyzed = self.visit_expr(array);
        let index_analyzed = self.visit_expr(index);

        if let Some(index_type) = self.analyzed_type(&index_analyzed) {
            if !checker::is_integer(&self.predefined, index_type) {
                self.flag(ErrorCode::TypeMustBeInteger, index.span);
            }
        }

        let Some(array_type) = self.analyzed_type(&array_analyzed) else {
            return Analyzed::None;
        };
        let typespec = self.arena.typespec(array_type);
        if typespec.form != TypeForm::Array {
            self.flag(ErrorCode::TypeMustBeArray, array.span);
            return Analyzed::None;
        }
        let element = typespec.element_type();
        let count = typespec.element_count().unwrap_or(0);

        // A constant index is checked against a statically known count.
        if let Analyzed::Value {
            value: ConstValue::Integer(position),
            ..
        } = index_analyzed
        {
            let out_of_static_bounds = count > 0 && position >= count as i64;
            if position < 0 || out_of_static_bounds {
                self.flag(ErrorCode::IndexOutOfBounds, index.span);
            }
        }

        match element {
            Some(element) => self.typed(element),
            None => Analyzed::None,
        }
    }

    fn visit_field_access(&mut self, object: &'a Expr, field: &Ident) -> Analyzed {
        let analyzed = self.visit_expr(object);
        let Some(object_type) = self.analyzed_type(&analyzed) else {
            return Analyzed::None;
        };

        let Some(field_scope) = self.arena.typespec(object_type).field_scope() else {
            self.flag(ErrorCode::InvalidType, object.span);
            return Analyzed::None;
        };

        match self.arena.lookup_in(field_scope, &field.text) {
            None => {
                self.flag(ErrorCode::UndeclaredIdentifier, field.span);
                Analyzed::None
            }
            Some(field_id) => {
                self.reference(field_id, field.span);
                match self.arena.symbol(field_id).type_id {
                    Some(ty) => self.typed(ty),
                    None => Analyzed::None,
                }
            }
        }
    }

    fn visit_new_array(&mut self, element: &TypeNode, length: &'a Expr) -> Analyzed {
        let element_type = self.resolve_type_node(element);

        let length_analyzed = self.visit_expr(length);
        if let Some(length_type) = self.analyzed_type(&length_analyzed) {
            if !checker::is_integer(&self.predefined, length_type) {
                self.flag(ErrorCode::TypeMustBeInteger, length.span);
            }
        }

        // A constant length fixes the count; anything else stays unsized.
        let count = match length_analyzed {
            Analyzed::Value {
                value: ConstValue::Integer(n),
                ..
            } => {
                if n < 0 {
                    self.flag(ErrorCode::InvalidType, length.span);
                    0
                } else {
                    n as usize
                }
            }
            _ => 0,
        };

        if self.known(element_type).is_none() {
            return Analyzed::None;
        }
        let array_type = self.arena.add_type(Typespec::array(
            element_type,
            self.predefined.integer_type,
            count,
        ));
        Analyzed::Type(array_type)
    }

    fn visit_new_record(&mut self, name: &Ident, fields: &'a [FieldInit]) -> Analyzed {
        let record = self
            .stack
            .lookup(&self.arena, &name.text)
            .map(|symbol_id| {
                let symbol = self.arena.symbol(symbol_id);
                (symbol_id, symbol.kind, symbol.type_id)
            });

        let (record_type, field_scope) = match record {
            None => {
                self.flag(ErrorCode::UndeclaredIdentifier, name.span);
                (None, None)
            }
            Some((symbol_id, SymbolKind::Type, Some(type_id)))
                if self.arena.typespec(type_id).form == TypeForm::Record =>
            {
                self.reference(symbol_id, name.span);
                (Some(type_id), self.arena.typespec(type_id).field_scope())
            }
            Some((symbol_id, _, _)) => {
                self.reference(symbol_id, name.span);
                self.flag(ErrorCode::InvalidType, name.span);
                (None, None)
            }
        };

        // The literal gets its own scope so duplicate field initializers
        // surface as redeclarations.
        self.stack.push(&mut self.arena);
        for init in fields {
            if self
                .stack
                .lookup_local(&self.arena, &init.name.text)
                .is_some()
            {
                self.flag(ErrorCode::RedeclaredIdentifier, init.name.span);
            } else {
                self.stack
                    .enter_local(&mut self.arena, &init.name.text, SymbolKind::RecordField);
            }

            let analyzed = self.visit_expr(&init.value);
            let value_type = self.analyzed_type(&analyzed);

            let Some(field_scope) = field_scope else {
                continue;
            };
            match self.arena.lookup_in(field_scope, &init.name.text) {
                None => self.flag(ErrorCode::UndeclaredIdentifier, init.name.span),
                Some(field_id) => {
                    self.reference(field_id, init.name.span);
                    let field_type = self
                        .arena
                        .symbol(field_id)
                        .type_id
                        .and_then(|ty| self.known(ty));
                    if let (Some(field_type), Some(value_type)) = (field_type, value_type) {
                        if !checker::assignment_compatible(
                            &self.arena,
                            &self.predefined,
                            field_type,
                            value_type,
                        ) {
                            self.flag(ErrorCode::TypeMismatch, init.value.span);
                        }
                    }
                }
            }
        }
        self.stack.pop();

        match record_type {
            Some(type_id) => Analyzed::Type(type_id),
            None => Analyzed::None,
        }
    }

    fn visit_call(&mut self, name: &Ident, args: &'a [Expr], span: Span) -> Analyzed {
        let Some(fn_id) = self.stack.lookup(&self.arena, &name.text) else {
            self.flag(ErrorCode::UndeclaredIdentifier, name.span);
            for arg in args {
                self.visit_expr(arg);
            }
            return Analyzed::None;
        };
        self.reference(fn_id, name.span);

        if self.arena.symbol(fn_id).kind != SymbolKind::Function {
            self.flag(ErrorCode::NameMustBeFunction, name.span);
            for arg in args {
                self.visit_expr(arg);
            }
            return Analyzed::None;
        }

        let Some(routine) = self.arena.symbol(fn_id).routine().cloned() else {
            return Analyzed::None;
        };

        match routine.code {
            // print and println take any number of printable arguments.
            RoutineCode::Print | RoutineCode::Println => {
                for arg in args {
                    let analyzed = self.visit_expr(arg);
                    if let Some(arg_type) = self.analyzed_type(&analyzed) {
                        let form = self.arena.typespec(arg_type).form;
                        if !matches!(form, TypeForm::Scalar | TypeForm::Enumeration) {
                            self.flag(ErrorCode::TypeMismatch, arg.span);
                        }
                    }
                }
                Analyzed::None
            }

            // read and readln take no arguments and produce a string.
            RoutineCode::Read | RoutineCode::Readln => {
                if !args.is_empty() {
                    self.flag(ErrorCode::ArgumentCountMismatch, span);
                    for arg in args {
                        self.visit_expr(arg);
                    }
                }
                match routine.return_type {
                    Some(ty) => self.typed(ty),
                    None => Analyzed::None,
                }
            }

            RoutineCode::Declared => {
                if args.len() != routine.params.len() {
                    self.flag(ErrorCode::ArgumentCountMismatch, span);
                }

                for (position, arg) in args.iter().enumerate() {
                    let analyzed = self.visit_expr(arg);
                    let Some(&param_id) = routine.params.get(position) else {
                        continue;
                    };
                    let param = self.arena.symbol(param_id);
                    let param_kind = param.kind;
                    let Some(param_type) = param.type_id.and_then(|ty| self.known(ty)) else {
                        continue;
                    };

                    if param_kind == SymbolKind::ReferenceParameter {
                        if !self.is_variable_of_type(arg, param_type) {
                            self.flag(ErrorCode::TypeMismatch, arg.span);
                        }
                    } else if let Some(arg_type) = self.analyzed_type(&analyzed) {
                        if !checker::assignment_compatible(
                            &self.arena,
                            &self.predefined,
                            param_type,
                            arg_type,
                        ) {
                            self.flag(ErrorCode::TypeMismatch, arg.span);
                        }
                    }
                }

                // First call: check the body under the redirected chain.
                self.check_function_body(fn_id);

                match routine.return_type {
                    Some(ty) => self.typed(ty),
                    None => Analyzed::None,
                }
            }
        }
    }

    /// A reference argument must be a bare identifier naming a variable or
    /// parameter whose type is identical to the parameter's
    fn is_variable_of_type(&self, arg: &Expr, expected: TypeId) -> bool {
        let ExprKind::Identifier(name) = &arg.kind else {
            return false;
        };
        let Some(symbol_id) = self.stack.lookup(&self.arena, name) else {
            return false;
        };
        let symbol = self.arena.symbol(symbol_id);
        matches!(
            symbol.kind,
            SymbolKind::Variable | SymbolKind::ValueParameter | SymbolKind::ReferenceParameter
        ) && symbol.type_id == Some(expected)
    }
}

/// Fold a binary operator over two compile-time operands
///
/// Returns `None` when either operand is not a value, when the value
/// categories do not admit the operator, or when folding would divide by
/// zero; the caller then falls back to the static result type.
fn fold_operands(op: BinaryOp, left: &Analyzed, right: &Analyzed) -> Option<ConstValue> {
    let (Analyzed::Value { value: left, .. }, Analyzed::Value { value: right, .. }) =
        (left, right)
    else {
        return None;
    };
    fold_binary(op, left, right)
}

fn fold_binary(op: BinaryOp, left: &ConstValue, right: &ConstValue) -> Option<ConstValue> {
    use ConstValue::*;

    match (left, right) {
        (Integer(a), Integer(b)) => match op {
            BinaryOp::Add => Some(Integer(a.wrapping_add(*b))),
            BinaryOp::Sub => Some(Integer(a.wrapping_sub(*b))),
            BinaryOp::Mul => Some(Integer(a.wrapping_mul(*b))),
            BinaryOp::Div => (*b != 0).then(|| Integer(a.wrapping_div(*b))),
            BinaryOp::Mod => (*b != 0).then(|| Integer(a.wrapping_rem(*b))),
            _ => fold_ordering(op, a.cmp(b)),
        },
        (Integer(_) | Real(_), Integer(_) | Real(_)) => {
            let a = as_real(left)?;
            let b = as_real(right)?;
            match op {
                BinaryOp::Add => Some(Real(a + b)),
                BinaryOp::Sub => Some(Real(a - b)),
                BinaryOp::Mul => Some(Real(a * b)),
                BinaryOp::Div => (b != 0.0).then(|| Real(a / b)),
                BinaryOp::Mod => None,
                _ => fold_ordering(op, a.partial_cmp(&b)?),
            }
        }
        (Str(a), Str(b)) => match op {
            BinaryOp::Add => Some(Str(format!("{}{}", a, b))),
            _ => fold_ordering(op, a.cmp(b)),
        },
        (Character(a), Character(b)) => fold_ordering(op, a.cmp(b)),
        (Boolean(a), Boolean(b)) => match op {
            BinaryOp::And => Some(Boolean(*a && *b)),
            BinaryOp::Or => Some(Boolean(*a || *b)),
            BinaryOp::Eq => Some(Boolean(a == b)),
            BinaryOp::Ne => Some(Boolean(a != b)),
            _ => None,
        },
        _ => None,
    }
}

fn as_real(value: &ConstValue) -> Option<f64> {
    match value {
        ConstValue::Integer(v) => Some(*v as f64),
        ConstValue::Real(v) => Some(*v),
        _ => None,
    }
}

fn fold_ordering(op: BinaryOp, ordering: std::cmp::Ordering) -> Option<ConstValue> {
    let result = match op {
        BinaryOp::Eq => ordering.is_eq(),
        BinaryOp::Ne => ordering.is_ne(),
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Ge => ordering.is_ge(),
        _ => return None,
    };
    Some(ConstValue::Boolean(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Parser;

    fn analyze(source: &str) -> Analysis {
        let program = Parser::new(source).unwrap().parse().unwrap();
        SemanticAnalyzer::new(source).analyze(&program)
    }

    fn codes(analysis: &Analysis) -> Vec<ErrorCode> {
        analysis
            .errors
            .diagnostics()
            .iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn test_minimal_program_is_clean() {
        let analysis = analyze("program p main() { }");
        assert_eq!(analysis.error_count(), 0);
        assert!(analysis.program.is_some());
    }

    #[test]
    fn test_constant_sized_array_end_to_end() {
        let analysis = analyze(
            r#"
            program p
            const n = 5;
            var arr = new int[n];
            main() {
                arr[0] = 10;
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);

        let arr = analysis.lookup_global("arr").unwrap();
        let array_type = analysis.arena.symbol(arr).type_id.unwrap();
        let typespec = analysis.arena.typespec(array_type);
        assert_eq!(typespec.form, TypeForm::Array);
        assert_eq!(
            typespec.element_type(),
            Some(analysis.predefined.integer_type)
        );
        assert_eq!(typespec.element_count(), Some(5));
    }

    #[test]
    fn test_redeclaration_flags_once_and_keeps_original_type() {
        let analysis = analyze(
            r#"
            program p
            var x : int;
            var x : string;
            main() {
                x = 1;
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![ErrorCode::RedeclaredIdentifier]);

        let x = analysis.lookup_global("x").unwrap();
        assert_eq!(
            analysis.arena.symbol(x).type_id,
            Some(analysis.predefined.integer_type)
        );
    }

    #[test]
    fn test_block_locals_shadow_and_do_not_leak() {
        let analysis = analyze(
            r#"
            program p
            var x : int;
            main() {
                {
                    var x = "inner";
                    x = "still a string";
                }
                x = 1;
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);
    }

    #[test]
    fn test_assignment_compatibility() {
        let widening = analyze("program p var r : real; main() { r = 1; }");
        assert_eq!(widening.error_count(), 0);

        let narrowing = analyze("program p var i : int; main() { i = 1.5; }");
        assert_eq!(codes(&narrowing), vec![ErrorCode::IncompatibleAssignment]);
    }

    #[test]
    fn test_call_arity_and_argument_types() {
        let analysis = analyze(
            r#"
            program p
            func f(a : int, b : bool) { }
            main() {
                f(1, 2);
                f(1);
                f(1, true);
            }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![ErrorCode::TypeMismatch, ErrorCode::ArgumentCountMismatch]
        );
    }

    #[test]
    fn test_nested_record_type_path() {
        let analysis = analyze(
            r#"
            program P
            record Outer {
                a : int;
                record Inner {
                    b : int;
                }
            }
            main() { }
            "#,
        );
        assert_eq!(analysis.error_count(), 0);

        let outer = analysis.lookup_global("Outer").unwrap();
        let outer_type = analysis.arena.symbol(outer).type_id.unwrap();
        let outer_spec = analysis.arena.typespec(outer_type);
        assert_eq!(outer_spec.type_path(), Some("P$Outer"));

        let fields = outer_spec.field_scope().unwrap();
        let inner = analysis.arena.lookup_in(fields, "Inner").unwrap();
        let inner_type = analysis.arena.symbol(inner).type_id.unwrap();
        assert_eq!(
            analysis.arena.typespec(inner_type).type_path(),
            Some("P$Outer$Inner")
        );
    }

    #[test]
    fn test_boolean_constants_evaluate_to_ordinals() {
        let analysis = analyze("program p var b = true; main() { }");
        assert_eq!(analysis.error_count(), 0);

        let b = analysis.lookup_global("b").unwrap();
        let symbol = analysis.arena.symbol(b);
        assert_eq!(symbol.type_id, Some(analysis.predefined.boolean_type));
        assert_eq!(symbol.value, Some(ConstValue::Integer(1)));
    }

    #[test]
    fn test_undeclared_identifiers_do_not_stop_analysis() {
        let analysis = analyze("program p main() { x = 1; y = 2; }");
        assert_eq!(
            codes(&analysis),
            vec![
                ErrorCode::UndeclaredIdentifier,
                ErrorCode::UndeclaredIdentifier
            ]
        );
    }

    #[test]
    fn test_forward_reference_between_functions() {
        let analysis = analyze(
            r#"
            program p
            func a() -> int { return b(); }
            func b() -> int { return 1; }
            main() {
                var v = a();
                v = v + 1;
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);
    }

    #[test]
    fn test_recursive_function_terminates_and_type_checks() {
        let analysis = analyze(
            r#"
            program p
            func fact(n : int) -> int {
                if (n <= 1) {
                    return 1;
                }
                return n * fact(n - 1);
            }
            main() {
                var v = fact(5);
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);
    }

    #[test]
    fn test_callee_body_cannot_see_caller_locals() {
        let analysis = analyze(
            r#"
            program p
            func f() -> int { return g; }
            main() {
                var g = 1;
                var v = f();
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![ErrorCode::UndeclaredIdentifier]);
    }

    #[test]
    fn test_never_called_function_bodies_are_still_checked() {
        let analysis = analyze(
            r#"
            program p
            func unused() { missing = 1; }
            main() { }
            "#,
        );
        assert_eq!(codes(&analysis), vec![ErrorCode::UndeclaredIdentifier]);
    }

    #[test]
    fn test_reference_parameter_requires_a_variable() {
        let analysis = analyze(
            r#"
            program p
            func bump(var x : int) { x = x + 1; }
            main() {
                var v = 0;
                bump(v);
                bump(1);
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![ErrorCode::TypeMismatch]);
    }

    #[test]
    fn test_return_type_violations() {
        let analysis = analyze(
            r#"
            program p
            func f() -> int { return true; }
            func g() { return 1; }
            func h() -> int { return; }
            main() { }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![
                ErrorCode::InvalidReturnType,
                ErrorCode::InvalidReturnType,
                ErrorCode::InvalidReturnType
            ]
        );
    }

    #[test]
    fn test_builtin_routines() {
        let analysis = analyze(
            r#"
            program p
            record R { a : int; }
            var r0 : R;
            main() {
                println("x", 1, true);
                println(r0);
                var s = readln();
                s = "ok";
                read(1);
            }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![ErrorCode::TypeMismatch, ErrorCode::ArgumentCountMismatch]
        );
    }

    #[test]
    fn test_array_indexing_violations() {
        let analysis = analyze(
            r#"
            program p
            var n : int;
            var arr = new int[5];
            main() {
                n[0] = 1;
                arr[true] = 1;
                arr[10] = 1;
            }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![
                ErrorCode::TypeMustBeArray,
                ErrorCode::TypeMustBeInteger,
                ErrorCode::IndexOutOfBounds
            ]
        );
    }

    #[test]
    fn test_runtime_sized_array_is_unsized() {
        let analysis = analyze(
            r#"
            program p
            var n = 3;
            var arr : int[];
            main() {
                n = 7;
                arr = new int[n + 1];
                arr[10] = 1;
            }
            "#,
        );
        // No static count, so no bounds diagnostics.
        assert_eq!(codes(&analysis), vec![]);
    }

    #[test]
    fn test_record_literal_checking() {
        let analysis = analyze(
            r#"
            program p
            record Point { x, y : int; }
            main() {
                var a = new Point { x = 1, y = 2 };
                var b = new Point { z = 1 };
                var c = new Point { x = 1, x = 2 };
                var d = new Point { x = true };
            }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![
                ErrorCode::UndeclaredIdentifier,
                ErrorCode::RedeclaredIdentifier,
                ErrorCode::TypeMismatch
            ]
        );
    }

    #[test]
    fn test_field_access() {
        let analysis = analyze(
            r#"
            program p
            record Point { x : int; }
            var pt : Point;
            var w : int;
            main() {
                pt.x = 3;
                pt.z = 1;
                w.x = 1;
            }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![ErrorCode::UndeclaredIdentifier, ErrorCode::InvalidType]
        );
    }

    #[test]
    fn test_operator_violations() {
        let analysis = analyze(
            r#"
            program p
            main() {
                var a = 1 + true;
                var b = "s" + 1;
                var c = 1.5 % 2;
                if (1) { }
                var d = 1 < true;
                var e = !1;
            }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![
                ErrorCode::InvalidOperator,
                ErrorCode::TypeMustBeString,
                ErrorCode::TypeMustBeInteger,
                ErrorCode::TypeMustBeBoolean,
                ErrorCode::IncompatibleComparison,
                ErrorCode::TypeMustBeBoolean
            ]
        );
    }

    #[test]
    fn test_constant_folding() {
        let analysis = analyze(
            r#"
            program p
            const n = 2 + 3 * 4;
            const s = "a" + "b";
            const t = n < 20;
            main() { }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);

        let arena = &analysis.arena;
        let n = analysis.lookup_global("n").unwrap();
        assert_eq!(arena.symbol(n).value, Some(ConstValue::Integer(14)));

        let s = analysis.lookup_global("s").unwrap();
        assert_eq!(
            arena.symbol(s).value,
            Some(ConstValue::Str("ab".to_string()))
        );

        let t = analysis.lookup_global("t").unwrap();
        assert_eq!(arena.symbol(t).value, Some(ConstValue::Boolean(true)));
        assert_eq!(
            arena.symbol(t).type_id,
            Some(analysis.predefined.boolean_type)
        );
    }

    #[test]
    fn test_string_concatenation_types_as_string() {
        let analysis = analyze(
            r#"
            program p
            var s1 = "a";
            main() {
                var s2 = s1 + "b";
                s2 = "c";
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);
    }

    #[test]
    fn test_for_statement_typing_and_scoping() {
        let analysis = analyze(
            r#"
            program p
            main() {
                for (var i = 0; i < 10; i = i + 1) {
                    print(i);
                }
                i = 99;
                for (var j = true; j; j = j) { }
            }
            "#,
        );
        assert_eq!(
            codes(&analysis),
            vec![
                ErrorCode::UndeclaredIdentifier,
                ErrorCode::TypeMustBeInteger,
                ErrorCode::TypeMustBeInteger
            ]
        );
    }

    #[test]
    fn test_while_condition_must_be_boolean() {
        let analysis = analyze("program p main() { while (1) { } }");
        assert_eq!(codes(&analysis), vec![ErrorCode::TypeMustBeBoolean]);
    }

    #[test]
    fn test_calling_a_variable_flags_name_must_be_function() {
        let analysis = analyze("program p var v : int; main() { v(1); }");
        assert_eq!(codes(&analysis), vec![ErrorCode::NameMustBeFunction]);
    }

    #[test]
    fn test_call_to_undeclared_function_still_checks_arguments() {
        let analysis = analyze("program p main() { foo(bar); }");
        assert_eq!(
            codes(&analysis),
            vec![
                ErrorCode::UndeclaredIdentifier,
                ErrorCode::UndeclaredIdentifier
            ]
        );
    }

    #[test]
    fn test_deeply_nested_scopes_stay_balanced() {
        let analysis = analyze(
            r#"
            program p
            main() {
                if (true) {
                    while (false) {
                        {
                            var q = 1;
                            for (var i = 0; i < q; i = i + 1) {
                                print(i);
                            }
                        }
                    }
                } else {
                    var q = 2;
                    print(q);
                }
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);
    }

    #[test]
    fn test_variable_initialized_from_call() {
        let analysis = analyze(
            r#"
            program p
            func f() -> int { return 1; }
            main() {
                var v = f();
                v = 2;
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);
    }

    #[test]
    fn test_self_referential_record_field() {
        let analysis = analyze(
            r#"
            program p
            record Node {
                value : int;
                next : Node;
            }
            main() {
                var head : Node;
                head.next = head;
            }
            "#,
        );
        assert_eq!(codes(&analysis), vec![]);
    }
}
