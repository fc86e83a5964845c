use std::time::Instant;

use crate::{
    ast::{
        expressions::{BinaryOperator, LiteralSuffix, LiteralValue, OperatorCategory},
        statements::CompilerErrorKind,
    },
    errors::errors::{internal_error, Error, ErrorImpl},
    nodes::{
        builtins::TypeCategory,
        nodes::{Graph, NodeId, NodeKind},
    },
};

use super::{
    context::{Frame, ProcedureState},
    equality::types_equal,
};

/// Type checks the graph below `root`.
///
/// With `emit_diagnostics` unset nothing is logged, the result is the same.
pub fn type_check(graph: &mut Graph, root: NodeId, emit_diagnostics: bool) -> Result<(), Error> {
    let start = Instant::now();

    let result = TypeChecker::new(graph, emit_diagnostics).check(root);

    tracing::debug!(elapsed = ?start.elapsed(), success = result.is_ok(), "type checked");
    result
}

pub struct TypeChecker<'g> {
    pub graph: &'g mut Graph,
    pub emit_diagnostics: bool,
    pub(super) frames: Vec<Frame>,
    pub(super) procedures: Vec<ProcedureState>,
}

impl<'g> TypeChecker<'g> {
    pub fn new(graph: &'g mut Graph, emit_diagnostics: bool) -> Self {
        TypeChecker {
            graph,
            emit_diagnostics,
            frames: vec![Frame::default()],
            procedures: vec![],
        }
    }

    /// Checks `id` and everything below it, filling in type slots.
    ///
    /// Every node is checked at most once: checking a node that already has
    /// a type is an internal error.
    pub fn check(&mut self, id: NodeId) -> Result<(), Error> {
        if self.graph.ty(id).is_some() {
            internal_error("node type checked twice");
        }

        match self.graph.kind(id).clone() {
            NodeKind::Literal { value, suffix } => self.check_literal(id, &value, suffix),
            NodeKind::Block {
                statements,
                expected_error,
                ..
            } => match expected_error {
                Some(kind) => self.check_fixture(id, &statements, kind),
                None => self.check_statements(&statements),
            },
            NodeKind::Declaration {
                name,
                specified_type,
                init_expression,
            } => self.check_declaration(id, &name, specified_type, init_expression),
            NodeKind::Identifier { name } => self.check_identifier(id, &name),
            NodeKind::If {
                condition,
                then_block,
                else_block,
            } => {
                self.check(condition)?;
                self.check(then_block)?;
                if let Some(else_block) = else_block {
                    self.check(else_block)?;
                }
                Ok(())
            }
            NodeKind::While { condition, block } => {
                self.check(condition)?;

                let mut checker = self.enter(|frame| frame.loop_depth += 1);
                checker.check(block)
            }
            NodeKind::For {
                iterator,
                end,
                step,
                block,
                ..
            } => self.check_for(iterator, end, step, block),
            NodeKind::Break => self.check_loop_exit(id, "break"),
            NodeKind::Continue => self.check_loop_exit(id, "continue"),
            NodeKind::Label { name } => self.check_label(id, name),
            NodeKind::Goto { label } => self.check_goto(id, label),
            NodeKind::BinaryOperator {
                operator,
                left,
                right,
            } => self.check_binary_operator(id, operator, left, right),
            NodeKind::Procedure { signature, body } => self.check_procedure(id, signature, body),
            NodeKind::ProcedureCall { callee, arguments } => {
                self.check_call(id, callee, &arguments)
            }
            NodeKind::ProcedureSignature { parameters, .. } => {
                for parameter in parameters {
                    self.check(parameter)?;
                }

                let ty = self.graph.builtin("type");
                self.graph.set_type(id, ty);
                Ok(())
            }
            NodeKind::Return { expression } => self.check_return(id, expression),
            NodeKind::TypeCast { expression, target } => self.check_cast(id, expression, target),
            NodeKind::Module { block } => self.check(block),
            NodeKind::BasicType { .. }
            | NodeKind::PointerType { .. }
            | NodeKind::ArrayType { .. }
            | NodeKind::StructType => {
                // A type used as a value
                let ty = self.graph.builtin("type");
                self.graph.set_type(id, ty);
                Ok(())
            }
            NodeKind::Nop => {
                self.graph.set_type(id, id);
                Ok(())
            }
        }
    }

    fn error<T>(&self, node: NodeId, error: ErrorImpl) -> Result<T, Error> {
        let position = self.graph[node].span.start.clone();
        Err(self.report(Error::new(error, position)))
    }

    fn report(&self, error: Error) -> Error {
        // The driver renders the error itself, this is only a log record
        if self.emit_diagnostics && !self.frame().expecting_error {
            tracing::debug!(
                kind = error.get_error_name(),
                position = error.get_position().0,
                "{}",
                error
            );
        }
        error
    }

    fn equal(&self, a: NodeId, b: NodeId) -> bool {
        types_equal(self.graph, a, b)
    }

    fn type_name(&self, ty: NodeId) -> String {
        self.graph.type_to_string(ty)
    }

    fn check_literal(
        &mut self,
        id: NodeId,
        value: &LiteralValue,
        suffix: LiteralSuffix,
    ) -> Result<(), Error> {
        let ty = match (value, suffix) {
            (LiteralValue::Int(_), LiteralSuffix::None) => self.graph.builtin("i64"),
            (LiteralValue::Int(_), LiteralSuffix::Unsigned) => self.graph.builtin("u64"),
            (LiteralValue::F32(_), LiteralSuffix::Float) => self.graph.builtin("f32"),
            (LiteralValue::F64(_), LiteralSuffix::None) => self.graph.builtin("f64"),
            (LiteralValue::Bool(_), LiteralSuffix::None) => self.graph.builtin("bool"),
            (LiteralValue::Str(_), LiteralSuffix::None) => {
                let target = self.graph.builtin("u8");
                let containing_block = self.graph[id].containing_block;
                let span = self.graph[id].span.clone();
                self.graph
                    .add(NodeKind::PointerType { target }, containing_block, span)
            }
            _ => internal_error("literal value does not fit its suffix"),
        };

        self.graph.set_type(id, ty);
        Ok(())
    }

    fn check_statements(&mut self, statements: &[NodeId]) -> Result<(), Error> {
        for statement in statements {
            // Statements of a procedure body are numbered in source order.
            // Nothing compares these yet, so a use before the declaration
            // in the same body is not rejected.
            let time = self.procedure_state().map(|state| {
                state.clock += 1;
                state.clock - 1
            });
            if time.is_some() {
                self.graph[*statement].time = time;
            }

            self.check(*statement)?;
        }

        Ok(())
    }

    /// `__error(kind) { ... }` passes only if its statements fail to check
    /// with an error of the expected kind.
    fn check_fixture(
        &mut self,
        id: NodeId,
        statements: &[NodeId],
        kind: CompilerErrorKind,
    ) -> Result<(), Error> {
        let snapshot = self
            .procedures
            .last()
            .map(|state| (state.labels.clone(), state.pending_gotos.len()));

        let result = {
            let mut checker = self.enter(|frame| frame.expecting_error = true);
            checker.check_statements(statements)
        };

        match result {
            Ok(()) => self.error(
                id,
                ErrorImpl::ExpectedCompilerError {
                    kind: kind.to_string(),
                },
            ),
            Err(error) if kind == CompilerErrorKind::Declaration && !error.is_declaration_error() => {
                Err(self.report(error))
            }
            Err(error) => {
                tracing::debug!(%error, "compiler error block failed as expected");

                // Labels and gotos of the failed statements are forgotten
                if let (Some(state), Some((labels, pending_gotos))) =
                    (self.procedures.last_mut(), snapshot)
                {
                    state.labels = labels;
                    state.pending_gotos.truncate(pending_gotos);
                }
                Ok(())
            }
        }
    }

    fn check_declaration(
        &mut self,
        id: NodeId,
        name: &str,
        specified_type: NodeId,
        init_expression: NodeId,
    ) -> Result<(), Error> {
        let Some(block) = self.graph[id].containing_block else {
            internal_error("declaration outside of any block");
        };

        let NodeKind::Block { declarations, .. } = &mut self.graph[block].kind else {
            internal_error("containing block of a declaration is not a block");
        };
        if declarations.contains_key(name) {
            return self.error(
                id,
                ErrorImpl::DuplicateDeclaration {
                    name: name.to_string(),
                },
            );
        }
        declarations.insert(name.to_string(), id);

        let has_type = !matches!(self.graph.kind(specified_type), NodeKind::Nop);
        let has_init = !matches!(self.graph.kind(init_expression), NodeKind::Nop);

        match (has_type, has_init) {
            (false, false) => self.error(
                id,
                ErrorImpl::MissingDeclarationType {
                    name: name.to_string(),
                },
            ),
            (true, false) => {
                self.graph.set_type(init_expression, specified_type);
                Ok(())
            }
            (_, true) => {
                {
                    let mut checker = self.enter(|frame| frame.declaration = Some(id));
                    checker.check(init_expression)?;
                }

                let inferred = self.graph.expect_ty(init_expression);
                if has_type && !self.equal(specified_type, inferred) {
                    return self.error(
                        id,
                        ErrorImpl::DeclarationTypeMismatch {
                            specified: self.type_name(specified_type),
                            inferred: self.type_name(inferred),
                        },
                    );
                }

                Ok(())
            }
        }
    }

    fn check_identifier(&mut self, id: NodeId, name: &str) -> Result<(), Error> {
        let containing_block = self.graph[id].containing_block;

        let Some(declaration) = self.graph.find_declaration(containing_block, name) else {
            return self.error(
                id,
                ErrorImpl::UnresolvedIdentifier {
                    name: name.to_string(),
                },
            );
        };

        let NodeKind::Declaration {
            init_expression, ..
        } = self.graph.kind(declaration)
        else {
            internal_error("block declaration map points at a non-declaration");
        };

        match self.graph.ty(*init_expression) {
            Some(ty) => {
                self.graph.set_type(id, ty);
                Ok(())
            }
            None => self.error(
                id,
                ErrorImpl::UsedBeforeTyped {
                    name: name.to_string(),
                },
            ),
        }
    }

    fn check_for(
        &mut self,
        iterator: NodeId,
        end: NodeId,
        step: NodeId,
        block: NodeId,
    ) -> Result<(), Error> {
        self.check(iterator)?;

        let Some(iterator_type) = self.graph.declaration_type(iterator) else {
            internal_error("for loop iterator has no type after checking");
        };

        let mut bounds = vec![end];
        if !matches!(self.graph.kind(step), NodeKind::Nop) {
            bounds.push(step);
        }

        for bound in bounds {
            self.check(bound)?;

            let received = self.graph.expect_ty(bound);
            if !self.equal(iterator_type, received) {
                return self.error(
                    bound,
                    ErrorImpl::LoopBoundMismatch {
                        iterator: self.type_name(iterator_type),
                        received: self.type_name(received),
                    },
                );
            }
        }

        let mut checker = self.enter(|frame| frame.loop_depth += 1);
        checker.check(block)
    }

    fn check_loop_exit(&mut self, id: NodeId, keyword: &str) -> Result<(), Error> {
        if self.frame().loop_depth == 0 {
            return self.error(
                id,
                ErrorImpl::BreakOutsideLoop {
                    keyword: keyword.to_string(),
                },
            );
        }
        Ok(())
    }

    fn check_label(&mut self, id: NodeId, name: String) -> Result<(), Error> {
        let duplicate = match self.procedure_state() {
            Some(state) => !state.labels.insert(name.clone()),
            None => false,
        };

        if duplicate {
            return self.error(id, ErrorImpl::DuplicateLabel { label: name });
        }
        Ok(())
    }

    // Labels may come after the goto, so they are resolved once the whole
    // procedure body has been checked.
    fn check_goto(&mut self, id: NodeId, label: String) -> Result<(), Error> {
        match self.procedure_state() {
            Some(state) => {
                state.pending_gotos.push((label, id));
                Ok(())
            }
            None => self.error(id, ErrorImpl::UnknownLabel { label }),
        }
    }

    fn resolve_gotos(&self) -> Result<(), Error> {
        let Some(state) = self.procedures.last() else {
            return Ok(());
        };

        match state
            .pending_gotos
            .iter()
            .find(|(label, _)| !state.labels.contains(label))
        {
            Some((label, goto)) => self.error(
                *goto,
                ErrorImpl::UnknownLabel {
                    label: label.clone(),
                },
            ),
            None => Ok(()),
        }
    }

    fn operand(
        &self,
        id: NodeId,
        side: &str,
        ty: NodeId,
    ) -> Result<(TypeCategory, Option<u32>), Error> {
        match self.graph.basic_category(ty) {
            Some(basic) => Ok(basic),
            None => self.error(
                id,
                ErrorImpl::InvalidOperandKind {
                    side: side.to_string(),
                    received: self.type_name(ty),
                },
            ),
        }
    }

    fn check_binary_operator(
        &mut self,
        id: NodeId,
        operator: BinaryOperator,
        left: NodeId,
        right: NodeId,
    ) -> Result<(), Error> {
        self.check(left)?;
        self.check(right)?;

        let left_type = self.graph.expect_ty(left);
        let right_type = self.graph.expect_ty(right);

        let ty = match operator.category() {
            OperatorCategory::Arithmetic => {
                let (left_category, left_size) = self.operand(id, "left", left_type)?;
                let (right_category, right_size) = self.operand(id, "right", right_type)?;

                if !left_category.is_numerical() || !right_category.is_numerical() {
                    return self.error(
                        id,
                        ErrorImpl::NonNumericOperands {
                            left: self.type_name(left_type),
                            right: self.type_name(right_type),
                        },
                    );
                }

                if matches!(
                    (left_category, right_category),
                    (TypeCategory::SignedInteger, TypeCategory::UnsignedInteger)
                        | (TypeCategory::UnsignedInteger, TypeCategory::SignedInteger)
                ) {
                    return self.error(
                        id,
                        ErrorImpl::MixedSignedness {
                            left: self.type_name(left_type),
                            right: self.type_name(right_type),
                        },
                    );
                }

                let category = if left_category == TypeCategory::Float
                    || right_category == TypeCategory::Float
                {
                    TypeCategory::Float
                } else {
                    left_category
                };

                self.promote(id, left, right, category, left_size.max(right_size))?
            }
            OperatorCategory::Bitwise => {
                let (left_category, left_size) = self.operand(id, "left", left_type)?;
                let (right_category, right_size) = self.operand(id, "right", right_type)?;

                if left_category != TypeCategory::UnsignedInteger
                    || right_category != TypeCategory::UnsignedInteger
                {
                    return self.error(
                        id,
                        ErrorImpl::NonUnsignedBitwiseOperands {
                            left: self.type_name(left_type),
                            right: self.type_name(right_type),
                        },
                    );
                }

                self.promote(
                    id,
                    left,
                    right,
                    TypeCategory::UnsignedInteger,
                    left_size.max(right_size),
                )?
            }
            OperatorCategory::Comparison => {
                if !self.equal(left_type, right_type) {
                    return self.error(
                        id,
                        ErrorImpl::ComparisonMismatch {
                            left: self.type_name(left_type),
                            right: self.type_name(right_type),
                        },
                    );
                }
                self.graph.builtin("bool")
            }
            OperatorCategory::ShortCircuit => {
                for (side, ty) in [("left", left_type), ("right", right_type)] {
                    let is_bool = matches!(
                        self.graph.basic_category(ty),
                        Some((TypeCategory::Boolean, _))
                    );
                    if !is_bool {
                        return self.error(
                            id,
                            ErrorImpl::NonBooleanOperand {
                                side: side.to_string(),
                                received: self.type_name(ty),
                            },
                        );
                    }
                }
                self.graph.builtin("bool")
            }
            OperatorCategory::Assignment => {
                if !self.equal(left_type, right_type) {
                    return self.error(
                        id,
                        ErrorImpl::AssignmentMismatch {
                            left: self.type_name(left_type),
                            right: self.type_name(right_type),
                        },
                    );
                }
                left_type
            }
        };

        self.graph.set_type(id, ty);
        Ok(())
    }

    /// Result type of a numeric operator. Operands of another type are
    /// wrapped in a cast to it.
    fn promote(
        &mut self,
        id: NodeId,
        left: NodeId,
        right: NodeId,
        category: TypeCategory,
        size: Option<u32>,
    ) -> Result<NodeId, Error> {
        let Some(result) = self.graph.builtin_matching(category, size) else {
            internal_error("no built-in type for the result of a numeric operator");
        };

        let left = self.coerce(left, result)?;
        let right = self.coerce(right, result)?;

        if let NodeKind::BinaryOperator {
            left: old_left,
            right: old_right,
            ..
        } = &mut self.graph[id].kind
        {
            *old_left = left;
            *old_right = right;
        }

        Ok(result)
    }

    fn coerce(&mut self, operand: NodeId, target: NodeId) -> Result<NodeId, Error> {
        let ty = self.graph.expect_ty(operand);
        if self.equal(ty, target) {
            return Ok(operand);
        }

        let containing_block = self.graph[operand].containing_block;
        let span = self.graph[operand].span.clone();
        let cast = self.graph.add(
            NodeKind::TypeCast {
                expression: operand,
                target,
            },
            containing_block,
            span,
        );

        tracing::trace!(
            from = %self.type_name(ty),
            to = %self.type_name(target),
            "inserted implicit cast"
        );

        self.check(cast)?;
        Ok(cast)
    }

    fn check_cast(&mut self, id: NodeId, expression: NodeId, target: NodeId) -> Result<(), Error> {
        let source = self.graph.expect_ty(expression);

        let is_numerical = |ty| {
            self.graph
                .basic_category(ty)
                .is_some_and(|(category, _)| category.is_numerical())
        };

        if !is_numerical(source) || !is_numerical(target) {
            return self.error(
                id,
                ErrorImpl::InvalidCast {
                    from: self.type_name(source),
                    to: self.type_name(target),
                },
            );
        }

        self.graph.set_type(id, target);
        Ok(())
    }

    /// The procedure is the initializer of a declaration named `main`.
    fn is_main(&self, procedure: NodeId) -> bool {
        let Some(declaration) = self.frame().declaration else {
            return false;
        };

        matches!(
            self.graph.kind(declaration),
            NodeKind::Declaration { name, init_expression, .. }
                if name == "main" && *init_expression == procedure
        )
    }

    fn check_procedure(
        &mut self,
        id: NodeId,
        signature: NodeId,
        body: Option<NodeId>,
    ) -> Result<(), Error> {
        self.check(signature)?;

        if self.is_main(id) {
            let main = self.graph.main_signature();
            if !self.equal(signature, main) {
                return self.error(
                    id,
                    ErrorImpl::MainSignatureMismatch {
                        expected: self.type_name(main),
                        received: self.type_name(signature),
                    },
                );
            }
        }

        // Typed before the body so the procedure can call itself
        self.graph.set_type(id, signature);

        if let Some(body) = body {
            let mut checker = self.enter_procedure(id);
            checker.check(body)?;
            checker.resolve_gotos()?;
        }

        Ok(())
    }

    fn check_call(&mut self, id: NodeId, callee: NodeId, arguments: &[NodeId]) -> Result<(), Error> {
        self.check(callee)?;

        let callee_type = self.graph.expect_ty(callee);
        let NodeKind::ProcedureSignature {
            parameters,
            return_type,
            is_vararg,
            ..
        } = self.graph.kind(callee_type).clone()
        else {
            return self.error(
                id,
                ErrorImpl::NotCallable {
                    received: self.type_name(callee_type),
                },
            );
        };

        for argument in arguments {
            self.check(*argument)?;
        }

        let count_matches = if is_vararg {
            arguments.len() >= parameters.len()
        } else {
            arguments.len() == parameters.len()
        };
        if !count_matches {
            return self.error(
                id,
                ErrorImpl::ArgumentCountMismatch {
                    expected: parameters.len(),
                    received: arguments.len(),
                },
            );
        }

        for (parameter, argument) in parameters.iter().zip(arguments) {
            let NodeKind::Declaration { name, .. } = self.graph.kind(*parameter) else {
                internal_error("procedure parameter is not a declaration");
            };
            let name = name.clone();

            let Some(expected) = self.graph.declaration_type(*parameter) else {
                return self.error(*parameter, ErrorImpl::MissingDeclarationType { name });
            };

            let received = self.graph.expect_ty(*argument);
            if !self.equal(expected, received) {
                return self.error(
                    *argument,
                    ErrorImpl::ArgumentTypeMismatch {
                        argument: name,
                        expected: self.type_name(expected),
                        received: self.type_name(received),
                    },
                );
            }
        }

        self.graph.set_type(id, return_type);
        Ok(())
    }

    fn check_return(&mut self, id: NodeId, expression: NodeId) -> Result<(), Error> {
        if matches!(self.graph.kind(expression), NodeKind::Nop) {
            return Ok(());
        }

        let Some(procedure) = self.frame().procedure else {
            return self.error(id, ErrorImpl::ReturnOutsideProcedure);
        };

        self.check(expression)?;

        let NodeKind::Procedure { signature, .. } = self.graph.kind(procedure) else {
            internal_error("current procedure is not a procedure");
        };
        let NodeKind::ProcedureSignature { return_type, .. } = self.graph.kind(*signature) else {
            internal_error("procedure signature is not a signature");
        };
        let expected = *return_type;

        let received = self.graph.expect_ty(expression);
        if !self.equal(expected, received) {
            return self.error(
                id,
                ErrorImpl::ReturnTypeMismatch {
                    expected: self.type_name(expected),
                    received: self.type_name(received),
                },
            );
        }

        Ok(())
    }
}
