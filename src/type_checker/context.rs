use std::{
    collections::HashSet,
    ops::{Deref, DerefMut},
};

use crate::{errors::errors::internal_error, nodes::nodes::NodeId};

use super::type_checker::TypeChecker;

/// Context the rules of a node are checked under.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Innermost procedure whose body is being checked.
    pub procedure: Option<NodeId>,
    /// Declaration whose initializer is being checked.
    pub declaration: Option<NodeId>,
    pub loop_depth: u32,
    /// Inside an `__error(...)` block, errors are expected and not logged.
    pub expecting_error: bool,
}

/// Bookkeeping for one procedure body.
#[derive(Debug, Default)]
pub struct ProcedureState {
    pub clock: u32,
    pub labels: HashSet<String>,
    pub pending_gotos: Vec<(String, NodeId)>,
}

/// Restores the checker's context when dropped.
///
/// Derefs to the checker, so rules keep recursing through the guard.
pub struct Scoped<'c, 'g> {
    checker: &'c mut TypeChecker<'g>,
    owns_procedure: bool,
}

impl<'g> TypeChecker<'g> {
    pub fn frame(&self) -> &Frame {
        match self.frames.last() {
            Some(frame) => frame,
            None => internal_error("type checker context stack is empty"),
        }
    }

    /// Pushes a copy of the current frame with `update` applied.
    pub fn enter(&mut self, update: impl FnOnce(&mut Frame)) -> Scoped<'_, 'g> {
        let mut frame = self.frame().clone();
        update(&mut frame);
        self.frames.push(frame);

        Scoped {
            checker: self,
            owns_procedure: false,
        }
    }

    /// Enters the body of `procedure`, with a fresh clock and label table.
    pub fn enter_procedure(&mut self, procedure: NodeId) -> Scoped<'_, 'g> {
        let frame = Frame {
            procedure: Some(procedure),
            declaration: None,
            loop_depth: 0,
            expecting_error: self.frame().expecting_error,
        };
        self.frames.push(frame);
        self.procedures.push(ProcedureState::default());

        Scoped {
            checker: self,
            owns_procedure: true,
        }
    }

    pub fn procedure_state(&mut self) -> Option<&mut ProcedureState> {
        if self.frame().procedure.is_none() {
            return None;
        }
        self.procedures.last_mut()
    }
}

impl<'g> Deref for Scoped<'_, 'g> {
    type Target = TypeChecker<'g>;

    fn deref(&self) -> &Self::Target {
        self.checker
    }
}

impl DerefMut for Scoped<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.checker
    }
}

impl Drop for Scoped<'_, '_> {
    fn drop(&mut self) {
        self.checker.frames.pop();
        if self.owns_procedure {
            self.checker.procedures.pop();
        }
    }
}
