use std::collections::HashSet;

use psy_core::ast::{NodeMut, Stmt, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// Every top-level `goto` needs a label declared somewhere in the snippet.
#[derive(Default)]
pub struct LabelContextPass {
    function_depth: usize,
    labels: HashSet<String>,
    gotos: Vec<(String, u32)>,
}

impl Pass for LabelContextPass {
    fn name(&self) -> &'static str {
        "label_context"
    }

    fn reset(&mut self) {
        self.function_depth = 0;
        self.labels.clear();
        self.gotos.clear();
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if node.is_function_like() {
            self.function_depth += 1;
            return Ok(Action::Continue);
        }
        if self.function_depth > 0 {
            return Ok(Action::Continue);
        }
        if let NodeMut::Stmt(stmt) = node {
            match &stmt.kind {
                StmtKind::Goto(label) => self.gotos.push((label.to_ascii_lowercase(), stmt.line())),
                StmtKind::Label(label) => {
                    self.labels.insert(label.to_ascii_lowercase());
                }
                _ => {}
            }
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if node.is_function_like() {
            self.function_depth = self.function_depth.saturating_sub(1);
        }
        Ok(Action::Continue)
    }

    fn after_traverse(&mut self, _stmts: &mut Vec<Stmt>, _ctx: &mut PassContext<'_>) -> Result<()> {
        for (label, line) in &self.gotos {
            if !self.labels.contains(label) {
                bail_fatal!(*line, "'goto' to undefined label '{}'", label);
            }
        }
        Ok(())
    }
}
