//! Pass trait, the per-run context handed to passes, and the ordered pass set.

use std::collections::HashSet;

use psy_core::ast::{NodeMut, Stmt};
use psy_core::visit::{traverse, Action, Visitor};
use psy_core::{bail_internal, Result};
use tracing::debug;

use crate::config::CleanerConfig;
use crate::oracle::{LayeredOracle, SymbolOracle, SymbolTable};
use crate::session::SessionState;

/// Everything a pass may read or write during one `clean` call.
pub struct PassContext<'a> {
    pub session: &'a mut SessionState,
    pub oracle: &'a dyn SymbolOracle,
    pub config: &'a CleanerConfig,
    /// Declarations made by the snippet so far. Committed to the session only
    /// when every pass succeeds.
    pub pending: SymbolTable,
    logger: Option<&'a dyn Fn(&str)>,
}

impl<'a> PassContext<'a> {
    pub fn new(
        session: &'a mut SessionState,
        oracle: &'a dyn SymbolOracle,
        config: &'a CleanerConfig,
    ) -> Self {
        Self {
            session,
            oracle,
            config,
            pending: SymbolTable::new(),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<&'a dyn Fn(&str)>) -> Self {
        self.logger = logger;
        self
    }

    /// Snippet declarations, then earlier snippets, then the oracle.
    pub fn symbols(&self) -> LayeredOracle<'_> {
        let layers: Vec<&dyn SymbolOracle> =
            vec![&self.pending, self.session.declared(), self.oracle];
        LayeredOracle::new(layers)
    }

    pub fn log(&self, message: &str) {
        if let Some(logger) = self.logger {
            logger(message);
        }
    }

    pub fn into_pending(self) -> SymbolTable {
        self.pending
    }
}

/// One validation or rewrite unit of the cleaner.
#[allow(unused_variables)]
pub trait Pass {
    fn name(&self) -> &'static str;

    /// Names of passes that must run earlier when both are in the same set.
    fn after(&self) -> &'static [&'static str] {
        &[]
    }

    /// Clear per-traversal state. Called before every traversal.
    fn reset(&mut self);

    fn before_traverse(&mut self, stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        Ok(())
    }

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        Ok(Action::Continue)
    }

    fn after_traverse(&mut self, stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Binds a pass to its context so the traversal engine can drive it.
struct PassVisitor<'p, 'c, 'a> {
    pass: &'p mut dyn Pass,
    ctx: &'c mut PassContext<'a>,
}

impl Visitor for PassVisitor<'_, '_, '_> {
    fn before_traverse(&mut self, stmts: &mut Vec<Stmt>) -> Result<()> {
        self.pass.before_traverse(stmts, self.ctx)
    }

    fn enter(&mut self, node: NodeMut<'_>) -> Result<Action> {
        self.pass.enter(node, self.ctx)
    }

    fn leave(&mut self, node: NodeMut<'_>) -> Result<Action> {
        self.pass.leave(node, self.ctx)
    }

    fn after_traverse(&mut self, stmts: &mut Vec<Stmt>) -> Result<()> {
        self.pass.after_traverse(stmts, self.ctx)
    }
}

/// Run a single pass over `stmts`, resetting it first.
pub fn run_pass(pass: &mut dyn Pass, stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
    pass.reset();
    debug!(pass = pass.name(), "running pass");
    let mut visitor = PassVisitor { pass, ctx };
    traverse(&mut visitor, stmts)
}

/// Ordered list of passes whose `after()` constraints have been checked.
pub struct PassSet {
    passes: Vec<Box<dyn Pass>>,
}

impl std::fmt::Debug for PassSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PassSet").field(&self.names()).finish()
    }
}

impl PassSet {
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Result<Self> {
        let mut seen: HashSet<&'static str> = HashSet::new();
        let present: HashSet<&'static str> = passes.iter().map(|pass| pass.name()).collect();
        for pass in &passes {
            let name = pass.name();
            if seen.contains(name) {
                bail_internal!("pass '{}' registered twice", name);
            }
            for dep in pass.after() {
                if present.contains(dep) && !seen.contains(dep) {
                    bail_internal!("pass '{}' must run after '{}'", name, dep);
                }
            }
            seen.insert(name);
        }
        Ok(Self { passes })
    }

    pub fn single(pass: impl Pass + 'static) -> Self {
        Self {
            passes: vec![Box::new(pass)],
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Every pass in order; the first error aborts the rest.
    pub fn run(&mut self, stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        for pass in &mut self.passes {
            run_pass(pass.as_mut(), stmts, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Named(&'static str, &'static [&'static str]);

    impl Pass for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn after(&self) -> &'static [&'static str] {
            self.1
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn ordering_constraints_are_checked() {
        let ok = PassSet::new(vec![
            Box::new(Named("namespace", &[])),
            Box::new(Named("strict_types", &["namespace", "missing"])),
        ])
        .unwrap();
        assert_eq!(ok.names(), vec!["namespace", "strict_types"]);

        let err = PassSet::new(vec![
            Box::new(Named("strict_types", &["namespace"])),
            Box::new(Named("namespace", &[])),
        ])
        .unwrap_err();
        assert!(err.is_internal());

        let err = PassSet::new(vec![Box::new(Named("a", &[])), Box::new(Named("a", &[]))])
            .unwrap_err();
        assert!(err.is_internal());
    }
}
