use crate::ast::{ClassMember, Expr, NodeMut, SlotMut, Stmt};
use crate::error::Result;
use crate::visit::{Action, Visitor};

/// Run `visitor` over `stmts`: `before_traverse`, the walk, then `after_traverse`.
pub fn traverse<V: Visitor + ?Sized>(visitor: &mut V, stmts: &mut Vec<Stmt>) -> Result<()> {
    visitor.before_traverse(stmts)?;
    let mut walker = Walker {
        visitor: &mut *visitor,
        stopped: false,
    };
    walker.walk_stmts(stmts)?;
    visitor.after_traverse(stmts)
}

/// Walk `stmts` without the before/after hooks, e.g. to scan a subtree from a callback.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, stmts: &mut Vec<Stmt>) -> Result<()> {
    let mut walker = Walker {
        visitor,
        stopped: false,
    };
    walker.walk_stmts(stmts)
}

enum Outcome {
    Keep,
    Remove,
}

struct Walker<'v, V: ?Sized> {
    visitor: &'v mut V,
    stopped: bool,
}

impl<V: Visitor + ?Sized> Walker<'_, V> {
    fn walk_stmts(&mut self, stmts: &mut Vec<Stmt>) -> Result<()> {
        let mut idx = 0;
        while idx < stmts.len() && !self.stopped {
            match self.visit_stmt(&mut stmts[idx])? {
                Outcome::Keep => idx += 1,
                Outcome::Remove => {
                    stmts.remove(idx);
                }
            }
        }
        Ok(())
    }

    fn walk_exprs(&mut self, exprs: &mut Vec<Expr>) -> Result<()> {
        let mut idx = 0;
        while idx < exprs.len() && !self.stopped {
            match self.visit_expr_in_seq(&mut exprs[idx])? {
                Outcome::Keep => idx += 1,
                Outcome::Remove => {
                    exprs.remove(idx);
                }
            }
        }
        Ok(())
    }

    fn walk_members(&mut self, members: &mut Vec<ClassMember>) -> Result<()> {
        let mut idx = 0;
        while idx < members.len() && !self.stopped {
            match self.visit_member(&mut members[idx])? {
                Outcome::Keep => idx += 1,
                Outcome::Remove => {
                    members.remove(idx);
                }
            }
        }
        Ok(())
    }

    fn walk_slots(&mut self, slots: Vec<SlotMut<'_>>) -> Result<()> {
        for slot in slots {
            if self.stopped {
                break;
            }
            match slot {
                SlotMut::Stmts(stmts) => self.walk_stmts(stmts)?,
                SlotMut::Expr(expr) => self.visit_expr(expr)?,
                SlotMut::Exprs(exprs) => self.walk_exprs(exprs)?,
                SlotMut::Members(members) => self.walk_members(members)?,
            }
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) -> Result<Outcome> {
        let mut descend = true;
        match self.visitor.enter(NodeMut::Stmt(&mut *stmt))? {
            Action::Continue => {}
            Action::SkipChildren => descend = false,
            Action::Replace(node) => *stmt = node.into_stmt()?,
            Action::Remove => return Ok(Outcome::Remove),
            Action::Stop => {
                self.stopped = true;
                return Ok(Outcome::Keep);
            }
        }
        if descend {
            self.walk_slots(stmt.child_slots_mut())?;
        }
        if self.stopped {
            return Ok(Outcome::Keep);
        }
        match self.visitor.leave(NodeMut::Stmt(&mut *stmt))? {
            Action::Continue | Action::SkipChildren => {}
            Action::Replace(node) => *stmt = node.into_stmt()?,
            Action::Remove => return Ok(Outcome::Remove),
            Action::Stop => self.stopped = true,
        }
        Ok(Outcome::Keep)
    }

    fn visit_member(&mut self, member: &mut ClassMember) -> Result<Outcome> {
        let mut descend = true;
        match self.visitor.enter(NodeMut::Member(&mut *member))? {
            Action::Continue => {}
            Action::SkipChildren => descend = false,
            Action::Replace(node) => *member = node.into_member()?,
            Action::Remove => return Ok(Outcome::Remove),
            Action::Stop => {
                self.stopped = true;
                return Ok(Outcome::Keep);
            }
        }
        if descend {
            self.walk_slots(member.child_slots_mut())?;
        }
        if self.stopped {
            return Ok(Outcome::Keep);
        }
        match self.visitor.leave(NodeMut::Member(&mut *member))? {
            Action::Continue | Action::SkipChildren => {}
            Action::Replace(node) => *member = node.into_member()?,
            Action::Remove => return Ok(Outcome::Remove),
            Action::Stop => self.stopped = true,
        }
        Ok(Outcome::Keep)
    }

    fn visit_expr_in_seq(&mut self, expr: &mut Expr) -> Result<Outcome> {
        let mut descend = true;
        match self.visitor.enter(NodeMut::Expr(&mut *expr))? {
            Action::Continue => {}
            Action::SkipChildren => descend = false,
            Action::Replace(node) => *expr = node.into_expr()?,
            Action::Remove => return Ok(Outcome::Remove),
            Action::Stop => {
                self.stopped = true;
                return Ok(Outcome::Keep);
            }
        }
        if descend {
            self.walk_slots(expr.child_slots_mut())?;
        }
        if self.stopped {
            return Ok(Outcome::Keep);
        }
        match self.visitor.leave(NodeMut::Expr(&mut *expr))? {
            Action::Continue | Action::SkipChildren => {}
            Action::Replace(node) => *expr = node.into_expr()?,
            Action::Remove => return Ok(Outcome::Remove),
            Action::Stop => self.stopped = true,
        }
        Ok(Outcome::Keep)
    }

    fn visit_expr(&mut self, expr: &mut Expr) -> Result<()> {
        let line = expr.line();
        match self.visit_expr_in_seq(expr)? {
            Outcome::Keep => Ok(()),
            Outcome::Remove => bail_internal!(
                "cannot remove an expression outside of a sequence (line {})",
                line
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Literal, Node, StmtKind};
    use crate::span::Span;
    use crate::visit::FnVisitor;

    fn int_stmt(value: i64, line: u32) -> Stmt {
        Stmt::expr(Expr::int(value, Span::new(0, 1, line, line)))
    }

    struct Doubler {
        entered: usize,
    }

    impl Visitor for Doubler {
        fn enter(&mut self, node: NodeMut<'_>) -> Result<Action> {
            self.entered += 1;
            if let NodeMut::Expr(expr) = node {
                if let ExprKind::Literal(Literal::Int(value)) = expr.kind {
                    return Ok(Action::replace(Expr::int(value * 2, expr.span)));
                }
            }
            Ok(Action::Continue)
        }
    }

    #[test]
    fn replacement_is_not_reentered() {
        let mut stmts = vec![int_stmt(2, 1)];
        let mut visitor = Doubler { entered: 0 };
        traverse(&mut visitor, &mut stmts).unwrap();
        let StmtKind::Expr(expr) = &stmts[0].kind else {
            panic!("expected expression statement");
        };
        assert_eq!(expr.kind, ExprKind::Literal(Literal::Int(4)));
        assert_eq!(visitor.entered, 2);
    }

    #[test]
    fn remove_in_sequence_and_stop() {
        let mut stmts = vec![int_stmt(1, 1), int_stmt(2, 2), int_stmt(3, 3)];
        let mut seen = Vec::new();
        let mut visitor = FnVisitor::new(|node: NodeMut<'_>| {
            let NodeMut::Stmt(stmt) = node else {
                return Ok(Action::Continue);
            };
            seen.push(stmt.line());
            Ok(match stmt.line() {
                1 => Action::Remove,
                2 => Action::Stop,
                _ => Action::Continue,
            })
        });
        traverse(&mut visitor, &mut stmts).unwrap();
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn removing_single_expression_is_internal_error() {
        let mut stmts = vec![int_stmt(1, 1)];
        let mut visitor = FnVisitor::new(|node: NodeMut<'_>| {
            Ok(match node {
                NodeMut::Expr(_) => Action::Remove,
                _ => Action::Continue,
            })
        });
        let err = traverse(&mut visitor, &mut stmts).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn statement_replacement_accepts_expressions() {
        let mut stmts = vec![int_stmt(1, 1)];
        let mut visitor = FnVisitor::new(|node: NodeMut<'_>| {
            Ok(match node {
                NodeMut::Stmt(stmt) => Action::Replace(Node::Expr(Expr::int(7, stmt.span))),
                _ => Action::Continue,
            })
        });
        traverse(&mut visitor, &mut stmts).unwrap();
        assert!(matches!(stmts[0].kind, StmtKind::Expr(_)));
    }
}
