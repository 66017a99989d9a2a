use derive_more::From;

use crate::ast::*;
use crate::error::Result;
use crate::span::Span;
use crate::common_enum;

/// An owned node of any traversable category, used for replacements.
#[derive(Debug, Clone, PartialEq, From)]
pub enum Node {
    Stmt(Stmt),
    Expr(Expr),
    Member(ClassMember),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Stmt(stmt) => stmt.span,
            Node::Expr(expr) => expr.span,
            Node::Member(member) => member.span,
        }
    }

    /// An expression is accepted in statement position as an expression statement.
    pub fn into_stmt(self) -> Result<Stmt> {
        match self {
            Node::Stmt(stmt) => Ok(stmt),
            Node::Expr(expr) => Ok(Stmt::expr(expr)),
            Node::Member(_) => bail_internal!("cannot put a class member in statement position"),
        }
    }

    pub fn into_expr(self) -> Result<Expr> {
        match self {
            Node::Expr(expr) => Ok(expr),
            Node::Stmt(Stmt {
                kind: StmtKind::Expr(expr),
                ..
            }) => Ok(expr),
            Node::Stmt(stmt) => bail_internal!(
                "cannot put a statement in expression position (line {})",
                stmt.line()
            ),
            Node::Member(_) => bail_internal!("cannot put a class member in expression position"),
        }
    }

    pub fn into_member(self) -> Result<ClassMember> {
        match self {
            Node::Member(member) => Ok(member),
            other => bail_internal!(
                "cannot put a non-member in a class body (line {})",
                other.span().start_line
            ),
        }
    }
}

/// A mutable borrow of a node handed to pass callbacks.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Stmt(&'a mut Stmt),
    Expr(&'a mut Expr),
    Member(&'a mut ClassMember),
}

impl NodeMut<'_> {
    pub fn span(&self) -> Span {
        match self {
            NodeMut::Stmt(stmt) => stmt.span,
            NodeMut::Expr(expr) => expr.span,
            NodeMut::Member(member) => member.span,
        }
    }

    pub fn line(&self) -> u32 {
        self.span().start_line
    }

    /// Declarations introducing a new function scope.
    pub fn is_function_like(&self) -> bool {
        match self {
            NodeMut::Stmt(stmt) => matches!(stmt.kind, StmtKind::Function(_)),
            NodeMut::Expr(expr) => matches!(expr.kind, ExprKind::Closure(_) | ExprKind::ArrowFn(_)),
            NodeMut::Member(member) => matches!(member.kind, MemberKind::Method(_)),
        }
    }

    /// Class, interface or trait declarations, including anonymous classes.
    pub fn is_class_like(&self) -> bool {
        match self {
            NodeMut::Stmt(stmt) => matches!(
                stmt.kind,
                StmtKind::Class(_) | StmtKind::Interface(_) | StmtKind::Trait(_)
            ),
            NodeMut::Expr(expr) => matches!(
                &expr.kind,
                ExprKind::New(ExprNew {
                    class: NewClass::Anonymous(_),
                    ..
                })
            ),
            NodeMut::Member(_) => false,
        }
    }
}

/// A child position inside a node, as seen by the generic walker.
#[derive(Debug)]
pub enum SlotMut<'a> {
    Stmts(&'a mut Vec<Stmt>),
    Expr(&'a mut Expr),
    Exprs(&'a mut Vec<Expr>),
    Members(&'a mut Vec<ClassMember>),
}

fn push_opt<'a>(slots: &mut Vec<SlotMut<'a>>, expr: Option<&'a mut Expr>) {
    if let Some(expr) = expr {
        slots.push(SlotMut::Expr(expr));
    }
}

fn push_args<'a>(slots: &mut Vec<SlotMut<'a>>, args: &'a mut [Arg]) {
    for arg in args {
        slots.push(SlotMut::Expr(&mut arg.value));
    }
}

fn push_params<'a>(slots: &mut Vec<SlotMut<'a>>, params: &'a mut [Param]) {
    for param in params {
        push_opt(slots, param.default.as_mut());
    }
}

fn push_name_or_expr<'a>(slots: &mut Vec<SlotMut<'a>>, target: &'a mut NameOrExpr) {
    if let NameOrExpr::Expr(expr) = target {
        slots.push(SlotMut::Expr(expr));
    }
}

fn push_member_name<'a>(slots: &mut Vec<SlotMut<'a>>, name: &'a mut MemberName) {
    if let MemberName::Expr(expr) = name {
        slots.push(SlotMut::Expr(expr));
    }
}

fn push_array<'a>(slots: &mut Vec<SlotMut<'a>>, array: &'a mut ExprArray) {
    for item in array.items.iter_mut().flatten() {
        push_opt(slots, item.key.as_mut());
        slots.push(SlotMut::Expr(&mut item.value));
    }
}

impl Stmt {
    /// Child positions in source order.
    pub fn child_slots_mut(&mut self) -> Vec<SlotMut<'_>> {
        let mut slots = Vec::new();
        match &mut self.kind {
            StmtKind::Expr(expr) | StmtKind::Throw(expr) => slots.push(SlotMut::Expr(expr)),
            StmtKind::Echo(exprs) | StmtKind::Unset(exprs) | StmtKind::Global(exprs) => {
                slots.push(SlotMut::Exprs(exprs))
            }
            StmtKind::Return(expr) | StmtKind::Break(expr) | StmtKind::Continue(expr) => {
                push_opt(&mut slots, expr.as_mut())
            }
            StmtKind::If(stmt_if) => {
                slots.push(SlotMut::Expr(&mut stmt_if.cond));
                slots.push(SlotMut::Stmts(&mut stmt_if.then));
                for elseif in &mut stmt_if.elseifs {
                    slots.push(SlotMut::Expr(&mut elseif.cond));
                    slots.push(SlotMut::Stmts(&mut elseif.body));
                }
                if let Some(otherwise) = &mut stmt_if.otherwise {
                    slots.push(SlotMut::Stmts(otherwise));
                }
            }
            StmtKind::While(stmt_while) => {
                slots.push(SlotMut::Expr(&mut stmt_while.cond));
                slots.push(SlotMut::Stmts(&mut stmt_while.body));
            }
            StmtKind::DoWhile(stmt_do) => {
                slots.push(SlotMut::Stmts(&mut stmt_do.body));
                slots.push(SlotMut::Expr(&mut stmt_do.cond));
            }
            StmtKind::For(stmt_for) => {
                slots.push(SlotMut::Exprs(&mut stmt_for.init));
                slots.push(SlotMut::Exprs(&mut stmt_for.cond));
                slots.push(SlotMut::Exprs(&mut stmt_for.step));
                slots.push(SlotMut::Stmts(&mut stmt_for.body));
            }
            StmtKind::Foreach(stmt_foreach) => {
                slots.push(SlotMut::Expr(&mut stmt_foreach.expr));
                push_opt(&mut slots, stmt_foreach.key.as_mut());
                slots.push(SlotMut::Expr(&mut stmt_foreach.value));
                slots.push(SlotMut::Stmts(&mut stmt_foreach.body));
            }
            StmtKind::Switch(stmt_switch) => {
                slots.push(SlotMut::Expr(&mut stmt_switch.subject));
                for case in &mut stmt_switch.cases {
                    push_opt(&mut slots, case.cond.as_mut());
                    slots.push(SlotMut::Stmts(&mut case.body));
                }
            }
            StmtKind::Block(stmts) => slots.push(SlotMut::Stmts(stmts)),
            StmtKind::Declare(declare) => {
                for directive in &mut declare.directives {
                    slots.push(SlotMut::Expr(&mut directive.value));
                }
                if let Some(body) = &mut declare.body {
                    slots.push(SlotMut::Stmts(body));
                }
            }
            StmtKind::Namespace(ns) => slots.push(SlotMut::Stmts(&mut ns.body)),
            StmtKind::Function(func) => {
                push_params(&mut slots, &mut func.params);
                slots.push(SlotMut::Stmts(&mut func.body));
            }
            StmtKind::Class(class) => slots.push(SlotMut::Members(&mut class.members)),
            StmtKind::Interface(iface) => slots.push(SlotMut::Members(&mut iface.members)),
            StmtKind::Trait(tr) => slots.push(SlotMut::Members(&mut tr.members)),
            StmtKind::Try(stmt_try) => {
                slots.push(SlotMut::Stmts(&mut stmt_try.body));
                for catch in &mut stmt_try.catches {
                    slots.push(SlotMut::Stmts(&mut catch.body));
                }
                if let Some(finally) = &mut stmt_try.finally {
                    slots.push(SlotMut::Stmts(finally));
                }
            }
            StmtKind::Static(vars) => {
                for var in vars {
                    push_opt(&mut slots, var.default.as_mut());
                }
            }
            StmtKind::Const(consts) => {
                for item in consts {
                    slots.push(SlotMut::Expr(&mut item.value));
                }
            }
            StmtKind::Use(_) | StmtKind::Goto(_) | StmtKind::Label(_) | StmtKind::Nop => {}
        }
        slots
    }
}

impl Expr {
    /// Child positions in source order.
    pub fn child_slots_mut(&mut self) -> Vec<SlotMut<'_>> {
        let mut slots = Vec::new();
        match &mut self.kind {
            ExprKind::Variable(Variable::Dynamic(inner)) => slots.push(SlotMut::Expr(inner)),
            ExprKind::Variable(Variable::Named(_))
            | ExprKind::Literal(_)
            | ExprKind::ConstFetch(_)
            | ExprKind::MagicConst(_)
            | ExprKind::NoReturnValue => {}
            ExprKind::Interpolated(parts) => {
                for part in parts {
                    if let StringPart::Expr(expr) = part {
                        slots.push(SlotMut::Expr(expr));
                    }
                }
            }
            ExprKind::Array(array) | ExprKind::List(array) => push_array(&mut slots, array),
            ExprKind::ArrayDimFetch(fetch) => {
                slots.push(SlotMut::Expr(&mut fetch.var));
                push_opt(&mut slots, fetch.dim.as_deref_mut());
            }
            ExprKind::PropertyFetch(fetch) => {
                slots.push(SlotMut::Expr(&mut fetch.var));
                push_member_name(&mut slots, &mut fetch.name);
            }
            ExprKind::StaticPropertyFetch(fetch) => {
                push_name_or_expr(&mut slots, &mut fetch.class);
                if let Variable::Dynamic(inner) = &mut fetch.name {
                    slots.push(SlotMut::Expr(inner));
                }
            }
            ExprKind::ClassConstFetch(fetch) => push_name_or_expr(&mut slots, &mut fetch.class),
            ExprKind::Assign(assign) => {
                slots.push(SlotMut::Expr(&mut assign.var));
                slots.push(SlotMut::Expr(&mut assign.value));
            }
            ExprKind::AssignOp(assign) => {
                slots.push(SlotMut::Expr(&mut assign.var));
                slots.push(SlotMut::Expr(&mut assign.value));
            }
            ExprKind::BinOp(binop) => {
                slots.push(SlotMut::Expr(&mut binop.lhs));
                slots.push(SlotMut::Expr(&mut binop.rhs));
            }
            ExprKind::UnOp(unop) => slots.push(SlotMut::Expr(&mut unop.expr)),
            ExprKind::IncDec(incdec) => slots.push(SlotMut::Expr(&mut incdec.var)),
            ExprKind::Ternary(ternary) => {
                slots.push(SlotMut::Expr(&mut ternary.cond));
                push_opt(&mut slots, ternary.then.as_deref_mut());
                slots.push(SlotMut::Expr(&mut ternary.otherwise));
            }
            ExprKind::Instanceof(instanceof) => {
                slots.push(SlotMut::Expr(&mut instanceof.expr));
                push_name_or_expr(&mut slots, &mut instanceof.class);
            }
            ExprKind::FuncCall(call) => {
                push_name_or_expr(&mut slots, &mut call.name);
                push_args(&mut slots, &mut call.args);
            }
            ExprKind::MethodCall(call) => {
                slots.push(SlotMut::Expr(&mut call.var));
                push_member_name(&mut slots, &mut call.name);
                push_args(&mut slots, &mut call.args);
            }
            ExprKind::StaticCall(call) => {
                push_name_or_expr(&mut slots, &mut call.class);
                push_member_name(&mut slots, &mut call.name);
                push_args(&mut slots, &mut call.args);
            }
            ExprKind::New(new) => {
                push_args(&mut slots, &mut new.args);
                match &mut new.class {
                    NewClass::Name(_) => {}
                    NewClass::Expr(expr) => slots.push(SlotMut::Expr(expr)),
                    NewClass::Anonymous(class) => slots.push(SlotMut::Members(&mut class.members)),
                }
            }
            ExprKind::Clone(inner)
            | ExprKind::Empty(inner)
            | ExprKind::YieldFrom(inner)
            | ExprKind::Print(inner)
            | ExprKind::Throw(inner)
            | ExprKind::ErrorSuppress(inner) => slots.push(SlotMut::Expr(inner)),
            ExprKind::Closure(closure) => {
                push_params(&mut slots, &mut closure.params);
                slots.push(SlotMut::Stmts(&mut closure.body));
            }
            ExprKind::ArrowFn(arrow) => {
                push_params(&mut slots, &mut arrow.params);
                slots.push(SlotMut::Expr(&mut arrow.expr));
            }
            ExprKind::Isset(exprs) => slots.push(SlotMut::Exprs(exprs)),
            ExprKind::Exit(exit) => push_opt(&mut slots, exit.expr.as_deref_mut()),
            ExprKind::Include(include) => slots.push(SlotMut::Expr(&mut include.expr)),
            ExprKind::Yield(yield_expr) => {
                push_opt(&mut slots, yield_expr.key.as_deref_mut());
                push_opt(&mut slots, yield_expr.value.as_deref_mut());
            }
            ExprKind::Cast(cast) => slots.push(SlotMut::Expr(&mut cast.expr)),
        }
        slots
    }
}

impl ClassMember {
    /// Child positions in source order.
    pub fn child_slots_mut(&mut self) -> Vec<SlotMut<'_>> {
        let mut slots = Vec::new();
        match &mut self.kind {
            MemberKind::Method(method) => {
                push_params(&mut slots, &mut method.params);
                if let Some(body) = &mut method.body {
                    slots.push(SlotMut::Stmts(body));
                }
            }
            MemberKind::Property(prop) => {
                for item in &mut prop.props {
                    push_opt(&mut slots, item.default.as_mut());
                }
            }
            MemberKind::Const(decl) => {
                for item in &mut decl.consts {
                    slots.push(SlotMut::Expr(&mut item.value));
                }
            }
            MemberKind::TraitUse(_) => {}
        }
        slots
    }
}

common_enum! {
    unit
    /// What a name refers to, which decides the alias table it resolves against.
    pub enum NameRole {
        Class,
        Function,
        Constant,
    }
}

fn push_type_names<'a>(names: &mut Vec<(NameRole, &'a mut Name)>, ty: &'a mut TypeHint) {
    match ty {
        TypeHint::Named(name) => {
            if !is_builtin_type(name) {
                names.push((NameRole::Class, name));
            }
        }
        TypeHint::Nullable(inner) => push_type_names(names, inner),
        TypeHint::Union(types) | TypeHint::Intersection(types) => {
            for ty in types {
                push_type_names(names, ty);
            }
        }
    }
}

fn push_signature_names<'a>(
    names: &mut Vec<(NameRole, &'a mut Name)>,
    params: &'a mut [Param],
    return_type: Option<&'a mut TypeHint>,
) {
    for param in params {
        if let Some(ty) = param.type_hint.as_mut() {
            push_type_names(names, ty);
        }
    }
    if let Some(ty) = return_type {
        push_type_names(names, ty);
    }
}

fn push_class_names<'a>(names: &mut Vec<(NameRole, &'a mut Name)>, class: &'a mut ClassDecl) {
    if let Some(extends) = class.extends.as_mut() {
        names.push((NameRole::Class, extends));
    }
    for name in &mut class.implements {
        names.push((NameRole::Class, name));
    }
}

fn push_class_ref<'a>(names: &mut Vec<(NameRole, &'a mut Name)>, target: &'a mut NameOrExpr) {
    if let NameOrExpr::Name(name) = target {
        if !name.is_special_class() {
            names.push((NameRole::Class, name));
        }
    }
}

/// Scalar and pseudo types that never resolve against a namespace.
pub fn is_builtin_type(name: &Name) -> bool {
    name.is_unqualified()
        && matches!(
            name.first().to_ascii_lowercase().as_str(),
            "int"
                | "float"
                | "string"
                | "bool"
                | "array"
                | "callable"
                | "iterable"
                | "object"
                | "mixed"
                | "void"
                | "null"
                | "never"
                | "false"
                | "true"
                | "self"
                | "static"
                | "parent"
        )
}

impl Stmt {
    /// Names held directly by this statement, not by its child nodes.
    pub fn names_mut(&mut self) -> Vec<(NameRole, &mut Name)> {
        let mut names = Vec::new();
        match &mut self.kind {
            StmtKind::Function(func) => {
                push_signature_names(&mut names, &mut func.params, func.return_type.as_mut())
            }
            StmtKind::Class(class) => push_class_names(&mut names, class),
            StmtKind::Interface(iface) => {
                for name in &mut iface.extends {
                    names.push((NameRole::Class, name));
                }
            }
            StmtKind::Try(stmt_try) => {
                for catch in &mut stmt_try.catches {
                    for name in &mut catch.types {
                        names.push((NameRole::Class, name));
                    }
                }
            }
            _ => {}
        }
        names
    }
}

impl Expr {
    /// Names held directly by this expression, not by its child nodes.
    pub fn names_mut(&mut self) -> Vec<(NameRole, &mut Name)> {
        let mut names = Vec::new();
        match &mut self.kind {
            ExprKind::ConstFetch(name) => names.push((NameRole::Constant, name)),
            ExprKind::FuncCall(call) => {
                if let NameOrExpr::Name(name) = &mut call.name {
                    names.push((NameRole::Function, name));
                }
            }
            ExprKind::New(new) => match &mut new.class {
                NewClass::Name(name) => {
                    if !name.is_special_class() {
                        names.push((NameRole::Class, name));
                    }
                }
                NewClass::Anonymous(class) => push_class_names(&mut names, class),
                NewClass::Expr(_) => {}
            },
            ExprKind::StaticCall(call) => push_class_ref(&mut names, &mut call.class),
            ExprKind::ClassConstFetch(fetch) => push_class_ref(&mut names, &mut fetch.class),
            ExprKind::StaticPropertyFetch(fetch) => push_class_ref(&mut names, &mut fetch.class),
            ExprKind::Instanceof(instanceof) => push_class_ref(&mut names, &mut instanceof.class),
            ExprKind::Closure(closure) => push_signature_names(
                &mut names,
                &mut closure.params,
                closure.return_type.as_mut(),
            ),
            ExprKind::ArrowFn(arrow) => {
                push_signature_names(&mut names, &mut arrow.params, arrow.return_type.as_mut())
            }
            _ => {}
        }
        names
    }
}

impl ClassMember {
    /// Names held directly by this member: trait uses and type hints.
    pub fn names_mut(&mut self) -> Vec<(NameRole, &mut Name)> {
        let mut names = Vec::new();
        match &mut self.kind {
            MemberKind::Method(method) => {
                push_signature_names(&mut names, &mut method.params, method.return_type.as_mut())
            }
            MemberKind::Property(prop) => {
                if let Some(ty) = prop.type_hint.as_mut() {
                    push_type_names(&mut names, ty);
                }
            }
            MemberKind::TraitUse(traits) => {
                for name in traits {
                    names.push((NameRole::Class, name));
                }
            }
            MemberKind::Const(_) => {}
        }
        names
    }
}

impl NodeMut<'_> {
    pub fn names_mut(&mut self) -> Vec<(NameRole, &mut Name)> {
        match self {
            NodeMut::Stmt(stmt) => stmt.names_mut(),
            NodeMut::Expr(expr) => expr.names_mut(),
            NodeMut::Member(member) => member.names_mut(),
        }
    }
}
