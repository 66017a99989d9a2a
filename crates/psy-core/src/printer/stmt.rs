use std::fmt::{self, Formatter};

use itertools::Itertools;

use crate::ast::*;
use crate::pretty::{PrettyCtx, PrettyPrintable};
use crate::printer::ExprPrinter;

impl PrettyPrintable for [Stmt] {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        for stmt in self {
            stmt.fmt_pretty(f, ctx)?;
        }
        Ok(())
    }
}

impl PrettyPrintable for Vec<Stmt> {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        self.as_slice().fmt_pretty(f, ctx)
    }
}

fn exprs<'a>(ctx: &PrettyCtx<'a>) -> ExprPrinter<'a> {
    ExprPrinter::new(ctx.options, ctx.current_indent())
}

fn line_marker(stmt: &Stmt, ctx: &PrettyCtx<'_>) -> String {
    if ctx.options.show_lines && !stmt.span.is_null() {
        format!(" // line {}", stmt.line())
    } else {
        String::new()
    }
}

/// `{`-delimited body: header line, indented statements, closing line.
fn block(
    f: &mut Formatter<'_>,
    ctx: &mut PrettyCtx<'_>,
    header: impl AsRef<str>,
    body: &[Stmt],
    footer: impl AsRef<str>,
) -> fmt::Result {
    ctx.writeln(f, format!("{} {{", header.as_ref()))?;
    ctx.with_indent(|ctx| body.fmt_pretty(f, ctx))?;
    ctx.writeln(f, format!("}}{}", footer.as_ref()))
}

/// Function-style body with the opening brace on its own line.
fn decl_body(f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>, header: String, body: &[Stmt]) -> fmt::Result {
    ctx.writeln(f, header)?;
    ctx.writeln(f, "{")?;
    ctx.with_indent(|ctx| body.fmt_pretty(f, ctx))?;
    ctx.writeln(f, "}")
}

impl PrettyPrintable for Stmt {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        let marker = line_marker(self, ctx);
        match &self.kind {
            StmtKind::Expr(expr) => ctx.writeln(f, format!("{};{}", exprs(ctx).expr(expr), marker)),
            StmtKind::Echo(values) => ctx.writeln(
                f,
                format!("echo {};{}", exprs(ctx).list(values), marker),
            ),
            StmtKind::Return(None) => ctx.writeln(f, format!("return;{}", marker)),
            StmtKind::Return(Some(expr)) => {
                ctx.writeln(f, format!("return {};{}", exprs(ctx).expr(expr), marker))
            }
            StmtKind::If(stmt_if) => {
                let cond = exprs(ctx).expr(&stmt_if.cond);
                ctx.writeln(f, format!("if ({}) {{{}", cond, marker))?;
                ctx.with_indent(|ctx| stmt_if.then.fmt_pretty(f, ctx))?;
                for elseif in &stmt_if.elseifs {
                    let cond = exprs(ctx).expr(&elseif.cond);
                    ctx.writeln(f, format!("}} elseif ({}) {{", cond))?;
                    ctx.with_indent(|ctx| elseif.body.fmt_pretty(f, ctx))?;
                }
                if let Some(otherwise) = &stmt_if.otherwise {
                    ctx.writeln(f, "} else {")?;
                    ctx.with_indent(|ctx| otherwise.fmt_pretty(f, ctx))?;
                }
                ctx.writeln(f, "}")
            }
            StmtKind::While(stmt_while) => {
                let cond = exprs(ctx).expr(&stmt_while.cond);
                block(f, ctx, format!("while ({})", cond), &stmt_while.body, "")
            }
            StmtKind::DoWhile(stmt_do) => {
                let cond = exprs(ctx).expr(&stmt_do.cond);
                block(f, ctx, "do", &stmt_do.body, format!(" while ({});", cond))
            }
            StmtKind::For(stmt_for) => {
                let printer = exprs(ctx);
                let init = printer.list(&stmt_for.init);
                let cond = printer.list(&stmt_for.cond);
                let step = printer.list(&stmt_for.step);
                let mut header = format!("for ({};", init);
                if !cond.is_empty() {
                    header.push(' ');
                    header.push_str(&cond);
                }
                header.push(';');
                if !step.is_empty() {
                    header.push(' ');
                    header.push_str(&step);
                }
                header.push(')');
                block(f, ctx, header, &stmt_for.body, "")
            }
            StmtKind::Foreach(stmt_foreach) => {
                let printer = exprs(ctx);
                let mut header = format!("foreach ({} as ", printer.expr(&stmt_foreach.expr));
                if let Some(key) = &stmt_foreach.key {
                    header.push_str(&printer.expr(key));
                    header.push_str(" => ");
                }
                if stmt_foreach.by_ref {
                    header.push('&');
                }
                header.push_str(&printer.expr(&stmt_foreach.value));
                header.push(')');
                block(f, ctx, header, &stmt_foreach.body, "")
            }
            StmtKind::Switch(stmt_switch) => {
                let subject = exprs(ctx).expr(&stmt_switch.subject);
                ctx.writeln(f, format!("switch ({}) {{", subject))?;
                ctx.with_indent(|ctx| {
                    for case in &stmt_switch.cases {
                        match &case.cond {
                            Some(cond) => {
                                let cond = exprs(ctx).expr(cond);
                                ctx.writeln(f, format!("case {}:", cond))?
                            }
                            None => ctx.writeln(f, "default:")?,
                        }
                        ctx.with_indent(|ctx| case.body.fmt_pretty(f, ctx))?;
                    }
                    Ok(())
                })?;
                ctx.writeln(f, "}")
            }
            StmtKind::Break(level) => match level {
                Some(level) => ctx.writeln(f, format!("break {};", exprs(ctx).expr(level))),
                None => ctx.writeln(f, "break;"),
            },
            StmtKind::Continue(level) => match level {
                Some(level) => ctx.writeln(f, format!("continue {};", exprs(ctx).expr(level))),
                None => ctx.writeln(f, "continue;"),
            },
            StmtKind::Goto(label) => ctx.writeln(f, format!("goto {};", label)),
            StmtKind::Label(label) => ctx.writeln(f, format!("{}:", label)),
            StmtKind::Block(stmts) => {
                ctx.writeln(f, "{")?;
                ctx.with_indent(|ctx| stmts.fmt_pretty(f, ctx))?;
                ctx.writeln(f, "}")
            }
            StmtKind::Declare(declare) => {
                let printer = exprs(ctx);
                let directives = declare
                    .directives
                    .iter()
                    .map(|d| format!("{}={}", d.key, printer.expr(&d.value)))
                    .join(", ");
                match &declare.body {
                    Some(body) => block(f, ctx, format!("declare ({})", directives), body, ""),
                    None => ctx.writeln(f, format!("declare ({});", directives)),
                }
            }
            StmtKind::Namespace(ns) => {
                let name = ns.name.as_ref().map(|name| name.plain());
                if ns.braced || name.is_none() {
                    let header = match name {
                        Some(name) => format!("namespace {}", name),
                        None => "namespace".to_string(),
                    };
                    block(f, ctx, header, &ns.body, "")
                } else {
                    ctx.writeln(f, format!("namespace {};", name.unwrap_or_default()))?;
                    if !ns.body.is_empty() {
                        writeln!(f)?;
                    }
                    ns.body.fmt_pretty(f, ctx)
                }
            }
            StmtKind::Use(stmt_use) => ctx.writeln(f, format_use(stmt_use)),
            StmtKind::Function(func) => {
                let header = format!(
                    "function {}{}({}){}",
                    if func.by_ref { "&" } else { "" },
                    func.name,
                    exprs(ctx).params(&func.params),
                    return_type(&func.return_type)
                );
                decl_body(f, ctx, header, &func.body)
            }
            StmtKind::Class(class) => fmt_class(class, f, ctx),
            StmtKind::Interface(iface) => {
                let mut header = format!("interface {}", iface.name);
                if !iface.extends.is_empty() {
                    header.push_str(" extends ");
                    header.push_str(&iface.extends.iter().join(", "));
                }
                fmt_members(header, &iface.members, f, ctx)
            }
            StmtKind::Trait(tr) => fmt_members(format!("trait {}", tr.name), &tr.members, f, ctx),
            StmtKind::Try(stmt_try) => {
                ctx.writeln(f, "try {")?;
                ctx.with_indent(|ctx| stmt_try.body.fmt_pretty(f, ctx))?;
                for catch in &stmt_try.catches {
                    let types = catch.types.iter().join("|");
                    let var = catch
                        .var
                        .as_ref()
                        .map(|var| format!(" ${}", var))
                        .unwrap_or_default();
                    ctx.writeln(f, format!("}} catch ({}{}) {{", types, var))?;
                    ctx.with_indent(|ctx| catch.body.fmt_pretty(f, ctx))?;
                }
                if let Some(finally) = &stmt_try.finally {
                    ctx.writeln(f, "} finally {")?;
                    ctx.with_indent(|ctx| finally.fmt_pretty(f, ctx))?;
                }
                ctx.writeln(f, "}")
            }
            StmtKind::Throw(expr) => ctx.writeln(f, format!("throw {};", exprs(ctx).expr(expr))),
            StmtKind::Unset(vars) => ctx.writeln(f, format!("unset({});", exprs(ctx).list(vars))),
            StmtKind::Global(vars) => ctx.writeln(f, format!("global {};", exprs(ctx).list(vars))),
            StmtKind::Static(vars) => {
                let printer = exprs(ctx);
                let vars = vars
                    .iter()
                    .map(|var| match &var.default {
                        Some(default) => format!("${} = {}", var.name, printer.expr(default)),
                        None => format!("${}", var.name),
                    })
                    .join(", ");
                ctx.writeln(f, format!("static {};", vars))
            }
            StmtKind::Const(consts) => {
                let printer = exprs(ctx);
                let consts = consts
                    .iter()
                    .map(|item| format!("{} = {}", item.name, printer.expr(&item.value)))
                    .join(", ");
                ctx.writeln(f, format!("const {};", consts))
            }
            StmtKind::Nop => Ok(()),
        }
    }
}

fn return_type(ty: &Option<TypeHint>) -> String {
    ty.as_ref().map(|ty| format!(": {}", ty)).unwrap_or_default()
}

pub(crate) fn format_use(stmt_use: &StmtUse) -> String {
    let kind = stmt_use
        .kind
        .keyword()
        .map(|kw| format!("{} ", kw))
        .unwrap_or_default();
    let item = |item: &UseItem| {
        let mut out = String::new();
        if let Some(kw) = item.kind.and_then(|kind| kind.keyword()) {
            out.push_str(kw);
            out.push(' ');
        }
        out.push_str(&item.name.plain());
        if let Some(alias) = &item.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
        out
    };
    match &stmt_use.prefix {
        Some(prefix) => format!(
            "use {}{}\\{{{}}};",
            kind,
            prefix.plain(),
            stmt_use.uses.iter().map(item).join(", ")
        ),
        None => format!("use {}{};", kind, stmt_use.uses.iter().map(item).join(", ")),
    }
}

pub(crate) fn class_header(class: &ClassDecl) -> String {
    let mut header = String::new();
    if let Some(extends) = &class.extends {
        header.push_str(" extends ");
        header.push_str(&extends.to_string());
    }
    if !class.implements.is_empty() {
        header.push_str(" implements ");
        header.push_str(&class.implements.iter().join(", "));
    }
    header
}

fn fmt_class(class: &ClassDecl, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
    let mut header = String::new();
    if class.modifiers.is_abstract {
        header.push_str("abstract ");
    }
    if class.modifiers.is_final {
        header.push_str("final ");
    }
    if class.modifiers.is_readonly {
        header.push_str("readonly ");
    }
    header.push_str("class ");
    header.push_str(class.name.as_deref().unwrap_or(""));
    header.push_str(&class_header(class));
    fmt_members(header, &class.members, f, ctx)
}

pub(crate) fn fmt_members(
    header: String,
    members: &[ClassMember],
    f: &mut Formatter<'_>,
    ctx: &mut PrettyCtx<'_>,
) -> fmt::Result {
    ctx.writeln(f, header)?;
    ctx.writeln(f, "{")?;
    ctx.with_indent(|ctx| {
        for member in members {
            member.fmt_pretty(f, ctx)?;
        }
        Ok(())
    })?;
    ctx.writeln(f, "}")
}

pub(crate) fn modifiers(modifiers: &Modifiers) -> String {
    let mut out = String::new();
    if modifiers.is_final {
        out.push_str("final ");
    }
    if modifiers.is_abstract {
        out.push_str("abstract ");
    }
    if let Some(visibility) = modifiers.visibility {
        out.push_str(visibility.keyword());
        out.push(' ');
    }
    if modifiers.is_static {
        out.push_str("static ");
    }
    if modifiers.is_readonly {
        out.push_str("readonly ");
    }
    out
}

impl PrettyPrintable for ClassMember {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result {
        match &self.kind {
            MemberKind::Method(method) => {
                let header = format!(
                    "{}function {}{}({}){}",
                    modifiers(&method.modifiers),
                    if method.by_ref { "&" } else { "" },
                    method.name,
                    exprs(ctx).params(&method.params),
                    return_type(&method.return_type)
                );
                match &method.body {
                    Some(body) => decl_body(f, ctx, header, body),
                    None => ctx.writeln(f, format!("{};", header)),
                }
            }
            MemberKind::Property(prop) => {
                let printer = exprs(ctx);
                let mut line = modifiers(&prop.modifiers);
                if line.is_empty() {
                    line.push_str("var ");
                }
                if let Some(ty) = &prop.type_hint {
                    line.push_str(&format!("{} ", ty));
                }
                let props = prop
                    .props
                    .iter()
                    .map(|item| match &item.default {
                        Some(default) => format!("${} = {}", item.name, printer.expr(default)),
                        None => format!("${}", item.name),
                    })
                    .join(", ");
                ctx.writeln(f, format!("{}{};", line, props))
            }
            MemberKind::Const(decl) => {
                let printer = exprs(ctx);
                let consts = decl
                    .consts
                    .iter()
                    .map(|item| format!("{} = {}", item.name, printer.expr(&item.value)))
                    .join(", ");
                ctx.writeln(f, format!("{}const {};", modifiers(&decl.modifiers), consts))
            }
            MemberKind::TraitUse(names) => {
                ctx.writeln(f, format!("use {};", names.iter().join(", ")))
            }
        }
    }
}
