use itertools::Itertools;

use crate::ast::*;
use crate::pretty::{escape_double_quoted, escape_single_quoted, pretty, PrettyOptions};
use crate::printer::stmt::{class_header, fmt_members, modifiers};

/// Renders expressions to single strings. Closure bodies span several lines and are
/// indented relative to `indent`.
pub struct ExprPrinter<'a> {
    options: &'a PrettyOptions,
    indent: usize,
}

/// Binding power of the outermost operator of `expr`.
pub fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Assign(_) | ExprKind::AssignOp(_) => PREC_ASSIGN,
        ExprKind::Ternary(_) => PREC_TERNARY,
        ExprKind::BinOp(binop) => binop.op.precedence(),
        ExprKind::Instanceof(_) => PREC_INSTANCEOF,
        ExprKind::UnOp(unop) if unop.op == UnOpKind::Not => PREC_NOT,
        ExprKind::UnOp(_) | ExprKind::Cast(_) | ExprKind::ErrorSuppress(_) => PREC_UNARY,
        ExprKind::IncDec(incdec) if incdec.prefix => PREC_UNARY,
        ExprKind::New(_) | ExprKind::Clone(_) => PREC_NEW,
        ExprKind::Print(_) | ExprKind::Include(_) => PREC_ASSIGN,
        ExprKind::Yield(_) | ExprKind::YieldFrom(_) | ExprKind::Throw(_) | ExprKind::ArrowFn(_) => {
            PREC_ASSIGN - 1
        }
        _ => PREC_PRIMARY,
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else if value.is_nan() {
        "NAN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        format!("{}", value)
    }
}

impl<'a> ExprPrinter<'a> {
    pub fn new(options: &'a PrettyOptions, indent: usize) -> Self {
        Self { options, indent }
    }

    pub fn list(&self, exprs: &[Expr]) -> String {
        exprs.iter().map(|expr| self.expr(expr)).join(", ")
    }

    /// `expr`, parenthesized when it binds looser than `min`.
    fn operand(&self, expr: &Expr, min: u8) -> String {
        let rendered = self.expr(expr);
        if precedence(expr) < min {
            format!("({})", rendered)
        } else {
            rendered
        }
    }

    fn args(&self, args: &[Arg]) -> String {
        args.iter()
            .map(|arg| {
                let mut out = String::new();
                if let Some(name) = &arg.name {
                    out.push_str(name);
                    out.push_str(": ");
                }
                if arg.by_ref {
                    out.push('&');
                }
                if arg.unpack {
                    out.push_str("...");
                }
                out.push_str(&self.expr(&arg.value));
                out
            })
            .join(", ")
    }

    pub fn params(&self, params: &[Param]) -> String {
        params
            .iter()
            .map(|param| {
                let mut out = modifiers(&param.modifiers);
                if let Some(ty) = &param.type_hint {
                    out.push_str(&format!("{} ", ty));
                }
                if param.by_ref {
                    out.push('&');
                }
                if param.variadic {
                    out.push_str("...");
                }
                out.push('$');
                out.push_str(&param.name);
                if let Some(default) = &param.default {
                    out.push_str(" = ");
                    out.push_str(&self.expr(default));
                }
                out
            })
            .join(", ")
    }

    fn member_name(&self, name: &MemberName) -> String {
        match name {
            MemberName::Ident(ident) => ident.clone(),
            MemberName::Expr(expr) if expr.as_named_variable().is_some() => self.expr(expr),
            MemberName::Expr(expr) => format!("{{{}}}", self.expr(expr)),
        }
    }

    fn class_ref(&self, class: &NameOrExpr) -> String {
        match class {
            NameOrExpr::Name(name) => name.to_string(),
            NameOrExpr::Expr(expr) => self.operand(expr, PREC_POSTFIX),
        }
    }

    fn variable(&self, var: &Variable) -> String {
        match var {
            Variable::Named(name) => format!("${}", name),
            Variable::Dynamic(inner) if inner.is_variable() => format!("${}", self.expr(inner)),
            Variable::Dynamic(inner) => format!("${{{}}}", self.expr(inner)),
        }
    }

    fn array(&self, array: &ExprArray, list: bool) -> String {
        let items = array
            .items
            .iter()
            .map(|item| match item {
                None => String::new(),
                Some(item) => {
                    let mut out = String::new();
                    if let Some(key) = &item.key {
                        out.push_str(&self.expr(key));
                        out.push_str(" => ");
                    }
                    if item.by_ref {
                        out.push('&');
                    }
                    if item.unpack {
                        out.push_str("...");
                    }
                    out.push_str(&self.expr(&item.value));
                    out
                }
            })
            .join(", ");
        match (array.short, list) {
            (true, _) => format!("[{}]", items),
            (false, true) => format!("list({})", items),
            (false, false) => format!("array({})", items),
        }
    }

    fn body(&self, stmts: &[Stmt]) -> String {
        let inner = pretty(stmts, self.options.clone())
            .indented(self.indent + self.options.indent_size)
            .to_string();
        format!("{{\n{}{}}}", inner, " ".repeat(self.indent))
    }

    fn string_literal(&self, value: &str, double_quoted: bool) -> String {
        if double_quoted || value.chars().any(|ch| ch.is_control()) {
            format!("\"{}\"", escape_double_quoted(value))
        } else {
            format!("'{}'", escape_single_quoted(value))
        }
    }

    fn interpolated(&self, parts: &[StringPart]) -> String {
        let mut out = String::from("\"");
        for part in parts {
            match part {
                StringPart::Literal(text) => out.push_str(&escape_double_quoted(text)),
                StringPart::Expr(expr) => {
                    out.push('{');
                    out.push_str(&self.expr(expr));
                    out.push('}');
                }
            }
        }
        out.push('"');
        out
    }

    pub fn expr(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Variable(var) => self.variable(var),
            ExprKind::Literal(Literal::Int(value)) => value.to_string(),
            ExprKind::Literal(Literal::Float(value)) => format_float(*value),
            ExprKind::Literal(Literal::String {
                value,
                double_quoted,
            }) => self.string_literal(value, *double_quoted),
            ExprKind::Interpolated(parts) => self.interpolated(parts),
            ExprKind::Array(array) => self.array(array, false),
            ExprKind::List(array) => self.array(array, true),
            ExprKind::ArrayDimFetch(fetch) => format!(
                "{}[{}]",
                self.operand(&fetch.var, PREC_POSTFIX),
                fetch
                    .dim
                    .as_ref()
                    .map(|dim| self.expr(dim))
                    .unwrap_or_default()
            ),
            ExprKind::PropertyFetch(fetch) => format!(
                "{}{}{}",
                self.operand(&fetch.var, PREC_POSTFIX),
                if fetch.nullsafe { "?->" } else { "->" },
                self.member_name(&fetch.name)
            ),
            ExprKind::StaticPropertyFetch(fetch) => format!(
                "{}::{}",
                self.class_ref(&fetch.class),
                self.variable(&fetch.name)
            ),
            ExprKind::ConstFetch(name) => name.to_string(),
            ExprKind::ClassConstFetch(fetch) => {
                format!("{}::{}", self.class_ref(&fetch.class), fetch.name)
            }
            ExprKind::Assign(assign) => format!(
                "{} = {}{}",
                self.operand(&assign.var, PREC_POSTFIX),
                if assign.by_ref { "&" } else { "" },
                self.operand(&assign.value, PREC_ASSIGN)
            ),
            ExprKind::AssignOp(assign) => format!(
                "{} {}= {}",
                self.operand(&assign.var, PREC_POSTFIX),
                assign.op.symbol(),
                self.operand(&assign.value, PREC_ASSIGN)
            ),
            ExprKind::BinOp(binop) => {
                let prec = binop.op.precedence();
                let (lhs_min, rhs_min) = if binop.op.is_right_assoc() {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                format!(
                    "{} {} {}",
                    self.operand(&binop.lhs, lhs_min),
                    binop.op.symbol(),
                    self.operand(&binop.rhs, rhs_min)
                )
            }
            ExprKind::UnOp(unop) => {
                let min = if unop.op == UnOpKind::Not {
                    PREC_NOT
                } else {
                    PREC_UNARY
                };
                let operand = self.operand(&unop.expr, min);
                let symbol = unop.op.symbol();
                if operand.starts_with(symbol) && symbol != "!" {
                    format!("{} {}", symbol, operand)
                } else {
                    format!("{}{}", symbol, operand)
                }
            }
            ExprKind::IncDec(incdec) => {
                let op = if incdec.increment { "++" } else { "--" };
                let var = self.operand(&incdec.var, PREC_POSTFIX);
                if incdec.prefix {
                    format!("{}{}", op, var)
                } else {
                    format!("{}{}", var, op)
                }
            }
            ExprKind::Ternary(ternary) => {
                let cond = self.operand(&ternary.cond, PREC_TERNARY + 1);
                let otherwise = self.operand(&ternary.otherwise, PREC_TERNARY + 1);
                match &ternary.then {
                    Some(then) => format!(
                        "{} ? {} : {}",
                        cond,
                        self.operand(then, PREC_ASSIGN),
                        otherwise
                    ),
                    None => format!("{} ?: {}", cond, otherwise),
                }
            }
            ExprKind::Instanceof(instanceof) => format!(
                "{} instanceof {}",
                self.operand(&instanceof.expr, PREC_INSTANCEOF),
                self.class_ref(&instanceof.class)
            ),
            ExprKind::FuncCall(call) => {
                let name = match &call.name {
                    NameOrExpr::Name(name) => name.to_string(),
                    NameOrExpr::Expr(expr) => self.operand(expr, PREC_POSTFIX),
                };
                format!("{}({})", name, self.args(&call.args))
            }
            ExprKind::MethodCall(call) => format!(
                "{}{}{}({})",
                self.operand(&call.var, PREC_POSTFIX),
                if call.nullsafe { "?->" } else { "->" },
                self.member_name(&call.name),
                self.args(&call.args)
            ),
            ExprKind::StaticCall(call) => format!(
                "{}::{}({})",
                self.class_ref(&call.class),
                self.member_name(&call.name),
                self.args(&call.args)
            ),
            ExprKind::New(new) => match &new.class {
                NewClass::Name(name) => format!("new {}({})", name, self.args(&new.args)),
                NewClass::Expr(expr) => format!(
                    "new {}({})",
                    self.operand(expr, PREC_POSTFIX),
                    self.args(&new.args)
                ),
                NewClass::Anonymous(class) => {
                    let header = format!(
                        "new class({}){}",
                        self.args(&new.args),
                        class_header(class)
                    );
                    let rendered = AnonymousClass {
                        header,
                        members: &class.members,
                    };
                    let text = pretty(&rendered, self.options.clone())
                        .indented(self.indent)
                        .to_string();
                    text.trim_start().trim_end_matches('\n').to_string()
                }
            },
            ExprKind::Clone(inner) => format!("clone {}", self.operand(inner, PREC_NEW)),
            ExprKind::Closure(closure) => {
                let mut out = String::new();
                if closure.is_static {
                    out.push_str("static ");
                }
                out.push_str("function ");
                if closure.by_ref {
                    out.push('&');
                }
                out.push_str(&format!("({})", self.params(&closure.params)));
                if !closure.uses.is_empty() {
                    let uses = closure
                        .uses
                        .iter()
                        .map(|u| format!("{}${}", if u.by_ref { "&" } else { "" }, u.name))
                        .join(", ");
                    out.push_str(&format!(" use ({})", uses));
                }
                if let Some(ty) = &closure.return_type {
                    out.push_str(&format!(": {}", ty));
                }
                out.push(' ');
                out.push_str(&self.body(&closure.body));
                out
            }
            ExprKind::ArrowFn(arrow) => {
                let mut out = String::new();
                if arrow.is_static {
                    out.push_str("static ");
                }
                out.push_str("fn");
                if arrow.by_ref {
                    out.push('&');
                }
                out.push_str(&format!("({})", self.params(&arrow.params)));
                if let Some(ty) = &arrow.return_type {
                    out.push_str(&format!(": {}", ty));
                }
                out.push_str(" => ");
                out.push_str(&self.operand(&arrow.expr, PREC_ASSIGN - 1));
                out
            }
            ExprKind::Isset(vars) => format!("isset({})", self.list(vars)),
            ExprKind::Empty(inner) => format!("empty({})", self.expr(inner)),
            ExprKind::Exit(exit) => {
                let keyword = match exit.kind {
                    ExitKind::Exit => "exit",
                    ExitKind::Die => "die",
                };
                match &exit.expr {
                    Some(inner) => format!("{}({})", keyword, self.expr(inner)),
                    None => keyword.to_string(),
                }
            }
            ExprKind::Include(include) => {
                format!("{} {}", include.kind.keyword(), self.expr(&include.expr))
            }
            ExprKind::MagicConst(magic) => magic.name().to_string(),
            ExprKind::Yield(yield_expr) => match (&yield_expr.key, &yield_expr.value) {
                (Some(key), Some(value)) => format!(
                    "yield {} => {}",
                    self.operand(key, PREC_TERNARY),
                    self.operand(value, PREC_TERNARY)
                ),
                (None, Some(value)) => format!("yield {}", self.operand(value, PREC_TERNARY)),
                _ => "yield".to_string(),
            },
            ExprKind::YieldFrom(inner) => format!("yield from {}", self.expr(inner)),
            ExprKind::Cast(cast) => format!(
                "({}) {}",
                cast.kind.name(),
                self.operand(&cast.expr, PREC_UNARY)
            ),
            ExprKind::Print(inner) => format!("print {}", self.operand(inner, PREC_ASSIGN)),
            ExprKind::Throw(inner) => format!("throw {}", self.expr(inner)),
            ExprKind::ErrorSuppress(inner) => format!("@{}", self.operand(inner, PREC_UNARY)),
            ExprKind::NoReturnValue => "new \\Psy\\CodeCleaner\\NoReturnValue()".to_string(),
        }
    }
}

struct AnonymousClass<'m> {
    header: String,
    members: &'m [ClassMember],
}

impl crate::pretty::PrettyPrintable for AnonymousClass<'_> {
    fn fmt_pretty(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        ctx: &mut crate::pretty::PrettyCtx<'_>,
    ) -> std::fmt::Result {
        fmt_members(self.header.clone(), self.members, f, ctx)
    }
}
