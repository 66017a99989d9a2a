use crate::ast::{ClassDecl, ConstItem, Expr, FunctionDecl, InterfaceDecl, Name, TraitDecl};
use crate::span::Span;
use crate::{common_enum, common_struct};

common_struct! {
    pub struct Stmt {
        pub kind: StmtKind,
        pub span: Span,
    }
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn line(&self) -> u32 {
        self.span.start_line
    }

    pub fn expr(expr: Expr) -> Self {
        let span = expr.span;
        Self::new(StmtKind::Expr(expr), span)
    }

    pub fn ret(expr: Option<Expr>, span: Span) -> Self {
        Self::new(StmtKind::Return(expr), span)
    }
}

common_enum! {
    pub enum StmtKind {
        /// Expression statement: `foo();`
        Expr(Expr),
        Echo(Vec<Expr>),
        Return(Option<Expr>),
        If(StmtIf),
        While(StmtWhile),
        DoWhile(StmtDoWhile),
        For(StmtFor),
        Foreach(StmtForeach),
        Switch(StmtSwitch),
        Break(Option<Expr>),
        Continue(Option<Expr>),
        Goto(String),
        Label(String),
        Block(Vec<Stmt>),
        Declare(StmtDeclare),
        Namespace(StmtNamespace),
        Use(StmtUse),
        Function(FunctionDecl),
        Class(ClassDecl),
        Interface(InterfaceDecl),
        Trait(TraitDecl),
        Try(StmtTry),
        Throw(Expr),
        Unset(Vec<Expr>),
        Global(Vec<Expr>),
        Static(Vec<StaticVar>),
        Const(Vec<ConstItem>),
        Nop,
    }
}

common_struct! {
    pub struct StmtIf {
        pub cond: Expr,
        pub then: Vec<Stmt>,
        pub elseifs: Vec<ElseIf>,
        pub otherwise: Option<Vec<Stmt>>,
    }
}

common_struct! {
    pub struct ElseIf {
        pub cond: Expr,
        pub body: Vec<Stmt>,
        pub span: Span,
    }
}

common_struct! {
    pub struct StmtWhile {
        pub cond: Expr,
        pub body: Vec<Stmt>,
    }
}

common_struct! {
    pub struct StmtDoWhile {
        pub body: Vec<Stmt>,
        pub cond: Expr,
    }
}

common_struct! {
    pub struct StmtFor {
        pub init: Vec<Expr>,
        pub cond: Vec<Expr>,
        pub step: Vec<Expr>,
        pub body: Vec<Stmt>,
    }
}

common_struct! {
    pub struct StmtForeach {
        pub expr: Expr,
        pub key: Option<Expr>,
        pub value: Expr,
        pub by_ref: bool,
        pub body: Vec<Stmt>,
    }
}

common_struct! {
    pub struct StmtSwitch {
        pub subject: Expr,
        pub cases: Vec<SwitchCase>,
    }
}

common_struct! {
    pub struct SwitchCase {
        /// `None` for `default:`.
        pub cond: Option<Expr>,
        pub body: Vec<Stmt>,
        pub span: Span,
    }
}

common_struct! {
    pub struct DeclareDirective {
        pub key: String,
        pub value: Expr,
    }
}

common_struct! {
    pub struct StmtDeclare {
        pub directives: Vec<DeclareDirective>,
        pub body: Option<Vec<Stmt>>,
    }
}

common_struct! {
    pub struct StmtNamespace {
        /// `None` for the braced global namespace `namespace { }`.
        pub name: Option<Name>,
        pub body: Vec<Stmt>,
        pub braced: bool,
        /// Inserted by the cleaner to carry the session namespace into a snippet.
        pub synthetic: bool,
    }
}

common_enum! {
    unit
    pub enum UseKind {
        Normal,
        Function,
        Const,
    }
}

impl UseKind {
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            UseKind::Normal => None,
            UseKind::Function => Some("function"),
            UseKind::Const => Some("const"),
        }
    }
}

common_struct! {
    pub struct UseItem {
        pub name: Name,
        pub alias: Option<String>,
        /// Per-item kind inside a mixed group use: `use A\{function b, C}`.
        pub kind: Option<UseKind>,
        pub span: Span,
    }
}

impl UseItem {
    /// The short name this item binds: the explicit alias or the last segment.
    pub fn alias_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.name.last())
    }
}

common_struct! {
    pub struct StmtUse {
        pub kind: UseKind,
        /// Shared prefix of a group use statement.
        pub prefix: Option<Name>,
        pub uses: Vec<UseItem>,
    }
}

impl StmtUse {
    /// Effective kind and full name of every item, with group prefixes applied.
    pub fn resolved_items(&self) -> Vec<(UseKind, Vec<String>, &UseItem)> {
        self.uses
            .iter()
            .map(|item| {
                let kind = item.kind.unwrap_or(self.kind);
                let mut parts = self
                    .prefix
                    .as_ref()
                    .map(|prefix| prefix.parts.clone())
                    .unwrap_or_default();
                parts.extend(item.name.parts.iter().cloned());
                (kind, parts, item)
            })
            .collect()
    }
}

common_struct! {
    pub struct Catch {
        pub types: Vec<Name>,
        pub var: Option<String>,
        pub body: Vec<Stmt>,
        pub span: Span,
    }
}

common_struct! {
    pub struct StmtTry {
        pub body: Vec<Stmt>,
        pub catches: Vec<Catch>,
        pub finally: Option<Vec<Stmt>>,
    }
}

common_struct! {
    pub struct StaticVar {
        pub name: String,
        pub default: Option<Expr>,
    }
}
