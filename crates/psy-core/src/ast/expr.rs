use crate::ast::{ClassDecl, Name, Param, TypeHint};
use crate::span::Span;
use crate::{common_enum, common_struct};

common_struct! {
    pub struct Expr {
        pub kind: ExprKind,
        pub span: Span,
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn line(&self) -> u32 {
        self.span.start_line
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Variable(Variable::Named(name.into())), span)
    }

    pub fn int(value: i64, span: Span) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(value)), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Self {
        Self::new(
            ExprKind::Literal(Literal::String {
                value: value.into(),
                double_quoted: false,
            }),
            span,
        )
    }

    pub fn const_fetch(name: Name, span: Span) -> Self {
        Self::new(ExprKind::ConstFetch(name), span)
    }

    /// `\Fully\Qualified::method(args)`
    pub fn static_call(class: Name, method: impl Into<String>, args: Vec<Arg>, span: Span) -> Self {
        Self::new(
            ExprKind::StaticCall(ExprStaticCall {
                class: NameOrExpr::Name(class),
                name: MemberName::Ident(method.into()),
                args,
            }),
            span,
        )
    }

    pub fn func_call(name: Name, args: Vec<Arg>, span: Span) -> Self {
        Self::new(
            ExprKind::FuncCall(ExprFuncCall {
                name: NameOrExpr::Name(name),
                args,
            }),
            span,
        )
    }

    /// Plain `$name` reference, not `$$name`.
    pub fn as_named_variable(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Variable(Variable::Named(name)) => Some(name),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, ExprKind::Variable(_))
    }

    /// Call expressions whose result is a value, never a writable slot.
    pub fn is_call(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::FuncCall(_) | ExprKind::MethodCall(_) | ExprKind::StaticCall(_)
        )
    }

    /// Variables, dim fetches and property fetches: things PHP can write to.
    pub fn is_writable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Variable(_)
                | ExprKind::ArrayDimFetch(_)
                | ExprKind::PropertyFetch(_)
                | ExprKind::StaticPropertyFetch(_)
        )
    }

    /// `null` constant, any case, any qualification level that still means the builtin.
    pub fn is_null_literal(&self) -> bool {
        matches!(&self.kind, ExprKind::ConstFetch(name) if name.parts.len() == 1 && name.is("null"))
    }
}

common_enum! {
    pub enum ExprKind {
        Variable(Variable),
        Literal(Literal),
        /// Double-quoted string or heredoc with embedded expressions.
        Interpolated(Vec<StringPart>),
        Array(ExprArray),
        /// `list(...)` destructuring target.
        List(ExprArray),
        ArrayDimFetch(ExprArrayDimFetch),
        PropertyFetch(ExprPropertyFetch),
        StaticPropertyFetch(ExprStaticPropertyFetch),
        ConstFetch(Name),
        ClassConstFetch(ExprClassConstFetch),
        Assign(ExprAssign),
        AssignOp(ExprAssignOp),
        BinOp(ExprBinOp),
        UnOp(ExprUnOp),
        IncDec(ExprIncDec),
        Ternary(ExprTernary),
        Instanceof(ExprInstanceof),
        FuncCall(ExprFuncCall),
        MethodCall(ExprMethodCall),
        StaticCall(ExprStaticCall),
        New(ExprNew),
        Clone(Box<Expr>),
        Closure(Closure),
        ArrowFn(ArrowFn),
        Isset(Vec<Expr>),
        Empty(Box<Expr>),
        Exit(ExprExit),
        Include(ExprInclude),
        MagicConst(MagicConst),
        Yield(ExprYield),
        YieldFrom(Box<Expr>),
        Cast(ExprCast),
        Print(Box<Expr>),
        Throw(Box<Expr>),
        ErrorSuppress(Box<Expr>),
        /// Sentinel returned by snippets whose last statement has no value.
        NoReturnValue,
    }
}

common_enum! {
    pub enum Variable {
        /// `$name`
        Named(String),
        /// `$$name` or `${expr}`
        Dynamic(Box<Expr>),
    }
}

common_enum! {
    pub enum Literal {
        Int(i64),
        Float(f64),
        String { value: String, double_quoted: bool },
    }
}

common_enum! {
    pub enum StringPart {
        Literal(String),
        Expr(Expr),
    }
}

common_struct! {
    pub struct ExprArray {
        /// `None` marks a skipped position, e.g. `[, $b] = $pair`.
        pub items: Vec<Option<ArrayItem>>,
        /// `[...]` rather than `array(...)`.
        pub short: bool,
    }
}

common_struct! {
    pub struct ArrayItem {
        pub key: Option<Expr>,
        pub value: Expr,
        pub by_ref: bool,
        pub unpack: bool,
        pub span: Span,
    }
}

common_struct! {
    pub struct ExprArrayDimFetch {
        pub var: Box<Expr>,
        /// `None` for `$a[]`.
        pub dim: Option<Box<Expr>>,
    }
}

common_enum! {
    pub enum MemberName {
        Ident(String),
        /// `->$name` or `->{expr}`
        Expr(Box<Expr>),
    }
}

common_enum! {
    /// Either a static name or a dynamic expression in name position:
    /// `foo()` vs `$fn()`, `Foo::bar()` vs `$class::bar()`.
    pub enum NameOrExpr {
        Name(Name),
        Expr(Box<Expr>),
    }
}

impl NameOrExpr {
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            NameOrExpr::Name(name) => Some(name),
            NameOrExpr::Expr(_) => None,
        }
    }
}

common_struct! {
    pub struct ExprPropertyFetch {
        pub var: Box<Expr>,
        pub name: MemberName,
        pub nullsafe: bool,
    }
}

common_struct! {
    pub struct ExprStaticPropertyFetch {
        pub class: NameOrExpr,
        pub name: Variable,
    }
}

common_struct! {
    pub struct ExprClassConstFetch {
        pub class: NameOrExpr,
        /// `class` for `Foo::class`.
        pub name: String,
    }
}

common_struct! {
    pub struct ExprAssign {
        pub var: Box<Expr>,
        pub value: Box<Expr>,
        /// `$a = &$b`
        pub by_ref: bool,
    }
}

common_struct! {
    pub struct ExprAssignOp {
        pub op: BinOpKind,
        pub var: Box<Expr>,
        pub value: Box<Expr>,
    }
}

common_struct! {
    pub struct ExprBinOp {
        pub op: BinOpKind,
        pub lhs: Box<Expr>,
        pub rhs: Box<Expr>,
    }
}

common_enum! {
    unit
    pub enum BinOpKind {
        Add,
        Sub,
        Mul,
        Div,
        Mod,
        Pow,
        Concat,
        BitAnd,
        BitOr,
        BitXor,
        Shl,
        Shr,
        BoolAnd,
        BoolOr,
        LogicalAnd,
        LogicalOr,
        LogicalXor,
        Eq,
        NotEq,
        Identical,
        NotIdentical,
        Lt,
        Le,
        Gt,
        Ge,
        Spaceship,
        Coalesce,
    }
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Mod => "%",
            BinOpKind::Pow => "**",
            BinOpKind::Concat => ".",
            BinOpKind::BitAnd => "&",
            BinOpKind::BitOr => "|",
            BinOpKind::BitXor => "^",
            BinOpKind::Shl => "<<",
            BinOpKind::Shr => ">>",
            BinOpKind::BoolAnd => "&&",
            BinOpKind::BoolOr => "||",
            BinOpKind::LogicalAnd => "and",
            BinOpKind::LogicalOr => "or",
            BinOpKind::LogicalXor => "xor",
            BinOpKind::Eq => "==",
            BinOpKind::NotEq => "!=",
            BinOpKind::Identical => "===",
            BinOpKind::NotIdentical => "!==",
            BinOpKind::Lt => "<",
            BinOpKind::Le => "<=",
            BinOpKind::Gt => ">",
            BinOpKind::Ge => ">=",
            BinOpKind::Spaceship => "<=>",
            BinOpKind::Coalesce => "??",
        }
    }

    /// Binding power, higher binds tighter. Shared by the parser and the printer.
    pub fn precedence(&self) -> u8 {
        match self {
            BinOpKind::LogicalOr => 1,
            BinOpKind::LogicalXor => 2,
            BinOpKind::LogicalAnd => 3,
            // 4: assignment, 5: ternary
            BinOpKind::Coalesce => 6,
            BinOpKind::BoolOr => 7,
            BinOpKind::BoolAnd => 8,
            BinOpKind::BitOr => 9,
            BinOpKind::BitXor => 10,
            BinOpKind::BitAnd => 11,
            BinOpKind::Eq
            | BinOpKind::NotEq
            | BinOpKind::Identical
            | BinOpKind::NotIdentical
            | BinOpKind::Spaceship => 12,
            BinOpKind::Lt | BinOpKind::Le | BinOpKind::Gt | BinOpKind::Ge => 13,
            BinOpKind::Concat => 14,
            BinOpKind::Shl | BinOpKind::Shr => 15,
            BinOpKind::Add | BinOpKind::Sub => 16,
            BinOpKind::Mul | BinOpKind::Div | BinOpKind::Mod => 17,
            // 18: `!`, 19: instanceof, 20: unary and casts
            BinOpKind::Pow => 21,
        }
    }

    pub fn is_right_assoc(&self) -> bool {
        matches!(self, BinOpKind::Pow | BinOpKind::Coalesce)
    }
}

pub const PREC_ASSIGN: u8 = 4;
pub const PREC_TERNARY: u8 = 5;
pub const PREC_NOT: u8 = 18;
pub const PREC_INSTANCEOF: u8 = 19;
pub const PREC_UNARY: u8 = 20;
pub const PREC_NEW: u8 = 21;
pub const PREC_POSTFIX: u8 = 22;
pub const PREC_PRIMARY: u8 = 100;

common_struct! {
    pub struct ExprUnOp {
        pub op: UnOpKind,
        pub expr: Box<Expr>,
    }
}

common_enum! {
    unit
    pub enum UnOpKind {
        Not,
        Neg,
        Plus,
        BitNot,
    }
}

impl UnOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOpKind::Not => "!",
            UnOpKind::Neg => "-",
            UnOpKind::Plus => "+",
            UnOpKind::BitNot => "~",
        }
    }
}

common_struct! {
    pub struct ExprIncDec {
        pub var: Box<Expr>,
        pub increment: bool,
        pub prefix: bool,
    }
}

common_struct! {
    pub struct ExprTernary {
        pub cond: Box<Expr>,
        /// `None` for the short form `$a ?: $b`.
        pub then: Option<Box<Expr>>,
        pub otherwise: Box<Expr>,
    }
}

common_struct! {
    pub struct ExprInstanceof {
        pub expr: Box<Expr>,
        pub class: NameOrExpr,
    }
}

common_struct! {
    pub struct Arg {
        pub value: Expr,
        /// Call-time `&$x`, removed from the language but still parsed.
        pub by_ref: bool,
        pub unpack: bool,
        pub name: Option<String>,
    }
}

impl Arg {
    pub fn new(value: Expr) -> Self {
        Self {
            value,
            by_ref: false,
            unpack: false,
            name: None,
        }
    }
}

common_struct! {
    pub struct ExprFuncCall {
        pub name: NameOrExpr,
        pub args: Vec<Arg>,
    }
}

common_struct! {
    pub struct ExprMethodCall {
        pub var: Box<Expr>,
        pub name: MemberName,
        pub args: Vec<Arg>,
        pub nullsafe: bool,
    }
}

common_struct! {
    pub struct ExprStaticCall {
        pub class: NameOrExpr,
        pub name: MemberName,
        pub args: Vec<Arg>,
    }
}

common_enum! {
    pub enum NewClass {
        Name(Name),
        Expr(Box<Expr>),
        Anonymous(Box<ClassDecl>),
    }
}

common_struct! {
    pub struct ExprNew {
        pub class: NewClass,
        pub args: Vec<Arg>,
    }
}

common_struct! {
    pub struct ClosureUse {
        pub name: String,
        pub by_ref: bool,
    }
}

common_struct! {
    pub struct Closure {
        pub is_static: bool,
        pub by_ref: bool,
        pub params: Vec<Param>,
        pub uses: Vec<ClosureUse>,
        pub return_type: Option<TypeHint>,
        pub body: Vec<crate::ast::Stmt>,
    }
}

common_struct! {
    pub struct ArrowFn {
        pub is_static: bool,
        pub by_ref: bool,
        pub params: Vec<Param>,
        pub return_type: Option<TypeHint>,
        pub expr: Box<Expr>,
    }
}

common_enum! {
    unit
    pub enum ExitKind {
        Exit,
        Die,
    }
}

common_struct! {
    pub struct ExprExit {
        pub kind: ExitKind,
        pub expr: Option<Box<Expr>>,
    }
}

common_enum! {
    unit
    pub enum IncludeKind {
        Include,
        IncludeOnce,
        Require,
        RequireOnce,
    }
}

impl IncludeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            IncludeKind::Include => "include",
            IncludeKind::IncludeOnce => "include_once",
            IncludeKind::Require => "require",
            IncludeKind::RequireOnce => "require_once",
        }
    }
}

common_struct! {
    pub struct ExprInclude {
        pub kind: IncludeKind,
        pub expr: Box<Expr>,
    }
}

common_enum! {
    unit
    pub enum MagicConst {
        Line,
        File,
        Dir,
        Function,
        Class,
        Trait,
        Method,
        Namespace,
    }
}

impl MagicConst {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "__LINE__" => MagicConst::Line,
            "__FILE__" => MagicConst::File,
            "__DIR__" => MagicConst::Dir,
            "__FUNCTION__" => MagicConst::Function,
            "__CLASS__" => MagicConst::Class,
            "__TRAIT__" => MagicConst::Trait,
            "__METHOD__" => MagicConst::Method,
            "__NAMESPACE__" => MagicConst::Namespace,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            MagicConst::Line => "__LINE__",
            MagicConst::File => "__FILE__",
            MagicConst::Dir => "__DIR__",
            MagicConst::Function => "__FUNCTION__",
            MagicConst::Class => "__CLASS__",
            MagicConst::Trait => "__TRAIT__",
            MagicConst::Method => "__METHOD__",
            MagicConst::Namespace => "__NAMESPACE__",
        }
    }
}

common_struct! {
    pub struct ExprYield {
        pub key: Option<Box<Expr>>,
        pub value: Option<Box<Expr>>,
    }
}

common_enum! {
    unit
    pub enum CastKind {
        Int,
        Float,
        String,
        Bool,
        Array,
        Object,
        Unset,
    }
}

impl CastKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => CastKind::Int,
            "float" | "double" | "real" => CastKind::Float,
            "string" | "binary" => CastKind::String,
            "bool" | "boolean" => CastKind::Bool,
            "array" => CastKind::Array,
            "object" => CastKind::Object,
            "unset" => CastKind::Unset,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CastKind::Int => "int",
            CastKind::Float => "float",
            CastKind::String => "string",
            CastKind::Bool => "bool",
            CastKind::Array => "array",
            CastKind::Object => "object",
            CastKind::Unset => "unset",
        }
    }
}

common_struct! {
    pub struct ExprCast {
        pub kind: CastKind,
        pub expr: Box<Expr>,
    }
}
