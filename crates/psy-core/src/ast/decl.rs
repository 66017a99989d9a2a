use crate::ast::{Expr, Name, Stmt};
use crate::span::Span;
use crate::{common_enum, common_struct};

common_enum! {
    unit
    pub enum Visibility {
        Public,
        Protected,
        Private,
    }
}

impl Visibility {
    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

common_struct! {
    /// Member and promoted-parameter modifiers, in the order PHP prints them.
    #[derive(Default)]
    pub struct Modifiers {
        pub is_abstract: bool,
        pub is_final: bool,
        pub visibility: Option<Visibility>,
        pub is_static: bool,
        pub is_readonly: bool,
    }
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        *self == Modifiers::default()
    }
}

common_enum! {
    pub enum TypeHint {
        Named(Name),
        Nullable(Box<TypeHint>),
        Union(Vec<TypeHint>),
        Intersection(Vec<TypeHint>),
    }
}

impl TypeHint {
    /// `void`, not `?void` nor a union containing it.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeHint::Named(name) if name.is_unqualified() && name.is("void"))
    }

    /// `?T` or a union with `null` in it.
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeHint::Nullable(_) => true,
            TypeHint::Union(types) => types.iter().any(|ty| {
                matches!(ty, TypeHint::Named(name) if name.is_unqualified() && name.is("null"))
            }),
            _ => false,
        }
    }

    /// Any component spelled `void`.
    pub fn mentions_void(&self) -> bool {
        match self {
            TypeHint::Named(_) => self.is_void(),
            TypeHint::Nullable(inner) => inner.mentions_void(),
            TypeHint::Union(types) | TypeHint::Intersection(types) => {
                types.iter().any(TypeHint::mentions_void)
            }
        }
    }
}

impl std::fmt::Display for TypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeHint::Named(name) => write!(f, "{}", name),
            TypeHint::Nullable(inner) => write!(f, "?{}", inner),
            TypeHint::Union(types) => {
                let parts: Vec<String> = types.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join("|"))
            }
            TypeHint::Intersection(types) => {
                let parts: Vec<String> = types.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join("&"))
            }
        }
    }
}

common_struct! {
    pub struct Param {
        pub name: String,
        pub type_hint: Option<TypeHint>,
        pub default: Option<Expr>,
        pub by_ref: bool,
        pub variadic: bool,
        /// Constructor promotion modifiers; empty for ordinary parameters.
        pub modifiers: Modifiers,
        pub span: Span,
    }
}

common_struct! {
    pub struct FunctionDecl {
        pub name: String,
        pub by_ref: bool,
        pub params: Vec<Param>,
        pub return_type: Option<TypeHint>,
        pub body: Vec<Stmt>,
    }
}

common_struct! {
    #[derive(Default)]
    pub struct ClassModifiers {
        pub is_abstract: bool,
        pub is_final: bool,
        pub is_readonly: bool,
    }
}

common_struct! {
    pub struct ClassDecl {
        /// `None` for `new class {}`.
        pub name: Option<String>,
        pub modifiers: ClassModifiers,
        pub extends: Option<Name>,
        pub implements: Vec<Name>,
        pub members: Vec<ClassMember>,
    }
}

common_struct! {
    pub struct InterfaceDecl {
        pub name: String,
        pub extends: Vec<Name>,
        pub members: Vec<ClassMember>,
    }
}

common_struct! {
    pub struct TraitDecl {
        pub name: String,
        pub members: Vec<ClassMember>,
    }
}

common_struct! {
    pub struct ClassMember {
        pub kind: MemberKind,
        pub span: Span,
    }
}

impl ClassMember {
    pub fn line(&self) -> u32 {
        self.span.start_line
    }
}

common_enum! {
    pub enum MemberKind {
        Method(ClassMethod),
        Property(PropertyDecl),
        Const(ClassConstDecl),
        TraitUse(Vec<Name>),
    }
}

common_struct! {
    pub struct ClassMethod {
        pub name: String,
        pub modifiers: Modifiers,
        pub by_ref: bool,
        pub params: Vec<Param>,
        pub return_type: Option<TypeHint>,
        /// `None` for abstract and interface methods declared with `;`.
        pub body: Option<Vec<Stmt>>,
    }
}

common_struct! {
    pub struct PropertyItem {
        pub name: String,
        pub default: Option<Expr>,
    }
}

common_struct! {
    pub struct PropertyDecl {
        pub modifiers: Modifiers,
        pub type_hint: Option<TypeHint>,
        pub props: Vec<PropertyItem>,
    }
}

common_struct! {
    pub struct ConstItem {
        pub name: String,
        pub value: Expr,
    }
}

common_struct! {
    pub struct ClassConstDecl {
        pub modifiers: Modifiers,
        pub consts: Vec<ConstItem>,
    }
}
