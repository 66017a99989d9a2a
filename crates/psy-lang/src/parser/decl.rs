use psy_core::ast::{
    ArrowFn, ClassConstDecl, ClassDecl, ClassMember, ClassMethod, ClassModifiers, Closure,
    ClosureUse, FunctionDecl, InterfaceDecl, MemberKind, Modifiers, Name, Param, PropertyDecl,
    PropertyItem, StmtKind, TraitDecl, TypeHint, Visibility, PREC_ASSIGN,
};

use super::{PResult, Parser};
use crate::lexer::{Keyword, TokenKind};

impl<'t> Parser<'t> {
    /// `function foo(` and `function &foo(` declare; `function (` is a closure.
    pub(crate) fn is_function_declaration(&self) -> bool {
        let offset = if self.nth_is_symbol(1, "&") { 2 } else { 1 };
        self.peek_nth(offset).is_some_and(|token| token.is_word())
    }

    pub(crate) fn parse_function_decl(&mut self) -> PResult<StmtKind> {
        self.expect_keyword(Keyword::Function, "function")?;
        let by_ref = self.match_symbol("&");
        let name = self.expect_word()?.lexeme.clone();
        let params = self.parse_params()?;
        let return_type = self.parse_return_type()?;
        let body = self.parse_block()?;
        Ok(StmtKind::Function(FunctionDecl {
            name,
            by_ref,
            params,
            return_type,
            body,
        }))
    }

    pub(crate) fn parse_class_decl(&mut self) -> PResult<StmtKind> {
        let mut modifiers = ClassModifiers::default();
        loop {
            if self.match_keyword(Keyword::Abstract) {
                modifiers.is_abstract = true;
            } else if self.match_keyword(Keyword::Final) {
                modifiers.is_final = true;
            } else if self.match_keyword(Keyword::Readonly) {
                modifiers.is_readonly = true;
            } else {
                break;
            }
        }
        self.expect_keyword(Keyword::Class, "class")?;
        let name = self.expect_ident()?.lexeme.clone();
        let mut class = self.parse_class_tail(modifiers)?;
        class.name = Some(name);
        Ok(StmtKind::Class(class))
    }

    /// `extends`, `implements` and the member list; shared with anonymous classes.
    pub(crate) fn parse_class_tail(&mut self, modifiers: ClassModifiers) -> PResult<ClassDecl> {
        let extends = if self.match_keyword(Keyword::Extends) {
            Some(self.parse_type_name()?)
        } else {
            None
        };
        let mut implements = Vec::new();
        if self.match_keyword(Keyword::Implements) {
            implements = self.parse_name_list()?;
        }
        let members = self.parse_class_body()?;
        Ok(ClassDecl {
            name: None,
            modifiers,
            extends,
            implements,
            members,
        })
    }

    pub(crate) fn parse_interface_decl(&mut self) -> PResult<StmtKind> {
        self.advance();
        let name = self.expect_ident()?.lexeme.clone();
        let mut extends = Vec::new();
        if self.match_keyword(Keyword::Extends) {
            extends = self.parse_name_list()?;
        }
        let members = self.parse_class_body()?;
        Ok(StmtKind::Interface(InterfaceDecl {
            name,
            extends,
            members,
        }))
    }

    pub(crate) fn parse_trait_decl(&mut self) -> PResult<StmtKind> {
        self.advance();
        let name = self.expect_ident()?.lexeme.clone();
        let members = self.parse_class_body()?;
        Ok(StmtKind::Trait(TraitDecl { name, members }))
    }

    fn parse_name_list(&mut self) -> PResult<Vec<Name>> {
        let mut names = vec![self.parse_type_name()?];
        while self.match_symbol(",") {
            names.push(self.parse_type_name()?);
        }
        Ok(names)
    }

    /// A class-like reference as written: `Foo`, `Foo\Bar`, `\Foo`, `namespace\Foo`.
    pub(crate) fn parse_type_name(&mut self) -> PResult<Name> {
        match self.peek() {
            Some(token) if matches!(token.kind, TokenKind::Ident | TokenKind::Name) => {
                self.advance();
                Ok(Name::parse(&token.lexeme, Self::token_span(token)))
            }
            _ => Err(self.unexpected_expecting("identifier")),
        }
    }

    fn parse_class_body(&mut self) -> PResult<Vec<ClassMember>> {
        self.expect_symbol("{")?;
        let mut members = Vec::new();
        while !self.match_symbol("}") {
            if self.at_eof() {
                return Err(self.unexpected());
            }
            members.push(self.parse_member()?);
        }
        Ok(members)
    }

    fn parse_member(&mut self) -> PResult<ClassMember> {
        let start = self.pos;
        if self.match_keyword(Keyword::Use) {
            let traits = self.parse_name_list()?;
            if self.match_symbol("{") {
                self.skip_balanced_braces()?;
            } else {
                self.expect_semicolon()?;
            }
            return Ok(ClassMember {
                kind: MemberKind::TraitUse(traits),
                span: self.span_from(start),
            });
        }

        let modifiers = self.parse_modifiers();
        let kind = if self.match_keyword(Keyword::Const) {
            let consts = self.parse_const_items()?;
            self.expect_semicolon()?;
            MemberKind::Const(ClassConstDecl { modifiers, consts })
        } else if self.match_keyword(Keyword::Function) {
            let by_ref = self.match_symbol("&");
            let name = self.expect_word()?.lexeme.clone();
            let params = self.parse_params()?;
            let return_type = self.parse_return_type()?;
            let body = if self.match_symbol(";") {
                None
            } else {
                Some(self.parse_block()?)
            };
            MemberKind::Method(ClassMethod {
                name,
                modifiers,
                by_ref,
                params,
                return_type,
                body,
            })
        } else {
            let type_hint = if self
                .peek()
                .is_some_and(|token| token.kind == TokenKind::Variable)
            {
                None
            } else {
                Some(self.parse_type()?)
            };
            let mut props = Vec::new();
            loop {
                let name = self.expect_variable()?;
                let default = if self.match_symbol("=") {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                props.push(PropertyItem { name, default });
                if !self.match_symbol(",") {
                    break;
                }
            }
            self.expect_semicolon()?;
            MemberKind::Property(PropertyDecl {
                modifiers,
                type_hint,
                props,
            })
        };
        Ok(ClassMember {
            kind,
            span: self.span_from(start),
        })
    }

    /// Visibility and the other member modifiers in any order; `var` adds nothing.
    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            let Some(token) = self.peek() else {
                break;
            };
            match token.kind {
                TokenKind::Keyword(Keyword::Public) => {
                    modifiers.visibility = Some(Visibility::Public)
                }
                TokenKind::Keyword(Keyword::Protected) => {
                    modifiers.visibility = Some(Visibility::Protected)
                }
                TokenKind::Keyword(Keyword::Private) => {
                    modifiers.visibility = Some(Visibility::Private)
                }
                TokenKind::Keyword(Keyword::Static) => modifiers.is_static = true,
                TokenKind::Keyword(Keyword::Abstract) => modifiers.is_abstract = true,
                TokenKind::Keyword(Keyword::Final) => modifiers.is_final = true,
                TokenKind::Keyword(Keyword::Readonly) => modifiers.is_readonly = true,
                TokenKind::Keyword(Keyword::Var) => {}
                _ => break,
            }
            self.advance();
        }
        modifiers
    }

    fn skip_balanced_braces(&mut self) -> PResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.advance() else {
                return Err(self.unexpected());
            };
            if token.is_symbol("{") {
                depth += 1;
            } else if token.is_symbol("}") {
                depth -= 1;
            }
        }
        Ok(())
    }

    pub(crate) fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect_symbol("(")?;
        let mut params = Vec::new();
        while !self.at_symbol(")") {
            params.push(self.parse_param()?);
            if !self.match_symbol(",") {
                break;
            }
        }
        self.expect_symbol(")")?;
        Ok(params)
    }

    fn parse_param(&mut self) -> PResult<Param> {
        let start = self.pos;
        let mut modifiers = Modifiers::default();
        loop {
            if self.match_keyword(Keyword::Public) {
                modifiers.visibility = Some(Visibility::Public);
            } else if self.match_keyword(Keyword::Protected) {
                modifiers.visibility = Some(Visibility::Protected);
            } else if self.match_keyword(Keyword::Private) {
                modifiers.visibility = Some(Visibility::Private);
            } else if self.match_keyword(Keyword::Readonly) {
                modifiers.is_readonly = true;
            } else {
                break;
            }
        }
        let type_hint = match self.peek() {
            Some(token)
                if token.kind == TokenKind::Variable
                    || token.is_symbol("&")
                    || token.is_symbol("...") =>
            {
                None
            }
            _ => Some(self.parse_type()?),
        };
        let by_ref = self.match_symbol("&");
        let variadic = self.match_symbol("...");
        let name = self.expect_variable()?;
        let default = if self.match_symbol("=") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Param {
            name,
            type_hint,
            default,
            by_ref,
            variadic,
            modifiers,
            span: self.span_from(start),
        })
    }

    pub(crate) fn parse_return_type(&mut self) -> PResult<Option<TypeHint>> {
        if self.match_symbol(":") {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn parse_type(&mut self) -> PResult<TypeHint> {
        if self.match_symbol("?") {
            return Ok(TypeHint::Nullable(Box::new(self.parse_single_type()?)));
        }
        let first = self.parse_single_type()?;
        if self.at_symbol("|") {
            let mut types = vec![first];
            while self.match_symbol("|") {
                types.push(self.parse_single_type()?);
            }
            return Ok(TypeHint::Union(types));
        }
        // `A&B $x` is an intersection, `A &$x` a by-reference parameter
        if self.at_symbol("&")
            && self
                .peek_nth(1)
                .is_some_and(|token| matches!(token.kind, TokenKind::Ident | TokenKind::Name))
        {
            let mut types = vec![first];
            while self.at_symbol("&")
                && self
                    .peek_nth(1)
                    .is_some_and(|token| matches!(token.kind, TokenKind::Ident | TokenKind::Name))
            {
                self.advance();
                types.push(self.parse_single_type()?);
            }
            return Ok(TypeHint::Intersection(types));
        }
        Ok(first)
    }

    fn parse_single_type(&mut self) -> PResult<TypeHint> {
        match self.peek() {
            Some(token) if token.is_word() || token.kind == TokenKind::Name => {
                self.advance();
                Ok(TypeHint::Named(Name::parse(
                    &token.lexeme,
                    Self::token_span(token),
                )))
            }
            _ => Err(self.unexpected_expecting("type")),
        }
    }

    pub(crate) fn parse_closure(&mut self, is_static: bool) -> PResult<Closure> {
        self.expect_keyword(Keyword::Function, "function")?;
        let by_ref = self.match_symbol("&");
        let params = self.parse_params()?;
        let mut uses = Vec::new();
        if self.match_keyword(Keyword::Use) {
            self.expect_symbol("(")?;
            while !self.at_symbol(")") {
                let by_ref = self.match_symbol("&");
                let name = self.expect_variable()?;
                uses.push(ClosureUse { name, by_ref });
                if !self.match_symbol(",") {
                    break;
                }
            }
            self.expect_symbol(")")?;
        }
        let return_type = self.parse_return_type()?;
        let body = self.parse_block()?;
        Ok(Closure {
            is_static,
            by_ref,
            params,
            uses,
            return_type,
            body,
        })
    }

    pub(crate) fn parse_arrow_fn(&mut self, is_static: bool) -> PResult<ArrowFn> {
        self.expect_keyword(Keyword::Fn, "fn")?;
        let by_ref = self.match_symbol("&");
        let params = self.parse_params()?;
        let return_type = self.parse_return_type()?;
        self.expect_symbol("=>")?;
        let expr = self.parse_expr_prec(PREC_ASSIGN)?;
        Ok(ArrowFn {
            is_static,
            by_ref,
            params,
            return_type,
            expr: Box::new(expr),
        })
    }
}
