use psy_core::ast::{
    Catch, ConstItem, DeclareDirective, ElseIf, Name, NameKind, StaticVar, Stmt, StmtDeclare,
    StmtDoWhile, StmtFor, StmtForeach, StmtIf, StmtKind, StmtNamespace, StmtSwitch, StmtTry,
    StmtUse, StmtWhile, SwitchCase, UseItem, UseKind, PREC_ASSIGN,
};

use super::{PResult, Parser};
use crate::error::ParseError;
use crate::lexer::{Keyword, TokenKind};

impl<'t> Parser<'t> {
    pub(crate) fn parse_program(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            while self.match_symbol(";") {}
            if self.at_eof() {
                break;
            }
            stmts.push(self.parse_statement()?);
        }
        Ok(nest_unbraced_namespaces(stmts))
    }

    /// Statements up to the closing `}`, which is consumed.
    pub(crate) fn parse_block_tail(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            while self.match_symbol(";") {}
            if self.match_symbol("}") {
                return Ok(stmts);
            }
            if self.at_eof() {
                return Err(self.unexpected());
            }
            stmts.push(self.parse_statement()?);
        }
    }

    pub(crate) fn parse_block(&mut self) -> PResult<Vec<Stmt>> {
        self.expect_symbol("{")?;
        self.parse_block_tail()
    }

    /// Body of a control structure: a braced block is flattened, anything else is one
    /// statement.
    fn parse_body(&mut self) -> PResult<Vec<Stmt>> {
        if self.match_symbol("{") {
            return self.parse_block_tail();
        }
        if self.at_symbol(":") {
            // alternative syntax (`if (...): ... endif;`) is not supported
            return Err(self.unexpected());
        }
        Ok(vec![self.parse_statement()?])
    }

    pub(crate) fn parse_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let Some(token) = self.peek() else {
            return Err(self.unexpected());
        };
        let kind = match &token.kind {
            TokenKind::Symbol if token.lexeme == "{" => {
                self.advance();
                StmtKind::Block(self.parse_block_tail()?)
            }
            TokenKind::Symbol if token.lexeme == ";" => {
                self.advance();
                StmtKind::Nop
            }
            TokenKind::Keyword(keyword) => self.parse_keyword_statement(*keyword)?,
            TokenKind::Ident if self.nth_is_symbol(1, ":") => {
                self.advance();
                self.advance();
                StmtKind::Label(token.lexeme.clone())
            }
            _ => self.parse_expression_statement()?,
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_keyword_statement(&mut self, keyword: Keyword) -> PResult<StmtKind> {
        match keyword {
            Keyword::If => self.parse_if(),
            Keyword::While => {
                self.advance();
                let cond = self.parse_paren_expr()?;
                let body = self.parse_body()?;
                Ok(StmtKind::While(StmtWhile { cond, body }))
            }
            Keyword::Do => {
                self.advance();
                let body = self.parse_body()?;
                self.expect_keyword(Keyword::While, "while")?;
                let cond = self.parse_paren_expr()?;
                self.expect_semicolon()?;
                Ok(StmtKind::DoWhile(StmtDoWhile { body, cond }))
            }
            Keyword::For => self.parse_for(),
            Keyword::Foreach => self.parse_foreach(),
            Keyword::Switch => self.parse_switch(),
            Keyword::Break | Keyword::Continue => {
                self.advance();
                let level = if self.at_symbol(";") {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect_semicolon()?;
                Ok(if keyword == Keyword::Break {
                    StmtKind::Break(level)
                } else {
                    StmtKind::Continue(level)
                })
            }
            Keyword::Return => {
                self.advance();
                let value = if self.at_symbol(";") {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect_semicolon()?;
                Ok(StmtKind::Return(value))
            }
            Keyword::Echo => {
                self.advance();
                let exprs = self.parse_expr_list()?;
                self.expect_semicolon()?;
                Ok(StmtKind::Echo(exprs))
            }
            Keyword::Global => {
                self.advance();
                let vars = self.parse_expr_list()?;
                self.expect_semicolon()?;
                Ok(StmtKind::Global(vars))
            }
            Keyword::Static
                if self
                    .peek_nth(1)
                    .is_some_and(|token| token.kind == TokenKind::Variable) =>
            {
                self.parse_static_vars()
            }
            Keyword::Unset => {
                self.advance();
                self.expect_symbol("(")?;
                let mut vars = Vec::new();
                while !self.at_symbol(")") {
                    vars.push(self.parse_expr()?);
                    if !self.match_symbol(",") {
                        break;
                    }
                }
                self.expect_symbol(")")?;
                self.expect_semicolon()?;
                Ok(StmtKind::Unset(vars))
            }
            Keyword::Goto => {
                self.advance();
                let label = self.expect_word()?.lexeme.clone();
                self.expect_semicolon()?;
                Ok(StmtKind::Goto(label))
            }
            Keyword::Declare => self.parse_declare(),
            Keyword::Namespace => self.parse_namespace(),
            Keyword::Use => self.parse_use(),
            Keyword::Function if self.is_function_declaration() => self.parse_function_decl(),
            Keyword::Abstract | Keyword::Final | Keyword::Class => self.parse_class_decl(),
            Keyword::Readonly
                if self.nth_is_keyword(1, Keyword::Class)
                    || self.nth_is_keyword(1, Keyword::Final)
                    || self.nth_is_keyword(1, Keyword::Abstract) =>
            {
                self.parse_class_decl()
            }
            Keyword::Interface => self.parse_interface_decl(),
            Keyword::Trait => self.parse_trait_decl(),
            Keyword::Try => self.parse_try(),
            Keyword::Throw => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect_semicolon()?;
                Ok(StmtKind::Throw(expr))
            }
            Keyword::Const => {
                self.advance();
                let consts = self.parse_const_items()?;
                self.expect_semicolon()?;
                Ok(StmtKind::Const(consts))
            }
            Keyword::Else
            | Keyword::ElseIf
            | Keyword::Case
            | Keyword::Default
            | Keyword::Catch
            | Keyword::Finally
            | Keyword::Extends
            | Keyword::Implements
            | Keyword::As
            | Keyword::Insteadof => Err(self.unexpected()),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> PResult<StmtKind> {
        let expr = self.parse_expr()?;
        self.expect_semicolon()?;
        Ok(StmtKind::Expr(expr))
    }

    fn parse_paren_expr(&mut self) -> PResult<psy_core::ast::Expr> {
        self.expect_symbol("(")?;
        let expr = self.parse_expr()?;
        self.expect_symbol(")")?;
        Ok(expr)
    }

    /// Comma-separated expressions, at least one.
    pub(crate) fn parse_expr_list(&mut self) -> PResult<Vec<psy_core::ast::Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.match_symbol(",") {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    /// Possibly empty expression list terminated by `close`, which is consumed.
    fn parse_expr_list_until(&mut self, close: &str) -> PResult<Vec<psy_core::ast::Expr>> {
        let mut exprs = Vec::new();
        if !self.at_symbol(close) {
            exprs = self.parse_expr_list()?;
        }
        self.expect_symbol(close)?;
        Ok(exprs)
    }

    fn parse_if(&mut self) -> PResult<StmtKind> {
        self.advance();
        let cond = self.parse_paren_expr()?;
        let then = self.parse_body()?;
        let mut elseifs = Vec::new();
        let mut otherwise = None;
        loop {
            let start = self.pos;
            if self.match_keyword(Keyword::ElseIf) {
                let cond = self.parse_paren_expr()?;
                let body = self.parse_body()?;
                elseifs.push(ElseIf {
                    cond,
                    body,
                    span: self.span_from(start),
                });
            } else if self.match_keyword(Keyword::Else) {
                otherwise = Some(self.parse_body()?);
                break;
            } else {
                break;
            }
        }
        Ok(StmtKind::If(StmtIf {
            cond,
            then,
            elseifs,
            otherwise,
        }))
    }

    fn parse_for(&mut self) -> PResult<StmtKind> {
        self.advance();
        self.expect_symbol("(")?;
        let init = self.parse_expr_list_until(";")?;
        let cond = self.parse_expr_list_until(";")?;
        let step = self.parse_expr_list_until(")")?;
        let body = self.parse_body()?;
        Ok(StmtKind::For(StmtFor {
            init,
            cond,
            step,
            body,
        }))
    }

    fn parse_foreach(&mut self) -> PResult<StmtKind> {
        self.advance();
        self.expect_symbol("(")?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As, "as")?;
        let mut by_ref = self.match_symbol("&");
        let first = self.parse_expr()?;
        let (key, value) = if self.match_symbol("=>") {
            by_ref = self.match_symbol("&");
            (Some(first), self.parse_expr()?)
        } else {
            (None, first)
        };
        self.expect_symbol(")")?;
        let body = self.parse_body()?;
        Ok(StmtKind::Foreach(StmtForeach {
            expr,
            key,
            value,
            by_ref,
            body,
        }))
    }

    fn parse_switch(&mut self) -> PResult<StmtKind> {
        self.advance();
        let subject = self.parse_paren_expr()?;
        self.expect_symbol("{")?;
        let mut cases = Vec::new();
        loop {
            let start = self.pos;
            let cond = if self.match_keyword(Keyword::Case) {
                Some(self.parse_expr()?)
            } else if self.match_keyword(Keyword::Default) {
                None
            } else {
                break;
            };
            if !self.match_symbol(":") {
                self.expect_semicolon()?;
            }
            let mut body = Vec::new();
            while !self.at_keyword(Keyword::Case)
                && !self.at_keyword(Keyword::Default)
                && !self.at_symbol("}")
            {
                if self.at_eof() {
                    return Err(self.unexpected());
                }
                body.push(self.parse_statement()?);
            }
            cases.push(SwitchCase {
                cond,
                body,
                span: self.span_from(start),
            });
        }
        self.expect_symbol("}")?;
        Ok(StmtKind::Switch(StmtSwitch { subject, cases }))
    }

    fn parse_static_vars(&mut self) -> PResult<StmtKind> {
        self.advance();
        let mut vars = Vec::new();
        loop {
            let name = self.expect_variable()?;
            let default = if self.match_symbol("=") {
                Some(self.parse_expr()?)
            } else {
                None
            };
            vars.push(StaticVar { name, default });
            if !self.match_symbol(",") {
                break;
            }
        }
        self.expect_semicolon()?;
        Ok(StmtKind::Static(vars))
    }

    fn parse_declare(&mut self) -> PResult<StmtKind> {
        self.advance();
        self.expect_symbol("(")?;
        let mut directives = Vec::new();
        loop {
            let key = self.expect_word()?.lexeme.clone();
            self.expect_symbol("=")?;
            let value = self.parse_expr_prec(PREC_ASSIGN + 1)?;
            directives.push(DeclareDirective { key, value });
            if !self.match_symbol(",") {
                break;
            }
        }
        self.expect_symbol(")")?;
        let body = if self.match_symbol(";") {
            None
        } else {
            Some(self.parse_body()?)
        };
        Ok(StmtKind::Declare(StmtDeclare { directives, body }))
    }

    fn parse_namespace(&mut self) -> PResult<StmtKind> {
        self.advance();
        if self.match_symbol("{") {
            let body = self.parse_block_tail()?;
            return Ok(StmtKind::Namespace(StmtNamespace {
                name: None,
                body,
                braced: true,
                synthetic: false,
            }));
        }
        let name = self.parse_plain_name()?;
        let (body, braced) = if self.match_symbol("{") {
            (self.parse_block_tail()?, true)
        } else {
            self.expect_semicolon()?;
            (Vec::new(), false)
        };
        Ok(StmtKind::Namespace(StmtNamespace {
            name: Some(name),
            body,
            braced,
            synthetic: false,
        }))
    }

    /// A name in declaration position; a leading `\` is accepted and dropped.
    pub(crate) fn parse_plain_name(&mut self) -> PResult<Name> {
        match self.peek() {
            Some(token) if matches!(token.kind, TokenKind::Ident | TokenKind::Name) => {
                self.advance();
                let mut name = Name::parse(&token.lexeme, Self::token_span(token));
                if name.kind == NameKind::FullyQualified {
                    name.kind = if name.parts.len() > 1 {
                        NameKind::Qualified
                    } else {
                        NameKind::Unqualified
                    };
                }
                Ok(name)
            }
            _ => Err(self.unexpected_expecting("identifier")),
        }
    }

    fn parse_use(&mut self) -> PResult<StmtKind> {
        self.advance();
        let kind = self.parse_use_kind().unwrap_or(UseKind::Normal);
        let first_start = self.pos;
        let first = self.parse_plain_name()?;

        if self.at_symbol("\\") && self.nth_is_symbol(1, "{") {
            self.advance();
            self.advance();
            let mut uses = Vec::new();
            while !self.at_symbol("}") {
                let start = self.pos;
                let item_kind = self.parse_use_kind();
                let name = self.parse_plain_name()?;
                let alias = self.parse_use_alias()?;
                uses.push(UseItem {
                    name,
                    alias,
                    kind: item_kind,
                    span: self.span_from(start),
                });
                if !self.match_symbol(",") {
                    break;
                }
            }
            self.expect_symbol("}")?;
            self.expect_semicolon()?;
            return Ok(StmtKind::Use(StmtUse {
                kind,
                prefix: Some(first),
                uses,
            }));
        }

        let alias = self.parse_use_alias()?;
        let mut uses = vec![UseItem {
            name: first,
            alias,
            kind: None,
            span: self.span_from(first_start),
        }];
        while self.match_symbol(",") {
            let start = self.pos;
            let name = self.parse_plain_name()?;
            let alias = self.parse_use_alias()?;
            uses.push(UseItem {
                name,
                alias,
                kind: None,
                span: self.span_from(start),
            });
        }
        self.expect_semicolon()?;
        Ok(StmtKind::Use(StmtUse {
            kind,
            prefix: None,
            uses,
        }))
    }

    fn parse_use_kind(&mut self) -> Option<UseKind> {
        if self.match_keyword(Keyword::Function) {
            Some(UseKind::Function)
        } else if self.match_keyword(Keyword::Const) {
            Some(UseKind::Const)
        } else {
            None
        }
    }

    fn parse_use_alias(&mut self) -> PResult<Option<String>> {
        if self.match_keyword(Keyword::As) {
            Ok(Some(self.expect_word()?.lexeme.clone()))
        } else {
            Ok(None)
        }
    }

    fn parse_try(&mut self) -> PResult<StmtKind> {
        let try_token = self.advance();
        let body = self.parse_block()?;
        let mut catches = Vec::new();
        loop {
            let start = self.pos;
            if !self.match_keyword(Keyword::Catch) {
                break;
            }
            self.expect_symbol("(")?;
            let mut types = vec![self.parse_type_name()?];
            while self.match_symbol("|") {
                types.push(self.parse_type_name()?);
            }
            let var = if self.at_symbol(")") {
                None
            } else {
                Some(self.expect_variable()?)
            };
            self.expect_symbol(")")?;
            let body = self.parse_block()?;
            catches.push(Catch {
                types,
                var,
                body,
                span: self.span_from(start),
            });
        }
        let finally = if self.match_keyword(Keyword::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() {
            let line = try_token.map(|token| token.line).unwrap_or_default();
            return Err(ParseError::syntax(
                "Cannot use try without catch or finally",
                line,
            ));
        }
        Ok(StmtKind::Try(StmtTry {
            body,
            catches,
            finally,
        }))
    }

    pub(crate) fn parse_const_items(&mut self) -> PResult<Vec<ConstItem>> {
        let mut consts = Vec::new();
        loop {
            let name = self.expect_word()?.lexeme.clone();
            self.expect_symbol("=")?;
            let value = self.parse_expr()?;
            consts.push(ConstItem { name, value });
            if !self.match_symbol(",") {
                break;
            }
        }
        Ok(consts)
    }
}

/// `namespace Foo;` owns every following statement up to the next namespace statement.
fn nest_unbraced_namespaces(stmts: Vec<Stmt>) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    let mut open: Option<Stmt> = None;
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Namespace(ns) if !ns.braced => {
                out.extend(open.take());
                open = Some(stmt);
            }
            StmtKind::Namespace(_) => {
                out.extend(open.take());
                out.push(stmt);
            }
            _ => match open.as_mut() {
                Some(current) => {
                    current.span = current.span.union(stmt.span);
                    if let StmtKind::Namespace(ns) = &mut current.kind {
                        ns.body.push(stmt);
                    }
                }
                None => out.push(stmt),
            },
        }
    }
    out.extend(open);
    out
}
