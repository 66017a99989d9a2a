use psy_core::ast::{
    Arg, ArrayItem, BinOpKind, CastKind, ClassModifiers, ExitKind, Expr, ExprArray,
    ExprArrayDimFetch, ExprAssign, ExprAssignOp, ExprBinOp, ExprCast, ExprClassConstFetch,
    ExprExit, ExprFuncCall, ExprInclude, ExprIncDec, ExprInstanceof, ExprKind, ExprMethodCall,
    ExprNew, ExprPropertyFetch, ExprStaticCall, ExprStaticPropertyFetch, ExprTernary, ExprUnOp,
    ExprYield, IncludeKind, Literal, MagicConst, MemberName, Name, NameOrExpr, NewClass, UnOpKind,
    Variable, PREC_ASSIGN, PREC_INSTANCEOF, PREC_NEW, PREC_NOT, PREC_TERNARY, PREC_UNARY,
};

use super::{PResult, Parser};
use crate::error::ParseError;
use crate::lexer::{Keyword, Token, TokenKind};

impl<'t> Parser<'t> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_expr_prec(0)
    }

    pub(crate) fn parse_expr_prec(&mut self, min_prec: u8) -> PResult<Expr> {
        let start = self.pos;
        let mut left = self.parse_prefix()?;
        loop {
            let Some(token) = self.peek() else {
                break;
            };
            if token.is_symbol("?") {
                if PREC_TERNARY < min_prec {
                    break;
                }
                self.advance();
                let then = if self.match_symbol(":") {
                    None
                } else {
                    let then = self.parse_expr_prec(PREC_ASSIGN)?;
                    self.expect_symbol(":")?;
                    Some(Box::new(then))
                };
                let otherwise = self.parse_expr_prec(PREC_TERNARY + 1)?;
                left = Expr::new(
                    ExprKind::Ternary(ExprTernary {
                        cond: Box::new(left),
                        then,
                        otherwise: Box::new(otherwise),
                    }),
                    self.span_from(start),
                );
                continue;
            }
            if token.is_keyword(Keyword::Instanceof) {
                if PREC_INSTANCEOF < min_prec {
                    break;
                }
                self.advance();
                let class = self.parse_class_ref()?;
                left = Expr::new(
                    ExprKind::Instanceof(ExprInstanceof {
                        expr: Box::new(left),
                        class,
                    }),
                    self.span_from(start),
                );
                continue;
            }
            let Some(op) = peek_binop(token) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let rhs = self.parse_expr_prec(next_min)?;
            left = Expr::new(
                ExprKind::BinOp(ExprBinOp {
                    op,
                    lhs: Box::new(left),
                    rhs: Box::new(rhs),
                }),
                self.span_from(start),
            );
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let Some(token) = self.peek() else {
            return Err(self.unexpected());
        };
        let kind = match &token.kind {
            TokenKind::Symbol => {
                let unary = match token.lexeme.as_str() {
                    "!" => Some((UnOpKind::Not, PREC_NOT)),
                    "-" => Some((UnOpKind::Neg, PREC_UNARY)),
                    "+" => Some((UnOpKind::Plus, PREC_UNARY)),
                    "~" => Some((UnOpKind::BitNot, PREC_UNARY)),
                    _ => None,
                };
                if let Some((op, prec)) = unary {
                    self.advance();
                    let expr = self.parse_expr_prec(prec)?;
                    ExprKind::UnOp(ExprUnOp {
                        op,
                        expr: Box::new(expr),
                    })
                } else if token.is_symbol("@") {
                    self.advance();
                    ExprKind::ErrorSuppress(Box::new(self.parse_expr_prec(PREC_UNARY)?))
                } else if token.is_symbol("++") || token.is_symbol("--") {
                    self.advance();
                    let var = self.parse_postfix_operand()?;
                    ExprKind::IncDec(ExprIncDec {
                        var: Box::new(var),
                        increment: token.lexeme == "++",
                        prefix: true,
                    })
                } else {
                    return self.parse_postfix_expr();
                }
            }
            TokenKind::Cast => {
                self.advance();
                let name = token
                    .lexeme
                    .trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace());
                let Some(kind) = CastKind::from_name(name) else {
                    return Err(self.unexpected());
                };
                let expr = self.parse_expr_prec(PREC_UNARY)?;
                ExprKind::Cast(ExprCast {
                    kind,
                    expr: Box::new(expr),
                })
            }
            TokenKind::Keyword(keyword) => match keyword {
                Keyword::New => {
                    let new = self.parse_new()?;
                    return self.parse_postfix(start, new);
                }
                Keyword::Clone => {
                    self.advance();
                    ExprKind::Clone(Box::new(self.parse_expr_prec(PREC_NEW)?))
                }
                Keyword::Print => {
                    self.advance();
                    ExprKind::Print(Box::new(self.parse_expr_prec(PREC_ASSIGN)?))
                }
                Keyword::Throw => {
                    self.advance();
                    ExprKind::Throw(Box::new(self.parse_expr()?))
                }
                Keyword::Yield => self.parse_yield()?,
                Keyword::Include
                | Keyword::IncludeOnce
                | Keyword::Require
                | Keyword::RequireOnce => {
                    self.advance();
                    let kind = match keyword {
                        Keyword::Include => IncludeKind::Include,
                        Keyword::IncludeOnce => IncludeKind::IncludeOnce,
                        Keyword::Require => IncludeKind::Require,
                        _ => IncludeKind::RequireOnce,
                    };
                    let expr = self.parse_expr_prec(PREC_ASSIGN)?;
                    ExprKind::Include(ExprInclude {
                        kind,
                        expr: Box::new(expr),
                    })
                }
                Keyword::Function => ExprKind::Closure(self.parse_closure(false)?),
                Keyword::Fn => ExprKind::ArrowFn(self.parse_arrow_fn(false)?),
                Keyword::Static if self.nth_is_keyword(1, Keyword::Function) => {
                    self.advance();
                    ExprKind::Closure(self.parse_closure(true)?)
                }
                Keyword::Static if self.nth_is_keyword(1, Keyword::Fn) => {
                    self.advance();
                    ExprKind::ArrowFn(self.parse_arrow_fn(true)?)
                }
                _ => return self.parse_postfix_expr(),
            },
            _ => return self.parse_postfix_expr(),
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    fn parse_yield(&mut self) -> PResult<ExprKind> {
        self.advance();
        let is_from = |token: &Token| {
            token.kind == TokenKind::Ident && token.lexeme.eq_ignore_ascii_case("from")
        };
        if self.peek().is_some_and(is_from) {
            self.advance();
            let expr = self.parse_expr_prec(PREC_ASSIGN)?;
            return Ok(ExprKind::YieldFrom(Box::new(expr)));
        }
        let ends_expr = match self.peek() {
            None => true,
            Some(token) => [";", ")", ",", "]"].iter().any(|s| token.is_symbol(s)),
        };
        if ends_expr {
            return Ok(ExprKind::Yield(ExprYield {
                key: None,
                value: None,
            }));
        }
        let first = self.parse_expr_prec(PREC_TERNARY)?;
        if self.match_symbol("=>") {
            let value = self.parse_expr_prec(PREC_TERNARY)?;
            return Ok(ExprKind::Yield(ExprYield {
                key: Some(Box::new(first)),
                value: Some(Box::new(value)),
            }));
        }
        Ok(ExprKind::Yield(ExprYield {
            key: None,
            value: Some(Box::new(first)),
        }))
    }

    /// Primary expression, its postfix chain and a trailing assignment if one follows.
    fn parse_postfix_expr(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let target = self.parse_postfix_operand()?;
        self.parse_assignment(start, target)
    }

    fn parse_postfix_operand(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let primary = self.parse_primary()?;
        self.parse_postfix(start, primary)
    }

    fn parse_assignment(&mut self, start: usize, target: Expr) -> PResult<Expr> {
        let Some(token) = self.peek() else {
            return Ok(target);
        };
        if token.kind != TokenKind::Symbol {
            return Ok(target);
        }
        if token.lexeme == "=" {
            let destructuring = matches!(target.kind, ExprKind::Array(_) | ExprKind::List(_));
            if !target.is_writable() && !destructuring {
                return Err(self.unexpected());
            }
            self.advance();
            let by_ref = self.match_symbol("&");
            let value = self.parse_expr_prec(PREC_ASSIGN)?;
            return Ok(Expr::new(
                ExprKind::Assign(ExprAssign {
                    var: Box::new(target),
                    value: Box::new(value),
                    by_ref,
                }),
                self.span_from(start),
            ));
        }
        let Some(op) = assign_op(&token.lexeme) else {
            return Ok(target);
        };
        if !target.is_writable() {
            return Err(self.unexpected());
        }
        self.advance();
        let value = self.parse_expr_prec(PREC_ASSIGN)?;
        Ok(Expr::new(
            ExprKind::AssignOp(ExprAssignOp {
                op,
                var: Box::new(target),
                value: Box::new(value),
            }),
            self.span_from(start),
        ))
    }

    pub(crate) fn parse_postfix(&mut self, start: usize, mut left: Expr) -> PResult<Expr> {
        loop {
            let Some(token) = self.peek() else {
                break;
            };
            if token.kind != TokenKind::Symbol {
                break;
            }
            let kind = match token.lexeme.as_str() {
                "[" => {
                    self.advance();
                    let dim = if self.at_symbol("]") {
                        None
                    } else {
                        Some(Box::new(self.parse_expr()?))
                    };
                    self.expect_symbol("]")?;
                    ExprKind::ArrayDimFetch(ExprArrayDimFetch {
                        var: Box::new(left),
                        dim,
                    })
                }
                "->" | "?->" => {
                    self.advance();
                    let nullsafe = token.lexeme == "?->";
                    let name = self.parse_member_name()?;
                    if self.at_symbol("(") {
                        let args = self.parse_args()?;
                        ExprKind::MethodCall(ExprMethodCall {
                            var: Box::new(left),
                            name,
                            args,
                            nullsafe,
                        })
                    } else {
                        ExprKind::PropertyFetch(ExprPropertyFetch {
                            var: Box::new(left),
                            name,
                            nullsafe,
                        })
                    }
                }
                "::" => {
                    self.advance();
                    self.parse_static_member(NameOrExpr::Expr(Box::new(left)))?
                }
                "(" => {
                    let args = self.parse_args()?;
                    ExprKind::FuncCall(ExprFuncCall {
                        name: NameOrExpr::Expr(Box::new(left)),
                        args,
                    })
                }
                "++" | "--" => {
                    self.advance();
                    ExprKind::IncDec(ExprIncDec {
                        var: Box::new(left),
                        increment: token.lexeme == "++",
                        prefix: false,
                    })
                }
                _ => break,
            };
            left = Expr::new(kind, self.span_from(start));
        }
        Ok(left)
    }

    fn parse_member_name(&mut self) -> PResult<MemberName> {
        let start = self.pos;
        match self.peek() {
            Some(token) if token.is_word() => {
                self.advance();
                Ok(MemberName::Ident(token.lexeme.clone()))
            }
            Some(token) if token.kind == TokenKind::Variable => {
                self.advance();
                Ok(MemberName::Expr(Box::new(Expr::variable(
                    &token.lexeme[1..],
                    self.span_from(start),
                ))))
            }
            Some(token) if token.is_symbol("{") => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect_symbol("}")?;
                Ok(MemberName::Expr(Box::new(expr)))
            }
            _ => Err(self.unexpected_expecting("identifier")),
        }
    }

    /// Whatever follows `Class::`.
    fn parse_static_member(&mut self, class: NameOrExpr) -> PResult<ExprKind> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected());
        };
        if token.kind == TokenKind::Variable || token.is_symbol("$") {
            let var = self.parse_simple_variable()?;
            if self.at_symbol("(") {
                let args = self.parse_args()?;
                return Ok(ExprKind::StaticCall(ExprStaticCall {
                    class,
                    name: MemberName::Expr(Box::new(var)),
                    args,
                }));
            }
            let ExprKind::Variable(name) = var.kind else {
                return Err(self.unexpected());
            };
            return Ok(ExprKind::StaticPropertyFetch(ExprStaticPropertyFetch {
                class,
                name,
            }));
        }
        if token.is_symbol("{") {
            self.advance();
            let expr = self.parse_expr()?;
            self.expect_symbol("}")?;
            let args = self.parse_args()?;
            return Ok(ExprKind::StaticCall(ExprStaticCall {
                class,
                name: MemberName::Expr(Box::new(expr)),
                args,
            }));
        }
        if token.is_word() {
            self.advance();
            if self.at_symbol("(") {
                let args = self.parse_args()?;
                return Ok(ExprKind::StaticCall(ExprStaticCall {
                    class,
                    name: MemberName::Ident(token.lexeme.clone()),
                    args,
                }));
            }
            return Ok(ExprKind::ClassConstFetch(ExprClassConstFetch {
                class,
                name: token.lexeme.clone(),
            }));
        }
        Err(self.unexpected_expecting("identifier"))
    }

    /// `$name`, `$$name` or `${expr}`.
    fn parse_simple_variable(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let Some(token) = self.advance() else {
            return Err(self.unexpected());
        };
        if token.kind == TokenKind::Variable {
            return Ok(Expr::variable(&token.lexeme[1..], self.span_from(start)));
        }
        if !token.is_symbol("$") {
            self.pos -= 1;
            return Err(self.unexpected_expecting("variable"));
        }
        let inner = if self.match_symbol("{") {
            let expr = self.parse_expr()?;
            self.expect_symbol("}")?;
            expr
        } else {
            self.parse_simple_variable()?
        };
        Ok(Expr::new(
            ExprKind::Variable(Variable::Dynamic(Box::new(inner))),
            self.span_from(start),
        ))
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let Some(token) = self.peek() else {
            return Err(self.unexpected());
        };
        let kind = match &token.kind {
            TokenKind::Variable => return self.parse_simple_variable(),
            TokenKind::Symbol if token.lexeme == "$" => return self.parse_simple_variable(),
            TokenKind::Int => {
                self.advance();
                ExprKind::Literal(parse_int_literal(token)?)
            }
            TokenKind::Float => {
                self.advance();
                let value = token.lexeme.replace('_', "").parse::<f64>().map_err(|_| {
                    ParseError::syntax(
                        format!("Invalid numeric literal \"{}\"", token.lexeme),
                        token.line,
                    )
                })?;
                ExprKind::Literal(Literal::Float(value))
            }
            TokenKind::String => {
                self.advance();
                self.string_literal(token)?
            }
            TokenKind::Heredoc => {
                self.advance();
                self.heredoc_literal(token)?
            }
            TokenKind::Symbol if token.lexeme == "[" => {
                self.advance();
                let items = self.parse_array_items("]")?;
                ExprKind::Array(ExprArray { items, short: true })
            }
            TokenKind::Symbol if token.lexeme == "(" => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect_symbol(")")?;
                return Ok(expr);
            }
            TokenKind::Keyword(Keyword::Array) if self.nth_is_symbol(1, "(") => {
                self.advance();
                self.advance();
                let items = self.parse_array_items(")")?;
                ExprKind::Array(ExprArray {
                    items,
                    short: false,
                })
            }
            TokenKind::Keyword(Keyword::List) => {
                self.advance();
                self.expect_symbol("(")?;
                let items = self.parse_array_items(")")?;
                ExprKind::List(ExprArray {
                    items,
                    short: false,
                })
            }
            TokenKind::Keyword(Keyword::Isset) => {
                self.advance();
                self.expect_symbol("(")?;
                let mut vars = vec![self.parse_expr()?];
                while self.match_symbol(",") {
                    if self.at_symbol(")") {
                        break;
                    }
                    vars.push(self.parse_expr()?);
                }
                self.expect_symbol(")")?;
                ExprKind::Isset(vars)
            }
            TokenKind::Keyword(Keyword::Empty) => {
                self.advance();
                self.expect_symbol("(")?;
                let expr = self.parse_expr()?;
                self.expect_symbol(")")?;
                ExprKind::Empty(Box::new(expr))
            }
            TokenKind::Keyword(Keyword::Exit) | TokenKind::Keyword(Keyword::Die) => {
                self.advance();
                let kind = if token.is_keyword(Keyword::Die) {
                    ExitKind::Die
                } else {
                    ExitKind::Exit
                };
                let mut expr = None;
                if self.match_symbol("(") {
                    if !self.at_symbol(")") {
                        expr = Some(Box::new(self.parse_expr()?));
                    }
                    self.expect_symbol(")")?;
                }
                ExprKind::Exit(ExprExit { kind, expr })
            }
            TokenKind::Ident | TokenKind::Name | TokenKind::Keyword(Keyword::Static) => {
                self.advance();
                return self.parse_name_expr(start, token);
            }
            _ => return Err(self.unexpected()),
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// A bare name: a function call, a static access, a magic or plain constant.
    fn parse_name_expr(&mut self, start: usize, token: &Token) -> PResult<Expr> {
        let name = Name::parse(&token.lexeme, Self::token_span(token));
        let kind = if self.at_symbol("(") {
            let args = self.parse_args()?;
            ExprKind::FuncCall(ExprFuncCall {
                name: NameOrExpr::Name(name),
                args,
            })
        } else if self.match_symbol("::") {
            self.parse_static_member(NameOrExpr::Name(name))?
        } else if let Some(magic) = MagicConst::from_name(&token.lexeme)
            .filter(|_| token.kind == TokenKind::Ident)
        {
            ExprKind::MagicConst(magic)
        } else {
            ExprKind::ConstFetch(name)
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    fn parse_class_ref(&mut self) -> PResult<NameOrExpr> {
        match self.peek() {
            Some(token)
                if matches!(token.kind, TokenKind::Ident | TokenKind::Name)
                    || token.is_keyword(Keyword::Static) =>
            {
                self.advance();
                Ok(NameOrExpr::Name(Name::parse(
                    &token.lexeme,
                    Self::token_span(token),
                )))
            }
            _ => Ok(NameOrExpr::Expr(Box::new(self.parse_postfix_operand()?))),
        }
    }

    fn parse_new(&mut self) -> PResult<Expr> {
        let start = self.pos;
        self.expect_keyword(Keyword::New, "new")?;
        let class = if self.match_keyword(Keyword::Class) {
            let args = if self.at_symbol("(") {
                self.parse_args()?
            } else {
                Vec::new()
            };
            let decl = self.parse_class_tail(ClassModifiers::default())?;
            return Ok(Expr::new(
                ExprKind::New(ExprNew {
                    class: NewClass::Anonymous(Box::new(decl)),
                    args,
                }),
                self.span_from(start),
            ));
        } else if let Some(token) = self.peek().filter(|token| {
            matches!(token.kind, TokenKind::Ident | TokenKind::Name)
                || token.is_keyword(Keyword::Static)
        }) {
            self.advance();
            NewClass::Name(Name::parse(&token.lexeme, Self::token_span(token)))
        } else if self.match_symbol("(") {
            let expr = self.parse_expr()?;
            self.expect_symbol(")")?;
            NewClass::Expr(Box::new(expr))
        } else {
            NewClass::Expr(Box::new(self.parse_new_class_expr()?))
        };
        let args = if self.at_symbol("(") {
            self.parse_args()?
        } else {
            Vec::new()
        };
        Ok(Expr::new(
            ExprKind::New(ExprNew { class, args }),
            self.span_from(start),
        ))
    }

    /// `new $class`, `new $this->class` or `new $classes['key']`: no calls allowed.
    fn parse_new_class_expr(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let mut expr = self.parse_simple_variable()?;
        loop {
            let kind = if self.match_symbol("[") {
                let dim = self.parse_expr()?;
                self.expect_symbol("]")?;
                ExprKind::ArrayDimFetch(ExprArrayDimFetch {
                    var: Box::new(expr),
                    dim: Some(Box::new(dim)),
                })
            } else if self.at_symbol("->") || self.at_symbol("?->") {
                let nullsafe = self.at_symbol("?->");
                self.advance();
                let name = self.parse_member_name()?;
                ExprKind::PropertyFetch(ExprPropertyFetch {
                    var: Box::new(expr),
                    name,
                    nullsafe,
                })
            } else {
                break;
            };
            expr = Expr::new(kind, self.span_from(start));
        }
        Ok(expr)
    }

    /// Items up to `close`, which is consumed. Empty positions become `None`.
    fn parse_array_items(&mut self, close: &str) -> PResult<Vec<Option<ArrayItem>>> {
        let mut items = Vec::new();
        loop {
            if self.at_symbol(close) {
                break;
            }
            if self.match_symbol(",") {
                items.push(None);
                continue;
            }
            let start = self.pos;
            let item = if self.match_symbol("...") {
                ArrayItem {
                    key: None,
                    value: self.parse_expr()?,
                    by_ref: false,
                    unpack: true,
                    span: self.span_from(start),
                }
            } else if self.match_symbol("&") {
                ArrayItem {
                    key: None,
                    value: self.parse_expr()?,
                    by_ref: true,
                    unpack: false,
                    span: self.span_from(start),
                }
            } else {
                let first = self.parse_expr()?;
                if self.match_symbol("=>") {
                    let by_ref = self.match_symbol("&");
                    let value = self.parse_expr()?;
                    ArrayItem {
                        key: Some(first),
                        value,
                        by_ref,
                        unpack: false,
                        span: self.span_from(start),
                    }
                } else {
                    ArrayItem {
                        key: None,
                        value: first,
                        by_ref: false,
                        unpack: false,
                        span: self.span_from(start),
                    }
                }
            };
            items.push(Some(item));
            if !self.match_symbol(",") {
                break;
            }
        }
        self.expect_symbol(close)?;
        Ok(items)
    }

    pub(crate) fn parse_args(&mut self) -> PResult<Vec<Arg>> {
        self.expect_symbol("(")?;
        let mut args = Vec::new();
        while !self.at_symbol(")") {
            let arg = if self.match_symbol("...") {
                Arg {
                    unpack: true,
                    ..Arg::new(self.parse_expr()?)
                }
            } else if self.match_symbol("&") {
                Arg {
                    by_ref: true,
                    ..Arg::new(self.parse_expr()?)
                }
            } else if self.peek().is_some_and(Token::is_word) && self.nth_is_symbol(1, ":") {
                let name = self.advance().map(|token| token.lexeme.clone());
                self.advance();
                Arg {
                    name,
                    ..Arg::new(self.parse_expr()?)
                }
            } else {
                Arg::new(self.parse_expr()?)
            };
            args.push(arg);
            if !self.match_symbol(",") {
                break;
            }
        }
        self.expect_symbol(")")?;
        Ok(args)
    }
}

fn peek_binop(token: &Token) -> Option<BinOpKind> {
    match &token.kind {
        TokenKind::Symbol => Some(match token.lexeme.as_str() {
            "+" => BinOpKind::Add,
            "-" => BinOpKind::Sub,
            "*" => BinOpKind::Mul,
            "/" => BinOpKind::Div,
            "%" => BinOpKind::Mod,
            "**" => BinOpKind::Pow,
            "." => BinOpKind::Concat,
            "&" => BinOpKind::BitAnd,
            "|" => BinOpKind::BitOr,
            "^" => BinOpKind::BitXor,
            "<<" => BinOpKind::Shl,
            ">>" => BinOpKind::Shr,
            "&&" => BinOpKind::BoolAnd,
            "||" => BinOpKind::BoolOr,
            "==" => BinOpKind::Eq,
            "!=" | "<>" => BinOpKind::NotEq,
            "===" => BinOpKind::Identical,
            "!==" => BinOpKind::NotIdentical,
            "<" => BinOpKind::Lt,
            "<=" => BinOpKind::Le,
            ">" => BinOpKind::Gt,
            ">=" => BinOpKind::Ge,
            "<=>" => BinOpKind::Spaceship,
            "??" => BinOpKind::Coalesce,
            _ => return None,
        }),
        TokenKind::Keyword(Keyword::And) => Some(BinOpKind::LogicalAnd),
        TokenKind::Keyword(Keyword::Or) => Some(BinOpKind::LogicalOr),
        TokenKind::Keyword(Keyword::Xor) => Some(BinOpKind::LogicalXor),
        _ => None,
    }
}

fn assign_op(symbol: &str) -> Option<BinOpKind> {
    Some(match symbol {
        "+=" => BinOpKind::Add,
        "-=" => BinOpKind::Sub,
        "*=" => BinOpKind::Mul,
        "/=" => BinOpKind::Div,
        "%=" => BinOpKind::Mod,
        "**=" => BinOpKind::Pow,
        ".=" => BinOpKind::Concat,
        "&=" => BinOpKind::BitAnd,
        "|=" => BinOpKind::BitOr,
        "^=" => BinOpKind::BitXor,
        "<<=" => BinOpKind::Shl,
        ">>=" => BinOpKind::Shr,
        "??=" => BinOpKind::Coalesce,
        _ => return None,
    })
}

/// Decimal, hex, octal and binary integers. Values past `i64` become floats, as in PHP.
fn parse_int_literal(token: &Token) -> Result<Literal, ParseError> {
    let clean = token.lexeme.replace('_', "");
    let lower = clean.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    match i64::from_str_radix(digits, radix) {
        Ok(value) => Ok(Literal::Int(value)),
        Err(_) => u128::from_str_radix(digits, radix)
            .map(|value| Literal::Float(value as f64))
            .map_err(|_| {
                ParseError::syntax(
                    format!("Invalid numeric literal \"{}\"", token.lexeme),
                    token.line,
                )
            }),
    }
}
