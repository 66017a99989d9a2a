use psy_core::ast::{
    Expr, ExprArrayDimFetch, ExprKind, ExprPropertyFetch, Literal, MemberName, StringPart,
    Variable,
};
use psy_core::span::Span;

use super::{parse_expression_at, PResult, Parser};
use crate::error::ParseError;
use crate::lexer::winnow::{is_ident_continue, is_ident_start};
use crate::lexer::Token;

impl<'t> Parser<'t> {
    pub(crate) fn string_literal(&self, token: &Token) -> PResult<ExprKind> {
        let raw = token
            .lexeme
            .strip_prefix(['b', 'B'])
            .unwrap_or(token.lexeme.as_str());
        let body = &raw[1..raw.len() - 1];
        if raw.starts_with('\'') {
            return Ok(ExprKind::Literal(Literal::String {
                value: unescape_single_quoted(body),
                double_quoted: false,
            }));
        }
        interpolate(body, token, Quote::Double)
    }

    pub(crate) fn heredoc_literal(&self, token: &Token) -> PResult<ExprKind> {
        let raw = token.lexeme.as_str();
        let (header, rest) = raw.split_once('\n').unwrap_or((raw, ""));
        let label = header
            .trim_start_matches("<<<")
            .trim()
            .trim_matches(['"', '\'']);
        let nowdoc = header.contains('\'');

        // the closing line is the label preceded by the indentation to strip
        let (body, closing) = rest.rsplit_once('\n').unwrap_or(("", rest));
        let indent = closing.len() - label.len();
        let lines: Vec<&str> = if rest.contains('\n') {
            body.split('\n')
                .map(|line| strip_indent(line, indent))
                .collect()
        } else {
            Vec::new()
        };
        let text = lines.join("\n");
        if nowdoc {
            return Ok(ExprKind::Literal(Literal::String {
                value: text,
                double_quoted: false,
            }));
        }
        let shifted = Token {
            line: token.line + 1,
            ..token.clone()
        };
        interpolate(&text, &shifted, Quote::Heredoc)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    Double,
    Heredoc,
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let ws = line
        .bytes()
        .take(indent)
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[ws..]
}

fn unescape_single_quoted(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\'' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

/// Cook escapes and split out `$var`, `$var[..]`, `$var->prop`, `{$expr}` and `${name}`.
fn interpolate(body: &str, token: &Token, quote: Quote) -> PResult<ExprKind> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut line = token.line;
    let bytes = body.as_bytes();
    let span_at = |line: u32| Span::new(token.span.start as u32, token.span.end as u32, line, line);
    let mut idx = 0;

    while idx < body.len() {
        let rest = &body[idx..];
        let Some(ch) = rest.chars().next() else {
            break;
        };
        match ch {
            '\\' => {
                let (cooked, used) = cook_escape(&rest[1..], quote);
                buf.push_str(&cooked);
                idx += 1 + used;
            }
            '$' if rest[1..].starts_with(is_ident_start) => {
                flush(&mut parts, &mut buf);
                let (expr, used) = simple_interpolation(&rest[1..], span_at(line))?;
                parts.push(StringPart::Expr(expr));
                idx += 1 + used;
            }
            '$' if rest[1..].starts_with('{') => {
                flush(&mut parts, &mut buf);
                let close = matching_brace(body, idx + 1)
                    .ok_or_else(|| ParseError::syntax("Syntax error, unexpected EOF", line))?;
                let inner = &body[idx + 2..close];
                let expr = if !inner.is_empty() && inner.chars().all(is_ident_continue) {
                    Expr::variable(inner, span_at(line))
                } else {
                    let name = parse_expression_at(inner, line)?;
                    Expr::new(
                        ExprKind::Variable(Variable::Dynamic(Box::new(name))),
                        span_at(line),
                    )
                };
                parts.push(StringPart::Expr(expr));
                line += count_lines(&body[idx..=close]);
                idx = close + 1;
            }
            '{' if rest[1..].starts_with('$') => {
                flush(&mut parts, &mut buf);
                let close = matching_brace(body, idx)
                    .ok_or_else(|| ParseError::syntax("Syntax error, unexpected EOF", line))?;
                let expr = parse_expression_at(&body[idx + 1..close], line)?;
                parts.push(StringPart::Expr(expr));
                line += count_lines(&body[idx..=close]);
                idx = close + 1;
            }
            _ => {
                if bytes[idx] == b'\n' {
                    line += 1;
                }
                buf.push(ch);
                idx += ch.len_utf8();
            }
        }
    }

    if parts.is_empty() {
        return Ok(ExprKind::Literal(Literal::String {
            value: buf,
            double_quoted: true,
        }));
    }
    flush(&mut parts, &mut buf);
    Ok(ExprKind::Interpolated(parts))
}

fn flush(parts: &mut Vec<StringPart>, buf: &mut String) {
    if !buf.is_empty() {
        parts.push(StringPart::Literal(std::mem::take(buf)));
    }
}

fn count_lines(text: &str) -> u32 {
    text.bytes().filter(|b| *b == b'\n').count() as u32
}

/// Returns the cooked text and how many bytes after the backslash it used.
fn cook_escape(rest: &str, quote: Quote) -> (String, usize) {
    let Some(ch) = rest.chars().next() else {
        return ("\\".to_string(), 0);
    };
    let simple = match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'v' => Some('\x0B'),
        'e' => Some('\x1B'),
        'f' => Some('\x0C'),
        '\\' => Some('\\'),
        '$' => Some('$'),
        '"' if quote == Quote::Double => Some('"'),
        _ => None,
    };
    if let Some(cooked) = simple {
        return (cooked.to_string(), 1);
    }
    if ch.is_digit(8) {
        let digits: String = rest.chars().take(3).take_while(|c| c.is_digit(8)).collect();
        let value = u32::from_str_radix(&digits, 8).unwrap_or(0) & 0xFF;
        return (byte_char(value), digits.len());
    }
    if ch == 'x' {
        let digits: String = rest[1..]
            .chars()
            .take(2)
            .take_while(char::is_ascii_hexdigit)
            .collect();
        if !digits.is_empty() {
            let value = u32::from_str_radix(&digits, 16).unwrap_or(0);
            return (byte_char(value), 1 + digits.len());
        }
    }
    if ch == 'u' && rest[1..].starts_with('{') {
        if let Some(close) = rest.find('}') {
            let hex = &rest[2..close];
            if let Some(cooked) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                return (cooked.to_string(), close + 1);
            }
        }
    }
    (format!("\\{}", ch), ch.len_utf8())
}

fn byte_char(value: u32) -> String {
    char::from_u32(value).map(String::from).unwrap_or_default()
}

/// `name`, `name[key]` or `name->prop` right after a `$`.
fn simple_interpolation(rest: &str, span: Span) -> PResult<(Expr, usize)> {
    let name_len = rest
        .char_indices()
        .find(|(_, c)| !is_ident_continue(*c))
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    let var = Expr::variable(&rest[..name_len], span);
    let after = &rest[name_len..];

    if let Some(index) = after.strip_prefix('[') {
        if let Some(close) = index.find(']') {
            let key = &index[..close];
            let dim = if let Some(name) = key.strip_prefix('$') {
                Expr::variable(name, span)
            } else if let Ok(value) = key.parse::<i64>() {
                Expr::int(value, span)
            } else {
                Expr::string(key, span)
            };
            let expr = Expr::new(
                ExprKind::ArrayDimFetch(ExprArrayDimFetch {
                    var: Box::new(var),
                    dim: Some(Box::new(dim)),
                }),
                span,
            );
            return Ok((expr, name_len + 1 + close + 1));
        }
    }
    if let Some(prop_rest) = after.strip_prefix("->") {
        if prop_rest.starts_with(is_ident_start) {
            let prop_len = prop_rest
                .char_indices()
                .find(|(_, c)| !is_ident_continue(*c))
                .map(|(idx, _)| idx)
                .unwrap_or(prop_rest.len());
            let expr = Expr::new(
                ExprKind::PropertyFetch(ExprPropertyFetch {
                    var: Box::new(var),
                    name: MemberName::Ident(prop_rest[..prop_len].to_string()),
                    nullsafe: false,
                }),
                span,
            );
            return Ok((expr, name_len + 2 + prop_len));
        }
    }
    Ok((var, name_len))
}

/// Index of the `}` closing the `{` at `open`, skipping quoted strings.
fn matching_brace(body: &str, open: usize) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut idx = open;
    let mut quote: Option<u8> = None;
    while idx < bytes.len() {
        let b = bytes[idx];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    idx += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            },
        }
        idx += 1;
    }
    None
}
