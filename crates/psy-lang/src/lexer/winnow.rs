use winnow::combinator::{alt, cut_err, opt, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::token::{literal, take_till, take_until, take_while};
use winnow::{ModalResult, Parser};

// Longest first: `strip_prefix` takes the first match.
pub(crate) const MULTI_PUNCT: &[&str] = &[
    "<<=", ">>=", "**=", "...", "<=>", "===", "!==", "??=", "?->", "<<", ">>", "**", "++", "--",
    "->", "=>", "::", "==", "!=", "<>", "<=", ">=", "&&", "||", "??", "+=", "-=", "*=", "/=",
    ".=", "%=", "&=", "|=", "^=", "?>",
];
pub(crate) const SINGLE_PUNCT: &str = "+-*/%=<>!&|^~.,;:?()[]{}@$`\\";

pub(crate) fn ws(input: &mut &str) -> ModalResult<()> {
    repeat::<_, _, (), _, _>(
        0..,
        alt((whitespace, line_comment, hash_comment, block_comment)),
    )
    .parse_next(input)?;
    Ok(())
}

pub(crate) fn whitespace(input: &mut &str) -> ModalResult<()> {
    take_while(1.., char::is_whitespace)
        .map(|_| ())
        .parse_next(input)
}

pub(crate) fn line_comment(input: &mut &str) -> ModalResult<()> {
    literal("//").parse_next(input)?;
    comment_tail(input)
}

pub(crate) fn hash_comment(input: &mut &str) -> ModalResult<()> {
    // `#[` opens an attribute, not a comment
    if input.starts_with("#[") {
        return Err(backtrack_err());
    }
    literal("#").parse_next(input)?;
    comment_tail(input)
}

/// Single-line comments end at a newline or a closing tag, whichever comes first.
fn comment_tail(input: &mut &str) -> ModalResult<()> {
    let slice = *input;
    let end = match (slice.find('\n'), slice.find("?>")) {
        (Some(nl), Some(tag)) if tag < nl => tag,
        (Some(nl), _) => nl,
        (None, Some(tag)) => tag,
        (None, None) => slice.len(),
    };
    *input = &slice[end..];
    opt(literal("\n")).parse_next(input)?;
    Ok(())
}

pub(crate) fn block_comment(input: &mut &str) -> ModalResult<()> {
    literal("/*").parse_next(input)?;
    cut_err(take_until(0.., "*/")).parse_next(input)?;
    literal("*/").parse_next(input)?;
    Ok(())
}

/// `'...'` with `\'` and `\\` escapes; returns the raw lexeme.
pub(crate) fn parse_single_quoted(input: &mut &str) -> ModalResult<String> {
    scan_quoted(input, '\'')
}

/// `"..."` with backslash escapes; returns the raw lexeme.
pub(crate) fn parse_double_quoted(input: &mut &str) -> ModalResult<String> {
    scan_quoted(input, '"')
}

fn scan_quoted(input: &mut &str, quote: char) -> ModalResult<String> {
    let slice = *input;
    let start = if slice.starts_with(quote) {
        1
    } else if (slice.starts_with('b') || slice.starts_with('B')) && slice[1..].starts_with(quote) {
        2
    } else {
        return Err(backtrack_err());
    };
    let bytes = slice.as_bytes();
    let mut idx = start;
    let mut escape = false;
    while idx < bytes.len() {
        let b = bytes[idx];
        idx += 1;
        if b == b'\\' && !escape {
            escape = true;
            continue;
        }
        if b == quote as u8 && !escape {
            let literal = slice[..idx].to_string();
            *input = &slice[idx..];
            return Ok(literal);
        }
        escape = false;
    }
    Err(ErrMode::Cut(ContextError::new()))
}

/// `<<<ID`, `<<<"ID"` or `<<<'ID'` up to and including the closing identifier.
pub(crate) fn parse_heredoc(input: &mut &str) -> ModalResult<String> {
    let slice = *input;
    let mut rest = slice;
    literal("<<<").parse_next(&mut rest)?;
    take_while(0.., |c: char| c == ' ' || c == '\t').parse_next(&mut rest)?;
    let quote = opt(alt(('"', '\''))).parse_next(&mut rest)?;
    let label: &str = (take_while(1, is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(&mut rest)?;
    if let Some(quote) = quote {
        cut_err(quote).parse_next(&mut rest)?;
    }
    cut_err(literal("\n")).parse_next(&mut rest)?;

    let body_start = slice.len() - rest.len();
    let mut offset = body_start;
    loop {
        let line_end = slice[offset..].find('\n').map(|idx| offset + idx);
        let line = &slice[offset..line_end.unwrap_or(slice.len())];
        let trimmed = line.trim_start_matches([' ', '\t']);
        if let Some(after) = trimmed.strip_prefix(label) {
            if !after.starts_with(is_ident_continue) {
                let end = offset + (line.len() - trimmed.len()) + label.len();
                let lexeme = slice[..end].to_string();
                *input = &slice[end..];
                return Ok(lexeme);
            }
        }
        match line_end {
            Some(idx) => offset = idx + 1,
            None => return Err(ErrMode::Cut(ContextError::new())),
        }
    }
}

/// `(int)`, `( string )` and friends. Backtracks when the parentheses hold anything else.
pub(crate) fn parse_cast(input: &mut &str) -> ModalResult<String> {
    let mut rest = *input;
    literal("(").parse_next(&mut rest)?;
    take_while(0.., |c: char| c == ' ' || c == '\t').parse_next(&mut rest)?;
    let name: &str = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(&mut rest)?;
    take_while(0.., |c: char| c == ' ' || c == '\t').parse_next(&mut rest)?;
    literal(")").parse_next(&mut rest)?;
    if psy_core::ast::CastKind::from_name(name).is_none() {
        return Err(backtrack_err());
    }
    *input = rest;
    Ok(name.to_ascii_lowercase())
}

pub(crate) fn parse_number(input: &mut &str) -> ModalResult<bool> {
    let slice = *input;
    let lower = slice.get(..2).map(str::to_ascii_lowercase);
    if matches!(lower.as_deref(), Some("0x") | Some("0b") | Some("0o")) {
        let mut rest = &slice[2..];
        let radix_digit: fn(char) -> bool = match lower.as_deref() {
            Some("0x") => |c: char| c.is_ascii_hexdigit(),
            Some("0b") => |c: char| c == '0' || c == '1',
            _ => |c: char| ('0'..='7').contains(&c),
        };
        digit_run(&mut rest, radix_digit)?;
        *input = rest;
        return Ok(false);
    }

    let mut rest = slice;
    let has_int = rest.starts_with(is_decimal);
    if has_int {
        digit_run(&mut rest, is_decimal)?;
    }
    let mut is_float = false;
    if rest.starts_with('.') && rest[1..].starts_with(is_decimal) {
        rest = &rest[1..];
        digit_run(&mut rest, is_decimal)?;
        is_float = true;
    }
    if !has_int && !is_float {
        return Err(backtrack_err());
    }
    if rest.starts_with(['e', 'E']) {
        let mut exp = &rest[1..];
        opt(alt(('+', '-'))).parse_next(&mut exp)?;
        if exp.starts_with(is_decimal) {
            digit_run(&mut exp, is_decimal)?;
            rest = exp;
            is_float = true;
        }
    }
    *input = rest;
    Ok(is_float)
}

fn is_decimal(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Digits with single `_` separators between them, as in `1_000`. A `_` that is
/// not followed by a digit ends the literal.
fn digit_run(input: &mut &str, is_digit: fn(char) -> bool) -> ModalResult<()> {
    take_while(1.., is_digit).parse_next(input)?;
    while input.starts_with('_') && input[1..].starts_with(is_digit) {
        *input = &input[1..];
        take_while(1.., is_digit).parse_next(input)?;
    }
    Ok(())
}

pub(crate) fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

pub(crate) fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

pub(crate) fn backtrack_err() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}
