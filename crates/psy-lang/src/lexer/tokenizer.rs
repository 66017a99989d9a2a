use super::winnow::{
    backtrack_err, is_ident_continue, is_ident_start, parse_cast, parse_double_quoted,
    parse_heredoc, parse_number, parse_single_quoted, ws, MULTI_PUNCT, SINGLE_PUNCT,
};
use psy_core::pretty::escape_single_quoted;
use thiserror::Error;
use winnow::combinator::alt;
use winnow::error::{ContextError, ErrMode};
use winnow::token::{literal, take_while};
use winnow::{ModalResult, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Abstract,
    And,
    Array,
    As,
    Break,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Die,
    Do,
    Echo,
    Else,
    ElseIf,
    Empty,
    Exit,
    Extends,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    Function,
    Global,
    Goto,
    If,
    Implements,
    Include,
    IncludeOnce,
    Instanceof,
    Insteadof,
    Interface,
    Isset,
    List,
    Match,
    Namespace,
    New,
    Or,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    Static,
    Switch,
    Throw,
    Trait,
    Try,
    Unset,
    Use,
    Var,
    While,
    Xor,
    Yield,
}

impl Keyword {
    /// Keywords are case-insensitive in PHP.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme.to_ascii_lowercase().as_str() {
            "abstract" => Self::Abstract,
            "and" => Self::And,
            "array" => Self::Array,
            "as" => Self::As,
            "break" => Self::Break,
            "case" => Self::Case,
            "catch" => Self::Catch,
            "class" => Self::Class,
            "clone" => Self::Clone,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "declare" => Self::Declare,
            "default" => Self::Default,
            "die" => Self::Die,
            "do" => Self::Do,
            "echo" => Self::Echo,
            "else" => Self::Else,
            "elseif" => Self::ElseIf,
            "empty" => Self::Empty,
            "exit" => Self::Exit,
            "extends" => Self::Extends,
            "final" => Self::Final,
            "finally" => Self::Finally,
            "fn" => Self::Fn,
            "for" => Self::For,
            "foreach" => Self::Foreach,
            "function" => Self::Function,
            "global" => Self::Global,
            "goto" => Self::Goto,
            "if" => Self::If,
            "implements" => Self::Implements,
            "include" => Self::Include,
            "include_once" => Self::IncludeOnce,
            "instanceof" => Self::Instanceof,
            "insteadof" => Self::Insteadof,
            "interface" => Self::Interface,
            "isset" => Self::Isset,
            "list" => Self::List,
            "match" => Self::Match,
            "namespace" => Self::Namespace,
            "new" => Self::New,
            "or" => Self::Or,
            "print" => Self::Print,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "public" => Self::Public,
            "readonly" => Self::Readonly,
            "require" => Self::Require,
            "require_once" => Self::RequireOnce,
            "return" => Self::Return,
            "static" => Self::Static,
            "switch" => Self::Switch,
            "throw" => Self::Throw,
            "trait" => Self::Trait,
            "try" => Self::Try,
            "unset" => Self::Unset,
            "use" => Self::Use,
            "var" => Self::Var,
            "while" => Self::While,
            "xor" => Self::Xor,
            "yield" => Self::Yield,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
    pub line: u32,
    pub end_line: u32,
}

impl Token {
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.lexeme == symbol
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Identifiers and keywords, both usable as member and label names.
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Keyword(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `$name`, lexeme includes the sigil.
    Variable,
    Ident,
    /// Qualified name containing at least one `\`.
    Name,
    Keyword(Keyword),
    Int,
    Float,
    /// Quoted string, lexeme includes the quotes.
    String,
    Heredoc,
    Cast,
    Symbol,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexerError {
    #[error("Syntax error, unterminated string starting on line {line}")]
    UnterminatedString { line: u32 },
    #[error("Unterminated comment starting line {line}")]
    UnterminatedComment { line: u32 },
    #[error("Syntax error, unterminated heredoc starting on line {line}")]
    UnterminatedHeredoc { line: u32 },
    #[error("Syntax error, unexpected character '{ch}'")]
    UnexpectedChar { ch: char, line: u32 },
}

pub fn lex(source: &str) -> Result<Vec<Token>, LexerError> {
    lex_from_line(source, 1)
}

/// Tokenize `source`, numbering lines from `first_line`. Used for expressions embedded in
/// strings so their spans point into the enclosing snippet.
pub fn lex_from_line(source: &str, first_line: u32) -> Result<Vec<Token>, LexerError> {
    let mut input = skip_open_tag(source);
    let mut tokens = Vec::new();
    let mut line = first_line;
    let mut cursor = 0;
    while !input.is_empty() {
        let before_ws = source.len() - input.len();
        if ws.parse_next(&mut input).is_err() {
            let open = source[before_ws..].find("/*").unwrap_or(0);
            line += count_lines(&source[cursor..before_ws + open]);
            return Err(LexerError::UnterminatedComment { line });
        }
        if input.is_empty() {
            break;
        }
        let start = source.len() - input.len();
        line += count_lines(&source[cursor..start]);
        cursor = start;

        let kind = match token_parser().parse_next(&mut input) {
            Ok(kind) => kind,
            Err(_) => return Err(classify_error(input, line)),
        };
        let end = source.len() - input.len();
        let lexeme = &source[start..end];
        let kind = match kind {
            TokenKind::Ident => Keyword::from_lexeme(lexeme)
                .map(TokenKind::Keyword)
                .unwrap_or(TokenKind::Ident),
            other => other,
        };

        if kind == TokenKind::Symbol && lexeme == "?>" {
            tokens.push(Token {
                kind,
                lexeme: ";".to_string(),
                span: Span { start, end },
                line,
                end_line: line,
            });
            let (html, rest) = split_inline_html(input);
            if !html.is_empty() {
                tokens.extend(echo_tokens(html, end, line));
            }
            input = rest;
            continue;
        }

        tokens.push(Token {
            kind,
            lexeme: lexeme.to_string(),
            span: Span { start, end },
            line,
            end_line: line + count_lines(lexeme),
        });
    }
    Ok(tokens)
}

fn count_lines(text: &str) -> u32 {
    text.bytes().filter(|b| *b == b'\n').count() as u32
}

fn skip_open_tag(source: &str) -> &str {
    let trimmed = source.trim_start();
    match trimmed.get(..5) {
        Some(tag) if tag.eq_ignore_ascii_case("<?php") => &trimmed[5..],
        _ => source,
    }
}

/// Text after `?>` up to the next open tag, and the input after that tag. The
/// newline directly after `?>` belongs to the tag.
fn split_inline_html(input: &str) -> (&str, &str) {
    let input = input
        .strip_prefix("\r\n")
        .or_else(|| input.strip_prefix('\n'))
        .unwrap_or(input);
    match input.find("<?php") {
        Some(idx) => (&input[..idx], &input[idx + 5..]),
        None => (input, ""),
    }
}

/// Inline HTML is output as is, so it lexes as `echo '<html>';`.
fn echo_tokens(html: &str, offset: usize, line: u32) -> [Token; 3] {
    let span = Span {
        start: offset,
        end: offset + html.len(),
    };
    let end_line = line + count_lines(html);
    let token = |kind: TokenKind, lexeme: String| Token {
        kind,
        lexeme,
        span,
        line,
        end_line,
    };
    [
        token(TokenKind::Keyword(Keyword::Echo), "echo".to_string()),
        token(
            TokenKind::String,
            format!("'{}'", escape_single_quoted(html)),
        ),
        token(TokenKind::Symbol, ";".to_string()),
    ]
}

fn classify_error(input: &str, line: u32) -> LexerError {
    let unquoted = input
        .strip_prefix(['b', 'B'])
        .filter(|rest| rest.starts_with(['\'', '"']))
        .unwrap_or(input);
    if unquoted.starts_with(['\'', '"']) {
        LexerError::UnterminatedString { line }
    } else if input.starts_with("<<<") {
        LexerError::UnterminatedHeredoc { line }
    } else {
        LexerError::UnexpectedChar {
            ch: input.chars().next().unwrap_or('\0'),
            line,
        }
    }
}

fn token_parser<'a>() -> impl Parser<&'a str, TokenKind, ErrMode<ContextError>> {
    alt((
        heredoc_token,
        cast_token,
        string_token,
        variable_token,
        number_token,
        name_token,
        symbol_token,
    ))
}

fn heredoc_token(input: &mut &str) -> ModalResult<TokenKind> {
    parse_heredoc(input).map(|_| TokenKind::Heredoc)
}

fn cast_token(input: &mut &str) -> ModalResult<TokenKind> {
    parse_cast(input).map(|_| TokenKind::Cast)
}

fn string_token(input: &mut &str) -> ModalResult<TokenKind> {
    alt((parse_single_quoted, parse_double_quoted))
        .map(|_| TokenKind::String)
        .parse_next(input)
}

fn variable_token(input: &mut &str) -> ModalResult<TokenKind> {
    (
        literal("$"),
        take_while(1, is_ident_start),
        take_while(0.., is_ident_continue),
    )
        .map(|_| TokenKind::Variable)
        .parse_next(input)
}

fn number_token(input: &mut &str) -> ModalResult<TokenKind> {
    let starts_number = input.starts_with(|c: char| c.is_ascii_digit())
        || (input.starts_with('.') && input[1..].starts_with(|c: char| c.is_ascii_digit()));
    if !starts_number {
        return Err(backtrack_err());
    }
    parse_number(input).map(|is_float| {
        if is_float {
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    })
}

/// `Foo`, `Foo\Bar`, `\Foo` and `namespace\Foo`. A `\` followed by `{` is left for the
/// group-use syntax.
fn name_token(input: &mut &str) -> ModalResult<TokenKind> {
    let original = *input;
    let mut rest = original;
    let leading = rest.starts_with('\\');
    if leading {
        rest = &rest[1..];
    }
    ident_segment(&mut rest)?;
    while rest.starts_with('\\') && rest[1..].starts_with(is_ident_start) {
        rest = &rest[1..];
        ident_segment(&mut rest)?;
    }
    let consumed = &original[..original.len() - rest.len()];
    *input = rest;
    Ok(if consumed.contains('\\') {
        TokenKind::Name
    } else {
        TokenKind::Ident
    })
}

fn ident_segment(input: &mut &str) -> ModalResult<()> {
    (
        take_while(1, is_ident_start),
        take_while(0.., is_ident_continue),
    )
        .map(|_| ())
        .parse_next(input)
}

fn symbol_token(input: &mut &str) -> ModalResult<TokenKind> {
    alt((
        multi_punct_token.map(|_| TokenKind::Symbol),
        single_punct_token.map(|_| TokenKind::Symbol),
    ))
    .parse_next(input)
}

fn multi_punct_token(input: &mut &str) -> ModalResult<&'static str> {
    for sym in MULTI_PUNCT {
        if let Some(rest) = input.strip_prefix(sym) {
            *input = rest;
            return Ok(*sym);
        }
    }
    Err(backtrack_err())
}

fn single_punct_token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1..=1, |c: char| SINGLE_PUNCT.contains(c)).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        lex(source)
            .unwrap()
            .into_iter()
            .map(|token| (token.kind, token.lexeme))
            .collect()
    }

    #[test]
    fn lexes_variables_names_and_keywords() {
        let tokens = kinds("<?php $foo = \\Foo\\Bar::BAZ; ECHO");
        assert_eq!(tokens[0], (TokenKind::Variable, "$foo".to_string()));
        assert_eq!(tokens[2], (TokenKind::Name, "\\Foo\\Bar".to_string()));
        assert_eq!(tokens[3], (TokenKind::Symbol, "::".to_string()));
        assert_eq!(tokens[6].0, TokenKind::Keyword(Keyword::Echo));
    }

    #[test]
    fn group_use_prefix_stops_before_brace() {
        let tokens = kinds("use Foo\\{Bar, Baz};");
        assert_eq!(tokens[1], (TokenKind::Ident, "Foo".to_string()));
        assert_eq!(tokens[2], (TokenKind::Symbol, "\\".to_string()));
        assert_eq!(tokens[3], (TokenKind::Symbol, "{".to_string()));
    }

    #[test]
    fn tracks_lines() {
        let tokens = lex("$a;\n/* x\n */ $b;").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn unterminated_inputs_are_classified() {
        assert_eq!(
            lex("echo 'foo"),
            Err(LexerError::UnterminatedString { line: 1 })
        );
        assert_eq!(
            lex("$a = 1;\n/* open"),
            Err(LexerError::UnterminatedComment { line: 2 })
        );
        assert!(matches!(
            lex("<<<EOT\nfoo\n"),
            Err(LexerError::UnterminatedHeredoc { .. })
        ));
    }

    #[test]
    fn casts_and_numbers() {
        let tokens = kinds("(int) 1.5 + 0x1F");
        assert_eq!(tokens[0].0, TokenKind::Cast);
        assert_eq!(tokens[1], (TokenKind::Float, "1.5".to_string()));
        assert_eq!(tokens[3], (TokenKind::Int, "0x1F".to_string()));
    }
}
