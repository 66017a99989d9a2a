use std::fmt::{self, Formatter};

/// Configuration for pretty-printing syntax trees.
#[derive(Debug, Clone)]
pub struct PrettyOptions {
    /// Number of spaces to indent per nesting level.
    pub indent_size: usize,
    /// Append `// line N` markers to printed statements.
    pub show_lines: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            show_lines: false,
        }
    }
}

/// Formatting context shared across pretty printers.
pub struct PrettyCtx<'a> {
    pub options: &'a PrettyOptions,
    indent: usize,
}

impl<'a> PrettyCtx<'a> {
    pub fn new(options: &'a PrettyOptions) -> Self {
        Self { options, indent: 0 }
    }

    /// Start at an existing indentation, e.g. for a closure body printed inside an expression.
    pub fn with_base_indent(options: &'a PrettyOptions, indent: usize) -> Self {
        Self { options, indent }
    }

    pub fn write_indent(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for _ in 0..self.indent {
            write!(f, " ")?;
        }
        Ok(())
    }

    pub fn writeln(&self, f: &mut Formatter<'_>, line: impl AsRef<str>) -> fmt::Result {
        self.write_indent(f)?;
        writeln!(f, "{}", line.as_ref())
    }

    pub fn current_indent(&self) -> usize {
        self.indent
    }

    pub fn increase_indent(&mut self) {
        self.indent += self.options.indent_size;
    }

    pub fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(self.options.indent_size);
    }

    pub fn with_indent<F>(&mut self, mut f_closure: F) -> fmt::Result
    where
        F: FnMut(&mut Self) -> fmt::Result,
    {
        self.increase_indent();
        let result = f_closure(self);
        self.decrease_indent();
        result
    }
}

/// Trait implemented by nodes that support pretty-printing.
pub trait PrettyPrintable {
    fn fmt_pretty(&self, f: &mut Formatter<'_>, ctx: &mut PrettyCtx<'_>) -> fmt::Result;
}

/// Helper wrapper implementing `Display` by delegating to `PrettyPrintable`.
pub struct PrettyDisplay<'a, T: ?Sized> {
    value: &'a T,
    options: PrettyOptions,
    base_indent: usize,
}

impl<'a, T: ?Sized> PrettyDisplay<'a, T> {
    pub fn new(value: &'a T, options: PrettyOptions) -> Self {
        Self {
            value,
            options,
            base_indent: 0,
        }
    }

    pub fn indented(mut self, indent: usize) -> Self {
        self.base_indent = indent;
        self
    }
}

impl<T> fmt::Display for PrettyDisplay<'_, T>
where
    T: PrettyPrintable + ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut ctx = PrettyCtx::with_base_indent(&self.options, self.base_indent);
        self.value.fmt_pretty(f, &mut ctx)
    }
}

/// Convenience helper to build a `PrettyDisplay` wrapper.
pub fn pretty<T>(value: &T, options: PrettyOptions) -> PrettyDisplay<'_, T>
where
    T: PrettyPrintable + ?Sized,
{
    PrettyDisplay::new(value, options)
}

/// Escape a string for a PHP double-quoted literal.
pub fn escape_double_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{1B}' => out.push_str("\\e"),
            '\u{0C}' => out.push_str("\\f"),
            ch if ch.is_control() => {
                use std::fmt::Write as _;
                let _ = write!(out, "\\u{{{:x}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a string for a PHP single-quoted literal: only `\` and `'` need it.
pub fn escape_single_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes() {
        assert_eq!(escape_single_quoted("it's \\"), "it\\'s \\\\");
        assert_eq!(escape_double_quoted("a\"$b\n"), "a\\\"\\$b\\n");
    }
}
