use itertools::Itertools;

use crate::span::Span;
use crate::{common_enum, common_struct};

common_enum! {
    unit
    pub enum NameKind {
        /// `Foo`
        Unqualified,
        /// `Foo\Bar`
        Qualified,
        /// `\Foo\Bar`
        FullyQualified,
        /// `namespace\Foo`
        Relative,
    }
}

common_struct! {
    /// A possibly namespaced name such as `Foo\Bar`. Parts never contain separators.
    pub struct Name {
        pub parts: Vec<String>,
        pub kind: NameKind,
        pub span: Span,
    }
}

impl Name {
    pub fn new(parts: Vec<String>, kind: NameKind, span: Span) -> Self {
        Self { parts, kind, span }
    }

    /// Parse the textual form of a name, e.g. `\Foo\Bar` or `namespace\Baz`.
    pub fn parse(text: &str, span: Span) -> Self {
        let (kind, rest) = if let Some(rest) = text.strip_prefix('\\') {
            (NameKind::FullyQualified, rest)
        } else if text.len() > 10 && text[..10].eq_ignore_ascii_case("namespace\\") {
            (NameKind::Relative, &text[10..])
        } else if text.contains('\\') {
            (NameKind::Qualified, text)
        } else {
            (NameKind::Unqualified, text)
        };
        let parts = rest
            .split('\\')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Self { parts, kind, span }
    }

    pub fn unqualified(name: impl Into<String>, span: Span) -> Self {
        Self {
            parts: vec![name.into()],
            kind: NameKind::Unqualified,
            span,
        }
    }

    pub fn fully_qualified<I, S>(parts: I, span: Span) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
            kind: NameKind::FullyQualified,
            span,
        }
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.kind == NameKind::FullyQualified
    }

    pub fn is_unqualified(&self) -> bool {
        self.kind == NameKind::Unqualified
    }

    pub fn first(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or("")
    }

    pub fn last(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    /// Parts joined with `\`, without any leading separator.
    pub fn plain(&self) -> String {
        self.parts.join("\\")
    }

    pub fn lowercase(&self) -> String {
        self.plain().to_ascii_lowercase()
    }

    /// `self`, `static` and `parent` resolve against the enclosing class, never a namespace.
    pub fn is_special_class(&self) -> bool {
        self.is_unqualified()
            && matches!(
                self.first().to_ascii_lowercase().as_str(),
                "self" | "static" | "parent"
            )
    }

    pub fn is(&self, name: &str) -> bool {
        self.plain().eq_ignore_ascii_case(name)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NameKind::FullyQualified => write!(f, "\\")?,
            NameKind::Relative => write!(f, "namespace\\")?,
            _ => {}
        }
        write!(f, "{}", self.parts.iter().join("\\"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_kinds() {
        let fq = Name::parse("\\Psy\\Shell", Span::null());
        assert_eq!(fq.kind, NameKind::FullyQualified);
        assert_eq!(fq.parts, vec!["Psy", "Shell"]);
        assert_eq!(fq.to_string(), "\\Psy\\Shell");

        let rel = Name::parse("namespace\\Foo", Span::null());
        assert_eq!(rel.kind, NameKind::Relative);
        assert_eq!(rel.plain(), "Foo");

        assert_eq!(Name::parse("A\\B", Span::null()).kind, NameKind::Qualified);
        assert!(Name::parse("parent", Span::null()).is_special_class());
    }
}
