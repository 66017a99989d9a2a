//! The `clean` entry point: parse a snippet, run the pass set, print the result.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use psy_core::ast::{Expr, ExprKind, MemberName, Name, NameOrExpr, NameRole, NodeMut, Stmt, StmtKind};
use psy_core::printer::print;
use psy_core::span::Span;
use psy_core::visit::{walk, Action, FnVisitor};
use psy_core::Result;
use tracing::{debug, info};

use crate::config::CleanerConfig;
use crate::oracle::{SymbolOracle, SymbolTable};
use crate::pass::{PassContext, PassSet};
use crate::passes::default_passes;
use crate::scope::NameScope;
use crate::session::SessionState;

type Logger = Box<dyn Fn(&str) + Send + Sync>;

/// Cleans snippets typed into one shell session.
pub struct CodeCleaner {
    config: CleanerConfig,
    oracle: Arc<dyn SymbolOracle>,
    session: SessionState,
    passes: PassSet,
    logger: Option<Logger>,
}

impl fmt::Debug for CodeCleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeCleaner")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct CodeCleanerBuilder {
    config: Option<CleanerConfig>,
    oracle: Option<Arc<dyn SymbolOracle>>,
    passes: Option<PassSet>,
    logger: Option<Logger>,
}

impl CodeCleanerBuilder {
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn oracle(mut self, oracle: Arc<dyn SymbolOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Replace the default pass list, e.g. to test one pass in isolation.
    pub fn passes(mut self, passes: PassSet) -> Self {
        self.passes = Some(passes);
        self
    }

    pub fn logger(mut self, logger: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn build(self) -> Result<CodeCleaner> {
        let config = self.config.unwrap_or_default();
        let oracle = match self.oracle {
            Some(oracle) => oracle,
            None => Arc::new(default_symbols(&config)?),
        };
        let passes = match self.passes {
            Some(passes) => passes,
            None => PassSet::new(default_passes())?,
        };
        Ok(CodeCleaner {
            config,
            oracle,
            session: SessionState::new(),
            passes,
            logger: self.logger,
        })
    }
}

/// Bundled builtins with any configured snapshots layered on top.
pub fn default_symbols(config: &CleanerConfig) -> Result<SymbolTable> {
    let mut symbols = SymbolTable::builtin()?;
    for path in &config.symbols {
        debug!(path = %path.display(), "loading symbol snapshot");
        symbols.merge(SymbolTable::load(path)?);
    }
    Ok(symbols)
}

impl CodeCleaner {
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn with_config(config: CleanerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> CodeCleanerBuilder {
        CodeCleanerBuilder::default()
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Current session namespace, `None` when global.
    pub fn namespace(&self) -> Option<String> {
        self.session.namespace().map(|parts| parts.join("\\"))
    }

    /// Clean the lines of one snippet.
    ///
    /// Returns `Ok(None)` when the input is incomplete and more lines may make it
    /// valid, and the code ready for evaluation otherwise.
    pub fn clean<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Option<String>> {
        let code = join_lines(lines);
        let Some(mut stmts) = self.parse(&code)? else {
            debug!("input incomplete");
            return Ok(None);
        };
        self.clean_stmts(&mut stmts)?;
        Ok(Some(print(&stmts)))
    }

    /// Run every pass over an already parsed snippet. On error the session is
    /// left as it was before the call.
    pub fn clean_stmts(&mut self, stmts: &mut Vec<Stmt>) -> Result<()> {
        let snapshot = self.session.clone();
        let logger = self.logger.as_deref().map(|logger| logger as &dyn Fn(&str));
        let mut ctx = PassContext::new(&mut self.session, self.oracle.as_ref(), &self.config)
            .with_logger(logger);
        match self.passes.run(stmts, &mut ctx) {
            Ok(()) => {
                let pending = ctx.into_pending();
                self.session.commit(pending);
                Ok(())
            }
            Err(err) => {
                info!(error = %err, "snippet rejected");
                self.session = snapshot;
                Err(err)
            }
        }
    }

    fn parse(&self, code: &str) -> Result<Option<Vec<Stmt>>> {
        match psy_lang::parse(code) {
            Ok(stmts) => Ok(Some(stmts)),
            Err(err) if err.is_unterminated() => Ok(None),
            Err(_) if code.trim_end().ends_with(',') => Ok(None),
            Err(err) if !err.is_eof() => Err(err.into()),
            Err(_) if self.config.require_semicolons => Ok(None),
            Err(_) => Ok(psy_lang::parse(&format!("{code};")).ok()),
        }
    }

    /// Resolve a class name against the session namespace and aliases.
    ///
    /// Fully qualified names and strings that are not class names come back
    /// unchanged, as do unknown short names in the global namespace.
    pub fn resolve_class_name(&self, name: &str) -> String {
        if name.starts_with('\\') || !is_valid_class_name(name) {
            return name.to_string();
        }
        let scope = NameScope::for_session(&self.session);
        let parsed = Name::parse(name, Span::null());
        if let Some(parts) = scope.expand_alias(NameRole::Class, &parsed) {
            return format!("\\{}", parts.join("\\"));
        }
        if scope.namespace().is_empty() {
            return name.to_string();
        }
        format!("\\{}", scope.qualify_name(name))
    }

    /// Guess whether a snippet does something, as opposed to just inspecting a
    /// value. Input that does not parse counts as neither.
    pub fn code_looks_like_action<S: AsRef<str>>(&self, lines: &[S]) -> bool {
        let code = join_lines(lines);
        let Ok(Some(mut stmts)) = self.parse(&code) else {
            return false;
        };
        if stmts
            .iter()
            .any(|stmt| !matches!(stmt.kind, StmtKind::Expr(_) | StmtKind::Nop))
        {
            return true;
        }
        let mut action = false;
        let mut visitor = FnVisitor::new(|node: NodeMut<'_>| {
            if let NodeMut::Expr(expr) = node {
                if is_action(expr) {
                    action = true;
                    return Ok(Action::Stop);
                }
            }
            Ok(Action::Continue)
        });
        if walk(&mut visitor, &mut stmts).is_err() {
            return false;
        }
        action
    }
}

fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(|line| -> &str { line.as_ref() }).join("\n") + "\n"
}

/// `^[a-zA-Z_\x7f-\xff][a-zA-Z0-9_\x7f-\xff\\]*$`
fn is_valid_class_name(name: &str) -> bool {
    let word = |c: char| c.is_ascii_alphabetic() || c == '_' || c >= '\x7f';
    let mut chars = name.chars();
    chars.next().is_some_and(word)
        && chars.all(|c| word(c) || c.is_ascii_digit() || c == '\\')
}

/// `getFoo`, `is_bar`, `toArray`, `as`: names that read rather than change.
fn is_getter(name: &str) -> bool {
    ["get", "is", "has", "to", "as"].iter().any(|prefix| {
        name.strip_prefix(prefix).is_some_and(|rest| {
            rest.chars()
                .next()
                .map_or(true, |c| c.is_ascii_uppercase() || c == '_')
        })
    })
}

fn is_action(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Assign(_) | ExprKind::AssignOp(_) | ExprKind::IncDec(_) => true,
        ExprKind::FuncCall(call) => match &call.name {
            NameOrExpr::Name(name) => !is_getter(name.last()),
            NameOrExpr::Expr(_) => true,
        },
        ExprKind::MethodCall(call) => !matches!(&call.name, MemberName::Ident(name) if is_getter(name)),
        ExprKind::StaticCall(call) => !matches!(&call.name, MemberName::Ident(name) if is_getter(name)),
        ExprKind::New(_)
        | ExprKind::Include(_)
        | ExprKind::Exit(_)
        | ExprKind::Print(_)
        | ExprKind::Throw(_)
        | ExprKind::Yield(_)
        | ExprKind::YieldFrom(_) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn getters() {
        assert!(is_getter("getName"));
        assert!(is_getter("is_valid"));
        assert!(is_getter("toArray"));
        assert!(is_getter("has"));
        assert!(!is_getter("getter"));
        assert!(!is_getter("save"));
        assert!(!is_getter("island"));
    }

    #[test]
    fn class_name_shape() {
        assert!(is_valid_class_name("Foo\\Bar"));
        assert!(is_valid_class_name("_x1"));
        assert!(!is_valid_class_name("1abc"));
        assert!(!is_valid_class_name("$foo"));
        assert!(!is_valid_class_name(""));
    }

    #[test]
    fn failed_snippet_leaves_session_alone() {
        let mut cleaner = CodeCleaner::new().unwrap();
        let err = cleaner.clean(&["namespace Foo;", "new Missing();"]).unwrap_err();
        assert_eq!(err.message(), "Class 'Foo\\Missing' not found");
        assert_eq!(cleaner.namespace(), None);
        assert!(cleaner.clean(&["namespace Foo;"]).unwrap().is_some());
        assert_eq!(cleaner.namespace().as_deref(), Some("Foo"));
    }
}
