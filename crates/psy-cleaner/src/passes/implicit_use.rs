use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use psy_core::ast::{is_builtin_type, Name, NameKind, NameRole, NodeMut, Stmt, StmtKind, StmtUse, UseItem, UseKind};
use psy_core::printer::print;
use psy_core::span::Span;
use psy_core::visit::{walk, Action, FnVisitor};
use psy_core::Result;
use tracing::debug;

use crate::config::ImplicitUseConfig;
use crate::oracle::SymbolOracle;
use crate::pass::{Pass, PassContext};

/// Adds `use` statements for short class names that unambiguously match one
/// class in the configured namespaces.
#[derive(Default)]
pub struct ImplicitUsePass {
    /// Lower-cased short name to its only candidate; `None` when ambiguous.
    short_names: BTreeMap<String, Option<String>>,
}

fn normalize_prefix(prefix: &str) -> String {
    format!("{}\\", prefix.trim_matches('\\').to_ascii_lowercase())
}

fn in_scope(config: &ImplicitUseConfig, fqn: &str) -> bool {
    let lower = fqn.to_ascii_lowercase();
    let matches = |prefixes: &[String]| {
        prefixes
            .iter()
            .any(|prefix| lower.starts_with(&normalize_prefix(prefix)))
    };
    let included = config.include_namespaces.is_empty() || matches(&config.include_namespaces);
    included && !matches(&config.exclude_namespaces)
}

fn class_like_exists(symbols: &dyn SymbolOracle, name: &str) -> bool {
    symbols.class_exists(name) || symbols.interface_exists(name) || symbols.trait_exists(name)
}

/// Short names that `use` statements in `stmts` already bind.
fn existing_aliases(stmts: &[Stmt]) -> BTreeSet<String> {
    stmts
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Use(stmt_use) => Some(stmt_use),
            _ => None,
        })
        .flat_map(|stmt_use| stmt_use.resolved_items())
        .filter(|(kind, _, _)| *kind == UseKind::Normal)
        .map(|(_, _, item)| item.alias_name().to_ascii_lowercase())
        .collect()
}

fn unqualified_class_names(stmts: &mut Vec<Stmt>) -> Result<BTreeSet<String>> {
    let mut found = BTreeSet::new();
    let mut visitor = FnVisitor::new(|mut node: NodeMut<'_>| {
        for (role, name) in node.names_mut() {
            if role == NameRole::Class
                && name.kind == NameKind::Unqualified
                && !name.is_special_class()
                && !is_builtin_type(name)
            {
                found.insert(name.plain());
            }
        }
        Ok(Action::Continue)
    });
    walk(&mut visitor, stmts)?;
    Ok(found)
}

fn use_statement(fqn: &str, span: Span) -> Stmt {
    let stmt_use = StmtUse {
        kind: UseKind::Normal,
        prefix: None,
        uses: vec![UseItem {
            name: Name::parse(fqn, span),
            alias: None,
            kind: None,
            span,
        }],
    };
    Stmt::new(StmtKind::Use(stmt_use), span)
}

impl ImplicitUsePass {
    fn build_short_names(&mut self, ctx: &PassContext<'_>) {
        self.short_names.clear();
        for fqn in ctx.symbols().declared_class_likes() {
            let fqn = fqn.trim_start_matches('\\').to_string();
            let Some((_, short)) = fqn.rsplit_once('\\') else {
                continue;
            };
            if !in_scope(&ctx.config.implicit_use, &fqn) {
                continue;
            }
            self.short_names
                .entry(short.to_ascii_lowercase())
                .and_modify(|candidate| {
                    if candidate.as_deref().is_some_and(|c| !c.eq_ignore_ascii_case(&fqn)) {
                        *candidate = None;
                    }
                })
                .or_insert_with(|| Some(fqn.clone()));
        }
    }

    /// Insert the missing `use` statements at the head of `body`.
    fn add_uses(
        &self,
        body: &mut Vec<Stmt>,
        namespace: &[String],
        mut aliases: BTreeSet<String>,
        ctx: &PassContext<'_>,
    ) -> Result<()> {
        aliases.extend(existing_aliases(body));
        let symbols = ctx.symbols();
        let mut targets = BTreeSet::new();
        for short in unqualified_class_names(body)? {
            let key = short.to_ascii_lowercase();
            if class_like_exists(&symbols, &short) || aliases.contains(&key) {
                continue;
            }
            let Some(Some(fqn)) = self.short_names.get(&key) else {
                continue;
            };
            if !namespace.is_empty() {
                let local = format!("{}\\{}", namespace.join("\\"), short);
                if class_like_exists(&symbols, &local) {
                    continue;
                }
            }
            targets.insert(fqn.clone());
        }
        if targets.is_empty() {
            return Ok(());
        }

        let span = body.first().map(|stmt| stmt.span).unwrap_or_else(Span::null);
        let uses = targets
            .iter()
            .sorted_by_key(|fqn| fqn.to_ascii_lowercase())
            .map(|fqn| use_statement(fqn, span))
            .collect_vec();
        debug!(count = uses.len(), "adding implicit use statements");
        ctx.log(&print(&uses));
        body.splice(0..0, uses);
        Ok(())
    }
}

impl Pass for ImplicitUsePass {
    fn name(&self) -> &'static str {
        "implicit_use"
    }

    fn reset(&mut self) {
        self.short_names.clear();
    }

    fn before_traverse(&mut self, stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        if !ctx.config.implicit_use.is_enabled() {
            return Ok(());
        }
        self.build_short_names(ctx);
        if self.short_names.is_empty() {
            return Ok(());
        }

        let session_aliases = |namespace: &[String]| -> BTreeSet<String> {
            ctx.session
                .aliases(namespace)
                .map(|table| table.classes.keys().cloned().collect())
                .unwrap_or_default()
        };

        let has_namespace = stmts
            .iter()
            .any(|stmt| matches!(stmt.kind, StmtKind::Namespace(_)));
        if !has_namespace {
            let namespace = ctx.session.namespace_parts().to_vec();
            let aliases = session_aliases(&namespace);
            return self.add_uses(stmts, &namespace, aliases, ctx);
        }

        for stmt in stmts.iter_mut() {
            let StmtKind::Namespace(ns) = &mut stmt.kind else {
                continue;
            };
            let namespace = ns.name.as_ref().map(|name| name.parts.clone()).unwrap_or_default();
            let same_as_session = namespace.len() == ctx.session.namespace_parts().len()
                && namespace
                    .iter()
                    .zip(ctx.session.namespace_parts())
                    .all(|(a, b)| a.eq_ignore_ascii_case(b));
            let aliases = if !ns.braced && same_as_session {
                session_aliases(&namespace)
            } else {
                BTreeSet::new()
            };
            self.add_uses(&mut ns.body, &namespace, aliases, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefixes_match_case_insensitively() {
        let config = ImplicitUseConfig {
            include_namespaces: vec!["\\App\\".into()],
            exclude_namespaces: vec!["App\\Internal".into()],
        };
        assert!(in_scope(&config, "app\\Models\\User"));
        assert!(!in_scope(&config, "App\\Internal\\Secret"));
        assert!(!in_scope(&config, "Application\\Thing"));
        assert_eq!(normalize_prefix("\\Foo\\Bar\\"), "foo\\bar\\");
    }
}
