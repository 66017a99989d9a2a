//! Namespace and alias resolution shared by the namespace-aware passes.

use psy_core::ast::{Name, NameKind, NameRole, NodeMut, StmtKind, StmtNamespace, StmtUse, UseKind};

use crate::session::{AliasTable, SessionState};

/// Live namespace and alias table for the snippet being walked.
#[derive(Debug, Clone, Default)]
pub struct NameScope {
    namespace: Vec<String>,
    aliases: AliasTable,
}

impl NameScope {
    /// Start in the session namespace with the aliases recorded for it.
    pub fn for_session(session: &SessionState) -> Self {
        let namespace = session.namespace_parts().to_vec();
        let aliases = session.aliases(&namespace).cloned().unwrap_or_default();
        Self { namespace, aliases }
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Synthetic namespaces restore the session's aliases, and so does an explicit
    /// open namespace that re-enters the session namespace. Anything else starts empty.
    pub fn enter_namespace(&mut self, ns: &StmtNamespace, session: &SessionState) {
        self.namespace = ns
            .name
            .as_ref()
            .map(|name| name.parts.clone())
            .unwrap_or_default();
        let restore = ns.synthetic
            || (!ns.braced && names_equal(&self.namespace, session.namespace_parts()));
        self.aliases = if restore {
            session.aliases(&self.namespace).cloned().unwrap_or_default()
        } else {
            AliasTable::default()
        };
    }

    pub fn add_use(&mut self, stmt_use: &StmtUse) {
        for (kind, parts, item) in stmt_use.resolved_items() {
            let alias = item.alias_name().to_ascii_lowercase();
            let table = match kind {
                UseKind::Normal => &mut self.aliases.classes,
                UseKind::Function => &mut self.aliases.functions,
                UseKind::Const => &mut self.aliases.constants,
            };
            table.insert(alias, parts);
        }
    }

    /// Track namespace and `use` statements as a pass enters nodes.
    pub fn observe(&mut self, node: &NodeMut<'_>, session: &SessionState) {
        if let NodeMut::Stmt(stmt) = node {
            match &stmt.kind {
                StmtKind::Namespace(ns) => self.enter_namespace(ns, session),
                StmtKind::Use(stmt_use) => self.add_use(stmt_use),
                _ => {}
            }
        }
    }

    /// Alias expansion only: the fully-qualified target when an alias applies.
    pub fn expand_alias(&self, role: NameRole, name: &Name) -> Option<Vec<String>> {
        if !matches!(name.kind, NameKind::Unqualified | NameKind::Qualified) {
            return None;
        }
        let first = name.first().to_ascii_lowercase();
        if name.is_unqualified() {
            let table = match role {
                NameRole::Class => &self.aliases.classes,
                NameRole::Function => &self.aliases.functions,
                NameRole::Constant => &self.aliases.constants,
            };
            return table.get(&first).cloned();
        }
        let target = self.aliases.classes.get(&first)?;
        let mut parts = target.clone();
        parts.extend(name.parts.iter().skip(1).cloned());
        Some(parts)
    }

    /// Fully-qualified parts: as-is when fully qualified, alias-substituted when the
    /// first segment is an alias, namespace-prefixed otherwise.
    pub fn resolve_parts(&self, role: NameRole, name: &Name) -> Vec<String> {
        if name.is_fully_qualified() || (role == NameRole::Class && name.is_special_class()) {
            return name.parts.clone();
        }
        if let Some(parts) = self.expand_alias(role, name) {
            return parts;
        }
        self.qualify(&name.parts)
    }

    pub fn resolve(&self, role: NameRole, name: &Name) -> String {
        self.resolve_parts(role, name).join("\\")
    }

    pub fn resolve_class(&self, name: &Name) -> String {
        self.resolve(NameRole::Class, name)
    }

    /// Prefix the current namespace onto a declared short name.
    pub fn qualify(&self, parts: &[String]) -> Vec<String> {
        self.namespace.iter().chain(parts).cloned().collect()
    }

    pub fn qualify_name(&self, short: &str) -> String {
        self.qualify(&[short.to_string()]).join("\\")
    }
}

fn names_equal(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.eq_ignore_ascii_case(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use psy_core::ast::UseItem;
    use psy_core::span::Span;
    use pretty_assertions::assert_eq;

    fn name(text: &str) -> Name {
        Name::parse(text, Span::null())
    }

    fn use_stmt(kind: UseKind, target: &str, alias: Option<&str>) -> StmtUse {
        StmtUse {
            kind,
            prefix: None,
            uses: vec![UseItem {
                name: name(target),
                alias: alias.map(str::to_string),
                kind: None,
                span: Span::null(),
            }],
        }
    }

    #[test]
    fn resolution_order() {
        let mut scope = NameScope::default();
        scope.namespace = vec!["App".into()];
        scope.add_use(&use_stmt(UseKind::Normal, "Foo\\Bar", None));
        scope.add_use(&use_stmt(UseKind::Function, "Util\\helper", Some("h")));

        assert_eq!(scope.resolve_class(&name("\\Baz")), "Baz");
        assert_eq!(scope.resolve_class(&name("bar")), "Foo\\Bar");
        assert_eq!(scope.resolve_class(&name("Bar\\Qux")), "Foo\\Bar\\Qux");
        assert_eq!(scope.resolve_class(&name("Qux")), "App\\Qux");
        assert_eq!(scope.resolve_class(&name("namespace\\Qux")), "App\\Qux");
        assert_eq!(scope.resolve_class(&name("static")), "static");
        assert_eq!(scope.resolve(NameRole::Function, &name("H")), "Util\\helper");
        assert_eq!(scope.resolve(NameRole::Function, &name("bar")), "App\\bar");
    }

    #[test]
    fn entering_namespaces() {
        let mut session = SessionState::new();
        session.set_namespace(Some(vec!["Alpha".into()]));
        let mut table = AliasTable::default();
        table.classes.insert("b".into(), vec!["Beta".into(), "B".into()]);
        session.set_aliases(&["Alpha".to_string()], table.clone());

        let scope = NameScope::for_session(&session);
        assert_eq!(scope.aliases(), &table);

        let mut scope = NameScope::default();
        let ns = |name_text: &str, braced: bool, synthetic: bool| StmtNamespace {
            name: Some(name(name_text)),
            body: vec![],
            braced,
            synthetic,
        };
        scope.enter_namespace(&ns("alpha", false, false), &session);
        assert_eq!(scope.aliases(), &table);
        scope.enter_namespace(&ns("Alpha", true, false), &session);
        assert!(scope.aliases().is_empty());
        scope.enter_namespace(&ns("Gamma", false, false), &session);
        assert!(scope.aliases().is_empty());
        assert_eq!(scope.namespace(), &["Gamma".to_string()]);
    }
}
