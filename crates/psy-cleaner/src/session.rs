use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::oracle::SymbolTable;

/// `use` aliases visible in one namespace, keyed by lower-cased alias.
/// Values are fully-qualified name parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    pub classes: BTreeMap<String, Vec<String>>,
    pub functions: BTreeMap<String, Vec<String>>,
    pub constants: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.constants.is_empty()
    }
}

/// Key of a namespace in the alias store: lower-cased path, or `global`.
pub fn namespace_key(namespace: &[String]) -> String {
    if namespace.is_empty() {
        "global".to_string()
    } else {
        namespace.join("\\").to_ascii_lowercase()
    }
}

/// Everything that outlives a single `clean` call.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    namespace: Option<Vec<String>>,
    aliases: HashMap<String, AliasTable>,
    strict_types: bool,
    declared: SymbolTable,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(&self) -> Option<&[String]> {
        self.namespace.as_deref()
    }

    /// Namespace parts, empty for the global namespace.
    pub fn namespace_parts(&self) -> &[String] {
        self.namespace.as_deref().unwrap_or(&[])
    }

    pub fn set_namespace(&mut self, namespace: Option<Vec<String>>) {
        let namespace = namespace.filter(|parts| !parts.is_empty());
        if namespace != self.namespace {
            info!(
                namespace = namespace.as_ref().map(|ns| ns.join("\\")).unwrap_or_default(),
                "session namespace changed"
            );
        }
        self.namespace = namespace;
    }

    pub fn aliases(&self, namespace: &[String]) -> Option<&AliasTable> {
        self.aliases.get(&namespace_key(namespace))
    }

    pub fn set_aliases(&mut self, namespace: &[String], aliases: AliasTable) {
        self.aliases.insert(namespace_key(namespace), aliases);
    }

    pub fn strict_types(&self) -> bool {
        self.strict_types
    }

    pub fn set_strict_types(&mut self, strict: bool) {
        if strict != self.strict_types {
            info!(strict, "strict_types changed");
        }
        self.strict_types = strict;
    }

    /// Symbols declared by earlier snippets that cleaned successfully.
    pub fn declared(&self) -> &SymbolTable {
        &self.declared
    }

    pub fn commit(&mut self, symbols: SymbolTable) {
        if !symbols.is_empty() {
            info!(count = symbols.len(), "committing declared symbols");
            self.declared.merge(symbols);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FunctionInfo, SymbolOracle};

    #[test]
    fn aliases_are_keyed_case_insensitively() {
        let mut session = SessionState::new();
        let mut table = AliasTable::default();
        table
            .classes
            .insert("bar".into(), vec!["Foo".into(), "Bar".into()]);
        session.set_aliases(&["Alpha".to_string()], table.clone());
        assert_eq!(session.aliases(&["ALPHA".to_string()]), Some(&table));
        assert_eq!(session.aliases(&[]), None);
    }

    #[test]
    fn empty_namespace_is_global() {
        let mut session = SessionState::new();
        session.set_namespace(Some(vec![]));
        assert_eq!(session.namespace(), None);
    }

    #[test]
    fn commit_merges_declarations() {
        let mut session = SessionState::new();
        let mut symbols = SymbolTable::new();
        symbols.add_function(FunctionInfo::named("greet"));
        session.commit(symbols);
        assert!(session.declared().function_exists("GREET"));
    }
}
