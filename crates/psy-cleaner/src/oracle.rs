//! "Does this symbol exist?" queries used by the validators.
//!
//! A shell embedded in a running PHP process would ask the runtime. Here the
//! answer comes from a [`SymbolTable`] snapshot (a bundled builtin one plus any
//! user-supplied JSON) layered under the symbols committed by earlier snippets.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use psy_core::{Error, Result};
use serde::{Deserialize, Serialize};

const BUILTIN_SNAPSHOT: &str = include_str!("../data/php_builtins.json");

pub trait SymbolOracle: Send + Sync {
    fn class_exists(&self, name: &str) -> bool;
    fn interface_exists(&self, name: &str) -> bool;
    fn trait_exists(&self, name: &str) -> bool;
    fn function_exists(&self, name: &str) -> bool;
    fn constant_defined(&self, name: &str) -> bool;

    /// Shape of a class, interface or trait, when known.
    fn class_info(&self, _name: &str) -> Option<&ClassInfo> {
        None
    }

    fn function_info(&self, _name: &str) -> Option<&FunctionInfo> {
        None
    }

    fn is_final_class(&self, name: &str) -> bool {
        self.class_info(name).is_some_and(|info| info.is_final)
    }

    /// `None` when some class in the hierarchy has unknown constants.
    fn class_constant_exists(&self, class: &str, constant: &str) -> Option<bool> {
        search_hierarchy(self, class, |info| {
            info.constants
                .as_ref()
                .map(|consts| consts.iter().any(|c| c == constant))
        })
    }

    /// `None` when some class in the hierarchy has unknown methods.
    fn method_exists(&self, class: &str, method: &str) -> Option<bool> {
        search_hierarchy(self, class, |info| {
            info.methods.as_ref().map(|methods| {
                methods.iter().any(|m| {
                    m.eq_ignore_ascii_case(method) || m.eq_ignore_ascii_case("__callStatic")
                })
            })
        })
    }

    /// Zero-based positions of by-reference parameters.
    fn function_by_ref_params(&self, name: &str) -> Option<Vec<usize>> {
        self.function_info(name).map(|info| info.by_ref.clone())
    }

    /// Fully-qualified names of every known class, interface and trait.
    fn declared_class_likes(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Breadth-first over parents, interfaces and traits. `found` answers `None`
/// when the class is known but the member list is not.
fn search_hierarchy<O, F>(oracle: &O, class: &str, found: F) -> Option<bool>
where
    O: SymbolOracle + ?Sized,
    F: Fn(&ClassInfo) -> Option<bool>,
{
    let mut queue = vec![class.to_string()];
    let mut seen = HashSet::new();
    let mut complete = true;
    while let Some(name) = queue.pop() {
        if !seen.insert(class_key(&name)) {
            continue;
        }
        let Some(info) = oracle.class_info(&name) else {
            complete = false;
            continue;
        };
        match found(info) {
            Some(true) => return Some(true),
            Some(false) => {}
            None => complete = false,
        }
        queue.extend(info.parent.iter().cloned());
        queue.extend(info.interfaces.iter().cloned());
        queue.extend(info.traits.iter().cloned());
    }
    complete.then_some(false)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassInfo {
    /// Fully-qualified, without a leading separator.
    pub name: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_final: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<String>,
    /// `None` when unknown; lookups then give the benefit of the doubt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

impl ClassInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub by_ref: Vec<usize>,
}

impl FunctionInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_ref: Vec::new(),
        }
    }
}

/// Class and function names are case-insensitive.
pub fn class_key(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

/// Constant names are case-sensitive; their namespace part is not.
pub fn constant_key(name: &str) -> String {
    let name = name.trim_start_matches('\\');
    match name.rsplit_once('\\') {
        Some((ns, short)) => format!("{}\\{}", ns.to_ascii_lowercase(), short),
        None => name.to_string(),
    }
}

/// In-memory symbol set, serialized as plain lists of declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SymbolSnapshot", into = "SymbolSnapshot")]
pub struct SymbolTable {
    classes: BTreeMap<String, ClassInfo>,
    interfaces: BTreeMap<String, ClassInfo>,
    traits: BTreeMap<String, ClassInfo>,
    functions: BTreeMap<String, FunctionInfo>,
    constants: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SymbolSnapshot {
    classes: Vec<ClassInfo>,
    interfaces: Vec<ClassInfo>,
    traits: Vec<ClassInfo>,
    functions: Vec<FunctionInfo>,
    constants: Vec<String>,
}

impl From<SymbolSnapshot> for SymbolTable {
    fn from(snapshot: SymbolSnapshot) -> Self {
        let mut table = SymbolTable::new();
        snapshot.classes.into_iter().for_each(|c| table.add_class(c));
        snapshot.interfaces.into_iter().for_each(|i| table.add_interface(i));
        snapshot.traits.into_iter().for_each(|t| table.add_trait(t));
        snapshot.functions.into_iter().for_each(|f| table.add_function(f));
        snapshot.constants.into_iter().for_each(|c| table.add_constant(c));
        table
    }
}

impl From<SymbolTable> for SymbolSnapshot {
    fn from(table: SymbolTable) -> Self {
        Self {
            classes: table.classes.into_values().collect(),
            interfaces: table.interfaces.into_values().collect(),
            traits: table.traits.into_values().collect(),
            functions: table.functions.into_values().collect(),
            constants: table.constants.into_values().collect(),
        }
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builtin classes, functions and constants of a stock PHP install, plus the
    /// runtime classes cleaned code refers to.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SNAPSHOT)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Generic(format!(
                "Failed to read symbol snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_class(&mut self, info: ClassInfo) {
        self.classes.insert(class_key(&info.name), info);
    }

    pub fn add_interface(&mut self, info: ClassInfo) {
        self.interfaces.insert(class_key(&info.name), info);
    }

    pub fn add_trait(&mut self, info: ClassInfo) {
        self.traits.insert(class_key(&info.name), info);
    }

    pub fn add_function(&mut self, info: FunctionInfo) {
        self.functions.insert(class_key(&info.name), info);
    }

    pub fn add_constant(&mut self, name: impl Into<String>) {
        let name = name.into();
        let name = name.trim_start_matches('\\').to_string();
        self.constants.insert(constant_key(&name), name);
    }

    /// Later declarations win.
    pub fn merge(&mut self, other: SymbolTable) {
        self.classes.extend(other.classes);
        self.interfaces.extend(other.interfaces);
        self.traits.extend(other.traits);
        self.functions.extend(other.functions);
        self.constants.extend(other.constants);
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.interfaces.is_empty()
            && self.traits.is_empty()
            && self.functions.is_empty()
            && self.constants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
            + self.interfaces.len()
            + self.traits.len()
            + self.functions.len()
            + self.constants.len()
    }
}

impl SymbolOracle for SymbolTable {
    fn class_exists(&self, name: &str) -> bool {
        self.classes.contains_key(&class_key(name))
    }

    fn interface_exists(&self, name: &str) -> bool {
        self.interfaces.contains_key(&class_key(name))
    }

    fn trait_exists(&self, name: &str) -> bool {
        self.traits.contains_key(&class_key(name))
    }

    fn function_exists(&self, name: &str) -> bool {
        self.functions.contains_key(&class_key(name))
    }

    fn constant_defined(&self, name: &str) -> bool {
        self.constants.contains_key(&constant_key(name))
    }

    fn class_info(&self, name: &str) -> Option<&ClassInfo> {
        let key = class_key(name);
        self.classes
            .get(&key)
            .or_else(|| self.interfaces.get(&key))
            .or_else(|| self.traits.get(&key))
    }

    fn function_info(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.get(&class_key(name))
    }

    fn declared_class_likes(&self) -> Vec<String> {
        self.classes
            .values()
            .chain(self.interfaces.values())
            .chain(self.traits.values())
            .map(|info| info.name.clone())
            .collect()
    }
}

/// Several oracles queried in order; the first one that knows a symbol answers.
pub struct LayeredOracle<'a> {
    layers: Vec<&'a dyn SymbolOracle>,
}

impl<'a> LayeredOracle<'a> {
    pub fn new(layers: Vec<&'a dyn SymbolOracle>) -> Self {
        Self { layers }
    }
}

impl SymbolOracle for LayeredOracle<'_> {
    fn class_exists(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.class_exists(name))
    }

    fn interface_exists(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.interface_exists(name))
    }

    fn trait_exists(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.trait_exists(name))
    }

    fn function_exists(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.function_exists(name))
    }

    fn constant_defined(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.constant_defined(name))
    }

    fn class_info(&self, name: &str) -> Option<&ClassInfo> {
        self.layers.iter().find_map(|layer| layer.class_info(name))
    }

    fn function_info(&self, name: &str) -> Option<&FunctionInfo> {
        self.layers.iter().find_map(|layer| layer.function_info(name))
    }

    fn is_final_class(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.is_final_class(name))
    }

    fn function_by_ref_params(&self, name: &str) -> Option<Vec<usize>> {
        self.layers
            .iter()
            .find_map(|layer| layer.function_by_ref_params(name))
    }

    fn declared_class_likes(&self) -> Vec<String> {
        self.layers
            .iter()
            .flat_map(|layer| layer.declared_class_likes())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_snapshot_loads() {
        let table = SymbolTable::builtin().unwrap();
        assert!(table.class_exists("\\Exception"));
        assert!(table.class_exists("stdclass"));
        assert!(table.interface_exists("Countable"));
        assert!(table.function_exists("STRLEN"));
        assert!(table.constant_defined("PHP_EOL"));
        assert!(!table.constant_defined("php_eol"));
        assert!(table.is_final_class("Closure"));
        assert_eq!(table.function_by_ref_params("sort"), Some(vec![0]));
    }

    #[test]
    fn constants_walk_the_hierarchy() {
        let mut table = SymbolTable::new();
        table.add_interface(ClassInfo {
            name: "App\\HasColor".into(),
            constants: Some(vec!["RED".into()]),
            ..ClassInfo::default()
        });
        table.add_class(ClassInfo {
            name: "App\\Paint".into(),
            interfaces: vec!["App\\HasColor".into()],
            constants: Some(vec![]),
            methods: Some(vec!["mix".into()]),
            ..ClassInfo::default()
        });
        assert_eq!(table.class_constant_exists("app\\paint", "RED"), Some(true));
        assert_eq!(table.class_constant_exists("App\\Paint", "BLUE"), Some(false));
        assert_eq!(table.method_exists("App\\Paint", "MIX"), Some(true));
        // The interface does not list its methods.
        assert_eq!(table.method_exists("App\\Paint", "dry"), None);
        assert_eq!(table.class_constant_exists("App\\Missing", "RED"), None);
    }

    #[test]
    fn layers_answer_in_order() {
        let mut base = SymbolTable::new();
        base.add_function(FunctionInfo::named("foo"));
        let mut session = SymbolTable::new();
        session.add_class(ClassInfo {
            name: "Bar".into(),
            is_final: true,
            ..ClassInfo::default()
        });
        let layered = LayeredOracle::new(vec![&session, &base]);
        assert!(layered.function_exists("FOO"));
        assert!(layered.is_final_class("bar"));
        assert_eq!(layered.declared_class_likes(), vec!["Bar".to_string()]);
    }

    #[test]
    fn snapshot_json_uses_plain_lists() {
        let mut table = SymbolTable::new();
        table.add_constant("\\App\\VERSION");
        let json = table.to_json().unwrap();
        let reloaded = SymbolTable::from_json(&json).unwrap();
        assert!(reloaded.constant_defined("app\\VERSION"));
        assert!(json.contains("\"App\\\\VERSION\""));
    }
}
