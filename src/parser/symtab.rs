//! Symbol table
//!
//! One [`SymbolEntry`] per distinct identifier, created from the scanner's
//! identifier table before parsing starts. Entries begin as
//! [`Role::Unresolved`] and are resolved in place as declarations are parsed.
//! Token indices are 1-based, matching [`Token::index`](crate::lexer::Token).

use indexmap::IndexSet;
use std::fmt;

/// Declared type of a function's return value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec {
    Int,
    Void,
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Int => f.write_str("int"),
            TypeSpec::Void => f.write_str("void"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeClass {
    Global,
    Local,
}

/// What a name has been declared as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Unresolved,
    Function { return_type: TypeSpec },
    Variable { scope: ScopeClass },
    Parameter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Unresolved => f.write_str("-"),
            Role::Function { return_type } => write!(f, "function -> {}", return_type),
            Role::Variable {
                scope: ScopeClass::Global,
            } => f.write_str("global variable"),
            Role::Variable {
                scope: ScopeClass::Local,
            } => f.write_str("local variable"),
            Role::Parameter => f.write_str("parameter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub role: Role,
}

impl SymbolEntry {
    pub fn is_function(&self) -> bool {
        matches!(self.role, Role::Function { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    /// One unresolved entry per identifier, in first-seen order.
    pub fn from_identifiers(identifiers: &IndexSet<String>) -> Self {
        SymbolTable {
            entries: identifiers
                .iter()
                .map(|name| SymbolEntry {
                    name: name.clone(),
                    role: Role::Unresolved,
                })
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&SymbolEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SymbolEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get_mut(i))
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The function entry that comes last in table order.
    pub fn last_function(&self) -> Option<&SymbolEntry> {
        self.entries.iter().rev().find(|e| e.is_function())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> SymbolTable {
        let identifiers: IndexSet<String> = names.iter().map(|s| s.to_string()).collect();
        SymbolTable::from_identifiers(&identifiers)
    }

    #[test]
    fn test_one_based_lookup() {
        let mut symbols = table(&["x", "main"]);
        assert!(symbols.get(0).is_none());
        assert_eq!(symbols.get(1).unwrap().name, "x");
        assert_eq!(symbols.get(2).unwrap().role, Role::Unresolved);
        assert!(symbols.get(3).is_none());

        symbols.get_mut(2).unwrap().role = Role::Function {
            return_type: TypeSpec::Void,
        };
        assert_eq!(symbols.last_function().unwrap().name, "main");
    }

    #[test]
    fn test_last_function_uses_table_order() {
        let mut symbols = table(&["main", "f", "x"]);
        assert!(symbols.last_function().is_none());
        for i in [1, 2] {
            symbols.get_mut(i).unwrap().role = Role::Function {
                return_type: TypeSpec::Int,
            };
        }
        assert_eq!(symbols.last_function().unwrap().name, "f");
    }

    #[test]
    fn test_role_display() {
        let role = Role::Function {
            return_type: TypeSpec::Void,
        };
        assert_eq!(role.to_string(), "function -> void");
        assert_eq!(Role::Parameter.to_string(), "parameter");
    }
}
