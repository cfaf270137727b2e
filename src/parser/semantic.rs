//! Semantic actions run when the driver matches an identifier
//!
//! What an identifier means depends on where it appears. The driver tracks
//! the left-hand side of the last expanded production as a
//! [`SemanticContext`]; every identifier in the grammar is the first symbol of
//! one of the context nonterminals below, so the context seen at match time
//! is always the one that introduced the identifier.

use super::scope::{ScopeLevel, ScopeSet};
use super::symtab::{Role, ScopeClass, SymbolTable, TypeSpec};
use crate::errors::SemanticError;
use crate::lexer::{Token, TokenKind};
use std::fmt;

/// Name of the program's entry point
pub const ENTRY_POINT: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SemanticContext {
    /// Nothing expanded yet, or a nonterminal with no identifier action
    #[default]
    Neutral,
    Global,
    Local,
    Parameter,
    Statement,
    InputTarget,
    Factor,
}

impl SemanticContext {
    pub fn from_nonterminal(name: &str) -> Self {
        match name {
            "global_declaration" => SemanticContext::Global,
            "local_variable" => SemanticContext::Local,
            "param_declaration" => SemanticContext::Parameter,
            "call_or_assignment" => SemanticContext::Statement,
            "input_target" => SemanticContext::InputTarget,
            "factor" => SemanticContext::Factor,
            _ => SemanticContext::Neutral,
        }
    }
}

impl fmt::Display for SemanticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SemanticContext::Neutral => "-",
            SemanticContext::Global => "global declaration",
            SemanticContext::Local => "local declaration",
            SemanticContext::Parameter => "parameter",
            SemanticContext::Statement => "statement",
            SemanticContext::InputTarget => "input target",
            SemanticContext::Factor => "expression factor",
        };
        f.write_str(text)
    }
}

/// Mutable state the actions work on
pub struct Resolver<'a> {
    pub symbols: &'a mut SymbolTable,
    pub scopes: &'a mut ScopeSet,
    /// Current block nesting depth
    pub depth: u32,
}

impl Resolver<'_> {
    /// Resolve the identifier at `tokens[at]` under `context`.
    pub fn identifier(
        &mut self,
        context: SemanticContext,
        tokens: &[Token],
        at: usize,
    ) -> Result<(), SemanticError> {
        let token = tokens[at];
        let Some(index) = token.index else {
            return Ok(());
        };
        let Some(entry) = self.symbols.get(index) else {
            return Ok(());
        };
        let name = entry.name.clone();
        let role = entry.role;
        let line = token.line;
        let kind_at = |offset: usize| tokens.get(at + offset).map(|t| t.kind);
        let next = kind_at(1);

        match context {
            SemanticContext::Neutral => {}

            SemanticContext::Global if next == Some(TokenKind::LParen) => {
                let return_type = match at.checked_sub(1).map(|i| tokens[i].kind) {
                    Some(TokenKind::Void) => TypeSpec::Void,
                    _ => TypeSpec::Int,
                };
                if name == ENTRY_POINT {
                    if matches!(role, Role::Function { .. }) {
                        return Err(SemanticError::MainRedeclared { line });
                    }
                    if return_type != TypeSpec::Void {
                        return Err(SemanticError::MainReturnType {
                            found: return_type,
                            line,
                        });
                    }
                    let signature = [kind_at(2), kind_at(3)];
                    if signature != [Some(TokenKind::Void), Some(TokenKind::RParen)] {
                        return Err(SemanticError::MainSignature { line });
                    }
                }
                log::debug!("line {}: function {} -> {}", line, name, return_type);
                self.set_role(index, Role::Function { return_type });
            }

            SemanticContext::Global => {
                reserved(&name, line)?;
                log::debug!("line {}: global variable {}", line, name);
                self.set_role(
                    index,
                    Role::Variable {
                        scope: ScopeClass::Global,
                    },
                );
                self.scopes.declare(&name, ScopeLevel::Global);
            }

            SemanticContext::Local => {
                reserved(&name, line)?;
                log::debug!("line {}: local variable {} at depth {}", line, name, self.depth);
                self.set_role(
                    index,
                    Role::Variable {
                        scope: ScopeClass::Local,
                    },
                );
                self.scopes.declare(&name, ScopeLevel::Block(self.depth));
            }

            SemanticContext::Parameter => {
                if role == Role::Unresolved {
                    self.set_role(index, Role::Parameter);
                }
                // Parameters belong to the body block opened right after `)`.
                let level = ScopeLevel::Block(self.depth + 1);
                log::debug!("line {}: parameter {} at depth {}", line, name, level);
                self.scopes.declare(&name, level);
            }

            SemanticContext::Statement if next == Some(TokenKind::LParen) => {
                match role {
                    Role::Unresolved => return Err(SemanticError::Undeclared { name, line }),
                    Role::Function { .. } if name == ENTRY_POINT => {
                        return Err(SemanticError::EntryPointCalled { line })
                    }
                    Role::Function { .. } => {}
                    _ => return Err(SemanticError::NotAFunction { name, line }),
                }
            }

            SemanticContext::Statement | SemanticContext::InputTarget => {
                self.assignable(name, role, line)?;
            }

            SemanticContext::Factor => match role {
                Role::Unresolved => return Err(SemanticError::Undeclared { name, line }),
                Role::Function {
                    return_type: TypeSpec::Void,
                } => return Err(SemanticError::VoidValue { name, line }),
                Role::Function { .. } => {}
                _ if !self.scopes.is_visible(&name) => {
                    return Err(SemanticError::OutOfScope { name, line })
                }
                _ if next == Some(TokenKind::LParen) => {
                    return Err(SemanticError::NotAFunction { name, line })
                }
                _ => {}
            },
        }
        Ok(())
    }

    fn assignable(&self, name: String, role: Role, line: usize) -> Result<(), SemanticError> {
        match role {
            Role::Unresolved => Err(SemanticError::Undeclared { name, line }),
            Role::Function { .. } => Err(SemanticError::AssignToFunction { name, line }),
            _ if !self.scopes.is_visible(&name) => Err(SemanticError::OutOfScope { name, line }),
            _ => Ok(()),
        }
    }

    fn set_role(&mut self, index: usize, role: Role) {
        if let Some(entry) = self.symbols.get_mut(index) {
            entry.role = role;
        }
    }
}

fn reserved(name: &str, line: usize) -> Result<(), SemanticError> {
    if name == ENTRY_POINT {
        return Err(SemanticError::ReservedName {
            name: name.to_string(),
            line,
        });
    }
    Ok(())
}

/// The last function in the table must be `void main`.
pub fn check_entry_point(symbols: &SymbolTable) -> Result<(), SemanticError> {
    match symbols.last_function() {
        None => Err(SemanticError::MissingEntryPoint),
        Some(entry)
            if entry.name == ENTRY_POINT
                && entry.role
                    == (Role::Function {
                        return_type: TypeSpec::Void,
                    }) =>
        {
            Ok(())
        }
        Some(entry) => Err(SemanticError::EntryPointNotLast {
            found: entry.name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;

    fn resolve(
        source: &str,
        context: SemanticContext,
        at: usize,
        symbols: &mut SymbolTable,
        scopes: &mut ScopeSet,
    ) -> Result<(), SemanticError> {
        let scanned = scan(source).unwrap();
        let mut resolver = Resolver {
            symbols,
            scopes,
            depth: 1,
        };
        resolver.identifier(context, &scanned.tokens, at)
    }

    fn setup(source: &str) -> (SymbolTable, ScopeSet) {
        let scanned = scan(source).unwrap();
        (
            SymbolTable::from_identifiers(&scanned.identifiers),
            ScopeSet::new(),
        )
    }

    #[test]
    fn test_context_from_nonterminal() {
        assert_eq!(
            SemanticContext::from_nonterminal("factor"),
            SemanticContext::Factor
        );
        assert_eq!(
            SemanticContext::from_nonterminal("expression"),
            SemanticContext::Neutral
        );
    }

    #[test]
    fn test_function_declaration() {
        let source = "int f(void)";
        let (mut symbols, mut scopes) = setup(source);
        resolve(source, SemanticContext::Global, 1, &mut symbols, &mut scopes).unwrap();
        assert_eq!(
            symbols.get(1).unwrap().role,
            Role::Function {
                return_type: TypeSpec::Int
            }
        );
        assert!(scopes.is_empty());
    }

    #[test]
    fn test_main_rules() {
        let source = "int main(void)";
        let (mut symbols, mut scopes) = setup(source);
        let err = resolve(source, SemanticContext::Global, 1, &mut symbols, &mut scopes);
        assert!(matches!(
            err,
            Err(SemanticError::MainReturnType {
                found: TypeSpec::Int,
                line: 1
            })
        ));

        let source = "void main(int x)";
        let (mut symbols, mut scopes) = setup(source);
        let err = resolve(source, SemanticContext::Global, 1, &mut symbols, &mut scopes);
        assert!(matches!(err, Err(SemanticError::MainSignature { .. })));

        let source = "int main;";
        let (mut symbols, mut scopes) = setup(source);
        let err = resolve(source, SemanticContext::Global, 1, &mut symbols, &mut scopes);
        assert!(matches!(err, Err(SemanticError::ReservedName { .. })));
    }

    #[test]
    fn test_parameter_keeps_resolved_role() {
        let source = "x";
        let (mut symbols, mut scopes) = setup(source);
        symbols.get_mut(1).unwrap().role = Role::Variable {
            scope: ScopeClass::Global,
        };
        resolve(source, SemanticContext::Parameter, 0, &mut symbols, &mut scopes).unwrap();
        assert_eq!(
            symbols.get(1).unwrap().role,
            Role::Variable {
                scope: ScopeClass::Global
            }
        );
        assert_eq!(scopes.sorted(), vec![("x".to_string(), ScopeLevel::Block(2))]);
    }

    #[test]
    fn test_statement_checks() {
        let source = "y = 1;";
        let (mut symbols, mut scopes) = setup(source);
        let err = resolve(source, SemanticContext::Statement, 0, &mut symbols, &mut scopes);
        assert!(matches!(err, Err(SemanticError::Undeclared { ref name, .. }) if name == "y"));

        symbols.get_mut(1).unwrap().role = Role::Variable {
            scope: ScopeClass::Local,
        };
        let err = resolve(source, SemanticContext::Statement, 0, &mut symbols, &mut scopes);
        assert!(matches!(err, Err(SemanticError::OutOfScope { .. })));

        scopes.declare("y", ScopeLevel::Block(1));
        resolve(source, SemanticContext::Statement, 0, &mut symbols, &mut scopes).unwrap();

        let source = "y();";
        let err = resolve(source, SemanticContext::Statement, 0, &mut symbols, &mut scopes);
        assert!(matches!(err, Err(SemanticError::NotAFunction { .. })));
    }

    #[test]
    fn test_factor_reads_void_function() {
        let source = "f()";
        let (mut symbols, mut scopes) = setup(source);
        symbols.get_mut(1).unwrap().role = Role::Function {
            return_type: TypeSpec::Void,
        };
        let err = resolve(source, SemanticContext::Factor, 0, &mut symbols, &mut scopes);
        assert!(matches!(err, Err(SemanticError::VoidValue { .. })));
    }

    #[test]
    fn test_entry_point_check() {
        let (mut symbols, _) = setup("main f");
        assert_eq!(
            check_entry_point(&symbols),
            Err(SemanticError::MissingEntryPoint)
        );
        symbols.get_mut(1).unwrap().role = Role::Function {
            return_type: TypeSpec::Void,
        };
        assert_eq!(check_entry_point(&symbols), Ok(()));
        symbols.get_mut(2).unwrap().role = Role::Function {
            return_type: TypeSpec::Int,
        };
        assert!(matches!(
            check_entry_point(&symbols),
            Err(SemanticError::EntryPointNotLast { ref found }) if found == "f"
        ));
    }
}
