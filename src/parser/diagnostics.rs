//! Messages for parse-table rejections
//!
//! When the table has no production for `(nonterminal, token)`, the driver
//! asks [`diagnose`] for a message describing the likely mistake. Common
//! mistakes get a specific message; every other token falls back to a
//! message for the nonterminal, then to a generic one.

use crate::lexer::TokenKind;
use TokenKind::*;

const STATEMENT_START: &str =
    "expected a statement: assignment, call, block, 'if', 'while', 'return', 'input', 'output' or ';'";

pub fn diagnose(nonterminal: &str, found: TokenKind) -> String {
    if let Some(message) = specific(nonterminal, found) {
        return message.to_string();
    }
    match fallback(nonterminal) {
        Some(message) => message.to_string(),
        None => format!("unexpected {} here", found),
    }
}

fn specific(nonterminal: &str, found: TokenKind) -> Option<&'static str> {
    let message = match (nonterminal, found) {
        ("program" | "declaration_list", End) => "code file contains no declarations",
        ("program" | "declaration_list", Id) => {
            "declarations must start with a type, 'int' or 'void'"
        }
        ("program" | "declaration_list", Num) => "a number cannot start a declaration",
        ("program" | "declaration_list", LBrace) => "a block must be the body of a function",
        ("program" | "declaration_list", If | While | Return | Input | Output) => {
            "statements are only allowed inside a function body"
        }
        ("program" | "declaration_list", Semicolon) => "stray ';' between declarations",
        ("declaration", _) => "expected 'int' or 'void' to begin a declaration",

        ("global_declaration" | "local_variable" | "param_declaration", Num) => {
            "a name cannot start with a digit"
        }
        ("global_declaration" | "local_variable" | "param_declaration", Int | Void) => {
            "two types in a row; expected a name"
        }
        ("global_declaration" | "local_variable" | "param_declaration", kind)
            if kind.is_keyword() =>
        {
            "a keyword cannot be used as a name"
        }
        ("global_declaration_tail", Assign) => {
            "global variables cannot be initialised in their declaration"
        }
        ("global_declaration_tail", LBrace) => "missing parameter list before function body",
        ("global_declaration_tail", Id) => "missing ';' after global declaration",
        ("var_declaration_tail", Assign) => {
            "variables cannot be initialised in their declaration"
        }
        ("var_declaration_tail", Comma) => "declare one variable per declaration",
        ("var_declaration_tail", LParen) => "functions cannot be declared inside a block",
        ("var_declaration_tail", Id | Int | Void) => "missing ';' after variable declaration",
        ("var_declaration_tail", RBracket) => "array size is required in a declaration",

        ("params", RParen) => "empty parameter list; write '(void)'",
        ("params", Id) => "parameter is missing its type",
        ("void_params_tail", Comma) => "'void' must be the only parameter",
        ("param_list_tail", Id) => "missing ',' between parameters",
        ("param_list_tail", Semicolon) => "missing ')' after parameters",
        ("param_array", Num) => "array parameters are declared without a size",
        ("param", Id) => "parameter is missing its type",

        ("compound_stmt", Semicolon) => "function prototypes are not supported; expected '{'",
        ("compound_stmt", End) => "missing function body",
        ("local_declarations" | "statement_list", End) => "missing '}' before end of file",
        ("local_declarations" | "statement_list", Else) => "'else' without a matching 'if'",
        ("local_declarations" | "statement_list", Num) => "a statement cannot start with a number",
        ("local_declarations" | "statement_list", RParen | RBracket) => "unbalanced bracket",
        ("statement_list", Int | Void) => {
            "local declarations must come before the first statement"
        }
        ("statement", RBrace) => "missing statement before '}'",
        ("statement", Int | Void) => "declarations are only allowed at the start of a block",
        ("statement", Else) => "'else' without a matching 'if'",
        ("statement", End) => "missing statement before end of file",

        ("call_or_assignment_tail", Semicolon) => "an expression statement has no effect",
        ("call_or_assignment_tail", EqEq) => "'==' compares; use '=' to assign",
        ("call_or_assignment_tail", Id | Num) => "missing operator after name",
        ("call_or_assignment_tail", Plus | Minus | Star | Slash) => {
            "compound assignment is not supported; write 'x = x op y'"
        }

        ("else_part", _) => "unexpected token after 'if' statement",

        ("return_value", RBrace) => "missing ';' after return",
        ("input_target", Num) => "input needs a variable to store into",
        ("var_index", Assign) => "input cannot be combined with an assignment",

        ("expression" | "additive_expression" | "term" | "factor", Semicolon) => {
            "missing expression before ';'"
        }
        ("expression" | "additive_expression" | "term" | "factor", RParen) => {
            "missing expression before ')'"
        }
        ("expression" | "additive_expression" | "term" | "factor", RBracket) => {
            "missing array index"
        }
        ("expression" | "additive_expression" | "term" | "factor", Minus) => {
            "unary minus is not supported; write '0 - x'"
        }
        ("expression" | "additive_expression" | "term" | "factor", Plus) => {
            "unary plus is not supported"
        }
        ("expression" | "additive_expression" | "term" | "factor", Star | Slash) => {
            "operator is missing its left operand"
        }
        ("expression" | "additive_expression" | "term" | "factor", Assign) => {
            "assignment is not an expression"
        }
        ("expression" | "additive_expression" | "term" | "factor", Int | Void) => {
            "type names cannot appear in an expression"
        }
        ("expression" | "additive_expression" | "term" | "factor", End) => {
            "expression cut off by end of file"
        }

        ("relation_tail", Lt | Le | Gt | Ge | EqEq | NotEq) => "comparisons cannot be chained",
        ("relation_tail" | "additive_tail" | "term_tail", Id | Num) => {
            "missing operator between operands"
        }
        ("relation_tail" | "additive_tail" | "term_tail", LParen) => {
            "missing operator before '('"
        }
        ("relation_tail" | "additive_tail" | "term_tail", Assign) => {
            "assignment is a statement, not part of an expression"
        }
        ("relation_tail" | "additive_tail" | "term_tail", LBrace) => "missing ')' before '{'",
        ("factor_tail", Num | Id) => "missing operator after name",
        ("factor_tail", LBrace) => "missing ')' before '{'",

        ("args" | "arg_list_tail", Semicolon) => "missing ')' after arguments",
        ("args" | "arg_list_tail", Comma) => "missing argument before ','",
        ("arg_list_tail", Id | Num) => "missing ',' between arguments",
        _ => return None,
    };
    Some(message)
}

fn fallback(nonterminal: &str) -> Option<&'static str> {
    let message = match nonterminal {
        "program" | "declaration_list" => "expected a declaration",
        "declaration" => "expected a declaration type",
        "global_declaration" => "expected a name after the type",
        "global_declaration_tail" => "expected ';', '[' or a parameter list",
        "var_declaration_tail" => "expected ';' or an array size",
        "type_specifier" => "expected a type, 'int' or 'void'",
        "params" => "expected a parameter list or 'void'",
        "void_params_tail" => "expected ')' after 'void'",
        "param_list_tail" => "expected ',' or ')' in parameter list",
        "param" => "expected a parameter type",
        "param_declaration" => "expected a parameter name",
        "param_array" => "expected '[]', ',' or ')' after parameter name",
        "compound_stmt" => "expected '{'",
        "local_declarations" => "expected a local declaration or a statement",
        "local_declaration" => "expected a local declaration",
        "local_variable" => "expected a variable name",
        "statement_list" => "expected a statement or '}'",
        "statement" => STATEMENT_START,
        "call_or_assignment" => "expected a name",
        "call_or_assignment_tail" => "expected '=', '[' or '(' after name",
        "selection_stmt" => "expected 'if'",
        "iteration_stmt" => "expected 'while'",
        "return_stmt" => "expected 'return'",
        "return_value" => "expected ';' or a value after 'return'",
        "input_stmt" => "expected 'input'",
        "input_target" => "expected a variable after 'input'",
        "var_index" => "expected '[' or ';' after input variable",
        "output_stmt" => "expected 'output'",
        "expression" | "additive_expression" | "term" => "expected an expression",
        "relation_tail" => "expected a comparison or the end of the expression",
        "relop" => "expected a comparison operator",
        "additive_tail" => "expected '+', '-' or the end of the term",
        "addop" => "expected '+' or '-'",
        "term_tail" => "expected '*', '/' or the end of the factor",
        "mulop" => "expected '*' or '/'",
        "factor" => "expected a number, a name or '('",
        "factor_tail" => "expected an operator, '[' or '(' after name",
        "args" => "expected an argument or ')'",
        "arg_list_tail" => "expected ',' or ')' after argument",
        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use std::collections::HashSet;

    #[test]
    fn test_specific_message_wins() {
        assert_eq!(
            diagnose("factor", Minus),
            "unary minus is not supported; write '0 - x'"
        );
        assert_eq!(diagnose("statement", Else), "'else' without a matching 'if'");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(diagnose("relop", Id), "expected a comparison operator");
        assert_eq!(diagnose("unknown_rule", Id), "unexpected identifier here");
    }

    #[test]
    fn test_catalogue_covers_bundled_grammar() {
        let grammar = Grammar::cminus().unwrap();
        for nt in grammar.nonterminals() {
            assert!(fallback(nt).is_some(), "no fallback for {}", nt);
        }
    }

    #[test]
    fn test_catalogue_size() {
        let grammar = Grammar::cminus().unwrap();
        let mut messages = HashSet::new();
        for nt in grammar.nonterminals() {
            for kind in TokenKind::ALL {
                messages.insert(diagnose(nt, kind));
            }
        }
        assert!(messages.len() >= 60, "only {} messages", messages.len());
    }
}
