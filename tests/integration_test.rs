// End-to-end tests: grammar, scanner and parser together

use cminus::config::AnalyzerConfig;
use cminus::errors::{
    CompileError, GrammarLoadError, InputError, LexicalErrorKind, ParseError, SemanticError,
    SyntaxError,
};
use cminus::lexer::{scan, TokenKind};
use cminus::parser::{Role, TypeSpec};
use cminus::pipeline::{Frontend, Outcome};
use cminus::snapshot::{Action, Trace};

fn frontend() -> Frontend {
    Frontend::with_default_grammar(&AnalyzerConfig::default()).expect("bundled grammar builds")
}

fn check(source: &str) -> Result<Outcome, CompileError> {
    frontend().check(source)
}

fn semantic(source: &str) -> SemanticError {
    match check(source) {
        Err(CompileError::Parse(ParseError::Semantic(e))) => e,
        other => panic!("expected a semantic error, got {:?}", other.map(|_| ())),
    }
}

fn syntax(source: &str) -> SyntaxError {
    match check(source) {
        Err(CompileError::Parse(ParseError::Syntax(e))) => e,
        other => panic!("expected a syntax error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_global_variable_and_main() {
    let outcome = check("int x; void main(void){ output x; }").expect("program is valid");
    let last = outcome.symbols.last_function().unwrap();
    assert_eq!(last.name, "main");
    assert_eq!(
        last.role,
        Role::Function {
            return_type: TypeSpec::Void
        }
    );
}

#[test]
fn test_call_of_earlier_function() {
    let outcome = check("void f(void){} void main(void){ f(); }").expect("program is valid");
    assert!(outcome.symbols.entries()[0].is_function());
}

#[test]
fn test_undeclared_assignment_target() {
    let err = semantic("void main(void){ y = 1; }");
    assert!(matches!(err, SemanticError::Undeclared { ref name, line: 1 } if name == "y"));
}

#[test]
fn test_empty_program() {
    let err = check("").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Parse(ParseError::Input(InputError::EmptyProgram))
    ));
    assert_eq!(err.to_string(), "INPUT: code file cannot be empty");

    let err = check("  /* only a comment */  \n").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Parse(ParseError::Input(InputError::EmptyProgram))
    ));
}

#[test]
fn test_grammar_without_separator_fails_first() {
    let grammar = "program->declaration_list\ndeclaration_list declaration | ε\n";
    let err = Frontend::new(grammar, &AnalyzerConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Grammar(GrammarLoadError::MissingSeparator { line: 2, .. })
    ));
}

#[test]
fn test_full_program() {
    let source = r#"
        /* sums an array */
        int data[10];

        int sum(int a[], int n) {
            int i;
            int total;
            i = 0;
            total = 0;
            while (i < n) {
                total = total + a[i];
                i = i + 1;
            }
            return total;
        }

        void main(void) {
            int k;
            k = 0;
            while (k < 10) {
                input data[k];
                k = k + 1;
            }
            if (sum(data, 10) > 100)
                if (k == 10) output 1; else output 2;
            output sum(data, 10) / (k - 1);
        }
    "#;
    let outcome = check(source).expect("program is valid");
    let role = |name: &str| {
        outcome
            .symbols
            .entries()
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.role)
            .unwrap()
    };
    assert_eq!(
        role("sum"),
        Role::Function {
            return_type: TypeSpec::Int
        }
    );
    assert_eq!(role("a"), Role::Parameter);
    assert_eq!(role("n"), Role::Parameter);
    assert!(matches!(role("data"), Role::Variable { .. }));
    assert!(matches!(role("total"), Role::Variable { .. }));
}

#[test]
fn test_case_insensitive_source() {
    assert!(check("VOID Main(Void) { }").is_ok());
}

#[test]
fn test_main_rules() {
    assert!(matches!(
        semantic("void main(void) { } void main(void) { }"),
        SemanticError::MainRedeclared { .. }
    ));
    assert!(matches!(
        semantic("int main(void) { return 0; }"),
        SemanticError::MainReturnType {
            found: TypeSpec::Int,
            ..
        }
    ));
    assert!(matches!(
        semantic("void main(int argc) { }"),
        SemanticError::MainSignature { .. }
    ));
    assert!(matches!(
        semantic("int main; void f(void) { }"),
        SemanticError::ReservedName { .. }
    ));
    assert!(matches!(
        semantic("void f(void) { int main; } void main(void) { }"),
        SemanticError::ReservedName { .. }
    ));
    assert!(matches!(
        semantic("void main(void) { main(); }"),
        SemanticError::EntryPointCalled { .. }
    ));
}

#[test]
fn test_entry_point_must_come_last() {
    assert!(matches!(
        semantic("void main(void) { } int f(void) { return 1; }"),
        SemanticError::EntryPointNotLast { ref found } if found == "f"
    ));
    assert!(matches!(
        semantic("int x; int y[2];"),
        SemanticError::MissingEntryPoint
    ));
}

#[test]
fn test_use_errors() {
    assert!(matches!(
        semantic("void f(void) { } void main(void) { int x; x = f(); }"),
        SemanticError::VoidValue { ref name, .. } if name == "f"
    ));
    assert!(matches!(
        semantic("int g; void main(void) { g(); }"),
        SemanticError::NotAFunction { .. }
    ));
    assert!(matches!(
        semantic("int g; void main(void) { output g(1); }"),
        SemanticError::NotAFunction { .. }
    ));
    assert!(matches!(
        semantic("int f(void) { return 1; } void main(void) { f = 2; }"),
        SemanticError::AssignToFunction { .. }
    ));
    assert!(matches!(
        semantic("void f(void) { int t; } void main(void) { t = 1; }"),
        SemanticError::OutOfScope { ref name, .. } if name == "t"
    ));
    assert!(matches!(
        semantic("void f(void) { int t; } void main(void) { input t; }"),
        SemanticError::OutOfScope { .. }
    ));
    assert!(matches!(
        semantic("void f(void) { int t; } void main(void) { output t; }"),
        SemanticError::OutOfScope { .. }
    ));
    assert!(matches!(
        semantic("void main(void) { output w + 1; }"),
        SemanticError::Undeclared { .. }
    ));
}

#[test]
fn test_nested_block_scopes() {
    let ok = "void main(void) { int a; { int b; b = a; { a = b; } } a = 1; }";
    assert!(check(ok).is_ok());

    let err = semantic("void main(void) { int a; { int b; } a = b; }");
    assert!(matches!(err, SemanticError::OutOfScope { ref name, .. } if name == "b"));
}

#[test]
fn test_error_lines() {
    let err = semantic("/* first */\nvoid main(void) {\n\n  y = 1;\n}");
    assert_eq!(err.line(), Some(4));

    let err = syntax("void main(void) {\n  int x;\n  x = 1\n}");
    assert!(matches!(
        err,
        SyntaxError::TableReject { ref nonterminal, line: 4, .. } if nonterminal == "term_tail"
    ));
    assert!(err.to_string().starts_with("SYNTAX ERROR"));
}

#[test]
fn test_syntax_errors() {
    assert!(matches!(
        syntax("void main(void) { if x) ; }"),
        SyntaxError::StackMismatch { .. }
    ));
    assert!(matches!(
        syntax("void main(void) { while"),
        SyntaxError::PrematureEnd { line: 1, .. }
    ));
    let err = check("void main(void) {\n  while").unwrap_err();
    assert!(err.to_string().ends_with("in line 2"));
    match err {
        CompileError::Parse(e) => assert_eq!(e.line(), Some(2)),
        other => panic!("expected a parse error, got {:?}", other),
    }
    assert!(matches!(
        syntax("void main(void) { } }"),
        SyntaxError::TableReject { ref nonterminal, .. } if nonterminal == "declaration_list"
    ));
    assert!(matches!(
        syntax("void f() { } void main(void) { }"),
        SyntaxError::TableReject { ref message, .. } if message.contains("(void)")
    ));
}

#[test]
fn test_trailing_input() {
    let frontend = Frontend::new("program->int ID ;", &AnalyzerConfig::default()).unwrap();
    let err = frontend.check("int x; int y;").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Parse(ParseError::Syntax(SyntaxError::TrailingInput { line: 1, .. }))
    ));
}

#[test]
fn test_lexical_errors() {
    let err = check("void main(void) {\n int x1; }").unwrap_err();
    match err {
        CompileError::Lexical(e) => {
            assert_eq!(e.kind, LexicalErrorKind::DigitsInIdentifier);
            assert_eq!(e.line, 2);
        }
        other => panic!("expected a lexical error, got {:?}", other),
    }
}

#[test]
fn test_literal_tables() {
    let scanned = scan("x = 42; y = x + 42;").unwrap();
    let num = scanned
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Num)
        .unwrap();
    assert_eq!(scanned.number(num.index.unwrap()), Some(42));

    let ids: Vec<usize> = scanned
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Id)
        .map(|t| t.index.unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 1]);
}

#[test]
fn test_traced_failure_keeps_history() {
    let mut trace = Trace::new(cminus::config::TRACE_MEMORY_LIMIT);
    let result = frontend().check_traced("void main(void) { y = 1; }", &mut trace);
    assert!(result.is_err());
    let last = trace.last().unwrap();
    assert!(matches!(last.action, Action::Reject { ref message } if message.contains("'y'")));
    assert!(trace.len() > 5);
}

#[test]
fn test_compat_mode_accepts_same_programs() {
    let compat = Frontend::with_default_grammar(&AnalyzerConfig::compat()).unwrap();
    let source = "int x; void main(void) { if (x) output 1; else output 2; }";
    assert!(compat.check(source).is_ok());
    assert!(compat.analysis().table.conflicts().is_empty());
}
