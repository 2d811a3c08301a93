//! Loading the emitted rule array back gives the sanitized tree.

use chrono::Utc;
use ruletable::{
    compile, sanitize, ExportDescriptor, GrammarDialect, OutputDialect, RuleKind, RuleNode,
};

/// The array literal bound by `marker`, up to its closing bracket.
fn bound_array<'m>(module: &'m str, marker: &str) -> &'m str {
    let start = module.find(marker).expect("declaration present") + marker.len();
    let end = module.rfind("];").expect("array terminator present") + 1;
    &module[start..end]
}

fn load(array: &str) -> Vec<RuleNode> {
    facet_json::from_str(array).unwrap_or_else(|e| panic!("emitted array is not JSON:\n{e}"))
}

fn leaf(kind: RuleKind, name: &str) -> RuleNode {
    RuleNode::new(kind, name, Vec::new())
}

#[test]
fn custom_two_terminal_rule_round_trips_through_untyped_output() {
    let engine = GrammarDialect::Custom.engine();
    let export = ExportDescriptor::new("G", OutputDialect::Untyped).unwrap();
    let module = compile(engine, r#"rule ::= "a" , "b" ;"#, &export, None, Utc::now()).unwrap();

    let loaded = load(bound_array(&module, "grammar.G = "));
    assert_eq!(
        loaded,
        vec![RuleNode::new(
            RuleKind::Rule,
            "rule",
            vec![leaf(RuleKind::Terminal, "a"), leaf(RuleKind::Terminal, "b")],
        )]
    );
}

#[test]
fn typed_output_round_trips_to_sanitized_tree() {
    let grammar = r#"
        (* arithmetic *)
        expr   = term , { ( "+" | "-" ) , term } ;
        term   = factor , { ( "*" | "/" ) , factor } ;
        factor = number | "(" , expr , ")" | "-" , factor ;
        number = digit+ , [ "." , digit+ ] ;
        digit  = "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" ;
        quoted = '"' , { 'x' } , '"' , "\" ;
    "#;
    let engine = GrammarDialect::Custom.engine();
    let export = ExportDescriptor::new("rules", OutputDialect::Typed).unwrap();
    let module = compile(engine, grammar, &export, None, Utc::now()).unwrap();

    let expected = sanitize(engine.parse(grammar).unwrap());
    let loaded = load(bound_array(&module, "export const rules: RuleTable = "));
    assert_eq!(loaded, expected);

    let names: Vec<_> = loaded.iter().map(|rule| rule.name.as_str()).collect();
    assert_eq!(names, ["expr", "term", "factor", "number", "digit", "quoted"]);
}

#[test]
fn every_dialect_round_trips() {
    let cases = [
        (GrammarDialect::Bnf, "<list> ::= <item> | <item> \",\" <list>\n<item> ::= 'x'"),
        (
            GrammarDialect::W3cEbnf,
            "[1] list ::= item (',' item)*\n[2] item ::= [a-z]+ - 'no'",
        ),
        (GrammarDialect::Custom, "list = item , { ',' , item } ; item = 'x' ;"),
    ];
    for (dialect, grammar) in cases {
        let engine = dialect.engine();
        let export = ExportDescriptor::new("rules", OutputDialect::Untyped).unwrap();
        let module = compile(engine, grammar, &export, None, Utc::now()).unwrap();
        let loaded = load(bound_array(&module, "grammar.rules = "));
        assert_eq!(loaded, sanitize(engine.parse(grammar).unwrap()), "{dialect:?}");
    }
}
