#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn defines() -> Vec<(String, String)> {
    vec![
        (PROCESSING_DEFINE.to_string(), "1".to_string()),
        ("DISABLED_FLAG".to_string(), "0".to_string()),
    ]
}

#[test_case("KMETA_PROCESSING", false, false => Some(true); "value test on enabled flag")]
#[test_case("KMETA_PROCESSING", true, false => Some(false); "negated value test")]
#[test_case("KMETA_PROCESSING", false, true => Some(true); "ifdef on enabled flag")]
#[test_case("DISABLED_FLAG", false, false => Some(false); "value test on zero flag")]
#[test_case("DISABLED_FLAG", false, true => Some(true); "ifdef on zero flag is still defined")]
#[test_case("defined(KMETA_PROCESSING)", false, false => Some(true); "explicit defined")]
#[test_case("!defined(KMETA_PROCESSING)", false, false => Some(false); "negated defined")]
#[test_case("KMETA_PROCESSING // when instrumented", false, false => Some(true); "trailing comment stripped")]
#[test_case("UNKNOWN_FLAG", false, false => None; "unknown name is untracked")]
#[test_case("KMETA_PROCESSING && OTHER", false, false => None; "complex expression is untracked")]
#[test_case("1", false, false => None; "bare integer is untracked")]
fn eval_condition___classifies(condition: &str, negate: bool, defined_test: bool) -> Option<bool> {
    eval_condition(condition, negate, defined_test, &defines())
}

#[test_case("#ifdef NAME" => "if defined"; "ifdef")]
#[test_case("#ifndef NAME" => "if not defined"; "ifndef")]
#[test_case("#if NAME" => "if"; "plain if")]
#[test_case("  #  elif NAME" => "elif"; "indented elif")]
#[test_case("#else" => "else"; "else directive")]
#[test_case("#endif // comment" => "endif"; "endif with comment")]
#[test_case("#define NAME 1" => "none"; "define is not a conditional")]
#[test_case("#iffy NAME" => "none"; "keyword must end at a boundary")]
#[test_case("int x;" => "none"; "ordinary line")]
fn parse_directive___classifies(line: &str) -> &'static str {
    match parse_directive(line) {
        Some(Directive::If {
            negate: false,
            defined_test: true,
            ..
        }) => "if defined",
        Some(Directive::If {
            negate: true,
            defined_test: true,
            ..
        }) => "if not defined",
        Some(Directive::If { .. }) => "if",
        Some(Directive::Elif(_)) => "elif",
        Some(Directive::Else) => "else",
        Some(Directive::Endif) => "endif",
        None => "none",
    }
}
