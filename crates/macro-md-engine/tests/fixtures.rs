use macro_md_engine::{MacroRegistry, ParseOptions, parse_file};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn fixture_basic() {
    assert_fixture("basic");
}

#[test]
fn fixture_list_items() {
    assert_fixture("list_items");
}

#[test]
fn fixture_indented_block() {
    assert_fixture("indented_block");
}

fn registry() -> MacroRegistry {
    let mut registry = MacroRegistry::new();
    registry
        .register("upper", |c, _| Ok(c.to_uppercase()))
        .unwrap();
    registry
        .register("wrap", |c, _| Ok(format!("[{c}]")))
        .unwrap();
    registry
        .register("tag", |c, args| Ok(format!("<{0}>{c}</{0}>", args[0])))
        .unwrap();
    registry
}

fn assert_fixture(name: &str) {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let expected = std::fs::read_to_string(dir.join(format!("{name}.html"))).unwrap();

    let html = parse_file(
        &dir.join(format!("{name}.md")),
        &registry(),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(html, expected);
}
