// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use macro_md_engine::MacroRegistry;

#[allow(dead_code)]
pub fn registry() -> MacroRegistry {
    let mut registry = MacroRegistry::new();
    registry
        .register("upper", |c, _| Ok(c.to_uppercase()))
        .expect("fresh registry");
    registry
        .register("wrap", |c, _| Ok(format!("<div>{c}</div>")))
        .expect("fresh registry");
    registry
        .register("tag", |c, args| Ok(format!("<{0}>{c}</{0}>", args[0])))
        .expect("fresh registry");
    registry
}

#[allow(dead_code)]
pub fn generate_plain_markdown(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\n\n- Bullet point\n  - Nested item\n- Another item\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_macro_markdown(size: usize) -> String {
    let base = "# Title\n\nParagraph with ^upper{inline} and ^tag(em){tagged} content.\n\n^wrap{\n## Boxed\n\n- item ^upper{one}\n- item two\n}\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_markdown(depth: usize) -> String {
    format!("{}core{}", "^wrap{".repeat(depth), "}".repeat(depth))
}
