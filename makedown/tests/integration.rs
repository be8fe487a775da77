use makedown::{Makefile, generate_from_markdown};

const FOOTER: &str = "\n# This makefile is generated by makedown from \"makedown.md\"\n";

fn generate(source: &str) -> Makefile {
    generate_from_markdown("makedown.md", source.as_bytes()).expect("generation failed")
}

/// Generated text without the trailing comment.
fn body(source: &str) -> String {
    let made = generate(source);
    made.text
        .strip_suffix(FOOTER)
        .expect("missing footer")
        .to_string()
}

#[test]
fn prose_only_document_yields_footer() {
    let made = generate("# Title\n\nSome text.\n\n```\nls\n```\n\n> : not a rule\n");
    assert_eq!(made.text, FOOTER);
    assert!(made.targets.is_empty());
}

#[test]
fn empty_document() {
    let made = generate("");
    assert_eq!(made.text, FOOTER);
    assert!(made.targets.is_empty());
}

#[test]
fn single_recipe() {
    let made = generate("# Build:\n\n```\necho hi\necho bye\n```\n");
    assert!(made.text.contains("Build:\n\techo hi\n\techo bye\n"));
    assert_eq!(made.targets, vec!["Build:"]);
}

#[test]
fn second_code_block_continues_recipe() {
    let out = body("# Build:\n\n```\necho one\n```\n\nthen\n\n```\necho two\n```\n");
    assert_eq!(out, "Build:\n\techo one\n\t\n\techo two\n\t\n");
    assert_eq!(out.matches("Build:").count(), 1);

    let made = generate("# Build:\n\n```\na\n```\n\n```\nb\n```\n");
    assert_eq!(made.targets, vec!["Build:"]);
}

#[test]
fn prerequisite_line() {
    let made = generate("# Build:\n\n> : a.c b.c\n");
    assert!(made.text.contains("Build: a.c b.c\n"));
    assert!(!made.text.contains("Build:: a.c"));
}

#[test]
fn prerequisites_and_recipe() {
    let out = body("# app:\n\n> : main.o util.o\n\n```\ncc -o app main.o util.o\n```\n");
    assert_eq!(out, "app: main.o util.o\napp:\n\tcc -o app main.o util.o\n\t\n");
}

#[test]
fn variables_section_is_verbatim() {
    let made = generate("# variables:\n\n```\nCC=gcc\n```\n");
    assert!(made.text.contains("CC=gcc\n"));
    assert!(!made.text.contains("\tCC=gcc"));
    assert!(!made.targets.iter().any(|t| t == "variables:"));
    assert!(made.targets.is_empty());
}

#[test]
fn makedown_section_is_verbatim() {
    let out = body("# makedown:\n\n```\n.PHONY: all clean\n```\n");
    assert_eq!(out, ".PHONY: all clean\n\n");
}

#[test]
fn reserved_names_are_exact() {
    let made = generate("# Variables:\n\n```\nCC=gcc\n```\n");
    assert_eq!(made.targets, vec!["Variables:"]);
    assert!(made.text.contains("Variables:\n\tCC=gcc\n"));
}

#[test]
fn targets_follow_document_order() {
    let source = "\
# Makefile

Intro text.

## clean:

```
rm -rf build
```

## build:

> : deps

```
make -C src
```

## deps:

```
./fetch.sh
```
";
    let made = generate(source);
    assert_eq!(made.targets, vec!["clean:", "build:", "deps:"]);
}

#[test]
fn repeated_heading_repeats_target() {
    let made = generate("# a:\n\n```\nx\n```\n\n# a:\n\n```\ny\n```\n");
    assert_eq!(made.targets, vec!["a:", "a:"]);
}

#[test]
fn heading_without_colon_ends_the_target() {
    let out = body("# a:\n\n```\nx\n```\n\n# Notes\n\n```\ny\n```\n");
    assert_eq!(out, "a:\n\tx\n\t\n");
}

#[test]
fn nested_containers_resolve_within_their_siblings() {
    // the code block sits inside a list item; its siblings are the item's
    // children, so the top-level heading does not govern it
    let made = generate("# a:\n\n- item\n\n  ```\n  x\n  ```\n");
    assert!(made.targets.is_empty());
}

#[test]
fn conversion_is_deterministic() {
    let source = "# v:\n\n> : w\n\n```\nrun\n```\n\n# variables:\n\n```\nX=1\n```\n";
    let first = generate_from_markdown("f.md", source.as_bytes()).unwrap();
    let second = generate_from_markdown("f.md", source.as_bytes()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn footer_uses_source_name() {
    let made = generate_from_markdown("docs/BUILD.md", b"").unwrap();
    assert_eq!(
        made.text,
        "\n# This makefile is generated by makedown from \"docs/BUILD.md\"\n"
    );
}

#[test]
fn footer_escapes_unprintable_names() {
    let made = generate_from_markdown("a\u{7}b.md", b"").unwrap();
    assert!(made.text.ends_with("from \"a\\ab.md\"\n"));

    let made = generate_from_markdown("del\u{7f}.md", b"").unwrap();
    assert!(made.text.ends_with("from \"del\\x7f.md\"\n"));

    let made = generate_from_markdown("zw\u{200b}.md", b"").unwrap();
    assert!(made.text.ends_with("from \"zw\\u200b.md\"\n"));
}
