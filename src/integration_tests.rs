//! End-to-end tests for the full mangling pipeline
//!
//! These exercise [`crate::Mangler`] over CSS, HTML, and JavaScript fixtures
//! together: embed extraction, per-category engine runs with global
//! frequency counting, and re-embedding.

use crate::{ExpressionCategory, MangleConfig, Mangler, SourceFile};

fn mangler_with(configs: Vec<MangleConfig>) -> Mangler {
    let mut mangler = Mangler::with_default_plugins();
    for config in configs {
        mangler.with_config(config);
    }
    mangler
}

fn classes_config(patterns: &[&str]) -> MangleConfig {
    MangleConfig::new(
        ExpressionCategory::Classes,
        &patterns.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
    )
}

#[test]
fn test_classes_renamed_consistently_across_languages() {
    let css = SourceFile::new("css", ".cls-btn { } .cls-card { } .cls-btn:hover { }");
    let html = SourceFile::new(
        "html",
        concat!(
            "<style>.cls-btn { }</style>",
            "<div class=\"cls-card cls-btn\">x</div>",
            "<script>q(\".cls-card\");</script>",
        ),
    );

    let mangler = mangler_with(vec![classes_config(&["cls-[a-zA-Z-_]+"])]);
    let mangled = mangler.run(vec![css, html]).unwrap();

    // cls-btn occurs four times across all units, cls-card three, so
    // cls-btn takes the shortest name.
    assert_eq!(mangled[0].content, ".a { } .b { } .a:hover { }");
    assert_eq!(
        mangled[1].content,
        concat!(
            "<style>.a { }</style>",
            "<div class=\"b a\">x</div>",
            "<script>q(\".b\");</script>",
        )
    );
}

#[test]
fn test_higher_frequency_gets_shorter_name() {
    let css = SourceFile::new("css", ".foo, .bar { } .bar { }");
    let mangler = mangler_with(vec![classes_config(&["[a-z]+"])]);
    let mangled = mangler.run(vec![css]).unwrap();
    assert_eq!(mangled[0].content, ".b, .a { } .a { }");
}

#[test]
fn test_css_variables_across_languages() {
    let css = SourceFile::new(
        "css",
        ":root { --theme-color: red; } a { color: var(--theme-color); }",
    );
    let html = SourceFile::new(
        "html",
        "<div style=\"--theme-color: blue; background: var(--theme-color)\">x</div>",
    );
    let js = SourceFile::new("js", "el.style.setProperty(\"--theme-color\", \"green\");");

    let config = MangleConfig::new(
        ExpressionCategory::CssVariables,
        &["[a-z-]+".to_string()],
    );
    let mangled = mangler_with(vec![config]).run(vec![css, html, js]).unwrap();

    assert_eq!(
        mangled[0].content,
        ":root { --a: red; } a { color: var(--a); }"
    );
    assert_eq!(
        mangled[1].content,
        "<div style=\"--a: blue; background: var(--a)\">x</div>"
    );
    assert_eq!(
        mangled[2].content,
        "el.style.setProperty(\"--a\", \"green\");"
    );
}

#[test]
fn test_multiple_configs_run_independently() {
    let css = SourceFile::new("css", ".cls-btn { } #top-nav { }");
    let html = SourceFile::new("html", "<div class=\"cls-btn\" id=\"top-nav\">x</div>");

    let configs = vec![
        classes_config(&["cls-[a-z-]+"]),
        MangleConfig::new(ExpressionCategory::Ids, &["top-[a-z-]+".to_string()]),
    ];
    let mangled = mangler_with(configs).run(vec![css, html]).unwrap();

    // Each category gets its own name sequence; a class and an id may share
    // the name "a" without colliding.
    assert_eq!(mangled[0].content, ".a { } #a { }");
    assert_eq!(mangled[1].content, "<div class=\"a\" id=\"a\">x</div>");
}

#[test]
fn test_prefix_and_reserved_names() {
    let css = SourceFile::new("css", ".foo { } .bar { }");
    let mut config = classes_config(&["[a-z]+"]);
    config.mangle_prefix = "cls-".to_string();
    let mangled = mangler_with(vec![config]).run(vec![css]).unwrap();
    assert_eq!(mangled[0].content, ".cls-a { } .cls-b { }");

    let css = SourceFile::new("css", ".foo { }");
    let mut config = classes_config(&["[a-z]+"]);
    config.reserved_names = vec!["a".to_string()];
    let mangled = mangler_with(vec![config]).run(vec![css]).unwrap();
    assert_eq!(mangled[0].content, ".b { }");
}

#[test]
fn test_no_matches_is_byte_for_byte_noop() {
    let contents = [
        ("css", ".keep { color: red; }"),
        (
            "html",
            "<style>.keep { }</style><p style=\"color: red\" class=\"keep\">x</p>",
        ),
        ("js", "q(\".keep\"); var keep = 1;"),
    ];
    let files: Vec<SourceFile> = contents
        .iter()
        .map(|(kind, content)| SourceFile::new(kind, content))
        .collect();

    let mangler = mangler_with(vec![classes_config(&["zzz-[0-9]+"])]);
    let mangled = mangler.run(files).unwrap();

    for (file, (_, original)) in mangled.iter().zip(&contents) {
        assert_eq!(&file.content, original);
    }
}

#[test]
fn test_unsupported_kind_passes_through_pipeline() {
    let json = SourceFile::new("json", "{\"cls-btn\": 1}");
    let css = SourceFile::new("css", ".cls-btn { }");

    let mangler = mangler_with(vec![classes_config(&["cls-[a-z-]+"])]);
    let mangled = mangler.run(vec![json, css]).unwrap();

    // The pipeline returns every file; only supported kinds are rewritten.
    assert_eq!(mangled.len(), 2);
    assert_eq!(mangled[0].content, "{\"cls-btn\": 1}");
    assert_eq!(mangled[1].content, ".a { }");
}

#[test]
fn test_embedded_script_and_host_share_names() {
    let html = SourceFile::new(
        "html",
        concat!(
            "<div class=\"cls-menu\">",
            "<script>document.querySelector(\".cls-menu\");</script>",
            "</div>",
        ),
    );
    let mangled = mangler_with(vec![classes_config(&["cls-[a-z-]+"])])
        .run(vec![html])
        .unwrap();
    assert_eq!(
        mangled[0].content,
        concat!(
            "<div class=\"a\">",
            "<script>document.querySelector(\".a\");</script>",
            "</div>",
        )
    );
}

#[test]
fn test_empty_file_list() {
    let mangler = mangler_with(vec![classes_config(&["[a-z]+"])]);
    let mangled = mangler.run(Vec::new()).unwrap();
    assert!(mangled.is_empty());
}
