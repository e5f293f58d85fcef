//! CSS language plugin
//!
//! Supplies expressions over stylesheet text: class and id selectors,
//! attribute selectors, and custom properties in both their declaration and
//! `var()` usage forms. Selector expressions skip quoted strings so a
//! candidate inside `content: ".foo"` or a `url("...")` never matches.

use crate::expression::{MangleExpression, SingleGroupExpression};
use crate::plugins::{ExpressionCategory, LanguagePlugin};

/// A class selector: `.` then the candidate, up to a selector delimiter
const CLASS_SELECTOR: &str = r"
    (?<=\.)
    (?<main>%s)
    (?=$|[\s,.{:#\[)>+~])
";

/// An id selector: `#` then the candidate, up to a selector delimiter
const ID_SELECTOR: &str = r"
    (?<=\#)
    (?<main>%s)
    (?=$|[\s,.{:#\[)>+~])
";

/// An attribute selector: the name between `[` and its operator or `]`
const ATTRIBUTE_SELECTOR: &str = r"
    (?<=\[)
    (?<main>%s)
    (?=\s*(?:\]|[~|^$*]?=))
";

/// A custom property declaration: `--name:`
const VARIABLE_DECLARATION: &str = r"
    (?<=--)
    (?<main>%s)
    (?=\s*:)
";

/// A custom property usage: `var(--name)` or `var(--name, fallback)`
const VARIABLE_USAGE: &str = r"
    var\(\s*--
    (?<main>%s)
    (?=\s*[,)])
";

/// Expressions over stylesheet text
#[derive(Debug, Clone, Default)]
pub struct CssLanguagePlugin;

impl CssLanguagePlugin {
    pub fn new() -> Self {
        CssLanguagePlugin
    }
}

impl LanguagePlugin for CssLanguagePlugin {
    fn languages(&self) -> Vec<String> {
        vec!["css".to_string()]
    }

    fn expressions(&self, category: ExpressionCategory) -> Vec<Box<dyn MangleExpression>> {
        match category {
            ExpressionCategory::Classes => vec![Box::new(
                SingleGroupExpression::new(CLASS_SELECTOR).ignore_strings(),
            )],
            ExpressionCategory::Ids => vec![Box::new(
                SingleGroupExpression::new(ID_SELECTOR).ignore_strings(),
            )],
            ExpressionCategory::Attributes => vec![Box::new(
                SingleGroupExpression::new(ATTRIBUTE_SELECTOR).ignore_strings(),
            )],
            ExpressionCategory::CssVariables => vec![
                Box::new(SingleGroupExpression::new(VARIABLE_DECLARATION)),
                Box::new(SingleGroupExpression::new(VARIABLE_USAGE)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(category: ExpressionCategory, text: &str, pattern: &str) -> Vec<String> {
        CssLanguagePlugin::new()
            .expressions(category)
            .iter()
            .flat_map(|expression| expression.find_all(text, pattern))
            .collect()
    }

    #[test]
    fn test_class_selectors() {
        let found = find(
            ExpressionCategory::Classes,
            ".foo, .bar:hover { } .foo.baz { }",
            "[a-z]+",
        );
        assert_eq!(found, vec!["foo", "bar", "foo", "baz"]);
    }

    #[test]
    fn test_class_selector_ignores_strings() {
        let found = find(
            ExpressionCategory::Classes,
            r#".foo { content: ".bar"; }"#,
            "[a-z]+",
        );
        assert_eq!(found, vec!["foo"]);
    }

    #[test]
    fn test_id_selectors() {
        let found = find(ExpressionCategory::Ids, "#header > #nav { }", "[a-z]+");
        assert_eq!(found, vec!["header", "nav"]);
    }

    #[test]
    fn test_id_selector_does_not_match_hex_colors() {
        let found = find(
            ExpressionCategory::Ids,
            "#nav { color: #aabbcc; }",
            "[a-z]+",
        );
        assert_eq!(found, vec!["nav"]);
    }

    #[test]
    fn test_attribute_selectors() {
        let found = find(
            ExpressionCategory::Attributes,
            r#"[data-x] { } [data-y="1"] { } [data-z~="a"] { }"#,
            "data-[a-z]+",
        );
        assert_eq!(found, vec!["data-x", "data-y", "data-z"]);
    }

    #[test]
    fn test_variable_declarations_and_usages() {
        let found = find(
            ExpressionCategory::CssVariables,
            ":root { --main-color: red; } a { color: var(--main-color); }",
            "[a-z-]+",
        );
        assert_eq!(found, vec!["main-color", "main-color"]);
    }

    #[test]
    fn test_variable_usage_with_fallback() {
        let found = find(
            ExpressionCategory::CssVariables,
            "a { color: var(--accent, blue); }",
            "[a-z]+",
        );
        assert_eq!(found, vec!["accent"]);
    }
}
