//! HTML language plugin
//!
//! Markup needs both expression styles. Attribute values such as
//! `class="foo bar"` hold several whitespace-separated candidates, so the
//! only way to validate a match is to first bound the attribute's quoted
//! value and then match tokens inside it; those are nested-region
//! expressions. Single-value attributes (`id`, `for`, `href` anchors) use
//! single-region expressions.
//!
//! The plugin is also the source of embeds: `<style>` element bodies and
//! `style="..."` attribute values surface as CSS units, `<script>` bodies
//! as JavaScript units. A style attribute value is wrapped as `:root{...}`
//! so declaration-level CSS expressions apply to it; the wrapper is
//! dropped again when the embed is spliced back.

use fancy_regex::Regex;

use crate::SourceFile;
use crate::embeds::Embed;
use crate::expression::{MangleExpression, NestedGroupExpression, SingleGroupExpression};
use crate::plugins::{ExpressionCategory, LanguagePlugin};

/// A double-quoted `class` attribute value containing a candidate
const CLASS_ATTRIBUTE_DQ: &str = r#"
    \bclass\s*=\s*"
    (?<main>[^"]*%s[^"]*)
    "
"#;

/// A single-quoted `class` attribute value containing a candidate
const CLASS_ATTRIBUTE_SQ: &str = r#"
    \bclass\s*=\s*'
    (?<main>[^']*%s[^']*)
    '
"#;

/// One whitespace-separated token inside an attribute value
const SPACE_SEPARATED_TOKEN: &str = r"
    (?:^|(?<=\s))
    (?<main>%s)
    (?=$|\s)
";

/// A double-quoted `id` or `for` attribute value
const ID_ATTRIBUTE_DQ: &str = r#"
    \b(?:id|for)\s*=\s*"
    (?<main>%s)
    (?=")
"#;

/// A single-quoted `id` or `for` attribute value
const ID_ATTRIBUTE_SQ: &str = r#"
    \b(?:id|for)\s*=\s*'
    (?<main>%s)
    (?=')
"#;

/// The fragment of a double-quoted `href` attribute value
const HREF_ANCHOR_DQ: &str = r##"
    \bhref\s*=\s*"[^"]*#
    (?<main>%s)
    (?=")
"##;

/// An element tag containing a candidate attribute name
const TAG_OUTER: &str = r"
    (?<main><[a-zA-Z][^>]*%s[^>]*>)
";

/// An attribute name followed by `=` inside a tag
const ATTRIBUTE_NAME: &str = r"
    (?<=\s)
    (?<main>%s)
    (?=\s*=)
";

/// A double-quoted `style` attribute value containing a candidate
const STYLE_ATTRIBUTE_DQ: &str = r#"
    \bstyle\s*=\s*"
    (?<main>[^"]*%s[^"]*)
    "
"#;

/// A custom property declaration inside a style attribute
const VARIABLE_DECLARATION_TOKEN: &str = r"
    (?<=--)
    (?<main>%s)
    (?=\s*:)
";

/// A custom property usage inside a style attribute
const VARIABLE_USAGE_TOKEN: &str = r"
    var\(\s*--
    (?<main>%s)
    (?=\s*[,)])
";

/// Embed scanners: element bodies and style attribute values
const STYLE_ELEMENT: &str = r"(?s)<style[^>]*>(?<main>.*?)</style>";
const SCRIPT_ELEMENT: &str = r"(?s)<script[^>]*>(?<main>.*?)</script>";
const STYLE_ATTRIBUTE_VALUE: &str = r#"\bstyle\s*=\s*"(?<main>[^"]*)""#;

/// Length of the `:root{` wrapper put around style attribute values
const STYLE_WRAPPER_PREFIX: usize = 6;

/// Expressions and embeds for markup
#[derive(Debug, Clone, Default)]
pub struct HtmlLanguagePlugin;

impl HtmlLanguagePlugin {
    pub fn new() -> Self {
        HtmlLanguagePlugin
    }

    /// Collect one scanner's captures as embeds of `kind`. With `wrap` set,
    /// the captured value is wrapped as `:root{...}` so declaration-level
    /// CSS expressions apply to it.
    fn scan_embeds(content: &str, scanner: &str, kind: &str, wrap: bool, embeds: &mut Vec<Embed>) {
        let Ok(re) = Regex::new(scanner) else { return };
        for caps in re.captures_iter(content) {
            let Ok(caps) = caps else { break };
            let Some(body) = caps.name("main") else {
                continue;
            };
            if body.as_str().is_empty() {
                continue;
            }
            if wrap {
                embeds.push(Embed::with_wrapper(
                    kind,
                    format!(":root{{{}}}", body.as_str()),
                    body.start(),
                    body.end(),
                    STYLE_WRAPPER_PREFIX,
                    1,
                ));
            } else {
                embeds.push(Embed::new(
                    kind,
                    body.as_str().to_string(),
                    body.start(),
                    body.end(),
                ));
            }
        }
    }
}

impl LanguagePlugin for HtmlLanguagePlugin {
    fn languages(&self) -> Vec<String> {
        vec!["html".to_string()]
    }

    fn expressions(&self, category: ExpressionCategory) -> Vec<Box<dyn MangleExpression>> {
        match category {
            ExpressionCategory::Classes => vec![
                Box::new(NestedGroupExpression::new(
                    CLASS_ATTRIBUTE_DQ,
                    SPACE_SEPARATED_TOKEN,
                )),
                Box::new(NestedGroupExpression::new(
                    CLASS_ATTRIBUTE_SQ,
                    SPACE_SEPARATED_TOKEN,
                )),
            ],
            ExpressionCategory::Ids => vec![
                Box::new(SingleGroupExpression::new(ID_ATTRIBUTE_DQ)),
                Box::new(SingleGroupExpression::new(ID_ATTRIBUTE_SQ)),
                Box::new(SingleGroupExpression::new(HREF_ANCHOR_DQ)),
            ],
            ExpressionCategory::Attributes => vec![Box::new(NestedGroupExpression::new(
                TAG_OUTER,
                ATTRIBUTE_NAME,
            ))],
            ExpressionCategory::CssVariables => vec![
                Box::new(NestedGroupExpression::new(
                    STYLE_ATTRIBUTE_DQ,
                    VARIABLE_DECLARATION_TOKEN,
                )),
                Box::new(NestedGroupExpression::new(
                    STYLE_ATTRIBUTE_DQ,
                    VARIABLE_USAGE_TOKEN,
                )),
            ],
        }
    }

    fn embeds_in(&self, file: &SourceFile) -> Vec<Embed> {
        if file.kind != "html" {
            return Vec::new();
        }
        let mut embeds = Vec::new();
        Self::scan_embeds(&file.content, STYLE_ELEMENT, "css", false, &mut embeds);
        Self::scan_embeds(&file.content, SCRIPT_ELEMENT, "js", false, &mut embeds);
        Self::scan_embeds(&file.content, STYLE_ATTRIBUTE_VALUE, "css", true, &mut embeds);
        embeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn find(category: ExpressionCategory, text: &str, pattern: &str) -> Vec<String> {
        HtmlLanguagePlugin::new()
            .expressions(category)
            .iter()
            .flat_map(|expression| expression.find_all(text, pattern))
            .collect()
    }

    fn replace(category: ExpressionCategory, text: &str, pairs: &[(&str, &str)]) -> String {
        let replacements: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut out = text.to_string();
        for expression in HtmlLanguagePlugin::new().expressions(category) {
            out = expression.replace_all(&out, &replacements);
        }
        out
    }

    #[test]
    fn test_class_attribute_tokens() {
        let found = find(
            ExpressionCategory::Classes,
            r#"<div class="foo bar"><span class='baz'>foo</span></div>"#,
            "[a-z]+",
        );
        assert_eq!(found, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_class_attribute_replacement_stays_in_quotes() {
        let out = replace(
            ExpressionCategory::Classes,
            r#"<div class="foo bar">foo bar</div>"#,
            &[("foo", "a"), ("bar", "b")],
        );
        assert_eq!(out, r#"<div class="a b">foo bar</div>"#);
    }

    #[test]
    fn test_id_and_for_attributes() {
        let found = find(
            ExpressionCategory::Ids,
            r#"<input id="email"><label for="email">e</label>"#,
            "[a-z]+",
        );
        assert_eq!(found, vec!["email", "email"]);
    }

    #[test]
    fn test_href_anchor() {
        let found = find(
            ExpressionCategory::Ids,
            r##"<a href="/docs#install">install</a>"##,
            "[a-z]+",
        );
        assert_eq!(found, vec!["install"]);
    }

    #[test]
    fn test_attribute_names_inside_tags_only() {
        let found = find(
            ExpressionCategory::Attributes,
            r#"<div data-x="1" data-y="2">data-z = "3"</div>"#,
            "data-[a-z]+",
        );
        assert_eq!(found, vec!["data-x", "data-y"]);
    }

    #[test]
    fn test_style_attribute_variables() {
        let found = find(
            ExpressionCategory::CssVariables,
            r#"<div style="--gap: 4px; margin: var(--gap)"></div>"#,
            "[a-z]+",
        );
        assert_eq!(found, vec!["gap", "gap"]);
    }

    #[test]
    fn test_embeds_cover_style_script_and_attributes() {
        let file = SourceFile::new(
            "html",
            concat!(
                "<style>.a { }</style>",
                "<script>go();</script>",
                "<p style=\"color: red\">x</p>",
            ),
        );
        let embeds = HtmlLanguagePlugin::new().embeds_in(&file);
        let kinds: Vec<&str> = embeds.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["css", "js", "css"]);
        assert_eq!(embeds[0].content, ".a { }");
        assert_eq!(embeds[1].content, "go();");
        assert_eq!(embeds[2].content, ":root{color: red}");
        assert_eq!(embeds[2].raw(), "color: red");
    }

    #[test]
    fn test_embeds_only_for_html_files() {
        let file = SourceFile::new("css", "<style>.a { }</style>");
        assert!(HtmlLanguagePlugin::new().embeds_in(&file).is_empty());
    }

    #[test]
    fn test_empty_elements_produce_no_embeds() {
        let file = SourceFile::new("html", r#"<style></style><script src="x.js"></script>"#);
        assert!(HtmlLanguagePlugin::new().embeds_in(&file).is_empty());
    }
}
