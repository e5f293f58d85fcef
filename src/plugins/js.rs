//! JavaScript language plugin
//!
//! Scripts reference markup names almost exclusively through string
//! literals: selector strings handed to `querySelector`, ids handed to
//! `getElementById`, attribute names handed to `getAttribute`. The
//! expressions here therefore bound a quoted string first and match
//! candidates inside it, so a bare identifier in code that happens to share
//! a class name is never touched.

use crate::expression::{MangleExpression, NestedGroupExpression, SingleGroupExpression};
use crate::plugins::{ExpressionCategory, LanguagePlugin};

/// A double-quoted string literal containing a candidate
const DQ_STRING: &str = r#"
    "
    (?<main>[^"]*%s[^"]*)
    "
"#;

/// A single-quoted string literal containing a candidate
const SQ_STRING: &str = r"
    '
    (?<main>[^']*%s[^']*)
    '
";

/// A template literal containing a candidate
const BT_STRING: &str = r"
    `
    (?<main>[^`]*%s[^`]*)
    `
";

/// A class selector token inside a string
const CLASS_SELECTOR_TOKEN: &str = r"
    (?<=\.)
    (?<main>%s)
    (?=$|[\s,.{:#\[)>+~])
";

/// An id selector token inside a string
const ID_SELECTOR_TOKEN: &str = r"
    (?<=\#)
    (?<main>%s)
    (?=$|[\s,.{:#\[)>+~])
";

/// The argument of a `getElementById` call, double- and single-quoted
const GET_ELEMENT_BY_ID_DQ: &str = r#"
    \bgetElementById\s*\(\s*"
    (?<main>%s)
    (?=")
"#;

const GET_ELEMENT_BY_ID_SQ: &str = r"
    \bgetElementById\s*\(\s*'
    (?<main>%s)
    (?=')
";

/// The first argument of an attribute access call
const ATTRIBUTE_CALL_DQ: &str = r#"
    \b(?:getAttribute|setAttribute|removeAttribute|hasAttribute)\s*\(\s*"
    (?<main>%s)
    (?=")
"#;

const ATTRIBUTE_CALL_SQ: &str = r"
    \b(?:getAttribute|setAttribute|removeAttribute|hasAttribute)\s*\(\s*'
    (?<main>%s)
    (?=')
";

/// A custom property name in a string, as passed to `setProperty`,
/// `getPropertyValue` or `removeProperty`
const PROPERTY_STRING_DQ: &str = r#"
    "--
    (?<main>%s)
    (?=")
"#;

const PROPERTY_STRING_SQ: &str = r"
    '--
    (?<main>%s)
    (?=')
";

/// Expressions over script text
#[derive(Debug, Clone, Default)]
pub struct JsLanguagePlugin;

impl JsLanguagePlugin {
    pub fn new() -> Self {
        JsLanguagePlugin
    }

    fn selector_expressions(token: &str) -> Vec<Box<dyn MangleExpression>> {
        vec![
            Box::new(NestedGroupExpression::new(DQ_STRING, token)),
            Box::new(NestedGroupExpression::new(SQ_STRING, token)),
            Box::new(NestedGroupExpression::new(BT_STRING, token)),
        ]
    }
}

impl LanguagePlugin for JsLanguagePlugin {
    fn languages(&self) -> Vec<String> {
        vec!["js".to_string()]
    }

    fn expressions(&self, category: ExpressionCategory) -> Vec<Box<dyn MangleExpression>> {
        match category {
            ExpressionCategory::Classes => Self::selector_expressions(CLASS_SELECTOR_TOKEN),
            ExpressionCategory::Ids => {
                let mut expressions = Self::selector_expressions(ID_SELECTOR_TOKEN);
                expressions.push(Box::new(SingleGroupExpression::new(GET_ELEMENT_BY_ID_DQ)));
                expressions.push(Box::new(SingleGroupExpression::new(GET_ELEMENT_BY_ID_SQ)));
                expressions
            }
            ExpressionCategory::Attributes => vec![
                Box::new(SingleGroupExpression::new(ATTRIBUTE_CALL_DQ)),
                Box::new(SingleGroupExpression::new(ATTRIBUTE_CALL_SQ)),
            ],
            ExpressionCategory::CssVariables => vec![
                Box::new(SingleGroupExpression::new(PROPERTY_STRING_DQ)),
                Box::new(SingleGroupExpression::new(PROPERTY_STRING_SQ)),
            ],
        }
    }
}
