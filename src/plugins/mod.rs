//! Language plugins
//!
//! A language plugin knows two things about the file kinds it supports: the
//! structural expressions that locate manglable substrings of a given
//! category, and the foreign-language embeds hiding inside a file's content.
//! Plugins supply data to the engine and the embed subsystem; they carry no
//! mangling logic of their own.
//!
//! The built-in plugins cover CSS, HTML, and JavaScript. Composing them in
//! one [`crate::Mangler`] is what makes a class renamed in a stylesheet also
//! get renamed in markup `class` attributes and script query selectors.

use serde::{Deserialize, Serialize};

use crate::SourceFile;
use crate::embeds::Embed;
use crate::expression::MangleExpression;

pub mod css;
pub mod html;
pub mod js;

pub use css::CssLanguagePlugin;
pub use html::HtmlLanguagePlugin;
pub use js::JsLanguagePlugin;

/// The family of substrings one mangling run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpressionCategory {
    /// Class names: `.foo` selectors, `class` attributes, selector strings
    Classes,
    /// Element ids: `#foo` selectors, `id`/`for`/`href` attributes
    Ids,
    /// Attribute names: `[data-x]` selectors, markup attributes,
    /// `getAttribute`-style calls
    Attributes,
    /// Custom property names: `--x` declarations and `var(--x)` usages
    CssVariables,
}

/// A provider of expressions and embeds for one or more file kinds
pub trait LanguagePlugin: Send + Sync {
    /// File kinds this plugin supplies expressions for
    fn languages(&self) -> Vec<String>;

    /// Expressions locating substrings of `category` in this plugin's
    /// languages. May be empty when the category has no equivalent in the
    /// language.
    fn expressions(&self, category: ExpressionCategory) -> Vec<Box<dyn MangleExpression>>;

    /// Foreign-language sub-regions of `file`, without placeholder ids.
    /// Returned embeds must not overlap. The default is no embeds.
    fn embeds_in(&self, _file: &SourceFile) -> Vec<Embed> {
        Vec::new()
    }
}

/// The built-in CSS, HTML, and JavaScript plugins
pub fn default_plugins() -> Vec<Box<dyn LanguagePlugin>> {
    vec![
        Box::new(CssLanguagePlugin::new()),
        Box::new(HtmlLanguagePlugin::new()),
        Box::new(JsLanguagePlugin::new()),
    ]
}
