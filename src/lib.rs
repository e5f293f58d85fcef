//! webmangle
//!
//! Consistently renames recurring identifier-like substrings (CSS class and
//! id names, custom properties, attribute names, selector strings) across a
//! set of CSS, HTML, and JavaScript sources, producing shorter, unique
//! replacement tokens without changing behavior.
//!
//! The pipeline has three moving parts:
//!
//! 1. **Expressions** ([`expression`]) locate and rewrite candidate
//!    substrings under structural constraints.
//! 2. **The engine** ([`engine`]) counts candidates globally, assigns short
//!    names by frequency, and applies a collision-safe two-step rename.
//! 3. **Embeds** ([`embeds`]) temporarily extract foreign-language regions
//!    (CSS in a `<style>` tag, scripts, style attributes) so each is
//!    mangled under its own language's rules and spliced back afterwards.
//!
//! [`Mangler`] wires the three together over a set of language plugins.
//!
//! # Example
//!
//! ```ignore
//! use webmangle::{ExpressionCategory, MangleConfig, Mangler, SourceFile};
//!
//! let mut mangler = Mangler::with_default_plugins();
//! mangler.with_config(MangleConfig::new(
//!     ExpressionCategory::Classes,
//!     &["cls-[a-zA-Z-_]+".to_string()],
//! ));
//!
//! let files = vec![
//!     SourceFile::new("css", ".cls-button { }"),
//!     SourceFile::new("html", r#"<a class="cls-button">go</a>"#),
//! ];
//! let mangled = mangler.run(files)?;
//! assert_eq!(mangled[0].content, ".a { }");
//! assert_eq!(mangled[1].content, r#"<a class="a">go</a>"#);
//! # Ok::<(), webmangle::MangleError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod embeds;
pub mod engine;
pub mod error;
pub mod expression;
pub mod loader;
pub mod names;
pub mod plugins;

#[cfg(test)]
mod integration_tests;

pub use embeds::{Embed, extract_embeds, re_embed};
pub use engine::{ExpressionTable, MangleOptions, mangle};
pub use error::{MangleError, MangleResult};
pub use expression::{MangleExpression, NestedGroupExpression, SingleGroupExpression};
pub use names::NameGenerator;
pub use plugins::{
    CssLanguagePlugin, ExpressionCategory, HtmlLanguagePlugin, JsLanguagePlugin, LanguagePlugin,
    default_plugins,
};

/// One in-memory source file
///
/// Identity is by handle, not by path; reading and writing paths is the
/// caller's concern. Content is rewritten in place by the engine and by
/// embed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File kind ("css", "html", "js")
    pub kind: String,
    /// The file's text
    pub content: String,
}

impl SourceFile {
    pub fn new(kind: &str, content: &str) -> Self {
        SourceFile {
            kind: kind.to_string(),
            content: content.to_string(),
        }
    }
}

/// Configuration for one mangling run over one expression category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MangleConfig {
    /// The family of substrings to rename
    pub category: ExpressionCategory,
    /// Patterns describing candidate substrings
    pub patterns: Vec<String>,
    /// Prefix prepended to every generated name
    #[serde(default)]
    pub mangle_prefix: String,
    /// Names the generator must never produce
    #[serde(default)]
    pub reserved_names: Vec<String>,
    /// Ordered character set for generated names
    #[serde(default)]
    pub char_set: Option<Vec<char>>,
}

impl MangleConfig {
    pub fn new(category: ExpressionCategory, patterns: &[String]) -> Self {
        MangleConfig {
            category,
            patterns: patterns.to_vec(),
            mangle_prefix: String::new(),
            reserved_names: Vec::new(),
            char_set: None,
        }
    }

    fn options(&self) -> MangleOptions {
        MangleOptions {
            patterns: self.patterns.clone(),
            char_set: self.char_set.clone(),
            mangle_prefix: self.mangle_prefix.clone(),
            reserved_names: self.reserved_names.clone(),
        }
    }
}

/// The full mangling pipeline over a set of language plugins
///
/// Extracts embeds once, runs the engine once per configuration block with
/// host files and embed contents batched together (so frequency counts and
/// name assignment are global across both), then splices mangled embeds
/// back. Unlike a bare engine run, `run` returns every input file: hosts
/// whose kind no expression supports may still be touched through their
/// embeds.
pub struct Mangler {
    plugins: Vec<Box<dyn LanguagePlugin>>,
    configs: Vec<MangleConfig>,
}

impl Mangler {
    /// An empty pipeline with no plugins and no configuration
    pub fn new() -> Self {
        Mangler {
            plugins: Vec::new(),
            configs: Vec::new(),
        }
    }

    /// A pipeline preloaded with the CSS, HTML, and JavaScript plugins
    pub fn with_default_plugins() -> Self {
        Mangler {
            plugins: default_plugins(),
            configs: Vec::new(),
        }
    }

    pub fn with_plugin(&mut self, plugin: Box<dyn LanguagePlugin>) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_config(&mut self, config: MangleConfig) -> &mut Self {
        self.configs.push(config);
        self
    }

    /// Collect every plugin's expressions for `category`, keyed by file kind
    fn expression_table(&self, category: ExpressionCategory) -> ExpressionTable {
        let mut table: ExpressionTable = HashMap::new();
        for plugin in &self.plugins {
            for language in plugin.languages() {
                table
                    .entry(language)
                    .or_default()
                    .extend(plugin.expressions(category));
            }
        }
        table
    }

    /// Run every configured mangling pass over `files`
    pub fn run(&self, mut files: Vec<SourceFile>) -> MangleResult<Vec<SourceFile>> {
        let mut embeds_per_file = extract_embeds(&mut files, &self.plugins)?;

        // One flat work list: hosts first, then every embed as a standalone
        // file of its own kind.
        let host_count = files.len();
        let mut work = files;
        let mut embed_slots: Vec<(usize, usize)> = Vec::new();
        for (file_index, embeds) in embeds_per_file.iter().enumerate() {
            for (embed_index, embed) in embeds.iter().enumerate() {
                embed_slots.push((file_index, embed_index));
                work.push(SourceFile::new(&embed.kind, &embed.content));
            }
        }

        for config in &self.configs {
            let table = self.expression_table(config.category);
            // The engine drops unsupported kinds from its result, so carve
            // out the supported subset and merge the mutated contents back
            // by position.
            let mut supported = Vec::new();
            let mut batch = Vec::new();
            for (index, file) in work.iter_mut().enumerate() {
                if table.contains_key(&file.kind) {
                    supported.push(index);
                    batch.push(SourceFile {
                        kind: file.kind.clone(),
                        content: std::mem::take(&mut file.content),
                    });
                }
            }
            let mangled = engine::mangle(batch, &table, &config.options());
            for (index, file) in supported.into_iter().zip(mangled) {
                work[index].content = file.content;
            }
        }

        // Push mangled contents back into the embed records, then splice
        // each host back together.
        let embed_files = work.split_off(host_count);
        let mut hosts = work;
        for ((file_index, embed_index), embed_file) in embed_slots.into_iter().zip(embed_files) {
            embeds_per_file[file_index][embed_index].content = embed_file.content;
        }
        for (file_index, embeds) in embeds_per_file.iter().enumerate() {
            re_embed(embeds, &mut hosts[file_index]);
        }
        Ok(hosts)
    }
}

impl Default for Mangler {
    fn default() -> Self {
        Self::new()
    }
}
