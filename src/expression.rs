//! Structural match/replace expressions
//!
//! An expression is an immutable, reusable rule built from one or two regex
//! templates. Each template contains exactly one `%s` substitution slot and
//! one `(?<main>...)` named capture group. The same expression instance is
//! used both for counting (the slot receives a broad caller pattern) and for
//! replacing (the slot receives a literal alternation of exact strings, so
//! every substitution happens in one linear scan and no replacement output
//! can be re-matched by a later rule).
//!
//! Two variants exist:
//!
//! 1. **Single-region** - one template whose positional constraints are
//!    zero-width lookaround assertions, so adjacent candidates (`.a.b`) all
//!    match. An optional string-skipping mode refuses matches inside quoted
//!    string literals.
//! 2. **Nested-region** - an outer template locates a bounded container
//!    substring (for example the value of a `class="..."` attribute) and an
//!    inner template is applied only within that capture.
//!
//! Templates are normalized at construction by stripping every whitespace
//! character, so they can be written across several lines for readability.
//! Concrete regexes are compiled per call because the substituted pattern
//! differs call to call; a template that fails to compile yields no matches
//! rather than an error, indistinguishable from "not applicable here".

use fancy_regex::Regex;
use std::collections::HashMap;

/// Substitution slot inside a template
const PATTERN_SLOT: &str = "%s";

/// Name of the capture group whose span is matched and rewritten
const GROUP_MAIN: &str = "main";

/// Name of the capture group used to skip over quoted string literals
const GROUP_SKIP: &str = "skip";

/// Alternation matching a full quoted string literal, used to consume and
/// skip strings before the real pattern gets a chance to match inside them.
const STRING_LITERAL: &str =
    r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'|`(?:\\.|[^`\\])*`"#;

/// A reusable structural matcher/replacer bound to one or two regex templates
pub trait MangleExpression: Send + Sync {
    /// Enumerate every substring of `text` matching `pattern` under this
    /// expression's structural constraints, in order of appearance. `text`
    /// is not mutated; each call re-scans from the start.
    fn find_all(&self, text: &str, pattern: &str) -> Vec<String>;

    /// Rewrite `text`, replacing every occurrence of a key of `replacements`
    /// (under this expression's structural constraints) with its mapped
    /// value, in a single pass. Returns `text` unchanged when `replacements`
    /// is empty.
    fn replace_all(&self, text: &str, replacements: &HashMap<String, String>) -> String;
}

/// Strip the whitespace templates carry only for readability
fn normalize_template(template: &str) -> String {
    template.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Substitute a pattern into a template's `%s` slot, grouped so alternation
/// in the pattern cannot leak into the surrounding template.
fn fill_template(template: &str, pattern: &str) -> String {
    template.replace(PATTERN_SLOT, &format!("(?:{})", pattern))
}

/// Build a literal alternation over every key of a replacement map
///
/// Keys are sorted longest first so a key that is a proper prefix of another
/// key can never steal its match, and ties break lexicographically so the
/// alternation is deterministic regardless of map iteration order.
fn alternation_of(replacements: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = replacements.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    keys.iter()
        .map(|key| fancy_regex::escape(key).into_owned())
        .collect::<Vec<_>>()
        .join("|")
}

/// Compile a concrete regex, treating a malformed result as "matches nothing"
fn compile(concrete: &str) -> Option<Regex> {
    match Regex::new(concrete) {
        Ok(re) => Some(re),
        Err(err) => {
            log::debug!("expression did not compile, treating as no match: {}", err);
            None
        }
    }
}

/// Replace every `main` capture of `re` in `text` through the replacement
/// map, splicing around the capture span so lookaround context and any
/// consumed surrounding text are preserved verbatim.
fn splice_replacements(re: &Regex, text: &str, replacements: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Ok(caps) = caps else { break };
        let Some(main) = caps.name(GROUP_MAIN) else {
            continue;
        };
        let Some(replacement) = replacements.get(main.as_str()) else {
            continue;
        };
        out.push_str(&text[last..main.start()]);
        out.push_str(replacement);
        last = main.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Single-region expression: one template, constraints via lookaround
#[derive(Debug, Clone)]
pub struct SingleGroupExpression {
    template: String,
    ignore_strings: bool,
}

impl SingleGroupExpression {
    /// Create an expression from a template containing one `%s` slot and one
    /// `(?<main>...)` group
    pub fn new(template: &str) -> Self {
        SingleGroupExpression {
            template: normalize_template(template),
            ignore_strings: false,
        }
    }

    /// Skip any match that would fall inside a quoted string literal
    ///
    /// The compiled pattern alternately matches and discards whole string
    /// literals before trying the real pattern, so a candidate inside quotes
    /// never matches.
    pub fn ignore_strings(mut self) -> Self {
        self.ignore_strings = true;
        self
    }

    fn compile_with(&self, pattern: &str) -> Option<Regex> {
        let mut concrete = fill_template(&self.template, pattern);
        if self.ignore_strings {
            concrete = format!("(?<{}>{})|{}", GROUP_SKIP, STRING_LITERAL, concrete);
        }
        compile(&concrete)
    }
}

impl MangleExpression for SingleGroupExpression {
    fn find_all(&self, text: &str, pattern: &str) -> Vec<String> {
        let Some(re) = self.compile_with(pattern) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for caps in re.captures_iter(text) {
            let Ok(caps) = caps else { break };
            if caps.name(GROUP_SKIP).is_some() {
                continue;
            }
            if let Some(main) = caps.name(GROUP_MAIN) {
                found.push(main.as_str().to_string());
            }
        }
        found
    }

    fn replace_all(&self, text: &str, replacements: &HashMap<String, String>) -> String {
        if replacements.is_empty() {
            return text.to_string();
        }
        let Some(re) = self.compile_with(&alternation_of(replacements)) else {
            return text.to_string();
        };
        splice_replacements(&re, text, replacements)
    }
}

/// Nested-region expression: an outer template bounds a container, an inner
/// template matches tokens within it
#[derive(Debug, Clone)]
pub struct NestedGroupExpression {
    outer_template: String,
    inner_template: String,
}

impl NestedGroupExpression {
    /// Create an expression from an outer and an inner template, each with
    /// one `%s` slot and one `(?<main>...)` group
    ///
    /// The outer `main` group must capture the full bounded container (for
    /// example everything between attribute quotes); the inner template is
    /// evaluated against that capture alone, so inner matches can never
    /// spill outside the container.
    pub fn new(outer_template: &str, inner_template: &str) -> Self {
        NestedGroupExpression {
            outer_template: normalize_template(outer_template),
            inner_template: normalize_template(inner_template),
        }
    }

    fn compile_with(&self, pattern: &str) -> Option<(Regex, Regex)> {
        let outer = compile(&fill_template(&self.outer_template, pattern))?;
        let inner = compile(&fill_template(&self.inner_template, pattern))?;
        Some((outer, inner))
    }
}

impl MangleExpression for NestedGroupExpression {
    fn find_all(&self, text: &str, pattern: &str) -> Vec<String> {
        let Some((outer, inner)) = self.compile_with(pattern) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for caps in outer.captures_iter(text) {
            let Ok(caps) = caps else { break };
            let Some(container) = caps.name(GROUP_MAIN) else {
                continue;
            };
            for inner_caps in inner.captures_iter(container.as_str()) {
                let Ok(inner_caps) = inner_caps else { break };
                if let Some(main) = inner_caps.name(GROUP_MAIN) {
                    found.push(main.as_str().to_string());
                }
            }
        }
        found
    }

    fn replace_all(&self, text: &str, replacements: &HashMap<String, String>) -> String {
        if replacements.is_empty() {
            return text.to_string();
        }
        let Some((outer, inner)) = self.compile_with(&alternation_of(replacements)) else {
            return text.to_string();
        };
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in outer.captures_iter(text) {
            let Ok(caps) = caps else { break };
            let Some(container) = caps.name(GROUP_MAIN) else {
                continue;
            };
            out.push_str(&text[last..container.start()]);
            out.push_str(&splice_replacements(&inner, container.as_str(), replacements));
            last = container.end();
        }
        out.push_str(&text[last..]);
        out
    }
}
