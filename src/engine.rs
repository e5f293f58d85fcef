//! The mangle engine
//!
//! Renames every matched substring across a batch of files by:
//!
//! 1. Dropping files whose kind has no registered expressions
//! 2. Counting every match of every pattern, globally across files and
//!    expressions, so strings that recur more broadly get shorter names
//! 3. Ordering counted strings by count descending, ties keeping first-seen
//!    order, so output is deterministic
//! 4. Assigning each string the next generated name, with the configured
//!    prefix applied
//! 5. Decomposing the direct rename map into a collision-safe two-step
//!    mapping
//! 6. Applying both mapping steps through every registered expression
//!
//! Step 5 is the central correctness problem: a direct map such as
//! `{b -> a, a -> b}` cannot be applied pair by pair in any order, and a
//! naive whole-map pass risks one substitution's output being re-matched by
//! another rule. The engine therefore searches for a unique prefix, rewrites
//! every original to `"{prefix}-{mangledValue}"`, and only then rewrites
//! those intermediates to their final values. A candidate prefix is rejected
//! when it is itself a key of the direct map, or when any intermediate
//! string collides with a key; rejection discards all partial results and
//! retries with the next generated prefix. Applying both steps is then
//! behaviorally equivalent to one atomic, simultaneous substitution.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::SourceFile;
use crate::expression::MangleExpression;
use crate::names::NameGenerator;

/// Expressions registered per file kind
pub type ExpressionTable = HashMap<String, Vec<Box<dyn MangleExpression>>>;

/// Configuration bag for one mangling run
#[derive(Debug, Clone, Default)]
pub struct MangleOptions {
    /// Patterns describing the candidate substrings to mangle
    pub patterns: Vec<String>,
    /// Ordered character set for generated names; `None` uses the default
    pub char_set: Option<Vec<char>>,
    /// Prefix prepended to every generated name
    pub mangle_prefix: String,
    /// Names the generator must never produce
    pub reserved_names: Vec<String>,
}

/// Mangle every supported file in `files`
///
/// Files whose kind has no entry in `expressions` are absent from the result;
/// this is the documented contract, not an error, and callers wanting those
/// files back must keep their own copies. Supported files are returned in
/// input order with their content rewritten in place.
///
/// # Example
/// ```ignore
/// let files = vec![SourceFile::new("css", ".foo { } .bar { }")];
/// let mangled = mangle(files, &expressions, &options);
/// assert_eq!(mangled[0].content, ".a { } .b { }");
/// ```
pub fn mangle(
    files: Vec<SourceFile>,
    expressions: &ExpressionTable,
    options: &MangleOptions,
) -> Vec<SourceFile> {
    // Step 1: filter out unsupported kinds
    let mut files: Vec<SourceFile> = files
        .into_iter()
        .filter(|file| expressions.contains_key(&file.kind))
        .collect();

    // Step 2: global frequency count, first-seen order retained
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut ordered: Vec<String> = Vec::new();
    for file in &files {
        let Some(table) = expressions.get(&file.kind) else {
            continue;
        };
        for pattern in &options.patterns {
            for expression in table {
                for matched in expression.find_all(&file.content, pattern) {
                    match counts.entry(matched) {
                        Entry::Occupied(mut entry) => *entry.get_mut() += 1,
                        Entry::Vacant(entry) => {
                            ordered.push(entry.key().clone());
                            entry.insert(1);
                        }
                    }
                }
            }
        }
    }

    // Step 3: stable sort, count descending
    ordered.sort_by(|a, b| counts[b.as_str()].cmp(&counts[a.as_str()]));
    log::debug!(
        "mangling {} distinct names across {} files",
        ordered.len(),
        files.len()
    );

    // Step 4: assign direct names in frequency order
    let mut generator = match &options.char_set {
        Some(char_set) => NameGenerator::with_char_set(&options.reserved_names, char_set),
        None => NameGenerator::new(&options.reserved_names),
    };
    let mut direct: HashMap<String, String> = HashMap::with_capacity(ordered.len());
    for original in &ordered {
        let name = generator.next_name();
        direct.insert(
            original.clone(),
            format!("{}{}", options.mangle_prefix, name),
        );
    }

    // Step 5: collision-safe two-step decomposition
    let (to_unique, to_mangled) = build_two_step_mapping(&direct);

    // Step 6: apply both steps through every registered expression
    for mapping in [&to_unique, &to_mangled] {
        for file in &mut files {
            if let Some(table) = expressions.get(&file.kind) {
                for expression in table {
                    file.content = expression.replace_all(&file.content, mapping);
                }
            }
        }
    }

    files
}

/// Decompose a direct rename map into `(original -> intermediate,
/// intermediate -> final)` such that applying both in sequence equals one
/// simultaneous substitution of the direct map.
///
/// The unique-prefix search uses a fresh, unconstrained generator; it must
/// never share the generator used for direct name assignment.
fn build_two_step_mapping(
    direct: &HashMap<String, String>,
) -> (HashMap<String, String>, HashMap<String, String>) {
    let mut generator = NameGenerator::default();
    'candidates: loop {
        let prefix = generator.next_name();
        if direct.contains_key(&prefix) {
            continue;
        }
        let mut to_unique = HashMap::with_capacity(direct.len());
        let mut to_mangled = HashMap::with_capacity(direct.len());
        for (original, mangled) in direct {
            let intermediate = format!("{}-{}", prefix, mangled);
            // An intermediate that is also a key would be mistaken for a
            // still-unprocessed original string mid-flight.
            if direct.contains_key(&intermediate) {
                continue 'candidates;
            }
            to_unique.insert(original.clone(), intermediate.clone());
            to_mangled.insert(intermediate, mangled.clone());
        }
        return (to_unique, to_mangled);
    }
}
