//! Embed extraction and re-embedding
//!
//! An embed is a foreign-language sub-region inside a host file's content: a
//! `<style>` block in HTML, a `style="..."` attribute value, a `<script>`
//! body. Embeds are extracted into standalone units so each can be mangled
//! under its own language's expressions, while the host file keeps exactly
//! one opaque placeholder token per extracted region. After mangling,
//! re-embedding replaces every placeholder with the embed's raw text in one
//! combined pass.
//!
//! Placeholder ids are `"{fileToken}-{startIndex}"`. The file token is a
//! fixed-length random hexadecimal string re-rolled until it does not occur
//! anywhere in the file's original content; appending the start index then
//! guarantees uniqueness across all embeds of one file without further
//! bookkeeping. The token is anti-collision, not cryptographic.

use fancy_regex::Regex;
use rand::Rng;
use std::collections::HashMap;

use crate::SourceFile;
use crate::error::{MangleError, MangleResult};
use crate::plugins::LanguagePlugin;

/// Attempts at finding a collision-free file token before giving up. A miss
/// requires the 128-bit token to already occur in the file, so running out
/// of attempts is practically unreachable.
const MAX_TOKEN_ATTEMPTS: usize = 16;

/// A foreign-language sub-region extracted from a host file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Placeholder id occupying the embed's span in the host; assigned
    /// during extraction, empty before that.
    pub id: String,
    /// File kind of the embedded content ("css", "js", ...)
    pub kind: String,
    /// The text to mangle, including any contextual wrapper the plugin
    /// added so its language's expressions apply.
    pub content: String,
    /// Byte offset of the region in the host's original content
    pub start: usize,
    /// Byte offset one past the region's end
    pub end: usize,
    prefix_len: usize,
    suffix_len: usize,
}

impl Embed {
    /// Create an embed whose content is spliced back verbatim
    pub fn new(kind: &str, content: String, start: usize, end: usize) -> Self {
        Self::with_wrapper(kind, content, start, end, 0, 0)
    }

    /// Create an embed whose content carries a contextual wrapper
    ///
    /// `prefix_len` and `suffix_len` count the wrapper bytes added around
    /// the host region; `raw` drops them again when splicing back.
    pub fn with_wrapper(
        kind: &str,
        content: String,
        start: usize,
        end: usize,
        prefix_len: usize,
        suffix_len: usize,
    ) -> Self {
        Embed {
            id: String::new(),
            kind: kind.to_string(),
            content,
            start,
            end,
            prefix_len,
            suffix_len,
        }
    }

    /// The string that must be spliced back into the host file: the content
    /// minus any contextual wrapper.
    pub fn raw(&self) -> &str {
        let end = self.content.len().saturating_sub(self.suffix_len);
        let start = self.prefix_len.min(end);
        &self.content[start..end]
    }
}

/// Generate a fixed-length hexadecimal token absent from `content`
fn unique_file_token<R: Rng>(content: &str, rng: &mut R) -> MangleResult<String> {
    for _ in 0..MAX_TOKEN_ATTEMPTS {
        let token = format!("{:032x}", rng.r#gen::<u128>());
        if !content.contains(&token) {
            return Ok(token);
        }
    }
    Err(MangleError::PlaceholderCollision(format!(
        "no collision-free placeholder token found after {} attempts",
        MAX_TOKEN_ATTEMPTS
    )))
}

/// Extract every plugin-reported embed from every file
///
/// Each file's content is rewritten in place: the text strictly between
/// consecutive embeds is kept, and every embed's span becomes its freshly
/// minted placeholder id. The returned vector is indexed like `files`; files
/// without embeds get an empty entry. Embeds reported by plugins must not
/// overlap.
pub fn extract_embeds(
    files: &mut [SourceFile],
    plugins: &[Box<dyn LanguagePlugin>],
) -> MangleResult<Vec<Vec<Embed>>> {
    let mut rng = rand::thread_rng();
    let mut all = Vec::with_capacity(files.len());
    for file in files.iter_mut() {
        let mut embeds: Vec<Embed> = Vec::new();
        for plugin in plugins {
            embeds.extend(plugin.embeds_in(file));
        }
        if embeds.is_empty() {
            all.push(embeds);
            continue;
        }
        embeds.sort_by_key(|embed| embed.start);

        let token = unique_file_token(&file.content, &mut rng)?;
        let mut spliced = String::with_capacity(file.content.len());
        let mut last = 0;
        for embed in &mut embeds {
            embed.id = format!("{}-{}", token, embed.start);
            spliced.push_str(&file.content[last..embed.start]);
            spliced.push_str(&embed.id);
            last = embed.end;
        }
        spliced.push_str(&file.content[last..]);
        file.content = spliced;
        all.push(embeds);
    }
    Ok(all)
}

/// Splice mangled embeds back into their host file
///
/// Builds one combined alternation over every embed id and replaces each
/// placeholder occurrence with that embed's raw text in a single pass,
/// mirroring the single-alternation design of expression replacement. No-op
/// when `embeds` is empty. Does not verify that the embeds originated from
/// `file`; that is the caller's responsibility.
pub fn re_embed(embeds: &[Embed], file: &mut SourceFile) {
    if embeds.is_empty() {
        return;
    }
    let by_id: HashMap<&str, &Embed> = embeds.iter().map(|e| (e.id.as_str(), e)).collect();
    let mut ids: Vec<&str> = by_id.keys().copied().collect();
    ids.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let pattern = ids
        .iter()
        .map(|id| fancy_regex::escape(id).into_owned())
        .collect::<Vec<_>>()
        .join("|");
    let Ok(re) = Regex::new(&pattern) else {
        return;
    };

    let mut out = String::with_capacity(file.content.len());
    let mut last = 0;
    for found in re.find_iter(&file.content) {
        let Ok(found) = found else { break };
        if let Some(embed) = by_id.get(found.as_str()) {
            out.push_str(&file.content[last..found.start()]);
            out.push_str(embed.raw());
            last = found.end();
        }
    }
    out.push_str(&file.content[last..]);
    file.content = out;
}
