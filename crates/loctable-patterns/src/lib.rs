//! Turns per-file-type syntax templates into key matchers.
//!
//! A template is a literal snippet of source text with a single `#` marking
//! where the key sits, e.g. `$t('#')`. The text before and after the
//! placeholder become zero-width anchors: they must surround a key but are
//! never part of it. The regex crate has no lookbehind, so matching runs the
//! equivalent two-pass algorithm — enumerate right-anchor occurrences, scan
//! the key span backwards, then require the left anchor to end exactly at the
//! key start.

use loctable_core::{LocError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::warn;

/// Placeholder marking the key position inside a syntax template.
pub const PLACEHOLDER: char = '#';

/// What to do when a syntax template fails to compile. Fail-fast is the
/// default; skipping is opt-in so configuration mistakes stay visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplatePolicy {
    #[default]
    FailFast,
    SkipInvalid,
}

/// Matchers per (dot-less, lowercased) file extension.
pub type CompiledRules = BTreeMap<String, Vec<KeyMatcher>>;

static WS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

#[derive(Debug, Clone)]
pub struct KeyMatcher {
    template: String,
    /// Left anchor, anchored to the end of the searched prefix.
    left: Regex,
    right: Regex,
}

impl KeyMatcher {
    pub fn template(&self) -> &str {
        &self.template
    }

    /// All keys in `text`, lazily. The iterator borrows; call again to
    /// restart.
    pub fn find_keys<'m, 't>(&'m self, text: &'t str) -> KeyMatches<'m, 't> {
        KeyMatches {
            matcher: self,
            text,
            pos: 0,
        }
    }
}

pub struct KeyMatches<'m, 't> {
    matcher: &'m KeyMatcher,
    text: &'t str,
    pos: usize,
}

impl<'m, 't> Iterator for KeyMatches<'m, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        while self.pos <= self.text.len() {
            let hit = self.matcher.right.find_at(self.text, self.pos)?;
            let end = hit.start();
            // Resume one char past this right-anchor occurrence; anchors are
            // zero-width, so the occurrence itself stays available as text.
            self.pos = end
                + self.text[end..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
            let start = key_span_start(self.text, end);
            if start < end && self.matcher.left.is_match(&self.text[..start]) {
                return Some(&self.text[start..end]);
            }
        }
        None
    }
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-'
}

/// Walk backwards over key characters ending at `end`. ASCII-only, so the
/// returned position is always a char boundary.
fn key_span_start(text: &str, end: usize) -> usize {
    let bytes = text.as_bytes();
    let mut start = end;
    while start > 0 && is_key_byte(bytes[start - 1]) {
        start -= 1;
    }
    start
}

/// Escape an anchor literally, then let whitespace runs match any amount of
/// incidental formatting in source text.
fn escape_anchor(anchor: &str) -> String {
    WS_RUN
        .replace_all(&regex::escape(anchor), r"\s*")
        .into_owned()
}

/// Compile one template into a matcher. The template must contain exactly one
/// placeholder with non-empty text on both sides.
pub fn compile(template: &str) -> Result<KeyMatcher> {
    let parts: Vec<&str> = template.split(PLACEHOLDER).collect();
    let (before, after) = match parts.as_slice() {
        [before, after] if !before.is_empty() && !after.is_empty() => (*before, *after),
        _ => {
            return Err(LocError::TemplateAnchor {
                template: template.to_string(),
            }
            .into())
        }
    };
    // Anchors match case-insensitively, keys are captured verbatim.
    let left = Regex::new(&format!(r"(?i:{})\z", escape_anchor(before)))?;
    let right = Regex::new(&format!(r"(?i:{})", escape_anchor(after)))?;
    Ok(KeyMatcher {
        template: template.to_string(),
        left,
        right,
    })
}

/// Compile a whole extension-to-templates rule set. Extension keys tolerate a
/// leading dot and mixed case.
pub fn compile_rules(
    rules: &BTreeMap<String, Vec<String>>,
    policy: TemplatePolicy,
) -> Result<CompiledRules> {
    let mut compiled = CompiledRules::new();
    for (extension, templates) in rules {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        let matchers = compiled.entry(ext).or_default();
        for template in templates {
            match compile(template) {
                Ok(matcher) => matchers.push(matcher),
                Err(err) => match policy {
                    TemplatePolicy::FailFast => return Err(err),
                    TemplatePolicy::SkipInvalid => {
                        warn!(event = "template_skipped", template = %template, %err);
                    }
                },
            }
        }
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(template: &str, text: &str) -> Vec<String> {
        compile(template)
            .expect("template compiles")
            .find_keys(text)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn compiles_valid_template() {
        assert!(compile("$t('#')").is_ok());
    }

    #[test]
    fn rejects_placeholder_at_either_edge() {
        for bad in ["#after", "before#", "#", "no placeholder", "a#b#c"] {
            let err = compile(bad).expect_err("must be rejected");
            assert!(err.to_string().contains(bad), "error names the template");
        }
    }

    #[test]
    fn match_excludes_anchors() {
        assert_eq!(keys("$t('#')", "x = $t('home.title');"), vec!["home.title"]);
    }

    #[test]
    fn finds_every_occurrence() {
        let text = "$t('a.b')+$t('a-c')$t('d_1')";
        assert_eq!(keys("$t('#')", text), vec!["a.b", "a-c", "d_1"]);
    }

    #[test]
    fn anchors_tolerate_whitespace_differences() {
        let template = "$t( '#' )";
        assert_eq!(keys(template, "$t('tight')"), vec!["tight"]);
        assert_eq!(keys(template, "$t(   'loose'  )"), vec!["loose"]);
    }

    #[test]
    fn non_ascii_anchors_are_handled() {
        assert_eq!(keys("t(«#»)", "t(«nav.item») t(«other»)"), vec!["nav.item", "other"]);
    }

    #[test]
    fn anchors_match_case_insensitively() {
        assert_eq!(keys("$t('#')", "$T('shout')"), vec!["shout"]);
    }

    #[test]
    fn left_anchor_must_be_present() {
        assert!(keys("$t('#')", "t('loose.key')").is_empty());
        assert!(keys("$t('#')", "'anchorless'").is_empty());
    }

    #[test]
    fn matcher_restarts_cleanly() {
        let matcher = compile("$t('#')").unwrap();
        let text = "$t('one') $t('two')";
        assert_eq!(matcher.find_keys(text).count(), 2);
        assert_eq!(matcher.find_keys(text).count(), 2);
    }

    #[test]
    fn compile_rules_fail_fast_propagates() {
        let mut rules = BTreeMap::new();
        rules.insert(".js".to_string(), vec!["#broken".to_string()]);
        assert!(compile_rules(&rules, TemplatePolicy::FailFast).is_err());
    }

    #[test]
    fn compile_rules_skip_invalid_keeps_the_rest() {
        let mut rules = BTreeMap::new();
        rules.insert(
            ".Vue".to_string(),
            vec!["#broken".to_string(), "$t('#')".to_string()],
        );
        let compiled = compile_rules(&rules, TemplatePolicy::SkipInvalid).unwrap();
        assert_eq!(compiled["vue"].len(), 1);
        assert_eq!(compiled["vue"][0].template(), "$t('#')");
    }
}
