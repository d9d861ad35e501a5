//! Rewrites the type spellings used by the documentation into TypeScript.
//!
//! Each rule is its own function; [`normalize`] applies them in order:
//! arrays, promises, booleans, then dictionary flagging.

use std::sync::LazyLock;

use regex::Regex;

pub const PROMISE_REVIEW: &str = "/* REVIEW: unspecified promise result */";
pub const DICTIONARY_REVIEW: &str = "/* REVIEW: dictionary value type */";

static BOOL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bbool\b").unwrap());
static PROMISE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bPromise\b").unwrap());

pub fn normalize(raw: &str) -> String {
    let ty = collapse_arrays(raw.trim());
    let ty = default_promises(&ty);
    let ty = booleans(&ty);
    flag_dictionaries(&ty)
}

/// `[T]` → `T[]`, nested brackets included.
pub fn collapse_arrays(ty: &str) -> String {
    let mut out = String::with_capacity(ty.len() + 2);
    for c in ty.chars() {
        match c {
            '[' => {}
            ']' => out.push_str("[]"),
            _ => out.push(c),
        }
    }
    out
}

/// Bare `Promise` → `Promise<void>`, followed by a review marker.
pub fn default_promises(ty: &str) -> String {
    let mut out = String::with_capacity(ty.len());
    let mut last = 0;
    let mut rewrote = false;
    for m in PROMISE_RE.find_iter(ty) {
        out.push_str(&ty[last..m.end()]);
        if !ty[m.end()..].starts_with('<') {
            out.push_str("<void>");
            rewrote = true;
        }
        last = m.end();
    }
    out.push_str(&ty[last..]);
    if rewrote {
        append_marker(&mut out, PROMISE_REVIEW);
    }
    out
}

pub fn booleans(ty: &str) -> String {
    BOOL_RE.replace_all(ty, "boolean").into_owned()
}

/// Dictionary literals (`{string: any}`) are left as written but flagged.
/// Malformed shapes such as `{string;` count too.
pub fn flag_dictionaries(ty: &str) -> String {
    let mut out = ty.to_string();
    if ty.contains('{') {
        append_marker(&mut out, DICTIONARY_REVIEW);
    }
    out
}

fn append_marker(ty: &mut String, marker: &str) {
    if !ty.contains(marker) {
        ty.push(' ');
        ty.push_str(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays() {
        assert_eq!(collapse_arrays("[string]"), "string[]");
        assert_eq!(collapse_arrays("[[number]]"), "number[][]");
        assert_eq!(collapse_arrays("string[]"), "string[]");
        assert_eq!(normalize("[string]"), "string[]");
        assert_eq!(normalize("[[number]]"), "number[][]");
    }

    #[test]
    fn bool_to_boolean() {
        assert_eq!(booleans("bool"), "boolean");
        assert_eq!(booleans("boolean"), "boolean");
        assert_eq!(normalize("[bool]"), "boolean[]");
    }

    #[test]
    fn promises() {
        assert_eq!(default_promises("Promise"), format!("Promise<void> {PROMISE_REVIEW}"));
        assert_eq!(default_promises("Promise<string>"), "Promise<string>");
        assert_eq!(default_promises("Promise<[Promise]>"), format!("Promise<[Promise<void>]> {PROMISE_REVIEW}"));
        assert_eq!(normalize("Promise<[string]>"), "Promise<string[]>");
        assert_eq!(normalize("[Promise]"), format!("Promise<void>[] {PROMISE_REVIEW}"));
    }

    #[test]
    fn dictionaries_flagged_not_rewritten() {
        assert_eq!(flag_dictionaries("{string: any}"), format!("{{string: any}} {DICTIONARY_REVIEW}"));
        assert_eq!(normalize("[{string;"), format!("{{string; {DICTIONARY_REVIEW}"));
        assert_eq!(flag_dictionaries("string"), "string");
    }

    #[test]
    fn normalize_never_leaves_raw_syntax() {
        for raw in ["[bool]", "[[string]]", "{string: [bool]}", "Promise"] {
            let ty = normalize(raw);
            assert!(!ty.contains("[bool") && !ty.contains("[string"), "{raw} -> {ty}");
            assert!(!BOOL_RE.is_match(&ty), "{raw} -> {ty}");
        }
    }
}
