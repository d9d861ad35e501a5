use std::sync::LazyLock;

use regex::Regex;

use super::types::normalize;
use crate::error::{ParseError, Result};
use crate::model::{MethodSignature, Parameter, PropertySignature};

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$.]*$").unwrap());

/// First non-empty line of a code block, without a trailing `;`.
fn signature_line(code: &str) -> Result<&str> {
    code.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| l.trim_end_matches(';').trim_end())
        .ok_or_else(|| ParseError::SignatureParse(code.to_string()))
}

/// `name: type`
pub fn parse_property(code: &str) -> Result<PropertySignature> {
    let line = signature_line(code)?;
    let (name, ty) = line
        .split_once(':')
        .ok_or_else(|| ParseError::SignatureParse(line.to_string()))?;
    let name = name.trim();
    if name.is_empty() || ty.trim().is_empty() {
        return Err(ParseError::SignatureParse(line.to_string()));
    }
    Ok(PropertySignature { name: name.to_string(), ty: normalize(ty) })
}

/// `modifier* name(param: type, ...)(: returnType)?`
pub fn parse_method(code: &str) -> Result<MethodSignature> {
    let line = signature_line(code)?;
    let err = || ParseError::SignatureParse(line.to_string());

    let open = line.find('(').ok_or_else(err)?;
    let close = matching_paren(line, open).ok_or_else(err)?;

    let mut tokens: Vec<&str> = line[..open].split_whitespace().collect();
    let name = tokens.pop().filter(|n| IDENT_RE.is_match(n)).ok_or_else(err)?;

    let mut modifiers: Vec<String> = Vec::new();
    for token in tokens {
        if !IDENT_RE.is_match(token) {
            return Err(err());
        }
        if !modifiers.iter().any(|m| m == token) {
            modifiers.push(token.to_string());
        }
    }

    let mut parameters = Vec::new();
    for raw in split_top_level(&line[open + 1..close]) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let (pname, pty) = raw.split_once(':').ok_or_else(err)?;
        if pname.trim().is_empty() || pty.trim().is_empty() {
            return Err(err());
        }
        parameters.push(Parameter {
            name: pname.trim().to_string(),
            ty: normalize(pty),
            description: None,
        });
    }

    let rest = line[close + 1..].trim();
    let return_type = if rest.is_empty() {
        None
    } else {
        let ty = rest.strip_prefix(':').map(str::trim).filter(|t| !t.is_empty()).ok_or_else(err)?;
        Some(normalize(ty))
    };

    Ok(MethodSignature { name: name.to_string(), parameters, return_type, modifiers })
}

fn matching_paren(line: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in line[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not inside brackets, braces, parens or generics.
fn split_top_level(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut prev = '\0';
    for (i, c) in params.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '>' if prev != '=' => depth -= 1,
            ',' if depth <= 0 => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&params[start..]);
    parts
}
