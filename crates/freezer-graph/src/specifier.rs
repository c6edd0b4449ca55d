//! Classification and path arithmetic for import specifiers.

use std::path::Path;

use once_cell::sync::Lazy;
use path_clean::PathClean;
use regex::Regex;

use crate::module_id::EMPTY_MODULE_ID;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid url regex"));

/// Whether `specifier` is an absolute URL (`scheme://...`).
pub fn is_url(specifier: &str) -> bool {
    URL_PATTERN.is_match(specifier)
}

/// Syntactic shape of an import specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier<'a> {
    Url(&'a str),
    /// Starts with `.`; resolved against the importing module's directory.
    Relative(&'a str),
    /// The literal `@empty`.
    Empty,
    /// A package name with an optional path inside it.
    Bare {
        package: &'a str,
        path: Option<&'a str>,
    },
}

impl<'a> Specifier<'a> {
    pub fn parse(specifier: &'a str) -> Self {
        if is_url(specifier) {
            return Specifier::Url(specifier);
        }
        if specifier.starts_with('.') {
            return Specifier::Relative(specifier);
        }
        if specifier == EMPTY_MODULE_ID {
            return Specifier::Empty;
        }

        // scoped packages keep two segments: `@scope/name/sub/path`
        let split_at = if specifier.starts_with('@') {
            specifier
                .find('/')
                .and_then(|first| specifier[first + 1..].find('/').map(|i| first + 1 + i))
        } else {
            specifier.find('/')
        };

        match split_at {
            Some(index) => {
                let path = &specifier[index + 1..];
                Specifier::Bare {
                    package: &specifier[..index],
                    path: (!path.is_empty()).then_some(path),
                }
            }
            None => Specifier::Bare {
                package: specifier,
                path: None,
            },
        }
    }
}

/// Directory part of a module path or URL (`/a/b.js` -> `/a`).
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Join `relative` onto `base` and normalize `.`/`..` segments.
///
/// URL bases keep their `scheme://authority` untouched.
pub fn join_path(base: &str, relative: &str) -> String {
    let (prefix, path) = split_authority(base);
    let joined = if relative.starts_with('/') || path.is_empty() {
        relative.to_string()
    } else if path.ends_with('/') {
        format!("{path}{relative}")
    } else {
        format!("{path}/{relative}")
    };

    let cleaned = normalize_segments(&joined);
    if prefix.is_empty() {
        cleaned
    } else if cleaned.starts_with('/') {
        format!("{prefix}{cleaned}")
    } else {
        format!("{prefix}/{cleaned}")
    }
}

fn split_authority(base: &str) -> (&str, &str) {
    if !is_url(base) {
        return ("", base);
    }
    let after_scheme = base.find("://").map_or(0, |i| i + 3);
    match base[after_scheme..].find('/') {
        Some(i) => base.split_at(after_scheme + i),
        None => (base, ""),
    }
}

fn normalize_segments(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let cleaned = Path::new(&unified).clean();
    let cleaned = cleaned.to_string_lossy().replace('\\', "/");
    if cleaned == "." { String::new() } else { cleaned }
}
