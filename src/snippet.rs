//! import an expression from a javascript snippet on disk
//!
//! A snippet is either a file or a directory of files. In a directory,
//! `tixy.js` wins; otherwise there must be exactly one `.js` file. The code
//! is flattened into one line: comments are stripped and every line is
//! trimmed and joined with nothing in between.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ImportError;

/// files above this size are refused
pub const MAX_SNIPPET_BYTES: u64 = 1024 * 1024;

pub const PREFERRED_FILE: &str = "tixy.js";

pub fn import(path: &Path) -> Result<String, ImportError> {
    let file = if path.is_dir() {
        choose_file(path)?
    } else {
        path.to_path_buf()
    };

    if fs::metadata(&file)?.len() > MAX_SNIPPET_BYTES {
        return Err(ImportError::TooLarge { path: file });
    }

    let content = fs::read_to_string(&file)?;
    let code = extract_code(&content);
    debug!(path = %file.display(), code = %code, "imported snippet");
    Ok(code)
}

fn choose_file(dir: &Path) -> Result<PathBuf, ImportError> {
    let preferred = dir.join(PREFERRED_FILE);
    if preferred.is_file() {
        return Ok(preferred);
    }

    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |extension| extension == "js") {
            scripts.push(path);
        }
    }

    match scripts.len() {
        0 => Err(ImportError::NoScript {
            path: dir.to_path_buf(),
        }),
        1 => Ok(scripts.remove(0)),
        _ => Err(ImportError::Ambiguous {
            path: dir.to_path_buf(),
        }),
    }
}

/// flatten snippet source into a single expression line
pub fn extract_code(content: &str) -> String {
    strip_comments(content)
        .split(['\r', '\n'])
        .map(str::trim)
        .collect()
}

/// drop `// ...` and `/* ... */` comments. quoted strings are left alone
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some('/')) => {
                // keep the newline so the lines around stay apart
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
            }
            ('"' | '\'' | '`', _) => {
                quote = Some(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
