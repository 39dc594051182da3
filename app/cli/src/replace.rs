//! Sed-style line rewriting applied before block construction.
//!
//! A pure transform: `apply` never touches the originals it is handed and a
//! malformed script fails the whole call before anything can execute.

use anyhow::Context;
use anyhow::bail;
use regex::Regex;

/// Apply substitution scripts of the form `s<d>pattern<d>replacement<d>[flags]`
/// to every line, in script order.
///
/// The delimiter `<d>` is whatever character follows `s`. Supported flags:
/// `g` (replace all occurrences) and `i` (case-insensitive). Replacements
/// use the regex crate's `$N`/`${name}` capture syntax.
pub fn apply(scripts: &[String], lines: Vec<String>) -> anyhow::Result<Vec<String>> {
    let mut compiled = Vec::with_capacity(scripts.len());
    for script in scripts {
        compiled.push(
            Substitution::parse(script)
                .with_context(|| format!("failed to compile replace script {script:?}"))?,
        );
    }

    let mut lines = lines;
    for sub in &compiled {
        for line in &mut lines {
            *line = sub.run(line);
        }
    }
    Ok(lines)
}

#[derive(Debug)]
struct Substitution {
    pattern: Regex,
    replacement: String,
    global: bool,
}

impl Substitution {
    fn parse(script: &str) -> anyhow::Result<Self> {
        let mut chars = script.chars();
        if chars.next() != Some('s') {
            bail!("script must start with `s`");
        }
        let Some(delim) = chars.next() else {
            bail!("script is missing a delimiter");
        };

        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut escaped = false;
        for c in chars {
            if escaped {
                // Keep the backslash for anything but an escaped delimiter,
                // so regex escapes like `\d` survive.
                if c != delim {
                    current.push('\\');
                }
                current.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == delim {
                parts.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }
        parts.push(current);

        if parts.len() != 3 {
            bail!("expected `s{delim}pattern{delim}replacement{delim}[flags]`");
        }
        let flags = &parts[2];
        if let Some(bad) = flags.chars().find(|c| !matches!(c, 'g' | 'i')) {
            bail!("unsupported flag {bad:?}");
        }

        let mut pattern = parts[0].clone();
        if flags.contains('i') {
            pattern = format!("(?i){pattern}");
        }

        Ok(Self {
            pattern: Regex::new(&pattern)?,
            replacement: parts[1].clone(),
            global: flags.contains('g'),
        })
    }

    fn run(&self, line: &str) -> String {
        if self.global {
            self.pattern
                .replace_all(line, self.replacement.as_str())
                .into_owned()
        } else {
            self.pattern
                .replace(line, self.replacement.as_str())
                .into_owned()
        }
    }
}

#[cfg(test)]
#[path = "replace.test.rs"]
mod tests;
