//! Standard CSS fallbacks for JavaFX `-fx-` declarations.
//!
//! Every `-fx-<prop>: <value>;` found for a known property gets a
//! `<prop>: <value>; ` declaration inserted right before it. The vendor
//! declaration is kept. Insertion is skipped when the same fallback already
//! precedes it, so re-running over a fixed file changes nothing. Values
//! holding a quoted `;` are not rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};

/// Properties that receive a fallback, longest names first.
pub const FALLBACK_PROPERTIES: [&str; 11] = [
    "background-color",
    "border-color",
    "border-width",
    "border-radius",
    "font-size",
    "font-weight",
    "font-family",
    "background",
    "padding",
    "cursor",
    "opacity",
];

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    let alternatives = FALLBACK_PROPERTIES.join("|");
    Regex::new(&format!(r"-fx-({})\s*:\s*([^;{{}}]*?)\s*;", alternatives))
        .expect("Failed to compile declaration pattern")
});

static BARE_INTEGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d+$").expect("Failed to compile integer pattern")
});

#[derive(Debug, Default)]
pub struct CssFixReport {
    pub scanned: usize,
    pub modified: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Space-separated bare integers gain a `px` unit.
pub fn padding_to_px(value: &str) -> String {
    value
        .split_whitespace()
        .map(|token| {
            if BARE_INTEGER.is_match(token) {
                format!("{}px", token)
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fallback_for(property: &str, value: &str) -> String {
    let value = if property == "padding" {
        padding_to_px(value)
    } else {
        value.to_string()
    };
    format!("{}: {}; ", property, value)
}

pub fn fix_css_content(content: &str) -> String {
    let mut output = String::with_capacity(content.len() + content.len() / 4);
    let mut last = 0;

    for caps in DECLARATION.captures_iter(content) {
        let declaration = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        // part of a longer identifier such as `my-fx-padding`
        let glued = content[..declaration.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-');
        // the value stopped at a `;` inside a quoted string
        let value = &caps[2];
        let unbalanced = value.matches('"').count() % 2 == 1 || value.matches('\'').count() % 2 == 1;
        if glued || unbalanced {
            continue;
        }
        let fallback = fallback_for(&caps[1], &caps[2]);

        output.push_str(&content[last..declaration.start()]);
        if !output.ends_with(&fallback) {
            output.push_str(&fallback);
        }
        output.push_str(declaration.as_str());
        last = declaration.end();
    }

    output.push_str(&content[last..]);
    output
}

/// Rewrites `path` in place. Returns whether the file changed.
pub fn fix_css_file(path: &Path) -> Result<bool> {
    let original = fs::read_to_string(path)?;
    let fixed = fix_css_content(&original);
    if fixed == original {
        debug!(path = %path.display(), "already up to date");
        return Ok(false);
    }
    fs::write(path, fixed)?;
    Ok(true)
}

/// Fixes every `*.css` file below `root`, continuing past per-file failures.
pub fn fix_css_dir(root: &Path) -> Result<CssFixReport> {
    if !root.is_dir() {
        return Err(AppError::ValidationError(format!("{} is not a directory", root.display())));
    }

    let pattern = format!("{}/**/*.css", glob::Pattern::escape(&root.to_string_lossy()));
    let entries = glob::glob(&pattern)
        .map_err(|e| AppError::ValidationError(format!("bad path pattern {}: {}", pattern, e)))?;

    let mut report = CssFixReport::default();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "unreadable entry");
                report.errors.push((e.path().to_path_buf(), e.to_string()));
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }

        report.scanned += 1;
        match fix_css_file(&path) {
            Ok(true) => {
                info!(path = %path.display(), "fallbacks added");
                report.modified.push(path);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not fix stylesheet");
                report.errors.push((path, e.to_string()));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_fallback_precedes_vendor_declaration() {
        let fixed = fix_css_content(".button {\n    -fx-padding: 8 16;\n}\n");
        assert!(fixed.contains("padding: 8px 16px; -fx-padding: 8 16;"));
        assert_eq!(fixed, ".button {\n    padding: 8px 16px; -fx-padding: 8 16;\n}\n");
    }

    #[test]
    fn padding_keeps_non_numeric_tokens() {
        assert_eq!(padding_to_px("4 2em 0 auto"), "4px 2em 0px auto");
        assert_eq!(padding_to_px("10px"), "10px");
    }

    #[test]
    fn each_property_is_copied_verbatim() {
        let fixed = fix_css_content(".a { -fx-background-color: #2c3e50; -fx-cursor: hand; -fx-font-family: \"Segoe UI\"; }");
        assert_eq!(
            fixed,
            ".a { background-color: #2c3e50; -fx-background-color: #2c3e50; cursor: hand; -fx-cursor: hand; font-family: \"Segoe UI\"; -fx-font-family: \"Segoe UI\"; }"
        );
    }

    #[test]
    fn background_does_not_swallow_longer_properties() {
        let fixed = fix_css_content(".a { -fx-background: white; -fx-background-radius: 4; }");
        assert_eq!(fixed, ".a { background: white; -fx-background: white; -fx-background-radius: 4; }");
    }

    #[test]
    fn unknown_properties_are_left_alone() {
        let css = ".a { -fx-text-fill: red; -fx-effect: dropshadow(gaussian, black, 4, 0, 0, 0); }";
        assert_eq!(fix_css_content(css), css);
    }

    #[test]
    fn adjacent_declarations_all_get_fallbacks() {
        let fixed = fix_css_content(".a{-fx-opacity:0.5;-fx-cursor:hand;}");
        assert_eq!(fixed, ".a{opacity: 0.5; -fx-opacity:0.5;cursor: hand; -fx-cursor:hand;}");
    }

    #[test]
    fn quoted_semicolons_are_left_alone() {
        let css = ".a { -fx-font-family: \"A;B\"; -fx-opacity: 1; }";
        assert_eq!(fix_css_content(css), ".a { -fx-font-family: \"A;B\"; opacity: 1; -fx-opacity: 1; }");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let once = fix_css_content(".a {\n  -fx-padding: 8 16;\n  -fx-opacity: 0.8;\n}\n");
        assert_eq!(fix_css_content(&once), once);
    }
}
