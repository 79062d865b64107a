use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALNUM_RUN: Regex = Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex");
    static ref NAME_PUNCTUATION_RUN: Regex =
        Regex::new(r#"[\s@_!#$%^&*()<>?/\\|}{~:`',]+"#).expect("Invalid name slug regex");
    static ref DASH_RUN: Regex = Regex::new(r"-+").expect("Invalid dash regex");
}

/// Identifier-safe slug: lowercased, runs of anything but `[a-z0-9]`
/// collapsed to a single `_`, no leading or trailing `_`.
///
/// `slugify(slugify(x)) == slugify(x)` for every input.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// File-name slug that keeps case: whitespace and punctuation runs become `-`
pub fn slugify_name(text: &str) -> String {
    let replaced = NAME_PUNCTUATION_RUN.replace_all(text.trim(), "-");
    DASH_RUN
        .replace_all(&replaced, "-")
        .trim_matches('-')
        .to_string()
}

/// Quote `value` as an HCL string literal.
///
/// JSON escaping covers quotes, backslashes and control characters; template
/// sequences are doubled so `${` and `%{` stay literal text.
pub fn hcl_string(value: &str) -> String {
    let quoted = serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value));
    quoted.replace("${", "$${").replace("%{", "%%{")
}
