use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_SLUG_LENGTH: usize = 200;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("Invalid slug character pattern"));
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_-]+").expect("Invalid slug separator pattern"));

/// Turns a title into a URL-safe slug. May return an empty string when the
/// title has no word characters at all.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&stripped, "-");
    let slug = joined.trim_matches('-');

    if slug.chars().count() > MAX_SLUG_LENGTH {
        let truncated: String = slug.chars().take(MAX_SLUG_LENGTH).collect();
        truncated.trim_end_matches('-').to_string()
    } else {
        slug.to_string()
    }
}

/// Returns `base` if it is free, otherwise the first free `base-N` for
/// N = 2, 3, ... The base is shortened when needed so the result never
/// exceeds [`MAX_SLUG_LENGTH`] characters; the numeric suffix is kept whole.
pub fn ensure_unique_slug<F>(base: &str, mut exists: F) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    if !exists(base)? {
        return Ok(base.to_string());
    }

    let base_len = base.chars().count();
    let mut counter: u64 = 2;
    loop {
        let suffix = format!("-{}", counter);
        let candidate = if base_len + suffix.len() > MAX_SLUG_LENGTH {
            let keep = MAX_SLUG_LENGTH.saturating_sub(suffix.len());
            let head: String = base.chars().take(keep).collect();
            head + &suffix
        } else {
            format!("{}{}", base, suffix)
        };

        if !exists(&candidate)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}
