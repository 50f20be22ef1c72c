use regex::Regex;
use std::sync::OnceLock;
use ulid::Ulid;

use crate::types::ContentType;

static NON_ALNUM: OnceLock<Regex> = OnceLock::new();

/// Generate a stable id of the form `<prefix>_<ulid>`.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new().to_string().to_lowercase())
}

pub fn new_item_id(kind: ContentType) -> String {
    new_id(kind.as_str())
}

pub fn new_module_id() -> String {
    new_id("mod")
}

pub fn new_lesson_id() -> String {
    new_id("les")
}

/// Derive a URL-safe slug from a title: lowercase, non-alphanumeric runs
/// collapsed to a single `-`, no leading or trailing dashes.
pub fn slugify(title: &str) -> String {
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap());
    let lowered = title.to_lowercase();
    let slug = re.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}
