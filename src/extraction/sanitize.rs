const SITE_SUFFIX: &str = "- ImagePond";
const ILLEGAL: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Turn a page or album title into something safe to use as a directory name.
/// Falls back to `fallback` when nothing usable is left.
pub fn sanitize(raw: &str, fallback: &str) -> String {
    let stripped = raw.replace(SITE_SUFFIX, "");
    let replaced: String = stripped
        .trim()
        .chars()
        .map(|c| if ILLEGAL.contains(&c) { '_' } else { c })
        .collect();
    let out = replaced.trim_matches(|c| c == '.' || c == ' ');
    if out.is_empty() { fallback.to_string() } else { out.to_string() }
}
