//! flat key construction
//!
//! A structured key is an ordered list of segments, e.g. `["user", "1"]`.
//! The store only knows flat strings, so segments are joined with `:` behind
//! an optional namespace. Segments are not escaped: `["a:b"]` and `["a", "b"]`
//! flatten to the same key.

pub const KEY_SEPARATOR: &str = ":";

/// join the namespace (when present and non-empty) and the key segments
pub fn namespaced<S: AsRef<str>>(namespace: Option<&str>, key: &[S]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(key.len() + 1);
    if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
        parts.push(ns);
    }
    parts.extend(key.iter().map(|s| s.as_ref()));

    parts.join(KEY_SEPARATOR)
}
