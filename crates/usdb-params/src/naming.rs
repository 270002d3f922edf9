//! Persisted identifier sanitization.
//!
//! The scene document only accepts identifiers of the form
//! `[A-Za-z_][A-Za-z0-9_]*`. Caller-chosen display names are rewritten to that
//! form by replacing every offending character with `_`:
//!
//! - the first character must be an ASCII letter or underscore (digits are
//!   replaced too),
//! - every later character must be an ASCII letter, digit, or underscore.
//!
//! The byte length never changes. A multi-byte character becomes one `_` per
//! byte, so the result is always pure ASCII.

fn is_lead(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_tail(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrite `name` in place into a legal persisted identifier.
///
/// Empty names are left untouched; callers reject them before sanitizing.
///
/// # Examples
///
/// ```
/// use usdb_params::naming::sanitize_name;
///
/// let mut name = String::from("3d grid.vdb");
/// sanitize_name(&mut name);
/// assert_eq!(name, "_d_grid_vdb");
/// ```
pub fn sanitize_name(name: &mut String) {
    debug_assert!(!name.is_empty(), "sanitize_name called with an empty name");
    if name.chars().enumerate().all(|(i, c)| if i == 0 { is_lead(c) } else { is_tail(c) }) {
        return;
    }

    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let legal = if i == 0 { is_lead(c) } else { is_tail(c) };
        if legal {
            out.push(c);
        } else {
            out.extend(std::iter::repeat('_').take(c.len_utf8()));
        }
    }
    *name = out;
}

/// Return a sanitized copy of `name`.
pub fn sanitized(name: &str) -> String {
    let mut owned = name.to_string();
    if !owned.is_empty() {
        sanitize_name(&mut owned);
    }
    owned
}

/// Returns `true` if `name` is already a legal persisted identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_lead(first) => chars.all(is_tail),
        _ => false,
    }
}
