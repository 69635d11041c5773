/// Name used when a snippet has no usable name of its own.
pub const DEFAULT_SNIPPET_NAME: &str = "New Snippet";

/// Derive a display name that does not collide with any of `existing`.
///
/// The base name is trimmed (and defaulted to [`DEFAULT_SNIPPET_NAME`] when
/// blank) and optionally extended with `" - {suffix}"`. If neither the base
/// name nor that candidate is taken, the candidate is returned as is.
/// Otherwise every existing name sharing the base name as a prefix is scanned
/// for a trailing number, and the candidate gets `" - {max + 1}"` appended.
/// A prefix match without a number counts as 0, so the counter starts at 1.
/// The counter is bumped past any name that is still taken.
///
/// Names are compared trimmed and case-sensitively.
pub fn resolve_unique_name<'a, I>(existing: I, base_name: &str, suffix: Option<&str>) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let base = match base_name.trim() {
        "" => DEFAULT_SNIPPET_NAME,
        trimmed => trimmed,
    };

    let mut candidate = base.to_string();
    if let Some(suffix) = suffix.map(str::trim).filter(|s| !s.is_empty()) {
        candidate.push_str(" - ");
        candidate.push_str(suffix);
    }

    let names: Vec<&str> = existing.into_iter().map(str::trim).collect();
    if !names.contains(&base) && !names.contains(&candidate.as_str()) {
        return candidate;
    }

    // Numbers at u64::MAX cannot be followed and are left out of the max.
    let mut next = names
        .iter()
        .filter(|name| name.starts_with(base))
        .filter_map(|name| match trailing_number(name) {
            Some(n) => n.checked_add(1),
            None => Some(1),
        })
        .max()
        .unwrap_or(1);

    loop {
        let name = format!("{} - {}", candidate, next);
        if !names.contains(&name.as_str()) {
            return name;
        }
        next = next.checked_add(1).unwrap_or(1);
    }
}

/// Trailing run of digits, optionally wrapped in parentheses: "Foo - 3", "Foo (3)".
fn trailing_number(name: &str) -> Option<u64> {
    let body = name.strip_suffix(')').unwrap_or(name);
    let digits = &body[body.trim_end_matches(|c: char| c.is_ascii_digit()).len()..];
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
