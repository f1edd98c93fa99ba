/// Pick the first candidate that is present and non-empty.
///
/// The title, agent-label and baseline-cost resolutions are all "ordered list
/// of sources, first usable one wins". Expressing the order as a literal
/// slice keeps it visible at the call site and testable on its own.
pub fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
}

/// Variant for decimal-string money fields: the candidate must also parse to a
/// non-zero number, so an explicit `"0"` baseline falls through the chain.
pub fn first_non_zero_amount<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| matches!(s.parse::<f64>(), Ok(v) if v != 0.0))
}
