//! Option filtering for autocomplete fields.

/// Rank of a matching option: exact before prefix before substring.
fn match_rank(option_lower: &str, query_lower: &str) -> u8 {
    if option_lower == query_lower {
        0
    } else if option_lower.starts_with(query_lower) {
        1
    } else {
        2
    }
}

/// Filter `options` by a case-insensitive substring match on `query`.
///
/// A blank query returns every option in its original order. Otherwise the
/// matches are ordered exact match first, then prefix matches, then the rest.
/// The sort is stable, so each group keeps the original relative order.
pub fn filter_options<'a, S: AsRef<str>>(query: &str, options: &'a [S]) -> Vec<&'a str> {
    if query.trim().is_empty() {
        return options.iter().map(|o| o.as_ref()).collect();
    }
    let query_lower = query.to_lowercase();
    let mut ranked: Vec<(u8, &'a str)> = options
        .iter()
        .map(|o| o.as_ref())
        .filter_map(|o| {
            let lower = o.to_lowercase();
            lower
                .contains(&query_lower)
                .then(|| (match_rank(&lower, &query_lower), o))
        })
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, o)| o).collect()
}

/// The option equal to the trimmed `query` ignoring case, in its canonical casing.
pub fn exact_match<'a, S: AsRef<str>>(query: &str, options: &'a [S]) -> Option<&'a str> {
    let wanted = query.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    options
        .iter()
        .map(|o| o.as_ref())
        .find(|o| o.to_lowercase() == wanted)
}
