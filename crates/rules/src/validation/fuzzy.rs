//! Closest-candidate lookup for category suggestions.

/// Pick the candidate with the smallest case-insensitive edit distance to
/// `input`. Ties keep the earlier candidate. No suggestion is made when the
/// distance exceeds half the longer of the two strings.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let needle = input.to_lowercase();
    let (candidate, distance) = candidates
        .iter()
        .map(|&c| (c, levenshtein(&needle, &c.to_lowercase())))
        .min_by_key(|&(_, distance)| distance)?;

    let limit = input.chars().count().max(candidate.chars().count()) / 2;
    (distance <= limit).then_some(candidate)
}

/// Edit distance counting single-character inserts, deletes and substitutions.
fn levenshtein(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    // row[j]: distance between the prefix of `a` seen so far and target[..j]
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in target.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[target.len()]
}
