/// Lower-cased, trimmed search term; `None` when there is nothing to match.
pub fn normalize_term(query: Option<&str>) -> Option<String> {
    query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
}

/// Case-insensitive substring match against any of `fields`.
pub fn matches_term(term: &str, fields: &[&str]) -> bool {
    fields.iter().any(|field| field.to_lowercase().contains(term))
}

/// Keeps the rows whose projected fields contain `query`. No query keeps everything.
pub fn filter_rows<T, F>(rows: Vec<T>, query: Option<&str>, fields: F) -> Vec<T>
where
    F: Fn(&T) -> Vec<&str>,
{
    match normalize_term(query) {
        None => rows,
        Some(term) => rows
            .into_iter()
            .filter(|row| matches_term(&term, &fields(row)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_keeps_all() {
        let rows = vec!["alpha", "beta"];
        assert_eq!(filter_rows(rows.clone(), None, |r| vec![*r]), rows);
        assert_eq!(filter_rows(rows.clone(), Some("   "), |r| vec![*r]), rows);
    }

    #[test]
    fn matches_any_field_ignoring_case() {
        let rows = vec![("Rust Ledger", "fast"), ("Garden", "A RUSTIC site"), ("Other", "none")];
        let hits = filter_rows(rows, Some("rust"), |r| vec![r.0, r.1]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].0, "Garden");
    }
}
