//! Pure view-level filtering over mapped book records.

use indexmap::IndexSet;

use crate::models::{book::BookRecord, filter::FilterState};

/// Narrow `records` to those matching the filter state.
///
/// A record passes when the search term (case-insensitive) occurs in its
/// title or author display name, and its genre equals the genre filter
/// (case-insensitive). Empty criteria match everything. Order is preserved
/// and the input is left untouched.
pub fn filter_books(records: &[BookRecord], state: &FilterState) -> Vec<BookRecord> {
    let needle = state.search_term.to_lowercase();
    let genre = state.genre_filter.to_lowercase();

    records
        .iter()
        .filter(|book| {
            let matches_search = needle.is_empty()
                || book.title.to_lowercase().contains(&needle)
                || book.author_display.to_lowercase().contains(&needle);
            let matches_genre = genre.is_empty() || book.genre.to_lowercase() == genre;
            matches_search && matches_genre
        })
        .cloned()
        .collect()
}

/// Distinct genres across `records` in first-seen order, skipping empty
/// values. Used to populate the genre filter choices.
pub fn distinct_genres(records: &[BookRecord]) -> Vec<String> {
    let mut genres = IndexSet::new();
    for book in records {
        if !book.genre.is_empty() {
            genres.insert(book.genre.clone());
        }
    }
    genres.into_iter().collect()
}
