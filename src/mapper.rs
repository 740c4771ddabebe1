//! Aggregate mapper: raw nested store rows to flat view models.
//!
//! Every function here is pure and total on well-typed input; absent fields
//! are replaced by documented defaults, never raised as errors.

use crate::models::{
    author::{AuthorRecord, BookRef, RawAuthorRow},
    book::{BookRecord, RawBookRow, RawReviewRow, ReviewRecord},
};

/// Aggregate rating used when a row has neither rated reviews nor a stored
/// rating of its own.
pub const DEFAULT_RATING: f64 = 0.0;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_ISBN: &str = "Unknown ISBN";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_SUMMARY: &str = "No summary available.";
pub const NO_COMMENT: &str = "No comment provided.";
pub const NO_CONTACT_DETAILS: &str = "No contact details";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Fixed palette of placeholder cover images. Selection is a pure function of
/// the ISBN, so the same ISBN always renders the same cover.
pub const PLACEHOLDER_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1543002588-bfa74002ed7e",
    "https://images.unsplash.com/photo-1544947950-fa07a98d237f",
    "https://images.unsplash.com/photo-1546521343-4eb2c01aa44b",
    "https://images.unsplash.com/photo-1512820790803-83ca734da794",
    "https://images.unsplash.com/photo-1532012197267-da84d127e765",
    "https://images.unsplash.com/photo-1495446815901-a7297e633e8d",
];

/// Stable placeholder cover for a book without an `image_url`.
pub fn placeholder_image(isbn: &str) -> &'static str {
    let sum: usize = isbn.bytes().map(usize::from).sum();
    PLACEHOLDER_IMAGES[sum % PLACEHOLDER_IMAGES.len()]
}

/// Round to one decimal place, the display precision for ratings.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Map one raw book row into a flat [`BookRecord`].
pub fn map_book(raw: RawBookRow) -> BookRecord {
    let names: Vec<&str> = raw
        .author_book
        .iter()
        .filter_map(|assoc| assoc.author.as_ref())
        .map(|author| author.name.as_str())
        .collect();
    let author_display = if names.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        names.join(", ")
    };

    let rated: Vec<i32> = raw.books_read.iter().filter_map(|r| r.rating).collect();
    let rating_aggregate = if rated.is_empty() {
        raw.rating.unwrap_or(DEFAULT_RATING)
    } else {
        round1(rated.iter().sum::<i32>() as f64 / rated.len() as f64)
    }
    .clamp(0.0, 5.0);

    let image_url = match raw.image_url {
        Some(url) if !url.is_empty() => url,
        _ => placeholder_image(&raw.isbn).to_string(),
    };

    let author_details = raw.author_book.first().and_then(|assoc| assoc.author.clone());

    BookRecord {
        title: raw.name,
        author_display,
        rating_aggregate,
        genre: raw.genre.unwrap_or_else(|| UNCATEGORIZED.to_string()),
        image_url,
        summary: raw.summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
        author_details,
        reviews: raw.books_read.into_iter().map(map_review).collect(),
        isbn: raw.isbn,
    }
}

/// Map one raw review row into a [`ReviewRecord`].
pub fn map_review(raw: RawReviewRow) -> ReviewRecord {
    ReviewRecord {
        rating: raw.rating,
        user_id: raw.user_id,
        comment: raw.comment.unwrap_or_else(|| NO_COMMENT.to_string()),
    }
}

/// Map one raw author row into a flat [`AuthorRecord`].
pub fn map_author(raw: RawAuthorRow) -> AuthorRecord {
    AuthorRecord {
        id: raw.id,
        name: raw.name,
        contact_details: raw
            .contact_details
            .unwrap_or_else(|| NO_CONTACT_DETAILS.to_string()),
        books: raw
            .author_book
            .into_iter()
            .map(|assoc| {
                let book = assoc.book;
                BookRef {
                    isbn: book
                        .as_ref()
                        .and_then(|b| b.isbn.clone())
                        .unwrap_or_else(|| UNKNOWN_ISBN.to_string()),
                    title: book
                        .and_then(|b| b.name)
                        .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                }
            })
            .collect(),
    }
}
