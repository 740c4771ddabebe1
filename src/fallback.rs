//! Fallback catalog: hand-curated substitute data shown when the live store
//! is unreachable or empty.

use once_cell::sync::Lazy;
use rand::Rng;

use crate::mapper::round1;
use crate::models::{
    author::{AuthorRecord, BookRef},
    book::{BookRecord, ReviewRecord},
};

/// Comments attached to synthetically generated reviews.
const SYNTHETIC_COMMENTS: [&str; 5] = [
    "Couldn't put it down.",
    "A wonderful read from start to finish.",
    "Beautifully written, highly recommended.",
    "One of my favourites this year.",
    "Worth every page.",
];

static SAMPLE_BOOKS: Lazy<Vec<BookRecord>> = Lazy::new(|| {
    vec![
        BookRecord {
            isbn: "9780141439518".to_string(),
            title: "Pride and Prejudice".to_string(),
            author_display: "Jane Austen".to_string(),
            rating_aggregate: 4.7,
            genre: "Classic".to_string(),
            image_url: "https://images.unsplash.com/photo-1544947950-fa07a98d237f?q=80&w=1000"
                .to_string(),
            summary: "Pride and Prejudice follows the turbulent relationship between \
                      Elizabeth Bennet, the daughter of a country gentleman, and \
                      Fitzwilliam Darcy, a rich aristocratic landowner."
                .to_string(),
            author_details: None,
            reviews: vec![ReviewRecord {
                rating: Some(5),
                user_id: "demo-1".to_string(),
                comment: "A timeless classic that never fails to charm.".to_string(),
            }],
        },
        BookRecord {
            isbn: "9780061120084".to_string(),
            title: "To Kill a Mockingbird".to_string(),
            author_display: "Harper Lee".to_string(),
            rating_aggregate: 4.8,
            genre: "Fiction".to_string(),
            image_url: "https://images.unsplash.com/photo-1541963463532-d68292c34b19?q=80&w=1000"
                .to_string(),
            summary: "To Kill a Mockingbird is a novel by Harper Lee published in 1960. \
                      It was immediately successful, winning the Pulitzer Prize, and has \
                      become a classic of modern American literature."
                .to_string(),
            author_details: None,
            reviews: vec![ReviewRecord {
                rating: Some(5),
                user_id: "demo-2".to_string(),
                comment: "Profound and moving exploration of racial injustice.".to_string(),
            }],
        },
    ]
});

static SAMPLE_AUTHORS: Lazy<Vec<AuthorRecord>> = Lazy::new(|| {
    vec![
        AuthorRecord {
            id: 1,
            name: "Jane Austen".to_string(),
            contact_details: "jane.austen@example.com".to_string(),
            books: vec![
                BookRef {
                    isbn: "9780141439518".to_string(),
                    title: "Pride and Prejudice".to_string(),
                },
                BookRef {
                    isbn: "9780141439662".to_string(),
                    title: "Emma".to_string(),
                },
            ],
        },
        AuthorRecord {
            id: 2,
            name: "Harper Lee".to_string(),
            contact_details: "harper.lee@example.com".to_string(),
            books: vec![BookRef {
                isbn: "9780061120084".to_string(),
                title: "To Kill a Mockingbird".to_string(),
            }],
        },
        AuthorRecord {
            id: 3,
            name: "George Orwell".to_string(),
            contact_details: "george.orwell@example.com".to_string(),
            books: vec![
                BookRef {
                    isbn: "9780451524935".to_string(),
                    title: "1984".to_string(),
                },
                BookRef {
                    isbn: "9780452284241".to_string(),
                    title: "Animal Farm".to_string(),
                },
            ],
        },
    ]
});

/// Fixed sample books, logically equal on every call.
pub fn sample_books() -> Vec<BookRecord> {
    SAMPLE_BOOKS.clone()
}

/// Fixed sample authors, logically equal on every call.
pub fn sample_authors() -> Vec<AuthorRecord> {
    SAMPLE_AUTHORS.clone()
}

/// Sample books with 1 to 3 synthetic reviews per book, attributed to ids
/// from `user_ids`. Ratings are uniform in 3..=5 and the aggregate is
/// recomputed from them. The random source is injected so property tests can
/// seed it.
pub fn sample_books_with_synthetic_reviews<R: Rng + ?Sized>(
    user_ids: &[String],
    rng: &mut R,
) -> Vec<BookRecord> {
    if user_ids.is_empty() {
        return sample_books();
    }

    sample_books()
        .into_iter()
        .map(|mut book| {
            let count = rng.gen_range(1..=3);
            let reviews: Vec<ReviewRecord> = (0..count)
                .map(|_| ReviewRecord {
                    rating: Some(rng.gen_range(3..=5)),
                    user_id: user_ids[rng.gen_range(0..user_ids.len())].clone(),
                    comment: SYNTHETIC_COMMENTS[rng.gen_range(0..SYNTHETIC_COMMENTS.len())]
                        .to_string(),
                })
                .collect();

            let sum: i32 = reviews.iter().filter_map(|r| r.rating).sum();
            book.rating_aggregate = round1(f64::from(sum) / reviews.len() as f64);
            book.reviews = reviews;
            book
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_books_are_stable() {
        assert_eq!(sample_books(), sample_books());
        assert_eq!(sample_authors(), sample_authors());

        let books = sample_books();
        assert_eq!(books[0].isbn, "9780141439518");
        assert_eq!(books[1].isbn, "9780061120084");
    }

    #[test]
    fn test_sample_ratings_in_range() {
        for book in sample_books() {
            assert!((0.0..=5.0).contains(&book.rating_aggregate));
        }
    }

    #[test]
    fn test_synthetic_reviews_hold_invariants() {
        let user_ids = vec!["u1".to_string(), "u2".to_string()];
        let mut rng = StdRng::seed_from_u64(42);
        for book in sample_books_with_synthetic_reviews(&user_ids, &mut rng) {
            assert!((1..=3).contains(&book.reviews.len()));
            for review in &book.reviews {
                let rating = review.rating.unwrap();
                assert!((3..=5).contains(&rating));
                assert!(user_ids.contains(&review.user_id));
                assert!(SYNTHETIC_COMMENTS.contains(&review.comment.as_str()));
            }
            assert!((3.0..=5.0).contains(&book.rating_aggregate));
        }
    }

    #[test]
    fn test_synthetic_reviews_need_a_user_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let books = sample_books_with_synthetic_reviews(&[], &mut rng);
        assert_eq!(books, sample_books());
    }
}
