//! Pure dashboard derivations.
//!
//! Everything here recomputes from snapshots of the other components and
//! holds no state: the same inputs always derive the same view. Entries
//! whose book has not resolved yet are silently omitted and reappear once
//! resolution completes — views degrade, they never error.

use std::{collections::HashSet, fmt, sync::Arc};

use shelf_core::{Book, Review, Shelf, ShelfSets, VolumeId};

/// Summary statistics over all reviews visible to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewStats {
  pub review_count:   usize,
  /// Arithmetic mean rounded to one decimal place; `None` with zero
  /// reviews (rendered as the `—` sentinel, never NaN).
  pub average_rating: Option<f64>,
}

impl fmt::Display for ReviewStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.average_rating {
      Some(avg) => write!(f, "{} reviews, avg {avg:.1}", self.review_count),
      None => write!(f, "{} reviews, avg —", self.review_count),
    }
  }
}

/// One entry in the recent-activity feed: a review joined with its
/// resolved book.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
  pub review: Review,
  pub book:   Arc<Book>,
}

/// Union of every volume id on any shelf plus every reviewed volume, in
/// shelf-then-review order, deduped. This is the set the resolver is asked
/// to materialize for the dashboard.
pub fn referenced_ids(sets: &ShelfSets, reviews: &[Review]) -> Vec<VolumeId> {
  let mut out = sets.all_ids();
  let mut seen: HashSet<VolumeId> = out.iter().cloned().collect();
  for review in reviews {
    if seen.insert(review.volume_id.clone()) {
      out.push(review.volume_id.clone());
    }
  }
  out
}

/// Review count and mean rating over `reviews`.
pub fn statistics(reviews: &[Review]) -> ReviewStats {
  let review_count = reviews.len();
  let average_rating = if review_count == 0 {
    None
  } else {
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating.get())).sum();
    let mean = f64::from(sum) / review_count as f64;
    Some((mean * 10.0).round() / 10.0)
  };
  ReviewStats { review_count, average_rating }
}

/// The `limit` most recent reviews (creation time descending) that have a
/// resolved book. Unresolved entries are excluded outright rather than
/// shown partially.
pub fn recent_activity(
  reviews: &[Review],
  limit: usize,
  lookup: impl Fn(&VolumeId) -> Option<Arc<Book>>,
) -> Vec<ActivityEntry> {
  let mut ordered: Vec<&Review> = reviews.iter().collect();
  ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  ordered
    .into_iter()
    .filter_map(|review| {
      lookup(&review.volume_id)
        .map(|book| ActivityEntry { review: review.clone(), book })
    })
    .take(limit)
    .collect()
}

/// Resolved books for every current member of `shelf`, in insertion
/// order; unresolved members are omitted until they resolve.
pub fn shelf_view(
  sets: &ShelfSets,
  shelf: Shelf,
  lookup: impl Fn(&VolumeId) -> Option<Arc<Book>>,
) -> Vec<Arc<Book>> {
  sets.ids(shelf).iter().filter_map(|id| lookup(id)).collect()
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};
  use shelf_core::Rating;

  use super::*;

  fn review(volume: &str, rating: u8, age_secs: i64) -> Review {
    let mut r = Review::new(
      "u1".into(),
      volume.into(),
      Rating::new(rating).unwrap(),
      None,
    );
    r.created_at = Utc::now() - Duration::seconds(age_secs);
    r
  }

  fn book(id: &str) -> Arc<Book> {
    Arc::new(Book {
      id:             id.into(),
      title:          format!("Book {id}"),
      authors:        vec![],
      publisher:      None,
      published_date: None,
      description:    None,
      page_count:     None,
      categories:     vec![],
      thumbnail:      None,
      language:       None,
      average_rating: None,
      ratings_count:  None,
      preview_link:   None,
    })
  }

  #[test]
  fn statistics_mean_is_rounded_to_one_decimal() {
    let reviews = vec![review("a", 5, 0), review("b", 4, 0), review("c", 4, 0)];
    let stats = statistics(&reviews);
    assert_eq!(stats.review_count, 3);
    // 13 / 3 = 4.333… → 4.3
    assert_eq!(stats.average_rating, Some(4.3));
  }

  #[test]
  fn statistics_empty_uses_sentinel_not_nan() {
    let stats = statistics(&[]);
    assert_eq!(stats.review_count, 0);
    assert_eq!(stats.average_rating, None);
    assert_eq!(stats.to_string(), "0 reviews, avg —");
  }

  #[test]
  fn recent_activity_orders_limits_and_skips_unresolved() {
    let reviews = vec![
      review("a", 5, 300),
      review("b", 3, 100),
      review("c", 4, 200),
      review("d", 2, 50),
      review("e", 1, 10),
    ];
    // "c" never resolves.
    let resolved = |id: &VolumeId| {
      (id.as_str() != "c").then(|| book(id.as_str()))
    };

    let activity = recent_activity(&reviews, 4, resolved);
    assert_eq!(activity.len(), 4);
    let ids: Vec<&str> =
      activity.iter().map(|e| e.review.volume_id.as_str()).collect();
    assert_eq!(ids, vec!["e", "d", "b", "a"]);
    for pair in activity.windows(2) {
      assert!(pair[0].review.created_at >= pair[1].review.created_at);
    }
  }

  #[test]
  fn referenced_ids_unions_shelves_and_reviews() {
    let mut sets = ShelfSets::default();
    sets.insert(Shelf::Favorites, "a".into());
    sets.insert(Shelf::Read, "b".into());
    let reviews = vec![review("b", 4, 0), review("c", 2, 0)];

    let ids = referenced_ids(&sets, &reviews);
    assert_eq!(ids, vec!["a".into(), "b".into(), "c".into()]);
  }

  #[test]
  fn shelf_view_preserves_insertion_order_and_skips_unresolved() {
    let mut sets = ShelfSets::default();
    sets.insert(Shelf::Wishlist, "x".into());
    sets.insert(Shelf::Wishlist, "y".into());
    sets.insert(Shelf::Wishlist, "z".into());
    let resolved =
      |id: &VolumeId| (id.as_str() != "y").then(|| book(id.as_str()));

    let view = shelf_view(&sets, Shelf::Wishlist, resolved);
    let ids: Vec<&str> = view.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["x", "z"]);
  }
}
