//! Wire types for the catalog's volume JSON, and their mapping into
//! [`Book`].
//!
//! Only the fields the application renders are decoded; the catalog sends
//! far more. Unknown fields are ignored by serde's default behavior.

use serde::Deserialize;
use shelf_core::{Book, VolumeId};

/// Response envelope for `GET /volumes?q=…`. An absent `items` array means
/// zero results, not an error.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
  #[serde(default)]
  pub items: Option<Vec<VolumeDto>>,
}

impl SearchResponse {
  pub fn into_books(self) -> Vec<Book> {
    self
      .items
      .unwrap_or_default()
      .into_iter()
      .map(VolumeDto::into_book)
      .collect()
  }
}

/// One volume as the catalog serves it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDto {
  pub id:          String,
  #[serde(default)]
  pub volume_info: VolumeInfoDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfoDto {
  #[serde(default)]
  pub title:          String,
  #[serde(default)]
  pub authors:        Vec<String>,
  pub publisher:      Option<String>,
  pub published_date: Option<String>,
  pub description:    Option<String>,
  pub page_count:     Option<u32>,
  #[serde(default)]
  pub categories:     Vec<String>,
  pub average_rating: Option<f64>,
  pub ratings_count:  Option<u32>,
  pub image_links:    Option<ImageLinksDto>,
  pub language:       Option<String>,
  pub preview_link:   Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinksDto {
  pub small_thumbnail: Option<String>,
  pub thumbnail:       Option<String>,
  pub small:           Option<String>,
  pub medium:          Option<String>,
}

impl ImageLinksDto {
  /// Pick the best available cover, preferring larger renditions.
  fn best(self) -> Option<String> {
    self
      .medium
      .or(self.small)
      .or(self.thumbnail)
      .or(self.small_thumbnail)
  }
}

impl VolumeDto {
  pub fn into_book(self) -> Book {
    let info = self.volume_info;
    Book {
      id:             VolumeId::new(self.id),
      title:          info.title,
      authors:        info.authors,
      publisher:      info.publisher,
      published_date: info.published_date,
      description:    info.description,
      page_count:     info.page_count,
      categories:     info.categories,
      thumbnail:      info.image_links.and_then(ImageLinksDto::best),
      language:       info.language,
      average_rating: info.average_rating,
      ratings_count:  info.ratings_count,
      preview_link:   info.preview_link,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn volume_json() -> serde_json::Value {
    serde_json::json!({
      "kind": "books#volume",
      "id": "zyTCAlFPjgYC",
      "etag": "f0zKg75Mx/I",
      "volumeInfo": {
        "title": "The Google Story",
        "authors": ["David A. Vise", "Mark Malseed"],
        "publisher": "Random House Digital, Inc.",
        "publishedDate": "2005-11-15",
        "description": "Here is the story behind one of the most remarkable Internet successes of our time.",
        "pageCount": 207,
        "categories": ["Business & Economics"],
        "averageRating": 3.5,
        "ratingsCount": 136,
        "imageLinks": {
          "smallThumbnail": "http://books.example/small",
          "thumbnail": "http://books.example/thumb"
        },
        "language": "en",
        "previewLink": "http://books.example/preview"
      }
    })
  }

  #[test]
  fn decodes_full_volume() {
    let dto: VolumeDto = serde_json::from_value(volume_json()).unwrap();
    let book = dto.into_book();
    assert_eq!(book.id.as_str(), "zyTCAlFPjgYC");
    assert_eq!(book.title, "The Google Story");
    assert_eq!(book.authors.len(), 2);
    assert_eq!(book.page_count, Some(207));
    // No medium/small rendition, so thumbnail wins.
    assert_eq!(book.thumbnail.as_deref(), Some("http://books.example/thumb"));
    assert_eq!(book.average_rating, Some(3.5));
  }

  #[test]
  fn decodes_sparse_volume() {
    let dto: VolumeDto =
      serde_json::from_value(serde_json::json!({ "id": "x1" })).unwrap();
    let book = dto.into_book();
    assert_eq!(book.id.as_str(), "x1");
    assert_eq!(book.title, "");
    assert!(book.authors.is_empty());
    assert!(book.thumbnail.is_none());
  }

  #[test]
  fn search_response_without_items_is_empty() {
    let resp: SearchResponse =
      serde_json::from_value(serde_json::json!({ "totalItems": 0 })).unwrap();
    assert!(resp.into_books().is_empty());
  }

  #[test]
  fn image_links_prefer_larger_renditions() {
    let links = ImageLinksDto {
      small_thumbnail: Some("st".into()),
      thumbnail:       Some("t".into()),
      small:           Some("s".into()),
      medium:          Some("m".into()),
    };
    assert_eq!(links.best().as_deref(), Some("m"));
  }
}
