//! Cover image links for search results.
//!
//! The Covers API accepts several identifier kinds (ISBN, OCLC, LCCN, OLID,
//! ID). Search results carry an edition OLID in `cover_edition_key`, so only
//! the `olid` kind is built here.

use url::Url;

pub const DEFAULT_COVERS_BASE: &str = "https://covers.openlibrary.org";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> char {
        match self {
            CoverSize::Small => 'S',
            CoverSize::Medium => 'M',
            CoverSize::Large => 'L',
        }
    }
}

#[derive(Clone, Debug)]
pub struct Covers {
    base: String,
}

impl Covers {
    pub fn new(base: &Url) -> Covers {
        Covers {
            base: base.as_str().trim_end_matches('/').to_owned(),
        }
    }

    pub fn url(&self, edition_key: &str, size: CoverSize) -> String {
        format!("{}/b/olid/{}-{}.jpg", self.base, edition_key, size.suffix())
    }
}

impl Default for Covers {
    fn default() -> Self {
        Covers {
            base: DEFAULT_COVERS_BASE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_and_full_size() {
        let covers = Covers::default();
        assert_eq!(
            covers.url("OL123M", CoverSize::Small),
            "https://covers.openlibrary.org/b/olid/OL123M-S.jpg"
        );
        assert_eq!(
            covers.url("OL123M", CoverSize::Large),
            "https://covers.openlibrary.org/b/olid/OL123M-L.jpg"
        );
    }

    #[test]
    fn custom_base_without_double_slash() {
        let covers = Covers::new(&Url::parse("http://127.0.0.1:9000/").unwrap());
        assert_eq!(
            covers.url("OL7M", CoverSize::Medium),
            "http://127.0.0.1:9000/b/olid/OL7M-M.jpg"
        );
    }
}
