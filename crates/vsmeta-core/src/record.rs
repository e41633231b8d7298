/// Default title used when the source document carries none.
pub const DEFAULT_TITLE: &str = "Untitled";
/// Default MPAA-style classification.
pub const DEFAULT_CONTENT_RATING: &str = "G";
/// Default premiere date.
pub const DEFAULT_RELEASE_DATE: &str = "1900-01-01";
/// Default production year.
pub const DEFAULT_YEAR: u64 = 1900;

/// Normalized movie metadata extracted from one NFO document.
///
/// Every field has a fixed default so that incomplete documents still encode
/// to a valid sidecar. The defaults are part of the output contract and must
/// not change.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub sort_title: String,
    pub tagline: String,
    pub plot: String,
    pub year: u64,
    pub content_rating: String,
    pub release_date: String,
    /// Rating on a 0-100 scale: round(rating * 10).
    pub rating_tenths: u64,
    /// List fields keep document order and duplicates.
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
}

impl Default for MovieRecord {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            sort_title: DEFAULT_TITLE.to_string(),
            tagline: DEFAULT_TITLE.to_string(),
            plot: String::new(),
            year: DEFAULT_YEAR,
            content_rating: DEFAULT_CONTENT_RATING.to_string(),
            release_date: DEFAULT_RELEASE_DATE.to_string(),
            rating_tenths: 0,
            genres: Vec::new(),
            actors: Vec::new(),
            directors: Vec::new(),
            writers: Vec::new(),
        }
    }
}
