//! NFO metadata extraction.
//!
//! Parses a Kodi-style XML document into a [`MovieRecord`]. Missing or empty
//! elements fall back to the defaults in [`crate::record`]; only malformed
//! XML is an error. Elements are matched by name at any depth (first match
//! wins for scalars, all matches collected for list fields), mirroring how
//! the format's reference scripts looked fields up.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Error;
use crate::record::{
    MovieRecord, DEFAULT_CONTENT_RATING, DEFAULT_RELEASE_DATE, DEFAULT_TITLE, DEFAULT_YEAR,
};

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Title,
    SortTitle,
    Tagline,
    Plot,
    Year,
    Mpaa,
    Premiered,
    Rating,
    Genre,
    ActorName,
    Director,
    Writer,
}

/// Raw field values as found in the document, before defaults apply.
#[derive(Default)]
struct Extracted {
    title: Option<String>,
    sort_title: Option<String>,
    tagline: Option<String>,
    plot: Option<String>,
    year: Option<String>,
    mpaa: Option<String>,
    premiered: Option<String>,
    rating: Option<String>,
    genres: Vec<String>,
    actors: Vec<String>,
    directors: Vec<String>,
    writers: Vec<String>,
}

impl Extracted {
    fn store(&mut self, field: Field, text: String) {
        if text.is_empty() {
            return;
        }
        let scalar = match field {
            Field::Title => &mut self.title,
            Field::SortTitle => &mut self.sort_title,
            Field::Tagline => &mut self.tagline,
            Field::Plot => &mut self.plot,
            Field::Year => &mut self.year,
            Field::Mpaa => &mut self.mpaa,
            Field::Premiered => &mut self.premiered,
            Field::Rating => &mut self.rating,
            Field::Genre => return self.genres.push(text),
            Field::ActorName => return self.actors.push(text),
            Field::Director => return self.directors.push(text),
            Field::Writer => return self.writers.push(text),
        };
        // First matching element in document order wins.
        if scalar.is_none() {
            *scalar = Some(text);
        }
    }

    fn into_record(self) -> MovieRecord {
        let title = self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        MovieRecord {
            sort_title: self.sort_title.unwrap_or_else(|| title.clone()),
            tagline: self.tagline.unwrap_or_else(|| title.clone()),
            plot: self.plot.unwrap_or_default(),
            year: self
                .year
                .and_then(|y| y.trim().parse().ok())
                .unwrap_or(DEFAULT_YEAR),
            content_rating: self
                .mpaa
                .unwrap_or_else(|| DEFAULT_CONTENT_RATING.to_string()),
            release_date: self
                .premiered
                .unwrap_or_else(|| DEFAULT_RELEASE_DATE.to_string()),
            rating_tenths: self
                .rating
                .and_then(|r| r.trim().parse::<f64>().ok())
                .map(|r| (r * 10.0).round() as u64)
                .unwrap_or(0),
            genres: self.genres,
            actors: self.actors,
            directors: self.directors,
            writers: self.writers,
            title,
        }
    }
}

/// Parse one NFO document into a normalized record.
///
/// Pure function over the input bytes; performs no I/O.
pub fn parse_nfo(xml: &[u8]) -> Result<MovieRecord, Error> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut extracted = Extracted::default();
    let mut current: Option<Field> = None;
    let mut in_actor = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                current = match e.name().as_ref() {
                    b"title" => Some(Field::Title),
                    b"sorttitle" => Some(Field::SortTitle),
                    b"tagline" => Some(Field::Tagline),
                    b"plot" => Some(Field::Plot),
                    b"year" => Some(Field::Year),
                    b"mpaa" => Some(Field::Mpaa),
                    b"premiered" => Some(Field::Premiered),
                    b"rating" => Some(Field::Rating),
                    b"genre" => Some(Field::Genre),
                    b"director" => Some(Field::Director),
                    b"writer" => Some(Field::Writer),
                    b"actor" => {
                        in_actor = true;
                        None
                    }
                    // Actor display names are nested: <actor><name>..</name></actor>
                    b"name" if in_actor => Some(Field::ActorName),
                    _ => None,
                };
            }
            Event::Text(t) => {
                if let Some(field) = current {
                    extracted.store(field, t.unescape()?.into_owned());
                }
            }
            Event::CData(t) => {
                if let Some(field) = current {
                    extracted.store(field, String::from_utf8_lossy(&t.into_inner()).into_owned());
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"actor" {
                    in_actor = false;
                }
                current = None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(extracted.into_record())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_NFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<movie>
  <title>Movie A</title>
  <sorttitle>A, Movie</sorttitle>
  <tagline>Catchy line</tagline>
  <plot>Something happens.</plot>
  <year>2020</year>
  <mpaa>PG-13</mpaa>
  <premiered>2020-03-14</premiered>
  <rating>7.5</rating>
  <genre>Drama</genre>
  <genre>Comedy</genre>
  <actor><name>Alice</name><role>Lead</role></actor>
  <actor><name>Bob</name></actor>
  <director>Carol</director>
  <writer>Dave</writer>
  <writer>Dave</writer>
</movie>"#;

    #[test]
    fn test_full_document() {
        let record = parse_nfo(FULL_NFO.as_bytes()).unwrap();
        assert_eq!(record.title, "Movie A");
        assert_eq!(record.sort_title, "A, Movie");
        assert_eq!(record.tagline, "Catchy line");
        assert_eq!(record.plot, "Something happens.");
        assert_eq!(record.year, 2020);
        assert_eq!(record.content_rating, "PG-13");
        assert_eq!(record.release_date, "2020-03-14");
        assert_eq!(record.rating_tenths, 75);
        assert_eq!(record.genres, vec!["Drama", "Comedy"]);
        assert_eq!(record.actors, vec!["Alice", "Bob"]);
        assert_eq!(record.directors, vec!["Carol"]);
        // Duplicates are preserved, one entry per occurrence
        assert_eq!(record.writers, vec!["Dave", "Dave"]);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let record = parse_nfo(b"<movie><title>X</title></movie>").unwrap();
        assert_eq!(record.title, "X");
        assert_eq!(record.sort_title, "X");
        assert_eq!(record.tagline, "X");
        assert_eq!(record.plot, "");
        assert_eq!(record.year, 1900);
        assert_eq!(record.content_rating, "G");
        assert_eq!(record.release_date, "1900-01-01");
        assert_eq!(record.rating_tenths, 0);
        assert!(record.genres.is_empty());
        assert!(record.actors.is_empty());
    }

    #[test]
    fn test_empty_document_gets_all_defaults() {
        let record = parse_nfo(b"<movie></movie>").unwrap();
        assert_eq!(record, MovieRecord::default());
    }

    #[test]
    fn test_empty_element_uses_default() {
        let record = parse_nfo(b"<movie><title></title><year> </year></movie>").unwrap();
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.year, 1900);
    }

    #[test]
    fn test_first_scalar_match_wins() {
        let record =
            parse_nfo(b"<movie><title>First</title><title>Second</title></movie>").unwrap();
        assert_eq!(record.title, "First");
    }

    #[test]
    fn test_name_outside_actor_is_ignored() {
        let record = parse_nfo(b"<movie><name>Nope</name><actor><name>Yes</name></actor></movie>")
            .unwrap();
        assert_eq!(record.actors, vec!["Yes"]);
    }

    #[test]
    fn test_unparsable_numbers_fall_back() {
        let record =
            parse_nfo(b"<movie><year>soon</year><rating>great</rating></movie>").unwrap();
        assert_eq!(record.year, 1900);
        assert_eq!(record.rating_tenths, 0);
    }

    #[test]
    fn test_cdata_plot() {
        let record =
            parse_nfo(b"<movie><plot><![CDATA[Spoilers &amp; more]]></plot></movie>").unwrap();
        assert_eq!(record.plot, "Spoilers &amp; more");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(parse_nfo(b"<movie><title>Broken</movie>").is_err());
    }
}
