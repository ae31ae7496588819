//! Track records as read from catalog exports
//!
//! A catalog export is a JSON array of flat objects, one per track. Three
//! keys have a fixed meaning (each accepts the column spellings used by the
//! common catalog datasets):
//!
//! | Field     | Accepted keys                     |
//! |-----------|-----------------------------------|
//! | `year`    | `year`, `Year`                    |
//! | `genre`   | `genre`, `Genre`, `top genre`     |
//! | `country` | `country`, `Country`              |
//!
//! Every other key is kept in [`TrackRecord::fields`]; numeric ones are
//! available to the correlation pipeline through [`TrackRecord::numeric`].
//!
//! ```json
//! [
//!   { "Year": 1984, "Genre": "Synth Pop", "popularity": 71, "energy": 0.82 },
//!   { "year": 2019, "top genre": "latin", "country": "mexico" }
//! ]
//! ```
//!
//! When several spellings of a key are present, the first non-`null` one in
//! the table order wins. Exports are loaded leniently: a year given as a
//! numeric string (`"1990"`) is parsed, a numeric country is kept as text, and
//! any other unusable year or country becomes `None` instead of failing the
//! whole file.
//!
//! Records are never modified after loading. A missing or `null` year or genre
//! is kept as `None`; the pipelines decide which records they can use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::taxonomy::{Label, Taxonomy};

const YEAR_KEYS: [&str; 2] = ["year", "Year"];
const GENRE_KEYS: [&str; 3] = ["genre", "Genre", "top genre"];
const COUNTRY_KEYS: [&str; 2] = ["country", "Country"];

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct TrackRecord {
    /// Release year (the time bucket)
    pub year: Option<f64>,
    /// Raw free-text genre; may hold a non-string value in messy exports
    pub genre: Option<Value>,
    /// Chart country, if the export has one
    pub country: Option<String>,
    /// All remaining columns
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl From<BTreeMap<String, Value>> for TrackRecord {
    fn from(mut fields: BTreeMap<String, Value>) -> Self {
        let year = take_first(&mut fields, &YEAR_KEYS).and_then(|value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|y| y.is_finite()),
            _ => None,
        });
        let genre = take_first(&mut fields, &GENRE_KEYS);
        let country = take_first(&mut fields, &COUNTRY_KEYS).and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Self {
            year,
            genre,
            country,
            fields,
        }
    }
}

/// Removes every spelling in `keys` from `fields` and returns the first
/// non-null value.
fn take_first(fields: &mut BTreeMap<String, Value>, keys: &[&str]) -> Option<Value> {
    let mut found = None;
    for key in keys {
        if let Some(value) = fields.remove(*key)
            && found.is_none()
            && !value.is_null()
        {
            found = Some(value);
        }
    }
    found
}

impl TrackRecord {
    /// Returns the numeric value of column `name`, or `None` if the column is
    /// absent or not a number.
    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }

    /// Classifies this record's genre, or returns `None` when the record has
    /// no genre at all.
    #[must_use]
    pub fn label<'t>(&self, taxonomy: &'t Taxonomy) -> Option<&'t Label> {
        self.genre
            .as_ref()
            .map(|genre| taxonomy.classify_value(genre))
    }
}
