use log::debug;

use crate::entity::genres::Genres;
use crate::error::DirectoryError;

pub const VENUE_FIELDS: &[&str] = &[
    "name",
    "city",
    "state",
    "address",
    "phone",
    "image_link",
    "facebook_link",
    "genres",
    "website",
    "seeking_talent",
    "seeking_description",
];

pub const ARTIST_FIELDS: &[&str] = &[
    "name",
    "city",
    "state",
    "phone",
    "genres",
    "image_link",
    "facebook_link",
    "website",
    "seeking_venue",
    "seeking_description",
];

pub const SHOW_FIELDS: &[&str] = &["venue_id", "artist_id", "start_time"];

/// A submitted form: ordered key/value pairs where a key may repeat.
///
/// Values are trimmed on read and a blank value is treated exactly like an
/// absent one, so a blank submission can never overwrite a stored field.
#[derive(Clone, Debug, Default)]
pub struct Submission {
    pairs: Vec<(String, String)>,
}

impl Submission {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Submission { pairs }
    }

    /// First non-empty value submitted under `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every non-empty value submitted under `key`, in submission order.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, key: &str) -> Result<&str, DirectoryError> {
        self.value(key)
            .ok_or_else(|| DirectoryError::validation(format!("{key} is required")))
    }

    pub fn flag(&self, key: &str) -> Result<Option<bool>, DirectoryError> {
        self.value(key).map(|v| parse_flag(key, v)).transpose()
    }

    pub fn integer(&self, key: &str) -> Result<Option<i32>, DirectoryError> {
        self.value(key)
            .map(|v| {
                v.parse::<i32>().map_err(|_| {
                    DirectoryError::validation(format!("{key} must be an integer, got {v:?}"))
                })
            })
            .transpose()
    }

    /// All selected genres, or `None` when no genre was selected.
    pub fn genres(&self) -> Option<Genres> {
        let genres: Genres = self.values("genres").collect();
        (!genres.is_empty()).then_some(genres)
    }

    pub(crate) fn log_unknown(&self, form: &str, known: &[&str]) {
        for (key, _) in &self.pairs {
            if !known.contains(&key.as_str()) {
                debug!("ignoring unknown {form} field {key:?}");
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Submission::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, DirectoryError> {
    match value.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "false" | "off" | "0" => Ok(false),
        _ => Err(DirectoryError::validation(format!(
            "{key} must be a yes/no value, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> Submission {
        pairs.iter().copied().collect()
    }

    #[test]
    fn blank_values_count_as_absent() {
        let fields = form(&[("name", "  "), ("city", "Austin")]);
        assert_eq!(fields.value("name"), None);
        assert_eq!(fields.value("city"), Some("Austin"));
        assert!(matches!(
            fields.require("name"),
            Err(DirectoryError::Validation(_))
        ));
    }

    #[test]
    fn every_selected_genre_is_collected() {
        let fields = form(&[("genres", "Jazz"), ("genres", "Reggae"), ("genres", "")]);
        let genres = fields.genres().unwrap();
        assert_eq!(genres.0.len(), 2);
        assert!(genres.contains("Jazz"));
        assert!(genres.contains("Reggae"));
    }

    #[test]
    fn no_genre_selection_is_none() {
        assert!(form(&[("name", "x")]).genres().is_none());
    }

    #[test]
    fn flags_accept_checkbox_values() {
        assert_eq!(form(&[("seeking_talent", "y")]).flag("seeking_talent").unwrap(), Some(true));
        assert_eq!(form(&[("seeking_talent", "False")]).flag("seeking_talent").unwrap(), Some(false));
        assert_eq!(form(&[]).flag("seeking_talent").unwrap(), None);
        assert!(form(&[("seeking_talent", "maybe")]).flag("seeking_talent").is_err());
    }

    #[test]
    fn integers_are_validated() {
        assert_eq!(form(&[("venue_id", "12")]).integer("venue_id").unwrap(), Some(12));
        assert!(form(&[("venue_id", "twelve")]).integer("venue_id").is_err());
    }
}
