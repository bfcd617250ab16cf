use std::collections::BTreeSet;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Genre tags of a venue or artist, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Genres(pub BTreeSet<String>);

impl Genres {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.0.contains(genre)
    }
}

impl<S: Into<String>> FromIterator<S> for Genres {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Genres(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let genres: Genres = ["Jazz", "Folk", "Jazz"].into_iter().collect();
        assert_eq!(genres.0.len(), 2);
        assert!(genres.contains("Folk"));
    }

    #[test]
    fn serializes_as_plain_array() {
        let genres: Genres = ["Swing", "Classical"].into_iter().collect();
        let json = serde_json::to_string(&genres).unwrap();
        assert_eq!(json, r#"["Classical","Swing"]"#);
    }
}
