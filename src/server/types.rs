use serde::{Deserialize, Serialize};

use crate::entity::{artists, venues};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CityVenues {
    pub city: String,
    pub state: String,
    pub venues: Vec<EntitySummary>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EntitySummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<EntitySummary>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ArtistListItem {
    pub id: i32,
    pub name: String,
}

/// A show as seen from its venue's page.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct VenueShow {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// A show as seen from its artist's page.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ArtistShow {
    pub venue_id: i32,
    pub venue_name: String,
    // None once the venue has been deleted
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: venues::Model,
    pub upcoming_shows_count: usize,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows: Vec<VenueShow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: artists::Model,
    pub upcoming_shows_count: usize,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows: Vec<ArtistShow>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShowListing {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

/// Human-readable outcome of a mutation.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub message: String,
    pub id: i32,
}
