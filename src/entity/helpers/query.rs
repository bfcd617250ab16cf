use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entity::{artists, shows, venues};
use crate::error::DirectoryError;
use crate::server::types::{
    ArtistDetail, ArtistListItem, ArtistShow, CityVenues, EntitySummary, SearchResults,
    ShowListing, VenueDetail, VenueShow,
};

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_start_time(start_time: &DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

/// A show starting exactly at `now` is still upcoming.
pub fn is_upcoming(show: &shows::Model, now: DateTime<Utc>) -> bool {
    show.start_time >= now
}

/// Number of upcoming shows keyed by the id held in `owner`
/// (`VenueId` or `ArtistId`). Owners without upcoming shows are absent.
async fn upcoming_counts(
    db: &DatabaseConnection,
    owner: shows::Column,
    now: DateTime<Utc>,
) -> Result<HashMap<i32, u64>, DbErr> {
    let rows: Vec<(i32, i64)> = shows::Entity::find()
        .select_only()
        .column(owner)
        .column_as(shows::Column::Id.count(), "upcoming")
        .filter(shows::Column::StartTime.gte(now))
        .group_by(owner)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}

/// Case-insensitive substring match with full Unicode folding; SQLite's
/// `LIKE` only folds ASCII. The term is used as submitted.
fn name_matches(name: &str, folded_term: &str) -> bool {
    name.to_lowercase().contains(folded_term)
}

pub async fn venues_by_city(db: &DatabaseConnection) -> Result<Vec<CityVenues>, DirectoryError> {
    venues_by_city_at(db, Utc::now()).await
}

pub async fn venues_by_city_at(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<CityVenues>, DirectoryError> {
    let venues = venues::Entity::find()
        .order_by_asc(venues::Column::City)
        .order_by_asc(venues::Column::State)
        .order_by_asc(venues::Column::Id)
        .all(db)
        .await?;
    let counts = upcoming_counts(db, shows::Column::VenueId, now).await?;

    let mut areas: Vec<CityVenues> = Vec::new();
    for venue in venues {
        let summary = EntitySummary {
            id: venue.id,
            name: venue.name,
            num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
        };
        match areas.last_mut() {
            Some(area) if area.city == venue.city && area.state == venue.state => {
                area.venues.push(summary)
            }
            _ => areas.push(CityVenues {
                city: venue.city,
                state: venue.state,
                venues: vec![summary],
            }),
        }
    }

    Ok(areas)
}

pub async fn search_venues(
    db: &DatabaseConnection,
    term: &str,
) -> Result<SearchResults, DirectoryError> {
    search_venues_at(db, term, Utc::now()).await
}

pub async fn search_venues_at(
    db: &DatabaseConnection,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, DirectoryError> {
    let folded_term = term.to_lowercase();
    let venues = venues::Entity::find()
        .order_by_asc(venues::Column::Id)
        .all(db)
        .await?;
    let counts = upcoming_counts(db, shows::Column::VenueId, now).await?;

    let data: Vec<EntitySummary> = venues
        .into_iter()
        .filter(|v| name_matches(&v.name, &folded_term))
        .map(|v| EntitySummary {
            num_upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
            id: v.id,
            name: v.name,
        })
        .collect();

    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

pub async fn search_artists(
    db: &DatabaseConnection,
    term: &str,
) -> Result<SearchResults, DirectoryError> {
    search_artists_at(db, term, Utc::now()).await
}

pub async fn search_artists_at(
    db: &DatabaseConnection,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, DirectoryError> {
    let folded_term = term.to_lowercase();
    let artists = artists::Entity::find()
        .order_by_asc(artists::Column::Id)
        .all(db)
        .await?;
    let counts = upcoming_counts(db, shows::Column::ArtistId, now).await?;

    let data: Vec<EntitySummary> = artists
        .into_iter()
        .filter(|a| name_matches(&a.name, &folded_term))
        .map(|a| EntitySummary {
            num_upcoming_shows: counts.get(&a.id).copied().unwrap_or(0),
            id: a.id,
            name: a.name,
        })
        .collect();

    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

pub async fn list_artists(db: &DatabaseConnection) -> Result<Vec<ArtistListItem>, DirectoryError> {
    let artists = artists::Entity::find()
        .order_by_asc(artists::Column::Id)
        .all(db)
        .await?;

    Ok(artists
        .into_iter()
        .map(|a| ArtistListItem {
            id: a.id,
            name: a.name,
        })
        .collect())
}

pub async fn get_venue(db: &DatabaseConnection, id: i32) -> Result<venues::Model, DirectoryError> {
    venues::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DirectoryError::not_found("venue", id))
}

pub async fn get_artist(db: &DatabaseConnection, id: i32) -> Result<artists::Model, DirectoryError> {
    artists::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DirectoryError::not_found("artist", id))
}

pub async fn venue_detail(db: &DatabaseConnection, id: i32) -> Result<VenueDetail, DirectoryError> {
    venue_detail_at(db, id, Utc::now()).await
}

pub async fn venue_detail_at(
    db: &DatabaseConnection,
    id: i32,
    now: DateTime<Utc>,
) -> Result<VenueDetail, DirectoryError> {
    let venue = get_venue(db, id).await?;
    let shows = shows::Entity::find()
        .filter(shows::Column::VenueId.eq(id))
        .order_by_asc(shows::Column::StartTime)
        .order_by_asc(shows::Column::Id)
        .all(db)
        .await?;

    let (upcoming, past): (Vec<_>, Vec<_>) =
        shows.into_iter().partition(|show| is_upcoming(show, now));
    let entry = |show: shows::Model| VenueShow {
        start_time: format_start_time(&show.start_time),
        artist_id: show.artist_id,
        artist_name: show.artist_name,
        artist_image_link: show.artist_image_link,
    };

    Ok(VenueDetail {
        venue,
        upcoming_shows_count: upcoming.len(),
        past_shows_count: past.len(),
        upcoming_shows: upcoming.into_iter().map(entry).collect(),
        past_shows: past.into_iter().map(entry).collect(),
    })
}

pub async fn artist_detail(
    db: &DatabaseConnection,
    id: i32,
) -> Result<ArtistDetail, DirectoryError> {
    artist_detail_at(db, id, Utc::now()).await
}

pub async fn artist_detail_at(
    db: &DatabaseConnection,
    id: i32,
    now: DateTime<Utc>,
) -> Result<ArtistDetail, DirectoryError> {
    let artist = get_artist(db, id).await?;
    // Left join: shows whose venue was deleted stay listed without an image.
    let shows = shows::Entity::find()
        .filter(shows::Column::ArtistId.eq(id))
        .order_by_asc(shows::Column::StartTime)
        .order_by_asc(shows::Column::Id)
        .find_also_related(venues::Entity)
        .all(db)
        .await?;

    let (upcoming, past): (Vec<_>, Vec<_>) = shows
        .into_iter()
        .partition(|(show, _)| is_upcoming(show, now));
    let entry = |(show, venue): (shows::Model, Option<venues::Model>)| ArtistShow {
        start_time: format_start_time(&show.start_time),
        venue_id: show.venue_id,
        venue_name: show.venue_name,
        venue_image_link: venue.and_then(|v| v.image_link),
    };

    Ok(ArtistDetail {
        artist,
        upcoming_shows_count: upcoming.len(),
        past_shows_count: past.len(),
        upcoming_shows: upcoming.into_iter().map(entry).collect(),
        past_shows: past.into_iter().map(entry).collect(),
    })
}

pub async fn list_shows(db: &DatabaseConnection) -> Result<Vec<ShowListing>, DirectoryError> {
    let shows = shows::Entity::find()
        .order_by_asc(shows::Column::StartTime)
        .order_by_asc(shows::Column::Id)
        .all(db)
        .await?;

    Ok(shows
        .into_iter()
        .map(|show| ShowListing {
            start_time: format_start_time(&show.start_time),
            id: show.id,
            venue_id: show.venue_id,
            venue_name: show.venue_name,
            artist_id: show.artist_id,
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::entity::helpers::fields::Submission;
    use crate::entity::helpers::mutation::{create_artist, create_show, create_venue};
    use crate::entity::helpers::testing::memory_db;

    fn venue_form(name: &str, city: &str, state: &str) -> Submission {
        [
            ("name", name),
            ("city", city),
            ("state", state),
            ("address", "1015 Folsom Street"),
        ]
        .into_iter()
        .collect()
    }

    fn artist_form(name: &str) -> Submission {
        [
            ("name", name),
            ("phone", "326-123-5000"),
            ("image_link", "https://img.example.com/a.jpg"),
        ]
        .into_iter()
        .collect()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let db = memory_db().await;
        create_venue(&db, &venue_form("The Musical Hop", "San Francisco", "CA")).await.unwrap();
        create_venue(&db, &venue_form("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .await
            .unwrap();
        create_venue(&db, &venue_form("The Dueling Pianos Bar", "New York", "NY")).await.unwrap();

        let hop = search_venues(&db, "Hop").await.unwrap();
        assert_eq!(hop.count, 1);
        assert_eq!(hop.data[0].name, "The Musical Hop");

        let music = search_venues(&db, "music").await.unwrap();
        let names: Vec<_> = music.data.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["The Musical Hop", "Park Square Live Music & Coffee"]);

        assert_eq!(search_venues(&db, "").await.unwrap().count, 3);
        // the term is not trimmed
        assert_eq!(search_venues(&db, "Hop ").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let db = memory_db().await;
        create_venue(&db, &venue_form("Café Élysée", "Paris", "IDF")).await.unwrap();
        create_artist(&db, &artist_form("Ólafur Arnalds")).await.unwrap();

        for term in ["ÉLYSÉE", "CAFÉ", "café", "é ÉL"] {
            let hits = search_venues(&db, term).await.unwrap();
            assert_eq!(hits.count, 1, "term {term:?}");
            assert_eq!(hits.data[0].name, "Café Élysée");
        }
        assert_eq!(search_venues(&db, "cafe").await.unwrap().count, 0);
        assert_eq!(search_artists(&db, "óLAFUR").await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let db = memory_db().await;
        create_artist(&db, &artist_form("Guns N Petals")).await.unwrap();
        create_artist(&db, &artist_form("100% Brass")).await.unwrap();

        let hits = search_artists(&db, "%").await.unwrap();
        assert_eq!(hits.count, 1);
        assert_eq!(hits.data[0].name, "100% Brass");
        assert_eq!(search_artists(&db, "_").await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn venues_group_by_city_and_state() {
        let db = memory_db().await;
        let hop = create_venue(&db, &venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        create_venue(&db, &venue_form("Park Square", "San Francisco", "CA")).await.unwrap();
        create_venue(&db, &venue_form("Pianos", "New York", "NY")).await.unwrap();
        let artist = create_artist(&db, &artist_form("Matt Quevedo")).await.unwrap();
        create_show(&db, Some(hop.id), Some(artist.id), at(20)).await.unwrap();
        create_show(&db, Some(hop.id), Some(artist.id), at(8)).await.unwrap();

        let areas = venues_by_city_at(&db, at(12)).await.unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "New York");
        assert_eq!(areas[1].city, "San Francisco");
        assert_eq!(areas[1].venues.len(), 2);
        assert_eq!(areas[1].venues[0].id, hop.id);
        assert_eq!(areas[1].venues[0].num_upcoming_shows, 1);
        assert_eq!(areas[1].venues[1].num_upcoming_shows, 0);
    }

    #[tokio::test]
    async fn shows_split_into_upcoming_and_past() {
        let db = memory_db().await;
        let venue = create_venue(&db, &venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = create_artist(&db, &artist_form("The Wild Sax Band")).await.unwrap();
        create_show(&db, Some(venue.id), Some(artist.id), at(12)).await.unwrap();

        let detail = venue_detail_at(&db, venue.id, at(11)).await.unwrap();
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.past_shows_count, 0);
        assert_eq!(detail.upcoming_shows[0].artist_name, "The Wild Sax Band");
        assert_eq!(detail.upcoming_shows[0].start_time, "2030-06-01 12:00:00");

        // exactly at start time the show is still upcoming
        let detail = artist_detail_at(&db, artist.id, at(12)).await.unwrap();
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.upcoming_shows[0].venue_name, "The Musical Hop");

        let later = at(12) + Duration::seconds(1);
        let detail = venue_detail_at(&db, venue.id, later).await.unwrap();
        assert_eq!(detail.upcoming_shows_count, 0);
        assert_eq!(detail.past_shows_count, 1);
        let detail = artist_detail_at(&db, artist.id, later).await.unwrap();
        assert!(detail.upcoming_shows.is_empty());
        assert_eq!(detail.past_shows.len(), 1);
    }

    #[tokio::test]
    async fn missing_detail_is_not_found() {
        let db = memory_db().await;
        assert!(matches!(
            venue_detail(&db, 99).await,
            Err(DirectoryError::NotFound { entity: "venue", id: 99 })
        ));
        assert!(matches!(
            artist_detail(&db, 5).await,
            Err(DirectoryError::NotFound { entity: "artist", id: 5 })
        ));
    }

    #[tokio::test]
    async fn show_listing_carries_snapshots() {
        let db = memory_db().await;
        let venue = create_venue(&db, &venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = create_artist(&db, &artist_form("Guns N Petals")).await.unwrap();
        create_show(&db, Some(venue.id), Some(artist.id), at(21)).await.unwrap();
        create_show(&db, Some(venue.id), Some(artist.id), at(9)).await.unwrap();

        let shows = list_shows(&db).await.unwrap();
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].start_time, "2030-06-01 09:00:00");
        assert_eq!(shows[1].venue_name, "The Musical Hop");
        assert_eq!(shows[1].artist_name, "Guns N Petals");
        assert_eq!(
            shows[1].artist_image_link.as_deref(),
            Some("https://img.example.com/a.jpg")
        );
    }
}
