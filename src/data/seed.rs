//! Sample venues, artists and shows for an empty directory.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entity::helpers::fields::Submission;
use crate::entity::helpers::mutation::{create_artist, create_show, create_venue, parse_start_time};
use crate::entity::{artists, venues};
use crate::error::DirectoryError;

const SAMPLE_VENUES: &[&[(&str, &str)]] = &[
    &[
        ("name", "The Musical Hop"),
        ("genres", "Jazz"),
        ("genres", "Reggae"),
        ("genres", "Swing"),
        ("genres", "Classical"),
        ("genres", "Folk"),
        ("address", "1015 Folsom Street"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "123-123-1234"),
        ("website", "https://www.themusicalhop.com"),
        ("facebook_link", "https://www.facebook.com/TheMusicalHop"),
        ("seeking_talent", "y"),
        (
            "seeking_description",
            "We are on the lookout for a local artist to play every two weeks. Please call us.",
        ),
        ("image_link", "https://images.unsplash.com/photo-1543900694-133f37abaaa5"),
    ],
    &[
        ("name", "The Dueling Pianos Bar"),
        ("genres", "Classical"),
        ("genres", "R&B"),
        ("genres", "Hip-Hop"),
        ("address", "335 Delancey Street"),
        ("city", "New York"),
        ("state", "NY"),
        ("phone", "914-003-1132"),
        ("website", "https://www.theduelingpianos.com"),
        ("facebook_link", "https://www.facebook.com/theduelingpianos"),
        ("seeking_talent", "n"),
        ("image_link", "https://images.unsplash.com/photo-1497032205916-ac775f0649ae"),
    ],
    &[
        ("name", "Park Square Live Music & Coffee"),
        ("genres", "Rock n Roll"),
        ("genres", "Jazz"),
        ("genres", "Classical"),
        ("genres", "Folk"),
        ("address", "34 Whiskey Moore Ave"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "415-000-1234"),
        ("website", "https://www.parksquarelivemusicandcoffee.com"),
        ("facebook_link", "https://www.facebook.com/ParkSquareLiveMusicAndCoffee"),
        ("seeking_talent", "n"),
        ("image_link", "https://images.unsplash.com/photo-1485686531765-ba63b07845a7"),
    ],
];

const SAMPLE_ARTISTS: &[&[(&str, &str)]] = &[
    &[
        ("name", "Guns N Petals"),
        ("genres", "Rock n Roll"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "326-123-5000"),
        ("website", "https://www.gunsnpetalsband.com"),
        ("facebook_link", "https://www.facebook.com/GunsNPetals"),
        ("seeking_venue", "y"),
        (
            "seeking_description",
            "Looking for shows to perform at in the San Francisco Bay Area!",
        ),
        ("image_link", "https://images.unsplash.com/photo-1549213783-8284d0336c4f"),
    ],
    &[
        ("name", "Matt Quevedo"),
        ("genres", "Jazz"),
        ("city", "New York"),
        ("state", "NY"),
        ("phone", "300-400-5000"),
        ("facebook_link", "https://www.facebook.com/mattquevedo923251523"),
        ("seeking_venue", "n"),
        ("image_link", "https://images.unsplash.com/photo-1495223153807-b916f75de8c5"),
    ],
    &[
        ("name", "The Wild Sax Band"),
        ("genres", "Jazz"),
        ("genres", "Classical"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "432-325-5432"),
        ("seeking_venue", "n"),
        ("image_link", "https://images.unsplash.com/photo-1558369981-f9ca78462e61"),
    ],
];

/// (venue index, artist index, start time)
const SAMPLE_SHOWS: &[(usize, usize, &str)] = &[
    (0, 0, "2019-05-21 21:30:00"),
    (2, 1, "2019-06-15 23:00:00"),
    (2, 2, "2035-04-01 20:00:00"),
    (2, 2, "2035-04-08 20:00:00"),
    (2, 2, "2035-04-15 20:00:00"),
];

/// Returns whether anything was inserted; a store holding any venue or artist
/// is left alone.
pub async fn seed_if_empty(db: &DatabaseConnection) -> Result<bool, DirectoryError> {
    let venue_count = venues::Entity::find().count(db).await?;
    let artist_count = artists::Entity::find().count(db).await?;
    if venue_count > 0 || artist_count > 0 {
        return Ok(false);
    }

    let mut venue_ids = Vec::with_capacity(SAMPLE_VENUES.len());
    for fields in SAMPLE_VENUES {
        let submission: Submission = fields.iter().copied().collect();
        venue_ids.push(create_venue(db, &submission).await?.id);
    }

    let mut artist_ids = Vec::with_capacity(SAMPLE_ARTISTS.len());
    for fields in SAMPLE_ARTISTS {
        let submission: Submission = fields.iter().copied().collect();
        artist_ids.push(create_artist(db, &submission).await?.id);
    }

    for &(venue, artist, start) in SAMPLE_SHOWS {
        create_show(
            db,
            venue_ids.get(venue).copied(),
            artist_ids.get(artist).copied(),
            parse_start_time(start)?,
        )
        .await?;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::helpers::query::{search_artists, search_venues, venue_detail};
    use crate::entity::helpers::testing::memory_db;

    #[tokio::test]
    async fn seeds_only_once() {
        let db = memory_db().await;
        assert!(seed_if_empty(&db).await.unwrap());
        assert!(!seed_if_empty(&db).await.unwrap());
        assert_eq!(venues::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(artists::Entity::find().count(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn sample_directory_answers_searches() {
        let db = memory_db().await;
        seed_if_empty(&db).await.unwrap();

        let music = search_venues(&db, "Music").await.unwrap();
        assert_eq!(music.count, 2);

        let a = search_artists(&db, "A").await.unwrap();
        let names: Vec<_> = a.data.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);

        let band = search_artists(&db, "band").await.unwrap();
        assert_eq!(band.count, 1);
        assert_eq!(band.data[0].name, "The Wild Sax Band");
        assert_eq!(band.data[0].num_upcoming_shows, 3);

        let park = venue_detail(&db, music.data[1].id).await.unwrap();
        assert_eq!(park.venue.name, "Park Square Live Music & Coffee");
        assert_eq!(park.past_shows_count, 1);
        assert_eq!(park.upcoming_shows_count, 3);
    }
}
