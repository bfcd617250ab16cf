use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

use crate::entity::genres::Genres;
use crate::entity::helpers::fields::{ARTIST_FIELDS, SHOW_FIELDS, Submission, VENUE_FIELDS};
use crate::entity::helpers::query::{get_artist, get_venue};
use crate::entity::{artists, shows, venues};
use crate::error::DirectoryError;

const VENUE_REQUIRED: [&str; 4] = ["name", "city", "state", "address"];
const ARTIST_REQUIRED: [&str; 2] = ["name", "phone"];

const NAIVE_START_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Values of every required key, or one validation error naming all the
/// missing ones.
fn require_all<'a, const N: usize>(
    fields: &'a Submission,
    required: [&str; N],
) -> Result<[&'a str; N], DirectoryError> {
    let values = required.map(|key| fields.value(key));
    let missing: Vec<&str> = required
        .iter()
        .zip(&values)
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| *key)
        .collect();
    if !missing.is_empty() {
        return Err(DirectoryError::validation(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }
    Ok(values.map(Option::unwrap_or_default))
}

/// Accepts RFC 3339, or a naive date-time which is taken as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, DirectoryError> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NAIVE_START_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|t| t.and_utc())
        .ok_or_else(|| DirectoryError::validation(format!("unrecognised start_time {raw:?}")))
}

// Only present and non-empty submissions overwrite; nothing here can clear a field.
fn merge_venue(venue: &mut venues::ActiveModel, fields: &Submission) -> Result<(), DirectoryError> {
    if let Some(v) = fields.value("name") {
        venue.name = Set(v.to_owned());
    }
    if let Some(v) = fields.value("city") {
        venue.city = Set(v.to_owned());
    }
    if let Some(v) = fields.value("state") {
        venue.state = Set(v.to_owned());
    }
    if let Some(v) = fields.value("address") {
        venue.address = Set(v.to_owned());
    }
    if let Some(v) = fields.value("phone") {
        venue.phone = Set(Some(v.to_owned()));
    }
    if let Some(v) = fields.value("image_link") {
        venue.image_link = Set(Some(v.to_owned()));
    }
    if let Some(v) = fields.value("facebook_link") {
        venue.facebook_link = Set(Some(v.to_owned()));
    }
    if let Some(genres) = fields.genres() {
        venue.genres = Set(genres);
    }
    if let Some(v) = fields.value("website") {
        venue.website = Set(Some(v.to_owned()));
    }
    if let Some(seeking) = fields.flag("seeking_talent")? {
        venue.seeking_talent = Set(seeking);
    }
    if let Some(v) = fields.value("seeking_description") {
        venue.seeking_description = Set(Some(v.to_owned()));
    }
    Ok(())
}

fn merge_artist(
    artist: &mut artists::ActiveModel,
    fields: &Submission,
) -> Result<(), DirectoryError> {
    if let Some(v) = fields.value("name") {
        artist.name = Set(v.to_owned());
    }
    if let Some(v) = fields.value("city") {
        artist.city = Set(Some(v.to_owned()));
    }
    if let Some(v) = fields.value("state") {
        artist.state = Set(Some(v.to_owned()));
    }
    if let Some(v) = fields.value("phone") {
        artist.phone = Set(v.to_owned());
    }
    if let Some(genres) = fields.genres() {
        artist.genres = Set(genres);
    }
    if let Some(v) = fields.value("image_link") {
        artist.image_link = Set(Some(v.to_owned()));
    }
    if let Some(v) = fields.value("facebook_link") {
        artist.facebook_link = Set(Some(v.to_owned()));
    }
    if let Some(v) = fields.value("website") {
        artist.website = Set(Some(v.to_owned()));
    }
    if let Some(seeking) = fields.flag("seeking_venue")? {
        artist.seeking_venue = Set(seeking);
    }
    if let Some(v) = fields.value("seeking_description") {
        artist.seeking_description = Set(Some(v.to_owned()));
    }
    Ok(())
}

pub async fn create_venue(
    db: &DatabaseConnection,
    fields: &Submission,
) -> Result<venues::Model, DirectoryError> {
    fields.log_unknown("venue", VENUE_FIELDS);
    let [name, city, state, address] = require_all(fields, VENUE_REQUIRED)?;

    let mut venue = venues::ActiveModel {
        name: Set(name.to_owned()),
        city: Set(city.to_owned()),
        state: Set(state.to_owned()),
        address: Set(address.to_owned()),
        phone: Set(None),
        image_link: Set(None),
        facebook_link: Set(None),
        genres: Set(Genres::default()),
        website: Set(None),
        seeking_talent: Set(false),
        seeking_description: Set(None),
        ..Default::default()
    };
    merge_venue(&mut venue, fields)?;

    let txn = db.begin().await?;
    let venue = venue.insert(&txn).await?;
    txn.commit().await?;

    debug!("listed venue {} ({})", venue.id, venue.name);
    Ok(venue)
}

pub async fn update_venue(
    db: &DatabaseConnection,
    id: i32,
    fields: &Submission,
) -> Result<venues::Model, DirectoryError> {
    fields.log_unknown("venue", VENUE_FIELDS);
    let existing = get_venue(db, id).await?;

    let mut venue: venues::ActiveModel = existing.clone().into();
    merge_venue(&mut venue, fields)?;
    if !venue.is_changed() {
        debug!("venue {id} edit carried no changes");
        return Ok(existing);
    }

    let txn = db.begin().await?;
    let venue = venue.update(&txn).await?;
    txn.commit().await?;

    debug!("updated venue {id}");
    Ok(venue)
}

/// Removes the venue and returns its last state. Its shows are left in place.
pub async fn delete_venue(
    db: &DatabaseConnection,
    id: i32,
) -> Result<venues::Model, DirectoryError> {
    let venue = get_venue(db, id).await?;

    let txn = db.begin().await?;
    let deleted = venues::Entity::delete_by_id(id).exec(&txn).await?;
    // removed by someone else since the lookup
    if deleted.rows_affected == 0 {
        return Err(DirectoryError::not_found("venue", id));
    }
    txn.commit().await?;

    debug!("deleted venue {id} ({})", venue.name);
    Ok(venue)
}

pub async fn create_artist(
    db: &DatabaseConnection,
    fields: &Submission,
) -> Result<artists::Model, DirectoryError> {
    fields.log_unknown("artist", ARTIST_FIELDS);
    let [name, phone] = require_all(fields, ARTIST_REQUIRED)?;

    let mut artist = artists::ActiveModel {
        name: Set(name.to_owned()),
        city: Set(None),
        state: Set(None),
        phone: Set(phone.to_owned()),
        genres: Set(Genres::default()),
        image_link: Set(None),
        facebook_link: Set(None),
        website: Set(None),
        seeking_venue: Set(false),
        seeking_description: Set(None),
        ..Default::default()
    };
    merge_artist(&mut artist, fields)?;

    let txn = db.begin().await?;
    let artist = artist.insert(&txn).await?;
    txn.commit().await?;

    debug!("listed artist {} ({})", artist.id, artist.name);
    Ok(artist)
}

pub async fn update_artist(
    db: &DatabaseConnection,
    id: i32,
    fields: &Submission,
) -> Result<artists::Model, DirectoryError> {
    fields.log_unknown("artist", ARTIST_FIELDS);
    let existing = get_artist(db, id).await?;

    let mut artist: artists::ActiveModel = existing.clone().into();
    merge_artist(&mut artist, fields)?;
    if !artist.is_changed() {
        debug!("artist {id} edit carried no changes");
        return Ok(existing);
    }

    let txn = db.begin().await?;
    let artist = artist.update(&txn).await?;
    txn.commit().await?;

    debug!("updated artist {id}");
    Ok(artist)
}

/// Removes the artist and returns its last state. Its shows are left in place.
pub async fn delete_artist(
    db: &DatabaseConnection,
    id: i32,
) -> Result<artists::Model, DirectoryError> {
    let artist = get_artist(db, id).await?;

    let txn = db.begin().await?;
    let deleted = artists::Entity::delete_by_id(id).exec(&txn).await?;
    // removed by someone else since the lookup
    if deleted.rows_affected == 0 {
        return Err(DirectoryError::not_found("artist", id));
    }
    txn.commit().await?;

    debug!("deleted artist {id} ({})", artist.name);
    Ok(artist)
}

/// Lists a show, copying the venue name and the artist name and image onto it.
pub async fn create_show(
    db: &DatabaseConnection,
    venue_id: Option<i32>,
    artist_id: Option<i32>,
    start_time: DateTime<Utc>,
) -> Result<shows::Model, DirectoryError> {
    let venue_id = venue_id.ok_or_else(|| DirectoryError::validation("venue_id is required"))?;
    let artist_id =
        artist_id.ok_or_else(|| DirectoryError::validation("artist_id is required"))?;

    let venue = get_venue(db, venue_id).await?;
    let artist = get_artist(db, artist_id).await?;

    let show = shows::ActiveModel {
        venue_id: Set(venue.id),
        artist_id: Set(artist.id),
        start_time: Set(start_time),
        venue_name: Set(venue.name),
        artist_name: Set(artist.name),
        artist_image_link: Set(artist.image_link),
        ..Default::default()
    };

    let txn = db.begin().await?;
    let show = show.insert(&txn).await?;
    txn.commit().await?;

    debug!(
        "listed show {}: artist {} at venue {}",
        show.id, show.artist_id, show.venue_id
    );
    Ok(show)
}

/// Show creation from a submitted form. A missing start time means now.
pub async fn create_show_from(
    db: &DatabaseConnection,
    fields: &Submission,
) -> Result<shows::Model, DirectoryError> {
    fields.log_unknown("show", SHOW_FIELDS);
    let venue_id = fields.integer("venue_id")?;
    let artist_id = fields.integer("artist_id")?;
    let start_time = match fields.value("start_time") {
        Some(raw) => parse_start_time(raw)?,
        None => Utc::now(),
    };
    create_show(db, venue_id, artist_id, start_time).await
}
