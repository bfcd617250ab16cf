pub mod artists;
pub mod genres;
pub mod helpers;
pub mod shows;
pub mod venues;
