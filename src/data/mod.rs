pub mod configuration;
pub mod dbconnector;
pub mod migration;
pub mod seed;
