pub mod fields;
pub mod mutation;
pub mod query;

#[cfg(test)]
pub(crate) mod testing {
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    use crate::data::migration::Migrator;

    /// Fresh in-memory store with the schema applied.
    pub(crate) async fn memory_db() -> DatabaseConnection {
        // one pooled connection, otherwise every connection sees its own database
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }
}
