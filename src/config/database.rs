//! Database configuration module.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! struct definitions without manual SQL.

use crate::entities::{
    ConsumoNaoCompensado, Generator, InvoiceValidation, IssuedInvoice, Rateio, RateioItem,
    Subscriber,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/solshare.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to a default local file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let generator_table = schema.create_table_from_entity(Generator);
    let subscriber_table = schema.create_table_from_entity(Subscriber);
    let rateio_table = schema.create_table_from_entity(Rateio);
    let rateio_item_table = schema.create_table_from_entity(RateioItem);
    let consumo_table = schema.create_table_from_entity(ConsumoNaoCompensado);
    let validation_table = schema.create_table_from_entity(InvoiceValidation);
    let issued_table = schema.create_table_from_entity(IssuedInvoice);

    db.execute(builder.build(&generator_table)).await?;
    db.execute(builder.build(&subscriber_table)).await?;
    db.execute(builder.build(&rateio_table)).await?;
    db.execute(builder.build(&rateio_item_table)).await?;
    db.execute(builder.build(&consumo_table)).await?;
    db.execute(builder.build(&validation_table)).await?;
    db.execute(builder.build(&issued_table)).await?;

    Ok(())
}
