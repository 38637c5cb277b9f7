//! Shared test utilities for solshare.
//!
//! Common helpers for setting up in-memory test databases and creating
//! fixture entities with sensible defaults.

use crate::{entities, errors::Result};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Tenant used by all fixtures unless a test scopes things differently
pub const TEST_TENANT: &str = "tenant-test";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test generator with sensible defaults.
///
/// # Defaults
/// * `uc`: `"UC-GEN-01"`
/// * `expected_generation_kwh`: 5000.0
pub async fn create_test_generator(
    db: &DatabaseConnection,
    nickname: &str,
) -> Result<entities::generator::Model> {
    crate::core::generator::create_generator(
        db,
        TEST_TENANT.to_string(),
        nickname.to_string(),
        "UC-GEN-01".to_string(),
        5000.0,
    )
    .await
}

/// Creates a queued (`pendente`) invoice-validation record for the given UC.
pub async fn create_test_validation(
    db: &DatabaseConnection,
    uc: &str,
) -> Result<entities::invoice_validation::Model> {
    let now = chrono::Utc::now();
    entities::invoice_validation::ActiveModel {
        tenant_id: Set(TEST_TENANT.to_string()),
        uc: Set(uc.to_string()),
        subscriber_id: Set(Some(7)),
        subscriber_name: Set(Some("Maria Silva".to_string())),
        month_reference: Set("03/2025".to_string()),
        fatura_url: Set("https://example.com/fatura.pdf".to_string()),
        pdf_path: Set(format!("/faturas/{uc}.pdf")),
        consumo_nao_compensado_kwh: Set(42.0),
        status: Set("pendente".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an issued invoice for the given UC and month.
pub async fn create_test_issued_invoice(
    db: &DatabaseConnection,
    uc: &str,
    month_reference: &str,
) -> Result<entities::issued_invoice::Model> {
    entities::issued_invoice::ActiveModel {
        tenant_id: Set(TEST_TENANT.to_string()),
        uc: Set(uc.to_string()),
        subscriber_id: Set(None),
        month_reference: Set(month_reference.to_string()),
        fatura_url: Set("https://example.com/fatura.pdf".to_string()),
        pdf_path: Set(format!("/faturas/{uc}.pdf")),
        consumo_nao_compensado_kwh: Set(42.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
