//! Issued invoice entity - Invoices promoted out of the validation queue, plus
//! the artifact record consulted by the ingestion short-circuit check.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Issued invoice model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issued_invoices")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant that owns this invoice
    pub tenant_id: String,
    /// Consumer unit the invoice belongs to
    pub uc: String,
    /// Subscriber the invoice was issued for, when known
    pub subscriber_id: Option<i64>,
    /// Invoice month in `"MM/AAAA"` format
    pub month_reference: String,
    /// URL of the invoice
    pub fatura_url: String,
    /// Path of the stored PDF artifact
    pub pdf_path: String,
    /// Reconciled non-compensated consumption in kWh
    pub consumo_nao_compensado_kwh: f64,
    /// When the invoice was issued
    pub created_at: DateTimeUtc,
}

/// Issued invoices have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
