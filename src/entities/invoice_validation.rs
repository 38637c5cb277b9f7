//! Invoice validation entity - Queue of fetched invoices awaiting operator review.
//!
//! Status uses the persisted literals `"pendente"`, `"aprovada"`, `"rejeitada"`.
//! Approval materializes an issued invoice and deletes the queue row; rejection
//! keeps the row with its terminal status.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice validation queue model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_validations")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant that owns this record
    pub tenant_id: String,
    /// Consumer unit the invoice belongs to
    pub uc: String,
    /// Subscriber the invoice was fetched for, when selected from a list
    pub subscriber_id: Option<i64>,
    /// Subscriber name snapshot, when known
    pub subscriber_name: Option<String>,
    /// Invoice month in `"MM/AAAA"` format
    pub month_reference: String,
    /// URL of the fetched invoice
    pub fatura_url: String,
    /// Path of the fetched PDF artifact
    pub pdf_path: String,
    /// Reconciled non-compensated consumption in kWh
    pub consumo_nao_compensado_kwh: f64,
    /// Queue status: `"pendente"`, `"aprovada"`, or `"rejeitada"`
    pub status: String,
    /// When the record was queued
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: DateTimeUtc,
}

/// The validation queue has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
