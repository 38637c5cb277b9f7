//! Consumo não compensado entity - Per-tenant, per-month override cache for
//! the non-compensated consumption quantity.
//!
//! Keyed by the literal month reference `"MM/AAAA"`; exact-match only, no
//! normalization of alternate formats. One row per tenant and month, shared
//! by every invoice referencing that month. Saves are upserts that preserve
//! `created_at`; rows are removed only by explicit clear.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Non-compensated consumption cache model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consumo_nao_compensado")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant that owns this cache entry
    pub tenant_id: String,
    /// Month reference in `"MM/AAAA"` format
    pub month_reference: String,
    /// Non-compensated consumption in kWh, non-negative
    pub value_kwh: f64,
    /// When the value was first supplied
    pub created_at: DateTimeUtc,
    /// When the value was last saved
    pub updated_at: DateTimeUtc,
}

/// The cache has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
