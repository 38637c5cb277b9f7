//! Generator entity - Represents a registered power-generating plant ("geradora").
//!
//! Each generator owns its projected monthly generation in kWh. Allocation
//! flows read this record but never mutate it; edits come only from the
//! generator-registration surface.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Generator database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "generators")]
pub struct Model {
    /// Unique identifier for the generator
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant that owns this generator
    pub tenant_id: String,
    /// Human-readable nickname (e.g., "Usina Norte")
    pub nickname: String,
    /// Consumer-unit identifier assigned by the power distributor
    pub uc: String,
    /// Projected monthly generation in kWh
    pub expected_generation_kwh: f64,
    /// When the generator was registered
    pub created_at: DateTimeUtc,
}

/// Allocation records snapshot generator fields instead of foreign-keying
/// them, so the generator has no schema-level relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
