//! Rateio header entity - One energy-allocation event for a generator.
//!
//! Generator nickname and UC are copied onto the row at creation time.
//! These are deliberate snapshots for audit stability, not live foreign-key
//! lookups: renaming or deleting the generator later must not rewrite history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allocation header database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rateios")]
pub struct Model {
    /// Unique identifier for the allocation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant that owns this allocation
    pub tenant_id: String,
    /// Generator this allocation was computed for
    pub generator_id: i64,
    /// Generator nickname snapshot at creation time
    pub generator_nickname: String,
    /// Generator UC snapshot at creation time
    pub generator_uc: String,
    /// Allocation policy: `"porcentagem"` or `"prioridade"`
    pub allocation_type: String,
    /// Date the allocation applies to
    pub allocation_date: Date,
    /// Expected monthly generation in kWh at computation time
    pub expected_generation_kwh: f64,
    /// Sum of all item allocations in kWh
    pub total_distributed_kwh: f64,
    /// Expected minus distributed; negative when percentages overshoot 100
    pub energy_surplus_kwh: f64,
    /// Lifecycle status: `"pendente"`, `"processado"`, or `"concluido"` (forward-only)
    pub status: String,
    /// Free-text operator notes
    pub notes: Option<String>,
    /// When the allocation was created
    pub created_at: DateTimeUtc,
    /// When the allocation was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Rateio and other entities. `generator_id`
/// is deliberately not a schema-level relation: the header must outlive the
/// generator record it snapshots.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One header owns many allocation items
    #[sea_orm(has_many = "super::rateio_item::Entity")]
    Items,
}

impl Related<super::rateio_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
