//! Rateio item entity - One subscriber's share within an allocation.
//!
//! `percentage` and `priority` are mutually exclusive, selected by the header's
//! `allocation_type`. Subscriber name, UC, and consumer number are snapshots.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allocation item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rateio_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Header this item belongs to
    pub rateio_id: i64,
    /// Subscriber this share was allocated to
    pub subscriber_id: i64,
    /// Subscriber name snapshot at creation time
    pub subscriber_name: String,
    /// Subscriber UC snapshot at creation time
    pub uc: String,
    /// Consumer number snapshot at creation time
    pub consumption_number: String,
    /// Share of expected generation, 0-100 (percentage mode only)
    pub percentage: Option<f64>,
    /// Priority rank, lower served first (priority mode only)
    pub priority: Option<i32>,
    /// Energy allocated to this subscriber in kWh
    pub allocated_kwh: f64,
    /// Whether the subscriber was newly linked to the generator in this allocation
    pub is_new_link: bool,
}

/// Defines relationships between RateioItem and other entities.
/// `subscriber_id` is deliberately not a schema-level relation: items must
/// outlive the subscriber record they snapshot.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one allocation header
    #[sea_orm(
        belongs_to = "super::rateio::Entity",
        from = "Column::RateioId",
        to = "super::rateio::Column::Id"
    )]
    Rateio,
}

impl Related<super::rateio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rateio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
