//! Subscriber entity - Represents an energy subscriber ("assinante") and its
//! plan contract attributes.
//!
//! Contract columns (`plan_id`, `compensation_mode`, `loyalty`, ...) live on
//! the subscriber row; the discount percentage is derived by
//! [`crate::core::discount`] only when no explicit value is present.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscriber database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscribers")]
pub struct Model {
    /// Unique identifier for the subscriber
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant that owns this subscriber
    pub tenant_id: String,
    /// Display name
    pub name: String,
    /// Consumer-unit identifier of the subscriber's connection point
    pub uc: String,
    /// Consumer number printed on the distributor invoice
    pub consumption_number: String,
    /// Contracted monthly consumption in kWh
    pub contracted_kwh: f64,
    /// Accumulated energy credit in kWh (not authoritatively sourced; defaults to 0)
    pub accumulated_credit_kwh: f64,
    /// Selected plan identifier, if any
    pub plan_id: Option<String>,
    /// Compensation mode: `"auto_consumo"` or `"geracao_compartilhada"`
    pub compensation_mode: String,
    /// Contract adhesion date; defaults to the creation date when absent
    pub adhesion_date: Date,
    /// Consumption informed by the subscriber at signup, in kWh
    pub informed_kwh: f64,
    /// Loyalty tier: `"none"`, `"oneYear"`, or `"twoYears"`
    pub loyalty: String,
    /// Contracted discount percentage; None until explicitly set or auto-filled
    pub discount_percent: Option<f64>,
    /// When the subscriber was registered
    pub created_at: DateTimeUtc,
}

/// Allocation items snapshot subscriber fields instead of foreign-keying
/// them, so the subscriber has no schema-level relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
