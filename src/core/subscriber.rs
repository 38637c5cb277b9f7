//! Subscriber registry - Creation and lookup of energy subscribers and their
//! plan contracts.
//!
//! On creation the contract's discount is auto-filled from the policy table
//! when no explicit value was supplied and an informed consumption is
//! present; an explicit value is stored untouched.

use crate::{
    core::discount::{self, Loyalty, PlanContract},
    entities::{Subscriber, subscriber},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};

/// Input for subscriber registration
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    /// Tenant registering the subscriber
    pub tenant_id: String,
    /// Display name
    pub name: String,
    /// Consumer-unit identifier
    pub uc: String,
    /// Consumer number printed on the distributor invoice
    pub consumption_number: String,
    /// Contracted monthly consumption in kWh
    pub contracted_kwh: f64,
    /// Selected plan identifier
    pub plan_id: Option<String>,
    /// Compensation mode: `"auto_consumo"` or `"geracao_compartilhada"`
    pub compensation_mode: String,
    /// Contract adhesion date; defaults to today when absent
    pub adhesion_date: Option<NaiveDate>,
    /// Consumption informed by the subscriber at signup, in kWh
    pub informed_kwh: f64,
    /// Loyalty tier literal
    pub loyalty: String,
    /// Explicit discount percentage; wins over the derived one
    pub discount_percent: Option<f64>,
}

const COMPENSATION_MODES: [&str; 2] = ["auto_consumo", "geracao_compartilhada"];

/// Registers a new subscriber with its plan contract.
pub async fn create_subscriber(
    db: &DatabaseConnection,
    input: NewSubscriber,
) -> Result<subscriber::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Subscriber name cannot be empty".to_string(),
        });
    }
    if !input.contracted_kwh.is_finite() || input.contracted_kwh < 0.0 {
        return Err(Error::InvalidAmount {
            amount: input.contracted_kwh,
        });
    }
    if !COMPENSATION_MODES.contains(&input.compensation_mode.as_str()) {
        return Err(Error::Validation {
            message: format!("Unknown compensation mode: {}", input.compensation_mode),
        });
    }
    let loyalty = Loyalty::parse(&input.loyalty)?;

    let mut contract = PlanContract {
        informed_kwh: input.informed_kwh,
        contracted_kwh: input.contracted_kwh,
        loyalty,
        discount_percent: input.discount_percent,
    };
    discount::apply_default_discount(&mut contract);

    let now = chrono::Utc::now();
    let model = subscriber::ActiveModel {
        tenant_id: Set(input.tenant_id),
        name: Set(input.name.trim().to_string()),
        uc: Set(input.uc.trim().to_string()),
        consumption_number: Set(input.consumption_number.trim().to_string()),
        contracted_kwh: Set(input.contracted_kwh),
        accumulated_credit_kwh: Set(0.0),
        plan_id: Set(input.plan_id),
        compensation_mode: Set(input.compensation_mode),
        adhesion_date: Set(input.adhesion_date.unwrap_or_else(|| now.date_naive())),
        informed_kwh: Set(input.informed_kwh),
        loyalty: Set(loyalty.as_str().to_string()),
        discount_percent: Set(contract.discount_percent),
        created_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Finds a subscriber by id.
pub async fn get_subscriber_by_id(
    db: &DatabaseConnection,
    subscriber_id: i64,
) -> Result<Option<subscriber::Model>> {
    Subscriber::find_by_id(subscriber_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a tenant's subscribers, ordered by name.
pub async fn get_subscribers(
    db: &DatabaseConnection,
    tenant_id: &str,
) -> Result<Vec<subscriber::Model>> {
    Subscriber::find()
        .filter(subscriber::Column::TenantId.eq(tenant_id))
        .order_by_asc(subscriber::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn new_subscriber(name: &str) -> NewSubscriber {
        NewSubscriber {
            tenant_id: TEST_TENANT.to_string(),
            name: name.to_string(),
            uc: "UC-100".to_string(),
            consumption_number: "CN-00042".to_string(),
            contracted_kwh: 1100.0,
            plan_id: Some("plano-basico".to_string()),
            compensation_mode: "geracao_compartilhada".to_string(),
            adhesion_date: None,
            informed_kwh: 950.0,
            loyalty: "oneYear".to_string(),
            discount_percent: None,
        }
    }

    #[tokio::test]
    async fn test_create_subscriber_autofills_discount() -> Result<()> {
        let db = setup_test_db().await?;

        let subscriber = create_subscriber(&db, new_subscriber("Maria Silva")).await?;
        // 1100 kWh contracted at one-year loyalty
        assert_eq!(subscriber.discount_percent, Some(20.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_discount_wins() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = new_subscriber("Maria Silva");
        input.discount_percent = Some(8.0);
        let subscriber = create_subscriber(&db, input).await?;
        assert_eq!(subscriber.discount_percent, Some(8.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_informed_kwh_leaves_discount_unset() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = new_subscriber("Maria Silva");
        input.informed_kwh = 0.0;
        let subscriber = create_subscriber(&db, input).await?;
        assert_eq!(subscriber.discount_percent, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_below_lowest_tier_leaves_discount_unset() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = new_subscriber("Maria Silva");
        input.contracted_kwh = 399.0;
        let subscriber = create_subscriber(&db, input).await?;
        assert_eq!(subscriber.discount_percent, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_adhesion_date_defaults_to_today() -> Result<()> {
        let db = setup_test_db().await?;

        let subscriber = create_subscriber(&db, new_subscriber("Maria Silva")).await?;
        assert_eq!(subscriber.adhesion_date, chrono::Utc::now().date_naive());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_subscriber_rejects_bad_input() -> Result<()> {
        let db = setup_test_db().await?;

        let mut bad_mode = new_subscriber("Maria Silva");
        bad_mode.compensation_mode = "hibrido".to_string();
        assert!(create_subscriber(&db, bad_mode).await.is_err());

        let mut bad_loyalty = new_subscriber("Maria Silva");
        bad_loyalty.loyalty = "forever".to_string();
        assert!(create_subscriber(&db, bad_loyalty).await.is_err());

        let mut empty_name = new_subscriber(" ");
        empty_name.name = "  ".to_string();
        assert!(create_subscriber(&db, empty_name).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_subscribers_ordered_and_scoped() -> Result<()> {
        let db = setup_test_db().await?;

        let mut second = new_subscriber("Zeca Souza");
        second.uc = "UC-200".to_string();
        create_subscriber(&db, second).await?;
        create_subscriber(&db, new_subscriber("Ana Lima")).await?;

        let mut other_tenant = new_subscriber("Outro Tenant");
        other_tenant.tenant_id = "tenant-b".to_string();
        create_subscriber(&db, other_tenant).await?;

        let subscribers = get_subscribers(&db, TEST_TENANT).await?;
        assert_eq!(subscribers.len(), 2);
        assert_eq!(subscribers[0].name, "Ana Lima");
        assert_eq!(subscribers[1].name, "Zeca Souza");
        Ok(())
    }
}
