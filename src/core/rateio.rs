//! Rateio persistence - Turns a computed allocation into a durable
//! header + items record and reconstructs prior allocations for audit.
//!
//! The underlying store is not assumed to support multi-statement
//! transactions from client code, so the write path uses compensating
//! actions instead: the header is inserted first, then the items, and an
//! item failure deletes the header by id. A header must never survive
//! without its items.

use crate::{
    core::allocation::AllocationMode,
    entities::{Rateio, RateioItem, rateio, rateio_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};
use tracing::{error, info, warn};

/// Allocation configuration supplied by the caller
#[derive(Debug, Clone)]
pub struct RateioConfig {
    /// Tenant creating the allocation
    pub tenant_id: String,
    /// Generator being allocated
    pub generator_id: i64,
    /// Generator nickname to snapshot onto the record
    pub generator_nickname: String,
    /// Generator UC to snapshot onto the record
    pub generator_uc: String,
    /// Allocation policy
    pub mode: AllocationMode,
    /// Date the allocation applies to
    pub allocation_date: NaiveDate,
    /// Expected monthly generation in kWh
    pub expected_generation_kwh: f64,
    /// Free-text operator notes
    pub notes: Option<String>,
}

/// One item of an allocation creation request
#[derive(Debug, Clone)]
pub struct RateioItemInput {
    /// Subscriber receiving the share
    pub subscriber_id: i64,
    /// Subscriber name to snapshot
    pub subscriber_name: String,
    /// Subscriber UC to snapshot
    pub uc: String,
    /// Consumer number to snapshot
    pub consumption_number: String,
    /// Percentage share (percentage mode)
    pub percentage: Option<f64>,
    /// Priority rank (priority mode)
    pub priority: Option<i32>,
    /// Allocated energy in kWh, as computed by the allocation engine
    pub allocated_kwh: f64,
    /// Whether the subscriber was newly linked in this allocation event
    pub is_new_link: bool,
}

/// Full allocation creation request
#[derive(Debug, Clone)]
pub struct CreateRateioInput {
    /// Header configuration
    pub configuracao: RateioConfig,
    /// Per-subscriber items; must be non-empty
    pub rateio_items: Vec<RateioItemInput>,
}

/// A reconstructed allocation: header plus its items, denormalized as stored
#[derive(Debug, Clone, PartialEq)]
pub struct RateioData {
    /// The persisted header row
    pub header: rateio::Model,
    /// The persisted item rows
    pub items: Vec<rateio_item::Model>,
}

/// Initial lifecycle status of a freshly created allocation
const STATUS_PENDING: &str = "pendente";
/// Intermediate lifecycle status
const STATUS_PROCESSED: &str = "processado";
/// Terminal lifecycle status
const STATUS_COMPLETED: &str = "concluido";

/// Persists an allocation. The header is committed first; if any item insert
/// fails, the header is removed again (compensating delete) and the original
/// error is surfaced. Totals are recomputed from the item allocations.
pub async fn create_rateio(db: &DatabaseConnection, input: CreateRateioInput) -> Result<RateioData> {
    if input.rateio_items.is_empty() {
        return Err(Error::Validation {
            message: "A rateio requires at least one item".to_string(),
        });
    }

    let config = &input.configuracao;
    let total_distributed_kwh: f64 = input.rateio_items.iter().map(|i| i.allocated_kwh).sum();
    let energy_surplus_kwh = config.expected_generation_kwh - total_distributed_kwh;
    let now = chrono::Utc::now();

    let header = rateio::ActiveModel {
        tenant_id: Set(config.tenant_id.clone()),
        generator_id: Set(config.generator_id),
        generator_nickname: Set(config.generator_nickname.clone()),
        generator_uc: Set(config.generator_uc.clone()),
        allocation_type: Set(config.mode.as_str().to_string()),
        allocation_date: Set(config.allocation_date),
        expected_generation_kwh: Set(config.expected_generation_kwh),
        total_distributed_kwh: Set(total_distributed_kwh),
        energy_surplus_kwh: Set(energy_surplus_kwh),
        status: Set(STATUS_PENDING.to_string()),
        notes: Set(config.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let item_models: Vec<rateio_item::ActiveModel> = input
        .rateio_items
        .iter()
        .map(|item| rateio_item::ActiveModel {
            rateio_id: Set(header.id),
            subscriber_id: Set(item.subscriber_id),
            subscriber_name: Set(item.subscriber_name.clone()),
            uc: Set(item.uc.clone()),
            consumption_number: Set(item.consumption_number.clone()),
            percentage: Set(item.percentage),
            priority: Set(item.priority),
            allocated_kwh: Set(item.allocated_kwh),
            is_new_link: Set(item.is_new_link),
            ..Default::default()
        })
        .collect();

    if let Err(item_error) = RateioItem::insert_many(item_models).exec(db).await {
        warn!(
            rateio_id = header.id,
            "item insert failed, removing orphaned rateio header"
        );
        if let Err(delete_error) = Rateio::delete_by_id(header.id).exec(db).await {
            // The compensating delete itself failed; the orphan stays behind
            error!(
                rateio_id = header.id,
                %delete_error,
                "compensating delete of rateio header failed"
            );
        }
        return Err(item_error.into());
    }

    let items = RateioItem::find()
        .filter(rateio_item::Column::RateioId.eq(header.id))
        .all(db)
        .await?;

    info!(
        rateio_id = header.id,
        generator_id = config.generator_id,
        allocation_type = config.mode.as_str(),
        total_distributed_kwh,
        energy_surplus_kwh,
        item_count = items.len(),
        "rateio created"
    );

    Ok(RateioData { header, items })
}

/// Reconstructs all allocations for a tenant, most recent first, each header
/// joined with its items.
pub async fn get_rateios(db: &DatabaseConnection, tenant_id: &str) -> Result<Vec<RateioData>> {
    let rows = Rateio::find()
        .filter(rateio::Column::TenantId.eq(tenant_id))
        .order_by_desc(rateio::Column::CreatedAt)
        .order_by_desc(rateio::Column::Id)
        .find_with_related(RateioItem)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(header, items)| RateioData { header, items })
        .collect())
}

/// Finds a single allocation by header id.
pub async fn get_rateio_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<RateioData>> {
    let Some(header) = Rateio::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let items = RateioItem::find()
        .filter(rateio_item::Column::RateioId.eq(id))
        .all(db)
        .await?;
    Ok(Some(RateioData { header, items }))
}

/// Advances the lifecycle status one step:
/// `pendente -> processado -> concluido`. The chain is forward-only; a
/// completed allocation cannot move again.
pub async fn advance_status(db: &DatabaseConnection, id: i64) -> Result<rateio::Model> {
    let header = Rateio::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::RateioNotFound { id })?;

    let next = match header.status.as_str() {
        STATUS_PENDING => STATUS_PROCESSED,
        STATUS_PROCESSED => STATUS_COMPLETED,
        other => {
            return Err(Error::InvalidStatusTransition {
                from: other.to_string(),
                to: "forward".to_string(),
            });
        }
    };

    let mut active: rateio::ActiveModel = header.into();
    active.status = Set(next.to_string());
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::allocation::{self, AllocationRequest, ValidationPolicy};
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;

    fn percentage_input(items: Vec<RateioItemInput>) -> CreateRateioInput {
        CreateRateioInput {
            configuracao: RateioConfig {
                tenant_id: TEST_TENANT.to_string(),
                generator_id: 1,
                generator_nickname: "Usina Norte".to_string(),
                generator_uc: "UC-001".to_string(),
                mode: AllocationMode::Percentage,
                allocation_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                expected_generation_kwh: 1000.0,
                notes: None,
            },
            rateio_items: items,
        }
    }

    fn item(subscriber_id: i64, percentage: f64, allocated_kwh: f64) -> RateioItemInput {
        RateioItemInput {
            subscriber_id,
            subscriber_name: format!("Assinante {subscriber_id}"),
            uc: format!("UC-{subscriber_id:03}"),
            consumption_number: format!("CN-{subscriber_id:05}"),
            percentage: Some(percentage),
            priority: None,
            allocated_kwh,
            is_new_link: false,
        }
    }

    #[tokio::test]
    async fn test_create_rateio_rejects_empty_items() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_rateio(&db, percentage_input(vec![])).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rateio_computes_totals_and_defaults_pending() -> Result<()> {
        let db = setup_test_db().await?;

        let data = create_rateio(
            &db,
            percentage_input(vec![item(1, 60.0, 600.0), item(2, 40.0, 400.0)]),
        )
        .await?;

        assert_eq!(data.header.total_distributed_kwh, 1000.0);
        assert_eq!(data.header.energy_surplus_kwh, 0.0);
        assert_eq!(data.header.status, "pendente");
        assert_eq!(data.items.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rateio_negative_surplus_on_overshoot() -> Result<()> {
        let db = setup_test_db().await?;

        let data = create_rateio(
            &db,
            percentage_input(vec![item(1, 80.0, 800.0), item(2, 40.0, 400.0)]),
        )
        .await?;

        assert_eq!(data.header.total_distributed_kwh, 1200.0);
        assert_eq!(data.header.energy_surplus_kwh, -200.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_rateio(
            &db,
            percentage_input(vec![item(1, 60.0, 600.0), item(2, 40.0, 400.0)]),
        )
        .await?;

        let all = get_rateios(&db, TEST_TENANT).await?;
        assert_eq!(all.len(), 1);
        let read = &all[0];

        assert_eq!(read.header.allocation_type, "porcentagem");
        assert_eq!(read.header.expected_generation_kwh, 1000.0);
        assert_eq!(read.items.len(), created.items.len());
        let mut allocated: Vec<f64> = read.items.iter().map(|i| i.allocated_kwh).collect();
        allocated.sort_by(f64::total_cmp);
        assert_eq!(allocated, vec![400.0, 600.0]);

        // Snapshots come back exactly as stored
        assert_eq!(read.header.generator_nickname, "Usina Norte");
        assert_eq!(read.items.iter().filter(|i| i.uc == "UC-001").count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_rateios_most_recent_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_rateio(&db, percentage_input(vec![item(1, 100.0, 1000.0)])).await?;
        let second = create_rateio(&db, percentage_input(vec![item(2, 100.0, 1000.0)])).await?;

        let all = get_rateios(&db, TEST_TENANT).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].header.id, second.header.id);
        assert_eq!(all[1].header.id, first.header.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_rateios_scoped_per_tenant() -> Result<()> {
        let db = setup_test_db().await?;

        create_rateio(&db, percentage_input(vec![item(1, 100.0, 1000.0)])).await?;

        let other_tenant = get_rateios(&db, "someone-else").await?;
        assert!(other_tenant.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_item_failure_deletes_header() -> Result<()> {
        let db = setup_test_db().await?;

        // Make the item insert fail while the header insert still succeeds
        db.execute_unprepared("DROP TABLE rateio_items").await?;

        let result = create_rateio(&db, percentage_input(vec![item(1, 100.0, 1000.0)])).await;
        assert!(result.is_err());

        // The compensating delete must have removed the header
        let headers = Rateio::find().all(&db).await?;
        assert!(headers.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_engine_output_feeds_persistence() -> Result<()> {
        let db = setup_test_db().await?;

        let requests = [
            AllocationRequest {
                subscriber_id: 1,
                contracted_kwh: 0.0,
                percentage: Some(60.0),
                priority: None,
            },
            AllocationRequest {
                subscriber_id: 2,
                contracted_kwh: 0.0,
                percentage: Some(40.0),
                priority: None,
            },
        ];
        let outcome = allocation::compute(
            AllocationMode::Percentage,
            1000.0,
            &requests,
            ValidationPolicy::Lenient,
        )?;

        let items: Vec<RateioItemInput> = requests
            .iter()
            .zip(&outcome.allocated_kwh)
            .map(|(req, &kwh)| item(req.subscriber_id, req.percentage.unwrap(), kwh))
            .collect();

        let data = create_rateio(&db, percentage_input(items)).await?;
        assert_eq!(data.header.total_distributed_kwh, outcome.total_distributed_kwh);
        assert_eq!(data.header.energy_surplus_kwh, outcome.energy_surplus_kwh);
        Ok(())
    }

    #[tokio::test]
    async fn test_advance_status_forward_only() -> Result<()> {
        let db = setup_test_db().await?;

        let data = create_rateio(&db, percentage_input(vec![item(1, 100.0, 1000.0)])).await?;
        assert_eq!(data.header.status, "pendente");

        let processed = advance_status(&db, data.header.id).await?;
        assert_eq!(processed.status, "processado");

        let completed = advance_status(&db, data.header.id).await?;
        assert_eq!(completed.status, "concluido");

        let stuck = advance_status(&db, data.header.id).await;
        assert!(matches!(
            stuck.unwrap_err(),
            Error::InvalidStatusTransition { from: _, to: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_advance_status_missing_rateio() -> Result<()> {
        let db = setup_test_db().await?;

        let result = advance_status(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::RateioNotFound { id: 999 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_rateio_by_id() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_rateio(&db, percentage_input(vec![item(1, 100.0, 1000.0)])).await?;

        let found = get_rateio_by_id(&db, created.header.id).await?;
        assert_eq!(found.unwrap().items.len(), 1);

        let missing = get_rateio_by_id(&db, 999).await?;
        assert!(missing.is_none());
        Ok(())
    }
}
