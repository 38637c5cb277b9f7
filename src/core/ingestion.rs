//! Invoice ingestion coordinator - Drives one invoice-processing attempt
//! through its states.
//!
//! `CHECK_EXISTING` short-circuits when an issued invoice already exists for
//! the consumer unit. Otherwise the invoice is fetched from the scraper,
//! its non-compensated consumption reconciled (rewriting the matching line
//! in place), and the result is either queued for validation (invoice
//! fetched for a known subscriber) or returned directly (ad-hoc lookup).
//!
//! Queued records move `pendente -> aprovada` or `pendente -> rejeitada`.
//! Approval is the only cross-table move: the issued invoice is inserted
//! first, and the validation record is deleted only after that insert
//! succeeds.

use crate::{
    core::consumo::{self, ConsumoPrompt, update_consumo_nao_compensado_in_lines},
    entities::{
        InvoiceValidation, invoice_validation, issued_invoice,
    },
    errors::{Error, Result},
    scraper::{InvoiceScraper, ScrapeRequest, ScrapedInvoice},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};
use tracing::{info, warn};

/// Persisted literal for a queued validation record
pub const STATUS_PENDENTE: &str = "pendente";
/// Persisted literal for an approved validation record
pub const STATUS_APROVADA: &str = "aprovada";
/// Persisted literal for a rejected validation record
pub const STATUS_REJEITADA: &str = "rejeitada";

/// Where the ingestion attempt originated
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Tenant performing the ingestion
    pub tenant_id: String,
    /// Subscriber the invoice was fetched for, when selected from a list.
    /// `None` means an ad-hoc manual lookup.
    pub known_subscriber: Option<KnownSubscriber>,
}

/// Subscriber identification carried into the validation queue
#[derive(Debug, Clone)]
pub struct KnownSubscriber {
    /// Subscriber id
    pub id: i64,
    /// Subscriber display name
    pub name: String,
}

/// Terminal outcome of one ingestion attempt
#[derive(Debug, Clone)]
pub enum IngestionOutcome {
    /// An issued invoice already existed for the consumer unit; nothing was
    /// re-fetched or re-reconciled
    AlreadyProcessed(issued_invoice::Model),
    /// The invoice was fetched, reconciled, and queued for validation
    Queued(invoice_validation::Model),
    /// The invoice was fetched and reconciled for an ad-hoc lookup
    Completed {
        /// The fetched invoice with its consumption line rewritten
        invoice: ScrapedInvoice,
        /// The reconciled non-compensated consumption in kWh
        consumo_kwh: f64,
    },
}

/// Runs one invoice-processing attempt end to end.
pub async fn process_invoice<S, P>(
    db: &DatabaseConnection,
    scraper: &S,
    prompt: &P,
    request: &ScrapeRequest,
    ctx: &IngestionContext,
) -> Result<IngestionOutcome>
where
    S: InvoiceScraper,
    P: ConsumoPrompt,
{
    // CHECK_EXISTING: a saved artifact for this consumer unit wins outright
    let existing = issued_invoice::Entity::find()
        .filter(issued_invoice::Column::TenantId.eq(ctx.tenant_id.as_str()))
        .filter(issued_invoice::Column::Uc.eq(request.uc.as_str()))
        .order_by_desc(issued_invoice::Column::CreatedAt)
        .one(db)
        .await?;
    if let Some(issued) = existing {
        info!(uc = %request.uc, issued_id = issued.id, "invoice already processed");
        return Ok(IngestionOutcome::AlreadyProcessed(issued));
    }

    // FETCHING: upstream failures propagate with their message intact
    let mut invoice = scraper.fetch_invoice(request).await?;

    // RECONCILING
    let consumo_kwh = consumo::resolve(
        db,
        &ctx.tenant_id,
        &invoice.lines,
        &invoice.month_reference,
        prompt,
    )
    .await?;
    update_consumo_nao_compensado_in_lines(&mut invoice.lines, consumo_kwh);

    // Routing: known subscriber -> validation queue; ad-hoc lookup -> done
    match &ctx.known_subscriber {
        Some(subscriber) => {
            let now = chrono::Utc::now();
            let record = invoice_validation::ActiveModel {
                tenant_id: Set(ctx.tenant_id.clone()),
                uc: Set(request.uc.clone()),
                subscriber_id: Set(Some(subscriber.id)),
                subscriber_name: Set(Some(subscriber.name.clone())),
                month_reference: Set(invoice.month_reference.clone()),
                fatura_url: Set(invoice.fatura_url.clone()),
                pdf_path: Set(invoice.pdf_path.clone()),
                consumo_nao_compensado_kwh: Set(consumo_kwh),
                status: Set(STATUS_PENDENTE.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!(
                uc = %request.uc,
                validation_id = record.id,
                subscriber_id = subscriber.id,
                "invoice queued for validation"
            );
            Ok(IngestionOutcome::Queued(record))
        }
        None => {
            info!(uc = %request.uc, consumo_kwh, "ad-hoc invoice lookup completed");
            Ok(IngestionOutcome::Completed {
                invoice,
                consumo_kwh,
            })
        }
    }
}

/// Lists a tenant's queued validation records, oldest first.
pub async fn get_pending_validations(
    db: &DatabaseConnection,
    tenant_id: &str,
) -> Result<Vec<invoice_validation::Model>> {
    InvoiceValidation::find()
        .filter(invoice_validation::Column::TenantId.eq(tenant_id))
        .filter(invoice_validation::Column::Status.eq(STATUS_PENDENTE))
        .order_by_asc(invoice_validation::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Approves a queued validation record: materializes an issued invoice, then
/// deletes the queue row. Only `pendente` records can be approved. If the
/// issued-invoice insert fails, the validation record is left untouched.
pub async fn approve_validation(
    db: &DatabaseConnection,
    validation_id: i64,
) -> Result<issued_invoice::Model> {
    let record = InvoiceValidation::find_by_id(validation_id)
        .one(db)
        .await?
        .ok_or(Error::ValidationRecordNotFound { id: validation_id })?;

    if record.status != STATUS_PENDENTE {
        return Err(Error::InvalidStatusTransition {
            from: record.status,
            to: STATUS_APROVADA.to_string(),
        });
    }

    // Insert into the issued set first; the queue row is only removed once
    // the issued invoice durably exists
    let issued = issued_invoice::ActiveModel {
        tenant_id: Set(record.tenant_id.clone()),
        uc: Set(record.uc.clone()),
        subscriber_id: Set(record.subscriber_id),
        month_reference: Set(record.month_reference.clone()),
        fatura_url: Set(record.fatura_url.clone()),
        pdf_path: Set(record.pdf_path.clone()),
        consumo_nao_compensado_kwh: Set(record.consumo_nao_compensado_kwh),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    if let Err(delete_error) = record.delete(db).await {
        // The issued invoice exists; the leftover queue row is harmless but logged
        warn!(validation_id, %delete_error, "approved validation row could not be deleted");
        return Err(delete_error.into());
    }

    info!(validation_id, issued_id = issued.id, "invoice validation approved");
    Ok(issued)
}

/// Rejects a queued validation record. The row is retained with its terminal
/// `rejeitada` status.
pub async fn reject_validation(
    db: &DatabaseConnection,
    validation_id: i64,
) -> Result<invoice_validation::Model> {
    let record = InvoiceValidation::find_by_id(validation_id)
        .one(db)
        .await?
        .ok_or(Error::ValidationRecordNotFound { id: validation_id })?;

    if record.status != STATUS_PENDENTE {
        return Err(Error::InvalidStatusTransition {
            from: record.status,
            to: STATUS_REJEITADA.to_string(),
        });
    }

    let mut active: invoice_validation::ActiveModel = record.into();
    active.status = Set(STATUS_REJEITADA.to_string());
    active.updated_at = Set(chrono::Utc::now());
    let rejected = active.update(db).await?;
    info!(validation_id, "invoice validation rejected");
    Ok(rejected)
}
