//! Non-compensated-consumption reconciler.
//!
//! Determines the authoritative "consumo não compensado" quantity for an
//! invoice month. Resolution order, first match wins, no merging:
//!
//! 1. the invoice's own line items (always authoritative when present),
//! 2. the per-tenant per-month cache,
//! 3. an interactive prompt, whose answer is persisted to the cache before
//!    being returned so later invoices for the same month skip the prompt.
//!
//! Line identification is a best-effort heuristic: a case-insensitive
//! substring match against the two phrasings observed on distributor
//! invoices, with and without diacritics. Changing those phrasings is a
//! behavior change, not a refactor.

use crate::{
    entities::{ConsumoNaoCompensado, consumo_nao_compensado},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::{debug, info};

/// The two description phrasings that identify the non-compensated
/// consumption line, matched case-insensitively as substrings.
const MATCH_PHRASES: [&str; 2] = ["consumo não compensado", "consumo nao compensado"];

/// One structured line item of a scraped invoice
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InvoiceLine {
    /// Free-text description as printed on the invoice
    pub description: String,
    /// Quantity in kWh
    pub quantity: f64,
    /// Billed amount for this line, when present
    pub amount: Option<f64>,
}

/// Supplies a value for an uncached month through an interactive channel.
///
/// `Ok(None)` means the request was cancelled or abandoned by the operator;
/// the reconciler maps that to [`Error::ResolutionAbandoned`] and persists
/// nothing. Implementations own their cancellation mechanics; the reconciler
/// never waits on an unresolvable future.
#[allow(async_fn_in_trait)]
pub trait ConsumoPrompt {
    /// Requests the non-compensated consumption for the given month.
    async fn request_value(&self, month_reference: &str) -> Result<Option<f64>>;
}

fn is_non_compensated_line(description: &str) -> bool {
    let lowered = description.to_lowercase();
    MATCH_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// Scans invoice lines for a non-compensated consumption quantity.
///
/// Returns the quantity of the first matching line with a positive quantity,
/// or `None` when the heuristic finds nothing usable.
#[must_use]
pub fn find_in_lines(lines: &[InvoiceLine]) -> Option<f64> {
    lines
        .iter()
        .find(|line| is_non_compensated_line(&line.description) && line.quantity > 0.0)
        .map(|line| line.quantity)
}

/// Rewrites the quantity of the first matching line in place, leaving every
/// other field untouched. Returns whether a line was rewritten.
pub fn update_consumo_nao_compensado_in_lines(lines: &mut [InvoiceLine], value_kwh: f64) -> bool {
    for line in lines.iter_mut() {
        if is_non_compensated_line(&line.description) {
            line.quantity = value_kwh;
            return true;
        }
    }
    false
}

/// Validates the `"MM/AAAA"` month-reference format. Exact format only; no
/// normalization of alternates.
pub fn validate_month_reference(month_reference: &str) -> Result<()> {
    let invalid = || Error::Validation {
        message: format!("Month reference must be MM/AAAA, got: {month_reference}"),
    };
    let bytes = month_reference.as_bytes();
    if !month_reference.is_ascii() || bytes.len() != 7 || bytes[2] != b'/' {
        return Err(invalid());
    }
    let (month_part, year_part) = (&month_reference[..2], &month_reference[3..]);
    let month: u32 = month_part.parse().map_err(|_| invalid())?;
    let _year: u32 = year_part.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok(())
}

/// Looks up the cached value for a tenant and month. Exact string match on
/// the month reference.
pub async fn get_value_for_month(
    db: &DatabaseConnection,
    tenant_id: &str,
    month_reference: &str,
) -> Result<Option<f64>> {
    let record = ConsumoNaoCompensado::find()
        .filter(consumo_nao_compensado::Column::TenantId.eq(tenant_id))
        .filter(consumo_nao_compensado::Column::MonthReference.eq(month_reference))
        .one(db)
        .await?;
    Ok(record.map(|r| r.value_kwh))
}

/// Saves a value for a tenant and month. First save creates the row;
/// subsequent saves replace the value and bump `updated_at` while preserving
/// `created_at`.
pub async fn save_value_for_month(
    db: &DatabaseConnection,
    tenant_id: &str,
    month_reference: &str,
    value_kwh: f64,
) -> Result<consumo_nao_compensado::Model> {
    validate_month_reference(month_reference)?;
    if !value_kwh.is_finite() || value_kwh < 0.0 {
        return Err(Error::InvalidAmount { amount: value_kwh });
    }

    let now = chrono::Utc::now();
    let existing = ConsumoNaoCompensado::find()
        .filter(consumo_nao_compensado::Column::TenantId.eq(tenant_id))
        .filter(consumo_nao_compensado::Column::MonthReference.eq(month_reference))
        .one(db)
        .await?;

    if let Some(record) = existing {
        let mut active: consumo_nao_compensado::ActiveModel = record.into();
        active.value_kwh = Set(value_kwh);
        active.updated_at = Set(now);
        active.update(db).await.map_err(Into::into)
    } else {
        let record = consumo_nao_compensado::ActiveModel {
            tenant_id: Set(tenant_id.to_string()),
            month_reference: Set(month_reference.to_string()),
            value_kwh: Set(value_kwh),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        record.insert(db).await.map_err(Into::into)
    }
}

/// Removes the cached value for a tenant and month, if any. Rows are never
/// removed any other way.
pub async fn clear_month(
    db: &DatabaseConnection,
    tenant_id: &str,
    month_reference: &str,
) -> Result<()> {
    ConsumoNaoCompensado::delete_many()
        .filter(consumo_nao_compensado::Column::TenantId.eq(tenant_id))
        .filter(consumo_nao_compensado::Column::MonthReference.eq(month_reference))
        .exec(db)
        .await?;
    Ok(())
}

/// Resolves the authoritative non-compensated consumption for one invoice.
///
/// Invoice lines win over the cache; the cache wins over the prompt. A
/// prompted value is persisted before being returned. A cancelled prompt
/// resolves to [`Error::ResolutionAbandoned`] with nothing persisted.
pub async fn resolve<P>(
    db: &DatabaseConnection,
    tenant_id: &str,
    lines: &[InvoiceLine],
    month_reference: &str,
    prompt: &P,
) -> Result<f64>
where
    P: ConsumoPrompt,
{
    if let Some(value) = find_in_lines(lines) {
        debug!(month_reference, value, "non-compensated consumption taken from invoice lines");
        return Ok(value);
    }

    if let Some(value) = get_value_for_month(db, tenant_id, month_reference).await? {
        debug!(month_reference, value, "non-compensated consumption taken from cache");
        return Ok(value);
    }

    match prompt.request_value(month_reference).await? {
        Some(value) => {
            save_value_for_month(db, tenant_id, month_reference, value).await?;
            info!(month_reference, value, "non-compensated consumption supplied interactively");
            Ok(value)
        }
        None => Err(Error::ResolutionAbandoned {
            month_reference: month_reference.to_string(),
        }),
    }
}
