//! Generator registry - Creation and lookup of power-generating plants.
//!
//! The allocation engine treats generators as a read-only collaborator; the
//! only mutation here is registration-time creation and the expected
//! generation edit exposed to the generator form.

use crate::{
    entities::{Generator, generator},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};

/// Registers a new generator, validating its identifying fields.
pub async fn create_generator(
    db: &DatabaseConnection,
    tenant_id: String,
    nickname: String,
    uc: String,
    expected_generation_kwh: f64,
) -> Result<generator::Model> {
    if nickname.trim().is_empty() {
        return Err(Error::Validation {
            message: "Generator nickname cannot be empty".to_string(),
        });
    }
    if uc.trim().is_empty() {
        return Err(Error::Validation {
            message: "Generator UC cannot be empty".to_string(),
        });
    }
    if !expected_generation_kwh.is_finite() || expected_generation_kwh < 0.0 {
        return Err(Error::InvalidAmount {
            amount: expected_generation_kwh,
        });
    }

    let model = generator::ActiveModel {
        tenant_id: Set(tenant_id),
        nickname: Set(nickname.trim().to_string()),
        uc: Set(uc.trim().to_string()),
        expected_generation_kwh: Set(expected_generation_kwh),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Finds a generator by id.
pub async fn get_generator_by_id(
    db: &DatabaseConnection,
    generator_id: i64,
) -> Result<Option<generator::Model>> {
    Generator::find_by_id(generator_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a tenant's generators, ordered by nickname.
pub async fn get_generators(
    db: &DatabaseConnection,
    tenant_id: &str,
) -> Result<Vec<generator::Model>> {
    Generator::find()
        .filter(generator::Column::TenantId.eq(tenant_id))
        .order_by_asc(generator::Column::Nickname)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a generator's projected monthly generation (generator-edit surface).
pub async fn update_expected_generation(
    db: &DatabaseConnection,
    generator_id: i64,
    expected_generation_kwh: f64,
) -> Result<generator::Model> {
    if !expected_generation_kwh.is_finite() || expected_generation_kwh < 0.0 {
        return Err(Error::InvalidAmount {
            amount: expected_generation_kwh,
        });
    }
    let model = Generator::find_by_id(generator_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::GeneratorNotFound {
            id: generator_id.to_string(),
        })?;

    let mut active: generator::ActiveModel = model.into();
    active.expected_generation_kwh = Set(expected_generation_kwh);
    active.update(db).await.map_err(Into::into)
}
