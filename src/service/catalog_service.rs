use std::sync::Arc;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{PriceRepository, RoutineRepository},
};

/// The public pricing table and routine showcase.
pub struct CatalogService {
    prices: Arc<dyn PriceRepository>,
    routines: Arc<dyn RoutineRepository>,
}

impl CatalogService {
    pub fn new(prices: Arc<dyn PriceRepository>, routines: Arc<dyn RoutineRepository>) -> Self {
        Self { prices, routines }
    }

    pub async fn list_prices(&self) -> Result<Vec<Price>> {
        self.prices.list().await
    }

    pub async fn get_price(&self, id: &str) -> Result<Price> {
        self.prices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Price not found".to_string()))
    }

    pub async fn create_price(&self, mut request: CreatePriceRequest) -> Result<Price> {
        request.validate()?;
        request.features = clean_features(request.features);

        let price = self.prices.create(request).await?;
        tracing::info!("Created price {} ({})", price.id, price.title);
        Ok(price)
    }

    pub async fn update_price(&self, id: &str, mut request: UpdatePriceRequest) -> Result<Price> {
        request.validate()?;
        request.features = request.features.map(clean_features);

        self.prices
            .update(id, request)
            .await?
            .ok_or_else(|| AppError::NotFound("Price not found".to_string()))
    }

    pub async fn delete_price(&self, id: &str) -> Result<()> {
        if !self.prices.delete(id).await? {
            return Err(AppError::NotFound("Price not found".to_string()));
        }
        tracing::info!("Deleted price {}", id);
        Ok(())
    }

    pub async fn list_routines(&self) -> Result<Vec<Routine>> {
        self.routines.list().await
    }

    pub async fn get_routine(&self, id: &str) -> Result<Routine> {
        self.routines
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))
    }

    pub async fn create_routine(&self, request: CreateRoutineRequest) -> Result<Routine> {
        request.validate()?;

        let routine = self.routines.create(request).await?;
        tracing::info!("Created routine {} ({})", routine.id, routine.title);
        Ok(routine)
    }

    pub async fn update_routine(&self, id: &str, request: UpdateRoutineRequest) -> Result<Routine> {
        request.validate()?;

        self.routines
            .update(id, request)
            .await?
            .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))
    }

    pub async fn delete_routine(&self, id: &str) -> Result<()> {
        if !self.routines.delete(id).await? {
            return Err(AppError::NotFound("Routine not found".to_string()));
        }
        tracing::info!("Deleted routine {}", id);
        Ok(())
    }
}
