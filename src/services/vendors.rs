use crate::{db::DbPool, entities::vendors, errors::ServiceError};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, message = "Vendor name must not be blank"))]
    pub name: String,
    #[validate(length(min = 15, max = 15, message = "GSTIN must be 15 characters"))]
    pub gstin: Option<String>,
    #[validate(length(min = 2, max = 3))]
    pub state_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Registry of registered vendors; their state code feeds the GST split.
#[derive(Clone)]
pub struct VendorService {
    db: Arc<DbPool>,
}

impl VendorService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_vendor(
        &self,
        request: CreateVendorRequest,
    ) -> Result<vendors::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(format!("Invalid input: {}", e)))?;

        let now = Utc::now();
        let vendor = vendors::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            gstin: Set(request.gstin),
            state_code: Set(request.state_code),
            phone: Set(request.phone),
            email: Set(request.email),
            address: Set(request.address),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = vendor.insert(&*self.db).await.map_err(ServiceError::db_error)?;

        info!(vendor_id = %saved.id, "vendor created");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<vendors::Model>, ServiceError> {
        let vendor = vendors::Entity::find_by_id(vendor_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(vendor)
    }

    #[instrument(skip(self))]
    pub async fn list_vendors(&self) -> Result<Vec<vendors::Model>, ServiceError> {
        let vendors = vendors::Entity::find()
            .order_by_asc(vendors::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(vendors)
    }

    #[instrument(skip(self))]
    pub async fn find_by_state(
        &self,
        state_code: &str,
    ) -> Result<Vec<vendors::Model>, ServiceError> {
        let vendors = vendors::Entity::find()
            .filter(vendors::Column::StateCode.eq(state_code))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(vendors)
    }
}
