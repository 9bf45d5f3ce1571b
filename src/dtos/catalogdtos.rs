use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::catalogdb::{ServerUpdate, ServiceUpdate};
use crate::models::catalogmodels::{Service, ServiceServer};

/// Storefront view: a service with its active tiers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceWithServersDto {
    #[serde(flatten)]
    pub service: Service,
    pub servers: Vec<ServiceServer>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateServiceDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1-50 characters"))]
    pub category: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateServiceDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1-50 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateServiceDto> for ServiceUpdate {
    fn from(dto: UpdateServiceDto) -> Self {
        ServiceUpdate {
            name: dto.name,
            category: dto.category,
            description: dto.description,
            is_active: dto.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateServerDto {
    pub service_id: uuid::Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 1, message = "Rate must be positive"))]
    pub rate: i64,

    #[validate(range(min = 1, message = "Minimum quantity must be positive"))]
    pub min_quantity: i32,

    #[validate(range(min = 1, message = "Maximum quantity must be positive"))]
    pub max_quantity: i32,

    pub speed: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateServerDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 1, message = "Rate must be positive"))]
    pub rate: Option<i64>,

    #[validate(range(min = 1, message = "Minimum quantity must be positive"))]
    pub min_quantity: Option<i32>,

    #[validate(range(min = 1, message = "Maximum quantity must be positive"))]
    pub max_quantity: Option<i32>,

    pub speed: Option<String>,
    pub quality: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateServerDto> for ServerUpdate {
    fn from(dto: UpdateServerDto) -> Self {
        ServerUpdate {
            name: dto.name,
            rate: dto.rate,
            min_quantity: dto.min_quantity,
            max_quantity: dto.max_quantity,
            speed: dto.speed,
            quality: dto.quality,
            is_active: dto.is_active,
        }
    }
}
