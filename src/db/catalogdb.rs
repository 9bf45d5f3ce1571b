use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::catalogmodels::{Service, ServiceServer};
use crate::service::error::ServiceError;

const SERVICE_COLUMNS: &str =
    "id, name, category, description, is_active, created_at, updated_at";

const SERVER_COLUMNS: &str = r#"
    id, service_id, name, rate, min_quantity, max_quantity,
    speed, quality, is_active, created_at, updated_at
"#;

#[derive(Debug, Default, Clone)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Clone)]
pub struct ServerUpdate {
    pub name: Option<String>,
    pub rate: Option<i64>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub speed: Option<String>,
    pub quality: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
pub trait CatalogExt {
    async fn list_services(&self, include_inactive: bool) -> Result<Vec<Service>, ServiceError>;

    async fn list_servers(
        &self,
        service_id: Option<Uuid>,
        include_inactive: bool,
    ) -> Result<Vec<ServiceServer>, ServiceError>;

    async fn get_server(&self, server_id: Uuid) -> Result<Option<ServiceServer>, ServiceError>;

    async fn create_service(
        &self,
        name: String,
        category: String,
        description: Option<String>,
    ) -> Result<Service, ServiceError>;

    async fn update_service(
        &self,
        service_id: Uuid,
        update: ServiceUpdate,
    ) -> Result<Service, ServiceError>;

    async fn create_server(
        &self,
        service_id: Uuid,
        name: String,
        rate: i64,
        min_quantity: i32,
        max_quantity: i32,
        speed: Option<String>,
        quality: Option<String>,
    ) -> Result<ServiceServer, ServiceError>;

    async fn update_server(
        &self,
        server_id: Uuid,
        update: ServerUpdate,
    ) -> Result<ServiceServer, ServiceError>;
}

#[async_trait]
impl CatalogExt for DBClient {
    async fn list_services(&self, include_inactive: bool) -> Result<Vec<Service>, ServiceError> {
        let query = if include_inactive {
            format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY category, name")
        } else {
            format!(
                "SELECT {SERVICE_COLUMNS} FROM services WHERE is_active = true ORDER BY category, name"
            )
        };

        let services = sqlx::query_as::<_, Service>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }

    async fn list_servers(
        &self,
        service_id: Option<Uuid>,
        include_inactive: bool,
    ) -> Result<Vec<ServiceServer>, ServiceError> {
        let active_clause = if include_inactive {
            ""
        } else {
            " AND is_active = true"
        };

        let servers = match service_id {
            Some(service_id) => {
                sqlx::query_as::<_, ServiceServer>(&format!(
                    r#"
                    SELECT {SERVER_COLUMNS}
                    FROM service_servers
                    WHERE service_id = $1{active_clause}
                    ORDER BY rate
                    "#
                ))
                .bind(service_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ServiceServer>(&format!(
                    r#"
                    SELECT {SERVER_COLUMNS}
                    FROM service_servers
                    WHERE true{active_clause}
                    ORDER BY rate
                    "#
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(servers)
    }

    async fn get_server(&self, server_id: Uuid) -> Result<Option<ServiceServer>, ServiceError> {
        let server = sqlx::query_as::<_, ServiceServer>(&format!(
            "SELECT {SERVER_COLUMNS} FROM service_servers WHERE id = $1"
        ))
        .bind(server_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(server)
    }

    async fn create_service(
        &self,
        name: String,
        category: String,
        description: Option<String>,
    ) -> Result<Service, ServiceError> {
        let service = sqlx::query_as::<_, Service>(&format!(
            r#"
            INSERT INTO services (name, category, description)
            VALUES ($1, $2, $3)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(category)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    async fn update_service(
        &self,
        service_id: Uuid,
        update: ServiceUpdate,
    ) -> Result<Service, ServiceError> {
        let service = sqlx::query_as::<_, Service>(&format!(
            r#"
            UPDATE services
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(service_id)
        .bind(update.name)
        .bind(update.category)
        .bind(update.description)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Service"))?;

        Ok(service)
    }

    async fn create_server(
        &self,
        service_id: Uuid,
        name: String,
        rate: i64,
        min_quantity: i32,
        max_quantity: i32,
        speed: Option<String>,
        quality: Option<String>,
    ) -> Result<ServiceServer, ServiceError> {
        if rate <= 0 {
            return Err(ServiceError::Validation(
                "Rate must be positive".to_string(),
            ));
        }
        if min_quantity <= 0 || max_quantity < min_quantity {
            return Err(ServiceError::Validation(
                "Quantity bounds must satisfy 0 < min <= max".to_string(),
            ));
        }

        let server = sqlx::query_as::<_, ServiceServer>(&format!(
            r#"
            INSERT INTO service_servers
            (service_id, name, rate, min_quantity, max_quantity, speed, quality)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SERVER_COLUMNS}
            "#
        ))
        .bind(service_id)
        .bind(name)
        .bind(rate)
        .bind(min_quantity)
        .bind(max_quantity)
        .bind(speed)
        .bind(quality)
        .fetch_one(&self.pool)
        .await?;

        Ok(server)
    }

    async fn update_server(
        &self,
        server_id: Uuid,
        update: ServerUpdate,
    ) -> Result<ServiceServer, ServiceError> {
        let server = sqlx::query_as::<_, ServiceServer>(&format!(
            r#"
            UPDATE service_servers
            SET name = COALESCE($2, name),
                rate = COALESCE($3, rate),
                min_quantity = COALESCE($4, min_quantity),
                max_quantity = COALESCE($5, max_quantity),
                speed = COALESCE($6, speed),
                quality = COALESCE($7, quality),
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SERVER_COLUMNS}
            "#
        ))
        .bind(server_id)
        .bind(update.name)
        .bind(update.rate)
        .bind(update.min_quantity)
        .bind(update.max_quantity)
        .bind(update.speed)
        .bind(update.quality)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Service server"))?;

        Ok(server)
    }
}
