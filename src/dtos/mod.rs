pub mod catalogdtos;
pub mod orderdtos;
pub mod supportdtos;
pub mod userdtos;
pub mod walletdtos;
pub mod wheeldtos;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Uniform response envelope: `{ success, message?, data? }` on success,
/// `{ success: false, error }` on failure (see `error::ErrorResponse`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }
    }

    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl RequestQueryDto {
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(10) as i64;
        let page = self.page.unwrap_or(1) as i64;
        (limit, (page - 1) * limit)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PaginationMetadata {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_up() {
        let meta = PaginationMetadata::new(21, 1, 10);
        assert_eq!(meta.total_pages, 3);

        let meta = PaginationMetadata::new(20, 1, 10);
        assert_eq!(meta.total_pages, 2);

        let meta = PaginationMetadata::new(0, 1, 10);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn limit_offset_defaults() {
        let query = RequestQueryDto {
            page: None,
            limit: None,
        };
        assert_eq!(query.limit_offset(), (10, 0));

        let query = RequestQueryDto {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(query.limit_offset(), (25, 50));
    }
}
