use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::supportmodel::{TicketPriority, TicketStatus};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTicketDto {
    #[validate(length(min = 1, max = 200, message = "Subject must be between 1-200 characters"))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Message must be between 1-5000 characters"))]
    pub message: String,

    pub priority: Option<TicketPriority>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddMessageDto {
    #[validate(length(min = 1, max = 5000, message = "Message must be between 1-5000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TicketQueryDto {
    pub status: Option<TicketStatus>,

    #[validate(range(min = 1))]
    pub page: Option<usize>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}
