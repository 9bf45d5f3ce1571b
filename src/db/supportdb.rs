use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::supportmodel::*;
use crate::service::error::ServiceError;

const TICKET_COLUMNS: &str = "id, user_id, subject, status, priority, created_at, updated_at";

#[async_trait]
pub trait SupportExt {
    /// Opens a ticket with its first message in one transaction.
    async fn create_ticket(
        &self,
        user_id: Uuid,
        subject: String,
        message: String,
        priority: TicketPriority,
    ) -> Result<SupportTicket, ServiceError>;

    async fn get_user_tickets(&self, user_id: Uuid) -> Result<Vec<SupportTicket>, ServiceError>;

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<SupportTicket>, ServiceError>;

    async fn get_ticket_with_messages(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<SupportTicketWithMessages>, ServiceError>;

    /// Appends a message. Admin replies mark the ticket `answered`; user
    /// messages re-open it.
    async fn add_ticket_message(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        message: String,
        from_admin: bool,
    ) -> Result<SupportMessage, ServiceError>;

    async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SupportTicketWithUser>, ServiceError>;

    async fn count_tickets(&self, status: Option<TicketStatus>) -> Result<i64, ServiceError>;

    async fn close_ticket(&self, ticket_id: Uuid) -> Result<SupportTicket, ServiceError>;
}

#[async_trait]
impl SupportExt for DBClient {
    async fn create_ticket(
        &self,
        user_id: Uuid,
        subject: String,
        message: String,
        priority: TicketPriority,
    ) -> Result<SupportTicket, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            INSERT INTO support_tickets (user_id, subject, priority)
            VALUES ($1, $2, $3)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(subject)
        .bind(priority)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO support_messages (ticket_id, user_id, message) VALUES ($1, $2, $3)",
        )
        .bind(ticket.id)
        .bind(user_id)
        .bind(message)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ticket)
    }

    async fn get_user_tickets(&self, user_id: Uuid) -> Result<Vec<SupportTicket>, ServiceError> {
        let tickets = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            SELECT {TICKET_COLUMNS}
            FROM support_tickets
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Option<SupportTicket>, ServiceError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM support_tickets WHERE id = $1"
        ))
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn get_ticket_with_messages(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<SupportTicketWithMessages>, ServiceError> {
        let ticket = match self.get_ticket(ticket_id).await? {
            Some(ticket) => ticket,
            None => return Ok(None),
        };

        let messages = sqlx::query_as::<_, SupportMessageWithUser>(
            r#"
            SELECT m.id, m.ticket_id, m.user_id, m.message, m.created_at,
                   u.username, u.role::TEXT AS user_role
            FROM support_messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.ticket_id = $1
            ORDER BY m.created_at
            "#,
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SupportTicketWithMessages { ticket, messages }))
    }

    async fn add_ticket_message(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        message: String,
        from_admin: bool,
    ) -> Result<SupportMessage, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM support_tickets WHERE id = $1 FOR UPDATE"
        ))
        .bind(ticket_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Ticket"))?;

        if ticket.status == TicketStatus::Closed {
            return Err(ServiceError::Validation(
                "Ticket is closed".to_string(),
            ));
        }

        let saved = sqlx::query_as::<_, SupportMessage>(
            r#"
            INSERT INTO support_messages (ticket_id, user_id, message)
            VALUES ($1, $2, $3)
            RETURNING id, ticket_id, user_id, message, created_at
            "#,
        )
        .bind(ticket_id)
        .bind(user_id)
        .bind(message)
        .fetch_one(&mut *tx)
        .await?;

        let new_status = if from_admin {
            TicketStatus::Answered
        } else {
            TicketStatus::Open
        };

        sqlx::query("UPDATE support_tickets SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(ticket_id)
            .bind(new_status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SupportTicketWithUser>, ServiceError> {
        let tickets = match status {
            Some(status) => {
                sqlx::query_as::<_, SupportTicketWithUser>(
                    r#"
                    SELECT t.id, t.user_id, t.subject, t.status, t.priority,
                           t.created_at, t.updated_at,
                           u.username, u.email AS user_email
                    FROM support_tickets t
                    JOIN users u ON u.id = t.user_id
                    WHERE t.status = $1
                    ORDER BY t.updated_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SupportTicketWithUser>(
                    r#"
                    SELECT t.id, t.user_id, t.subject, t.status, t.priority,
                           t.created_at, t.updated_at,
                           u.username, u.email AS user_email
                    FROM support_tickets t
                    JOIN users u ON u.id = t.user_id
                    ORDER BY t.updated_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(tickets)
    }

    async fn count_tickets(&self, status: Option<TicketStatus>) -> Result<i64, ServiceError> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM support_tickets WHERE status = $1",
                )
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM support_tickets")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    async fn close_ticket(&self, ticket_id: Uuid) -> Result<SupportTicket, ServiceError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            UPDATE support_tickets
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(ticket_id)
        .bind(TicketStatus::Closed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Ticket"))?;

        Ok(ticket)
    }
}
