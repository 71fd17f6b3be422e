//! Contact messages: public submission and the admin inbox.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use jikoni_core::{MessageId, MessageStatus};

use crate::error::ApiError;
use crate::gateway::{Access, Gateway};
use crate::models::{Ack, Message, MessageList, MessageQuery, NewMessage};

#[derive(Debug, Clone, Copy)]
pub struct MessagesClient<'a> {
    gateway: &'a Gateway,
}

impl<'a> MessagesClient<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Submit the public contact form. No token is sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 400 if the API rejects the fields.
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn submit(&self, message: &NewMessage) -> Result<Ack, ApiError> {
        let body = self
            .gateway
            .send_json(Access::Public, Method::POST, "/api/messages", message)
            .await?;
        Ok(Ack::from_body(&body))
    }

    /// The inbox, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token was rejected.
    #[instrument(skip(self))]
    pub async fn list(&self, query: MessageQuery) -> Result<MessageList, ApiError> {
        self.gateway.get_json(Access::Bearer, &query.path()).await
    }

    /// A single message.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 if no such message exists.
    #[instrument(skip(self), fields(message_id = %id))]
    pub async fn get(&self, id: MessageId) -> Result<Message, ApiError> {
        self.gateway
            .get_json(Access::Bearer, &format!("/api/messages/{id}"))
            .await
    }

    /// Mark a message new, read or replied.
    ///
    /// # Errors
    ///
    /// As [`MessagesClient::list`].
    #[instrument(skip(self), fields(message_id = %id, status = %status))]
    pub async fn update_status(&self, id: MessageId, status: MessageStatus) -> Result<Ack, ApiError> {
        let body = self
            .gateway
            .send_json(
                Access::Bearer,
                Method::PUT,
                &format!("/api/messages/{id}"),
                &json!({ "status": status }),
            )
            .await?;
        Ok(Ack::from_body(&body))
    }

    /// Delete a message.
    ///
    /// # Errors
    ///
    /// As [`MessagesClient::list`].
    #[instrument(skip(self), fields(message_id = %id))]
    pub async fn delete(&self, id: MessageId) -> Result<Ack, ApiError> {
        let body = self.gateway.delete(&format!("/api/messages/{id}")).await?;
        Ok(Ack::from_body(&body))
    }
}
