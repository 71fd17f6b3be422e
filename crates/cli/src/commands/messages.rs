//! `messages` subcommands and the public `contact` form.

use jikoni_client::AdminClient;
use jikoni_client::forms::ContactForm;
use jikoni_client::models::MessageQuery;
use jikoni_core::{MessageId, MessageStatus};

use super::require_session;
use crate::error::CliError;
use crate::output::Output;

pub async fn list(client: &AdminClient, out: Output, query: MessageQuery) -> Result<(), CliError> {
    require_session(client).await?;

    let list = client.messages().list(query).await?;
    out.messages(&list.messages)?;
    out.line(&format!("{} unread", list.unread()));
    Ok(())
}

pub async fn show(client: &AdminClient, out: Output, id: MessageId) -> Result<(), CliError> {
    require_session(client).await?;

    let message = client.messages().get(id).await?;
    out.message(&message)
}

pub async fn mark(
    client: &AdminClient,
    out: Output,
    id: MessageId,
    status: MessageStatus,
) -> Result<(), CliError> {
    require_session(client).await?;

    let ack = client.messages().update_status(id, status).await?;
    out.line(ack.message.as_deref().unwrap_or("Message updated"));
    Ok(())
}

pub async fn delete(
    client: &AdminClient,
    out: Output,
    id: MessageId,
    confirmed: bool,
) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::NotConfirmed(format!("message #{id}")));
    }
    require_session(client).await?;

    let ack = client.messages().delete(id).await?;
    out.line(ack.message.as_deref().unwrap_or("Message deleted"));
    Ok(())
}

/// Submit the public contact form. Works without logging in.
pub async fn contact(client: &AdminClient, out: Output, form: ContactForm) -> Result<(), CliError> {
    let submission = form.to_new_message()?;
    let ack = client.messages().submit(&submission).await?;
    out.line(ack.message.as_deref().unwrap_or("Message sent"));
    Ok(())
}
