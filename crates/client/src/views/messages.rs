//! Contact message inbox.
//!
//! Same lifecycle as the product screen. The modal shows one message; the
//! submission it guards is a status change (mark read, mark replied).

use tracing::{debug, instrument};

use jikoni_core::{MessageId, MessageStatus};

use super::Phase;
use crate::client::AdminClient;
use crate::error::ApiError;
use crate::models::{Message, MessageQuery};
use crate::navigator::Route;

#[derive(Debug)]
pub enum Event {
    Mounted { has_token: bool },
    Loaded(Result<Vec<Message>, ApiError>),
    /// Show only messages with this status; `None` shows all.
    FilterChanged(Option<MessageStatus>),
    Open(MessageId),
    CloseModal,
    /// Change the status of the open message.
    Mark(MessageStatus),
    StatusUpdated(Result<(), ApiError>),
    DeleteRequested { id: MessageId, confirmed: bool },
    Deleted(Result<(), ApiError>),
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Redirect(Route),
    Fetch(MessageQuery),
    UpdateStatus(MessageId, MessageStatus),
    Delete(MessageId),
}

#[derive(Debug, Default)]
pub struct MessagesView {
    phase: Phase,
    messages: Vec<Message>,
    filter: Option<MessageStatus>,
    selected: Option<MessageId>,
    error: Option<String>,
    pending_delete: Option<MessageId>,
    mounted: bool,
}

impl MessagesView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub const fn filter(&self) -> Option<MessageStatus> {
        self.filter
    }

    /// The message shown in the modal.
    #[must_use]
    pub fn selected(&self) -> Option<&Message> {
        let id = self.selected?;
        self.messages.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Messages still marked new.
    #[must_use]
    pub fn unread(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.status == MessageStatus::New)
            .count()
    }

    const fn query(&self) -> MessageQuery {
        MessageQuery {
            status: self.filter,
            page: None,
            per_page: None,
        }
    }

    pub fn handle(&mut self, event: Event) -> Option<Effect> {
        if !self.phase.is_live() {
            debug!(phase = ?self.phase, ?event, "Ignoring event");
            return None;
        }

        match (self.phase, event) {
            (_, Event::Unmounted) => {
                self.phase = Phase::Unmounted;
                None
            }

            (_, Event::Mounted { .. }) if self.mounted => {
                debug!("Already mounted");
                None
            }
            (Phase::Loading, Event::Mounted { has_token: false }) => {
                self.mounted = true;
                self.phase = Phase::Redirecting;
                Some(Effect::Redirect(Route::Login))
            }
            (Phase::Loading, Event::Mounted { has_token: true }) => {
                self.mounted = true;
                Some(Effect::Fetch(self.query()))
            }

            (_, Event::Loaded(Err(e))) if e.is_unauthorized() => {
                self.phase = Phase::Redirecting;
                None
            }
            (_, Event::Loaded(result)) => {
                match result {
                    Ok(messages) => {
                        self.messages = messages;
                        self.error = None;
                    }
                    Err(e) => self.error = Some(e.user_message()),
                }
                if self.phase == Phase::Loading {
                    self.phase = Phase::Ready;
                }
                None
            }

            (Phase::Ready, Event::FilterChanged(filter)) => {
                if filter == self.filter {
                    return None;
                }
                self.filter = filter;
                Some(Effect::Fetch(self.query()))
            }

            (Phase::Ready, Event::Open(id)) => {
                if self.messages.iter().any(|m| m.id == id) {
                    self.selected = Some(id);
                    self.error = None;
                    self.phase = Phase::ModalOpen;
                }
                None
            }
            (Phase::ModalOpen, Event::CloseModal) => {
                self.selected = None;
                self.phase = Phase::Ready;
                None
            }
            (Phase::ModalOpen, Event::Mark(status)) => {
                let message = self.selected()?;
                if message.status == status {
                    return None;
                }
                let id = message.id;
                self.phase = Phase::Submitting;
                Some(Effect::UpdateStatus(id, status))
            }
            (Phase::Submitting, Event::StatusUpdated(result)) => match result {
                Ok(()) => {
                    self.selected = None;
                    self.phase = Phase::Ready;
                    Some(Effect::Fetch(self.query()))
                }
                Err(e) if e.is_unauthorized() => {
                    self.phase = Phase::Redirecting;
                    None
                }
                Err(e) => {
                    self.error = Some(e.user_message());
                    self.phase = Phase::ModalOpen;
                    None
                }
            },

            (Phase::Ready, Event::DeleteRequested { id, confirmed }) => {
                if !confirmed || self.pending_delete.is_some() {
                    return None;
                }
                self.pending_delete = Some(id);
                self.error = None;
                Some(Effect::Delete(id))
            }
            (_, Event::Deleted(result)) if self.pending_delete.is_some() => {
                self.pending_delete = None;
                match result {
                    Ok(()) => Some(Effect::Fetch(self.query())),
                    Err(e) if e.is_unauthorized() => {
                        self.phase = Phase::Redirecting;
                        None
                    }
                    Err(e) => {
                        self.error = Some(e.user_message());
                        None
                    }
                }
            }

            (phase, event) => {
                debug!(?phase, ?event, "Event not valid in this phase");
                None
            }
        }
    }

    /// Run `event` and every resulting effect against `client`.
    #[instrument(skip_all)]
    pub async fn dispatch(&mut self, client: &AdminClient, event: Event) {
        let mut next = self.handle(event);
        while let Some(effect) = next {
            let Some(event) = run(client, effect).await else {
                break;
            };
            next = self.handle(event);
        }
    }
}

async fn run(client: &AdminClient, effect: Effect) -> Option<Event> {
    let messages = client.messages();
    match effect {
        Effect::Redirect(route) => {
            client.navigate(route);
            None
        }
        Effect::Fetch(query) => Some(Event::Loaded(
            messages.list(query).await.map(|list| list.messages),
        )),
        Effect::UpdateStatus(id, status) => Some(Event::StatusUpdated(
            messages.update_status(id, status).await.map(|_| ()),
        )),
        Effect::Delete(id) => Some(Event::Deleted(messages.delete(id).await.map(|_| ()))),
    }
}
