//! Product management screen.
//!
//! ```text
//! Loading --Loaded--> Ready --OpenCreate/OpenEdit--> ModalOpen --Submit--> Submitting
//!    |                  ^  \                            ^   |                 |
//!    | no token         |   DeleteRequested{confirmed}  |   CloseModal        | Saved(Ok)
//!    v                  |   -> Delete -> Deleted(Ok)    |                     |
//! Redirecting           +--- Fetch <--------------------+---------------------+
//! ```

use tracing::{debug, instrument};

use jikoni_core::ProductId;

use super::Phase;
use crate::client::AdminClient;
use crate::error::ApiError;
use crate::forms::{ProductField, ProductForm};
use crate::models::{Product, ProductDraft, ProductQuery};
use crate::navigator::Route;

/// Inputs to [`ProductsView::handle`].
#[derive(Debug)]
pub enum Event {
    /// Screen opened; `has_token` is whether a session exists.
    Mounted { has_token: bool },
    /// Result of a list fetch.
    Loaded(Result<Vec<Product>, ApiError>),
    OpenCreate,
    OpenEdit(ProductId),
    Change(ProductField),
    CloseModal,
    Submit,
    /// Result of a create or update.
    Saved(Result<(), ApiError>),
    /// Delete button pressed; `confirmed` is the answer to the confirmation prompt.
    DeleteRequested { id: ProductId, confirmed: bool },
    Deleted(Result<(), ApiError>),
    Unmounted,
}

/// Work the view asks its driver to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Redirect(Route),
    Fetch,
    Create(ProductDraft),
    Update(ProductId, ProductDraft),
    Delete(ProductId),
}

/// State of the product management screen.
#[derive(Debug, Default)]
pub struct ProductsView {
    phase: Phase,
    products: Vec<Product>,
    form: ProductForm,
    editing: Option<ProductId>,
    form_error: Option<String>,
    list_error: Option<String>,
    pending_delete: Option<ProductId>,
    last_deleted: Option<ProductId>,
    /// Set by the first `Mounted`; later ones are ignored.
    mounted: bool,
}

impl ProductsView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn form(&self) -> &ProductForm {
        &self.form
    }

    /// Product being edited, `None` when the modal creates a new one.
    #[must_use]
    pub const fn editing(&self) -> Option<ProductId> {
        self.editing
    }

    /// Inline error on the modal.
    #[must_use]
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Error from the last list fetch or delete.
    #[must_use]
    pub fn list_error(&self) -> Option<&str> {
        self.list_error.as_deref()
    }

    /// The most recent product the API confirmed as deleted.
    #[must_use]
    pub const fn last_deleted(&self) -> Option<ProductId> {
        self.last_deleted
    }

    /// Apply one event.
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
                Some(Effect::Fetch)
            }

            (_, Event::Loaded(result)) => {
                self.on_loaded(result);
                None
            }

            (Phase::Ready, Event::OpenCreate) => {
                self.open_modal(None, ProductForm::default());
                None
            }
            (Phase::Ready, Event::OpenEdit(id)) => {
                let form = self
                    .products
                    .iter()
                    .find(|p| p.id == id)
                    .map(ProductForm::from_product)?;
                self.open_modal(Some(id), form);
                None
            }

            (Phase::ModalOpen, Event::Change(field)) => {
                self.form.set(field);
                None
            }
            (Phase::ModalOpen, Event::CloseModal) => {
                self.close_modal();
                None
            }
            (Phase::ModalOpen, Event::Submit) => match self.form.to_draft() {
                Ok(draft) => {
                    self.form_error = None;
                    self.phase = Phase::Submitting;
                    Some(match self.editing {
                        Some(id) => Effect::Update(id, draft),
                        None => Effect::Create(draft),
                    })
                }
                Err(e) => {
                    self.form_error = Some(e.to_string());
                    None
                }
            },
            (Phase::Submitting, Event::Saved(result)) => match result {
                Ok(()) => {
                    self.close_modal();
                    Some(Effect::Fetch)
                }
                Err(e) if e.is_unauthorized() => {
                    self.phase = Phase::Redirecting;
                    None
                }
                Err(e) => {
                    self.form_error = Some(e.user_message());
                    self.phase = Phase::ModalOpen;
                    None
                }
            },

            (Phase::Ready, Event::DeleteRequested { id, confirmed }) => {
                if !confirmed || self.pending_delete.is_some() {
                    return None;
                }
                self.pending_delete = Some(id);
                self.list_error = None;
                Some(Effect::Delete(id))
            }
            (_, Event::Deleted(result)) if self.pending_delete.is_some() => {
                let id = self.pending_delete.take();
                match result {
                    Ok(()) => {
                        self.last_deleted = id;
                        Some(Effect::Fetch)
                    }
                    Err(e) if e.is_unauthorized() => {
                        self.phase = Phase::Redirecting;
                        None
                    }
                    Err(e) => {
                        self.list_error = Some(e.user_message());
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

    /// Feed `event` through the view, running every effect it produces
    /// against `client` until the view settles.
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

    fn on_loaded(&mut self, result: Result<Vec<Product>, ApiError>) {
        match result {
            Ok(products) => {
                self.products = products;
                self.list_error = None;
            }
            Err(e) if e.is_unauthorized() => {
                self.phase = Phase::Redirecting;
                return;
            }
            Err(e) => self.list_error = Some(e.user_message()),
        }
        if self.phase == Phase::Loading {
            self.phase = Phase::Ready;
        }
    }

    fn open_modal(&mut self, editing: Option<ProductId>, form: ProductForm) {
        self.editing = editing;
        self.form = form;
        self.form_error = None;
        self.phase = Phase::ModalOpen;
    }

    fn close_modal(&mut self) {
        self.editing = None;
        self.form = ProductForm::default();
        self.form_error = None;
        self.phase = Phase::Ready;
    }
}

async fn run(client: &AdminClient, effect: Effect) -> Option<Event> {
    let products = client.products();
    match effect {
        Effect::Redirect(route) => {
            client.navigate(route);
            None
        }
        Effect::Fetch => Some(Event::Loaded(
            products
                .list(ProductQuery::default())
                .await
                .map(|page| page.products),
        )),
        Effect::Create(draft) => Some(Event::Saved(products.create(&draft).await.map(|_| ()))),
        Effect::Update(id, draft) => {
            Some(Event::Saved(products.update(id, &draft).await.map(|_| ())))
        }
        Effect::Delete(id) => Some(Event::Deleted(products.delete(id).await.map(|_| ()))),
    }
}
