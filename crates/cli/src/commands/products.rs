//! `products` subcommands.

use jikoni_client::forms::{ProductField, ProductForm};
use jikoni_client::models::ProductQuery;
use jikoni_client::views::Phase;
use jikoni_client::views::products::{Event, ProductsView};
use jikoni_client::{AdminClient, ApiError};
use jikoni_core::{Category, ProductId};
use tracing::{info, warn};

use super::require_session;
use crate::error::CliError;
use crate::output::Output;

/// Field values given on the command line; unset fields keep their
/// current (or default) value.
#[derive(Debug, Default)]
pub struct FieldArgs {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub featured: Option<bool>,
    pub image_url: Option<String>,
}

impl FieldArgs {
    fn apply(self, form: &mut ProductForm) {
        let changes = [
            self.name.map(ProductField::Name),
            self.category.map(ProductField::Category),
            self.description.map(ProductField::Description),
            self.price.map(ProductField::Price),
            self.featured.map(ProductField::Featured),
            self.image_url.map(ProductField::ImageUrl),
        ];
        for change in changes.into_iter().flatten() {
            form.set(change);
        }
    }
}

pub async fn list(client: &AdminClient, out: Output, query: ProductQuery) -> Result<(), CliError> {
    let page = client.products().list(query).await?;
    out.products(&page.products)?;
    if let (Some(current), Some(pages)) = (page.current_page, page.pages) {
        out.line(&format!(
            "Page {current} of {pages} ({} products)",
            page.total.unwrap_or(page.products.len() as u64)
        ));
    }
    Ok(())
}

pub async fn show(client: &AdminClient, out: Output, id: ProductId) -> Result<(), CliError> {
    let product = client.products().get(id).await?;
    out.product(&product)
}

pub async fn create(client: &AdminClient, out: Output, fields: FieldArgs) -> Result<(), CliError> {
    require_session(client).await?;

    let mut form = ProductForm::default();
    fields.apply(&mut form);
    let draft = form.to_draft()?;

    let saved = client.products().create(&draft).await?;
    match saved.record {
        Some(product) => {
            info!(product_id = %product.id, "Product created");
            out.product(&product)
        }
        None => {
            out.line(saved.message.as_deref().unwrap_or("Product created"));
            Ok(())
        }
    }
}

/// Load the product, apply the given fields, and send the full record back.
pub async fn update(
    client: &AdminClient,
    out: Output,
    id: ProductId,
    fields: FieldArgs,
) -> Result<(), CliError> {
    require_session(client).await?;

    let current = client.products().get(id).await?;
    let mut form = ProductForm::from_product(&current);
    fields.apply(&mut form);
    let draft = form.to_draft()?;

    let saved = client.products().update(id, &draft).await?;
    match saved.record {
        Some(product) => out.product(&product),
        None => {
            out.line(saved.message.as_deref().unwrap_or("Product updated"));
            Ok(())
        }
    }
}

/// Delete through the product screen so the list is refreshed exactly as
/// the admin panel does it.
pub async fn delete(
    client: &AdminClient,
    out: Output,
    id: ProductId,
    confirmed: bool,
) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::NotConfirmed(format!("product #{id}")));
    }

    let mut view = ProductsView::new();
    let has_token = client.session().is_authenticated().await;
    view.dispatch(client, Event::Mounted { has_token }).await;
    if view.phase() == Phase::Redirecting {
        return Err(CliError::NotLoggedIn);
    }

    view.dispatch(client, Event::DeleteRequested { id, confirmed })
        .await;

    report_delete(out, id, &view)
}

/// A confirmed deletion succeeds even when the list refresh after it fails.
fn report_delete(out: Output, id: ProductId, view: &ProductsView) -> Result<(), CliError> {
    if view.phase() == Phase::Redirecting {
        return Err(ApiError::Unauthorized.into());
    }
    if view.last_deleted() != Some(id) {
        let error = view.list_error().unwrap_or("Product was not deleted");
        return Err(CliError::Other(error.to_owned()));
    }

    out.line(&format!("Deleted product #{id}"));
    if let Some(error) = view.list_error() {
        warn!(%error, "Product list could not be refreshed");
        return Ok(());
    }
    out.products(view.products())
}

#[cfg(test)]
mod tests {
    use jikoni_client::views::products::Effect;

    use super::*;

    fn deleting(id: ProductId) -> ProductsView {
        let mut view = ProductsView::new();
        view.handle(Event::Mounted { has_token: true });
        view.handle(Event::Loaded(Ok(Vec::new())));
        assert_eq!(
            view.handle(Event::DeleteRequested { id, confirmed: true }),
            Some(Effect::Delete(id))
        );
        view
    }

    #[test]
    fn test_refresh_failure_still_reports_deletion() {
        let id = ProductId::new(4);
        let mut view = deleting(id);
        view.handle(Event::Deleted(Ok(())));
        view.handle(Event::Loaded(Err(ApiError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        })));

        assert!(report_delete(Output::new(true), id, &view).is_ok());
    }

    #[test]
    fn test_rejected_delete_is_an_error() {
        let id = ProductId::new(4);
        let mut view = deleting(id);
        view.handle(Event::Deleted(Err(ApiError::Api {
            status: 404,
            message: "Product not found".into(),
        })));

        let err = report_delete(Output::new(true), id, &view).unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn test_expired_session_during_delete_is_unauthorized() {
        let id = ProductId::new(4);
        let mut view = deleting(id);
        view.handle(Event::Deleted(Err(ApiError::Unauthorized)));

        let err = report_delete(Output::new(true), id, &view).unwrap_err();
        assert!(matches!(err, CliError::Api(ApiError::Unauthorized)));
    }
}
