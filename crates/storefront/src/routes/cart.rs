//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads;
//! plain form posts fall back to a redirect. The cart itself lives in the
//! session's store record.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopverse_core::store::Action;
use shopverse_core::types::{EventPayload, ProductId, kinds};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{apply_actions, load_store, record_engagement};
use crate::routes::{back_path, is_htmx};
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Render the count fragment for HTMX, or redirect a plain form post back.
fn count_or_back(headers: &HeaderMap, count: u32) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate { count },
        )
            .into_response()
    } else {
        Redirect::to(&back_path(headers)).into_response()
    }
}

/// Add item to cart (HTMX).
///
/// Merges into an existing line for the same product, awards the add-to-cart
/// coins, and records the engagement event. Returns the count badge with an
/// HTMX trigger so the rewards and analytics panels refresh.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?
        .clone();
    let quantity = form.quantity.unwrap_or(1);

    let mut store = load_store(&session).await;
    apply_actions(
        &session,
        &mut store,
        [Action::AddToCart {
            product: product.clone(),
            quantity,
        }],
    )
    .await?;
    record_engagement(
        &session,
        &mut store,
        kinds::ADD_TO_CART,
        EventPayload::Product {
            product_id: product.id,
            product_name: product.name.clone(),
            price: Some(product.price.amount),
            category: Some(product.category.clone()),
        },
        Some(&product.name),
    )
    .await?;

    let id_string = id.to_string();
    add_breadcrumb(
        "cart",
        "Added product to cart",
        Some(&[("product_id", id_string.as_str())]),
    );

    let count = store.cart_count();
    if is_htmx(&headers) {
        Ok((
            AppendHeaders([("HX-Trigger", "cart-updated, coins-updated, analytics-updated")]),
            CartCountTemplate { count },
        )
            .into_response())
    } else {
        Ok(Redirect::to(&back_path(&headers)).into_response())
    }
}

/// Update cart item quantity (HTMX).
///
/// Quantity zero removes the line.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut store = load_store(&session).await;
    apply_actions(
        &session,
        &mut store,
        [Action::SetQuantity {
            product_id: ProductId::new(form.product_id),
            quantity: form.quantity,
        }],
    )
    .await?;

    Ok(count_or_back(&headers, store.cart_count()))
}

/// Remove item from cart (HTMX).
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut store = load_store(&session).await;
    apply_actions(
        &session,
        &mut store,
        [Action::RemoveFromCart(ProductId::new(form.product_id))],
    )
    .await?;

    Ok(count_or_back(&headers, store.cart_count()))
}

/// Empty the cart (HTMX).
#[instrument(skip(session, headers))]
pub async fn clear(session: Session, headers: HeaderMap) -> Result<Response> {
    let mut store = load_store(&session).await;
    apply_actions(&session, &mut store, [Action::ClearCart]).await?;

    Ok(count_or_back(&headers, store.cart_count()))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let store = load_store(&session).await;
    CartCountTemplate {
        count: store.cart_count(),
    }
}
