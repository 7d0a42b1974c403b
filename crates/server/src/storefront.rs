//! Storefront routes: the catalog and product detail screens plus outbound redirects.
//!
//! HTML Endpoints:
//! - `GET  /`                   : catalog screen (`?via=back` when reached from a detail page)
//! - `GET  /products/{id}`      : product detail screen
//!
//! Outbound Endpoints (303 to the external provider):
//! - `GET  /out/login`          : provider login
//! - `GET  /out/member-area`    : provider member area
//! - `GET  /out/checkout/{id}`  : provider checkout for a product

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
    Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use storefront_core::config::{StoreConfig, StorefrontConfig};
use storefront_core::{
    ApplicationError, Catalog, ExternalLinks, InterfaceError, LinkOpener, NavigationAction,
    NavigationState, OutboundTarget, Product, ProductId, TransitionOutcome, ViewController,
};
use tera::{Context, Tera};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::view::{FooterView, HeaderView, PageView};

const EMBEDDED_TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../../templates/storefront/base.html")),
    ("catalog.html", include_str!("../../../templates/storefront/catalog.html")),
    ("product.html", include_str!("../../../templates/storefront/product.html")),
    ("error.html", include_str!("../../../templates/storefront/error.html")),
];

#[derive(Clone)]
pub struct StorefrontState {
    catalog: Arc<Catalog>,
    store: Arc<StoreConfig>,
    links: ExternalLinks,
    templates: Arc<Tera>,
    opener: Arc<dyn LinkOpener>,
}

impl StorefrontState {
    pub fn new(
        catalog: Arc<Catalog>,
        config: &StorefrontConfig,
        opener: Arc<dyn LinkOpener>,
    ) -> Self {
        Self {
            catalog,
            store: Arc::new(config.store.clone()),
            links: config.external_links(),
            templates: init_templates(),
            opener,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct CatalogQuery {
    pub via: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Initialize Tera with the storefront templates, falling back to the embedded copies.
fn init_templates() -> Arc<Tera> {
    let mut tera = match Tera::new("templates/storefront/**/*") {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "Failed to load storefront templates from filesystem, using embedded templates");
            Tera::default()
        }
    };

    let incomplete = {
        let loaded: Vec<&str> = tera.get_template_names().collect();
        EMBEDDED_TEMPLATES.iter().any(|(name, _)| !loaded.contains(name))
    };
    if incomplete {
        if let Err(e) = tera.add_raw_templates(EMBEDDED_TEMPLATES) {
            error!(error = %e, "Failed to register embedded storefront templates");
        }
    }

    Arc::new(tera)
}

pub fn router(state: StorefrontState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        // HTML routes
        .route("/", get(catalog_page))
        .route("/products/{id}", get(product_page))
        // Outbound routes
        .route("/out/login", get(open_login))
        .route("/out/member-area", get(open_member_area))
        .route("/out/checkout/{id}", get(open_checkout))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// HTML Handlers
// ---------------------------------------------------------------------------

async fn catalog_page(
    Query(query): Query<CatalogQuery>,
    State(state): State<StorefrontState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let correlation_id = Uuid::new_v4().to_string();
    let action = match query.via.as_deref().map(str::trim) {
        Some("back") => NavigationAction::Back,
        _ => NavigationAction::GoToCatalog,
    };

    let mut controller = ViewController::new();
    let outcome = controller.dispatch(action);
    log_transition(&outcome, &correlation_id);

    render_page(&state, controller.state(), &correlation_id)
}

async fn product_page(
    Path(product_id): Path<String>,
    State(state): State<StorefrontState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let correlation_id = Uuid::new_v4().to_string();
    let product = lookup_product(&state, product_id, &correlation_id)?;

    let mut controller = ViewController::new();
    let outcome = controller.dispatch(NavigationAction::SelectProduct(product));
    log_transition(&outcome, &correlation_id);

    render_page(&state, controller.state(), &correlation_id)
}

// ---------------------------------------------------------------------------
// Outbound Handlers
// ---------------------------------------------------------------------------

async fn open_login(State(state): State<StorefrontState>) -> Redirect {
    follow(&state, OutboundTarget::Login)
}

async fn open_member_area(State(state): State<StorefrontState>) -> Redirect {
    follow(&state, OutboundTarget::MemberArea)
}

async fn open_checkout(
    Path(product_id): Path<String>,
    State(state): State<StorefrontState>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let correlation_id = Uuid::new_v4().to_string();
    let product = lookup_product(&state, product_id, &correlation_id)?;
    Ok(follow(&state, OutboundTarget::Checkout(&product)))
}

fn follow(state: &StorefrontState, target: OutboundTarget<'_>) -> Redirect {
    let link = ViewController::new().follow(target, &state.links, state.opener.as_ref());
    Redirect::to(&link.url)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lookup_product(
    state: &StorefrontState,
    raw_id: String,
    correlation_id: &str,
) -> Result<Product, (StatusCode, Html<String>)> {
    let product_id = ProductId(raw_id);
    match state.catalog.find(&product_id) {
        Some(product) => Ok(product.clone()),
        None => Err(error_page(
            state,
            ApplicationError::ProductNotFound(product_id).into_interface(correlation_id),
        )),
    }
}

fn render_page(
    state: &StorefrontState,
    navigation: &NavigationState,
    correlation_id: &str,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let page = PageView::build(navigation, &state.catalog, &state.store, current_year());

    let mut context = Context::new();
    context.insert("header", &page.header);
    context.insert("footer", &page.footer);
    context.insert("page", &page);

    state.templates.render(page.template_name(), &context).map(Html).map_err(|e| {
        error_page(
            state,
            ApplicationError::Rendering(format!("{e:?}")).into_interface(correlation_id),
        )
    })
}

fn error_page(state: &StorefrontState, error: InterfaceError) -> (StatusCode, Html<String>) {
    let status = match &error {
        InterfaceError::NotFound { message, correlation_id } => {
            warn!(
                event_name = "storefront.request.not_found",
                correlation_id = %correlation_id,
                detail = %message,
                "storefront request did not match a product"
            );
            StatusCode::NOT_FOUND
        }
        InterfaceError::Internal { message, correlation_id } => {
            error!(
                event_name = "storefront.request.failed",
                correlation_id = %correlation_id,
                error = %message,
                "storefront request failed"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let mut context = Context::new();
    context.insert("header", &HeaderView::for_store(&state.store));
    context.insert("footer", &FooterView::for_store(&state.store, current_year()));
    context.insert(
        "error",
        &serde_json::json!({
            "status": status.as_u16(),
            "message": error.user_message(),
            "correlation_id": error.correlation_id(),
        }),
    );

    let html = state.templates.render("error.html", &context).unwrap_or_else(|_| {
        format!("<h1>{}</h1><p>{}</p>", status.as_u16(), error.user_message())
    });
    (status, Html(html))
}

fn log_transition(outcome: &TransitionOutcome, correlation_id: &str) {
    info!(
        event_name = "storefront.navigation.transition",
        correlation_id = %correlation_id,
        from = ?outcome.from,
        to = ?outcome.to,
        action = ?outcome.action,
        product_id = outcome.product_id.as_ref().map(ProductId::as_str).unwrap_or("none"),
        "navigation transition applied"
    );
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use rust_decimal::Decimal;
    use storefront_core::{
        Catalog, OutboundKind, Product, ProductId, RecordingLinkOpener, StorefrontConfig,
    };
    use tower::ServiceExt;

    use super::*;

    fn product(id: &str, title: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            title: title.to_string(),
            price: Decimal::new(4990, 2),
            image: format!("https://cdn.example.com/{id}.jpg"),
            checkout_url: format!("https://pay.example.com/{id}"),
            short_description: format!("Resumo {id}"),
            description: None,
        }
    }

    fn app_with(catalog: Catalog) -> (Router, RecordingLinkOpener) {
        let opener = RecordingLinkOpener::default();
        let state = StorefrontState::new(
            Arc::new(catalog),
            &StorefrontConfig::default(),
            Arc::new(opener.clone()),
        );
        (router(state, "static"), opener)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router response");
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
        (status, String::from_utf8_lossy(&body).into_owned(), location)
    }

    #[tokio::test]
    async fn catalog_page_lists_builtin_product() {
        let (app, _) = app_with(Catalog::builtin());
        let (status, body, _) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data-screen=\"catalog\""));
        assert!(body.contains("data-product-id=\"novenario\""));
        assert!(body.contains("Novenário Completo + Coletânea Espiritual"));
        assert!(body.contains("R$ 19.90"));
        assert!(body.contains("Entrar"));
        assert!(body.contains("Minha área"));
    }

    #[tokio::test]
    async fn catalog_page_renders_each_product_once_in_order() {
        let catalog = Catalog::new(vec![
            product("terco", "Terço Meditado"),
            product("salmos", "Salmos Comentados"),
            product("biblia", "Plano de Leitura"),
        ])
        .expect("catalog");
        let (app, _) = app_with(catalog);
        let (_, body, _) = get(app, "/").await;

        assert_eq!(body.matches("class=\"product-card\"").count(), 3);
        let positions: Vec<usize> = ["terco", "salmos", "biblia"]
            .iter()
            .map(|id| {
                body.find(&format!("data-product-id=\"{id}\"")).expect("card should be rendered")
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn empty_catalog_renders_placeholder() {
        let (app, _) = app_with(Catalog::default());
        let (status, body, _) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Nenhum produto disponível"));
        assert_eq!(body.matches("class=\"product-card\"").count(), 0);
    }

    #[tokio::test]
    async fn product_page_shows_selected_product() {
        let (app, _) = app_with(Catalog::builtin());
        let (status, body, _) = get(app, "/products/novenario").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data-screen=\"product_detail\""));
        assert!(body.contains("data-product-id=\"novenario\""));
        assert!(body.contains("Novenário Completo + Coletânea Espiritual"));
        assert!(body.contains("R$ 19.90"));
        assert!(body.contains("Liberar Acesso"));
        assert!(body.contains("Acessar conteúdo"));
        assert!(body.contains("garantia de 7 dias"));
        assert!(!body.contains("class=\"product-card\""));
    }

    #[tokio::test]
    async fn back_and_brand_routes_return_to_catalog() {
        for uri in ["/?via=back", "/"] {
            let (app, _) = app_with(Catalog::builtin());
            let (status, body, _) = get(app, uri).await;

            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("data-screen=\"catalog\""), "{uri} should render the catalog");
        }
    }

    #[tokio::test]
    async fn unknown_product_returns_not_found_page() {
        let (app, opener) = app_with(Catalog::builtin());
        let (status, body, _) = get(app, "/products/ghost").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("The page you are looking for is not available."));
        assert!(body.contains("data-status=\"404\""));
        assert!(opener.opened().is_empty());
    }

    #[tokio::test]
    async fn checkout_redirects_to_product_checkout_url() {
        let (app, opener) = app_with(Catalog::builtin());
        let (status, _, location) = get(app, "/out/checkout/novenario").await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("https://pay.kiwify.com.br/4Fjji3c"));

        let opened = opener.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].kind, OutboundKind::Checkout);
    }

    #[tokio::test]
    async fn checkout_for_unknown_product_is_not_followed() {
        let (app, opener) = app_with(Catalog::builtin());
        let (status, _, location) = get(app, "/out/checkout/ghost").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(location.is_none());
        assert!(opener.opened().is_empty());
    }

    #[tokio::test]
    async fn provider_links_redirect_to_configured_urls() {
        let config = StorefrontConfig::default();

        let (app, opener) = app_with(Catalog::builtin());
        let (status, _, location) = get(app, "/out/login").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some(config.store.login_url.as_str()));
        assert_eq!(opener.opened()[0].kind, OutboundKind::Login);

        let (app, opener) = app_with(Catalog::builtin());
        let (status, _, location) = get(app, "/out/member-area").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some(config.store.member_area_url.as_str()));
        assert_eq!(opener.opened()[0].kind, OutboundKind::MemberArea);
    }

    #[tokio::test]
    async fn card_link_for_slug_id_reaches_its_detail_screen() {
        let catalog = Catalog::new(vec![
            product("kit-basico_2", "Kit Básico"),
            product("terco", "Terço Meditado"),
        ])
        .expect("catalog");

        let (app, _) = app_with(catalog.clone());
        let (_, body, _) = get(app, "/").await;
        assert!(body.contains("href=\"/products/kit-basico_2\""));

        let (app, opener) = app_with(catalog);
        let (status, body, _) = get(app.clone(), "/products/kit-basico_2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data-screen=\"product_detail\""));
        assert!(body.contains("data-product-id=\"kit-basico_2\""));
        assert!(body.contains("Kit Básico"));

        let (status, _, location) = get(app, "/out/checkout/kit-basico_2").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("https://pay.example.com/kit-basico_2"));
        assert_eq!(opener.opened().len(), 1);
    }

    #[tokio::test]
    async fn outbound_links_open_in_new_browsing_context() {
        let (app, _) = app_with(Catalog::builtin());
        let (_, body, _) = get(app, "/").await;
        assert!(body.contains(
            "class=\"nav-login\" href=\"/out/login\" target=\"_blank\" rel=\"noreferrer\""
        ));
        assert!(body.contains(
            "class=\"nav-member-area\" href=\"/out/member-area\" target=\"_blank\" rel=\"noreferrer\""
        ));
        assert!(body.contains("href=\"/products/novenario\" data-action=\"select-product\""));

        let (app, _) = app_with(Catalog::builtin());
        let (_, body, _) = get(app, "/products/novenario").await;
        assert!(body.contains(
            "href=\"/out/checkout/novenario\" target=\"_blank\" rel=\"noreferrer\" data-action=\"checkout\""
        ));
        assert!(body.contains(
            "href=\"/out/member-area\" target=\"_blank\" rel=\"noreferrer\" data-action=\"member-area\""
        ));
        assert_eq!(body.matches("target=\"_blank\" rel=\"noreferrer\"").count(), 4);
    }

    #[test]
    fn embedded_templates_cover_every_screen() {
        let templates = init_templates();
        let names: Vec<&str> = templates.get_template_names().collect();
        for (name, _) in EMBEDDED_TEMPLATES {
            assert!(names.contains(&name), "{name} should be registered");
        }
    }
}
