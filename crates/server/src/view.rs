//! Template view models derived from the current navigation state.

use serde::Serialize;
use storefront_core::config::StoreConfig;
use storefront_core::links::{OUTBOUND_REL, OUTBOUND_TARGET};
use storefront_core::{format_price, Catalog, NavigationState, Product, Screen};

#[derive(Clone, Debug, Serialize)]
pub struct PageView {
    pub screen: Screen,
    pub header: HeaderView,
    pub catalog: Option<CatalogView>,
    pub detail: Option<ProductDetailView>,
    pub footer: FooterView,
}

#[derive(Clone, Debug, Serialize)]
pub struct HeaderView {
    pub brand: String,
    pub home_path: &'static str,
    pub login_path: &'static str,
    pub member_area_path: &'static str,
    pub link_target: &'static str,
    pub link_rel: &'static str,
}

impl HeaderView {
    pub fn for_store(store: &StoreConfig) -> Self {
        Self {
            brand: store.name.clone(),
            home_path: HOME_PATH,
            login_path: LOGIN_PATH,
            member_area_path: MEMBER_AREA_PATH,
            link_target: OUTBOUND_TARGET,
            link_rel: OUTBOUND_REL,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CatalogView {
    pub products: Vec<ProductCardView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub image: String,
    pub price_label: String,
    pub detail_path: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductDetailView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price_label: String,
    pub back_path: &'static str,
    pub checkout_path: String,
    pub member_area_path: &'static str,
    pub purchase_notice: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FooterView {
    pub year: i32,
    pub store_name: String,
    pub provider_name: String,
}

impl FooterView {
    pub fn for_store(store: &StoreConfig, year: i32) -> Self {
        Self { year, store_name: store.name.clone(), provider_name: store.provider_name.clone() }
    }
}

pub const HOME_PATH: &str = "/";
pub const BACK_PATH: &str = "/?via=back";
pub const LOGIN_PATH: &str = "/out/login";
pub const MEMBER_AREA_PATH: &str = "/out/member-area";

impl PageView {
    pub fn build(state: &NavigationState, catalog: &Catalog, store: &StoreConfig, year: i32) -> Self {
        let (catalog_view, detail) = match state {
            NavigationState::Catalog => (Some(catalog_view(catalog, store)), None),
            NavigationState::ProductDetail { product } => (None, Some(detail_view(product, store))),
        };

        Self {
            screen: state.screen(),
            header: HeaderView::for_store(store),
            catalog: catalog_view,
            detail,
            footer: FooterView::for_store(store, year),
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self.screen {
            Screen::Catalog => "catalog.html",
            Screen::ProductDetail => "product.html",
        }
    }
}

fn catalog_view(catalog: &Catalog, store: &StoreConfig) -> CatalogView {
    let products = catalog
        .iter()
        .map(|product| ProductCardView {
            id: product.id.to_string(),
            title: product.title.clone(),
            short_description: product.short_description.clone(),
            image: product.image.clone(),
            price_label: format_price(product.price, &store.currency_symbol),
            detail_path: NavigationState::ProductDetail { product: product.clone() }.path(),
        })
        .collect();

    CatalogView { products }
}

fn detail_view(product: &Product, store: &StoreConfig) -> ProductDetailView {
    ProductDetailView {
        id: product.id.to_string(),
        title: product.title.clone(),
        description: product.detail_description().to_string(),
        image: product.image.clone(),
        price_label: format_price(product.price, &store.currency_symbol),
        back_path: BACK_PATH,
        checkout_path: format!("/out/checkout/{}", product.id),
        member_area_path: MEMBER_AREA_PATH,
        purchase_notice: store.purchase_notice.clone(),
    }
}
