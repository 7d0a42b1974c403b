use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// Which screen is currently rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationState {
    #[default]
    Catalog,
    ProductDetail { product: Product },
}

impl NavigationState {
    pub fn screen(&self) -> Screen {
        match self {
            Self::Catalog => Screen::Catalog,
            Self::ProductDetail { .. } => Screen::ProductDetail,
        }
    }

    pub fn selected_product(&self) -> Option<&Product> {
        match self {
            Self::Catalog => None,
            Self::ProductDetail { product } => Some(product),
        }
    }

    /// Path that renders this state when requested again.
    pub fn path(&self) -> String {
        match self {
            Self::Catalog => "/".to_string(),
            Self::ProductDetail { product } => format!("/products/{}", product.id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Catalog,
    ProductDetail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationAction {
    SelectProduct(Product),
    Back,
    /// Header brand action; collapses to the catalog from anywhere.
    GoToCatalog,
}

impl NavigationAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::SelectProduct(_) => ActionKind::SelectProduct,
            Self::Back => ActionKind::Back,
            Self::GoToCatalog => ActionKind::GoToCatalog,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SelectProduct,
    Back,
    GoToCatalog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: Screen,
    pub to: Screen,
    pub action: ActionKind,
    pub product_id: Option<ProductId>,
}
