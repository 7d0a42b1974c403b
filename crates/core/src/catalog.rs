use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;
use crate::links::is_absolute_http_url;

pub const BUILTIN_PRODUCT_ID: &str = "novenario";

/// Read-only, ordered product list built once at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            validate_product(product)?;
            if !seen.insert(product.id.clone()) {
                return Err(DomainError::DuplicateProductId(product.id.clone()));
            }
        }

        Ok(Self { products })
    }

    /// The catalog shipped with the storefront.
    pub fn builtin() -> Self {
        Self { products: builtin_products() }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_product(product: &Product) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidProduct {
        product_id: product.id.clone(),
        reason: reason.to_string(),
    };

    if product.id.as_str().trim().is_empty() {
        return Err(DomainError::InvariantViolation("product id must not be empty".to_string()));
    }
    if !is_slug(product.id.as_str()) {
        return Err(invalid("id may only contain ASCII letters, digits, `-` and `_`"));
    }
    if product.title.trim().is_empty() {
        return Err(invalid("title must not be empty"));
    }
    if product.price < Decimal::ZERO {
        return Err(invalid("price must not be negative"));
    }
    if !is_absolute_http_url(&product.checkout_url) {
        return Err(invalid("checkout_url must be an absolute http(s) URL"));
    }
    if !is_absolute_http_url(&product.image) {
        return Err(invalid("image must be an absolute http(s) URL"));
    }

    Ok(())
}

// Ids become a single path segment in `/products/{id}` and `/out/checkout/{id}`.
fn is_slug(id: &str) -> bool {
    id.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn builtin_products() -> Vec<Product> {
    vec![Product {
        id: ProductId(BUILTIN_PRODUCT_ID.to_string()),
        title: "Novenário Completo + Coletânea Espiritual".to_string(),
        price: Decimal::new(199, 1),
        image: "https://images.unsplash.com/photo-1531219432768-9f540ce91ef1?q=80&w=1200&auto=format&fit=crop"
            .to_string(),
        checkout_url: "https://pay.kiwify.com.br/4Fjji3c".to_string(),
        short_description: "Uma coletânea completa com mais de 80 Novenas organizadas passo a passo, \
                            bônus exclusivos e acesso vitalício para fortalecer sua espiritualidade."
            .to_string(),
        description: Some(
            "Mais de 80 novenas organizadas, bônus exclusivos (versículos explicados, Quaresma de \
             São Miguel, espiritualidade das novenas, história das novenas) e acesso vitalício em \
             qualquer dispositivo."
                .to_string(),
        ),
    }]
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Catalog, BUILTIN_PRODUCT_ID};
    use crate::domain::product::{Product, ProductId};
    use crate::errors::DomainError;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId(id.to_string()),
            title: format!("Product {id}"),
            price: Decimal::new(cents, 2),
            image: format!("https://cdn.example.com/{id}.jpg"),
            checkout_url: format!("https://pay.example.com/{id}"),
            short_description: format!("About {id}"),
            description: None,
        }
    }

    #[test]
    fn builtin_catalog_contains_novenario() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 1);

        let product = catalog.find(&ProductId::from(BUILTIN_PRODUCT_ID)).expect("builtin product");
        assert_eq!(product.title, "Novenário Completo + Coletânea Espiritual");
        assert_eq!(product.price, Decimal::new(199, 1));
    }

    #[test]
    fn enumeration_preserves_insertion_order() {
        let catalog =
            Catalog::new(vec![product("c", 300), product("a", 100), product("b", 200)])
                .expect("valid catalog");

        let ids: Vec<&str> = catalog.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(catalog.products().len(), 3);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let error = Catalog::new(vec![product("a", 100), product("a", 200)])
            .expect_err("duplicate ids should fail");
        assert_eq!(error, DomainError::DuplicateProductId(ProductId::from("a")));
    }

    #[test]
    fn rejects_negative_price() {
        let error =
            Catalog::new(vec![product("a", -1)]).expect_err("negative price should fail");
        assert!(matches!(error, DomainError::InvalidProduct { ref reason, .. } if reason.contains("negative")));
    }

    #[test]
    fn rejects_ids_that_are_not_a_single_path_segment() {
        for id in ["kit/basico", "a?b", "kit#1", "kit basico", "ação"] {
            let error = Catalog::new(vec![product(id, 100)]).expect_err("id should be rejected");
            assert!(
                matches!(error, DomainError::InvalidProduct { ref product_id, ref reason }
                    if product_id.as_str() == id && reason.contains("id may only contain")),
                "{id} produced {error:?}"
            );
        }

        let catalog = Catalog::new(vec![product("kit-basico_2", 100)]).expect("slug id is valid");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn rejects_checkout_and_image_urls_that_are_not_absolute_http() {
        for checkout_url in ["javascript:alert(1)", "ftp://pay.example.com/a", "/checkout/a"] {
            let mut candidate = product("a", 100);
            candidate.checkout_url = checkout_url.to_string();
            let error = Catalog::new(vec![candidate]).expect_err("checkout url should fail");
            assert!(
                matches!(error, DomainError::InvalidProduct { ref reason, .. } if reason.contains("checkout_url")),
                "{checkout_url} produced {error:?}"
            );
        }

        let mut candidate = product("a", 100);
        candidate.image = "images/a.jpg".to_string();
        let error = Catalog::new(vec![candidate]).expect_err("relative image should fail");
        assert!(matches!(error, DomainError::InvalidProduct { ref reason, .. } if reason.contains("image")));
    }

    #[test]
    fn free_product_is_accepted() {
        let catalog = Catalog::new(vec![product("free", 0)]).expect("zero price is valid");
        assert!(!catalog.is_empty());
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::new(Vec::new()).expect("empty catalog");
        assert!(catalog.is_empty());
        assert!(catalog.find(&ProductId::from("any")).is_none());
    }
}
