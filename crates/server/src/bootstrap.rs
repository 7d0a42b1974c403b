use std::sync::Arc;

use storefront_core::config::StorefrontConfig;
use storefront_core::{Catalog, DomainError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: StorefrontConfig,
    pub catalog: Arc<Catalog>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("catalog construction failed: {0}")]
    Catalog(#[source] DomainError),
}

pub fn bootstrap_with_config(config: StorefrontConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = config.build_catalog().map_err(BootstrapError::Catalog)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        product_count = catalog.len(),
        "catalog loaded"
    );

    Ok(Application { config, catalog: Arc::new(catalog) })
}

#[cfg(test)]
mod tests {
    use storefront_core::config::StorefrontConfig;

    use super::{bootstrap_with_config, BootstrapError};

    #[test]
    fn bootstrap_with_default_config_uses_builtin_catalog() {
        let app = bootstrap_with_config(StorefrontConfig::default()).expect("bootstrap");
        assert_eq!(app.catalog.len(), 1);
        assert_eq!(app.catalog.products()[0].id.as_str(), "novenario");
    }

    #[test]
    fn bootstrap_rejects_invalid_configured_catalog() {
        let mut config = StorefrontConfig::default();
        let product = config.build_catalog().expect("builtin").products()[0].clone();
        config.catalog.products = Some(vec![product.clone(), product]);

        let result = bootstrap_with_config(config);
        assert!(matches!(result, Err(BootstrapError::Catalog(_))));
    }
}
