use std::env;
use std::fs;
use std::path::Path;

use storefront_core::config::{resolve_config_path, LoadOptions, StorefrontConfig};
use toml::Value;

pub fn run() -> String {
    let config = match StorefrontConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: Option<&str>| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];

    let fields: [(&str, String, Option<&str>); 12] = [
        ("store.name", config.store.name.clone(), Some("STOREFRONT_STORE_NAME")),
        (
            "store.currency_symbol",
            config.store.currency_symbol.clone(),
            Some("STOREFRONT_STORE_CURRENCY_SYMBOL"),
        ),
        ("store.login_url", config.store.login_url.clone(), Some("STOREFRONT_STORE_LOGIN_URL")),
        (
            "store.member_area_url",
            config.store.member_area_url.clone(),
            Some("STOREFRONT_STORE_MEMBER_AREA_URL"),
        ),
        (
            "store.provider_name",
            config.store.provider_name.clone(),
            Some("STOREFRONT_STORE_PROVIDER_NAME"),
        ),
        (
            "store.purchase_notice",
            config.store.purchase_notice.clone(),
            Some("STOREFRONT_STORE_PURCHASE_NOTICE"),
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            Some("STOREFRONT_SERVER_BIND_ADDRESS"),
        ),
        ("server.port", config.server.port.to_string(), Some("STOREFRONT_SERVER_PORT")),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            Some("STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS"),
        ),
        (
            "server.static_dir",
            config.server.static_dir.display().to_string(),
            Some("STOREFRONT_SERVER_STATIC_DIR"),
        ),
        ("logging.level", config.logging.level.clone(), Some("STOREFRONT_LOGGING_LEVEL")),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            Some("STOREFRONT_LOGGING_FORMAT"),
        ),
    ];

    for (key, value, env_key) in fields {
        lines.push(render_line(key, &value, source(key, env_key)));
    }

    let product_count = config.build_catalog().map(|catalog| catalog.len()).unwrap_or_default();
    let catalog_source = match source("catalog.products", None).as_str() {
        "default" => "default (builtin)".to_string(),
        other => other.to_string(),
    };
    lines.push(render_line(
        "catalog.products",
        &format!("{product_count} product(s)"),
        catalog_source,
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_file_documents() {
        let doc: Value = "[store]\nname = \"Loja\"\n".parse().expect("toml");
        assert!(contains_path(&doc, "store.name"));
        assert!(!contains_path(&doc, "store.login_url"));
        assert!(!contains_path(&doc, "server.port"));
    }

    #[test]
    fn file_source_is_reported_when_key_present() {
        let doc: Value = "[server]\nport = 9000\n".parse().expect("toml");
        let source = field_source(
            "server.port",
            Some("STOREFRONT_TEST_UNSET_PORT_KEY"),
            Some(&doc),
            Some(std::path::Path::new("storefront.toml")),
        );
        assert_eq!(source, "file (storefront.toml)");
        assert_eq!(field_source("server.bind_address", None, Some(&doc), None), "default");
    }
}
