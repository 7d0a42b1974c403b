pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod links;
pub mod money;
pub mod navigation;

pub use catalog::Catalog;
pub use config::{ConfigError, LoadOptions, StorefrontConfig};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use links::{
    ExternalLinks, LinkOpener, OutboundKind, OutboundLink, OutboundTarget, RecordingLinkOpener,
};
pub use money::format_price;
pub use navigation::{
    transition, ActionKind, NavigationAction, NavigationState, Screen, TransitionOutcome,
    ViewController,
};
