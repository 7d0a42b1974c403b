use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Browsing context every outbound link opens in.
pub const OUTBOUND_TARGET: &str = "_blank";
pub const OUTBOUND_REL: &str = "noreferrer";

/// Provider URLs that are not tied to a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLinks {
    pub login_url: String,
    pub member_area_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundKind {
    Login,
    MemberArea,
    Checkout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundTarget<'a> {
    Login,
    MemberArea,
    Checkout(&'a Product),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundLink {
    pub kind: OutboundKind,
    pub url: String,
}

impl OutboundTarget<'_> {
    pub fn kind(&self) -> OutboundKind {
        match self {
            Self::Login => OutboundKind::Login,
            Self::MemberArea => OutboundKind::MemberArea,
            Self::Checkout(_) => OutboundKind::Checkout,
        }
    }

    pub fn resolve(&self, links: &ExternalLinks) -> OutboundLink {
        let url = match self {
            Self::Login => links.login_url.clone(),
            Self::MemberArea => links.member_area_url.clone(),
            Self::Checkout(product) => product.checkout_url.clone(),
        };
        OutboundLink { kind: self.kind(), url }
    }
}

/// Absolute `http(s)` URL with a non-empty host and no whitespace.
pub fn is_absolute_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or_default();
    let host = rest.split(&['/', '?', '#'][..]).next().unwrap_or_default();

    !host.is_empty() && !value.chars().any(char::is_whitespace)
}

/// Capability that performs a fire-and-forget navigation to an external URL.
pub trait LinkOpener: Send + Sync {
    fn open(&self, link: &OutboundLink);
}

#[derive(Clone, Default)]
pub struct RecordingLinkOpener {
    opened: Arc<Mutex<Vec<OutboundLink>>>,
}

impl RecordingLinkOpener {
    pub fn opened(&self) -> Vec<OutboundLink> {
        match self.opened.lock() {
            Ok(opened) => opened.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LinkOpener for RecordingLinkOpener {
    fn open(&self, link: &OutboundLink) {
        match self.opened.lock() {
            Ok(mut opened) => opened.push(link.clone()),
            Err(poisoned) => poisoned.into_inner().push(link.clone()),
        }
    }
}
