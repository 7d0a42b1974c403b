use storefront_core::{LinkOpener, OutboundLink};
use tracing::info;

/// Records outbound navigations; the browser follows the redirect itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLinkOpener;

impl LinkOpener for TracingLinkOpener {
    fn open(&self, link: &OutboundLink) {
        info!(
            event_name = "storefront.outbound.opened",
            kind = ?link.kind,
            url = %link.url,
            "outbound link opened"
        );
    }
}
