use crate::links::{ExternalLinks, LinkOpener, OutboundLink, OutboundTarget};
use crate::navigation::states::{NavigationAction, NavigationState, TransitionOutcome};

/// Pure, total transition function for the two-screen navigation machine.
pub fn transition(
    current: &NavigationState,
    action: NavigationAction,
) -> (NavigationState, TransitionOutcome) {
    let from = current.screen();
    let action_kind = action.kind();

    let next = match action {
        NavigationAction::SelectProduct(product) => NavigationState::ProductDetail { product },
        NavigationAction::Back | NavigationAction::GoToCatalog => NavigationState::Catalog,
    };

    let outcome = TransitionOutcome {
        from,
        to: next.screen(),
        action: action_kind,
        product_id: next.selected_product().map(|product| product.id.clone()),
    };
    (next, outcome)
}

/// Sole owner of the navigation state for one session.
#[derive(Clone, Debug, Default)]
pub struct ViewController {
    state: NavigationState,
}

impl ViewController {
    pub fn new() -> Self {
        Self { state: NavigationState::Catalog }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn dispatch(&mut self, action: NavigationAction) -> TransitionOutcome {
        let (next, outcome) = transition(&self.state, action);
        self.state = next;
        outcome
    }

    /// Hand an outbound link to `opener`. Navigation state is left untouched.
    pub fn follow<O>(
        &self,
        target: OutboundTarget<'_>,
        links: &ExternalLinks,
        opener: &O,
    ) -> OutboundLink
    where
        O: LinkOpener + ?Sized,
    {
        let link = target.resolve(links);
        opener.open(&link);
        link
    }
}
