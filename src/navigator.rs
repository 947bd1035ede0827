use tracing::debug;

use crate::error::NavigationError;

/// Mutually exclusive storefront views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Cart,
    Checkout,
    Confirmation,
    Tracking,
    StoreLocator,
}

/// Facts about the session a transition may depend on.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationContext {
    pub cart_is_empty: bool,
    pub has_order: bool,
}

/// Tracks the current page and guards transitions into pages that need a
/// cart or an order.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Page,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    /// Moves to `to` and returns the page that was left.
    pub fn navigate(&mut self, to: Page, context: NavigationContext) -> Result<Page, NavigationError> {
        match to {
            Page::Checkout if context.cart_is_empty => return Err(NavigationError::EmptyCart),
            Page::Confirmation | Page::Tracking if !context.has_order => {
                return Err(NavigationError::NoOrder(to))
            }
            _ => {}
        }

        let from = std::mem::replace(&mut self.current, to);
        debug!(?from, ?to, "Navigated");
        Ok(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: NavigationContext = NavigationContext {
        cart_is_empty: true,
        has_order: false,
    };

    #[test]
    fn test_starts_at_home() {
        assert_eq!(Navigator::new().current(), Page::Home);
    }

    #[test]
    fn test_checkout_needs_items() {
        let mut nav = Navigator::new();
        assert_eq!(nav.navigate(Page::Checkout, EMPTY), Err(NavigationError::EmptyCart));
        assert_eq!(nav.current(), Page::Home);

        let filled = NavigationContext { cart_is_empty: false, ..EMPTY };
        assert_eq!(nav.navigate(Page::Checkout, filled), Ok(Page::Home));
        assert_eq!(nav.current(), Page::Checkout);
    }

    #[test]
    fn test_order_pages_need_an_order() {
        let mut nav = Navigator::new();
        assert_eq!(
            nav.navigate(Page::Tracking, EMPTY),
            Err(NavigationError::NoOrder(Page::Tracking))
        );

        let ordered = NavigationContext { has_order: true, ..EMPTY };
        assert!(nav.navigate(Page::Confirmation, ordered).is_ok());
        assert!(nav.navigate(Page::Tracking, ordered).is_ok());
        assert_eq!(nav.current(), Page::Tracking);
    }

    #[test]
    fn test_free_pages_always_reachable() {
        let mut nav = Navigator::new();
        for page in [Page::Cart, Page::StoreLocator, Page::Home] {
            assert!(nav.navigate(page, EMPTY).is_ok());
        }
    }
}
