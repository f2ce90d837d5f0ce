//! The storefront's navigation state machine.
//!
//! Each live page is on exactly one [`Screen`], derived from its URL. Actions
//! are [`Transition`]s; [`Screen::next`] lists where a transition may land.
//! Two transitions can be rejected by the application (a failed login, a
//! checkout form with a missing field) and therefore list their origin screen
//! among the outcomes.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Login,
    Inventory,
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    CheckoutComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    SubmitLogin,
    OpenCart,
    Logout,
    ContinueShopping,
    Checkout,
    ContinueToOverview,
    Cancel,
    Finish,
    BackToProducts,
}

/// Error banner shared by the login form and the checkout form.
pub(crate) const ERROR_BANNER: &str = "[data-test=\"error\"]";

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Login,
        Screen::Inventory,
        Screen::Cart,
        Screen::CheckoutInfo,
        Screen::CheckoutOverview,
        Screen::CheckoutComplete,
    ];

    /// Application path of the screen, relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Screen::Login => "/",
            Screen::Inventory => "/inventory.html",
            Screen::Cart => "/cart.html",
            Screen::CheckoutInfo => "/checkout-step-one.html",
            Screen::CheckoutOverview => "/checkout-step-two.html",
            Screen::CheckoutComplete => "/checkout-complete.html",
        }
    }

    /// Element whose visibility signals that the screen has rendered.
    pub fn marker(self) -> &'static str {
        match self {
            Screen::Login => "#login-button",
            Screen::Inventory => ".inventory_list",
            Screen::Cart => ".cart_list",
            Screen::CheckoutInfo => ".checkout_info",
            Screen::CheckoutOverview => ".summary_info",
            Screen::CheckoutComplete => ".complete-header",
        }
    }

    /// Text of the `.title` header, if the screen has one.
    pub fn title(self) -> Option<&'static str> {
        match self {
            Screen::Login => None,
            Screen::Inventory => Some("Products"),
            Screen::Cart => Some("Your Cart"),
            Screen::CheckoutInfo => Some("Checkout: Your Information"),
            Screen::CheckoutOverview => Some("Checkout: Overview"),
            Screen::CheckoutComplete => Some("Checkout: Complete!"),
        }
    }

    pub fn requires_login(self) -> bool {
        self != Screen::Login
    }

    /// Maps a page URL onto a screen. Query strings and fragments are ignored.
    pub fn from_url(url: &str) -> Option<Screen> {
        let parsed = Url::parse(url).ok()?;
        match parsed.path() {
            "" | "/" | "/index.html" => Some(Screen::Login),
            path => Screen::ALL
                .into_iter()
                .find(|screen| *screen != Screen::Login && screen.path() == path),
        }
    }

    /// Screens `transition` may land on from `self`, or `None` if it is illegal here.
    pub fn next(self, transition: Transition) -> Option<&'static [Screen]> {
        use Screen::*;
        use Transition::*;
        let outcomes: &'static [Screen] = match (self, transition) {
            (Login, SubmitLogin) => &[Inventory, Login],
            (Inventory, OpenCart) => &[Cart],
            (Inventory, Logout) => &[Login],
            (Cart, ContinueShopping) => &[Inventory],
            (Cart, Checkout) => &[CheckoutInfo],
            (CheckoutInfo, ContinueToOverview) => &[CheckoutOverview, CheckoutInfo],
            (CheckoutInfo, Cancel) | (CheckoutOverview, Cancel) => &[Inventory],
            (CheckoutOverview, Finish) => &[CheckoutComplete],
            (CheckoutComplete, BackToProducts) => &[Inventory],
            _ => return None,
        };
        Some(outcomes)
    }

    pub fn is_terminal(self) -> bool {
        self == Screen::CheckoutComplete
    }
}

impl Transition {
    /// Selector that becomes visible once `transition` from `from` has settled,
    /// whichever of its outcomes the application picked.
    ///
    /// Staying on the origin screen is only observable through the error banner;
    /// the origin's own marker is visible before the action even starts.
    pub fn settle_selector(self, from: Screen) -> Option<String> {
        let outcomes = from.next(self)?;
        let selectors: Vec<&str> = outcomes
            .iter()
            .map(|screen| {
                if *screen == from {
                    ERROR_BANNER
                } else {
                    screen.marker()
                }
            })
            .collect();
        Some(selectors.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_round_trips_through_paths() {
        for screen in Screen::ALL {
            let url = format!("https://www.saucedemo.com{}", screen.path());
            assert_eq!(Screen::from_url(&url), Some(screen), "{}", url);
        }
        assert_eq!(Screen::from_url("https://www.saucedemo.com"), Some(Screen::Login));
        assert_eq!(
            Screen::from_url("http://localhost:3000/cart.html?x=1#top"),
            Some(Screen::Cart)
        );
        assert_eq!(Screen::from_url("https://www.saucedemo.com/inventory-item.html"), None);
        assert_eq!(Screen::from_url("not a url"), None);
    }

    #[test]
    fn checkout_stepper_moves_forward_only() {
        assert_eq!(
            Screen::CheckoutInfo.next(Transition::ContinueToOverview),
            Some(&[Screen::CheckoutOverview, Screen::CheckoutInfo][..])
        );
        assert_eq!(
            Screen::CheckoutOverview.next(Transition::Finish),
            Some(&[Screen::CheckoutComplete][..])
        );
        assert_eq!(Screen::CheckoutComplete.next(Transition::Cancel), None);
        assert_eq!(Screen::CheckoutComplete.next(Transition::Finish), None);
        assert_eq!(Screen::Cart.next(Transition::Finish), None);
    }

    #[test]
    fn complete_is_left_only_through_back_to_products() {
        let exits: Vec<Transition> = [
            Transition::SubmitLogin,
            Transition::OpenCart,
            Transition::Logout,
            Transition::ContinueShopping,
            Transition::Checkout,
            Transition::ContinueToOverview,
            Transition::Cancel,
            Transition::Finish,
            Transition::BackToProducts,
        ]
        .into_iter()
        .filter(|t| Screen::CheckoutComplete.next(*t).is_some())
        .collect();
        assert_eq!(exits, vec![Transition::BackToProducts]);
        assert!(Screen::CheckoutComplete.is_terminal());
    }

    #[test]
    fn cancel_returns_to_inventory_from_both_checkout_steps() {
        for from in [Screen::CheckoutInfo, Screen::CheckoutOverview] {
            assert_eq!(from.next(Transition::Cancel), Some(&[Screen::Inventory][..]));
        }
    }

    #[test]
    fn logout_is_the_edge_back_to_login() {
        assert_eq!(Screen::Inventory.next(Transition::Logout), Some(&[Screen::Login][..]));
        assert!(Screen::Login.next(Transition::Logout).is_none());
    }

    #[test]
    fn rejectable_transitions_settle_on_the_error_banner() {
        assert_eq!(
            Transition::SubmitLogin.settle_selector(Screen::Login).as_deref(),
            Some(".inventory_list, [data-test=\"error\"]")
        );
        assert_eq!(
            Transition::Finish.settle_selector(Screen::CheckoutOverview).as_deref(),
            Some(".complete-header")
        );
        assert_eq!(Transition::Finish.settle_selector(Screen::Login), None);
    }
}
