//! Application state of one simulated browsing context and its rendering.

use crate::catalog::{LOCKED_OUT_USER, PASSWORD, Product, USERS};
use crate::dom::{Dom, El};
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Value, json};
use std::sync::Arc;

pub(crate) const SESSION_COOKIE: &str = "session-username";
pub(crate) const CART_STORAGE_KEY: &str = "cart-contents";
const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Blank,
    Login,
    Inventory,
    Cart,
    CheckoutStepOne,
    CheckoutStepTwo,
    CheckoutComplete,
    NotFound,
}

impl Route {
    fn from_path(path: &str) -> Route {
        match path {
            "" | "/" | "/index.html" => Route::Login,
            "/inventory.html" => Route::Inventory,
            "/cart.html" => Route::Cart,
            "/checkout-step-one.html" => Route::CheckoutStepOne,
            "/checkout-step-two.html" => Route::CheckoutStepTwo,
            "/checkout-complete.html" => Route::CheckoutComplete,
            _ => Route::NotFound,
        }
    }

    pub(crate) fn path(self) -> &'static str {
        match self {
            Route::Blank | Route::Login => "/",
            Route::Inventory => "/inventory.html",
            Route::Cart => "/cart.html",
            Route::CheckoutStepOne => "/checkout-step-one.html",
            Route::CheckoutStepTwo => "/checkout-step-two.html",
            Route::CheckoutComplete => "/checkout-complete.html",
            Route::NotFound => "/404.html",
        }
    }

    fn is_protected(self) -> bool {
        !matches!(self, Route::Blank | Route::Login | Route::NotFound)
    }
}

/// What a click on an element does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    SubmitLogin,
    DismissError,
    OpenMenu,
    CloseMenu,
    AllItems,
    Logout,
    ResetAppState,
    OpenCart,
    AddToCart(usize),
    RemoveFromCart(usize),
    ContinueShopping,
    Checkout,
    ContinueCheckout,
    Cancel,
    Finish,
    BackToProducts,
}

/// Inputs whose value lives in application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Username,
    Password,
    FirstName,
    LastName,
    PostalCode,
}

const SORT_OPTIONS: [(&str, &str); 4] = [
    ("az", "Name (A to Z)"),
    ("za", "Name (Z to A)"),
    ("lohi", "Price (low to high)"),
    ("hilo", "Price (high to low)"),
];

#[derive(Debug, Clone)]
pub(crate) struct Storefront {
    catalog: Arc<Vec<Product>>,
    pub(crate) origin: Option<String>,
    pub(crate) route: Route,
    session: Option<String>,
    /// Product indices in the order they were added.
    cart: Vec<usize>,
    sort: &'static str,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    postal_code: String,
    error: Option<String>,
    menu_open: bool,
    dom: Dom,
}

impl Storefront {
    pub(crate) fn new(catalog: Arc<Vec<Product>>) -> Self {
        let mut app = Self {
            catalog,
            origin: None,
            route: Route::Blank,
            session: None,
            cart: Vec::new(),
            sort: "az",
            username: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            postal_code: String::new(),
            error: None,
            menu_open: false,
            dom: Dom::default(),
        };
        app.render();
        app
    }

    pub(crate) fn dom(&self) -> &Dom {
        &self.dom
    }

    pub(crate) fn url(&self) -> String {
        match (&self.origin, self.route) {
            (_, Route::Blank) | (None, _) => "about:blank".to_string(),
            (Some(origin), route) => format!("{}{}", origin, route.path()),
        }
    }

    pub(crate) fn navigate(&mut self, origin: String, path: &str) {
        self.origin = Some(origin);
        self.menu_open = false;
        let route = Route::from_path(path);
        if route.is_protected() && self.session.is_none() {
            debug!("Redirecting unauthenticated visit of {} to login", path);
            self.route = Route::Login;
            self.error = Some(format!(
                "Epic sadface: You can only access '{}' when you are logged in.",
                route.path()
            ));
        } else {
            self.enter(route);
        }
        self.render();
    }

    fn enter(&mut self, route: Route) {
        self.route = route;
        self.error = None;
        self.menu_open = false;
        match route {
            Route::Login => {
                self.username.clear();
                self.password.clear();
            }
            Route::CheckoutStepOne => {
                self.first_name.clear();
                self.last_name.clear();
                self.postal_code.clear();
            }
            _ => {}
        }
    }

    pub(crate) fn fill(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::PostalCode => &mut self.postal_code,
        };
        *slot = value.to_string();
        self.render();
    }

    /// Applies a sort option. Returns `false` for an unknown option value.
    pub(crate) fn select_sort(&mut self, value: &str) -> bool {
        match SORT_OPTIONS.iter().find(|(v, _)| *v == value) {
            Some((v, _)) => {
                self.sort = *v;
                self.render();
                true
            }
            None => false,
        }
    }

    pub(crate) fn dispatch(&mut self, action: Action) {
        debug!("Simulated click: {:?} on {:?}", action, self.route);
        match action {
            Action::SubmitLogin => self.submit_login(),
            Action::DismissError => self.error = None,
            Action::OpenMenu => self.menu_open = true,
            Action::CloseMenu => self.menu_open = false,
            Action::AllItems => self.enter(Route::Inventory),
            Action::Logout => {
                self.session = None;
                self.enter(Route::Login);
            }
            Action::ResetAppState => {
                self.cart.clear();
                self.sort = "az";
            }
            Action::OpenCart => self.enter(Route::Cart),
            Action::AddToCart(index) => {
                if !self.cart.contains(&index) {
                    self.cart.push(index);
                }
            }
            Action::RemoveFromCart(index) => self.cart.retain(|i| *i != index),
            Action::ContinueShopping | Action::BackToProducts => self.enter(Route::Inventory),
            Action::Checkout => self.enter(Route::CheckoutStepOne),
            Action::ContinueCheckout => self.continue_checkout(),
            Action::Cancel => self.enter(Route::Inventory),
            Action::Finish => {
                self.cart.clear();
                self.enter(Route::CheckoutComplete);
            }
        }
        self.render();
    }

    fn submit_login(&mut self) {
        let message = if self.username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if self.password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if self.username == LOCKED_OUT_USER && self.password == PASSWORD {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else if USERS.contains(&self.username.as_str()) && self.password == PASSWORD {
            None
        } else {
            Some("Epic sadface: Username and password do not match any user in this service")
        };

        match message {
            Some(message) => self.error = Some(message.to_string()),
            None => {
                self.session = Some(self.username.clone());
                self.enter(Route::Inventory);
            }
        }
    }

    fn continue_checkout(&mut self) {
        let missing = [
            (&self.first_name, "First Name"),
            (&self.last_name, "Last Name"),
            (&self.postal_code, "Postal Code"),
        ]
        .into_iter()
        .find(|(value, _)| value.is_empty())
        .map(|(_, label)| label.to_string());

        match missing {
            Some(label) => self.error = Some(format!("Error: {} is required", label)),
            None => self.enter(Route::CheckoutStepTwo),
        }
    }

    fn item_total(&self) -> Decimal {
        self.cart.iter().map(|&i| self.catalog[i].price).sum()
    }

    fn tax(&self) -> Decimal {
        (self.item_total() * TAX_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Cookies and local storage, in the shape browsers persist them.
    pub(crate) fn storage_state(&self) -> Value {
        let origin = self.origin.clone().unwrap_or_default();
        let cookies: Vec<Value> = self
            .session
            .iter()
            .map(|user| {
                json!({
                    "name": SESSION_COOKIE,
                    "value": user,
                    "domain": origin_host(&origin),
                    "path": "/",
                })
            })
            .collect();
        let cart = serde_json::to_string(&self.cart).unwrap_or_else(|_| "[]".to_string());
        json!({
            "cookies": cookies,
            "origins": [{
                "origin": origin,
                "localStorage": [{ "name": CART_STORAGE_KEY, "value": cart }],
            }],
        })
    }

    /// Seeds the context from a snapshot produced by [`Storefront::storage_state`].
    pub(crate) fn restore(&mut self, state: &Value) {
        self.session = state["cookies"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|cookie| cookie["name"] == SESSION_COOKIE)
            .and_then(|cookie| cookie["value"].as_str())
            .map(str::to_string);

        let stored_cart = state["origins"]
            .as_array()
            .into_iter()
            .flatten()
            .flat_map(|origin| origin["localStorage"].as_array().into_iter().flatten())
            .find(|entry| entry["name"] == CART_STORAGE_KEY)
            .and_then(|entry| entry["value"].as_str())
            .and_then(|raw| serde_json::from_str::<Vec<usize>>(raw).ok())
            .unwrap_or_default();
        self.cart = stored_cart
            .into_iter()
            .filter(|&i| i < self.catalog.len())
            .collect();
        self.render();
    }

    fn render(&mut self) {
        let content = match self.route {
            Route::Blank => Vec::new(),
            Route::NotFound => vec![El::new("h1").text("404 Not Found")],
            Route::Login => vec![self.login_view()],
            route => vec![self.header(route), self.body(route)],
        };
        self.dom = Dom::build(El::new("body").child(El::new("div").id("root").children(content)));
    }

    fn error_banner(&self) -> El {
        let container = El::new("div").class(if self.error.is_some() {
            "error-message-container error"
        } else {
            "error-message-container"
        });
        match &self.error {
            None => container,
            Some(message) => container.child(
                El::new("h3").test_id("error").text(message.clone()).child(
                    El::new("button")
                        .class("error-button")
                        .test_id("error-button")
                        .on_click(Action::DismissError),
                ),
            ),
        }
    }

    fn login_view(&self) -> El {
        El::new("div").class("login_container").children([
            El::new("div").class("login_logo").text("Swag Labs"),
            El::new("div").class("login_wrapper").child(
                El::new("form").children([
                    El::new("input")
                        .id("user-name")
                        .test_id("username")
                        .bind(Field::Username, &self.username),
                    El::new("input")
                        .id("password")
                        .test_id("password")
                        .attr("type", "password")
                        .bind(Field::Password, &self.password),
                    self.error_banner(),
                    El::new("input")
                        .id("login-button")
                        .test_id("login-button")
                        .attr("type", "submit")
                        .attr("value", "Login")
                        .on_click(Action::SubmitLogin),
                ]),
            ),
        ])
    }

    fn header(&self, route: Route) -> El {
        let mut cart_link = El::new("a")
            .class("shopping_cart_link")
            .test_id("shopping-cart-link")
            .on_click(Action::OpenCart);
        if !self.cart.is_empty() {
            cart_link = cart_link.child(
                El::new("span")
                    .class("shopping_cart_badge")
                    .test_id("shopping-cart-badge")
                    .text(self.cart.len().to_string()),
            );
        }

        let menu = El::new("div").class("bm-menu-wrap").hidden(!self.menu_open).children([
            El::new("a").id("inventory_sidebar_link").text("All Items").on_click(Action::AllItems),
            El::new("a").id("about_sidebar_link").text("About"),
            El::new("a").id("logout_sidebar_link").text("Logout").on_click(Action::Logout),
            El::new("a").id("reset_sidebar_link").text("Reset App State").on_click(Action::ResetAppState),
            El::new("button").id("react-burger-cross-btn").on_click(Action::CloseMenu),
        ]);

        let mut secondary = El::new("div")
            .class("header_secondary_container")
            .child(El::new("span").class("title").test_id("title").text(title(route)));
        if route == Route::Inventory {
            secondary = secondary.child(self.sort_control());
        }

        El::new("div").class("header_container").children([
            El::new("div").class("primary_header").children([
                menu,
                El::new("button").id("react-burger-menu-btn").text("Open Menu").on_click(Action::OpenMenu),
                El::new("div").class("app_logo").text("Swag Labs"),
                El::new("div").id("shopping_cart_container").class("shopping_cart_container").child(cart_link),
            ]),
            secondary,
        ])
    }

    fn sort_control(&self) -> El {
        let active = SORT_OPTIONS
            .iter()
            .find(|(value, _)| *value == self.sort)
            .map(|(_, label)| *label)
            .unwrap_or_default();
        El::new("span").class("select_container").children([
            El::new("span").class("active_option").test_id("active-option").text(active),
            El::new("select")
                .class("product_sort_container")
                .test_id("product-sort-container")
                .children(SORT_OPTIONS.iter().map(|(value, label)| {
                    El::new("option").attr("value", *value).text(*label)
                })),
        ])
    }

    fn body(&self, route: Route) -> El {
        match route {
            Route::Inventory => self.inventory_view(),
            Route::Cart => self.cart_view(),
            Route::CheckoutStepOne => self.step_one_view(),
            Route::CheckoutStepTwo => self.step_two_view(),
            _ => self.complete_view(),
        }
    }

    fn sorted_catalog(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.catalog.len()).collect();
        let products = &self.catalog;
        match self.sort {
            "za" => order.sort_by(|a, b| products[*b].name.cmp(&products[*a].name)),
            "lohi" => order.sort_by(|a, b| products[*a].price.cmp(&products[*b].price)),
            "hilo" => order.sort_by(|a, b| products[*b].price.cmp(&products[*a].price)),
            _ => order.sort_by(|a, b| products[*a].name.cmp(&products[*b].name)),
        }
        order
    }

    fn inventory_view(&self) -> El {
        let rows = self.sorted_catalog().into_iter().map(|index| {
            let product = &self.catalog[index];
            let button = if self.cart.contains(&index) {
                El::new("button")
                    .class("btn btn_secondary btn_small btn_inventory")
                    .id(format!("remove-{}", product.slug()))
                    .test_id(format!("remove-{}", product.slug()))
                    .text("Remove")
                    .on_click(Action::RemoveFromCart(index))
            } else {
                El::new("button")
                    .class("btn btn_primary btn_small btn_inventory")
                    .id(format!("add-to-cart-{}", product.slug()))
                    .test_id(format!("add-to-cart-{}", product.slug()))
                    .text("Add to cart")
                    .on_click(Action::AddToCart(index))
            };
            El::new("div").class("inventory_item").test_id("inventory-item").children([
                El::new("div").class("inventory_item_description").children([
                    El::new("div").class("inventory_item_label").children([
                        El::new("a").id(format!("item_{}_title_link", index)).child(
                            El::new("div")
                                .class("inventory_item_name")
                                .test_id("inventory-item-name")
                                .text(product.name.clone()),
                        ),
                        El::new("div").class("inventory_item_desc").text(product.description.clone()),
                    ]),
                    El::new("div").class("pricebar").children([
                        El::new("div")
                            .class("inventory_item_price")
                            .test_id("inventory-item-price")
                            .text(money(product.price)),
                        button,
                    ]),
                ]),
            ])
        });
        El::new("div")
            .class("inventory_container")
            .child(El::new("div").class("inventory_list").children(rows))
    }

    fn cart_rows(&self, removable: bool) -> Vec<El> {
        self.cart
            .iter()
            .map(|&index| {
                let product = &self.catalog[index];
                let mut pricebar = El::new("div").class("item_pricebar").child(
                    El::new("div")
                        .class("inventory_item_price")
                        .test_id("inventory-item-price")
                        .text(money(product.price)),
                );
                if removable {
                    pricebar = pricebar.child(
                        El::new("button")
                            .class("btn btn_secondary btn_small cart_button")
                            .id(format!("remove-{}", product.slug()))
                            .test_id(format!("remove-{}", product.slug()))
                            .text("Remove")
                            .on_click(Action::RemoveFromCart(index)),
                    );
                }
                El::new("div").class("cart_item").test_id("inventory-item").children([
                    El::new("div").class("cart_quantity").text("1"),
                    El::new("div").class("cart_item_label").children([
                        El::new("a").child(
                            El::new("div")
                                .class("inventory_item_name")
                                .test_id("inventory-item-name")
                                .text(product.name.clone()),
                        ),
                        El::new("div").class("inventory_item_desc").text(product.description.clone()),
                        pricebar,
                    ]),
                ])
            })
            .collect()
    }

    fn cart_view(&self) -> El {
        El::new("div").class("cart_contents_container").children([
            El::new("div")
                .class("cart_list")
                .child(El::new("div").class("cart_quantity_label").text("QTY"))
                .child(El::new("div").class("cart_desc_label").text("Description"))
                .children(self.cart_rows(true)),
            El::new("div").class("cart_footer").children([
                El::new("button")
                    .id("continue-shopping")
                    .test_id("continue-shopping")
                    .text("Continue Shopping")
                    .on_click(Action::ContinueShopping),
                El::new("button")
                    .id("checkout")
                    .test_id("checkout")
                    .text("Checkout")
                    .on_click(Action::Checkout),
            ]),
        ])
    }

    fn step_one_view(&self) -> El {
        El::new("div").class("checkout_info_container").child(
            El::new("form").children([
                El::new("div").class("checkout_info").children([
                    El::new("input")
                        .id("first-name")
                        .test_id("firstName")
                        .bind(Field::FirstName, &self.first_name),
                    El::new("input")
                        .id("last-name")
                        .test_id("lastName")
                        .bind(Field::LastName, &self.last_name),
                    El::new("input")
                        .id("postal-code")
                        .test_id("postalCode")
                        .bind(Field::PostalCode, &self.postal_code),
                    self.error_banner(),
                ]),
                El::new("div").class("checkout_buttons").children([
                    El::new("button")
                        .id("cancel")
                        .test_id("cancel")
                        .text("Cancel")
                        .on_click(Action::Cancel),
                    El::new("input")
                        .id("continue")
                        .test_id("continue")
                        .attr("type", "submit")
                        .attr("value", "Continue")
                        .on_click(Action::ContinueCheckout),
                ]),
            ]),
        )
    }

    fn step_two_view(&self) -> El {
        let item_total = self.item_total();
        let tax = self.tax();
        El::new("div").class("checkout_summary_container").children([
            El::new("div").class("cart_list").children(self.cart_rows(false)),
            El::new("div").class("summary_info").children([
                El::new("div").class("summary_info_label").text("Payment Information:"),
                El::new("div").class("summary_value_label").text("SauceCard #31337"),
                El::new("div").class("summary_info_label").text("Shipping Information:"),
                El::new("div").class("summary_value_label").text("Free Pony Express Delivery!"),
                El::new("div").class("summary_info_label").text("Price Total"),
                El::new("div")
                    .class("summary_subtotal_label")
                    .test_id("subtotal-label")
                    .text(format!("Item total: {}", money(item_total))),
                El::new("div")
                    .class("summary_tax_label")
                    .test_id("tax-label")
                    .text(format!("Tax: {}", money(tax))),
                El::new("div")
                    .class("summary_info_label summary_total_label")
                    .test_id("total-label")
                    .text(format!("Total: {}", money(item_total + tax))),
                El::new("div").class("cart_footer").children([
                    El::new("button")
                        .id("cancel")
                        .test_id("cancel")
                        .text("Cancel")
                        .on_click(Action::Cancel),
                    El::new("button")
                        .id("finish")
                        .test_id("finish")
                        .text("Finish")
                        .on_click(Action::Finish),
                ]),
            ]),
        ])
    }

    fn complete_view(&self) -> El {
        El::new("div").class("checkout_complete_container").children([
            El::new("h2")
                .class("complete-header")
                .test_id("complete-header")
                .text("Thank you for your order!"),
            El::new("div").class("complete-text").test_id("complete-text").text(
                "Your order has been dispatched, and will arrive just as fast as the pony can get there!",
            ),
            El::new("button")
                .id("back-to-products")
                .test_id("back-to-products")
                .text("Back Home")
                .on_click(Action::BackToProducts),
        ])
    }
}

fn title(route: Route) -> &'static str {
    match route {
        Route::Inventory => "Products",
        Route::Cart => "Your Cart",
        Route::CheckoutStepOne => "Checkout: Your Information",
        Route::CheckoutStepTwo => "Checkout: Overview",
        Route::CheckoutComplete => "Checkout: Complete!",
        _ => "",
    }
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn origin_host(origin: &str) -> String {
    url::Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    fn logged_in() -> Storefront {
        let mut app = Storefront::new(Arc::new(catalog()));
        app.navigate("https://www.saucedemo.com".to_string(), "/");
        app.fill(Field::Username, "standard_user");
        app.fill(Field::Password, PASSWORD);
        app.dispatch(Action::SubmitLogin);
        assert_eq!(app.route, Route::Inventory);
        app
    }

    #[test]
    fn protected_routes_redirect_to_login() {
        let mut app = Storefront::new(Arc::new(catalog()));
        app.navigate("https://www.saucedemo.com".to_string(), "/cart.html");
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.url(), "https://www.saucedemo.com/");
        assert!(app.error.as_deref().unwrap_or_default().contains("/cart.html"));
    }

    #[test]
    fn tax_is_eight_percent_rounded_to_cents() {
        let mut app = logged_in();
        app.dispatch(Action::AddToCart(0));
        app.dispatch(Action::AddToCart(1));
        assert_eq!(app.item_total(), Decimal::new(3998, 2));
        assert_eq!(app.tax(), Decimal::new(320, 2));
        assert_eq!(money(app.tax()), "$3.20");
    }

    #[test]
    fn cart_survives_logout_but_not_an_order() {
        let mut app = logged_in();
        app.dispatch(Action::AddToCart(4));
        app.dispatch(Action::Logout);
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.cart, vec![4]);

        app.fill(Field::Username, "standard_user");
        app.fill(Field::Password, PASSWORD);
        app.dispatch(Action::SubmitLogin);
        app.dispatch(Action::OpenCart);
        app.dispatch(Action::Checkout);
        app.fill(Field::FirstName, "John");
        app.fill(Field::LastName, "Doe");
        app.fill(Field::PostalCode, "12345");
        app.dispatch(Action::ContinueCheckout);
        assert_eq!(app.route, Route::CheckoutStepTwo);
        app.dispatch(Action::Finish);
        assert!(app.cart.is_empty());
    }

    #[test]
    fn storage_state_round_trips_session_and_cart() {
        let mut app = logged_in();
        app.dispatch(Action::AddToCart(2));
        let state = app.storage_state();

        let mut other = Storefront::new(Arc::new(catalog()));
        other.restore(&state);
        other.navigate("https://www.saucedemo.com".to_string(), "/inventory.html");
        assert_eq!(other.route, Route::Inventory);
        assert_eq!(other.cart, vec![2]);
    }
}
