use super::{dismiss_stale_error, error_message};
use crate::base::{PageContext, PageObject};
use crate::error::PageError;
use crate::screen::{Screen, Transition};
use storewright_interfaces::Locator;

const USERNAME: &str = "#user-name";
const PASSWORD: &str = "#password";
const LOGIN_BUTTON: &str = "#login-button";

#[derive(Debug, Clone)]
pub struct LoginPage {
    ctx: PageContext,
}

impl LoginPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub async fn goto(&self) -> Result<(), PageError> {
        self.open().await
    }

    /// Submits the form. Returns where the page landed: `Inventory` on success,
    /// `Login` if the application rejected the credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<Screen, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("login", async {
            ctx.wait_for_screen(Screen::Login).await?;
            dismiss_stale_error(ctx).await?;
            ctx.page().fill(&Locator::css(USERNAME), username).await?;
            ctx.page().fill(&Locator::css(PASSWORD), password).await?;
            ctx.perform(Transition::SubmitLogin, &Locator::css(LOGIN_BUTTON))
                .await
        })
        .await
    }

    /// Visible error text, or an empty string when no error is shown.
    pub async fn get_error_message(&self) -> Result<String, PageError> {
        error_message(&self.ctx).await
    }

    pub async fn is_login_form_visible(&self) -> Result<bool, PageError> {
        for selector in [USERNAME, PASSWORD, LOGIN_BUTTON] {
            if !self.ctx.page().is_visible(&Locator::css(selector)).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub async fn verify_page_loaded(&self) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("verify_login_page", async {
            self.wait_for_stable().await?;
            if !self.is_login_form_visible().await? {
                return Err(PageError::Verification(
                    "login form is not fully visible".to_string(),
                ));
            }
            Ok(())
        })
        .await
    }
}

impl PageObject for LoginPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn home_screen(&self) -> Screen {
        Screen::Login
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PASSWORD as SECRET, sim_context};

    #[tokio::test]
    async fn standard_user_lands_on_inventory() {
        let (_browser, ctx, _dir) = sim_context().await;
        let login = LoginPage::new(ctx);
        login.goto().await.unwrap();
        login.verify_page_loaded().await.unwrap();

        let landed = login.login("standard_user", SECRET).await.unwrap();
        assert_eq!(landed, Screen::Inventory);
        assert_eq!(login.current_screen().await.unwrap(), Screen::Inventory);
        assert_eq!(login.get_error_message().await.unwrap(), "");
    }

    #[tokio::test]
    async fn rejected_credentials_stay_on_login_with_an_error() {
        let (_browser, ctx, _dir) = sim_context().await;
        let login = LoginPage::new(ctx);
        login.goto().await.unwrap();

        let cases = [
            ("", "", "Username is required"),
            ("standard_user", "", "Password is required"),
            ("", SECRET, "Username is required"),
            ("invalid_user", "invalid_password", "Username and password do not match"),
            ("locked_out_user", SECRET, "Sorry, this user has been locked out."),
        ];
        for (user, pass, expected) in cases {
            let landed = login.login(user, pass).await.unwrap();
            assert_eq!(landed, Screen::Login, "{:?}/{:?}", user, pass);
            let message = login.get_error_message().await.unwrap();
            assert!(message.contains(expected), "{:?} lacks {:?}", message, expected);
            assert!(login.is_login_form_visible().await.unwrap());
        }
    }

    #[tokio::test]
    async fn logout_returns_to_the_login_form() {
        let (_browser, ctx, _dir) = sim_context().await;
        let login = LoginPage::new(ctx);
        login.goto().await.unwrap();
        login.login("standard_user", SECRET).await.unwrap();

        assert_eq!(login.logout().await.unwrap(), Screen::Login);
        assert!(login.is_login_form_visible().await.unwrap());
    }

    #[tokio::test]
    async fn login_form_is_gone_once_logged_in() {
        let (_browser, ctx, _dir) = sim_context().await;
        let login = LoginPage::new(ctx);
        login.goto().await.unwrap();
        login.login("standard_user", SECRET).await.unwrap();

        // The form is gone, so the first element wait is what fails.
        let err = login.login("standard_user", SECRET).await.unwrap_err();
        assert!(matches!(err, PageError::ElementTimeout { .. }), "{:?}", err);
    }
}
