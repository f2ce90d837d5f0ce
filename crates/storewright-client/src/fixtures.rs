//! Canonical inputs shared by every scenario.

use secrecy::SecretString;
use storewright_core::Config;
use storewright_pages::{ShippingInfo, SortMode};

/// Product names as the catalog renders them.
pub mod products {
    pub const BACKPACK: &str = "Sauce Labs Backpack";
    pub const BIKE_LIGHT: &str = "Sauce Labs Bike Light";
    pub const BOLT_T_SHIRT: &str = "Sauce Labs Bolt T-Shirt";
    pub const FLEECE_JACKET: &str = "Sauce Labs Fleece Jacket";
    pub const ONESIE: &str = "Sauce Labs Onesie";
    pub const RED_T_SHIRT: &str = "Test.allTheThings() T-Shirt (Red)";

    pub const ALL: [&str; 6] = [
        BACKPACK,
        BIKE_LIGHT,
        BOLT_T_SHIRT,
        FLEECE_JACKET,
        ONESIE,
        RED_T_SHIRT,
    ];
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// A login attempt the application must reject with `expected_error`.
#[derive(Debug, Clone)]
pub struct InvalidLogin {
    pub username: String,
    pub password: SecretString,
    pub expected_error: &'static str,
}

/// A step-one submission the checkout form must reject with `expected_error`.
#[derive(Debug, Clone)]
pub struct InvalidShipping {
    pub info: ShippingInfo,
    pub expected_error: &'static str,
}

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub standard: Credentials,
    pub locked_out: Credentials,
    pub invalid_logins: Vec<InvalidLogin>,
    pub sort_modes: [SortMode; 4],
    pub valid_shipping: ShippingInfo,
    pub invalid_shipping: Vec<InvalidShipping>,
}

impl Fixtures {
    /// Builds the registry from the credentials resolved at configuration load.
    pub fn from_config(config: &Config) -> Self {
        let credentials = &config.credentials;
        let standard = Credentials {
            username: credentials.standard_user.clone(),
            password: credentials.password.clone(),
        };
        let locked_out = Credentials {
            username: credentials.locked_out_user.clone(),
            password: credentials.password.clone(),
        };

        let invalid = |username: &str, password: SecretString, expected_error| InvalidLogin {
            username: username.to_string(),
            password,
            expected_error,
        };
        let empty = || SecretString::from(String::new());
        let invalid_logins = vec![
            invalid("", empty(), "Username is required"),
            invalid(&standard.username, empty(), "Password is required"),
            invalid("", standard.password.clone(), "Username is required"),
            invalid(
                "invalid_user",
                SecretString::from("invalid_password".to_string()),
                "Username and password do not match",
            ),
        ];

        let invalid_shipping = vec![
            InvalidShipping {
                info: ShippingInfo::new("", "Doe", "12345"),
                expected_error: "First Name is required",
            },
            InvalidShipping {
                info: ShippingInfo::new("John", "", "12345"),
                expected_error: "Last Name is required",
            },
            InvalidShipping {
                info: ShippingInfo::new("John", "Doe", ""),
                expected_error: "Postal Code is required",
            },
        ];

        Self {
            standard,
            locked_out,
            invalid_logins,
            sort_modes: SortMode::ALL,
            valid_shipping: ShippingInfo::new("John", "Doe", "12345"),
            invalid_shipping,
        }
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Error shown to a locked-out account.
pub const LOCKED_OUT_ERROR: &str = "Sorry, this user has been locked out.";

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn credentials_follow_configuration() {
        let mut config = Config::default();
        config.credentials.standard_user = "visual_user".to_string();
        config.credentials.password = SecretString::from("hunter2".to_string());

        let fixtures = Fixtures::from_config(&config);
        assert_eq!(fixtures.standard.username, "visual_user");
        assert_eq!(fixtures.locked_out.username, "locked_out_user");
        assert_eq!(fixtures.locked_out.password.expose_secret(), "hunter2");
        assert_eq!(fixtures.invalid_logins[1].username, "visual_user");
        assert_eq!(fixtures.invalid_logins[2].password.expose_secret(), "hunter2");
    }

    #[test]
    fn invalid_shipping_cases_each_miss_the_field_they_name() {
        let fixtures = Fixtures::default();
        assert_eq!(fixtures.valid_shipping.first_missing_field(), None);
        for case in &fixtures.invalid_shipping {
            let field = case.info.first_missing_field().unwrap();
            assert_eq!(field.required_message(), case.expected_error);
        }
    }

    #[test]
    fn sort_modes_cover_every_dropdown_value() {
        let values: Vec<_> = Fixtures::default()
            .sort_modes
            .iter()
            .map(|mode| mode.option_value())
            .collect();
        assert_eq!(values, ["az", "za", "lohi", "hilo"]);
        assert_eq!(products::ALL.len(), 6);
    }
}
