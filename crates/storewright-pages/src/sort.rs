//! Independent re-derivation of catalog orderings.
//!
//! The page reports a sequence; these functions compute what that sequence must
//! be for a [`SortMode`] and compare the two element by element. Nothing here
//! touches the page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("{mode} orders by {expected_key}, cannot verify a sequence of {given_key}")]
    WrongKey {
        mode: SortMode,
        expected_key: &'static str,
        given_key: &'static str,
    },

    #[error("{mode}: position {index} shows {actual} but {expected} was expected")]
    OutOfOrder {
        mode: SortMode,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Unknown sort option {0:?}")]
    UnknownOption(String),
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::NameAsc,
        SortMode::NameDesc,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
    ];

    /// Value of the matching `<option>` in the sort dropdown.
    pub fn option_value(self) -> &'static str {
        match self {
            SortMode::NameAsc => "az",
            SortMode::NameDesc => "za",
            SortMode::PriceAsc => "lohi",
            SortMode::PriceDesc => "hilo",
        }
    }

    /// Label the dropdown shows once the mode is active.
    pub fn label(self) -> &'static str {
        match self {
            SortMode::NameAsc => "Name (A to Z)",
            SortMode::NameDesc => "Name (Z to A)",
            SortMode::PriceAsc => "Price (low to high)",
            SortMode::PriceDesc => "Price (high to low)",
        }
    }

    pub fn sorts_by_name(self) -> bool {
        matches!(self, SortMode::NameAsc | SortMode::NameDesc)
    }

    pub fn is_descending(self) -> bool {
        matches!(self, SortMode::NameDesc | SortMode::PriceDesc)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortMode {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.option_value() == s)
            .ok_or_else(|| SortError::UnknownOption(s.to_string()))
    }
}

/// Expected order of `names` under a name mode (plain lexicographic comparison).
pub fn expected_names(names: &[String], mode: SortMode) -> Result<Vec<String>, SortError> {
    if !mode.sorts_by_name() {
        return Err(SortError::WrongKey {
            mode,
            expected_key: "price",
            given_key: "names",
        });
    }
    let mut expected = names.to_vec();
    expected.sort();
    if mode.is_descending() {
        expected.reverse();
    }
    Ok(expected)
}

/// Expected order of `prices` under a price mode (numeric comparison).
pub fn expected_prices(prices: &[Decimal], mode: SortMode) -> Result<Vec<Decimal>, SortError> {
    if mode.sorts_by_name() {
        return Err(SortError::WrongKey {
            mode,
            expected_key: "name",
            given_key: "prices",
        });
    }
    let mut expected = prices.to_vec();
    expected.sort();
    if mode.is_descending() {
        expected.reverse();
    }
    Ok(expected)
}

/// Checks the whole observed name sequence against [`expected_names`].
pub fn verify_names(observed: &[String], mode: SortMode) -> Result<(), SortError> {
    let expected = expected_names(observed, mode)?;
    first_mismatch(mode, &expected, observed)
}

/// Checks the whole observed price sequence against [`expected_prices`].
pub fn verify_prices(observed: &[Decimal], mode: SortMode) -> Result<(), SortError> {
    let expected = expected_prices(observed, mode)?;
    first_mismatch(mode, &expected, observed)
}

fn first_mismatch<T: PartialEq + fmt::Display>(
    mode: SortMode,
    expected: &[T],
    observed: &[T],
) -> Result<(), SortError> {
    match expected.iter().zip(observed).position(|(e, o)| e != o) {
        None => Ok(()),
        Some(index) => Err(SortError::OutOfOrder {
            mode,
            index,
            expected: expected[index].to_string(),
            actual: observed[index].to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn prices(list: &[&str]) -> Vec<Decimal> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn option_values_round_trip() {
        for mode in SortMode::ALL {
            assert_eq!(mode.option_value().parse::<SortMode>().unwrap(), mode);
        }
        assert!(matches!(
            "price".parse::<SortMode>(),
            Err(SortError::UnknownOption(_))
        ));
    }

    #[test]
    fn name_orders_are_lexicographic() {
        let shown = names(&[
            "Sauce Labs Backpack",
            "Sauce Labs Bike Light",
            "Test.allTheThings() T-Shirt (Red)",
        ]);
        assert!(verify_names(&shown, SortMode::NameAsc).is_ok());

        let reversed: Vec<String> = shown.iter().rev().cloned().collect();
        assert!(verify_names(&reversed, SortMode::NameDesc).is_ok());

        match verify_names(&reversed, SortMode::NameAsc) {
            Err(SortError::OutOfOrder { index, expected, actual, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(expected, "Sauce Labs Backpack");
                assert_eq!(actual, "Test.allTheThings() T-Shirt (Red)");
            }
            other => panic!("expected OutOfOrder, got {:?}", other),
        }
    }

    #[test]
    fn a_correct_first_element_is_not_enough() {
        // Right boundary element, wrong middle: must still fail.
        let shown = prices(&["7.99", "15.99", "9.99", "49.99"]);
        match verify_prices(&shown, SortMode::PriceAsc) {
            Err(SortError::OutOfOrder { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected OutOfOrder, got {:?}", other),
        }
    }

    #[test]
    fn price_orders_are_numeric_not_textual() {
        // "9.99" < "15.99" numerically but not as strings
        let shown = prices(&["49.99", "15.99", "15.99", "9.99", "7.99"]);
        assert!(verify_prices(&shown, SortMode::PriceDesc).is_ok());
        let ascending: Vec<Decimal> = shown.iter().rev().copied().collect();
        assert!(verify_prices(&ascending, SortMode::PriceAsc).is_ok());
    }

    #[test]
    fn keys_cannot_be_mixed() {
        assert!(matches!(
            verify_names(&names(&["a"]), SortMode::PriceAsc),
            Err(SortError::WrongKey { .. })
        ));
        assert!(matches!(
            verify_prices(&prices(&["1"]), SortMode::NameDesc),
            Err(SortError::WrongKey { .. })
        ));
    }

    #[test]
    fn empty_and_single_sequences_are_sorted() {
        assert!(verify_names(&[], SortMode::NameAsc).is_ok());
        assert!(verify_prices(&prices(&["3.50"]), SortMode::PriceDesc).is_ok());
    }
}
