use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`Locator`] chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// CSS selector evaluated against every element matched by the previous step
    /// (or the document for the first step). Selector lists (`a, b`) are allowed.
    pub selector: String,
    /// Keep only matches whose text content contains this string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_text: Option<String>,
    /// Keep only matches whose trimmed text content equals this string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_is: Option<String>,
    /// Keep only the n-th (zero based) remaining match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth: Option<usize>,
}

/// Addresses a set of elements on the page.
///
/// A locator is a chain of [`Segment`]s resolved left to right, so a row can be
/// picked first and an affordance then looked up *inside* that row only:
///
/// ```
/// use storewright_interfaces::Locator;
///
/// let remove = Locator::css(".cart_item")
///     .nth(2)
///     .locator("[data-test^=\"remove\"]");
/// assert_eq!(remove.segments().len(), 2);
/// ```
///
/// Locators are plain data: they are resolved by the provider each time they are
/// used and never cache element handles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Locator {
    segments: Vec<Segment>,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                selector: selector.into(),
                has_text: None,
                text_is: None,
                nth: None,
            }],
        }
    }

    /// Narrows the last step to matches containing `text`.
    pub fn has_text(mut self, text: impl Into<String>) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.has_text = Some(text.into());
        }
        self
    }

    /// Narrows the last step to matches whose whole (trimmed) text is `text`.
    pub fn text_is(mut self, text: impl Into<String>) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.text_is = Some(text.into());
        }
        self
    }

    /// Narrows the last step to its n-th match.
    pub fn nth(mut self, index: usize) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.nth = Some(index);
        }
        self
    }

    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Descends into `selector` within every element matched so far.
    pub fn locator(mut self, selector: impl Into<String>) -> Self {
        self.segments.push(Segment {
            selector: selector.into(),
            has_text: None,
            text_is: None,
            nth: None,
        });
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            write!(f, "{}", segment.selector)?;
            if let Some(text) = &segment.has_text {
                write!(f, " :has-text({:?})", text)?;
            }
            if let Some(text) = &segment.text_is {
                write!(f, " :text-is({:?})", text)?;
            }
            if let Some(n) = segment.nth {
                write!(f, " :nth({})", n)?;
            }
        }
        Ok(())
    }
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Locator::css(selector)
    }
}
