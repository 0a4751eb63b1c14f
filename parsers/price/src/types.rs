use serde::{Deserialize, Serialize};

/// A page element that may hold a price, as described by the host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceElement {
    /// Lowercase or uppercase tag name (e.g., "span")
    pub tag_name: String,
    pub class_name: String,
    pub id: String,
    /// Visible text content
    pub text: String,
    /// `data-price` attribute
    pub data_price: Option<String>,
    /// `content` attribute (e.g., schema.org microdata)
    pub content: Option<String>,
    pub title: Option<String>,
    /// Computed font size in pixels
    pub font_size: Option<f64>,
}

impl PriceElement {
    /// Text sources in the order they are tried for a price.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.text.as_str()).chain(
            [&self.data_price, &self.content, &self.title]
                .into_iter()
                .filter_map(|source| source.as_deref()),
        )
    }
}
