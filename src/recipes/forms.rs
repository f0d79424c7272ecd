use serde::{Deserialize, Deserializer};

/// The four free-text fields submitted by both the new and edit forms.
#[derive(Debug, Deserialize)]
pub struct RecipeForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page", deserialize_with = "page_or_first")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// A `page` value that doesn't parse as an integer means page 1, same as an
/// absent one.
fn page_or_first<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|_| default_page()))
}
