use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}
fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }
