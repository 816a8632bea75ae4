use super::Culture;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub name: String,
    pub language: String,
    pub empty_text: String,
    pub multi_filter: bool,
    pub selectable: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub page_size: Option<u32>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            language: Culture::default().name().to_owned(),
            empty_text: String::new(),
            multi_filter: false,
            selectable: false,
            filterable: false,
            sortable: false,
            page_size: None,
        }
    }
}

impl GridOptions {
    /// Standard options for a grid over `T` in `culture`.
    pub fn apply_attributes<T>(culture: Culture) -> Self {
        Self::default().with_attributes::<T>(culture)
    }

    pub fn with_attributes<T>(mut self, culture: Culture) -> Self {
        self.name = type_name_of::<T>().to_owned();
        self.language = culture.name().to_owned();
        self.empty_text = culture.no_data_found().to_owned();
        self.multi_filter = true;
        self.selectable = false;
        self.filterable = true;
        self.sortable = true;
        self.page_size = Some(DEFAULT_PAGE_SIZE);
        self
    }
}

/// Unqualified name of `T`, without generic arguments.
pub fn type_name_of<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
