use super::{
    Culture,
    column_type::{CellKind, CellValue, ColumnType, DateColumn},
};
use crate::application::{access::Access, dto::BaseView};
use std::fmt;

pub const ACTION_LINK_WIDTH: u32 = 25;
pub const ACTION_LINK_CSS: &str = "action-link-cell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Index,
    Create,
    Details,
    Edit,
    Delete,
}

impl LinkAction {
    pub const ALL: [LinkAction; 5] = [
        LinkAction::Index,
        LinkAction::Create,
        LinkAction::Details,
        LinkAction::Edit,
        LinkAction::Delete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LinkAction::Index => "Index",
            LinkAction::Create => "Create",
            LinkAction::Details => "Details",
            LinkAction::Edit => "Edit",
            LinkAction::Delete => "Delete",
        }
    }

    /// Font Awesome icon for actions that get a row link.
    pub fn icon(self) -> Option<&'static str> {
        match self {
            LinkAction::Details => Some("info"),
            LinkAction::Edit => Some("pencil"),
            LinkAction::Delete => Some("times"),
            LinkAction::Index | LinkAction::Create => None,
        }
    }
}

impl fmt::Display for LinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Area and controller the grid's row links point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    area: Option<String>,
    controller: String,
}

impl RouteContext {
    pub fn new(area: Option<&str>, controller: &str) -> Self {
        Self {
            area: area.filter(|a| !a.is_empty()).map(str::to_owned),
            controller: controller.to_owned(),
        }
    }

    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action_url(&self, action: LinkAction, id: i64) -> String {
        let action = action.name().to_lowercase();
        let controller = self.controller.to_lowercase();
        match &self.area {
            Some(area) => format!("/{}/{controller}/{action}/{id}", area.to_lowercase()),
            None => format!("/{controller}/{action}/{id}"),
        }
    }
}

type Renderer<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;

pub struct GridColumn<T> {
    name: String,
    title: String,
    css: String,
    width: Option<u32>,
    encoded: bool,
    sanitized: bool,
    format: Option<String>,
    renderer: Renderer<T>,
}

impl<T> GridColumn<T> {
    fn new(name: &str, title: String, css: &str, renderer: Renderer<T>) -> Self {
        Self {
            name: name.to_owned(),
            title,
            css: css.to_owned(),
            width: None,
            encoded: true,
            sanitized: true,
            format: None,
            renderer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn is_encoded(&self) -> bool {
        self.encoded
    }

    pub fn is_sanitized(&self) -> bool {
        self.sanitized
    }

    /// Composite format string, e.g. `{0:M/d/yyyy}`.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn render_value(&self, row: &T) -> CellValue {
        (self.renderer)(row)
    }

    pub fn titled(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_width(&mut self, width: u32) -> &mut Self {
        self.width = Some(width);
        self
    }

    pub fn encoded(&mut self, encoded: bool) -> &mut Self {
        self.encoded = encoded;
        self
    }

    pub fn sanitized(&mut self, sanitized: bool) -> &mut Self {
        self.sanitized = sanitized;
        self
    }

    pub fn with_css(&mut self, css: &str) -> &mut Self {
        self.css = css.to_owned();
        self
    }

    pub fn with_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.format = Some(format.into());
        self
    }
}

impl<T> fmt::Debug for GridColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridColumn")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("css", &self.css)
            .field("width", &self.width)
            .field("encoded", &self.encoded)
            .field("sanitized", &self.sanitized)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Column set of a grid over views of type `T`.
pub struct GridColumns<T> {
    culture: Culture,
    columns: Vec<GridColumn<T>>,
}

impl<T: BaseView + 'static> GridColumns<T> {
    pub fn new(culture: Culture) -> Self {
        Self {
            culture,
            columns: Vec::new(),
        }
    }

    pub fn culture(&self) -> Culture {
        self.culture
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridColumn<T>> {
        self.columns.iter()
    }

    /// Column titled after the property, styled by its type.
    pub fn add_property<P, F>(&mut self, name: &str, accessor: F) -> &mut GridColumn<T>
    where
        P: ColumnType + 'static,
        F: Fn(&T) -> P + Send + Sync + 'static,
    {
        let renderer: Renderer<T> = Box::new(move |row| accessor(row).cell_value());
        self.push(GridColumn::new(
            name,
            T::property_title(name),
            P::KIND.css_class(),
            renderer,
        ))
    }

    /// Date column formatted with the culture's short date pattern.
    pub fn add_date_property<P, F>(&mut self, name: &str, accessor: F) -> &mut GridColumn<T>
    where
        P: DateColumn + 'static,
        F: Fn(&T) -> P + Send + Sync + 'static,
    {
        let format = format!("{{0:{}}}", self.culture.short_date_pattern());
        let renderer: Renderer<T> = Box::new(move |row| accessor(row).cell_value());
        let column = self.push(GridColumn::new(
            name,
            T::property_title(name),
            CellKind::Date.css_class(),
            renderer,
        ));
        column.with_format(format);
        column
    }

    /// Adds a row link column for details, edit or delete when `access`
    /// allows the action. Any other action, or a refused one, adds nothing.
    pub fn add_action_link(
        &mut self,
        action: LinkAction,
        access: &Access,
        route: &RouteContext,
    ) -> Option<&mut GridColumn<T>> {
        if !access.can(route.area(), route.controller(), action.name()) {
            return None;
        }
        let icon = action.icon()?;

        let route = route.clone();
        let css_name = action.name().to_lowercase();
        let renderer: Renderer<T> = Box::new(move |row| {
            CellValue::Text(format!(
                "<div class=\"action-link-container {css_name}-action-link\">\
                 <a href=\"{}\"><i class=\"fa fa-{icon}\"></i></a>\
                 </div>",
                route.action_url(action, row.id())
            ))
        });

        let column = self.push(GridColumn::new("", String::new(), ACTION_LINK_CSS, renderer));
        column.set_width(ACTION_LINK_WIDTH).encoded(false).sanitized(false);
        Some(column)
    }

    fn push(&mut self, column: GridColumn<T>) -> &mut GridColumn<T> {
        self.columns.push(column);
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }
}
