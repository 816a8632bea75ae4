use super::{
    Culture, GridColumn, GridColumns, GridOptions,
    column_type::CellValue,
    culture::format_with_pattern,
};
use crate::application::dto::BaseView;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;

static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<script\b[^>]*/?>")
        .expect("valid script pattern")
});

static EVENT_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\son[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("valid event attribute pattern")
});

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

static SCRIPT_URL_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\s(?:href|src|action|formaction|xlink:href)\s*=\s*(?:"\s*(?:javascript|vbscript):[^"]*"|'\s*(?:javascript|vbscript):[^']*'|(?:javascript|vbscript):[^\s>]*)"#,
    )
    .expect("valid script url pattern")
});

/// Strips script elements, inline event handlers and script URLs.
pub fn sanitize_html(html: &str) -> String {
    let without_scripts = SCRIPT_TAG.replace_all(html, "");
    let without_handlers = EVENT_ATTRIBUTE.replace_all(&without_scripts, "");
    SCRIPT_URL_ATTRIBUTE
        .replace_all(&without_handlers, "")
        .into_owned()
}

/// Applies a composite format such as `{0:dd/MM/yyyy}` or `[{0}]`.
fn apply_format(value: &CellValue, format: Option<&str>, culture: Culture) -> String {
    let Some(format) = format else {
        return match value {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Date(date) => culture.format_short_date(*date),
        };
    };

    let Some(start) = format.find("{0") else {
        return format.to_owned();
    };
    let Some(len) = format[start..].find('}') else {
        return format.to_owned();
    };
    let placeholder = &format[start..start + len + 1];
    let pattern = placeholder
        .strip_prefix("{0:")
        .and_then(|rest| rest.strip_suffix('}'));

    let rendered = match (value, pattern) {
        (CellValue::Empty, _) => String::new(),
        (CellValue::Date(date), Some(pattern)) => format_with_pattern(*date, pattern),
        (CellValue::Date(date), None) => culture.format_short_date(*date),
        (CellValue::Text(text), _) => text.clone(),
    };
    format.replacen(placeholder, &rendered, 1)
}

/// HTML table over view rows, configured by columns and options.
pub struct Grid<T> {
    columns: GridColumns<T>,
    options: GridOptions,
}

impl<T: BaseView + 'static> Grid<T> {
    pub fn new(columns: GridColumns<T>) -> Self {
        let options = GridOptions::apply_attributes::<T>(columns.culture());
        Self { columns, options }
    }

    pub fn with_options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    pub fn columns(&self) -> &GridColumns<T> {
        &self.columns
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn render_cell(&self, column: &GridColumn<T>, row: &T) -> String {
        let text = apply_format(
            &column.render_value(row),
            column.format(),
            self.columns.culture(),
        );
        match (column.is_encoded(), column.is_sanitized()) {
            (true, _) => escape_html(&text),
            (false, true) => sanitize_html(&text),
            (false, false) => text,
        }
    }

    /// Renders one page of rows. `page` is 1-based and `total` counts every
    /// row across pages.
    pub fn render(&self, rows: &[T], page: u32, total: u64) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"mvc-grid\" data-name=\"{}\" data-language=\"{}\" \
             data-filterable=\"{}\" data-sortable=\"{}\" data-multi-filter=\"{}\" \
             data-selectable=\"{}\">",
            escape_html(&self.options.name),
            escape_html(&self.options.language),
            self.options.filterable,
            self.options.sortable,
            self.options.multi_filter,
            self.options.selectable,
        );

        html.push_str("<table><thead><tr>");
        for column in self.columns.iter() {
            html.push_str("<th");
            if let Some(width) = column.width() {
                let _ = write!(html, " style=\"width: {width}px\"");
            }
            let _ = write!(html, ">{}</th>", escape_html(column.title()));
        }
        html.push_str("</tr></thead><tbody>");

        if rows.is_empty() {
            let _ = write!(
                html,
                "<tr class=\"mvc-grid-empty-row\"><td colspan=\"{}\">{}</td></tr>",
                self.columns.len().max(1),
                escape_html(&self.options.empty_text)
            );
        }
        for row in rows {
            html.push_str("<tr>");
            for column in self.columns.iter() {
                let _ = write!(
                    html,
                    "<td class=\"{}\">{}</td>",
                    escape_html(column.css()),
                    self.render_cell(column, row)
                );
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");

        if let Some(page_size) = self.options.page_size {
            let pages = total.div_ceil(u64::from(page_size.max(1)));
            if pages > 1 {
                html.push_str("<div class=\"mvc-grid-pager\">");
                for number in 1..=pages {
                    let class = if number == u64::from(page) {
                        " class=\"active\""
                    } else {
                        ""
                    };
                    let _ = write!(
                        html,
                        "<a href=\"?page={number}&amp;page_size={page_size}\"{class}>{number}</a>"
                    );
                }
                html.push_str("</div>");
            }
        }

        html.push_str("</div>");
        html
    }
}
