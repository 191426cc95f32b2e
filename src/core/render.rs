use crate::models::{Retailer, ShoeRecord};

/// Cell content used when a record has no sizes or colors
pub const PLACEHOLDER: &str = "-";

/// Selections captured at submission time that shape every row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub category_label: String,
    pub size_label: String,
    pub retailer: Retailer,
}

/// One size entry in the sizes column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLabel {
    pub label: String,
    pub emphasized: bool,
}

/// Display-ready projection of a [`ShoeRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub price: String,
    pub image: String,
    pub url: String,
    /// `None` renders as [`PLACEHOLDER`]
    pub sizes: Option<Vec<SizeLabel>>,
    pub colors: String,
    pub retailer: &'static str,
    pub category: String,
}

impl ResultRow {
    pub fn from_record(record: &ShoeRecord, ctx: &RenderContext) -> Self {
        let sizes = match record.sizes() {
            [] => None,
            sizes => Some(
                sizes
                    .iter()
                    .map(|s| SizeLabel {
                        label: s.clone(),
                        emphasized: *s == ctx.size_label,
                    })
                    .collect(),
            ),
        };

        let colors = match record.colors() {
            [] => PLACEHOLDER.to_string(),
            colors => colors.join(", "),
        };

        Self {
            name: record.name.clone(),
            price: record.price.to_string(),
            image: record.image.clone(),
            url: record.url.clone(),
            sizes,
            colors,
            retailer: ctx.retailer.display_name(),
            category: ctx.category_label.clone(),
        }
    }

    /// Sizes column as a `<td>` body, emphasized entry wrapped in `<mark>`
    pub fn sizes_html(&self) -> String {
        match &self.sizes {
            None => PLACEHOLDER.to_string(),
            Some(sizes) => sizes
                .iter()
                .map(|s| {
                    if s.emphasized {
                        format!("<mark>{}</mark>", escape_html(&s.label))
                    } else {
                        escape_html(&s.label)
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Sizes column for terminals, emphasized entry in brackets
    pub fn sizes_text(&self) -> String {
        match &self.sizes {
            None => PLACEHOLDER.to_string(),
            Some(sizes) => sizes
                .iter()
                .map(|s| {
                    if s.emphasized {
                        format!("[{}]", s.label)
                    } else {
                        s.label.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<tr><td>{name}</td><td>{price}</td>\
             <td><img src=\"{image}\" alt=\"{name}\" style=\"width: 50px; height: auto;\"></td>\
             <td><a href=\"{url}\" target=\"_blank\">Link</a></td>\
             <td>{sizes}</td><td>{colors}</td><td>{retailer}</td><td>{category}</td></tr>",
            name = escape_html(&self.name),
            price = escape_html(&self.price),
            image = escape_html(&self.image),
            url = escape_html(&self.url),
            sizes = self.sizes_html(),
            colors = escape_html(&self.colors),
            retailer = escape_html(self.retailer),
            category = escape_html(&self.category),
        )
    }

    pub fn to_text(&self) -> String {
        let sizes = self.sizes_text();
        [
            self.name.as_str(),
            self.price.as_str(),
            self.url.as_str(),
            sizes.as_str(),
            self.colors.as_str(),
            self.retailer,
            self.category.as_str(),
        ]
        .join(" | ")
    }
}

/// Rows for the given records, in the order received
pub fn compute_rows(records: &[ShoeRecord], ctx: &RenderContext) -> Vec<ResultRow> {
    records.iter().map(|r| ResultRow::from_record(r, ctx)).collect()
}

/// The document region the renderer paints into
pub trait ResultTable {
    fn clear(&mut self);
    fn append(&mut self, row: ResultRow);
    /// Update the shop-name display, if the page has one
    fn set_retailer_name(&mut self, name: &str);
}

/// Replace every row of `table` with rows for `records`
pub fn render<T: ResultTable + ?Sized>(records: &[ShoeRecord], ctx: &RenderContext, table: &mut T) {
    table.set_retailer_name(ctx.retailer.display_name());
    table.clear();
    for row in compute_rows(records, ctx) {
        table.append(row);
    }
}

/// In-memory table body
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    rows: Vec<ResultRow>,
    retailer_name: Option<String>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn retailer_name(&self) -> Option<&str> {
        self.retailer_name.as_deref()
    }

    pub fn to_html(&self) -> String {
        self.rows.iter().map(ResultRow::to_html).collect::<Vec<_>>().join("\n")
    }

    pub fn to_text(&self) -> String {
        self.rows.iter().map(ResultRow::to_text).collect::<Vec<_>>().join("\n")
    }
}

impl ResultTable for MemoryTable {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    fn set_retailer_name(&mut self, name: &str) {
        self.retailer_name = Some(name.to_string());
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
