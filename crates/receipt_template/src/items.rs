//! Line-item rows for the receipt body.
//!
//! The receipt template is a fixed-layout page where each text cell is an
//! absolutely positioned `<div>`. Rows are stacked downwards by lowering the
//! `bottom` coordinate of each successive row.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(alias = "descricao")]
    pub description: String,
    #[serde(alias = "quantidade", default = "one")]
    pub quantity: u32,
    #[serde(alias = "preco_unit", alias = "precoUnit")]
    pub unit_price: f64,
}
const fn one() -> u32 { 1 }

impl LineItem {
    pub fn new<S: Into<String>>(description: S, quantity: u32, unit_price: f64) -> Self {
        Self { description: description.into(), quantity, unit_price }
    }

    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsLayout {
    /// `bottom` offset in px of the first row
    pub start_bottom: f64,
    pub row_height: f64,
}

impl Default for ItemsLayout {
    fn default() -> Self {
        Self { start_bottom: 530.58, row_height: 28.0 }
    }
}

// index, description, unit price, quantity, line total
const CELL_CLASSES: [&str; 5] = [
    "x9 h4 y3 ff3 fs1 fc1 sc0 ls0",
    "x3 h4 y3 ff3 fs1 fc1 sc0 ls0 ws1",
    "x4 h4 y3 ff3 fs1 fc1 sc0 ls0 ws1",
    "x5 h4 y3 ff3 fs1 fc1 sc0 ls0",
    "x6 h4 y3 ff3 fs1 fc1 sc0 ls0 ws1",
];

/// Renders the `{{itens_tabela}}` fragment.
pub fn items_table(items: &[LineItem], layout: &ItemsLayout) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let bottom = layout.start_bottom - idx as f64 * layout.row_height;
            let cells = [
                (idx + 1).to_string(),
                item.description.clone(),
                format_brl(item.unit_price),
                item.quantity.to_string(),
                format_brl(item.total()),
            ];
            CELL_CLASSES
                .iter()
                .zip(cells)
                .map(|(class, text)| {
                    format!(r#"<div class="t m0 {class}" style="bottom: {bottom:.2}px">{text}</div>"#)
                })
                .join("\n")
        })
        .join("\n\n")
}

/// Brazilian real, e.g. `R$ 1.234,50`.
pub fn format_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}
