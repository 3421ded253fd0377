//! Run configuration.
//!
//! Every field is optional; the defaults reproduce the original one-off
//! preview run (`backend/recibo.html` filled with the sample dataset into
//! `recibo-teste-python.pdf`, A4, UTF-8, no outline). A config file looks
//! like
//!
//! ```json
//! {
//!   "template": "backend/recibo.html",
//!   "output": "recibos/recibo-{numero_recibo}.pdf",
//!   "data": { "nome_cliente": "João da Silva", "numero_recibo": "000001" },
//!   "items": [ { "descricao": "Produto", "quantidade": 2, "precoUnit": 25.0 } ],
//!   "page": { "page_size": "A4", "margins": { "top": "0mm" } },
//!   "renderer": { "binary": "/usr/local/bin/wkhtmltopdf" },
//!   "strict": false
//! }
//! ```

use std::path::{Path, PathBuf};

use cf_fs::{FileSystem, ProvideFileSystem};
use receipt_template::{items_table, sample_data, ItemsLayout, LineItem, PlaceholderMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FillError;

pub const DEFAULT_TEMPLATE: &str = "backend/recibo.html";
pub const DEFAULT_OUTPUT: &str = "recibo-teste-python.pdf";
/// Placeholder that receives the generated line-item rows.
pub const ITEMS_TOKEN: &str = "{{itens_tabela}}";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub template: PathBuf,
    /// May contain `{name}` fields filled from the placeholder values.
    pub output: PathBuf,
    /// `None` selects the built-in sample dataset.
    pub data: Option<PlaceholderMap>,
    /// When set, rendered into [ITEMS_TOKEN], overriding `data`.
    pub items: Option<Vec<LineItem>>,
    pub items_layout: ItemsLayout,
    pub page: PageOptions,
    pub renderer: RendererConfig,
    /// Treat token collisions and unfilled placeholders as errors.
    pub strict: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            data: None,
            items: None,
            items_layout: Default::default(),
            page: Default::default(),
            renderer: Default::default(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margins {
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
}

/// Page layout handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageOptions {
    pub page_size: String,
    pub encoding: String,
    /// wkhtmltopdf builds a PDF outline unless told otherwise
    pub outline: bool,
    pub page_width: Option<String>,
    pub page_height: Option<String>,
    pub orientation: Option<Orientation>,
    pub margins: Option<Margins>,
    pub quiet: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            encoding: "UTF-8".to_string(),
            outline: false,
            page_width: None,
            page_height: None,
            orientation: None,
            margins: None,
            quiet: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Explicit wkhtmltopdf location. When unset the executable is looked
    /// up on `PATH`.
    pub binary: Option<PathBuf>,
    pub extra_args: Vec<String>,
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(fs: &FileSystem, path: P) -> Result<Self, FillError> {
        let path = path.as_ref();
        let text = fs
            .read_to_string(path)
            .map_err(|e| FillError::Config(e.to_string()))?;
        serde_json::from_str(&text)
            .map_err(|e| FillError::Config(format!("{}: {}", path.display(), e)))
    }

    /// The map actually applied to the template.
    pub fn placeholders(&self) -> Result<PlaceholderMap, FillError> {
        let mut map = self.data.clone().unwrap_or_else(sample_data);
        if let Some(items) = &self.items {
            log::debug!("Rendering {} line item(s) into {ITEMS_TOKEN}", items.len());
            map.insert(ITEMS_TOKEN, items_table(items, &self.items_layout))
                .map_err(|e| FillError::Data(e.to_string()))?;
        }
        Ok(map)
    }

    /// Output location with `{name}` fields substituted, e.g.
    /// `recibo-{numero_recibo}.pdf` -> `recibo-000001.pdf`.
    pub fn output_path(&self, data: &PlaceholderMap) -> Result<PathBuf, FillError> {
        let raw = self.output.to_string_lossy();
        if !raw.contains('{') {
            return Ok(self.output.clone());
        }
        strfmt::strfmt(&raw, &data.names())
            .map(PathBuf::from)
            .map_err(|e| FillError::Config(format!("output path {raw:?}: {e}")))
    }
}

/// Reads a flat JSON object of placeholder values.
pub fn load_data<P: AsRef<Path>>(fs: &FileSystem, path: P) -> Result<PlaceholderMap, FillError> {
    let path = path.as_ref();
    let text = fs
        .read_to_string(path)
        .map_err(|e| FillError::Data(e.to_string()))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| FillError::Data(format!("{}: {}", path.display(), e)))?;
    PlaceholderMap::from_json(&value)
        .map_err(|e| FillError::Data(format!("{}: {}", path.display(), e)))
}
