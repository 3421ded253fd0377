//! Fills an HTML receipt template with placeholder values and renders it
//! to PDF.
//!
//! The run is a single linear pass (see [generate_receipt]):
//!
//! ```text
//! template exists? --no--> TemplateMissing
//!     | read
//!     v
//! substitute placeholders --(strict)--> TokenCollision / UnresolvedTokens
//!     | resolve renderer --> RendererUnavailable
//!     v
//! render --> RenderFailed
//!     | write output --> OutputWrite
//!     v
//! Receipt
//! ```

pub mod config;
pub mod error;
pub mod render;

use std::path::{Path, PathBuf};

use cf_fs::{FileSystem, ProvideFileSystem};
use receipt_template::{PlaceholderMap, Template};

pub use config::{load_data, PageOptions, RendererConfig, RunConfig};
pub use error::FillError;
pub use render::{resolve_wkhtmltopdf, HtmlPassthrough, Render, RendererImpl, Wkhtmltopdf};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Resolved location of the written file
    pub output: PathBuf,
    pub bytes: usize,
}

pub fn load_template(fs: &FileSystem, path: &Path) -> Result<Template, FillError> {
    if !fs.exists(path) {
        return Err(FillError::TemplateMissing { path: path.to_path_buf() });
    }
    let unreadable = |reason: String| FillError::TemplateUnreadable {
        path: path.to_path_buf(),
        reason,
    };
    let raw = fs.read(path).map_err(|e| unreadable(e.to_string()))?;
    Template::from_reader(raw.as_slice()).map_err(|e| unreadable(e.to_string()))
}

/// Substitutes `data` into `template`.
///
/// Values that contain another placeholder's token make the result depend
/// on substitution order; they are logged, and rejected when `strict`.
/// Placeholders without a value are left as they are unless `strict`.
pub fn fill_template(template: &Template, data: &PlaceholderMap, strict: bool) -> Result<String, FillError> {
    let filled = template.fill(data);
    for c in &filled.collisions {
        log::warn!("Value of {} contains {}; output depends on substitution order", c.token, c.contains);
    }
    if strict && !filled.collisions.is_empty() {
        return Err(FillError::TokenCollision(filled.collisions));
    }
    if !filled.unresolved.is_empty() {
        log::debug!("Placeholders left unfilled: {}", filled.unresolved.join(", "));
        if strict {
            return Err(FillError::UnresolvedTokens(filled.unresolved));
        }
    }
    Ok(filled.html)
}

/// Runs the whole receipt flow.
///
/// `resolve` is called only once the template has been read and filled, so
/// a missing template never touches the renderer. The output file is
/// written only after the renderer succeeded.
pub fn generate_receipt<R, F>(fs: &mut FileSystem, config: &RunConfig, resolve: F) -> Result<Receipt, FillError>
where
    R: Render,
    F: FnOnce(&RendererConfig) -> Result<R, FillError>,
{
    let template = load_template(fs, &config.template)?;
    log::info!("Loaded template {}", config.template.display());
    let data = config.placeholders()?;
    let output = config.output_path(&data)?;
    let html = fill_template(&template, &data, config.strict)?;

    let renderer = resolve(&config.renderer)?;
    let document = renderer.render(&html, &config.page)?;
    fs.write(&output, &document).map_err(|e| FillError::OutputWrite {
        path: output.clone(),
        reason: e.to_string(),
    })?;
    log::info!("Wrote {} bytes to {}", document.len(), output.display());
    Ok(Receipt {
        output: fs.resolve(&output),
        bytes: document.len(),
    })
}
