//! HTML to PDF rendering.
//!
//! PDF generation is delegated to `wkhtmltopdf`: the filled HTML goes in on
//! stdin and the PDF comes back on stdout, so nothing is written to disk
//! unless the renderer succeeds.

use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use enum_dispatch::enum_dispatch;

use crate::{
    config::{Orientation, PageOptions, RendererConfig},
    error::FillError,
};

pub const WKHTMLTOPDF: &str = "wkhtmltopdf";

#[enum_dispatch]
pub trait Render {
    fn render(&self, html: &str, page: &PageOptions) -> Result<Vec<u8>, FillError>;
}

#[enum_dispatch(Render)]
#[derive(Debug)]
pub enum RendererImpl {
    Wkhtmltopdf(Wkhtmltopdf),
    /// Hands the filled HTML back unchanged.
    HtmlPassthrough(HtmlPassthrough),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wkhtmltopdf {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl Wkhtmltopdf {
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Self { binary: binary.into(), extra_args: Vec::new() }
    }

    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Command line for one run, reading stdin and writing stdout.
    pub fn args(&self, page: &PageOptions) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        let mut flag = |name: &str, value: &str| {
            args.push(name.to_string());
            args.push(value.to_string());
        };
        flag("--page-size", &page.page_size);
        flag("--encoding", &page.encoding);
        if let Some(width) = &page.page_width {
            flag("--page-width", width);
        }
        if let Some(height) = &page.page_height {
            flag("--page-height", height);
        }
        if let Some(orientation) = page.orientation {
            let name = match orientation {
                Orientation::Portrait => "Portrait",
                Orientation::Landscape => "Landscape",
            };
            flag("--orientation", name);
        }
        if let Some(margins) = &page.margins {
            let sides = [
                ("--margin-top", &margins.top),
                ("--margin-right", &margins.right),
                ("--margin-bottom", &margins.bottom),
                ("--margin-left", &margins.left),
            ];
            for (name, value) in sides {
                if let Some(value) = value {
                    flag(name, value);
                }
            }
        }
        if page.quiet {
            args.insert(0, "--quiet".to_string());
        }
        args.push(if page.outline { "--outline" } else { "--no-outline" }.to_string());
        args.extend(self.extra_args.iter().cloned());
        args.push("-".to_string());
        args.push("-".to_string());
        args
    }
}

impl Render for Wkhtmltopdf {
    fn render(&self, html: &str, page: &PageOptions) -> Result<Vec<u8>, FillError> {
        let args = self.args(page);
        log::info!("Running {} {}", self.binary.display(), args.join(" "));
        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => FillError::RendererUnavailable {
                    searched: vec![format!("{} ({})", self.binary.display(), e)],
                },
                _ => FillError::RenderFailed { status: None, stderr: e.to_string() },
            })?;

        // Fed from another thread so a renderer that streams output early
        // cannot deadlock against a full stdin pipe.
        let mut stdin = child.stdin.take().ok_or_else(|| FillError::RenderFailed {
            status: None,
            stderr: "renderer stdin unavailable".to_string(),
        })?;
        let input = html.as_bytes().to_vec();
        let feeder = thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output().map_err(|e| FillError::RenderFailed {
            status: None,
            stderr: e.to_string(),
        })?;
        let status = output.status.code();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(FillError::RenderFailed { status, stderr });
        }
        match feeder.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(FillError::RenderFailed {
                    status,
                    stderr: format!("writing HTML to renderer: {e}"),
                })
            }
            Err(_) => {
                return Err(FillError::RenderFailed {
                    status,
                    stderr: "stdin writer panicked".to_string(),
                })
            }
        }
        if output.stdout.is_empty() {
            return Err(FillError::RenderFailed {
                status,
                stderr: format!("renderer produced no output. {stderr}").trim().to_string(),
            });
        }
        log::debug!("Renderer produced {} bytes", output.stdout.len());
        Ok(output.stdout)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlPassthrough;

impl Render for HtmlPassthrough {
    fn render(&self, html: &str, _page: &PageOptions) -> Result<Vec<u8>, FillError> {
        Ok(html.as_bytes().to_vec())
    }
}

/// Finds wkhtmltopdf: the configured binary if any, otherwise `PATH`.
///
/// A configured binary is authoritative; a wrong path is reported rather
/// than silently replaced by whatever `PATH` holds.
pub fn resolve_wkhtmltopdf(config: &RendererConfig) -> Result<RendererImpl, FillError> {
    let found = |binary: PathBuf| -> RendererImpl {
        log::info!("Using renderer {}", binary.display());
        Wkhtmltopdf::new(binary)
            .with_extra_args(config.extra_args.clone())
            .into()
    };

    if let Some(binary) = &config.binary {
        if binary.is_file() {
            return Ok(found(binary.clone()));
        }
        // A bare name such as `wkhtmltopdf-amd64` is looked up on PATH
        if binary.components().count() == 1 {
            if let Ok(path) = which::which(binary) {
                return Ok(found(path));
            }
        }
        return Err(FillError::RendererUnavailable {
            searched: vec![binary.display().to_string()],
        });
    }

    which::which(WKHTMLTOPDF)
        .map(found)
        .map_err(|e| {
            log::debug!("which {WKHTMLTOPDF}: {e}");
            FillError::RendererUnavailable {
                searched: vec![format!("PATH ({WKHTMLTOPDF})")],
            }
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Margins;

    #[test]
    fn default_args() {
        let args = Wkhtmltopdf::new("wkhtmltopdf").args(&PageOptions::default());
        assert_eq!(
            args,
            vec![
                "--quiet", "--page-size", "A4", "--encoding", "UTF-8", "--no-outline", "-", "-"
            ]
        );
    }

    #[test]
    fn layout_args() {
        let page = PageOptions {
            page_width: Some("80mm".into()),
            orientation: Some(Orientation::Portrait),
            margins: Some(Margins { top: Some("0mm".into()), left: Some("2mm".into()), ..Default::default() }),
            outline: true,
            quiet: false,
            ..Default::default()
        };
        let args = Wkhtmltopdf::new("wkhtmltopdf")
            .with_extra_args(vec!["--print-media-type".into()])
            .args(&page);
        assert_eq!(
            args,
            vec![
                "--page-size", "A4", "--encoding", "UTF-8", "--page-width", "80mm",
                "--orientation", "Portrait", "--margin-top", "0mm", "--margin-left", "2mm",
                "--outline", "--print-media-type", "-", "-"
            ]
        );
    }

    #[test]
    fn passthrough_returns_html() {
        let out = HtmlPassthrough.render("<p>ok</p>", &PageOptions::default()).unwrap();
        assert_eq!(out, b"<p>ok</p>");
    }

    #[test]
    fn configured_binary_must_exist() {
        let config = RendererConfig {
            binary: Some(PathBuf::from("/definitely/not/here/wkhtmltopdf")),
            ..Default::default()
        };
        match resolve_wkhtmltopdf(&config) {
            Err(FillError::RendererUnavailable { searched }) => {
                assert_eq!(searched, vec!["/definitely/not/here/wkhtmltopdf".to_string()])
            }
            other => panic!("expected RendererUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn spawn_failure_is_unavailable() {
        let renderer = Wkhtmltopdf::new("/definitely/not/here/wkhtmltopdf");
        let err = renderer.render("<p/>", &PageOptions::default()).unwrap_err();
        assert!(matches!(err, FillError::RendererUnavailable { .. }), "{err:?}");
    }
}
