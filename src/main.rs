use std::path::PathBuf;

use cf_fs::{FileSystem, ProvideFileSystem};
use clap::Parser;
use recibo_fill::{
    generate_receipt, load_data, resolve_wkhtmltopdf, FillError, HtmlPassthrough, Receipt,
    RendererImpl, RunConfig,
};

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about=None)]
struct Args {
    /// JSON run configuration. Every field is optional, e.g.
    /// ```
    /// {"template": "backend/recibo.html", "output": "recibo-{numero_recibo}.pdf",
    ///  "data": {"nome_cliente": "João da Silva"}, "page": {"page_size": "A4"}}
    /// ```
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,
    /// HTML template with {{placeholder}} tokens [default: backend/recibo.html]
    #[clap(short, long, value_parser)]
    template: Option<PathBuf>,
    /// Where to write the result [default: recibo-teste-python.pdf]
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,
    /// JSON object of placeholder values. Replaces the built-in sample data.
    #[clap(short, long, value_parser)]
    data: Option<PathBuf>,
    /// Path to the wkhtmltopdf executable, if it is not on PATH
    #[clap(short, long, value_parser)]
    renderer: Option<PathBuf>,
    /// Directory that relative paths are taken from
    #[clap(short = 'C', long, value_parser)]
    workdir: Option<PathBuf>,
    /// Write the filled HTML instead of rendering a PDF
    #[clap(long)]
    html_only: bool,
    /// Fail on unfilled placeholders and on values that contain placeholders
    #[clap(long)]
    strict: bool,
    /// More logging on stderr (-v info, -vv debug)
    #[clap(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main_result(args: &Args) -> Result<Receipt, FillError> {
    let mut fs = match &args.workdir {
        Some(dir) => FileSystem::rooted(dir),
        None => FileSystem::os(),
    };
    let mut config = match &args.config {
        Some(path) => RunConfig::load(&fs, path)?,
        None => RunConfig::default(),
    };
    if let Some(template) = &args.template {
        config.template = template.clone();
    }
    match &args.output {
        Some(output) => config.output = output.clone(),
        None if args.html_only => {
            config.output.set_extension("html");
        }
        None => {}
    }
    if let Some(data) = &args.data {
        config.data = Some(load_data(&fs, data)?);
    }
    if let Some(renderer) = &args.renderer {
        config.renderer.binary = Some(renderer.clone());
    }
    // Relative renderer paths follow --workdir; bare names stay PATH lookups
    if let Some(binary) = config.renderer.binary.as_mut() {
        if binary.is_relative() && binary.components().count() > 1 {
            *binary = fs.resolve(binary);
        }
    }
    config.strict |= args.strict;
    log::debug!("{config:?}");

    if args.html_only {
        generate_receipt(&mut fs, &config, |_| {
            println!("Writing HTML...");
            Ok(RendererImpl::from(HtmlPassthrough))
        })
    } else {
        generate_receipt(&mut fs, &config, |renderer| {
            println!("Generating PDF...");
            resolve_wkhtmltopdf(renderer)
        })
    }
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    let kind = if args.html_only { "HTML" } else { "PDF" };
    match main_result(&args) {
        Ok(receipt) => {
            println!("Success! {kind} generated at: {}", receipt.output.display());
        }
        Err(err) => {
            match err {
                FillError::TemplateMissing { .. } => println!("Error: {err}."),
                _ => println!("Error generating {kind}: {err}"),
            }
            if let Some(hint) = err.hint() {
                println!("Hint: {hint}");
            }
            std::process::exit(err.exit_code());
        }
    }
}
