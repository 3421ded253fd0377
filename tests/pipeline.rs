use cf_fs::{FileSystem, MemFileSystem, ProvideFileSystem};
use recibo_fill::*;
use receipt_template::PlaceholderMap;
use std::path::Path;
use std::sync::Once;

fn setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {});
    let _ = env_logger::builder().is_test(true).try_init();
}

const TEMPLATE: &str = "<h1>Recibo {{numero_recibo}}</h1>\n<p>{{nome_cliente}}</p>\n{{itens_tabela}}\n<p>{{nome_cliente}}</p>";

fn fs_with_template(content: &str) -> FileSystem {
    let mut mfs = MemFileSystem::default();
    mfs.insert("backend/recibo.html", content);
    mfs.into()
}

fn passthrough(_: &RendererConfig) -> Result<RendererImpl, FillError> {
    Ok(HtmlPassthrough.into())
}

fn read_output(fs: &FileSystem, path: &str) -> String {
    fs.read_to_string(Path::new(path)).expect("output written")
}

struct Failing;
impl Render for Failing {
    fn render(&self, _html: &str, _page: &PageOptions) -> Result<Vec<u8>, FillError> {
        Err(FillError::RenderFailed {
            status: Some(1),
            stderr: "Exit with code 1 due to network error".into(),
        })
    }
}

#[test]
fn missing_template_never_reaches_renderer() {
    setup();
    let mut fs = FileSystem::mem();
    let mut resolved = false;
    let err = generate_receipt(&mut fs, &RunConfig::default(), |_| {
        resolved = true;
        Ok(HtmlPassthrough)
    })
    .unwrap_err();
    assert!(!resolved);
    assert_eq!(err.exit_code(), 1);
    match err {
        FillError::TemplateMissing { path } => assert_eq!(path, Path::new("backend/recibo.html")),
        other => panic!("expected TemplateMissing, got {other:?}"),
    }
    assert!(!fs.exists(Path::new("recibo-teste-python.pdf")));
}

#[test]
fn sample_data_fills_every_token() {
    setup();
    let mut fs = fs_with_template(TEMPLATE);
    let receipt = generate_receipt(&mut fs, &RunConfig::default(), passthrough).unwrap();
    assert_eq!(receipt.output, Path::new("recibo-teste-python.pdf"));

    let html = read_output(&fs, "recibo-teste-python.pdf");
    assert_eq!(receipt.bytes, html.len());
    assert_eq!(html.matches("João da Silva").count(), 2);
    assert!(html.contains("<h1>Recibo 000001</h1>"));
    assert!(html.contains(r#"style="bottom: 502.98px">Produto Teste 2</div>"#));
    assert!(!html.contains("{{"));
}

#[test]
fn empty_map_hands_template_through() {
    setup();
    let mut fs = fs_with_template(TEMPLATE);
    let config = RunConfig { data: Some(PlaceholderMap::new()), ..Default::default() };
    generate_receipt(&mut fs, &config, passthrough).unwrap();
    assert_eq!(read_output(&fs, "recibo-teste-python.pdf"), TEMPLATE);
}

#[test]
fn unavailable_renderer_writes_nothing() {
    setup();
    let mut fs = fs_with_template(TEMPLATE);
    let err = generate_receipt(&mut fs, &RunConfig::default(), |_| -> Result<HtmlPassthrough, FillError> {
        Err(FillError::RendererUnavailable { searched: vec!["PATH (wkhtmltopdf)".into()] })
    })
    .unwrap_err();
    assert!(matches!(err, FillError::RendererUnavailable { .. }));
    assert!(err.hint().unwrap().contains("wkhtmltopdf"));
    assert!(!fs.exists(Path::new("recibo-teste-python.pdf")));
}

#[test]
fn failed_render_writes_nothing() {
    setup();
    let mut fs = fs_with_template(TEMPLATE);
    let err = generate_receipt(&mut fs, &RunConfig::default(), |_| Ok(Failing)).unwrap_err();
    assert_eq!(err.exit_code(), 5);
    assert!(!fs.exists(Path::new("recibo-teste-python.pdf")));
}

#[test]
fn strict_rejects_unfilled_placeholders() {
    setup();
    let mut fs = fs_with_template("<p>{{nome_cliente}} {{observacoes}}</p>");
    let lenient = RunConfig::default();
    generate_receipt(&mut fs, &lenient, passthrough).unwrap();
    assert_eq!(
        read_output(&fs, "recibo-teste-python.pdf"),
        "<p>João da Silva {{observacoes}}</p>"
    );

    let strict = RunConfig { strict: true, output: "strict.pdf".into(), ..Default::default() };
    let mut resolved = false;
    let err = generate_receipt(&mut fs, &strict, |_| {
        resolved = true;
        Ok(HtmlPassthrough)
    })
    .unwrap_err();
    assert!(!resolved);
    match err {
        FillError::UnresolvedTokens(tokens) => assert_eq!(tokens, vec!["{{observacoes}}".to_string()]),
        other => panic!("expected UnresolvedTokens, got {other:?}"),
    }
    assert!(!fs.exists(Path::new("strict.pdf")));
}

#[test]
fn strict_rejects_collisions() {
    setup();
    let mut fs = fs_with_template("{{titulo}}");
    let data = PlaceholderMap::try_from_pairs([
        ("titulo", "Recibo {{numero_recibo}}"),
        ("numero_recibo", "000001"),
    ])
    .unwrap();
    let config = RunConfig { data: Some(data), ..Default::default() };
    generate_receipt(&mut fs, &config, passthrough).unwrap();
    assert_eq!(read_output(&fs, "recibo-teste-python.pdf"), "Recibo 000001");

    let strict = RunConfig { strict: true, ..config };
    let err = generate_receipt(&mut fs, &strict, passthrough).unwrap_err();
    assert!(matches!(err, FillError::TokenCollision(ref c) if c.len() == 1));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn output_named_after_receipt() {
    setup();
    let mut fs = fs_with_template(TEMPLATE);
    let config = RunConfig {
        output: "recibos/recibo-{numero_recibo}.html".into(),
        ..Default::default()
    };
    let receipt = generate_receipt(&mut fs, &config, passthrough).unwrap();
    assert_eq!(receipt.output, Path::new("recibos/recibo-000001.html"));
    assert!(read_output(&fs, "recibos/recibo-000001.html").contains("João da Silva"));
}

#[test]
fn non_utf8_template_is_unreadable() {
    setup();
    let mut mfs = MemFileSystem::default();
    mfs.insert("backend/recibo.html", vec![0xffu8, 0xfe, 0x00]);
    let mut fs: FileSystem = mfs.into();
    let err = generate_receipt(&mut fs, &RunConfig::default(), passthrough).unwrap_err();
    assert!(matches!(err, FillError::TemplateUnreadable { .. }), "{err:?}");
}
