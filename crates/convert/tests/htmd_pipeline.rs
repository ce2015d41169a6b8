use markdownizr_convert::{ConversionPipeline, HtmdEngine};
use markdownizr_settings::{HistoryStore, LocalStorage};
use tempfile::tempdir;

fn pipeline() -> ConversionPipeline<HtmdEngine> {
    ConversionPipeline::default()
}

#[test]
fn empty_input_converts_to_empty_without_history() {
    let temp = tempdir().expect("tempdir");
    let mut store = HistoryStore::load(LocalStorage::new(temp.path()));

    let outcome = pipeline().run_at("", &mut store, 1);
    assert!(outcome.is_success());
    assert!(outcome.output.trim().is_empty());
    assert!(!outcome.recorded);
    assert!(store.is_empty());
}

#[test]
fn deleted_elements_drop_their_content() {
    let markdown = pipeline()
        .convert("<script>bad</script><p>ok</p>")
        .expect("convert");
    assert!(markdown.contains("ok"));
    assert!(!markdown.contains("bad"));
}

#[test]
fn script_only_input_is_not_recorded() {
    let temp = tempdir().expect("tempdir");
    let mut store = HistoryStore::load(LocalStorage::new(temp.path()));

    let outcome = pipeline().run_at(
        "<script>alert(1)</script><iframe src=\"x\"></iframe>",
        &mut store,
        1,
    );
    assert!(outcome.output.trim().is_empty());
    assert!(!outcome.recorded);
    assert!(store.is_empty());
}

#[test]
fn headings_use_atx_style() {
    let markdown = pipeline()
        .convert("<h1>Title</h1><p>Hi <strong>there</strong></p>")
        .expect("convert");
    assert!(markdown.contains("# Title"));
    assert!(markdown.contains("**there**"));
}

#[test]
fn conversions_are_recorded_newest_first() {
    let temp = tempdir().expect("tempdir");
    let mut store = HistoryStore::load(LocalStorage::new(temp.path()));
    let pipeline = pipeline();

    assert!(pipeline.run_at("<p>Hi</p>", &mut store, 1).recorded);
    assert!(pipeline.run_at("<p>Yo</p>", &mut store, 2).recorded);

    assert_eq!(store.len(), 2);
    assert!(store.get(0).expect("newest").result_text().contains("Yo"));
    assert!(store.get(1).expect("oldest").result_text().contains("Hi"));

    let reloaded = HistoryStore::load(LocalStorage::new(temp.path()));
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn emphasis_uses_asterisks() {
    let markdown = pipeline()
        .convert("<p><em>x</em> <i>y</i></p>")
        .expect("convert");
    assert_eq!(markdown.trim(), "*x* *y*");
}

#[test]
fn wrapper_elements_keep_their_content() {
    let markdown = pipeline()
        .convert("<section><span>kept</span> <small>fine</small> <button>print</button></section>")
        .expect("convert");
    assert!(markdown.contains("kept"));
    assert!(markdown.contains("fine"));
    assert!(markdown.contains("print"));
    assert!(!markdown.contains('<'));
}
