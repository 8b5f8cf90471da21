//! Store to preview document, end to end.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use playground_application::SessionStore;
use playground_core::dependency::{ANTD, DependencyResolver, VersionKey};
use playground_core::session::ENTRY_FILE;
use playground_execution::{PreviewCompiler, PreviewDocument, PreviewRunner, PreviewSurface};
use playground_infrastructure::{CompressedJsonCodec, MemoryAddressBar};

#[derive(Default)]
struct LatestDocument(Mutex<Vec<PreviewDocument>>);

impl PreviewSurface for LatestDocument {
    fn show(&self, document: &PreviewDocument) {
        self.0.lock().unwrap().push(document.clone());
    }
}

impl LatestDocument {
    fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn last_html(&self) -> String {
        self.0.lock().unwrap().last().unwrap().html.clone()
    }
}

async fn wait_for(surface: &LatestDocument, count: usize) {
    for _ in 0..100 {
        if surface.count() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("preview never reached {} renders", count);
}

#[tokio::test]
async fn runner_follows_store_updates() {
    let resolver = DependencyResolver::default();
    let store = SessionStore::mount(
        resolver.clone(),
        Arc::new(CompressedJsonCodec::new(resolver.clone())),
        Arc::new(MemoryAddressBar::new("https://play.dev/")),
    );
    let surface = Arc::new(LatestDocument::default());
    let runner = PreviewRunner::new(PreviewCompiler::new(resolver).unwrap(), surface.clone());
    let task = tokio::spawn(runner.run(store.subscribe()));

    wait_for(&surface, 1).await;
    assert!(surface.last_html().contains("Hello Ant Design!"));

    store.update_file(ENTRY_FILE, "function App() { return <Tag>edited</Tag> }");
    wait_for(&surface, 2).await;
    assert!(surface.last_html().contains("\\x3CTag>edited\\x3C/Tag>"));

    store.set_version(VersionKey::Antd, "5.3.0");
    wait_for(&surface, 3).await;
    assert!(surface.last_html().contains("antd@5.3.0/dist/antd.min.js"));

    drop(store);
    task.await.unwrap();
}

#[test]
fn broken_component_library_url_is_named_in_document() {
    let resolver = DependencyResolver::default();
    let store = SessionStore::mount(
        resolver.clone(),
        Arc::new(CompressedJsonCodec::new(resolver.clone())),
        Arc::new(MemoryAddressBar::new("https://play.dev/")),
    );
    let broken = "https://cdn.jsdelivr.net/npm/antd@0.0.0-missing/dist/antd.min.js";
    let mut map = store.import_map();
    map.insert(ANTD, broken);
    store.set_import_map(map);

    let session = store.session();
    let document = PreviewCompiler::new(resolver)
        .unwrap()
        .compile(session.entry_source(), session.import_map())
        .unwrap();

    assert!(document.html.contains(r#"data-package="antd" onerror="__playgroundScriptFailed(this)""#));
    assert!(document.html.contains(&format!(r#""package":"antd","url":"{}""#, broken)));
    assert!(document.html.contains("__playgroundReport('load'"));
}
