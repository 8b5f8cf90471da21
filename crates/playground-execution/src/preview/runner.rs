//! Re-render loop between the session store and the preview surface.

use std::sync::Arc;

use tokio::sync::watch;

use playground_core::error::Result;
use playground_core::import_map::ImportMap;
use playground_core::session::Session;

use super::document::{PreviewCompiler, PreviewDocument};

/// The isolated surface that displays preview documents. Each call replaces
/// the previous document entirely.
pub trait PreviewSurface: Send + Sync {
    fn show(&self, document: &PreviewDocument);
}

/// Inputs that determine the document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderKey {
    source: String,
    import_map: ImportMap,
}

impl RenderKey {
    fn of(session: &Session) -> Self {
        Self {
            source: session.entry_source().to_string(),
            import_map: session.import_map().clone(),
        }
    }
}

pub struct PreviewRunner {
    compiler: PreviewCompiler,
    surface: Arc<dyn PreviewSurface>,
    last: Option<RenderKey>,
}

impl PreviewRunner {
    pub fn new(compiler: PreviewCompiler, surface: Arc<dyn PreviewSurface>) -> Self {
        Self {
            compiler,
            surface,
            last: None,
        }
    }

    /// Regenerates the document if the entry source or import map changed
    /// since the last render. Returns whether the surface was updated.
    pub fn render(&mut self, session: &Session) -> Result<bool> {
        let key = RenderKey::of(session);
        if self.last.as_ref() == Some(&key) {
            return Ok(false);
        }

        let document = self.compiler.compile(&key.source, &key.import_map)?;
        self.surface.show(&document);
        tracing::debug!(target: "playground::preview", scripts = document.scripts.len(), "Preview replaced");
        self.last = Some(key);
        Ok(true)
    }

    /// Renders every session published on `updates` until the sender is
    /// dropped.
    pub async fn run(mut self, mut updates: watch::Receiver<Arc<Session>>) {
        loop {
            let session = updates.borrow_and_update().clone();
            if let Err(e) = self.render(&session) {
                tracing::error!(target: "playground::preview", error = %e, "Failed to generate preview");
            }
            if updates.changed().await.is_err() {
                tracing::debug!("Session store closed, stopping preview runner");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::dependency::{DependencyResolver, VersionKey};
    use playground_core::session::ENTRY_FILE;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSurface {
        shown: Mutex<Vec<PreviewDocument>>,
    }

    impl RecordingSurface {
        fn count(&self) -> usize {
            self.shown.lock().unwrap().len()
        }
    }

    impl PreviewSurface for RecordingSurface {
        fn show(&self, document: &PreviewDocument) {
            self.shown.lock().unwrap().push(document.clone());
        }
    }

    fn runner() -> (PreviewRunner, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let compiler = PreviewCompiler::new(DependencyResolver::default()).unwrap();
        (PreviewRunner::new(compiler, surface.clone()), surface)
    }

    #[test]
    fn test_renders_only_on_relevant_changes() {
        let resolver = DependencyResolver::default();
        let (mut runner, surface) = runner();
        let session = Session::with_defaults(&resolver);

        assert!(runner.render(&session).unwrap());
        assert!(!runner.render(&session).unwrap());

        let other_file = session.with_file("notes.md", "hello");
        assert!(!runner.render(&other_file).unwrap());

        let typescript = other_file.with_version(VersionKey::Typescript, "5.0.0", &resolver);
        assert!(!runner.render(&typescript).unwrap());

        let edited = typescript.with_file(ENTRY_FILE, "function App() { return null }");
        assert!(runner.render(&edited).unwrap());

        let antd = edited.with_version(VersionKey::Antd, "5.1.0", &resolver);
        assert!(runner.render(&antd).unwrap());

        assert_eq!(surface.count(), 3);
        let shown = surface.shown.lock().unwrap();
        assert!(shown[2].html.contains("antd@5.1.0"));
    }
}
