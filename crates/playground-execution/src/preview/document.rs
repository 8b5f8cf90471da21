//! Preview document generation.
//!
//! Turns (entry source, import map) into a standalone HTML document that
//! loads the CDN scripts in dependency order, waits for page load, checks
//! the required globals, transpiles the assembled program in the page and
//! runs it. Every failure after generation is rendered into the root
//! element and posted to the parent window.

use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use playground_core::dependency::{
    ANTD, ANTD_PATH, ANTD_STYLE_PATH, BABEL, DAYJS, DependencyResolver, ICONS, REACT, REACT_DOM,
};
use playground_core::error::{PlaygroundError, Result};
use playground_core::import_map::ImportMap;

use super::escape;
use super::program::{ROOT_ELEMENT_ID, RuntimeProgram};
use crate::diagnostics::DIAGNOSTIC_SOURCE;

const TEMPLATE_NAME: &str = "preview";

const PREVIEW_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
{%- if stylesheet %}
  <link rel="stylesheet" href="{{ stylesheet }}" />
{%- endif %}
  <style>
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', sans-serif; background: #fff; }
    #{{ root_id }} { padding: 16px; }
    .playground-error { color: #cf1322; padding: 20px; white-space: pre-wrap; font-family: ui-monospace, Menlo, monospace; font-size: 13px; }
  </style>
  <script>
    window.__playgroundFailures = [];
    function __playgroundReport(kind, message, pkg, url) {
      var root = document.getElementById('{{ root_id }}');
      if (root) {
        var box = document.createElement('pre');
        box.className = 'playground-error';
        box.textContent = kind.toUpperCase() + ' ERROR\n\n' + message;
        root.textContent = '';
        root.appendChild(box);
      }
      console.error('[preview:' + kind + '] ' + message);
      try {
        parent.postMessage({ source: {{ channel }}, kind: kind, message: message, package: pkg || null, url: url || null }, '*');
      } catch (_) {}
    }
    function __playgroundScriptFailed(script) {
      window.__playgroundFailures.push({ package: script.getAttribute('data-package'), url: script.src });
    }
    function __playgroundErrorText(error) {
      if (error && error.stack) return String(error.stack);
      if (error && error.message) return String(error.message);
      return String(error);
    }
    window.addEventListener('error', function (event) {
      __playgroundReport('runtime', __playgroundErrorText(event.error || event.message));
    });
    window.addEventListener('unhandledrejection', function (event) {
      __playgroundReport('runtime', 'Unhandled rejection: ' + __playgroundErrorText(event.reason));
    });
  </script>
</head>
<body>
  <div id="{{ root_id }}"></div>
{%- for script in scripts %}
  <script crossorigin src="{{ script.url }}" data-package="{{ script.package }}" onerror="__playgroundScriptFailed(this)"></script>
{%- endfor %}
  <script>
    window.addEventListener('load', function () {
      var required = {{ required }};
      for (var i = 0; i < required.length; i++) {
        var dep = required[i];
        if (typeof window[dep.global] !== 'undefined') continue;
        if (!dep.url) {
          __playgroundReport('load', dep.package + ' has no URL in the import map.', dep.package, null);
          return;
        }
        var failed = window.__playgroundFailures.some(function (f) { return f.url === dep.url; });
        var reason = failed ? 'the request failed' : 'it did not define the global ' + dep.global;
        __playgroundReport('load', 'Failed to load ' + dep.package + ' from ' + dep.url + ': ' + reason + '.', dep.package, dep.url);
        return;
      }

      var program = `{{ program }}`;
      var compiled;
      try {
        compiled = Babel.transform(program, { presets: ['react', 'typescript'], filename: 'App.tsx' }).code;
      } catch (error) {
        __playgroundReport('transpile', __playgroundErrorText(error && error.message ? error.message : error));
        return;
      }
      try {
        new Function(compiled)();
      } catch (error) {
        __playgroundReport('runtime', __playgroundErrorText(error));
      }
    });
  </script>
</body>
</html>
"#;

/// Global each known package defines on `window`.
pub fn global_for(package: &str) -> Option<&'static str> {
    match package {
        REACT => Some("React"),
        REACT_DOM => Some("ReactDOM"),
        ANTD => Some("antd"),
        ICONS => Some("icons"),
        BABEL => Some("Babel"),
        _ => None,
    }
}

/// Packages whose globals must exist before the program runs.
pub const REQUIRED_PACKAGES: &[&str] = &[REACT, REACT_DOM, ANTD, BABEL];

/// Stylesheet of the component library, derived from its script URL.
pub fn stylesheet_url(antd_url: &str) -> Option<String> {
    antd_url
        .strip_suffix(ANTD_PATH)
        .map(|base| format!("{}{}", base, ANTD_STYLE_PATH))
}

/// One `<script>` element of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptTag {
    pub package: String,
    pub url: String,
}

impl ScriptTag {
    fn new(package: &str, url: &str) -> Self {
        Self {
            package: package.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Serialize)]
struct RequiredGlobal<'a> {
    global: &'static str,
    package: &'a str,
    url: Option<&'a str>,
}

/// A generated preview document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub html: String,
    /// Scripts in load order; the transpiler is last.
    pub scripts: Vec<ScriptTag>,
    pub stylesheet: Option<String>,
}

pub struct PreviewCompiler {
    resolver: DependencyResolver,
    env: Environment<'static>,
}

impl PreviewCompiler {
    pub fn new(resolver: DependencyResolver) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template(TEMPLATE_NAME, PREVIEW_TEMPLATE)
            .map_err(|e| PlaygroundError::internal(format!("Invalid preview template: {}", e)))?;
        Ok(Self { resolver, env })
    }

    /// Scripts in load order: framework, DOM renderer, date peer, component
    /// library, icon set, custom entries in map order, transpiler.
    pub fn script_plan(&self, import_map: &ImportMap) -> Vec<ScriptTag> {
        let mut scripts = Vec::with_capacity(import_map.len() + 2);
        let known = |package: &str| {
            import_map
                .get(package)
                .map(|url| ScriptTag::new(package, url))
        };

        scripts.extend([REACT, REACT_DOM].into_iter().filter_map(known));

        let dayjs = import_map
            .get(DAYJS)
            .map(str::to_string)
            .unwrap_or_else(|| self.resolver.dayjs_url());
        scripts.push(ScriptTag::new(DAYJS, &dayjs));

        scripts.extend([ANTD, ICONS].into_iter().filter_map(known));

        const ORDERED: &[&str] = &[REACT, REACT_DOM, DAYJS, ANTD, ICONS, BABEL];
        scripts.extend(
            import_map
                .iter()
                .filter(|(specifier, _)| !ORDERED.contains(specifier))
                .map(|(specifier, url)| ScriptTag::new(specifier, url)),
        );

        let transpiler = import_map
            .get(BABEL)
            .map(str::to_string)
            .unwrap_or_else(|| self.resolver.transpiler_url());
        scripts.push(ScriptTag::new(BABEL, &transpiler));
        scripts
    }

    pub fn compile(&self, source: &str, import_map: &ImportMap) -> Result<PreviewDocument> {
        let scripts = self.script_plan(import_map);
        let stylesheet = import_map.get(ANTD).and_then(stylesheet_url);

        let required: Vec<RequiredGlobal<'_>> = REQUIRED_PACKAGES
            .iter()
            .filter_map(|&package| {
                let global = global_for(package)?;
                let url = scripts
                    .iter()
                    .find(|s| s.package == package)
                    .map(|s| s.url.as_str());
                Some(RequiredGlobal { global, package, url })
            })
            .collect();

        let escaped_scripts: Vec<ScriptTag> = scripts
            .iter()
            .map(|s| ScriptTag {
                package: escape::html_attr(&s.package),
                url: escape::html_attr(&s.url),
            })
            .collect();

        let program = RuntimeProgram::assemble(source);
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| PlaygroundError::internal(e.to_string()))?;

        let html = template
            .render(context! {
                root_id => ROOT_ELEMENT_ID,
                stylesheet => stylesheet.as_deref().map(escape::html_attr),
                scripts => escaped_scripts,
                channel => escape::script_json(DIAGNOSTIC_SOURCE)?,
                required => escape::script_json(&required)?,
                program => escape::template_literal(program.as_str()),
            })
            .map_err(|e| PlaygroundError::internal(format!("Failed to render preview: {}", e)))?;

        tracing::debug!(
            scripts = scripts.len(),
            bytes = html.len(),
            "Preview document generated"
        );

        Ok(PreviewDocument {
            html,
            scripts,
            stylesheet,
        })
    }
}

impl std::fmt::Debug for PreviewCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewCompiler")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
