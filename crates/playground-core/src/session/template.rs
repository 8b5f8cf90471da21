//! Built-in template file set.

use crate::session::model::{ENTRY_FILE, Files, MAIN_FILE, SETUP_FILE};

const ENTRY_TEMPLATE: &str = include_str!("../../template/App.tsx");
const MAIN_TEMPLATE: &str = include_str!("../../template/main.tsx");
const SETUP_TEMPLATE: &str = include_str!("../../template/antd.ts");

const VERSION_PLACEHOLDER: &str = "#VERSION#";

/// Source of the entry component shipped with a fresh playground.
pub fn entry_source() -> &'static str {
    ENTRY_TEMPLATE
}

pub fn main_source() -> &'static str {
    MAIN_TEMPLATE
}

/// The component-library setup file for a given library version.
pub fn setup_source(antd_version: &str) -> String {
    SETUP_TEMPLATE.replace(VERSION_PLACEHOLDER, antd_version)
}

/// The full template file set, entry first.
pub fn default_files(antd_version: &str) -> Files {
    let mut files = Files::new();
    files.insert(ENTRY_FILE.to_string(), ENTRY_TEMPLATE.to_string());
    files.insert(MAIN_FILE.to_string(), MAIN_TEMPLATE.to_string());
    files.insert(SETUP_FILE.to_string(), setup_source(antd_version));
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_source_is_version_templated() {
        let source = setup_source("5.1.2");
        assert!(source.contains("antd@5.1.2/dist/reset.css"));
        assert!(!source.contains(VERSION_PLACEHOLDER));
    }

    #[test]
    fn test_default_files_order() {
        let files = default_files("5.27.5");
        assert_eq!(
            files.keys().map(String::as_str).collect::<Vec<_>>(),
            vec![ENTRY_FILE, MAIN_FILE, SETUP_FILE]
        );
        assert!(files[ENTRY_FILE].contains("function App()"));
    }
}
