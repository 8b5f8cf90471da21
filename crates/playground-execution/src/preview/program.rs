//! Runtime program assembly.
//!
//! The user's entry source is wrapped between a prelude binding the page
//! globals to unqualified names and a mount call rendering `App`.

/// Hooks bound from the `React` global.
pub const REACT_HOOKS: &[&str] = &[
    "useState",
    "useEffect",
    "useCallback",
    "useMemo",
    "useRef",
    "useContext",
    "useReducer",
    "useLayoutEffect",
];

/// Components bound from the `antd` global.
pub const ANTD_EXPORTS: &[&str] = &[
    "Alert", "Avatar", "Badge", "Breadcrumb", "Button", "Card", "Checkbox", "Col", "Collapse",
    "ConfigProvider", "DatePicker", "Descriptions", "Divider", "Drawer", "Dropdown", "Empty",
    "Flex", "Form", "Image", "Input", "InputNumber", "Layout", "List", "Menu", "message",
    "Modal", "notification", "Pagination", "Popconfirm", "Popover", "Progress", "Radio", "Rate",
    "Result", "Row", "Segmented", "Select", "Skeleton", "Slider", "Space", "Spin", "Statistic",
    "Steps", "Switch", "Table", "Tabs", "Tag", "theme", "TimePicker", "Timeline", "Tooltip",
    "Tree", "Typography", "Upload",
];

/// Icons bound from the icon set global.
pub const ICON_EXPORTS: &[&str] = &[
    "SmileOutlined",
    "HeartOutlined",
    "StarOutlined",
    "HomeOutlined",
    "UserOutlined",
    "SettingOutlined",
    "PlusOutlined",
    "DeleteOutlined",
    "EditOutlined",
    "SearchOutlined",
    "CheckOutlined",
    "CloseOutlined",
    "LoadingOutlined",
];

/// Name of the component the program mounts.
pub const ROOT_COMPONENT: &str = "App";
/// Element the program mounts into.
pub const ROOT_ELEMENT_ID: &str = "root";

/// Program text handed to the in-page transpiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeProgram {
    text: String,
}

impl RuntimeProgram {
    pub fn assemble(source: &str) -> Self {
        let mut text = String::with_capacity(source.len() + 1024);
        text.push_str(&format!("const {{ {} }} = React;\n", REACT_HOOKS.join(", ")));
        text.push_str(&format!("const {{ {} }} = antd;\n", ANTD_EXPORTS.join(", ")));
        text.push_str("const icons = window.icons || {};\n");
        text.push_str(&format!("const {{ {} }} = icons;\n\n", ICON_EXPORTS.join(", ")));
        text.push_str(source);
        if !source.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&format!(
            "\nReactDOM.createRoot(document.getElementById('{}')).render(React.createElement({}));\n",
            ROOT_ELEMENT_ID, ROOT_COMPONENT
        ));
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_is_embedded_verbatim_between_prelude_and_mount() {
        let source = "function App() { return <Button>`${'$'}`</Button> }";
        let program = RuntimeProgram::assemble(source);
        let text = program.as_str();

        let at = text.find(source).unwrap();
        assert!(text[..at].contains("= React;"));
        assert!(text[..at].contains("Button"));
        assert!(text[..at].contains("window.icons || {}"));
        assert!(text[at..].contains("React.createElement(App)"));
        assert!(text.trim_end().ends_with("render(React.createElement(App));"));
    }

    #[test]
    fn test_empty_source_still_mounts() {
        let program = RuntimeProgram::assemble("");
        assert!(program.as_str().contains("getElementById('root')"));
    }
}
