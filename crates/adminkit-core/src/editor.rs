#![forbid(unsafe_code)]

//! Settings handed to the third-party rich-text editor's `init` call.
//!
//! Field names follow the editor's option names so the struct serializes
//! straight into the init object. `enabled` is ours and never sent.

use serde::{Deserialize, Serialize};

const CONTENT_STYLE: &str = concat!(
    "body { font-family: Space Grotesk, Arial, sans-serif; color: #F6F7FB; ",
    "background: #0D1016; line-height: 1.7; } ",
    "p { margin: 0 0 1rem; text-align: justify; } ",
    "h2 { font-size: 1.4rem; margin: 1.5rem 0 0.8rem; } ",
    "h3 { font-size: 1.2rem; margin: 1.2rem 0 0.6rem; } ",
    "a { color: #0B2DFF; text-decoration: underline; }",
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether the host should initialize the editor at all.
    #[serde(skip_serializing)]
    pub enabled: bool,
    /// Elements the editor attaches to.
    pub selector: String,
    pub menubar: bool,
    pub branding: bool,
    /// Editor height in pixels.
    pub height: u32,
    /// Space-separated plugin names.
    pub plugins: String,
    /// Toolbar layout; `|` separates groups.
    pub toolbar: String,
    /// `Label=tag` pairs separated by `;`.
    pub block_formats: String,
    pub forced_root_block: String,
    /// Stylesheet injected into the editing iframe.
    pub content_style: String,
    pub skin: String,
    /// `false` suppresses the editor's own content stylesheet.
    pub content_css: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: "textarea.tus-tinymce".to_owned(),
            menubar: false,
            branding: false,
            height: 480,
            plugins: "lists link table code charmap".to_owned(),
            toolbar: "undo redo | formatselect | bold italic underline | \
                      alignleft aligncenter alignright alignjustify | forecolor backcolor | \
                      bullist numlist | link table | removeformat | code"
                .to_owned(),
            block_formats: "Paragraph=p; Heading 2=h2; Heading 3=h3; Quote=blockquote".to_owned(),
            forced_root_block: "p".to_owned(),
            content_style: CONTENT_STYLE.to_owned(),
            skin: "oxide".to_owned(),
            content_css: false,
        }
    }
}

impl EditorConfig {
    /// JSON object passed to the editor's `init`.
    pub fn to_init_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// `(label, tag)` pairs of the block-format menu.
    #[must_use]
    pub fn block_format_presets(&self) -> Vec<(&str, &str)> {
        self.block_formats
            .split(';')
            .filter_map(|entry| entry.split_once('='))
            .map(|(label, tag)| (label.trim(), tag.trim()))
            .collect()
    }

    /// Problems that would make the editor ignore or reject the settings.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.selector.trim().is_empty() {
            errors.push("editor.selector must not be empty".to_owned());
        }
        if self.height == 0 {
            errors.push("editor.height must be > 0".to_owned());
        }
        let presets = self.block_format_presets();
        if !presets.iter().any(|(_, tag)| *tag == self.forced_root_block) {
            errors.push(format!(
                "editor.forced_root_block `{}` is not among block_formats",
                self.forced_root_block
            ));
        }
        errors
    }
}
