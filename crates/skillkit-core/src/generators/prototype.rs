//! HTML/CSS page prototypes built from a page description and a design system.

use crate::io::Artifact;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Design system
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    #[serde(default)]
    pub font_size: BTreeMap<String, String>,
    #[serde(default)]
    pub line_height: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystem {
    pub colors: BTreeMap<String, String>,
    pub typography: Typography,
    #[serde(default)]
    pub spacing: BTreeMap<String, String>,
    #[serde(default)]
    pub border_radius: BTreeMap<String, String>,
    #[serde(default)]
    pub shadows: BTreeMap<String, String>,
}

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for DesignSystem {
    fn default() -> Self {
        Self {
            colors: map(&[
                ("primary", "#007bff"),
                ("secondary", "#6c757d"),
                ("success", "#28a745"),
                ("danger", "#dc3545"),
                ("warning", "#ffc107"),
                ("info", "#17a2b8"),
                ("light", "#f8f9fa"),
                ("dark", "#343a40"),
                ("white", "#ffffff"),
                ("text-primary", "#212529"),
                ("text-secondary", "#6c757d"),
                ("background", "#ffffff"),
                ("background-secondary", "#f8f9fa"),
                ("border", "#dee2e6"),
            ]),
            typography: Typography {
                font_family: r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif"#.into(),
                font_size: map(&[
                    ("xs", "0.75rem"),
                    ("sm", "0.875rem"),
                    ("base", "1rem"),
                    ("lg", "1.125rem"),
                    ("xl", "1.25rem"),
                    ("2xl", "1.5rem"),
                    ("3xl", "1.875rem"),
                    ("4xl", "2.25rem"),
                ]),
                line_height: map(&[("tight", "1.25"), ("normal", "1.5"), ("relaxed", "1.75")]),
            },
            spacing: map(&[
                ("xs", "0.25rem"),
                ("sm", "0.5rem"),
                ("md", "1rem"),
                ("lg", "1.5rem"),
                ("xl", "2rem"),
                ("2xl", "3rem"),
                ("3xl", "4rem"),
            ]),
            border_radius: map(&[
                ("none", "0"),
                ("sm", "0.125rem"),
                ("md", "0.375rem"),
                ("lg", "0.5rem"),
                ("xl", "0.75rem"),
                ("full", "9999px"),
            ]),
            shadows: map(&[
                ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
                ("md", "0 4px 6px -1px rgba(0, 0, 0, 0.1)"),
                ("lg", "0 10px 15px -3px rgba(0, 0, 0, 0.1)"),
                ("xl", "0 20px 25px -5px rgba(0, 0, 0, 0.1)"),
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Page description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Button,
    Input,
    Card,
    Modal,
    Navigation,
    Form,
    Table,
    Dropdown,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    #[serde(default = "default_href")]
    pub href: String,
    #[serde(default)]
    pub active: bool,
}

fn default_href() -> String {
    "#".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Component options; each kind reads only the fields it understands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentProps {
    pub label: Option<String>,
    pub primary: bool,
    pub size: Option<String>,
    pub placeholder: Option<String>,
    pub required: bool,
    pub title: Option<String>,
    pub footer: Option<String>,
    pub items: Vec<NavItem>,
    pub fields: Vec<FormField>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub props: ComponentProps,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Default,
    Sidebar,
    Topbar,
    Fullscreen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

static CAMEL_BOUNDARY_RE: OnceLock<Regex> = OnceLock::new();

/// `backgroundColor` -> `background-color`.
pub fn kebab_case(s: &str) -> String {
    let re = CAMEL_BOUNDARY_RE.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
    re.replace_all(s, "$1-$2").to_lowercase()
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

const WIREFRAME_CSS: &str = r#"/* Wireframe */
body * {
  color: #6c757d !important;
  background: #ffffff !important;
  box-shadow: none !important;
  outline: 1px dashed #adb5bd;
}
"#;

#[derive(Debug, Clone, Default)]
pub struct PrototypeBuilder {
    design: DesignSystem,
    wireframe: bool,
}

impl PrototypeBuilder {
    pub fn new(design: DesignSystem) -> Self {
        Self {
            design,
            wireframe: false,
        }
    }

    /// Render pages as grey dashed wireframes instead of styled mockups.
    pub fn wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }

    pub fn design(&self) -> &DesignSystem {
        &self.design
    }

    pub fn page(&self, page: &PageSpec) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
             <title>{}</title>\n  <style>\n{}\n{}  </style>\n</head>\n<body>\n{}\n</body>\n</html>",
            page.name,
            self.design_system_css(),
            self.page_css(page),
            self.layout(page),
        )
    }

    pub fn design_system_css(&self) -> String {
        let d = &self.design;
        let mut css = String::from("/* Design System Variables */\n:root {\n  /* Colors */\n");
        for (name, value) in &d.colors {
            css.push_str(&format!("  --color-{name}: {value};\n"));
        }
        css.push_str(&format!(
            "\n  /* Typography */\n  --font-family: {};\n",
            d.typography.font_family
        ));
        for (name, value) in &d.typography.font_size {
            css.push_str(&format!("  --font-size-{name}: {value};\n"));
        }
        for (name, value) in &d.typography.line_height {
            css.push_str(&format!("  --line-height-{name}: {value};\n"));
        }
        for (title, prefix, values) in [
            ("Spacing", "spacing", &d.spacing),
            ("Border Radius", "border-radius", &d.border_radius),
            ("Shadows", "shadow", &d.shadows),
        ] {
            css.push_str(&format!("\n  /* {title} */\n"));
            for (name, value) in values {
                css.push_str(&format!("  --{prefix}-{name}: {value};\n"));
            }
        }
        css.push_str(
            "}\n\n/* Reset */\n* {\n  margin: 0;\n  padding: 0;\n  box-sizing: border-box;\n}\n\n\
             body {\n  font-family: var(--font-family);\n  font-size: var(--font-size-base);\n  \
             line-height: var(--line-height-normal);\n  color: var(--color-text-primary);\n  \
             background-color: var(--color-background);\n}\n",
        );
        css
    }

    fn page_css(&self, page: &PageSpec) -> String {
        let mut css = format!("/* Page: {} */\n\n", page.name);
        for c in &page.components {
            css.push_str(&format!("/* Component: {} */\n\n.{} {{\n", c.name, c.name.to_lowercase()));
            for (prop, value) in &c.styles {
                css.push_str(&format!("  {}: {value};\n", kebab_case(prop)));
            }
            css.push_str("}\n\n");
        }
        if self.wireframe {
            css.push_str(WIREFRAME_CSS);
        }
        css
    }

    fn layout(&self, page: &PageSpec) -> String {
        let name = &page.name;
        let mut html = String::new();
        match page.layout {
            Layout::Sidebar => {
                html.push_str(&format!(
                    "<div class=\"layout-sidebar\">\n  <aside class=\"sidebar\">\n    \
                     <div class=\"sidebar-header\">\n      <h2>{name}</h2>\n    </div>\n    \
                     <nav class=\"sidebar-nav\">\n      <a href=\"#\" class=\"active\">仪表盘</a>\n      \
                     <a href=\"#\">用户管理</a>\n      <a href=\"#\">设置</a>\n    </nav>\n  </aside>\n\n  \
                     <main class=\"main-content\">\n"
                ));
                for c in &page.components {
                    html.push_str(&format!("    {}\n", component(c)));
                }
                html.push_str("  </main>\n</div>");
            }
            Layout::Topbar => {
                html.push_str(&format!(
                    "<nav class=\"topbar\">\n  <div class=\"container\">\n    <h1>{name}</h1>\n    \
                     <div class=\"topbar-menu\">\n      <a href=\"#\">首页</a>\n      \
                     <a href=\"#\">产品</a>\n      <a href=\"#\">定价</a>\n    </div>\n  </div>\n</nav>\n\n\
                     <main class=\"main\">\n  <div class=\"container\">\n"
                ));
                for c in &page.components {
                    html.push_str(&component(c));
                }
                html.push_str("  </div>\n</main>");
            }
            Layout::Fullscreen => {
                html.push_str("<div class=\"fullscreen\">\n");
                for c in &page.components {
                    html.push_str(&format!("  {}\n", component(c)));
                }
                html.push_str("</div>");
            }
            Layout::Default => {
                html.push_str(&format!(
                    "<header class=\"header\">\n  <div class=\"container\">\n    <h1>{name}</h1>\n    \
                     <nav class=\"navigation\">\n      <a href=\"#\">首页</a>\n      \
                     <a href=\"#\">关于</a>\n      <a href=\"#\">联系</a>\n    </nav>\n  </div>\n</header>\n\n\
                     <main class=\"main\">\n  <div class=\"container\">\n"
                ));
                for c in &page.components {
                    html.push_str(&component(c));
                }
                html.push_str(&format!(
                    "  </div>\n</main>\n\n<footer class=\"footer\">\n  <div class=\"container\">\n    \
                     <p>&copy; 2024 {name}. All rights reserved.</p>\n  </div>\n</footer>"
                ));
            }
        }
        html
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

pub fn component(c: &ComponentSpec) -> String {
    let p = &c.props;
    match c.kind {
        ComponentKind::Button => format!(
            "<button class=\"btn btn-{} {}\">\n  {}\n</button>",
            p.size.as_deref().unwrap_or("medium"),
            if p.primary { "primary" } else { "" },
            p.label.as_deref().unwrap_or("按钮"),
        ),
        ComponentKind::Input => input(&c.name, p.label.as_deref(), p.placeholder.as_deref(), p.required),
        ComponentKind::Card => {
            let footer = p
                .footer
                .as_ref()
                .map(|f| format!("<div class=\"card-footer\">{f}</div>"))
                .unwrap_or_default();
            format!(
                "<div class=\"card\">\n  <div class=\"card-header\">\n    <h3>{}</h3>\n  </div>\n  \
                 <div class=\"card-body\">\n    {}\n  </div>\n  {footer}\n</div>",
                p.title.as_deref().unwrap_or("卡片标题"),
                c.content.as_deref().unwrap_or("卡片内容"),
            )
        }
        ComponentKind::Modal => format!(
            "<div class=\"modal\" id=\"{}\">\n  <div class=\"modal-overlay\"></div>\n  \
             <div class=\"modal-content\">\n    <div class=\"modal-header\">\n      <h2>{}</h2>\n      \
             <button class=\"modal-close\">&times;</button>\n    </div>\n    <div class=\"modal-body\">\n      \
             {}\n    </div>\n    <div class=\"modal-footer\">\n      \
             <button class=\"btn btn-secondary\">取消</button>\n      \
             <button class=\"btn btn-primary\">确认</button>\n    </div>\n  </div>\n</div>",
            c.name,
            p.title.as_deref().unwrap_or("模态框标题"),
            c.content.as_deref().unwrap_or("模态框内容"),
        ),
        ComponentKind::Navigation => {
            let mut html = String::from("<nav class=\"navigation\">\n");
            for item in &p.items {
                let active = if item.active { "active" } else { "" };
                html.push_str(&format!("  <a href=\"{}\" class=\"{active}\">{}</a>\n", item.href, item.label));
            }
            html.push_str("</nav>");
            html
        }
        ComponentKind::Form => {
            let mut html = String::from("<form class=\"form\">\n");
            for f in &p.fields {
                html.push_str(&input(&f.name, f.label.as_deref(), f.placeholder.as_deref(), f.required));
                html.push('\n');
            }
            html.push_str("  <button type=\"submit\" class=\"btn btn-primary\">提交</button>\n</form>");
            html
        }
        ComponentKind::Table => {
            let mut html = String::from("<table class=\"table\">\n  <thead>\n    <tr>\n");
            for col in &p.columns {
                html.push_str(&format!("      <th>{col}</th>\n"));
            }
            html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
            for row in &p.rows {
                html.push_str("    <tr>\n");
                for cell in row {
                    html.push_str(&format!("      <td>{cell}</td>\n"));
                }
                html.push_str("    </tr>\n");
            }
            html.push_str("  </tbody>\n</table>");
            html
        }
        ComponentKind::Dropdown => {
            let mut html = format!(
                "<div class=\"dropdown\">\n  <button class=\"dropdown-trigger\">\n    {}\n    \
                 <span class=\"dropdown-arrow\">▼</span>\n  </button>\n  <ul class=\"dropdown-menu\">\n",
                p.placeholder.as_deref().unwrap_or("请选择..."),
            );
            for opt in &p.options {
                html.push_str(&format!("    <li><a href=\"#\">{opt}</a></li>\n"));
            }
            html.push_str("  </ul>\n</div>");
            html
        }
        ComponentKind::Other => format!(
            "<div class=\"{}\">{}</div>",
            c.name.to_lowercase(),
            c.content.as_deref().unwrap_or_default()
        ),
    }
}

fn input(id: &str, label: Option<&str>, placeholder: Option<&str>, required: bool) -> String {
    let mut html = String::from("<div class=\"form-group\">\n");
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        html.push_str(&format!("  <label for=\"{id}\">{label}</label>\n"));
    }
    html.push_str(&format!(
        "  <input type=\"text\" id=\"{id}\" placeholder=\"{}\" {} />\n</div>",
        placeholder.unwrap_or("请输入..."),
        if required { "required" } else { "" },
    ));
    html
}

/// HTML and CSS for a single component rendered on a fullscreen preview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentPreview {
    pub html: String,
    pub css: String,
}

pub fn component_preview(builder: &PrototypeBuilder, spec: &ComponentSpec) -> ComponentPreview {
    let page = PageSpec {
        name: "Component Preview".into(),
        path: "/preview".into(),
        layout: Layout::Fullscreen,
        components: vec![spec.clone()],
    };
    let html = builder.page(&page);
    let css = html
        .split_once("<style>")
        .and_then(|(_, rest)| rest.split_once("</style>"))
        .map(|(css, _)| css.to_string())
        .unwrap_or_default();
    ComponentPreview { html, css }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Html,
    Json,
}

/// Input accepted by the `ui-expert` skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrototypeRequest {
    pub pages: Vec<PageSpec>,
    pub format: ExportFormat,
    pub wireframe: bool,
}

impl Default for PrototypeRequest {
    fn default() -> Self {
        Self {
            pages: vec![example_page()],
            format: ExportFormat::Html,
            wireframe: false,
        }
    }
}

pub fn example_page() -> PageSpec {
    PageSpec {
        name: "仪表盘".into(),
        path: "/dashboard".into(),
        layout: Layout::Sidebar,
        components: vec![
            ComponentSpec {
                name: "StatCard".into(),
                kind: ComponentKind::Card,
                props: ComponentProps {
                    title: Some("用户总数".into()),
                    footer: Some("较上周增长 12%".into()),
                    ..Default::default()
                },
                styles: BTreeMap::new(),
                content: Some("<div class=\"stat-value\">1,234</div>".into()),
            },
            ComponentSpec {
                name: "DataButton".into(),
                kind: ComponentKind::Button,
                props: ComponentProps {
                    label: Some("导出数据".into()),
                    primary: true,
                    size: Some("lg".into()),
                    ..Default::default()
                },
                styles: BTreeMap::new(),
                content: None,
            },
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrototypeExport {
    pub format: ExportFormat,
    pub message: String,
    pub files: Vec<Artifact>,
}

/// A single page exports as `index.html`; several pages export one file per
/// page name. The JSON format adds `prototype.json` holding the page list.
/// File stem for a page name: letters, digits, `-` and `_` are kept, any
/// other run of characters becomes a single `-`.
pub fn page_slug(name: &str) -> String {
    let mut slug = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "page".to_string()
    } else {
        slug.to_string()
    }
}

/// One file name per page, suffixing `-2`, `-3`, ... when slugs collide.
fn page_file_names(pages: &[PageSpec]) -> Vec<String> {
    let mut used: Vec<String> = Vec::with_capacity(pages.len());
    for p in pages {
        let base = page_slug(&p.name);
        let mut name = base.clone();
        let mut n = 2;
        while used.contains(&name) {
            name = format!("{base}-{n}");
            n += 1;
        }
        used.push(name);
    }
    used.into_iter().map(|stem| format!("{stem}.html")).collect()
}

pub fn export_prototype(builder: &PrototypeBuilder, req: &PrototypeRequest) -> PrototypeExport {
    let mut files: Vec<Artifact> = match req.pages.as_slice() {
        [single] => vec![Artifact::new("index.html", builder.page(single))],
        pages => page_file_names(pages)
            .into_iter()
            .zip(pages)
            .map(|(file, p)| Artifact::new(file, builder.page(p)))
            .collect(),
    };

    let message = match req.format {
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(&req.pages).unwrap_or_default();
            files.push(Artifact::new("prototype.json", json));
            "原型导出成功（JSON格式）"
        }
        ExportFormat::Html if req.pages.len() > 1 => "原型导出成功（多页面）",
        ExportFormat::Html => "原型导出成功（HTML格式）",
    };

    PrototypeExport {
        format: req.format,
        message: message.into(),
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(v: serde_json::Value) -> ComponentSpec {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn kebab_case_splits_camel() {
        assert_eq!(kebab_case("backgroundColor"), "background-color");
        assert_eq!(kebab_case("padding"), "padding");
        assert_eq!(kebab_case("h1FontSize"), "h1-font-size");
    }

    #[test]
    fn page_contains_design_variables_and_layout() {
        let html = PrototypeBuilder::default().page(&example_page());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>仪表盘</title>"));
        assert!(html.contains("  --color-primary: #007bff;"));
        assert!(html.contains("  --line-height-normal: 1.5;"));
        assert!(html.contains("  --border-radius-full: 9999px;"));
        assert!(html.contains("<aside class=\"sidebar\">"));
        assert!(html.contains("<div class=\"card-footer\">较上周增长 12%</div>"));
        assert!(html.contains("<button class=\"btn btn-lg primary\">\n  导出数据\n</button>"));
        assert!(html.ends_with("</body>\n</html>"));
    }

    #[test]
    fn component_styles_are_kebab_cased() {
        let page = PageSpec {
            name: "P".into(),
            path: "/p".into(),
            layout: Layout::Default,
            components: vec![spec(json!({
                "name": "Hero",
                "type": "display",
                "styles": {"backgroundColor": "red"},
                "content": "hi"
            }))],
        };
        let html = PrototypeBuilder::default().page(&page);
        assert!(html.contains(".hero {\n  background-color: red;\n}"));
        assert!(html.contains("<div class=\"hero\">hi</div>"));
        assert!(html.contains("&copy; 2024 P. All rights reserved."));
    }

    #[test]
    fn form_renders_inputs() {
        let html = component(&spec(json!({
            "name": "Login",
            "type": "form",
            "props": {"fields": [
                {"name": "user", "label": "用户名", "required": true},
                {"name": "note"}
            ]}
        })));
        assert!(html.contains("<label for=\"user\">用户名</label>"));
        assert!(html.contains("id=\"user\" placeholder=\"请输入...\" required />"));
        assert!(!html.contains("<label for=\"note\">"));
        assert!(html.ends_with("提交</button>\n</form>"));
    }

    #[test]
    fn table_and_dropdown() {
        let table = component(&spec(json!({
            "name": "T", "type": "table",
            "props": {"columns": ["A", "B"], "rows": [["1", "2"]]}
        })));
        assert!(table.contains("      <th>A</th>\n      <th>B</th>\n"));
        assert!(table.contains("      <td>1</td>\n      <td>2</td>\n"));

        let dd = component(&spec(json!({"name": "D", "type": "dropdown", "props": {"options": ["x"]}})));
        assert!(dd.contains("请选择..."));
        assert!(dd.contains("<li><a href=\"#\">x</a></li>"));
    }

    #[test]
    fn navigation_marks_active() {
        let nav = component(&spec(json!({
            "name": "N", "type": "navigation",
            "props": {"items": [{"label": "Home", "active": true}, {"label": "Docs", "href": "/docs"}]}
        })));
        assert!(nav.contains("<a href=\"#\" class=\"active\">Home</a>"));
        assert!(nav.contains("<a href=\"/docs\" class=\"\">Docs</a>"));
    }

    #[test]
    fn preview_extracts_css() {
        let preview = component_preview(
            &PrototypeBuilder::default(),
            &spec(json!({"name": "Btn", "type": "button"})),
        );
        assert!(preview.css.contains("/* Component: Btn */"));
        assert!(!preview.css.contains("<style>"));
        assert!(preview.html.contains("<div class=\"fullscreen\">"));
    }

    #[test]
    fn wireframe_appends_outline_css() {
        let html = PrototypeBuilder::default().wireframe().page(&example_page());
        assert!(html.contains("/* Wireframe */"));
    }

    #[test]
    fn export_single_and_multi_page() {
        let builder = PrototypeBuilder::default();
        let single = export_prototype(&builder, &PrototypeRequest::default());
        assert_eq!(single.files.len(), 1);
        assert_eq!(single.files[0].path, "index.html");
        assert_eq!(single.message, "原型导出成功（HTML格式）");

        let mut other = example_page();
        other.name = "settings".into();
        let multi = export_prototype(
            &builder,
            &PrototypeRequest {
                pages: vec![example_page(), other],
                format: ExportFormat::Json,
                wireframe: false,
            },
        );
        let names: Vec<&str> = multi.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(names, ["仪表盘.html", "settings.html", "prototype.json"]);
        assert_eq!(multi.message, "原型导出成功（JSON格式）");
    }

    #[test]
    fn page_names_cannot_leave_the_output_dir() {
        assert_eq!(page_slug("../../escaped"), "escaped");
        assert_eq!(page_slug("用户 设置/账号"), "用户-设置-账号");
        assert_eq!(page_slug(".."), "page");

        let mut escaped = example_page();
        escaped.name = "../../escaped".into();
        let mut home = example_page();
        home.name = "home".into();
        let mut dup = example_page();
        dup.name = "escaped".into();
        let export = export_prototype(
            &PrototypeBuilder::default(),
            &PrototypeRequest {
                pages: vec![escaped, home, dup],
                ..Default::default()
            },
        );
        let names: Vec<&str> = export.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(names, ["escaped.html", "home.html", "escaped-2.html"]);

        let dir = tempfile::TempDir::new().unwrap();
        crate::io::write_artifacts(&dir.path().join("out"), &export.files).unwrap();
        assert!(dir.path().join("out/escaped.html").exists());
    }
}
