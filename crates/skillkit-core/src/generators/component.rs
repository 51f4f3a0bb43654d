//! React and Vue component scaffolds with a matching stylesheet.

use super::prototype::kebab_case;
use crate::io::Artifact;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiFramework {
    #[default]
    React,
    Vue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentLibrary {
    Antd,
    ElementPlus,
    MaterialUi,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Styling {
    #[default]
    Css,
    Scss,
    StyledComponents,
    Tailwind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub hooks: bool,
    #[serde(rename = "async")]
    pub fetch: bool,
    pub form: bool,
    pub table: bool,
}

/// Input accepted by the `frontend-engineer` skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentRequest {
    pub name: String,
    pub framework: UiFramework,
    pub library: ComponentLibrary,
    pub typescript: bool,
    pub styling: Styling,
    pub features: Features,
}

impl Default for ComponentRequest {
    fn default() -> Self {
        Self {
            name: "user-card".into(),
            framework: UiFramework::React,
            library: ComponentLibrary::None,
            typescript: true,
            styling: Styling::Css,
            features: Features::default(),
        }
    }
}

impl ComponentRequest {
    /// `user-card`, `user_card` and `userCard` all become `UserCard`.
    pub fn component_name(&self) -> String {
        let pascal: String = self
            .name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect();
        match pascal.chars().next() {
            None => "Component".to_string(),
            Some(c) if c.is_ascii_digit() => format!("Component{pascal}"),
            Some(_) => pascal,
        }
    }

    pub fn class_name(&self) -> String {
        kebab_case(&self.component_name())
    }

    fn uses_state(&self) -> bool {
        self.features.hooks || self.features.fetch || self.features.table
    }
}

// ---------------------------------------------------------------------------
// React
// ---------------------------------------------------------------------------

fn react_imports(req: &ComponentRequest) -> String {
    let mut hooks = Vec::new();
    if req.uses_state() {
        hooks.push("useState");
    }
    if req.features.fetch {
        hooks.push("useEffect");
    }
    let mut out = if hooks.is_empty() {
        "import React from 'react';\n".to_string()
    } else {
        format!("import React, {{ {} }} from 'react';\n", hooks.join(", "))
    };

    let mut widgets = vec!["Button"];
    match req.library {
        ComponentLibrary::Antd => {
            if req.features.form {
                widgets.extend(["Form", "Input"]);
            }
            if req.features.table {
                widgets.push("Table");
            }
            if req.features.fetch {
                widgets.push("message");
            }
            out.push_str(&format!("import {{ {} }} from 'antd';\n", widgets.join(", ")));
        }
        ComponentLibrary::MaterialUi => {
            if req.features.form {
                widgets.push("TextField");
            }
            out.push_str(&format!("import {{ {} }} from '@mui/material';\n", widgets.join(", ")));
        }
        ComponentLibrary::ElementPlus | ComponentLibrary::None => {}
    }

    match req.styling {
        Styling::Css => out.push_str(&format!("import './{}.css';\n", req.component_name())),
        Styling::Scss => out.push_str(&format!("import './{}.scss';\n", req.component_name())),
        Styling::StyledComponents => {
            out.push_str(&format!("import {{ Wrapper }} from './{}.styles';\n", req.component_name()))
        }
        Styling::Tailwind => {}
    }
    out
}

fn react_body(req: &ComponentRequest) -> String {
    let ts = req.typescript;
    let mut body = String::new();
    if req.uses_state() {
        body.push_str("  const [loading, setLoading] = useState(false);\n");
        if ts {
            body.push_str("  const [data, setData] = useState<any[]>(props.data ?? []);\n\n");
        } else {
            body.push_str("  const [data, setData] = useState(props.data ?? []);\n\n");
        }
    }
    if req.features.fetch {
        let report = if req.library == ComponentLibrary::Antd {
            "message.error('获取数据失败');"
        } else {
            "console.error('获取数据失败', error);"
        };
        body.push_str(&format!(
            "  const fetchData = async () => {{\n    try {{\n      setLoading(true);\n      const response = await fetch('/api/data');\n      setData(await response.json());\n    }} catch (error) {{\n      {report}\n    }} finally {{\n      setLoading(false);\n    }}\n  }};\n\n  useEffect(() => {{\n    fetchData();\n  }}, []);\n\n"
        ));
    }
    if req.features.form {
        if req.library == ComponentLibrary::Antd {
            body.push_str("  const [form] = Form.useForm();\n\n");
        }
        let values = if ts { "values: Record<string, unknown>" } else { "values" };
        body.push_str(&format!(
            "  const handleSubmit = async ({values}) => {{\n    props.onSubmit?.(values);\n  }};\n\n"
        ));
    }
    if req.features.table {
        body.push_str("  const columns = [\n    { title: 'ID', dataIndex: 'id', key: 'id' },\n    { title: 'Name', dataIndex: 'name', key: 'name' },\n  ];\n\n");
    }
    body
}

fn react_markup(req: &ComponentRequest) -> String {
    let mut inner = String::new();
    if req.features.form {
        if req.library == ComponentLibrary::Antd {
            inner.push_str("      <Form form={form} onFinish={handleSubmit}>\n        <Form.Item name=\"name\" label=\"Name\">\n          <Input />\n        </Form.Item>\n        <Button type=\"primary\" htmlType=\"submit\">Submit</Button>\n      </Form>\n");
        } else {
            inner.push_str("      <form\n        onSubmit={(e) => {\n          e.preventDefault();\n          handleSubmit(Object.fromEntries(new FormData(e.currentTarget)));\n        }}\n      >\n        <input name=\"name\" />\n        <button type=\"submit\">Submit</button>\n      </form>\n");
        }
    }
    if req.features.table {
        if req.library == ComponentLibrary::Antd {
            inner.push_str("      <Table rowKey=\"id\" columns={columns} dataSource={data} loading={loading} />\n");
        } else {
            inner.push_str("      <table>\n        <thead>\n          <tr>{columns.map((c) => <th key={c.key}>{c.title}</th>)}</tr>\n        </thead>\n        <tbody>\n          {data.map((row) => (\n            <tr key={row.id}>{columns.map((c) => <td key={c.key}>{row[c.dataIndex]}</td>)}</tr>\n          ))}\n        </tbody>\n      </table>\n");
        }
    }
    if inner.is_empty() {
        inner.push_str("      {/* Component content */}\n");
    }

    let (open, close) = match req.styling {
        Styling::StyledComponents => ("<Wrapper>".to_string(), "</Wrapper>"),
        Styling::Tailwind => (
            "<div className=\"flex flex-col gap-4 p-5\">".to_string(),
            "</div>",
        ),
        Styling::Css | Styling::Scss => (format!("<div className=\"{}\">", req.class_name()), "</div>"),
    };
    format!("  return (\n    {open}\n{inner}    {close}\n  );\n")
}

pub fn react_component(req: &ComponentRequest) -> String {
    let name = req.component_name();
    let mut out = react_imports(req);
    out.push('\n');
    if req.typescript {
        out.push_str(&format!("export interface {name}Props {{\n"));
        if req.uses_state() {
            out.push_str("  data?: any[];\n");
        }
        if req.features.form {
            out.push_str("  onSubmit?: (values: Record<string, unknown>) => void;\n");
        }
        out.push_str("}\n\n");
        out.push_str(&format!("export const {name}: React.FC<{name}Props> = (props) => {{\n"));
    } else {
        out.push_str(&format!("export const {name} = (props) => {{\n"));
    }
    out.push_str(&react_body(req));
    out.push_str(&react_markup(req));
    out.push_str("};\n\n");
    out.push_str(&format!("export default {name};\n"));
    out
}

// ---------------------------------------------------------------------------
// Vue
// ---------------------------------------------------------------------------

pub fn vue_component(req: &ComponentRequest) -> String {
    let name = req.component_name();
    let class = req.class_name();
    let mut out = String::from("<template>\n");
    let root_class = if req.styling == Styling::Tailwind {
        "flex flex-col gap-4 p-5".to_string()
    } else {
        class.clone()
    };
    out.push_str(&format!("  <div class=\"{root_class}\">\n"));
    let element_plus = req.library == ComponentLibrary::ElementPlus;
    if req.features.form {
        if element_plus {
            out.push_str("    <el-form :model=\"form\" @submit.prevent=\"handleSubmit\">\n      <el-form-item label=\"Name\">\n        <el-input v-model=\"form.name\" />\n      </el-form-item>\n      <el-button type=\"primary\" native-type=\"submit\">Submit</el-button>\n    </el-form>\n");
        } else {
            out.push_str("    <form @submit.prevent=\"handleSubmit\">\n      <input v-model=\"form.name\" />\n      <button type=\"submit\">Submit</button>\n    </form>\n");
        }
    }
    if req.features.table {
        if element_plus {
            out.push_str("    <el-table v-loading=\"loading\" :data=\"data\">\n      <el-table-column prop=\"id\" label=\"ID\" />\n      <el-table-column prop=\"name\" label=\"Name\" />\n    </el-table>\n");
        } else {
            out.push_str("    <table>\n      <tr v-for=\"row in data\" :key=\"row.id\">\n        <td>{{ row.id }}</td>\n        <td>{{ row.name }}</td>\n      </tr>\n    </table>\n");
        }
    }
    if !req.features.form && !req.features.table {
        out.push_str("    <!-- Component content -->\n");
    }
    out.push_str("  </div>\n</template>\n\n");

    let lang = if req.typescript { " lang=\"ts\"" } else { "" };
    out.push_str(&format!("<script setup{lang}>\n"));
    let mut vue = Vec::new();
    if req.uses_state() || req.features.form {
        vue.push("ref");
    }
    if req.features.hooks {
        vue.push("computed");
    }
    if req.features.fetch {
        vue.push("onMounted");
    }
    if !vue.is_empty() {
        out.push_str(&format!("import {{ {} }} from 'vue';\n", vue.join(", ")));
    }
    if element_plus && req.features.fetch {
        out.push_str("import { ElMessage } from 'element-plus';\n");
    }
    out.push('\n');
    out.push_str(&format!("defineOptions({{ name: '{name}' }});\n\n"));
    if req.typescript {
        out.push_str("const props = defineProps<{ modelValue?: unknown }>();\n");
        out.push_str("const emit = defineEmits<{ (e: 'update:modelValue', value: unknown): void }>();\n\n");
    } else {
        out.push_str("const props = defineProps({ modelValue: null });\n");
        out.push_str("const emit = defineEmits(['update:modelValue']);\n\n");
    }
    if req.uses_state() {
        out.push_str("const loading = ref(false);\n");
        let typed = if req.typescript { "ref<any[]>([])" } else { "ref([])" };
        out.push_str(&format!("const data = {typed};\n"));
    }
    if req.features.hooks {
        out.push_str("const total = computed(() => data.value.length);\n");
    }
    if req.features.fetch {
        let report = if element_plus {
            "ElMessage.error('获取数据失败');"
        } else {
            "console.error('获取数据失败', error);"
        };
        out.push_str(&format!(
            "\nconst fetchData = async () => {{\n  try {{\n    loading.value = true;\n    const response = await fetch('/api/data');\n    data.value = await response.json();\n  }} catch (error) {{\n    {report}\n  }} finally {{\n    loading.value = false;\n  }}\n}};\n\nonMounted(fetchData);\n"
        ));
    }
    if req.features.form {
        out.push_str("\nconst form = ref({ name: '' });\n\nconst handleSubmit = () => {\n  emit('update:modelValue', { ...form.value });\n};\n");
    }
    out.push_str("</script>\n");

    match req.styling {
        Styling::Tailwind => {}
        Styling::Scss => out.push_str(&format!(
            "\n<style scoped lang=\"scss\">\n.{class} {{\n  padding: 20px;\n\n  &__header {{\n    font-size: 16px;\n    font-weight: bold;\n  }}\n}}\n</style>\n"
        )),
        Styling::Css | Styling::StyledComponents => out.push_str(&format!(
            "\n<style scoped>\n.{class} {{\n  padding: 20px;\n}}\n</style>\n"
        )),
    }
    out
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// The stylesheet next to a React component as `(file name, content)`.
/// Vue components carry their styles inline and Tailwind needs no file.
pub fn stylesheet(req: &ComponentRequest) -> Option<(String, String)> {
    if req.framework == UiFramework::Vue {
        return None;
    }
    let name = req.component_name();
    let class = req.class_name();
    let ext = if req.typescript { "ts" } else { "js" };
    match req.styling {
        Styling::Css => Some((format!("{name}.css"), format!(".{class} {{\n  padding: 20px;\n}}\n"))),
        Styling::Scss => Some((
            format!("{name}.scss"),
            format!(
                ".{class} {{\n  padding: 20px;\n\n  &__header {{\n    font-size: 16px;\n    font-weight: bold;\n  }}\n}}\n"
            ),
        )),
        Styling::StyledComponents => Some((
            format!("{name}.styles.{ext}"),
            "import styled from 'styled-components';\n\nexport const Wrapper = styled.div`\n  padding: 20px;\n`;\n"
                .to_string(),
        )),
        Styling::Tailwind => None,
    }
}

pub fn component_bundle(req: &ComponentRequest) -> Vec<Artifact> {
    let name = req.component_name();
    let (file, code) = match (req.framework, req.typescript) {
        (UiFramework::React, true) => (format!("{name}.tsx"), react_component(req)),
        (UiFramework::React, false) => (format!("{name}.jsx"), react_component(req)),
        (UiFramework::Vue, _) => (format!("{name}.vue"), vue_component(req)),
    };
    let mut files = vec![Artifact::new(format!("components/{name}/{file}"), code)];
    if let Some((file, css)) = stylesheet(req) {
        files.push(Artifact::new(format!("components/{name}/{file}"), css));
    }
    files
}
