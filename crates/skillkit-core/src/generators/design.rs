//! Design systems and design-token exporters.
//!
//! A [`DesignSystemSpec`] is the shade-based palette plus type and spacing
//! scales used for design documentation. [`DesignTokens`] is the flat token
//! list handed to developers, exported to CSS, SCSS, JS, TS, JSON, Tailwind or
//! a Markdown style guide.

use super::prototype::kebab_case;
use crate::error::{Result, SkillkitError};
use crate::io::Artifact;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse_hex(s: &str) -> Result<Rgb> {
        let invalid = || SkillkitError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Move `amount` (0.0..=1.0) of the way towards `target`.
    pub fn mix(self, target: Rgb, amount: f64) -> Rgb {
        let blend = |a: u8, b: u8| (f64::from(a) * (1.0 - amount) + f64::from(b) * amount).round() as u8;
        Rgb(
            blend(self.0, target.0),
            blend(self.1, target.1),
            blend(self.2, target.2),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Primary,
    Secondary,
    Neutral,
    Success,
    Warning,
    Error,
}

impl ColorRole {
    pub fn all() -> &'static [ColorRole] {
        &[
            ColorRole::Primary,
            ColorRole::Secondary,
            ColorRole::Neutral,
            ColorRole::Success,
            ColorRole::Warning,
            ColorRole::Error,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Neutral => "neutral",
            ColorRole::Success => "success",
            ColorRole::Warning => "warning",
            ColorRole::Error => "error",
        }
    }
}

pub const SHADES: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

pub type ColorScale = BTreeMap<u16, String>;

/// 50..400 mix the base with white, 600..900 with black, 500 is the base.
pub fn color_scale(base: &str) -> Result<ColorScale> {
    let rgb = Rgb::parse_hex(base)?;
    let scale = SHADES
        .iter()
        .map(|&shade| {
            let color = match shade {
                50 => rgb.mix(Rgb::WHITE, 0.9),
                100 => rgb.mix(Rgb::WHITE, 0.75),
                200 => rgb.mix(Rgb::WHITE, 0.6),
                300 => rgb.mix(Rgb::WHITE, 0.4),
                400 => rgb.mix(Rgb::WHITE, 0.2),
                600 => rgb.mix(Rgb::BLACK, 0.15),
                700 => rgb.mix(Rgb::BLACK, 0.3),
                800 => rgb.mix(Rgb::BLACK, 0.45),
                900 => rgb.mix(Rgb::BLACK, 0.6),
                _ => rgb,
            };
            (shade, color.to_string())
        })
        .collect();
    Ok(scale)
}

fn fixed_scale(hexes: [&str; 10]) -> ColorScale {
    SHADES.iter().copied().zip(hexes.iter().map(|h| h.to_string())).collect()
}

pub const SECONDARY_BASE: &str = "#722ed1";

pub fn color_system(primary: &str) -> Result<BTreeMap<ColorRole, ColorScale>> {
    let mut colors = BTreeMap::new();
    colors.insert(ColorRole::Primary, color_scale(primary)?);
    colors.insert(ColorRole::Secondary, color_scale(SECONDARY_BASE)?);
    colors.insert(
        ColorRole::Neutral,
        fixed_scale([
            "#fafafa", "#f5f5f5", "#e8e8e8", "#d9d9d9", "#bfbfbf", "#8c8c8c", "#595959", "#434343",
            "#262626", "#1f1f1f",
        ]),
    );
    colors.insert(
        ColorRole::Success,
        fixed_scale([
            "#f6ffed", "#d9f7be", "#b7eb8f", "#95de64", "#73d13d", "#52c41a", "#389e0d", "#237804",
            "#135200", "#092b00",
        ]),
    );
    colors.insert(
        ColorRole::Warning,
        fixed_scale([
            "#fffbe6", "#fff1b8", "#ffe58f", "#ffd666", "#ffc53d", "#faad14", "#d48806", "#ad6800",
            "#874d00", "#613400",
        ]),
    );
    colors.insert(
        ColorRole::Error,
        fixed_scale([
            "#fff1f0", "#ffccc7", "#ffa39e", "#ff7875", "#ff4d4f", "#f5222d", "#cf1322", "#a8071a",
            "#820014", "#5c0011",
        ]),
    );
    Ok(colors)
}

// ---------------------------------------------------------------------------
// Type, spacing, components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStep {
    pub name: String,
    pub font_size: String,
    pub font_weight: String,
    pub line_height: String,
}

pub fn type_scale() -> Vec<TypeStep> {
    [
        ("xs", "0.75rem", "400", "1.25"),
        ("sm", "0.875rem", "400", "1.5"),
        ("base", "1rem", "400", "1.5"),
        ("lg", "1.125rem", "400", "1.5"),
        ("xl", "1.25rem", "500", "1.5"),
        ("2xl", "1.5rem", "600", "1.5"),
        ("3xl", "1.875rem", "700", "1.25"),
        ("4xl", "2.25rem", "700", "1.25"),
    ]
    .into_iter()
    .map(|(name, size, weight, lh)| TypeStep {
        name: name.into(),
        font_size: size.into(),
        font_weight: weight.into(),
        line_height: lh.into(),
    })
    .collect()
}

pub const SPACING_UNIT_PX: u32 = 4;
pub const SPACING_STEPS: [u32; 13] = [0, 1, 2, 3, 4, 5, 6, 8, 10, 12, 16, 20, 24];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: String,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn named(pairs: &[(&str, &str)]) -> Vec<NamedValue> {
    pairs.iter().map(|(n, v)| NamedValue::new(*n, *v)).collect()
}

pub fn spacing_scale() -> Vec<NamedValue> {
    SPACING_STEPS
        .iter()
        .map(|step| NamedValue::new(step.to_string(), format!("{}px", step * SPACING_UNIT_PX)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProp {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTemplate {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub props: Vec<ComponentProp>,
}

fn default_category() -> String {
    "general".into()
}

pub fn button_template() -> ComponentTemplate {
    let prop = |name: &str, ty: &str, default: &str, desc: &str| ComponentProp {
        name: name.into(),
        prop_type: ty.into(),
        required: false,
        default: Some(default.into()),
        description: desc.into(),
    };
    ComponentTemplate {
        name: "Button".into(),
        category: default_category(),
        description: "按钮组件".into(),
        props: vec![
            prop("type", "'primary' | 'secondary' | 'tertiary'", "'primary'", "按钮类型"),
            prop("size", "'sm' | 'md' | 'lg'", "'md'", "按钮大小"),
            prop("disabled", "boolean", "false", "是否禁用"),
        ],
    }
}

// ---------------------------------------------------------------------------
// DesignSystemSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystemSpec {
    pub colors: BTreeMap<ColorRole, ColorScale>,
    pub typography: Vec<TypeStep>,
    pub spacing: Vec<NamedValue>,
    #[serde(default)]
    pub border_radius: Vec<NamedValue>,
    #[serde(default)]
    pub shadows: Vec<NamedValue>,
    #[serde(default)]
    pub components: Vec<ComponentTemplate>,
}

impl DesignSystemSpec {
    /// Full palette around `primary` with the stock scales and a Button.
    pub fn standard(primary: &str) -> Result<Self> {
        Ok(Self {
            colors: color_system(primary)?,
            typography: type_scale(),
            spacing: spacing_scale(),
            border_radius: named(&[("sm", "4px"), ("md", "8px"), ("lg", "16px"), ("full", "9999px")]),
            shadows: named(&[
                ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
                ("md", "0 4px 6px -1px rgba(0, 0, 0, 0.1)"),
                ("lg", "0 10px 15px -3px rgba(0, 0, 0, 0.1)"),
            ]),
            components: vec![button_template()],
        })
    }

    pub fn css_variables(&self) -> String {
        let mut css = String::from(":root {\n  /* 颜色系统 */\n");
        for (role, scale) in &self.colors {
            for (shade, hex) in scale {
                css.push_str(&format!("  --color-{}-{shade}: {hex};\n", role.as_str()));
            }
        }
        css.push_str("\n  /* 字体系统 */\n");
        let type_vars: Vec<String> = self
            .typography
            .iter()
            .map(|t| {
                format!(
                    "  --font-size-{n}: {};\n  --font-weight-{n}: {};\n  --line-height-{n}: {};",
                    t.font_size,
                    t.font_weight,
                    t.line_height,
                    n = t.name
                )
            })
            .collect();
        css.push_str(&type_vars.join("\n\n"));
        css.push_str("\n\n  /* 间距系统 */\n");
        for s in &self.spacing {
            css.push_str(&format!("  --spacing-{}: {};\n", s.name, s.value));
        }
        css.push_str("}\n");
        css
    }

    pub fn markdown(&self) -> String {
        let mut md = String::from("# 设计规范\n\n## 颜色系统\n\n| 类型 | 色阶 |\n|------|------|\n");
        for (role, scale) in &self.colors {
            let shades: Vec<String> = scale.iter().map(|(s, h)| format!("{s}: {h}")).collect();
            md.push_str(&format!("| {} | {} |\n", role.as_str(), shades.join(", ")));
        }

        md.push_str("\n## 字体系统\n\n| 尺寸 | 大小 | 字重 | 行高 |\n|------|------|------|------|\n");
        for t in &self.typography {
            md.push_str(&format!("| {} | {} | {} | {} |\n", t.name, t.font_size, t.font_weight, t.line_height));
        }

        md.push_str("\n## 间距系统\n\n| 尺寸 | 值 |\n|------|-----|\n");
        for s in &self.spacing {
            md.push_str(&format!("| {} | {} |\n", s.name, s.value));
        }

        for (title, values) in [("圆角", &self.border_radius), ("阴影", &self.shadows)] {
            let blocks: Vec<String> = values
                .iter()
                .map(|v| format!("### {}\n`{}`", v.name, v.value))
                .collect();
            md.push_str(&format!("\n## {title}\n\n{}\n", blocks.join("\n\n")));
        }

        let components: Vec<String> = self
            .components
            .iter()
            .map(|c| {
                let props: Vec<String> = c
                    .props
                    .iter()
                    .map(|p| format!("- `{}`: {} - {}", p.name, p.prop_type, p.description))
                    .collect();
                format!("### {}\n\n{}\n\n**属性**：\n{}", c.name, c.description, props.join("\n"))
            })
            .collect();
        md.push_str(&format!("\n## 组件库\n\n{}\n", components.join("\n\n---\n\n")));
        md
    }

    pub fn validate(&self) -> DesignValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for role in ColorRole::all() {
            if !self.colors.contains_key(role) {
                errors.push(format!("缺少颜色类型：{}", role.as_str()));
            }
        }
        if self.typography.is_empty() {
            errors.push("字体系统为空".to_string());
        }
        if self.spacing.is_empty() {
            errors.push("间距系统为空".to_string());
        }
        if self.components.is_empty() {
            warnings.push("设计规范中没有组件".to_string());
        }
        DesignValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// DesignTokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorToken {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypographyCategory {
    FontSize,
    FontFamily,
    LineHeight,
    FontWeight,
}

impl TypographyCategory {
    fn css_prefix(self) -> &'static str {
        match self {
            TypographyCategory::FontSize => "font-size",
            TypographyCategory::FontFamily => "font-family",
            TypographyCategory::LineHeight => "line-height",
            TypographyCategory::FontWeight => "font-weight",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypographyToken {
    pub name: String,
    pub value: String,
    pub category: TypographyCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    pub colors: Vec<ColorToken>,
    pub typography: Vec<TypographyToken>,
    pub spacing: Vec<NamedValue>,
    #[serde(default)]
    pub border_radius: Vec<NamedValue>,
    #[serde(default)]
    pub shadows: Vec<NamedValue>,
    #[serde(default)]
    pub breakpoints: Vec<NamedValue>,
}

impl Default for DesignTokens {
    fn default() -> Self {
        let color = |name: &str, value: &str, category: &str| ColorToken {
            name: name.into(),
            value: value.into(),
            category: category.into(),
        };
        let mut colors = vec![
            color("primary", "#3B82F6", "brand"),
            color("secondary", "#6366F1", "brand"),
            color("success", "#10B981", "semantic"),
            color("warning", "#F59E0B", "semantic"),
            color("error", "#EF4444", "semantic"),
            color("info", "#3B82F6", "semantic"),
        ];
        for (shade, hex) in SHADES.iter().zip([
            "#F9FAFB", "#F3F4F6", "#E5E7EB", "#D1D5DB", "#9CA3AF", "#6B7280", "#4B5563", "#374151",
            "#1F2937", "#111827",
        ]) {
            colors.push(color(&format!("gray-{shade}"), hex, "gray"));
        }

        use TypographyCategory::*;
        let typo = |name: &str, value: &str, category| TypographyToken {
            name: name.into(),
            value: value.into(),
            category,
        };
        let typography = vec![
            typo("font-sans", r#""Inter", -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif"#, FontFamily),
            typo("font-mono", r#""Fira Code", monospace"#, FontFamily),
            typo("xs", "0.75rem", FontSize),
            typo("sm", "0.875rem", FontSize),
            typo("base", "1rem", FontSize),
            typo("lg", "1.125rem", FontSize),
            typo("xl", "1.25rem", FontSize),
            typo("2xl", "1.5rem", FontSize),
            typo("3xl", "1.875rem", FontSize),
            typo("4xl", "2.25rem", FontSize),
            typo("none", "1", LineHeight),
            typo("tight", "1.25", LineHeight),
            typo("normal", "1.5", LineHeight),
            typo("relaxed", "1.75", LineHeight),
        ];

        Self {
            colors,
            typography,
            spacing: named(&[
                ("0", "0"),
                ("1", "0.25rem"),
                ("2", "0.5rem"),
                ("3", "0.75rem"),
                ("4", "1rem"),
                ("5", "1.25rem"),
                ("6", "1.5rem"),
                ("8", "2rem"),
                ("10", "2.5rem"),
                ("12", "3rem"),
                ("16", "4rem"),
                ("20", "5rem"),
                ("24", "6rem"),
            ]),
            border_radius: named(&[
                ("none", "0"),
                ("sm", "0.125rem"),
                ("md", "0.375rem"),
                ("lg", "0.5rem"),
                ("xl", "0.75rem"),
                ("2xl", "1rem"),
                ("3xl", "1.5rem"),
                ("full", "9999px"),
            ]),
            shadows: named(&[
                ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
                ("md", "0 4px 6px -1px rgba(0, 0, 0, 0.1)"),
                ("lg", "0 10px 15px -3px rgba(0, 0, 0, 0.1)"),
                ("xl", "0 20px 25px -5px rgba(0, 0, 0, 0.1)"),
            ]),
            breakpoints: named(&[
                ("sm", "640px"),
                ("md", "768px"),
                ("lg", "1024px"),
                ("xl", "1280px"),
                ("2xl", "1536px"),
            ]),
        }
    }
}

static DASH_LOWER_RE: OnceLock<Regex> = OnceLock::new();
static IDENT_RE: OnceLock<Regex> = OnceLock::new();

/// `font-sans` -> `fontSans`. Dashes before digits are kept.
pub fn camel_case(s: &str) -> String {
    let re = DASH_LOWER_RE.get_or_init(|| Regex::new(r"-([a-z])").unwrap());
    re.replace_all(s, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Object key as written in JS: bare when it is an identifier, quoted otherwise.
fn js_key(name: &str) -> String {
    let re = IDENT_RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());
    if re.is_match(name) {
        name.to_string()
    } else {
        format!("'{name}'")
    }
}

fn font_stack(value: &str) -> String {
    let fonts: Vec<String> = value
        .split(',')
        .map(|f| format!("'{}'", f.trim().trim_matches('"')))
        .collect();
    fonts.join(", ")
}

impl DesignTokens {
    fn typography_of(&self, category: TypographyCategory) -> impl Iterator<Item = &TypographyToken> {
        self.typography.iter().filter(move |t| t.category == category)
    }

    fn maps(&self) -> [(&'static str, &Vec<NamedValue>); 3] {
        [
            ("borderRadius", &self.border_radius),
            ("shadows", &self.shadows),
            ("breakpoints", &self.breakpoints),
        ]
    }

    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n  /* Colors */\n");
        for c in &self.colors {
            css.push_str(&format!("  --color-{}: {};\n", kebab_case(&c.name), c.value));
        }
        css.push_str("\n  /* Typography */\n");
        for t in &self.typography {
            css.push_str(&format!("  --{}-{}: {};\n", t.category.css_prefix(), kebab_case(&t.name), t.value));
        }
        css.push_str("\n  /* Spacing */\n");
        for s in &self.spacing {
            css.push_str(&format!("  --spacing-{}: {};\n", kebab_case(&s.name), s.value));
        }
        for (title, prefix, values) in [
            ("Border Radius", "border-radius", &self.border_radius),
            ("Shadows", "shadow", &self.shadows),
            ("Breakpoints", "breakpoint", &self.breakpoints),
        ] {
            css.push_str(&format!("\n  /* {title} */\n"));
            for v in values {
                css.push_str(&format!("  --{prefix}-{}: {};\n", v.name, v.value));
            }
        }
        css.push_str("}\n");
        css
    }

    pub fn to_scss(&self) -> String {
        let mut scss = String::from("// Design Tokens\n");
        let sections: [(&str, Vec<(&str, &str)>); 6] = [
            ("Colors", self.colors.iter().map(|c| (c.name.as_str(), c.value.as_str())).collect()),
            ("Typography", self.typography.iter().map(|t| (t.name.as_str(), t.value.as_str())).collect()),
            ("Spacing", pairs(&self.spacing)),
            ("Border Radius", pairs(&self.border_radius)),
            ("Shadows", pairs(&self.shadows)),
            ("Breakpoints", pairs(&self.breakpoints)),
        ];
        for (title, entries) in sections {
            scss.push_str(&format!("\n// {title}\n"));
            for (name, value) in entries {
                scss.push_str(&format!("${}: {value};\n", camel_case(name)));
            }
        }
        scss
    }

    fn js_object_body(&self, indent: &str) -> String {
        let mut out = String::new();
        let groups: [(&str, Vec<(String, &str)>); 3] = [
            ("colors", self.colors.iter().map(|c| (camel_case(&c.name), c.value.as_str())).collect()),
            ("typography", self.typography.iter().map(|t| (camel_case(&t.name), t.value.as_str())).collect()),
            ("spacing", self.spacing.iter().map(|s| (camel_case(&s.name), s.value.as_str())).collect()),
        ];
        let maps = self.maps().map(|(group, values)| {
            (group, values.iter().map(|v| (v.name.clone(), v.value.as_str())).collect::<Vec<_>>())
        });
        let all: Vec<(&str, Vec<(String, &str)>)> = groups.into_iter().chain(maps).collect();
        let last = all.len().saturating_sub(1);
        for (i, (group, entries)) in all.iter().enumerate() {
            out.push_str(&format!("{indent}{group}: {{\n"));
            for (name, value) in entries {
                out.push_str(&format!("{indent}  {}: {},\n", js_key(name), js_string(value)));
            }
            out.push_str(&format!("{indent}}}{}\n", if i == last { "" } else { "," }));
        }
        out
    }

    pub fn to_js(&self) -> String {
        format!("export const designTokens = {{\n{}}};\n", self.js_object_body("  "))
    }

    pub fn to_ts(&self) -> String {
        format!(
            "// Design Token Type Definitions\n\n\
             export interface DesignTokens {{\n  colors: Record<string, string>;\n  \
             typography: Record<string, string>;\n  spacing: Record<string, string>;\n  \
             borderRadius: Record<string, string>;\n  shadows: Record<string, string>;\n  \
             breakpoints: Record<string, string>;\n}}\n\n\
             export const designTokens: DesignTokens = {{\n{}}};\n\n\
             export type ColorToken = keyof typeof designTokens.colors;\n\
             export type TypographyToken = keyof typeof designTokens.typography;\n\
             export type SpacingToken = keyof typeof designTokens.spacing;\n",
            self.js_object_body("  ")
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_tailwind(&self) -> String {
        let mut cfg = String::from("// tailwind.config.js\n\nmodule.exports = {\n  theme: {\n    extend: {\n");
        let mut block = |key: &str, entries: Vec<(String, String)>| {
            cfg.push_str(&format!("      {key}: {{\n"));
            for (name, value) in entries {
                cfg.push_str(&format!("        {}: {value},\n", js_key(&name)));
            }
            cfg.push_str("      },\n");
        };
        let quoted = |v: &str| js_string(v);

        block("colors", self.colors.iter().map(|c| (kebab_case(&c.name), quoted(&c.value))).collect());
        block(
            "fontFamily",
            self.typography_of(TypographyCategory::FontFamily)
                .map(|t| (kebab_case(&t.name), format!("[{}]", font_stack(&t.value))))
                .collect(),
        );
        block(
            "fontSize",
            self.typography_of(TypographyCategory::FontSize)
                .map(|t| (kebab_case(&t.name), quoted(&t.value)))
                .collect(),
        );
        block(
            "lineHeight",
            self.typography_of(TypographyCategory::LineHeight)
                .map(|t| (kebab_case(&t.name), quoted(&t.value)))
                .collect(),
        );
        for (key, values) in [
            ("spacing", &self.spacing),
            ("borderRadius", &self.border_radius),
            ("boxShadow", &self.shadows),
            ("screens", &self.breakpoints),
        ] {
            block(key, values.iter().map(|v| (v.name.clone(), quoted(&v.value))).collect());
        }
        cfg.push_str("    },\n  },\n};\n");
        cfg
    }

    /// Markdown style guide.
    pub fn style_guide(&self) -> String {
        let swatch = |hex: &str| format!("![{hex}](https://via.placeholder.com/20/{})", hex.trim_start_matches('#'));

        let mut md = String::from("# 设计规范文档\n\n## 颜色\n\n### 品牌色\n\n| 名称 | 值 | 变量名 |\n|------|-----|--------|\n");
        for c in self.colors.iter().filter(|c| c.category == "brand") {
            md.push_str(&format!("| {} | {} | `--color-{}` |\n", c.name, swatch(&c.value), kebab_case(&c.name)));
        }
        md.push_str("\n### 语义色\n\n| 名称 | 值 | 用途 |\n|------|-----|------|\n");
        for c in self.colors.iter().filter(|c| c.category == "semantic") {
            md.push_str(&format!("| {} | {} | {} |\n", c.name, swatch(&c.value), c.name));
        }

        md.push_str("\n## 排版\n");
        for (title, category) in [("字体大小", TypographyCategory::FontSize), ("字体族", TypographyCategory::FontFamily)] {
            md.push_str(&format!("\n### {title}\n\n| 名称 | 值 |\n|------|-----|\n"));
            for t in self.typography_of(category) {
                md.push_str(&format!("| {} | {} |\n", t.name, t.value));
            }
        }

        for (title, values) in [("间距", &self.spacing), ("圆角", &self.border_radius), ("阴影", &self.shadows)] {
            md.push_str(&format!("\n## {title}\n\n| 名称 | 值 |\n|------|-----|\n"));
            for v in values {
                md.push_str(&format!("| {} | {} |\n", v.name, v.value));
            }
        }
        md
    }

    pub fn export(&self, format: TokenFormat) -> Result<Artifact> {
        let content = match format {
            TokenFormat::Css => self.to_css(),
            TokenFormat::Scss => self.to_scss(),
            TokenFormat::Js => self.to_js(),
            TokenFormat::Ts => self.to_ts(),
            TokenFormat::Json => self.to_json()?,
            TokenFormat::Tailwind => self.to_tailwind(),
            TokenFormat::Markdown => self.style_guide(),
        };
        Ok(Artifact::new(format.file_name(), content))
    }
}

fn pairs(values: &[NamedValue]) -> Vec<(&str, &str)> {
    values.iter().map(|v| (v.name.as_str(), v.value.as_str())).collect()
}

fn js_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

// ---------------------------------------------------------------------------
// TokenFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    Css,
    #[serde(alias = "sass")]
    Scss,
    Js,
    Ts,
    Json,
    Tailwind,
    Markdown,
}

impl TokenFormat {
    pub fn all() -> &'static [TokenFormat] {
        &[
            TokenFormat::Css,
            TokenFormat::Scss,
            TokenFormat::Js,
            TokenFormat::Ts,
            TokenFormat::Json,
            TokenFormat::Tailwind,
            TokenFormat::Markdown,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenFormat::Css => "css",
            TokenFormat::Scss => "scss",
            TokenFormat::Js => "js",
            TokenFormat::Ts => "ts",
            TokenFormat::Json => "json",
            TokenFormat::Tailwind => "tailwind",
            TokenFormat::Markdown => "markdown",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TokenFormat::Css => "tokens.css",
            TokenFormat::Scss => "_tokens.scss",
            TokenFormat::Js => "tokens.js",
            TokenFormat::Ts => "tokens.ts",
            TokenFormat::Json => "tokens.json",
            TokenFormat::Tailwind => "tailwind.config.js",
            TokenFormat::Markdown => "DESIGN_SPEC.md",
        }
    }
}

impl fmt::Display for TokenFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenFormat {
    type Err = SkillkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sass" => Ok(TokenFormat::Scss),
            "md" => Ok(TokenFormat::Markdown),
            _ => TokenFormat::all()
                .iter()
                .copied()
                .find(|f| f.as_str() == s)
                .ok_or_else(|| SkillkitError::UnknownFormat(s.to_string())),
        }
    }
}

/// Design half of the `ui-expert` skill input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokensRequest {
    pub brand_color: String,
    pub tokens: DesignTokens,
    pub formats: Vec<TokenFormat>,
}

impl Default for TokensRequest {
    fn default() -> Self {
        Self {
            brand_color: "#1890ff".into(),
            tokens: DesignTokens::default(),
            formats: vec![TokenFormat::Css, TokenFormat::Markdown],
        }
    }
}

/// Token exports plus the shade palette documentation.
pub fn design_bundle(req: &TokensRequest) -> Result<Vec<Artifact>> {
    let system = DesignSystemSpec::standard(&req.brand_color)?;
    let mut files = vec![
        Artifact::new("DESIGN_SYSTEM.md", system.markdown()),
        Artifact::new("design-system.css", system.css_variables()),
    ];
    for format in &req.formats {
        files.push(req.tokens.export(*format)?);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::parse_hex("#1890ff").unwrap(), Rgb(0x18, 0x90, 0xff));
        assert_eq!(Rgb::parse_hex("#fff").unwrap(), Rgb::WHITE);
        assert!(matches!(Rgb::parse_hex("1890ff"), Err(SkillkitError::InvalidColor(_))));
        assert!(Rgb::parse_hex("#12345").is_err());
        assert!(Rgb::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn scale_mixes_towards_white_and_black() {
        let scale = color_scale("#1890FF").unwrap();
        assert_eq!(scale.len(), 10);
        assert_eq!(scale[&500], "#1890ff");
        assert_eq!(scale[&50], "#e8f4ff");
        assert_eq!(scale[&900], "#0a3a66");
        assert!(color_scale("blue").is_err());
    }

    #[test]
    fn standard_system_is_valid() {
        let system = DesignSystemSpec::standard("#1890ff").unwrap();
        let v = system.validate();
        assert!(v.is_valid);
        assert!(v.warnings.is_empty());
        assert_eq!(system.spacing[6], NamedValue::new("6", "24px"));
    }

    #[test]
    fn validation_reports_missing_pieces() {
        let mut system = DesignSystemSpec::standard("#1890ff").unwrap();
        system.colors.remove(&ColorRole::Warning);
        system.components.clear();
        system.spacing.clear();
        let v = system.validate();
        assert!(!v.is_valid);
        assert!(v.errors.contains(&"缺少颜色类型：warning".to_string()));
        assert!(v.errors.contains(&"间距系统为空".to_string()));
        assert_eq!(v.warnings, vec!["设计规范中没有组件"]);
    }

    #[test]
    fn system_css_and_markdown() {
        let system = DesignSystemSpec::standard("#1890ff").unwrap();
        let css = system.css_variables();
        assert!(css.contains("  --color-primary-500: #1890ff;"));
        assert!(css.contains("  --font-weight-xl: 500;"));
        assert!(css.contains("  --spacing-24: 96px;"));

        let md = system.markdown();
        assert!(md.contains("| neutral | 50: #fafafa, 100: #f5f5f5,"));
        assert!(md.contains("| 2xl | 1.5rem | 600 | 1.5 |"));
        assert!(md.contains("### full\n`9999px`"));
        assert!(md.contains("- `size`: 'sm' | 'md' | 'lg' - 按钮大小"));
    }

    #[test]
    fn case_helpers() {
        assert_eq!(camel_case("font-sans"), "fontSans");
        assert_eq!(camel_case("gray-50"), "gray-50");
        assert_eq!(js_key("gray-50"), "'gray-50'");
        assert_eq!(js_key("fontSans"), "fontSans");
    }

    #[test]
    fn css_export_uses_category_prefixes() {
        let css = DesignTokens::default().to_css();
        assert!(css.contains("  --color-gray-50: #F9FAFB;"));
        assert!(css.contains("  --font-family-font-mono: \"Fira Code\", monospace;"));
        assert!(css.contains("  --line-height-tight: 1.25;"));
        assert!(css.contains("  --breakpoint-2xl: 1536px;"));
    }

    #[test]
    fn scss_and_js_exports() {
        let tokens = DesignTokens::default();
        let scss = tokens.to_scss();
        assert!(scss.contains("$fontSans: "));
        assert!(scss.contains("$primary: #3B82F6;"));

        let js = tokens.to_js();
        assert!(js.starts_with("export const designTokens = {\n  colors: {\n"));
        assert!(js.contains("    'gray-50': '#F9FAFB',"));
        assert!(js.contains("    fontMono: '\"Fira Code\", monospace',"));
        assert!(js.trim_end().ends_with("};"));

        let ts = tokens.to_ts();
        assert!(ts.contains("export const designTokens: DesignTokens = {"));
        assert!(ts.contains("export type SpacingToken = keyof typeof designTokens.spacing;"));
    }

    #[test]
    fn tailwind_quotes_font_stacks() {
        let cfg = DesignTokens::default().to_tailwind();
        assert!(cfg.contains("        'font-mono': ['Fira Code', 'monospace'],"));
        assert!(cfg.contains("      screens: {\n        sm: '640px',"));
        assert!(cfg.contains("        '2xl': '1536px',"));
    }

    #[test]
    fn json_export_round_trips() {
        let tokens = DesignTokens::default();
        let back: DesignTokens = serde_json::from_str(&tokens.to_json().unwrap()).unwrap();
        assert_eq!(back, tokens);
    }

    #[test]
    fn style_guide_tables() {
        let md = DesignTokens::default().style_guide();
        assert!(md.contains("| primary | ![#3B82F6](https://via.placeholder.com/20/3B82F6) | `--color-primary` |"));
        assert!(md.contains("| error | ![#EF4444](https://via.placeholder.com/20/EF4444) | error |"));
        assert!(md.contains("### 字体族\n\n| 名称 | 值 |\n|------|-----|\n| font-sans |"));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("sass".parse::<TokenFormat>().unwrap(), TokenFormat::Scss);
        assert_eq!("tailwind".parse::<TokenFormat>().unwrap(), TokenFormat::Tailwind);
        assert!(matches!("xml".parse::<TokenFormat>(), Err(SkillkitError::UnknownFormat(_))));
    }

    #[test]
    fn bundle_lists_requested_formats() {
        let req = TokensRequest {
            formats: vec![TokenFormat::Tailwind, TokenFormat::Json],
            ..Default::default()
        };
        let names: Vec<String> = design_bundle(&req).unwrap().into_iter().map(|a| a.path).collect();
        assert_eq!(names, ["DESIGN_SYSTEM.md", "design-system.css", "tailwind.config.js", "tokens.json"]);

        let bad = TokensRequest {
            brand_color: "nope".into(),
            ..Default::default()
        };
        assert!(design_bundle(&bad).is_err());
    }
}
