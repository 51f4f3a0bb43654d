//! SQL DDL, migrations, ER diagrams, data dictionaries and ORM models from a
//! list of [`Model`]s.

use crate::io::Artifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Model types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Text,
    Json,
}

impl FieldType {
    /// The TypeScript type a column of this kind maps to.
    pub fn ts_type(self) -> &'static str {
        match self {
            FieldType::String | FieldType::Text => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "Date",
            FieldType::Json => "any",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Text => "text",
            FieldType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnDelete {
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[default]
    #[serde(rename = "RESTRICT")]
    Restrict,
}

impl OnDelete {
    pub fn as_str(self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
            OnDelete::Restrict => "RESTRICT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub field: String,
    #[serde(default, rename = "onDelete")]
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            unique: false,
            primary_key: false,
            indexed: false,
            default_value: None,
            foreign_key: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn references(mut self, table: &str, field: &str, on_delete: OnDelete) -> Self {
        self.foreign_key = Some(ForeignKey {
            table: table.to_string(),
            field: field.to_string(),
            on_delete,
        });
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub fields: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::OneToOne => "one-to-one",
            RelationType::OneToMany => "one-to-many",
            RelationType::ManyToMany => "many-to-many",
        }
    }

    fn mermaid_symbol(self) -> &'static str {
        match self {
            RelationType::OneToOne => "||--||",
            RelationType::OneToMany => "||--o{",
            RelationType::ManyToMany => "}o--o{",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    pub table_name: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Model {
    /// The column named `id`, else the first column.
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == "id")
            .or_else(|| self.fields.first())
    }

    /// A `users` table with the usual account columns.
    pub fn example_user() -> Self {
        Self {
            name: "User".into(),
            table_name: "users".into(),
            fields: vec![
                Field::new("id", FieldType::Number).required().primary_key(),
                Field::new("username", FieldType::String).required().unique(),
                Field::new("email", FieldType::String).required().unique(),
                Field::new("password", FieldType::String).required(),
                Field::new("createdAt", FieldType::Date)
                    .required()
                    .default_value(Value::String("NOW()".into())),
                Field::new("updatedAt", FieldType::Date)
                    .required()
                    .default_value(Value::String("NOW()".into())),
            ],
            indexes: Vec::new(),
            relations: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Database / Orm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    #[default]
    Postgresql,
    Mysql,
    Sqlite,
    Mongodb,
}

impl Database {
    pub fn column_type(self, field_type: FieldType) -> &'static str {
        use FieldType::*;
        match (self, field_type) {
            (Database::Postgresql, String) | (Database::Mysql, String) => "VARCHAR(255)",
            (Database::Postgresql, Number) => "INTEGER",
            (Database::Postgresql, Boolean) => "BOOLEAN",
            (Database::Postgresql, Date) => "TIMESTAMP",
            (Database::Postgresql, Json) => "JSONB",
            (Database::Mysql, Number) => "INT",
            (Database::Mysql, Boolean) => "TINYINT(1)",
            (Database::Mysql, Date) => "DATETIME",
            (Database::Mysql, Json) => "JSON",
            (Database::Sqlite, Number) | (Database::Sqlite, Boolean) => "INTEGER",
            (Database::Sqlite, Date) => "DATETIME",
            (Database::Sqlite, String) | (Database::Sqlite, Json) => "TEXT",
            (Database::Mongodb, String) | (Database::Mongodb, Text) => "String",
            (Database::Mongodb, Number) => "Number",
            (Database::Mongodb, Boolean) => "Boolean",
            (Database::Mongodb, Date) => "Date",
            (Database::Mongodb, Json) => "Object",
            (_, Text) => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orm {
    Prisma,
    Sequelize,
    Typeorm,
}

// ---------------------------------------------------------------------------
// SchemaGenerator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaGenerator {
    pub database: Database,
}

impl SchemaGenerator {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Tables, then indexes, then foreign key constraints.
    pub fn generate_schema(&self, models: &[Model]) -> String {
        let mut sql = String::new();
        for model in models {
            sql.push_str(&self.table_sql(model));
            sql.push_str("\n\n");
        }
        for model in models.iter().filter(|m| !m.indexes.is_empty()) {
            sql.push_str(&indexes_sql(model));
            sql.push('\n');
        }
        for model in models {
            sql.push_str(&foreign_keys_sql(model));
            sql.push('\n');
        }
        sql
    }

    fn table_sql(&self, model: &Model) -> String {
        let columns: Vec<String> = model.fields.iter().map(|f| self.column_sql(f)).collect();
        let mut sql = format!("CREATE TABLE {} (\n{}", model.table_name, columns.join(",\n"));
        if let Some(pk) = model.primary_key() {
            sql.push_str(&format!(",\n  PRIMARY KEY ({})", pk.name));
        }
        sql.push_str("\n);");
        sql
    }

    fn column_sql(&self, field: &Field) -> String {
        let mut constraints = Vec::new();
        if field.required {
            constraints.push("NOT NULL".to_string());
        }
        if field.unique {
            constraints.push("UNIQUE".to_string());
        }
        if let Some(value) = &field.default_value {
            constraints.push(format!("DEFAULT {}", sql_literal(value)));
        }

        let mut sql = format!(
            "  {} {}",
            field.name,
            self.database.column_type(field.field_type)
        );
        if !constraints.is_empty() {
            sql.push(' ');
            sql.push_str(&constraints.join(" "));
        }
        if let Some(desc) = &field.description {
            sql.push_str(&format!(" -- {desc}"));
        }
        sql
    }

    /// The schema wrapped in a single transaction.
    pub fn generate_migration(&self, models: &[Model], now: DateTime<Utc>) -> String {
        format!(
            "-- Migration: {}\n-- Description: Database schema migration\n\nBEGIN;\n\n{}\n\nCOMMIT;",
            now.timestamp_millis(),
            self.generate_schema(models)
        )
    }

    pub fn generate_er_diagram(&self, models: &[Model]) -> String {
        let mut out = String::from("erDiagram\n");
        for model in models {
            out.push_str(&format!("  {} {{\n", model.table_name));
            for field in &model.fields {
                out.push_str(&format!(
                    "    {} {} {}\n",
                    er_key_symbol(field),
                    field.name,
                    field.field_type.as_str()
                ));
            }
            out.push_str("  }\n");
        }
        for model in models {
            for rel in &model.relations {
                let target = models
                    .iter()
                    .find(|m| m.name == rel.model)
                    .map(|m| m.table_name.clone())
                    .unwrap_or_else(|| rel.model.to_lowercase());
                out.push_str(&format!(
                    "  {} {} {} : \"{}\"\n",
                    model.table_name,
                    rel.relation_type.mermaid_symbol(),
                    target,
                    rel.relation_type.as_str()
                ));
            }
        }
        out
    }

    pub fn generate_data_dictionary(&self, models: &[Model]) -> String {
        let mut out = String::from("# 数据字典\n\n");
        for model in models {
            out.push_str(&format!("## {} ({})\n\n", model.name, model.table_name));
            out.push_str("| 字段名 | 类型 | 必填 | 唯一 | 默认值 | 描述 |\n");
            out.push_str("|--------|------|------|------|--------|------|\n");
            for field in &model.fields {
                let default = field
                    .default_value
                    .as_ref()
                    .map(plain_value)
                    .unwrap_or_else(|| "-".to_string());
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    field.name,
                    field.field_type.as_str(),
                    check(field.required),
                    check(field.unique),
                    default,
                    field.description.as_deref().unwrap_or("-"),
                ));
            }
            out.push('\n');
        }
        out
    }

    pub fn generate_orm_model(&self, model: &Model, orm: Orm) -> String {
        match orm {
            Orm::Prisma => prisma_model(model),
            Orm::Sequelize => sequelize_model(model),
            Orm::Typeorm => typeorm_model(model),
        }
    }
}

fn indexes_sql(model: &Model) -> String {
    let mut sql = String::new();
    for index in &model.indexes {
        let unique = if index.unique { "UNIQUE " } else { "" };
        sql.push_str(&format!(
            "CREATE {unique}INDEX {} ON {} ({});\n",
            index.name,
            model.table_name,
            index.fields.join(", ")
        ));
    }
    sql
}

fn foreign_keys_sql(model: &Model) -> String {
    let mut sql = String::new();
    for field in &model.fields {
        let Some(fk) = &field.foreign_key else {
            continue;
        };
        sql.push_str(&format!(
            "ALTER TABLE {table}\n  ADD CONSTRAINT fk_{table}_{field}\n  FOREIGN KEY ({field})\n  REFERENCES {}({})\n  ON DELETE {};\n",
            fk.table,
            fk.field,
            fk.on_delete.as_str(),
            table = model.table_name,
            field = field.name,
        ));
    }
    sql
}

fn er_key_symbol(field: &Field) -> &'static str {
    if field.primary_key {
        "PK"
    } else if field.foreign_key.is_some() {
        "FK"
    } else if field.unique {
        "UK"
    } else if field.required {
        ""
    } else {
        "?"
    }
}

fn check(flag: bool) -> &'static str {
    if flag {
        "✅"
    } else {
        "❌"
    }
}

/// Strings are single-quoted; everything else is emitted as-is.
fn sql_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// ORM renderers
// ---------------------------------------------------------------------------

fn prisma_model(model: &Model) -> String {
    let mut out = format!("model {} {{\n", model.name);
    for field in &model.fields {
        let ty = match field.field_type {
            FieldType::String | FieldType::Text => "String",
            FieldType::Number => "Int",
            FieldType::Boolean => "Boolean",
            FieldType::Date => "DateTime",
            FieldType::Json => "Json",
        };
        let mut modifiers = vec![if field.required { "" } else { "?" }.to_string()];
        if field.unique {
            modifiers.push("@unique".into());
        }
        match &field.default_value {
            Some(Value::String(s)) if s == "NOW()" => modifiers.push("@default(now())".into()),
            Some(Value::String(s)) => modifiers.push(format!("@default(\"{s}\")")),
            Some(other) => modifiers.push(format!("@default({other})")),
            None => {}
        }
        out.push_str(&format!("  {} {ty}{}\n", field.name, modifiers.join(" ")));
    }
    out.push_str("}\n");
    out
}

fn sequelize_model(model: &Model) -> String {
    let mut out = String::from("const { DataTypes } = require('sequelize');\n\n");
    out.push_str("module.exports = (sequelize) => {\n");
    out.push_str(&format!(
        "  const {0} = sequelize.define('{0}', {{\n",
        model.name
    ));
    for field in &model.fields {
        let ty = match field.field_type {
            FieldType::String => "DataTypes.STRING(255)",
            FieldType::Number => "DataTypes.INTEGER",
            FieldType::Boolean => "DataTypes.BOOLEAN",
            FieldType::Date => "DataTypes.DATE",
            FieldType::Text => "DataTypes.TEXT",
            FieldType::Json => "DataTypes.JSON",
        };
        out.push_str(&format!("    {}: {{\n      type: {ty},\n", field.name));
        if field.required {
            out.push_str("      allowNull: false,\n");
        }
        if field.unique {
            out.push_str("      unique: true,\n");
        }
        if let Some(value) = &field.default_value {
            out.push_str(&format!("      defaultValue: {},\n", sql_literal(value)));
        }
        out.push_str("    },\n");
    }
    let timestamps = model
        .fields
        .iter()
        .any(|f| f.name == "createdAt" || f.name == "updatedAt");
    out.push_str("  }, {\n");
    out.push_str(&format!("    tableName: '{}',\n", model.table_name));
    out.push_str(&format!("    timestamps: {timestamps},\n"));
    out.push_str("  });\n\n");
    out.push_str(&format!("  return {};\n", model.name));
    out.push_str("};\n");
    out
}

fn typeorm_model(model: &Model) -> String {
    let mut out = String::from("import { Entity, PrimaryGeneratedColumn, Column } from 'typeorm';\n\n");
    out.push_str(&format!("@Entity('{}')\n", model.table_name));
    out.push_str(&format!("export class {} {{\n", model.name));
    for field in &model.fields {
        let decorator = if field.primary_key {
            "@PrimaryGeneratedColumn()".to_string()
        } else {
            let mut options = Vec::new();
            if !field.required {
                options.push("nullable: true".to_string());
            }
            if field.unique {
                options.push("unique: true".to_string());
            }
            if let Some(value) = &field.default_value {
                options.push(format!("default: {}", sql_literal(value)));
            }
            format!("@Column({{\n  {}\n  }})", options.join(", "))
        };
        out.push_str(&format!(
            "  {decorator}\n  {}: {};\n\n",
            field.name,
            field.field_type.ts_type()
        ));
    }
    out.push_str("}\n");
    out
}

// ---------------------------------------------------------------------------
// Skill input
// ---------------------------------------------------------------------------

/// Input accepted by the `data-engineer` skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRequest {
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub orm: Option<Orm>,
}

impl SchemaRequest {
    /// The requested models, or the example user table when none are given.
    pub fn models_or_example(&self) -> Vec<Model> {
        if self.models.is_empty() {
            vec![Model::example_user()]
        } else {
            self.models.clone()
        }
    }
}

impl Orm {
    /// Where a generated model for `name` lives in a project.
    pub fn model_path(self, name: &str) -> String {
        match self {
            Orm::Prisma => "prisma/schema.prisma".to_string(),
            Orm::Sequelize => format!("models/{name}.js"),
            Orm::Typeorm => format!("entities/{name}.ts"),
        }
    }
}

/// DDL, migration, ER diagram, data dictionary and (optionally) ORM models.
/// Prisma models share one schema file.
pub fn schema_bundle(req: &SchemaRequest, now: DateTime<Utc>) -> Vec<Artifact> {
    let gen = SchemaGenerator::new(req.database);
    let models = req.models_or_example();
    let mut files = vec![
        Artifact::new("schema.sql", gen.generate_schema(&models)),
        Artifact::new(
            format!("migrations/{}_init.sql", now.format("%Y%m%d%H%M%S")),
            gen.generate_migration(&models, now),
        ),
        Artifact::new("ER_DIAGRAM.md", gen.generate_er_diagram(&models)),
        Artifact::new("DATA_DICTIONARY.md", gen.generate_data_dictionary(&models)),
    ];
    match req.orm {
        Some(Orm::Prisma) => {
            let schema: Vec<String> = models
                .iter()
                .map(|m| gen.generate_orm_model(m, Orm::Prisma))
                .collect();
            files.push(Artifact::new(Orm::Prisma.model_path(""), schema.join("\n\n")));
        }
        Some(orm) => {
            for m in &models {
                files.push(Artifact::new(orm.model_path(&m.name), gen.generate_orm_model(m, orm)));
            }
        }
        None => {}
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders() -> Model {
        Model {
            name: "Order".into(),
            table_name: "orders".into(),
            fields: vec![
                Field::new("order_id", FieldType::Number).required(),
                Field::new("user_id", FieldType::Number)
                    .required()
                    .references("users", "id", OnDelete::Cascade),
                Field::new("status", FieldType::String)
                    .default_value(json!("pending"))
                    .describe("order state"),
                Field::new("total", FieldType::Number).default_value(json!(0)),
            ],
            indexes: vec![Index {
                name: "idx_orders_user".into(),
                fields: vec!["user_id".into(), "status".into()],
                unique: false,
            }],
            relations: vec![Relation {
                relation_type: RelationType::OneToMany,
                model: "User".into(),
            }],
        }
    }

    #[test]
    fn postgres_table_uses_id_as_primary_key() {
        let sql = SchemaGenerator::new(Database::Postgresql).generate_schema(&[Model::example_user()]);
        assert!(sql.starts_with("CREATE TABLE users (\n  id INTEGER NOT NULL,"));
        assert!(sql.contains("  username VARCHAR(255) NOT NULL UNIQUE"));
        assert!(sql.contains("  createdAt TIMESTAMP NOT NULL DEFAULT 'NOW()'"));
        assert!(sql.contains(",\n  PRIMARY KEY (id)\n);"));
    }

    #[test]
    fn first_field_is_primary_key_without_id() {
        let sql = SchemaGenerator::new(Database::Mysql).generate_schema(&[orders()]);
        assert!(sql.contains("PRIMARY KEY (order_id)"));
        assert!(sql.contains("  status VARCHAR(255) DEFAULT 'pending' -- order state"));
        assert!(sql.contains("  total INT DEFAULT 0"));
    }

    #[test]
    fn indexes_and_foreign_keys_follow_tables() {
        let sql = SchemaGenerator::new(Database::Postgresql).generate_schema(&[orders()]);
        let table = sql.find("CREATE TABLE").unwrap();
        let index = sql
            .find("CREATE INDEX idx_orders_user ON orders (user_id, status);")
            .unwrap();
        let fk = sql.find("ALTER TABLE orders\n  ADD CONSTRAINT fk_orders_user_id").unwrap();
        assert!(table < index && index < fk);
        assert!(sql.contains("  REFERENCES users(id)\n  ON DELETE CASCADE;"));
    }

    #[test]
    fn foreign_key_defaults_to_restrict() {
        let fk: ForeignKey = serde_json::from_value(json!({"table": "t", "field": "id"})).unwrap();
        assert_eq!(fk.on_delete, OnDelete::Restrict);
    }

    #[test]
    fn type_map_per_database() {
        assert_eq!(Database::Sqlite.column_type(FieldType::Boolean), "INTEGER");
        assert_eq!(Database::Mysql.column_type(FieldType::Boolean), "TINYINT(1)");
        assert_eq!(Database::Mongodb.column_type(FieldType::Json), "Object");
        assert_eq!(Database::Postgresql.column_type(FieldType::Text), "TEXT");
    }

    #[test]
    fn migration_wraps_schema_in_transaction() {
        let now = Utc::now();
        let sql = SchemaGenerator::default().generate_migration(&[Model::example_user()], now);
        assert!(sql.starts_with(&format!("-- Migration: {}", now.timestamp_millis())));
        assert!(sql.contains("BEGIN;\n\nCREATE TABLE users"));
        assert!(sql.ends_with("COMMIT;"));
    }

    #[test]
    fn er_diagram_marks_keys_and_relations() {
        let users = Model::example_user();
        let diagram = SchemaGenerator::default().generate_er_diagram(&[users, orders()]);
        assert!(diagram.starts_with("erDiagram\n  users {\n    PK id number\n"));
        assert!(diagram.contains("    UK email string\n"));
        assert!(diagram.contains("    FK user_id number\n"));
        assert!(diagram.contains("    ? status string\n"));
        assert!(diagram.contains("  orders ||--o{ users : \"one-to-many\""));
    }

    #[test]
    fn data_dictionary_lists_every_field() {
        let dict = SchemaGenerator::default().generate_data_dictionary(&[orders()]);
        assert!(dict.contains("## Order (orders)"));
        assert!(dict.contains("| status | string | ❌ | ❌ | pending | order state |"));
        assert!(dict.contains("| order_id | number | ✅ | ❌ | - | - |"));
    }

    #[test]
    fn prisma_model_modifiers() {
        let out = SchemaGenerator::default().generate_orm_model(&Model::example_user(), Orm::Prisma);
        assert!(out.starts_with("model User {\n"));
        assert!(out.contains("  username String @unique\n"));
        assert!(out.contains("  createdAt DateTime @default(now())\n"));
        let orders = SchemaGenerator::default().generate_orm_model(&orders(), Orm::Prisma);
        assert!(orders.contains("  status String? @default(\"pending\")\n"));
    }

    #[test]
    fn sequelize_model_detects_timestamps() {
        let out =
            SchemaGenerator::default().generate_orm_model(&Model::example_user(), Orm::Sequelize);
        assert!(out.contains("  const User = sequelize.define('User', {"));
        assert!(out.contains("      allowNull: false,\n      unique: true,\n"));
        assert!(out.contains("    timestamps: true,"));
        let orders = SchemaGenerator::default().generate_orm_model(&orders(), Orm::Sequelize);
        assert!(orders.contains("    timestamps: false,"));
    }

    #[test]
    fn typeorm_model_decorators() {
        let out = SchemaGenerator::default().generate_orm_model(&orders(), Orm::Typeorm);
        assert!(out.contains("@Entity('orders')"));
        assert!(out.contains("nullable: true, default: 'pending'"));
        assert!(out.contains("  total: number;"));
        let users = SchemaGenerator::default().generate_orm_model(&Model::example_user(), Orm::Typeorm);
        assert!(users.contains("  @PrimaryGeneratedColumn()\n  id: number;"));
    }

    #[test]
    fn request_parses_camel_case_models() {
        let req: SchemaRequest = serde_json::from_value(json!({
            "database": "sqlite",
            "models": [{
                "name": "Tag",
                "tableName": "tags",
                "fields": [{"name": "label", "type": "string", "required": true, "primaryKey": true}]
            }]
        }))
        .unwrap();
        assert_eq!(req.database, Database::Sqlite);
        assert!(req.models[0].fields[0].primary_key);
        assert_eq!(SchemaRequest::default().models_or_example()[0].table_name, "users");
    }

    #[test]
    fn bundle_with_and_without_orm() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let plain = schema_bundle(&SchemaRequest::default(), now);
        let names: Vec<&str> = plain.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            names,
            [
                "schema.sql",
                "migrations/20240501083000_init.sql",
                "ER_DIAGRAM.md",
                "DATA_DICTIONARY.md"
            ]
        );

        let typeorm = schema_bundle(
            &SchemaRequest {
                models: vec![Model::example_user(), orders()],
                orm: Some(Orm::Typeorm),
                ..Default::default()
            },
            now,
        );
        assert_eq!(typeorm.len(), 6);
        assert_eq!(typeorm[5].path, "entities/Order.ts");

        let prisma = schema_bundle(
            &SchemaRequest {
                models: vec![Model::example_user(), orders()],
                orm: Some(Orm::Prisma),
                ..Default::default()
            },
            now,
        );
        assert_eq!(prisma.len(), 5);
        assert_eq!(prisma[4].path, "prisma/schema.prisma");
    }
}
