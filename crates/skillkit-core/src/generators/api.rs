//! Express + `pg` REST layers for a list of [`Model`]s: a model interface,
//! repository, service, controller and router per model, plus one router
//! that mounts them all.

use super::schema::Model;
use crate::io::Artifact;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Identifier-safe spelling of a model name: ASCII letters, digits and `_`
/// only, never starting with a digit.
pub fn type_name(name: &str) -> String {
    let ident: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    match ident.chars().next() {
        None => "Model".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Model{ident}"),
        Some(_) => ident,
    }
}

/// Table name usable inside generated SQL; falls back to the lowercased type.
fn table_name(model: &Model, ty: &str) -> String {
    let table: String = model
        .table_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if table.is_empty() {
        ty.to_lowercase()
    } else {
        table
    }
}

fn fill(template: &str, model: &Model) -> String {
    let ty = type_name(&model.name);
    let table = table_name(model, &ty);
    template
        .replace("{Model}", &ty)
        .replace("{model}", &ty.to_lowercase())
        .replace("{table}", &table)
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

pub fn model_interface(model: &Model) -> String {
    let mut out = format!("export interface {} {{\n", type_name(&model.name));
    for field in &model.fields {
        let optional = if field.required { "" } else { "?" };
        if let Some(desc) = &field.description {
            out.push_str(&format!("  /** {desc} */\n"));
        }
        out.push_str(&format!(
            "  {}{optional}: {};\n",
            field.name,
            field.field_type.ts_type()
        ));
    }
    out.push_str("}\n");
    out
}

const CONTROLLER: &str = r#"import { Request, Response, NextFunction } from 'express';
import { {Model}Service } from '../services/{Model}Service';

export class {Model}Controller {
  constructor(private readonly {model}Service: {Model}Service) {}

  /**
   * @route GET /{table}
   */
  getAll = async (req: Request, res: Response, next: NextFunction): Promise<void> => {
    try {
      const { page = 1, pageSize = 10, ...filters } = req.query;
      const result = await this.{model}Service.findAll({
        page: Number(page),
        pageSize: Number(pageSize),
        filters: filters as Record<string, unknown>
      });
      res.json({ success: true, data: result.data, pagination: result.pagination });
    } catch (error) {
      next(error);
    }
  };

  /**
   * @route GET /{table}/:id
   */
  getById = async (req: Request, res: Response, next: NextFunction): Promise<void> => {
    try {
      const result = await this.{model}Service.findById(req.params.id);
      if (!result) {
        res.status(404).json({ success: false, error: '{Model} not found' });
        return;
      }
      res.json({ success: true, data: result });
    } catch (error) {
      next(error);
    }
  };

  /**
   * @route POST /{table}
   */
  create = async (req: Request, res: Response, next: NextFunction): Promise<void> => {
    try {
      const result = await this.{model}Service.create(req.body);
      res.status(201).json({ success: true, data: result });
    } catch (error) {
      next(error);
    }
  };

  /**
   * @route PUT /{table}/:id
   */
  update = async (req: Request, res: Response, next: NextFunction): Promise<void> => {
    try {
      const result = await this.{model}Service.update(req.params.id, req.body);
      if (!result) {
        res.status(404).json({ success: false, error: '{Model} not found' });
        return;
      }
      res.json({ success: true, data: result });
    } catch (error) {
      next(error);
    }
  };

  /**
   * @route DELETE /{table}/:id
   */
  delete = async (req: Request, res: Response, next: NextFunction): Promise<void> => {
    try {
      const deleted = await this.{model}Service.delete(req.params.id);
      if (!deleted) {
        res.status(404).json({ success: false, error: '{Model} not found' });
        return;
      }
      res.status(204).send();
    } catch (error) {
      next(error);
    }
  };
}
"#;

const SERVICE: &str = r#"import { {Model}Repository } from '../repositories/{Model}Repository';
import { {Model} } from '../models/{Model}';

export interface FindAllOptions {
  page?: number;
  pageSize?: number;
  filters?: Record<string, unknown>;
}

export interface PaginationResult<T> {
  data: T[];
  pagination: {
    page: number;
    pageSize: number;
    total: number;
    totalPages: number;
  };
}

export class {Model}Service {
  constructor(private readonly {model}Repository: {Model}Repository) {}

  async findAll(options: FindAllOptions = {}): Promise<PaginationResult<{Model}>> {
    const { page = 1, pageSize = 10, filters = {} } = options;
    const result = await this.{model}Repository.findAll({ page, pageSize, filters });
    return {
      data: result.data,
      pagination: {
        page,
        pageSize,
        total: result.total,
        totalPages: Math.ceil(result.total / pageSize)
      }
    };
  }

  async findById(id: string): Promise<{Model} | null> {
    return this.{model}Repository.findById(id);
  }

  async create(data: Partial<{Model}>): Promise<{Model}> {
    return this.{model}Repository.create(data);
  }

  async update(id: string, data: Partial<{Model}>): Promise<{Model} | null> {
    return this.{model}Repository.update(id, data);
  }

  async delete(id: string): Promise<boolean> {
    return this.{model}Repository.delete(id);
  }

  async exists(id: string): Promise<boolean> {
    const count = await this.{model}Repository.count({ id });
    return count > 0;
  }
}
"#;

const REPOSITORY: &str = r#"import { Pool } from 'pg';
import { {Model} } from '../models/{Model}';

const COLUMNS = new Set<string>([{columns}]);

function known(data: Record<string, unknown>): [string[], unknown[]] {
  const keys = Object.keys(data).filter((key) => COLUMNS.has(key));
  return [keys, keys.map((key) => data[key])];
}

export class {Model}Repository {
  constructor(private readonly pool: Pool) {}

  async findAll(options: {
    page?: number;
    pageSize?: number;
    filters?: Record<string, unknown>;
  } = {}): Promise<{ data: {Model}[]; total: number }> {
    const { page = 1, pageSize = 10, filters = {} } = options;
    const offset = (page - 1) * pageSize;

    const [keys, filterValues] = known(filters);
    const whereConditions = keys.map((key, i) => `${key} = $${i + 1}`).join(' AND ');
    const whereClause = whereConditions ? `WHERE ${whereConditions}` : '';

    const countResult = await this.pool.query(`SELECT COUNT(*) FROM {table} ${whereClause}`, filterValues);
    const total = parseInt(countResult.rows[0].count, 10);

    const limit = filterValues.length + 1;
    const dataResult = await this.pool.query(
      `SELECT * FROM {table} ${whereClause} ORDER BY {order} DESC LIMIT $${limit} OFFSET $${limit + 1}`,
      [...filterValues, pageSize, offset]
    );
    return { data: dataResult.rows, total };
  }

  async findById(id: string): Promise<{Model} | null> {
    const result = await this.pool.query('SELECT * FROM {table} WHERE id = $1', [id]);
    return result.rows[0] || null;
  }

  async create(data: Partial<{Model}>): Promise<{Model}> {
    const [columns, values] = known(data as Record<string, unknown>);
    const placeholders = values.map((_, i) => `$${i + 1}`);
    const result = await this.pool.query(
      `INSERT INTO {table} (${columns.join(', ')}) VALUES (${placeholders.join(', ')}) RETURNING *`,
      values
    );
    return result.rows[0];
  }

  async update(id: string, data: Partial<{Model}>): Promise<{Model} | null> {
    const [columns, values] = known(data as Record<string, unknown>);
    if (columns.length === 0) {
      return this.findById(id);
    }
    const setClause = columns.map((key, i) => `${key} = $${i + 1}`).join(', ');
    const result = await this.pool.query(
      `UPDATE {table} SET ${setClause} WHERE id = $${values.length + 1} RETURNING *`,
      [...values, id]
    );
    return result.rows[0] || null;
  }

  async delete(id: string): Promise<boolean> {
    const result = await this.pool.query('DELETE FROM {table} WHERE id = $1', [id]);
    return (result.rowCount ?? 0) > 0;
  }

  async count(filters: Record<string, unknown> = {}): Promise<number> {
    const [keys, filterValues] = known(filters);
    const whereConditions = keys.map((key, i) => `${key} = $${i + 1}`).join(' AND ');
    const whereClause = whereConditions ? `WHERE ${whereConditions}` : '';
    const result = await this.pool.query(`SELECT COUNT(*) FROM {table} ${whereClause}`, filterValues);
    return parseInt(result.rows[0].count, 10);
  }
}
"#;

const ROUTES: &str = r#"import { Router } from 'express';
import { {Model}Controller } from '../controllers/{Model}Controller';

export function create{Model}Routes(controller: {Model}Controller): Router {
  const router = Router();

  router.get('/', controller.getAll);
  router.get('/:id', controller.getById);
  router.post('/', controller.create);
  router.put('/:id', controller.update);
  router.delete('/:id', controller.delete);

  return router;
}
"#;

pub fn controller(model: &Model) -> String {
    fill(CONTROLLER, model)
}

pub fn service(model: &Model) -> String {
    fill(SERVICE, model)
}

/// Filters and writes only touch the model's own columns; anything else in
/// a request is dropped before it reaches SQL.
pub fn repository(model: &Model) -> String {
    let columns: Vec<String> = model
        .fields
        .iter()
        .map(|f| format!("'{}'", f.name.replace('\'', "\\'")))
        .collect();
    let order = if model.fields.iter().any(|f| f.name == "createdAt") {
        "\"createdAt\""
    } else if model.fields.iter().any(|f| f.name == "created_at") {
        "created_at"
    } else {
        "id"
    };
    fill(REPOSITORY, model)
        .replace("{columns}", &columns.join(", "))
        .replace("{order}", order)
}

pub fn routes(model: &Model) -> String {
    fill(ROUTES, model)
}

/// One router mounting every model at `/<table>`.
pub fn api_router(models: &[Model]) -> String {
    let mut out = String::from("import { Router } from 'express';\nimport { Pool } from 'pg';\n");
    for m in models {
        out.push_str(&fill(
            "import { {Model}Repository } from './repositories/{Model}Repository';\n\
             import { {Model}Service } from './services/{Model}Service';\n\
             import { {Model}Controller } from './controllers/{Model}Controller';\n\
             import { create{Model}Routes } from './routes/{Model}Routes';\n",
            m,
        ));
    }
    out.push_str("\nexport function createApiRouter(pool: Pool): Router {\n  const router = Router();\n");
    for m in models {
        out.push_str(&fill(
            "  router.use('/{table}', create{Model}Routes(new {Model}Controller(new {Model}Service(new {Model}Repository(pool)))));\n",
            m,
        ));
    }
    out.push_str("  return router;\n}\n");
    out
}

// ---------------------------------------------------------------------------
// Skill input
// ---------------------------------------------------------------------------

/// Input accepted by the `backend-engineer` skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiRequest {
    pub models: Vec<Model>,
}

impl ApiRequest {
    pub fn models_or_example(&self) -> Vec<Model> {
        if self.models.is_empty() {
            vec![Model::example_user()]
        } else {
            self.models.clone()
        }
    }
}

pub fn api_bundle(req: &ApiRequest) -> Vec<Artifact> {
    let models = req.models_or_example();
    let mut files = Vec::with_capacity(models.len() * 5 + 1);
    for m in &models {
        let ty = type_name(&m.name);
        files.push(Artifact::new(format!("src/models/{ty}.ts"), model_interface(m)));
        files.push(Artifact::new(format!("src/repositories/{ty}Repository.ts"), repository(m)));
        files.push(Artifact::new(format!("src/services/{ty}Service.ts"), service(m)));
        files.push(Artifact::new(format!("src/controllers/{ty}Controller.ts"), controller(m)));
        files.push(Artifact::new(format!("src/routes/{ty}Routes.ts"), routes(m)));
    }
    files.push(Artifact::new("src/api.ts", api_router(&models)));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::schema::{Field, FieldType};
    use serde_json::json;

    fn product() -> Model {
        Model {
            name: "Product".into(),
            table_name: "products".into(),
            fields: vec![
                Field::new("id", FieldType::Number).required().primary_key(),
                Field::new("title", FieldType::String).required(),
                Field::new("price", FieldType::Number),
            ],
            indexes: Vec::new(),
            relations: Vec::new(),
        }
    }

    #[test]
    fn type_names_are_identifiers() {
        assert_eq!(type_name("User"), "User");
        assert_eq!(type_name("../Order Item"), "OrderItem");
        assert_eq!(type_name("3d"), "Model3d");
        assert_eq!(type_name("用户"), "Model");
    }

    #[test]
    fn controller_has_bound_crud_handlers() {
        let out = controller(&product());
        assert!(out.contains("export class ProductController {"));
        assert!(out.contains("private readonly productService: ProductService"));
        assert!(out.contains("@route GET /products/:id"));
        for handler in ["getAll", "getById", "create", "update", "delete"] {
            assert!(out.contains(&format!("  {handler} = async (req: Request")), "{handler}");
        }
        assert!(out.contains("error: 'Product not found'"));
        assert!(!out.contains("{Model}"));
    }

    #[test]
    fn service_paginates() {
        let out = service(&product());
        assert!(out.contains("async findAll(options: FindAllOptions = {}): Promise<PaginationResult<Product>>"));
        assert!(out.contains("totalPages: Math.ceil(result.total / pageSize)"));
        assert!(out.contains("async exists(id: string): Promise<boolean>"));
    }

    #[test]
    fn repository_uses_table_and_known_columns() {
        let out = repository(&product());
        assert!(out.contains("const COLUMNS = new Set<string>(['id', 'title', 'price']);"));
        assert!(out.contains("`SELECT COUNT(*) FROM products ${whereClause}`"));
        assert!(out.contains("ORDER BY id DESC LIMIT $${limit} OFFSET $${limit + 1}"));
        assert!(out.contains("const offset = (page - 1) * pageSize;"));
        assert!(out.contains("'DELETE FROM products WHERE id = $1'"));

        let users = repository(&Model::example_user());
        assert!(users.contains("ORDER BY \"createdAt\" DESC"));
    }

    #[test]
    fn routes_mount_every_verb() {
        let out = routes(&product());
        assert!(out.contains("export function createProductRoutes(controller: ProductController): Router {"));
        assert!(out.contains("  router.get('/:id', controller.getById);"));
        assert!(out.contains("  router.delete('/:id', controller.delete);"));
    }

    #[test]
    fn model_interface_marks_optional_fields() {
        let out = model_interface(&product());
        assert_eq!(
            out,
            "export interface Product {\n  id: number;\n  title: string;\n  price?: number;\n}\n"
        );
    }

    #[test]
    fn bundle_has_five_files_per_model_and_a_router() {
        let req: ApiRequest = serde_json::from_value(json!({
            "models": [
                {"name": "Product", "tableName": "products", "fields": [{"name": "id", "type": "number"}]},
                {"name": "../Order", "tableName": "orders; DROP", "fields": []}
            ]
        }))
        .unwrap();
        let files = api_bundle(&req);
        let names: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], "src/models/Product.ts");
        assert!(names.contains(&"src/routes/OrderRoutes.ts"));
        assert_eq!(names[10], "src/api.ts");
        assert!(files[10].content.contains("router.use('/ordersDROP', createOrderRoutes("));
        assert!(files[10].content.contains("router.use('/products', createProductRoutes("));

        let default = api_bundle(&ApiRequest::default());
        assert_eq!(default[0].path, "src/models/User.ts");
    }
}
