use crate::output::{print_artifacts, print_json};
use anyhow::Context;
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::de::DeserializeOwned;
use skillkit_core::generators::{
    api, backup, cicd, component, design, docs, prototype, schema, test_config, test_gen, wbs,
};
use skillkit_core::io::{write_artifacts, Artifact};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IoArgs {
    /// JSON or YAML file with generator options (default: built-in example)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory to write files into, relative to the project root (default: print)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum GenerateSubcommand {
    /// SQL schema, migration, ER diagram and data dictionary
    Schema {
        #[command(flatten)]
        io: IoArgs,
        /// postgresql, mysql, sqlite or mongodb
        #[arg(long)]
        database: Option<String>,
        /// Also emit ORM models: prisma, sequelize or typeorm
        #[arg(long)]
        orm: Option<String>,
    },

    /// Express model, repository, service, controller and routes per model
    Api {
        #[command(flatten)]
        io: IoArgs,
    },

    /// React or Vue component with its stylesheet
    Component {
        #[command(flatten)]
        io: IoArgs,
        /// Component name (kebab-case or PascalCase)
        #[arg(long)]
        name: Option<String>,
        /// react or vue
        #[arg(long)]
        framework: Option<String>,
        /// css, scss, styled-components or tailwind
        #[arg(long)]
        styling: Option<String>,
    },

    /// Test cases, test data, mocks and a test plan for one feature
    Tests {
        #[command(flatten)]
        io: IoArgs,
        #[arg(long)]
        feature: Option<String>,
        /// Scenario name (repeatable)
        #[arg(long = "scenario")]
        scenarios: Vec<String>,
    },

    /// CI pipeline definition
    Ci {
        #[command(flatten)]
        io: IoArgs,
        /// github, gitlab or jenkins
        #[arg(long, default_value = "github")]
        provider: String,
    },

    /// Dockerfile
    Dockerfile {
        #[command(flatten)]
        io: IoArgs,
        /// Separate build and runtime stages
        #[arg(long)]
        multi_stage: bool,
    },

    /// Kubernetes deployment, service and ingress
    K8s {
        #[command(flatten)]
        io: IoArgs,
        #[arg(long)]
        app: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        replicas: Option<u32>,
    },

    /// Backup plan with backup and restore scripts
    Backup {
        #[command(flatten)]
        io: IoArgs,
        /// Database name
        #[arg(long)]
        name: Option<String>,
        /// postgresql, mysql, mongodb or redis
        #[arg(long)]
        database: Option<String>,
    },

    /// README, product introduction, manual, API docs, FAQ and changelog
    Docs {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Work breakdown structure, Gantt chart and resource table
    Wbs {
        #[command(flatten)]
        io: IoArgs,
        #[arg(long)]
        name: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
    },

    /// HTML prototype pages
    Prototype {
        #[command(flatten)]
        io: IoArgs,
        /// html or json
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        wireframe: bool,
    },

    /// Design system and token exports
    Tokens {
        #[command(flatten)]
        io: IoArgs,
        /// css, scss, js, ts, json, tailwind or markdown (repeatable)
        #[arg(long = "format")]
        formats: Vec<String>,
        #[arg(long)]
        brand_color: Option<String>,
    },

    /// Test runner, lint and setup files
    TestConfig {
        #[command(flatten)]
        io: IoArgs,
        /// jest, vitest, mocha or jasmine
        #[arg(long)]
        framework: Option<String>,
        /// Also emit a Cypress config
        #[arg(long)]
        cypress: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, kind: GenerateSubcommand, json: bool) -> anyhow::Result<()> {
    let (io, artifacts) = match kind {
        GenerateSubcommand::Schema { io, database, orm } => {
            let mut req: schema::SchemaRequest = load_input(io.input.as_deref())?;
            if let Some(db) = database {
                req.database = parse_name(&db, "database")?;
            }
            if let Some(orm) = orm {
                req.orm = Some(parse_name(&orm, "orm")?);
            }
            (io, schema::schema_bundle(&req, Utc::now()))
        }
        GenerateSubcommand::Api { io } => {
            let req: api::ApiRequest = load_input(io.input.as_deref())?;
            (io, api::api_bundle(&req))
        }
        GenerateSubcommand::Component {
            io,
            name,
            framework,
            styling,
        } => {
            let mut req: component::ComponentRequest = load_input(io.input.as_deref())?;
            if let Some(name) = name {
                req.name = name;
            }
            if let Some(fw) = framework {
                req.framework = parse_name(&fw, "framework")?;
            }
            if let Some(styling) = styling {
                req.styling = parse_name(&styling, "styling")?;
            }
            (io, component::component_bundle(&req))
        }
        GenerateSubcommand::Tests {
            io,
            feature,
            scenarios,
        } => {
            let mut req: test_gen::TestGenRequest = load_input(io.input.as_deref())?;
            if let Some(feature) = feature {
                req.feature = feature;
            }
            if !scenarios.is_empty() {
                req.scenarios = scenarios;
            }
            (io, test_gen::test_gen_bundle(&req, Utc::now())?)
        }
        GenerateSubcommand::Ci { io, provider } => {
            let artifact = match provider.as_str() {
                "github" => {
                    let opts: cicd::GitHubActionsOptions = load_input(io.input.as_deref())?;
                    Artifact::new(".github/workflows/ci.yml", cicd::github_actions(&opts))
                }
                "gitlab" => {
                    let opts: cicd::GitLabCiOptions = load_input(io.input.as_deref())?;
                    Artifact::new(".gitlab-ci.yml", cicd::gitlab_ci(&opts))
                }
                "jenkins" => {
                    let opts: cicd::JenkinsOptions = load_input(io.input.as_deref())?;
                    Artifact::new("Jenkinsfile", cicd::jenkinsfile(&opts))
                }
                other => {
                    anyhow::bail!("unknown CI provider '{other}': expected github, gitlab or jenkins")
                }
            };
            (io, vec![artifact])
        }
        GenerateSubcommand::Dockerfile { io, multi_stage } => {
            let mut opts: cicd::DockerfileOptions = load_input(io.input.as_deref())?;
            opts.multi_stage |= multi_stage;
            (io, vec![Artifact::new("Dockerfile", cicd::dockerfile(&opts))])
        }
        GenerateSubcommand::K8s {
            io,
            app,
            image,
            replicas,
        } => {
            let mut opts: cicd::K8sOptions = load_input(io.input.as_deref())?;
            if let Some(app) = app {
                opts.app_name = app;
            }
            if let Some(image) = image {
                opts.image = image;
            }
            if let Some(replicas) = replicas {
                opts.replicas = replicas;
            }
            (io, vec![Artifact::new("k8s/manifest.yaml", cicd::k8s_manifest(&opts))])
        }
        GenerateSubcommand::Backup { io, name, database } => {
            let mut req: backup::BackupRequest = load_input(io.input.as_deref())?;
            if let Some(name) = name {
                req.database_name = name;
            }
            if let Some(db) = database {
                req.database_type = parse_name(&db, "database")?;
            }
            (io, backup::backup_bundle(&req.resolve_plan(), Utc::now()))
        }
        GenerateSubcommand::Docs { io } => {
            let req: docs::DocsRequest = load_input(io.input.as_deref())?;
            (io, docs::all_documents(&req))
        }
        GenerateSubcommand::Wbs { io, name, start } => {
            let mut req: wbs::WbsRequest = load_input(io.input.as_deref())?;
            if let Some(name) = name {
                req.name = name;
            }
            if let Some(start) = start {
                req.start_date = start;
            }
            let plan = wbs::generate_wbs(&req)?;
            (io, wbs::wbs_bundle(&plan)?)
        }
        GenerateSubcommand::Prototype {
            io,
            format,
            wireframe,
        } => {
            let mut req: prototype::PrototypeRequest = load_input(io.input.as_deref())?;
            if let Some(format) = format {
                req.format = parse_name(&format, "format")?;
            }
            req.wireframe |= wireframe;
            let mut builder = prototype::PrototypeBuilder::default();
            if req.wireframe {
                builder = builder.wireframe();
            }
            let export = prototype::export_prototype(&builder, &req);
            tracing::info!("{}", export.message);
            (io, export.files)
        }
        GenerateSubcommand::Tokens {
            io,
            formats,
            brand_color,
        } => {
            let mut req: design::TokensRequest = load_input(io.input.as_deref())?;
            if !formats.is_empty() {
                req.formats = formats
                    .iter()
                    .map(|f| f.parse::<design::TokenFormat>())
                    .collect::<Result<Vec<_>, _>>()?;
            }
            if let Some(color) = brand_color {
                req.brand_color = color;
            }
            (io, design::design_bundle(&req)?)
        }
        GenerateSubcommand::TestConfig {
            io,
            framework,
            cypress,
        } => {
            let mut req: test_config::TestConfigRequest = load_input(io.input.as_deref())?;
            if let Some(fw) = framework {
                req.framework = fw.parse()?;
            }
            if cypress && req.cypress.is_none() {
                req.cypress = Some(test_config::CypressOptions::default());
            }
            (io, test_config::test_config_bundle(&req))
        }
    };

    emit(root, &artifacts, io.out.as_deref(), json)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generator options from a JSON or YAML file; defaults when no file is given.
fn load_input<T: DeserializeOwned + Default>(path: Option<&Path>) -> anyhow::Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if data.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&data).with_context(|| format!("invalid options in {}", path.display()))
}

/// A lowercase enum name, decoded the same way an input file spells it.
fn parse_name<T: DeserializeOwned>(value: &str, what: &str) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .with_context(|| format!("unknown {what} '{value}'"))
}

fn emit(root: &Path, artifacts: &[Artifact], out: Option<&Path>, json: bool) -> anyhow::Result<()> {
    match out {
        Some(dir) => {
            let dir = root.join(dir);
            let written = write_artifacts(&dir, artifacts)
                .with_context(|| format!("failed to write into {}", dir.display()))?;
            if json {
                print_json(&written)?;
            } else {
                for path in written {
                    println!("  created: {}", path.display());
                }
            }
        }
        None if json => print_json(&artifacts)?,
        None => print_artifacts(artifacts),
    }
    Ok(())
}
