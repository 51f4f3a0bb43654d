//! CI pipelines, container images and deployment manifests.

use crate::io::Artifact;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GitHub Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GitHubActionsOptions {
    pub name: String,
    pub on: Vec<String>,
    pub jobs: Vec<String>,
    pub node_versions: Vec<String>,
}

impl Default for GitHubActionsOptions {
    fn default() -> Self {
        Self {
            name: "CI".into(),
            on: vec!["push".into(), "pull_request".into()],
            jobs: vec!["test".into()],
            node_versions: vec!["18".into()],
        }
    }
}

/// One job per entry in `jobs`. With more than one Node version each job
/// runs as a matrix over them.
pub fn github_actions(opts: &GitHubActionsOptions) -> String {
    let mut out = format!("name: {}\n", opts.name);
    match opts.on.as_slice() {
        [single] => {
            out.push_str(&format!("on: {single}\n"));
        }
        triggers => {
            out.push_str(&format!("on: [{}]\n", triggers.join(", ")));
        }
    }

    let matrix = opts.node_versions.len() > 1;
    let node_version = if matrix {
        "${{ matrix.node-version }}".to_string()
    } else {
        opts.node_versions
            .first()
            .cloned()
            .unwrap_or_else(|| "18".into())
    };

    out.push_str("jobs:\n");
    for job in &opts.jobs {
        out.push_str(&format!("  {job}:\n    runs-on: ubuntu-latest\n"));
        if matrix {
            out.push_str(&format!(
                "    strategy:\n      matrix:\n        node-version: [{}]\n",
                opts.node_versions.join(", ")
            ));
        }
        out.push_str("    steps:\n");
        out.push_str("      - uses: actions/checkout@v3\n");
        out.push_str("      - uses: actions/setup-node@v3\n");
        out.push_str(&format!("        with:\n          node-version: {node_version}\n"));
        out.push_str(&format!("      - run: echo \"{job} step\"\n"));
    }
    out
}

// ---------------------------------------------------------------------------
// GitLab CI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitLabArtifacts {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default = "default_expire_in")]
    pub expire_in: String,
}

fn default_expire_in() -> String {
    "1 week".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabCiOptions {
    pub stages: Vec<String>,
    pub artifacts: Option<GitLabArtifacts>,
}

impl Default for GitLabCiOptions {
    fn default() -> Self {
        Self {
            stages: vec!["build".into(), "test".into(), "deploy".into()],
            artifacts: None,
        }
    }
}

pub fn gitlab_ci(opts: &GitLabCiOptions) -> String {
    let mut out = String::from("stages:\n");
    for stage in &opts.stages {
        out.push_str(&format!("  - {stage}\n"));
    }
    out.push('\n');

    for stage in &opts.stages {
        out.push_str(&format!("{stage}:\n  stage: {stage}\n  script:\n    - echo \"{stage} stage\"\n"));
        if let Some(artifacts) = &opts.artifacts {
            out.push_str("  artifacts:\n");
            if !artifacts.paths.is_empty() {
                out.push_str("    paths:\n");
                for path in &artifacts.paths {
                    out.push_str(&format!("      - {path}\n"));
                }
            }
            out.push_str(&format!("    expire_in: {}\n", artifacts.expire_in));
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Jenkins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JenkinsPost {
    pub always: Vec<String>,
    pub success: Vec<String>,
    pub failure: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JenkinsOptions {
    pub stages: Vec<String>,
    pub post: Option<JenkinsPost>,
}

impl Default for JenkinsOptions {
    fn default() -> Self {
        Self {
            stages: vec!["Build".into(), "Test".into(), "Deploy".into()],
            post: None,
        }
    }
}

pub fn jenkinsfile(opts: &JenkinsOptions) -> String {
    let mut out = String::from("pipeline {\n  agent any\n  stages {\n");
    for stage in &opts.stages {
        out.push_str(&format!(
            "    stage('{stage}') {{\n      steps {{\n        echo '{stage} stage'\n      }}\n    }}\n"
        ));
    }
    out.push_str("  }\n");

    if let Some(post) = &opts.post {
        out.push_str("  post {\n");
        for (condition, steps) in [
            ("always", &post.always),
            ("success", &post.success),
            ("failure", &post.failure),
        ] {
            if !steps.is_empty() {
                out.push_str(&format!("    {condition} {{ {} }}\n", steps.join("; ")));
            }
        }
        out.push_str("  }\n");
    }
    out.push_str("}\n");
    out
}

// ---------------------------------------------------------------------------
// Dockerfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerStage {
    pub image: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockerfileOptions {
    pub base_image: String,
    pub work_dir: String,
    pub install_command: String,
    pub port: u16,
    pub start_command: String,
    pub multi_stage: bool,
    pub build_stage: DockerStage,
    pub runtime_stage: DockerStage,
}

impl Default for DockerfileOptions {
    fn default() -> Self {
        Self {
            base_image: "node:18-alpine".into(),
            work_dir: "/app".into(),
            install_command: "npm ci".into(),
            port: 3000,
            start_command: "npm start".into(),
            multi_stage: false,
            build_stage: DockerStage::default(),
            runtime_stage: DockerStage::default(),
        }
    }
}

pub fn dockerfile(opts: &DockerfileOptions) -> String {
    let DockerfileOptions {
        base_image,
        work_dir,
        install_command,
        port,
        start_command,
        ..
    } = opts;

    if !opts.multi_stage {
        return format!(
            "FROM {base_image}\n\
             WORKDIR {work_dir}\n\
             COPY package*.json ./\n\
             RUN {install_command}\n\
             COPY . .\n\
             EXPOSE {port}\n\
             CMD {start_command}\n"
        );
    }

    let build_image = opts.build_stage.image.as_deref().unwrap_or(base_image);
    let build_cmd = opts
        .build_stage
        .command
        .as_deref()
        .unwrap_or("npm run build");
    let runtime_image = opts
        .runtime_stage
        .image
        .as_deref()
        .unwrap_or("node:18-alpine");
    let runtime_cmd = opts
        .runtime_stage
        .command
        .as_deref()
        .unwrap_or(start_command);

    format!(
        "FROM {build_image} AS build\n\
         WORKDIR {work_dir}\n\
         COPY package*.json ./\n\
         RUN {install_command}\n\
         COPY . .\n\
         RUN {build_cmd}\n\
         \n\
         FROM {runtime_image} AS runtime\n\
         WORKDIR {work_dir}\n\
         COPY --from=build {work_dir}/dist ./dist\n\
         EXPOSE {port}\n\
         CMD {runtime_cmd}\n"
    )
}

// ---------------------------------------------------------------------------
// Compose / Kubernetes / nginx
// ---------------------------------------------------------------------------

pub fn docker_compose() -> String {
    r#"version: '3.8'

services:
  app:
    build:
      context: .
      dockerfile: Dockerfile
    ports:
      - "3000:3000"
    environment:
      - NODE_ENV=production
      - PORT=3000
    volumes:
      - ./logs:/app/logs
    restart: unless-stopped

  nginx:
    image: nginx:alpine
    ports:
      - "80:80"
    volumes:
      - ./nginx.conf:/etc/nginx/nginx.conf:ro
    depends_on:
      - app
    restart: unless-stopped

  redis:
    image: redis:alpine
    ports:
      - "6379:6379"
    restart: unless-stopped
"#
    .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct K8sOptions {
    pub app_name: String,
    pub image: String,
    pub host: String,
    pub replicas: u32,
    pub port: u16,
}

impl Default for K8sOptions {
    fn default() -> Self {
        Self {
            app_name: "myapp".into(),
            image: "myapp:latest".into(),
            host: "app.example.com".into(),
            replicas: 3,
            port: 3000,
        }
    }
}

const CONTAINER_PORT: u16 = 3000;

pub fn k8s_deployment(app: &str, image: &str, replicas: u32) -> String {
    format!(
        r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {app}
spec:
  replicas: {replicas}
  selector:
    matchLabels:
      app: {app}
  template:
    metadata:
      labels:
        app: {app}
    spec:
      containers:
      - name: {app}
        image: {image}
        ports:
        - containerPort: {CONTAINER_PORT}
        env:
        - name: NODE_ENV
          value: "production"
        resources:
          requests:
            cpu: "100m"
            memory: "128Mi"
          limits:
            cpu: "500m"
            memory: "256Mi"
        livenessProbe:
          httpGet:
            path: /health
            port: {CONTAINER_PORT}
          initialDelaySeconds: 30
          periodSeconds: 10
        readinessProbe:
          httpGet:
            path: /health
            port: {CONTAINER_PORT}
          initialDelaySeconds: 5
          periodSeconds: 5
"#
    )
}

pub fn k8s_service(app: &str, port: u16) -> String {
    format!(
        "apiVersion: v1\n\
         kind: Service\n\
         metadata:\n  name: {app}\n\
         spec:\n  type: ClusterIP\n  selector:\n    app: {app}\n  ports:\n  - port: {port}\n    targetPort: {CONTAINER_PORT}\n    protocol: TCP\n"
    )
}

pub fn k8s_ingress(app: &str, host: &str, service: &str, service_port: u16) -> String {
    format!(
        r#"apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: {app}-ingress
  annotations:
    kubernetes.io/ingress.class: nginx
    cert-manager.io/cluster-issuer: letsencrypt-prod
spec:
  tls:
  - hosts:
    - {host}
    secretName: {app}-tls
  rules:
  - host: {host}
    http:
      paths:
      - path: /
        pathType: Prefix
        backend:
          service:
            name: {service}
            port:
              number: {service_port}
"#
    )
}

/// Deployment, Service and Ingress as one multi-document YAML stream.
pub fn k8s_manifest(opts: &K8sOptions) -> String {
    [
        k8s_deployment(&opts.app_name, &opts.image, opts.replicas),
        k8s_service(&opts.app_name, opts.port),
        k8s_ingress(&opts.app_name, &opts.host, &opts.app_name, opts.port),
    ]
    .join("\n---\n")
}

pub fn nginx_config(upstream: &str, port: u16) -> String {
    format!(
        r#"events {{
    worker_connections 1024;
}}

http {{
    upstream {upstream} {{
        least_conn;
        server app:{port};
    }}

    server {{
        listen 80;
        server_name _;

        location / {{
            proxy_pass http://{upstream};
            proxy_set_header Host $host;
            proxy_set_header X-Real-IP $remote_addr;
            proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
            proxy_set_header X-Forwarded-Proto $scheme;
        }}

        location /health {{
            proxy_pass http://{upstream}/health;
            access_log off;
        }}
    }}
}}
"#
    )
}

pub fn deploy_script() -> String {
    r#"#!/bin/bash

set -e

echo "🚀 Starting deployment..."

# Variables
IMAGE_NAME="${1:-myapp}"
TAG="${2:-latest}"
REGISTRY="${REGISTRY:-docker.io}"

# Build Docker image
echo "📦 Building Docker image..."
docker build -t ${IMAGE_NAME}:${TAG} .

# Tag and push to registry
echo "📤 Pushing image to registry..."
docker tag ${IMAGE_NAME}:${TAG} ${REGISTRY}/${IMAGE_NAME}:${TAG}
docker push ${REGISTRY}/${IMAGE_NAME}:${TAG}

# Apply Kubernetes manifests
echo "🔧 Applying Kubernetes manifests..."
kubectl apply -f k8s/

# Wait for rollout
echo "⏳ Waiting for rollout..."
kubectl rollout status deployment/${IMAGE_NAME}

echo "✅ Deployment complete!"
"#
    .to_string()
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Input accepted by the `devops-generator` skill.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevopsRequest {
    pub github: GitHubActionsOptions,
    pub gitlab: Option<GitLabCiOptions>,
    pub jenkins: Option<JenkinsOptions>,
    pub dockerfile: DockerfileOptions,
    pub k8s: K8sOptions,
}

/// Every deployment file for one application.
pub fn devops_bundle(req: &DevopsRequest) -> Vec<Artifact> {
    let mut files = vec![
        Artifact::new(".github/workflows/ci.yml", github_actions(&req.github)),
        Artifact::new("Dockerfile", dockerfile(&req.dockerfile)),
        Artifact::new("docker-compose.yml", docker_compose()),
        Artifact::new("k8s/manifest.yaml", k8s_manifest(&req.k8s)),
        Artifact::new("nginx.conf", nginx_config(&req.k8s.app_name, req.k8s.port)),
        Artifact::new("deploy.sh", deploy_script()),
    ];
    if let Some(gitlab) = &req.gitlab {
        files.push(Artifact::new(".gitlab-ci.yml", gitlab_ci(gitlab)));
    }
    if let Some(jenkins) = &req.jenkins {
        files.push(Artifact::new("Jenkinsfile", jenkinsfile(jenkins)));
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_defaults() {
        let out = github_actions(&GitHubActionsOptions::default());
        assert!(out.starts_with("name: CI\non: [push, pull_request]\njobs:\n  test:\n"));
        assert!(out.contains("          node-version: 18\n"));
        assert!(out.contains("      - run: echo \"test step\"\n"));
        assert!(!out.contains("strategy"));
    }

    #[test]
    fn github_single_trigger_and_matrix() {
        let out = github_actions(&GitHubActionsOptions {
            on: vec!["push".into()],
            jobs: vec!["lint".into(), "test".into()],
            node_versions: vec!["18".into(), "20".into()],
            ..Default::default()
        });
        assert!(out.contains("on: push\n"));
        assert_eq!(out.matches("node-version: [18, 20]").count(), 2);
        assert!(out.contains("node-version: ${{ matrix.node-version }}"));
    }

    #[test]
    fn gitlab_stages_and_artifacts() {
        let out = gitlab_ci(&GitLabCiOptions {
            stages: vec!["build".into()],
            artifacts: Some(GitLabArtifacts {
                paths: vec!["dist/".into()],
                expire_in: default_expire_in(),
            }),
        });
        assert!(out.starts_with("stages:\n  - build\n\nbuild:\n  stage: build\n"));
        assert!(out.contains("    paths:\n      - dist/\n    expire_in: 1 week\n"));
    }

    #[test]
    fn gitlab_artifacts_default_expiry() {
        let opts: GitLabCiOptions =
            serde_json::from_str(r#"{"artifacts": {"paths": ["out/"]}}"#).unwrap();
        assert_eq!(opts.stages.len(), 3);
        assert!(gitlab_ci(&opts).contains("expire_in: 1 week"));
    }

    #[test]
    fn jenkins_post_blocks() {
        let out = jenkinsfile(&JenkinsOptions {
            post: Some(JenkinsPost {
                always: vec!["cleanWs()".into()],
                failure: vec!["mail to: 'ops'".into(), "echo 'failed'".into()],
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(out.contains("    stage('Deploy') {\n"));
        assert!(out.contains("    always { cleanWs() }\n"));
        assert!(out.contains("    failure { mail to: 'ops'; echo 'failed' }\n"));
        assert!(!out.contains("success"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn single_stage_dockerfile() {
        let out = dockerfile(&DockerfileOptions::default());
        assert_eq!(
            out,
            "FROM node:18-alpine\nWORKDIR /app\nCOPY package*.json ./\nRUN npm ci\nCOPY . .\nEXPOSE 3000\nCMD npm start\n"
        );
    }

    #[test]
    fn multi_stage_dockerfile() {
        let out = dockerfile(&DockerfileOptions {
            multi_stage: true,
            work_dir: "/srv".into(),
            runtime_stage: DockerStage {
                image: Some("gcr.io/distroless/nodejs18".into()),
                command: None,
            },
            ..Default::default()
        });
        assert!(out.starts_with("FROM node:18-alpine AS build\nWORKDIR /srv\n"));
        assert!(out.contains("RUN npm run build\n\nFROM gcr.io/distroless/nodejs18 AS runtime\n"));
        assert!(out.contains("COPY --from=build /srv/dist ./dist\n"));
        assert!(out.ends_with("CMD npm start\n"));
    }

    #[test]
    fn manifest_joins_three_documents() {
        let out = k8s_manifest(&K8sOptions::default());
        assert_eq!(out.matches("\n---\n").count(), 2);
        assert!(out.contains("kind: Deployment"));
        assert!(out.contains("  replicas: 3\n"));
        assert!(out.contains("  type: ClusterIP\n"));
        assert!(out.contains("  name: myapp-ingress\n"));
        assert!(out.contains("    - app.example.com\n"));
    }

    #[test]
    fn service_port_maps_to_container_port() {
        let out = k8s_service("api", 8080);
        assert!(out.contains("  - port: 8080\n    targetPort: 3000\n"));
    }

    #[test]
    fn nginx_upstream() {
        let out = nginx_config("backend", 4000);
        assert!(out.contains("    upstream backend {\n        least_conn;\n        server app:4000;\n"));
        assert!(out.contains("proxy_pass http://backend/health;"));
    }

    #[test]
    fn bundle_includes_optional_pipelines() {
        let base = devops_bundle(&DevopsRequest::default());
        assert_eq!(base.len(), 6);
        assert!(base.iter().any(|a| a.path == "deploy.sh" && a.content.starts_with("#!/bin/bash")));

        let full = devops_bundle(&DevopsRequest {
            gitlab: Some(GitLabCiOptions::default()),
            jenkins: Some(JenkinsOptions::default()),
            ..Default::default()
        });
        let paths: Vec<&str> = full.iter().map(|a| a.path.as_str()).collect();
        assert!(paths.contains(&".gitlab-ci.yml"));
        assert!(paths.contains(&"Jenkinsfile"));
    }
}
