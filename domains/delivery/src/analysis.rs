//! Project classification
//!
//! Infers the project type and framework from `package.json` and the file
//! tree, and collects the facts the deployment and maintenance generators
//! work from.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::domain::entities::{ProjectAnalysis, ProjectType, SourceFile};

lazy_static! {
    /// `process.env.NAME` and `import.meta.env.NAME`
    static ref ENV_VAR_REGEX: Regex =
        Regex::new(r"(?:process\.env|import\.meta\.env)\.([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

pub(crate) const PACKAGE_JSON: &str = "package.json";

/// Node backend frameworks, in detection order
const NODE_FRAMEWORKS: &[(&str, &str)] = &[
    ("@nestjs/core", "NestJS"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("koa", "Koa"),
    ("hono", "Hono"),
];

/// The parts of `package.json` the analyzers read
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PackageJson {
    #[serde(default)]
    pub dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub scripts: BTreeMap<String, serde_json::Value>,
}

impl PackageJson {
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

#[derive(Debug)]
pub(crate) enum Manifest {
    Missing,
    Malformed(String),
    Parsed(PackageJson),
}

impl Manifest {
    pub fn read(files: &[SourceFile]) -> Self {
        let Some(file) = files.iter().find(|f| f.path == PACKAGE_JSON) else {
            return Manifest::Missing;
        };
        match serde_json::from_str(&file.content) {
            Ok(package) => Manifest::Parsed(package),
            Err(e) => Manifest::Malformed(e.to_string()),
        }
    }

    /// Parsed manifest; malformed counts as absent
    pub fn package(&self) -> Option<&PackageJson> {
        match self {
            Manifest::Parsed(package) => Some(package),
            _ => None,
        }
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.package().is_some_and(|p| p.depends_on(name))
    }
}

/// Test files: `*.test.*`, `*.spec.*`, `__tests__/` or `tests/` directories
pub(crate) fn is_test_file(path: &str) -> bool {
    path.contains(".test.")
        || path.contains(".spec.")
        || path.contains("__tests__/")
        || path.starts_with("tests/")
        || path.contains("/tests/")
}

pub(crate) fn is_typescript(file: &SourceFile) -> bool {
    file.has_extension(&["ts", "tsx"])
}

fn is_entry_point(file: &SourceFile) -> bool {
    let path = file.path.as_str();
    file.name() == "index.html"
        || path == "index.js"
        || path.starts_with("src/main.")
        || path.starts_with("src/index.")
        || path.starts_with("pages/")
        || path.starts_with("app/")
        || path.starts_with("src/pages/")
        || path.starts_with("src/app/")
        || file.name().starts_with("server.")
}

fn classify(manifest: &Manifest, files: &[SourceFile]) -> (ProjectType, Option<String>) {
    if let Some(package) = manifest.package() {
        if package.depends_on("next") {
            return (ProjectType::Nextjs, Some("Next.js".to_string()));
        }
        if package.depends_on("react") {
            return (ProjectType::React, Some("React".to_string()));
        }
        if package.depends_on("vue") {
            return (ProjectType::Vue, Some("Vue".to_string()));
        }
        if package.depends_on("@sveltejs/kit") {
            return (ProjectType::Svelte, Some("SvelteKit".to_string()));
        }
        if package.depends_on("svelte") {
            return (ProjectType::Svelte, Some("Svelte".to_string()));
        }
        let framework = NODE_FRAMEWORKS
            .iter()
            .find(|(dep, _)| package.depends_on(dep))
            .map(|(_, name)| name.to_string());
        return (ProjectType::Node, framework);
    }

    if files.iter().any(|f| f.has_extension(&["html", "htm"])) {
        (ProjectType::Static, None)
    } else {
        (ProjectType::Unknown, None)
    }
}

/// Classify a project and collect its build facts
pub fn analyze(files: &[SourceFile]) -> ProjectAnalysis {
    let manifest = Manifest::read(files);
    let (project_type, framework) = classify(&manifest, files);

    let (dependencies, dev_dependencies, build_command) = match manifest.package() {
        Some(package) => (
            package.dependencies.keys().cloned().collect(),
            package.dev_dependencies.keys().cloned().collect(),
            package
                .scripts
                .contains_key("build")
                .then(|| "npm run build".to_string()),
        ),
        None => (Vec::new(), Vec::new(), None),
    };

    let env_vars: BTreeSet<String> = files
        .iter()
        .flat_map(|f| ENV_VAR_REGEX.captures_iter(&f.content))
        .map(|caps| caps[1].to_string())
        .collect();

    let mut errors = Vec::new();
    if files.is_empty() {
        errors.push("Project contains no files".to_string());
    } else if !files.iter().any(is_entry_point) {
        errors.push("No entry point found".to_string());
    }

    let mut warnings = Vec::new();
    match &manifest {
        Manifest::Missing if project_type != ProjectType::Static => {
            warnings.push("No package.json found".to_string());
        }
        Manifest::Malformed(reason) => {
            warnings.push(format!("package.json is not valid JSON: {}", reason));
        }
        Manifest::Parsed(_) if build_command.is_none() => {
            warnings.push("No build script defined in package.json".to_string());
        }
        _ => {}
    }

    ProjectAnalysis {
        project_type,
        framework,
        dependencies,
        dev_dependencies,
        file_count: files.len(),
        total_size_bytes: files.iter().map(|f| f.content.len() as u64).sum(),
        has_package_json: !matches!(manifest, Manifest::Missing),
        has_typescript: files.iter().any(is_typescript) || manifest.depends_on("typescript"),
        has_tests: files.iter().any(|f| is_test_file(&f.path)),
        build_command,
        env_vars: env_vars.into_iter().collect(),
        errors,
        warnings,
    }
}
