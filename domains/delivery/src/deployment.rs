//! Deployment guide generation from a static platform catalog

use crate::domain::entities::{DeploymentGuide, Platform, ProjectAnalysis, ProjectType};

fn vercel() -> Platform {
    Platform {
        name: "Vercel",
        url: "https://vercel.com",
        cost: "Free for hobby projects",
        setup_time: "5 minutes",
        difficulty: "easy",
        features: vec!["Automatic HTTPS", "Preview deployments", "Edge network", "Serverless functions"],
        steps: vec![
            "Push the project to a GitHub repository",
            "Import the repository at vercel.com/new",
            "Confirm the detected build settings",
            "Add environment variables",
            "Deploy",
        ],
    }
}

fn netlify() -> Platform {
    Platform {
        name: "Netlify",
        url: "https://www.netlify.com",
        cost: "Free tier available",
        setup_time: "5 minutes",
        difficulty: "easy",
        features: vec!["Automatic HTTPS", "Form handling", "Deploy previews", "Drag-and-drop deploys"],
        steps: vec![
            "Push the project to a Git repository or export it as a ZIP",
            "Create a new site at app.netlify.com",
            "Set the build command and publish directory",
            "Add environment variables",
            "Deploy",
        ],
    }
}

fn cloudflare_pages() -> Platform {
    Platform {
        name: "Cloudflare Pages",
        url: "https://pages.cloudflare.com",
        cost: "Free, unlimited bandwidth",
        setup_time: "10 minutes",
        difficulty: "easy",
        features: vec!["Global CDN", "Unlimited bandwidth", "Preview deployments"],
        steps: vec![
            "Push the project to a GitHub or GitLab repository",
            "Create a Pages project in the Cloudflare dashboard",
            "Select the framework preset",
            "Deploy",
        ],
    }
}

fn github_pages() -> Platform {
    Platform {
        name: "GitHub Pages",
        url: "https://pages.github.com",
        cost: "Free",
        setup_time: "10 minutes",
        difficulty: "easy",
        features: vec!["Free hosting for public repositories", "Custom domains", "Automatic HTTPS"],
        steps: vec![
            "Push the project to a GitHub repository",
            "Add the deployment workflow under .github/workflows",
            "Enable Pages with the GitHub Actions source in repository settings",
            "Push to main to deploy",
        ],
    }
}

fn railway() -> Platform {
    Platform {
        name: "Railway",
        url: "https://railway.app",
        cost: "Usage-based, from $5/month",
        setup_time: "10 minutes",
        difficulty: "easy",
        features: vec!["Managed databases", "Automatic deploys from Git", "Environment management"],
        steps: vec![
            "Push the project to a GitHub repository",
            "Create a new project from the repository at railway.app",
            "Add environment variables",
            "Generate a public domain",
        ],
    }
}

fn render() -> Platform {
    Platform {
        name: "Render",
        url: "https://render.com",
        cost: "Free tier with cold starts",
        setup_time: "15 minutes",
        difficulty: "medium",
        features: vec!["Managed PostgreSQL", "Background workers", "Automatic HTTPS"],
        steps: vec![
            "Push the project to a Git repository",
            "Create a new Web Service at dashboard.render.com",
            "Set the build and start commands",
            "Add environment variables",
            "Deploy",
        ],
    }
}

fn fly_io() -> Platform {
    Platform {
        name: "Fly.io",
        url: "https://fly.io",
        cost: "Usage-based, small apps often free",
        setup_time: "20 minutes",
        difficulty: "medium",
        features: vec!["Runs close to users", "Persistent volumes", "Private networking"],
        steps: vec![
            "Install flyctl",
            "Run fly launch in the project directory",
            "Set secrets with fly secrets set",
            "Run fly deploy",
        ],
    }
}

fn platforms_for(project_type: ProjectType) -> Vec<Platform> {
    match project_type {
        ProjectType::Nextjs => vec![vercel(), netlify(), cloudflare_pages()],
        ProjectType::React | ProjectType::Vue | ProjectType::Svelte => {
            vec![vercel(), netlify(), github_pages()]
        }
        ProjectType::Node => vec![railway(), render(), fly_io()],
        ProjectType::Static => vec![github_pages(), netlify(), cloudflare_pages()],
        ProjectType::Unknown => vec![netlify()],
    }
}

fn output_directory(analysis: &ProjectAnalysis) -> Option<String> {
    match analysis.project_type {
        ProjectType::Nextjs => Some(".next".to_string()),
        ProjectType::React if analysis.depends_on("react-scripts") => Some("build".to_string()),
        ProjectType::React | ProjectType::Vue | ProjectType::Svelte => Some("dist".to_string()),
        ProjectType::Static => Some(".".to_string()),
        ProjectType::Node | ProjectType::Unknown => None,
    }
}

fn checklist(analysis: &ProjectAnalysis, build_command: Option<&str>) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(build) = build_command {
        items.push(format!("Run `{}` locally and fix any errors", build));
    }
    if !analysis.env_vars.is_empty() {
        items.push(format!(
            "Configure environment variables: {}",
            analysis.env_vars.join(", ")
        ));
    }
    if analysis.project_type == ProjectType::Unknown {
        items.push("Upload the project files manually".to_string());
    }
    items.push("Remove secrets and .env files from the repository".to_string());
    items.push("Verify the site works over HTTPS".to_string());
    items.push("Test every page on the deployed URL".to_string());
    items.push("Set up a custom domain (optional)".to_string());
    items
}

fn config_snippet(analysis: &ProjectAnalysis, output: Option<&str>) -> String {
    match analysis.project_type {
        ProjectType::Nextjs => r#"{
  "framework": "nextjs"
}"#
        .to_string(),
        ProjectType::React | ProjectType::Vue | ProjectType::Svelte => format!(
            r#"{{
  "buildCommand": "npm run build",
  "outputDirectory": "{}",
  "rewrites": [{{ "source": "/(.*)", "destination": "/index.html" }}]
}}"#,
            output.unwrap_or("dist")
        ),
        ProjectType::Node => r#"{
  "$schema": "https://railway.app/railway.schema.json",
  "build": { "builder": "NIXPACKS" },
  "deploy": { "startCommand": "npm start", "restartPolicyType": "ON_FAILURE" }
}"#
        .to_string(),
        ProjectType::Static => r#"name: Deploy to GitHub Pages

on:
  push:
    branches: [main]

permissions:
  contents: read
  pages: write
  id-token: write

jobs:
  deploy:
    runs-on: ubuntu-latest
    environment:
      name: github-pages
    steps:
      - uses: actions/checkout@v4
      - uses: actions/upload-pages-artifact@v3
        with:
          path: .
      - uses: actions/deploy-pages@v4
"#
        .to_string(),
        ProjectType::Unknown => r#"[build]
  publish = "."
"#
        .to_string(),
    }
}

/// Build a deployment guide for an analyzed project
pub fn generate_deployment_guide(analysis: &ProjectAnalysis) -> DeploymentGuide {
    let platforms = platforms_for(analysis.project_type);
    let recommended_platform = platforms
        .first()
        .map(|p| p.name.to_string())
        .unwrap_or_default();

    let build_command = match analysis.project_type {
        ProjectType::Static | ProjectType::Unknown => None,
        _ => analysis.build_command.clone(),
    };
    let output_directory = output_directory(analysis);

    DeploymentGuide {
        recommended_platform,
        checklist: checklist(analysis, build_command.as_deref()),
        config_snippet: config_snippet(analysis, output_directory.as_deref()),
        platforms,
        build_command,
        output_directory,
        environment_variables: analysis.env_vars.clone(),
    }
}
