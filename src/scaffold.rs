//! Deployment file scaffolding
//!
//! Creates the files a deploy needs when they are missing: a project
//! manifest for Node types, requirements.txt and an app entry for Python
//! servers, a vercel.json for Vercel targets, an index.html for static
//! sites, and an ignore-rules file appropriate to the project type.
//! Existing files are never overwritten.

use crate::platform::PlatformId;
use crate::project::ProjectType;
use serde_json::json;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// Creates any missing deployment files for `project_type` on `platform`.
/// Returns the names of the files actually created.
pub fn create_required_files(
    project_type: ProjectType,
    platform: PlatformId,
    dir: &Path,
) -> io::Result<Vec<String>> {
    let mut created = Vec::new();

    if project_type.requires_node() && !dir.join("package.json").exists() {
        let manifest = node_manifest(project_type, dir);
        fs::write(dir.join("package.json"), serde_json::to_string_pretty(&manifest)?)?;
        created.push("package.json".to_string());
    }

    if project_type == ProjectType::PythonServer {
        if !dir.join("requirements.txt").exists() {
            fs::write(dir.join("requirements.txt"), "Flask==2.0.1\ngunicorn==20.1.0\n")?;
            created.push("requirements.txt".to_string());
        }
        if !dir.join("app.py").exists() {
            fs::write(dir.join("app.py"), DEFAULT_FLASK_APP)?;
            created.push("app.py".to_string());
        }
    }

    if platform == PlatformId::Vercel && !dir.join("vercel.json").exists() {
        if let Some(config) = vercel_config(project_type) {
            fs::write(dir.join("vercel.json"), serde_json::to_string_pretty(&config)?)?;
            created.push("vercel.json".to_string());
        }
    }

    if project_type == ProjectType::Static && !dir.join("index.html").exists() {
        fs::write(dir.join("index.html"), DEFAULT_INDEX_HTML)?;
        created.push("index.html".to_string());
    }

    for name in &created {
        info!(file = %name, "Created deployment file");
    }

    Ok(created)
}

/// Authors a `.gitignore` for `project_type`. Returns false without touching
/// the file when one already exists.
pub fn write_gitignore(project_type: ProjectType, dir: &Path) -> io::Result<bool> {
    let path = dir.join(".gitignore");
    if path.exists() {
        return Ok(false);
    }

    let content = match project_type {
        ProjectType::NextJs | ProjectType::Vite | ProjectType::React => NODE_GITIGNORE,
        ProjectType::PythonServer => PYTHON_GITIGNORE,
        ProjectType::Static | ProjectType::Unknown => STATIC_GITIGNORE,
    };

    fs::write(&path, content)?;
    info!("Created .gitignore");
    Ok(true)
}

fn node_manifest(project_type: ProjectType, dir: &Path) -> serde_json::Value {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase().replace(' ', "-"))
        .unwrap_or_else(|| "web-project".to_string());

    let mut manifest = json!({
        "name": name,
        "version": "1.0.0",
        "description": "",
        "main": "index.js",
        "scripts": {
            "dev": "node index.js",
            "start": "node index.js",
            "build": "echo 'Build script not configured'"
        },
        "keywords": [],
        "author": "",
        "license": "ISC"
    });

    match project_type {
        ProjectType::NextJs => {
            manifest["scripts"]["dev"] = json!("next dev");
            manifest["scripts"]["build"] = json!("next build");
            manifest["scripts"]["start"] = json!("next start");
            manifest["dependencies"] = json!({
                "next": "latest",
                "react": "latest",
                "react-dom": "latest"
            });
        }
        ProjectType::Vite => {
            manifest["scripts"]["dev"] = json!("vite");
            manifest["scripts"]["build"] = json!("vite build");
            manifest["devDependencies"] = json!({ "vite": "latest" });
        }
        ProjectType::React => {
            manifest["dependencies"] = json!({
                "react": "latest",
                "react-dom": "latest"
            });
        }
        _ => {}
    }

    manifest
}

/// `None` for project types Vercel detects natively.
fn vercel_config(project_type: ProjectType) -> Option<serde_json::Value> {
    match project_type {
        // Vite builds to a static dist directory.
        ProjectType::Vite => Some(json!({
            "version": 2,
            "builds": [{
                "src": "package.json",
                "use": "@vercel/static-build",
                "config": { "distDir": "dist" }
            }]
        })),
        ProjectType::PythonServer => Some(json!({
            "version": 2,
            "builds": [{ "src": "api/index.py", "use": "@vercel/python" }],
            "routes": [{ "src": "/(.*)", "dest": "api/index.py" }]
        })),
        ProjectType::NextJs | ProjectType::React | ProjectType::Static | ProjectType::Unknown => {
            None
        }
    }
}

const DEFAULT_FLASK_APP: &str = r#"from flask import Flask

app = Flask(__name__)

@app.route('/')
def hello():
    return '<h1>Hello from Flask!</h1>'

if __name__ == '__main__':
    app.run(debug=True)
"#;

const DEFAULT_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>My Website</title>
</head>
<body>
    <h1>Welcome to My Website</h1>
    <p>This site was automatically deployed!</p>
</body>
</html>
"#;

const NODE_GITIGNORE: &str = "node_modules/\ndist/\nbuild/\nout/\n.next/\n.env\n.env.local\n.netlify/\n.vercel/\n";

const PYTHON_GITIGNORE: &str = "__pycache__/\n*.pyc\nvenv/\n.venv/\n.env\n.vercel/\n";

const STATIC_GITIGNORE: &str = ".DS_Store\n.env\n.netlify/\n.vercel/\n";

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scaffolds_vite_manifest_with_build_script() {
        let dir = TempDir::new().unwrap();
        let created =
            create_required_files(ProjectType::Vite, PlatformId::Netlify, dir.path()).unwrap();

        assert_eq!(created, vec!["package.json"]);
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["scripts"]["build"], "vite build");
        assert!(manifest["devDependencies"]["vite"].is_string());
    }

    #[test]
    fn existing_manifest_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{\"name\": \"mine\"}").unwrap();

        let created =
            create_required_files(ProjectType::React, PlatformId::Netlify, dir.path()).unwrap();

        assert!(created.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("package.json")).unwrap(),
            "{\"name\": \"mine\"}"
        );
    }

    #[test]
    fn python_server_gets_requirements_and_app() {
        let dir = TempDir::new().unwrap();
        let created =
            create_required_files(ProjectType::PythonServer, PlatformId::Render, dir.path())
                .unwrap();

        assert!(created.contains(&"requirements.txt".to_string()));
        assert!(created.contains(&"app.py".to_string()));
        assert!(fs::read_to_string(dir.path().join("requirements.txt"))
            .unwrap()
            .contains("gunicorn"));
    }

    #[test]
    fn vercel_python_config_routes_to_api_index() {
        let dir = TempDir::new().unwrap();
        create_required_files(ProjectType::PythonServer, PlatformId::Vercel, dir.path()).unwrap();

        let config: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("vercel.json")).unwrap())
                .unwrap();
        assert_eq!(config["builds"][0]["src"], "api/index.py");
        assert_eq!(config["routes"][0]["dest"], "api/index.py");
    }

    #[test]
    fn static_site_gets_index_html() {
        let dir = TempDir::new().unwrap();
        let created =
            create_required_files(ProjectType::Static, PlatformId::GitHubPages, dir.path())
                .unwrap();

        assert_eq!(created, vec!["index.html"]);
    }

    #[test]
    fn gitignore_created_once() {
        let dir = TempDir::new().unwrap();

        assert!(write_gitignore(ProjectType::Vite, dir.path()).unwrap());
        let first = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(first.contains("node_modules/"));

        // Second call must leave the file alone.
        assert!(!write_gitignore(ProjectType::PythonServer, dir.path()).unwrap());
        assert_eq!(fs::read_to_string(dir.path().join(".gitignore")).unwrap(), first);
    }

    #[test]
    fn python_gitignore_ignores_bytecode() {
        let dir = TempDir::new().unwrap();
        write_gitignore(ProjectType::PythonServer, dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(content.contains("__pycache__/"));
    }
}
