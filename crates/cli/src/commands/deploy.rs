use anyhow::{Context, Result};
use pages_deploy_core::config::{Settings, parse_settings};
use pages_deploy_core::{DeployReport, Environment};
use pages_deploy_deployer::{CosObjectStore, DeployOptions, PagesDeployer, Progress, ProgressSink};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Get path to global config file
fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    let config_dir = PathBuf::from(home).join(".pages-deploy");
    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("config.toml"))
}

/// Load global config
fn load_config() -> Result<Option<Settings>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let settings = parse_settings(&path)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(Some(settings))
}

/// Save global config
fn save_config(settings: &Settings) -> Result<()> {
    let path = config_path()?;
    let contents = settings
        .to_toml_string()
        .context("Failed to serialize config")?;
    fs::write(&path, contents).context("Failed to write config file")?;
    println!("✅ Configuration saved to: {}", path.display());
    Ok(())
}

/// Layer command-line overrides on top of the stored settings
fn apply_overrides(
    stored: Option<Settings>,
    token: Option<String>,
    project: Option<String>,
) -> Result<Settings> {
    let mut settings = stored.unwrap_or_default();
    if let Some(token) = token {
        settings.api_token = token;
    }
    if let Some(project) = project {
        settings.project_name = Some(project).filter(|p| !p.trim().is_empty());
    }

    if settings.api_token.trim().is_empty() {
        anyhow::bail!(
            "❌ API token is required for ZIP deployment.\nRun 'pages-deploy configure' or pass --token"
        );
    }
    settings.validate()?;
    Ok(settings)
}

// ============================================================================
// Bundle packing
// ============================================================================

/// Zip the contents of `site_dir` into `zip_path`
fn create_deployment_zip(site_dir: &Path, zip_path: &Path) -> Result<()> {
    let file = File::create(zip_path).context("Failed to create deployment zip file")?;
    let mut zip = ZipWriter::new(file);

    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in WalkDir::new(site_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let relative_path = path
            .strip_prefix(site_dir)
            .context("Failed to get relative path")?;

        // Zip entries always use forward slashes
        let name = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(name, options)?;

        let mut f = File::open(path)?;
        io::copy(&mut f, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

/// Bundle file name for a site directory
fn bundle_name(site_dir: &Path) -> String {
    let stem = site_dir
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("site");
    format!("{}.zip", stem)
}

// ============================================================================
// Commands
// ============================================================================

/// Helper to read user input
fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Configure API token and default project
pub async fn configure() -> Result<()> {
    println!("🔧 Configuring Pages deployment...\n");

    let existing = load_config()?.unwrap_or_default();

    println!("📋 You'll need:");
    println!("   1. A Pages API token");
    println!("   2. A project name (optional - a temporary project is created otherwise)");
    println!();

    let current_token = existing.api_token.as_str();
    let api_token = if !current_token.is_empty() {
        let preview: String = current_token.chars().take(6).collect();
        let input = read_input(&format!("API Token [current: {}...]: ", preview))?;
        if input.is_empty() {
            current_token.to_string()
        } else {
            input
        }
    } else {
        read_input("API Token: ")?
    };

    if api_token.is_empty() {
        anyhow::bail!("API token is required");
    }

    let project_name = match existing.project_name.as_deref() {
        Some(current) => {
            let input = read_input(&format!(
                "Project Name [current: {}] (press Enter to keep, 'none' to remove): ",
                current
            ))?;
            if input.is_empty() {
                Some(current.to_string())
            } else if input.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(input)
            }
        }
        None => {
            let input = read_input("Project Name (optional, press Enter to skip): ")?;
            if input.is_empty() { None } else { Some(input) }
        }
    };

    let settings = Settings {
        api_token,
        project_name,
        ..existing
    };
    settings.validate()?;
    save_config(&settings)?;

    println!();
    match &settings.project_name {
        Some(name) => println!("   Deployments will go to project: {}", name),
        None => println!("   Each deployment creates a temporary project"),
    }
    println!("🚀 Ready to deploy! Try: pages-deploy publish <site.zip>");

    Ok(())
}

/// Deploy a bundle and print the result payload
pub async fn publish(
    path: PathBuf,
    env: String,
    token: Option<String>,
    project: Option<String>,
) -> Result<()> {
    let settings = apply_overrides(load_config()?, token, project)?;
    // Infallible
    let environment: Environment = env.parse().unwrap_or_default();
    tracing::debug!(
        endpoints = ?settings.endpoints,
        project = ?settings.project_name,
        environment = %environment,
        "Resolved deployment settings"
    );

    // Directories are packed into a temporary zip that lives until we return
    let (bundle, _temp_dir) = if path.is_dir() {
        println!("📦 Packing {} ...", path.display());
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let zip_path = temp_dir.path().join(bundle_name(&path));
        create_deployment_zip(&path, &zip_path)?;
        tracing::debug!(bundle = %zip_path.display(), "Packed site directory");
        println!("   ✓ Packed to: {}", zip_path.display());
        (zip_path, Some(temp_dir))
    } else {
        (path, None)
    };

    let progress: ProgressSink = Arc::new(|event: &Progress| println!("{}", event));
    let deployer = PagesDeployer::new(
        settings.credential(),
        DeployOptions::from(&settings),
        Arc::new(CosObjectStore::new()),
    )
    .with_progress(progress);

    let report = deployer.deploy_report(&bundle, &environment).await;
    print_report(&report);

    if !report.success {
        anyhow::bail!(
            "❌ Deployment failed: {}",
            report.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}

fn print_report(report: &DeployReport) {
    println!();
    println!("{}", report.to_json());
}
