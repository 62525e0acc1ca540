use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use tokio::process::Command;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use modula_core::kernel::error::{Error, Result};
use modula_core::module_system::ModuleMetadata;
use modula_core::{AppConfig, Application};

/// Modula: manage extension modules and serve the web frontend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Application config file (json, yaml or toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage modules
    Module {
        #[command(subcommand)]
        command: ModuleCommand,
    },
    /// Run the development web server
    Web {
        #[command(subcommand)]
        command: WebCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ModuleCommand {
    /// List installed modules
    List,
    /// Show a module's metadata
    Info {
        name: String,
        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enable an installed module (persist setting)
    Enable { name: String },
    /// Disable a module (persist setting)
    Disable { name: String },
    /// Load and register all enabled modules
    Register,
}

#[derive(Subcommand, Debug)]
enum WebCommand {
    /// Serve the frontend with the configured development server
    Serve {
        /// Run in background
        #[arg(long)]
        daemonize: bool,
        /// Document root, defaults to `<base>/public`
        #[arg(long)]
        document_root: Option<PathBuf>,
        /// Address to listen on
        #[arg(long)]
        listen_addr: Option<String>,
    },
    /// Stop a daemonized development server
    Stop,
}

const PID_FILE: &str = "web.pid";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let settings = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let mut app = Application::new(settings);

    match args.command {
        Commands::Module { command } => module_command(&mut app, command),
        Commands::Web { command } => match command {
            WebCommand::Serve { daemonize, document_root, listen_addr } => {
                serve(&app, daemonize, document_root, listen_addr).await
            }
            WebCommand::Stop => stop(&app).await,
        },
    }
}

fn module_command(app: &mut Application, command: ModuleCommand) -> Result<()> {
    match command {
        ModuleCommand::List => {
            app.discover()?;
            let modules = app.modules();
            let installed = modules.installed_modules();
            if installed.is_empty() {
                println!("No modules installed");
                return Ok(());
            }

            println!("{:<20} {:<10} {:<9} DESCRIPTION", "MODULE", "VERSION", "STATE");
            for name in installed {
                let Some(module) = modules.installed_module(name) else { continue };
                let state = if modules.has_enabled(name) { "enabled" } else { "disabled" };
                println!(
                    "{:<20} {:<10} {:<9} {}",
                    name,
                    module.version(),
                    state,
                    module.title()
                );
            }
            Ok(())
        }
        ModuleCommand::Info { name, json } => {
            app.discover()?;
            let module = app
                .modules()
                .installed_module(&name)
                .ok_or_else(|| Error::Other(format!("Module '{}' is not installed", name)))?;
            let metadata = module.metadata();
            if json {
                let rendered = serde_json::to_string_pretty(metadata)
                    .map_err(|e| Error::Other(format!("Failed to render metadata: {}", e)))?;
                println!("{}", rendered);
            } else {
                print_metadata(metadata, module.base_dir());
            }
            Ok(())
        }
        ModuleCommand::Enable { name } => {
            app.discover()?;
            app.enable_module(&name)?;
            println!("Module '{}' has been enabled", name);
            Ok(())
        }
        ModuleCommand::Disable { name } => {
            app.discover()?;
            app.disable_module(&name)?;
            println!("Module '{}' has been disabled", name);
            Ok(())
        }
        ModuleCommand::Register => {
            let loaded = app.bootstrap()?;
            if loaded.is_empty() {
                println!("No modules enabled");
            }
            for name in loaded {
                let module = app.modules().get_module(&name)?;
                let state = if module.is_registered() { "registered" } else { "failed" };
                println!("  - {}: {}", name, state);
            }
            Ok(())
        }
    }
}

fn print_metadata(metadata: &ModuleMetadata, base_dir: &Path) {
    println!("Name:        {}", metadata.name);
    println!("Version:     {}", metadata.version);
    println!("Title:       {}", metadata.title);
    println!("Path:        {}", base_dir.display());
    let lists = [
        ("Depends", &metadata.depends),
        ("Libraries", &metadata.libraries),
        ("Modules", &metadata.modules),
    ];
    for (label, requirements) in lists {
        if requirements.is_empty() {
            continue;
        }
        let rendered: Vec<String> = requirements
            .iter()
            .map(|(name, requirement)| match requirement.constraint() {
                Some(constraint) => format!("{} ({})", name, constraint),
                None => name.to_string(),
            })
            .collect();
        println!("{:<12} {}", format!("{}:", label), rendered.join(", "));
    }
    println!();
    println!("{}", metadata.description);
}

async fn serve(
    app: &Application,
    daemonize: bool,
    document_root: Option<PathBuf>,
    listen_addr: Option<String>,
) -> Result<()> {
    let settings = app.settings();
    let listen_addr = listen_addr.unwrap_or_else(|| settings.server.listen_addr.clone());
    let document_root = document_root.unwrap_or_else(|| settings.document_root());
    if !document_root.is_dir() {
        return Err(Error::Other(format!(
            "Document root directory is required, {} does not exist",
            document_root.display()
        )));
    }
    let document_root = document_root
        .canonicalize()
        .map_err(|e| Error::io(e, "canonicalize", document_root.clone()))?;
    let router = match &settings.server.router_script {
        Some(script) => settings.resolve(script),
        None => document_root.join("index.php"),
    };

    println!("Serving Modula from {}", document_root.display());
    let mut command = Command::new(&settings.server.program);
    command
        .arg("-S")
        .arg(&listen_addr)
        .arg("-t")
        .arg(&document_root)
        .arg(&router);

    let mut child = command
        .spawn()
        .map_err(|e| Error::io(e, "spawn", PathBuf::from(&settings.server.program)))?;

    if daemonize {
        let pid = child
            .id()
            .ok_or_else(|| Error::Other("Web server exited before it could be detached".to_string()))?;
        let pid_file = app.config().app_config_path().join(PID_FILE);
        if let Some(parent) = pid_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(e, "create_dir_all", parent.to_path_buf()))?;
        }
        std::fs::write(&pid_file, pid.to_string()).map_err(|e| Error::io(e, "write", pid_file.clone()))?;
        println!("[OK] Modula web server forked successfully (pid {})", pid);
        return Ok(());
    }

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| Error::io(e, "wait", PathBuf::from(&settings.server.program)))?;
            if !status.success() {
                return Err(Error::Other(format!("Web server exited with {}", status)));
            }
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted, stopping web server");
            child
                .kill()
                .await
                .map_err(|e| Error::io(e, "kill", PathBuf::from(&settings.server.program)))?;
        }
    }
    Ok(())
}

async fn stop(app: &Application) -> Result<()> {
    let pid_file = app.config().app_config_path().join(PID_FILE);
    let pid = match std::fs::read_to_string(&pid_file) {
        Ok(content) => content.trim().to_string(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("No web server running");
            return Ok(());
        }
        Err(e) => return Err(Error::io(e, "read", pid_file)),
    };

    let status = Command::new("kill")
        .arg(&pid)
        .status()
        .await
        .map_err(|e| Error::io(e, "kill", pid_file.clone()))?;
    std::fs::remove_file(&pid_file).map_err(|e| Error::io(e, "remove_file", pid_file.clone()))?;
    if !status.success() {
        return Err(Error::Other(format!("Failed to stop web server with pid {}", pid)));
    }

    println!("Stopped web server with pid {}", pid);
    Ok(())
}
