use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use m2bridge_core::host::TestFramework;
use m2bridge_core::{
    BuildSession, ClassRef, DependencyEdge, ExternalGoalRunner, HostProject, MappingTables,
    MetadataBridge, ModelBuildRequest, MojoRunner, PluginArchiveLoader, PomModelBuilder,
    ProjectModelBuilder, ProjectOutput, ReactorIndex,
};

mod session;

use session::{DryRunSession, SubprocessSession};

/// Projects source build metadata onto host build projects
#[derive(Parser)]
#[command(name = "m2bridge")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a project descriptor into host project metadata
    Translate {
        /// Path to the project descriptor, or a directory containing pom.xml
        descriptor: String,

        /// JSON file overriding the built-in mapping tables
        #[arg(short = 'm', long = "mappings")]
        mappings: Option<String>,

        /// Show verbose JSON output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,

        /// Do not rebuild referenced projects before use
        #[arg(long = "no-rebuild")]
        no_rebuild: bool,
    },
    /// List the goals a packaged plugin archive provides
    Inspect {
        /// Path to the plugin archive
        archive: String,

        /// Show verbose JSON output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Execute a single plugin goal
    RunGoal(RunGoalArgs),
}

#[derive(Parser)]
struct RunGoalArgs {
    /// Goal name to execute
    goal: String,

    /// Fully qualified class the plugin resolves to
    #[arg(long = "class")]
    class: String,

    /// Class location URL (jar:file:/path/plugin.jar!/com/example/Mojo.class)
    #[arg(long = "location")]
    location: Option<String>,

    /// Plugin archive on disk, as an alternative to --location
    #[arg(long = "archive")]
    archive: Option<String>,

    /// Execution id recorded with the goal run
    #[arg(long = "execution-id", default_value = "default-cli")]
    execution_id: String,

    /// Show the container protocol without executing
    #[arg(short = 'd', long = "dry-run")]
    dry_run: bool,

    /// Launcher program that owns the execution container
    #[arg(long = "launcher", default_value = "mojo-launcher")]
    launcher: String,
}

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Translate {
            descriptor,
            mappings,
            verbose,
            no_rebuild,
        } => translate_command(&descriptor, mappings.as_deref(), verbose, no_rebuild),
        Commands::Inspect { archive, verbose } => inspect_command(&archive, verbose),
        Commands::RunGoal(args) => run_goal_command(&args),
    }
}

fn translate_command(
    descriptor_arg: &str,
    mappings: Option<&str>,
    verbose: bool,
    no_rebuild: bool,
) -> Result<()> {
    let descriptor = resolve_descriptor(descriptor_arg)?;
    debug!("Translating descriptor: {}", descriptor.display());

    let tables = load_tables(mappings)?;
    let builder = PomModelBuilder::new();

    // The entry descriptor is held to strict validation; reactor discovery
    // itself runs relaxed so partial sibling modules stay indexable.
    builder
        .build(&ModelBuildRequest::new(&descriptor))
        .with_context(|| format!("Failed to build project model from {}", descriptor.display()))?;

    let reactor = ReactorIndex::discover(&builder, &descriptor)
        .with_context(|| format!("Failed to discover reactor from {}", descriptor.display()))?;

    let bridge = MetadataBridge::new(&tables, &reactor);
    let mut session = bridge.prepare_session(!no_rebuild);
    bridge
        .configure_all(&mut session)
        .context("Failed to configure host projects")?;

    if verbose {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    print_session(&session);
    Ok(())
}

fn resolve_descriptor(descriptor_arg: &str) -> Result<PathBuf> {
    let path = PathBuf::from(descriptor_arg);
    let descriptor = if path.is_dir() {
        path.join("pom.xml")
    } else {
        path
    };
    if !descriptor.exists() {
        bail!("Descriptor not found: {}", descriptor.display());
    }
    Ok(descriptor)
}

fn load_tables(mappings: Option<&str>) -> Result<MappingTables> {
    match mappings {
        Some(path) => {
            debug!("Loading mapping tables from: {}", path);
            MappingTables::from_file(Path::new(path))
                .with_context(|| format!("Failed to load mapping tables from {path}"))
        }
        None => Ok(MappingTables::standard()),
    }
}

fn print_session(session: &BuildSession) {
    println!("🔍 Translated {} project(s)", session.len());
    println!("{}", "=".repeat(80));

    for (index, (_, project)) in session.projects().enumerate() {
        if index > 0 {
            println!();
        }
        print_project(project, session);
    }

    let edges: usize = session
        .projects()
        .map(|(_, project)| {
            project
                .graph
                .configurations()
                .map(|configuration| configuration.edges.len())
                .sum::<usize>()
        })
        .sum();
    println!("\n✅ Translation complete!");
    println!("   • {} project(s)", session.len());
    println!("   • {} dependency edge(s)", edges);

    println!("\n{}", "=".repeat(80));
}

fn print_project(project: &HostProject, session: &BuildSession) {
    println!("📦 {}", project_label(project));
    println!("   📁 Dir: {}", project.dir.display());
    if let Some(status) = &project.status {
        println!("   🏷️  Status: {status}");
    }

    if let Some(java) = &project.java {
        let framework = match java.test_framework {
            TestFramework::JUnit => "JUnit",
            TestFramework::TestNg => "TestNG",
        };
        println!("   🧪 Test framework: {framework}");
        if let Some(source) = &java.source_compatibility {
            println!("   📏 Source compatibility: {source}");
        }
        if let Some(target) = &java.target_compatibility {
            println!("   📏 Target compatibility: {target}");
        }
    } else {
        println!("   📄 No build plugin applied");
    }

    for configuration in project.graph.configurations() {
        if configuration.edges.is_empty() {
            continue;
        }
        println!("   🔧 Configuration '{}':", configuration.name);
        for edge in &configuration.edges {
            println!("      • {}", describe_edge(edge, session));
        }
    }

    if !project.tasks.is_empty() {
        println!("   🎯 Tasks:");
        for task in &project.tasks {
            println!("      • {} ({})", task.name, task.task_type);
        }
    }
}

fn project_label(project: &HostProject) -> String {
    match (&project.group, &project.version) {
        (Some(group), Some(version)) => format!("{}:{}:{}", group, project.name, version),
        _ => project.name.clone(),
    }
}

fn describe_edge(edge: &DependencyEdge, session: &BuildSession) -> String {
    match edge {
        DependencyEdge::ExternalModule {
            coordinate,
            exclusions,
        } => {
            if exclusions.is_empty() {
                coordinate.to_string()
            } else {
                format!("{} ({} exclusion(s))", coordinate, exclusions.len())
            }
        }
        DependencyEdge::ProjectReference {
            project, output, ..
        } => {
            let name = &session.project(*project).name;
            match output {
                ProjectOutput::TestClasses => format!("project '{name}' (test classes)"),
                ProjectOutput::PackagedArtifact {
                    target_configuration,
                } => format!("project '{name}' (configuration '{target_configuration}')"),
            }
        }
    }
}

fn inspect_command(archive_arg: &str, verbose: bool) -> Result<()> {
    let archive = PathBuf::from(archive_arg);
    debug!("Inspecting plugin archive: {}", archive.display());

    let descriptor = PluginArchiveLoader::new()
        .load_from_archive(&archive)
        .with_context(|| format!("Failed to read plugin descriptor from {}", archive.display()))?;

    if verbose {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("🔍 Plugin: {}", descriptor.coordinate);
    if let Some(prefix) = &descriptor.goal_prefix {
        println!("   🏷️  Goal prefix: {prefix}");
    }
    println!("{}", "=".repeat(80));

    if descriptor.mojos.is_empty() {
        println!("\n❌ No goals declared in this plugin.");
    } else {
        println!("\n✅ Found {} goal(s):\n", descriptor.mojos.len());
        for (i, mojo) in descriptor.mojos.iter().enumerate() {
            println!("{}. {}", i + 1, mojo.goal);
            println!("   📦 Implementation: {}", mojo.implementation);
            println!("   🏷️  Role hint: {}", mojo.role_hint);
            if let Some(configurator) = &mojo.configurator {
                println!("   🔧 Configurator: {configurator}");
            }
            if !mojo.parameters.is_empty() {
                println!("   📏 Parameters:");
                for parameter in &mojo.parameters {
                    let mut line = parameter.name.clone();
                    if let Some(expression) = &parameter.expression {
                        line.push_str(&format!(" = {expression}"));
                    }
                    if let Some(default) = &parameter.default_value {
                        line.push_str(&format!(" (default: {default})"));
                    }
                    println!("      • {line}");
                }
            }
            if i < descriptor.mojos.len() - 1 {
                println!();
            }
        }
    }

    println!("\n{}", "=".repeat(80));
    Ok(())
}

fn run_goal_command(args: &RunGoalArgs) -> Result<()> {
    let class_ref = match (&args.location, &args.archive) {
        (Some(location), None) => ClassRef::new(&args.class, location),
        (None, Some(archive)) => ClassRef::from_archive(&args.class, Path::new(archive)),
        (Some(_), Some(_)) => bail!("--location and --archive are mutually exclusive"),
        (None, None) => bail!("one of --location or --archive is required"),
    };
    debug!(
        "Running goal '{}' from class {} at {}",
        args.goal, class_ref.class, class_ref.location
    );

    if args.dry_run {
        let mut runner = MojoRunner::new(DryRunSession::default());
        runner
            .run(&class_ref, &args.goal, &args.execution_id)
            .with_context(|| format!("Failed to prepare goal '{}'", args.goal))?;
        let session = runner.into_session();

        println!("🔍 Dry run: goal '{}'", args.goal);
        println!("{}", "=".repeat(80));
        for call in &session.calls {
            println!("   • {call}");
        }
        if let Some(execution) = &session.execution {
            println!("\n🔧 Configuration:");
            println!("{}", execution.configuration);
        }
        println!("\n{}", "=".repeat(80));
        return Ok(());
    }

    println!("🚀 Executing goal '{}'", args.goal);
    let mut runner = MojoRunner::new(SubprocessSession::new(&args.launcher));
    runner
        .run(&class_ref, &args.goal, &args.execution_id)
        .with_context(|| format!("Failed to execute goal '{}'", args.goal))?;
    println!("✅ Goal '{}' finished", args.goal);
    Ok(())
}
