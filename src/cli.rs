use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// REST Swagger - Generate Swagger documentation from a declared routing table
#[derive(Parser, Debug)]
#[command(name = "rest-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Route manifest file, or a directory of manifests
    #[arg(value_name = "MANIFEST_PATH")]
    pub manifest_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Only document endpoints whose path starts with this prefix
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Print the top-level resources instead of the full document
    #[arg(long = "resources", conflicts_with = "prefix")]
    pub resources: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.exists() {
        anyhow::bail!(
            "Manifest path does not exist: {}",
            args.manifest_path.display()
        );
    }

    info!("Manifest path: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }
    if let Some(prefix) = &args.prefix {
        info!("Path prefix: {}", prefix);
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::docgen::DocumentationGenerator;
    use crate::manifest::load_registry;
    use crate::scanner::ManifestScanner;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

    // Step 1: Find manifests
    info!("Scanning for route manifests...");
    let scan_result = ManifestScanner::new(args.manifest_path.clone()).scan()?;
    for warning in &scan_result.warnings {
        log::warn!("{}", warning);
    }
    if scan_result.manifests.is_empty() {
        anyhow::bail!("No route manifests found under {}", args.manifest_path.display());
    }
    info!("Found {} manifests", scan_result.manifests.len());

    // Step 2: Declare routes
    let registry = load_registry(&scan_result.manifests)?;
    if registry.is_empty() {
        log::warn!("No documentable endpoints declared");
    }

    // Step 3: Generate
    let content = if args.resources {
        let resources = registry.get_top_level_apis();
        info!("Found {} top-level resources", resources.len());
        match args.output_format {
            OutputFormat::Yaml => serialize_yaml(&resources)?,
            OutputFormat::Json => serialize_json(&resources)?,
        }
    } else {
        let apis = registry.get_apis(args.prefix.as_deref());
        info!("Documenting {} endpoints", apis.len());
        let document = DocumentationGenerator::new().document(&apis);
        match args.output_format {
            OutputFormat::Yaml => serialize_yaml(&document)?,
            OutputFormat::Json => serialize_json(&document)?,
        }
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Wrote documentation to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}
