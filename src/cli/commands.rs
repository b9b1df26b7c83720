use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Compile-time function metadata generator for route-registration call sites
#[derive(Parser, Debug)]
#[command(
    name = "fnmeta",
    about = "Generate a function metadata provider from route registration call sites",
    version,
    long_about = "fnmeta scans syntax trees for MapGet/MapPost/MapPut/MapDelete/MapPatch \
                  registrations and emits a metadata provider the functions host loads \
                  at startup instead of indexing functions at runtime."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate the metadata provider source",
        long_about = "Runs a generation pass over the given syntax trees. Nothing is written \
                      when the feature switch is off or no call sites match.\n\n\
                      Examples:\n  \
                      fnmeta generate Program.json --assembly-name Contoso.Api \\\n    \
                      -p build_property.FunctionsEnableMetadataSourceGen=true\n  \
                      fnmeta generate obj/*.json --build-properties props.toml --out-dir obj/gen"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Report discovered functions without generating code",
        long_about = "Scans and extracts regardless of the feature switch and prints the \
                      resulting records and diagnostics.\n\n\
                      Examples:\n  \
                      fnmeta scan Program.json --assembly-name Contoso.Api\n  \
                      fnmeta scan Program.json --assembly-name Contoso.Api --format json"
    )]
    Scan(ScanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "TREE", required = true, help = "Syntax tree JSON files, in compilation order")]
    pub trees: Vec<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Assembly name (overrides build_property.AssemblyName)")]
    pub assembly_name: Option<String>,

    #[arg(long, value_name = "FILE", help = "TOML file of build properties")]
    pub build_properties: Option<PathBuf>,

    #[arg(
        short = 'p',
        long = "property",
        value_name = "KEY=VALUE",
        help = "Build property; repeatable, wins over --build-properties"
    )]
    pub properties: Vec<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write the generated unit into DIR instead of stdout"
    )]
    pub out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[arg(value_name = "TREE", required = true, help = "Syntax tree JSON files, in compilation order")]
    pub trees: Vec<PathBuf>,

    #[arg(long, value_name = "NAME", default_value = "App", help = "Assembly name used for script files")]
    pub assembly_name: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_generate_args() {
        let args = CliArgs::parse_from([
            "fnmeta",
            "generate",
            "a.json",
            "b.json",
            "--assembly-name",
            "Contoso.Api",
            "-p",
            "build_property.FunctionsEnableMetadataSourceGen=true",
            "--out-dir",
            "/tmp/out",
        ]);

        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(generate.trees, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(generate.assembly_name.as_deref(), Some("Contoso.Api"));
                assert_eq!(generate.properties.len(), 1);
                assert_eq!(generate.out_dir, Some(PathBuf::from("/tmp/out")));
                assert!(generate.build_properties.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_requires_tree() {
        assert!(CliArgs::try_parse_from(["fnmeta", "generate"]).is_err());
    }

    #[test]
    fn test_scan_defaults() {
        let args = CliArgs::parse_from(["fnmeta", "scan", "tree.json"]);
        match args.command {
            Commands::Scan(scan) => {
                assert_eq!(scan.format, OutputFormatArg::Human);
                assert_eq!(scan.assembly_name, "App");
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["fnmeta", "-v", "scan", "tree.json"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["fnmeta", "scan", "tree.json", "--log-level", "trace"]);
        assert_eq!(args.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["fnmeta", "-v", "-q", "scan", "tree.json"]).is_err());
    }
}
