use std::path::PathBuf;

use clap::{Parser, Subcommand};

use locale_gateway::config::loader::load_config;
use locale_gateway::config::validation::build_routing;
use locale_gateway::routing::pathnames::PatternSet;
use locale_gateway::routing::pattern::Params;
use locale_gateway::routing::{NavigationBuilder, RequestPlanner};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Inspection CLI for the locale gateway", long_about = None)]
struct Cli {
    /// Path to the gateway configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the compiled route table
    Check,
    /// Print the routing directive for a request path
    Resolve {
        /// Request path, e.g. "/de/pfadnamen"
        path: String,

        /// Locale cookie value sent with the request
        #[arg(long)]
        cookie: Option<String>,

        /// Accept-Language header sent with the request
        #[arg(long)]
        accept_language: Option<String>,
    },
    /// Build the outgoing path for a canonical route
    BuildPath {
        /// Canonical route id, e.g. "/news/:id"
        route: String,

        /// Target locale code
        locale: String,

        /// Parameter bindings as name=value, repeatable
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid parameter '{raw}', expected name=value"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let (registry, table) = build_routing(&config)?;

    match cli.command {
        Commands::Check => {
            println!(
                "locales: {} (default {})",
                config.locales.supported.join(", "),
                config.locales.default
            );
            println!("routes: {}", table.len());
            for entry in table.entries() {
                match entry.patterns() {
                    PatternSet::Uniform(pattern) => {
                        println!("  {}  =>  {}", entry.canonical_id(), pattern.raw());
                    }
                    PatternSet::PerLocale(_) => {
                        println!("  {}  =>", entry.canonical_id());
                        for locale in registry.supported() {
                            println!(
                                "      {}: {}",
                                locale,
                                entry.pattern_for(locale).raw()
                            );
                        }
                    }
                }
            }
        }
        Commands::Resolve {
            path,
            cookie,
            accept_language,
        } => {
            let planner = RequestPlanner::new(registry, table);
            let directive = planner.plan(&path, cookie.as_deref(), accept_language.as_deref());
            println!("{}", serde_json::to_string_pretty(&directive)?);
        }
        Commands::BuildPath {
            route,
            locale,
            params,
        } => {
            let navigation = NavigationBuilder::new(registry, table);
            let params: Params = params.into_iter().collect();
            let path = navigation.build_path(&route, &locale, &params)?;
            println!("{path}");
        }
    }

    Ok(())
}
