//! Command-line surface: one subcommand per page or backend operation.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::api::{CausePathParams, DictionaryEntry, DictionaryQuery, FlowQueryParams};
use crate::explorer::Explorer;
use crate::router::{self, ROUTES};
use crate::store::QueryKind;

/// Explore the quality knowledge graph from the terminal.
#[derive(Parser, Debug)]
#[command(name = "kg-explorer", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check backend health
    Health,

    /// Upload a document for extraction
    Upload {
        /// File to upload
        path: PathBuf,
    },

    /// List uploaded files
    Files,

    /// Extract entities and relations from an uploaded file
    Extract { filename: String },

    /// Build the graph from an extracted file
    Build { filename: String },

    /// Show graph statistics
    Stats,

    /// List entities
    Entities {
        #[arg(long = "type")]
        entity_type: Option<String>,
        #[arg(long, default_value = "100")]
        limit: u32,
    },

    /// List relations
    Relations {
        #[arg(long = "type")]
        relation_type: Option<String>,
        #[arg(long, default_value = "100")]
        limit: u32,
    },

    /// Run a Cypher query
    Query {
        cypher: String,
        /// Query parameters as a JSON object
        #[arg(long)]
        params: Option<String>,
    },

    /// Fetch nodes and links for the graph view
    Graph {
        #[arg(long, default_value = "100")]
        node_limit: u32,
        #[arg(long)]
        no_relations: bool,
    },

    /// Delete every node and relation
    Clear,

    /// List products
    Products,

    /// List a product's components
    Components { product: String },

    /// Look up test flow items for a product module
    Flow { product: String, module: String },

    /// Look up cause paths for a symptom
    Cause { symptom: String },

    /// Show or clear recent queries
    History {
        /// Clear the history of the given kind (flow or cause)
        #[arg(long)]
        clear: Option<String>,
    },

    /// Dictionary management
    #[command(subcommand)]
    Dictionary(DictionaryCommand),

    /// System management
    #[command(subcommand)]
    System(SystemCommand),

    /// List pages, or resolve one path to its title
    Routes { path: Option<String> },
}

/// Dictionary subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DictionaryCommand {
    /// List entries
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// List categories
    Categories,
    /// Show statistics
    Statistics,
    /// Add an entry
    Add(EntryArgs),
    /// Replace an entry
    Update {
        id: String,
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Delete an entry
    Delete { id: String },
}

/// Fields of a dictionary entry.
#[derive(Args, Debug, Clone)]
pub struct EntryArgs {
    pub term: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub sub_category: Option<String>,
    #[arg(long = "alias")]
    pub aliases: Vec<String>,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl From<EntryArgs> for DictionaryEntry {
    fn from(args: EntryArgs) -> Self {
        DictionaryEntry {
            term: args.term,
            category: args.category,
            sub_category: args.sub_category,
            aliases: args.aliases,
            tags: args.tags,
            description: args.description,
            source: None,
            status: None,
        }
    }
}

/// System management subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SystemCommand {
    /// Show system status
    Status,
    /// List rules
    Rules,
    /// Create a rule from a JSON object
    CreateRule { rule: String },
    /// Replace a rule with a JSON object
    UpdateRule { id: String, rule: String },
    /// Delete a rule
    DeleteRule { id: String },
    /// Test a rule against JSON sample data
    TestRule { data: String },
    /// List prompts
    Prompts,
    /// List scenarios
    Scenarios,
    /// List versions
    Versions,
    /// Publish a version described by a JSON object
    Publish { version: String },
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }

    fn json<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => Self::success(text),
                Err(e) => Self::error(format!("Failed to render output: {}", e)),
            },
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Execute a CLI command.
pub async fn execute_command(command: Command, explorer: &Explorer) -> CliResult {
    let api = explorer.api();
    match command {
        Command::Health => CliResult::json(api.health_check().await),
        Command::Upload { path } => {
            let bytes = match tokio::fs::read(&path).await {
                Ok(b) => b,
                Err(e) => {
                    return CliResult::error(format!("Cannot read {}: {}", path.display(), e))
                }
            };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            CliResult::json(api.upload_file(&name, bytes).await)
        }
        Command::Files => CliResult::json(api.list_files().await),
        Command::Extract { filename } => CliResult::json(api.extract_file(&filename).await),
        Command::Build { filename } => CliResult::json(api.build_graph(&filename).await),
        Command::Stats => CliResult::json(api.graph_stats().await),
        Command::Entities { entity_type, limit } => {
            CliResult::json(api.list_entities(entity_type.as_deref(), limit).await)
        }
        Command::Relations {
            relation_type,
            limit,
        } => CliResult::json(api.list_relations(relation_type.as_deref(), limit).await),
        Command::Query { cypher, params } => {
            let params = match params.as_deref().map(parse_object).transpose() {
                Ok(p) => p.unwrap_or_default(),
                Err(message) => return CliResult::error(message),
            };
            CliResult::json(api.query_graph(&cypher, params).await)
        }
        Command::Graph {
            node_limit,
            no_relations,
        } => CliResult::json(api.graph_data(node_limit, !no_relations).await),
        Command::Clear => CliResult::json(api.clear_graph().await),
        Command::Products => CliResult::json(api.list_products().await),
        Command::Components { product } => {
            CliResult::json(api.product_components(&product).await)
        }
        Command::Flow { product, module } => CliResult::json(
            explorer
                .search_flow(FlowQueryParams::new(product, module))
                .await,
        ),
        Command::Cause { symptom } => CliResult::json(
            explorer
                .search_cause_path(CausePathParams::new(symptom))
                .await,
        ),
        Command::History { clear } => execute_history(explorer, clear).await,
        Command::Dictionary(cmd) => execute_dictionary(cmd, explorer).await,
        Command::System(cmd) => execute_system(cmd, explorer).await,
        Command::Routes { path } => execute_routes(path),
    }
}

async fn execute_history(explorer: &Explorer, clear: Option<String>) -> CliResult {
    let store = explorer.store();
    if let Some(kind) = clear {
        let kind = match kind.to_lowercase().as_str() {
            "flow" => QueryKind::Flow,
            "cause" => QueryKind::Cause,
            other => return CliResult::error(format!("Unknown history kind: {}", other)),
        };
        store.clear_history(kind).await;
    }

    let mut output = String::new();
    output.push_str("Recent flow queries:\n");
    for q in store.recent_flow_queries() {
        output.push_str(&format!("  {} / {}\n", q.product, q.module));
    }
    output.push_str("Recent cause queries:\n");
    for q in store.recent_cause_queries() {
        output.push_str(&format!("  {}\n", q.symptom));
    }
    CliResult::success(output)
}

async fn execute_dictionary(command: DictionaryCommand, explorer: &Explorer) -> CliResult {
    let api = explorer.api();
    match command {
        DictionaryCommand::List {
            category,
            search,
            page,
            page_size,
        } => {
            let query = DictionaryQuery {
                category,
                search,
                page,
                page_size,
            };
            CliResult::json(api.list_dictionary(&query).await)
        }
        DictionaryCommand::Categories => CliResult::json(api.dictionary_categories().await),
        DictionaryCommand::Statistics => CliResult::json(api.dictionary_statistics().await),
        DictionaryCommand::Add(entry) => {
            CliResult::json(api.create_dictionary_entry(&entry.into()).await)
        }
        DictionaryCommand::Update { id, entry } => {
            CliResult::json(api.update_dictionary_entry(&id, &entry.into()).await)
        }
        DictionaryCommand::Delete { id } => CliResult::json(api.delete_dictionary_entry(&id).await),
    }
}

async fn execute_system(command: SystemCommand, explorer: &Explorer) -> CliResult {
    let api = explorer.api();
    match command {
        SystemCommand::Status => CliResult::json(api.system_status().await),
        SystemCommand::Rules => CliResult::json(api.list_rules().await),
        SystemCommand::CreateRule { rule } => match parse_json(&rule) {
            Ok(rule) => CliResult::json(api.create_rule(rule).await),
            Err(message) => CliResult::error(message),
        },
        SystemCommand::UpdateRule { id, rule } => match parse_json(&rule) {
            Ok(rule) => CliResult::json(api.update_rule(&id, rule).await),
            Err(message) => CliResult::error(message),
        },
        SystemCommand::DeleteRule { id } => CliResult::json(api.delete_rule(&id).await),
        SystemCommand::TestRule { data } => match parse_json(&data) {
            Ok(data) => CliResult::json(api.test_rule(data).await),
            Err(message) => CliResult::error(message),
        },
        SystemCommand::Prompts => CliResult::json(api.list_prompts().await),
        SystemCommand::Scenarios => CliResult::json(api.list_scenarios().await),
        SystemCommand::Versions => CliResult::json(api.list_versions().await),
        SystemCommand::Publish { version } => match parse_json(&version) {
            Ok(version) => CliResult::json(api.publish_version(version).await),
            Err(message) => CliResult::error(message),
        },
    }
}

fn execute_routes(path: Option<String>) -> CliResult {
    match path {
        Some(path) => match router::resolve(&path) {
            Some(route) => CliResult::success(route.document_title()),
            None => CliResult::error(format!("No route for {}", path)),
        },
        None => {
            let mut output = String::new();
            for route in ROUTES {
                output.push_str(&format!(
                    "{:<20} {:<22} {}\n",
                    route.path,
                    route.name,
                    route.document_title()
                ));
            }
            CliResult::success(output)
        }
    }
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("Invalid JSON argument: {}", e))
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, String> {
    match parse_json(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err("Query parameters must be a JSON object".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::KgApi;
    use crate::mock::MockProvider;
    use crate::storage::MemoryStorage;
    use crate::store::QueryStore;
    use std::sync::Arc;

    async fn explorer() -> Explorer {
        let store = QueryStore::load(Arc::new(MemoryStorage::new())).await;
        Explorer::new(KgApi::mock(MockProvider::instant()), Arc::new(store))
    }

    #[test]
    fn test_parse_cli_args() {
        let cli = Cli::try_parse_from(["kg-explorer", "flow", "X1", "camera"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Flow { ref product, ref module } if product == "X1" && module == "camera"
        ));

        let cli = Cli::try_parse_from([
            "kg-explorer",
            "dictionary",
            "add",
            "CPU",
            "--category",
            "硬件组件",
            "--alias",
            "处理器",
            "--alias",
            "中央处理器",
        ])
        .unwrap();
        match cli.command {
            Command::Dictionary(DictionaryCommand::Add(entry)) => {
                assert_eq!(entry.aliases, vec!["处理器", "中央处理器"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_object_rejects_non_objects() {
        assert!(parse_object(r#"{"a": 1}"#).is_ok());
        assert!(parse_object("[1]").is_err());
        assert!(parse_object("{").is_err());
    }

    #[tokio::test]
    async fn test_history_command_lists_queries() {
        let explorer = explorer().await;
        execute_command(
            Command::Flow {
                product: "X1".to_string(),
                module: "camera".to_string(),
            },
            &explorer,
        )
        .await;

        let result = execute_command(Command::History { clear: None }, &explorer).await;
        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("X1 / camera"));

        let result = execute_command(
            Command::History {
                clear: Some("flow".to_string()),
            },
            &explorer,
        )
        .await;
        assert!(!result.message.contains("X1 / camera"));
    }

    #[tokio::test]
    async fn test_routes_command() {
        let result = execute_routes(Some("/graph".to_string()));
        assert_eq!(result.message, "知识图谱 - 质量知识图谱助手");

        let result = execute_routes(Some("/nope".to_string()));
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn test_system_command_rejects_bad_json() {
        let explorer = explorer().await;
        let result = execute_command(
            Command::System(SystemCommand::CreateRule {
                rule: "{bad".to_string(),
            }),
            &explorer,
        )
        .await;
        assert_eq!(result.exit_code, 1);
        assert!(result.message.starts_with("Invalid JSON argument"));
    }
}
