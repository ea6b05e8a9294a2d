
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};

use master_registry::model::entity::status_badge;
use master_registry::{
    Catalog, ClientConfig, EntityId, Fields, HttpBackend, ListQuery, Registry, RegistryError, Session,
    SessionContext, Sort, StatusFilter,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid field `{0}`; expected name=value")]
    InvalidField(String),
    #[error("refusing to delete {collection} {id} without --yes")]
    Unconfirmed { collection: String, id: EntityId },
    #[error("master data changes need an admin session (current role: {0})")]
    Forbidden(String),
}

#[derive(Parser, Debug)]
#[command(name = "master-registry", about = "Master data registry CLI")]
struct Cli {
    /// Overrides `REGISTRY_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the known collections and their parent links.
    Collections,
    /// Log in and print the session. The CLI keeps no state between runs:
    /// export the printed `access_token` as `REGISTRY_ACCESS_TOKEN` (and its
    /// `role` as `REGISTRY_ROLE`) for later commands.
    Login {
        #[arg(long, env = "REGISTRY_EMAIL")]
        email: String,
        #[arg(long, env = "REGISTRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    List(ListArgs),
    Stats {
        collection: String,
    },
    Add {
        collection: String,
        label: String,
        #[arg(long)]
        parent: Option<EntityId>,
        #[arg(long)]
        inactive: bool,
        /// Extra backend field, repeatable: `--field category_code=RT`.
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    Edit {
        collection: String,
        id: EntityId,
        label: String,
        #[arg(long)]
        parent: Option<EntityId>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    Toggle {
        collection: String,
        id: EntityId,
    },
    Delete {
        collection: String,
        id: EntityId,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    collection: String,
    #[arg(long)]
    parent: Option<EntityId>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    status: StatusArg,
    /// Equality filter on a backend field, repeatable: `--where branch_state=2`.
    #[arg(long = "where")]
    filters: Vec<String>,
    #[arg(long, value_enum, default_value_t = SortArg::Insertion)]
    sort: SortArg,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long)]
    per_page: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    All,
    Active,
    Inactive,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Insertion,
    Label,
    LabelDesc,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }

    let session = SessionContext::new();
    if let Some(token) = &config.access_token {
        session.begin(Session::from_token(token.clone(), config.token_role)).await;
    }
    if cli.command.mutates() {
        require_admin(&session).await?;
    }
    let backend = Arc::new(HttpBackend::new(&config, session)?);
    let mut registry = Registry::new(backend.clone(), Catalog::masters());

    match cli.command {
        Command::Collections => run_collections(registry.catalog()),
        Command::Login { email, password } => {
            let session = backend.login(&email, &password).await?;
            print_json(&serde_json::to_value(&session)?)?;
            eprintln!("export REGISTRY_ACCESS_TOKEN and REGISTRY_ROLE from the values above to reuse this session");
            Ok(())
        }
        Command::List(args) => run_list(&mut registry, args, config.page_size).await,
        Command::Stats { collection } => {
            registry.load_all(&collection).await?;
            print_json(&serde_json::to_value(registry.stats(&collection)?)?)
        }
        Command::Add { collection, label, parent, inactive, fields } => {
            load_parent(&mut registry, &collection).await?;
            let mut draft = Fields::labeled(label).with_status(!inactive);
            draft.parent = parent;
            draft.extra = parse_pairs(&fields)?;
            let entity = registry.add(&collection, draft).await?;
            print_json(&serde_json::to_value(&entity)?)
        }
        Command::Edit { collection, id, label, parent, status, fields } => {
            load_parent(&mut registry, &collection).await?;
            registry.load_all(&collection).await?;
            let mut draft = Fields::labeled(label);
            draft.parent = parent;
            draft.status = match status {
                Some(StatusArg::Active) => Some(true),
                Some(StatusArg::Inactive) => Some(false),
                Some(StatusArg::All) | None => None,
            };
            draft.extra = parse_pairs(&fields)?;
            let entity = registry.edit(&collection, id, draft).await?;
            print_json(&serde_json::to_value(&entity)?)
        }
        Command::Toggle { collection, id } => {
            registry.load_all(&collection).await?;
            let entity = registry.toggle_status(&collection, id).await?;
            print_json(&json!({ "id": entity.id, "label": entity.label, "status": status_badge(entity.status) }))
        }
        Command::Delete { collection, id, yes } => {
            if !yes {
                return Err(CliError::Unconfirmed { collection, id });
            }
            registry.load_all(&collection).await?;
            registry.remove(&collection, id).await?;
            eprintln!("deleted {collection} {id}");
            Ok(())
        }
    }
}

impl Command {
    fn mutates(&self) -> bool {
        matches!(self, Self::Add { .. } | Self::Edit { .. } | Self::Toggle { .. } | Self::Delete { .. })
    }
}

/// Master screens are admin-only; refuse before any request is sent.
async fn require_admin(session: &SessionContext) -> Result<(), CliError> {
    match session.role().await {
        Some(role) if role.can_manage_masters() => Ok(()),
        Some(role) => Err(CliError::Forbidden(role.to_string())),
        None => Err(CliError::Forbidden("none, set REGISTRY_ACCESS_TOKEN".into())),
    }
}

fn run_collections(catalog: &Catalog) -> Result<(), CliError> {
    let rows: Vec<Value> = catalog
        .iter()
        .map(|schema| {
            json!({
                "key": schema.key,
                "resource": schema.resource,
                "label_field": schema.label_field,
                "parent": schema.parent.as_ref().map(|link| &link.collection),
                "parent_field": schema.parent_field(),
            })
        })
        .collect();
    print_json(&Value::Array(rows))
}

async fn run_list(registry: &mut Registry, args: ListArgs, page_size: usize) -> Result<(), CliError> {
    let collection = args.collection.as_str();
    load_parent(registry, collection).await?;
    registry.load_all(collection).await?;

    let query = ListQuery {
        search: args.search,
        status: match args.status {
            StatusArg::All => StatusFilter::All,
            StatusArg::Active => StatusFilter::Active,
            StatusArg::Inactive => StatusFilter::Inactive,
        },
        parent: args.parent,
        fields: parse_pairs(&args.filters)?.into_iter().collect(),
        sort: match args.sort {
            SortArg::Insertion => Sort::Insertion,
            SortArg::Label => Sort::LabelAsc,
            SortArg::LabelDesc => Sort::LabelDesc,
        },
        page: args.page,
        per_page: args.per_page.unwrap_or(page_size),
    };
    let view = registry.query(collection, &query)?;

    let mut rows = Vec::with_capacity(view.items.len());
    for entity in &view.items {
        rows.push(json!({
            "id": entity.id,
            "label": entity.label,
            "status": status_badge(entity.status),
            "parent": registry.parent_label(collection, entity)?,
        }));
    }
    print_json(&json!({
        "items": rows,
        "page": view.page,
        "total_pages": view.total_pages,
        "showing": format!("{} to {} of {}", view.first, view.last, view.total),
    }))
}

/// Child collections need their parents loaded for labels and parent checks.
async fn load_parent(registry: &mut Registry, collection: &str) -> Result<(), CliError> {
    let parent = registry
        .catalog()
        .get(collection)?
        .parent
        .as_ref()
        .map(|link| link.collection.clone());
    if let Some(parent) = parent {
        registry.load_all(&parent).await?;
    }
    Ok(())
}

/// `name=value` pairs; values parse as JSON when they can, else as strings.
fn parse_pairs(pairs: &[String]) -> Result<Map<String, Value>, CliError> {
    let mut map = Map::new();
    for pair in pairs {
        let Some((name, raw)) = pair.split_once('=') else {
            return Err(CliError::InvalidField(pair.clone()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::InvalidField(pair.clone()));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        map.insert(name.to_owned(), value);
    }
    Ok(map)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
