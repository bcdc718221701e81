//! graphdesk — terminal console for a linked-data platform backend
//!
//! Browses and edits the typed objects of a space/graph over the backend's
//! JSON-LD REST API: windowed listings, in-memory search, and a
//! create/edit/delete lifecycle per object.

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use graphdesk_core::adapter::ApiAdapter;
use graphdesk_core::config::{CollectionConfig, ConsoleConfig};
use graphdesk_core::naming::{format_timestamp, local_name};
use graphdesk_core::normalize;
use graphdesk_core::pagination::{ClientSlice, ServerWindow};
use graphdesk_core::transport::HttpTransport;
use graphdesk_core::types::{Entity, GraphContext};
use graphdesk_core::view_model::{EntityViewModel, Navigation, PropertyField};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "graphdesk";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How many rows the one-shot fetch of `search` may pull.
const SEARCH_FETCH_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq)]
enum Action {
    List {
        collection: String,
    },
    Search {
        collection: String,
        term: String,
    },
    Show {
        collection: String,
        id: String,
    },
    Create {
        collection: String,
        props: Vec<(String, String)>,
    },
    Edit {
        collection: String,
        id: String,
        sets: Vec<(String, String)>,
        removals: Vec<String>,
    },
    Delete {
        collection: String,
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    action: Action,
    space: Option<String>,
    graph: Option<String>,
    config: Option<String>,
    page: usize,
    page_size: Option<usize>,
    filter: Option<String>,
}

enum CliCommand {
    Run(CliOptions),
    Help,
    Version,
}

fn parse_arguments(args: &[String]) -> Result<CliCommand> {
    if args.is_empty() {
        return Ok(CliCommand::Help);
    }

    let mut positional: Vec<String> = Vec::new();
    let mut space = None;
    let mut graph = None;
    let mut config = None;
    let mut page = 1usize;
    let mut page_size = None;
    let mut filter = None;
    let mut props: Vec<(String, String)> = Vec::new();
    let mut sets: Vec<(String, String)> = Vec::new();
    let mut removals: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if matches!(arg.as_str(), "-h" | "--help") {
            return Ok(CliCommand::Help);
        }
        if matches!(arg.as_str(), "-v" | "--version") {
            return Ok(CliCommand::Version);
        }

        let mut take_value = |name: &str| -> Result<String> {
            let value = args
                .get(i + 1)
                .ok_or_else(|| anyhow!("{name} requires a value"))?;
            i += 1;
            Ok(value.clone())
        };

        match arg.as_str() {
            "--space" => space = Some(take_value("--space")?),
            "--graph" => graph = Some(take_value("--graph")?),
            "--config" => config = Some(take_value("--config")?),
            "--page" => {
                page = take_value("--page")?
                    .parse()
                    .context("--page must be a number")?;
            }
            "--page-size" => {
                page_size = Some(
                    take_value("--page-size")?
                        .parse()
                        .context("--page-size must be a number")?,
                );
            }
            "--filter" => filter = Some(take_value("--filter")?),
            "--prop" => props.push(split_pair(&take_value("--prop")?)?),
            "--set" => sets.push(split_pair(&take_value("--set")?)?),
            "--rm" => removals.push(take_value("--rm")?),
            other if other.starts_with('-') => bail!("unknown option: {other}"),
            _ => positional.push(arg.clone()),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    let verb = positional
        .next()
        .ok_or_else(|| anyhow!("missing command"))?;
    let mut required = |name: &str| -> Result<String> {
        positional
            .next()
            .ok_or_else(|| anyhow!("{verb} requires {name}"))
    };

    let action = match verb.as_str() {
        "list" => Action::List {
            collection: required("a collection")?,
        },
        "search" => Action::Search {
            collection: required("a collection")?,
            term: required("a search term")?,
        },
        "show" => Action::Show {
            collection: required("a collection")?,
            id: required("an object id")?,
        },
        "create" => Action::Create {
            collection: required("a collection")?,
            props,
        },
        "edit" => Action::Edit {
            collection: required("a collection")?,
            id: required("an object id")?,
            sets,
            removals,
        },
        "delete" => Action::Delete {
            collection: required("a collection")?,
            id: required("an object id")?,
        },
        other => bail!("unknown command: {other}"),
    };

    Ok(CliCommand::Run(CliOptions {
        action,
        space,
        graph,
        config,
        page,
        page_size,
        filter,
    }))
}

fn split_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("expected predicate=value, got: {raw}"),
    }
}

fn print_help() {
    println!("{APP_NAME} — console for a linked-data platform backend\n");
    println!("Usage: {APP_NAME} [OPTIONS] <COMMAND>\n");
    println!("Commands:");
    println!("  list <collection>                windowed listing of a collection");
    println!("  search <collection> <term>       fetch once, filter and page in memory");
    println!("  show <collection> <id>           fetch and render one object");
    println!("  create <collection> --prop P=V   create an object from property pairs");
    println!("  edit <collection> <id> --set P=V --rm P");
    println!("  delete <collection> <id>\n");
    println!("Options:");
    println!("  --space <id>        owning space (required)");
    println!("  --graph <id>        owning graph, percent-encoded as in routes (required)");
    println!("  --config <path>     TOML config file (defaults to built-in collections)");
    println!("  --page <n>          page to display (default 1)");
    println!("  --page-size <n>     rows per page (default from config)");
    println!("  --filter <term>     filter term for list");
    println!("  -h, --help          show this help");
    println!("  -v, --version       show the version");
}

fn print_version() {
    println!("{APP_NAME} {VERSION}");
}

fn render_entity(entity: &Entity) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# {} ({:?})\n",
        local_name(&entity.object_uri),
        entity.object_kind
    ));
    out.push_str(&format!("URI          : {}\n", entity.object_uri));
    out.push_str(&format!("Type         : {}\n", entity.rdf_type));
    out.push_str(&format!(
        "Created      : {}\n",
        format_timestamp(&entity.created_time)
    ));
    out.push_str(&format!(
        "Modified     : {}\n",
        format_timestamp(&entity.last_modified)
    ));
    out.push_str(&format!("Properties   : {}\n\n", entity.property_count));

    if !entity.properties.is_empty() {
        out.push_str("| Predicate | Value | Kind |\n");
        out.push_str("| --------- | ----- | ---- |\n");
        for property in &entity.properties {
            out.push_str(&format!(
                "| {} | {} | {:?} |\n",
                property.predicate, property.object, property.kind
            ));
        }
    }
    out
}

fn render_rows(rows: &[Entity]) -> String {
    let mut out = String::new();
    out.push_str("| Name | Type | Kind | Modified |\n");
    out.push_str("| ---- | ---- | ---- | -------- |\n");
    for entity in rows {
        out.push_str(&format!(
            "| {} | {} | {:?} | {} |\n",
            local_name(&entity.object_uri),
            local_name(&entity.rdf_type),
            entity.object_kind,
            format_timestamp(&entity.last_modified)
        ));
    }
    out
}

/// Matcher for in-memory search: URI, type and every property value count.
fn entity_matches(entity: &Entity, term: &str) -> bool {
    let needle = term.to_lowercase();
    entity.object_uri.to_lowercase().contains(&needle)
        || entity.rdf_type.to_lowercase().contains(&needle)
        || entity.properties.iter().any(|p| {
            p.predicate.to_lowercase().contains(&needle)
                || p.object.to_lowercase().contains(&needle)
        })
}

struct Console {
    config: ConsoleConfig,
    adapter: ApiAdapter<HttpTransport>,
    ctx: GraphContext,
}

impl Console {
    fn collection<'a>(&'a self, name: &str) -> Result<&'a CollectionConfig> {
        self.config.collection(name).ok_or_else(|| {
            let known: Vec<&str> = self
                .config
                .collections
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            anyhow!("unknown collection: {name} (known: {})", known.join(", "))
        })
    }

    fn view_model(
        &self,
        collection: &CollectionConfig,
        route_id: &str,
    ) -> Result<EntityViewModel<HttpTransport>> {
        let transport = HttpTransport::new(&self.config.backend.base_url)?;
        Ok(EntityViewModel::new(
            ApiAdapter::new(transport),
            collection.endpoint(),
            self.ctx.clone(),
            collection.type_name.clone(),
            route_id,
        ))
    }

    async fn list(&self, name: &str, options: &CliOptions) -> Result<()> {
        let collection = self.collection(name)?;
        let mut window = ServerWindow::new(
            options.page_size.unwrap_or(self.config.ui.page_size),
        );
        if let Some(term) = &options.filter {
            window.set_filter(term.clone());
        }
        if options.page > 1 {
            window.set_page(options.page);
        }

        let payload = self
            .adapter
            .list(
                &collection.endpoint(),
                &self.ctx,
                window.page_size(),
                window.offset(),
            )
            .await?;
        let mut rows = normalize::normalize_collection(&payload, name, &self.ctx);
        window.record_rows(rows.len());
        if !window.filter().is_empty() {
            rows.retain(|entity| entity_matches(entity, window.filter()));
        }

        print!("{}", render_rows(&rows));
        println!(
            "\npage {} · {} row(s){}",
            window.page(),
            rows.len(),
            if window.more_pages_likely() {
                " · more pages likely"
            } else {
                ""
            }
        );
        Ok(())
    }

    async fn search(&self, name: &str, term: &str, options: &CliOptions) -> Result<()> {
        let collection = self.collection(name)?;
        let payload = self
            .adapter
            .list(&collection.endpoint(), &self.ctx, SEARCH_FETCH_LIMIT, 0)
            .await?;
        let rows = normalize::normalize_collection(&payload, name, &self.ctx);

        let mut slice = ClientSlice::new(
            rows,
            options.page_size.unwrap_or(self.config.ui.page_size),
            entity_matches,
        );
        slice.set_filter(term.to_string());
        slice.set_page(options.page);

        print!("{}", render_rows(slice.page_items()));
        println!(
            "\npage {}/{} · {} of {} row(s) match",
            slice.page(),
            slice.total_pages().max(1),
            slice.filtered_count(),
            slice.total_count()
        );
        Ok(())
    }

    async fn show(&self, name: &str, id: &str) -> Result<()> {
        let collection = self.collection(name)?;
        let mut page = self.view_model(collection, id)?;
        page.mount().await;
        if let Some(message) = page.error() {
            bail!("{message}");
        }
        let entity = page
            .entity()
            .ok_or_else(|| anyhow!("{} not found", collection.type_name))?;
        print!("{}", render_entity(entity));
        Ok(())
    }

    async fn create(&self, name: &str, props: &[(String, String)]) -> Result<()> {
        let collection = self.collection(name)?;
        let mut page = self.view_model(collection, "new")?;
        page.mount().await;

        for (predicate, value) in props {
            page.draft_mut().predicate = predicate.clone();
            page.draft_mut().value = value.clone();
            page.add_property()?;
        }

        match page.save().await? {
            Some(Navigation::ToCollection) => {
                println!("{} created", collection.type_name);
                Ok(())
            }
            None => bail!(
                "{}",
                page.error().unwrap_or("create did not complete")
            ),
        }
    }

    async fn edit(
        &self,
        name: &str,
        id: &str,
        sets: &[(String, String)],
        removals: &[String],
    ) -> Result<()> {
        let collection = self.collection(name)?;
        let mut page = self.view_model(collection, id)?;
        page.mount().await;
        if let Some(message) = page.error() {
            bail!("{message}");
        }
        page.edit()?;

        // Rows are addressed by predicate; with a multi-valued predicate the
        // first row wins, as on the editing pages this console mirrors.
        for (predicate, value) in sets {
            let index = page
                .entity()
                .and_then(|e| e.properties.iter().position(|p| &p.predicate == predicate));
            match index {
                Some(index) => page.update_property(index, PropertyField::Object, value),
                None => {
                    page.draft_mut().predicate = predicate.clone();
                    page.draft_mut().value = value.clone();
                    page.add_property()?;
                }
            }
        }
        for predicate in removals {
            if let Some(index) = page
                .entity()
                .and_then(|e| e.properties.iter().position(|p| &p.predicate == predicate))
            {
                page.remove_property(index);
            }
        }

        page.save().await?;
        match page.error() {
            Some(message) => bail!("{message}"),
            None => {
                println!("{} saved", collection.type_name);
                Ok(())
            }
        }
    }

    async fn delete(&self, name: &str, id: &str) -> Result<()> {
        let collection = self.collection(name)?;
        let mut page = self.view_model(collection, id)?;
        page.mount().await;
        if let Some(message) = page.error() {
            bail!("{message}");
        }

        match page.delete().await? {
            Some(Navigation::ToCollection) => {
                println!("{} deleted", collection.type_name);
                Ok(())
            }
            None => bail!("{}", page.error().unwrap_or("delete did not complete")),
        }
    }
}

async fn run(options: CliOptions) -> Result<()> {
    let config = match options.config.as_deref() {
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => ConsoleConfig::default(),
    };
    debug!(backend = %config.backend.base_url, "console configured");

    let space = options
        .space
        .clone()
        .ok_or_else(|| anyhow!("--space is required"))?;
    let graph = options
        .graph
        .clone()
        .ok_or_else(|| anyhow!("--graph is required"))?;
    let ctx = GraphContext::new(space, graph);

    let transport = HttpTransport::new(&config.backend.base_url)?;
    let console = Console {
        adapter: ApiAdapter::new(transport),
        config,
        ctx,
    };

    match &options.action {
        Action::List { collection } => console.list(collection, &options).await,
        Action::Search { collection, term } => console.search(collection, term, &options).await,
        Action::Show { collection, id } => console.show(collection, id).await,
        Action::Create { collection, props } => console.create(collection, props).await,
        Action::Edit {
            collection,
            id,
            sets,
            removals,
        } => console.edit(collection, id, sets, removals).await,
        Action::Delete { collection, id } => console.delete(collection, id).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_arguments(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        CliCommand::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        CliCommand::Version => {
            print_version();
            ExitCode::SUCCESS
        }
        CliCommand::Run(options) => match run(options).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphdesk_core::types::{ObjectKind, Property, PropertyKind};

    fn parse(args: &[&str]) -> CliOptions {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        match parse_arguments(&args).unwrap() {
            CliCommand::Run(options) => options,
            _ => panic!("expected a run command"),
        }
    }

    #[test]
    fn parses_list_with_window_options() {
        let options = parse(&[
            "list",
            "frames",
            "--space",
            "s1",
            "--graph",
            "urn%3Ag",
            "--page",
            "3",
            "--page-size",
            "50",
        ]);
        assert_eq!(
            options.action,
            Action::List {
                collection: "frames".to_string()
            }
        );
        assert_eq!(options.space.as_deref(), Some("s1"));
        assert_eq!(options.page, 3);
        assert_eq!(options.page_size, Some(50));
    }

    #[test]
    fn parses_edit_with_sets_and_removals() {
        let options = parse(&[
            "edit", "frames", "urn%3Af", "--set", "name=Ann", "--rm", "label",
        ]);
        match options.action {
            Action::Edit { sets, removals, .. } => {
                assert_eq!(sets, vec![("name".to_string(), "Ann".to_string())]);
                assert_eq!(removals, vec!["label".to_string()]);
            }
            other => panic!("expected edit, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_property_pairs() {
        assert!(split_pair("nameAnn").is_err());
        assert!(split_pair("=Ann").is_err());
        assert_eq!(
            split_pair("name=Ann").unwrap(),
            ("name".to_string(), "Ann".to_string())
        );
        // Values may contain '='.
        assert_eq!(
            split_pair("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        let args = vec!["frobnicate".to_string()];
        assert!(parse_arguments(&args).is_err());
    }

    #[test]
    fn no_arguments_shows_help() {
        assert!(matches!(parse_arguments(&[]).unwrap(), CliCommand::Help));
    }

    fn sample_entity() -> Entity {
        Entity {
            space_id: "s1".to_string(),
            graph_id: "urn:g".to_string(),
            object_uri: "urn:x#ann".to_string(),
            object_kind: ObjectKind::Node,
            rdf_type: "Person".to_string(),
            created_time: "2026-01-01T00:00:00Z".to_string(),
            last_modified: "2026-01-02T00:00:00Z".to_string(),
            properties: vec![Property {
                predicate: "name".to_string(),
                object: "Ann".to_string(),
                kind: PropertyKind::Literal,
            }],
            property_count: 1,
        }
    }

    #[test]
    fn entity_rendering_shows_identity_and_rows() {
        let rendered = render_entity(&sample_entity());
        assert!(rendered.contains("# ann (Node)"));
        assert!(rendered.contains("urn:x#ann"));
        assert!(rendered.contains("2026-01-01 00:00:00"));
        assert!(rendered.contains("| name | Ann | Literal |"));
    }

    #[test]
    fn matcher_searches_uri_type_and_properties() {
        let entity = sample_entity();
        assert!(entity_matches(&entity, "ann"));
        assert!(entity_matches(&entity, "PERSON"));
        assert!(entity_matches(&entity, "name"));
        assert!(!entity_matches(&entity, "zebra"));
    }
}
