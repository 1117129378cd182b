use std::io;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tokio::runtime::{Builder, Runtime};
use tracing::{info, info_span};

use dua_client::FetchClient;
use dua_navigator::Session;
use dua_server::{ServerConfig, start_server};
use dua_store::{ContentStore, SeedData, TableSummary};

use crate::cli::{BrowseArgs, InspectArgs, SeedArgs, ServeArgs};
use crate::repl::run_repl;

pub fn run_serve(args: &ServeArgs) -> Result<()> {
    let mut config = ServerConfig::load(args.config.as_deref()).context("load server config")?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(database) = &args.database {
        config.database = database.clone();
    }
    let span = info_span!("serve", bind = %config.bind);
    let _guard = span.enter();

    let runtime = build_runtime()?;
    runtime
        .block_on(start_server(config))
        .context("run query service")?;
    info!("Query service stopped");
    Ok(())
}

pub fn run_seed(args: &SeedArgs) -> Result<Vec<TableSummary>> {
    let span = info_span!("seed", database = %args.database.display());
    let _guard = span.enter();
    let start = Instant::now();

    if args.database.exists() && !args.force {
        bail!(
            "{} already exists (use --force to replace it)",
            args.database.display()
        );
    }

    let seed = SeedData::from_path(&args.from)
        .with_context(|| format!("read seed {}", args.from.display()))?;
    seed.validate().context("validate seed")?;

    // Staged beside the target; renamed over it only after a full import.
    let dir = match args.database.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = tempfile::Builder::new()
        .prefix(".dua-seed-")
        .suffix(".sqlite")
        .tempfile_in(dir)
        .with_context(|| format!("create staging file in {}", dir.display()))?;
    {
        let store = ContentStore::create(staging.path()).context("create database")?;
        store.import(&seed).context("import seed")?;
    }
    staging
        .persist(&args.database)
        .with_context(|| format!("replace {}", args.database.display()))?;

    info!(
        categories = seed.categories.len(),
        subcategories = seed.subcategories.len(),
        duas = seed.duas.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Database seeded"
    );
    let store = ContentStore::open(&args.database).context("reopen seeded database")?;
    store.inspect().context("inspect seeded database")
}

pub fn run_inspect(args: &InspectArgs) -> Result<Vec<TableSummary>> {
    let store = ContentStore::open(&args.database)
        .with_context(|| format!("open {}", args.database.display()))?;
    store.inspect().context("inspect database")
}

pub fn run_browse(args: &BrowseArgs) -> Result<()> {
    let config = args.config();
    let client = FetchClient::new(&config.api, config.timeout)
        .with_context(|| format!("connect to {}", config.api))?;
    info!(api = %client.base_url(), "Browsing");

    let runtime = build_runtime()?;
    let mut session = Session::with_debounce(client, config.debounce);
    let stdin = io::stdin();
    run_repl(&runtime, &mut session, stdin.lock(), io::stdout()).context("terminal i/o")
}

pub fn build_runtime() -> Result<Runtime> {
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")
}
