use std::fs;
use std::path::{Path, PathBuf};

use aliasdesk_core::{
    AliasListController, CommandQueue, LogAuditSink, Outcome, PageRequest, TargetRef, UiCommand,
};
use aliasdesk_settings::{AliasSettings, SettingsStore};
use aliasdesk_store::{ContentTree, ContentTreeStore, SecurityContext, ITEM_TEMPLATE};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

const STATE_DIR: &str = ".aliasdesk";
const CONTENT_FILE: &str = "content.json";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Parser)]
#[command(
    name = "aliasdesk-cli",
    about = "Manage friendly URL aliases of content items",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 以此編輯者身分執行。 / Editor the request runs as.
    #[arg(long, global = true, value_name = "NAME", default_value = "sitecore\\admin")]
    actor: String,
    /// 輸出前端腳本而非可讀文字。 / Print client scripts instead of readable commands.
    #[arg(long, global = true)]
    scripts: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 建立內容樹與預設設定。 / Create the content tree and default settings.
    Init(InitArgs),
    /// 管理內容節點。 / Manage content items.
    #[command(subcommand)]
    Content(ContentCommand),
    /// 管理別名。 / Manage aliases of a content item.
    #[command(subcommand)]
    Alias(AliasCommand),
}

#[derive(Args)]
struct InitArgs {
    /// 覆寫既有的內容樹。 / Overwrite an existing content tree.
    #[arg(long)]
    force: bool,
}

#[derive(Subcommand)]
enum ContentCommand {
    /// 在內容根節點下建立項目（含缺少的上層）。 / Create an item below the content root, parents included.
    Add {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

#[derive(Subcommand)]
enum AliasCommand {
    /// 列出目標項目的別名。 / List aliases of the target item.
    List(TargetArgs),
    /// 新增別名。 / Add an alias.
    Add {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(value_name = "ALIAS")]
        alias: String,
    },
    /// 依清單 ID 移除別名。 / Remove aliases by list id.
    Remove {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(value_name = "LIST_ID", required = true)]
        list_ids: Vec<String>,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// 目標項目路徑（絕對路徑或相對於內容根節點）。 / Target item path, absolute or relative to the content root.
    #[arg(long, value_name = "PATH")]
    target: String,
}

struct Workspace {
    content: ContentTreeStore,
    settings: SettingsStore,
}

impl Workspace {
    fn open(root: &Path) -> Result<Self> {
        let state = root.join(STATE_DIR);
        let settings_path = state.join(SETTINGS_FILE);
        let settings = SettingsStore::load(&settings_path)
            .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
        let alias_root = settings.settings().alias_root.clone();
        Ok(Self {
            content: ContentTreeStore::new(state.join(CONTENT_FILE)).with_alias_root(alias_root),
            settings,
        })
    }

    fn load_tree(&self) -> Result<ContentTree> {
        let path = self.content.path();
        match self
            .content
            .load()
            .with_context(|| format!("failed to load content tree from {}", path.display()))?
        {
            Some(tree) => Ok(tree),
            None => bail!(
                "no content tree at {}; run `aliasdesk-cli init` first",
                path.display()
            ),
        }
    }

    fn save_tree(&self, tree: &ContentTree) -> Result<()> {
        self.content
            .save(tree)
            .with_context(|| format!("failed to write {}", self.content.path().display()))
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        actor,
        scripts,
        command,
    } = Cli::parse();
    let workspace_root = resolve_workspace(workspace)?;
    log::debug!("workspace root: {}", workspace_root.display());
    let output = Output { scripts };
    match command {
        Commands::Init(args) => execute_init(args, &workspace_root),
        Commands::Content(command) => {
            let workspace = Workspace::open(&workspace_root)?;
            execute_content_command(command, &workspace)
        }
        Commands::Alias(command) => {
            let workspace = Workspace::open(&workspace_root)?;
            execute_alias_command(command, &workspace, &actor, output)
        }
    }
}

fn execute_init(args: InitArgs, workspace_root: &Path) -> Result<()> {
    let state = workspace_root.join(STATE_DIR);
    fs::create_dir_all(&state).with_context(|| format!("failed to create {}", state.display()))?;

    let content = ContentTreeStore::new(state.join(CONTENT_FILE));
    if content.path().exists() && !args.force {
        bail!(
            "content tree already exists at {}; pass --force to overwrite",
            content.path().display()
        );
    }
    content
        .save(&ContentTree::bootstrap())
        .with_context(|| format!("failed to write {}", content.path().display()))?;

    let settings_path = state.join(SETTINGS_FILE);
    if !settings_path.exists() {
        SettingsStore::new(&settings_path, AliasSettings::default())
            .save()
            .with_context(|| format!("failed to write {}", settings_path.display()))?;
    }
    println!("Initialised alias workspace at {}", state.display());
    Ok(())
}

fn execute_content_command(command: ContentCommand, workspace: &Workspace) -> Result<()> {
    match command {
        ContentCommand::Add { path } => {
            let settings = workspace.settings.settings();
            let full_path = content_path(settings, &path);
            let mut tree = workspace.load_tree()?;
            let id = tree
                .ensure_path(&full_path, ITEM_TEMPLATE)
                .with_context(|| format!("failed to create {full_path}"))?;
            workspace.save_tree(&tree)?;
            println!("Created {full_path} ({id})");
            Ok(())
        }
    }
}

fn execute_alias_command(
    command: AliasCommand,
    workspace: &Workspace,
    actor: &str,
    output: Output,
) -> Result<()> {
    let settings = workspace.settings.settings().clone();
    let mut tree = workspace.load_tree()?;
    let target = match &command {
        AliasCommand::List(args) => &args.target,
        AliasCommand::Add { target, .. } | AliasCommand::Remove { target, .. } => &target.target,
    };
    let security = SecurityContext::new(actor).with_application(settings.application.clone());
    let mut request = PageRequest::new(
        TargetRef::Path(content_path(&settings, target)),
        security,
    );
    if !matches!(command, AliasCommand::List(_)) {
        request = request.postback();
    }

    let mut ui = CommandQueue::new();
    let mut controller =
        AliasListController::new(&mut tree, &mut ui, LogAuditSink, settings, request)?;
    controller.on_load()?;
    let rejection = match command {
        AliasCommand::List(_) => None,
        AliasCommand::Add { alias, .. } => rejection_of(controller.add(&alias)?),
        AliasCommand::Remove { list_ids, .. } => rejection_of(controller.remove(&list_ids)?),
    };
    controller.finish();

    output.print(ui.iter());
    if let Some(message) = rejection {
        bail!(message);
    }
    workspace.save_tree(&tree)
}

fn rejection_of<T>(outcome: Outcome<T>) -> Option<&'static str> {
    outcome.rejection().map(|error| error.user_message())
}

#[derive(Clone, Copy)]
struct Output {
    scripts: bool,
}

impl Output {
    fn print<'a>(self, commands: impl Iterator<Item = &'a UiCommand>) {
        for command in commands {
            if self.scripts {
                if let Some(script) = command.to_script() {
                    println!("{script}");
                }
            } else {
                println!("{command}");
            }
        }
    }
}

/// Absolute paths are taken as-is; anything else hangs off the content root.
fn content_path(settings: &AliasSettings, raw: &str) -> String {
    if raw.starts_with('/') {
        raw.trim_end_matches('/').to_string()
    } else {
        format!(
            "{}/{}",
            settings.content_root.trim_end_matches('/'),
            raw.trim_matches('/')
        )
    }
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => {
            if path.is_absolute() {
                Ok(path)
            } else {
                Ok(std::env::current_dir()
                    .context("determine current directory")?
                    .join(path))
            }
        }
        None => std::env::current_dir().context("determine current directory"),
    }
}
