use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Args, Parser, Subcommand};
use taskhandler::app::{App, Route};
use taskhandler::config::{ClientConfig, ConfigError};
use taskhandler::net::api::{ApiClient, ApiError};
use taskhandler::net::http::HttpTransport;
use taskhandler::net::types::CardUpdate;
use taskhandler::pages::ActionError;
use taskhandler::pages::board_detail::BoardDetail;
use taskhandler::pages::board_list::BoardList;
use taskhandler::pages::inbox::InboxView;
use taskhandler::pages::session_gate::{AuthMode, SessionGate};
use taskhandler::render;
use taskhandler::storage::{FileStore, StoreError};
use taskhandler::ui::{AssumeYes, Confirm, ConsoleNotifier, Notifier, StdinConfirm};


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("session store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Already reported through the notifier.
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("not logged in; run `taskhandler login` first")]
    NotLoggedIn,
    #[error("card {0} not found on this board")]
    CardNotFound(String),
    #[error("nothing to update; pass at least one field")]
    EmptyUpdate,
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
    #[error("stdin carries the import text, so the prompt cannot be answered; pass --yes")]
    StdinNeedsYes,
}

#[derive(Parser, Debug)]
#[command(name = "taskhandler", about = "Kanban boards and AI task extraction from the terminal")]
struct Cli {
    /// Backend origin; overrides TASKHANDLER_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Session store file; overrides TASKHANDLER_STORE_PATH.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    yes: bool,

    /// Log verbosity (-v info, -vv debug).
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKHANDLER_PASSWORD")]
        password: String,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKHANDLER_PASSWORD")]
        password: String,
        #[arg(long)]
        name: String,
    },
    Logout,
    Whoami,
    Ping,
    Boards(BoardsCommand),
    Board(BoardCommand),
    Inbox(InboxCommand),
}

#[derive(Args, Debug)]
struct BoardsCommand {
    #[command(subcommand)]
    command: BoardsSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardsSubcommand {
    List,
    Create {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Args, Debug)]
struct BoardCommand {
    #[command(subcommand)]
    command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardSubcommand {
    Show {
        board_id: String,
        /// Print the detail of one card instead of the columns.
        #[arg(long)]
        card: Option<String>,
    },
    AddList {
        board_id: String,
        title: String,
    },
    AddCard {
        board_id: String,
        #[arg(long)]
        list: String,
        title: String,
    },
    EditCard {
        board_id: String,
        card_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due_date: Option<String>,
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    DeleteCard {
        board_id: String,
        card_id: String,
    },
}

#[derive(Args, Debug)]
struct InboxCommand {
    #[command(subcommand)]
    command: InboxSubcommand,
}

#[derive(Subcommand, Debug)]
enum InboxSubcommand {
    Show,
    /// Extract tasks from free text and add them to a board's first list.
    Import {
        #[arg(long)]
        board: String,
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long, help = "Input file path, or - for stdin")]
        file: Option<String>,
    },
}

struct CliContext {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
    assume_yes: bool,
}

/// Where `inbox import` reads its text from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ImportSource {
    Text(String),
    File(PathBuf),
    Stdin,
}

impl ImportSource {
    fn from_args(text: Option<String>, file: Option<&str>) -> Self {
        match (text, file) {
            (Some(text), _) => Self::Text(text),
            (None, Some(path)) if path != "-" => Self::File(PathBuf::from(path)),
            (None, _) => Self::Stdin,
        }
    }

    /// The confirmation prompt reads stdin, so piped text needs `--yes`.
    fn check(&self, assume_yes: bool) -> Result<(), CliError> {
        if *self == Self::Stdin && !assume_yes {
            return Err(CliError::StdinNeedsYes);
        }
        Ok(())
    }

    fn read(self) -> Result<String, std::io::Error> {
        match self {
            Self::Text(text) => Ok(text),
            Self::File(path) => std::fs::read_to_string(path),
            Self::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Action(_)) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(path) = cli.store {
        config = config.with_store_path(path);
    }

    let store = FileStore::open(&config.store_path)?;
    tracing::debug!(api_url = %config.api_url, store = %store.path().display(), "client configured");
    let transport = HttpTransport::new(&config)?;
    let ctx = CliContext {
        api: Arc::new(ApiClient::new(Arc::new(transport), Arc::new(store))),
        notifier: Arc::new(ConsoleNotifier),
        confirm: if cli.yes { Arc::new(AssumeYes) } else { Arc::new(StdinConfirm) },
        assume_yes: cli.yes,
    };
    let mut app = App::new(Arc::clone(&ctx.api));

    match cli.command {
        Command::Login { email, password } => {
            authenticate(&ctx, &mut app, AuthMode::Login, email, password, String::new()).await
        }
        Command::Register { email, password, name } => {
            authenticate(&ctx, &mut app, AuthMode::Register, email, password, name).await
        }
        Command::Logout => {
            app.logout()?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            guard(&mut app, Route::Boards)?;
            let user = app.verify_session().await?;
            println!("{} <{}>", user.name, user.email);
            Ok(())
        }
        Command::Ping => {
            println!("{}", ctx.api.health().await?);
            Ok(())
        }
        Command::Boards(boards) => {
            guard(&mut app, Route::Boards)?;
            run_boards(&ctx, boards).await
        }
        Command::Board(board) => run_board(&ctx, &mut app, board).await,
        Command::Inbox(inbox) => {
            guard(&mut app, Route::Inbox)?;
            run_inbox(&ctx, inbox).await
        }
    }
}

/// Route through the app guard; anything but the requested route means no session.
fn guard(app: &mut App, route: Route) -> Result<(), CliError> {
    if *app.navigate(route.clone()) == route { Ok(()) } else { Err(CliError::NotLoggedIn) }
}

async fn authenticate(
    ctx: &CliContext,
    app: &mut App,
    mode: AuthMode,
    email: String,
    password: String,
    name: String,
) -> Result<(), CliError> {
    let mut gate = SessionGate::new(Arc::clone(&ctx.api), Arc::clone(&ctx.notifier));
    gate.mode = mode;
    gate.email = email;
    gate.password = password;
    gate.name = name;

    let mut issued = None;
    gate.submit(|token, user| issued = Some((token, user))).await?;
    if let Some((token, user)) = issued {
        let greeting = format!("Logged in as {} <{}>", user.name, user.email);
        app.on_login(token, user)?;
        println!("{greeting}");
    }
    Ok(())
}

async fn run_boards(ctx: &CliContext, boards: BoardsCommand) -> Result<(), CliError> {
    let mut page = BoardList::new(Arc::clone(&ctx.api), Arc::clone(&ctx.notifier));
    match boards.command {
        BoardsSubcommand::List => {
            page.load().await?;
            print!("{}", render::render_boards(&page.boards));
        }
        BoardsSubcommand::Create { title, description } => {
            page.open_create_dialog();
            page.draft.title = title;
            page.draft.description = description;
            let board = page.create_board().await?;
            println!("{}", board.id);
        }
    }
    Ok(())
}

async fn run_board(ctx: &CliContext, app: &mut App, board: BoardCommand) -> Result<(), CliError> {
    let board_id = match &board.command {
        BoardSubcommand::Show { board_id, .. }
        | BoardSubcommand::AddList { board_id, .. }
        | BoardSubcommand::AddCard { board_id, .. }
        | BoardSubcommand::EditCard { board_id, .. }
        | BoardSubcommand::DeleteCard { board_id, .. } => board_id.clone(),
    };
    guard(app, Route::Board(board_id.clone()))?;

    let mut page = BoardDetail::new(
        Arc::clone(&ctx.api),
        Arc::clone(&ctx.notifier),
        Arc::clone(&ctx.confirm),
        &board_id,
    );
    page.load().await?;

    match board.command {
        BoardSubcommand::Show { card: None, .. } => {
            print!("{}", render::render_board(page.board.as_ref(), &page.columns()));
        }
        BoardSubcommand::Show { card: Some(card_id), .. } => {
            let card = page.open(&card_id).ok_or_else(|| CliError::CardNotFound(card_id.clone()))?;
            print!("{}", render::render_card(card));
        }
        BoardSubcommand::AddList { title, .. } => {
            let list = page.create_list(&title).await?;
            println!("{}", list.id);
        }
        BoardSubcommand::AddCard { list, title, .. } => {
            let card = page.create_card(&list, &title).await?;
            println!("{}", card.id);
        }
        BoardSubcommand::EditCard { card_id, title, description, priority, due_date, labels, .. } => {
            let update = CardUpdate {
                title,
                description,
                priority,
                due_date,
                labels: (!labels.is_empty()).then_some(labels),
                ..CardUpdate::default()
            };
            if update.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            page.update_card(&card_id, &update).await?;
        }
        BoardSubcommand::DeleteCard { card_id, .. } => {
            if !page.delete_card(&card_id).await? {
                println!("Cancelled");
            }
        }
    }
    Ok(())
}

async fn run_inbox(ctx: &CliContext, inbox: InboxCommand) -> Result<(), CliError> {
    let mut view = InboxView::new(Arc::clone(&ctx.api), Arc::clone(&ctx.notifier));
    match inbox.command {
        InboxSubcommand::Show => {
            view.load().await?;
            print!("{}", render::render_inbox(&view.cards));
        }
        InboxSubcommand::Import { board, text, file } => {
            let source = ImportSource::from_args(text, file.as_deref());
            source.check(ctx.assume_yes)?;
            view.text = source.read()?;
            let count = view.extract_tasks().await?;
            for task in &view.extracted {
                println!(
                    "- {} [{}]",
                    task.title.as_deref().unwrap_or("(untitled)"),
                    task.priority.as_deref().unwrap_or("-"),
                );
            }
            if count == 0 || !ctx.confirm.confirm(&format!("Add {count} task(s) to board?")) {
                view.reset_dialog();
                println!("Nothing added");
                return Ok(());
            }
            view.selected_board = Some(board);
            let report = view.commit_to_board().await?;
            if report.failed() > 0 {
                eprintln!("warning: {} of {} task(s) could not be created", report.failed(), report.attempted);
            }
        }
    }
    Ok(())
}
