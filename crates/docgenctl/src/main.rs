mod config;
mod console;
mod views;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::Config;
use docgen_client::api::auth::{ChangePasswordRequest, RegisterRequest};
use docgen_client::models::{
    CustomerInput, DocumentType, GenerateDocumentRequest, ListParams, OrderInput, OrderItemInput, ProductInput,
    SortOrder,
};
use docgen_client::{
    Access, ClientConfig, Docgen, FileStore, Method, RequestOptions, Route, RouteGuard, StateStore, ThemePreference,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use views::Table;

#[derive(Parser)]
#[command(name = "docgen")]
#[command(version, about = "Docgen back office command line tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Interactive mode (terminal console)
    #[arg(short, long)]
    interactive: bool,

    /// API base URL (overrides the current context and DOCGEN_API_BASE_URL)
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Emit raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    /// Examples:
    ///     docgen login --email jan@bedrijf.nl
    ///     docgen login -e jan@bedrijf.nl -p geheim123
    #[command(verbatim_doc_comment)]
    Login {
        #[arg(short, long)]
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and sign in with it
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        organization: Option<String>,
    },
    /// End the session (always clears the local session)
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Password management
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },
    /// Customers
    Customers {
        #[command(subcommand)]
        command: CustomerCommand,
    },
    /// Products and categories
    Products {
        #[command(subcommand)]
        command: ProductCommand,
    },
    /// Orders and order lines
    Orders {
        #[command(subcommand)]
        command: OrderCommand,
    },
    /// Generated documents and templates
    Documents {
        #[command(subcommand)]
        command: DocumentCommand,
    },
    /// Dashboard figures
    /// Examples:
    ///     docgen dashboard
    ///     docgen dashboard --activity --json
    #[command(verbatim_doc_comment)]
    Dashboard {
        /// Show recent activity instead of statistics
        #[arg(long)]
        activity: bool,
    },
    /// Light/dark preference
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
    /// Context management
    Context {
        #[command(subcommand)]
        command: ContextCommand,
    },
    /// Send an arbitrary authenticated request
    /// Examples:
    ///     docgen request GET /customers/12
    ///     docgen request PUT /orders/7 --data '{"status": "confirmed"}'
    #[command(verbatim_doc_comment)]
    Request {
        method: String,
        path: String,
        /// JSON body
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Download an API path or absolute URL to a file
    Download { path: String, destination: PathBuf },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    per_page: Option<u32>,
    #[arg(short, long)]
    search: Option<String>,
    /// Column to sort by
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort descending
    #[arg(long)]
    desc: bool,
}

impl ListArgs {
    fn params(&self) -> ListParams {
        let mut params = ListParams::new();
        if let Some(page) = self.page {
            params = params.page(page);
        }
        if let Some(per_page) = self.per_page {
            params = params.per_page(per_page);
        }
        if let Some(search) = &self.search {
            params = params.search(search.clone());
        }
        if let Some(sort_by) = &self.sort_by {
            let order = if self.desc { SortOrder::Desc } else { SortOrder::Asc };
            params = params.sort(sort_by.clone(), order);
        }
        params
    }
}

#[derive(Subcommand)]
enum PasswordCommand {
    /// Change the password of the signed-in user
    Change,
    /// Request a reset email
    Forgot { email: String },
    /// Set a new password with a reset token
    Reset { token: String },
    /// Confirm an email address
    Verify { token: String },
}

#[derive(Subcommand)]
enum CustomerCommand {
    /// List customers
    /// Examples:
    ///     docgen customers list
    ///     docgen customers list --search acme --active true
    ///     docgen customers list --sort-by company_name --page 2
    #[command(verbatim_doc_comment)]
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        active: Option<bool>,
    },
    Get { id: String },
    /// Create from a JSON file
    Create { file: PathBuf },
    /// Update from a JSON file
    Update { id: String, file: PathBuf },
    /// Deactivate a customer
    Delete { id: String },
}

#[derive(Subcommand)]
enum ProductCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Get { id: String },
    Create { file: PathBuf },
    Update { id: String, file: PathBuf },
    Delete { id: String },
    /// List categories
    Categories,
    /// Upload a file as attachment
    /// Examples:
    ///     docgen products upload 12 ./datasheet.pdf --attachment-type datasheet
    #[command(verbatim_doc_comment)]
    Upload {
        id: String,
        file: PathBuf,
        /// datasheet, photo, manual or other
        #[arg(long, default_value = "other")]
        attachment_type: String,
    },
}

#[derive(Subcommand)]
enum OrderCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        customer: Option<String>,
    },
    /// Order with its lines
    Get { id: String },
    Create { file: PathBuf },
    Update { id: String, file: PathBuf },
    /// Add a line from a JSON file
    AddItem { id: String, file: PathBuf },
    DeleteItem { id: String, item_id: String },
}

#[derive(Subcommand)]
enum DocumentCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        /// quote, work_order, invoice or combined_invoice
        #[arg(long = "type")]
        template_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    Get { id: String },
    Templates,
    Placeholders { template_type: String },
    /// Generate a document for an order
    /// Examples:
    ///     docgen documents generate invoice --order 42
    ///     docgen documents generate quote --order 42 --preview
    ///     docgen documents generate work_order --order 42 --data extra.json
    #[command(verbatim_doc_comment)]
    Generate {
        template_type: String,
        #[arg(long)]
        order: String,
        /// Validate and show the data without generating
        #[arg(long)]
        preview: bool,
        /// JSON object with extra placeholder values
        #[arg(long)]
        data: Option<PathBuf>,
    },
    Regenerate {
        id: String,
        /// JSON object with overrides
        #[arg(long)]
        data: Option<PathBuf>,
    },
    Delete { id: String },
    /// Print the PDF and Google Docs links
    Links { id: String },
    /// Save the PDF of a document
    Download { id: String, destination: PathBuf },
}

#[derive(Subcommand)]
enum ThemeCommand {
    Show,
    Toggle,
    /// light or dark
    Set { mode: String },
}

#[derive(Subcommand)]
enum ContextCommand {
    /// Add a new context for connecting to a docgen API
    /// Examples:
    ///     docgen context add local --url=http://localhost:5000/api
    ///     docgen context add prod --url=https://docgen.example.nl/api --set-current
    #[command(verbatim_doc_comment)]
    Add {
        /// Context name
        name: String,
        /// API base URL (e.g., http://localhost:5000/api)
        #[arg(long)]
        url: String,
        /// Set as current context
        #[arg(long)]
        set_current: bool,
    },
    /// List all configured contexts
    List,
    /// Switch to a different context
    Use { name: String },
    /// Delete a context
    Delete { name: String },
    /// Show current active context
    Current,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.interactive);

    let mut config = Config::load()?;

    let command = match cli.command {
        Some(Commands::Context { command }) => return handle_context_command(&mut config, command),
        other => other,
    };

    let client_config = client_config(cli.server_url.as_deref(), &config)?;
    let state_dir = client_config.resolve_state_dir()?;
    let store: Arc<dyn StateStore> =
        Arc::new(FileStore::in_dir(&state_dir).context("Failed to open persisted state")?);

    if let Some(Commands::Theme { command }) = command {
        return handle_theme_command(store, command, cli.json);
    }

    tracing::debug!(base_url = %client_config.base_url, state_dir = %state_dir.display(), "Starting");
    let docgen = Docgen::connect(&client_config, store.clone())?;

    if cli.interactive {
        return console::run(Arc::new(docgen), store).await;
    }

    let Some(command) = command else {
        println!("Use --help for usage information or --interactive for the console");
        return Ok(());
    };

    let json = cli.json;
    match command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let user = docgen.session.login(&email, &password).await?;
            println!("Logged in as {} ({}).", user.display_name(), user.role);
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            organization,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let request = RegisterRequest {
                email,
                password,
                first_name,
                last_name,
                organization_name: organization,
            };
            let user = docgen.session.register(&request).await?;
            println!("Account created, logged in as {}.", user.display_name());
        }
        Commands::Logout => {
            docgen.session.logout().await;
            println!("Logged out.");
        }
        command => {
            docgen.session.init().await;
            run_authenticated(&docgen, command, json).await?;
        }
    }

    docgen.session.dispose();
    Ok(())
}

fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,docgen=info,docgen_client=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if interactive {
        // Anything written to the terminal would corrupt the console screen.
        registry.with(fmt::layer().with_writer(io::sink)).init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

/// `--server-url`, then the current context, then the environment.
fn client_config(server_url: Option<&str>, config: &Config) -> Result<ClientConfig> {
    let base = ClientConfig::from_env()?;
    let base = match server_url {
        Some(url) => base.with_base_url(url),
        None => match config.current() {
            Some((_, ctx)) if std::env::var("DOCGEN_API_BASE_URL").is_err() => base.with_base_url(&ctx.server_url),
            _ => base,
        },
    };
    base.validate()?;
    Ok(base)
}

/// Read a secret from the terminal without echo.
fn prompt(label: &str) -> Result<String> {
    rpassword::prompt_password(label).context("Failed to read password")
}

fn read_json<T: DeserializeOwned>(file: &Path) -> Result<T> {
    let content = fs::read_to_string(file).with_context(|| format!("Failed to read file: {:?}", file))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {:?}", file))
}

fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce(&T) -> Table) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", table(value).render());
    }
    Ok(())
}

fn parse_document_type(value: &str) -> Result<DocumentType> {
    DocumentType::parse(value).with_context(|| {
        let known: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
        format!("Unknown document type '{}'. Use one of: {}", value, known.join(", "))
    })
}

/// Exit unless a session is established.
fn require_login(docgen: &Docgen) {
    let state = docgen.session.state();
    if !matches!(RouteGuard::check(&state, Route::Dashboard), Access::Granted(_)) {
        eprintln!("Not logged in. Run `docgen login --email <email>` first.");
        std::process::exit(1);
    }
}

/// Exit unless the session may open `route`.
fn require(docgen: &Docgen, route: Route) {
    require_login(docgen);
    if let Some(permission) = route.required_permission() {
        if !docgen.session.has_permission(permission) {
            eprintln!("Access to {} requires the '{}' permission.", route.title(), permission);
            std::process::exit(1);
        }
    }
}

async fn run_authenticated(docgen: &Docgen, command: Commands, json: bool) -> Result<()> {
    let api = &docgen.api;
    match command {
        Commands::Whoami => {
            require_login(docgen);
            let user = docgen.session.refresh().await?;
            emit(json, &user, views::profile)?;
            if !json {
                let expiry = docgen
                    .client()
                    .session()
                    .token()
                    .and_then(|t| docgen_client::token::expiry(&t));
                if let Some(exp) = expiry {
                    println!("Session valid until {}", exp.with_timezone(&chrono::Local).format("%d-%m-%Y %H:%M"));
                }
            }
        }
        Commands::Password { command } => match command {
            PasswordCommand::Change => {
                require_login(docgen);
                let request = ChangePasswordRequest {
                    current_password: prompt("Current password: ")?,
                    new_password: prompt("New password: ")?,
                };
                docgen.session.change_password(&request).await?;
                println!("Password changed.");
            }
            PasswordCommand::Forgot { email } => {
                docgen.session.request_password_reset(&email).await?;
                println!("If the address is known, a reset email is on its way.");
            }
            PasswordCommand::Reset { token } => {
                let password = prompt("New password: ")?;
                docgen.session.reset_password(&token, &password).await?;
                println!("Password reset. You can now log in.");
            }
            PasswordCommand::Verify { token } => {
                docgen.session.verify_email(&token).await?;
                println!("Email address verified.");
            }
        },
        Commands::Customers { command } => {
            require(docgen, Route::Customers);
            let customers = api.customers();
            match command {
                CustomerCommand::List { list, active } => {
                    let mut params = list.params();
                    if let Some(active) = active {
                        params = params.filter("active", active);
                    }
                    emit(json, &customers.list(&params).await?, views::customers)?;
                }
                CustomerCommand::Get { id } => {
                    let customer = customers.get(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&customer)?);
                }
                CustomerCommand::Create { file } => {
                    let input: CustomerInput = read_json(&file)?;
                    let customer = customers.create(&input).await?;
                    println!("Customer {} created: {}", customer.id, customer.company_name);
                }
                CustomerCommand::Update { id, file } => {
                    let input: CustomerInput = read_json(&file)?;
                    let customer = customers.update(&id, &input).await?;
                    println!("Customer {} updated.", customer.id);
                }
                CustomerCommand::Delete { id } => {
                    customers.delete(&id).await?;
                    println!("Customer {} deactivated.", id);
                }
            }
        }
        Commands::Products { command } => {
            require(docgen, Route::Products);
            let products = api.products();
            match command {
                ProductCommand::List { list, category, active } => {
                    let mut params = list.params();
                    if let Some(category) = category {
                        params = params.filter("category_id", category);
                    }
                    if let Some(active) = active {
                        params = params.filter("active", active);
                    }
                    emit(json, &products.list(&params).await?, views::products)?;
                }
                ProductCommand::Get { id } => {
                    let product = products.get(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&product)?);
                }
                ProductCommand::Create { file } => {
                    let input: ProductInput = read_json(&file)?;
                    let product = products.create(&input).await?;
                    println!("Product {} created: {}", product.id, product.name);
                }
                ProductCommand::Update { id, file } => {
                    let input: ProductInput = read_json(&file)?;
                    let product = products.update(&id, &input).await?;
                    println!("Product {} updated.", product.id);
                }
                ProductCommand::Delete { id } => {
                    products.delete(&id).await?;
                    println!("Product {} deleted.", id);
                }
                ProductCommand::Categories => {
                    let categories = products.categories().await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&categories)?);
                    } else {
                        for category in categories {
                            println!("{:<8} {}", category.id, category.name);
                        }
                    }
                }
                ProductCommand::Upload {
                    id,
                    file,
                    attachment_type,
                } => {
                    let attachment = products.upload_attachment(&id, &file, &attachment_type).await?;
                    println!("Uploaded {} -> {}", attachment.file_name, attachment.file_url);
                }
            }
        }
        Commands::Orders { command } => {
            require(docgen, Route::Orders);
            let orders = api.orders();
            match command {
                OrderCommand::List { list, status, customer } => {
                    let mut params = list.params();
                    if let Some(status) = status {
                        params = params.filter("status", status);
                    }
                    if let Some(customer) = customer {
                        params = params.filter("customer_id", customer);
                    }
                    emit(json, &orders.list(&params).await?, views::orders)?;
                }
                OrderCommand::Get { id } => {
                    emit(json, &orders.get(&id).await?, views::order_detail)?;
                }
                OrderCommand::Create { file } => {
                    let input: OrderInput = read_json(&file)?;
                    let order = orders.create(&input).await?;
                    println!("Order {} created ({}).", order.order_number, order.id);
                }
                OrderCommand::Update { id, file } => {
                    let input: OrderInput = read_json(&file)?;
                    let order = orders.update(&id, &input).await?;
                    println!("Order {} updated.", order.order_number);
                }
                OrderCommand::AddItem { id, file } => {
                    let input: OrderItemInput = read_json(&file)?;
                    let item = orders.add_item(&id, &input).await?;
                    println!("Added line '{}'.", item.description);
                }
                OrderCommand::DeleteItem { id, item_id } => {
                    orders.delete_item(&id, &item_id).await?;
                    println!("Line {} removed from order {}.", item_id, id);
                }
            }
        }
        Commands::Documents { command } => handle_document_command(docgen, command, json).await?,
        Commands::Dashboard { activity } => {
            require(docgen, Route::Dashboard);
            if activity {
                emit(json, &api.dashboard().activity().await?, |a| views::activity(a))?;
            } else {
                emit(json, &api.dashboard().stats().await?, views::dashboard)?;
            }
        }
        Commands::Request { method, path, data } => {
            require_login(docgen);
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method '{}'", method))?;
            let mut options = RequestOptions::new(method);
            if let Some(data) = data {
                let body: serde_json::Value = serde_json::from_str(&data).context("Failed to parse --data as JSON")?;
                options = options.json(&body)?;
            }
            let response = docgen.client().request(&path, options).await?;
            println!("{}", serde_json::to_string_pretty(&response.data)?);
        }
        Commands::Download { path, destination } => {
            require_login(docgen);
            let bytes = docgen.client().download_file(&path, &destination).await?;
            println!("Saved {} bytes to {}", bytes, destination.display());
        }
        Commands::Login { .. } | Commands::Register { .. } | Commands::Logout => {}
        Commands::Theme { .. } | Commands::Context { .. } => {}
    }
    Ok(())
}

async fn handle_document_command(docgen: &Docgen, command: DocumentCommand, json: bool) -> Result<()> {
    let documents = docgen.api.documents();
    let route = match command {
        DocumentCommand::Generate { .. } | DocumentCommand::Templates | DocumentCommand::Placeholders { .. } => {
            Route::DocumentGenerator
        }
        _ => Route::Documents,
    };
    require(docgen, route);

    match command {
        DocumentCommand::List {
            list,
            template_type,
            status,
        } => {
            let mut params = list.params();
            if let Some(template_type) = template_type {
                params = params.filter("template_type", parse_document_type(&template_type)?.as_str());
            }
            if let Some(status) = status {
                params = params.filter("status", status);
            }
            emit(json, &documents.list(&params).await?, views::documents)?;
        }
        DocumentCommand::Get { id } => {
            let document = documents.get(&id).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        DocumentCommand::Templates => {
            emit(json, &documents.templates().await?, |t| views::templates(t))?;
        }
        DocumentCommand::Placeholders { template_type } => {
            let placeholders = documents.placeholders(parse_document_type(&template_type)?).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&placeholders)?);
            } else {
                for placeholder in placeholders {
                    println!("{{{{{}}}}}", placeholder);
                }
            }
        }
        DocumentCommand::Generate {
            template_type,
            order,
            preview,
            data,
        } => {
            let mut request = GenerateDocumentRequest::for_order(parse_document_type(&template_type)?, order);
            if let Some(data) = data {
                request.extra = read_json(&data)?;
            }
            if preview {
                let result = documents.preview(&request).await?;
                let errors = result.errors();
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else if errors.is_empty() {
                    println!("Preview ready: {}", result.preview_ready);
                } else {
                    for error in errors {
                        eprintln!("- {}", error);
                    }
                    std::process::exit(1);
                }
            } else {
                let result = documents.generate(&request).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print_links(&result.document);
                }
            }
        }
        DocumentCommand::Regenerate { id, data } => {
            let overrides = match data {
                Some(file) => read_json(&file)?,
                None => serde_json::json!({}),
            };
            let result = documents.regenerate(&id, &overrides).await?;
            print_links(&result.document);
        }
        DocumentCommand::Delete { id } => {
            documents.delete(&id).await?;
            println!("Document {} deleted.", id);
        }
        DocumentCommand::Links { id } => print_links(&documents.get(&id).await?),
        DocumentCommand::Download { id, destination } => {
            let link = documents.pdf_link(&id).await?;
            let bytes = docgen.client().download_file(&link, &destination).await?;
            println!("Saved {} bytes to {}", bytes, destination.display());
        }
    }
    Ok(())
}

fn print_links(document: &docgen_client::models::GeneratedDocument) {
    println!(
        "Document {} ({})",
        document.document_number.as_deref().unwrap_or(&document.id),
        document.kind().map(|k| k.as_str()).unwrap_or("unknown")
    );
    println!("  PDF:         {}", document.pdf_link().unwrap_or("-"));
    println!(
        "  Google Docs: {}",
        document.google_doc_link().unwrap_or_else(|| "-".to_string())
    );
}

fn handle_theme_command(store: Arc<dyn StateStore>, command: ThemeCommand, json: bool) -> Result<()> {
    let mut preference = ThemePreference::load(store);
    let theme = match command {
        ThemeCommand::Show => preference.current(),
        ThemeCommand::Toggle => preference.toggle()?,
        ThemeCommand::Set { mode } => preference.set(&mode)?,
    };
    if json {
        println!("{}", serde_json::json!({ "theme": theme.as_str() }));
    } else {
        println!("Theme: {}", theme);
    }
    Ok(())
}

fn handle_context_command(config: &mut Config, command: ContextCommand) -> Result<()> {
    match command {
        ContextCommand::Add { name, url, set_current } => {
            config.add(&name, &url, set_current);
            config.save()?;
            println!("Context '{}' added.", name);
            if config.current_context.as_ref() == Some(&name) {
                println!("Context '{}' is now the current context.", name);
            }
        }
        ContextCommand::List => {
            println!("  {:<20} {:<30}", "NAME", "SERVER URL");
            for (name, ctx) in &config.contexts {
                let current_mark = if config.current_context.as_ref() == Some(name) {
                    "*"
                } else {
                    " "
                };
                println!("{} {:<20} {:<30}", current_mark, name, ctx.server_url);
            }
        }
        ContextCommand::Use { name } => {
            if let Err(e) = config.switch(&name) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            config.save()?;
            println!("Switched to context '{}'.", name);
        }
        ContextCommand::Delete { name } => {
            if let Err(e) = config.delete(&name) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            config.save()?;
            println!("Context '{}' deleted.", name);
        }
        ContextCommand::Current => match config.current() {
            Some((name, ctx)) => println!("Current context: {} ({})", name, ctx.server_url),
            None => println!("No current context set."),
        },
    }
    Ok(())
}
