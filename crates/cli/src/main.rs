//! Jikoni CLI - Admin panel for the Jikoni Studios catalogue API.
//!
//! # Usage
//!
//! ```bash
//! # Start a session (password from JIKONI_ADMIN_PASSWORD or --password)
//! jikoni login -u admin
//!
//! # Manage the catalogue
//! jikoni products list --category Kitchen --page 2
//! jikoni products create --name "Walnut Island" --price 185000 --featured true
//! jikoni products delete 7 --yes
//!
//! # Work the inbox
//! jikoni messages list --status new
//! jikoni messages mark 12 read
//!
//! # End the session
//! jikoni logout
//! ```
//!
//! # Environment Variables
//!
//! - `JIKONI_API_URL` - API origin (default `http://localhost:5000`)
//! - `JIKONI_SESSION_FILE` - Where the session is kept between runs
//! - `JIKONI_LOG_FORMAT` - `json` for structured logs, text otherwise
//! - `RUST_LOG` - Log filter (default `jikoni=info,jikoni_client=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use jikoni_client::forms::ContactForm;
use jikoni_client::models::{MessageQuery, ProductQuery};
use jikoni_client::{AdminClient, ClientConfig};
use jikoni_core::{Category, MessageId, MessageStatus, ProductId};
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod navigator;
mod output;

use error::CliError;
use navigator::CliNavigator;
use output::Output;

#[derive(Parser)]
#[command(name = "jikoni")]
#[command(author, version, about = "Jikoni Studios admin CLI")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "JIKONI_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in admin
    Whoami,
    /// Show or update the admin profile
    Profile {
        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New password
        #[arg(long, env = "JIKONI_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage contact messages
    Messages {
        #[command(subcommand)]
        action: MessagesAction,
    },
    /// Submit the public contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long)]
        message: String,
    },
    /// Dashboard counters
    Stats,
    /// List product categories
    Categories,
    /// Check that the API is up
    Health,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,

        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Show one product
    Show { id: ProductId },
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Update a product; unset fields keep their current value
    Update {
        id: ProductId,

        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete {
        id: ProductId,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: Option<String>,

    /// Kitchen, Wardrobe, Cabinetry or Custom
    #[arg(long)]
    category: Option<Category>,

    #[arg(long)]
    description: Option<String>,

    /// Price in KSh; pass "" to clear
    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    featured: Option<bool>,

    #[arg(long)]
    image_url: Option<String>,
}

impl From<ProductArgs> for commands::products::FieldArgs {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            category: args.category,
            description: args.description,
            price: args.price,
            featured: args.featured,
            image_url: args.image_url,
        }
    }
}

#[derive(Subcommand)]
enum MessagesAction {
    /// List messages
    List {
        /// new, read or replied
        #[arg(long)]
        status: Option<MessageStatus>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show one message
    Show { id: MessageId },
    /// Set a message's status
    Mark { id: MessageId, status: MessageStatus },
    /// Delete a message
    Delete {
        id: MessageId,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jikoni=info,jikoni_client=info".into());

    let json = std::env::var("JIKONI_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let client = AdminClient::from_config(&config, Arc::new(CliNavigator)).await?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&client, out, &username, &SecretString::from(password)).await
        }
        Commands::Logout => commands::auth::logout(&client, out).await,
        Commands::Whoami => commands::auth::whoami(&client, out).await,
        Commands::Profile {
            email,
            new_password,
        } => {
            commands::auth::profile(
                &client,
                out,
                email.as_deref(),
                new_password.map(SecretString::from),
            )
            .await
        }
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                page,
                per_page,
                featured,
            } => {
                let query = ProductQuery {
                    category,
                    page,
                    per_page,
                    featured: featured.then_some(true),
                };
                commands::products::list(&client, out, query).await
            }
            ProductsAction::Show { id } => commands::products::show(&client, out, id).await,
            ProductsAction::Create { fields } => {
                commands::products::create(&client, out, fields.into()).await
            }
            ProductsAction::Update { id, fields } => {
                commands::products::update(&client, out, id, fields.into()).await
            }
            ProductsAction::Delete { id, yes } => {
                commands::products::delete(&client, out, id, yes).await
            }
        },
        Commands::Messages { action } => match action {
            MessagesAction::List {
                status,
                page,
                per_page,
            } => {
                let query = MessageQuery {
                    status,
                    page,
                    per_page,
                };
                commands::messages::list(&client, out, query).await
            }
            MessagesAction::Show { id } => commands::messages::show(&client, out, id).await,
            MessagesAction::Mark { id, status } => {
                commands::messages::mark(&client, out, id, status).await
            }
            MessagesAction::Delete { id, yes } => {
                commands::messages::delete(&client, out, id, yes).await
            }
        },
        Commands::Contact {
            name,
            email,
            phone,
            message,
        } => {
            let form = ContactForm {
                name,
                email,
                phone,
                message,
            };
            commands::messages::contact(&client, out, form).await
        }
        Commands::Stats => commands::info::stats(&client, out).await,
        Commands::Categories => commands::info::categories(&client, out).await,
        Commands::Health => commands::info::health(&client, out).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_product_list_filters() {
        let cli = Cli::try_parse_from([
            "jikoni", "products", "list", "--category", "wardrobe", "--page", "2",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Products {
            action: ProductsAction::List { category, page, featured, .. },
        } = cli.command
        else {
            panic!("expected products list");
        };
        assert_eq!(category, Some(Category::Wardrobe));
        assert_eq!(page, Some(2));
        assert!(!featured);
    }

    #[test]
    fn test_parses_message_mark() {
        let cli = Cli::try_parse_from(["jikoni", "messages", "mark", "12", "replied"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Messages {
                action: MessagesAction::Mark { status: MessageStatus::Replied, .. }
            }
        ));
    }
}
