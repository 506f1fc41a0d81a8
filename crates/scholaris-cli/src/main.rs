use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use scholaris_cli::{admin, catalog};
use scholaris_core::{AccessMode, SystemRole, verify_registry};
use scholaris_db::{DatabaseConfig, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "scholaris-cli")]
#[command(about = "Scholaris CLI - Permission inspection and administrative tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the permission catalogue
    Permissions {
        /// Only print this category (slug or display name)
        #[arg(short = 'c', long)]
        category: Option<String>,
    },
    /// Print the role templates
    Roles {
        /// Role key, e.g. `teacher`
        role: Option<SystemRole>,
    },
    /// Check whether a role satisfies a permission requirement
    Check {
        #[arg(short = 'r', long)]
        role: SystemRole,

        #[arg(short = 'm', long, value_enum, default_value_t = Mode::All)]
        mode: Mode,

        /// Permission tokens, e.g. `grading:view`
        tokens: Vec<String>,
    },
    /// Check the permission registry for integrity problems
    Verify,
    /// Create a super admin account
    CreateSuperAdmin {
        /// First name of the super admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the super admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Any,
    All,
}

impl From<Mode> for AccessMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Any => AccessMode::Any,
            Mode::All => AccessMode::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Permissions { category } => {
            match category {
                Some(key) => print!("{}", catalog::render_category(&key)),
                None => print!("{}", catalog::render_catalog()),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Roles { role } => {
            print!("{}", catalog::render_roles(role));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { role, mode, tokens } => {
            let outcome = catalog::check_role(role, &tokens, mode.into());
            print!("{}", catalog::render_check(&outcome));
            Ok(if outcome.allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Verify => match verify_registry() {
            Ok(()) => {
                println!("✅ Permission registry is consistent");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("❌ {}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::CreateSuperAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_super_admin(first_name, last_name, email, password).await,
    }
}

async fn handle_create_super_admin(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<ExitCode> {
    let first_name = match first_name {
        Some(value) => value,
        None => Input::<String>::new().with_prompt("First name").interact_text()?,
    };

    let last_name = match last_name {
        Some(value) => value,
        None => Input::<String>::new().with_prompt("Last name").interact_text()?,
    };

    let email = match email {
        Some(value) => value,
        None => Input::<String>::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(value) => value,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config).await?;
    run_migrations(&pool).await?;

    match admin::create_super_admin(&pool, &first_name, &last_name, &email, &password).await {
        Ok(user_id) => {
            println!("\n✅ Super admin created successfully!");
            println!("   ID: {}", user_id);
            println!("   Email: {}", email);
            println!("   Name: {} {}", first_name, last_name);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("\n❌ Error creating super admin: {:#}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "scholaris-cli",
            "check",
            "--role",
            "parent",
            "--mode",
            "any",
            "grading:view",
            "system:settings",
        ])
        .unwrap();

        match cli.command {
            Commands::Check { role, mode, tokens } => {
                assert_eq!(role, SystemRole::Parent);
                assert_eq!(AccessMode::from(mode), AccessMode::Any);
                assert_eq!(tokens, vec!["grading:view", "system:settings"]);
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_check_mode_defaults_to_all() {
        let cli =
            Cli::try_parse_from(["scholaris-cli", "check", "-r", "teacher", "class:view"]).unwrap();
        match cli.command {
            Commands::Check { mode, .. } => assert_eq!(AccessMode::from(mode), AccessMode::All),
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(Cli::try_parse_from(["scholaris-cli", "roles", "janitor"]).is_err());
    }

    #[test]
    fn test_parse_permissions_category() {
        let cli =
            Cli::try_parse_from(["scholaris-cli", "permissions", "--category", "library"]).unwrap();
        match cli.command {
            Commands::Permissions { category } => assert_eq!(category.as_deref(), Some("library")),
            _ => panic!("expected permissions command"),
        }
    }

    #[test]
    fn test_parse_create_super_admin_flags() {
        let cli = Cli::try_parse_from([
            "scholaris-cli",
            "create-super-admin",
            "-f",
            "Ada",
            "-e",
            "ada@school.test",
        ])
        .unwrap();
        match cli.command {
            Commands::CreateSuperAdmin {
                first_name,
                last_name,
                email,
                password,
            } => {
                assert_eq!(first_name.as_deref(), Some("Ada"));
                assert_eq!(last_name, None);
                assert_eq!(email.as_deref(), Some("ada@school.test"));
                assert_eq!(password, None);
            }
            _ => panic!("expected create-super-admin command"),
        }
    }
}
