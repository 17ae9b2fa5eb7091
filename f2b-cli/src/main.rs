#![forbid(unsafe_code)]

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use f2b_sdk::Fail2banClient;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

mod settings;

#[derive(Debug, Parser)]
#[command(name = "f2b", version, about = "Query and control a running fail2ban daemon")]
struct Cli {
	/// Control socket path (override)
	#[arg(long, global = true)]
	socket: Option<String>,
	/// Request timeout in milliseconds
	#[arg(long, global = true)]
	timeout_ms: Option<u64>,
	/// TOML config file. Default search: $F2B_CONFIG, ./f2b.toml, $XDG_CONFIG_HOME/f2b/f2b.toml, ~/.config/f2b/f2b.toml
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Check that the daemon answers
	Ping,
	/// Show the daemon version
	Version,
	/// Server status, or a jail's status when a jail is given
	Status { jail: Option<String> },
	/// Ban an IP in a jail
	Ban { jail: String, ip: String },
	/// Unban an IP in a jail
	Unban { jail: String, ip: String },
	/// Inspect or edit a jail's failregex list
	Failregex {
		#[command(subcommand)]
		action: RegexCmd,
	},
	/// Read a jail parameter
	Get { jail: String, param: JailParam },
	/// Change a jail parameter
	Set { jail: String, param: JailParam, value: String },
	/// Read a property of one of the jail's actions
	ActionProperty { jail: String, action: String, property: String },
	/// Show the daemon log level, or change it with --set
	Loglevel {
		#[arg(long)]
		set: Option<String>,
	},
	/// Config helpers
	Config {
		#[command(subcommand)]
		action: ConfigCmd,
	},
}

#[derive(Debug, Subcommand)]
enum RegexCmd {
	List { jail: String },
	Add { jail: String, regex: String },
	/// Delete by pattern; fails if the jail does not have it
	Del { jail: String, regex: String },
}

#[derive(Debug, Subcommand)]
enum ConfigCmd {
	/// Show the effective configuration and where it came from
	Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum JailParam {
	Findtime,
	Maxretry,
	Bantime,
	Usedns,
	Actions,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
	let cli = Cli::parse();
	let resolved = match settings::resolve(cli.config.clone(), cli.socket.clone(), cli.timeout_ms) {
		Ok(r) => r,
		Err(e) => {
			eprintln!("error: {e:#}");
			std::process::exit(1);
		}
	};
	settings::init_logging(&resolved.config.log_level);

	if let Err(e) = run(cli.command, resolved).await {
		eprintln!("error: {e:#}");
		std::process::exit(1);
	}
}

async fn run(command: Commands, resolved: settings::Resolved) -> anyhow::Result<()> {
	let client = Fail2banClient::new(resolved.config.clone());
	match command {
		Commands::Ping => print_json(client.ping().await?),
		Commands::Version => print_json(client.version().await?),
		Commands::Status { jail: None } => print_json(client.server_status().await?),
		Commands::Status { jail: Some(jail) } => print_json(client.jail_status(&jail).await?),
		Commands::Ban { jail, ip } => print_json(client.jail_ban_ip(&jail, &ip).await?),
		Commands::Unban { jail, ip } => print_json(client.jail_unban_ip(&jail, &ip).await?),
		Commands::Failregex { action } => match action {
			RegexCmd::List { jail } => print_json(client.jail_fail_regex(&jail).await?),
			RegexCmd::Add { jail, regex } => print_json(client.jail_add_fail_regex(&jail, &regex).await?),
			RegexCmd::Del { jail, regex } => print_json(client.jail_delete_fail_regex(&jail, &regex).await?),
		},
		Commands::Get { jail, param } => match param {
			JailParam::Findtime => print_json(client.jail_find_time(&jail).await?),
			JailParam::Maxretry => print_json(client.jail_max_retry(&jail).await?),
			JailParam::Bantime => print_json(client.jail_ban_time(&jail).await?),
			JailParam::Usedns => print_json(client.jail_use_dns(&jail).await?),
			JailParam::Actions => print_json(client.jail_actions(&jail).await?),
		},
		Commands::Set { jail, param, value } => match param {
			JailParam::Findtime => print_json(client.jail_set_find_time(&jail, parse_int(&value)?).await?),
			JailParam::Maxretry => print_json(client.jail_set_max_retry(&jail, parse_int(&value)?).await?),
			JailParam::Bantime => print_json(client.jail_set_ban_time(&jail, parse_int(&value)?).await?),
			JailParam::Usedns => print_json(client.jail_set_use_dns(&jail, &value).await?),
			JailParam::Actions => bail!("actions cannot be set from here"),
		},
		Commands::ActionProperty { jail, action, property } => {
			print_json(client.jail_action_property(&jail, &action, &property).await?)
		}
		Commands::Loglevel { set: None } => print_json(client.log_level().await?),
		Commands::Loglevel { set: Some(level) } => print_json(client.set_log_level(&level).await?),
		Commands::Config { action: ConfigCmd::Show } => print_json(json!({
			"source": resolved.source.map(|p| p.display().to_string()),
			"config": resolved.config,
		})),
	}
}

fn parse_int(raw: &str) -> anyhow::Result<i64> {
	raw.trim().parse().with_context(|| format!("expected an integer, got {raw:?}"))
}

fn print_json<T: Serialize>(value: T) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(&value)?);
	Ok(())
}
