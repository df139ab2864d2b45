use clap::Parser;
use clap::Subcommand;
use escrow_cli::CliError;
use escrow_cli::DiscriminatorKind;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "escrow", version, about = "Client for escrow offers")]
struct Cli {
	/// Print machine readable JSON instead of text.
	#[arg(long, global = true, default_value_t = false)]
	json: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Derive the offer record address of a maker and offer id.
	DeriveOffer {
		/// Base58 address of the maker.
		#[arg(long)]
		maker: String,

		/// Offer id chosen by the maker.
		#[arg(long)]
		id: u64,
	},
	/// Derive the custody account of an offer record.
	DeriveCustody {
		/// Base58 address of the offer record.
		#[arg(long)]
		offer: String,

		/// Base58 address of the asset kind held in custody.
		#[arg(long)]
		mint: String,
	},
	/// Compute the dispatch identifier of an instruction or record type.
	Discriminator {
		/// Instruction name in snake case (or record type name with
		/// `--account`).
		name: String,

		/// Compute the tag of a stored record type instead.
		#[arg(long, default_value_t = false)]
		account: bool,
	},
	/// Encode a `MakeOffer` instruction payload as hex.
	EncodeMakeOffer {
		#[arg(long)]
		id: u64,

		/// Amount of asset A placed in custody, in base units.
		#[arg(long)]
		offered: u64,

		/// Amount of asset B wanted in exchange, in base units.
		#[arg(long)]
		wanted: u64,
	},
	/// Make and take an offer on a fresh local ledger.
	Demo,
}

fn main() {
	let cli = Cli::parse();

	if let Err(e) = run(cli) {
		eprintln!("Error: {e}");
		std::process::exit(1);
	}
}

fn run(cli: Cli) -> Result<(), CliError> {
	let json = cli.json;

	match cli.command {
		Commands::DeriveOffer { maker, id } => {
			let derived = escrow_cli::derive_offer(&maker, id)?;
			emit(json, &derived, || {
				format!("{} (bump {})", derived.address, derived.bump.unwrap_or_default())
			})
		}
		Commands::DeriveCustody { offer, mint } => {
			let derived = escrow_cli::derive_custody(&offer, &mint)?;
			emit(json, &derived, || derived.address.clone())
		}
		Commands::Discriminator { name, account } => {
			let kind = if account {
				DiscriminatorKind::Account
			} else {
				DiscriminatorKind::Instruction
			};
			let discriminator = escrow_cli::compute_discriminator(&name, kind);
			emit(json, &discriminator, || {
				format!("{} {:?}", discriminator.hex, discriminator.bytes)
			})
		}
		Commands::EncodeMakeOffer {
			id,
			offered,
			wanted,
		} => {
			let payload = escrow_cli::encode_make_offer(id, offered, wanted);
			emit(json, &payload, || payload.hex.clone())
		}
		Commands::Demo => {
			let report = escrow_cli::run_demo()?;
			emit(json, &report, || report.to_string())
		}
	}
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<(), CliError> {
	if json {
		println!("{}", serde_json::to_string_pretty(value)?);
	} else {
		println!("{}", text());
	}

	Ok(())
}
