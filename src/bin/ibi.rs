use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use clap::{Parser, Subcommand};
use sigma_ibi::protocol::{identify, Issuer, Verifier};
use sigma_ibi::{EngineConfig, IdentificationScheme, NonceLedger, Scheme, SchemeKind, SecureRng};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "ibi")]
#[command(about = "Identity-based identification toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Scheme variant; overrides the configured one
    #[arg(short, long, value_enum)]
    scheme: Option<SchemeKind>,

    /// Parallel bit-challenge rounds for fiat-shamir
    #[arg(long)]
    rounds: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a master key pair
    Setup,

    /// Recompute the master public key from the secret key
    PublicKey {
        #[arg(long, help = "Hex-encoded master secret key")]
        msk: String,
    },

    /// Extract the user key for an identity
    Extract {
        #[arg(long, help = "Hex-encoded master secret key")]
        msk: String,

        #[arg(short, long)]
        identity: String,
    },

    /// Produce a non-interactive proof of identity
    Prove {
        #[arg(long, help = "Hex-encoded master public key")]
        mpk: String,

        #[arg(long, help = "Hex-encoded user secret key")]
        usk: String,

        #[arg(short, long)]
        identity: String,
    },

    /// Check a non-interactive proof
    Verify {
        #[arg(long, help = "Hex-encoded master public key")]
        mpk: String,

        #[arg(short, long)]
        identity: String,

        #[arg(short, long, help = "Hex-encoded proof")]
        proof: String,
    },

    /// Run interactive identifications locally, one thread per identity
    Identify {
        #[arg(
            short,
            long,
            value_delimiter = ',',
            required = true,
            help = "Comma-separated identities"
        )]
        identities: Vec<String>,

        #[arg(short = 'n', long, default_value = "1")]
        sessions: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = EngineConfig::from_env()?;
    if let Some(kind) = cli.scheme {
        config.scheme = kind;
    }
    if cli.rounds.is_some() {
        config.schnorr_rounds = cli.rounds;
    }
    let scheme = Scheme::from_config(&config)?;
    let mut rng = SecureRng::default();

    match cli.command {
        Commands::Setup => {
            let keys = scheme.setup(&mut rng)?;
            println!("mpk: {}", hex::encode(&keys.public));
            println!("msk: {}", hex::encode(&keys.secret));
        }
        Commands::PublicKey { msk } => {
            let mpk = scheme.master_public_key(&hex::decode(msk)?)?;
            println!("{}", hex::encode(mpk));
        }
        Commands::Extract { msk, identity } => {
            let usk = scheme.extract(&hex::decode(msk)?, &identity)?;
            println!("{}", hex::encode(usk));
        }
        Commands::Prove { mpk, usk, identity } => {
            let proof = scheme.prove(&mut rng, &hex::decode(mpk)?, &hex::decode(usk)?, &identity)?;
            println!("{}", hex::encode(proof));
        }
        Commands::Verify {
            mpk,
            identity,
            proof,
        } => {
            let accepted = scheme.verify(&hex::decode(mpk)?, &identity, &hex::decode(proof)?)?;
            if accepted {
                println!("accepted");
            } else {
                println!("rejected");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Identify {
            identities,
            sessions,
        } => {
            let ledger = NonceLedger::new(config.ledger_capacity);
            let rejected = match scheme {
                Scheme::Ezkp(s) => identify_all(s, &identities, sessions, ledger)?,
                Scheme::FiatShamir(s) => identify_all(s, &identities, sessions, ledger)?,
                Scheme::SignatureDelegated(s) => identify_all(s, &identities, sessions, ledger)?,
                Scheme::TwinExponent(s) => identify_all(s, &identities, sessions, ledger)?,
                Scheme::TwinSchnorr(s) => identify_all(s, &identities, sessions, ledger)?,
            };
            if rejected > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Returns the number of rejected sessions.
fn identify_all<S: IdentificationScheme>(
    scheme: S,
    identities: &[String],
    sessions: usize,
    ledger: NonceLedger,
) -> sigma_ibi::Result<usize> {
    let mut rng = SecureRng::default();
    let issuer = Issuer::setup(scheme, &mut rng)?;
    let verifier = Verifier::new(issuer.scheme().clone(), issuer.master_public_key().clone());

    let provers = identities
        .iter()
        .map(|identity| {
            issuer
                .enroll(identity)
                .map(|prover| prover.with_ledger(ledger.clone()))
        })
        .collect::<sigma_ibi::Result<Vec<_>>>()?;

    let start = Instant::now();
    let results: Vec<sigma_ibi::Result<usize>> = thread::scope(|scope| {
        let handles: Vec<_> = provers
            .iter()
            .map(|prover| {
                let verifier = &verifier;
                scope.spawn(move || -> sigma_ibi::Result<usize> {
                    let mut rng = SecureRng::default();
                    let mut rejected = 0;
                    for _ in 0..sessions {
                        let outcome = identify(&mut rng, prover, verifier)?;
                        println!("{}: {outcome}", prover.identity());
                        if !outcome.is_accepted() {
                            rejected += 1;
                        }
                    }
                    Ok(rejected)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    let rejected = results.into_iter().sum::<sigma_ibi::Result<usize>>()?;
    info!(
        scheme = %S::KIND,
        identities = identities.len(),
        sessions,
        rejected,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "identifications finished"
    );
    Ok(rejected)
}
