//! Biogate CLI
//!
//! Demo front-end for the authentication gate: probe capability, run a
//! challenge, manage gate-token enrollment. Plays the role a login screen
//! would in an application, reduced to stdout and exit codes.

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use biogate_core::{
    codes, describe_error, AuthOutcome, Authenticator, BiometricCapability, PlatformContext,
    SimulatedPlatform, SystemPlatform,
};

#[derive(Parser)]
#[command(name = "biogate")]
#[command(version)]
#[command(about = "Biometric authentication gate demo")]
#[command(after_help = "EXAMPLES:
  biogate capability                        Report what the device offers
  biogate status                            Probe availability and enrollment
  biogate enroll                            Enable the gate on this machine
  biogate authenticate --reason 'Unlock'    Run one challenge
  biogate --simulate face authenticate      Exercise the gate without a sensor")]
struct Cli {
    /// Use a scripted backend with this capability instead of the host OS
    #[arg(long, global = true, value_enum)]
    simulate: Option<SimulatedCapability>,

    /// Fail the evaluability probe with this error code (simulated backend)
    #[arg(long, global = true, requires = "simulate", allow_hyphen_values = true)]
    deny_probe: Option<i32>,

    /// Fail the challenge with this error code (simulated backend)
    #[arg(long, global = true, requires = "simulate", allow_hyphen_values = true)]
    deny_challenge: Option<i32>,

    /// Account scoping the enrolled gate token
    #[arg(long, global = true, default_value = "default")]
    account: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SimulatedCapability {
    Face,
    Fingerprint,
    Passcode,
}

impl From<SimulatedCapability> for BiometricCapability {
    fn from(value: SimulatedCapability) -> Self {
        match value {
            SimulatedCapability::Face => BiometricCapability::FaceRecognition,
            SimulatedCapability::Fingerprint => BiometricCapability::FingerprintRecognition,
            SimulatedCapability::Passcode => BiometricCapability::PasscodeOnly,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Report the device's authentication capability
    Capability {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Probe availability and enrollment without prompting
    Status,

    /// Run one authentication challenge
    Authenticate {
        /// Text shown to the user during the platform prompt
        #[arg(long, default_value = "Authenticate to continue")]
        reason: String,

        /// Emit the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enroll a gate token so the OS can challenge for it
    Enroll,

    /// Remove the enrolled gate token
    Unenroll,
}

/// Initialize logging to stderr (stdout carries command output)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .compact(),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Enrollment management talks to the host keychain directly and has no
    // simulated counterpart.
    match &cli.command {
        Commands::Enroll => {
            if cli.simulate.is_some() {
                return Err("enrollment is not available on the simulated backend".into());
            }
            return handle_enroll(&cli.account);
        }
        Commands::Unenroll => {
            if cli.simulate.is_some() {
                return Err("enrollment is not available on the simulated backend".into());
            }
            let platform = SystemPlatform::new(cli.account.clone());
            platform.unenroll()?;
            println!("Gate token removed for account '{}'", cli.account);
            return Ok(());
        }
        _ => {}
    }

    match cli.simulate {
        Some(capability) => {
            let mut platform = SimulatedPlatform::new(capability.into());
            if let Some(code) = cli.deny_probe {
                platform = platform.deny_probe(code);
            }
            if let Some(code) = cli.deny_challenge {
                platform = platform.deny_challenge(code);
            }
            debug!("using simulated backend");
            run(Authenticator::new(platform), cli.command).await
        }
        None => run(Authenticator::system(cli.account.clone()), cli.command).await,
    }
}

async fn run<P: PlatformContext>(
    auth: Authenticator<P>,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Capability { json } => handle_capability(&auth, json),
        Commands::Status => handle_status(&auth),
        Commands::Authenticate { reason, json } => handle_authenticate(&auth, reason, json).await,
        // Handled before backend selection
        Commands::Enroll | Commands::Unenroll => unreachable!(),
    }
}

fn handle_capability<P: PlatformContext>(
    auth: &Authenticator<P>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let capability = auth.detect_capability();

    if json {
        println!("{}", serde_json::to_string_pretty(&capability)?);
    } else {
        println!("Capability: {}", capability);
    }

    Ok(())
}

fn handle_status<P: PlatformContext>(
    auth: &Authenticator<P>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Authentication Gate Status");
    println!("==========================");
    println!();

    let capability = auth.detect_capability();
    println!("Capability: {}", capability);

    if capability.is_biometric() {
        println!("[OK] Biometric sensor detected");
    } else {
        println!("[--] No biometric hardware detected");
    }

    match auth.platform().can_evaluate() {
        Ok(()) => println!("[OK] Challenge can be presented"),
        Err(code) => {
            println!("[--] {} (code {})", describe_error(code), code);
            if code == codes::BIOMETRY_NOT_ENROLLED {
                println!();
                println!("Enable with: biogate enroll");
            }
        }
    }

    Ok(())
}

async fn handle_authenticate<P: PlatformContext>(
    auth: &Authenticator<P>,
    reason: String,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Bridge the background callback back to the main task
    let (tx, rx) = tokio::sync::oneshot::channel::<AuthOutcome>();
    auth.authenticate(reason, move |outcome| {
        let _ = tx.send(outcome);
    });
    let outcome = rx.await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.succeeded {
        println!("Authentication succeeded");
    } else {
        println!(
            "Authentication failed (code {}): {}",
            outcome.error_code.unwrap_or_default(),
            outcome.error_message
        );
    }

    if !outcome.succeeded {
        std::process::exit(1);
    }

    Ok(())
}

fn handle_enroll(account: &str) -> Result<(), Box<dyn std::error::Error>> {
    let platform = SystemPlatform::new(account.to_string());

    if platform.is_enrolled() {
        println!("Gate token already enrolled for account '{}'", account);
        return Ok(());
    }

    // The token's content never matters; the OS challenge for retrieving it
    // is the authentication.
    let token = uuid::Uuid::new_v4();
    platform.enroll(token.as_bytes())?;

    println!("Gate token enrolled for account '{}'", account);
    println!("Run 'biogate status' to verify.");

    Ok(())
}
