use clap::{Parser, Subcommand};
use fieldnotes::{keys, tls};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dial a TLS endpoint and print its certificate chain
    Certs {
        host: String,

        #[arg(long, default_value_t = 443)]
        port: u16,
    },
    /// Generate an RSA private key and print it as PEM
    Keygen {
        #[arg(long, default_value_t = keys::DEFAULT_BITS)]
        bits: usize,

        /// Encrypt the key under this passphrase (PKCS#8)
        #[arg(long)]
        passphrase: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Certs { host, port } => {
            let summaries = tls::inspect_chain(&host, port).await.into_diagnostic()?;
            println!("Chain for {host}:{port}");
            for summary in &summaries {
                println!("\t{summary}");
            }
        }
        Command::Keygen { bits, passphrase } => {
            let pem = match passphrase {
                Some(passphrase) => keys::generate_encrypted_private_key_pem(bits, &passphrase),
                None => keys::generate_private_key_pem(bits),
            }
            .into_diagnostic()?;
            print!("{pem}");
        }
    }

    Ok(())
}
