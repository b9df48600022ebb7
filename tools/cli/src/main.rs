//! Coffer CLI - Command line interface for password-based encryption.
//!
//! `encrypt`/`decrypt` move whole files through the streaming wire format
//! (IV plus ciphertext, unauthenticated); `seal`/`open` work on the
//! authenticated buffer format (tag, IV, ciphertext).

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

use coffer_crypto::{
    decrypt, decrypt_file, encrypt, encrypt_file, CipherAlgorithm, CipherSuite, HashAlgorithm,
    TagEncoding,
};

#[derive(Parser)]
#[command(name = "coffer")]
#[command(about = "Coffer - Password-based file and buffer encryption")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file into the streaming format (no authentication tag).
    Encrypt {
        /// Source file to encrypt.
        source: PathBuf,

        /// Destination for the encrypted output.
        dest: PathBuf,

        /// Cipher: "aes-128-cbc" or "aes-256-cbc".
        #[arg(short, long, default_value_t)]
        cipher: CipherAlgorithm,

        /// Key-derivation hash: "sha256" or "sha512".
        #[arg(long, default_value_t)]
        hash: HashAlgorithm,
    },

    /// Decrypt a file from the streaming format.
    Decrypt {
        /// Encrypted source file.
        source: PathBuf,

        /// Destination for the decrypted output.
        dest: PathBuf,

        /// Cipher: "aes-128-cbc" or "aes-256-cbc".
        #[arg(short, long, default_value_t)]
        cipher: CipherAlgorithm,

        /// Key-derivation hash: "sha256" or "sha512".
        #[arg(long, default_value_t)]
        hash: HashAlgorithm,
    },

    /// Seal data into the authenticated buffer format.
    Seal {
        /// Destination for the sealed payload.
        dest: PathBuf,

        /// Read the plaintext from a file.
        #[arg(short, long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Use the given string as plaintext.
        #[arg(short, long)]
        text: Option<String>,

        /// Cipher: "aes-128-cbc" or "aes-256-cbc".
        #[arg(short, long, default_value_t)]
        cipher: CipherAlgorithm,

        /// Key-derivation and tag hash: "sha256" or "sha512".
        #[arg(long, default_value_t)]
        hash: HashAlgorithm,

        /// Tag encoding: "hex", "base64", or "binary".
        #[arg(short, long, default_value_t)]
        encoding: TagEncoding,
    },

    /// Open a sealed payload, verifying its tag.
    Open {
        /// Sealed payload file.
        source: PathBuf,

        /// Write the plaintext to a file.
        #[arg(short, long, conflicts_with = "print")]
        output: Option<PathBuf>,

        /// Print the plaintext to stdout (requires valid UTF-8).
        #[arg(short, long)]
        print: bool,

        /// Cipher: "aes-128-cbc" or "aes-256-cbc".
        #[arg(short, long, default_value_t)]
        cipher: CipherAlgorithm,

        /// Key-derivation and tag hash: "sha256" or "sha512".
        #[arg(long, default_value_t)]
        hash: HashAlgorithm,

        /// Tag encoding: "hex", "base64", or "binary".
        #[arg(short, long, default_value_t)]
        encoding: TagEncoding,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Encrypt {
            source,
            dest,
            cipher,
            hash,
        } => {
            let suite = CipherSuite {
                cipher,
                hash,
                ..CipherSuite::default()
            };
            cmd_encrypt(&source, &dest, &suite).await
        }

        Commands::Decrypt {
            source,
            dest,
            cipher,
            hash,
        } => {
            let suite = CipherSuite {
                cipher,
                hash,
                ..CipherSuite::default()
            };
            cmd_decrypt(&source, &dest, &suite).await
        }

        Commands::Seal {
            dest,
            input,
            text,
            cipher,
            hash,
            encoding,
        } => {
            let suite = CipherSuite {
                cipher,
                hash,
                encoding,
            };
            cmd_seal(&dest, input.as_deref(), text.as_deref(), &suite).await
        }

        Commands::Open {
            source,
            output,
            print,
            cipher,
            hash,
            encoding,
        } => {
            let suite = CipherSuite {
                cipher,
                hash,
                encoding,
            };
            cmd_open(&source, output.as_deref(), print, &suite).await
        }

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Prompt for a password securely.
fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password(prompt).context("Failed to read password")?;
    Ok(Zeroizing::new(password))
}

/// Prompt for a new password, asking twice to catch typos.
fn prompt_new_password() -> Result<Zeroizing<String>> {
    let password = prompt_password("Enter password: ")?;
    let confirm = prompt_password("Confirm password: ")?;

    if *password != *confirm {
        anyhow::bail!("Passwords do not match");
    }

    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    Ok(password)
}

/// Encrypt a file with the streaming format.
async fn cmd_encrypt(source: &Path, dest: &Path, suite: &CipherSuite) -> Result<()> {
    let password = prompt_new_password()?;

    let written = encrypt_file(source, dest, &password, suite)
        .await
        .context("Failed to encrypt file")?;

    println!("File encrypted: {} ({} bytes)", dest.display(), written);

    Ok(())
}

/// Decrypt a file from the streaming format.
async fn cmd_decrypt(source: &Path, dest: &Path, suite: &CipherSuite) -> Result<()> {
    let password = prompt_password("Enter password: ")?;

    let written = decrypt_file(source, dest, &password, suite)
        .await
        .context("Failed to decrypt file")?;

    println!("File decrypted: {} ({} bytes)", dest.display(), written);

    Ok(())
}

/// Seal plaintext into the authenticated buffer format.
async fn cmd_seal(
    dest: &Path,
    input: Option<&Path>,
    text: Option<&str>,
    suite: &CipherSuite,
) -> Result<()> {
    let plaintext = match (input, text) {
        (Some(path), None) => tokio::fs::read(path)
            .await
            .context("Failed to read input file")?,
        (None, Some(text)) => text.as_bytes().to_vec(),
        _ => anyhow::bail!("Provide exactly one of --input or --text"),
    };

    let password = prompt_new_password()?;

    let payload = encrypt(&plaintext, &password, suite).context("Failed to seal payload")?;
    tokio::fs::write(dest, &payload)
        .await
        .context("Failed to write sealed payload")?;

    println!("Payload sealed: {} ({} bytes)", dest.display(), payload.len());

    Ok(())
}

/// Open a sealed payload after verifying its tag.
async fn cmd_open(
    source: &Path,
    output: Option<&Path>,
    print: bool,
    suite: &CipherSuite,
) -> Result<()> {
    let payload = tokio::fs::read(source)
        .await
        .context("Failed to read sealed payload")?;

    let password = prompt_password("Enter password: ")?;
    let plaintext = decrypt(&payload, &password, suite).context("Failed to open payload")?;

    match (output, print) {
        (Some(path), false) => {
            tokio::fs::write(path, &plaintext)
                .await
                .context("Failed to write output file")?;
            println!("Payload opened: {} ({} bytes)", path.display(), plaintext.len());
        }
        (None, true) => {
            let text = String::from_utf8(plaintext)
                .context("Plaintext is not valid UTF-8; use --output instead")?;
            println!("{}", text);
        }
        _ => anyhow::bail!("Provide exactly one of --output or --print"),
    }

    Ok(())
}

/// Write completions for `shell` to stdout.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
