use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
mod config;
use config::Config;
use credkit::format::{self, HashKind};
use credkit::{
    Argon2Config, Argon2idHash, Coder, HS256, HS512, HmacSigner, KeyPairGenerator, PS256, PS512,
    PrivateKeyFormat, PublicKeyFormat, RS256, RS512, RsaScheme, RsaSigner, RsaVerifier, Scrypt,
    ScryptHash, ScryptParams, Signer, Verifier, password,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB (default: 65536)
    #[arg(long = "argon-mem")]
    memory_cost: Option<u32>,

    /// Argon2 time cost / iterations (default: 2)
    #[arg(long = "argon-time")]
    time_cost: Option<u32>,

    /// Argon2 parallelism (default: 4)
    #[arg(long = "argon-parallelism")]
    threads: Option<u32>,

    /// Argon2 digest length in bytes (default: 32)
    #[arg(long = "argon-len")]
    key_length: Option<u32>,
}

impl Argon2Args {
    fn to_config(&self, base: Argon2Config) -> Result<Argon2Config> {
        Ok(Argon2Config::new(
            self.time_cost.unwrap_or(base.time_cost()),
            self.memory_cost.unwrap_or(base.memory_cost()),
            self.threads.unwrap_or(base.threads()),
            self.key_length.unwrap_or(base.key_length()),
        )?)
    }
}

#[derive(Debug, clap::Args)]
struct ScryptArgs {
    /// scrypt CPU/memory cost, a power of two (default: 32768)
    #[arg(long = "scrypt-n")]
    n: Option<u64>,

    /// scrypt block size (default: 8)
    #[arg(long = "scrypt-r")]
    r: Option<u32>,

    /// scrypt parallelism (default: 1)
    #[arg(long = "scrypt-p")]
    p: Option<u32>,

    /// scrypt salt length in bytes (default: 8)
    #[arg(long = "scrypt-salt-len")]
    salt_len: Option<usize>,

    /// scrypt derived key length in bytes (default: 32)
    #[arg(long = "scrypt-key-len")]
    dk_len: Option<usize>,
}

impl ScryptArgs {
    fn to_params(&self, base: ScryptParams) -> Result<ScryptParams> {
        Ok(ScryptParams::new(
            self.n.unwrap_or(base.n),
            self.r.unwrap_or(base.r),
            self.p.unwrap_or(base.p),
            self.salt_len.unwrap_or(base.salt_len),
            self.dk_len.unwrap_or(base.dk_len),
        )?)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PasswordAlgo {
    Argon2id,
    Scrypt,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SigAlgo {
    Hs256,
    Hs512,
    Rs256,
    Rs512,
    Ps256,
    Ps512,
}

impl SigAlgo {
    fn rsa_scheme(self) -> Option<RsaScheme> {
        match self {
            SigAlgo::Rs256 => Some(RS256),
            SigAlgo::Rs512 => Some(RS512),
            SigAlgo::Ps256 => Some(PS256),
            SigAlgo::Ps512 => Some(PS512),
            SigAlgo::Hs256 | SigAlgo::Hs512 => None,
        }
    }

    fn hmac(self, secret: &[u8], msg_coder: Coder, sig_coder: Coder) -> credkit::Result<HmacSigner> {
        let scheme = match self {
            SigAlgo::Hs512 => HS512,
            _ => HS256,
        };
        HmacSigner::new(scheme, secret, msg_coder, sig_coder)
    }
}

#[derive(Debug, clap::Args)]
struct SigArgs {
    /// Signature algorithm
    #[arg(long, value_enum, ignore_case = true)]
    alg: SigAlgo,

    /// PEM key file (RSA algorithms only; HMAC secrets come from CREDKIT_SECRET)
    #[arg(long, value_name = "PATH")]
    key: Option<PathBuf>,

    /// Container of the PEM key: pkcs1, pkcs8 (private) or pkix (public)
    #[arg(long, value_name = "FORMAT")]
    key_format: Option<String>,

    /// How the message argument is encoded
    #[arg(long, default_value = "utf8")]
    message_coder: Coder,

    /// How signatures are encoded: hex or base64
    #[arg(long, default_value = "base64")]
    signature_coder: Coder,
}

impl SigArgs {
    fn key_pem(&self) -> Result<String> {
        let Some(path) = &self.key else {
            bail!("--key is required for {:?}", self.alg);
        };
        fs::read_to_string(path).with_context(|| format!("failed to read key {}", path.display()))
    }

    fn signer(&self) -> Result<Box<dyn Signer>> {
        let Some(scheme) = self.alg.rsa_scheme() else {
            let secret = auth::read_secret()?;
            return Ok(Box::new(self.alg.hmac(
                secret.as_bytes(),
                self.message_coder,
                self.signature_coder,
            )?));
        };

        let format = match &self.key_format {
            Some(f) => f.parse::<PrivateKeyFormat>().map_err(anyhow::Error::msg)?,
            None => PrivateKeyFormat::Pkcs1,
        };
        let pem = zeroize::Zeroizing::new(self.key_pem()?);
        Ok(Box::new(RsaSigner::from_pem(
            scheme,
            format,
            &pem,
            self.message_coder,
            self.signature_coder,
        )?))
    }

    fn verifier(&self) -> Result<Box<dyn Verifier>> {
        let Some(scheme) = self.alg.rsa_scheme() else {
            let secret = auth::read_secret()?;
            return Ok(Box::new(self.alg.hmac(
                secret.as_bytes(),
                self.message_coder,
                self.signature_coder,
            )?));
        };

        let format = match &self.key_format {
            Some(f) => f.parse::<PublicKeyFormat>().map_err(anyhow::Error::msg)?,
            None => PublicKeyFormat::Pkix,
        };
        Ok(Box::new(RsaVerifier::from_pem(
            scheme,
            format,
            &self.key_pem()?,
            self.message_coder,
            self.signature_coder,
        )?))
    }
}

#[derive(Debug, Parser)]
#[command(name = "credkit")]
#[command(
    version,
    about = "Password hashes, HMAC and RSA signatures from the command line."
)]
struct Cli {
    /// Path to a JSON config file with argon2/scrypt defaults
    #[arg(long, global = true, value_name = "PATH", env = "CREDKIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password read from CREDKIT_PASSWORD, stdin or a prompt
    Hash {
        #[arg(long, value_enum, default_value = "argon2id")]
        algo: PasswordAlgo,

        #[command(flatten)]
        argon2: Argon2Args,

        #[command(flatten)]
        scrypt: ScryptArgs,

        /// Coder for salt and key in scrypt hashes (default: hex)
        #[arg(long)]
        hash_coder: Option<Coder>,
    },

    /// Checks a password against a stored hash
    #[command(arg_required_else_help = true)]
    Verify {
        hash: String,

        /// Coder for salt and key in scrypt hashes (default: hex)
        #[arg(long)]
        hash_coder: Option<Coder>,
    },

    /// Prints the parameters embedded in a stored hash as JSON
    #[command(arg_required_else_help = true)]
    Inspect {
        hash: String,

        /// Coder for salt and key in scrypt hashes (default: hex)
        #[arg(long)]
        hash_coder: Option<Coder>,
    },

    /// Generates an RSA key pair
    Keygen {
        /// Private key container
        #[arg(long, default_value = "pkcs1")]
        private_format: PrivateKeyFormat,

        /// Public key container
        #[arg(long, default_value = "pkcs1")]
        public_format: PublicKeyFormat,

        /// Modulus size in bits
        #[arg(long, default_value_t = 2048)]
        bits: usize,

        /// Write the private key here instead of stdout
        #[arg(long, value_name = "PATH")]
        private_out: Option<PathBuf>,

        /// Write the public key here instead of stdout
        #[arg(long, value_name = "PATH")]
        public_out: Option<PathBuf>,
    },

    /// Signs a message
    #[command(arg_required_else_help = true)]
    Sign {
        #[command(flatten)]
        sig: SigArgs,

        message: String,
    },

    /// Checks a signature over a message
    #[command(arg_required_else_help = true)]
    VerifySignature {
        #[command(flatten)]
        sig: SigArgs,

        message: String,

        signature: String,
    },
}

#[derive(Debug, Serialize)]
struct Inspection {
    algorithm: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    params: serde_json::Value,
    salt_len: usize,
    digest_len: usize,
}

fn inspect(hash: &str, coder: Coder) -> Result<Inspection> {
    match format::identify(hash) {
        Some(HashKind::Argon2id) => {
            let parsed: Argon2idHash = hash.parse()?;
            Ok(Inspection {
                algorithm: password::argon2id::ALGO,
                version: Some(parsed.version()),
                params: serde_json::to_value(parsed.config())?,
                salt_len: parsed.salt().len(),
                digest_len: parsed.digest().len(),
            })
        }
        Some(HashKind::Scrypt) => {
            let parsed = ScryptHash::decode(hash, coder)?;
            Ok(Inspection {
                algorithm: password::scrypt::ALGO,
                version: None,
                params: serde_json::to_value(parsed.params())?,
                salt_len: parsed.salt().len(),
                digest_len: parsed.key().len(),
            })
        }
        None => bail!("unrecognised hash format"),
    }
}

fn write_or_print(path: Option<&Path>, pem: &str) -> Result<()> {
    match path {
        Some(p) => fs::write(p, pem).with_context(|| format!("failed to write {}", p.display())),
        None => {
            print!("{pem}");
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CREDKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Commands::Hash {
            algo,
            argon2,
            scrypt,
            hash_coder,
        } => {
            let pw = auth::read_new_password_with_confirmation()?;
            let hash = match algo {
                PasswordAlgo::Argon2id => {
                    let cfg = argon2.to_config(config.argon2)?;
                    password::argon2id::sign(&cfg, &pw)?
                }
                PasswordAlgo::Scrypt => {
                    let params = scrypt.to_params(config.scrypt)?;
                    let coder = hash_coder.unwrap_or(config.hash_coder());
                    Scrypt::new(params, Coder::Utf8, coder)?.sign(&pw)?
                }
            };
            println!("{hash}");
        }
        Commands::Verify { hash, hash_coder } => {
            let pw = auth::read_password()?;
            let matched = match format::identify(&hash) {
                Some(HashKind::Argon2id) => password::argon2id::verify(&hash, &pw)?,
                Some(HashKind::Scrypt) => {
                    let coder = hash_coder.unwrap_or(config.hash_coder());
                    let hasher = Scrypt::new(config.scrypt, Coder::Utf8, coder)?;
                    match hasher.verify(&pw, &hash) {
                        Ok(()) => true,
                        Err(e) if e.is_mismatch() => false,
                        Err(e) => return Err(e.into()),
                    }
                }
                None => bail!("unrecognised hash format"),
            };
            if !matched {
                bail!("password does not match");
            }
            println!("password matches");
        }
        Commands::Inspect { hash, hash_coder } => {
            let coder = hash_coder.unwrap_or(config.hash_coder());
            let inspection = inspect(&hash, coder)?;
            println!("{}", serde_json::to_string_pretty(&inspection)?);
        }
        Commands::Keygen {
            private_format,
            public_format,
            bits,
            private_out,
            public_out,
        } => {
            let pair = KeyPairGenerator::new(private_format, public_format)
                .with_bits(bits)
                .generate()?;
            write_or_print(private_out.as_deref(), &pair.private_pem)?;
            write_or_print(public_out.as_deref(), &pair.public_pem)?;
        }
        Commands::Sign { sig, message } => {
            let signer = sig.signer()?;
            println!("{}", signer.sign(&message)?);
        }
        Commands::VerifySignature {
            sig,
            message,
            signature,
        } => {
            let verifier = sig.verifier()?;
            verifier.verify(&message, &signature)?;
            println!("signature valid ({})", verifier.algo());
        }
    }

    Ok(())
}
