//! Shared types and helpers for the CLI.

use anyhow::{bail, Context, Result};
use move_multisig::codec::encode_argument;
use move_multisig::{
    AccountAddress, ConfirmationPolicy, DecodedValue, LocalSigner, MultisigResult, Network,
    NetworkConfig, RestClient, TypeTag,
};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable consulted when `--private-key` is not given.
const PRIVATE_KEY_ENV: &str = "MULTISIG_PRIVATE_KEY";

/// Global options available on every command.
#[derive(clap::Args, Debug)]
pub struct GlobalOpts {
    /// Network to connect to (mainnet, testnet, devnet, movement,
    /// movement-testnet, local)
    #[arg(long, global = true, default_value = "movement")]
    pub network: String,

    /// Custom fullnode URL (overrides --network)
    #[arg(long, global = true)]
    pub node_url: Option<String>,

    /// Signing key as hex; falls back to the MULTISIG_PRIVATE_KEY
    /// environment variable
    #[arg(long, global = true)]
    pub private_key: Option<String>,

    /// JSON file mapping addresses to display names for vote tallies
    #[arg(long, global = true)]
    pub aliases: Option<PathBuf>,

    /// Skip interactive confirmation prompts
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    pub yes: bool,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

impl GlobalOpts {
    /// Resolves the network configuration from `--node-url` or `--network`.
    pub fn network_config(&self) -> Result<NetworkConfig> {
        if let Some(url) = &self.node_url {
            return NetworkConfig::custom(url).context("invalid --node-url");
        }
        let network = Network::from_name(&self.network)
            .with_context(|| format!("unknown network {:?}", self.network))?;
        Ok(NetworkConfig::preset(network))
    }

    /// Builds the REST client.
    pub fn build_client(&self) -> Result<RestClient> {
        RestClient::new(self.network_config()?).context("failed to build HTTP client")
    }

    /// Loads the signer from `--private-key` or the environment.
    pub fn load_signer(&self) -> Result<LocalSigner> {
        let key = match &self.private_key {
            Some(key) => key.clone(),
            None => std::env::var(PRIVATE_KEY_ENV).with_context(|| {
                format!("no --private-key given and {PRIVATE_KEY_ENV} is not set")
            })?,
        };
        LocalSigner::from_private_key_hex(&key).context("invalid private key")
    }

    /// Loads the signer when key material is configured, `None` otherwise.
    /// Used where signing is optional, such as simulation annotations on
    /// listings.
    pub fn try_load_signer(&self) -> Result<Option<LocalSigner>> {
        let key = match &self.private_key {
            Some(key) => key.clone(),
            None => match std::env::var(PRIVATE_KEY_ENV) {
                Ok(key) => key,
                Err(_) => return Ok(None),
            },
        };
        LocalSigner::from_private_key_hex(&key)
            .context("invalid private key")
            .map(Some)
    }

    /// Loads the alias map, empty when no file was given.
    pub fn load_aliases(&self) -> Result<HashMap<AccountAddress, String>> {
        let Some(path) = &self.aliases else {
            return Ok(HashMap::new());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read alias file {}", path.display()))?;
        let raw: HashMap<String, String> =
            serde_json::from_str(&contents).context("alias file is not a JSON string map")?;
        let mut aliases = HashMap::with_capacity(raw.len());
        for (addr, name) in raw {
            let addr = AccountAddress::from_hex(&addr)
                .with_context(|| format!("alias file has invalid address {addr:?}"))?;
            aliases.insert(addr, name);
        }
        Ok(aliases)
    }

    /// The confirmation policy for lifecycle actions.
    pub fn confirmation(&self) -> Box<dyn ConfirmationPolicy> {
        if self.yes {
            Box::new(move_multisig::AutoApprove)
        } else {
            Box::new(InteractivePrompt)
        }
    }
}

/// Asks on stdin; anything but `y`/`yes` declines.
struct InteractivePrompt;

impl ConfirmationPolicy for InteractivePrompt {
    fn confirm(&self, prompt: &str) -> MultisigResult<bool> {
        print!("{prompt} [y/N] ");
        std::io::stdout()
            .flush()
            .map_err(|e| anyhow::anyhow!(e))?;
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .map_err(|e| anyhow::anyhow!(e))?;
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// Parses a typed argument of the form `type:value` (e.g. `u64:1000`,
/// `address:0x1`, `vector<u8>:0xdead`) into its canonical bytes.
pub fn parse_typed_argument(spec: &str) -> Result<Vec<u8>> {
    let (type_str, value_str) = split_spec(spec)
        .with_context(|| format!("argument {spec:?} is not of the form type:value"))?;
    let tag = TypeTag::parse(type_str.trim())
        .with_context(|| format!("unsupported argument type {type_str:?}"))?;
    let value = parse_value(&tag, value_str.trim())
        .with_context(|| format!("cannot parse {value_str:?} as {tag}"))?;
    encode_argument(&tag, &value).with_context(|| format!("cannot encode {spec:?}"))
}

// Splits on the first single colon, skipping the `::` pairs inside
// qualified type names like `0x1::option::Option<u64>`.
fn split_spec(spec: &str) -> Option<(&str, &str)> {
    let bytes = spec.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b':' {
            if bytes.get(i + 1) == Some(&b':') {
                i += 2;
                continue;
            }
            return Some((&spec[..i], &spec[i + 1..]));
        }
        i += 1;
    }
    None
}

fn parse_value(tag: &TypeTag, s: &str) -> Result<DecodedValue> {
    Ok(match tag {
        TypeTag::Bool => match s {
            "true" => DecodedValue::Bool(true),
            "false" => DecodedValue::Bool(false),
            _ => bail!("expected true or false"),
        },
        TypeTag::U8 => DecodedValue::U8(s.parse()?),
        TypeTag::U16 => DecodedValue::U16(s.parse()?),
        TypeTag::U32 => DecodedValue::U32(s.parse()?),
        TypeTag::U64 | TypeTag::U128 | TypeTag::U256 => DecodedValue::Uint(s.parse()?),
        TypeTag::Address | TypeTag::Object(_) => {
            DecodedValue::Address(AccountAddress::from_hex(s)?)
        }
        TypeTag::String => DecodedValue::Str(s.to_string()),
        TypeTag::Vector(_) if tag.is_byte_vector() => {
            // Hex literal; the encoder normalizes it to raw bytes.
            DecodedValue::Str(s.to_string())
        }
        TypeTag::Vector(inner) => {
            let items = if s.is_empty() {
                Vec::new()
            } else {
                s.split(',')
                    .map(|item| parse_value(inner, item.trim()))
                    .collect::<Result<Vec<_>>>()?
            };
            DecodedValue::Vector(items)
        }
        TypeTag::Option(inner) => {
            if s == "none" {
                DecodedValue::Option(None)
            } else {
                DecodedValue::Option(Some(Box::new(parse_value(inner, s)?)))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_arguments_encode() {
        assert_eq!(parse_typed_argument("u64:1000").unwrap(), 1000u64.to_le_bytes());
        assert_eq!(parse_typed_argument("bool:true").unwrap(), vec![1]);
        assert_eq!(
            parse_typed_argument("vector<u8>:0xdead").unwrap(),
            vec![2, 0xde, 0xad]
        );
        let addr = parse_typed_argument("address:0x1").unwrap();
        assert_eq!(addr.len(), 32);
        assert_eq!(addr[31], 1);
    }

    #[test]
    fn vector_and_option_arguments() {
        assert_eq!(
            parse_typed_argument("vector<u64>:1,2,3").unwrap(),
            {
                let mut bytes = vec![3u8];
                for v in [1u64, 2, 3] {
                    bytes.extend_from_slice(&v.to_le_bytes());
                }
                bytes
            }
        );
        assert_eq!(
            parse_typed_argument("0x1::option::Option<u64>:none").unwrap(),
            vec![0]
        );
    }

    #[test]
    fn malformed_arguments_fail() {
        assert!(parse_typed_argument("u64").is_err());
        assert!(parse_typed_argument("u64:abc").is_err());
        assert!(parse_typed_argument("signer:0x1").is_err());
    }
}
