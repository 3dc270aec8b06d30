//! Engine configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::protocol::ledger::DEFAULT_CAPACITY;
use crate::schemes::ezkp::Ezkp;
use crate::schemes::{Scheme, SchemeKind};
use crate::transcript::MAX_CHALLENGE_BITS;
use crate::{Error, ModpGroup, Result};

/// Prime-field parameter sets for EZKP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModpPreset {
    /// RFC 5114 §2.3: 2048-bit p, 256-bit subgroup order.
    #[default]
    Rfc5114,
    /// p = 23, g = 5, n = 22. Only for worked examples.
    Toy23,
}

impl ModpPreset {
    pub fn group(&self) -> ModpGroup {
        match self {
            ModpPreset::Rfc5114 => ModpGroup::rfc5114(),
            ModpPreset::Toy23 => ModpGroup::toy(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Variant used by the CLI and by [`EngineConfig::build_scheme`].
    pub scheme: SchemeKind,
    /// Group for EZKP.
    pub modp_group: ModpPreset,
    /// Parallel bit-challenge rounds for Fiat-Shamir; scalar challenges when unset.
    pub schnorr_rounds: Option<u16>,
    /// Commitment fingerprints kept by a nonce ledger.
    pub ledger_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scheme: SchemeKind::TwinSchnorr,
            modp_group: ModpPreset::Rfc5114,
            schnorr_rounds: None,
            ledger_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `.env`, a TOML file and environment variables.
    ///
    /// Priority (highest first):
    /// 1. Environment variables with the `IBI_` prefix (e.g. `IBI_SCHEME=ezkp`)
    /// 2. The TOML file at `IBI_CONFIG_PATH`, default `config/ibi.toml`, skipped if absent
    /// 3. Built-in defaults
    ///
    /// ```bash
    /// IBI_SCHEME=fiat-shamir
    /// IBI_SCHNORR_ROUNDS=64
    /// IBI_MODP_GROUP=toy23
    /// IBI_LEDGER_CAPACITY=10000
    /// ```
    pub fn from_env() -> Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        let _ = dotenvy::dotenv();

        let config_path =
            std::env::var("IBI_CONFIG_PATH").unwrap_or_else(|_| "config/ibi.toml".to_string());

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("IBI_").ignore(&["config_path"]))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ledger_capacity == 0 {
            return Err(Error::Config("ledger_capacity cannot be zero".to_string()));
        }
        if let Some(rounds) = self.schnorr_rounds {
            if rounds == 0 || usize::from(rounds) > MAX_CHALLENGE_BITS {
                return Err(Error::Config(format!(
                    "schnorr_rounds must be within 1..={MAX_CHALLENGE_BITS}, got {rounds}"
                )));
            }
        }
        Ok(())
    }

    /// The configured variant with its parameters.
    pub fn build_scheme(&self) -> Result<Scheme> {
        self.validate()?;
        match self.scheme {
            SchemeKind::Ezkp => Ok(Scheme::Ezkp(Ezkp::new(self.modp_group.group()))),
            SchemeKind::FiatShamir => match self.schnorr_rounds {
                Some(rounds) => Scheme::fiat_shamir_bits(usize::from(rounds)),
                None => Ok(Scheme::new(SchemeKind::FiatShamir)),
            },
            kind => Ok(Scheme::new(kind)),
        }
    }
}

impl Scheme {
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.build_scheme()
    }
}
