use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::banks;
use crate::error::{ImportError, Result};
use crate::importer::BankingImporter;
use crate::models::Currency;

/// One configured account, tagged by the bank that produces its statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "bank", rename_all = "snake_case")]
pub enum ImporterConfig {
    Revolut {
        root_account: String,
        fee_account: String,
        currency: Currency,
    },
    IngCurrent {
        root_account: String,
        account_id: String,
    },
    IngSavings {
        root_account: String,
        account_id: String,
    },
    Argenta {
        root_account: String,
        account_id: String,
    },
}

impl ImporterConfig {
    pub fn build(&self) -> Result<BankingImporter> {
        match self {
            Self::Revolut {
                root_account,
                fee_account,
                currency,
            } => banks::revolut(root_account, fee_account, *currency),
            Self::IngCurrent {
                root_account,
                account_id,
            } => banks::ing_current(root_account, account_id),
            Self::IngSavings {
                root_account,
                account_id,
            } => banks::ing_savings(root_account, account_id),
            #[cfg(feature = "xlsx")]
            Self::Argenta {
                root_account,
                account_id,
            } => banks::argenta(root_account, account_id),
            #[cfg(not(feature = "xlsx"))]
            Self::Argenta { .. } => Err(ImportError::UnknownImporter(
                "argenta (built without xlsx support)".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub importers: Vec<ImporterConfig>,
}

impl Settings {
    pub fn build_importers(&self) -> Result<Vec<BankingImporter>> {
        self.importers.iter().map(ImporterConfig::build).collect()
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ledger-import")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("importers.json")
}

fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ImportError::Settings(format!("{}: {e}", path.display())))
}

/// Load the importer list. An explicit path must exist; the default one may
/// be absent, which yields no importers.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => parse_settings(path),
        None => {
            let path = settings_path();
            if path.exists() {
                parse_settings(&path)
            } else {
                debug!(path = %path.display(), "no settings file, using empty configuration");
                Ok(Settings::default())
            }
        }
    }
}
