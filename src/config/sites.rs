use crate::domain::model::SiteConfig;
use crate::utils::error::{MenuError, Result};
use crate::utils::validation;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SiteList {
    #[serde(default)]
    sites: Vec<SiteConfig>,
}

/// 載入網站清單：`.toml` 以 `[[sites]]` 表示，其餘一律視為 JSON 陣列
pub fn load_sites<P: AsRef<Path>>(path: P) -> Result<Vec<SiteConfig>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(MenuError::IoError)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let sites = if is_toml {
        parse_sites_toml(&content)?
    } else {
        parse_sites_json(&content)?
    };

    validate_sites(&sites)?;
    tracing::info!("📋 Loaded {} sites from {}", sites.len(), path.display());
    Ok(sites)
}

pub fn parse_sites_json(content: &str) -> Result<Vec<SiteConfig>> {
    serde_json::from_str(content).map_err(|e| MenuError::ConfigValidationError {
        field: "sites".to_string(),
        message: format!("JSON parsing error: {}", e),
    })
}

pub fn parse_sites_toml(content: &str) -> Result<Vec<SiteConfig>> {
    toml::from_str::<SiteList>(content)
        .map(|list| list.sites)
        .map_err(|e| MenuError::ConfigValidationError {
            field: "sites".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
}

pub fn validate_sites(sites: &[SiteConfig]) -> Result<()> {
    if sites.is_empty() {
        tracing::warn!("⚠️ Site list is empty, every answer will be the no-menu message");
    }

    for (index, site) in sites.iter().enumerate() {
        validation::validate_non_empty_string(&format!("sites[{}].name", index), &site.name)?;
        validation::validate_url(&format!("sites[{}].url", index), &site.url)?;
        if !site.has_any_selector() {
            tracing::warn!("⚠️ Site '{}' has no day paths configured", site.name);
        }
    }

    validation::validate_unique("sites.name", sites.iter().map(|s| s.name.as_str()))
}
