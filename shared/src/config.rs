use serde::{Deserialize, Serialize};

pub const MIN_CACHE_TTL_MS: u64 = 60_000;
pub const MAX_CACHE_TTL_MS: u64 = 600_000;
pub const MAX_SEARCH_DEBOUNCE_MS: u32 = 2_000;
pub const MAX_LISTING_LIMIT: usize = 5_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub catalog: CatalogSection,
    pub picker: PickerSection,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Clamps out-of-range values and returns a note for every fix applied.
    pub fn validate_and_fix(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.app.needs_migration() {
            warnings.push(format!(
                "config version '{}' replaced by '{}'",
                self.app.version,
                AppSection::CURRENT_VERSION
            ));
            self.app.version = AppSection::CURRENT_VERSION.to_string();
        }

        let api_base_url = self.catalog.api_base_url.trim().trim_end_matches('/').to_string();
        if api_base_url.is_empty() {
            warnings.push("catalog.api_base_url was empty, using the default".to_string());
            self.catalog.api_base_url = CatalogSection::default().api_base_url;
        } else if api_base_url != self.catalog.api_base_url {
            self.catalog.api_base_url = api_base_url;
        }

        let picker = &mut self.picker;
        if picker.search_debounce_ms > MAX_SEARCH_DEBOUNCE_MS {
            warnings.push(format!(
                "picker.search_debounce_ms {} capped at {MAX_SEARCH_DEBOUNCE_MS}",
                picker.search_debounce_ms
            ));
            picker.search_debounce_ms = MAX_SEARCH_DEBOUNCE_MS;
        }

        let ttl = picker.cache_ttl_ms.clamp(MIN_CACHE_TTL_MS, MAX_CACHE_TTL_MS);
        if ttl != picker.cache_ttl_ms {
            warnings.push(format!(
                "picker.cache_ttl_ms {} clamped to {ttl}",
                picker.cache_ttl_ms
            ));
            picker.cache_ttl_ms = ttl;
        }

        for (name, limit) in [
            ("filtered_limit", &mut picker.filtered_limit),
            ("all_billboards_limit", &mut picker.all_billboards_limit),
        ] {
            let clamped = (*limit).clamp(1, MAX_LISTING_LIMIT);
            if clamped != *limit {
                warnings.push(format!("picker.{name} {limit} clamped to {clamped}"));
                *limit = clamped;
            }
        }

        warnings
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn needs_migration(&self) -> bool {
        self.version != Self::CURRENT_VERSION
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogSection {
    /// Prefix for `/regions` and `/billboards`.
    pub api_base_url: String,
    /// Development catalog served by the backend.
    pub fixture_path: String,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            api_base_url: "/_api/catalog".to_string(),
            fixture_path: "catalog.toml".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickerSection {
    pub search_debounce_ms: u32,
    pub cache_ttl_ms: u64,
    pub filtered_limit: usize,
    pub all_billboards_limit: usize,
}

impl Default for PickerSection {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            cache_ttl_ms: 300_000,
            filtered_limit: 1_000,
            all_billboards_limit: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [picker]
            search_debounce_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.picker.search_debounce_ms, 250);
        assert_eq!(config.picker.filtered_limit, 1_000);
        assert_eq!(config.catalog.api_base_url, "/_api/catalog");
        assert!(!config.app.needs_migration());
    }

    #[test]
    fn default_config_survives_a_toml_round_trip() {
        let config = AppConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config = AppConfig::default();
        config.catalog.api_base_url = "https://api.example.com/v1/".into();
        config.picker.cache_ttl_ms = 1;
        config.picker.filtered_limit = 0;
        config.picker.search_debounce_ms = 10_000;

        let warnings = config.validate_and_fix();
        assert_eq!(warnings.len(), 3);
        assert_eq!(config.catalog.api_base_url, "https://api.example.com/v1");
        assert_eq!(config.picker.cache_ttl_ms, MIN_CACHE_TTL_MS);
        assert_eq!(config.picker.filtered_limit, 1);
        assert_eq!(config.picker.search_debounce_ms, MAX_SEARCH_DEBOUNCE_MS);
    }

    #[test]
    fn valid_config_needs_no_fixes() {
        assert!(AppConfig::default().validate_and_fix().is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let error = AppConfig::from_toml_str("[picker\nsearch").unwrap_err();
        assert!(error.to_string().starts_with("failed to parse config"));
    }
}
