use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::bucket::{
    HasIdAtSecondLevel, SecondLevelIdConfig, SectionTestError, SectionTestRegistry,
    DEFAULT_AUTO_DISCOVER_THRESHOLD,
};

/// Stats client configuration.
///
/// The backend is differentiated via a "type" tag in the YAML:
///
/// ```yaml
/// type: statsd
/// dsn: "statsd.local:8125"
/// prefix: "myapp"
/// second_level_id:
///   sections: "users:true\nclients:not_empty"
///   auto_discover_white_list: ["token"]
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct StatsConfig {
    #[serde(flatten)]
    pub backend: BackendConfig,
    /// Transliterate non-ASCII metric name segments instead of passing
    /// them through verbatim.
    #[serde(default)]
    pub unicode: bool,
    /// Second-level-ID detection settings applied to HTTP request paths.
    #[serde(default)]
    pub second_level_id: Option<SecondLevelIdSettings>,
}

/// The available stats backends.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum BackendConfig {
    #[serde(rename = "log")]
    Log,
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "noop")]
    Noop,
    #[serde(rename = "statsd")]
    Statsd {
        /// `host:port` of the statsd daemon; empty mutes the client.
        #[serde(default)]
        dsn: String,
        /// Prefix prepended to every emitted metric name.
        #[serde(default)]
        prefix: String,
    },
    #[serde(rename = "prometheus")]
    Prometheus {
        /// Namespace prepended to every metric name.
        #[serde(default)]
        namespace: String,
    },
}

/// Settings for replacing second-level path values with the ID
/// placeholder, in the compact `segment:testName` text format.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SecondLevelIdSettings {
    /// `pathSegment:testName` pairs, `:`- and newline-delimited, e.g.
    /// `"users:true\nfreebies:numeric\nclients:not_empty"`.
    #[serde(default)]
    pub sections: String,
    /// Distinct second-level values after which an unconfigured first
    /// segment is presumed ID-bearing. Zero disables auto-discovery.
    #[serde(default = "default_auto_discover_threshold")]
    pub auto_discover_threshold: usize,
    /// First segments exempt from auto-discovery.
    #[serde(default)]
    pub auto_discover_white_list: Vec<String>,
}

fn default_auto_discover_threshold() -> usize {
    DEFAULT_AUTO_DISCOVER_THRESHOLD
}

impl SecondLevelIdSettings {
    /// Resolves these settings against a section test registry.
    ///
    /// # Errors
    ///
    /// Fails when the sections text is malformed or references an
    /// unregistered section test.
    pub fn build_alterer(
        &self,
        registry: &SectionTestRegistry,
    ) -> Result<HasIdAtSecondLevel, SectionTestError> {
        let has_id_at_second_level = registry.parse_sections_tests(&self.sections)?;
        Ok(HasIdAtSecondLevel::new(SecondLevelIdConfig {
            has_id_at_second_level,
            auto_discover_threshold: self.auto_discover_threshold,
            auto_discover_white_list: self.auto_discover_white_list.clone(),
        }))
    }
}

/// Load config from a YAML file named "stats.yaml" in the current
/// directory, with `STATS_`-prefixed environment variables taking
/// precedence.
pub fn load_config() -> Result<StatsConfig, figment::Error> {
    Figment::new()
        .merge(Yaml::file("./stats.yaml"))
        .merge(Env::prefixed("STATS_"))
        .extract()
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(StatsConfig);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

#[cfg(test)]
mod tests {
    use figment::providers::{Format, Yaml};
    use figment::Figment;

    use super::{BackendConfig, StatsConfig};
    use crate::bucket::SectionTestRegistry;

    fn from_yaml(yaml: &str) -> StatsConfig {
        Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .expect("config parses")
    }

    #[test]
    fn parses_statsd_backend() {
        let config = from_yaml("type: statsd\ndsn: \"statsd.local:8125\"\nprefix: myapp\n");
        match config.backend {
            BackendConfig::Statsd { dsn, prefix } => {
                assert_eq!("statsd.local:8125", dsn);
                assert_eq!("myapp", prefix);
            }
            other => panic!("unexpected backend: {:?}", other),
        }
        assert!(!config.unicode);
        assert!(config.second_level_id.is_none());
    }

    #[test]
    fn parses_second_level_id_settings() {
        let config = from_yaml(
            "type: log\nunicode: true\nsecond_level_id:\n  sections: \"users:true\\nclients:not_empty\"\n  auto_discover_white_list: [token]\n",
        );
        let settings = config.second_level_id.expect("settings present");
        assert_eq!(25, settings.auto_discover_threshold);
        assert_eq!(vec!["token".to_string()], settings.auto_discover_white_list);

        let registry = SectionTestRegistry::new();
        settings.build_alterer(&registry).expect("alterer builds");
    }

    #[test]
    fn unknown_section_test_is_reported() {
        let config = from_yaml("type: log\nsecond_level_id:\n  sections: \"users:NOT_EXISTS\"\n");
        let registry = SectionTestRegistry::new();
        let err = config
            .second_level_id
            .unwrap()
            .build_alterer(&registry)
            .unwrap_err();
        assert_eq!(
            crate::bucket::SectionTestError::UnknownSectionTest("NOT_EXISTS".to_string()),
            err
        );
    }

    #[test]
    fn env_overrides_take_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("stats.yaml", "type: log\n")?;
            jail.set_env("STATS_TYPE", "memory");

            let config = super::load_config()?;
            assert!(matches!(config.backend, BackendConfig::Memory));
            Ok(())
        });
    }
}
