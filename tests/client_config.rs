use figment::providers::{Format, Yaml};
use figment::Figment;
use reqstats::bucket::{SectionTestError, SectionTestRegistry};
use reqstats::client::create_client;
use reqstats::config::StatsConfig;

fn config_from(yaml: &str) -> StatsConfig {
    Figment::new()
        .merge(Yaml::string(yaml))
        .extract()
        .expect("config parses")
}

#[test]
fn builds_the_configured_backend() {
    let registry = SectionTestRegistry::new();
    for backend in ["log", "memory", "noop"] {
        let config = config_from(&format!("type: {}\n", backend));
        create_client(&config, &registry).expect("client builds");
    }
}

#[test]
fn statsd_without_dsn_builds_a_muted_client() {
    let registry = SectionTestRegistry::new();
    let config = config_from("type: statsd\ndsn: \"\"\nprefix: app\n");
    create_client(&config, &registry).expect("client builds");
}

#[test]
fn second_level_id_settings_are_resolved() {
    let registry = SectionTestRegistry::new();
    let config = config_from(
        "type: memory\nsecond_level_id:\n  sections: \"users:true\\nclients:not_empty\"\n",
    );
    create_client(&config, &registry).expect("client builds");
}

#[test]
fn malformed_sections_text_is_rejected() {
    let registry = SectionTestRegistry::new();
    let config = config_from("type: memory\nsecond_level_id:\n  sections: \"users\"\n");
    assert_eq!(
        SectionTestError::InvalidFormat,
        create_client(&config, &registry).err().expect("creation fails")
    );
}

#[test]
fn unknown_section_test_is_rejected() {
    let registry = SectionTestRegistry::new();
    let config = config_from("type: memory\nsecond_level_id:\n  sections: \"users:NOT_EXISTS\"\n");
    assert_eq!(
        SectionTestError::UnknownSectionTest("NOT_EXISTS".to_string()),
        create_client(&config, &registry).err().expect("creation fails")
    );
}

#[test]
fn custom_section_tests_can_back_the_config() {
    let registry = SectionTestRegistry::new();
    registry.register("short", std::sync::Arc::new(|s: &str| s.len() < 4));

    let config = config_from("type: memory\nsecond_level_id:\n  sections: \"users:short\"\n");
    create_client(&config, &registry).expect("client builds");
}
