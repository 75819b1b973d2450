use serial_test::serial;

use learnify::cli::Cli;
use learnify::config::Config;

mod common;

#[test]
#[serial]
fn test_yaml_file_with_env_override() {
    let (_temp_dir, config_path) = common::temp_config_file(
        "provider:\n  openrouter:\n    model: openai/gpt-4o-mini\n    temperature: 0.7\nsession:\n  window_size: 4\n",
    );

    std::env::set_var("LEARNIFY_HISTORY_WINDOW", "10");
    let config = Config::load(config_path.to_str().unwrap(), &Cli::default());
    std::env::remove_var("LEARNIFY_HISTORY_WINDOW");

    let config = config.unwrap();
    assert_eq!(config.provider.openrouter.model, "openai/gpt-4o-mini");
    assert_eq!(config.provider.openrouter.temperature, 0.7);
    assert_eq!(config.session.window_size, 10);
    assert_eq!(config.speech.allowed_hosts.len(), 2);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_malformed_yaml_is_configuration_error() {
    let (_temp_dir, config_path) = common::temp_config_file("session: [unclosed\n");

    let err = Config::load(config_path.to_str().unwrap(), &Cli::default()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}
