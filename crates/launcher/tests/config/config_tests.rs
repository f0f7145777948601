use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>();
    move |key| values.get(key).cloned()
}

#[test]
fn from_lookup_should_use_defaults_when_unset() {
    let config = DiscoveryConfig::from_lookup(|_| None);
    assert_eq!(config, DiscoveryConfig::default());
    assert_eq!(config.batch_size, 3);
    assert_eq!(config.quick_action_limit, 10);
}

#[test]
fn from_lookup_should_parse_and_clamp_overrides() {
    let config = DiscoveryConfig::from_lookup(lookup_from(&[
        ("DOCKYARD_ICON_BATCH_SIZE", "500"),
        ("DOCKYARD_ICON_BATCH_DELAY_MS", " 250 "),
        ("DOCKYARD_ICON_INITIAL_DELAY_MS", "not-a-number"),
        ("DOCKYARD_QUICK_ACTION_LIMIT", "0"),
    ]));
    assert_eq!(config.batch_size, 32);
    assert_eq!(config.batch_delay, Duration::from_millis(250));
    assert_eq!(
        config.initial_delay,
        Duration::from_millis(DEFAULT_INITIAL_DELAY_MS)
    );
    assert_eq!(config.quick_action_limit, 1);
}

#[test]
fn default_roots_should_list_system_before_user() {
    let roots = default_roots();
    assert_eq!(roots[0], PathBuf::from("/System/Applications"));
    assert_eq!(roots[1], PathBuf::from("/Applications"));
}

#[test]
fn without_delays_should_zero_both_delays() {
    let config = DiscoveryConfig::default().without_delays();
    assert_eq!(config.initial_delay, Duration::ZERO);
    assert_eq!(config.batch_delay, Duration::ZERO);
}
