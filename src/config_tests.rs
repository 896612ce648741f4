//! Unit tests for configuration structures and parsing.

#[cfg(test)]
mod config_tests {
    use crate::config::*;
    use crate::error::ConfigError;
    use std::io::Write;
    use std::path::PathBuf;

    // ============= EngineConfig Tests =============

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();

        assert_eq!(config.cluster_window_ms, 1_000);
        assert_eq!(config.min_freq_moderate, 3);
        assert_eq!(config.min_freq_strong, 10);
        assert_eq!(config.max_lag_ms, 30_000);
        assert_eq!(config.dedup_capacity, 5_000);
        assert_eq!(config.dedup_eviction, DedupEviction::Recency);
        assert_eq!(config.cluster_policy, ClusterPolicy::Escalating);
        assert_eq!(config.rearm_threshold, 3);
        assert_eq!(config.regular_board.as_deref(), Some("RG"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_config_deserialize() {
        let yaml = r#"
cluster_window_ms: 5000
min_freq_moderate: 4
min_freq_strong: 12
max_lag_ms: 60000
dedup_capacity: 100
dedup_eviction: full_clear
cluster_policy: rearm
rearm_threshold: 5
regular_board: null
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.cluster_window_ms, 5_000);
        assert_eq!(config.min_freq_moderate, 4);
        assert_eq!(config.min_freq_strong, 12);
        assert_eq!(config.max_lag_ms, 60_000);
        assert_eq!(config.dedup_capacity, 100);
        assert_eq!(config.dedup_eviction, DedupEviction::FullClear);
        assert_eq!(config.cluster_policy, ClusterPolicy::Rearm);
        assert_eq!(config.rearm_threshold, 5);
        assert_eq!(config.regular_board, None);
    }

    #[test]
    fn test_engine_config_partial_uses_defaults() {
        let yaml = r#"
cluster_window_ms: 2500
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.cluster_window_ms, 2_500);
        assert_eq!(config.min_freq_strong, 10);
        assert_eq!(config.regular_board.as_deref(), Some("RG"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let yaml = "cluster_policy: sometimes\n";
        assert!(serde_yaml::from_str::<EngineConfig>(yaml).is_err());
    }

    // ============= Validation =============

    #[test]
    fn test_validate_strong_must_exceed_moderate() {
        let config = EngineConfig {
            min_freq_moderate: 5,
            min_freq_strong: 5,
            ..EngineConfig::default()
        };
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "engine.min_freq_strong"),
            other => panic!("Expected invalid strong threshold, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        let cases = [
            EngineConfig {
                cluster_window_ms: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                dedup_capacity: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                min_freq_moderate: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                rearm_threshold: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                max_lag_ms: -1,
                ..EngineConfig::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{:?} should be invalid", config);
        }
    }

    // ============= AppConfig Tests =============

    #[test]
    fn test_app_config_empty_document() {
        let config = AppConfig::from_yaml("").unwrap();

        assert_eq!(config.watchlist.mode, WatchlistMode::Ignore);
        assert_eq!(config.watchlist.data_dir, PathBuf::from("data"));
        assert_eq!(
            config.watchlist.categories,
            vec!["sleeping", "penny", "premium"]
        );
        assert_eq!(config.feed.replay_path, None);
        assert_eq!(config.feed.poll_interval_ms, 1_000);
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.server.alert_history_limit, 500);
    }

    #[test]
    fn test_app_config_full() {
        let yaml = r#"
engine:
  cluster_window_ms: 3000
  cluster_policy: rearm
watchlist:
  mode: category
  data_dir: /srv/lists
  categories: [premium, penny]
feed:
  replay_path: ./tape.jsonl
  poll_interval_ms: 250
server:
  bind_addr: 127.0.0.1:8080
  alert_history_limit: 50
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.engine.cluster_window_ms, 3_000);
        assert_eq!(config.engine.cluster_policy, ClusterPolicy::Rearm);
        assert_eq!(config.watchlist.mode, WatchlistMode::Category);
        assert_eq!(config.watchlist.data_dir, PathBuf::from("/srv/lists"));
        assert_eq!(config.watchlist.categories, vec!["premium", "penny"]);
        assert_eq!(config.feed.replay_path, Some(PathBuf::from("./tape.jsonl")));
        assert_eq!(config.feed.poll_interval_ms, 250);
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.server.alert_history_limit, 50);
    }

    #[test]
    fn test_app_config_strips_bom() {
        let config = AppConfig::from_yaml("\u{feff}engine:\n  max_lag_ms: 1000\n").unwrap();
        assert_eq!(config.engine.max_lag_ms, 1_000);
    }

    #[test]
    fn test_app_config_validates() {
        let yaml = "feed:\n  poll_interval_ms: 0\n";
        assert!(matches!(
            AppConfig::from_yaml(yaml),
            Err(ConfigError::Invalid { field: "feed.poll_interval_ms", .. })
        ));
    }

    #[test]
    fn test_app_config_parse_error() {
        assert!(matches!(
            AppConfig::from_yaml("engine: [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_app_config_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine:\n  min_freq_strong: 20").unwrap();

        let config = AppConfig::from_path(file.path()).unwrap();
        assert_eq!(config.engine.min_freq_strong, 20);
    }

    #[test]
    fn test_example_config_parses() {
        let config = AppConfig::from_yaml(include_str!("../config.example.yaml")).unwrap();
        assert_eq!(config.engine.regular_board.as_deref(), Some("RG"));
        assert_eq!(config.feed.replay_path, None);
    }

    #[test]
    fn test_app_config_missing_file() {
        let result = AppConfig::from_path("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
