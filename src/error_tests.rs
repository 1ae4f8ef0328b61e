//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::*;

    #[test]
    fn test_invalid_period_message() {
        let err = BotError::InvalidPeriod("20240101abc".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid period \"20240101abc\": expected a numeric issue number"
        );
    }

    #[test]
    fn test_config_error_message() {
        let err = BotError::Config("TELEGRAM_TOKEN is not set".into());
        assert!(err.to_string().starts_with("Configuration error"));
        assert!(err.to_string().contains("TELEGRAM_TOKEN"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: BotError = parse.unwrap_err().into();
        assert!(matches!(err, BotError::Json(_)));
    }

    #[test]
    fn test_config_crate_error_converts() {
        let err: BotError = config::ConfigError::Message("bad value".into()).into();
        match err {
            BotError::Config(msg) => assert!(msg.contains("bad value")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
