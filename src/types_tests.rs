//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;

    #[test]
    fn test_classify_single_colors() {
        assert_eq!(Color::classify("r"), Color::Red);
        assert_eq!(Color::classify("g"), Color::Green);
        assert_eq!(Color::classify("red"), Color::Red);
    }

    #[test]
    fn test_classify_violet_combinations() {
        assert_eq!(Color::classify("rg"), Color::Violet);
        assert_eq!(Color::classify("g,r"), Color::Violet);
        // "green" spells both letters
        assert_eq!(Color::classify("green"), Color::Violet);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(Color::classify("RED"), Color::Red);
        assert_eq!(Color::classify("G"), Color::Green);
        assert_eq!(Color::classify("R,G"), Color::Violet);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(Color::classify(""), Color::Unknown);
        assert_eq!(Color::classify("violet"), Color::Unknown);
        assert_eq!(Color::classify("5"), Color::Unknown);
    }

    #[test]
    fn test_classify_is_deterministic() {
        for code in ["r", "G", "r,v", "", "xyz", "0"] {
            assert_eq!(Color::classify(code), Color::classify(code));
        }
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::Red.to_string(), "red");
        assert_eq!(Color::Violet.to_string(), "violet");
        assert_eq!(Color::Green.as_upper(), "GREEN");
        assert_eq!(Color::Unknown.as_upper(), "UNKNOWN");
    }

    #[test]
    fn test_color_serialization() {
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), "\"red\"");
        let violet: Color = serde_json::from_str("\"violet\"").unwrap();
        assert_eq!(violet, Color::Violet);
    }

    #[test]
    fn test_round_result_from_code() {
        let round = RoundResult::from_code("20240101100010001", "G");
        assert_eq!(round.period, "20240101100010001");
        assert_eq!(round.color, Color::Green);
    }

    #[test]
    fn test_join_colors() {
        assert_eq!(join_colors(&[]), "");
        assert_eq!(
            join_colors(&[Color::Red, Color::Green, Color::Violet]),
            "red, green, violet"
        );
    }
}
