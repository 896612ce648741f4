//! Unit tests for raw field normalization.

#[cfg(test)]
mod normalize_tests {
    use crate::engine::normalize::*;
    use crate::events::{RawTrade, Side};
    use chrono::{DateTime, FixedOffset};
    use serde_json::json;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-03-02T10:00:00+07:00").unwrap()
    }

    // ============= Numbers =============

    #[test]
    fn test_parse_number_plain_json() {
        assert_eq!(parse_number(Some(&json!(1250))), 1250.0);
        assert_eq!(parse_number(Some(&json!(-0.75))), -0.75);
    }

    #[test]
    fn test_parse_number_text_with_separators() {
        assert_eq!(parse_number(Some(&json!("1,250"))), 1250.0);
        assert_eq!(parse_number(Some(&json!("1,234,567.5"))), 1234567.5);
        assert_eq!(parse_number(Some(&json!("+2.50%"))), 2.5);
        assert_eq!(parse_number(Some(&json!("-3.1 %"))), -3.1);
    }

    #[test]
    fn test_parse_number_defaults_to_zero() {
        assert_eq!(parse_number(None), 0.0);
        assert_eq!(parse_number(Some(&json!(null))), 0.0);
        assert_eq!(parse_number(Some(&json!("n/a"))), 0.0);
        assert_eq!(parse_number(Some(&json!(""))), 0.0);
        assert_eq!(parse_number(Some(&json!(true))), 0.0);
        assert_eq!(parse_number(Some(&json!("NaN"))), 0.0);
    }

    #[test]
    fn test_parse_volume_and_price_floors() {
        assert_eq!(parse_volume(Some(&json!("1,500"))), 1500);
        assert_eq!(parse_volume(Some(&json!(-4))), 0);
        assert_eq!(parse_volume(Some(&json!(2.9))), 2);
        assert_eq!(parse_price(Some(&json!(-10))), 0.0);
        assert_eq!(parse_price(Some(&json!("5,025"))), 5025.0);
    }

    #[test]
    fn test_parse_side() {
        assert_eq!(parse_side(Some(&json!("BUY"))), Some(Side::Buy));
        assert_eq!(parse_side(Some(&json!(" s "))), Some(Side::Sell));
        assert_eq!(parse_side(Some(&json!("hold"))), None);
        assert_eq!(parse_side(Some(&json!(1))), None);
        assert_eq!(parse_side(None), None);
    }

    // ============= Time =============

    #[test]
    fn test_parse_time_epoch_millis() {
        let now = now();
        assert_eq!(parse_trade_time(Some(&json!(1_700_000_000_123_i64)), &now), 1_700_000_000_123);
        assert_eq!(parse_trade_time(Some(&json!("1700000000123")), &now), 1_700_000_000_123);
    }

    #[test]
    fn test_parse_time_clock_string_resolves_today() {
        let now = now();
        let expected = DateTime::parse_from_rfc3339("2026-03-02T09:15:02+07:00")
            .unwrap()
            .timestamp_millis();
        assert_eq!(parse_trade_time(Some(&json!("09:15:02")), &now), expected);
    }

    #[test]
    fn test_parse_time_falls_back_to_now() {
        let now = now();
        let now_ms = now.timestamp_millis();
        assert_eq!(parse_trade_time(None, &now), now_ms);
        assert_eq!(parse_trade_time(Some(&json!("soon")), &now), now_ms);
        assert_eq!(parse_trade_time(Some(&json!("25:00:00")), &now), now_ms);
        assert_eq!(parse_trade_time(Some(&json!("09:15")), &now), now_ms);
        assert_eq!(parse_trade_time(Some(&json!("09:15:02:01")), &now), now_ms);
    }

    #[test]
    fn test_parse_time_out_of_range_is_now() {
        let now = now();
        let now_ms = now.timestamp_millis();
        assert_eq!(parse_trade_time(Some(&json!(-1e300)), &now), now_ms);
        assert_eq!(parse_trade_time(Some(&json!(1e300)), &now), now_ms);
        assert_eq!(parse_trade_time(Some(&json!(i64::MIN)), &now), now_ms);
        assert_eq!(parse_trade_time(Some(&json!(i64::MAX)), &now), now_ms);
        assert_eq!(
            parse_trade_time(Some(&json!("9223372036854775807")), &now),
            now_ms
        );
    }

    // ============= Whole trade =============

    #[test]
    fn test_normalize_exodus_shape() {
        let raw: RawTrade = serde_json::from_value(json!({
            "code": "BBCA",
            "price": "9,875",
            "lot": "1,200",
            "change": "-0.25%",
            "board": "RG",
            "time": "09:15:02"
        }))
        .unwrap();

        let trade = normalize_trade(&raw, &now()).unwrap();
        assert_eq!(trade.symbol, "BBCA");
        assert_eq!(trade.price, 9875.0);
        assert_eq!(trade.volume, 1200);
        assert_eq!(trade.change_pct, -0.25);
        assert_eq!(trade.board.as_deref(), Some("RG"));
        assert_eq!(trade.reported_time.as_deref(), Some("09:15:02"));
        assert_eq!(trade.side, None);
        assert_eq!(trade.effective_side(), Side::Sell);
    }

    #[test]
    fn test_normalize_requires_symbol() {
        let raw: RawTrade = serde_json::from_value(json!({ "price": 100 })).unwrap();
        assert!(normalize_trade(&raw, &now()).is_none());

        let blank: RawTrade = serde_json::from_value(json!({ "symbol": "  " })).unwrap();
        assert!(normalize_trade(&blank, &now()).is_none());
    }

    #[test]
    fn test_normalize_missing_fields_use_defaults() {
        let raw: RawTrade = serde_json::from_value(json!({ "symbol": "TLKM" })).unwrap();
        let trade = normalize_trade(&raw, &now()).unwrap();

        assert_eq!(trade.price, 0.0);
        assert_eq!(trade.volume, 0);
        assert_eq!(trade.change_pct, 0.0);
        assert_eq!(trade.time_ms, now().timestamp_millis());
        assert_eq!(trade.reported_time, None);
        assert_eq!(trade.effective_side(), Side::Buy);
    }
}
