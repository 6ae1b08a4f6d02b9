//! タイムスタンプの表現
//!
//! すべての日時はUTC・ミリ秒精度で扱い、`2024-01-02T03:04:05.678Z` 形式で
//! シリアライズする。

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// 現在時刻（ミリ秒に切り捨て）
///
/// シリアライズ後の値と内部の値が一致するよう、取得時点で切り捨てる。
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// ISO-8601文字列に変換する
pub fn to_iso_string(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// `#[serde(with = "iso_millis")]` 用
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso_string(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "iso_millis_option")]` 用（`null` を許容）
pub mod iso_millis_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&super::to_iso_string(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_to_iso_string_uses_millis_and_z_suffix() {
        let value = Utc.with_ymd_and_hms(2023, 5, 15, 0, 0, 0).unwrap();
        assert_eq!(to_iso_string(&value), "2023-05-15T00:00:00.000Z");
    }

    #[test]
    fn test_now_is_truncated_to_millis() {
        let value = now();
        assert_eq!(value.nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn test_parse_accepts_serialized_value() {
        let value = now();
        let parsed = parse(&to_iso_string(&value)).unwrap();
        assert_eq!(parsed, value);
    }
}
