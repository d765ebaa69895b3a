use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::parser::text::parse_leading_int;

// The literal may not contain ')' or the capture is cut short; pages that
// do this lose their scaling rewards.
static SCALING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"WH\.Wow\.Quest\.setupScalingRewards\s*\(\s*(\{[^)]+\})\s*\)").unwrap()
});

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Scaling {
    pub xp: Option<i64>,
    pub money: Option<i64>,
}

/// XP and money from the scaling rewards literal.
///
/// Per-level tables are read at their first key in document order, which
/// is not necessarily the lowest level.
pub fn extract(html: &str) -> Scaling {
    let Some(caps) = SCALING_RE.captures(html) else {
        return Scaling::default();
    };
    let scaling: Value = match serde_json::from_str(&caps[1]) {
        Ok(v) => v,
        Err(e) => {
            debug!("scaling rewards literal is not valid JSON: {}", e);
            return Scaling::default();
        }
    };

    let xp = scaling
        .pointer("/xp/levels")
        .and_then(first_value)
        .and_then(lenient_int);

    let money = scaling
        .get("coin")
        .filter(|c| is_truthy(c))
        .and_then(|coin| match coin.get("rewardAtCap") {
            Some(cap) if !cap.is_null() => lenient_int(cap),
            _ => coin
                .get("levels")
                .and_then(first_value)
                .and_then(lenient_int)
                .filter(|m| *m != 0),
        });

    Scaling { xp, money }
}

/// First entry of a level table, keyed object or plain array.
fn first_value(table: &Value) -> Option<&Value> {
    match table {
        Value::Object(map) => map.values().next(),
        Value::Array(list) => list.first(),
        _ => None,
    }
}

/// Numbers truncate, strings read their leading integer, anything else is `None`.
fn lenient_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(literal: &str) -> String {
        format!("<script>WH.Wow.Quest.setupScalingRewards({});</script>", literal)
    }

    #[test]
    fn xp_and_money_at_cap() {
        let s = extract(&page(r#"{"xp":{"levels":{"10":450,"11":470}},"coin":{"rewardAtCap":1200,"levels":{"10":75}}}"#));
        assert_eq!(s, Scaling { xp: Some(450), money: Some(1200) });
    }

    #[test]
    fn first_enumerated_key_not_lowest() {
        let s = extract(&page(r#"{"xp":{"levels":{"70":9000,"60":4000}}}"#));
        assert_eq!(s.xp, Some(9000));
        assert_eq!(s.money, None);
    }

    #[test]
    fn money_falls_back_to_level_table() {
        let s = extract(&page(r#"{"coin":{"levels":{"62":"350","70":900}}}"#));
        assert_eq!(s.money, Some(350));
    }

    #[test]
    fn zero_money_from_level_table_is_absent() {
        let s = extract(&page(r#"{"coin":{"levels":{"62":0}}}"#));
        assert_eq!(s.money, None);
    }

    #[test]
    fn zero_reward_at_cap_is_kept() {
        let s = extract(&page(r#"{"coin":{"rewardAtCap":0,"levels":{"62":15}}}"#));
        assert_eq!(s.money, Some(0));
    }

    #[test]
    fn array_level_tables() {
        let s = extract(&page(r#"{"xp":{"levels":[320,340]},"coin":{"levels":[40,45]}}"#));
        assert_eq!(s, Scaling { xp: Some(320), money: Some(40) });
        assert_eq!(extract(&page(r#"{"xp":{"levels":[]}}"#)).xp, None);
    }

    #[test]
    fn unparseable_literal_leaves_both_absent() {
        let s = extract(&page(r#"{xp: {levels: {10: 450}}, coin: {rewardAtCap: 5}}"#));
        assert_eq!(s, Scaling::default());
    }

    #[test]
    fn parenthesis_in_literal_breaks_capture() {
        let s = extract(&page(r#"{"note":"(bonus)","xp":{"levels":{"10":450}}}"#));
        assert_eq!(s, Scaling::default());
    }
}
