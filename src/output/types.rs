use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "mscrape.v1";

#[derive(Debug, Clone, Serialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    pub apply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    pub fn plan<T: Serialize>(op: &'static str, plan: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        Ok(Self::stamped(op, false, Some(serde_json::to_value(plan)?), None, meta))
    }

    pub fn result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        Ok(Self::stamped(op, true, None, Some(serde_json::to_value(result)?), meta))
    }

    fn stamped(op: &'static str, apply: bool, plan: Option<Value>, result: Option<Value>, meta: Option<Meta>) -> Self {
        Envelope { schema_version: SCHEMA_VERSION, time: Utc::now(), request_id: Uuid::new_v4(), op, apply, plan, result, meta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_envelope_has_no_result() {
        let env = Envelope::plan("extract", &json!({"urls": 3}), None).expect("to serialize plan");
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["schema_version"], "mscrape.v1");
        assert_eq!(v["op"], "extract");
        assert_eq!(v["apply"], false);
        assert_eq!(v["plan"]["urls"], 3);
        assert!(v.get("result").is_none());
        assert!(v.get("meta").is_none());
    }

    #[test]
    fn result_envelope_carries_duration() {
        let meta = Meta { duration_ms: Some(42) };
        let env = Envelope::result("extract", &json!({"results": []}), Some(meta)).expect("to serialize result");
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["apply"], true);
        assert_eq!(v["meta"], json!({"duration_ms": 42}));
        assert!(v.get("plan").is_none());
    }
}
