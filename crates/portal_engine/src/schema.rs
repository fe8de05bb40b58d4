//! Wire payloads of the portal API and their coercion into [`ListItem`].
//!
//! The server is loosely typed: scores arrive as numbers or strings, dates as
//! RFC 3339 timestamps or bare `YYYY-MM-DD`, and the array of records sits
//! under a resource-specific key. Everything is normalised here so the core
//! only ever sees strict records. A record without an id rejects the whole
//! payload.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use portal_core::{
    Draft, ItemFields, ItemId, ListItem, MeetingLink, Rating, ResourceKind, ResourceSpec,
    MAX_RATING,
};
use portal_logging::portal_warn;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{FailureKind, RemoteError};

/// Wire key and display label of each feedback score, in display order.
const FEEDBACK_SCORE_KEYS: [(&str, &str); 3] = [
    ("technicalSkill", "Technical Skill"),
    ("communicationSkill", "Communication Skill"),
    ("overallExperience", "Overall Experience"),
];

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawExperience {
    title: Option<String>,
    author: Option<RawAuthor>,
    #[serde(rename = "createdAt")]
    created_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeedback {
    company: Option<String>,
    #[serde(rename = "technicalSkill")]
    technical_skill: Option<Value>,
    #[serde(rename = "communicationSkill")]
    communication_skill: Option<Value>,
    #[serde(rename = "overallExperience")]
    overall_experience: Option<Value>,
    comment: Option<String>,
    #[serde(rename = "createdAt")]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGdSchedule {
    company_name: Option<String>,
    gd_date: Option<String>,
    gd_time: Option<String>,
    gd_info: Option<String>,
    gd_link: Option<String>,
    #[serde(rename = "isLinkVisible", default)]
    is_link_visible: bool,
    was_shortlisted: Option<bool>,
}

/// Decodes a list response: either a bare array or an object holding the
/// array under `resource.envelope`. A missing or null envelope is an empty
/// list.
pub fn decode_collection(resource: &ResourceSpec, body: &[u8]) -> Result<Vec<ListItem>, RemoteError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))?;

    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut object) => match object.remove(&resource.envelope) {
            Some(Value::Array(records)) => records,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(RemoteError::new(
                    FailureKind::Decode,
                    format!("`{}` is {}, expected an array", resource.envelope, type_name(&other)),
                ))
            }
        },
        other => {
            return Err(RemoteError::new(
                FailureKind::Decode,
                format!("response is {}, expected an object or array", type_name(&other)),
            ))
        }
    };

    let mut seen = BTreeSet::new();
    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let item = decode_record(resource.kind, record)
            .map_err(|err| RemoteError::new(err.kind, format!("record {index}: {}", err.message)))?;
        if !seen.insert(item.id.clone()) {
            return Err(RemoteError::new(
                FailureKind::DuplicateId {
                    id: item.id.to_string(),
                },
                format!("record {index}"),
            ));
        }
        items.push(item);
    }
    Ok(items)
}

/// Decodes the persisted record returned by a create/update, bare or wrapped
/// under the envelope key or `data`.
pub fn decode_item(resource: &ResourceSpec, body: &[u8]) -> Result<ListItem, RemoteError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(RemoteError::new(FailureKind::Decode, "expected an object"));
    };
    if extract_id(&object).is_none() {
        for key in [resource.envelope.as_str(), "data"] {
            if let Some(Value::Object(inner)) = object.remove(key) {
                return decode_record(resource.kind, Value::Object(inner));
            }
        }
    }
    decode_record(resource.kind, Value::Object(object))
}

fn decode_record(kind: ResourceKind, record: Value) -> Result<ListItem, RemoteError> {
    let Value::Object(object) = record else {
        return Err(RemoteError::new(FailureKind::Decode, "record is not an object"));
    };
    let id = extract_id(&object)
        .ok_or_else(|| RemoteError::new(FailureKind::MissingId, "no `_id` field"))?;
    let value = Value::Object(object);
    let decode_err = |err: serde_json::Error| RemoteError::new(FailureKind::Decode, err.to_string());

    let fields = match kind {
        ResourceKind::Experience => {
            let raw: RawExperience = serde_json::from_value(value).map_err(decode_err)?;
            ItemFields {
                title: raw.title,
                author: raw.author.and_then(|author| author.name),
                created_at: raw.created_at.as_deref().and_then(parse_date),
                content: raw.content,
                ..ItemFields::default()
            }
        }
        ResourceKind::Feedback => {
            let raw: RawFeedback = serde_json::from_value(value).map_err(decode_err)?;
            let scores = [
                raw.technical_skill,
                raw.communication_skill,
                raw.overall_experience,
            ];
            ItemFields {
                title: raw.company,
                created_at: raw.created_at.as_deref().and_then(parse_date),
                content: raw.comment,
                ratings: FEEDBACK_SCORE_KEYS
                    .iter()
                    .zip(scores)
                    .map(|((_, label), score)| Rating::new(*label, coerce_score(score.as_ref())))
                    .collect(),
                ..ItemFields::default()
            }
        }
        ResourceKind::GdSchedule => {
            let raw: RawGdSchedule = serde_json::from_value(value).map_err(decode_err)?;
            ItemFields {
                title: raw.company_name,
                created_at: raw.gd_date.as_deref().and_then(parse_date),
                schedule_time: raw.gd_time,
                content: raw.gd_info,
                link: Some(MeetingLink {
                    url: raw.gd_link.filter(|link| !link.trim().is_empty()),
                    visible: raw.is_link_visible,
                }),
                shortlisted: raw.was_shortlisted,
                ..ItemFields::default()
            }
        }
    };
    Ok(ListItem { id, fields })
}

/// Request body for a create/update of `draft`.
pub fn encode_draft(kind: ResourceKind, draft: &Draft) -> Value {
    let fields = &draft.fields;
    match kind {
        ResourceKind::Experience => json!({
            "title": fields.title,
            "content": fields.content,
        }),
        ResourceKind::Feedback => {
            let mut body = Map::new();
            body.insert("company".into(), json!(fields.title));
            body.insert("comment".into(), json!(fields.content));
            for (key, label) in FEEDBACK_SCORE_KEYS {
                let score = fields
                    .ratings
                    .iter()
                    .find(|rating| rating.label == label)
                    .map(|rating| rating.score);
                body.insert(key.into(), json!(score));
            }
            Value::Object(body)
        }
        ResourceKind::GdSchedule => {
            let link = fields.link.clone().unwrap_or_default();
            json!({
                "company_name": fields.title,
                "gd_date": fields.created_at.map(|date| date.format("%Y-%m-%d").to_string()),
                "gd_time": fields.schedule_time,
                "gd_info": fields.content,
                "gd_link": link.url,
                "isLinkVisible": link.visible,
                "was_shortlisted": fields.shortlisted,
            })
        }
    }
}

fn extract_id(object: &Map<String, Value>) -> Option<ItemId> {
    let raw = object.get("_id").or_else(|| object.get("id"))?;
    match raw {
        Value::String(id) if !id.trim().is_empty() => Some(ItemId::new(id.clone())),
        Value::Number(id) => Some(ItemId::new(id.to_string())),
        _ => None,
    }
}

fn coerce_score(raw: Option<&Value>) -> u8 {
    let score = match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    score.round().clamp(0.0, f64::from(MAX_RATING)) as u8
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()),
        Err(_) => {
            portal_warn!("Ignoring unparseable date {:?}", raw);
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn feedback() -> ResourceSpec {
        ResourceSpec::new(ResourceKind::Feedback, "feedback", "data")
    }

    #[test]
    fn feedback_scores_are_coerced() {
        let body = br#"{"data":[{"_id":"f1","company":"Acme","technicalSkill":4,
            "communicationSkill":"3","overallExperience":7.6,"comment":"ok"}]}"#;
        let items = decode_collection(&feedback(), body).unwrap();
        let scores: Vec<_> = items[0].fields.ratings.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![4, 3, 5]);
        assert_eq!(items[0].fields.ratings[0].label, "Technical Skill");
        assert_eq!(items[0].fields.content.as_deref(), Some("ok"));
    }

    #[test]
    fn missing_envelope_is_empty() {
        assert!(decode_collection(&feedback(), br#"{"message":"none"}"#)
            .unwrap()
            .is_empty());
        assert!(decode_collection(&feedback(), br#"{"data":null}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn record_without_id_rejects_payload() {
        let body = br#"{"data":[{"_id":"f1","company":"A"},{"company":"B"}]}"#;
        let err = decode_collection(&feedback(), body).unwrap_err();
        assert_eq!(err.kind, FailureKind::MissingId);
        assert!(err.message.starts_with("record 1"));
    }

    #[test]
    fn duplicate_ids_reject_payload() {
        let body = br#"[{"_id":"f1"},{"_id":"f1"}]"#;
        let err = decode_collection(&feedback(), body).unwrap_err();
        assert_eq!(
            err.kind,
            FailureKind::DuplicateId {
                id: "f1".to_string()
            }
        );
    }

    #[test]
    fn wrong_envelope_type_is_decode_error() {
        let err = decode_collection(&feedback(), br#"{"data":{"_id":"x"}}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
    }

    #[test]
    fn gd_schedule_dates_and_links() {
        let resource = ResourceSpec::new(ResourceKind::GdSchedule, "gd", "items");
        let body = br#"{"items":[{"_id":7,"company_name":"Acme","gd_date":"2025-03-05",
            "gd_time":"10:30","gd_link":"","isLinkVisible":true,"was_shortlisted":null}]}"#;
        let items = decode_collection(&resource, body).unwrap();
        let fields = &items[0].fields;
        assert_eq!(items[0].id, ItemId::from("7"));
        assert_eq!(
            fields.created_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(
            fields.link,
            Some(MeetingLink {
                url: None,
                visible: true
            })
        );
        assert_eq!(fields.shortlisted, None);
    }

    #[test]
    fn experience_author_and_timestamp() {
        let resource = ResourceSpec::new(ResourceKind::Experience, "sharedexperience", "otherExperiences");
        let body = br#"{"otherExperiences":[{"_id":"e1","title":"T","author":{"name":"Ravi"},
            "createdAt":"2024-11-20T09:00:00.000Z","content":"<p>x</p>"}]}"#;
        let item = &decode_collection(&resource, body).unwrap()[0];
        assert_eq!(item.fields.author.as_deref(), Some("Ravi"));
        assert_eq!(
            item.fields.created_at,
            Some(Utc.with_ymd_and_hms(2024, 11, 20, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn upsert_response_may_be_wrapped() {
        let resource = feedback();
        let item = decode_item(&resource, br#"{"data":{"_id":"f9","company":"Acme"}}"#).unwrap();
        assert_eq!(item.id, ItemId::from("f9"));

        let err = decode_item(&resource, br#"{"message":"saved"}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::MissingId);
    }

    #[test]
    fn feedback_draft_uses_wire_keys() {
        let mut draft = Draft::template(ResourceKind::Feedback);
        draft.fields.title = Some("Acme".into());
        draft.fields.ratings[1].score = 4;
        let body = encode_draft(ResourceKind::Feedback, &draft);
        assert_eq!(body["company"], json!("Acme"));
        assert_eq!(body["communicationSkill"], json!(4));
        assert_eq!(body["technicalSkill"], json!(0));
    }
}
