//! DynamoDB single-table access shared by the atom adapters.
//!
//! Every item carries string `PK` / `SK` keys; the per-entity adapters
//! decide the key layout and use the helpers below to read attributes.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AtomError, AtomResult};

pub type Item = HashMap<String, AttributeValue>;

/// DynamoDB-backed implementation of the repository ports.
#[derive(Clone, Debug)]
pub struct DynamoStore {
    pub(crate) client: DynamoClient,
    pub(crate) table_name: String,
}

impl DynamoStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Loads every item under `pk` whose sort key starts with `sk_prefix`,
    /// following `LastEvaluatedKey` until the partition is exhausted.
    pub(crate) async fn query_prefix(&self, pk: &str, sk_prefix: &str) -> AtomResult<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
                .expression_attribute_values(":sk_prefix", AttributeValue::S(sk_prefix.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| AtomError::persistence(format!("DynamoDB query error: {}", e)))?;

            items.extend(result.items().iter().cloned());

            match result.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(items)
    }

    pub(crate) async fn get(&self, pk: &str, sk: &str) -> AtomResult<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.to_string()))
            .key("SK", AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(|e| AtomError::persistence(format!("DynamoDB get_item error: {}", e)))?;

        Ok(result.item().cloned())
    }

    pub(crate) async fn put(&self, item: Item) -> AtomResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| AtomError::persistence(format!("DynamoDB put_item error: {}", e)))?;
        Ok(())
    }

    pub(crate) async fn delete(&self, pk: &str, sk: &str) -> AtomResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.to_string()))
            .key("SK", AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(|e| AtomError::persistence(format!("DynamoDB delete_item error: {}", e)))?;
        Ok(())
    }
}

pub(crate) fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub(crate) fn n(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

pub(crate) fn list(values: &[String]) -> AttributeValue {
    AttributeValue::L(values.iter().map(|v| AttributeValue::S(v.clone())).collect())
}

pub(crate) fn timestamp(value: &DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(value.to_rfc3339())
}

pub(crate) fn get_s(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).map(|s| s.to_string())
}

pub(crate) fn get_n<T: std::str::FromStr>(item: &Item, name: &str) -> Option<T> {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
}

pub(crate) fn get_bool(item: &Item, name: &str) -> bool {
    item.get(name)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false)
}

pub(crate) fn get_list(item: &Item, name: &str) -> Vec<String> {
    item.get(name)
        .and_then(|v| v.as_l().ok())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_s().ok().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn get_timestamp(item: &Item, name: &str) -> DateTime<Utc> {
    get_s(item, name)
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

pub(crate) fn get_date(item: &Item, name: &str) -> Option<NaiveDate> {
    get_s(item, name).and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Reads a nested document stored as a JSON string.
pub(crate) fn get_json<T: serde::de::DeserializeOwned>(item: &Item, name: &str) -> AtomResult<Option<T>> {
    match get_s(item, name) {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AtomError::persistence(format!("Failed to parse {}: {}", name, e))),
        None => Ok(None),
    }
}

pub(crate) fn json<T: serde::Serialize>(value: &T) -> AtomResult<AttributeValue> {
    serde_json::to_string(value)
        .map(AttributeValue::S)
        .map_err(|e| AtomError::persistence(format!("Failed to serialize document: {}", e)))
}

/// Sets `name` on the item only when a value is present.
pub(crate) fn put_opt(item: &mut Item, name: &str, value: Option<AttributeValue>) {
    if let Some(value) = value {
        item.insert(name.to_string(), value);
    }
}

/// Strips the entity prefix off a sort key.
pub(crate) fn id_from_sk(item: &Item, prefix: &str) -> Option<String> {
    get_s(item, "SK").and_then(|sk| sk.strip_prefix(prefix).map(|id| id.to_string()))
}
