use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};

use super::model::DriverProfile;
use super::repository::ProfileRepository;
use crate::dynamo::{self, DynamoStore, Item};
use crate::error::{AtomError, AtomResult};

// PK = SK = "USER#{user_id}"
fn user_key(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

fn profile_to_item(profile: &DriverProfile) -> Item {
    let key = user_key(&profile.user_id);
    let mut item = Item::new();
    item.insert("PK".into(), dynamo::s(&key));
    item.insert("SK".into(), dynamo::s(&key));
    item.insert("user_name".into(), dynamo::s(&profile.display_name));
    item.insert("user_email".into(), dynamo::s(&profile.email));
    item.insert("user_created_at".into(), dynamo::timestamp(&profile.created_at));
    item.insert("updated_at".into(), dynamo::timestamp(&profile.updated_at));
    dynamo::put_opt(&mut item, "phone", profile.phone.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "home_state", profile.home_state.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "last_login", profile.last_login_at.as_ref().map(dynamo::timestamp));
    item
}

fn profile_from_item(user_id: &str, item: &Item) -> DriverProfile {
    let email = dynamo::get_s(item, "user_email").unwrap_or_default();
    let mut display_name = dynamo::get_s(item, "user_name").unwrap_or_default();
    if display_name.trim().is_empty() {
        display_name = email.split('@').next().unwrap_or("Driver").to_string();
    }

    DriverProfile {
        user_id: user_id.to_string(),
        display_name,
        email,
        phone: dynamo::get_s(item, "phone"),
        home_state: dynamo::get_s(item, "home_state"),
        created_at: dynamo::get_timestamp(item, "user_created_at"),
        updated_at: dynamo::get_timestamp(item, "updated_at"),
        last_login_at: dynamo::get_s(item, "last_login").map(|_| dynamo::get_timestamp(item, "last_login")),
    }
}

#[async_trait]
impl ProfileRepository for DynamoStore {
    async fn put_profile(&self, profile: &DriverProfile) -> AtomResult<()> {
        self.put(profile_to_item(profile)).await
    }

    async fn get_profile(&self, user_id: &str) -> AtomResult<Option<DriverProfile>> {
        let key = user_key(user_id);
        Ok(self
            .get(&key, &key)
            .await?
            .map(|item| profile_from_item(user_id, &item)))
    }

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> AtomResult<()> {
        let key = user_key(user_id);
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(key.clone()))
            .key("SK", AttributeValue::S(key))
            .update_expression("SET last_login = :login")
            .condition_expression("attribute_exists(PK)")
            .expression_attribute_values(":login", AttributeValue::S(at.to_rfc3339()))
            .send()
            .await
            .map_err(|e| AtomError::persistence(format!("DynamoDB update_item error: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn blank_name_falls_back_to_email() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let profile = DriverProfile {
            user_id: "sub-1".into(),
            display_name: "".into(),
            email: "lee@example.com".into(),
            phone: None,
            home_state: Some("WA".into()),
            created_at: at,
            updated_at: at,
            last_login_at: None,
        };
        let loaded = profile_from_item("sub-1", &profile_to_item(&profile));
        assert_eq!(loaded.display_name, "lee");
        assert_eq!(loaded.home_state.as_deref(), Some("WA"));
        assert_eq!(loaded.created_at, at);
    }
}
