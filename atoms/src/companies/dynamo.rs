use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use super::model::{Company, UserCompanyStatus};
use super::repository::{CompanyRepository, CompanyStatusRepository};
use crate::dynamo::{self, DynamoStore, Item};
use crate::error::AtomResult;

// PK = "COMPANY", SK = "COMPANY#{company_id}"
const COMPANY_PK: &str = "COMPANY";
const COMPANY_PREFIX: &str = "COMPANY#";
// PK = "USER#{user_id}", SK = "COMPANY_STATUS#{company_id}"
const STATUS_PREFIX: &str = "COMPANY_STATUS#";

fn user_pk(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

fn company_to_item(company: &Company) -> Item {
    let mut item = Item::new();
    item.insert("PK".into(), dynamo::s(COMPANY_PK));
    item.insert("SK".into(), dynamo::s(format!("{}{}", COMPANY_PREFIX, company.company_id)));
    item.insert("company_name".into(), dynamo::s(&company.name));
    item.insert("service_verticals".into(), dynamo::list(&company.service_verticals));
    item.insert("vehicle_types".into(), dynamo::list(&company.vehicle_types));
    item.insert("contract_types".into(), dynamo::list(&company.contract_types));
    item.insert("areas_served".into(), dynamo::list(&company.areas_served));
    item.insert("states".into(), dynamo::list(&company.states));
    item.insert("requirements".into(), dynamo::list(&company.requirements));
    item.insert("created_by".into(), dynamo::s(&company.created_by));
    item.insert("created_at".into(), dynamo::timestamp(&company.created_at));
    item.insert("updated_at".into(), dynamo::timestamp(&company.updated_at));
    dynamo::put_opt(&mut item, "description", company.description.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "website", company.website.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "pay_range", company.pay_range.as_deref().map(dynamo::s));
    item
}

fn company_from_item(item: &Item) -> Option<Company> {
    Some(Company {
        company_id: dynamo::id_from_sk(item, COMPANY_PREFIX)?,
        name: dynamo::get_s(item, "company_name").unwrap_or_default(),
        description: dynamo::get_s(item, "description"),
        website: dynamo::get_s(item, "website"),
        service_verticals: dynamo::get_list(item, "service_verticals"),
        vehicle_types: dynamo::get_list(item, "vehicle_types"),
        contract_types: dynamo::get_list(item, "contract_types"),
        areas_served: dynamo::get_list(item, "areas_served"),
        states: dynamo::get_list(item, "states"),
        pay_range: dynamo::get_s(item, "pay_range"),
        requirements: dynamo::get_list(item, "requirements"),
        created_by: dynamo::get_s(item, "created_by").unwrap_or_default(),
        created_at: dynamo::get_timestamp(item, "created_at"),
        updated_at: dynamo::get_timestamp(item, "updated_at"),
    })
}

fn status_from_item(item: &Item) -> Option<(String, UserCompanyStatus)> {
    let company_id = dynamo::id_from_sk(item, STATUS_PREFIX)?;
    let status = match dynamo::get_s(item, "status")?.parse() {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!("⚠️ skipping company status for {}: {}", company_id, e);
            return None;
        }
    };
    Some((company_id, status))
}

#[async_trait]
impl CompanyRepository for DynamoStore {
    async fn put_company(&self, company: &Company) -> AtomResult<()> {
        self.put(company_to_item(company)).await
    }

    async fn get_company(&self, company_id: &str) -> AtomResult<Option<Company>> {
        let sk = format!("{}{}", COMPANY_PREFIX, company_id);
        Ok(self.get(COMPANY_PK, &sk).await?.as_ref().and_then(company_from_item))
    }

    async fn list_companies(&self) -> AtomResult<Vec<Company>> {
        let items = self.query_prefix(COMPANY_PK, COMPANY_PREFIX).await?;
        Ok(items.iter().filter_map(company_from_item).collect())
    }
}

#[async_trait]
impl CompanyStatusRepository for DynamoStore {
    async fn put_status(&self, user_id: &str, company_id: &str, status: UserCompanyStatus) -> AtomResult<()> {
        let mut item = Item::new();
        item.insert("PK".into(), dynamo::s(user_pk(user_id)));
        item.insert("SK".into(), dynamo::s(format!("{}{}", STATUS_PREFIX, company_id)));
        item.insert("status".into(), dynamo::s(status.as_str()));
        item.insert("updated_at".into(), dynamo::timestamp(&Utc::now()));
        self.put(item).await
    }

    async fn get_status(&self, user_id: &str, company_id: &str) -> AtomResult<Option<UserCompanyStatus>> {
        let sk = format!("{}{}", STATUS_PREFIX, company_id);
        Ok(self
            .get(&user_pk(user_id), &sk)
            .await?
            .as_ref()
            .and_then(status_from_item)
            .map(|(_, status)| status))
    }

    async fn list_statuses(&self, user_id: &str) -> AtomResult<HashMap<String, UserCompanyStatus>> {
        let items = self.query_prefix(&user_pk(user_id), STATUS_PREFIX).await?;
        Ok(items.iter().filter_map(status_from_item).collect())
    }

    async fn delete_status(&self, user_id: &str, company_id: &str) -> AtomResult<()> {
        let sk = format!("{}{}", STATUS_PREFIX, company_id);
        self.delete(&user_pk(user_id), &sk).await
    }
}
