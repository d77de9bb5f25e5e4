use async_trait::async_trait;

use super::model::{Vehicle, VehicleStatus};
use super::repository::VehicleRepository;
use crate::dynamo::{self, DynamoStore, Item};
use crate::error::AtomResult;

// PK = "USER#{user_id}", SK = "VEHICLE#{vehicle_id}"
const VEHICLE_PREFIX: &str = "VEHICLE#";

fn user_pk(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

fn vehicle_sk(vehicle_id: &str) -> String {
    format!("{}{}", VEHICLE_PREFIX, vehicle_id)
}

fn vehicle_to_item(vehicle: &Vehicle) -> AtomResult<Item> {
    let mut item = Item::new();
    item.insert("PK".into(), dynamo::s(user_pk(&vehicle.user_id)));
    item.insert("SK".into(), dynamo::s(vehicle_sk(&vehicle.vehicle_id)));
    item.insert("make".into(), dynamo::s(&vehicle.make));
    item.insert("model".into(), dynamo::s(&vehicle.model));
    item.insert("year".into(), dynamo::n(vehicle.year));
    item.insert("vehicle_type".into(), dynamo::s(&vehicle.vehicle_type));
    item.insert("status".into(), dynamo::s(vehicle.status.as_str()));
    item.insert("created_at".into(), dynamo::timestamp(&vehicle.created_at));
    item.insert("updated_at".into(), dynamo::timestamp(&vehicle.updated_at));
    dynamo::put_opt(&mut item, "license_plate", vehicle.license_plate.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "vin", vehicle.vin.as_deref().map(dynamo::s));

    // Nested info documents are stored as JSON strings
    if let Some(specs) = &vehicle.specifications {
        item.insert("specifications".into(), dynamo::json(specs)?);
    }
    if let Some(insurance) = &vehicle.insurance {
        item.insert("insurance".into(), dynamo::json(insurance)?);
    }
    if let Some(financing) = &vehicle.financing {
        item.insert("financing".into(), dynamo::json(financing)?);
    }
    Ok(item)
}

fn vehicle_from_item(user_id: &str, item: &Item) -> AtomResult<Option<Vehicle>> {
    let Some(vehicle_id) = dynamo::id_from_sk(item, VEHICLE_PREFIX) else {
        return Ok(None);
    };
    Ok(Some(Vehicle {
        vehicle_id,
        user_id: user_id.to_string(),
        make: dynamo::get_s(item, "make").unwrap_or_default(),
        model: dynamo::get_s(item, "model").unwrap_or_default(),
        year: dynamo::get_n(item, "year").unwrap_or_default(),
        vehicle_type: dynamo::get_s(item, "vehicle_type").unwrap_or_default(),
        status: dynamo::get_s(item, "status")
            .and_then(|s| s.parse().ok())
            .unwrap_or(VehicleStatus::Active),
        license_plate: dynamo::get_s(item, "license_plate"),
        vin: dynamo::get_s(item, "vin"),
        specifications: dynamo::get_json(item, "specifications")?,
        insurance: dynamo::get_json(item, "insurance")?,
        financing: dynamo::get_json(item, "financing")?,
        created_at: dynamo::get_timestamp(item, "created_at"),
        updated_at: dynamo::get_timestamp(item, "updated_at"),
    }))
}

#[async_trait]
impl VehicleRepository for DynamoStore {
    async fn put_vehicle(&self, vehicle: &Vehicle) -> AtomResult<()> {
        self.put(vehicle_to_item(vehicle)?).await
    }

    async fn get_vehicle(&self, user_id: &str, vehicle_id: &str) -> AtomResult<Option<Vehicle>> {
        match self.get(&user_pk(user_id), &vehicle_sk(vehicle_id)).await? {
            Some(item) => vehicle_from_item(user_id, &item),
            None => Ok(None),
        }
    }

    async fn list_vehicles(&self, user_id: &str) -> AtomResult<Vec<Vehicle>> {
        let items = self.query_prefix(&user_pk(user_id), VEHICLE_PREFIX).await?;
        let mut vehicles = Vec::with_capacity(items.len());
        for item in &items {
            if let Some(vehicle) = vehicle_from_item(user_id, item)? {
                vehicles.push(vehicle);
            }
        }
        Ok(vehicles)
    }

    async fn delete_vehicle(&self, user_id: &str, vehicle_id: &str) -> AtomResult<()> {
        self.delete(&user_pk(user_id), &vehicle_sk(vehicle_id)).await
    }
}
