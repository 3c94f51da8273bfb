use serde_json::{Value, json};
use tracing::debug;

use crate::{schedule::derive_weekday, storage::StorageError};

type MigrationFn = fn(Value) -> Result<Value, StorageError>;

fn get_migrations() -> Vec<MigrationFn> {
    vec![migrate_v1_to_v2]
}

/// Returns 1 if version field is missing (files written before versioning)
pub fn detect_version(data: &Value) -> Result<u32, StorageError> {
    match data.get("version") {
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::InvalidVersion(v.clone())),
        None => Ok(1),
    }
}

/// Migrations are applied sequentially: v1→v2→v3→...→target
pub fn apply_migrations(
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion(from_version));
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        // v1→v2 is at index 0
        let migration_idx = version.checked_sub(1).map(|i| i as usize);

        let Some(migration) = migration_idx.and_then(|i| migrations.get(i)) else {
            return Err(StorageError::UnsupportedVersion(version));
        };

        debug!(from = version, to = version + 1, "applying store migration");
        data = migration(data)?;
    }

    Ok(data)
}

/// v1 classes only carried their weekday inside the "{Weekday}-{HH:MM}" id.
/// v2 stores it as an explicit field.
fn migrate_v1_to_v2(mut value: Value) -> Result<Value, StorageError> {
    if let Some(obj) = value.as_object_mut() {
        obj.insert("version".to_string(), Value::from(2));

        if let Some(classes) = obj.get_mut("classes").and_then(|c| c.as_array_mut()) {
            for class in classes {
                let Some(class_obj) = class.as_object_mut() else {
                    continue;
                };
                if class_obj.contains_key("weekday") {
                    continue;
                }

                let id = class_obj
                    .get("id")
                    .and_then(|id| id.as_str())
                    .unwrap_or_default()
                    .to_string();
                let weekday =
                    derive_weekday(&id).ok_or_else(|| StorageError::UnmigratableClass(id))?;

                class_obj.insert("weekday".to_string(), json!(weekday));
            }
        }
    }

    Ok(value)
}
