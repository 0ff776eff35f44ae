//! user_update dispatch handler

use super::DispatchError;
use crate::client::KuracordClient;
use crate::events::{Event, UserUpdateEvent};
use kuracord_core::User;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserUpdateData {
    old_user: User,
    new_user: User,
}

/// user_update: refresh the user cache and rewire every member pointing at
/// this user; the current user gets the safe field subset only
pub(super) async fn update(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let body: UserUpdateData = serde_json::from_value(data)?;

    if client.current_user_id() == Some(body.new_user.id) {
        client.apply_current_user_update(&body.new_user);
    }

    client.cache().upsert_user(body.new_user.clone());
    client.cache().propagate_user(&body.new_user);

    client
        .emit(Event::UserUpdated(UserUpdateEvent {
            before: body.old_user,
            after: body.new_user,
        }))
        .await;
    Ok(())
}
