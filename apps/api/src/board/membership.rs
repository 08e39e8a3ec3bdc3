//! Adding and removing Board members.
//!
//! Every outcome, including lookups that miss, is reported as a flash
//! message; none of them is an HTTP error.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::SessionUser;
use crate::errors::AppResult;
use crate::flash::FlashMessage;
use crate::models::user::{UserRow, BOARD_GROUP};
use crate::store::PortalStore;

/// Raw management form. The page posts either `action=add&email=…` or
/// `action=remove&user_id=…`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManageForm {
    pub action: String,
    pub email: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageAction {
    Add { email: String },
    Remove { user_id: String },
    Unknown(String),
}

impl From<ManageForm> for ManageAction {
    fn from(form: ManageForm) -> Self {
        match form.action.trim() {
            "add" => ManageAction::Add {
                email: form.email.trim().to_string(),
            },
            "remove" => ManageAction::Remove {
                user_id: form.user_id.trim().to_string(),
            },
            other => ManageAction::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardMember {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<UserRow> for BoardMember {
    fn from(user: UserRow) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

pub async fn board_members(store: &dyn PortalStore) -> AppResult<Vec<BoardMember>> {
    Ok(store
        .group_members(BOARD_GROUP)
        .await?
        .into_iter()
        .map(BoardMember::from)
        .collect())
}

pub async fn apply_action(
    store: &dyn PortalStore,
    caller: &SessionUser,
    action: ManageAction,
) -> AppResult<FlashMessage> {
    match action {
        ManageAction::Add { email } => add_member(store, caller, &email).await,
        ManageAction::Remove { user_id } => remove_member(store, caller, &user_id).await,
        ManageAction::Unknown(action) => Ok(FlashMessage::error(format!(
            "Unknown action '{action}'."
        ))),
    }
}

async fn add_member(
    store: &dyn PortalStore,
    caller: &SessionUser,
    email: &str,
) -> AppResult<FlashMessage> {
    if email.is_empty() {
        return Ok(FlashMessage::error("Enter an email address."));
    }
    let Some(user) = store.find_user_by_email(email).await? else {
        return Ok(FlashMessage::error(format!("No user found with email {email}.")));
    };

    let groups = store.user_groups(user.id).await?;
    let already_board = groups.iter().any(|g| g == BOARD_GROUP);
    if already_board || !store.add_to_group(user.id, BOARD_GROUP).await? {
        return Ok(FlashMessage::info(format!(
            "{} is already on the Board.",
            user.full_name()
        )));
    }

    info!("User {} added {} to the Board", caller.id(), user.id);
    Ok(FlashMessage::success(format!(
        "{} was added to the Board.",
        user.full_name()
    )))
}

async fn remove_member(
    store: &dyn PortalStore,
    caller: &SessionUser,
    raw_user_id: &str,
) -> AppResult<FlashMessage> {
    let user = match Uuid::parse_str(raw_user_id) {
        Ok(id) => store.find_user_by_id(id).await?,
        Err(_) => None,
    };
    let Some(user) = user else {
        return Ok(FlashMessage::error("User not found."));
    };

    if user.id == caller.id() {
        return Ok(FlashMessage::error("You cannot remove yourself from the Board."));
    }

    if !store.remove_from_group(user.id, BOARD_GROUP).await? {
        return Ok(FlashMessage::info(format!(
            "{} is not on the Board.",
            user.full_name()
        )));
    }

    info!("User {} removed {} from the Board", caller.id(), user.id);
    Ok(FlashMessage::success(format!(
        "{} was removed from the Board.",
        user.full_name()
    )))
}
