use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the signed-in user, as supplied by the auth collaborator.
///
/// The service treats it as opaque: `id` scopes record ownership, `email` is
/// only echoed back for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
}
