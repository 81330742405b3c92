use uuid::Uuid;

use crate::error::AppError;

/// Anything stored on behalf of a single user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Existence first, then ownership.
///
/// `None` becomes `NotFound(what + " not found")`, a row owned by someone else
/// becomes `Forbidden`.
pub fn ensure_owned<T: Owned>(entity: Option<T>, requester: Uuid, what: &str) -> Result<T, AppError> {
    let entity = entity.ok_or_else(|| AppError::not_found(format!("{what} not found")))?;
    if entity.owner_id() != requester {
        return Err(AppError::Forbidden);
    }
    Ok(entity)
}
