use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::models::Role;

/// Permit when `required` is empty or contains the caller's role
pub fn authorize(claims: &Claims, required: &[Role]) -> Result<(), AppError> {
    if required.is_empty() || required.contains(&claims.role) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %claims.user_id,
            role = %claims.role,
            "Access denied for role"
        );
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

/// Permit admins and the owner of the record
pub fn authorize_owner_or_admin(claims: &Claims, owner: Uuid) -> Result<(), AppError> {
    if claims.is_admin() || claims.user_id()? == owner {
        Ok(())
    } else {
        tracing::warn!(user_id = %claims.user_id, target = %owner, "Access to foreign record denied");
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(role: Role) -> Claims {
        Claims::new(Uuid::new_v4(), role, Utc::now(), 900, "test".to_string())
    }

    #[test]
    fn test_empty_requirement_permits_everyone() {
        assert!(authorize(&claims(Role::User), &[]).is_ok());
        assert!(authorize(&claims(Role::Admin), &[]).is_ok());
    }

    #[test]
    fn test_role_membership() {
        assert!(authorize(&claims(Role::Admin), &[Role::Admin]).is_ok());
        assert!(authorize(&claims(Role::User), &[Role::Admin, Role::User]).is_ok());
        assert!(matches!(
            authorize(&claims(Role::User), &[Role::Admin]),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_owner_or_admin() {
        let owner = claims(Role::User);
        let owner_id = owner.user_id().unwrap();

        assert!(authorize_owner_or_admin(&owner, owner_id).is_ok());
        assert!(authorize_owner_or_admin(&claims(Role::Admin), owner_id).is_ok());
        assert!(matches!(
            authorize_owner_or_admin(&claims(Role::User), owner_id),
            Err(AppError::Forbidden(_))
        ));
    }
}
