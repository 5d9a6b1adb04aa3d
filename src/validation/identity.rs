/// Checks that a username only contains letters, numbers, underscores, hyphens and dots.
///
/// Used as a `garde` custom rule on [`Identity`](crate::models::session::Identity).
pub fn username_charset(username: &str, _context: &()) -> garde::Result {
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(garde::Error::new(
            "Username can only contain letters, numbers, underscores, hyphens, and dots",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use garde::Validate;

    use crate::models::session::{Identity, Role};

    fn identity(username: &str) -> Identity {
        Identity {
            username: username.to_string(),
            role: Role::Staff,
        }
    }

    #[test]
    fn accepts_plain_usernames() {
        assert!(identity("jane").validate().is_ok());
        assert!(identity("front-desk_2").validate().is_ok());
        assert!(identity("j.doe").validate().is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert!(identity("").validate().is_err());
        assert!(identity("<script>").validate().is_err());
        assert!(identity("jane doe").validate().is_err());
        assert!(identity(&"a".repeat(65)).validate().is_err());
    }
}
