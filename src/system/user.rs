//! Identity of users on this host
use crate::error::{Error, Result};
use nix::unistd::{gethostname, getuid, Gid, Group, Uid, User};

/// A user account, with its primary group and the host it lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    /// User ID
    pub uid: u32,

    /// Primary group ID
    pub gid: u32,

    /// Login name
    pub username: String,

    /// Primary group name
    pub group: String,

    /// Host name, as reported by the kernel
    pub hostname: String,
}

impl UserInfo {
    /// The user this process is running as.
    pub fn current() -> Result<Self> {
        Self::lookup_id(getuid().as_raw())
    }

    /// Look up a user by login name.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownUser`] if there is no such user
    /// - [`Error::UnknownGroup`] if their primary group doesn't exist
    pub fn lookup(username: &str) -> Result<Self> {
        let user = User::from_name(username)?.ok_or_else(|| Error::UnknownUser(username.into()))?;
        Self::new(user)
    }

    /// Look up a user by ID.
    ///
    /// See [`UserInfo::lookup`].
    pub fn lookup_id(uid: u32) -> Result<Self> {
        let user = User::from_uid(Uid::from_raw(uid))?
            .ok_or_else(|| Error::UnknownUser(uid.to_string()))?;
        Self::new(user)
    }

    fn new(user: User) -> Result<Self> {
        let gid = user.gid.as_raw();
        let group = Group::from_gid(Gid::from_raw(gid))?.ok_or(Error::UnknownGroup(gid))?;
        let hostname = gethostname()?.to_string_lossy().into_owned();
        Ok(Self {
            uid: user.uid.as_raw(),
            gid,
            username: user.name,
            group: group.name,
            hostname,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[test]
    fn current() -> Result<()> {
        let me = UserInfo::current()?;
        assert_eq!(me.uid, getuid().as_raw());
        assert!(!me.username.is_empty());
        assert!(!me.hostname.is_empty());

        let again = UserInfo::lookup(&me.username)?;
        assert_eq!(again, me);
        Ok(())
    }

    #[test]
    fn root() -> Result<()> {
        let root = UserInfo::lookup_id(0)?;
        assert_eq!(root.username, "root");
        assert_eq!(root.gid, 0);
        Ok(())
    }

    #[test]
    fn unknown() {
        assert!(matches!(
            UserInfo::lookup("no-such-user-linstat"),
            Err(Error::UnknownUser(_))
        ));
    }
}
