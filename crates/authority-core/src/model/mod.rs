//! Privilege model: grantees, privilege kinds and per-grantee aggregates.

pub mod grantee;
pub mod privilege_type;
pub mod privileges;

pub use grantee::{AuthorityUser, Grantee, ANY_HOST};
pub use privilege_type::PrivilegeType;
pub use privileges::{PrivilegeSet, Privileges};
