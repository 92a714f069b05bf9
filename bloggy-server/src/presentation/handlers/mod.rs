pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod posts;
pub(crate) mod uploads;
pub(crate) mod users;
