//! Session and authorization layer.
//!
//! Leaves first: [`store`] holds the tokens, [`token`] decides whether the
//! access token has expired, [`refresh`] trades the refresh token for a new
//! access token, [`authorizer`] decorates every API request with a valid
//! bearer token and [`context`] owns the session lifecycle the route guard
//! reads from.

pub mod authorizer;
pub mod context;
pub mod refresh;
pub mod store;
pub mod token;

pub use self::context::{Session, SessionState};
