//! Bearer-token gate for document routes.

mod middleware;

pub use middleware::AuthUser;
