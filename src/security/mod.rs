pub mod rate_limit;
pub mod session;

pub use session::SessionUser;
