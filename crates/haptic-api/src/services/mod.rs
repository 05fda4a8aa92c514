//! Business logic services.

pub mod identity;
pub mod jobs;
pub mod urls;

pub use identity::IdentityService;
pub use jobs::JobService;
pub use urls::UrlService;
