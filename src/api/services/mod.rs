pub mod redirect;
pub mod shorturls;
pub mod types;

pub use redirect::{RedirectService, redirect_routes};
pub use shorturls::{ShortUrlService, shorturl_routes};
