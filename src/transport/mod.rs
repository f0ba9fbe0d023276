pub mod extract;
pub mod http_server;
pub mod middleware;
pub mod proxy;
pub mod routes;

pub use proxy::{DownloadProxy, ProxyStreamError};
