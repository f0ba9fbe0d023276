pub mod base;
pub mod download;
pub mod server;
pub mod upstream;

pub use base::*;
pub use download::*;
pub use server::*;
pub use upstream::*;
