pub mod catalog;
pub mod download;
pub mod fallback;
pub mod status;

pub use catalog::{homepage, search, sources, subject_info, trending};
pub use download::download;
pub use fallback::{AVAILABLE_ENDPOINTS, not_found};
pub use status::get_status;
