pub mod services;

pub use services::{collect_multipart, PendingImage};
