//! Business image entities.

pub mod model;

pub use model::{
    ALLOWED_IMAGE_TYPES, BusinessImage, ImageKind, MAX_IMAGE_BYTES, NewBusinessImage,
    check_upload, storage_key,
};
