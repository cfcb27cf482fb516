pub mod blob;
pub mod files;
pub mod metadata;

pub use blob::{BlobStore, FileBlobStore};
#[cfg(test)]
pub use blob::MemoryBlobStore;
pub use files::{atomic_write, ensure_dir, get_data_dir, init_local_data_dir, log_dir, meta_file};
pub use metadata::{load_metadata, save_metadata, AppMetadata};
