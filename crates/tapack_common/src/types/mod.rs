pub mod entry_point;
pub mod entry_root;
pub mod idx;
pub mod module_id;
pub mod output_asset;
pub mod stats;
