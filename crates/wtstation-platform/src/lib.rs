pub mod crash_report;
pub mod external;
pub mod paths;

pub use external::{is_openable, open_external};
pub use paths::{
    assets_dir, config_dir, crash_report_dir, data_dir, ensure_dirs, log_dir, partitions_dir,
    store_file,
};
