mod settings;

pub use settings::{default_groups, Columns, Settings, SETTINGS_FILENAME};
