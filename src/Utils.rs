/// reading Sillén diagram tasks (acids and settings) from header-sectioned text files
pub mod load_from_file;
