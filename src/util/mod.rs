//! Utility modules

pub mod file_validation;

pub use file_validation::{
    check_input_file, display_name, first_binary_byte, InputFileError, InputKind, MAX_INPUT_BYTES,
};
