pub mod svg_input;
pub mod svg_output;
