// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use errors::*` or name `ErrorKind` directly.
use error_chain::*;

error_chain! {
    errors {
        InvalidDimension(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}: width and height must be at least 1 and addressable",
                    width, height)
        }
        OutOfBounds(x: u32, y: u32) {
            description("position outside of the grid")
            display("position ({}, {}) is outside of the grid", x, y)
        }
    }
}
