pub use slate_core::*;
