//! Line-oriented text format
//!
//! ```text
//! generateur(G1,100).
//! maison(M1,NORMAL).
//! connexion(M1,G1).
//! ```
//!
//! All generator lines come first, then house lines, then connection lines.
//! Connection arguments may name the house and the generator in either order.

pub mod parser;
pub mod writer;

pub use parser::*;
pub use writer::*;
