//! # dmnkit XML
//!
//! Reader and writer for DMN XML documents (DMN 1.1, 1.2 and 1.3 with DMNDI).
//! This crate maps between XML text and the document model in
//! [`dmnkit_core::dmn`].
//!
//! ## Usage
//!
//! ```
//! # use dmnkit_xml::{read_definitions, write_definitions, WriteOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = r#"
//!         <definitions xmlns="http://www.omg.org/spec/DMN/20180521/MODEL/"
//!                      id="_defs" name="Loan" namespace="urn:loan">
//!             <inputData id="_age" name="Age"/>
//!         </definitions>
//!     "#;
//!
//!     let defs = read_definitions(source)?;
//!     assert_eq!(defs.drg_elements.len(), 1);
//!
//!     let xml = write_definitions(&defs, &WriteOptions::default())?;
//!     assert!(xml.contains("inputData"));
//!     Ok(())
//! }
//! ```

pub mod error;
mod reader;
mod span;
mod tree;
mod writer;

pub use error::{ParseError, WriteError};
pub use reader::read_definitions;
pub use span::Span;
pub use writer::{
    DC_NAMESPACE, DI_NAMESPACE, DMNDI_12_NAMESPACE, DMNDI_13_NAMESPACE, KIE_NAMESPACE,
    WriteOptions, write_definitions,
};
