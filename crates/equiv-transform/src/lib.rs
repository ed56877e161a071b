//! Transform-then-compare helpers
//!
//! Run an XML document through a [`Transformer`] (an XSLT processor, a
//! script, an in-process closure) and compare the output against an
//! expected document with `equiv-core`.

pub mod compare;
pub mod error;
pub mod executor;

pub use compare::{assert_transform, transform_xml_to_csv, transform_xml_to_json, transform_xml_to_xml};
pub use error::{Error, Result};
pub use executor::{CommandTransformer, FnTransformer, PROGRAM_VAR, Transformer};
