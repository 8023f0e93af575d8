//! Shared vocabulary between the seekbox engines and the application that
//! hosts them.
//!
//! Engines never talk to a transport directly. They consume the collaborator
//! traits in [`source`] and operate on the record and result types exported
//! here, so a host can back them with HTTP endpoints, an in-memory catalog, or
//! test fakes.

pub mod error;
pub mod item;
pub mod results;
pub mod source;

pub use error::TransportError;
pub use item::{Annotation, AnnotationKind, CREATE_NEW_ID, ItemId, Record};
pub use results::{EntityKind, Group, GroupedResults, OmniboxBundle};
pub use source::{CorpusSource, GroupedSource, OmniboxSource, SearchSource};
