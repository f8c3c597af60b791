//! Controller layer for the "Upload to Modeling Commons" dialog: upload
//! mode coordination, incremental model search, permission dependency
//! resolution, and submission dispatch. Rendering is the host
//! application's concern; everything here is an explicit model the host
//! can draw from and feed events into.

pub mod dialog;
pub mod events;
pub mod form;
pub mod search;
pub mod selector;

pub use dialog::{PreviewProvider, UploadDialog};
pub use events::DialogEvent;
pub use form::{FieldRegions, PreviewSelection, UploadForm};
pub use search::{
    ModelSearchField, EMPTY_QUERY_NOTE, NO_RESULTS_NOTE, SEARCHING_NOTE, SEARCH_RESULT_CAP,
};
pub use selector::{SelectorEntry, SelectorModel};
