pub mod edit;
pub mod lenient;
pub mod resume;
pub mod text_or_list;

pub use edit::{apply_edit, EditError, ResumeEdit};
pub use resume::{CoverageReview, EducationEntry, JobEntry, Language, Profile, ResumeDocumentModel};
pub use text_or_list::TextOrList;
